use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use colored::*;
use spellbot::bot::{self, BotError, Outcome, RunContext};
use spellbot::cli::output::{print_report, print_summary, render_comment};
use spellbot::forge::GitHubForge;
use spellbot::{telemetry, Config, MisspellingDictionary};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;

#[derive(Parser, Debug)]
#[command(name = "spellbot")]
#[command(
    version,
    about = "Comments on pull requests with likely misspellings in added lines",
    long_about = None
)]
struct Cli {
    /// GitHub token used to post the comment
    #[arg(value_name = "TOKEN", env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Name of the triggering event
    #[arg(long, env = "GITHUB_EVENT_NAME")]
    event_name: Option<String>,

    /// Path of the JSON event payload
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    event_path: Option<PathBuf>,

    /// GitHub API base URL (GitHub Enterprise)
    #[arg(long, env = "GITHUB_API_URL")]
    api_url: Option<String>,

    /// Configuration file (defaults to ./.spellbot.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Extra misspelling list (`wrong->right` per line)
    #[arg(short, long = "dictionary", value_name = "FILE")]
    dictionaries: Vec<PathBuf>,

    /// Word never to report
    #[arg(short = 'I', long = "ignore-word", value_name = "WORD")]
    ignore_words: Vec<String>,

    /// Print the comment instead of posting it
    #[arg(long)]
    dry_run: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,

    /// Generate shell completion script
    #[arg(long, value_name = "SHELL")]
    completion: Option<Shell>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Handle shell completion generation
    if let Some(shell) = cli.completion {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "spellbot", &mut io::stdout());
        return ExitCode::SUCCESS;
    }

    telemetry::init_tracing(cli.log_json, Level::INFO);
    let colored = !cli.no_color;

    match run(cli, colored) {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            print_error(&format!("{:#}", err), colored);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, colored: bool) -> Result<u8> {
    let Some(token) = cli.token else {
        let err = BotError::MissingToken;
        print_error(&err.to_string(), colored);
        return Ok(err.exit_code());
    };

    let config = Config::load(
        cli.config.as_deref(),
        cli.dictionaries,
        cli.ignore_words,
        cli.api_url,
    )?;
    let dictionary = MisspellingDictionary::load(&config)?;
    let forge = GitHubForge::with_api_base(token, &config.api_url);

    let ctx = RunContext {
        event_name: cli.event_name,
        event_path: cli.event_path,
        dry_run: cli.dry_run,
    };

    match bot::run(&ctx, &dictionary, &forge) {
        Ok(outcome) => {
            print_outcome(&outcome, colored);
            Ok(outcome.exit_code())
        }
        Err(err) => {
            let code = err.exit_code();
            print_error(&format!("{:#}", anyhow::Error::from(err)), colored);
            Ok(code)
        }
    }
}

fn print_outcome(outcome: &Outcome, colored: bool) {
    match outcome {
        Outcome::Skipped(reason) => println!("{}", reason),
        Outcome::Clean => print_summary(&Default::default(), colored),
        Outcome::Commented { report, posted } => {
            print_report(report, colored);
            print_summary(report, colored);
            if !posted {
                println!();
                print!("{}", render_comment(report));
            }
        }
    }
}

fn print_error(message: &str, colored: bool) {
    if colored {
        eprintln!("{} {}", "Error:".red().bold(), message);
    } else {
        eprintln!("Error: {}", message);
    }
}
