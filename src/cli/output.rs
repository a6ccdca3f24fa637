use crate::FixReport;
use colored::*;

const COMMENT_HEADER: &str = "Possible misspellings:\n";

/// Markdown body of the pull request comment: one bullet per file, one
/// nested bullet per fix, in discovery order.
pub fn render_comment(report: &FixReport) -> String {
    let mut body = String::from(COMMENT_HEADER);

    for (path, fixes) in report.files() {
        body.push_str(&format!("- `{}`\n", path));
        for fix in fixes {
            body.push_str(&format!(
                "  - line {}: `{}` => `{}`\n",
                fix.line, fix.original, fix.corrected
            ));
        }
    }

    body
}

/// Print the fixes of a run to the console.
pub fn print_report(report: &FixReport, colored_output: bool) {
    for (path, fixes) in report.files() {
        if colored_output {
            println!("\n{}", path.bold().underline());
        } else {
            println!("\n{}", path);
        }

        for fix in fixes {
            if colored_output {
                println!(
                    "  {} {} {} {}",
                    fix.line.to_string().blue().bold(),
                    fix.original.red().bold(),
                    "→".dimmed(),
                    fix.corrected.green()
                );
            } else {
                println!("  {} {} → {}", fix.line, fix.original, fix.corrected);
            }
        }
    }
}

pub fn print_summary(report: &FixReport, colored: bool) {
    println!();
    let total = report.fix_count();
    if total == 0 {
        if colored {
            println!("{}", "✓ No misspellings found!".green().bold());
        } else {
            println!("✓ No misspellings found!");
        }
        return;
    }

    let files = report.file_count();
    let fix_word = if total == 1 { "misspelling" } else { "misspellings" };
    let file_word = if files == 1 { "file" } else { "files" };
    if colored {
        println!(
            "{} {} {} found in {} {}",
            "✗".red().bold(),
            total.to_string().red().bold(),
            fix_word,
            files,
            file_word
        );
    } else {
        println!("✗ {} {} found in {} {}", total, fix_word, files, file_word);
    }
}
