//! One bot run: event checks, diff fetch, spelling check, comment.

use crate::checker::SpellChecker;
use crate::cli::output::render_comment;
use crate::event::{is_pull_request_event, EventError, PullRequestEvent};
use crate::forge::{Forge, ForgeError};
use crate::parser::{parse_patched_files, DiffParseError};
use crate::{FixReport, MisspellingDictionary};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Everything a run reads from its environment, besides the token.
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    /// `GITHUB_EVENT_NAME`
    pub event_name: Option<String>,
    /// `GITHUB_EVENT_PATH`
    pub event_path: Option<PathBuf>,
    /// Stop before posting the comment.
    pub dry_run: bool,
}

#[derive(Debug, Error)]
pub enum BotError {
    #[error("No github token found, aborting!")]
    MissingToken,

    #[error("No GITHUB_EVENT_PATH in environment. Check your workflow.")]
    MissingEventPath,

    #[error("Could not load the pull request event")]
    Event(#[from] EventError),

    #[error("Could not get diff of pull request. Aborting.")]
    DiffFetch(#[source] ForgeError),

    #[error("Could not parse diff of pull request")]
    Parse(#[from] DiffParseError),

    #[error("Could not comment on pull request")]
    Comment(#[source] ForgeError),
}

impl BotError {
    /// Every failure ends the run with status 1.
    pub fn exit_code(&self) -> u8 {
        1
    }
}

/// Why a run did nothing. Neither case is an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NotPullRequest(Option<String>),
    ActionMismatch(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotPullRequest(_) => {
                write!(f, "We only work on pull requests. Doing nothing.")
            }
            SkipReason::ActionMismatch(action) => {
                write!(f, "Action mismatch: {}. Doing nothing.", action)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Skipped(SkipReason),
    /// The added lines contain no known misspelling; nothing was posted.
    Clean,
    /// Misspellings were found; `posted` is false in dry-run mode.
    Commented { report: FixReport, posted: bool },
}

impl Outcome {
    pub fn exit_code(&self) -> u8 {
        0
    }
}

/// Run the bot once against `forge`.
///
/// The event is checked before any network access: non pull-request events
/// and unchecked actions return [`Outcome::Skipped`] without touching the
/// forge. At most one diff fetch and one comment post happen.
pub fn run(
    ctx: &RunContext,
    dictionary: &MisspellingDictionary,
    forge: &dyn Forge,
) -> Result<Outcome, BotError> {
    if !is_pull_request_event(ctx.event_name.as_deref()) {
        info!(event = ?ctx.event_name, "not a pull request event");
        return Ok(Outcome::Skipped(SkipReason::NotPullRequest(
            ctx.event_name.clone(),
        )));
    }

    let event_path = ctx.event_path.as_ref().ok_or(BotError::MissingEventPath)?;
    let event = PullRequestEvent::from_path(event_path)?;

    if !event.is_checked_action() {
        info!(action = %event.action, "pull request action is not checked");
        return Ok(Outcome::Skipped(SkipReason::ActionMismatch(event.action)));
    }

    info!(
        repository = %event.repository.full_name,
        number = event.number,
        forge = forge.name(),
        "checking pull request"
    );

    let diff = forge
        .fetch_diff(&event.pull_request.diff_url)
        .map_err(BotError::DiffFetch)?;
    let files = parse_patched_files(&diff)?;
    debug!(
        files = files.len(),
        lines = files.lines().count(),
        "collected added lines"
    );

    let report = SpellChecker::new(dictionary).check(&files);
    if report.is_empty() {
        info!("no misspellings found");
        return Ok(Outcome::Clean);
    }

    if ctx.dry_run {
        warn!(fixes = report.fix_count(), "dry run, comment not posted");
        return Ok(Outcome::Commented {
            report,
            posted: false,
        });
    }

    let body = render_comment(&report);
    forge
        .post_comment(&event.repository.full_name, event.number, &body)
        .map_err(BotError::Comment)?;
    info!(fixes = report.fix_count(), "comment posted");

    Ok(Outcome::Commented {
        report,
        posted: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forge::mock::{MockCall, MockForge};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const DIFF: &str = "\
diff --git a/a.txt b/a.txt
--- a/a.txt
+++ b/a.txt
@@ -4,1 +4,3 @@
 four
+Thsi is a test
+all good here
";

    fn event_file(action: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"action":"{}","number":7,"pull_request":{{"diff_url":"https://github.com/o/r/pull/7.diff"}},"repository":{{"full_name":"o/r"}}}}"#,
            action
        )
        .unwrap();
        file
    }

    fn context(file: &NamedTempFile) -> RunContext {
        RunContext {
            event_name: Some("pull_request".to_string()),
            event_path: Some(file.path().to_path_buf()),
            dry_run: false,
        }
    }

    fn dictionary() -> MisspellingDictionary {
        MisspellingDictionary::parse("thsi->this\n").unwrap()
    }

    #[test]
    fn test_posts_one_comment_for_fixes() {
        let file = event_file("opened");
        let forge = MockForge::with_diff(DIFF);

        let outcome = run(&context(&file), &dictionary(), &forge).unwrap();
        assert!(matches!(outcome, Outcome::Commented { posted: true, .. }));

        let calls = forge.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(
            calls[0],
            MockCall::FetchDiff {
                url: "https://github.com/o/r/pull/7.diff".to_string()
            }
        );
        assert_eq!(
            calls[1],
            MockCall::PostComment {
                full_name: "o/r".to_string(),
                number: 7,
                body: "Possible misspellings:\n- `a.txt`\n  - line 5: `Thsi` => `This`\n"
                    .to_string(),
            }
        );
    }

    #[test]
    fn test_non_pull_request_event_is_skipped() {
        let forge = MockForge::with_diff(DIFF);
        let ctx = RunContext {
            event_name: Some("push".to_string()),
            ..Default::default()
        };

        let outcome = run(&ctx, &dictionary(), &forge).unwrap();
        assert_eq!(
            outcome,
            Outcome::Skipped(SkipReason::NotPullRequest(Some("push".to_string())))
        );
        assert!(forge.calls().is_empty());
    }

    #[test]
    fn test_closed_action_makes_no_calls() {
        let file = event_file("closed");
        let forge = MockForge::with_diff(DIFF);

        let outcome = run(&context(&file), &dictionary(), &forge).unwrap();
        assert_eq!(
            outcome,
            Outcome::Skipped(SkipReason::ActionMismatch("closed".to_string()))
        );
        assert_eq!(outcome.exit_code(), 0);
        assert!(forge.calls().is_empty());
    }

    #[test]
    fn test_failed_diff_fetch_posts_nothing() {
        let file = event_file("synchronize");
        let forge = MockForge::with_diff_error(ForgeError::NotFound("diff".to_string()));

        let err = run(&context(&file), &dictionary(), &forge).unwrap_err();
        assert!(matches!(err, BotError::DiffFetch(ForgeError::NotFound(_))));
        assert_eq!(err.exit_code(), 1);
        assert!(forge.comments().is_empty());
    }

    #[test]
    fn test_clean_diff_posts_nothing() {
        let file = event_file("edited");
        let forge = MockForge::with_diff(DIFF);
        let empty = MisspellingDictionary::default();

        assert_eq!(run(&context(&file), &empty, &forge).unwrap(), Outcome::Clean);
        assert!(forge.comments().is_empty());
    }

    #[test]
    fn test_malformed_diff_aborts() {
        let file = event_file("opened");
        let forge = MockForge::with_diff("--- a/a.txt\n+++ b/a.txt\n@@ -1,3 +1,3 @@\n+Thsi\n");

        let err = run(&context(&file), &dictionary(), &forge).unwrap_err();
        assert!(matches!(err, BotError::Parse(_)));
        assert!(forge.comments().is_empty());
    }

    #[test]
    fn test_dry_run_does_not_post() {
        let file = event_file("opened");
        let forge = MockForge::with_diff(DIFF);
        let ctx = RunContext {
            dry_run: true,
            ..context(&file)
        };

        let outcome = run(&ctx, &dictionary(), &forge).unwrap();
        match outcome {
            Outcome::Commented { report, posted } => {
                assert!(!posted);
                assert_eq!(report.fix_count(), 1);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(forge.comments().is_empty());
    }

    #[test]
    fn test_missing_event_path_is_an_error() {
        let forge = MockForge::new();
        let ctx = RunContext {
            event_name: Some("pull_request".to_string()),
            ..Default::default()
        };

        assert!(matches!(
            run(&ctx, &dictionary(), &forge),
            Err(BotError::MissingEventPath)
        ));
    }

    #[test]
    fn test_comment_failure_is_reported() {
        let file = event_file("opened");
        let forge = MockForge::with_diff(DIFF);
        forge.fail_comments(ForgeError::AuthFailed("bad token".to_string()));

        assert!(matches!(
            run(&context(&file), &dictionary(), &forge),
            Err(BotError::Comment(ForgeError::AuthFailed(_)))
        ));
    }
}
