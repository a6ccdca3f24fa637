use crate::parser::PatchedFiles;
use crate::AddedLine;
use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

lazy_static! {
    static ref HUNK_HEADER: Regex =
        Regex::new(r"^@@ -(\d+)(?:,(\d+))? \+(\d+)(?:,(\d+))? @@").unwrap();
}

const DEV_NULL: &str = "/dev/null";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiffParseError {
    #[error("line {line}: malformed hunk header: {content}")]
    MalformedHunkHeader { line: usize, content: String },

    #[error("line {line}: hunk found outside of a file patch")]
    HunkOutsidePatch { line: usize },

    #[error("line {line}: target file header without a source file header")]
    TargetWithoutSource { line: usize },

    #[error("line {line}: unexpected line inside hunk: {content}")]
    UnexpectedHunkLine { line: usize, content: String },

    #[error("line {line}: hunk contents do not match its header")]
    HunkMismatch { line: usize },

    #[error("line {line}: hunk is shorter than its header declares")]
    TruncatedHunk { line: usize },
}

/// Remaining line budget of the hunk being read.
#[derive(Debug)]
struct Hunk {
    source_left: u32,
    target_left: u32,
    target_line: u32,
}

impl Hunk {
    fn is_done(&self) -> bool {
        self.source_left == 0 && self.target_left == 0
    }
}

/// Extract every added line of a unified diff, keyed by the patched path.
///
/// Line numbers refer to the target (post-patch) file. Any structural problem
/// fails the whole parse; no partial result is returned.
pub fn parse_patched_files(diff: &str) -> Result<PatchedFiles, DiffParseError> {
    let mut files = PatchedFiles::default();
    let mut source: Option<String> = None;
    let mut current: Option<String> = None;
    let mut hunk: Option<Hunk> = None;
    let mut last_line = 0;

    for (idx, raw) in diff.lines().enumerate() {
        let line = idx + 1;
        last_line = line;

        if let Some(state) = hunk.as_mut() {
            let path = current.as_deref().unwrap_or_default();
            read_hunk_line(state, path, raw, line, &mut files)?;
            if state.is_done() {
                hunk = None;
            }
            continue;
        }

        if raw.starts_with("diff ") {
            source = None;
            current = None;
        } else if let Some(rest) = raw.strip_prefix("--- ") {
            source = Some(header_path(rest));
            current = None;
        } else if let Some(rest) = raw.strip_prefix("+++ ") {
            let source = source
                .take()
                .ok_or(DiffParseError::TargetWithoutSource { line })?;
            current = Some(patch_path(&source, &header_path(rest)));
        } else if raw.starts_with("@@") {
            if current.is_none() {
                return Err(DiffParseError::HunkOutsidePatch { line });
            }
            let state = parse_hunk_header(raw, line)?;
            if !state.is_done() {
                hunk = Some(state);
            }
        }
        // Everything else between hunks (index, mode, rename, binary notices,
        // "\ No newline at end of file") carries no added lines.
    }

    if hunk.is_some() {
        return Err(DiffParseError::TruncatedHunk { line: last_line });
    }

    Ok(files)
}

fn read_hunk_line(
    state: &mut Hunk,
    path: &str,
    raw: &str,
    line: usize,
    files: &mut PatchedFiles,
) -> Result<(), DiffParseError> {
    let mismatch = || DiffParseError::HunkMismatch { line };

    match raw.chars().next() {
        // Some tools strip the single space off blank context lines.
        None | Some(' ') => {
            state.source_left = state.source_left.checked_sub(1).ok_or_else(mismatch)?;
            state.target_left = state.target_left.checked_sub(1).ok_or_else(mismatch)?;
            state.target_line = state.target_line.checked_add(1).ok_or_else(mismatch)?;
        }
        Some('+') => {
            state.target_left = state.target_left.checked_sub(1).ok_or_else(mismatch)?;
            files.push(AddedLine {
                path: path.to_string(),
                line: state.target_line,
                text: raw[1..].to_string(),
            });
            state.target_line = state.target_line.checked_add(1).ok_or_else(mismatch)?;
        }
        Some('-') => {
            state.source_left = state.source_left.checked_sub(1).ok_or_else(mismatch)?;
        }
        Some('\\') => {}
        _ if raw.starts_with("diff ") || raw.starts_with("@@") => {
            return Err(DiffParseError::TruncatedHunk { line });
        }
        _ => {
            return Err(DiffParseError::UnexpectedHunkLine {
                line,
                content: raw.to_string(),
            });
        }
    }

    Ok(())
}

fn parse_hunk_header(raw: &str, line: usize) -> Result<Hunk, DiffParseError> {
    let malformed = || DiffParseError::MalformedHunkHeader {
        line,
        content: raw.to_string(),
    };
    let caps = HUNK_HEADER.captures(raw).ok_or_else(malformed)?;

    let number = |group: usize| -> Result<u32, DiffParseError> {
        match caps.get(group) {
            Some(m) => m.as_str().parse().map_err(|_| malformed()),
            None => Ok(1),
        }
    };

    let hunk = Hunk {
        source_left: number(2)?,
        target_line: number(3)?,
        target_left: number(4)?,
    };
    // Target lines are numbered from 1; start 0 only marks an empty range.
    if hunk.target_line == 0 && hunk.target_left != 0 {
        return Err(malformed());
    }

    Ok(hunk)
}

/// Path token of a `---`/`+++` header, without timestamp or quoting.
fn header_path(rest: &str) -> String {
    let path = rest.split('\t').next().unwrap_or(rest).trim_end();
    path.trim_matches('"').to_string()
}

fn patch_path(source: &str, target: &str) -> String {
    if target == DEV_NULL {
        source.strip_prefix("a/").unwrap_or(source).to_string()
    } else {
        target.strip_prefix("b/").unwrap_or(target).to_string()
    }
}
