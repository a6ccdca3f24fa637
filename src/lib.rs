pub mod bot;
pub mod checker;
pub mod cli;
pub mod config;
pub mod event;
pub mod forge;
pub mod parser;
pub mod telemetry;

pub use checker::dictionary::MisspellingDictionary;
pub use checker::SpellChecker;
pub use config::Config;
pub use parser::{parse_patched_files, PatchedFiles};

/// A line added by the patch, numbered in the post-patch file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddedLine {
    pub path: String,
    pub line: u32,
    pub text: String,
}

/// A misspelled word found in an added line and its suggested replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fix {
    pub path: String,
    pub line: u32,
    pub original: String,
    pub corrected: String,
}

/// Fixes grouped by file, in the order they were discovered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixReport {
    files: Vec<(String, Vec<Fix>)>,
}

impl FixReport {
    pub fn push(&mut self, fix: Fix) {
        match self.files.iter_mut().find(|(path, _)| *path == fix.path) {
            Some((_, fixes)) => fixes.push(fix),
            None => self.files.push((fix.path.clone(), vec![fix])),
        }
    }

    pub fn files(&self) -> impl Iterator<Item = (&str, &[Fix])> {
        self.files
            .iter()
            .map(|(path, fixes)| (path.as_str(), fixes.as_slice()))
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn fix_count(&self) -> usize {
        self.files.iter().map(|(_, fixes)| fixes.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
