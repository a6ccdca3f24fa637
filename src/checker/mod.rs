pub mod dictionary;
pub mod suggestions;
pub mod tokenizer;

use crate::{AddedLine, Fix, FixReport, PatchedFiles};
use dictionary::MisspellingDictionary;
use tracing::debug;

/// Matches the words of added lines against a misspelling dictionary.
pub struct SpellChecker<'a> {
    dictionary: &'a MisspellingDictionary,
}

impl<'a> SpellChecker<'a> {
    pub fn new(dictionary: &'a MisspellingDictionary) -> Self {
        Self { dictionary }
    }

    /// Every known misspelling in the added lines, grouped by file in
    /// discovery order.
    pub fn check(&self, files: &PatchedFiles) -> FixReport {
        let mut report = FixReport::default();

        for added in files.lines() {
            for fix in self.check_line(added) {
                report.push(fix);
            }
        }

        debug!(
            files = report.file_count(),
            fixes = report.fix_count(),
            "spelling check finished"
        );
        report
    }

    pub fn check_line(&self, added: &AddedLine) -> Vec<Fix> {
        tokenizer::words(&added.text)
            .filter_map(|word| {
                let misspelling = self.dictionary.get(&word.to_lowercase())?;
                Some(Fix {
                    path: added.path.clone(),
                    line: added.line,
                    original: word.to_string(),
                    corrected: suggestions::suggest(word, misspelling),
                })
            })
            .collect()
    }
}
