use crate::Config;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

const EMBEDDED_LIST: &str = include_str!("../../data/dictionary.txt");
const EMBEDDED_ORIGIN: &str = "<embedded>";

#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("{origin}:{line}: expected `wrong->right`, found `{content}`")]
    Malformed {
        origin: String,
        line: usize,
        content: String,
    },

    #[error("failed to read dictionary {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// How a stored correction is cased when it is suggested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CasePolicy {
    /// Stored lowercase, re-cased to follow the misspelled word.
    PreserveCase,
    /// Carries its own capitalisation (proper nouns) and is used verbatim.
    Fixed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Misspelling {
    /// One candidate, or several joined by `", "`.
    pub correction: String,
    pub case: CasePolicy,
    pub reason: Option<String>,
}

/// Lowercase misspelling to correction, read-only once built.
#[derive(Debug, Clone, Default)]
pub struct MisspellingDictionary {
    entries: HashMap<String, Misspelling>,
}

impl MisspellingDictionary {
    /// Build the dictionary for a run: embedded list, extra list files in
    /// order, then the ignore words removed.
    pub fn load(config: &Config) -> Result<Self, DictionaryError> {
        let mut dictionary = Self::embedded()?;

        for path in &config.dictionaries {
            dictionary.extend(Self::load_from_path(path)?);
        }
        dictionary.ignore(config.ignore_words.as_slice());

        debug!(entries = dictionary.len(), "misspelling dictionary ready");
        Ok(dictionary)
    }

    /// The list shipped with the binary: codespell's default dictionary,
    /// overlaid with `data/dictionary.txt`.
    pub fn embedded() -> Result<Self, DictionaryError> {
        let mut dictionary = Self::codespell();
        dictionary.extend(Self::parse_list(EMBEDDED_LIST, EMBEDDED_ORIGIN)?);
        Ok(dictionary)
    }

    fn codespell() -> Self {
        let table = &codespell_dict::WORD_DICTIONARY;
        let entries = table
            .keys
            .iter()
            .zip(table.values.iter())
            .filter(|(_, candidates)| !candidates.is_empty())
            .map(|(wrong, candidates)| {
                let correction = candidates.join(", ");
                let case = case_policy(&correction);
                (
                    wrong.into_inner().to_lowercase(),
                    Misspelling {
                        correction,
                        case,
                        reason: None,
                    },
                )
            })
            .collect();

        Self { entries }
    }

    pub fn load_from_path(path: &Path) -> Result<Self, DictionaryError> {
        let content = fs::read_to_string(path).map_err(|source| DictionaryError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse_list(&content, &path.display().to_string())
    }

    pub fn parse(text: &str) -> Result<Self, DictionaryError> {
        Self::parse_list(text, "<input>")
    }

    fn parse_list(text: &str, origin: &str) -> Result<Self, DictionaryError> {
        let mut entries = HashMap::new();

        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let malformed = || DictionaryError::Malformed {
                origin: origin.to_string(),
                line: idx + 1,
                content: raw.to_string(),
            };

            let (wrong, right) = line.split_once("->").ok_or_else(malformed)?;
            let wrong = wrong.trim().to_lowercase();
            let (correction, reason) = split_reason(right.trim());
            if wrong.is_empty() || correction.is_empty() {
                return Err(malformed());
            }

            let case = case_policy(&correction);
            entries.insert(
                wrong,
                Misspelling {
                    correction,
                    case,
                    reason,
                },
            );
        }

        Ok(Self { entries })
    }

    /// Add or override entries with those of `other`.
    pub fn extend(&mut self, other: Self) {
        self.entries.extend(other.entries);
    }

    /// Drop entries for words that should never be reported.
    pub fn ignore<S: AsRef<str>>(&mut self, words: &[S]) {
        for word in words {
            self.entries.remove(&word.as_ref().trim().to_lowercase());
        }
    }

    /// Look up an already lowercased word.
    pub fn get(&self, word: &str) -> Option<&Misspelling> {
        self.entries.get(word)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn case_policy(correction: &str) -> CasePolicy {
    if correction.chars().any(char::is_uppercase) {
        CasePolicy::Fixed
    } else {
        CasePolicy::PreserveCase
    }
}

/// Split `right[, reason]` the way codespell lists encode it: a trailing
/// comma marks a candidate list, text after the last comma is a reason.
fn split_reason(right: &str) -> (String, Option<String>) {
    match right.rfind(',') {
        None => (right.to_string(), None),
        Some(idx) if idx == right.len() - 1 => (right[..idx].trim().to_string(), None),
        Some(idx) => {
            let reason = right[idx + 1..].trim();
            (right[..idx].trim().to_string(), Some(reason.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_simple_and_candidates() {
        let dict = MisspellingDictionary::parse(
            "# comment\n\nThsi->this\nabotu->about, abbot,\nclas->class, name clash\n",
        )
        .unwrap();

        assert_eq!(dict.len(), 3);
        assert_eq!(dict.get("thsi").unwrap().correction, "this");
        assert_eq!(dict.get("abotu").unwrap().correction, "about, abbot");
        assert_eq!(dict.get("abotu").unwrap().reason, None);

        let clas = dict.get("clas").unwrap();
        assert_eq!(clas.correction, "class");
        assert_eq!(clas.reason.as_deref(), Some("name clash"));
        assert_eq!(clas.case, CasePolicy::PreserveCase);
    }

    #[test]
    fn test_capitalised_correction_is_fixed() {
        let dict = MisspellingDictionary::parse("pyhton->Python\n").unwrap();
        assert_eq!(dict.get("pyhton").unwrap().case, CasePolicy::Fixed);
    }

    #[test]
    fn test_malformed_line_reports_position() {
        let err = MisspellingDictionary::parse("teh->the\nbroken line\n").unwrap_err();
        match err {
            DictionaryError::Malformed { line, content, .. } => {
                assert_eq!(line, 2);
                assert_eq!(content, "broken line");
            }
            other => panic!("unexpected error: {other}"),
        }

        assert!(MisspellingDictionary::parse("->the\n").is_err());
        assert!(MisspellingDictionary::parse("teh->\n").is_err());
    }

    #[test]
    fn test_embedded_list_parses() {
        let dict = MisspellingDictionary::embedded().unwrap();
        assert!(dict.len() > 100);
        assert_eq!(dict.get("recieve").unwrap().correction, "receive");
        assert_eq!(dict.get("thsi").unwrap().correction, "this");
    }

    #[test]
    fn test_embedded_list_covers_common_typos() {
        let dict = MisspellingDictionary::embedded().unwrap();
        assert!(dict.len() > 10_000);

        for (wrong, right) in [
            ("thier", "their"),
            ("existant", "existent"),
            ("accomodating", "accommodating"),
            ("acheiving", "achieving"),
            ("wnat", "want"),
            ("writen", "written"),
            ("overriden", "overridden"),
        ] {
            let entry = dict.get(wrong).unwrap_or_else(|| panic!("{wrong} missing"));
            assert!(
                entry.correction.contains(right),
                "{wrong} => {}",
                entry.correction
            );
        }
    }

    #[test]
    fn test_load_applies_extra_lists_and_ignore_words() {
        let mut extra = NamedTempFile::new().unwrap();
        writeln!(extra, "teh->tea").unwrap();
        writeln!(extra, "spellbto->spellbot").unwrap();

        let config = Config {
            dictionaries: vec![extra.path().to_path_buf()],
            ignore_words: vec!["Recieve".to_string()],
            ..Default::default()
        };

        let dict = MisspellingDictionary::load(&config).unwrap();
        assert_eq!(dict.get("teh").unwrap().correction, "tea");
        assert_eq!(dict.get("spellbto").unwrap().correction, "spellbot");
        assert!(dict.get("recieve").is_none());
    }

    #[test]
    fn test_missing_list_file() {
        let err = MisspellingDictionary::load_from_path(Path::new("/nonexistent/list.txt"));
        assert!(matches!(err, Err(DictionaryError::Io { .. })));
    }
}
