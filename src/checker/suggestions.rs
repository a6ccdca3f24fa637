use crate::checker::dictionary::{CasePolicy, Misspelling};

/// Suggested replacement for `word`, cased to follow it.
///
/// A capitalised word gets every candidate capitalised, an all-caps word gets
/// the correction upper-cased, anything else keeps the stored lowercase form.
/// Corrections with a fixed case are returned as stored.
pub fn suggest(word: &str, misspelling: &Misspelling) -> String {
    match misspelling.case {
        CasePolicy::Fixed => misspelling.correction.clone(),
        CasePolicy::PreserveCase => restore_case(word, &misspelling.correction),
    }
}

pub fn restore_case(word: &str, correction: &str) -> String {
    if word == capitalize(word) {
        correction
            .split(',')
            .map(|candidate| capitalize(candidate.trim()))
            .collect::<Vec<_>>()
            .join(", ")
    } else if word == word.to_uppercase() {
        correction.to_uppercase()
    } else {
        correction.to_string()
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
