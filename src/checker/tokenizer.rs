use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Alphabetic runs, allowing apostrophes inside a word (don't, it’s).
    static ref WORD: Regex = Regex::new(r"[A-Za-z]+(?:['’][A-Za-z]+)*").unwrap();
}

/// Words of a line, left to right.
pub fn words(text: &str) -> impl Iterator<Item = &str> {
    WORD.find_iter(text).map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alphabetic_runs() {
        let found: Vec<_> = words("let x2 = recieve(teh_value); // Thsi!").collect();
        assert_eq!(found, vec!["let", "x", "recieve", "teh", "value", "Thsi"]);
    }

    #[test]
    fn test_embedded_apostrophes() {
        let found: Vec<_> = words("doesnt don't 'quoted' it’s").collect();
        assert_eq!(found, vec!["doesnt", "don't", "quoted", "it’s"]);
    }

    #[test]
    fn test_no_words() {
        assert_eq!(words("1234 == {}").count(), 0);
    }
}
