//! Best-effort contact field extraction. Never fails; absent fields are `None`.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("valid regex")
});
static PHONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\+?\d{1,3}[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}").expect("valid regex")
});

/// Lines mentioning these are headings or labels, not names.
const NAME_STOPWORDS: [&str; 4] = ["resume", "cv", "email", "phone"];
const MAX_NAME_WORDS: usize = 4;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedFields {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

pub fn parse_fields(text: &str) -> ParsedFields {
    ParsedFields {
        name: guess_name(text),
        email: EMAIL.find(text).map(|m| m.as_str().to_string()),
        phone: PHONE.find(text).map(|m| m.as_str().trim().to_string()),
    }
}

/// First line with at most four words, no digits, no `@`, and none of the
/// stopwords.
fn guess_name(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .find(|line| {
            if line.is_empty() || line.split_whitespace().count() > MAX_NAME_WORDS {
                return false;
            }
            if line.chars().any(char::is_numeric) || line.contains('@') {
                return false;
            }
            let lower = line.to_lowercase();
            !NAME_STOPWORDS.iter().any(|word| lower.contains(word))
        })
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digits(s: &str) -> String {
        s.chars().filter(char::is_ascii_digit).collect()
    }

    #[test]
    fn test_extracts_name_email_and_phone() {
        let fields = parse_fields("John Smith\njohn@x.com\n555-123-4567");
        assert_eq!(fields.name.as_deref(), Some("John Smith"));
        assert_eq!(fields.email.as_deref(), Some("john@x.com"));
        assert_eq!(digits(fields.phone.as_deref().unwrap()), "5551234567");
    }

    #[test]
    fn test_phone_formats() {
        for (input, expected) in [
            ("Call (555) 123-4567 today", "5551234567"),
            ("Tel: +1 555.123.4567", "15551234567"),
            ("mobile 5551234567", "5551234567"),
        ] {
            let phone = parse_fields(input).phone.unwrap();
            assert_eq!(digits(&phone), expected, "input: {input}");
        }
    }

    #[test]
    fn test_name_skips_headings_and_long_lines() {
        let text = "\n  RESUME  \nCurriculum vitae of a very experienced person\nMaria Garcia\n";
        assert_eq!(parse_fields(text).name.as_deref(), Some("Maria Garcia"));
    }

    #[test]
    fn test_name_skips_lines_with_digits_or_at() {
        let text = "2024 Portfolio\nmaria@garcia.dev\nMaria Garcia";
        assert_eq!(parse_fields(text).name.as_deref(), Some("Maria Garcia"));
    }

    #[test]
    fn test_name_skips_lines_with_non_ascii_digits() {
        let text = "٢٠٢٤ Portfolio\nMaria Garcia";
        assert_eq!(parse_fields(text).name.as_deref(), Some("Maria Garcia"));
        let text = "Year Ⅷ\nAda Lovelace";
        assert_eq!(parse_fields(text).name.as_deref(), Some("Ada Lovelace"));
    }

    #[test]
    fn test_stopwords_match_case_insensitively_inside_words() {
        // "cv" inside "CVS Pharmacy" still disqualifies the line
        let text = "CVS Pharmacy\nAda Lovelace";
        assert_eq!(parse_fields(text).name.as_deref(), Some("Ada Lovelace"));
    }

    #[test]
    fn test_nothing_found_is_all_none() {
        let fields = parse_fields("12345 67890\nemail me\n");
        assert_eq!(fields, ParsedFields::default());
    }
}
