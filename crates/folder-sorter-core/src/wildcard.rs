//! Glob-style wildcard patterns (`*`, `?`) compiled to anchored,
//! case-insensitive regular expressions.

use regex::{Regex, RegexBuilder};
use tracing::warn;

#[derive(Debug, Clone)]
pub struct Wildcard {
    /// `None` when the pattern exceeded the regex size limit; matches nothing.
    regex: Option<Regex>,
}

impl Wildcard {
    /// Compile `pattern`. `*` matches any run of characters (including none),
    /// `?` matches exactly one character and everything else is literal.
    pub fn new(pattern: &str) -> Self {
        let mut source = String::with_capacity(pattern.len() + 8);
        source.push('^');
        let mut buf = [0u8; 4];
        for c in pattern.chars() {
            match c {
                '*' => source.push_str(".*"),
                '?' => source.push('.'),
                _ => source.push_str(&regex::escape(c.encode_utf8(&mut buf))),
            }
        }
        source.push('$');

        let regex = match RegexBuilder::new(&source)
            .case_insensitive(true)
            .dot_matches_new_line(true)
            .build() {
            Ok(regex) => Some(regex),
            Err(err) => {
                warn!("Wildcard pattern rejected, it will match nothing: {}", err);
                None
            }
        };
        Self { regex }
    }

    /// Pattern wrapped as `*pattern*`.
    pub fn containing(pattern: &str) -> Self {
        Self::new(&format!("*{pattern}*"))
    }

    /// Pattern wrapped as `pattern*`.
    pub fn prefix(pattern: &str) -> Self {
        Self::new(&format!("{pattern}*"))
    }

    /// Pattern wrapped as `*pattern`.
    pub fn suffix(pattern: &str) -> Self {
        Self::new(&format!("*{pattern}"))
    }

    /// True when the whole of `subject` matches.
    pub fn is_match(&self, subject: &str) -> bool {
        self.regex
            .as_ref()
            .is_some_and(|regex| regex.is_match(subject))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_is_full_match() {
        let w = Wildcard::new("report");
        assert!(w.is_match("report"));
        assert!(w.is_match("REPORT"));
        assert!(!w.is_match("report1"));
        assert!(!w.is_match("my report"));
    }

    #[test]
    fn test_star_and_question_mark() {
        let w = Wildcard::new("img_??.*");
        assert!(w.is_match("IMG_01.jpg"));
        assert!(w.is_match("img_ab."));
        assert!(!w.is_match("img_1.jpg"));

        assert!(Wildcard::new("*").is_match(""));
        assert!(Wildcard::new("*.txt").is_match("report.TXT"));

        // Names may contain line breaks; `*` and `?` still span them.
        assert!(Wildcard::containing("break").is_match("line\nbreak"));
        assert!(Wildcard::new("a?b").is_match("a\nb"));
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        let w = Wildcard::new("a.b(1)[x]+$^{2}|c\\d");
        assert!(w.is_match("a.b(1)[x]+$^{2}|c\\d"));
        assert!(!w.is_match("axb(1)[x]+$^{2}|c\\d"));
        assert!(Wildcard::new("1+1").is_match("1+1"));
        assert!(!Wildcard::new("1+1").is_match("11"));
    }

    #[test]
    fn test_wrapped_forms() {
        assert!(Wildcard::containing("port").is_match("Report"));
        assert!(!Wildcard::containing("xyz").is_match("Report"));
        assert!(Wildcard::prefix("re").is_match("Report"));
        assert!(!Wildcard::prefix("port").is_match("Report"));
        assert!(Wildcard::suffix("PORT").is_match("report"));
        assert!(!Wildcard::suffix("rep").is_match("report"));
    }

    #[test]
    fn test_empty_pattern() {
        assert!(Wildcard::new("").is_match(""));
        assert!(!Wildcard::new("").is_match("a"));
        assert!(Wildcard::containing("").is_match("anything"));
    }
}
