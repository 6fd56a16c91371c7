//! A character cursor over a selector query.
//!
//! The query parser reads selectors a piece at a time: identifiers, balanced
//! `(...)` and `[...]` groups, and combinator characters. Sequence matching
//! is case-insensitive so `:NTH-CHILD(` and `:nth-child(` read the same.

use crate::error::SelectorParseError;

const ESC: char = '\\';

/// Cursor over the characters of a selector query.
#[derive(Debug, Clone)]
pub struct TokenQueue {
    chars: Vec<char>,
    pos: usize,
}

fn chars_eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

impl TokenQueue {
    /// Create a queue over `input`.
    #[must_use]
    pub fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    /// Whether everything has been consumed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pos >= self.chars.len()
    }

    /// The next character, without consuming it.
    #[must_use]
    pub fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    /// The unconsumed input, without consuming it.
    #[must_use]
    pub fn rest(&self) -> String {
        self.chars[self.pos.min(self.chars.len())..].iter().collect()
    }

    /// Consume and return the unconsumed input.
    pub fn remainder(&mut self) -> String {
        let rest = self.rest();
        self.pos = self.chars.len();
        rest
    }

    /// Whether the queue continues with `seq` (case-insensitive).
    #[must_use]
    pub fn matches(&self, seq: &str) -> bool {
        let mut index = self.pos;
        for expected in seq.chars() {
            match self.chars.get(index) {
                Some(&c) if chars_eq_ignore_case(c, expected) => index += 1,
                _ => return false,
            }
        }
        true
    }

    /// Whether the queue continues with any of `seqs`.
    #[must_use]
    pub fn matches_any(&self, seqs: &[&str]) -> bool {
        seqs.iter().any(|seq| self.matches(seq))
    }

    /// Whether the next character is one of `chars`.
    #[must_use]
    pub fn matches_any_char(&self, chars: &[char]) -> bool {
        self.peek().is_some_and(|c| chars.contains(&c))
    }

    /// If the queue continues with `seq`, consume it and return `true`.
    pub fn match_chomp(&mut self, seq: &str) -> bool {
        if self.matches(seq) {
            self.pos += seq.chars().count();
            true
        } else {
            false
        }
    }

    /// Whether the next character is whitespace.
    #[must_use]
    pub fn matches_whitespace(&self) -> bool {
        self.peek().is_some_and(char::is_whitespace)
    }

    /// Whether the next character is a letter or digit.
    #[must_use]
    pub fn matches_word(&self) -> bool {
        self.peek().is_some_and(char::is_alphanumeric)
    }

    /// Drop the next character.
    pub fn advance(&mut self) {
        if self.pos < self.chars.len() {
            self.pos += 1;
        }
    }

    /// Consume the next character.
    pub fn consume(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    /// Consume `seq`, which must be next in the queue.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorParseError::Expected`] if the queue does not
    /// continue with `seq`.
    pub fn consume_seq(&mut self, seq: &str) -> Result<(), SelectorParseError> {
        if self.match_chomp(seq) {
            Ok(())
        } else {
            Err(SelectorParseError::Expected {
                expected: seq.to_string(),
                remainder: self.rest(),
            })
        }
    }

    /// Consume up to (not including) the first occurrence of `seq`, or to the
    /// end of the queue.
    pub fn consume_to(&mut self, seq: &str) -> String {
        let start = self.pos;
        while !self.is_empty() && !self.matches(seq) {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    /// Consume up to the first point where any of `seqs` matches.
    pub fn consume_to_any(&mut self, seqs: &[&str]) -> String {
        let start = self.pos;
        while !self.is_empty() && !self.matches_any(seqs) {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    /// Consume up to `seq`, then drop `seq` itself.
    pub fn chomp_to(&mut self, seq: &str) -> String {
        let data = self.consume_to(seq);
        let _ = self.match_chomp(seq);
        data
    }

    /// Consume a balanced group that starts at the next character, returning
    /// the text between the outer `open` and `close` markers.
    ///
    /// Markers inside single or double quotes, or escaped with a backslash,
    /// do not count towards the nesting depth.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorParseError::Unbalanced`] if the queue does not start
    /// with `open` or the group is never closed.
    pub fn chomp_balanced(&mut self, open: char, close: char) -> Result<String, SelectorParseError> {
        let start = self.pos;
        if self.peek() != Some(open) {
            return Err(SelectorParseError::Unbalanced(self.rest()));
        }

        let mut depth = 0usize;
        let mut last: Option<char> = None;
        let mut in_single_quote = false;
        let mut in_double_quote = false;

        while let Some(c) = self.consume() {
            if last != Some(ESC) {
                if c == '\'' && c != open && !in_double_quote {
                    in_single_quote = !in_single_quote;
                } else if c == '"' && c != open && !in_single_quote {
                    in_double_quote = !in_double_quote;
                }
                if !(in_single_quote || in_double_quote) {
                    if c == open {
                        depth += 1;
                    } else if c == close {
                        depth -= 1;
                        if depth == 0 {
                            return Ok(self.chars[start + 1..self.pos - 1].iter().collect());
                        }
                    }
                }
            }
            // An escaped backslash does not escape what follows it.
            last = if c == ESC && last == Some(ESC) { None } else { Some(c) };
        }

        Err(SelectorParseError::Unbalanced(
            self.chars[start..].iter().collect(),
        ))
    }

    /// Remove backslash escapes: `\)` becomes `)`, `\\` becomes `\`.
    #[must_use]
    pub fn unescape(input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        let mut last: Option<char> = None;
        for c in input.chars() {
            if c == ESC {
                if last == Some(ESC) {
                    out.push(c);
                    last = None;
                    continue;
                }
            } else {
                out.push(c);
            }
            last = Some(c);
        }
        out
    }

    /// Consume any whitespace, returning whether there was some.
    pub fn consume_whitespace(&mut self) -> bool {
        let mut seen = false;
        while self.matches_whitespace() {
            self.pos += 1;
            seen = true;
        }
        seen
    }

    /// Consume a run of letters and digits.
    pub fn consume_word(&mut self) -> String {
        let start = self.pos;
        while self.matches_word() {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    /// Consume a tag name, which may carry a namespace as `ns|tag` or `*|tag`.
    pub fn consume_element_selector(&mut self) -> String {
        let start = self.pos;
        while self.matches_word() || self.matches_any_char(&['*', '|', '_', '-']) {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    /// Consume a CSS identifier: letters, digits, `-`, `_`, and any
    /// backslash-escaped character (which is kept without its backslash).
    pub fn consume_css_identifier(&mut self) -> String {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if c == ESC {
                match self.chars.get(self.pos + 1) {
                    Some(&escaped) => {
                        out.push(escaped);
                        self.pos += 2;
                    }
                    None => break,
                }
            } else if c.is_alphanumeric() || c == '-' || c == '_' {
                out.push(c);
                self.pos += 1;
            } else {
                break;
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_is_case_insensitive() {
        let mut tq = TokenQueue::new(":NTH-Child(2n)");
        assert!(tq.matches(":nth-child("));
        assert!(tq.match_chomp(":nth-child("));
        assert_eq!(tq.chomp_to(")"), "2n");
        assert!(tq.is_empty());
    }

    #[test]
    fn test_chomp_balanced_nests() {
        let mut tq = TokenQueue::new("(a(b)c) d");
        assert_eq!(tq.chomp_balanced('(', ')').unwrap(), "a(b)c");
        assert_eq!(tq.rest(), " d");
    }

    #[test]
    fn test_chomp_balanced_ignores_quoted_and_escaped_markers() {
        let mut tq = TokenQueue::new("[title=')'] x");
        assert_eq!(tq.chomp_balanced('[', ']').unwrap(), "title=')'");

        let mut tq = TokenQueue::new(r"(one \) two)");
        assert_eq!(tq.chomp_balanced('(', ')').unwrap(), r"one \) two");
    }

    #[test]
    fn test_chomp_balanced_unclosed() {
        let mut tq = TokenQueue::new("(abc");
        assert!(matches!(
            tq.chomp_balanced('(', ')'),
            Err(SelectorParseError::Unbalanced(rest)) if rest == "(abc"
        ));
    }

    #[test]
    fn test_unescape() {
        assert_eq!(TokenQueue::unescape(r"one \) two"), "one ) two");
        assert_eq!(TokenQueue::unescape(r"a\\b"), r"a\b");
    }

    #[test]
    fn test_identifiers() {
        let mut tq = TokenQueue::new(r"my-id_2\.x.next");
        assert_eq!(tq.consume_css_identifier(), "my-id_2.x");
        assert_eq!(tq.rest(), ".next");

        let mut tq = TokenQueue::new("svg|path > g");
        assert_eq!(tq.consume_element_selector(), "svg|path");
        assert!(tq.consume_whitespace());
        assert!(tq.matches_any_char(&['>', '+']));
    }

    #[test]
    fn test_consume_seq_reports_position() {
        let mut tq = TokenQueue::new(":has(p)");
        assert!(tq.consume_seq(":has").is_ok());
        assert!(matches!(
            tq.consume_seq(":not"),
            Err(SelectorParseError::Expected { remainder, .. }) if remainder == "(p)"
        ));
    }
}
