//! Buffered character cursor used by the tokenizer.
//!
//! [§ 13.2.3.5 Preprocessing the input stream](https://html.spec.whatwg.org/multipage/parsing.html#preprocessing-the-input-stream)
//!
//! "The input stream consists of the characters pushed into it as the input
//! byte stream is decoded or from the various APIs that directly manipulate
//! the input stream."
//!
//! The whole input is held in memory, but every scan works inside a fixed
//! window of [`BUFFER_SIZE`] characters. The window slides forward once the
//! cursor passes its read-ahead limit, keeping any marked region (and the
//! character before the cursor) inside it.

use std::fmt;

/// Returned by [`CharacterReader::current`] past the end of input.
pub const EOF: char = '\u{FFFF}';

/// Size of the scan window.
pub const BUFFER_SIZE: usize = 32 * 1024;

/// Once the cursor passes this point the window slides forward.
const READ_AHEAD_LIMIT: usize = BUFFER_SIZE * 3 / 4;

/// Strings longer than this are never interned.
const MAX_STRING_CACHE_LEN: usize = 12;

/// Number of intern slots. Must be a power of two.
const STRING_CACHE_SIZE: usize = 512;

/// A markable cursor over the input characters.
pub struct CharacterReader {
    input: Vec<char>,
    /// Absolute offset of the window's first character.
    buf_offset: usize,
    /// Characters in the window.
    buf_length: usize,
    /// Cursor, relative to the window.
    buf_pos: usize,
    /// The window slides when `buf_pos` reaches this.
    buf_split_point: usize,
    /// Mark, relative to the window.
    buf_mark: Option<usize>,
    string_cache: Vec<Option<String>>,
}

impl CharacterReader {
    /// A reader positioned at the first character of `input`.
    #[must_use]
    pub fn new(input: &str) -> Self {
        let input: Vec<char> = input.chars().collect();
        let mut reader = Self {
            input,
            buf_offset: 0,
            buf_length: 0,
            buf_pos: 0,
            buf_split_point: 0,
            buf_mark: None,
            string_cache: vec![None; STRING_CACHE_SIZE],
        };
        reader.fill_window();
        reader
    }

    fn fill_window(&mut self) {
        self.buf_length = BUFFER_SIZE.min(self.input.len() - self.buf_offset);
        self.buf_split_point = self.buf_length.min(READ_AHEAD_LIMIT);
    }

    /// Slide the window forward once the cursor is past the split point.
    fn buffer_up(&mut self) {
        if self.buf_pos < self.buf_split_point
            || self.buf_offset + self.buf_length == self.input.len()
        {
            return;
        }
        // Keep the marked region, and one character behind the cursor so
        // `unconsume` still works after a slide.
        let keep_from = self.buf_mark.unwrap_or(self.buf_pos).saturating_sub(1);
        self.buf_offset += keep_from;
        self.buf_pos -= keep_from;
        self.buf_mark = self.buf_mark.map(|mark| mark - keep_from);
        self.fill_window();
    }

    #[inline]
    fn char_at(&self, relative: usize) -> char {
        self.input[self.buf_offset + relative]
    }

    /// Absolute position of the cursor in the input.
    #[must_use]
    pub const fn pos(&self) -> usize {
        self.buf_offset + self.buf_pos
    }

    /// True once every character has been consumed.
    pub fn is_empty(&mut self) -> bool {
        self.buffer_up();
        self.buf_pos >= self.buf_length
    }

    /// The character at the cursor, or [`EOF`].
    pub fn current(&mut self) -> char {
        self.buffer_up();
        if self.buf_pos >= self.buf_length {
            EOF
        } else {
            self.char_at(self.buf_pos)
        }
    }

    /// Return the current character and advance past it.
    pub fn consume(&mut self) -> char {
        self.buffer_up();
        let c = if self.buf_pos >= self.buf_length {
            EOF
        } else {
            self.char_at(self.buf_pos)
        };
        self.buf_pos += 1;
        c
    }

    /// Step back one character.
    ///
    /// # Panics
    ///
    /// Panics when nothing has been consumed yet.
    pub fn unconsume(&mut self) {
        assert!(self.buf_pos >= 1, "no character to unconsume at position 0");
        self.buf_pos -= 1;
    }

    /// Skip the current character.
    pub fn advance(&mut self) {
        self.buf_pos += 1;
    }

    /// Remember the cursor position for [`CharacterReader::rewind_to_mark`].
    pub fn mark(&mut self) {
        self.buffer_up();
        self.buf_mark = Some(self.buf_pos);
    }

    /// Forget the mark.
    pub fn unmark(&mut self) {
        self.buf_mark = None;
    }

    /// Move the cursor back to the mark and clear it.
    ///
    /// # Panics
    ///
    /// Panics if there is no mark.
    pub fn rewind_to_mark(&mut self) {
        let mark = self
            .buf_mark
            .take()
            .unwrap_or_else(|| panic!("rewind_to_mark called without a mark"));
        self.buf_pos = mark;
    }

    /// Relative index of the next `c` in the window, if any.
    fn next_index_of(&self, c: char) -> Option<usize> {
        (self.buf_pos..self.buf_length).find(|&i| self.char_at(i) == c)
    }

    /// Relative index of the next occurrence of `seq` in the window, if any.
    fn next_index_of_str(&self, seq: &[char]) -> Option<usize> {
        let first = *seq.first()?;
        let mut offset = self.buf_pos;
        while offset < self.buf_length {
            if self.char_at(offset) != first {
                offset += 1;
                continue;
            }
            let end = offset + seq.len();
            if end <= self.buf_length
                && seq
                    .iter()
                    .enumerate()
                    .all(|(j, &c)| self.char_at(offset + j) == c)
            {
                return Some(offset);
            }
            offset += 1;
        }
        None
    }

    /// Consume until `c` (not included) or the end of input.
    pub fn consume_to(&mut self, c: char) -> String {
        let mut out = String::new();
        loop {
            self.buffer_up();
            match self.next_index_of(c) {
                Some(index) => {
                    self.push_range(&mut out, index);
                    return out;
                }
                None => {
                    self.push_range(&mut out, self.buf_length);
                    if self.is_empty() {
                        return out;
                    }
                }
            }
        }
    }

    /// Consume until the sequence `seq` (not included) or the end of input.
    pub fn consume_to_str(&mut self, seq: &str) -> String {
        let seq: Vec<char> = seq.chars().collect();
        let mut out = String::new();
        loop {
            self.buffer_up();
            if let Some(index) = self.next_index_of_str(&seq) {
                self.push_range(&mut out, index);
                return out;
            }
            if self.buf_offset + self.buf_length == self.input.len() {
                self.push_range(&mut out, self.buf_length);
                return out;
            }
            // Leave enough behind that a match straddling the window edge is
            // found after the slide.
            let safe_end = self
                .buf_length
                .saturating_sub(seq.len())
                .max(self.buf_pos);
            self.push_range(&mut out, safe_end);
            self.buf_split_point = self.buf_split_point.min(self.buf_pos);
        }
    }

    /// Copy window characters from the cursor up to `end` into `out` and move
    /// the cursor there.
    fn push_range(&mut self, out: &mut String, end: usize) {
        let start = self.buf_offset + self.buf_pos;
        out.extend(&self.input[start..self.buf_offset + end]);
        self.buf_pos = end;
    }

    /// Consume until any character of `set` (not included) or the end of the
    /// window.
    pub fn consume_to_any(&mut self, set: &[char]) -> String {
        self.consume_while(|c| !set.contains(&c))
    }

    /// Consume the rest of the input.
    pub fn consume_to_end(&mut self) -> String {
        let start = self.pos().min(self.input.len());
        let rest: String = self.input[start..].iter().collect();
        self.buf_offset = self.input.len();
        self.buf_pos = 0;
        self.buf_mark = None;
        self.fill_window();
        rest
    }

    /// Consume while `keep` holds, stopping at the end of the window.
    fn consume_while(&mut self, keep: impl Fn(char) -> bool) -> String {
        self.buffer_up();
        let start = self.buf_pos;
        while self.buf_pos < self.buf_length && keep(self.char_at(self.buf_pos)) {
            self.buf_pos += 1;
        }
        self.cache_string(start, self.buf_pos - start)
    }

    /// Scanner for the data state: stops at `&`, `<` or NUL.
    pub fn consume_data(&mut self) -> String {
        self.consume_while(|c| !matches!(c, '&' | '<' | '\0'))
    }

    /// Scanner for RAWTEXT and script data: stops at `<` or NUL.
    pub fn consume_raw_data(&mut self) -> String {
        self.consume_while(|c| !matches!(c, '<' | '\0'))
    }

    /// Scanner for quoted attribute values: stops at the closing quote, `&` or
    /// NUL.
    pub fn consume_attribute_quoted(&mut self, single: bool) -> String {
        let quote = if single { '\'' } else { '"' };
        self.consume_while(|c| c != quote && c != '&' && c != '\0')
    }

    /// Scanner for tag names: stops at whitespace, `/`, `>`, `<` or NUL.
    pub fn consume_tag_name(&mut self) -> String {
        self.consume_while(|c| {
            !matches!(
                c,
                '\t' | '\n' | '\r' | '\u{000C}' | ' ' | '/' | '>' | '<' | '\0'
            )
        })
    }

    /// A run of letters.
    pub fn consume_letter_sequence(&mut self) -> String {
        self.consume_while(char::is_alphabetic)
    }

    /// A run of letters followed by a run of ASCII digits.
    pub fn consume_letter_then_digit_sequence(&mut self) -> String {
        self.buffer_up();
        let start = self.buf_pos;
        while self.buf_pos < self.buf_length && self.char_at(self.buf_pos).is_alphabetic() {
            self.buf_pos += 1;
        }
        while self.buf_pos < self.buf_length && self.char_at(self.buf_pos).is_ascii_digit() {
            self.buf_pos += 1;
        }
        self.cache_string(start, self.buf_pos - start)
    }

    /// A run of ASCII hex digits.
    pub fn consume_hex_sequence(&mut self) -> String {
        self.consume_while(|c| c.is_ascii_hexdigit())
    }

    /// A run of ASCII digits.
    pub fn consume_digit_sequence(&mut self) -> String {
        self.consume_while(|c| c.is_ascii_digit())
    }

    /// Whether the current character is `c`.
    pub fn matches(&mut self, c: char) -> bool {
        !self.is_empty() && self.char_at(self.buf_pos) == c
    }

    /// Whether the input continues with `seq` (case-sensitive).
    pub fn matches_str(&mut self, seq: &str) -> bool {
        self.matches_with(seq, |a, b| a == b)
    }

    /// Whether the input continues with `seq`, ignoring case.
    pub fn matches_ignore_case(&mut self, seq: &str) -> bool {
        self.matches_with(seq, |a, b| {
            a == b || a.to_uppercase().eq(b.to_uppercase())
        })
    }

    fn matches_with(&mut self, seq: &str, eq: impl Fn(char, char) -> bool) -> bool {
        self.buffer_up();
        let mut offset = self.buf_pos;
        for expected in seq.chars() {
            if offset >= self.buf_length || !eq(self.char_at(offset), expected) {
                return false;
            }
            offset += 1;
        }
        true
    }

    /// Whether the current character is any of `set`.
    pub fn matches_any(&mut self, set: &[char]) -> bool {
        !self.is_empty() && set.contains(&self.char_at(self.buf_pos))
    }

    /// Whether the current character is a letter.
    pub fn matches_letter(&mut self) -> bool {
        !self.is_empty() && self.char_at(self.buf_pos).is_alphabetic()
    }

    /// Whether the current character is an ASCII digit.
    pub fn matches_digit(&mut self) -> bool {
        !self.is_empty() && self.char_at(self.buf_pos).is_ascii_digit()
    }

    /// Consume `seq` if the input continues with it.
    pub fn match_consume(&mut self, seq: &str) -> bool {
        if self.matches_str(seq) {
            self.buf_pos += seq.chars().count();
            true
        } else {
            false
        }
    }

    /// Consume `seq`, ignoring case, if the input continues with it.
    pub fn match_consume_ignore_case(&mut self, seq: &str) -> bool {
        if self.matches_ignore_case(seq) {
            self.buf_pos += seq.chars().count();
            true
        } else {
            false
        }
    }

    /// Whether `seq` occurs anywhere ahead of the cursor in its all-lower or
    /// all-upper form.
    pub fn contains_ignore_case(&mut self, seq: &str) -> bool {
        let lower: Vec<char> = seq.to_lowercase().chars().collect();
        let upper: Vec<char> = seq.to_uppercase().chars().collect();
        let rest = &self.input[self.pos().min(self.input.len())..];
        rest.windows(lower.len().max(1))
            .any(|w| w == lower.as_slice() || w == upper.as_slice())
    }

    /// Build the string for `count` window characters from `start`, reusing a
    /// cached copy for short strings seen before.
    fn cache_string(&mut self, start: usize, count: usize) -> String {
        let begin = self.buf_offset + start;
        let chars = &self.input[begin..begin + count];
        if count > MAX_STRING_CACHE_LEN {
            return chars.iter().collect();
        }
        if count == 0 {
            return String::new();
        }

        let hash = chars
            .iter()
            .fold(0u32, |h, &c| h.wrapping_mul(31).wrapping_add(c as u32));
        let slot = hash as usize & (STRING_CACHE_SIZE - 1);

        if let Some(cached) = &self.string_cache[slot]
            && cached.chars().count() == count
            && cached.chars().zip(chars).all(|(a, &b)| a == b)
        {
            return cached.clone();
        }
        let built: String = chars.iter().collect();
        self.string_cache[slot] = Some(built.clone());
        built
    }
}

impl fmt::Debug for CharacterReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CharacterReader")
            .field("pos", &self.pos())
            .field("len", &self.input.len())
            .field("mark", &self.buf_mark.map(|m| self.buf_offset + m))
            .finish_non_exhaustive()
    }
}

impl fmt::Display for CharacterReader {
    /// The unread remainder of the window.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let start = (self.buf_offset + self.buf_pos).min(self.input.len());
        let end = (self.buf_offset + self.buf_length).max(start);
        self.input[start..end].iter().try_for_each(|c| write!(f, "{c}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consume_and_unconsume() {
        let mut r = CharacterReader::new("one");
        assert_eq!(r.pos(), 0);
        assert_eq!(r.consume(), 'o');
        assert_eq!(r.current(), 'n');
        r.unconsume();
        assert_eq!(r.current(), 'o');
        r.advance();
        r.advance();
        r.advance();
        assert!(r.is_empty());
        assert_eq!(r.current(), EOF);
        assert_eq!(r.consume(), EOF);
    }

    #[test]
    #[should_panic(expected = "unconsume")]
    fn test_unconsume_at_start_panics() {
        let mut r = CharacterReader::new("one");
        r.unconsume();
    }

    #[test]
    #[should_panic(expected = "without a mark")]
    fn test_rewind_without_mark_panics() {
        let mut r = CharacterReader::new("one");
        r.rewind_to_mark();
    }

    #[test]
    fn test_mark_and_rewind() {
        let mut r = CharacterReader::new("one two");
        r.advance();
        r.mark();
        assert_eq!(r.consume_letter_sequence(), "ne");
        r.rewind_to_mark();
        assert_eq!(r.current(), 'n');
    }

    #[test]
    fn test_consume_to() {
        let mut r = CharacterReader::new("hello");
        assert_eq!(r.consume_to('l'), "he");
        assert_eq!(r.current(), 'l');
        assert_eq!(r.consume_to('x'), "llo");
        assert!(r.is_empty());
    }

    #[test]
    fn test_consume_to_str() {
        let mut r = CharacterReader::new("<!-- a -- b -->x");
        assert_eq!(r.consume_to_str("-->"), "<!-- a -- b ");
        assert!(r.match_consume("-->"));
        assert_eq!(r.consume_to_end(), "x");
    }

    #[test]
    fn test_consume_to_any() {
        let mut r = CharacterReader::new("one &two<three");
        assert_eq!(r.consume_to_any(&['&', '<']), "one ");
        assert!(r.matches('&'));
        assert_eq!(r.consume(), '&');
        assert_eq!(r.consume_to_any(&['&', '<']), "two");
    }

    #[test]
    fn test_sequences() {
        let mut r = CharacterReader::new("amp12;x3fZ");
        assert_eq!(r.consume_letter_then_digit_sequence(), "amp12");
        assert!(r.match_consume(";"));
        assert_eq!(r.consume_hex_sequence(), "");
        r.advance();
        assert_eq!(r.consume_digit_sequence(), "3");
        assert_eq!(r.consume_hex_sequence(), "f");
        assert_eq!(r.consume_letter_sequence(), "Z");
    }

    #[test]
    fn test_consume_tag_name() {
        let mut r = CharacterReader::new("div class");
        assert_eq!(r.consume_tag_name(), "div");
        let mut r = CharacterReader::new("br/>");
        assert_eq!(r.consume_tag_name(), "br");
        assert!(r.matches('/'));
    }

    #[test]
    fn test_matches() {
        let mut r = CharacterReader::new("DocType html");
        assert!(r.matches_str("DocType"));
        assert!(!r.matches_str("DOCTYPE"));
        assert!(r.matches_ignore_case("DOCTYPE"));
        assert!(r.match_consume_ignore_case("doctype"));
        assert!(r.matches_any(&[' ', '\t']));
        assert!(!r.matches_letter());
        r.advance();
        assert!(r.matches_letter());
    }

    #[test]
    fn test_contains_ignore_case() {
        let mut r = CharacterReader::new("abc </TITLE> def");
        assert!(r.contains_ignore_case("</title"));
        assert!(!r.contains_ignore_case("</script"));
    }

    #[test]
    fn test_interned_strings_are_equal() {
        let mut r = CharacterReader::new("div div");
        let first = r.consume_tag_name();
        r.advance();
        let second = r.consume_tag_name();
        assert_eq!(first, second);
    }

    #[test]
    fn test_window_slides_over_long_input() {
        let long = format!("{}<b>", "a".repeat(BUFFER_SIZE * 2 + 17));
        let mut r = CharacterReader::new(&long);
        let mut data = String::new();
        while !r.matches('<') && !r.is_empty() {
            data.push_str(&r.consume_data());
        }
        assert_eq!(data.len(), BUFFER_SIZE * 2 + 17);
        assert_eq!(r.pos(), BUFFER_SIZE * 2 + 17);
        assert!(r.match_consume("<b>"));
        assert!(r.is_empty());
    }

    #[test]
    fn test_consume_to_str_across_window_edge() {
        let mut input = "x".repeat(BUFFER_SIZE - 1);
        input.push_str("]]>tail");
        let mut r = CharacterReader::new(&input);
        let data = r.consume_to_str("]]>");
        assert_eq!(data.len(), BUFFER_SIZE - 1);
        assert!(r.match_consume("]]>"));
        assert_eq!(r.consume_to_end(), "tail");
    }

    #[test]
    fn test_mark_survives_slide() {
        let long = "b".repeat(BUFFER_SIZE);
        let mut r = CharacterReader::new(&long);
        for _ in 0..READ_AHEAD_LIMIT - 2 {
            r.advance();
        }
        r.mark();
        let start = r.pos();
        for _ in 0..10 {
            let _ = r.consume();
        }
        r.rewind_to_mark();
        assert_eq!(r.pos(), start);
    }
}
