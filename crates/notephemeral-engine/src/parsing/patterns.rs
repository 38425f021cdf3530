//! Patterns shared by the scanner, the normalization passes and the paste
//! sanitizer. Link detection and heading classification must agree
//! everywhere, so they live in one place.

use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;

use crate::model::HeadingLevel;

/// URL pattern: an `http`, `https`, `ftp` or `file` scheme followed by a
/// maximal run of URL-safe characters, not ending in punctuation.
///
/// Unicode is off: the character classes and word boundaries are ASCII, so
/// a URL stops at the first non-ASCII char.
pub fn url_regex() -> &'static Regex {
    static URL_REGEX: OnceLock<Regex> = OnceLock::new();
    URL_REGEX.get_or_init(|| {
        Regex::new(r"(?i-u)\b(?:https?|ftp|file)://[-A-Z0-9+&@#/%?=~_|!:,.;]*[-A-Z0-9+&@#/%=~_|]\b")
            .expect("Invalid URL regex")
    })
}

fn heading_prefix_regex() -> &'static Regex {
    static HEADING_REGEX: OnceLock<Regex> = OnceLock::new();
    HEADING_REGEX.get_or_init(|| Regex::new(r"^(#{1,6}) ").expect("Invalid heading regex"))
}

/// Level implied by a `#`-prefix followed by a space, e.g. `"## Title"` -> 2.
pub fn heading_prefix_level(text: &str) -> Option<HeadingLevel> {
    let captures = heading_prefix_regex().captures(text)?;
    HeadingLevel::new(captures[1].len() as u8)
}

/// URL matches in `text` as char ranges, each with the matched substring.
pub fn url_spans(text: &str) -> Vec<(Range<usize>, String)> {
    let mut spans = Vec::new();
    let mut byte_cursor = 0;
    let mut char_cursor = 0;
    for m in url_regex().find_iter(text) {
        let start = char_cursor + text[byte_cursor..m.start()].chars().count();
        let end = start + m.as_str().chars().count();
        spans.push((start..end, m.as_str().to_string()));
        byte_cursor = m.end();
        char_cursor = end;
    }
    spans
}
