//! Parse `<language> <code> [/stdin <input>]` text into a `RunRequest`
//!
//! The same grammar serves `/run` arguments and inline queries:
//!
//! ```text
//! python
//! name = input()
//! print(f"hi {name}")
//! /stdin
//! world
//! ```
//!
//! The language is everything up to the first space or newline. The code
//! follows, with leading blanks dropped. A `/stdin` word preceded by
//! whitespace splits off the program input.
//!
//! Known ambiguity: code that itself contains whitespace followed by the
//! word `/stdin` (say, a shell snippet reading `/stdin`-named paths) is cut
//! at that point.

pub use crate::core::error::ParseError;
use crate::core::types::RunRequest;

/// Marker word separating code from program input
pub const STDIN_MARKER: &str = "/stdin";

/// Parse one command text into a `RunRequest`
///
/// Fails when there is no separator after the language or nothing but
/// blanks after it. The language is not checked against the runtimes the
/// service offers.
pub fn parse(text: &str) -> Result<RunRequest, ParseError> {
    let (language, rest) = text
        .split_once(is_separator)
        .ok_or(ParseError::MissingCode)?;

    let rest = rest.trim_start_matches(is_separator);
    if rest.is_empty() {
        return Err(ParseError::MissingCode);
    }

    let (code, stdin) = match split_stdin(rest) {
        Some((code, stdin)) => (code.trim_end_matches(is_marker_space), stdin),
        None => (rest, ""),
    };

    RunRequest::new(language, code, stdin)
}

fn is_separator(c: char) -> bool {
    c == ' ' || c == '\n'
}

// Whitespace class the marker may follow: space, tab, LF, FF, CR.
fn is_marker_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0C' | '\r')
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Locate the first `<whitespace>/stdin` marker ending on a word boundary
///
/// Returns `(start, end)` byte offsets: `start` is the whitespace before
/// the marker, `end` is just past `/stdin`.
fn find_marker(text: &str) -> Option<(usize, usize)> {
    text.char_indices()
        .filter(|&(_, c)| is_marker_space(c))
        .find_map(|(i, c)| {
            let after_space = i + c.len_utf8();
            let tail = text[after_space..].strip_prefix(STDIN_MARKER)?;
            match tail.chars().next() {
                Some(next) if is_word_char(next) => None,
                _ => Some((i, after_space + STDIN_MARKER.len())),
            }
        })
}

/// Split `text` into code and stdin at the first marker
///
/// The single character right after the marker is a separator and is
/// dropped. Only the first marker counts: if nothing follows it, there is
/// no split at all, even if a later marker would qualify.
fn split_stdin(text: &str) -> Option<(&str, &str)> {
    let (start, end) = find_marker(text)?;
    let mut tail = text[end..].chars();
    tail.next()?;
    let stdin = tail.as_str();
    if stdin.is_empty() {
        return None;
    }
    Some((&text[..start], stdin))
}
