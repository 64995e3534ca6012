//! Escape-aware splitting of scene cells
//!
//! A backslash escapes the character after it. Escaped characters never act
//! as separators; the backslash itself is only removed by [`unescape`], so
//! pieces can be split again at a finer level before unescaping.

/// Split `s` on every `sep` that is not preceded by an escaping backslash.
///
/// Escapes are preserved in the returned pieces.
///
/// # Examples
///
/// ```
/// use tilescape::tokenizer::split_unescaped;
///
/// assert_eq!(split_unescaped("a&b", '&'), vec!["a", "b"]);
/// assert_eq!(split_unescaped(r"a\&b", '&'), vec![r"a\&b"]);
/// assert_eq!(split_unescaped("", '&'), vec![""]);
/// ```
pub fn split_unescaped(s: &str, sep: char) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        if c == '\\' {
            current.push(c);
            if let Some(escaped) = chars.next() {
                current.push(escaped);
            }
        } else if c == sep {
            pieces.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    pieces.push(current);
    pieces
}

/// Split on the first unescaped `sep`, if there is one.
pub fn split_once_unescaped(s: &str, sep: char) -> Option<(String, String)> {
    let mut escaped = false;
    for (i, c) in s.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == sep {
            return Some((s[..i].to_string(), s[i + c.len_utf8()..].to_string()));
        }
    }
    None
}

/// Remove escaping backslashes, keeping the escaped characters.
///
/// A trailing lone backslash is kept as a literal.
pub fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            out.push(chars.next().unwrap_or('\\'));
        } else {
            out.push(c);
        }
    }
    out
}
