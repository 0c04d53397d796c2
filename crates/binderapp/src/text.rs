//! Plain-text projection of rich page bodies, plus the char-based matching
//! primitives the search engine is built on.
//!
//! Page bodies and copy blocks are stored as HTML. Search runs over their
//! plain text: the text nodes concatenated in document order, with common
//! entities decoded. Tags contribute nothing, so a word split across two
//! paragraphs still matches as one.
//!
//! All offsets in this module are `char` offsets. Case folding maps each char
//! to a single char so a folded text has the same length as its source.

/// Strips markup from an HTML fragment.
pub fn plain_text(html: &str) -> String {
    let mut output = String::with_capacity(html.len());
    let mut chars = html.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '<' => {
                for c in chars.by_ref() {
                    if c == '>' {
                        break;
                    }
                }
            }
            '&' => {
                let mut entity = String::new();
                while let Some(&c) = chars.peek() {
                    if c == ';' || entity.len() > 10 || c.is_whitespace() || c == '&' || c == '<' {
                        break;
                    }
                    entity.push(c);
                    chars.next();
                }
                match (chars.peek(), decode_entity(&entity)) {
                    (Some(';'), Some(decoded)) => {
                        chars.next();
                        output.push(decoded);
                    }
                    _ => {
                        output.push('&');
                        output.push_str(&entity);
                    }
                }
            }
            _ => output.push(ch),
        }
    }

    output
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" | "#39" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let code = entity.strip_prefix('#')?;
            let value = match code.strip_prefix(|c| c == 'x' || c == 'X') {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => code.parse().ok()?,
            };
            char::from_u32(value)
        }
    }
}

/// Lowercases `text` one char at a time, keeping the char count intact.
pub fn fold(text: &str) -> Vec<char> {
    text.chars()
        .map(|c| c.to_lowercase().next().unwrap_or(c))
        .collect()
}

/// Char offset of the first case-insensitive occurrence of `needle`.
pub fn find_first(haystack: &[char], needle: &[char]) -> Option<usize> {
    find_from(haystack, needle, 0)
}

/// Char offsets of every non-overlapping occurrence, scanning past each match
/// by the needle's length.
pub fn find_all(haystack: &[char], needle: &[char]) -> Vec<usize> {
    let mut found = Vec::new();
    let mut from = 0;
    while let Some(start) = find_from(haystack, needle, from) {
        found.push(start);
        from = start + needle.len();
    }
    found
}

fn find_from(haystack: &[char], needle: &[char], from: usize) -> Option<usize> {
    if needle.is_empty() || from > haystack.len() || needle.len() > haystack.len() - from {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|pos| pos + from)
}

/// The window `[start - radius, start + len + radius)` of `text`, clamped to
/// its bounds.
pub fn preview(text: &[char], start: usize, len: usize, radius: usize) -> String {
    let from = start.saturating_sub(radius);
    let to = (start + len + radius).min(text.len());
    text[from.min(to)..to].iter().collect()
}
