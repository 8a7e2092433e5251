//! String encoding helpers for length-stable value handling.
//!
//! Submitted text is stored entity-encoded (`🔥` → `&#x1F525;`) so the
//! server counts exactly what the client-side counter sees on the encoded
//! string. Normalization decodes entities back to text so in-memory values
//! stay human-readable.

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RUNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\t\n\r ]+").expect("whitespace pattern is valid"));

static NUMERIC_ENTITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&#(x[0-9a-fA-F]+|[0-9]+);").expect("entity pattern is valid"));

/// Collapse runs of tabs, newlines, carriage returns, and spaces to a
/// single space. Counting happens on the collapsed form so entry and
/// storage formatting differences don't change counts.
pub fn collapse_whitespace(value: &str) -> String {
    WHITESPACE_RUNS.replace_all(value, " ").into_owned()
}

/// Encode every non-ASCII character as a hex numeric character reference.
///
/// Multi-byte glyphs become a fixed ASCII sequence, so `.len()`-style
/// counting on the encoded string agrees between server and client.
pub fn text_to_entities(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if c.is_ascii() {
            out.push(c);
        } else {
            out.push_str(&format!("&#x{:X};", c as u32));
        }
    }
    out
}

/// Decode numeric character references (`&#x1F525;` or `&#128293;`) back
/// to their characters. Unparseable references are left as-is.
pub fn entities_to_text(value: &str) -> String {
    NUMERIC_ENTITY
        .replace_all(value, |caps: &regex::Captures| {
            let body = &caps[1];
            let code = if let Some(hex) = body.strip_prefix('x') {
                u32::from_str_radix(hex, 16).ok()
            } else {
                body.parse::<u32>().ok()
            };
            match code.and_then(char::from_u32) {
                Some(c) => c.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Character count of a value as it will be persisted: entity-encoded,
/// with whitespace runs collapsed first.
pub fn encoded_char_count(raw: &str) -> usize {
    collapse_whitespace(&text_to_entities(raw)).chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapse_whitespace_runs() {
        assert_eq!(collapse_whitespace("a\n\n\nb"), "a b");
        assert_eq!(collapse_whitespace("a\t \r\n b"), "a b");
        assert_eq!(collapse_whitespace("no runs"), "no runs");
    }

    #[test]
    fn ascii_passes_through_encoding() {
        assert_eq!(text_to_entities("plain text"), "plain text");
    }

    #[test]
    fn emoji_encodes_to_hex_reference() {
        assert_eq!(text_to_entities("🔥"), "&#x1F525;");
        assert_eq!(text_to_entities("a🔥b"), "a&#x1F525;b");
    }

    #[test]
    fn entities_decode_back() {
        assert_eq!(entities_to_text("&#x1F525;"), "🔥");
        assert_eq!(entities_to_text("&#128293;"), "🔥");
        assert_eq!(entities_to_text("a&#x1F525;b"), "a🔥b");
    }

    #[test]
    fn encode_decode_round_trip() {
        for s in ["héllo wörld", "日本語", "mixed 🔥 and ascii", ""] {
            assert_eq!(entities_to_text(&text_to_entities(s)), s);
        }
    }

    #[test]
    fn invalid_reference_left_alone() {
        assert_eq!(entities_to_text("&#xD800;"), "&#xD800;");
    }

    #[test]
    fn encoded_count_collapses_first() {
        // "a\n\n\nb" collapses to "a b": 3 characters, not 5.
        assert_eq!(encoded_char_count("a\n\n\nb"), 3);
    }

    #[test]
    fn encoded_count_counts_entity_characters() {
        // The fire emoji persists as "&#x1F525;", 10 characters.
        assert_eq!(encoded_char_count("🔥"), 10);
    }
}
