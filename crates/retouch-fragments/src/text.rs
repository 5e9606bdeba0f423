//! Plain-text projection of rich text and character-range extraction.
//!
//! Selection indices always address the *plain-text projection* of the
//! rich content, never the original markup. Markup length differs from
//! visible text length, so treating the two interchangeably is the classic
//! off-by-N bug this module exists to prevent: strip first, slice second.

use serde::{Deserialize, Serialize};

/// A character-range selection over the plain-text projection of a rich
/// text document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSelection {
    /// Inclusive start, in characters of the plain-text projection.
    pub start_index: usize,
    /// Exclusive end, in characters of the plain-text projection.
    pub end_index: usize,
    /// The selected plain text, captured at selection time.
    pub original_text: String,
}

impl TextSelection {
    /// Capture a selection from markup, storing the extracted plain text.
    pub fn capture(markup: &str, start_index: usize, end_index: usize) -> Self {
        Self {
            start_index,
            end_index,
            original_text: extract_text_selection(markup, start_index, end_index),
        }
    }
}

/// Project rich text markup to plain text.
///
/// Tags are dropped wholesale and the handful of entities rich text
/// editors emit are decoded. No DOM is built; a single forward scan is
/// enough for well-formed editor output, and a stray `<` without a
/// closing `>` swallows the rest of the input rather than panicking.
pub fn plain_text_of(markup: &str) -> String {
    let mut text = String::with_capacity(markup.len());
    let mut chars = markup.chars();

    while let Some(c) = chars.next() {
        match c {
            '<' => {
                // Skip to the end of the tag
                for t in chars.by_ref() {
                    if t == '>' {
                        break;
                    }
                }
            }
            '&' => {
                let rest = chars.as_str();
                match rest.split_once(';') {
                    Some((entity, _)) if is_entity_name(entity) => {
                        text.push_str(decode_entity(entity));
                        // Consume the entity body and the semicolon
                        for _ in 0..entity.chars().count() + 1 {
                            chars.next();
                        }
                    }
                    _ => text.push('&'),
                }
            }
            _ => text.push(c),
        }
    }

    text
}

/// Entity names are short and alphanumeric (plus `#` for numeric refs).
/// Anything else after `&` is ordinary text, not a broken entity.
fn is_entity_name(entity: &str) -> bool {
    !entity.is_empty()
        && entity.len() <= 6
        && entity.chars().all(|c| c.is_ascii_alphanumeric() || c == '#')
}

fn decode_entity(entity: &str) -> &'static str {
    match entity {
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        "apos" | "#39" => "'",
        "nbsp" => " ",
        _ => "",
    }
}

/// Extract the `[start_index, end_index)` character range of the
/// plain-text projection of `markup`.
///
/// Both bounds are clamped to the projection length; a reversed range
/// yields an empty string. Indices count characters, not bytes, so
/// multi-byte text selects the same glyphs the user highlighted.
pub fn extract_text_selection(markup: &str, start_index: usize, end_index: usize) -> String {
    let plain = plain_text_of(markup);

    if start_index >= end_index {
        return String::new();
    }

    plain
        .chars()
        .skip(start_index)
        .take(end_index - start_index)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_strips_tags() {
        assert_eq!(plain_text_of("<p>Hello <b>world</b></p>"), "Hello world");
    }

    #[test]
    fn test_plain_text_of_plain_input() {
        assert_eq!(plain_text_of("no markup here"), "no markup here");
    }

    #[test]
    fn test_plain_text_decodes_entities() {
        assert_eq!(plain_text_of("Tom &amp; Jerry"), "Tom & Jerry");
        assert_eq!(plain_text_of("1 &lt; 2 &gt; 0"), "1 < 2 > 0");
        assert_eq!(plain_text_of("&quot;quoted&quot;"), "\"quoted\"");
        assert_eq!(plain_text_of("it&#39;s"), "it's");
        assert_eq!(plain_text_of("a&nbsp;b"), "a b");
    }

    #[test]
    fn test_plain_text_unknown_entity_dropped() {
        assert_eq!(plain_text_of("a&bogus;b"), "ab");
    }

    #[test]
    fn test_plain_text_lone_ampersand_kept() {
        assert_eq!(plain_text_of("fish & chips"), "fish & chips");
        // A later semicolon does not turn the surrounding text into an entity
        assert_eq!(plain_text_of("a & b; c"), "a & b; c");
    }

    #[test]
    fn test_plain_text_unclosed_tag_swallows_rest() {
        assert_eq!(plain_text_of("before <em unclosed"), "before ");
    }

    #[test]
    fn test_plain_text_empty_input() {
        assert_eq!(plain_text_of(""), "");
    }

    #[test]
    fn test_plain_text_tag_attributes_stripped() {
        assert_eq!(
            plain_text_of(r#"<a href="https://example.com">link</a>"#),
            "link"
        );
    }

    #[test]
    fn test_extract_selection_from_markup() {
        // Projection of the markup is "Hello world" (11 chars)
        let markup = "<p>Hello <b>world</b></p>";
        assert_eq!(extract_text_selection(markup, 0, 5), "Hello");
        assert_eq!(extract_text_selection(markup, 6, 11), "world");
        assert_eq!(extract_text_selection(markup, 0, 11), "Hello world");
    }

    #[test]
    fn test_extract_selection_indices_are_plain_text_not_markup() {
        // Byte 0..5 of the markup would be "<p>He"; the projection
        // contract means we get "Hello" instead
        let markup = "<p>Hello <b>world</b></p>";
        assert_eq!(extract_text_selection(markup, 0, 5), "Hello");
    }

    #[test]
    fn test_extract_selection_end_clamped() {
        let markup = "<p>short</p>";
        assert_eq!(extract_text_selection(markup, 0, 999), "short");
    }

    #[test]
    fn test_extract_selection_start_past_end_is_empty() {
        let markup = "<p>short</p>";
        assert_eq!(extract_text_selection(markup, 100, 200), "");
        assert_eq!(extract_text_selection(markup, 3, 3), "");
        assert_eq!(extract_text_selection(markup, 4, 2), "");
    }

    #[test]
    fn test_extract_selection_counts_characters_not_bytes() {
        let markup = "<p>héllo wörld</p>";
        assert_eq!(extract_text_selection(markup, 0, 5), "héllo");
        assert_eq!(extract_text_selection(markup, 6, 11), "wörld");
    }

    #[test]
    fn test_text_selection_capture() {
        let selection = TextSelection::capture("<p>Hello <b>world</b></p>", 6, 11);
        assert_eq!(selection.start_index, 6);
        assert_eq!(selection.end_index, 11);
        assert_eq!(selection.original_text, "world");
    }

    #[test]
    fn test_text_selection_serialization_field_names() {
        let selection = TextSelection::capture("<p>Hi</p>", 0, 2);
        let json = serde_json::to_string(&selection).unwrap();
        assert!(json.contains("\"startIndex\":0"));
        assert!(json.contains("\"endIndex\":2"));
        assert!(json.contains("\"originalText\":\"Hi\""));
    }
}
