//! Decode OpenAlex abstract inverted index to plaintext
//!
//! OpenAlex ships abstracts as inverted indexes:
//! ```json
//! {"Despite": [0], "growing": [1], "interest": [2, 50], ...}
//! ```
//!
//! Text is rebuilt by placing each word at each of its positions.

use serde_json::{Map, Value};

/// Decode inverted index to plaintext abstract
///
/// Words are emitted in ascending position order, separated by single
/// spaces. Missing positions are skipped. If two words claim the same
/// position, the lexicographically smaller one is kept so output does not
/// depend on map iteration order.
///
/// # Example
/// ```
/// use serde_json::json;
/// use oadigest_openalex::abstract_decode::decode_inverted_index;
///
/// let index = json!({"Hello": [0], "world": [1]});
/// let text = decode_inverted_index(index.as_object().unwrap());
/// assert_eq!(text, "Hello world");
/// ```
pub fn decode_inverted_index(index: &Map<String, Value>) -> String {
    let mut pairs: Vec<(u64, &str)> = index
        .iter()
        .filter_map(|(word, positions)| Some((word.as_str(), positions.as_array()?)))
        .flat_map(|(word, positions)| {
            positions
                .iter()
                .filter_map(Value::as_u64)
                .map(move |pos| (pos, word))
        })
        .collect();

    pairs.sort_unstable();
    pairs.dedup_by_key(|(pos, _)| *pos);

    let mut text = String::new();
    for (_, word) in pairs {
        if !text.is_empty() {
            text.push(' ');
        }
        text.push_str(word);
    }
    text
}

/// Decode an optional index value
///
/// Returns None if the value is absent, null, not an object, or decodes to
/// an empty string.
pub fn decode_abstract(value: Option<&Value>) -> Option<String> {
    let obj = value?.as_object()?;
    let text = decode_inverted_index(obj);
    if text.is_empty() { None } else { Some(text) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(value: Value) -> String {
        decode_inverted_index(value.as_object().unwrap())
    }

    #[test]
    fn empty_index() {
        assert_eq!(decode(json!({})), "");
    }

    #[test]
    fn three_words() {
        let text = decode(json!({"This": [0], "paper": [1], "presents": [2]}));
        assert_eq!(text, "This paper presents");
    }

    #[test]
    fn repeated_word() {
        assert_eq!(
            decode(json!({"the": [0, 2], "cat": [1], "sat": [3]})),
            "the cat the sat"
        );
    }

    #[test]
    fn key_order_irrelevant() {
        assert_eq!(decode(json!({"world": [1], "Hello": [0]})), "Hello world");
    }

    #[test]
    fn gaps_are_skipped() {
        assert_eq!(decode(json!({"a": [0], "b": [5], "c": [9]})), "a b c");
    }

    #[test]
    fn colliding_positions_resolved_deterministically() {
        assert_eq!(decode(json!({"zeta": [0], "alpha": [0], "end": [1]})), "alpha end");
    }

    #[test]
    fn malformed_positions_ignored() {
        let text = decode(json!({"ok": [0], "neg": [-1], "str": ["2"], "notarray": 3, "fine": [1]}));
        assert_eq!(text, "ok fine");
    }

    #[test]
    fn realistic_abstract() {
        let text = decode(json!({
            "We": [0], "present": [1], "a": [2, 10], "novel": [3], "approach": [4],
            "to": [5], "machine": [6], "learning": [7], "using": [8], "deep": [9],
            "neural": [11], "network": [12]
        }));
        assert_eq!(
            text,
            "We present a novel approach to machine learning using deep a neural network"
        );
    }

    #[test]
    fn decode_abstract_null_or_empty() {
        assert_eq!(decode_abstract(None), None);
        assert_eq!(decode_abstract(Some(&Value::Null)), None);
        assert_eq!(decode_abstract(Some(&json!({}))), None);
        assert_eq!(decode_abstract(Some(&json!(["not", "an", "index"]))), None);
    }

    #[test]
    fn decode_abstract_valid() {
        let val = json!({"Hello": [0], "world": [1]});
        assert_eq!(decode_abstract(Some(&val)), Some("Hello world".to_string()));
    }
}
