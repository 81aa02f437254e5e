//! Declarative field rules and the single merge function that drives them

use serde_json::Value;

/// Max entries kept for name-like collections (authors, institutions, ...)
pub const MAX_NAMES: usize = 10;

/// Separator for multi-valued fields
pub const JOIN_DELIMITER: &str = "|";

/// How collected values become one string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStrategy {
    /// Drop repeats, first occurrence wins
    DedupeJoin,
    /// Dedupe, then keep the first `max_entries`
    DedupeJoinTruncated { max_entries: usize },
}

/// What to do with the value(s) found at a rule's path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extract {
    /// Scalar at a plain dot path
    Single,
    /// Scalar string normalized to `YYYY-MM-DD`
    Date,
    /// Sub-object whose scalar children become `<field>_<child>`
    Flatten,
    /// Scalars collected through `[]` segments, merged into one string
    Join(MergeStrategy),
}

/// One output field (or field prefix, for [`Extract::Flatten`])
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub field: &'static str,
    pub path: &'static str,
    pub extract: Extract,
}

impl FieldRule {
    pub const fn single(field: &'static str, path: &'static str) -> Self {
        Self { field, path, extract: Extract::Single }
    }

    /// Date at a top-level key of the same name
    pub const fn date(field: &'static str) -> Self {
        Self { field, path: field, extract: Extract::Date }
    }

    pub const fn flatten(field: &'static str, path: &'static str) -> Self {
        Self { field, path, extract: Extract::Flatten }
    }

    pub const fn join(field: &'static str, path: &'static str, strategy: MergeStrategy) -> Self {
        Self { field, path, extract: Extract::Join(strategy) }
    }

    /// Name collection: dedupe then truncate to [`MAX_NAMES`]
    pub const fn names(field: &'static str, path: &'static str) -> Self {
        Self::join(
            field,
            path,
            MergeStrategy::DedupeJoinTruncated { max_entries: MAX_NAMES },
        )
    }
}

/// Render a JSON scalar as join text. Empty strings and non-scalars yield None.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Merge collected values according to `strategy`.
///
/// Returns None when nothing survives, so the caller omits the field.
pub fn merge_values<'a, I>(values: I, strategy: MergeStrategy) -> Option<String>
where
    I: IntoIterator<Item = &'a Value>,
{
    let texts = values.into_iter().filter_map(scalar_text);
    let merged: Vec<String> = match strategy {
        MergeStrategy::DedupeJoin => dedupe(texts),
        MergeStrategy::DedupeJoinTruncated { max_entries } => {
            let mut unique = dedupe(texts);
            unique.truncate(max_entries);
            unique
        }
    };
    if merged.is_empty() {
        None
    } else {
        Some(merged.join(JOIN_DELIMITER))
    }
}

/// Ordered unique values; collections here are small so a linear scan is fine
fn dedupe(texts: impl Iterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for text in texts {
        if !out.contains(&text) {
            out.push(text);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn merge(values: Value, strategy: MergeStrategy) -> Option<String> {
        merge_values(values.as_array().unwrap(), strategy)
    }

    #[test]
    fn dedupe_join_collapses_repeats() {
        assert_eq!(
            merge(json!(["doaj", "crossref", "doaj"]), MergeStrategy::DedupeJoin).as_deref(),
            Some("doaj|crossref")
        );
    }

    #[test]
    fn dedupe_first_occurrence_order() {
        assert_eq!(
            merge(json!(["MIT", "CNRS", "MIT", "ETH", "CNRS"]), MergeStrategy::DedupeJoin).as_deref(),
            Some("MIT|CNRS|ETH")
        );
    }

    #[test]
    fn truncation_after_dedupe() {
        // 12 values, 11 unique: first 10 unique survive
        let values = json!(["a", "a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k"]);
        let merged = merge(values, MergeStrategy::DedupeJoinTruncated { max_entries: MAX_NAMES })
            .unwrap();
        assert_eq!(merged, "a|b|c|d|e|f|g|h|i|j");
        assert_eq!(merged.split(JOIN_DELIMITER).count(), 10);
    }

    #[test]
    fn short_collections_untouched() {
        let merged = merge(json!(["x", "y"]), MergeStrategy::DedupeJoinTruncated { max_entries: 10 });
        assert_eq!(merged.as_deref(), Some("x|y"));
    }

    #[test]
    fn empty_and_blank_values_omit_field() {
        assert_eq!(merge(json!([]), MergeStrategy::DedupeJoin), None);
        assert_eq!(merge(json!(["", null]), MergeStrategy::DedupeJoin), None);
    }

    #[test]
    fn numbers_and_bools_rendered() {
        assert_eq!(
            merge(json!([3, true, 2.5]), MergeStrategy::DedupeJoin).as_deref(),
            Some("3|true|2.5")
        );
    }

    #[test]
    fn names_constructor() {
        let rule = FieldRule::names("x", "a[].b");
        assert_eq!(
            rule.extract,
            Extract::Join(MergeStrategy::DedupeJoinTruncated { max_entries: MAX_NAMES })
        );
    }
}
