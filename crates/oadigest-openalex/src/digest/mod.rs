//! Digestion: flatten one nested record into scalar fields
//!
//! Steps, in order (later steps overwrite earlier ones on key clashes):
//! 1. top-level scalars copied as-is (nulls dropped)
//! 2. the entity's rule table: dates, nested promotions, array merges
//! 3. the reconstructed abstract, only when requested
//!
//! Digestion is pure and infallible; anything missing or oddly shaped just
//! leaves its output field out.

pub mod rules;
pub mod tables;

use serde::{Deserialize, Serialize};

use oadigest_core::{FlatRecord, FlatValue};

use crate::abstract_decode::decode_abstract;
use crate::date::normalize_date;
use crate::entity::Entity;
use crate::record::RawRecord;

pub use rules::{Extract, FieldRule, JOIN_DELIMITER, MAX_NAMES, MergeStrategy, merge_values};
pub use tables::rules_for;

/// Output key for the reconstructed abstract
pub const ABSTRACT_FIELD: &str = "abstract";

/// Source key for the inverted index
const ABSTRACT_INDEX_KEY: &str = "abstract_inverted_index";

/// Whether (and how) records should be digested on the way out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DigestOptions {
    pub enabled: bool,
    pub include_abstract: bool,
}

impl DigestOptions {
    /// Records returned untouched
    pub const RAW: Self = Self { enabled: false, include_abstract: false };
    pub const DIGEST: Self = Self { enabled: true, include_abstract: false };
    pub const DIGEST_WITH_ABSTRACT: Self = Self { enabled: true, include_abstract: true };

    pub fn new(enabled: bool, include_abstract: bool) -> Self {
        Self { enabled, include_abstract }
    }
}

/// Flat record: every value is a scalar or a `|`-joined string
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DigestedRecord(FlatRecord);

impl DigestedRecord {
    pub fn get(&self, field: &str) -> Option<&FlatValue> {
        self.0.get(field)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(FlatValue::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn as_flat(&self) -> &FlatRecord {
        &self.0
    }

    pub fn into_flat(self) -> FlatRecord {
        self.0
    }
}

/// Digest one record of type `entity`
pub fn digest(record: &RawRecord, entity: Entity, include_abstract: bool) -> DigestedRecord {
    let rules = rules_for(entity);
    let mut out = FlatRecord::new();

    for (key, value) in record.as_map() {
        if key == ABSTRACT_FIELD || is_date_field(rules, key) {
            continue;
        }
        if let Some(flat) = FlatValue::from_json(value) {
            out.insert(key.clone(), flat);
        }
    }

    for rule in rules {
        apply_rule(record, rule, &mut out);
    }

    if include_abstract {
        let index = record.as_map().get(ABSTRACT_INDEX_KEY);
        if let Some(text) = decode_abstract(index) {
            out.insert(ABSTRACT_FIELD.to_string(), FlatValue::Text(text));
        }
    }

    DigestedRecord(out)
}

/// Output fields that always hold text for `entity`: normalized dates,
/// merged collections and the abstract when requested
pub fn text_columns(entity: Entity, include_abstract: bool) -> Vec<&'static str> {
    let mut columns: Vec<&'static str> = rules_for(entity)
        .iter()
        .filter(|r| matches!(r.extract, Extract::Date | Extract::Join(_)))
        .map(|r| r.field)
        .collect();
    if include_abstract {
        columns.push(ABSTRACT_FIELD);
    }
    columns
}

fn is_date_field(rules: &[FieldRule], key: &str) -> bool {
    rules
        .iter()
        .any(|r| r.extract == Extract::Date && r.field == key)
}

fn apply_rule(record: &RawRecord, rule: &FieldRule, out: &mut FlatRecord) {
    match rule.extract {
        Extract::Single => {
            if let Some(flat) = record.get(rule.path).as_scalar().and_then(FlatValue::from_json) {
                out.insert(rule.field.to_string(), flat);
            }
        }
        Extract::Date => {
            if let Some(date) = record.get(rule.path).as_str().and_then(normalize_date) {
                out.insert(rule.field.to_string(), FlatValue::Text(date));
            }
        }
        Extract::Flatten => {
            let Some(map) = record.get(rule.path).as_map() else {
                return;
            };
            for (child, value) in map {
                if let Some(flat) = FlatValue::from_json(value) {
                    out.insert(format!("{}_{child}", rule.field), flat);
                }
            }
        }
        Extract::Join(strategy) => {
            if let Some(joined) = merge_values(record.collect(rule.path), strategy) {
                out.insert(rule.field.to_string(), FlatValue::Text(joined));
            }
        }
    }
}
