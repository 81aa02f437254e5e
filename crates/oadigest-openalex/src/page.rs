//! List-endpoint payloads: `{results, meta}`

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use oadigest_core::ClientError;

use crate::record::RawRecord;

/// Paging metadata returned with every list response
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Meta {
    #[serde(default, deserialize_with = "null_to_default")]
    pub count: u64,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

impl Meta {
    /// Next cursor, treating an empty string like an absent one
    pub fn next_cursor(&self) -> Option<&str> {
        self.next_cursor.as_deref().filter(|c| !c.is_empty())
    }
}

/// One undecoded page as delivered by a [`PageFetcher`](crate::fetcher::PageFetcher)
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawPage {
    #[serde(default, deserialize_with = "null_to_default")]
    pub results: Vec<RawRecord>,
    #[serde(default)]
    pub meta: Meta,
}

impl RawPage {
    pub fn from_json(value: Value) -> Result<Self, ClientError> {
        serde_json::from_value(value)
            .map_err(|e| ClientError::Decode(format!("invalid list response: {e}")))
    }

    pub fn into_result(self) -> PageResult<RawRecord> {
        PageResult {
            cursor: self.meta.next_cursor().map(str::to_string),
            count: self.meta.count,
            page: self.meta.page,
            items: self.results,
        }
    }
}

/// One page of items plus the paging state needed to continue
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    /// Cursor for the next page; None when the traversal is over
    pub cursor: Option<String>,
    /// Total number of matches reported by the service
    pub count: u64,
    pub page: Option<u32>,
}

impl<T> PageResult<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PageResult<U> {
        PageResult {
            items: self.items.into_iter().map(f).collect(),
            cursor: self.cursor,
            count: self.count,
            page: self.page,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Deserialize null as Default::default()
fn null_to_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::deserialize(deserializer)?.unwrap_or_default())
}
