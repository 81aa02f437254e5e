//! oadigest OpenAlex - client and record digestion for the OpenAlex API
//!
//! Queries are built with [`Query`] (and [`FilterBuilder`] for filters),
//! pages come from a [`PageFetcher`], [`Paginator`] walks them by cursor or
//! offset, and [`digest`] flattens nested records into scalar fields.
//! [`OpenAlexClient`] ties these together per entity type.
//!
//! # Example
//!
//! ```no_run
//! use oadigest_openalex::{ClientConfig, DigestOptions, Entity, FilterBuilder, OpenAlexClient, Query};
//!
//! let client = OpenAlexClient::new(ClientConfig::default())?;
//! let filter = FilterBuilder::new().eq("publication_year", 2023).gt("cited_by_count", 100);
//!
//! let total = client.get_total_count(Entity::Works, Some(&filter.build()))?;
//! let page = client.list_works(&Query::new().filter(filter), DigestOptions::DIGEST)?;
//! println!("{} of {total}", page.len());
//! # Ok::<(), oadigest_core::ClientError>(())
//! ```

pub mod abstract_decode;
pub mod client;
pub mod config;
pub mod count;
pub mod date;
pub mod digest;
pub mod entity;
pub mod fetcher;
pub mod page;
pub mod paginator;
pub mod query;
pub mod record;

#[cfg(test)]
mod testing;

// Re-exports for convenience
pub use client::{Item, Items, OpenAlexClient};
pub use config::ClientConfig;
pub use count::count;
pub use digest::{DigestOptions, DigestedRecord, MAX_NAMES, digest, text_columns};
pub use entity::Entity;
pub use fetcher::{HttpFetcher, PageFetcher};
pub use page::{Meta, PageResult, RawPage};
pub use paginator::{Paginator, RecordIter};
pub use query::{FilterBuilder, Query, Traversal};
pub use record::{Node, RawRecord};
