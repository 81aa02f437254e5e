//! Caller-facing client: per-entity get/list/list_all and counts

use std::iter::FusedIterator;

use serde::Serialize;

use oadigest_core::ClientError;

use crate::config::ClientConfig;
use crate::count::count;
use crate::digest::{DigestOptions, DigestedRecord, digest};
use crate::entity::Entity;
use crate::fetcher::{HttpFetcher, PageFetcher};
use crate::page::PageResult;
use crate::paginator::{Paginator, RecordIter};
use crate::query::{Query, Traversal};
use crate::record::RawRecord;

/// A record as handed to the caller: untouched or digested
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Item {
    Raw(RawRecord),
    Digested(DigestedRecord),
}

impl Item {
    pub fn from_raw(record: RawRecord, entity: Entity, options: DigestOptions) -> Self {
        if options.enabled {
            Self::Digested(digest(&record, entity, options.include_abstract))
        } else {
            Self::Raw(record)
        }
    }

    pub fn as_raw(&self) -> Option<&RawRecord> {
        match self {
            Self::Raw(r) => Some(r),
            Self::Digested(_) => None,
        }
    }

    pub fn as_digested(&self) -> Option<&DigestedRecord> {
        match self {
            Self::Digested(d) => Some(d),
            Self::Raw(_) => None,
        }
    }

    pub fn into_digested(self) -> Option<DigestedRecord> {
        match self {
            Self::Digested(d) => Some(d),
            Self::Raw(_) => None,
        }
    }
}

/// OpenAlex API client
///
/// ```no_run
/// use oadigest_openalex::{ClientConfig, DigestOptions, OpenAlexClient, Query};
///
/// let client = OpenAlexClient::new(ClientConfig::default().with_mailto("me@example.org"))?;
/// let query = Query::new().filter("publication_year:2023").per_page(50);
/// for item in client.list_all_works(query, DigestOptions::DIGEST).with_max_records(200) {
///     println!("{}", serde_json::to_string(&item?)?);
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct OpenAlexClient<F: PageFetcher = HttpFetcher> {
    fetcher: F,
    config: ClientConfig,
}

impl OpenAlexClient<HttpFetcher> {
    /// Build a client talking HTTP to `config.base_url`
    ///
    /// Requests block the calling thread on a shared runtime. Call the
    /// client from plain threads (or `tokio::task::spawn_blocking`), never
    /// from inside an async task: nesting `block_on` panics.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        config.validate()?;
        let fetcher = HttpFetcher::new(&config)?;
        Ok(Self { fetcher, config })
    }
}

impl<F: PageFetcher> OpenAlexClient<F> {
    /// Build a client over any [`PageFetcher`]
    pub fn with_fetcher(fetcher: F, config: ClientConfig) -> Result<Self, ClientError> {
        config.validate()?;
        Ok(Self { fetcher, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    fn paginator(&self) -> Paginator<'_, F> {
        Paginator::new(&self.fetcher, self.config.default_per_page)
    }

    /// Fetch a single record by ID
    pub fn get(&self, entity: Entity, id: &str, options: DigestOptions) -> Result<Item, ClientError> {
        let record = self.fetcher.fetch_record(entity, id)?;
        Ok(Item::from_raw(record, entity, options))
    }

    /// Fetch one page
    pub fn list(
        &self,
        entity: Entity,
        query: &Query,
        options: DigestOptions,
    ) -> Result<PageResult<Item>, ClientError> {
        let page = self.paginator().fetch_page(entity, query)?;
        Ok(page.map(|record| Item::from_raw(record, entity, options)))
    }

    /// Lazily iterate over every matching record
    pub fn list_all(&self, entity: Entity, query: Query, options: DigestOptions) -> Items<'_, F> {
        Items {
            inner: self.paginator().fetch_all(entity, query),
            entity,
            options,
        }
    }

    /// Number of matching records, without fetching them
    pub fn get_total_count(&self, entity: Entity, filter: Option<&str>) -> Result<u64, ClientError> {
        count(&self.fetcher, entity, filter)
    }
}

/// Lazy item sequence returned by [`OpenAlexClient::list_all`]
pub struct Items<'a, F: PageFetcher> {
    inner: RecordIter<'a, F>,
    entity: Entity,
    options: DigestOptions,
}

impl<F: PageFetcher> Items<'_, F> {
    pub fn with_max_records(mut self, max: u64) -> Self {
        self.inner = self.inner.with_max_records(max);
        self
    }

    pub fn traversal(&self) -> Traversal {
        self.inner.traversal()
    }

    pub fn pages_fetched(&self) -> u64 {
        self.inner.pages_fetched()
    }

    pub fn records_yielded(&self) -> u64 {
        self.inner.records_yielded()
    }

    pub fn total_count(&self) -> Option<u64> {
        self.inner.total_count()
    }
}

impl<F: PageFetcher> Iterator for Items<'_, F> {
    type Item = Result<Item, ClientError>;

    fn next(&mut self) -> Option<Self::Item> {
        let (entity, options) = (self.entity, self.options);
        self.inner
            .next()
            .map(|r| r.map(|record| Item::from_raw(record, entity, options)))
    }
}

impl<F: PageFetcher> FusedIterator for Items<'_, F> {}

macro_rules! entity_methods {
    ($($entity:ident => $get:ident, $list:ident, $list_all:ident;)*) => {
        impl<F: PageFetcher> OpenAlexClient<F> {
            $(
                #[doc = concat!("Fetch one record from `/", stringify!($list), "`")]
                pub fn $get(&self, id: &str, options: DigestOptions) -> Result<Item, ClientError> {
                    self.get(Entity::$entity, id, options)
                }

                #[doc = concat!("Fetch one page of `/", stringify!($list), "`")]
                pub fn $list(
                    &self,
                    query: &Query,
                    options: DigestOptions,
                ) -> Result<PageResult<Item>, ClientError> {
                    self.list(Entity::$entity, query, options)
                }

                #[doc = concat!("Iterate over all matching `/", stringify!($list), "`")]
                pub fn $list_all(&self, query: Query, options: DigestOptions) -> Items<'_, F> {
                    self.list_all(Entity::$entity, query, options)
                }
            )*
        }
    };
}

entity_methods! {
    Works => get_work, list_works, list_all_works;
    Authors => get_author, list_authors, list_all_authors;
    Sources => get_source, list_sources, list_all_sources;
    Institutions => get_institution, list_institutions, list_all_institutions;
    Publishers => get_publisher, list_publishers, list_all_publishers;
    Topics => get_topic, list_topics, list_all_topics;
    Funders => get_funder, list_funders, list_all_funders;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedFetcher;
    use serde_json::json;

    fn client(responses: Vec<serde_json::Value>) -> OpenAlexClient<ScriptedFetcher> {
        OpenAlexClient::with_fetcher(ScriptedFetcher::new(responses), ClientConfig::default()).unwrap()
    }

    fn work() -> serde_json::Value {
        json!({
            "id": "https://openalex.org/W1",
            "title": "T",
            "open_access": {"is_oa": true},
            "abstract_inverted_index": {"Hi": [0]}
        })
    }

    #[test]
    fn get_raw_and_digested() {
        let c = client(vec![work(), work()]);
        let raw = c.get_work("W1", DigestOptions::RAW).unwrap();
        assert_eq!(raw.as_raw().unwrap().short_id(), Some("W1"));

        let digested = c.get_work("W1", DigestOptions::DIGEST_WITH_ABSTRACT).unwrap();
        let d = digested.as_digested().unwrap();
        assert_eq!(d.get_str("abstract"), Some("Hi"));
        assert!(d.contains("open_access_is_oa"));

        let requests = c.fetcher().requests();
        assert_eq!(requests[0].entity, Entity::Works);
        assert_eq!(requests[0].id.as_deref(), Some("W1"));
    }

    #[test]
    fn list_uses_configured_default_per_page() {
        let fetcher = ScriptedFetcher::new(vec![json!({"results": [work()], "meta": {"count": 1}})]);
        let c = OpenAlexClient::with_fetcher(fetcher, ClientConfig::default().with_default_per_page(25))
            .unwrap();
        let page = c.list_authors(&Query::new(), DigestOptions::DIGEST).unwrap();
        assert_eq!(page.count, 1);
        assert!(page.items[0].as_digested().is_some());
        assert_eq!(c.fetcher().requests()[0].param("per-page"), Some("25"));
        assert_eq!(c.fetcher().requests()[0].entity, Entity::Authors);
    }

    #[test]
    fn list_all_digests_each_item() {
        let c = client(vec![
            json!({"results": [work()], "meta": {"count": 2, "next_cursor": "c"}}),
            json!({"results": [work()], "meta": {"count": 2, "next_cursor": null}}),
        ]);
        let items: Vec<_> = c
            .list_all_works(Query::new(), DigestOptions::DIGEST)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| !i.as_digested().unwrap().contains("abstract")));
    }

    #[test]
    fn total_count() {
        let c = client(vec![json!({"results": [], "meta": {"count": 0}})]);
        assert_eq!(c.get_total_count(Entity::Funders, Some("country_code:zz")).unwrap(), 0);
    }

    #[test]
    fn invalid_config_rejected() {
        let result = OpenAlexClient::with_fetcher(
            ScriptedFetcher::new(vec![]),
            ClientConfig::default().with_default_per_page(0),
        );
        assert!(matches!(result, Err(ClientError::InvalidQuery(_))));
    }

    #[test]
    fn items_serialize_untagged() {
        let raw = Item::from_raw(RawRecord::from_value(work()).unwrap(), Entity::Works, DigestOptions::RAW);
        let value = serde_json::to_value(&raw).unwrap();
        assert_eq!(value["open_access"]["is_oa"], json!(true));

        let digested = Item::from_raw(RawRecord::from_value(work()).unwrap(), Entity::Works, DigestOptions::DIGEST);
        let value = serde_json::to_value(&digested).unwrap();
        assert_eq!(value["open_access_is_oa"], json!(true));
    }
}
