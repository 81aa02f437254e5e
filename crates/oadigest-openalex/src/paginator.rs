//! Single-page and exhaustive traversal over a [`PageFetcher`]
//!
//! Exhaustive traversal is lazy: a page is requested only when the records
//! of the previous one have been consumed. Cursor mode follows
//! `meta.next_cursor` from the immediately preceding response and never
//! fabricates one. Offset mode increments `page` until the reported count is
//! covered.

use std::collections::VecDeque;
use std::iter::FusedIterator;

use oadigest_core::ClientError;

use crate::entity::Entity;
use crate::fetcher::PageFetcher;
use crate::page::{Meta, PageResult};
use crate::query::{Query, START_CURSOR, Traversal};
use crate::record::RawRecord;

/// Drives a [`PageFetcher`] with a default page size
pub struct Paginator<'a, F: PageFetcher + ?Sized> {
    fetcher: &'a F,
    default_per_page: u32,
}

impl<'a, F: PageFetcher + ?Sized> Paginator<'a, F> {
    pub fn new(fetcher: &'a F, default_per_page: u32) -> Self {
        Self { fetcher, default_per_page }
    }

    /// Fetch exactly one page as described by `query`
    pub fn fetch_page(&self, entity: Entity, query: &Query) -> Result<PageResult<RawRecord>, ClientError> {
        let params = query.to_params(self.default_per_page)?;
        let page = self.fetcher.fetch_page(entity, &params)?;
        Ok(page.into_result())
    }

    /// Lazily yield every record matching `query`.
    ///
    /// Cursor traversal unless the query carries a page number and no
    /// cursor. The first error is yielded once and ends the iteration.
    pub fn fetch_all(&self, entity: Entity, mut query: Query) -> RecordIter<'a, F> {
        let traversal = query.traversal();
        if traversal == Traversal::Cursor {
            query.page = None;
            if query.cursor.is_none() {
                query.cursor = Some(START_CURSOR.to_string());
            }
        }
        RecordIter {
            fetcher: self.fetcher,
            entity,
            query,
            traversal,
            default_per_page: self.default_per_page,
            buffer: VecDeque::new(),
            exhausted: false,
            max_records: None,
            pages_fetched: 0,
            records_yielded: 0,
            total_count: None,
        }
    }
}

/// Lazy record sequence produced by [`Paginator::fetch_all`]
pub struct RecordIter<'a, F: PageFetcher + ?Sized> {
    fetcher: &'a F,
    entity: Entity,
    /// Request for the next page
    query: Query,
    traversal: Traversal,
    default_per_page: u32,
    buffer: VecDeque<RawRecord>,
    /// No further fetches will be issued
    exhausted: bool,
    max_records: Option<u64>,
    pages_fetched: u64,
    records_yielded: u64,
    total_count: Option<u64>,
}

impl<F: PageFetcher + ?Sized> RecordIter<'_, F> {
    /// Stop after `max` records without fetching beyond the page that reaches it
    pub fn with_max_records(mut self, max: u64) -> Self {
        self.max_records = Some(max);
        self
    }

    pub fn traversal(&self) -> Traversal {
        self.traversal
    }

    pub fn pages_fetched(&self) -> u64 {
        self.pages_fetched
    }

    pub fn records_yielded(&self) -> u64 {
        self.records_yielded
    }

    /// `meta.count` of the most recent page, once one has been fetched
    pub fn total_count(&self) -> Option<u64> {
        self.total_count
    }

    fn limit_reached(&self) -> bool {
        self.max_records.is_some_and(|max| self.records_yielded >= max)
    }

    fn fetch_next_page(&mut self) -> Result<(), ClientError> {
        let params = self.query.to_params(self.default_per_page)?;
        let page = self.fetcher.fetch_page(self.entity, &params)?;
        self.pages_fetched += 1;
        self.total_count = Some(page.meta.count);

        let received = page.results.len();
        if received == 0 {
            self.exhausted = true;
        } else {
            self.advance(&page.meta);
        }
        self.buffer.extend(page.results);

        log::debug!(
            "{}: page {} ({} records, {} of {} so far)",
            self.entity,
            self.pages_fetched,
            received,
            self.records_yielded + self.buffer.len() as u64,
            self.total_count.unwrap_or_default(),
        );
        Ok(())
    }

    /// Move the request to the next page, or mark the traversal finished
    fn advance(&mut self, meta: &Meta) {
        match self.traversal {
            Traversal::Cursor => match meta.next_cursor() {
                Some(cursor) => self.query.cursor = Some(cursor.to_string()),
                None => self.exhausted = true,
            },
            Traversal::Offset => {
                let page = self.query.page.unwrap_or(1);
                let per_page = self.query.effective_per_page(self.default_per_page);
                if u64::from(page) * u64::from(per_page) >= meta.count {
                    self.exhausted = true;
                } else {
                    self.query.page = Some(page + 1);
                }
            }
        }
    }
}

impl<F: PageFetcher + ?Sized> Iterator for RecordIter<'_, F> {
    type Item = Result<RawRecord, ClientError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.limit_reached() {
                self.exhausted = true;
                self.buffer.clear();
                return None;
            }
            if let Some(record) = self.buffer.pop_front() {
                self.records_yielded += 1;
                return Some(Ok(record));
            }
            if self.exhausted {
                return None;
            }
            if let Err(e) = self.fetch_next_page() {
                self.exhausted = true;
                return Some(Err(e));
            }
        }
    }
}

impl<F: PageFetcher + ?Sized> FusedIterator for RecordIter<'_, F> {}
