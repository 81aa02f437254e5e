//! Total match count without fetching results

use oadigest_core::ClientError;

use crate::entity::Entity;
use crate::fetcher::PageFetcher;
use crate::query::Query;

/// Number of `entity` records matching `filter`.
///
/// Requests a single-item page and reads `meta.count`.
pub fn count<F: PageFetcher + ?Sized>(
    fetcher: &F,
    entity: Entity,
    filter: Option<&str>,
) -> Result<u64, ClientError> {
    let mut query = Query::new().per_page(1);
    query.filter = filter.map(str::to_string);
    let page = fetcher.fetch_page(entity, &query.to_params(1)?)?;
    log::debug!("{entity}: {} matches", page.meta.count);
    Ok(page.meta.count)
}
