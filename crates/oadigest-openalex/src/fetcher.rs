//! Page fetching boundary
//!
//! Pagination and counting only see [`PageFetcher`]; the HTTP implementation
//! is one collaborator among others (tests use scripted in-memory fetchers).

use oadigest_core::{ClientError, HttpClient};

use crate::config::ClientConfig;
use crate::entity::Entity;
use crate::page::RawPage;
use crate::record::{RawRecord, short_id};

/// Performs one request and returns the undecoded payload
pub trait PageFetcher {
    /// `GET /{entity}?{params}`
    fn fetch_page(&self, entity: Entity, params: &[(&'static str, String)]) -> Result<RawPage, ClientError>;

    /// `GET /{entity}/{id}`
    fn fetch_record(&self, entity: Entity, id: &str) -> Result<RawRecord, ClientError>;
}

impl<F: PageFetcher + ?Sized> PageFetcher for &F {
    fn fetch_page(&self, entity: Entity, params: &[(&'static str, String)]) -> Result<RawPage, ClientError> {
        (**self).fetch_page(entity, params)
    }

    fn fetch_record(&self, entity: Entity, id: &str) -> Result<RawRecord, ClientError> {
        (**self).fetch_record(entity, id)
    }
}

/// [`PageFetcher`] over the OpenAlex REST API
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    http: HttpClient,
    base_url: String,
    mailto: Option<String>,
}

impl HttpFetcher {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        Ok(Self {
            http: HttpClient::new(config.http.clone())?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            mailto: config.mailto.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn entity_url(&self, entity: Entity) -> String {
        format!("{}/{}", self.base_url, entity.path())
    }

    /// Accepts short IDs ("W123"), full OpenAlex URLs, and external IDs
    /// such as "doi:10.1234/x" which are passed through as-is.
    fn record_url(&self, entity: Entity, id: &str) -> String {
        let id = match id.strip_prefix("https://openalex.org/") {
            Some(rest) => short_id(rest),
            None => id,
        };
        format!("{}/{id}", self.entity_url(entity))
    }

    fn with_mailto<'a>(&self, params: &[(&'a str, String)]) -> Vec<(&'a str, String)> {
        let mut all = params.to_vec();
        if let Some(mailto) = &self.mailto {
            all.push(("mailto", mailto.clone()));
        }
        all
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch_page(&self, entity: Entity, params: &[(&'static str, String)]) -> Result<RawPage, ClientError> {
        let url = self.entity_url(entity);
        let body = self.http.get_json(&url, &self.with_mailto(params))?;
        RawPage::from_json(body)
    }

    fn fetch_record(&self, entity: Entity, id: &str) -> Result<RawRecord, ClientError> {
        let url = self.record_url(entity, id);
        let body = self.http.get_json(&url, &self.with_mailto(&[]))?;
        RawRecord::from_value(body)
    }
}
