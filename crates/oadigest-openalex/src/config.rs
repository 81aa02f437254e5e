//! Client configuration

use oadigest_core::{ClientError, HttpConfig};

use crate::query::PER_PAGE_MAX;

/// Public OpenAlex REST endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.openalex.org";

/// Page size used when a query does not set one
pub const DEFAULT_PER_PAGE: u32 = 10;

/// Immutable client configuration, fixed at construction
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// API root, without trailing slash
    pub base_url: String,
    /// Contact email sent as `mailto` (OpenAlex "polite pool")
    pub mailto: Option<String>,
    /// Page size for queries that leave `per_page` unset
    pub default_per_page: u32,
    pub http: HttpConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            mailto: None,
            default_per_page: DEFAULT_PER_PAGE,
            http: HttpConfig::default(),
        }
    }
}

impl ClientConfig {
    pub fn with_mailto(mut self, email: impl Into<String>) -> Self {
        self.mailto = Some(email.into());
        self
    }

    pub fn with_default_per_page(mut self, per_page: u32) -> Self {
        self.default_per_page = per_page;
        self
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        if !(1..=PER_PAGE_MAX).contains(&self.default_per_page) {
            return Err(ClientError::InvalidQuery(format!(
                "default_per_page must be in 1..={PER_PAGE_MAX}, got {}",
                self.default_per_page
            )));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ClientError::InvalidQuery(format!(
                "base_url must be an http(s) URL, got {:?}",
                self.base_url
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "https://api.openalex.org");
        assert_eq!(config.default_per_page, 10);
        assert!(config.mailto.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builder_methods() {
        let config = ClientConfig::default()
            .with_mailto("me@example.org")
            .with_default_per_page(200);
        assert_eq!(config.mailto.as_deref(), Some("me@example.org"));
        assert_eq!(config.default_per_page, 200);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn per_page_out_of_range_rejected() {
        let config = ClientConfig::default().with_default_per_page(201);
        assert!(matches!(
            config.validate(),
            Err(ClientError::InvalidQuery(_))
        ));
        let config = ClientConfig::default().with_default_per_page(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn non_http_base_url_rejected() {
        let config = ClientConfig {
            base_url: "api.openalex.org".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
