//! Resource module for Campus Content
//!
//! Describes what to fetch and how to ingest it:
//! - Endpoint templates and URL construction
//! - Envelope normalization
//! - Declarative field aliases
//! - The fetcher trait and its HTTP implementation

pub mod alias;
pub mod envelope;
pub mod fetcher;
pub mod template;

pub use alias::FieldAliases;
pub use envelope::{normalize, EnvelopeShape};
pub use fetcher::{ingest, HttpFetcher, ResourceFetcher};
pub use template::EndpointTemplate;

use crate::error::{FetchError, FetchResult};
use crate::i18n::Locale;
use reqwest::Url;
use std::collections::BTreeMap;

/// Decoded, unwrapped backend content
pub type Payload = serde_json::Value;

/// Query parameter carrying the locale; differs between backend apps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LocaleParam {
    #[default]
    Lang,
    Language,
    Locale,
}

impl LocaleParam {
    pub fn name(&self) -> &'static str {
        match self {
            LocaleParam::Lang => "lang",
            LocaleParam::Language => "language",
            LocaleParam::Locale => "locale",
        }
    }
}

/// One localized resource request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRequest {
    /// Path template relative to the backend base URL
    pub endpoint: EndpointTemplate,

    /// Requested content language
    pub locale: Locale,

    /// Name of the locale query parameter
    pub locale_param: LocaleParam,

    /// Placeholder values and extra query parameters
    pub params: BTreeMap<String, String>,

    /// Envelope key specific to this resource, e.g. `news`
    pub domain_key: Option<String>,

    /// Field aliases applied at ingestion
    pub aliases: FieldAliases,
}

impl ResourceRequest {
    pub fn new(endpoint: impl Into<EndpointTemplate>, locale: Locale) -> Self {
        Self {
            endpoint: endpoint.into(),
            locale,
            locale_param: LocaleParam::default(),
            params: BTreeMap::new(),
            domain_key: None,
            aliases: FieldAliases::default(),
        }
    }

    pub fn with_locale_param(mut self, param: LocaleParam) -> Self {
        self.locale_param = param;
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn with_domain_key(mut self, key: impl Into<String>) -> Self {
        self.domain_key = Some(key.into());
        self
    }

    pub fn with_aliases(mut self, aliases: FieldAliases) -> Self {
        self.aliases = aliases;
        self
    }

    /// Build the request URL.
    ///
    /// Params not consumed by the path follow in key order, then the locale,
    /// so equal requests always produce equal URLs.
    pub fn url(&self, base_url: &str) -> FetchResult<Url> {
        let (path, used) = self.endpoint.expand(&self.params)?;
        let base = base_url.trim().trim_end_matches('/');
        let joined = if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        };

        let mut url = Url::parse(&joined)
            .map_err(|e| FetchError::InvalidRequest(format!("{}: {}", joined, e)))?;

        {
            let mut query = url.query_pairs_mut();
            for (key, value) in self.params.iter().filter(|(k, _)| !used.contains(*k)) {
                if key != self.locale_param.name() {
                    query.append_pair(key, value);
                }
            }
            query.append_pair(self.locale_param.name(), self.locale.code());
        }

        Ok(url)
    }

    /// Key identifying the response this request yields
    pub fn cache_key(&self, base_url: &str) -> FetchResult<String> {
        self.url(base_url).map(String::from)
    }
}
