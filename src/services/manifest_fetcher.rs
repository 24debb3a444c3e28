//! Manifest fetching.
//!
//! Implements the request-building half of the W3C "steps for obtaining a
//! manifest" (<https://www.w3.org/TR/appmanifest/#obtaining>) and an HTTP
//! fetcher executing the built request. Request building is pure and fully
//! covered by tests; the network half is behind [`ManifestFetcherTrait`]
//! so callers can substitute it.

use serde_json::Value;
use url::{Origin, Url};

use crate::types::errors::FetchError;

/// Credentials mode for the manifest request, derived from the manifest
/// link's `crossorigin` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialsMode {
    Include,
    Omit,
}

impl CredentialsMode {
    /// "If the manifest link's crossOrigin attribute's value is
    /// 'use-credentials', then set request's credentials mode to
    /// 'include'. Otherwise, set it to 'omit'."
    pub fn from_cross_origin(attribute: Option<&str>) -> Self {
        if attribute == Some("use-credentials") {
            CredentialsMode::Include
        } else {
            CredentialsMode::Omit
        }
    }
}

/// A fully resolved manifest request, ready to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestRequest {
    pub url: Url,
    pub credentials: CredentialsMode,
}

/// Build the manifest request for a page.
///
/// * `page_url` — URL of the document linking the manifest.
/// * `manifest_href` — href of the detected manifest link, if any.
/// * `cross_origin` — the link's `crossorigin` attribute, if any.
///
/// Must run before the request executes, since the credentials mode is
/// fixed here. Every rejection carries a diagnostic; none is retried.
pub fn build_request(
    page_url: &str,
    manifest_href: Option<&str>,
    cross_origin: Option<&str>,
) -> Result<ManifestRequest, FetchError> {
    // "Let origin be the Document's origin. If origin is an opaque
    // origin, terminate this algorithm."
    let page = Url::parse(page_url).map_err(|e| FetchError::UrlResolution(e.to_string()))?;
    if matches!(page.origin(), Origin::Opaque(_)) {
        return Err(FetchError::OpaqueOrigin);
    }

    // "If manifest link is null, terminate this algorithm."
    let href = manifest_href.ok_or(FetchError::NoManifestUrl)?;
    // "If manifest link's href attribute's value is the empty string,
    // then abort these steps."
    if href.is_empty() {
        return Err(FetchError::EmptyManifestUrl);
    }

    // "Let manifest URL be the result of parsing the value of the href
    // attribute, relative to the element's base URL. If parsing fails,
    // then abort these steps."
    let url = page
        .join(href)
        .map_err(|e| FetchError::UrlResolution(e.to_string()))?;

    Ok(ManifestRequest {
        url,
        credentials: CredentialsMode::from_cross_origin(cross_origin),
    })
}

/// Trait defining the manifest fetch operation.
pub trait ManifestFetcherTrait {
    /// Execute the request and return the parsed manifest JSON.
    fn fetch(&self, request: &ManifestRequest) -> Result<Value, FetchError>;
}

/// HTTP manifest fetcher backed by reqwest.
///
/// Credentials mode `include` routes through a client with a cookie store;
/// `omit` uses a bare client that never sends credentials.
pub struct HttpManifestFetcher {
    with_credentials: reqwest::blocking::Client,
    without_credentials: reqwest::blocking::Client,
}

impl HttpManifestFetcher {
    pub fn new() -> Self {
        Self {
            with_credentials: reqwest::blocking::Client::builder()
                .cookie_store(true)
                .build()
                .unwrap_or_else(|_| reqwest::blocking::Client::new()),
            without_credentials: reqwest::blocking::Client::new(),
        }
    }
}

impl Default for HttpManifestFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ManifestFetcherTrait for HttpManifestFetcher {
    fn fetch(&self, request: &ManifestRequest) -> Result<Value, FetchError> {
        let client = match request.credentials {
            CredentialsMode::Include => &self.with_credentials,
            CredentialsMode::Omit => &self.without_credentials,
        };

        let response = client
            .get(request.url.clone())
            .send()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::BadStatus(status.as_u16()));
        }

        response
            .json::<Value>()
            .map_err(|e| FetchError::NotJson(e.to_string()))
    }
}
