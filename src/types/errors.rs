use std::fmt;

// === StoreError ===

/// Errors related to the persisted app document store.
#[derive(Debug)]
pub enum StoreError {
    /// Document with the given ID was not found.
    NotFound(String),
    /// Database operation failed.
    DatabaseError(String),
    /// Failed to serialize or deserialize a document.
    SerializationError(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound(id) => write!(f, "Document not found: {}", id),
            StoreError::DatabaseError(msg) => write!(f, "Store database error: {}", msg),
            StoreError::SerializationError(msg) => {
                write!(f, "Document serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for StoreError {}

// === FetchError ===

/// Errors raised while obtaining a web app manifest for a page.
///
/// These mirror the abort conditions of the W3C "steps for obtaining a
/// manifest": <https://www.w3.org/TR/appmanifest/#obtaining>
#[derive(Debug)]
pub enum FetchError {
    /// The linking document has an opaque origin.
    OpaqueOrigin,
    /// The page declared no manifest link.
    NoManifestUrl,
    /// The manifest link's href is an empty string.
    EmptyManifestUrl,
    /// Resolving the manifest URL against the page URL failed.
    UrlResolution(String),
    /// The network request failed.
    Network(String),
    /// The server answered with a non-success status code.
    BadStatus(u16),
    /// The response body was not valid JSON.
    NotJson(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::OpaqueOrigin => write!(f, "Manifest linked from opaque origin"),
            FetchError::NoManifestUrl => write!(f, "No manifest URL"),
            FetchError::EmptyManifestUrl => write!(f, "Manifest URL is an empty string"),
            FetchError::UrlResolution(msg) => {
                write!(f, "Parsing manifest URL resolved against page URL failed: {}", msg)
            }
            FetchError::Network(msg) => write!(f, "Manifest fetch network error: {}", msg),
            FetchError::BadStatus(code) => {
                write!(f, "Manifest fetch returned status {}", code)
            }
            FetchError::NotJson(msg) => write!(f, "Manifest response was not JSON: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {}

// === InstallError ===

/// Errors related to installing a web app from a browsing tab.
#[derive(Debug)]
pub enum InstallError {
    /// The window or tab the install was requested for no longer exists.
    TabNotFound,
    /// Obtaining or parsing the manifest failed.
    Fetch(FetchError),
    /// Persisting the installed app failed.
    Store(StoreError),
}

impl fmt::Display for InstallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstallError::TabNotFound => write!(f, "Tab not found"),
            InstallError::Fetch(e) => write!(f, "App install fetch failed: {}", e),
            InstallError::Store(e) => write!(f, "App install store failed: {}", e),
        }
    }
}

impl std::error::Error for InstallError {}

impl From<FetchError> for InstallError {
    fn from(e: FetchError) -> Self {
        InstallError::Fetch(e)
    }
}

impl From<StoreError> for InstallError {
    fn from(e: StoreError) -> Self {
        InstallError::Store(e)
    }
}
