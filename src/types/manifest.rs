use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use url::Url;

/// Display mode declared by a web app manifest.
///
/// One of the four values defined in
/// <https://www.w3.org/TR/appmanifest/#dom-displaymodetype>.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayMode {
    Fullscreen,
    Standalone,
    MinimalUi,
    Browser,
}

impl DisplayMode {
    /// Parses a display mode string, returning `None` for anything outside
    /// the closed vocabulary.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "fullscreen" => Some(DisplayMode::Fullscreen),
            "standalone" => Some(DisplayMode::Standalone),
            "minimal-ui" => Some(DisplayMode::MinimalUi),
            "browser" => Some(DisplayMode::Browser),
            _ => None,
        }
    }

    /// The literal string form used in manifests.
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayMode::Fullscreen => "fullscreen",
            DisplayMode::Standalone => "standalone",
            DisplayMode::MinimalUi => "minimal-ui",
            DisplayMode::Browser => "browser",
        }
    }
}

/// Purpose tags an icon may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconPurpose {
    Monochrome,
    Maskable,
    Any,
}

impl IconPurpose {
    /// Parses a purpose keyword, returning `None` for anything outside the
    /// closed vocabulary.
    pub fn parse(keyword: &str) -> Option<Self> {
        match keyword {
            "monochrome" => Some(IconPurpose::Monochrome),
            "maskable" => Some(IconPurpose::Maskable),
            "any" => Some(IconPurpose::Any),
            _ => None,
        }
    }
}

/// A processed image resource from a manifest `icons` array.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Icon {
    /// Resolved absolute source URL.
    pub src: Url,
    /// MIME type, captured verbatim when the manifest provided a string.
    pub mime_type: Option<String>,
    /// Lowercased size tokens such as `"32x32"` or `"any"`.
    /// `None` when the manifest's sizes member was not a string.
    pub sizes: Option<BTreeSet<String>>,
    /// Validated purpose tags. `None` when every declared token was
    /// invalid, which is distinct from the `{any}` default used when the
    /// member was absent or blank.
    pub purpose: Option<BTreeSet<IconPurpose>>,
}

impl Icon {
    /// The default purpose set used when the manifest declares none.
    pub fn default_purpose() -> BTreeSet<IconPurpose> {
        let mut set = BTreeSet::new();
        set.insert(IconPurpose::Any);
        set
    }
}

/// Canonical dictionary produced by processing a raw web app manifest.
///
/// All URLs are resolved to absolute form and all fields are validated;
/// consumers never need to re-check them against the raw JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalManifest {
    pub name: Option<String>,
    pub short_name: Option<String>,
    /// Always present: falls back to the linking document's URL.
    pub start_url: Url,
    pub icons: Vec<Icon>,
    pub display: Option<DisplayMode>,
    pub theme_color: Option<String>,
    pub background_color: Option<String>,
    /// Raw scope path as declared; combined with the start URL's hostname
    /// to form a stable app identity.
    pub scope: Option<String>,
}
