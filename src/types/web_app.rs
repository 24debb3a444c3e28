use serde::{Deserialize, Serialize};
use url::Url;

use crate::services::icon_selector;
use crate::types::manifest::{CanonicalManifest, DisplayMode, Icon};

/// A pinned web app or site and its metadata.
///
/// Doubles as the persisted document format: the struct serializes directly
/// into the app store and deserializes back without loss.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebApp {
    id: String,
    pub name: Option<String>,
    pub short_name: Option<String>,
    pub start_url: Url,
    pub display: Option<DisplayMode>,
    pub theme_color: Option<String>,
    pub background_color: Option<String>,
    pub scope: Option<String>,
    pub icons: Vec<Icon>,
    /// Opaque frequency+recency ordering key used by the home screen.
    #[serde(default)]
    pub frecency: f64,
}

impl WebApp {
    /// Builds a web app from a processed manifest.
    pub fn from_manifest(manifest: CanonicalManifest) -> Self {
        let id = Self::derive_id(&manifest.start_url, manifest.scope.as_deref());
        Self {
            id,
            name: manifest.name,
            short_name: manifest.short_name,
            start_url: manifest.start_url,
            display: manifest.display,
            theme_color: manifest.theme_color,
            background_color: manifest.background_color,
            scope: manifest.scope,
            icons: manifest.icons,
            frecency: 0.0,
        }
    }

    /// Derives the stable app identity: the start URL's hostname, with the
    /// scope path appended when the manifest declares one.
    ///
    /// The derivation is deterministic so the identity survives manifest
    /// re-fetches and persistence round trips unchanged.
    pub fn derive_id(start_url: &Url, scope: Option<&str>) -> String {
        let hostname = start_url.host_str().unwrap_or("");
        match scope {
            Some(scope) => format!("{}{}", hostname, scope),
            None => hostname.to_string(),
        }
    }

    /// The stable identity used as persistence and registry key.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The shortest name of the app: short name, falling back to name.
    pub fn shortest_name(&self) -> Option<&str> {
        self.short_name.as_deref().or(self.name.as_deref())
    }

    /// The best available icon for the given target size in pixels.
    pub fn best_icon_url(&self, target_size: u32) -> Option<Url> {
        icon_selector::select_best_icon(&self.icons, target_size)
    }
}
