//! Web app manifest processing.
//!
//! Transforms raw manifest JSON into a [`CanonicalManifest`] following the
//! algorithm defined in <https://www.w3.org/TR/appmanifest/#processing>.
//!
//! Processing is pure data transformation: no I/O, deterministic for a
//! given raw manifest, manifest URL and document URL. Malformed input is
//! always recovered with a documented fallback and a diagnostic — parsing
//! never fails.

use std::collections::BTreeSet;

use serde_json::Value;
use tracing::warn;
use url::Url;

use crate::types::manifest::{CanonicalManifest, DisplayMode, Icon, IconPurpose};

/// Parse a web app manifest.
///
/// * `raw` — manifest JSON as fetched from the server.
/// * `manifest_url` — URL the manifest was fetched from (base for icon and
///   start URL resolution).
/// * `document_url` — URL of the document the manifest was linked from
///   (fallback start URL and same-origin reference).
pub fn parse(raw: &Value, manifest_url: &Url, document_url: &Url) -> CanonicalManifest {
    // "If Type(json) is not Object... set json to the result of parsing '{}'."
    let empty = Value::Object(serde_json::Map::new());
    let raw = if raw.is_object() {
        raw
    } else {
        warn!("web app manifest should be an object");
        &empty
    };

    CanonicalManifest {
        name: string_member(raw, "name"),
        short_name: string_member(raw, "short_name"),
        start_url: process_start_url(raw.get("start_url"), manifest_url, document_url),
        icons: process_image_resources(raw.get("icons"), manifest_url),
        display: process_display(raw.get("display")),
        // No processing steps are defined for theme_color; captured when a
        // string, like the type member of an icon.
        theme_color: string_member(raw, "theme_color"),
        background_color: string_member(raw, "background_color"),
        scope: string_member(raw, "scope"),
    }
}

fn string_member(raw: &Value, key: &str) -> Option<String> {
    raw.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Process the start_url member.
///
/// <https://www.w3.org/TR/appmanifest/#start_url-member>
fn process_start_url(value: Option<&Value>, manifest_url: &Url, document_url: &Url) -> Url {
    // "If value is the empty string, return document URL."
    let value = match value.and_then(Value::as_str) {
        Some(v) if !v.is_empty() => v,
        _ => return document_url.clone(),
    };

    // "Let start URL be the result of parsing value, using manifest URL as
    // the base URL."
    let start_url = match manifest_url.join(value) {
        Ok(url) => url,
        Err(_) => {
            // "If start URL is failure, return document URL."
            warn!(value, "failed to resolve start URL of manifest, using document URL");
            return document_url.clone();
        }
    };

    // "If start URL is not same origin as document URL, return document URL."
    if start_url.origin() != document_url.origin() {
        warn!("start URL of manifest needs to be same origin as document");
        document_url.clone()
    } else {
        start_url
    }
}

/// Process an array of image resources (e.g. a list of icons).
///
/// <https://www.w3.org/TR/appmanifest/#dfn-processing-imageresource-members>
fn process_image_resources(value: Option<&Value>, manifest_url: &Url) -> Vec<Icon> {
    let entries = match value.and_then(Value::as_array) {
        Some(entries) => entries,
        None => return Vec::new(),
    };

    let mut icons = Vec::new();
    for entry in entries {
        // "If entry['src'] is not undefined:"
        if entry.get("src").is_none() {
            continue;
        }
        // An icon without a resolvable source is of no use to anyone.
        let src = match process_src(entry, manifest_url) {
            Some(src) => src,
            None => continue,
        };
        icons.push(Icon {
            src,
            mime_type: process_type(entry),
            sizes: process_sizes(entry),
            purpose: process_purpose(entry),
        });
    }
    icons
}

/// Process the src member of an image resource.
///
/// <https://www.w3.org/TR/appmanifest/#dfn-processing-the-src-member-of-an-image>
fn process_src(entry: &Value, manifest_url: &Url) -> Option<Url> {
    let value = entry.get("src").and_then(Value::as_str)?;
    if value.is_empty() {
        return None;
    }
    // "Parse value using manifest URL as the base URL and return the result."
    manifest_url.join(value).ok()
}

/// Process the type member of an image resource.
///
/// <https://www.w3.org/TR/appmanifest/#dfn-processing-the-type-member-of-an-image>
fn process_type(entry: &Value) -> Option<String> {
    let value = entry.get("type").and_then(Value::as_str)?;
    if value.is_empty() {
        return None;
    }
    // TODO: Filter out invalid or unsupported MIME types
    Some(value.to_string())
}

/// Process the sizes member of an image resource.
///
/// <https://www.w3.org/TR/appmanifest/#dfn-processing-the-sizes-member-of-an-image>
fn process_sizes(entry: &Value) -> Option<BTreeSet<String>> {
    let value = entry.get("sizes").and_then(Value::as_str)?;
    if value.is_empty() {
        return None;
    }
    // "Parse value as if it was a [HTML] sizes attribute": split on
    // whitespace, lowercase each keyword.
    Some(
        value
            .split_whitespace()
            .map(str::to_lowercase)
            .collect(),
    )
}

/// Process the purpose member of an image resource.
///
/// <https://www.w3.org/TR/appmanifest/#dfn-processing-the-purpose-member-of-an-image>
///
/// Returns `Some({any})` when the member is absent or blank, the validated
/// set when at least one keyword survives, and `None` ("unset") when every
/// keyword was invalid.
fn process_purpose(entry: &Value) -> Option<BTreeSet<IconPurpose>> {
    // "If Type(image['purpose']) is not String, or consists solely of
    // ASCII whitespace, return the set « 'any' »."
    let value = match entry.get("purpose").and_then(Value::as_str) {
        Some(v) if !v.trim().is_empty() => v,
        _ => return Some(Icon::default_purpose()),
    };

    let mut purposes = BTreeSet::new();
    for keyword in value.split_whitespace() {
        let canonical = keyword.to_lowercase();
        match IconPurpose::parse(&canonical) {
            Some(purpose) => {
                // "If purposes contains keyword, issue a developer warning
                // and continue."
                if !purposes.insert(purpose) {
                    warn!(keyword = %canonical, "duplicate icon purpose");
                }
            }
            None => warn!(keyword = %canonical, "invalid icon purpose"),
        }
    }

    // "If purposes is empty, then return failure."
    if purposes.is_empty() {
        None
    } else {
        Some(purposes)
    }
}

/// Process the display member.
///
/// Validates against the closed display-mode vocabulary; anything else
/// resolves to `None`.
fn process_display(value: Option<&Value>) -> Option<DisplayMode> {
    let value = value.and_then(Value::as_str)?;
    let display = DisplayMode::parse(value);
    if display.is_none() {
        warn!(value, "invalid display mode");
    }
    display
}
