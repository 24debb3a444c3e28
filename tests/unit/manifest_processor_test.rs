//! Unit tests for manifest processing.
//!
//! Processing must never fail: malformed input always degrades to a
//! documented fallback value.

use std::collections::BTreeSet;

use serde_json::json;
use url::Url;
use webshell::services::manifest_processor::parse;
use webshell::types::manifest::{DisplayMode, Icon, IconPurpose};

fn manifest_url() -> Url {
    Url::parse("https://example.com/app/manifest.json").unwrap()
}

fn document_url() -> Url {
    Url::parse("https://example.com/index.html").unwrap()
}

// ─── Non-object input ───

#[test]
fn test_non_object_manifest_treated_as_empty() {
    for raw in [json!(null), json!("manifest"), json!(42), json!([1, 2])] {
        let manifest = parse(&raw, &manifest_url(), &document_url());
        assert_eq!(manifest.name, None);
        assert_eq!(manifest.short_name, None);
        assert!(manifest.icons.is_empty());
        assert_eq!(manifest.display, None);
        // Even an empty manifest has a start URL: the document's.
        assert_eq!(manifest.start_url, document_url());
    }
}

// ─── start_url ───

#[test]
fn test_missing_start_url_falls_back_to_document_url() {
    let manifest = parse(&json!({}), &manifest_url(), &document_url());
    assert_eq!(manifest.start_url, document_url());
}

#[test]
fn test_empty_start_url_falls_back_to_document_url() {
    let raw = json!({ "start_url": "" });
    let manifest = parse(&raw, &manifest_url(), &document_url());
    assert_eq!(manifest.start_url, document_url());
}

#[test]
fn test_non_string_start_url_falls_back_to_document_url() {
    let raw = json!({ "start_url": 7 });
    let manifest = parse(&raw, &manifest_url(), &document_url());
    assert_eq!(manifest.start_url, document_url());
}

#[test]
fn test_relative_start_url_resolved_against_manifest_url() {
    let raw = json!({ "start_url": "../home" });
    let manifest = parse(&raw, &manifest_url(), &document_url());
    assert_eq!(manifest.start_url.as_str(), "https://example.com/home");
}

#[test]
fn test_absolute_same_origin_start_url_kept() {
    let raw = json!({ "start_url": "https://example.com/start" });
    let manifest = parse(&raw, &manifest_url(), &document_url());
    assert_eq!(manifest.start_url.as_str(), "https://example.com/start");
}

#[test]
fn test_cross_origin_start_url_falls_back_to_document_url() {
    // A manifest can never redirect start to a foreign origin.
    let raw = json!({ "start_url": "https://evil.example.net/start" });
    let manifest = parse(&raw, &manifest_url(), &document_url());
    assert_eq!(manifest.start_url, document_url());
}

#[test]
fn test_start_url_origin_check_includes_scheme_and_port() {
    let raw = json!({ "start_url": "http://example.com/start" });
    let manifest = parse(&raw, &manifest_url(), &document_url());
    assert_eq!(manifest.start_url, document_url());

    let raw = json!({ "start_url": "https://example.com:8443/start" });
    let manifest = parse(&raw, &manifest_url(), &document_url());
    assert_eq!(manifest.start_url, document_url());
}

// ─── icons ───

fn icons_of(raw: serde_json::Value) -> Vec<Icon> {
    parse(&raw, &manifest_url(), &document_url()).icons
}

#[test]
fn test_icons_member_absent_or_not_array_yields_empty_list() {
    assert!(icons_of(json!({})).is_empty());
    assert!(icons_of(json!({ "icons": "nope" })).is_empty());
    assert!(icons_of(json!({ "icons": {} })).is_empty());
}

#[test]
fn test_icon_without_src_dropped() {
    let icons = icons_of(json!({ "icons": [
        { "sizes": "32x32" },
        { "src": "ok.png" }
    ]}));
    assert_eq!(icons.len(), 1);
    assert_eq!(icons[0].src.as_str(), "https://example.com/app/ok.png");
}

#[test]
fn test_icon_with_empty_or_non_string_src_dropped() {
    let icons = icons_of(json!({ "icons": [
        { "src": "" },
        { "src": 9 }
    ]}));
    assert!(icons.is_empty());
}

#[test]
fn test_icon_src_resolved_against_manifest_url() {
    let icons = icons_of(json!({ "icons": [
        { "src": "icons/a.png" },
        { "src": "/b.png" },
        { "src": "https://cdn.example.org/c.png" }
    ]}));
    assert_eq!(icons[0].src.as_str(), "https://example.com/app/icons/a.png");
    assert_eq!(icons[1].src.as_str(), "https://example.com/b.png");
    // Icon sources may live on a foreign origin; only start_url is pinned.
    assert_eq!(icons[2].src.as_str(), "https://cdn.example.org/c.png");
}

#[test]
fn test_icon_type_captured_only_when_string() {
    let icons = icons_of(json!({ "icons": [
        { "src": "a.png", "type": "image/png" },
        { "src": "b.png", "type": 5 },
        { "src": "c.png" }
    ]}));
    assert_eq!(icons[0].mime_type.as_deref(), Some("image/png"));
    assert_eq!(icons[1].mime_type, None);
    assert_eq!(icons[2].mime_type, None);
}

#[test]
fn test_icon_sizes_split_and_lowercased() {
    let icons = icons_of(json!({ "icons": [
        { "src": "a.png", "sizes": "32X32  64x64 ANY" }
    ]}));
    let expected: BTreeSet<String> = ["32x32", "64x64", "any"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(icons[0].sizes.as_ref(), Some(&expected));
}

#[test]
fn test_icon_sizes_unset_when_not_a_string() {
    let icons = icons_of(json!({ "icons": [
        { "src": "a.png", "sizes": 32 },
        { "src": "b.png" }
    ]}));
    assert_eq!(icons[0].sizes, None);
    assert_eq!(icons[1].sizes, None);
}

#[test]
fn test_icon_purpose_defaults_to_any_when_absent_or_blank() {
    let icons = icons_of(json!({ "icons": [
        { "src": "a.png" },
        { "src": "b.png", "purpose": "   " },
        { "src": "c.png", "purpose": 3 }
    ]}));
    for icon in &icons {
        assert_eq!(icon.purpose.as_ref(), Some(&Icon::default_purpose()));
    }
}

#[test]
fn test_icon_purpose_validated_lowercased_and_deduplicated() {
    let icons = icons_of(json!({ "icons": [
        { "src": "a.png", "purpose": "MASKABLE monochrome maskable" }
    ]}));
    let purpose = icons[0].purpose.as_ref().unwrap();
    assert_eq!(purpose.len(), 2);
    assert!(purpose.contains(&IconPurpose::Maskable));
    assert!(purpose.contains(&IconPurpose::Monochrome));
}

#[test]
fn test_icon_purpose_invalid_tokens_discarded_not_fatal() {
    let icons = icons_of(json!({ "icons": [
        { "src": "a.png", "purpose": "badge any" }
    ]}));
    let purpose = icons[0].purpose.as_ref().unwrap();
    assert_eq!(purpose.len(), 1);
    assert!(purpose.contains(&IconPurpose::Any));
}

#[test]
fn test_icon_purpose_all_invalid_resolves_to_unset() {
    // Distinct from the {any} default: the author declared a purpose and
    // every token was garbage.
    let icons = icons_of(json!({ "icons": [
        { "src": "a.png", "purpose": "sparkle shine" }
    ]}));
    assert_eq!(icons[0].purpose, None);
}

// ─── display ───

#[test]
fn test_display_known_values_pass_through() {
    let cases = [
        ("fullscreen", DisplayMode::Fullscreen),
        ("standalone", DisplayMode::Standalone),
        ("minimal-ui", DisplayMode::MinimalUi),
        ("browser", DisplayMode::Browser),
    ];
    for (value, expected) in cases {
        let raw = json!({ "display": value });
        let manifest = parse(&raw, &manifest_url(), &document_url());
        assert_eq!(manifest.display, Some(expected), "display {value}");
    }
}

#[test]
fn test_display_garbage_rejected_not_passed_through() {
    // Deliberate behavioral choice: the display member is validated
    // against the closed vocabulary. A variant of this check that let
    // every value through (its condition was unconditionally true) is
    // treated as the bug being fixed.
    for value in ["kiosk", "Standalone", "minimal_ui", ""] {
        let raw = json!({ "display": value });
        let manifest = parse(&raw, &manifest_url(), &document_url());
        assert_eq!(manifest.display, None, "display {value:?}");
    }
}

#[test]
fn test_display_non_string_is_unset() {
    let raw = json!({ "display": 1 });
    let manifest = parse(&raw, &manifest_url(), &document_url());
    assert_eq!(manifest.display, None);
}

// ─── Remaining members ───

#[test]
fn test_string_members_captured() {
    let raw = json!({
        "name": "Example App",
        "short_name": "Example",
        "theme_color": "#336699",
        "background_color": "#112233",
        "scope": "/app/"
    });
    let manifest = parse(&raw, &manifest_url(), &document_url());
    assert_eq!(manifest.name.as_deref(), Some("Example App"));
    assert_eq!(manifest.short_name.as_deref(), Some("Example"));
    assert_eq!(manifest.theme_color.as_deref(), Some("#336699"));
    assert_eq!(manifest.background_color.as_deref(), Some("#112233"));
    assert_eq!(manifest.scope.as_deref(), Some("/app/"));
}

#[test]
fn test_non_string_members_unset() {
    let raw = json!({ "name": 1, "short_name": [], "theme_color": {} });
    let manifest = parse(&raw, &manifest_url(), &document_url());
    assert_eq!(manifest.name, None);
    assert_eq!(manifest.short_name, None);
    assert_eq!(manifest.theme_color, None);
}

#[test]
fn test_parse_is_deterministic() {
    let raw = json!({
        "name": "App",
        "start_url": "/start",
        "icons": [{ "src": "a.png", "sizes": "48x48" }]
    });
    let first = parse(&raw, &manifest_url(), &document_url());
    let second = parse(&raw, &manifest_url(), &document_url());
    assert_eq!(first.start_url, second.start_url);
    assert_eq!(first.name, second.name);
    assert_eq!(first.icons.len(), second.icons.len());
}
