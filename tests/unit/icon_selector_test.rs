//! Unit tests for icon selection.

use std::collections::BTreeSet;

use url::Url;
use webshell::services::icon_selector::select_best_icon;
use webshell::types::manifest::{Icon, IconPurpose};

fn icon(name: &str, sizes: &[&str]) -> Icon {
    Icon {
        src: Url::parse(&format!("https://example.com/{name}")).unwrap(),
        mime_type: None,
        sizes: if sizes.is_empty() {
            None
        } else {
            Some(sizes.iter().map(|s| s.to_string()).collect())
        },
        purpose: Some(Icon::default_purpose()),
    }
}

fn icon_with_purpose(name: &str, sizes: &[&str], purpose: &[IconPurpose]) -> Icon {
    let mut icon = icon(name, sizes);
    icon.purpose = Some(purpose.iter().copied().collect::<BTreeSet<_>>());
    icon
}

fn src_of(result: Option<Url>) -> String {
    result.expect("an icon should be selected").to_string()
}

#[test]
fn test_empty_collection_yields_none() {
    assert_eq!(select_best_icon(&[], 32), None);
}

#[test]
fn test_any_size_wins_regardless_of_target() {
    let icons = vec![icon("sized.png", &["256x256"]), icon("any.png", &["any"])];
    for target in [1, 32, 256, 4096] {
        assert_eq!(
            src_of(select_best_icon(&icons, target)),
            "https://example.com/any.png",
            "target {target}"
        );
    }
}

#[test]
fn test_any_size_terminates_comparison() {
    // Once an `any` icon is best, later exact matches do not displace it.
    let icons = vec![icon("any.png", &["any"]), icon("exact.png", &["32x32"])];
    assert_eq!(
        src_of(select_best_icon(&icons, 32)),
        "https://example.com/any.png"
    );
}

#[test]
fn test_smallest_size_at_or_above_target_wins() {
    let icons = vec![
        icon("s.png", &["16x16"]),
        icon("m.png", &["48x48"]),
        icon("l.png", &["96x96"]),
    ];
    assert_eq!(
        src_of(select_best_icon(&icons, 32)),
        "https://example.com/m.png"
    );
}

#[test]
fn test_largest_available_wins_when_all_below_target() {
    let icons = vec![icon("s.png", &["16x16"]), icon("m.png", &["24x24"])];
    assert_eq!(
        src_of(select_best_icon(&icons, 64)),
        "https://example.com/m.png"
    );
}

#[test]
fn test_size_above_target_beats_larger_size_below_target() {
    // 48 is further from 40 than 33, but crossing the target wins.
    let icons = vec![icon("below.png", &["33x33"]), icon("above.png", &["48x48"])];
    assert_eq!(
        src_of(select_best_icon(&icons, 40)),
        "https://example.com/above.png"
    );
}

#[test]
fn test_exact_match_wins() {
    let icons = vec![
        icon("s.png", &["16x16"]),
        icon("exact.png", &["32x32"]),
        icon("l.png", &["64x64"]),
    ];
    assert_eq!(
        src_of(select_best_icon(&icons, 32)),
        "https://example.com/exact.png"
    );
}

#[test]
fn test_order_does_not_matter_for_numeric_selection() {
    let mut icons = vec![
        icon("l.png", &["96x96"]),
        icon("s.png", &["16x16"]),
        icon("m.png", &["48x48"]),
    ];
    assert_eq!(
        src_of(select_best_icon(&icons, 32)),
        "https://example.com/m.png"
    );
    icons.reverse();
    assert_eq!(
        src_of(select_best_icon(&icons, 32)),
        "https://example.com/m.png"
    );
}

#[test]
fn test_size_comparison_is_numeric_not_lexical() {
    // Lexically "9" > "48"; numerically 9 < 48. The 48px icon must win
    // for a 32px target.
    let icons = vec![icon("tiny.png", &["9x9"]), icon("right.png", &["48x48"])];
    assert_eq!(
        src_of(select_best_icon(&icons, 32)),
        "https://example.com/right.png"
    );
}

#[test]
fn test_multiple_size_tokens_on_one_icon() {
    let icons = vec![
        icon("multi.png", &["16x16", "48x48", "96x96"]),
        icon("single.png", &["64x64"]),
    ];
    // The multi icon advertises 48, the closest size at or above 32.
    assert_eq!(
        src_of(select_best_icon(&icons, 32)),
        "https://example.com/multi.png"
    );
}

#[test]
fn test_unparseable_size_tokens_skipped() {
    let icons = vec![
        icon("bad.png", &["large", "x32"]),
        icon("good.png", &["16x16"]),
    ];
    assert_eq!(
        src_of(select_best_icon(&icons, 32)),
        "https://example.com/good.png"
    );
}

#[test]
fn test_special_purpose_icons_never_eligible() {
    let icons = vec![
        icon_with_purpose("mono.png", &["any"], &[IconPurpose::Monochrome]),
        icon_with_purpose("mask.png", &["any"], &[IconPurpose::Maskable]),
        icon("plain.png", &["16x16"]),
    ];
    assert_eq!(
        src_of(select_best_icon(&icons, 32)),
        "https://example.com/plain.png"
    );
}

#[test]
fn test_special_purpose_plus_any_is_eligible() {
    let icons = vec![icon_with_purpose(
        "dual.png",
        &["32x32"],
        &[IconPurpose::Maskable, IconPurpose::Any],
    )];
    assert_eq!(
        src_of(select_best_icon(&icons, 32)),
        "https://example.com/dual.png"
    );
}

#[test]
fn test_unset_purpose_is_eligible() {
    let mut unset = icon("unset.png", &["32x32"]);
    unset.purpose = None;
    assert_eq!(
        src_of(select_best_icon(&[unset], 32)),
        "https://example.com/unset.png"
    );
}

#[test]
fn test_only_special_purpose_icons_yields_none() {
    let icons = vec![icon_with_purpose(
        "mono.png",
        &["32x32"],
        &[IconPurpose::Monochrome],
    )];
    assert_eq!(select_best_icon(&icons, 32), None);
}

#[test]
fn test_icon_without_sizes_selected_when_nothing_better() {
    let sizeless = icon("nosizes.png", &[]);
    assert_eq!(
        src_of(select_best_icon(&[sizeless], 32)),
        "https://example.com/nosizes.png"
    );
}

#[test]
fn test_sized_icon_beats_sizeless_icon() {
    let icons = vec![icon("nosizes.png", &[]), icon("sized.png", &["16x16"])];
    assert_eq!(
        src_of(select_best_icon(&icons, 32)),
        "https://example.com/sized.png"
    );
}
