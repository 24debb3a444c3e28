//! Icon selection.
//!
//! Picks the best icon from a processed manifest icon list for a target
//! pixel size: the icon advertising `any` beats everything, otherwise the
//! smallest size that is still at least the target, otherwise the largest
//! size available below it.

use url::Url;

use crate::types::manifest::{Icon, IconPurpose};

/// The size tracked as "best so far" during selection.
///
/// `Unset` behaves as an infinite sentinel: any real size improves on it.
/// `Any` is terminal: no numeric size outranks it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BestSize {
    Unset,
    Px(u32),
    Any,
}

/// Select the best available icon for `target_size` pixels.
///
/// Icons whose purpose set excludes `any` but includes `monochrome` or
/// `maskable` are never eligible as the general icon. Comparison between
/// parsed size tokens is numeric. A single left-to-right pass, no sorting.
pub fn select_best_icon(icons: &[Icon], target_size: u32) -> Option<Url> {
    let mut best_icon: Option<&Icon> = None;
    let mut best_size = BestSize::Unset;

    for icon in icons {
        if is_special_purpose(icon) {
            continue;
        }

        // If there's no best icon yet, this is the best icon so far.
        if best_icon.is_none() {
            best_icon = Some(icon);
        }

        let sizes = match &icon.sizes {
            Some(sizes) => sizes,
            None => continue,
        };

        // An icon supporting any size is the best possible match.
        if sizes.contains("any") {
            best_icon = Some(icon);
            best_size = BestSize::Any;
            continue;
        }
        if best_size == BestSize::Any {
            continue;
        }

        for token in sizes {
            // Parse the leading number (e.g. 32) from a size token (e.g.
            // "32x32"), per the HTML sizes attribute format.
            let size = match token.split('x').next().and_then(|s| s.parse::<u32>().ok()) {
                Some(size) => size,
                None => continue,
            };
            let improves = match best_size {
                BestSize::Unset => true,
                BestSize::Px(best) => {
                    // Larger than target but closer to it,
                    (size >= target_size && size <= best)
                        // or larger than a best that is still below target,
                        || (best < target_size && size > best)
                        // or smaller than target but closer to it.
                        || (size <= target_size && size >= best)
                }
                BestSize::Any => false,
            };
            if improves {
                best_size = BestSize::Px(size);
                best_icon = Some(icon);
            }
        }
    }

    best_icon.map(|icon| icon.src.clone())
}

/// Whether an icon is reserved for a special purpose (badge/monochrome or
/// maskable rendering) and therefore ineligible as the general icon.
fn is_special_purpose(icon: &Icon) -> bool {
    match &icon.purpose {
        Some(purpose) => {
            !purpose.contains(&IconPurpose::Any)
                && (purpose.contains(&IconPurpose::Monochrome)
                    || purpose.contains(&IconPurpose::Maskable))
        }
        // An unset purpose declares nothing, so it excludes nothing.
        None => false,
    }
}
