//! Sizes a gallery's aspect-ratio placeholder so it reserves the full
//! stacked height of all four tiles plus the gaps between them.

use tracing::debug;

use crate::layout_engine::geometry;
use crate::model::dom::{Document, NodeId};
use crate::page::query;

/// What an adjustment attempt did. The caller owns the follow-up: watches
/// for `AwaitingImages`, nothing for `Skipped`.
#[derive(Debug, Clone, PartialEq)]
pub enum RatioBoxOutcome {
    /// The placeholder was written with this padding percentage.
    Applied(f64),
    /// At least one image has not finished loading; listed nodes should be
    /// watched for completion. No write happened.
    AwaitingImages(Vec<NodeId>),
    /// The document cannot satisfy the computation right now (no box, box
    /// unmeasured, or no usable ratios). No write happened.
    Skipped,
}

/// Recomputes and applies the placeholder height for `tiles`, expressed as a
/// percentage of the box width:
///
/// ```text
/// percent = 100 * sum(ratios) + 100 * gap * (n - 1) / box_width
/// ```
///
/// Idempotent: unchanged tiles and gap produce the identical percentage.
pub fn adjust(doc: &mut Document, tiles: &[NodeId], gap_px: f64) -> RatioBoxOutcome {
    let mut total_ratio = 0.0;
    let mut unready = Vec::new();
    let mut ready = true;
    for &tile in tiles {
        let image_node = query::image_of(doc, tile);
        let image = image_node.and_then(|n| doc.get(n)).and_then(|el| el.image);
        match image {
            Some(img) if img.complete && img.natural_width > 0 => {
                total_ratio += geometry::aspect_ratio(doc, tile);
            }
            Some(_) => {
                ready = false;
                if let Some(node) = image_node {
                    unready.push(node);
                }
            }
            None => ready = false,
        }
    }
    if !ready {
        return RatioBoxOutcome::AwaitingImages(unready);
    }
    if total_ratio <= 0.0 {
        return RatioBoxOutcome::Skipped;
    }

    let Some(first) = tiles.first() else {
        return RatioBoxOutcome::Skipped;
    };
    let Some(ratio_box) = query::ratio_box_from(doc, *first) else {
        debug!("no ratio box in tile ancestry, skipping");
        return RatioBoxOutcome::Skipped;
    };
    let width = doc.get(ratio_box).map(|el| el.measured.width).unwrap_or(0.0);
    if width <= 0.0 {
        debug!(?ratio_box, "ratio box not laid out yet, skipping");
        return RatioBoxOutcome::Skipped;
    }

    let total_gap = gap_px * (tiles.len().saturating_sub(1)) as f64;
    let percent = total_ratio * 100.0 + (total_gap / width) * 100.0;
    if let Some(el) = doc.get_mut(ratio_box) {
        el.style.padding_bottom = Some(percent);
    }
    RatioBoxOutcome::Applied(percent)
}
