//! Pure per-tile geometry. Unknown inputs degrade to 0.0, which downstream
//! passes treat as "not ready" rather than an error.

use crate::model::dom::{Document, NodeId};
use crate::page::query;

/// Intrinsic height-over-width of a tile's image, or 0.0 while the intrinsic
/// width is unknown or zero.
pub fn aspect_ratio(doc: &Document, tile: NodeId) -> f64 {
    let image = query::image_of(doc, tile)
        .and_then(|n| doc.get(n))
        .and_then(|el| el.image);
    match image {
        Some(img) if img.natural_width > 0 => {
            f64::from(img.natural_height) / f64::from(img.natural_width)
        }
        _ => 0.0,
    }
}

/// Pixel height the tile needs to show its image un-cropped at its current
/// rendered width.
pub fn needed_height(doc: &Document, tile: NodeId) -> f64 {
    let ratio = aspect_ratio(doc, tile);
    if ratio == 0.0 {
        return 0.0;
    }
    query::rendered_width(doc, tile) * ratio
}
