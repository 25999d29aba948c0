//! Corrects cover-fit backdrops whose computed cover width lands below the
//! frame width, which the host composites as a visible gap along one axis.

use crate::model::dom::{BackgroundOverride, Document, NodeId};
use crate::page::query;

/// Re-evaluates every tile's backdrop against its current frame. Must run
/// after the host has applied row sizing, since frames are only authoritative
/// post-layout. Safe to re-run on every frame; the override is recomputed
/// from live measurements alone.
pub fn correct(doc: &mut Document, tiles: &[NodeId]) {
    for &tile in tiles {
        let Some(backdrop) = query::backdrop_of(doc, tile) else { continue };
        let image = query::image_of(doc, tile)
            .and_then(|n| doc.get(n))
            .and_then(|el| el.image);
        let Some(img) = image else { continue };
        if img.natural_width == 0 {
            continue;
        }

        let frame = doc.get(backdrop).map(|el| el.measured).unwrap_or_default();
        let (fw, fh) = (frame.width, frame.height);
        if fw == 0.0 || fh == 0.0 {
            continue;
        }

        let nw = f64::from(img.natural_width);
        let nh = f64::from(img.natural_height);
        let scale = f64::max(fw / nw, fh / nh);
        let rendered_width = nw * scale;

        if let Some(el) = doc.get_mut(backdrop) {
            // Equality defers to the host's own cover fit; only a strict
            // shortfall needs the explicit width.
            el.style.background = if rendered_width < fw {
                Some(BackgroundOverride { width_px: fw })
            } else {
                None
            };
        }
    }
}

/// Clears every backdrop override in the group, returning tiles to the
/// host's default cover behavior.
pub fn reset(doc: &mut Document, group: NodeId) {
    let tiles = query::tiles(doc, group);
    for tile in tiles {
        if let Some(backdrop) = query::backdrop_of(doc, tile)
            && let Some(el) = doc.get_mut(backdrop)
        {
            el.style.background = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::dom::{Element, NodeKind};

    fn tile(doc: &mut Document, natural: (u32, u32), frame: (f64, f64)) -> (NodeId, NodeId) {
        let tile = doc.create(Element::new(NodeKind::Tile));
        let backdrop = doc.create(Element::new(NodeKind::Backdrop).measured(frame.0, frame.1));
        let img = doc.create(Element::new(NodeKind::Generic).image(natural.0, natural.1, true));
        doc.append_child(tile, backdrop);
        doc.append_child(tile, img);
        (tile, backdrop)
    }

    #[test]
    fn width_constrained_cover_needs_no_override() {
        // scale = max(120/100, 120/200) = 1.2; rendered width 120 == frame.
        let mut doc = Document::new();
        let (t, b) = tile(&mut doc, (100, 200), (120.0, 120.0));
        correct(&mut doc, &[t]);
        assert_eq!(doc.get(b).unwrap().style.background, None);
    }

    #[test]
    fn exact_fit_never_triggers_the_override() {
        // scale = max(130/100, 100/200) = 1.3; rendered width 130 == frame.
        let mut doc = Document::new();
        let (t, b) = tile(&mut doc, (100, 200), (130.0, 100.0));
        correct(&mut doc, &[t]);
        assert_eq!(doc.get(b).unwrap().style.background, None);
    }

    #[test]
    fn rounding_shortfall_forces_the_frame_width() {
        // 100/4900 * 4900 rounds to 99.99999999999999 in f64, strictly below
        // the 100px frame; the height-driven scale is smaller and loses.
        let mut doc = Document::new();
        let (t, b) = tile(&mut doc, (4900, 10000), (100.0, 100.0));
        let nw = 4900.0f64;
        assert!(nw * (100.0 / nw) < 100.0, "test premise: cover width rounds short");

        correct(&mut doc, &[t]);
        assert_eq!(
            doc.get(b).unwrap().style.background,
            Some(BackgroundOverride { width_px: 100.0 })
        );
    }

    #[test]
    fn resize_re_evaluation_clears_a_stale_override() {
        let mut doc = Document::new();
        let (t, b) = tile(&mut doc, (4900, 10000), (100.0, 100.0));
        correct(&mut doc, &[t]);
        assert!(doc.get(b).unwrap().style.background.is_some());

        doc.get_mut(b).unwrap().measured = crate::model::dom::Size::new(120.0, 120.0);
        correct(&mut doc, &[t]);
        assert_eq!(doc.get(b).unwrap().style.background, None);
    }

    #[test]
    fn unmeasured_frame_or_missing_pieces_skip_silently() {
        let mut doc = Document::new();
        let (zero_frame, b) = tile(&mut doc, (100, 200), (0.0, 120.0));
        let bare = doc.create(Element::new(NodeKind::Tile));
        correct(&mut doc, &[zero_frame, bare]);
        assert_eq!(doc.get(b).unwrap().style.background, None);
    }

    #[test]
    fn reset_clears_all_overrides_in_a_group() {
        let mut doc = Document::new();
        let group = doc.create(Element::new(NodeKind::Group));
        let (t1, b1) = tile(&mut doc, (4900, 10000), (100.0, 100.0));
        let (t2, b2) = tile(&mut doc, (4900, 10000), (100.0, 100.0));
        doc.append_child(group, t1);
        doc.append_child(group, t2);
        correct(&mut doc, &[t1, t2]);
        assert!(doc.get(b1).unwrap().style.background.is_some());

        reset(&mut doc, group);
        assert_eq!(doc.get(b1).unwrap().style.background, None);
        assert_eq!(doc.get(b2).unwrap().style.background, None);
    }
}
