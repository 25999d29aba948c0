//! Read-side queries over the host page.
//!
//! Everything here is a lookup the host may legitimately fail to satisfy
//! while its own rendering is in flight, so every query degrades to an empty
//! result instead of an error.

use crate::model::dom::{Document, NodeId, NodeKind};

/// Image tiles of a gallery group, in document order.
pub fn tiles(doc: &Document, group: NodeId) -> Vec<NodeId> {
    descendants_of_kind(doc, group, NodeKind::Tile)
}

/// Tile rows of a gallery group, in document order.
pub fn rows(doc: &Document, group: NodeId) -> Vec<NodeId> {
    descendants_of_kind(doc, group, NodeKind::Row)
}

fn descendants_of_kind(doc: &Document, root: NodeId, kind: NodeKind) -> Vec<NodeId> {
    doc.descendants(root)
        .filter(|&n| doc.get(n).is_some_and(|el| el.kind == kind))
        .collect()
}

/// The image resource inside a tile.
pub fn image_of(doc: &Document, tile: NodeId) -> Option<NodeId> {
    doc.descendants(tile)
        .find(|&n| doc.get(n).is_some_and(|el| el.image.is_some()))
}

/// The cover-fit background element inside a tile.
pub fn backdrop_of(doc: &Document, tile: NodeId) -> Option<NodeId> {
    doc.descendants(tile)
        .find(|&n| doc.get(n).is_some_and(|el| el.kind == NodeKind::Backdrop))
}

/// Locates the aspect-ratio placeholder governing a tile: climbs the tile's
/// ancestry and, at each level, scans the direct children for a node with an
/// explicit `padding_bottom`. Resolution depends on the host's current
/// markup, so callers re-run this per computation rather than caching it.
pub fn ratio_box_from(doc: &Document, tile: NodeId) -> Option<NodeId> {
    let mut cursor = doc.parent(tile);
    while let Some(ancestor) = cursor {
        let hit = doc
            .children(ancestor)
            .find(|&c| doc.get(c).is_some_and(|el| el.style.padding_bottom.is_some()));
        if hit.is_some() {
            return hit;
        }
        cursor = doc.parent(ancestor);
    }
    None
}

/// Rendered width of the closest sized self-or-ancestor of a tile; 0.0 when
/// nothing in the chain has been laid out yet.
pub fn rendered_width(doc: &Document, tile: NodeId) -> f64 {
    doc.ancestors(tile)
        .find_map(|n| {
            let width = doc.get(n)?.measured.width;
            (width > 0.0).then_some(width)
        })
        .unwrap_or(0.0)
}

/// The gallery group a node belongs to, if any.
pub fn group_of(doc: &Document, node: NodeId) -> Option<NodeId> {
    doc.ancestors(node)
        .find(|&n| doc.get(n).is_some_and(|el| el.kind == NodeKind::Group))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::dom::Element;

    #[test]
    fn tiles_and_rows_come_back_in_document_order() {
        let mut doc = Document::new();
        let group = doc.create(Element::new(NodeKind::Group));
        let mut expected_tiles = Vec::new();
        let mut expected_rows = Vec::new();
        for _ in 0..2 {
            let row = doc.create(Element::new(NodeKind::Row));
            doc.append_child(group, row);
            expected_rows.push(row);
            for _ in 0..2 {
                let tile = doc.create(Element::new(NodeKind::Tile));
                doc.append_child(row, tile);
                expected_tiles.push(tile);
            }
        }
        assert_eq!(tiles(&doc, group), expected_tiles);
        assert_eq!(rows(&doc, group), expected_rows);
    }

    #[test]
    fn ratio_box_found_at_the_nearest_qualifying_level() {
        let mut doc = Document::new();
        let outer = doc.create(Element::new(NodeKind::Generic));
        let outer_box = doc.create(Element::new(NodeKind::Generic).padding_bottom(100.0));
        let wrapper = doc.create(Element::new(NodeKind::Generic));
        let inner_box = doc.create(Element::new(NodeKind::Generic).padding_bottom(56.25));
        let content = doc.create(Element::new(NodeKind::Generic));
        let tile = doc.create(Element::new(NodeKind::Tile));
        doc.append_child(outer, outer_box);
        doc.append_child(outer, wrapper);
        doc.append_child(wrapper, inner_box);
        doc.append_child(wrapper, content);
        doc.append_child(content, tile);

        // content has no qualifying child; wrapper (one level up) does.
        assert_eq!(ratio_box_from(&doc, tile), Some(inner_box));
    }

    #[test]
    fn ratio_box_absent_when_no_ancestor_has_one() {
        let mut doc = Document::new();
        let root = doc.create(Element::new(NodeKind::Generic));
        let tile = doc.create(Element::new(NodeKind::Tile));
        doc.append_child(root, tile);
        assert_eq!(ratio_box_from(&doc, tile), None);
    }

    #[test]
    fn rendered_width_prefers_the_closest_sized_node() {
        let mut doc = Document::new();
        let cell = doc.create(Element::new(NodeKind::Generic).measured(300.0, 0.0));
        let tile = doc.create(Element::new(NodeKind::Tile));
        doc.append_child(cell, tile);
        assert_eq!(rendered_width(&doc, tile), 300.0);

        // A sized tile wins over its ancestor.
        doc.get_mut(tile).unwrap().measured.width = 280.0;
        assert_eq!(rendered_width(&doc, tile), 280.0);
    }

    #[test]
    fn rendered_width_is_zero_before_layout() {
        let mut doc = Document::new();
        let tile = doc.create(Element::new(NodeKind::Tile));
        assert_eq!(rendered_width(&doc, tile), 0.0);
    }

    #[test]
    fn group_of_walks_up_from_a_tile() {
        let mut doc = Document::new();
        let group = doc.create(Element::new(NodeKind::Group));
        let row = doc.create(Element::new(NodeKind::Row));
        let tile = doc.create(Element::new(NodeKind::Tile));
        doc.append_child(group, row);
        doc.append_child(row, tile);
        assert_eq!(group_of(&doc, tile), Some(group));
        assert_eq!(group_of(&doc, group), Some(group));

        let stray = doc.create(Element::new(NodeKind::Tile));
        assert_eq!(group_of(&doc, stray), None);
    }
}
