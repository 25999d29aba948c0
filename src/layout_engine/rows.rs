//! Row-level presentation overrides: column flow, proportional heights, and
//! their removal.

use tracing::debug;

use crate::layout_engine::geometry;
use crate::model::dom::{Display, Document, FlexDirection, NodeId};
use crate::page::query;

/// Switches a gallery's rows to column flow so tiles stack.
pub fn stack(doc: &mut Document, group: NodeId) {
    for row in query::rows(doc, group) {
        if let Some(el) = doc.get_mut(row) {
            el.style.display = Some(Display::Flex);
            el.style.flex_direction = Some(FlexDirection::Column);
        }
    }
}

/// Assigns each row a flexible-height weight equal to the summed needed
/// heights of its positional pair of tiles. Basis and min-height are zeroed
/// so the rendered height is purely proportional to the weight. No-op unless
/// the group currently has exactly two rows over exactly four tiles.
pub fn balance(doc: &mut Document, group: NodeId) {
    let rows = query::rows(doc, group);
    let tiles = query::tiles(doc, group);
    if rows.len() != 2 || tiles.len() != 4 {
        debug!(?group, rows = rows.len(), tiles = tiles.len(), "row grouping not ready, skipping");
        return;
    }

    let needs = [
        geometry::needed_height(doc, tiles[0]) + geometry::needed_height(doc, tiles[1]),
        geometry::needed_height(doc, tiles[2]) + geometry::needed_height(doc, tiles[3]),
    ];
    for (&row, &need) in rows.iter().zip(needs.iter()) {
        if let Some(el) = doc.get_mut(row) {
            el.style.flex_grow = Some(need);
            el.style.flex_basis = Some(0.0);
            el.style.min_height = Some(0.0);
        }
    }
}

/// Clears every row-level override back to the host defaults.
pub fn clear(doc: &mut Document, group: NodeId) {
    for row in query::rows(doc, group) {
        if let Some(el) = doc.get_mut(row) {
            el.style.display = None;
            el.style.flex_direction = None;
            el.style.flex_grow = None;
            el.style.flex_basis = None;
            el.style.min_height = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::dom::{Element, NodeKind};

    /// Two rows of two tiles; each tile's cell width and image size chosen so
    /// needed heights are easy to read off.
    fn group_with_heights(specs: [(f64, (u32, u32)); 4]) -> (Document, NodeId, Vec<NodeId>) {
        let mut doc = Document::new();
        let group = doc.create(Element::new(NodeKind::Group));
        let mut rows = Vec::new();
        for pair in specs.chunks(2) {
            let row = doc.create(Element::new(NodeKind::Row));
            doc.append_child(group, row);
            rows.push(row);
            for &(cell_width, (w, h)) in pair {
                let cell = doc.create(Element::new(NodeKind::Generic).measured(cell_width, 0.0));
                let tile = doc.create(Element::new(NodeKind::Tile));
                let img = doc.create(Element::new(NodeKind::Generic).image(w, h, true));
                doc.append_child(row, cell);
                doc.append_child(cell, tile);
                doc.append_child(tile, img);
            }
        }
        (doc, group, rows)
    }

    #[test]
    fn weights_are_per_row_needed_height_sums() {
        // Needed heights 200, 150 / 100, 100 -> weights 350 and 200.
        let (mut doc, group, rows) = group_with_heights([
            (200.0, (100, 100)),
            (300.0, (100, 50)),
            (100.0, (100, 100)),
            (200.0, (100, 50)),
        ]);
        balance(&mut doc, group);

        let grow = |row| doc.get(row).unwrap().style.flex_grow;
        assert_eq!(grow(rows[0]), Some(350.0));
        assert_eq!(grow(rows[1]), Some(200.0));
        for &row in &rows {
            let style = &doc.get(row).unwrap().style;
            assert_eq!(style.flex_basis, Some(0.0));
            assert_eq!(style.min_height, Some(0.0));
        }
    }

    #[test]
    fn unexpected_row_count_is_a_no_op() {
        let (mut doc, group, rows) = group_with_heights([
            (200.0, (100, 100)),
            (300.0, (100, 50)),
            (100.0, (100, 100)),
            (200.0, (100, 50)),
        ]);
        let extra = doc.create(Element::new(NodeKind::Row));
        doc.append_child(group, extra);

        balance(&mut doc, group);
        assert_eq!(doc.get(rows[0]).unwrap().style.flex_grow, None);
    }

    #[test]
    fn stack_then_clear_restores_host_defaults() {
        let (mut doc, group, rows) = group_with_heights([
            (200.0, (100, 100)),
            (300.0, (100, 50)),
            (100.0, (100, 100)),
            (200.0, (100, 50)),
        ]);
        stack(&mut doc, group);
        balance(&mut doc, group);
        assert_eq!(doc.get(rows[0]).unwrap().style.display, Some(Display::Flex));
        assert_eq!(
            doc.get(rows[1]).unwrap().style.flex_direction,
            Some(FlexDirection::Column)
        );

        clear(&mut doc, group);
        for &row in &rows {
            let style = doc.get(row).unwrap().style.clone();
            assert_eq!(style, Default::default());
        }
    }
}
