//! Pointer-drag reordering of tiles: drag affordances, the single in-flight
//! gesture, and order-preserving sibling swaps.

use tracing::warn;

use crate::model::dom::{Cursor, Document, NodeId};
use crate::page::query;

/// The one drag gesture that can be in flight across the whole page. Owned
/// by the engine and threaded into the gesture handlers instead of living as
/// ambient global state. The source is set on drag start and unconditionally
/// cleared on drag end, so an aborted gesture can never wedge future drops.
#[derive(Debug, Default)]
pub struct DragSession {
    source: Option<NodeId>,
}

impl DragSession {
    pub fn begin(&mut self, tile: NodeId) {
        self.source = Some(tile);
    }

    /// Ends the gesture regardless of how it terminated, yielding the source
    /// that was active, if any.
    pub fn clear(&mut self) -> Option<NodeId> {
        self.source.take()
    }

    pub fn source(&self) -> Option<NodeId> {
        self.source
    }
}

/// Marks every tile as a drag source/target with a grab affordance.
pub fn enable_tiles(doc: &mut Document, tiles: &[NodeId]) {
    for &tile in tiles {
        if let Some(el) = doc.get_mut(tile) {
            el.draggable = true;
            el.style.cursor = Some(Cursor::Grab);
        }
    }
}

/// Clears drag affordances and any lingering mid-gesture dimming from a
/// group's tiles. Reorders already performed stay put.
pub fn disable_tiles(doc: &mut Document, group: NodeId) {
    for tile in query::tiles(doc, group) {
        if let Some(el) = doc.get_mut(tile) {
            el.draggable = false;
            el.style.cursor = None;
            el.style.opacity = None;
        }
    }
}

/// Swaps the DOM positions of `a` and `b`, leaving both subtrees intact.
///
/// The reinsertion reference for `b` is captured before anything moves: when
/// `a` is immediately followed by `b`, `a` itself is the reference, since
/// capturing `a`'s next sibling naively would capture `b` and corrupt the
/// adjacent case. Then `a` goes in front of `b`'s position and `b` in front
/// of the reference.
pub fn swap(doc: &mut Document, a: NodeId, b: NodeId) {
    if a == b || !doc.contains(a) || !doc.contains(b) {
        return;
    }
    let a_reference = if doc.next_sibling(a) == Some(b) { Some(a) } else { doc.next_sibling(a) };
    let a_parent = doc.parent(a);

    doc.insert_before(a, b);
    match a_reference {
        Some(reference) => doc.insert_before(b, reference),
        // `a` was its parent's last child; `b` takes that slot.
        None => {
            if let Some(parent) = a_parent {
                doc.append_child(parent, b);
            } else {
                warn!(?a, "swap source had no parent, leaving target in place");
            }
        }
    }
}
