//! Synthetic stand-in for the host page's element tree.
//!
//! The engine never owns the real page; it reads and writes structure the
//! host re-renders at will. This model reproduces the parts the engine
//! touches: parent/sibling links, inline style, dataset attributes, measured
//! geometry, and image readiness. Measurements are written by the host (or a
//! fixture) and are read-only to the engine.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Identity of one node in a document.
    pub struct NodeId;
}

/// Role marker for a node, standing in for the class/testid selectors the
/// host page exposes.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, strum_macros::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NodeKind {
    /// The gallery's grouping container.
    Group,
    /// One of the two tile rows inside a gallery.
    Row,
    /// One image cell.
    Tile,
    /// The cover-fit background element inside a tile.
    Backdrop,
    #[default]
    Generic,
}

/// Rendered size of a node as the host last laid it out.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self { Size { width, height } }
}

/// Intrinsic metadata of an image resource. `complete` flips once the
/// resource has finished loading; natural dimensions are meaningless before
/// that.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageData {
    pub natural_width: u32,
    pub natural_height: u32,
    pub complete: bool,
}

/// Explicit background sizing forced onto a backdrop: exactly this many
/// pixels wide (height auto), non-repeating, centered. Absent means the
/// host's default cover behavior.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct BackgroundOverride {
    pub width_px: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Display {
    Flex,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FlexDirection {
    Row,
    Column,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Cursor {
    Grab,
}

/// Inline style record. Every field is optional; `None` means the property
/// is unset and the host default applies. Clearing an override is therefore
/// always lossless.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Style {
    /// Height as a percentage of the element's rendered width.
    pub padding_bottom: Option<f64>,
    pub display: Option<Display>,
    pub flex_direction: Option<FlexDirection>,
    pub flex_grow: Option<f64>,
    pub flex_basis: Option<f64>,
    pub min_height: Option<f64>,
    pub background: Option<BackgroundOverride>,
    pub opacity: Option<f64>,
    pub cursor: Option<Cursor>,
}

/// Payload of one document node.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Element {
    pub kind: NodeKind,
    pub attrs: BTreeMap<String, String>,
    pub style: Style,
    pub measured: Size,
    pub image: Option<ImageData>,
    pub draggable: bool,
}

impl Element {
    pub fn new(kind: NodeKind) -> Self {
        Element { kind, ..Default::default() }
    }

    pub fn measured(mut self, width: f64, height: f64) -> Self {
        self.measured = Size::new(width, height);
        self
    }

    pub fn image(mut self, natural_width: u32, natural_height: u32, complete: bool) -> Self {
        self.image = Some(ImageData { natural_width, natural_height, complete });
        self
    }

    pub fn padding_bottom(mut self, percent: f64) -> Self {
        self.style.padding_bottom = Some(percent);
        self
    }
}

#[derive(Serialize, Deserialize, Debug, Default)]
struct Node {
    parent: Option<NodeId>,
    prev_sibling: Option<NodeId>,
    next_sibling: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    element: Element,
}

/// Linked-sibling tree over a slotmap arena. Multiple detached subtrees can
/// coexist in one document; reattachment never destroys node payloads, so
/// reorders preserve tile identity and state.
#[derive(Serialize, Deserialize, Default)]
pub struct Document {
    nodes: SlotMap<NodeId, Node>,
}

impl Document {
    pub fn new() -> Self { Self::default() }

    /// Creates a detached node. It stays a root until attached.
    pub fn create(&mut self, element: Element) -> NodeId {
        self.nodes.insert(Node { element, ..Default::default() })
    }

    pub fn contains(&self, id: NodeId) -> bool { self.nodes.contains_key(id) }

    pub fn get(&self, id: NodeId) -> Option<&Element> {
        self.nodes.get(id).map(|n| &n.element)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        self.nodes.get_mut(id).map(|n| &mut n.element)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|n| n.parent)
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|n| n.next_sibling)
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|n| n.prev_sibling)
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|n| n.first_child)
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut cur = self.first_child(id);
        std::iter::from_fn(move || {
            let node = cur;
            cur = node.and_then(|n| self.next_sibling(n));
            node
        })
    }

    /// All ancestors of `id`, starting with `id` itself.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut next = self.contains(id).then_some(id);
        std::iter::from_fn(move || {
            let node = next;
            next = node.and_then(|n| self.parent(n));
            node
        })
    }

    /// Preorder traversal of the subtree rooted at `root`, including `root`.
    /// Yields nodes in document order.
    pub fn descendants(&self, root: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut stack = if self.contains(root) { vec![root] } else { vec![] };
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            let children: Vec<_> = self.children(node).collect();
            stack.extend(children.into_iter().rev());
            Some(node)
        })
    }

    /// Attaches `child` as the last child of `parent`, detaching it from its
    /// current position first. The node payload is untouched.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if child == parent || !self.contains(child) || !self.contains(parent) {
            return;
        }
        self.unlink(child);
        let prev = {
            let parent_node = &mut self.nodes[parent];
            parent_node.first_child.get_or_insert(child);
            parent_node.last_child.replace(child)
        };
        self.nodes[child].parent = Some(parent);
        if let Some(prev) = prev {
            self.nodes[prev].next_sibling = Some(child);
            self.nodes[child].prev_sibling = Some(prev);
        }
    }

    /// Inserts `node` as the sibling immediately before `sibling`, detaching
    /// it from its current position first. No-op when `sibling` is a root or
    /// either node is gone.
    pub fn insert_before(&mut self, node: NodeId, sibling: NodeId) {
        if node == sibling || !self.contains(node) || !self.contains(sibling) {
            return;
        }
        let Some(parent) = self.parent(sibling) else { return };
        self.unlink(node);
        let prev = self.nodes[sibling].prev_sibling;
        self.nodes[node].parent = Some(parent);
        self.nodes[node].next_sibling = Some(sibling);
        self.nodes[node].prev_sibling = prev;
        self.nodes[sibling].prev_sibling = Some(node);
        match prev {
            Some(prev) => self.nodes[prev].next_sibling = Some(node),
            None => self.nodes[parent].first_child = Some(node),
        }
    }

    /// Removes `id` and its whole subtree from the document.
    pub fn remove(&mut self, id: NodeId) {
        if !self.contains(id) {
            return;
        }
        self.unlink(id);
        let subtree: Vec<_> = self.descendants(id).collect();
        for node in subtree {
            self.nodes.remove(node);
        }
    }

    fn unlink(&mut self, id: NodeId) {
        let (parent, prev, next) = {
            let node = &self.nodes[id];
            (node.parent, node.prev_sibling, node.next_sibling)
        };
        if let Some(parent) = parent {
            let parent_node = &mut self.nodes[parent];
            if parent_node.first_child == Some(id) {
                parent_node.first_child = next;
            }
            if parent_node.last_child == Some(id) {
                parent_node.last_child = prev;
            }
        }
        if let Some(prev) = prev {
            self.nodes[prev].next_sibling = next;
        }
        if let Some(next) = next {
            self.nodes[next].prev_sibling = prev;
        }
        let node = &mut self.nodes[id];
        node.parent = None;
        node.prev_sibling = None;
        node.next_sibling = None;
    }

    pub fn draw_tree(&self, root: NodeId) -> String {
        let mut out = String::new();
        if self.contains(root) {
            let _ = ascii_tree::write_tree(&mut out, &self.ascii_tree(root));
        }
        out
    }

    fn ascii_tree(&self, node: NodeId) -> ascii_tree::Tree {
        let el = &self.nodes[node].element;
        let mut desc = format!("{} {:?}", el.kind, node);
        if !el.attrs.is_empty() {
            let attrs: Vec<_> = el.attrs.iter().map(|(k, v)| format!("{k}={v}")).collect();
            desc.push_str(&format!(" [{}]", attrs.join(" ")));
        }
        if let Some(pb) = el.style.padding_bottom {
            desc.push_str(&format!(" pb={pb:.2}%"));
        }
        if let Some(grow) = el.style.flex_grow {
            desc.push_str(&format!(" grow={grow:.1}"));
        }
        if el.measured.width > 0.0 || el.measured.height > 0.0 {
            desc.push_str(&format!(" {}x{}", el.measured.width, el.measured.height));
        }
        if let Some(img) = el.image {
            let state = if img.complete { "ready" } else { "loading" };
            desc.push_str(&format!(
                " img {}x{} {state}",
                img.natural_width, img.natural_height
            ));
        }
        let children: Vec<_> = self.children(node).map(|c| self.ascii_tree(c)).collect();
        if children.is_empty() {
            ascii_tree::Tree::Leaf(vec![desc])
        } else {
            ascii_tree::Tree::Node(desc, children)
        }
    }
}
