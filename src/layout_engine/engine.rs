use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::common::collections::HashMap;
use crate::common::config::Settings;
use crate::layout_engine::ratio_box::RatioBoxOutcome;
use crate::layout_engine::reorder::DragSession;
use crate::layout_engine::schedule::{FrameScheduler, ImageWatch};
use crate::layout_engine::{background, ratio_box, reorder, rows};
use crate::model::dom::{Document, NodeId};
use crate::page::query;

/// The engine only ever takes over galleries of exactly this many tiles.
pub const TILES_PER_GROUP: usize = 4;

/// Presentation mode of one gallery group.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Mode {
    /// The host's own 2x2 presentation.
    #[default]
    Horizontal,
    /// Two stacked rows with aspect-ratio-proportional heights.
    Vertical,
}

/// Inter-tile gap, cycled through a fixed three-value ring.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum GapStep {
    #[default]
    Flush,
    Narrow,
    Wide,
}

impl GapStep {
    pub fn px(self) -> f64 {
        match self {
            GapStep::Flush => 0.0,
            GapStep::Narrow => 12.0,
            GapStep::Wide => 44.0,
        }
    }

    pub fn next(self) -> GapStep {
        match self {
            GapStep::Flush => GapStep::Narrow,
            GapStep::Narrow => GapStep::Wide,
            GapStep::Wide => GapStep::Flush,
        }
    }
}

impl fmt::Display for GapStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.px() as u32)
    }
}

/// Per-group layout state, keyed by the group's container node. Created on
/// first processing, updated in place, evicted only with the group itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutState {
    pub mode: Mode,
    pub gap: GapStep,
    pub drag_enabled: bool,
    /// Placeholder box captured when vertical mode was entered. The box is
    /// re-resolved by ancestry search on every computation, so only the
    /// entry-time capture can restore the right node on exit.
    pub ratio_box: Option<NodeId>,
}

/// The two operations the host's control affordances bind to.
#[non_exhaustive]
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LayoutCommand {
    ToggleMode,
    ToggleGap,
}

/// Host-side happenings the engine reacts to.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutEvent {
    /// The scanning collaborator found (or re-found) a gallery container.
    GroupDiscovered(NodeId),
    /// An image resource finished loading.
    ImageLoaded(NodeId),
    /// The host applied pending layout and frames are authoritative again.
    FramePresented,
    /// A pointer drag started on a tile.
    DragStarted(NodeId),
    /// The in-flight drag gesture ended, however it ended.
    DragEnded,
    /// A tile received a drop.
    DroppedOn(NodeId),
}

/// Per-gallery layout state machine plus the shared drag gesture. Each
/// group's state is independent; nothing here is shared across groups except
/// the single in-flight drag session.
pub struct LayoutEngine {
    settings: Settings,
    states: HashMap<NodeId, LayoutState>,
    frames: FrameScheduler,
    images: ImageWatch,
    drag: DragSession,
}

impl LayoutEngine {
    pub fn new(settings: &Settings) -> Self {
        Self {
            settings: settings.clone(),
            states: HashMap::default(),
            frames: FrameScheduler::default(),
            images: ImageWatch::default(),
            drag: DragSession::default(),
        }
    }

    pub fn mode(&self, group: NodeId) -> Mode {
        self.states.get(&group).map(|s| s.mode).unwrap_or_default()
    }

    pub fn gap(&self, group: NodeId) -> GapStep {
        self.states.get(&group).map(|s| s.gap).unwrap_or_default()
    }

    pub fn drag_enabled(&self, group: NodeId) -> bool {
        self.states.get(&group).map(|s| s.drag_enabled).unwrap_or(false)
    }

    pub fn drag_source(&self) -> Option<NodeId> {
        self.drag.source()
    }

    /// Entry point for the scanning collaborator. Invoked on every host
    /// mutation, usually redundantly; only the first call for a four-tile
    /// group observably changes anything.
    pub fn process_group(&mut self, doc: &mut Document, group: NodeId) {
        let tiles = query::tiles(doc, group);
        if tiles.len() != TILES_PER_GROUP {
            debug!(?group, tiles = tiles.len(), "not a four-tile gallery, ignoring");
            return;
        }
        self.states.entry(group).or_default();
        self.sync_attrs(doc, group);
    }

    pub fn handle_command(&mut self, doc: &mut Document, group: NodeId, command: LayoutCommand) {
        match command {
            LayoutCommand::ToggleMode => self.toggle_mode(doc, group),
            LayoutCommand::ToggleGap => self.toggle_gap(doc, group),
        }
    }

    pub fn handle_event(&mut self, doc: &mut Document, event: LayoutEvent) {
        match event {
            LayoutEvent::GroupDiscovered(group) => self.process_group(doc, group),
            LayoutEvent::ImageLoaded(image) => self.image_loaded(doc, image),
            LayoutEvent::FramePresented => self.frame_presented(doc),
            LayoutEvent::DragStarted(tile) => self.drag_started(doc, tile),
            LayoutEvent::DragEnded => self.drag_ended(doc),
            LayoutEvent::DroppedOn(tile) => self.dropped_on(doc, tile),
        }
    }

    /// Flips a group between the host's horizontal presentation and the
    /// stacked vertical one. Toggling into the mode a group is already in is
    /// a no-op.
    pub fn toggle_mode(&mut self, doc: &mut Document, group: NodeId) {
        match self.mode(group) {
            Mode::Horizontal => self.enable_vertical(doc, group),
            Mode::Vertical => self.disable_vertical(doc, group),
        }
    }

    /// Number of images currently watched for load completion.
    pub fn pending_images(&self) -> usize {
        self.images.len()
    }

    /// Advances the gap ring 0 -> 12 -> 44 -> 0. Mode-independent; while
    /// vertical the placeholder is recomputed with the new gap (row weights
    /// do not depend on it).
    pub fn toggle_gap(&mut self, doc: &mut Document, group: NodeId) {
        let state = self.states.entry(group).or_default();
        state.gap = state.gap.next();
        let (gap, vertical) = (state.gap, state.mode == Mode::Vertical);
        self.sync_attrs(doc, group);
        debug!(?group, gap = %gap, "gap cycled");
        if vertical {
            let tiles = query::tiles(doc, group);
            self.apply_ratio_box(doc, group, &tiles, gap);
        }
    }

    /// Enters vertical mode. No-op when already vertical or when the group
    /// does not hold exactly four tiles.
    pub fn enable_vertical(&mut self, doc: &mut Document, group: NodeId) {
        let gap = {
            let state = self.states.entry(group).or_default();
            if state.mode == Mode::Vertical {
                return;
            }
            state.gap
        };
        let tiles = query::tiles(doc, group);
        if tiles.len() != TILES_PER_GROUP {
            debug!(?group, tiles = tiles.len(), "refusing vertical mode without four tiles");
            return;
        }

        rows::stack(doc, group);
        let captured = query::ratio_box_from(doc, tiles[0]);
        self.apply_ratio_box(doc, group, &tiles, gap);
        rows::balance(doc, group);

        if let Some(state) = self.states.get_mut(&group) {
            state.ratio_box = captured;
            state.mode = Mode::Vertical;
            state.drag_enabled = true;
        }
        reorder::enable_tiles(doc, &tiles);
        self.frames.schedule(group);
        self.sync_attrs(doc, group);
        debug!(?group, "vertical mode on");
    }

    /// Returns to the host's horizontal presentation. No-op when already
    /// horizontal.
    pub fn disable_vertical(&mut self, doc: &mut Document, group: NodeId) {
        let captured = {
            let Some(state) = self.states.get_mut(&group) else { return };
            if state.mode == Mode::Horizontal {
                return;
            }
            state.mode = Mode::Horizontal;
            state.drag_enabled = false;
            state.ratio_box.take()
        };

        rows::clear(doc, group);
        // The box may have been re-rendered away since entry; restoring a
        // vanished node is a no-op, not an error.
        if let Some(ratio_box) = captured
            && let Some(el) = doc.get_mut(ratio_box)
        {
            el.style.padding_bottom = Some(self.settings.placeholder_ratio_percent);
        }
        reorder::disable_tiles(doc, group);
        background::reset(doc, group);
        self.sync_attrs(doc, group);
        debug!(?group, "vertical mode off");
    }

    fn apply_ratio_box(&mut self, doc: &mut Document, group: NodeId, tiles: &[NodeId], gap: GapStep) {
        match ratio_box::adjust(doc, tiles, gap.px()) {
            RatioBoxOutcome::Applied(percent) => {
                debug!(?group, percent, "ratio box sized");
            }
            RatioBoxOutcome::AwaitingImages(images) => {
                for image in images {
                    self.images.watch(image, group);
                }
            }
            RatioBoxOutcome::Skipped => {}
        }
    }

    fn image_loaded(&mut self, doc: &mut Document, image: NodeId) {
        let Some(group) = self.images.take(image) else { return };
        // A group that left vertical mode while the image loaded keeps its
        // restored placeholder.
        if self.mode(group) != Mode::Vertical {
            debug!(?group, "image ready but group no longer vertical, dropping recompute");
            return;
        }
        let gap = self.gap(group);
        let tiles = query::tiles(doc, group);
        self.apply_ratio_box(doc, group, &tiles, gap);
    }

    fn frame_presented(&mut self, doc: &mut Document) {
        for group in self.frames.drain() {
            if self.mode(group) != Mode::Vertical {
                debug!(?group, "dropping stale background correction");
                continue;
            }
            let tiles = query::tiles(doc, group);
            background::correct(doc, &tiles);
        }
    }

    fn drag_started(&mut self, doc: &mut Document, tile: NodeId) {
        if !doc.get(tile).map(|el| el.draggable).unwrap_or(false) {
            return;
        }
        self.drag.begin(tile);
        if let Some(el) = doc.get_mut(tile) {
            el.style.opacity = Some(self.settings.drag_opacity);
        }
    }

    fn drag_ended(&mut self, doc: &mut Document) {
        if let Some(source) = self.drag.clear()
            && let Some(el) = doc.get_mut(source)
        {
            el.style.opacity = None;
        }
    }

    fn dropped_on(&mut self, doc: &mut Document, target: NodeId) {
        let Some(source) = self.drag.source() else { return };
        if source == target {
            return;
        }
        if !doc.get(target).map(|el| el.draggable).unwrap_or(false) {
            return;
        }
        reorder::swap(doc, source, target);
    }

    /// Mirrors a group's state onto its container as string attrs for the
    /// external wiring layer to render affordances from.
    fn sync_attrs(&self, doc: &mut Document, group: NodeId) {
        let Some(state) = self.states.get(&group) else { return };
        let Some(el) = doc.get_mut(group) else { return };
        el.attrs.insert("mode".into(), state.mode.to_string());
        el.attrs.insert("gap".into(), state.gap.to_string());
        el.attrs
            .insert("drag".into(), if state.drag_enabled { "on" } else { "off" }.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gap_ring_cycles_the_three_values() {
        let mut gap = GapStep::default();
        let mut seen = Vec::new();
        for _ in 0..6 {
            seen.push(gap.px());
            gap = gap.next();
        }
        assert_eq!(seen, vec![0.0, 12.0, 44.0, 0.0, 12.0, 44.0]);
    }

    #[test]
    fn mode_and_gap_render_as_host_attr_values() {
        assert_eq!(Mode::Horizontal.to_string(), "horizontal");
        assert_eq!(Mode::Vertical.to_string(), "vertical");
        assert_eq!(GapStep::Flush.to_string(), "0");
        assert_eq!(GapStep::Narrow.to_string(), "12");
        assert_eq!(GapStep::Wide.to_string(), "44");
    }
}
