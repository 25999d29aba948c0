//! Synthetic gallery documents for tests and the demo driver.
//!
//! The shape mirrors the host markup the engine targets: a grouping
//! container wrapping an aspect-ratio placeholder and a content subtree of
//! two rows, each holding two sized cells with a tile, backdrop, and image.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::dom::{Document, Element, NodeId, NodeKind, Size};

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse fixture: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("failed to encode fixture: {0}")]
    Encode(#[from] ron::Error),
}

/// One tile's worth of fixture input.
#[derive(Debug, Clone, Copy)]
pub struct TileSpec {
    /// Intrinsic image dimensions.
    pub natural: (u32, u32),
    /// Whether the image resource has already finished loading.
    pub complete: bool,
    /// Rendered width of the cell wrapping the tile.
    pub cell_width: f64,
    /// Rendered frame of the cover-fit backdrop.
    pub frame: Size,
}

impl Default for TileSpec {
    fn default() -> Self {
        Self {
            natural: (1200, 900),
            complete: true,
            cell_width: 300.0,
            frame: Size::new(300.0, 168.0),
        }
    }
}

/// A built gallery document plus handles to every node a test or demo wants
/// to poke at.
#[derive(Serialize, Deserialize)]
pub struct GalleryFixture {
    pub doc: Document,
    pub group: NodeId,
    pub ratio_box: NodeId,
    pub rows: [NodeId; 2],
    pub cells: [NodeId; 4],
    pub tiles: [NodeId; 4],
    pub backdrops: [NodeId; 4],
    pub images: [NodeId; 4],
}

/// Builds a gallery with the host's default 16:9 placeholder already in
/// place.
pub fn gallery(specs: [TileSpec; 4], box_width: f64) -> GalleryFixture {
    let mut doc = Document::new();
    let group = doc.create(Element::new(NodeKind::Group).measured(box_width, 0.0));
    let wrapper = doc.create(Element::new(NodeKind::Generic));
    let ratio_box = doc.create(
        Element::new(NodeKind::Generic)
            .padding_bottom(56.25)
            .measured(box_width, box_width * 0.5625),
    );
    let content = doc.create(Element::new(NodeKind::Generic));
    doc.append_child(group, wrapper);
    doc.append_child(wrapper, ratio_box);
    doc.append_child(wrapper, content);

    let mut rows = Vec::new();
    let mut cells = Vec::new();
    let mut tiles = Vec::new();
    let mut backdrops = Vec::new();
    let mut images = Vec::new();
    for pair in specs.chunks(2) {
        let row = doc.create(Element::new(NodeKind::Row).measured(box_width, 0.0));
        doc.append_child(content, row);
        rows.push(row);
        for spec in pair {
            let cell = doc.create(Element::new(NodeKind::Generic).measured(spec.cell_width, 0.0));
            let tile = doc.create(Element::new(NodeKind::Tile));
            let backdrop = doc.create(
                Element::new(NodeKind::Backdrop).measured(spec.frame.width, spec.frame.height),
            );
            let image = doc.create(
                Element::new(NodeKind::Generic).image(spec.natural.0, spec.natural.1, spec.complete),
            );
            doc.append_child(row, cell);
            doc.append_child(cell, tile);
            doc.append_child(tile, backdrop);
            doc.append_child(tile, image);
            cells.push(cell);
            tiles.push(tile);
            backdrops.push(backdrop);
            images.push(image);
        }
    }

    let into_array = |v: Vec<NodeId>| -> [NodeId; 4] { v.try_into().expect("four tiles") };
    GalleryFixture {
        doc,
        group,
        ratio_box,
        rows: rows.try_into().expect("two rows"),
        cells: into_array(cells),
        tiles: into_array(tiles),
        backdrops: into_array(backdrops),
        images: into_array(images),
    }
}

/// The default demo gallery: four landscape images over a 600px box.
pub fn standard() -> GalleryFixture {
    gallery([TileSpec::default(); 4], 600.0)
}

/// Marks an image resource as finished loading. The caller still owns
/// telling the engine via `LayoutEvent::ImageLoaded`.
pub fn complete_image(doc: &mut Document, image: NodeId) {
    if let Some(img) = doc.get_mut(image).and_then(|el| el.image.as_mut()) {
        img.complete = true;
    }
}

impl GalleryFixture {
    /// Crude stand-in for the host's flex pass: distributes the placeholder
    /// height across rows by their grow weights and propagates the resulting
    /// frames to cells and backdrops. Frames are only authoritative after
    /// this has run, which is exactly what the engine's frame event models.
    pub fn settle(&mut self) {
        let (rows, cells, backdrops, ratio_box) =
            (self.rows, self.cells, self.backdrops, self.ratio_box);
        let doc = &mut self.doc;
        let Some(box_el) = doc.get(ratio_box) else { return };
        let width = box_el.measured.width;
        let percent = box_el.style.padding_bottom.unwrap_or(0.0);
        let total_height = width * percent / 100.0;
        if let Some(el) = doc.get_mut(ratio_box) {
            el.measured.height = total_height;
        }

        let grows: Vec<f64> = rows
            .iter()
            .map(|&row| doc.get(row).and_then(|el| el.style.flex_grow).unwrap_or(1.0))
            .collect();
        let total_grow: f64 = grows.iter().sum();
        for (i, &row) in rows.iter().enumerate() {
            let share = if total_grow > 0.0 { grows[i] / total_grow } else { 0.5 };
            let row_height = total_height * share;
            let stacked = doc
                .get(row)
                .is_some_and(|el| el.style.flex_direction.is_some());
            if let Some(el) = doc.get_mut(row) {
                el.measured = Size::new(width, row_height);
            }
            for j in 0..2 {
                let cell = cells[i * 2 + j];
                let frame = if stacked {
                    Size::new(width, row_height / 2.0)
                } else {
                    let cell_width = doc.get(cell).map(|el| el.measured.width).unwrap_or(0.0);
                    Size::new(cell_width, row_height)
                };
                if let Some(el) = doc.get_mut(cell) {
                    el.measured = frame;
                }
                if let Some(el) = doc.get_mut(backdrops[i * 2 + j]) {
                    el.measured = frame;
                }
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), FixtureError> {
        let encoded = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        fs::write(path, encoded)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<GalleryFixture, FixtureError> {
        Ok(ron::from_str(&fs::read_to_string(path)?)?)
    }
}
