pub mod background;
pub mod engine;
pub mod geometry;
pub mod ratio_box;
pub mod reorder;
pub mod rows;
pub mod schedule;

pub use engine::{
    GapStep, LayoutCommand, LayoutEngine, LayoutEvent, LayoutState, Mode, TILES_PER_GROUP,
};
pub use ratio_box::RatioBoxOutcome;
pub use reorder::DragSession;
pub use schedule::{FrameScheduler, ImageWatch};
