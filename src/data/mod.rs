//! Data layer - Pure state without UI coupling
//!
//! This module contains the manifest, media classification and geometry as
//! pure data structures. NO imports from frontend/ or any rendering code.

pub mod geometry;
pub mod media;
pub mod slide;
pub mod ui_state;

pub use geometry::{Bounds, CellMetrics, Point};
pub use media::{MediaItem, MediaKind};
pub use slide::{InteractionKind, Manifest, SlideDescriptor, SlideType};
pub use ui_state::{ElementId, Measure, UiState};
