//! UI State - element measurements and hit regions
//!
//! The frontend records where it drew every interactive element during the
//! last frame; the core reads these back to hit-test pointer events and to
//! measure widget geometry at drag-release time. Nothing here knows how the
//! elements were drawn.

use super::geometry::{Bounds, Point};
use std::collections::HashMap;

/// Interactive elements whose on-screen bounds the frontend reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementId {
    /// "Previous slide" control
    PrevControl,
    /// "Next slide" control
    NextControl,
    /// Progress marker for the slide at this index
    ProgressMarker(usize),
    /// Music player panel toggle
    MusicToggle,
    /// Music player mute toggle
    MuteToggle,
    /// The whole slide surface (swipe area)
    SlideSurface,
    /// HeartRepair: draggable band-aid
    Bandage,
    /// HeartRepair: drop target
    Heart,
    /// HandsSnap: the static left hand
    LeftHand,
    /// HandsSnap: the draggable right hand
    RightHand,
    /// BookOpen: the closed book
    Book,
    /// LoveNotes: a draggable note
    LoveNote(usize),
}

impl ElementId {
    /// Elements owned by the mounted widget (cleared on unmount)
    pub fn is_widget_element(&self) -> bool {
        matches!(
            self,
            Self::Bandage
                | Self::Heart
                | Self::LeftHand
                | Self::RightHand
                | Self::Book
                | Self::LoveNote(_)
        )
    }
}

/// Read-only view of the last frame's element bounds
pub trait Measure {
    /// Bounds of an element as of the last render, `None` if it is not mounted
    fn bounds(&self, id: ElementId) -> Option<Bounds>;

    /// Width of the viewport in pixels
    fn viewport_width_px(&self) -> f32;
}

/// Element bounds recorded by the frontend
#[derive(Clone, Debug, Default)]
pub struct UiState {
    elements: HashMap<ElementId, Bounds>,

    /// Topmost-first order used for hit testing
    z_order: Vec<ElementId>,

    /// Viewport size in pixels
    pub viewport_px: (f32, f32),
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an element's bounds; later registrations are on top
    pub fn register(&mut self, id: ElementId, bounds: Bounds) {
        if self.elements.insert(id, bounds).is_none() {
            self.z_order.insert(0, id);
        } else if let Some(pos) = self.z_order.iter().position(|e| *e == id) {
            self.z_order.remove(pos);
            self.z_order.insert(0, id);
        }
    }

    /// Forget every element (start of a frame)
    pub fn clear(&mut self) {
        self.elements.clear();
        self.z_order.clear();
    }

    /// Forget the mounted widget's elements (unmount)
    pub fn clear_widget_elements(&mut self) {
        self.elements.retain(|id, _| !id.is_widget_element());
        self.z_order.retain(|id| !id.is_widget_element());
    }

    /// Topmost element under a point
    pub fn hit_test(&self, p: Point) -> Option<ElementId> {
        self.z_order
            .iter()
            .copied()
            .filter(|id| *id != ElementId::SlideSurface)
            .find(|id| self.elements.get(id).is_some_and(|b| b.contains(p)))
    }

    pub fn set_viewport(&mut self, width_px: f32, height_px: f32) {
        self.viewport_px = (width_px, height_px);
    }
}

impl Measure for UiState {
    fn bounds(&self, id: ElementId) -> Option<Bounds> {
        self.elements.get(&id).copied()
    }

    fn viewport_width_px(&self) -> f32 {
        self.viewport_px.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_test_prefers_topmost() {
        let mut ui = UiState::new();
        ui.register(ElementId::SlideSurface, Bounds::new(0.0, 0.0, 800.0, 600.0));
        ui.register(ElementId::Heart, Bounds::new(100.0, 100.0, 200.0, 200.0));
        ui.register(ElementId::Bandage, Bounds::new(150.0, 150.0, 50.0, 50.0));

        assert_eq!(ui.hit_test(Point::new(160.0, 160.0)), Some(ElementId::Bandage));
        assert_eq!(ui.hit_test(Point::new(110.0, 110.0)), Some(ElementId::Heart));
        // The surface itself never wins a hit test
        assert_eq!(ui.hit_test(Point::new(5.0, 5.0)), None);
    }

    #[test]
    fn test_clear_widget_elements_keeps_chrome() {
        let mut ui = UiState::new();
        ui.register(ElementId::NextControl, Bounds::new(0.0, 0.0, 10.0, 10.0));
        ui.register(ElementId::Bandage, Bounds::new(0.0, 0.0, 10.0, 10.0));
        ui.clear_widget_elements();
        assert!(ui.bounds(ElementId::NextControl).is_some());
        assert!(ui.bounds(ElementId::Bandage).is_none());
    }
}
