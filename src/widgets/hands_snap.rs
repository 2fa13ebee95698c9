//! HandsSnap gate: pull the right hand over to the left one.
//!
//! Only the horizontal component of the drag counts. A release whose
//! horizontal offset is strictly beyond the (negative) snap threshold joins
//! the hands.

use super::{GateWidget, Particle};
use crate::config::GestureConfig;
use crate::core::gesture::DragSummary;
use crate::core::input_result::InputResult;
use crate::data::{ElementId, Measure, Point};
use rand::Rng;
use std::time::{Duration, Instant};

const HEART_COUNT: usize = 15;
const HEART_SPREAD_PX: f32 = 600.0;
const HEART_MAX_DELAY: f32 = 0.5;
pub const CELEBRATION_SECS: f32 = 2.0;

#[derive(Debug, Clone)]
pub struct HandsSnapState {
    gestures: GestureConfig,
    complete_after: Duration,
    drag_offset_x: f32,
    joined_at: Option<Instant>,

    /// Generated on mount, released when the hands meet
    pub hearts: Vec<Particle>,
}

impl HandsSnapState {
    pub fn new(gestures: GestureConfig, complete_after_ms: u64, rng: &mut impl Rng) -> Self {
        Self {
            gestures,
            complete_after: Duration::from_millis(complete_after_ms),
            drag_offset_x: 0.0,
            joined_at: None,
            hearts: Particle::burst(HEART_COUNT, HEART_SPREAD_PX, HEART_MAX_DELAY, rng),
        }
    }

    pub fn is_joined(&self) -> bool {
        self.joined_at.is_some()
    }

    pub fn joined_at(&self) -> Option<Instant> {
        self.joined_at
    }

    /// Horizontal translation of the right hand
    pub fn drag_offset_x(&self) -> f32 {
        self.drag_offset_x
    }

    fn join(&mut self, now: Instant) {
        self.joined_at = Some(now);
        self.drag_offset_x = 0.0;
    }
}

impl GateWidget for HandsSnapState {
    fn is_satisfied(&self) -> bool {
        self.is_joined()
    }

    fn draggable_elements(&self) -> Vec<ElementId> {
        if self.is_joined() {
            Vec::new()
        } else {
            vec![ElementId::RightHand]
        }
    }

    fn element_offset(&self, id: ElementId) -> Point {
        match id {
            ElementId::RightHand => Point::new(self.drag_offset_x, 0.0),
            _ => Point::default(),
        }
    }

    fn on_press(&mut self, id: ElementId, _now: Instant) -> InputResult {
        if id == ElementId::RightHand && !self.is_joined() {
            InputResult::Continue
        } else {
            InputResult::Ignored
        }
    }

    fn on_drag(&mut self, id: ElementId, offset: Point) {
        if id == ElementId::RightHand && !self.is_joined() {
            // Never drag the hand off to the right
            self.drag_offset_x = offset.x.min(0.0);
        }
    }

    fn on_release(
        &mut self,
        id: ElementId,
        summary: DragSummary,
        measure: &dyn Measure,
        now: Instant,
    ) -> InputResult {
        if id != ElementId::RightHand || self.is_joined() {
            return InputResult::Ignored;
        }

        // Springs back unless the hands join
        self.drag_offset_x = 0.0;

        if measure.bounds(ElementId::LeftHand).is_none()
            || measure.bounds(ElementId::RightHand).is_none()
        {
            tracing::debug!("HandsSnap release without measurable hands; ignoring");
            return InputResult::Continue;
        }

        let threshold = self.gestures.hands_snap_threshold(measure.viewport_width_px());
        tracing::debug!(
            "HandsSnap release: offset_x={:.1}px threshold=-{:.1}px",
            summary.offset.x,
            threshold
        );

        if summary.offset.x < -threshold {
            self.join(now);
            tracing::info!("Hands joined");
            InputResult::satisfied(self.complete_after)
        } else {
            InputResult::Continue
        }
    }

    fn is_animating(&self, now: Instant) -> bool {
        self.joined_at.is_some_and(|t| {
            now.saturating_duration_since(t).as_secs_f32() < CELEBRATION_SECS + HEART_MAX_DELAY
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Bounds, UiState};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn hands() -> HandsSnapState {
        HandsSnapState::new(GestureConfig::default(), 2000, &mut StdRng::seed_from_u64(3))
    }

    fn layout(viewport_width: f32) -> UiState {
        let mut ui = UiState::new();
        ui.set_viewport(viewport_width, 600.0);
        ui.register(ElementId::LeftHand, Bounds::new(40.0, 250.0, 200.0, 100.0));
        ui.register(ElementId::RightHand, Bounds::new(520.0, 250.0, 200.0, 100.0));
        ui
    }

    fn release(w: &mut HandsSnapState, dx: f32, measure: &dyn Measure) -> InputResult {
        let now = Instant::now();
        w.on_press(ElementId::RightHand, now);
        w.on_drag(ElementId::RightHand, Point::new(dx, 12.0));
        let summary = DragSummary {
            offset: Point::new(dx, 12.0),
            velocity: Point::default(),
        };
        w.on_release(ElementId::RightHand, summary, measure, now)
    }

    #[test]
    fn test_far_left_drag_joins() {
        let mut w = hands();
        let result = release(&mut w, -200.0, &layout(1024.0));
        assert_eq!(result, InputResult::satisfied(Duration::from_millis(2000)));
        assert!(w.is_joined());
        assert_eq!(w.hearts.len(), 15);
    }

    #[test]
    fn test_hearts_follow_seeded_rng() {
        let a = HandsSnapState::new(GestureConfig::default(), 2000, &mut StdRng::seed_from_u64(9));
        let b = HandsSnapState::new(GestureConfig::default(), 2000, &mut StdRng::seed_from_u64(9));
        assert_eq!(a.hearts, b.hearts);
        assert_eq!(a.hearts.len(), 15);
        assert!(!a.is_joined());
    }

    #[test]
    fn test_threshold_is_strict() {
        let mut w = hands();
        assert_eq!(release(&mut w, -130.0, &layout(1024.0)), InputResult::Continue);
        assert!(!w.is_joined());
        assert_eq!(w.drag_offset_x(), 0.0);
    }

    #[test]
    fn test_narrow_viewport_uses_smaller_threshold() {
        let mut w = hands();
        assert!(release(&mut w, -100.0, &layout(600.0)).is_satisfied());
    }

    #[test]
    fn test_rightward_drag_never_joins() {
        let mut w = hands();
        w.on_drag(ElementId::RightHand, Point::new(300.0, 0.0));
        assert_eq!(w.drag_offset_x(), 0.0);
        assert!(!release(&mut w, 300.0, &layout(1024.0)).is_satisfied());
    }

    #[test]
    fn test_unmeasured_hands_do_not_join() {
        let mut w = hands();
        let mut ui = UiState::new();
        ui.set_viewport(1024.0, 600.0);
        ui.register(ElementId::RightHand, Bounds::new(520.0, 250.0, 200.0, 100.0));
        assert_eq!(release(&mut w, -400.0, &ui), InputResult::Continue);
        assert!(!w.is_joined());
    }
}
