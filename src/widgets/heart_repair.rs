//! HeartRepair gate: drag the band-aid onto the broken heart.
//!
//! On release the band-aid centre (its measured layout bounds plus the drag
//! translation) is compared with the heart centre, both read at release time
//! so the check follows the heart wherever it is currently laid out.

use super::{GateWidget, Particle};
use crate::config::GestureConfig;
use crate::core::gesture::DragSummary;
use crate::core::input_result::InputResult;
use crate::data::{ElementId, Measure, Point};
use rand::Rng;
use std::time::{Duration, Instant};

const PARTICLE_COUNT: usize = 20;
const PARTICLE_SPREAD_PX: f32 = 500.0;
const PARTICLE_MAX_DELAY: f32 = 0.4;
pub const CELEBRATION_SECS: f32 = 2.0;

#[derive(Debug, Clone)]
pub struct HeartRepairState {
    gestures: GestureConfig,
    complete_after: Duration,

    /// Translation kept between drags (the band-aid stays where it is dropped)
    rest_offset: Point,
    /// Translation of the drag in progress
    drag_offset: Point,

    repaired_at: Option<Instant>,

    /// Generated on mount, shown when repaired
    pub particles: Vec<Particle>,
}

impl HeartRepairState {
    pub fn new(gestures: GestureConfig, complete_after_ms: u64, rng: &mut impl Rng) -> Self {
        Self {
            gestures,
            complete_after: Duration::from_millis(complete_after_ms),
            rest_offset: Point::default(),
            drag_offset: Point::default(),
            repaired_at: None,
            particles: Particle::burst(PARTICLE_COUNT, PARTICLE_SPREAD_PX, PARTICLE_MAX_DELAY, rng),
        }
    }

    pub fn is_repaired(&self) -> bool {
        self.repaired_at.is_some()
    }

    pub fn repaired_at(&self) -> Option<Instant> {
        self.repaired_at
    }

    pub fn bandage_offset(&self) -> Point {
        self.rest_offset
            .offset(self.drag_offset.x, self.drag_offset.y)
    }

    /// Distance between band-aid and heart centres, if both are measurable
    fn release_distance(&self, measure: &dyn Measure) -> Option<f32> {
        let bandage = measure.bounds(ElementId::Bandage)?;
        let heart = measure.bounds(ElementId::Heart)?;
        let off = self.bandage_offset();
        let bandage_center = bandage.center().offset(off.x, off.y);
        Some(bandage_center.distance_to(heart.center()))
    }
}

impl GateWidget for HeartRepairState {
    fn is_satisfied(&self) -> bool {
        self.is_repaired()
    }

    fn draggable_elements(&self) -> Vec<ElementId> {
        if self.is_repaired() {
            Vec::new()
        } else {
            vec![ElementId::Bandage]
        }
    }

    fn element_offset(&self, id: ElementId) -> Point {
        match id {
            ElementId::Bandage => self.bandage_offset(),
            _ => Point::default(),
        }
    }

    fn on_press(&mut self, id: ElementId, _now: Instant) -> InputResult {
        if id == ElementId::Bandage && !self.is_repaired() {
            self.drag_offset = Point::default();
            InputResult::Continue
        } else {
            InputResult::Ignored
        }
    }

    fn on_drag(&mut self, id: ElementId, offset: Point) {
        if id == ElementId::Bandage && !self.is_repaired() {
            self.drag_offset = offset;
        }
    }

    fn on_release(
        &mut self,
        id: ElementId,
        summary: DragSummary,
        measure: &dyn Measure,
        now: Instant,
    ) -> InputResult {
        if id != ElementId::Bandage || self.is_repaired() {
            return InputResult::Ignored;
        }
        self.drag_offset = summary.offset;

        let Some(distance) = self.release_distance(measure) else {
            tracing::debug!("HeartRepair release without measurable geometry; ignoring");
            self.rest_offset = self.bandage_offset();
            self.drag_offset = Point::default();
            return InputResult::Continue;
        };

        let threshold = self.gestures.heart_repair_threshold(measure.viewport_width_px());
        tracing::debug!(
            "HeartRepair release: distance={:.1}px threshold={:.1}px",
            distance,
            threshold
        );

        if distance < threshold {
            // Lock the band-aid in place over the heart
            self.rest_offset = Point::default();
            self.drag_offset = Point::default();
            self.repaired_at = Some(now);
            tracing::info!("Heart repaired");
            InputResult::satisfied(self.complete_after)
        } else {
            self.rest_offset = self.bandage_offset();
            self.drag_offset = Point::default();
            InputResult::Continue
        }
    }

    fn is_animating(&self, now: Instant) -> bool {
        self.repaired_at
            .is_some_and(|t| now.saturating_duration_since(t).as_secs_f32() < CELEBRATION_SECS + PARTICLE_MAX_DELAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Bounds, UiState};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn widget() -> HeartRepairState {
        let mut rng = StdRng::seed_from_u64(1);
        HeartRepairState::new(GestureConfig::default(), 2000, &mut rng)
    }

    /// Heart centred at (400, 300); band-aid laid out with its centre at (100, 300)
    fn layout() -> UiState {
        let mut ui = UiState::new();
        ui.set_viewport(800.0, 600.0);
        ui.register(ElementId::Heart, Bounds::new(300.0, 200.0, 200.0, 200.0));
        ui.register(ElementId::Bandage, Bounds::new(60.0, 280.0, 80.0, 40.0));
        ui
    }

    fn release(w: &mut HeartRepairState, dx: f32, dy: f32, measure: &dyn Measure) -> InputResult {
        let now = Instant::now();
        w.on_press(ElementId::Bandage, now);
        w.on_drag(ElementId::Bandage, Point::new(dx, dy));
        let summary = DragSummary {
            offset: Point::new(dx, dy),
            velocity: Point::default(),
        };
        w.on_release(ElementId::Bandage, summary, measure, now)
    }

    #[test]
    fn test_release_near_heart_repairs() {
        let mut w = widget();
        // Ends 10px from the heart centre
        let result = release(&mut w, 290.0, 0.0, &layout());
        assert_eq!(result, InputResult::satisfied(Duration::from_millis(2000)));
        assert!(w.is_satisfied());
        assert!(w.draggable_elements().is_empty());
        assert_eq!(w.bandage_offset(), Point::default());
    }

    #[test]
    fn test_release_exactly_at_threshold_is_not_satisfied() {
        let mut w = widget();
        // 80px short of the heart centre, threshold is 80px (strict)
        let result = release(&mut w, 220.0, 0.0, &layout());
        assert_eq!(result, InputResult::Continue);
        assert!(!w.is_satisfied());
    }

    #[test]
    fn test_band_aid_stays_where_dropped() {
        let mut w = widget();
        release(&mut w, 100.0, 0.0, &layout());
        assert_eq!(w.bandage_offset(), Point::new(100.0, 0.0));

        // Second drag continues from the dropped position
        let result = release(&mut w, 195.0, 0.0, &layout());
        assert!(result.is_satisfied());
    }

    #[test]
    fn test_missing_geometry_is_not_satisfied() {
        let mut w = widget();
        let mut ui = UiState::new();
        ui.register(ElementId::Bandage, Bounds::new(60.0, 280.0, 80.0, 40.0));
        let result = release(&mut w, 290.0, 0.0, &ui);
        assert_eq!(result, InputResult::Continue);
        assert!(!w.is_satisfied());

        // Retry once the heart is measurable
        w.rest_offset = Point::default();
        assert!(release(&mut w, 290.0, 0.0, &layout()).is_satisfied());
    }

    #[test]
    fn test_repeated_misses_never_satisfy() {
        let mut w = widget();
        for _ in 0..5 {
            w.rest_offset = Point::default();
            assert!(!release(&mut w, 0.0, 150.0, &layout()).is_satisfied());
        }
        assert!(!w.is_satisfied());
    }

    #[test]
    fn test_release_after_repair_is_ignored() {
        let mut w = widget();
        assert!(release(&mut w, 290.0, 0.0, &layout()).is_satisfied());
        assert_eq!(release(&mut w, 290.0, 0.0, &layout()), InputResult::Ignored);
    }

    #[test]
    fn test_responsive_threshold() {
        let mut rng = StdRng::seed_from_u64(1);
        let gestures = GestureConfig {
            heart_repair_responsive: true,
            ..GestureConfig::default()
        };
        let mut w = HeartRepairState::new(gestures, 2000, &mut rng);
        // Viewport 800px -> min(150, 160) = 150; 120px away succeeds
        assert!(release(&mut w, 180.0, 0.0, &layout()).is_satisfied());
    }
}
