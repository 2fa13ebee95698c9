//! Slide sequencer
//!
//! Single source of truth for which slide is visible and whether the user
//! may proceed. Every navigation path (keys, controls, progress markers,
//! swipes, widget completion) goes through these operations. Rejected moves
//! are silent no-ops that leave the state untouched; each operation returns
//! whether it changed the index so callers can log.

use crate::data::{Manifest, SlideDescriptor};
use std::collections::HashMap;

/// Direction of the last navigation (drives the slide-in animation)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Result of resolving a drag-release on the slide surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeOutcome {
    Advanced,
    Retreated,
    /// Below threshold or rejected by the gate; the slide snaps back
    SnapBack,
}

/// Swipe power: |offset| * |velocity|
pub fn swipe_power(offset: f32, velocity: f32) -> f32 {
    offset.abs() * velocity.abs()
}

/// Presentation position plus per-slide completion
#[derive(Debug, Clone)]
pub struct SlideSequencer {
    manifest: Manifest,
    current_index: usize,
    completed_by_index: HashMap<usize, bool>,
    direction: Direction,
    swipe_confidence_threshold: f32,
}

impl SlideSequencer {
    pub fn new(manifest: Manifest, swipe_confidence_threshold: f32) -> Self {
        Self {
            manifest,
            current_index: 0,
            completed_by_index: HashMap::new(),
            direction: Direction::Forward,
            swipe_confidence_threshold,
        }
    }

    pub fn len(&self) -> usize {
        self.manifest.len()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_slide(&self) -> &SlideDescriptor {
        // Manifest::new guarantees at least one slide and the index is kept in range
        &self.manifest.slides()[self.current_index]
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Whether the gate at `index` lets the user move past it.
    /// Non-gated slides are always satisfied without an entry.
    pub fn is_gate_satisfied(&self, index: usize) -> bool {
        match self.manifest.get(index) {
            Some(slide) if slide.is_gated() => {
                self.completed_by_index.get(&index).copied().unwrap_or(false)
            }
            Some(_) => true,
            None => false,
        }
    }

    pub fn is_completed(&self, index: usize) -> bool {
        self.completed_by_index.get(&index).copied().unwrap_or(false)
    }

    pub fn completed_count(&self) -> usize {
        self.completed_by_index.values().filter(|c| **c).count()
    }

    pub fn is_terminal(&self) -> bool {
        self.current_index + 1 >= self.len()
    }

    pub fn is_visited(&self, index: usize) -> bool {
        index <= self.current_index
    }

    pub fn can_advance(&self) -> bool {
        !self.is_terminal() && self.is_gate_satisfied(self.current_index)
    }

    pub fn can_retreat(&self) -> bool {
        self.current_index > 0
    }

    /// Move forward one slide if not terminal and the current gate is satisfied
    pub fn advance(&mut self) -> bool {
        if !self.can_advance() {
            tracing::debug!(
                "advance rejected at slide {} (terminal={}, gate={})",
                self.current_index,
                self.is_terminal(),
                self.is_gate_satisfied(self.current_index)
            );
            return false;
        }
        self.direction = Direction::Forward;
        self.current_index += 1;
        tracing::info!("Advanced to slide {}", self.current_index);
        true
    }

    /// Move back one slide; never touches completion flags
    pub fn retreat(&mut self) -> bool {
        if !self.can_retreat() {
            return false;
        }
        self.direction = Direction::Backward;
        self.current_index -= 1;
        tracing::info!("Retreated to slide {}", self.current_index);
        true
    }

    /// Record that the widget bound to `index` finished, then advance.
    ///
    /// Ignored unless `index` is the current slide, so a completion that
    /// arrives after the user navigated away (or a second call after the first
    /// already advanced) changes nothing.
    pub fn mark_complete(&mut self, index: usize) -> bool {
        if index != self.current_index {
            tracing::debug!(
                "Ignoring completion for slide {} (current is {})",
                index,
                self.current_index
            );
            return false;
        }
        match self.manifest.get(index) {
            Some(slide) if slide.is_gated() => {
                self.completed_by_index.insert(index, true);
            }
            Some(_) => {}
            None => return false,
        }
        self.advance()
    }

    /// Direct navigation from the progress indicator
    pub fn jump_to(&mut self, index: usize) -> bool {
        let allowed = index <= self.current_index
            || (index == self.current_index + 1 && self.can_advance());
        if !allowed || index >= self.len() {
            tracing::debug!("jump_to({}) rejected at slide {}", index, self.current_index);
            return false;
        }
        if index == self.current_index {
            return false;
        }
        self.direction = if index > self.current_index {
            Direction::Forward
        } else {
            Direction::Backward
        };
        self.current_index = index;
        tracing::info!("Jumped to slide {}", index);
        true
    }

    /// Resolve a horizontal drag-release on the slide surface.
    /// Negative offset means "next", positive means "previous".
    pub fn resolve_swipe(&mut self, offset: f32, velocity: f32) -> SwipeOutcome {
        let power = swipe_power(offset, velocity);
        if power <= self.swipe_confidence_threshold {
            return SwipeOutcome::SnapBack;
        }
        if offset < 0.0 && self.advance() {
            SwipeOutcome::Advanced
        } else if offset > 0.0 && self.retreat() {
            SwipeOutcome::Retreated
        } else {
            SwipeOutcome::SnapBack
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::slide::{gated, slide};
    use crate::data::{InteractionKind, SlideType};

    const THRESHOLD: f32 = 10_000.0;

    fn sequencer(slides: Vec<SlideDescriptor>) -> SlideSequencer {
        SlideSequencer::new(Manifest::new(slides).unwrap(), THRESHOLD)
    }

    fn mixed() -> SlideSequencer {
        sequencer(vec![
            slide("cover", SlideType::Cover),
            gated("heart", InteractionKind::HeartRepair),
            slide("text", SlideType::TextOnly),
            gated("hands", InteractionKind::HandsSnap),
            slide("end", SlideType::Final),
        ])
    }

    #[test]
    fn test_ungated_slides_always_advance() {
        let mut seq = sequencer(vec![
            slide("a", SlideType::Cover),
            slide("b", SlideType::TextOnly),
            slide("c", SlideType::ImageCollage),
            slide("d", SlideType::LoveNotes),
            slide("e", SlideType::Final),
        ]);
        for expected in 1..5 {
            assert!(seq.advance());
            assert_eq!(seq.current_index(), expected);
        }
        assert!(!seq.advance());
        assert_eq!(seq.current_index(), 4);
    }

    #[test]
    fn test_gated_slide_blocks_until_complete() {
        let mut seq = mixed();
        assert!(seq.advance());
        assert_eq!(seq.current_index(), 1);

        for _ in 0..3 {
            assert!(!seq.advance());
            assert_eq!(seq.current_index(), 1);
        }

        assert!(seq.mark_complete(1));
        assert_eq!(seq.current_index(), 2);
        assert_eq!(seq.direction(), Direction::Forward);
    }

    #[test]
    fn test_mark_complete_twice_advances_once() {
        let mut seq = mixed();
        seq.advance();
        assert!(seq.mark_complete(1));
        assert!(!seq.mark_complete(1));
        assert_eq!(seq.current_index(), 2);
        assert_eq!(seq.completed_count(), 1);
    }

    #[test]
    fn test_mark_complete_for_non_current_slide_is_ignored() {
        let mut seq = mixed();
        seq.advance();
        seq.retreat();
        assert!(!seq.mark_complete(1));
        assert!(!seq.is_completed(1));
        assert_eq!(seq.current_index(), 0);
    }

    #[test]
    fn test_ungated_slides_never_get_completion_entries() {
        let mut seq = mixed();
        assert!(seq.mark_complete(0));
        assert_eq!(seq.current_index(), 1);
        assert!(!seq.is_completed(0));
        assert!(seq.is_gate_satisfied(0));
    }

    #[test]
    fn test_retreat_keeps_completion() {
        let mut seq = mixed();
        seq.advance();
        seq.mark_complete(1);
        assert_eq!(seq.current_index(), 2);

        assert!(seq.retreat());
        assert_eq!(seq.current_index(), 1);
        assert_eq!(seq.direction(), Direction::Backward);
        assert!(seq.is_completed(1));

        // Earned progress stays earned
        assert!(seq.advance());
        assert_eq!(seq.current_index(), 2);
    }

    #[test]
    fn test_retreat_at_start_is_noop() {
        let mut seq = mixed();
        assert!(!seq.retreat());
        assert_eq!(seq.current_index(), 0);
        assert_eq!(seq.direction(), Direction::Forward);
    }

    #[test]
    fn test_jump_to_rules() {
        let mut seq = mixed();
        // Ahead by more than one step
        assert!(!seq.jump_to(2));
        // Next slide with satisfied gate
        assert!(seq.jump_to(1));
        assert_eq!(seq.current_index(), 1);
        // Next slide behind an unsatisfied gate
        assert!(!seq.jump_to(2));
        assert_eq!(seq.current_index(), 1);
        // Backwards is always fine
        assert!(seq.jump_to(0));
        assert_eq!(seq.direction(), Direction::Backward);
        // Out of range
        assert!(!seq.jump_to(99));
        assert_eq!(seq.current_index(), 0);
    }

    #[test]
    fn test_jump_to_past_completed_gate() {
        let mut seq = mixed();
        seq.advance();
        seq.mark_complete(1);
        seq.advance();
        assert_eq!(seq.current_index(), 3);
        assert!(seq.jump_to(1));
        assert!(seq.jump_to(2));
        assert_eq!(seq.current_index(), 2);
    }

    #[test]
    fn test_heart_repair_scenario() {
        let mut seq = sequencer(vec![
            slide("cover", SlideType::Cover),
            gated("heart", InteractionKind::HeartRepair),
            slide("end", SlideType::Final),
        ]);
        assert!(seq.advance());
        assert!(!seq.advance());
        assert_eq!(seq.current_index(), 1);
        assert!(seq.mark_complete(1));
        assert_eq!(seq.current_index(), 2);
        assert!(seq.is_terminal());
        assert!(!seq.advance());
        assert_eq!(seq.current_index(), 2);
    }

    #[test]
    fn test_swipe_power_threshold() {
        let mut seq = mixed();
        assert_eq!(seq.resolve_swipe(-50.0, 50.0), SwipeOutcome::SnapBack);
        assert_eq!(seq.current_index(), 0);

        assert_eq!(seq.resolve_swipe(-500.0, 50.0), SwipeOutcome::Advanced);
        assert_eq!(seq.current_index(), 1);

        // Gate blocks even a confident swipe
        assert_eq!(seq.resolve_swipe(-500.0, 50.0), SwipeOutcome::SnapBack);
        assert_eq!(seq.current_index(), 1);

        assert_eq!(seq.resolve_swipe(500.0, -50.0), SwipeOutcome::Retreated);
        assert_eq!(seq.current_index(), 0);
    }

    #[test]
    fn test_swipe_exactly_at_threshold_snaps_back() {
        let mut seq = mixed();
        assert_eq!(seq.resolve_swipe(-100.0, 100.0), SwipeOutcome::SnapBack);
        assert_eq!(seq.current_index(), 0);
    }
}
