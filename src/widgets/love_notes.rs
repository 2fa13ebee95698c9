//! LoveNotes: a burst of notes that scatter from a central heart.
//!
//! Purely presentational. Each note flies out along a random angle, then
//! settles somewhere near the centre; afterwards the user can drag notes
//! around freely. Positions are regenerated on every mount.

use super::GateWidget;
use crate::core::gesture::DragSummary;
use crate::core::input_result::InputResult;
use crate::data::{ElementId, Measure, Point};
use rand::Rng;
use std::time::Instant;

pub const LOVE_NOTES: &[&str] = &[
    "Tu sonrisa ✨",
    "Tu voluntad 💪",
    "Tu inteligencia 🧠",
    "Tu corazón bonito ❤️",
    "Tu sentido del humor 😂",
    "Tu forma de ser única 🌟",
    "Tu guapura 😍",
    "Tu apoyo 💖",
    "Tu locura 😜",
    "Tu nivel de cuteness 🧸",
    "Tus bobadas 😂",
    "Toda tú 😍",
    "Tu ternura 🧸",
    "Nuestras risas 😂",
    "Tu apoyo incondicional 💖",
    "Tu mirada ✨",
];

/// Seconds the central heart takes to burst and fade
pub const BURST_SECS: f32 = 1.0;

/// Fraction of a note's flight spent reaching the burst point
const BURST_PHASE: f32 = 0.3;

#[derive(Debug, Clone)]
pub struct FlyingNote {
    pub text: &'static str,
    pub burst: Point,
    pub settle: Point,
    pub delay: f32,
    pub duration: f32,
    pub rotate: f32,
    /// Accumulated user drag
    pub dragged: Point,
}

impl FlyingNote {
    /// Offset from the centre at `elapsed` seconds since mount
    pub fn position_at(&self, elapsed: f32) -> Point {
        let t = ((elapsed - self.delay) / self.duration).clamp(0.0, 1.0);
        let base = if t < BURST_PHASE {
            let k = t / BURST_PHASE;
            Point::new(self.burst.x * k, self.burst.y * k)
        } else {
            let k = (t - BURST_PHASE) / (1.0 - BURST_PHASE);
            let eased = 1.0 - (1.0 - k) * (1.0 - k);
            Point::new(
                self.burst.x + (self.settle.x - self.burst.x) * eased,
                self.burst.y + (self.settle.y - self.burst.y) * eased,
            )
        };
        base.offset(self.dragged.x, self.dragged.y)
    }

    pub fn is_settled(&self, elapsed: f32) -> bool {
        elapsed >= self.delay + self.duration
    }
}

#[derive(Debug, Clone)]
pub struct LoveNotesState {
    pub notes: Vec<FlyingNote>,
    mounted_at: Instant,
    active_drag: Option<(usize, Point)>,
}

impl LoveNotesState {
    pub fn new(now: Instant, rng: &mut impl Rng) -> Self {
        let notes = LOVE_NOTES
            .iter()
            .map(|&text| {
                let angle = rng.random::<f32>() * std::f32::consts::TAU;
                let distance = 100.0 + rng.random::<f32>() * 150.0;
                FlyingNote {
                    text,
                    burst: Point::new(angle.cos() * distance, angle.sin() * distance),
                    settle: Point::new(
                        (rng.random::<f32>() - 0.5) * 200.0,
                        (rng.random::<f32>() - 0.5) * 200.0,
                    ),
                    delay: rng.random::<f32>() * 0.5,
                    duration: 2.0 + rng.random::<f32>() * 1.5,
                    rotate: (rng.random::<f32>() - 0.5) * 30.0,
                    dragged: Point::default(),
                }
            })
            .collect();

        Self {
            notes,
            mounted_at: now,
            active_drag: None,
        }
    }

    pub fn elapsed(&self, now: Instant) -> f32 {
        now.saturating_duration_since(self.mounted_at).as_secs_f32()
    }
}

impl GateWidget for LoveNotesState {
    fn draggable_elements(&self) -> Vec<ElementId> {
        (0..self.notes.len()).map(ElementId::LoveNote).collect()
    }

    fn element_offset(&self, id: ElementId) -> Point {
        match (id, self.active_drag) {
            (ElementId::LoveNote(i), Some((dragging, offset))) if i == dragging => offset,
            _ => Point::default(),
        }
    }

    fn on_press(&mut self, id: ElementId, _now: Instant) -> InputResult {
        match id {
            ElementId::LoveNote(i) if i < self.notes.len() => {
                self.active_drag = Some((i, Point::default()));
                InputResult::Continue
            }
            _ => InputResult::Ignored,
        }
    }

    fn on_drag(&mut self, id: ElementId, offset: Point) {
        if let (ElementId::LoveNote(i), Some((dragging, _))) = (id, self.active_drag) {
            if i == dragging {
                self.active_drag = Some((i, offset));
            }
        }
    }

    fn on_release(
        &mut self,
        id: ElementId,
        summary: DragSummary,
        _measure: &dyn Measure,
        _now: Instant,
    ) -> InputResult {
        let ElementId::LoveNote(i) = id else {
            return InputResult::Ignored;
        };
        self.active_drag = None;
        match self.notes.get_mut(i) {
            Some(note) => {
                note.dragged = note.dragged.offset(summary.offset.x, summary.offset.y);
                InputResult::Continue
            }
            None => InputResult::Ignored,
        }
    }

    fn is_animating(&self, now: Instant) -> bool {
        let elapsed = self.elapsed(now);
        elapsed < BURST_SECS || self.notes.iter().any(|n| !n.is_settled(elapsed))
    }
}
