//! Pointer drag tracking.
//!
//! Collects pointer samples between press and release and derives the total
//! offset and the release velocity (pixels per second over a short trailing
//! window), which the sequencer turns into swipe decisions and widgets turn
//! into element positions.

use crate::data::{ElementId, Point};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Velocity is measured over the samples in this trailing window
const VELOCITY_WINDOW: Duration = Duration::from_millis(100);

/// Cap on retained samples
const MAX_SAMPLES: usize = 32;

/// What a drag started on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragTarget {
    /// Empty slide surface (swipe navigation)
    Surface,
    /// An element owned by the mounted widget
    Element(ElementId),
}

/// An in-progress drag
#[derive(Debug, Clone)]
pub struct DragTracker {
    pub target: DragTarget,
    origin: Point,
    samples: VecDeque<(Instant, Point)>,
}

/// Summary of a finished (or in-progress) drag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSummary {
    pub offset: Point,
    /// Pixels per second
    pub velocity: Point,
}

impl DragTracker {
    pub fn begin(target: DragTarget, origin: Point, now: Instant) -> Self {
        let mut samples = VecDeque::with_capacity(MAX_SAMPLES);
        samples.push_back((now, origin));
        Self {
            target,
            origin,
            samples,
        }
    }

    pub fn update(&mut self, p: Point, now: Instant) {
        if self.samples.len() == MAX_SAMPLES {
            self.samples.pop_front();
        }
        self.samples.push_back((now, p));
    }

    /// Time of the most recent pointer sample
    pub fn last_sample_at(&self) -> Option<Instant> {
        self.samples.back().map(|(t, _)| *t)
    }

    pub fn current(&self) -> Point {
        self.samples.back().map(|(_, p)| *p).unwrap_or(self.origin)
    }

    /// Offset from the press position to the latest sample
    pub fn offset(&self) -> Point {
        let c = self.current();
        Point::new(c.x - self.origin.x, c.y - self.origin.y)
    }

    /// Velocity over the trailing window ending at the latest sample
    pub fn velocity(&self) -> Point {
        let Some(&(last_t, last_p)) = self.samples.back() else {
            return Point::default();
        };
        let first = self
            .samples
            .iter()
            .find(|(t, _)| last_t.saturating_duration_since(*t) <= VELOCITY_WINDOW)
            .copied();
        let Some((first_t, first_p)) = first else {
            return Point::default();
        };
        let dt = last_t.saturating_duration_since(first_t).as_secs_f32();
        if dt <= f32::EPSILON {
            return Point::default();
        }
        Point::new((last_p.x - first_p.x) / dt, (last_p.y - first_p.y) / dt)
    }

    /// Close the drag at `p`
    pub fn finish(mut self, p: Point, now: Instant) -> DragSummary {
        self.update(p, now);
        self.summary()
    }

    pub fn summary(&self) -> DragSummary {
        DragSummary {
            offset: self.offset(),
            velocity: self.velocity(),
        }
    }
}
