//! BookOpen gate: tap the closed book to open it.
//!
//! Any tap succeeds. The cover swings open, the manuscript fades in after a
//! short delay, and completion fires once there has been time to read.
//! A different book means a different slide, and every slide change mounts a
//! fresh closed book.

use super::GateWidget;
use crate::config::TimingConfig;
use crate::core::input_result::{InputResult, WidgetTimer};
use crate::data::ElementId;
use std::time::{Duration, Instant};

/// Shown while the manuscript is empty
const PLACEHOLDER_TEXT: &str = "Cargando nuestra historia...";

/// Seconds for the cover to swing fully open
pub const COVER_SWING_SECS: f32 = 1.2;

#[derive(Debug, Clone)]
pub struct BookOpenState {
    pub cover_image: String,
    pub book_title: String,
    manuscript: Option<String>,
    reveal_after: Duration,
    complete_after: Duration,
    opened_at: Option<Instant>,
    show_manuscript: bool,
}

impl BookOpenState {
    pub fn new(
        cover_image: String,
        book_title: String,
        manuscript: Option<String>,
        timing: &TimingConfig,
    ) -> Self {
        Self {
            cover_image,
            book_title,
            manuscript,
            reveal_after: Duration::from_millis(timing.book_reveal_ms),
            complete_after: Duration::from_millis(timing.book_complete_ms),
            opened_at: None,
            show_manuscript: false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.opened_at.is_some()
    }

    pub fn shows_manuscript(&self) -> bool {
        self.show_manuscript
    }

    pub fn manuscript_text(&self) -> &str {
        self.manuscript
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(PLACEHOLDER_TEXT)
    }

    /// 0.0 = closed, 1.0 = fully open
    pub fn cover_angle(&self, now: Instant) -> f32 {
        match self.opened_at {
            Some(t) => (now.saturating_duration_since(t).as_secs_f32() / COVER_SWING_SECS).min(1.0),
            None => 0.0,
        }
    }
}

impl GateWidget for BookOpenState {
    fn is_satisfied(&self) -> bool {
        self.is_open()
    }

    fn on_press(&mut self, id: ElementId, now: Instant) -> InputResult {
        if id != ElementId::Book {
            return InputResult::Ignored;
        }
        if self.is_open() {
            return InputResult::Continue;
        }
        self.opened_at = Some(now);
        tracing::info!("Book '{}' opened", self.book_title);
        InputResult::Satisfied {
            complete_after: self.complete_after,
            timers: vec![(self.reveal_after, WidgetTimer::RevealManuscript)],
        }
    }

    fn on_timer(&mut self, timer: WidgetTimer, _now: Instant) {
        match timer {
            WidgetTimer::RevealManuscript => {
                if self.is_open() {
                    self.show_manuscript = true;
                }
            }
        }
    }

    fn is_animating(&self, now: Instant) -> bool {
        self.opened_at
            .is_some_and(|_| self.cover_angle(now) < 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book() -> BookOpenState {
        BookOpenState::new(
            "/cover.jpg".to_string(),
            "Us".to_string(),
            None,
            &TimingConfig::default(),
        )
    }

    #[test]
    fn test_tap_opens_and_schedules_completion() {
        let mut b = book();
        let result = b.on_press(ElementId::Book, Instant::now());
        assert_eq!(
            result,
            InputResult::Satisfied {
                complete_after: Duration::from_millis(5000),
                timers: vec![(Duration::from_millis(600), WidgetTimer::RevealManuscript)],
            }
        );
        assert!(b.is_open());
        assert!(!b.shows_manuscript());

        b.on_timer(WidgetTimer::RevealManuscript, Instant::now());
        assert!(b.shows_manuscript());
        assert_eq!(b.manuscript_text(), PLACEHOLDER_TEXT);
    }

    #[test]
    fn test_second_tap_is_ignored() {
        let mut b = book();
        let now = Instant::now();
        assert!(b.on_press(ElementId::Book, now).is_satisfied());
        assert_eq!(b.on_press(ElementId::Book, now), InputResult::Continue);
    }

    #[test]
    fn test_tap_elsewhere_is_ignored() {
        let mut b = book();
        assert_eq!(b.on_press(ElementId::Heart, Instant::now()), InputResult::Ignored);
        assert!(!b.is_open());
    }

    #[test]
    fn test_cover_angle_progresses() {
        let mut b = book();
        let t0 = Instant::now();
        assert_eq!(b.cover_angle(t0), 0.0);
        b.on_press(ElementId::Book, t0);
        assert!(b.is_animating(t0));
        let half = b.cover_angle(t0 + Duration::from_millis(600));
        assert!((half - 0.5).abs() < 0.01);
        assert_eq!(b.cover_angle(t0 + Duration::from_secs(2)), 1.0);
        assert!(!b.is_animating(t0 + Duration::from_secs(2)));
    }
}
