//! Widget state structs (rendering-agnostic)
//!
//! Each slide type that needs more than a title gets a widget. Widgets hold
//! data and gesture logic but no rendering; the TUI frontend draws them from
//! this state. Gate widgets detect their gesture and report
//! `InputResult::Satisfied` exactly once; presentational widgets never do.
//!
//! Widget state is created fresh on every mount and dropped on unmount, so
//! revisiting a slide always starts the interaction over.

pub mod book_open;
pub mod collage;
pub mod hands_snap;
pub mod heart_repair;
pub mod love_notes;
pub mod music_player;

pub use book_open::BookOpenState;
pub use collage::CollageState;
pub use hands_snap::HandsSnapState;
pub use heart_repair::HeartRepairState;
pub use love_notes::LoveNotesState;
pub use music_player::MusicPlayerState;

use crate::config::{GestureConfig, TimingConfig};
use crate::core::gesture::DragSummary;
use crate::core::input_result::{InputResult, WidgetTimer};
use crate::data::{ElementId, InteractionKind, Measure, Point, SlideDescriptor, SlideType};
use rand::Rng;
use std::time::Instant;

/// Capability shared by every mounted widget: react to pointer input and,
/// for gates, report satisfaction once.
pub trait GateWidget {
    /// Whether the gate condition has been met during this mount
    fn is_satisfied(&self) -> bool {
        false
    }

    /// Elements the user can drag (hit-tested before anything else)
    fn draggable_elements(&self) -> Vec<ElementId> {
        Vec::new()
    }

    /// Current drag translation of an element relative to its layout position
    fn element_offset(&self, _id: ElementId) -> Point {
        Point::default()
    }

    /// Pointer pressed on one of our elements
    fn on_press(&mut self, _id: ElementId, _now: Instant) -> InputResult {
        InputResult::Ignored
    }

    /// Pointer moved while dragging `id`; `offset` is relative to the press
    fn on_drag(&mut self, _id: ElementId, _offset: Point) {}

    /// Pointer released after dragging `id`. Geometry is read from `measure`
    /// at this moment; missing bounds mean "not satisfied, try again".
    fn on_release(
        &mut self,
        _id: ElementId,
        _summary: DragSummary,
        _measure: &dyn Measure,
        _now: Instant,
    ) -> InputResult {
        InputResult::Ignored
    }

    /// A timer this widget armed has fired
    fn on_timer(&mut self, _timer: WidgetTimer, _now: Instant) {}

    /// Whether something is still moving (keeps the frame loop rendering)
    fn is_animating(&self, _now: Instant) -> bool {
        false
    }
}

/// The widget mounted for the current slide (tagged union, dispatched by match)
#[derive(Debug, Clone)]
pub enum MountedWidget {
    HeartRepair(HeartRepairState),
    HandsSnap(HandsSnapState),
    BookOpen(BookOpenState),
    LoveNotes(LoveNotesState),
    Collage(CollageState),
}

impl MountedWidget {
    /// Build the widget a slide needs, if any
    pub fn for_slide(
        slide: &SlideDescriptor,
        gestures: &GestureConfig,
        timing: &TimingConfig,
        now: Instant,
        rng: &mut impl Rng,
    ) -> Option<Self> {
        match slide.slide_type {
            SlideType::Interaction => match slide.interaction_type? {
                InteractionKind::HeartRepair => Some(Self::HeartRepair(HeartRepairState::new(
                    gestures.clone(),
                    timing.heart_repair_complete_ms,
                    rng,
                ))),
                InteractionKind::HandsSnap => Some(Self::HandsSnap(HandsSnapState::new(
                    gestures.clone(),
                    timing.hands_snap_complete_ms,
                    rng,
                ))),
                InteractionKind::BookOpen => Some(Self::BookOpen(BookOpenState::new(
                    slide.cover_image.clone().unwrap_or_default(),
                    slide.book_title.clone().unwrap_or_default(),
                    slide.manuscript_content.clone(),
                    timing,
                ))),
            },
            SlideType::LoveNotes => Some(Self::LoveNotes(LoveNotesState::new(now, rng))),
            SlideType::ImageCollage => Some(Self::Collage(CollageState::new(&slide.media(), now))),
            SlideType::Cover | SlideType::TextOnly | SlideType::Final => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::HeartRepair(_) => "HeartRepair",
            Self::HandsSnap(_) => "HandsSnap",
            Self::BookOpen(_) => "BookOpen",
            Self::LoveNotes(_) => "LoveNotes",
            Self::Collage(_) => "Collage",
        }
    }

    pub fn as_gate(&self) -> &dyn GateWidget {
        match self {
            Self::HeartRepair(w) => w,
            Self::HandsSnap(w) => w,
            Self::BookOpen(w) => w,
            Self::LoveNotes(w) => w,
            Self::Collage(w) => w,
        }
    }

    pub fn as_gate_mut(&mut self) -> &mut dyn GateWidget {
        match self {
            Self::HeartRepair(w) => w,
            Self::HandsSnap(w) => w,
            Self::BookOpen(w) => w,
            Self::LoveNotes(w) => w,
            Self::Collage(w) => w,
        }
    }
}

/// One celebratory particle, animated from the burst centre to `target`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Final displacement from the burst centre, in pixels
    pub target: Point,
    pub rotate: f32,
    /// Seconds after the burst before this particle starts
    pub delay: f32,
    /// Alternating pink / gold
    pub alt_color: bool,
}

impl Particle {
    /// Scatter `count` particles within a square of `spread` pixels
    pub fn burst(count: usize, spread: f32, max_delay: f32, rng: &mut impl Rng) -> Vec<Particle> {
        (0..count)
            .map(|i| Particle {
                target: Point::new(
                    (rng.random::<f32>() - 0.5) * spread,
                    (rng.random::<f32>() - 0.5) * spread,
                ),
                rotate: rng.random::<f32>() * 360.0,
                delay: rng.random::<f32>() * max_delay,
                alt_color: i % 2 == 1,
            })
            .collect()
    }

    /// Position at `elapsed` seconds into a burst lasting `duration` seconds
    /// (ease-out), or `None` once the particle has faded
    pub fn position_at(&self, elapsed: f32, duration: f32) -> Option<Point> {
        let t = (elapsed - self.delay) / duration;
        if !(0.0..1.0).contains(&t) {
            return None;
        }
        let eased = 1.0 - (1.0 - t) * (1.0 - t);
        Some(Point::new(self.target.x * eased, self.target.y * eased))
    }
}
