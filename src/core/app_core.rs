use crate::config::{Config, KeyAction};
use crate::core::gesture::{DragTarget, DragTracker};
use crate::core::input_result::{InputResult, WidgetTimer};
use crate::core::scheduler::{MountId, Scheduler};
use crate::core::sequencer::{Direction, SlideSequencer, SwipeOutcome};
use crate::data::{CellMetrics, ElementId, Manifest, Measure, Point, UiState};
use crate::frontend::FrontendEvent;
use crate::sound::AmbientAudio;
use crate::widgets::{GateWidget, MountedWidget, MusicPlayerState};
use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEventKind};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// A drag with no pointer sample for this long lost its release event
const STALE_DRAG_AFTER: Duration = Duration::from_secs(3);

/// Delayed actions owned by a widget mount
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    /// Report the gate on `slide` complete to the sequencer
    Complete { slide: usize },
    /// Deliver a timer back to the mounted widget
    Widget(WidgetTimer),
}

/// Core application state (frontend-agnostic)
///
/// AppCore owns the sequencer and the widget mounted for the current slide.
/// It routes frontend events to navigation, the music player or the widget,
/// and fires scheduled timers. The frontend reads it to render and writes
/// element bounds back into `ui_state`.
pub struct AppCore {
    /// Application configuration
    pub config: Config,

    /// Parsed keybindings map (key combo -> action)
    pub keybind_map: HashMap<(KeyCode, KeyModifiers), KeyAction>,

    /// Presentation position and gate state
    pub sequencer: SlideSequencer,

    /// Widget for the current slide (None for plain slides)
    pub widget: Option<MountedWidget>,

    /// Element bounds from the last frame
    pub ui_state: UiState,

    /// Terminal cell size used to map cells to pixels
    pub cell_metrics: CellMetrics,

    /// Ambient music controls
    pub music: MusicPlayerState,

    /// Application running flag
    pub running: bool,

    /// Set whenever visible state changed since the last frame
    pub needs_render: bool,

    /// When the current slide was entered (drives the slide-in transition)
    pub slide_entered_at: Instant,

    mount_id: MountId,
    mounted_index: usize,
    scheduler: Scheduler<TimerAction>,
    drag: Option<DragTracker>,
    audio: Option<AmbientAudio>,
}

impl AppCore {
    pub fn new(config: Config, manifest: Manifest, audio: Option<AmbientAudio>, now: Instant) -> Self {
        let keybind_map = config.keybind_map();
        let cell_metrics = CellMetrics::new(
            config.gestures.cell_width_px,
            config.gestures.cell_height_px,
        );
        let sequencer = SlideSequencer::new(manifest, config.gestures.swipe_confidence_threshold);

        let has_track = audio.as_ref().is_some_and(|a| a.has_track());
        let track_label = config
            .sound
            .track
            .as_deref()
            .filter(|_| has_track)
            .map(crate::sound::track_label);
        let music = MusicPlayerState::new(track_label, config.sound.autoplay);

        let mut core = Self {
            config,
            keybind_map,
            sequencer,
            widget: None,
            ui_state: UiState::new(),
            cell_metrics,
            music,
            running: true,
            needs_render: true,
            slide_entered_at: now,
            mount_id: MountId(0),
            mounted_index: 0,
            scheduler: Scheduler::new(),
            drag: None,
            audio,
        };
        core.sync_audio();
        core.remount(now);
        core
    }

    /// Move forward from the first slide until `index` or the first unsatisfied gate
    pub fn start_at(&mut self, index: usize, now: Instant) {
        while self.sequencer.current_index() < index && self.sequencer.advance() {}
        if self.sequencer.current_index() != index {
            tracing::warn!(
                "Requested start slide {} not reachable; starting at {}",
                index,
                self.sequencer.current_index()
            );
        }
        self.sync_mount(now);
    }

    /// Handle one frontend event
    pub fn handle_event(&mut self, event: FrontendEvent, now: Instant) {
        match event {
            FrontendEvent::Key { code, modifiers } => self.handle_key(code, modifiers),
            FrontendEvent::Mouse { kind, x, y, .. } => {
                let p = self.cell_metrics.cell_center(x, y);
                match kind {
                    MouseEventKind::Down(MouseButton::Left) => self.pointer_down(p, now),
                    MouseEventKind::Drag(MouseButton::Left) => self.pointer_move(p, now),
                    MouseEventKind::Up(MouseButton::Left) => self.pointer_up(p, now),
                    _ => {}
                }
            }
            FrontendEvent::Resize { width, height } => {
                self.ui_state.set_viewport(
                    self.cell_metrics.width_px(width),
                    height as f32 * self.cell_metrics.cell_height_px,
                );
                self.needs_render = true;
            }
        }
        self.sync_mount(now);
    }

    /// Fire due timers
    pub fn tick(&mut self, now: Instant) {
        let stale = self
            .drag
            .as_ref()
            .and_then(DragTracker::last_sample_at)
            .is_some_and(|t| now.saturating_duration_since(t) >= STALE_DRAG_AFTER);
        if stale {
            tracing::debug!("Dropping drag with no release");
            self.cancel_drag();
        }

        for (owner, action) in self.scheduler.drain_due(now) {
            if owner != self.mount_id {
                continue;
            }
            match action {
                TimerAction::Complete { slide } => {
                    tracing::debug!("Completion timer fired for slide {}", slide);
                    self.sequencer.mark_complete(slide);
                }
                TimerAction::Widget(timer) => {
                    if let Some(widget) = self.widget.as_mut() {
                        widget.as_gate_mut().on_timer(timer, now);
                    }
                }
            }
            self.needs_render = true;
        }
        self.sync_mount(now);
    }

    /// Whether anything on screen is still moving
    pub fn is_animating(&self, now: Instant) -> bool {
        self.transition_progress(now) < 1.0
            || self.drag.is_some()
            || self
                .widget
                .as_ref()
                .is_some_and(|w| w.as_gate().is_animating(now))
    }

    /// Slide-in progress of the current slide, 0.0..=1.0
    pub fn transition_progress(&self, now: Instant) -> f32 {
        let total = self.config.ui.transition_ms as f32 / 1000.0;
        if total <= 0.0 {
            return 1.0;
        }
        (now.saturating_duration_since(self.slide_entered_at).as_secs_f32() / total).min(1.0)
    }

    pub fn direction(&self) -> Direction {
        self.sequencer.direction()
    }

    /// Live horizontal offset of a surface drag (the slide follows the pointer)
    pub fn surface_drag_offset(&self) -> f32 {
        match &self.drag {
            Some(d) if d.target == DragTarget::Surface => d.offset().x,
            _ => 0.0,
        }
    }

    /// Time until the next timer (lets the event loop sleep accurately)
    pub fn next_timer_in(&self, now: Instant) -> Option<Duration> {
        self.scheduler.next_due_in(now)
    }

    #[cfg(test)]
    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending()
    }

    fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        if let Some(action) = self.keybind_map.get(&(code, modifiers)).copied() {
            self.perform(action);
            return;
        }
        if let KeyCode::Char(c @ '1'..='9') = code {
            let index = (c as u8 - b'1') as usize;
            self.sequencer.jump_to(index);
            self.needs_render = true;
        }
    }

    fn perform(&mut self, action: KeyAction) {
        tracing::debug!("Key action {:?}", action);
        match action {
            KeyAction::NextSlide => {
                self.sequencer.advance();
            }
            KeyAction::PrevSlide => {
                self.sequencer.retreat();
            }
            KeyAction::FirstSlide => {
                self.sequencer.jump_to(0);
            }
            KeyAction::ToggleMusicPanel => {
                self.music.toggle_open();
            }
            KeyAction::ToggleMute => {
                self.music.toggle_mute();
                self.sync_audio();
            }
            KeyAction::TogglePlayback => {
                self.music.toggle_playing();
                self.sync_audio();
            }
            KeyAction::Quit => self.running = false,
        }
        self.needs_render = true;
    }

    /// Topmost draggable widget element under `p`, using its live drag offset
    fn widget_hit(&self, p: Point) -> Option<ElementId> {
        let gate = self.widget.as_ref()?.as_gate();
        gate.draggable_elements().into_iter().rev().find(|id| {
            self.ui_state.bounds(*id).is_some_and(|b| {
                let off = gate.element_offset(*id);
                let mut moved = b;
                moved.x += off.x;
                moved.y += off.y;
                moved.contains(p)
            })
        })
    }

    fn pointer_down(&mut self, p: Point, now: Instant) {
        self.needs_render = true;
        // A press while dragging means the previous release never arrived
        self.cancel_drag();

        if let Some(id) = self.widget_hit(p) {
            if let Some(widget) = self.widget.as_mut() {
                let result = widget.as_gate_mut().on_press(id, now);
                if result.was_handled() {
                    self.drag = Some(DragTracker::begin(DragTarget::Element(id), p, now));
                    self.apply_result(result, now);
                    return;
                }
            }
        }

        match self.ui_state.hit_test(p) {
            Some(ElementId::PrevControl) => {
                self.sequencer.retreat();
            }
            Some(ElementId::NextControl) => {
                self.sequencer.advance();
            }
            Some(ElementId::ProgressMarker(i)) => {
                self.sequencer.jump_to(i);
            }
            Some(ElementId::MusicToggle) => {
                self.music.toggle_open();
            }
            Some(ElementId::MuteToggle) => {
                self.music.toggle_mute();
                self.sync_audio();
            }
            Some(id) if id.is_widget_element() => {
                let result = self
                    .widget
                    .as_mut()
                    .map(|w| w.as_gate_mut().on_press(id, now))
                    .unwrap_or(InputResult::Ignored);
                if result.was_handled() {
                    self.apply_result(result, now);
                } else {
                    self.drag = Some(DragTracker::begin(DragTarget::Surface, p, now));
                }
            }
            _ => {
                self.drag = Some(DragTracker::begin(DragTarget::Surface, p, now));
            }
        }
    }

    fn pointer_move(&mut self, p: Point, now: Instant) {
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        drag.update(p, now);
        if let DragTarget::Element(id) = drag.target {
            let offset = drag.offset();
            if let Some(widget) = self.widget.as_mut() {
                widget.as_gate_mut().on_drag(id, offset);
            }
        }
        self.needs_render = true;
    }

    fn pointer_up(&mut self, p: Point, now: Instant) {
        let Some(drag) = self.drag.take() else {
            return;
        };
        let target = drag.target;
        let summary = drag.finish(p, now);
        self.needs_render = true;

        match target {
            DragTarget::Surface => {
                let outcome = self
                    .sequencer
                    .resolve_swipe(summary.offset.x, summary.velocity.x);
                if outcome != SwipeOutcome::SnapBack {
                    tracing::debug!("Swipe {:?} (offset {:.0}px)", outcome, summary.offset.x);
                }
            }
            DragTarget::Element(id) => {
                let result = match self.widget.as_mut() {
                    Some(widget) => widget
                        .as_gate_mut()
                        .on_release(id, summary, &self.ui_state, now),
                    None => InputResult::Ignored,
                };
                self.apply_result(result, now);
            }
        }
    }

    /// Abandon the drag in progress; a dragged element springs back
    fn cancel_drag(&mut self) {
        let Some(drag) = self.drag.take() else {
            return;
        };
        if let DragTarget::Element(id) = drag.target {
            if let Some(widget) = self.widget.as_mut() {
                widget.as_gate_mut().on_drag(id, Point::default());
            }
        }
        self.needs_render = true;
    }

    /// Arm the timers a satisfied widget asked for
    fn apply_result(&mut self, result: InputResult, now: Instant) {
        if let InputResult::Satisfied {
            complete_after,
            timers,
        } = result
        {
            tracing::info!(
                "Gate on slide {} satisfied; completing in {:?}",
                self.mounted_index,
                complete_after
            );
            self.scheduler.schedule(
                self.mount_id,
                complete_after,
                TimerAction::Complete {
                    slide: self.mounted_index,
                },
                now,
            );
            for (delay, timer) in timers {
                self.scheduler
                    .schedule(self.mount_id, delay, TimerAction::Widget(timer), now);
            }
        }
    }

    fn sync_mount(&mut self, now: Instant) {
        if self.sequencer.current_index() != self.mounted_index {
            self.remount(now);
        }
    }

    /// Unmount the current widget (cancelling its timers) and mount the next
    fn remount(&mut self, now: Instant) {
        let cancelled = self.scheduler.cancel_owner(self.mount_id);
        if cancelled > 0 {
            tracing::debug!("Cancelled {} timer(s) of mount {:?}", cancelled, self.mount_id);
        }
        self.ui_state.clear_widget_elements();
        self.drag = None;

        self.mount_id = MountId(self.mount_id.0 + 1);
        self.mounted_index = self.sequencer.current_index();
        self.slide_entered_at = now;

        let slide = self.sequencer.current_slide();
        self.widget = MountedWidget::for_slide(
            slide,
            &self.config.gestures,
            &self.config.timing,
            now,
            &mut rand::rng(),
        );
        tracing::debug!(
            "Mounted slide {} '{}' ({})",
            self.mounted_index,
            slide.id,
            self.widget.as_ref().map(|w| w.name()).unwrap_or("static")
        );
        self.needs_render = true;
    }

    fn sync_audio(&self) {
        if let Some(audio) = &self.audio {
            audio.set_muted(self.music.muted);
            audio.set_playing(self.music.playing);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::slide::{gated, slide};
    use crate::data::{Bounds, InteractionKind, SlideType};

    fn core(slides: Vec<crate::data::SlideDescriptor>, now: Instant) -> AppCore {
        let mut core = AppCore::new(Config::default(), Manifest::new(slides).unwrap(), None, now);
        core.handle_event(FrontendEvent::resize(100, 40), now);
        core
    }

    fn key(code: KeyCode) -> FrontendEvent {
        FrontendEvent::key(code, KeyModifiers::NONE)
    }

    fn mouse(kind: MouseEventKind, x: u16, y: u16) -> FrontendEvent {
        FrontendEvent::mouse(kind, x, y, KeyModifiers::NONE)
    }

    /// Heart centred at (400, 300); band-aid centred at (100, 300)
    fn lay_out_heart(core: &mut AppCore) {
        core.ui_state
            .register(ElementId::Heart, Bounds::new(300.0, 200.0, 200.0, 200.0));
        core.ui_state
            .register(ElementId::Bandage, Bounds::new(60.0, 280.0, 80.0, 40.0));
    }

    fn drag(core: &mut AppCore, from: (u16, u16), to: (u16, u16), start: Instant, dur: Duration) {
        let left = MouseButton::Left;
        core.handle_event(mouse(MouseEventKind::Down(left), from.0, from.1), start);
        core.handle_event(mouse(MouseEventKind::Drag(left), to.0, to.1), start + dur);
        core.handle_event(mouse(MouseEventKind::Up(left), to.0, to.1), start + dur);
    }

    #[test]
    fn test_heart_scenario_end_to_end() {
        let t0 = Instant::now();
        let mut core = core(
            vec![
                slide("cover", SlideType::Cover),
                gated("heart", InteractionKind::HeartRepair),
                slide("final", SlideType::Final),
            ],
            t0,
        );

        core.handle_event(key(KeyCode::Right), t0);
        assert_eq!(core.sequencer.current_index(), 1);
        assert!(matches!(core.widget, Some(MountedWidget::HeartRepair(_))));

        // Gate blocks forward navigation
        core.handle_event(key(KeyCode::Right), t0);
        assert_eq!(core.sequencer.current_index(), 1);

        // Drag the band-aid from (100, 296) to (396, 296): 4px from the heart centre
        lay_out_heart(&mut core);
        drag(&mut core, (12, 18), (49, 18), t0, Duration::from_millis(300));
        assert_eq!(core.pending_timers(), 1);
        assert_eq!(core.sequencer.current_index(), 1);

        core.tick(t0 + Duration::from_millis(1000));
        assert_eq!(core.sequencer.current_index(), 1);

        core.tick(t0 + Duration::from_millis(2400));
        assert_eq!(core.sequencer.current_index(), 2);
        assert!(core.widget.is_none());

        core.handle_event(key(KeyCode::Right), t0 + Duration::from_millis(2500));
        assert_eq!(core.sequencer.current_index(), 2);
    }

    #[test]
    fn test_short_drag_misses_heart() {
        let t0 = Instant::now();
        let mut core = core(vec![gated("heart", InteractionKind::HeartRepair)], t0);
        lay_out_heart(&mut core);
        drag(&mut core, (12, 18), (20, 18), t0, Duration::from_millis(300));
        assert_eq!(core.pending_timers(), 0);
    }

    #[test]
    fn test_swipe_power_decides_navigation() {
        let t0 = Instant::now();
        let mut core = core(
            vec![
                slide("a", SlideType::Cover),
                slide("b", SlideType::TextOnly),
                slide("c", SlideType::Final),
            ],
            t0,
        );

        // Slow short drag: snaps back
        drag(&mut core, (60, 10), (59, 10), t0, Duration::from_secs(1));
        assert_eq!(core.sequencer.current_index(), 0);

        // Fast leftward flick: next slide
        drag(&mut core, (80, 10), (20, 10), t0, Duration::from_millis(80));
        assert_eq!(core.sequencer.current_index(), 1);

        // Fast rightward flick: previous slide
        drag(&mut core, (20, 10), (80, 10), t0, Duration::from_millis(80));
        assert_eq!(core.sequencer.current_index(), 0);
    }

    #[test]
    fn test_leaving_slide_cancels_completion() {
        let t0 = Instant::now();
        let mut core = core(
            vec![
                slide("cover", SlideType::Cover),
                gated("heart", InteractionKind::HeartRepair),
                slide("final", SlideType::Final),
            ],
            t0,
        );
        core.handle_event(key(KeyCode::Right), t0);
        lay_out_heart(&mut core);
        drag(&mut core, (12, 18), (49, 18), t0, Duration::from_millis(300));
        assert_eq!(core.pending_timers(), 1);

        core.handle_event(key(KeyCode::Left), t0 + Duration::from_millis(500));
        assert_eq!(core.sequencer.current_index(), 0);
        assert_eq!(core.pending_timers(), 0);
        assert!(core.ui_state.bounds(ElementId::Heart).is_none());

        core.tick(t0 + Duration::from_secs(5));
        assert_eq!(core.sequencer.current_index(), 0);
        assert!(!core.sequencer.is_completed(1));
    }

    #[test]
    fn test_book_timers_reveal_then_complete() {
        let t0 = Instant::now();
        let mut core = core(
            vec![
                gated("book", InteractionKind::BookOpen),
                slide("final", SlideType::Final),
            ],
            t0,
        );
        core.ui_state
            .register(ElementId::Book, Bounds::new(200.0, 100.0, 300.0, 400.0));
        core.handle_event(mouse(MouseEventKind::Down(MouseButton::Left), 40, 15), t0);
        core.handle_event(mouse(MouseEventKind::Up(MouseButton::Left), 40, 15), t0);
        assert_eq!(core.pending_timers(), 2);

        core.tick(t0 + Duration::from_millis(700));
        match &core.widget {
            Some(MountedWidget::BookOpen(b)) => assert!(b.shows_manuscript()),
            other => panic!("unexpected widget {:?}", other.as_ref().map(|w| w.name())),
        }

        core.tick(t0 + Duration::from_millis(5100));
        assert_eq!(core.sequencer.current_index(), 1);
    }

    #[test]
    fn test_revisiting_book_starts_closed() {
        let t0 = Instant::now();
        let mut core = core(
            vec![
                slide("cover", SlideType::Cover),
                gated("book", InteractionKind::BookOpen),
                slide("final", SlideType::Final),
            ],
            t0,
        );
        core.handle_event(key(KeyCode::Right), t0);
        core.ui_state
            .register(ElementId::Book, Bounds::new(200.0, 100.0, 300.0, 400.0));
        core.handle_event(mouse(MouseEventKind::Down(MouseButton::Left), 40, 15), t0);
        core.handle_event(mouse(MouseEventKind::Up(MouseButton::Left), 40, 15), t0);
        assert_eq!(core.pending_timers(), 2);

        // Back and forth remounts the book
        core.handle_event(key(KeyCode::Left), t0 + Duration::from_millis(100));
        core.handle_event(key(KeyCode::Right), t0 + Duration::from_millis(200));
        assert_eq!(core.pending_timers(), 0);
        match &core.widget {
            Some(MountedWidget::BookOpen(b)) => assert!(!b.is_open()),
            other => panic!("unexpected widget {:?}", other.as_ref().map(|w| w.name())),
        }

        core.tick(t0 + Duration::from_millis(5100));
        assert_eq!(core.sequencer.current_index(), 1);
        assert!(!core.sequencer.is_completed(1));
    }

    #[test]
    fn test_press_without_release_goes_stale() {
        let t0 = Instant::now();
        let mut core = core(vec![slide("a", SlideType::Cover), slide("b", SlideType::Final)], t0);
        core.handle_event(mouse(MouseEventKind::Down(MouseButton::Left), 50, 10), t0);
        assert!(core.is_animating(t0 + Duration::from_secs(1)));

        let later = t0 + Duration::from_secs(600);
        core.tick(later);
        assert!(!core.is_animating(later));
    }

    #[test]
    fn test_new_press_drops_unreleased_drag() {
        let t0 = Instant::now();
        let mut core = core(vec![gated("heart", InteractionKind::HeartRepair)], t0);
        lay_out_heart(&mut core);
        let left = MouseButton::Left;
        core.handle_event(mouse(MouseEventKind::Down(left), 12, 18), t0);
        core.handle_event(mouse(MouseEventKind::Drag(left), 30, 18), t0 + Duration::from_millis(50));

        // Release lost; the next press starts over with the band-aid back home
        core.handle_event(mouse(MouseEventKind::Down(left), 90, 2), t0 + Duration::from_millis(100));
        match &core.widget {
            Some(MountedWidget::HeartRepair(h)) => assert_eq!(h.bandage_offset(), Point::default()),
            other => panic!("unexpected widget {:?}", other.as_ref().map(|w| w.name())),
        }
        assert_eq!(core.surface_drag_offset(), 0.0);
        core.handle_event(mouse(MouseEventKind::Up(left), 90, 2), t0 + Duration::from_millis(150));
        assert_eq!(core.pending_timers(), 0);
    }

    #[test]
    fn test_controls_and_digit_keys() {
        let t0 = Instant::now();
        let mut core = core(
            vec![
                slide("a", SlideType::Cover),
                slide("b", SlideType::TextOnly),
                gated("c", InteractionKind::HandsSnap),
                slide("d", SlideType::Final),
            ],
            t0,
        );
        core.ui_state
            .register(ElementId::NextControl, Bounds::new(760.0, 300.0, 32.0, 32.0));
        core.handle_event(mouse(MouseEventKind::Down(MouseButton::Left), 96, 19), t0);
        assert_eq!(core.sequencer.current_index(), 1);

        core.handle_event(key(KeyCode::Char('3')), t0);
        assert_eq!(core.sequencer.current_index(), 2);

        // Gate not satisfied: jumping past it is refused
        core.handle_event(key(KeyCode::Char('4')), t0);
        assert_eq!(core.sequencer.current_index(), 2);

        core.handle_event(key(KeyCode::Home), t0);
        assert_eq!(core.sequencer.current_index(), 0);
    }

    #[test]
    fn test_music_toggles_do_not_touch_navigation() {
        let t0 = Instant::now();
        let mut core = core(vec![slide("a", SlideType::Cover), slide("b", SlideType::Final)], t0);
        core.handle_event(key(KeyCode::Char('m')), t0);
        core.handle_event(key(KeyCode::Char('u')), t0);
        assert!(core.music.open);
        assert!(core.music.muted);
        assert_eq!(core.sequencer.current_index(), 0);

        core.handle_event(key(KeyCode::Char('q')), t0);
        assert!(!core.running);
    }

    #[test]
    fn test_start_at_stops_at_first_gate() {
        let t0 = Instant::now();
        let mut core = core(
            vec![
                slide("a", SlideType::Cover),
                gated("b", InteractionKind::BookOpen),
                slide("c", SlideType::Final),
            ],
            t0,
        );
        core.start_at(2, t0);
        assert_eq!(core.sequencer.current_index(), 1);
        assert!(matches!(core.widget, Some(MountedWidget::BookOpen(_))));
    }
}
