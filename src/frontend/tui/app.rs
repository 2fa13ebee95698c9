use super::canvas::Canvas;
use super::palette::Palette;
use super::slide_view::{self, FrameInfo};
use crate::core::AppCore;
use crate::frontend::{Frontend, FrontendEvent};
use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::{Duration, Instant};

/// TUI Frontend using ratatui
///
/// Renders the presentation with ratatui and reads keyboard and mouse input
/// via crossterm.
pub struct TuiFrontend {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    restored: bool,
}

impl TuiFrontend {
    /// Create a new TUI frontend
    ///
    /// Initializes terminal in raw mode, enables mouse capture, and enters alternate screen.
    pub fn new() -> Result<Self> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
            .context("Failed to setup terminal")?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor()?;

        Ok(Self {
            terminal,
            restored: false,
        })
    }

    /// Convert crossterm event to FrontendEvent
    fn convert_event(event: Event) -> Option<FrontendEvent> {
        match event {
            Event::Key(key_event) => {
                // Only process key press events (ignore repeats and releases)
                if key_event.kind != KeyEventKind::Press {
                    return None;
                }
                Some(FrontendEvent::Key {
                    code: key_event.code,
                    modifiers: key_event.modifiers,
                })
            }
            Event::Mouse(mouse_event) => Some(FrontendEvent::Mouse {
                kind: mouse_event.kind,
                x: mouse_event.column,
                y: mouse_event.row,
                modifiers: mouse_event.modifiers,
            }),
            Event::Resize(w, h) => Some(FrontendEvent::Resize {
                width: w,
                height: h,
            }),
            _ => None,
        }
    }
}

impl Frontend for TuiFrontend {
    fn poll_events(&mut self, timeout: Duration) -> Result<Vec<FrontendEvent>> {
        let mut events = Vec::new();

        // Wait up to `timeout` for the first event, then drain whatever is queued
        let mut wait = timeout;
        while event::poll(wait)? {
            if let Some(frontend_event) = Self::convert_event(event::read()?) {
                events.push(frontend_event);
            }
            wait = Duration::ZERO;
        }

        Ok(events)
    }

    fn render(&mut self, core: &mut AppCore) -> Result<()> {
        let now = Instant::now();
        let palette = Palette::from_config(&core.config.ui.colors);
        let info = FrameInfo {
            transition: core.transition_progress(now),
            direction: core.direction(),
            drag_offset_px: core.surface_drag_offset(),
            elapsed: now.saturating_duration_since(core.slide_entered_at).as_secs_f32(),
            pulse_period: core.config.ui.pulse_period_ms as f32 / 1000.0,
        };
        let metrics = core.cell_metrics;
        let AppCore {
            sequencer,
            widget,
            ui_state,
            music,
            ..
        } = &mut *core;

        self.terminal.draw(|f| {
            let area = f.area();
            // Bounds are rebuilt from scratch every frame
            ui_state.clear();
            ui_state.set_viewport(
                metrics.width_px(area.width),
                area.height as f32 * metrics.cell_height_px,
            );
            let mut canvas = Canvas {
                buf: f.buffer_mut(),
                ui: ui_state,
                metrics,
                palette: &palette,
                now,
                clip: area,
            };
            slide_view::render_frame(&mut canvas, sequencer, widget.as_ref(), music, &info);
        })?;

        core.needs_render = false;
        Ok(())
    }

    fn cleanup(&mut self) -> Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;
        // Restore terminal
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        self.terminal.show_cursor()?;
        Ok(())
    }

    fn size(&self) -> (u16, u16) {
        let size = self.terminal.size().unwrap_or_default();
        (size.width, size.height)
    }
}

impl Drop for TuiFrontend {
    fn drop(&mut self) {
        // Ensure terminal is restored even if cleanup() wasn't called
        let _ = self.cleanup();
    }
}
