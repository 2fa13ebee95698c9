//! Screen furniture around the slide: progress hearts, prev/next controls
//! and the music player.

use super::canvas::{text_width, Canvas, Region};
use super::palette::{mix, pulse};
use crate::core::SlideSequencer;
use crate::data::ElementId;
use crate::widgets::MusicPlayerState;
use ratatui::style::{Modifier, Style};

const PREV_LABEL: &str = " ‹ anterior ";
const NEXT_LABEL: &str = " siguiente › ";
const UNLOCKING_LABEL: &str = " ♥ … ";
const MUSIC_LABEL: &str = " ♫ ";
const PANEL_W: i32 = 36;

/// One heart per slide along the top row
pub fn render_progress(c: &mut Canvas, area: Region, seq: &SlideSequencer, elapsed: f32, pulse_period: f32) {
    let n = seq.len() as i32;
    let width = n * 2;
    let x0 = area.x + (area.w - width) / 2;
    let y = area.y;
    let current = seq.current_index();

    for i in 0..seq.len() {
        let x = x0 + i as i32 * 2;
        let (glyph, style) = if i == current {
            let t = pulse(elapsed, pulse_period);
            let color = mix(c.palette.pink, c.palette.accent, t);
            ("♥", Style::default().fg(color).add_modifier(Modifier::BOLD))
        } else if seq.is_completed(i) {
            ("♥", Style::default().fg(c.palette.gold))
        } else if seq.is_visited(i) {
            ("♥", Style::default().fg(c.palette.pink))
        } else {
            ("♡", Style::default().fg(c.palette.muted))
        };
        c.put_str(x, y, glyph, style);
        c.register(ElementId::ProgressMarker(i), Region { x, y, w: 2, h: 1 });
    }
}

/// Prev/next controls on the bottom row. `gate_done` marks a solved gate
/// whose completion is still pending.
pub fn render_controls(c: &mut Canvas, area: Region, seq: &SlideSequencer, gate_done: bool) {
    let y = area.y + area.h - 1;

    if seq.can_retreat() {
        let w = c.put_str(area.x + 1, y, PREV_LABEL, Style::default().fg(c.palette.text));
        c.register(ElementId::PrevControl, Region { x: area.x + 1, y, w, h: 1 });
    }

    // Hidden at the end and while the gate is unsolved
    if seq.can_advance() {
        let style = Style::default().fg(c.palette.background).bg(c.palette.pink);
        let x = area.x + area.w - text_width(NEXT_LABEL) - 1;
        let w = c.put_str(x, y, NEXT_LABEL, style);
        c.register(ElementId::NextControl, Region { x, y, w, h: 1 });
    } else if gate_done && !seq.is_terminal() {
        let x = area.x + area.w - text_width(UNLOCKING_LABEL) - 1;
        c.put_str(x, y, UNLOCKING_LABEL, Style::default().fg(c.palette.muted));
    }

    let mut hint = format!("{} / {}", seq.current_index() + 1, seq.len());
    let solved = seq.completed_count();
    if solved > 0 {
        hint.push_str(&format!("  ♥ {}", solved));
    }
    c.put_centered(area.x + area.w / 2, y, &hint, Style::default().fg(c.palette.muted));
}

/// Toggle buttons in the bottom-right corner, panel above them when open
pub fn render_music(c: &mut Canvas, area: Region, music: &MusicPlayerState) {
    let y = area.y + area.h - 3;
    let mute_label = if music.muted { " 🔇 " } else { " 🔊 " };
    let mute_w = text_width(mute_label);
    let music_w = text_width(MUSIC_LABEL);

    let mute_x = area.x + area.w - mute_w - 1;
    let music_x = mute_x - music_w - 1;

    let music_style = if music.open {
        Style::default().fg(c.palette.text).bg(c.palette.accent)
    } else {
        Style::default().fg(c.palette.pink)
    };
    c.put_str(music_x, y, MUSIC_LABEL, music_style);
    c.register(ElementId::MusicToggle, Region { x: music_x, y, w: music_w, h: 1 });

    let mute_style = Style::default().fg(if music.muted { c.palette.muted } else { c.palette.text });
    c.put_str(mute_x, y, mute_label, mute_style);
    c.register(ElementId::MuteToggle, Region { x: mute_x, y, w: mute_w, h: 1 });

    if !music.open {
        return;
    }

    let panel = Region {
        x: area.x + area.w - PANEL_W - 1,
        y: y - 5,
        w: PANEL_W,
        h: 4,
    };
    c.fill(panel, Style::default().bg(c.palette.background));
    let border = Style::default().fg(c.palette.muted);
    let inner = "─".repeat((PANEL_W - 2) as usize);
    c.put_str(panel.x, panel.y, &format!("╭{}╮", inner), border);
    c.put_str(panel.x, panel.y + 1, "│", border);
    c.put_str(panel.x + panel.w - 1, panel.y + 1, "│", border);
    c.put_str(panel.x, panel.y + 2, "│", border);
    c.put_str(panel.x + panel.w - 1, panel.y + 2, "│", border);
    c.put_str(panel.x, panel.y + 3, &format!("╰{}╯", inner), border);

    c.put_str(panel.x + 2, panel.y + 1, &music.status_line(), Style::default().fg(c.palette.text));
    c.put_str(
        panel.x + 2,
        panel.y + 2,
        "p: reproducir · u: silencio",
        Style::default().fg(c.palette.muted).add_modifier(Modifier::ITALIC),
    );
}
