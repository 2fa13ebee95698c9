//! Frame composition: background, the current slide (sliding in from the
//! side it came from), then progress, controls and music on top.

use super::canvas::{wrap, Canvas, Region};
use super::palette::{mix, pulse};
use super::{chrome, gates, scenes};
use crate::core::{Direction, SlideSequencer};
use crate::data::{ElementId, MediaItem, SlideDescriptor, SlideType};
use crate::widgets::{MountedWidget, MusicPlayerState};
use ratatui::style::{Modifier, Style};

/// Per-frame animation inputs computed by the core
#[derive(Debug, Clone, Copy)]
pub struct FrameInfo {
    /// Slide-in progress, 0.0..=1.0
    pub transition: f32,
    pub direction: Direction,
    /// Live surface drag, in pixels
    pub drag_offset_px: f32,
    /// Seconds since the slide was entered
    pub elapsed: f32,
    pub pulse_period: f32,
}

pub fn render_frame(
    c: &mut Canvas,
    seq: &SlideSequencer,
    widget: Option<&MountedWidget>,
    music: &MusicPlayerState,
    info: &FrameInfo,
) {
    let full = Region::from_rect(c.clip);
    c.fill(full, Style::default().bg(c.palette.background));
    c.register(ElementId::SlideSurface, full);

    if full.h < 8 || full.w < 30 {
        c.put_str(full.x, full.y, "♥ agranda la ventana", Style::default().fg(c.palette.pink));
        return;
    }

    let content = Region {
        x: full.x,
        y: full.y + 2,
        w: full.w,
        h: full.h - 4,
    };

    // Ease-out cubic, entering from the right when moving forward
    let eased = 1.0 - (1.0 - info.transition).powi(3);
    let side = match info.direction {
        Direction::Forward => 1.0,
        Direction::Backward => -1.0,
    };
    let shift = ((1.0 - eased) * content.w as f32 * side).round() as i32
        + (info.drag_offset_px / c.metrics.cell_width_px).round() as i32;

    render_slide(c, content.shifted(shift), seq.current_slide(), widget, info);

    chrome::render_progress(c, full, seq, info.elapsed, info.pulse_period);
    let gate_done = widget.is_some_and(|w| w.as_gate().is_satisfied());
    chrome::render_controls(c, full, seq, gate_done);
    chrome::render_music(c, full, music);
}

fn render_slide(
    c: &mut Canvas,
    region: Region,
    slide: &SlideDescriptor,
    widget: Option<&MountedWidget>,
    info: &FrameInfo,
) {
    let (cx, cy) = region.center();
    let title = Style::default().fg(c.palette.pink).add_modifier(Modifier::BOLD);
    let subtitle = Style::default().fg(c.palette.text).add_modifier(Modifier::ITALIC);

    if let Some(bg) = &slide.background {
        let label = format!("fondo: {}", MediaItem::from_source(bg).file_name());
        c.put_str(region.x + 2, region.y + region.h - 1, &label, Style::default().fg(c.palette.muted));
    }

    match slide.slide_type {
        SlideType::Cover | SlideType::Final => {
            let t = pulse(info.elapsed, info.pulse_period);
            let heart_color = mix(c.palette.accent, c.palette.pink, t);
            let heart_w = gates::HEART[0].chars().count() as i32;
            c.put_lines(
                cx - heart_w / 2,
                cy - 7,
                &gates::HEART,
                Style::default().fg(heart_color),
            );
            c.put_centered(cx, cy + 1, &slide.title, title);
            if let Some(sub) = &slide.subtitle {
                for (i, line) in wrap(sub, region.w - 8).iter().enumerate() {
                    c.put_centered(cx, cy + 3 + i as i32, line, subtitle);
                }
            }
            let hint = if slide.slide_type == SlideType::Cover {
                "desliza o pulsa → para comenzar"
            } else {
                "♥ fin ♥"
            };
            c.put_centered(cx, region.y + region.h - 2, hint, Style::default().fg(c.palette.muted));
        }
        SlideType::TextOnly => {
            let lines = slide
                .subtitle
                .as_deref()
                .map(|s| wrap(s, (region.w - 12).min(70)))
                .unwrap_or_default();
            let top = cy - (lines.len() as i32 + 2) / 2;
            c.put_centered(cx, top, &slide.title, title);
            for (i, line) in lines.iter().enumerate() {
                c.put_centered(cx, top + 2 + i as i32, line, subtitle);
            }
        }
        SlideType::Interaction | SlideType::LoveNotes | SlideType::ImageCollage => {
            c.put_centered(cx, region.y, &slide.title, title);
            if let Some(sub) = &slide.subtitle {
                c.put_centered(cx, region.y + 1, sub, subtitle);
            }
            let stage = Region {
                x: region.x,
                y: region.y + 2,
                w: region.w,
                h: region.h - 2,
            };
            match widget {
                Some(MountedWidget::HeartRepair(w)) => gates::render_heart_repair(c, stage, w),
                Some(MountedWidget::HandsSnap(w)) => gates::render_hands_snap(c, stage, w),
                Some(MountedWidget::BookOpen(w)) => gates::render_book_open(c, stage, w),
                Some(MountedWidget::LoveNotes(w)) => scenes::render_love_notes(c, stage, w),
                Some(MountedWidget::Collage(w)) => scenes::render_collage(c, stage, w),
                None => {}
            }
        }
    }
}
