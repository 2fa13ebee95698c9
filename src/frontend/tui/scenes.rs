//! Presentational slides: love-notes explosion and the media collage.

use super::canvas::{text_width, Canvas, Region};
use crate::data::ElementId;
use crate::data::MediaItem;
use crate::widgets::{love_notes, CollageState, GateWidget, LoveNotesState};
use ratatui::style::{Modifier, Style};

const TILE_H: i32 = 6;
const TILE_GAP: i32 = 2;

pub fn render_love_notes(c: &mut Canvas, region: Region, w: &LoveNotesState) {
    let (cx, cy) = region.center();
    let elapsed = w.elapsed(c.now);

    if elapsed < love_notes::BURST_SECS {
        // Central heart swells, then bursts
        let art = if elapsed < love_notes::BURST_SECS / 2.0 { "♥" } else { "♥ ♥ ♥" };
        c.put_centered(
            cx,
            cy,
            art,
            Style::default().fg(c.palette.accent).add_modifier(Modifier::BOLD),
        );
    }

    for (i, note) in w.notes.iter().enumerate() {
        if elapsed < note.delay {
            continue;
        }
        let id = ElementId::LoveNote(i);
        let label = format!(" {} ", note.text);
        let width = text_width(&label);
        let (dx, dy) = c.px_to_cells(note.position_at(elapsed));
        let layout = Region {
            x: cx + dx - width / 2,
            y: cy + dy,
            w: width,
            h: 1,
        };
        c.register(id, layout);

        let (ox, oy) = c.px_to_cells(w.element_offset(id));
        let color = if note.rotate >= 0.0 { c.palette.pink } else { c.palette.gold };
        c.put_str(
            layout.x + ox,
            layout.y + oy,
            &label,
            Style::default().fg(c.palette.background).bg(color),
        );
    }
}

pub fn render_collage(c: &mut Canvas, region: Region, w: &CollageState) {
    let (cx, cy) = region.center();

    for (text, offset, opacity) in w.drifting_notes(c.now) {
        if opacity < 0.1 {
            continue;
        }
        let (dx, dy) = c.px_to_cells(offset);
        c.put_centered(cx + dx, region.y + region.h + dy / 2, text, Style::default().fg(c.palette.muted));
    }

    if w.items.is_empty() {
        c.put_centered(cx, cy, "(sin recuerdos todavía)", Style::default().fg(c.palette.muted));
        return;
    }

    let videos = w.video_count();
    let summary = format!("{} fotos · {} videos", w.items.len() - videos, videos);
    c.put_centered(cx, region.y + 1, &summary, Style::default().fg(c.palette.muted));

    let cols: i32 = if region.w >= 90 {
        3
    } else if region.w >= 60 {
        2
    } else {
        1
    };
    let tile_w = ((region.w - TILE_GAP * (cols + 1)) / cols).clamp(12, 36);
    let grid_w = cols * tile_w + (cols - 1) * TILE_GAP;
    let x0 = cx - grid_w / 2;
    let y0 = region.y + 3;

    for (i, item) in w.items.iter().enumerate() {
        let progress = w.item_progress(i, c.now);
        if progress <= 0.0 {
            continue;
        }
        let col = i as i32 % cols;
        let row = i as i32 / cols;
        // Resting tilt shows up as a one-cell lean
        let lean = item.tilt.signum() as i32;
        let tile = Region {
            x: x0 + col * (tile_w + TILE_GAP) + lean,
            y: y0 + row * (TILE_H + 1),
            w: tile_w,
            h: TILE_H,
        };
        if tile.y + tile.h > region.y + region.h {
            break;
        }

        let border = if progress < 1.0 { c.palette.muted } else { c.palette.pink };
        let style = Style::default().fg(border);
        let inner = "─".repeat((tile.w - 2).max(0) as usize);
        c.put_str(tile.x, tile.y, &format!("╭{}╮", inner), style);
        for r in 1..tile.h - 1 {
            c.put_str(tile.x, tile.y + r, "│", style);
            c.put_str(tile.x + tile.w - 1, tile.y + r, "│", style);
        }
        c.put_str(tile.x, tile.y + tile.h - 1, &format!("╰{}╯", inner), style);

        let tcx = tile.x + tile.w / 2;
        c.put_centered(tcx, tile.y + 1, &media_label(&item.media), Style::default().fg(c.palette.muted));
        c.put_centered(
            tcx,
            tile.y + 2,
            &truncate(item.media.file_name(), tile.w - 4),
            Style::default().fg(c.palette.text),
        );
        if progress >= 1.0 {
            c.put_centered(
                tcx,
                tile.y + 4,
                item.caption,
                Style::default().fg(c.palette.pink).add_modifier(Modifier::BOLD),
            );
        }
    }
}

/// Kind line of a tile; videos list how they play
fn media_label(media: &MediaItem) -> String {
    if !media.is_video() {
        return "▣ foto".to_string();
    }
    let mut label = String::from("▶ video");
    for (on, flag) in [(media.autoplay(), "auto"), (media.looped(), "loop"), (media.muted(), "mute")] {
        if on {
            label.push_str(" · ");
            label.push_str(flag);
        }
    }
    label
}

fn truncate(s: &str, max: i32) -> String {
    if text_width(s) <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for ch in s.chars() {
        if text_width(&out) + 2 > max {
            break;
        }
        out.push(ch);
    }
    out.push('…');
    out
}
