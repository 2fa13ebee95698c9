//! Renderers for the three gate widgets.
//!
//! Each draws from widget state only and registers the elements the core
//! hit-tests and measures. Draggable elements are registered at their layout
//! position; the live drag translation is applied when drawing.

use super::canvas::{text_width, wrap, Canvas, Region};
use crate::data::{ElementId, MediaItem, Point};
use crate::widgets::{heart_repair, hands_snap, BookOpenState, HandsSnapState, HeartRepairState, Particle};
use ratatui::style::{Modifier, Style};

pub(super) const HEART: [&str; 7] = [
    " .:::.   .:::. ",
    ":::::::.:::::::",
    ":::::::::::::::",
    "':::::::::::::'",
    "  ':::::::::'  ",
    "    ':::::'    ",
    "      ':'      ",
];

const BROKEN_HEART: [&str; 7] = [
    " .:::.   .:::. ",
    ":::::::/ ::::::",
    "::::::\\  ::::::",
    "':::::/  :::::'",
    "  ':::\\  :::'  ",
    "    '::/ :'    ",
    "      ':'      ",
];

const BANDAGE: &str = "[=+=+=]";

const LEFT_HAND: [&str; 4] = [" _ _ _   ", "| | | |_ ", "|      / ", " \\____/  "];
const RIGHT_HAND: [&str; 4] = ["   _ _ _ ", " _| | | |", " \\      |", "  \\____/ "];

const BOOK_W: i32 = 26;
const BOOK_H: i32 = 12;

pub fn render_heart_repair(c: &mut Canvas, region: Region, w: &HeartRepairState) {
    let (cx, cy) = region.center();
    let heart_w = text_width(HEART[0]);
    let heart = Region {
        x: cx - heart_w / 2,
        y: cy - 2,
        w: heart_w,
        h: HEART.len() as i32,
    };
    c.register(ElementId::Heart, heart);

    let (art, color) = if w.is_repaired() {
        (HEART, c.palette.accent)
    } else {
        (BROKEN_HEART, c.palette.muted)
    };
    c.put_lines(heart.x, heart.y, &art, Style::default().fg(color));

    let bandage_w = text_width(BANDAGE);
    let bandage_style = Style::default()
        .fg(c.palette.gold)
        .add_modifier(Modifier::BOLD);

    if let Some(at) = w.repaired_at() {
        c.put_centered(cx, heart.y + 2, BANDAGE, bandage_style);
        let elapsed = c.now.saturating_duration_since(at).as_secs_f32();
        draw_particles(c, (cx, heart.y + 3), &w.particles, elapsed, heart_repair::CELEBRATION_SECS);
        c.put_centered(
            cx,
            heart.y + heart.h + 2,
            "¡Corazón reparado! ♥",
            Style::default().fg(c.palette.pink),
        );
    } else {
        let layout = Region {
            x: heart.x - 12 - bandage_w,
            y: heart.y + 3,
            w: bandage_w,
            h: 1,
        };
        c.register(ElementId::Bandage, layout);
        let (dx, dy) = c.px_to_cells(w.bandage_offset());
        c.put_str(layout.x + dx, layout.y + dy, BANDAGE, bandage_style);
        c.put_centered(
            cx,
            heart.y + heart.h + 2,
            "Arrastra la curita hasta el corazón",
            Style::default().fg(c.palette.muted),
        );
    }
}

pub fn render_hands_snap(c: &mut Canvas, region: Region, w: &HandsSnapState) {
    let (cx, cy) = region.center();
    let hand_w = text_width(LEFT_HAND[0]);
    let hand_style = Style::default().fg(c.palette.pink);

    if let Some(at) = w.joined_at() {
        c.put_lines(cx - hand_w, cy - 2, &LEFT_HAND, hand_style);
        c.put_lines(cx, cy - 2, &RIGHT_HAND, hand_style);
        c.put_centered(cx, cy - 4, "♥", Style::default().fg(c.palette.accent).add_modifier(Modifier::BOLD));
        let elapsed = c.now.saturating_duration_since(at).as_secs_f32();
        draw_particles(c, (cx, cy - 4), &w.hearts, elapsed, hands_snap::CELEBRATION_SECS);
        c.put_centered(cx, cy + 4, "Juntos ♥", Style::default().fg(c.palette.pink));
        return;
    }

    let left = Region {
        x: cx - 20 - hand_w / 2,
        y: cy - 2,
        w: hand_w,
        h: LEFT_HAND.len() as i32,
    };
    let right = Region {
        x: cx + 20 - hand_w / 2,
        ..left
    };
    c.register(ElementId::LeftHand, left);
    c.register(ElementId::RightHand, right);

    c.put_lines(left.x, left.y, &LEFT_HAND, hand_style);
    let (dx, _) = c.px_to_cells(Point::new(w.drag_offset_x(), 0.0));
    c.put_lines(right.x + dx, right.y, &RIGHT_HAND, hand_style.add_modifier(Modifier::BOLD));
    c.put_centered(
        cx,
        cy + 4,
        "← Junta nuestras manos",
        Style::default().fg(c.palette.muted),
    );
}

pub fn render_book_open(c: &mut Canvas, region: Region, w: &BookOpenState) {
    let (cx, cy) = region.center();
    let frame = Style::default().fg(c.palette.gold);
    let text = Style::default().fg(c.palette.text);

    let book = Region {
        x: cx - BOOK_W / 2,
        y: cy - BOOK_H / 2,
        w: BOOK_W,
        h: BOOK_H,
    };
    c.register(ElementId::Book, book);

    let cover_label = format!("[{}]", MediaItem::from_source(&w.cover_image).file_name());

    if !w.is_open() {
        draw_box(c, book, frame);
        c.put_centered(cx, book.y + 3, &w.book_title, frame.add_modifier(Modifier::BOLD));
        c.put_centered(cx, book.y + 5, "♥", Style::default().fg(c.palette.accent));
        c.put_centered(cx, book.y + BOOK_H - 3, &cover_label, Style::default().fg(c.palette.muted));
        c.put_centered(
            cx,
            book.y + BOOK_H + 1,
            "Toca el libro para abrirlo",
            Style::default().fg(c.palette.muted),
        );
        return;
    }

    // Two-page spread; the cover folds away to the left as it opens
    let spread = Region {
        x: cx - BOOK_W,
        y: book.y,
        w: BOOK_W * 2,
        h: BOOK_H,
    };
    draw_box(c, spread, frame);
    for row in 1..BOOK_H - 1 {
        c.put_str(cx, spread.y + row, "│", frame);
    }

    let angle = w.cover_angle(c.now);
    let cover_w = ((1.0 - angle) * BOOK_W as f32).round() as i32;
    if cover_w >= 2 {
        let cover = Region {
            x: cx - cover_w,
            y: book.y,
            w: cover_w,
            h: BOOK_H,
        };
        c.fill(cover, Style::default().bg(c.palette.muted));
        draw_box(c, cover, frame);
    } else {
        c.put_centered(cx - BOOK_W / 2, spread.y + 2, &w.book_title, frame.add_modifier(Modifier::BOLD));
        c.put_centered(cx - BOOK_W / 2, spread.y + 4, &cover_label, Style::default().fg(c.palette.muted));
    }

    if w.shows_manuscript() {
        let page_w = BOOK_W - 4;
        for (i, line) in wrap(w.manuscript_text(), page_w)
            .iter()
            .take((BOOK_H - 2) as usize)
            .enumerate()
        {
            c.put_str(cx + 2, spread.y + 1 + i as i32, line, text.add_modifier(Modifier::ITALIC));
        }
    }
}

fn draw_box(c: &mut Canvas, r: Region, style: Style) {
    if r.w < 2 || r.h < 2 {
        return;
    }
    let inner = "─".repeat((r.w - 2) as usize);
    c.put_str(r.x, r.y, &format!("╭{}╮", inner), style);
    for row in 1..r.h - 1 {
        c.put_str(r.x, r.y + row, "│", style);
        c.put_str(r.x + r.w - 1, r.y + row, "│", style);
    }
    c.put_str(r.x, r.y + r.h - 1, &format!("╰{}╯", inner), style);
}

/// Hearts flying out from `origin` (in cells)
fn draw_particles(c: &mut Canvas, origin: (i32, i32), particles: &[Particle], elapsed: f32, duration: f32) {
    for p in particles {
        let Some(pos) = p.position_at(elapsed, duration) else {
            continue;
        };
        let (dx, dy) = c.px_to_cells(pos);
        let color = if p.alt_color { c.palette.gold } else { c.palette.pink };
        c.put_str(origin.0 + dx, origin.1 + dy, "♥", Style::default().fg(color));
    }
}
