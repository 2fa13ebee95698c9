//! Clipped drawing surface shared by the slide renderers.
//!
//! Slides slide in from the side, so content may start left of the screen.
//! All coordinates here are signed cells; anything outside `clip` is dropped.
//! Interactive elements are registered into `UiState` in pixels as they are
//! drawn.

use super::palette::Palette;
use crate::data::{CellMetrics, ElementId, Point, UiState};
use ratatui::{buffer::Buffer, layout::Rect, style::Style, text::Span};
use std::time::Instant;

/// A signed rectangle of cells (may lie partly off screen)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Region {
    pub fn from_rect(r: Rect) -> Self {
        Self {
            x: r.x as i32,
            y: r.y as i32,
            w: r.width as i32,
            h: r.height as i32,
        }
    }

    pub fn center(&self) -> (i32, i32) {
        (self.x + self.w / 2, self.y + self.h / 2)
    }

    pub fn shifted(&self, dx: i32) -> Self {
        Self {
            x: self.x + dx,
            ..*self
        }
    }
}

/// Display width of a string in cells
pub fn text_width(s: &str) -> i32 {
    Span::raw(s).width() as i32
}

/// Greedy word wrap to `width` cells
pub fn wrap(text: &str, width: i32) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            if !line.is_empty() && text_width(&line) + 1 + text_width(word) > width {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }
        lines.push(line);
    }
    lines
}

pub struct Canvas<'a> {
    pub buf: &'a mut Buffer,
    pub ui: &'a mut UiState,
    pub metrics: CellMetrics,
    pub palette: &'a Palette,
    pub now: Instant,
    pub clip: Rect,
}

impl<'a> Canvas<'a> {
    /// Draw `text` starting at (x, y); returns its width
    pub fn put_str(&mut self, x: i32, y: i32, text: &str, style: Style) -> i32 {
        let clip = self.clip;
        let in_rows = y >= clip.y as i32 && y < clip.bottom() as i32;
        let mut cx = x;
        let mut utf8 = [0u8; 4];
        for c in text.chars() {
            let s: &str = c.encode_utf8(&mut utf8);
            let w = text_width(s);
            if w == 0 {
                continue;
            }
            if in_rows && cx >= clip.x as i32 && cx + w <= clip.right() as i32 {
                self.buf.set_string(cx as u16, y as u16, s, style);
            }
            cx += w;
        }
        cx - x
    }

    /// Draw `text` centred on column `cx`
    pub fn put_centered(&mut self, cx: i32, y: i32, text: &str, style: Style) {
        let x = cx - text_width(text) / 2;
        self.put_str(x, y, text, style);
    }

    /// Draw a block of lines with its top-left corner at (x, y)
    pub fn put_lines(&mut self, x: i32, y: i32, lines: &[&str], style: Style) {
        for (i, line) in lines.iter().enumerate() {
            self.put_str(x, y + i as i32, line, style);
        }
    }

    /// Paint the background of every visible cell in `region`
    pub fn fill(&mut self, region: Region, style: Style) {
        let clip = self.clip;
        let x0 = region.x.max(clip.x as i32);
        let x1 = (region.x + region.w).min(clip.right() as i32);
        let y0 = region.y.max(clip.y as i32);
        let y1 = (region.y + region.h).min(clip.bottom() as i32);
        for y in y0..y1 {
            for x in x0..x1 {
                self.buf[(x as u16, y as u16)].set_style(style);
            }
        }
    }

    /// Record an element's on-screen bounds (in pixels) for hit testing
    pub fn register(&mut self, id: ElementId, region: Region) {
        let bounds = self
            .metrics
            .cells_to_bounds(region.x, region.y, region.w, region.h);
        self.ui.register(id, bounds);
    }

    /// Convert a pixel displacement into whole cells
    pub fn px_to_cells(&self, p: Point) -> (i32, i32) {
        (
            (p.x / self.metrics.cell_width_px).round() as i32,
            (p.y / self.metrics.cell_height_px).round() as i32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas_test(f: impl FnOnce(&mut Canvas)) -> (Buffer, UiState) {
        let area = Rect::new(0, 0, 20, 5);
        let mut buf = Buffer::empty(area);
        let mut ui = UiState::new();
        let palette = Palette::default();
        {
            let mut c = Canvas {
                buf: &mut buf,
                ui: &mut ui,
                metrics: CellMetrics::default(),
                palette: &palette,
                now: Instant::now(),
                clip: area,
            };
            f(&mut c);
        }
        (buf, ui)
    }

    #[test]
    fn test_put_str_clips_left_edge() {
        let (buf, _) = canvas_test(|c| {
            c.put_str(-2, 1, "hello", Style::default());
        });
        assert_eq!(buf[(0, 1)].symbol(), "l");
        assert_eq!(buf[(2, 1)].symbol(), "o");
    }

    #[test]
    fn test_register_converts_to_pixels() {
        let (_, ui) = canvas_test(|c| {
            c.register(ElementId::Book, Region { x: 2, y: 1, w: 3, h: 2 });
        });
        use crate::data::Measure;
        let b = ui.bounds(ElementId::Book).unwrap();
        assert_eq!((b.x, b.y, b.width, b.height), (16.0, 16.0, 24.0, 32.0));
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap("uno dos tres", 7), vec!["uno dos", "tres"]);
        assert_eq!(wrap("", 5), Vec::<String>::new());
    }
}
