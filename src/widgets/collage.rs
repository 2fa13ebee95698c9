//! Collage: a grid of photos and videos with love-note captions.
//!
//! Tiles enter one after another and settle at a small alternating tilt.
//! A few notes drift upward behind the grid on a loop.

use super::GateWidget;
use crate::data::{MediaItem, Point};
use std::time::Instant;

pub const CAPTIONS: &[&str] = &[
    "Tu sonrisa ✨",
    "Tu apoyo 💖",
    "Tu locura 😜",
    "Tu ternura 🧸",
    "Nuestras risas 😂",
    "Todo de ti 😍",
];

/// Seconds between consecutive tiles appearing
const STAGGER_SECS: f32 = 0.15;
/// Seconds a tile takes to grow in
const ENTER_SECS: f32 = 0.6;

const DRIFT_RISE_PX: f32 = 300.0;

#[derive(Debug, Clone)]
pub struct CollageItem {
    pub media: MediaItem,
    pub caption: &'static str,
    /// Resting tilt in degrees
    pub tilt: f32,
}

#[derive(Debug, Clone)]
pub struct CollageState {
    pub items: Vec<CollageItem>,
    mounted_at: Instant,
}

impl CollageState {
    pub fn new(media: &[MediaItem], now: Instant) -> Self {
        let items = media
            .iter()
            .enumerate()
            .map(|(i, m)| CollageItem {
                media: m.clone(),
                caption: CAPTIONS[i % CAPTIONS.len()],
                tilt: tilt_for(i),
            })
            .collect();
        Self {
            items,
            mounted_at: now,
        }
    }

    pub fn elapsed(&self, now: Instant) -> f32 {
        now.saturating_duration_since(self.mounted_at).as_secs_f32()
    }

    /// Entrance progress of tile `i` in 0.0..=1.0
    pub fn item_progress(&self, i: usize, now: Instant) -> f32 {
        let start = i as f32 * STAGGER_SECS;
        ((self.elapsed(now) - start) / ENTER_SECS).clamp(0.0, 1.0)
    }

    pub fn video_count(&self) -> usize {
        self.items.iter().filter(|it| it.media.is_video()).count()
    }

    /// Background drifting notes: (text, offset from the centre, opacity)
    pub fn drifting_notes(&self, now: Instant) -> Vec<(&'static str, Point, f32)> {
        let elapsed = self.elapsed(now);
        CAPTIONS
            .iter()
            .enumerate()
            .filter_map(|(i, text)| {
                let delay = i as f32 * 1.5;
                let period = 8.0 + i as f32;
                if elapsed < delay {
                    return None;
                }
                let t = ((elapsed - delay) % period) / period;
                let side = if i % 2 == 0 { 1.0 } else { -1.0 };
                let x = side * (i as f32 * 60.0 + 50.0);
                let y = -100.0 - DRIFT_RISE_PX * t;
                // Fades in then out over one pass
                let opacity = 0.3 * (1.0 - (2.0 * t - 1.0).abs());
                Some((*text, Point::new(x, y), opacity))
            })
            .collect()
    }
}

/// Alternating tilt that grows with the index: +2, -4, +6, -8, ...
fn tilt_for(i: usize) -> f32 {
    let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
    sign * (i as f32 * 2.0 + 2.0)
}

impl GateWidget for CollageState {
    fn is_animating(&self, now: Instant) -> bool {
        self.items
            .len()
            .checked_sub(1)
            .is_some_and(|last| self.item_progress(last, now) < 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn media() -> Vec<MediaItem> {
        ["/a.jpg", "/b.mp4", "/c.png", "video:/d", "/e.jpg", "/f.jpg", "/g.jpg"]
            .iter()
            .map(|s| MediaItem::from_source(s))
            .collect()
    }

    #[test]
    fn test_captions_cycle() {
        let c = CollageState::new(&media(), Instant::now());
        assert_eq!(c.items.len(), 7);
        assert_eq!(c.items[0].caption, CAPTIONS[0]);
        assert_eq!(c.items[6].caption, CAPTIONS[0]);
        assert_eq!(c.video_count(), 2);
    }

    #[test]
    fn test_tilt_alternates() {
        assert_eq!(tilt_for(0), 2.0);
        assert_eq!(tilt_for(1), -4.0);
        assert_eq!(tilt_for(2), 6.0);
    }

    #[test]
    fn test_tiles_stagger_in() {
        let t0 = Instant::now();
        let c = CollageState::new(&media(), t0);
        let t = t0 + Duration::from_millis(300);
        assert!(c.item_progress(0, t) > c.item_progress(1, t));
        assert_eq!(c.item_progress(3, t), 0.0);
        assert!(c.is_animating(t));
        assert!(!c.is_animating(t0 + Duration::from_secs(5)));
        assert!(!c.is_satisfied());
    }

    #[test]
    fn test_empty_collage_is_still() {
        let c = CollageState::new(&[], Instant::now());
        assert!(!c.is_animating(Instant::now()));
        assert!(c.drifting_notes(Instant::now()).len() <= 1);
    }
}
