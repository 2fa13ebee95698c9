use crate::config::PaletteConfig;
use ratatui::style::Color;

/// Resolved colours for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: Color,
    pub accent: Color,
    pub pink: Color,
    pub text: Color,
    pub muted: Color,
    pub gold: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self::from_config(&PaletteConfig::default())
    }
}

impl Palette {
    pub fn from_config(colors: &PaletteConfig) -> Self {
        Self {
            background: hex_to_color(&colors.background).unwrap_or(Color::Black),
            accent: hex_to_color(&colors.accent).unwrap_or(Color::Red),
            pink: hex_to_color(&colors.pink).unwrap_or(Color::LightMagenta),
            text: hex_to_color(&colors.text).unwrap_or(Color::White),
            muted: hex_to_color(&colors.muted).unwrap_or(Color::DarkGray),
            gold: hex_to_color(&colors.gold).unwrap_or(Color::Yellow),
        }
    }
}

/// Convert hex string to ratatui Color
pub fn hex_to_color(hex: &str) -> Option<Color> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some(Color::Rgb(r, g, b))
}

/// Blend two RGB colours; non-RGB colours snap at the midpoint
pub fn mix(a: Color, b: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    match (a, b) {
        (Color::Rgb(r1, g1, b1), Color::Rgb(r2, g2, b2)) => {
            let lerp = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
            Color::Rgb(lerp(r1, r2), lerp(g1, g2), lerp(b1, b2))
        }
        _ if t < 0.5 => a,
        _ => b,
    }
}

/// Triangle wave in 0.0..=1.0 with the given period
pub fn pulse(elapsed_secs: f32, period_secs: f32) -> f32 {
    if period_secs <= 0.0 {
        return 1.0;
    }
    let phase = (elapsed_secs / period_secs).fract();
    1.0 - (2.0 * phase - 1.0).abs()
}
