//! Configuration loader plus strongly typed settings structures.
//!
//! This module deserializes the TOML config we ship, exposes the data
//! directory layout (~/.heartdeck), extracts embedded defaults on first run
//! and resolves key strings into key bindings.

use anyhow::{Context, Result};
use crossterm::event::{KeyCode, KeyModifiers};
use include_dir::{include_dir, Dir};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

// Embed default configuration files at compile time
const DEFAULT_CONFIG: &str = include_str!("../defaults/config.toml");

// Embed entire directories - automatically includes all files
static MANIFESTS_DIR: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/defaults/manifests");

/// Name of the manifest used when none is given on the command line
pub const DEFAULT_MANIFEST_NAME: &str = "presentation.json";

/// Top-level configuration object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub gestures: GestureConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub sound: SoundConfig,
    #[serde(default = "default_keybinds")]
    pub keybinds: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_poll_timeout_ms")]
    pub poll_timeout_ms: u64, // Event poll timeout in milliseconds (lower = higher FPS, higher CPU)
    #[serde(default = "default_transition_ms")]
    pub transition_ms: u64, // Slide-in duration after navigation
    #[serde(default = "default_pulse_period_ms")]
    pub pulse_period_ms: u64, // Period of the current-slide marker pulse
    #[serde(default)]
    pub colors: PaletteConfig,
}

/// Hex colours used by the TUI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaletteConfig {
    #[serde(default = "default_background_color")]
    pub background: String,
    #[serde(default = "default_accent_color")]
    pub accent: String,
    #[serde(default = "default_pink_color")]
    pub pink: String,
    #[serde(default = "default_text_color")]
    pub text: String,
    #[serde(default = "default_muted_color")]
    pub muted: String,
    #[serde(default = "default_gold_color")]
    pub gold: String,
}

/// Gesture thresholds, all in pixels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GestureConfig {
    #[serde(default = "default_swipe_confidence_threshold")]
    pub swipe_confidence_threshold: f32, // |offset| * |velocity| needed to change slides
    #[serde(default = "default_heart_repair_threshold")]
    pub heart_repair_threshold_px: f32,
    #[serde(default)]
    pub heart_repair_responsive: bool, // If true: min(heart_repair_max_px, viewport / 5)
    #[serde(default = "default_heart_repair_max")]
    pub heart_repair_max_px: f32,
    #[serde(default = "default_hands_snap_threshold")]
    pub hands_snap_threshold_px: f32,
    #[serde(default = "default_hands_snap_narrow_threshold")]
    pub hands_snap_narrow_threshold_px: f32,
    #[serde(default = "default_narrow_viewport")]
    pub narrow_viewport_px: f32,
    #[serde(default = "default_cell_width")]
    pub cell_width_px: f32,
    #[serde(default = "default_cell_height")]
    pub cell_height_px: f32,
}

/// Delays for the "animate, then signal" widgets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    #[serde(default = "default_celebration_ms")]
    pub heart_repair_complete_ms: u64,
    #[serde(default = "default_celebration_ms")]
    pub hands_snap_complete_ms: u64,
    #[serde(default = "default_book_reveal_ms")]
    pub book_reveal_ms: u64,
    #[serde(default = "default_book_complete_ms")]
    pub book_complete_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoundConfig {
    #[serde(default = "default_sound_enabled")]
    pub enabled: bool,
    #[serde(default = "default_sound_volume")]
    pub volume: f32, // Master volume (0.0 to 1.0)
    #[serde(default)]
    pub track: Option<String>, // File in the sounds directory, extension optional
    #[serde(default)]
    pub autoplay: bool,
}

/// Actions that can be bound to keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    NextSlide,
    PrevSlide,
    FirstSlide,
    ToggleMusicPanel,
    ToggleMute,
    TogglePlayback,
    Quit,
}

impl KeyAction {
    pub fn from_str(action: &str) -> Option<Self> {
        match action {
            "next_slide" => Some(Self::NextSlide),
            "prev_slide" => Some(Self::PrevSlide),
            "first_slide" => Some(Self::FirstSlide),
            "toggle_music_panel" => Some(Self::ToggleMusicPanel),
            "toggle_mute" => Some(Self::ToggleMute),
            "toggle_playback" => Some(Self::TogglePlayback),
            "quit" => Some(Self::Quit),
            _ => None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        // The embedded file is covered by tests; fall back to serde defaults regardless
        toml::from_str(DEFAULT_CONFIG).unwrap_or_else(|e| {
            tracing::error!("Embedded default config is invalid: {}", e);
            Self {
                ui: UiConfig::default(),
                gestures: GestureConfig::default(),
                timing: TimingConfig::default(),
                sound: SoundConfig::default(),
                keybinds: default_keybinds(),
            }
        })
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            poll_timeout_ms: default_poll_timeout_ms(),
            transition_ms: default_transition_ms(),
            pulse_period_ms: default_pulse_period_ms(),
            colors: PaletteConfig::default(),
        }
    }
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            background: default_background_color(),
            accent: default_accent_color(),
            pink: default_pink_color(),
            text: default_text_color(),
            muted: default_muted_color(),
            gold: default_gold_color(),
        }
    }
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            swipe_confidence_threshold: default_swipe_confidence_threshold(),
            heart_repair_threshold_px: default_heart_repair_threshold(),
            heart_repair_responsive: false,
            heart_repair_max_px: default_heart_repair_max(),
            hands_snap_threshold_px: default_hands_snap_threshold(),
            hands_snap_narrow_threshold_px: default_hands_snap_narrow_threshold(),
            narrow_viewport_px: default_narrow_viewport(),
            cell_width_px: default_cell_width(),
            cell_height_px: default_cell_height(),
        }
    }
}

impl GestureConfig {
    /// Release distance (exclusive) under which the heart counts as repaired
    pub fn heart_repair_threshold(&self, viewport_width_px: f32) -> f32 {
        if self.heart_repair_responsive {
            self.heart_repair_max_px.min(viewport_width_px / 5.0)
        } else {
            self.heart_repair_threshold_px
        }
    }

    /// Leftward offset (exclusive) the right hand must travel to join
    pub fn hands_snap_threshold(&self, viewport_width_px: f32) -> f32 {
        if viewport_width_px < self.narrow_viewport_px {
            self.hands_snap_narrow_threshold_px
        } else {
            self.hands_snap_threshold_px
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            heart_repair_complete_ms: default_celebration_ms(),
            hands_snap_complete_ms: default_celebration_ms(),
            book_reveal_ms: default_book_reveal_ms(),
            book_complete_ms: default_book_complete_ms(),
        }
    }
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            enabled: default_sound_enabled(),
            volume: default_sound_volume(),
            track: None,
            autoplay: false,
        }
    }
}

impl Config {
    /// Load config.toml from the data directory, extracting defaults first
    pub fn load() -> Result<Self> {
        Self::extract_defaults()?;
        let config_path = Self::config_path()?;
        Self::load_from_path(&config_path)
    }

    /// Load config from a custom file path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents =
            fs::read_to_string(path).context(format!("Failed to read config file: {:?}", path))?;
        Self::from_toml(&contents).context(format!("Failed to parse config file: {:?}", path))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(contents)?;
        config.sound.volume = config.sound.volume.clamp(0.0, 1.0);
        Ok(config)
    }

    /// Resolve the keybinds table; unknown keys or actions are logged and skipped
    pub fn keybind_map(&self) -> HashMap<(KeyCode, KeyModifiers), KeyAction> {
        let mut map = HashMap::new();
        for (key, action) in &self.keybinds {
            let Some(combo) = parse_key_string(key) else {
                tracing::warn!("Ignoring keybind with unknown key '{}'", key);
                continue;
            };
            let Some(action) = KeyAction::from_str(action) else {
                tracing::warn!("Ignoring keybind '{}' with unknown action '{}'", key, action);
                continue;
            };
            map.insert(combo, action);
        }
        map
    }

    /// Write embedded defaults that are missing from the data directory.
    /// Idempotent - only creates missing files.
    fn extract_defaults() -> Result<()> {
        let base = Self::config_dir()?;
        fs::create_dir_all(&base)?;

        let config_path = Self::config_path()?;
        if !config_path.exists() {
            fs::write(&config_path, DEFAULT_CONFIG).context("Failed to write config.toml")?;
            tracing::info!("Extracted config.toml to {:?}", config_path);
        }

        let manifests_dir = Self::manifests_dir()?;
        fs::create_dir_all(&manifests_dir)?;
        for file in MANIFESTS_DIR.files() {
            let filename = file
                .path()
                .file_name()
                .and_then(|n| n.to_str())
                .context("Invalid manifest filename")?;
            let manifest_path = manifests_dir.join(filename);

            if !manifest_path.exists() {
                let content = file
                    .contents_utf8()
                    .context(format!("Failed to read embedded manifest {}", filename))?;
                fs::write(&manifest_path, content)
                    .context(format!("Failed to write manifests/{}", filename))?;
                tracing::info!("Extracted manifest {} to {:?}", filename, manifest_path);
            }
        }

        fs::create_dir_all(Self::sounds_dir()?)?;
        Ok(())
    }

    /// The embedded default manifest (used when nothing is on disk)
    pub fn embedded_manifest() -> Option<&'static str> {
        MANIFESTS_DIR
            .get_file(DEFAULT_MANIFEST_NAME)
            .and_then(|f| f.contents_utf8())
    }

    /// Get the base heartdeck directory (~/.heartdeck/)
    /// Can be overridden with HEARTDECK_DIR environment variable
    fn config_dir() -> Result<PathBuf> {
        if let Ok(custom_dir) = std::env::var("HEARTDECK_DIR") {
            return Ok(PathBuf::from(custom_dir));
        }

        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".heartdeck"))
    }

    /// Returns: ~/.heartdeck/config.toml
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns: ~/.heartdeck/manifests/
    pub fn manifests_dir() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("manifests"))
    }

    /// Returns: ~/.heartdeck/manifests/presentation.json
    pub fn default_manifest_path() -> Result<PathBuf> {
        Ok(Self::manifests_dir()?.join(DEFAULT_MANIFEST_NAME))
    }

    /// Returns: ~/.heartdeck/sounds/
    pub fn sounds_dir() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("sounds"))
    }
}

/// Parse a key string like "ctrl+c" or "space" into KeyCode and KeyModifiers
pub fn parse_key_string(key_str: &str) -> Option<(KeyCode, KeyModifiers)> {
    let parts: Vec<&str> = key_str.split('+').collect();
    let mut modifiers = KeyModifiers::empty();
    let mut key_part = key_str;

    // Parse modifiers
    if parts.len() > 1 {
        for part in &parts[..parts.len() - 1] {
            match part.to_lowercase().as_str() {
                "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }
        key_part = parts[parts.len() - 1];
    }

    let key_code = match key_part {
        "enter" => KeyCode::Enter,
        "backspace" => KeyCode::Backspace,
        "tab" => KeyCode::Tab,
        "esc" | "escape" => KeyCode::Esc,
        "space" => KeyCode::Char(' '),
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "page_up" | "pageup" => KeyCode::PageUp,
        "page_down" | "pagedown" => KeyCode::PageDown,

        // Single character
        s if s.chars().count() == 1 => KeyCode::Char(s.chars().next()?),

        _ => return None,
    };

    Some((key_code, modifiers))
}

fn default_poll_timeout_ms() -> u64 {
    16 // ~60 FPS
}

fn default_transition_ms() -> u64 {
    350
}

fn default_pulse_period_ms() -> u64 {
    2000
}

fn default_background_color() -> String {
    "#09090b".to_string() // zinc-950
}

fn default_accent_color() -> String {
    "#ff4d6d".to_string()
}

fn default_pink_color() -> String {
    "#ffb3c1".to_string()
}

fn default_text_color() -> String {
    "#f4f4f5".to_string()
}

fn default_muted_color() -> String {
    "#71717a".to_string()
}

fn default_gold_color() -> String {
    "#fef08a".to_string()
}

fn default_swipe_confidence_threshold() -> f32 {
    10_000.0
}

fn default_heart_repair_threshold() -> f32 {
    80.0
}

fn default_heart_repair_max() -> f32 {
    150.0
}

fn default_hands_snap_threshold() -> f32 {
    130.0
}

fn default_hands_snap_narrow_threshold() -> f32 {
    80.0
}

fn default_narrow_viewport() -> f32 {
    640.0
}

fn default_cell_width() -> f32 {
    8.0
}

fn default_cell_height() -> f32 {
    16.0
}

fn default_celebration_ms() -> u64 {
    2000
}

fn default_book_reveal_ms() -> u64 {
    600
}

fn default_book_complete_ms() -> u64 {
    5000
}

fn default_sound_enabled() -> bool {
    true
}

fn default_sound_volume() -> f32 {
    0.5
}

/// Default key bindings
pub fn default_keybinds() -> HashMap<String, String> {
    [
        ("right", "next_slide"),
        ("space", "next_slide"),
        ("l", "next_slide"),
        ("left", "prev_slide"),
        ("h", "prev_slide"),
        ("home", "first_slide"),
        ("m", "toggle_music_panel"),
        ("u", "toggle_mute"),
        ("p", "toggle_playback"),
        ("q", "quit"),
        ("esc", "quit"),
        ("ctrl+c", "quit"),
    ]
    .into_iter()
    .map(|(k, a)| (k.to_string(), a.to_string()))
    .collect()
}
