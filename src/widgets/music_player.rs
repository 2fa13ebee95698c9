//! Ambient music player controls.
//!
//! Independent of slide sequencing: the panel, mute and playback flags are
//! toggled by the user and mirrored onto the audio backend by AppCore.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MusicPlayerState {
    pub open: bool,
    pub muted: bool,
    pub playing: bool,
    /// Display label for the current track
    pub track_label: Option<String>,
}

impl MusicPlayerState {
    pub fn new(track_label: Option<String>, autoplay: bool) -> Self {
        Self {
            open: false,
            muted: false,
            playing: autoplay && track_label.is_some(),
            track_label,
        }
    }

    pub fn toggle_open(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    /// Nothing to play without a track
    pub fn toggle_playing(&mut self) -> bool {
        if self.track_label.is_some() {
            self.playing = !self.playing;
        }
        self.playing
    }

    pub fn status_line(&self) -> String {
        let track = self.track_label.as_deref().unwrap_or("sin canción");
        let state = if self.playing { "▶" } else { "⏸" };
        let vol = if self.muted { "🔇" } else { "🔊" };
        format!("{} {} {}", state, vol, track)
    }
}
