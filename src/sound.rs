use crate::config::SoundConfig;
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[cfg(feature = "sound")]
use rodio::{Decoder, OutputStream, Sink, Source};
#[cfg(feature = "sound")]
use std::fs::File;
#[cfg(feature = "sound")]
use std::io::BufReader;

/// Extensions tried when the configured track has none
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "flac"];

/// Looping background track behind the music player controls
#[cfg(feature = "sound")]
pub struct AmbientAudio {
    _stream: OutputStream,
    sink: Option<Sink>,
    volume: f32,
}

#[cfg(feature = "sound")]
impl AmbientAudio {
    /// Open the default output device and queue the configured track (paused)
    pub fn new(config: &SoundConfig) -> Result<Self> {
        let (stream, stream_handle) = OutputStream::try_default()?;
        let volume = config.volume.clamp(0.0, 1.0);

        let sink = if config.enabled {
            match config.track.as_deref() {
                Some(track) => {
                    let sounds_dir = crate::config::Config::sounds_dir()?;
                    match resolve_track(&sounds_dir, track) {
                        Some(path) => Self::load(&stream_handle, &path, volume),
                        None => {
                            warn!(
                                "Track not found: {:?} (tried extensions: mp3, wav, ogg, flac)",
                                sounds_dir.join(track)
                            );
                            None
                        }
                    }
                }
                None => None,
            }
        } else {
            debug!("Sound disabled in config");
            None
        };

        Ok(Self {
            _stream: stream,
            sink,
            volume,
        })
    }

    fn load(handle: &rodio::OutputStreamHandle, path: &Path, volume: f32) -> Option<Sink> {
        // Open the file
        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Failed to open track {:?}: {}", path, e);
                return None;
            }
        };

        // Decode the audio file
        let source = match Decoder::new(BufReader::new(file)) {
            Ok(s) => s,
            Err(e) => {
                warn!("Failed to decode track {:?}: {}", path, e);
                return None;
            }
        };

        let sink = match Sink::try_new(handle) {
            Ok(s) => s,
            Err(e) => {
                warn!("Failed to create audio sink: {}", e);
                return None;
            }
        };
        sink.set_volume(volume);
        sink.pause();
        sink.append(source.repeat_infinite());
        debug!("Loaded track {:?} at volume {}", path, volume);
        Some(sink)
    }

    pub fn has_track(&self) -> bool {
        self.sink.is_some()
    }

    pub fn set_playing(&self, playing: bool) {
        if let Some(sink) = &self.sink {
            if playing {
                sink.play();
            } else {
                sink.pause();
            }
            debug!("Ambient track playing: {}", playing);
        }
    }

    /// Mute keeps the track running silently
    pub fn set_muted(&self, muted: bool) {
        if let Some(sink) = &self.sink {
            sink.set_volume(if muted { 0.0 } else { self.volume });
            debug!("Ambient track muted: {}", muted);
        }
    }
}

/// Stand-in when built without the `sound` feature
#[cfg(not(feature = "sound"))]
pub struct AmbientAudio;

#[cfg(not(feature = "sound"))]
impl AmbientAudio {
    pub fn new(_config: &SoundConfig) -> Result<Self> {
        debug!("Built without sound support; ambient audio disabled");
        Ok(Self)
    }

    pub fn has_track(&self) -> bool {
        false
    }

    pub fn set_playing(&self, _playing: bool) {}

    pub fn set_muted(&self, _muted: bool) {}
}

/// Find `name` in `dir`, trying common audio extensions if it doesn't exist as-is
pub fn resolve_track(dir: &Path, name: &str) -> Option<PathBuf> {
    let path = dir.join(name);
    if path.is_file() {
        return Some(path);
    }
    AUDIO_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{}.{}", name, ext)))
        .find(|p| p.is_file())
}

/// Display label for a track name (file stem)
pub fn track_label(name: &str) -> String {
    Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(name)
        .to_string()
}

/// Create the sounds directory if it doesn't exist
pub fn ensure_sounds_directory() -> Result<PathBuf> {
    let sounds_dir = crate::config::Config::sounds_dir()
        .map_err(|e| anyhow::anyhow!("Failed to get sounds directory: {}", e))?;

    if !sounds_dir.exists() {
        std::fs::create_dir_all(&sounds_dir)?;
        debug!("Created sounds directory: {:?}", sounds_dir);
    }
    Ok(sounds_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("heartdeck-sound-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_resolve_track_tries_extensions() {
        let dir = scratch_dir("ext");
        std::fs::write(dir.join("song.ogg"), b"x").unwrap();

        assert_eq!(resolve_track(&dir, "song"), Some(dir.join("song.ogg")));
        assert_eq!(resolve_track(&dir, "song.ogg"), Some(dir.join("song.ogg")));
        assert_eq!(resolve_track(&dir, "missing"), None);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_track_label() {
        assert_eq!(track_label("nuestra_cancion.mp3"), "nuestra_cancion");
        assert_eq!(track_label("plain"), "plain");
    }
}
