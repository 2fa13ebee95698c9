//! Media references used by collage slides.
//!
//! Assets are never decoded here; a reference is only classified as a still
//! image or a playable video so the frontend can label it correctly.

/// Suffixes that mark a playable video
const VIDEO_EXTENSIONS: &[&str] = &[".mp4", ".webm", ".ogg", ".mov"];

/// Explicit markers for videos whose path has no telling suffix
const VIDEO_PREFIX_MARKER: &str = "video:";
const VIDEO_FRAGMENT_MARKER: &str = "#video";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    /// Rendered auto-playing, looped and muted
    Video,
}

/// A single media reference with its classification
#[derive(Debug, Clone, PartialEq)]
pub struct MediaItem {
    pub source: String,
    pub kind: MediaKind,
}

impl MediaItem {
    pub fn from_source(source: &str) -> Self {
        Self {
            source: source.to_string(),
            kind: classify(source),
        }
    }

    pub fn is_video(&self) -> bool {
        self.kind == MediaKind::Video
    }

    /// Path without the marker prefix/fragment (what an asset loader would open)
    pub fn path(&self) -> &str {
        let s = self
            .source
            .strip_prefix(VIDEO_PREFIX_MARKER)
            .unwrap_or(&self.source);
        s.strip_suffix(VIDEO_FRAGMENT_MARKER).unwrap_or(s)
    }

    /// Short display name (last path segment)
    pub fn file_name(&self) -> &str {
        let path = self.path();
        let path = path.split(['?', '#']).next().unwrap_or(path);
        path.rsplit('/').next().unwrap_or(path)
    }

    pub fn autoplay(&self) -> bool {
        self.is_video()
    }

    pub fn looped(&self) -> bool {
        self.is_video()
    }

    pub fn muted(&self) -> bool {
        self.is_video()
    }
}

/// Classify a media reference by suffix or marker
pub fn classify(source: &str) -> MediaKind {
    if source.starts_with(VIDEO_PREFIX_MARKER) || source.ends_with(VIDEO_FRAGMENT_MARKER) {
        return MediaKind::Video;
    }

    // Ignore query strings and fragments when looking at the extension
    let path = source.split(['?', '#']).next().unwrap_or(source);
    let lower = path.to_ascii_lowercase();
    if VIDEO_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
        MediaKind::Video
    } else {
        MediaKind::Image
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_by_suffix() {
        assert_eq!(classify("/media/us.jpg"), MediaKind::Image);
        assert_eq!(classify("/media/dance.mp4"), MediaKind::Video);
        assert_eq!(classify("/media/DANCE.MOV"), MediaKind::Video);
        assert_eq!(classify("clip.webm?v=2"), MediaKind::Video);
        assert_eq!(classify("song.ogg"), MediaKind::Video);
    }

    #[test]
    fn test_classify_by_marker() {
        assert_eq!(classify("video:/media/stream"), MediaKind::Video);
        assert_eq!(classify("/media/stream#video"), MediaKind::Video);
        // The marker must be a prefix, not just any occurrence
        assert_eq!(classify("/media/video-cover.png"), MediaKind::Image);
    }

    #[test]
    fn test_path_and_file_name() {
        let item = MediaItem::from_source("video:/media/clips/first.bin");
        assert!(item.is_video());
        assert_eq!(item.path(), "/media/clips/first.bin");
        assert_eq!(item.file_name(), "first.bin");

        let item = MediaItem::from_source("/media/photo.png?w=300");
        assert_eq!(item.file_name(), "photo.png");
        assert!(!item.autoplay());
    }
}
