//! Slide descriptors and the content manifest.
//!
//! The manifest is an ordered list of slides loaded once from JSON. Field
//! names follow the camelCase manifest format:
//!
//! ```json
//! { "slides": [ { "id": "cover", "type": "cover", "title": "...",
//!                 "requiresInteraction": false } ] }
//! ```

use super::media::MediaItem;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SlideType {
    Cover,
    TextOnly,
    ImageCollage,
    Interaction,
    Final,
    LoveNotes,
}

impl SlideType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cover => "cover",
            Self::TextOnly => "text-only",
            Self::ImageCollage => "image-collage",
            Self::Interaction => "interaction",
            Self::Final => "final",
            Self::LoveNotes => "love-notes",
        }
    }
}

/// Which gate widget an interaction slide mounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionKind {
    HeartRepair,
    HandsSnap,
    BookOpen,
}

impl InteractionKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::HeartRepair => "Heart Repair",
            Self::HandsSnap => "Hands Snap",
            Self::BookOpen => "Book Open",
        }
    }
}

/// One slide of the presentation (immutable after load)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideDescriptor {
    pub id: String,
    #[serde(rename = "type")]
    pub slide_type: SlideType,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interaction_type: Option<InteractionKind>,
    #[serde(default)]
    pub requires_interaction: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book_title: Option<String>,
    #[serde(default, alias = "manuscriptText", skip_serializing_if = "Option::is_none")]
    pub manuscript_content: Option<String>,
}

impl SlideDescriptor {
    /// The gate widget this slide mounts, if any
    pub fn gate(&self) -> Option<InteractionKind> {
        if self.slide_type == SlideType::Interaction && self.requires_interaction {
            self.interaction_type
        } else {
            None
        }
    }

    pub fn is_gated(&self) -> bool {
        self.requires_interaction
    }

    /// Classified media references, in manifest order
    pub fn media(&self) -> Vec<MediaItem> {
        self.images.iter().map(|s| MediaItem::from_source(s)).collect()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ManifestFile {
    Wrapped { slides: Vec<SlideDescriptor> },
    Bare(Vec<SlideDescriptor>),
}

/// Ordered, validated list of slides
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    slides: Vec<SlideDescriptor>,
}

impl Manifest {
    /// Build a manifest from already-parsed slides, validating them
    pub fn new(slides: Vec<SlideDescriptor>) -> Result<Self> {
        let manifest = Self { slides };
        manifest.validate()?;
        Ok(manifest)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let file: ManifestFile =
            serde_json::from_str(json).context("Failed to parse presentation manifest")?;
        let slides = match file {
            ManifestFile::Wrapped { slides } => slides,
            ManifestFile::Bare(slides) => slides,
        };
        Self::new(slides)
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .context(format!("Failed to read manifest file: {:?}", path))?;
        Self::from_json(&contents).context(format!("Invalid manifest: {:?}", path))
    }

    fn validate(&self) -> Result<()> {
        if self.slides.is_empty() {
            bail!("Manifest contains no slides");
        }

        let mut seen = HashSet::new();
        for (i, slide) in self.slides.iter().enumerate() {
            if !seen.insert(slide.id.as_str()) {
                bail!("Duplicate slide id '{}' at index {}", slide.id, i);
            }

            if slide.slide_type == SlideType::Interaction && slide.interaction_type.is_none() {
                bail!("Interaction slide '{}' has no interactionType", slide.id);
            }

            if slide.requires_interaction && slide.slide_type != SlideType::Interaction {
                bail!(
                    "Slide '{}' requires an interaction but is of type '{}'",
                    slide.id,
                    slide.slide_type.as_str()
                );
            }

            if slide.slide_type == SlideType::Interaction && !slide.requires_interaction {
                tracing::warn!(
                    "Interaction slide '{}' does not require interaction; it will not gate",
                    slide.id
                );
            }

            if slide.interaction_type == Some(InteractionKind::BookOpen)
                && (slide.cover_image.is_none() || slide.book_title.is_none())
            {
                bail!(
                    "BookOpen slide '{}' needs both coverImage and bookTitle",
                    slide.id
                );
            }
        }

        Ok(())
    }

    pub fn slides(&self) -> &[SlideDescriptor] {
        &self.slides
    }

    pub fn get(&self, index: usize) -> Option<&SlideDescriptor> {
        self.slides.get(index)
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    /// Number of slides that gate forward progress
    pub fn gated_count(&self) -> usize {
        self.slides.iter().filter(|s| s.is_gated()).count()
    }
}

#[cfg(test)]
pub(crate) fn slide(id: &str, slide_type: SlideType) -> SlideDescriptor {
    SlideDescriptor {
        id: id.to_string(),
        slide_type,
        title: id.to_string(),
        subtitle: None,
        images: Vec::new(),
        interaction_type: None,
        requires_interaction: false,
        background: None,
        cover_image: None,
        book_title: None,
        manuscript_content: None,
    }
}

#[cfg(test)]
pub(crate) fn gated(id: &str, kind: InteractionKind) -> SlideDescriptor {
    let mut s = slide(id, SlideType::Interaction);
    s.interaction_type = Some(kind);
    s.requires_interaction = true;
    if kind == InteractionKind::BookOpen {
        s.cover_image = Some("/covers/us.jpg".to_string());
        s.book_title = Some("Our Story".to_string());
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "slides": [
            { "id": "cover", "type": "cover", "title": "Hola", "requiresInteraction": false },
            { "id": "heart", "type": "interaction", "title": "Repair",
              "interactionType": "HeartRepair", "requiresInteraction": true },
            { "id": "book", "type": "interaction", "title": "Book",
              "interactionType": "BookOpen", "requiresInteraction": true,
              "coverImage": "/cover.jpg", "bookTitle": "Us", "manuscriptText": "Once..." },
            { "id": "photos", "type": "image-collage", "title": "Us",
              "images": ["/a.jpg", "/b.mp4"] },
            { "id": "end", "type": "final", "title": "Te amo" }
        ]
    }"#;

    #[test]
    fn test_parse_manifest() {
        let manifest = Manifest::from_json(SAMPLE).unwrap();
        assert_eq!(manifest.len(), 5);
        assert_eq!(manifest.gated_count(), 2);

        let heart = manifest.get(1).unwrap();
        assert_eq!(heart.gate(), Some(InteractionKind::HeartRepair));

        let book = manifest.get(2).unwrap();
        assert_eq!(book.manuscript_content.as_deref(), Some("Once..."));

        let photos = manifest.get(3).unwrap();
        assert_eq!(photos.gate(), None);
        assert!(photos.media()[1].is_video());
    }

    #[test]
    fn test_bare_array_manifest() {
        let manifest = Manifest::from_json(
            r#"[{ "id": "only", "type": "final", "title": "Fin" }]"#,
        )
        .unwrap();
        assert_eq!(manifest.len(), 1);
        assert!(!manifest.get(0).unwrap().is_gated());
    }

    #[test]
    fn test_rejects_empty_manifest() {
        assert!(Manifest::from_json(r#"{ "slides": [] }"#).is_err());
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let slides = vec![slide("a", SlideType::Cover), slide("a", SlideType::Final)];
        let err = Manifest::new(slides).unwrap_err();
        assert!(err.to_string().contains("Duplicate slide id"));
    }

    #[test]
    fn test_rejects_interaction_without_kind() {
        let mut s = slide("x", SlideType::Interaction);
        s.requires_interaction = true;
        assert!(Manifest::new(vec![s]).is_err());
    }

    #[test]
    fn test_rejects_gate_on_non_interaction_slide() {
        let mut s = slide("x", SlideType::Cover);
        s.requires_interaction = true;
        assert!(Manifest::new(vec![s]).is_err());
    }

    #[test]
    fn test_rejects_book_without_cover() {
        let mut s = gated("book", InteractionKind::BookOpen);
        s.cover_image = None;
        assert!(Manifest::new(vec![s]).is_err());
    }

    #[test]
    fn test_ungated_interaction_slide_has_no_gate() {
        let mut s = gated("hands", InteractionKind::HandsSnap);
        s.requires_interaction = false;
        let manifest = Manifest::new(vec![s]).unwrap();
        assert_eq!(manifest.get(0).unwrap().gate(), None);
    }
}
