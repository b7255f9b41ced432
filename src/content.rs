use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ShowcaseError};
use crate::state::TransitionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

/// One media slot of an entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaRef {
    pub kind: MediaKind,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    /// Lighter variant picked in compact mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile_source: Option<String>,
    /// Image shown until a video has a frame, or when it fails to play
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
}

impl MediaRef {
    pub fn source_for(&self, compact: bool) -> &str {
        match (&self.mobile_source, compact) {
            (Some(mobile), true) => mobile,
            _ => &self.source,
        }
    }

    pub fn is_video(&self) -> bool {
        self.kind == MediaKind::Video
    }

    fn resolve_against(&mut self, base: &Path) {
        resolve_locator(&mut self.source, base);
        if let Some(mobile) = self.mobile_source.as_mut() {
            resolve_locator(mobile, base);
        }
        if let Some(poster) = self.poster.as_mut() {
            resolve_locator(poster, base);
        }
    }
}

// URLs and absolute paths are kept as-is
fn resolve_locator(locator: &mut String, base: &Path) {
    if locator.contains("://") || Path::new(locator.as_str()).is_absolute() {
        return;
    }
    *locator = base.join(locator.as_str()).to_string_lossy().into_owned();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Primary,
    Secondary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentEntry {
    pub primary: MediaRef,
    pub secondary: MediaRef,
}

impl ContentEntry {
    pub fn slot(&self, slot: Slot) -> &MediaRef {
        match slot {
            Slot::Primary => &self.primary,
            Slot::Secondary => &self.secondary,
        }
    }

    pub fn slot_mut(&mut self, slot: Slot) -> &mut MediaRef {
        match slot {
            Slot::Primary => &mut self.primary,
            Slot::Secondary => &mut self.secondary,
        }
    }
}

/// Read side of the content list, as seen by the controller and renderer.
pub trait ContentSource {
    fn get(&self, index: usize) -> Option<&ContentEntry>;
    fn count(&self) -> usize;
}

/// Entry currently selected by `state`.
pub fn active_entry<'a, S: ContentSource + ?Sized>(
    source: &'a S,
    state: &TransitionState,
) -> Result<&'a ContentEntry> {
    if source.count() == 0 {
        return Err(ShowcaseError::EmptyContent);
    }
    // Wrapped in case the source is shorter than the controller's count
    source
        .get(state.active_index % source.count())
        .ok_or(ShowcaseError::EmptyContent)
}

/// The fixed-length, fixed-order list of entries loaded at startup.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<ContentEntry>,
}

impl Catalog {
    pub fn new(entries: Vec<ContentEntry>) -> Result<Self> {
        if entries.is_empty() {
            return Err(ShowcaseError::EmptyContent);
        }
        Ok(Self { entries })
    }

    /// Loads a JSON array of entries. Relative sources are resolved against
    /// the catalog's own directory.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| ShowcaseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut entries: Vec<ContentEntry> =
            serde_json::from_str(&text).map_err(|source| ShowcaseError::Catalog {
                path: path.to_path_buf(),
                source,
            })?;

        let base = path.parent().map(Path::to_path_buf).unwrap_or_else(PathBuf::new);
        for entry in entries.iter_mut() {
            entry.primary.resolve_against(&base);
            entry.secondary.resolve_against(&base);
        }

        info!("Loaded {} entries from {}", entries.len(), path.display());
        Self::new(entries)
    }

    /// Randomizes the order. Only meant to be called before the showcase starts.
    pub fn shuffle(&mut self) {
        self.entries.shuffle(&mut rand::rng());
    }

    pub fn entries(&self) -> &[ContentEntry] {
        &self.entries
    }

    /// Replaces the caption of one slot in place. An empty caption clears it.
    pub fn set_caption(&mut self, index: usize, slot: Slot, caption: String) -> bool {
        match self.entries.get_mut(index) {
            Some(entry) => {
                let media = entry.slot_mut(slot);
                media.caption = if caption.is_empty() { None } else { Some(caption) };
                true
            }
            None => false,
        }
    }
}

impl ContentSource for Catalog {
    fn get(&self, index: usize) -> Option<&ContentEntry> {
        self.entries.get(index)
    }

    fn count(&self) -> usize {
        self.entries.len()
    }
}
