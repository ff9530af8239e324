use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

const PHOTO_EXTENSIONS: &[&str] = &["jpg", "jpeg", "heic"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mkv", "avi", "mov"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaKind {
    Photo,
    Video,
}

impl MediaKind {
    /// Kind from the file extension (case-insensitive), None for anything else
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        if PHOTO_EXTENSIONS.contains(&ext.as_str()) {
            Some(MediaKind::Photo)
        } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            Some(MediaKind::Video)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaFile {
    /// Absolute path in the source tree
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    pub kind: MediaKind,
}

impl MediaFile {
    pub fn new(path: impl Into<PathBuf>, size: u64, kind: MediaKind) -> Self {
        Self {
            path: path.into(),
            size,
            kind,
        }
    }

    pub fn is_heic(&self) -> bool {
        self.path
            .extension()
            .and_then(|e| e.to_str())
            .map_or(false, |e| e.eq_ignore_ascii_case("heic"))
    }

    /// Extension with its leading dot, as found on disk (".MOV"), or ""
    pub fn dotted_extension(&self) -> String {
        self.path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default()
    }
}
