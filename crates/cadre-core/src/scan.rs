use std::path::Path;

use walkdir::WalkDir;

use crate::media::{MediaFile, MediaKind};
use crate::ProgressReporter;

/// Candidate media found under the source tree, sorted by path
#[derive(Debug, Default)]
pub struct ScanResult {
    pub photos: Vec<MediaFile>,
    pub videos: Vec<MediaFile>,
}

/// Walk `source_dir` recursively and collect photos and videos by extension.
/// Unreadable entries are logged and skipped.
pub fn scan_source(source_dir: &Path, progress: &ProgressReporter) -> ScanResult {
    let mut result = ScanResult::default();

    for entry in WalkDir::new(source_dir).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(kind) = MediaKind::from_path(entry.path()) else {
            continue;
        };
        let size = match entry.metadata() {
            Ok(meta) => meta.len(),
            Err(e) => {
                tracing::warn!(path = %entry.path().display(), error = %e, "cannot stat, skipping");
                continue;
            }
        };

        let file = MediaFile::new(entry.into_path(), size, kind);
        match kind {
            MediaKind::Photo => result.photos.push(file),
            MediaKind::Video => result.videos.push(file),
        }
        let found = (result.photos.len() + result.videos.len()) as u64;
        progress.report("scan", found, 0, "Scanning source");
    }

    // walkdir order depends on the filesystem; sort so a seed fully determines the draw
    result.photos.sort_by(|a, b| a.path.cmp(&b.path));
    result.videos.sort_by(|a, b| a.path.cmp(&b.path));
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_scan_classifies_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("2021 Été/Camera Roll")).unwrap();
        fs::create_dir_all(root.join("Noël")).unwrap();
        fs::write(root.join("Noël/b.JPG"), b"xx").unwrap();
        fs::write(root.join("2021 Été/Camera Roll/a.heic"), b"x").unwrap();
        fs::write(root.join("Noël/clip.mov"), vec![0u8; 1000]).unwrap();
        fs::write(root.join("Noël/notes.txt"), b"ignored").unwrap();

        let result = scan_source(root, &ProgressReporter::silent());
        assert_eq!(result.photos.len(), 2);
        assert_eq!(result.videos.len(), 1);
        assert!(result.photos[0].path < result.photos[1].path);
        assert_eq!(result.videos[0].size, 1000);
        assert_eq!(result.videos[0].kind, MediaKind::Video);
    }

    #[test]
    fn test_scan_missing_dir_is_empty() {
        let result = scan_source(Path::new("/nonexistent/cadre/source"), &ProgressReporter::silent());
        assert!(result.photos.is_empty() && result.videos.is_empty());
    }
}
