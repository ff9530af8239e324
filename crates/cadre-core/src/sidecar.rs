//! Three-line text files next to each output file, read by the slideshow:
//! caption, date, original path. No trailing newline.

use std::fs;
use std::path::Path;

use crate::error::{CadreError, Result};

/// Text shown when a video has no known duration
pub const UNKNOWN_DURATION: &str = "Durée inconnue";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sidecar {
    pub caption: String,
    pub date: String,
    pub source_path: String,
}

impl Sidecar {
    pub fn new(caption: impl Into<String>, date: impl Into<String>, source_path: impl Into<String>) -> Self {
        Self {
            caption: caption.into(),
            date: date.into(),
            source_path: source_path.into(),
        }
    }

    /// File content; line breaks inside a field are flattened to spaces
    pub fn render(&self) -> String {
        [&self.caption, &self.date, &self.source_path]
            .iter()
            .map(|field| single_line(field))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn parse(content: &str) -> Option<Self> {
        let fields: Vec<&str> = content.split('\n').collect();
        match fields.as_slice() {
            [caption, date, source_path] => Some(Self::new(*caption, *date, *source_path)),
            _ => None,
        }
    }
}

fn single_line(s: &str) -> String {
    s.replace("\r\n", " ").replace(['\r', '\n'], " ")
}

pub fn write_sidecar(path: &Path, sidecar: &Sidecar) -> Result<()> {
    fs::write(path, sidecar.render()).map_err(|e| CadreError::io(path, e))
}

pub fn read_sidecar(path: &Path) -> Result<Sidecar> {
    let content = fs::read_to_string(path).map_err(|e| CadreError::io(path, e))?;
    Sidecar::parse(&content).ok_or_else(|| {
        CadreError::io(
            path,
            std::io::Error::new(std::io::ErrorKind::InvalidData, "sidecar must have exactly 3 lines"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("001.txt");
        let sidecar = Sidecar::new("Paris - Juin 2021", "15 Juin 2021 14:30", "/photos/Paris/IMG_1.jpg");
        write_sidecar(&path, &sidecar).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert_eq!(raw.lines().count(), 3);
        assert!(!raw.ends_with('\n'));
        assert_eq!(read_sidecar(&path).unwrap(), sidecar);
    }

    #[test]
    fn test_round_trip_with_empty_fields() {
        let sidecar = Sidecar::new("", "", "/photos/IMG_2.jpg");
        assert_eq!(sidecar.render(), "\n\n/photos/IMG_2.jpg");
        assert_eq!(Sidecar::parse(&sidecar.render()), Some(sidecar));
    }

    #[test]
    fn test_embedded_newlines_are_flattened() {
        let sidecar = Sidecar::new("Plage\nde Nice", "2019\r\n", "/a/b.jpg");
        let parsed = Sidecar::parse(&sidecar.render()).unwrap();
        assert_eq!(parsed.caption, "Plage de Nice");
        assert_eq!(parsed.date, "2019 ");
    }

    #[test]
    fn test_wrong_line_count() {
        assert!(Sidecar::parse("only one").is_none());
        assert!(Sidecar::parse("a\nb\nc\n").is_none());
    }
}
