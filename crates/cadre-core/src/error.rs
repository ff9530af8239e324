use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CadreError>;

#[derive(Error, Debug)]
pub enum CadreError {
    /// The photo destination must exist before a run starts.
    #[error("photo destination not accessible: {}", path.display())]
    DestinationMissing { path: PathBuf },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("HEIC transcode failed for {}: {reason}", path.display())]
    Transcode { path: PathBuf, reason: String },

    #[error("image error for {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("{0}")]
    Exif(#[from] exif::Error),
}

impl CadreError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
