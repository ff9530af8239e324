use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::process::Command;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};

use crate::config::Config;
use crate::error::{CadreError, Result};
use crate::media::MediaFile;

/// Produces the screen-sized JPEG for one photo.
pub trait PhotoRenderer {
    fn render(&self, src: &MediaFile, dest: &Path, orientation: Option<u16>) -> Result<()>;
}

/// Decode, orient, scale to fit the screen and re-encode as JPEG.
/// HEIC goes through `heif-convert` first.
#[derive(Debug, Clone)]
pub struct ImageRenderer {
    pub width: u32,
    pub height: u32,
    pub quality: u8,
    pub heif_convert: PathBuf,
}

impl ImageRenderer {
    pub fn from_config(config: &Config) -> Self {
        Self {
            width: config.screen_w,
            height: config.screen_h,
            quality: config.jpeg_quality,
            heif_convert: crate::tools::heif_convert_path(),
        }
    }

    fn transcode_heic(&self, src: &Path, out: &Path) -> Result<()> {
        let output = Command::new(&self.heif_convert)
            .args(["-q", "100"])
            .arg(src)
            .arg(out)
            .output()
            .map_err(|e| CadreError::Transcode {
                path: src.to_path_buf(),
                reason: format!("cannot run {}: {}", self.heif_convert.display(), e),
            })?;

        if !output.status.success() || !out.exists() {
            return Err(CadreError::Transcode {
                path: src.to_path_buf(),
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }

    fn write_jpeg(&self, img: &DynamicImage, dest: &Path) -> Result<()> {
        let file = File::create(dest).map_err(|e| CadreError::io(dest, e))?;
        let mut writer = BufWriter::new(file);
        JpegEncoder::new_with_quality(&mut writer, self.quality)
            .encode_image(&img.to_rgb8())
            .map_err(|source| CadreError::Image {
                path: dest.to_path_buf(),
                source,
            })
    }
}

impl PhotoRenderer for ImageRenderer {
    fn render(&self, src: &MediaFile, dest: &Path, orientation: Option<u16>) -> Result<()> {
        // Keeps the transcoded JPEG alive until decoding is done
        let _tmp_dir;
        let (decode_path, orientation) = if src.is_heic() {
            let dir = tempfile::tempdir().map_err(|e| CadreError::io(&src.path, e))?;
            let jpeg = dir.path().join("transcoded.jpg");
            self.transcode_heic(&src.path, &jpeg)?;
            _tmp_dir = dir;
            // heif-convert already applies the HEIF transforms
            (jpeg, None)
        } else {
            (src.path.clone(), orientation)
        };

        let img = decode(&decode_path)?;
        let img = apply_orientation(img, orientation);
        let img = img.resize(self.width, self.height, FilterType::Lanczos3);

        if let Err(e) = self.write_jpeg(&img, dest) {
            let _ = fs::remove_file(dest);
            return Err(e);
        }
        Ok(())
    }
}

fn decode(path: &Path) -> Result<DynamicImage> {
    ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|e| CadreError::io(path, e))?
        .decode()
        .map_err(|source| CadreError::Image {
            path: path.to_path_buf(),
            source,
        })
}

/// Rotate/flip according to the EXIF orientation tag (1 = as stored).
pub fn apply_orientation(img: DynamicImage, orientation: Option<u16>) -> DynamicImage {
    match orientation {
        Some(2) => img.fliph(),
        Some(3) => img.rotate180(),
        Some(4) => img.flipv(),
        Some(5) => img.rotate90().fliph(),
        Some(6) => img.rotate90(),
        Some(7) => img.rotate270().fliph(),
        Some(8) => img.rotate270(),
        _ => img,
    }
}
