use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use chrono::NaiveDateTime;

use crate::error::{CadreError, Result};
use crate::label::{MediaLabel, VIDEO_FALLBACK_CAPTION};
use crate::metadata::MetadataResolver;
use crate::probe::DurationProbe;
use crate::render::PhotoRenderer;
use crate::select::Selected;
use crate::sidecar::{write_sidecar, Sidecar, UNKNOWN_DURATION};

/// Create the video directory, or empty it (one level deep) if it exists.
pub fn prepare_video_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        return fs::create_dir_all(dir).map_err(|e| CadreError::io(dir, e));
    }

    let entries = fs::read_dir(dir).map_err(|e| CadreError::io(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| CadreError::io(dir, e))?;
        let path = entry.path();
        // file_type() does not follow symlinks, so a linked directory is only unlinked
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        let removed = if is_dir {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        removed.map_err(|e| CadreError::io(&path, e))?;
    }
    Ok(())
}

/// Render one selected photo to `<id>.jpg` and write `<id>.txt`.
/// On failure nothing is left behind for this item.
pub fn write_photo(
    item: &Selected,
    total: usize,
    resolver: &MetadataResolver,
    renderer: &dyn PhotoRenderer,
    dest_dir: &Path,
) -> Result<MediaLabel> {
    let mut meta = resolver.resolve(&item.file.path);
    let label = resolver.label(&mut meta);

    tracing::info!(
        id = %item.sequence_id,
        total,
        source = %item.file.path.display(),
        label = %label.caption,
        status = %meta.status,
        "photo"
    );

    let image_path = dest_dir.join(format!("{}.jpg", item.sequence_id));
    renderer.render(&item.file, &image_path, meta.orientation)?;

    if let Some(taken_at) = &meta.taken_at {
        set_mtime(&image_path, taken_at);
    }

    let sidecar = Sidecar::new(&label.caption, &label.full_date, &label.source_path);
    let sidecar_path = dest_dir.join(format!("{}.txt", item.sequence_id));
    if let Err(e) = write_sidecar(&sidecar_path, &sidecar) {
        let _ = fs::remove_file(&image_path);
        return Err(e);
    }
    Ok(label)
}

/// Copy one selected video to `<id><.ext>` and write `<id>.txt`.
pub fn copy_video(
    item: &Selected,
    resolver: &MetadataResolver,
    probe: &dyn DurationProbe,
    dest_dir: &Path,
) -> Result<Sidecar> {
    let src = &item.file.path;
    let dest = dest_dir.join(format!("{}{}", item.sequence_id, item.file.dotted_extension()));

    tracing::info!(
        id = %item.sequence_id,
        file = %src.file_name().map(|n| n.to_string_lossy()).unwrap_or_default(),
        size_mb = format_args!("{:.1}", item.file.size as f64 / 1024.0 / 1024.0),
        "video"
    );
    if let Err(e) = copy_file(src, &dest) {
        let _ = fs::remove_file(&dest);
        return Err(CadreError::io(src, e));
    }

    let mut caption = resolver.video_label(src);
    if caption.is_empty() {
        caption = VIDEO_FALLBACK_CAPTION.to_string();
    }
    let mut duration = probe.duration(src);
    if duration.is_empty() {
        duration = UNKNOWN_DURATION.to_string();
    }

    let sidecar = Sidecar::new(caption, duration, src.to_string_lossy());
    let sidecar_path = dest_dir.join(format!("{}.txt", item.sequence_id));
    if let Err(e) = write_sidecar(&sidecar_path, &sidecar) {
        let _ = fs::remove_file(&dest);
        return Err(e);
    }
    Ok(sidecar)
}

/// Byte copy into a fresh `dest`. `dest` may be left partial on error.
fn copy_file(src: &Path, dest: &Path) -> io::Result<u64> {
    let mut reader = File::open(src)?;
    let mut writer = BufWriter::new(File::create(dest)?);
    let n = io::copy(&mut reader, &mut writer)?;
    writer.flush()?;
    Ok(n)
}

/// Best effort: stamp the output with the capture time (EXIF time is local).
fn set_mtime(path: &Path, taken_at: &NaiveDateTime) {
    if let Some(local) = taken_at.and_local_timezone(chrono::Local).single() {
        let ft = filetime::FileTime::from_unix_time(local.timestamp(), 0);
        filetime::set_file_mtime(path, ft).ok();
    }
}
