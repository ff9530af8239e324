use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Deserialize;

/// Video length as display text. Any failure gives an empty string.
pub trait DurationProbe {
    fn duration(&self, path: &Path) -> String;
}

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    format: Option<FfprobeFormat>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

/// Probes with `ffprobe -show_format`.
#[derive(Debug, Clone)]
pub struct Ffprobe {
    program: PathBuf,
}

impl Ffprobe {
    pub fn new(program: PathBuf) -> Self {
        Self { program }
    }

    fn probe_seconds(&self, path: &Path) -> Option<f64> {
        let output = match Command::new(&self.program)
            .args(["-v", "quiet", "-print_format", "json", "-show_format"])
            .arg(path)
            .output()
        {
            Ok(output) => output,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "ffprobe did not run");
                return None;
            }
        };

        if !output.status.success() {
            tracing::debug!(path = %path.display(), status = %output.status, "ffprobe failed");
            return None;
        }

        let parsed: FfprobeOutput = serde_json::from_slice(&output.stdout).ok()?;
        parsed.format?.duration?.trim().parse().ok()
    }
}

impl Default for Ffprobe {
    fn default() -> Self {
        Self::new(crate::tools::ffprobe_path())
    }
}

impl DurationProbe for Ffprobe {
    fn duration(&self, path: &Path) -> String {
        self.probe_seconds(path)
            .map(format_duration)
            .unwrap_or_default()
    }
}

/// "M:SS", or "H:MM:SS" from one hour up. Negative or non-finite input gives "".
pub fn format_duration(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return String::new();
    }
    let total = seconds.round() as u64;
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    if h > 0 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else {
        format!("{}:{:02}", m, s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0.0), "0:00");
        assert_eq!(format_duration(5.4), "0:05");
        assert_eq!(format_duration(83.6), "1:24");
        assert_eq!(format_duration(3600.0), "1:00:00");
        assert_eq!(format_duration(3725.0), "1:02:05");
        assert_eq!(format_duration(-1.0), "");
        assert_eq!(format_duration(f64::NAN), "");
    }

    #[test]
    fn test_parse_ffprobe_json() {
        let json = br#"{"format": {"filename": "a.mp4", "duration": "12.480000"}}"#;
        let parsed: FfprobeOutput = serde_json::from_slice(json).unwrap();
        assert_eq!(parsed.format.unwrap().duration.as_deref(), Some("12.480000"));
    }

    #[test]
    fn test_missing_program_gives_empty() {
        let probe = Ffprobe::new(PathBuf::from("/nonexistent/cadre/ffprobe"));
        assert_eq!(probe.duration(Path::new("/nonexistent/clip.mp4")), "");
    }
}
