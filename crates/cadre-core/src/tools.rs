// External tool resolution for ffprobe and heif-convert.
// Order: environment override, next to the executable, bin/ next to the
// executable, then whatever PATH finds.

use std::env;
use std::path::{Path, PathBuf};

fn exe_dir() -> Option<PathBuf> {
    env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
}

fn resolve_tool(env_key: &str, default_name: &str) -> PathBuf {
    if let Some(v) = env::var_os(env_key) {
        let p = PathBuf::from(v);
        if p.exists() {
            return p;
        }
        tracing::warn!(env = env_key, path = %p.display(), "tool override does not exist, ignoring");
    }

    let mut filename = default_name.to_string();
    if cfg!(windows) {
        filename.push_str(".exe");
    }

    if let Some(dir) = exe_dir() {
        for candidate in [dir.join(&filename), dir.join("bin").join(&filename)] {
            if candidate.exists() {
                return candidate;
            }
        }
    }

    PathBuf::from(default_name)
}

pub fn ffprobe_path() -> PathBuf {
    resolve_tool("CADRE_FFPROBE_PATH", "ffprobe")
}

pub fn heif_convert_path() -> PathBuf {
    resolve_tool("CADRE_HEIF_CONVERT_PATH", "heif-convert")
}
