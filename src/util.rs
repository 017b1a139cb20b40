use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

static INIT_ONCE: std::sync::Once = std::sync::Once::new();
pub fn init_tracing_once() {
    INIT_ONCE.call_once(|| {
        let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let _ = tracing_subscriber::fmt().with_env_filter(env_filter).with_writer(io::stderr).try_init();
    });
}

/// Read a non-empty environment override, trimmed.
pub fn env_override(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Lowercase, trim, and strip a leading `r/` from a subreddit name.
pub fn normalize_subreddit(s: &str) -> String {
    let s = s.trim().to_lowercase();
    s.strip_prefix("r/").map(str::to_string).unwrap_or(s)
}

/// Temp path living next to `dest` so the final rename stays on one filesystem.
pub fn staging_path(dest: &Path) -> PathBuf {
    let name = dest.file_name().and_then(|n| n.to_str()).unwrap_or("out");
    dest.with_file_name(format!(".{name}.inprogress"))
}

/// Create the staging file for `dest`, creating parent directories as needed.
pub fn create_staging(dest: &Path) -> Result<(PathBuf, File)> {
    if let Some(parent) = dest.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| format!("create dir {}", parent.display()))?;
        }
    }
    let tmp = staging_path(dest);
    let f = File::create(&tmp).with_context(|| format!("create {}", tmp.display()))?;
    Ok((tmp, f))
}

/// Replace `dest` with `tmp`. If rename fails (e.g. across devices), fall back to copy+remove.
pub fn replace_file_atomic(tmp: &Path, dest: &Path) -> Result<()> {
    match fs::rename(tmp, dest) {
        Ok(()) => Ok(()),
        Err(_) => {
            fs::copy(tmp, dest).with_context(|| format!("copy {} -> {}", tmp.display(), dest.display()))?;
            match fs::remove_file(tmp) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e).with_context(|| format!("remove {}", tmp.display())),
            }
        }
    }
}

/// Write a whole string to `dest` via a staging file.
pub fn write_string_atomic(dest: &Path, content: &str) -> Result<()> {
    use std::io::Write;
    let (tmp, f) = create_staging(dest)?;
    let mut w = io::BufWriter::new(f);
    w.write_all(content.as_bytes())?;
    w.flush()?;
    drop(w);
    replace_file_atomic(&tmp, dest)
}

/// Truncate to at most `max` characters (not bytes), appending `...` when cut.
pub fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max).collect();
    out.push_str("...");
    out
}

pub fn percent(part: usize, total: usize) -> f64 {
    if total == 0 { 0.0 } else { part as f64 / total as f64 * 100.0 }
}
