//! Where multicaret keeps its files on disk
//!
//! ```text
//! <config dir>/multicaret/
//! ├── config.yaml
//! └── logs/multicaret.log.YYYY-MM-DD
//! ```
//!
//! `<config dir>` is `$XDG_CONFIG_HOME` or `~/.config` on Unix and macOS,
//! `%APPDATA%` on Windows.

use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

const APP_DIR: &str = "multicaret";

/// Prefix of the daily-rotated log files
pub const LOG_FILE_NAME: &str = "multicaret.log";

/// `None` when neither the platform variable nor a home directory is known
pub fn config_dir() -> Option<PathBuf> {
    platform_config_root().map(|root| root.join(APP_DIR))
}

#[cfg(target_os = "windows")]
fn platform_config_root() -> Option<PathBuf> {
    env::var_os("APPDATA").map(PathBuf::from)
}

#[cfg(not(target_os = "windows"))]
fn platform_config_root() -> Option<PathBuf> {
    env::var_os("XDG_CONFIG_HOME")
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
}

pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.yaml"))
}

pub fn logs_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("logs"))
}

/// Create `path` and its parents if missing
pub fn ensure_dir(path: &Path) -> io::Result<()> {
    fs::create_dir_all(path)
}

/// Logs directory, created on demand
pub fn ensure_logs_dir() -> io::Result<PathBuf> {
    let logs = logs_dir()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no config directory"))?;
    ensure_dir(&logs)?;
    Ok(logs)
}
