//! Platform-specific directory paths.
//!
//! Uses XDG on Linux, standard locations on macOS/Windows.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;

const QUALIFIER: &str = "dev";
const ORGANIZATION: &str = "gridadmin";
const APPLICATION: &str = "grid-admin";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

/// Data directory: sample database and preferences.
///
/// - Linux: `$XDG_DATA_HOME/grid-admin` or `~/.local/share/grid-admin`
pub fn data_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
}

/// Cache directory: logs.
///
/// - Linux: `$XDG_CACHE_HOME/grid-admin` or `~/.cache/grid-admin`
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Config directory: `config.json`.
///
/// - Linux: `$XDG_CONFIG_HOME/grid-admin` or `~/.config/grid-admin`
pub fn config_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
}

pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.json"))
}

/// Default location of the sample data database.
pub fn store_db() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("store.db"))
}

/// Grid preferences database.
pub fn preferences_db() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("preferences.db"))
}

pub fn log_file() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join("latest.log"))
}

/// Old log files kept after rotation.
const MAX_OLD_LOGS: usize = 10;

/// Archive `latest.log` under a timestamped name and prune old archives.
///
/// Call at startup before creating the new log file.
pub fn rotate_logs() {
    let Some(cache) = cache_dir() else { return };
    let latest = cache.join("latest.log");

    if latest.exists() {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let _ = fs::rename(&latest, cache.join(format!("{}.log", timestamp)));
    }

    prune_logs(&cache, MAX_OLD_LOGS);
}

/// Remove archived logs in `dir` beyond the `keep` most recent.
pub fn prune_logs(dir: &Path, keep: usize) {
    let Ok(entries) = fs::read_dir(dir) else { return };

    let mut logs: Vec<_> = entries
        .filter_map(|e| e.ok())
        .filter(|e| {
            let name = e.file_name();
            let name = name.to_string_lossy();
            name.ends_with(".log") && name != "latest.log"
        })
        .collect();

    logs.sort_by_key(|e| e.metadata().and_then(|m| m.modified()).ok());

    if logs.len() > keep {
        for entry in logs.iter().take(logs.len() - keep) {
            let _ = fs::remove_file(entry.path());
        }
    }
}
