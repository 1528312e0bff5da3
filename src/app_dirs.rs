use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "glimpse";
const CONFIG_FILE: &str = "config.json";
const LOG_FILE: &str = "glimpse.log";

/// Where glimpse keeps its files on this platform
pub struct AppDirs;

impl AppDirs {
    fn project() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", APP_NAME)
    }

    /// Preferences file; falls back to the working directory when the
    /// platform has no home to resolve
    pub fn config_path() -> PathBuf {
        Self::project()
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
            .unwrap_or_else(|| PathBuf::from(format!("{APP_NAME}_{CONFIG_FILE}")))
    }

    /// Log file; the terminal itself is owned by the TUI. Uses the XDG state
    /// dir where there is one (`~/.local/state/glimpse`).
    pub fn log_path() -> Option<PathBuf> {
        let dirs = Self::project()?;
        let dir = dirs
            .state_dir()
            .unwrap_or_else(|| dirs.data_local_dir())
            .to_path_buf();
        Some(dir.join(LOG_FILE))
    }
}
