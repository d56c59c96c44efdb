use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// Where log files go: `$HOME/.local/state/gymclock`, or the platform data dir
    pub fn state_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(
                PathBuf::from(home)
                    .join(".local")
                    .join("state")
                    .join("gymclock"),
            )
        } else {
            ProjectDirs::from("", "", "gymclock")
                .map(|proj_dirs| proj_dirs.data_local_dir().to_path_buf())
        }
    }
}
