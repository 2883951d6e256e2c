// Storage path utilities.
// Resolves where the persisted key-value file lives on this platform.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

/// File name of the persisted key-value store.
pub const STORE_FILE: &str = "store.json";

/// Get the base data directory (~/.local/share/mealbook on Linux).
pub fn data_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "mealbook").map(|dirs| dirs.data_dir().to_path_buf())
}

/// Path to the key-value file inside `dir`.
pub fn store_path_in(dir: &Path) -> PathBuf {
    dir.join(STORE_FILE)
}
