//! Content loaders for reading match data from files.
//!
//! Each loader maps a file shape (private `*Spec` structs) onto core types and
//! validates what serde alone cannot check. Every loader offers `parse` for
//! in-memory text and `load` for a path.

pub mod behaviors;
pub mod board;
pub mod config;
pub mod cover;
pub mod factory;
pub mod roster;
pub mod weapons;

pub use behaviors::BehaviorLoader;
pub use board::BoardLoader;
pub use config::ConfigLoader;
pub use cover::CoverLoader;
pub use factory::ContentFactory;
pub use roster::RosterLoader;
pub use weapons::WeaponLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

/// Attaches the offending file to a parse or validation failure.
pub(crate) fn in_file<T>(path: &Path, result: LoadResult<T>) -> LoadResult<T> {
    result.map_err(|e| e.context(format!("in {}", path.display())))
}
