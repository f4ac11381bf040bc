//! Data-driven match content and its loaders.
//!
//! This crate turns RON/TOML data files into core types:
//! - Boards (terrain tiles and blocking edges, RON)
//! - Weapon catalogs (RON)
//! - Cover tables (RON)
//! - Unit behaviors (RON)
//! - Rosters of starting units (RON)
//! - Rule tunables (TOML)
//!
//! Content is read once at match setup and shared read-only afterwards.

pub mod bundle;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use bundle::MatchContent;

#[cfg(feature = "loaders")]
pub use loaders::{
    BehaviorLoader, BoardLoader, ConfigLoader, ContentFactory, CoverLoader, RosterLoader,
    WeaponLoader,
};
