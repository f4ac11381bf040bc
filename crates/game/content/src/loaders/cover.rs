//! Cover table loader.

use std::path::Path;

use serde::Deserialize;
use tactics_core::combat::MAX_PRECISION;
use tactics_core::{CoverTable, CoverType};

use crate::loaders::{LoadResult, in_file, read_file};

/// Cover catalog structure for RON files. Order is lookup priority.
#[derive(Debug, Clone, Deserialize)]
struct CoverCatalog {
    covers: Vec<CoverType>,
}

/// Loader for cover tables from RON files.
pub struct CoverLoader;

impl CoverLoader {
    pub fn parse(content: &str) -> LoadResult<CoverTable> {
        let catalog: CoverCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse cover catalog RON: {}", e))?;

        for cover in &catalog.covers {
            anyhow::ensure!(
                cover.protection <= MAX_PRECISION,
                "cover '{}' protection {} exceeds {}",
                cover.name,
                cover.protection,
                MAX_PRECISION
            );
        }

        Ok(CoverTable::new(catalog.covers))
    }

    pub fn load(path: &Path) -> LoadResult<CoverTable> {
        let content = read_file(path)?;
        in_file(path, Self::parse(&content))
    }
}
