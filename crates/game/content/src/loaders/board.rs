//! Board loader.
//!
//! A board file describes terrain tiles and the blocking edges between them:
//!
//! ```ron
//! (
//!     dimensions: Some((6, 4)),
//!     fill: Floor,
//!     tiles: [(2, 1, LowWall), (3, 1, Forest)],
//!     walls: [((0, 0), (0, 1))],
//!     anchors: [(2, 1, 17)],
//! )
//! ```
//!
//! With `dimensions` set, every cell of the rectangle starts as `fill` and
//! `tiles` override individual cells. Without it only the listed tiles exist,
//! which allows irregular boards.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tactics_core::{AnchorId, Board, Coordinate, Edge, GridBounds, TerrainKind, Tile};

use crate::loaders::{LoadResult, in_file, read_file};

#[derive(Debug, Clone, Deserialize)]
struct BoardSpec {
    #[serde(default)]
    dimensions: Option<(u32, u32)>,
    #[serde(default = "default_fill")]
    fill: TerrainKind,
    #[serde(default)]
    tiles: Vec<(i32, i32, TerrainKind)>,
    #[serde(default)]
    walls: Vec<((i32, i32), (i32, i32))>,
    #[serde(default)]
    anchors: Vec<(i32, i32, u32)>,
}

fn default_fill() -> TerrainKind {
    TerrainKind::Floor
}

/// Loader for boards from RON files.
pub struct BoardLoader;

impl BoardLoader {
    pub fn parse(content: &str) -> LoadResult<Board> {
        let spec: BoardSpec = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse board RON: {}", e))?;

        let mut tiles = BTreeMap::new();
        if let Some((width, height)) = spec.dimensions {
            let cells = u64::from(width) * u64::from(height);
            anyhow::ensure!(
                cells <= GridBounds::MAX_CELLS,
                "board dimensions {}x{} exceed {} cells",
                width,
                height,
                GridBounds::MAX_CELLS
            );
            let width = i32::try_from(width)
                .map_err(|_| anyhow::anyhow!("board width {} does not fit a coordinate", width))?;
            let height = i32::try_from(height)
                .map_err(|_| anyhow::anyhow!("board height {} does not fit a coordinate", height))?;
            for y in 0..height {
                for x in 0..width {
                    tiles.insert(Coordinate::new(x, y), Tile::new(spec.fill));
                }
            }
        }
        for (x, y, terrain) in spec.tiles {
            tiles.insert(Coordinate::new(x, y), Tile::new(terrain));
        }
        for (x, y, anchor) in spec.anchors {
            let coord = Coordinate::new(x, y);
            let tile = tiles
                .get_mut(&coord)
                .ok_or_else(|| anyhow::anyhow!("anchor {} placed off the board at {}", anchor, coord))?;
            *tile = tile.with_anchor(AnchorId(anchor));
        }

        let walls = spec
            .walls
            .into_iter()
            .map(|(a, b)| (Coordinate::from(a), Coordinate::from(b), Edge::WALL));

        let board = Board::new(tiles, walls)?;
        tracing::debug!(
            width = board.tiles().width(),
            height = board.tiles().height(),
            "board loaded"
        );
        Ok(board)
    }

    pub fn load(path: &Path) -> LoadResult<Board> {
        let content = read_file(path)?;
        in_file(path, Self::parse(&content))
    }
}
