use arrayvec::ArrayVec;

use crate::error::{ErrorSeverity, GameError};
use crate::grid::{Coordinate, Grid, GridError};

/// Offsets visited by [`Board::neighbors`], orthogonal first.
const ORTHOGONAL: [(i32, i32); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];
const DIAGONAL: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

/// Canonical terrain classes for static board tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TerrainKind {
    Floor,
    Grass,
    Road,
    Forest,
    Rubble,
    LowWall,
    HighWall,
    Water,
    Void,
    Custom(u16),
}

/// Opaque handle to the presentation object a tile is anchored to.
///
/// The core never dereferences it; it only carries it so presentation can map
/// results (highlighted coordinates) back to scene objects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnchorId(pub u32);

/// Immutable descriptor for a tile in the static layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tile {
    terrain: TerrainKind,
    anchor: Option<AnchorId>,
}

impl Tile {
    pub const fn new(terrain: TerrainKind) -> Self {
        Self {
            terrain,
            anchor: None,
        }
    }

    #[must_use]
    pub const fn with_anchor(mut self, anchor: AnchorId) -> Self {
        self.anchor = Some(anchor);
        self
    }

    pub fn terrain(self) -> TerrainKind {
        self.terrain
    }

    pub fn anchor(self) -> Option<AnchorId> {
        self.anchor
    }
}

/// Boundary between two orthogonally adjacent tiles (a wall segment, a fence).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    pub blocks_movement: bool,
}

impl Edge {
    pub const WALL: Self = Self {
        blocks_movement: true,
    };
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BoardError {
    #[error("board has no tiles")]
    NoTiles,

    #[error("board spans {width}x{height} cells, more than a grid may hold")]
    TooLarge { width: u64, height: u64 },

    #[error("edge between {a} and {b} does not join orthogonal neighbors")]
    EdgeNotAdjacent { a: Coordinate, b: Coordinate },
}

impl From<GridError> for BoardError {
    fn from(error: GridError) -> Self {
        match error {
            GridError::EmptyInput => Self::NoTiles,
            GridError::TooLarge { width, height } => Self::TooLarge { width, height },
        }
    }
}

impl GameError for BoardError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NoTiles => "BOARD_NO_TILES",
            Self::TooLarge { .. } => "BOARD_TOO_LARGE",
            Self::EdgeNotAdjacent { .. } => "BOARD_EDGE_NOT_ADJACENT",
        }
    }
}

/// Direction of a boundary away from its origin tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EdgeAxis {
    /// Between `origin` and the tile at `x + 1`.
    East,
    /// Between `origin` and the tile at `y + 1`.
    North,
}

/// Key of the boundary between two orthogonal neighbors: the lower of the two
/// tiles plus the axis the boundary faces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeKey {
    pub origin: Coordinate,
    pub axis: EdgeAxis,
}

/// Edge key for the boundary between `a` and `b`, or `None` if they are not
/// orthogonal neighbors. Symmetric in its arguments.
pub fn edge_key(a: Coordinate, b: Coordinate) -> Option<EdgeKey> {
    if !a.is_orthogonal_neighbor(b) {
        return None;
    }
    let axis = if a.y == b.y {
        EdgeAxis::East
    } else {
        EdgeAxis::North
    };
    Some(EdgeKey {
        origin: a.min(b),
        axis,
    })
}

/// Static tactical board: the tile grid plus one edge grid per axis.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Board {
    tiles: Grid<Tile>,
    east_edges: Grid<Edge>,
    north_edges: Grid<Edge>,
}

impl Board {
    /// Builds the tile and edge grids from level data.
    ///
    /// An empty edge list is normal (open ground) and leaves the edge grids unset.
    ///
    /// # Errors
    ///
    /// - [`BoardError::NoTiles`] if `tiles` is empty
    /// - [`BoardError::TooLarge`] if tiles or edges span too many cells
    /// - [`BoardError::EdgeNotAdjacent`] if an edge joins non-neighbors
    pub fn new<T, E>(tiles: T, edges: E) -> Result<Self, BoardError>
    where
        T: IntoIterator<Item = (Coordinate, Tile)>,
        E: IntoIterator<Item = (Coordinate, Coordinate, Edge)>,
    {
        let tiles = Grid::from_entries(tiles)?;

        let mut east = Vec::new();
        let mut north = Vec::new();
        for (a, b, edge) in edges {
            let key = edge_key(a, b).ok_or(BoardError::EdgeNotAdjacent { a, b })?;
            match key.axis {
                EdgeAxis::East => east.push((key.origin, edge)),
                EdgeAxis::North => north.push((key.origin, edge)),
            }
        }

        Ok(Self {
            tiles,
            east_edges: edge_grid(east)?,
            north_edges: edge_grid(north)?,
        })
    }

    pub fn tiles(&self) -> &Grid<Tile> {
        &self.tiles
    }

    pub fn tile(&self, coord: Coordinate) -> Option<Tile> {
        self.tiles.get_at(coord).copied()
    }

    pub fn terrain(&self, coord: Coordinate) -> Option<TerrainKind> {
        self.tile(coord).map(Tile::terrain)
    }

    pub fn contains(&self, coord: Coordinate) -> bool {
        self.tiles.contains(coord)
    }

    pub fn edge_between(&self, a: Coordinate, b: Coordinate) -> Option<Edge> {
        let key = edge_key(a, b)?;
        let grid = match key.axis {
            EdgeAxis::East => &self.east_edges,
            EdgeAxis::North => &self.north_edges,
        };
        grid.get_at(key.origin).copied()
    }

    /// True if an edge stands between orthogonal neighbors and blocks movement.
    pub fn edge_blocks(&self, a: Coordinate, b: Coordinate) -> bool {
        self.edge_between(a, b)
            .is_some_and(|edge| edge.blocks_movement)
    }

    /// Existing neighbor tiles of `coord`: N, E, S, W and then, when
    /// `diagonals` is set, NE, SE, SW, NW.
    pub fn neighbors(&self, coord: Coordinate, diagonals: bool) -> ArrayVec<Coordinate, 8> {
        let mut out = ArrayVec::new();
        let diagonal: &[(i32, i32)] = if diagonals { &DIAGONAL } else { &[] };
        for &(dx, dy) in ORTHOGONAL.iter().chain(diagonal) {
            if let Some(next) = coord.offset(dx, dy).filter(|next| self.contains(*next)) {
                out.push(next);
            }
        }
        out
    }
}

fn edge_grid(entries: Vec<(Coordinate, Edge)>) -> Result<Grid<Edge>, GridError> {
    let mut grid = Grid::new();
    if !entries.is_empty() {
        grid.build(entries)?;
    }
    Ok(grid)
}
