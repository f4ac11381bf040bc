//! Read-only level data: the static board and the deterministic roll source.
//!
//! Both are loaded or seeded once per match and shared by every query.
mod board;
mod rng;

pub use board::{AnchorId, Board, BoardError, Edge, EdgeAxis, EdgeKey, TerrainKind, Tile, edge_key};
pub use rng::{PcgRng, RngOracle, RollContext, compute_seed};
