//! Movement legality, path planning and action-point path splitting.
//!
//! Data flow: [`MovementRules`] + [`Board`](crate::env::Board) feed a
//! [`PathPlanner`], whose [`Path`] is then priced by [`split_path`] against
//! the acting unit's remaining action points.
mod astar;
mod path;
mod rules;
mod split;

pub use astar::AStarPlanner;
pub use path::{EmptyPath, Path, PathPlanner};
pub use rules::MovementRules;
pub use split::{CostLabel, PathSplit, RangeClass, SplitError, split_path};
