//! A* path planner over the static board.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use crate::env::Board;
use crate::grid::Coordinate;

use super::{MovementRules, Path, PathPlanner};

/// Open-set entry. Ordered by estimated total cost, then by remaining
/// estimate (prefer cells nearer the goal), then by coordinate, so equal-cost
/// candidates always pop in the same order.
type OpenEntry = Reverse<(u32, u32, Coordinate)>;

/// A* with uniform step cost: every step, orthogonal or diagonal, costs one
/// action point.
#[derive(Clone, Copy, Debug, Default)]
pub struct AStarPlanner;

impl AStarPlanner {
    pub const fn new() -> Self {
        Self
    }
}

impl PathPlanner for AStarPlanner {
    fn plan(
        &self,
        board: &Board,
        start: Coordinate,
        goal: Coordinate,
        rules: &MovementRules,
    ) -> Option<Path> {
        if !board.contains(start) {
            return None;
        }
        if start == goal {
            return Some(Path::single(start));
        }
        if !rules.can_enter(board, goal, goal) {
            tracing::debug!(%start, %goal, "goal tile not enterable");
            return None;
        }

        let metric = rules.metric();
        let mut open: BinaryHeap<OpenEntry> = BinaryHeap::new();
        let mut came_from: HashMap<Coordinate, Coordinate> = HashMap::new();
        let mut g_scores: HashMap<Coordinate, u32> = HashMap::new();
        let mut closed: HashSet<Coordinate> = HashSet::new();

        let h = metric.distance(start, goal);
        g_scores.insert(start, 0);
        open.push(Reverse((h, h, start)));

        while let Some(Reverse((_, _, current))) = open.pop() {
            if current == goal {
                return Some(reconstruct_path(&came_from, current));
            }
            if !closed.insert(current) {
                continue;
            }

            let current_g = g_scores.get(&current).copied().unwrap_or(u32::MAX);
            for neighbor in board.neighbors(current, rules.use_diagonals()) {
                if closed.contains(&neighbor) || !rules.can_step(board, current, neighbor, goal) {
                    continue;
                }

                let tentative_g = current_g.saturating_add(1);
                let neighbor_g = g_scores.get(&neighbor).copied().unwrap_or(u32::MAX);
                if tentative_g < neighbor_g {
                    came_from.insert(neighbor, current);
                    g_scores.insert(neighbor, tentative_g);

                    let h = metric.distance(neighbor, goal);
                    open.push(Reverse((tentative_g.saturating_add(h), h, neighbor)));
                }
            }
        }

        tracing::debug!(%start, %goal, "no path found");
        None
    }
}

fn reconstruct_path(came_from: &HashMap<Coordinate, Coordinate>, mut current: Coordinate) -> Path {
    let mut tiles = vec![current];
    while let Some(&previous) = came_from.get(&current) {
        tiles.push(previous);
        current = previous;
    }
    tiles.reverse();
    Path::new(tiles).unwrap_or_else(|| Path::single(current))
}
