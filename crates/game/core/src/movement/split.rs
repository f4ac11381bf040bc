//! Splits a planned path by the acting unit's remaining action points.
//!
//! Presentation draws the affordable prefix and the overflow suffix in
//! different styles; the overflow begins on the prefix's last tile so the two
//! segments join visually.

use std::fmt;

use crate::grid::Coordinate;

use super::Path;

/// Whether a path's full cost fits in the remaining budget.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RangeClass {
    InRange,
    OutOfRange,
}

/// Total movement cost of a path, tagged with its range class.
///
/// Displays as the bare step count ("4").
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CostLabel {
    pub steps: u32,
    pub range: RangeClass,
}

impl CostLabel {
    pub fn is_in_range(&self) -> bool {
        self.range == RangeClass::InRange
    }
}

impl fmt::Display for CostLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.steps)
    }
}

/// Affordable prefix and optional overflow suffix of a path.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawSplit"))]
pub struct PathSplit {
    affordable: Vec<Coordinate>,
    overflow: Option<Vec<Coordinate>>,
    cost: CostLabel,
}

/// Segments that do not form a split of one path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SplitError {
    #[error("affordable segment is empty")]
    EmptyAffordable,

    #[error("overflow segment does not start on the affordable segment's last tile")]
    DetachedOverflow,

    #[error("cost label does not match the segments")]
    CostMismatch,
}

/// Unchecked wire form of [`PathSplit`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawSplit {
    affordable: Vec<Coordinate>,
    overflow: Option<Vec<Coordinate>>,
    cost: CostLabel,
}

#[cfg(feature = "serde")]
impl TryFrom<RawSplit> for PathSplit {
    type Error = SplitError;

    fn try_from(raw: RawSplit) -> Result<Self, Self::Error> {
        Self::from_parts(raw.affordable, raw.overflow, raw.cost)
    }
}

impl PathSplit {
    /// Reassembles a split, checking that the segments join and that the
    /// cost label agrees with them.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError`] describing the first broken invariant.
    pub fn from_parts(
        affordable: Vec<Coordinate>,
        overflow: Option<Vec<Coordinate>>,
        cost: CostLabel,
    ) -> Result<Self, SplitError> {
        let end = *affordable.last().ok_or(SplitError::EmptyAffordable)?;
        let mut steps = affordable.len() - 1;
        if let Some(overflow) = &overflow {
            if overflow.first() != Some(&end) || overflow.len() < 2 {
                return Err(SplitError::DetachedOverflow);
            }
            steps += overflow.len() - 1;
        }

        let range = if overflow.is_some() {
            RangeClass::OutOfRange
        } else {
            RangeClass::InRange
        };
        if u32::try_from(steps).ok() != Some(cost.steps) || cost.range != range {
            return Err(SplitError::CostMismatch);
        }

        Ok(Self {
            affordable,
            overflow,
            cost,
        })
    }

    /// Tiles `[0, min(A, N-1)]`. Always contains at least the start tile.
    pub fn affordable(&self) -> &[Coordinate] {
        &self.affordable
    }

    /// Tiles `[A, N-1]`, present only when the path costs more than `A`.
    pub fn overflow(&self) -> Option<&[Coordinate]> {
        self.overflow.as_deref()
    }

    pub fn cost(&self) -> CostLabel {
        self.cost
    }

    /// Last tile the unit can actually reach this turn.
    pub fn reachable_end(&self) -> Coordinate {
        self.affordable[self.affordable.len() - 1]
    }

    /// Tile shared by both segments, if the path overflows.
    pub fn joint(&self) -> Option<Coordinate> {
        self.overflow.as_ref().map(|_| self.reachable_end())
    }
}

/// Partitions `path` by `action_points` (one point per step).
pub fn split_path(path: &Path, action_points: u32) -> PathSplit {
    let tiles = path.tiles();
    let steps = path.steps();
    let reach = action_points.min(steps) as usize;

    let affordable = tiles[..=reach].to_vec();
    let (overflow, range) = if steps > action_points {
        (Some(tiles[reach..].to_vec()), RangeClass::OutOfRange)
    } else {
        (None, RangeClass::InRange)
    };

    PathSplit {
        affordable,
        overflow,
        cost: CostLabel { steps, range },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight(n: i32) -> Path {
        Path::new((0..n).map(|x| Coordinate::new(x, 0)).collect()).unwrap()
    }

    #[test]
    fn five_tiles_with_two_points() {
        let path = straight(5);
        let split = split_path(&path, 2);

        assert_eq!(split.affordable(), &path.tiles()[0..=2]);
        assert_eq!(split.overflow(), Some(&path.tiles()[2..=4]));
        assert_eq!(split.cost().to_string(), "4");
        assert_eq!(split.cost().range, RangeClass::OutOfRange);
        assert_eq!(split.joint(), Some(Coordinate::new(2, 0)));
    }

    #[test]
    fn single_tile_path_is_free_and_in_range() {
        let split = split_path(&straight(1), 0);
        assert_eq!(split.affordable(), &[Coordinate::new(0, 0)]);
        assert_eq!(split.overflow(), None);
        assert_eq!(split.cost().to_string(), "0");
        assert!(split.cost().is_in_range());
    }

    #[test]
    fn zero_points_leave_only_the_start_affordable() {
        let path = straight(4);
        let split = split_path(&path, 0);
        assert_eq!(split.affordable(), &[Coordinate::new(0, 0)]);
        assert_eq!(split.overflow(), Some(path.tiles()));
        assert_eq!(split.reachable_end(), path.start());
    }

    #[test]
    fn exact_budget_is_in_range() {
        let path = straight(4);
        let split = split_path(&path, 3);
        assert_eq!(split.affordable(), path.tiles());
        assert_eq!(split.overflow(), None);
        assert!(split.cost().is_in_range());
    }

    #[test]
    fn from_parts_rejects_segments_that_do_not_join() {
        let a = Coordinate::new(0, 0);
        let b = Coordinate::new(1, 0);
        let c = Coordinate::new(2, 0);
        let over = CostLabel {
            steps: 2,
            range: RangeClass::OutOfRange,
        };

        assert_eq!(
            PathSplit::from_parts(Vec::new(), None, over),
            Err(SplitError::EmptyAffordable)
        );
        assert_eq!(
            PathSplit::from_parts(vec![a], Some(vec![b, c]), over),
            Err(SplitError::DetachedOverflow)
        );
        assert_eq!(
            PathSplit::from_parts(vec![a, b], Some(vec![b, c]), CostLabel { steps: 3, ..over }),
            Err(SplitError::CostMismatch)
        );
        assert_eq!(
            PathSplit::from_parts(vec![a, b], Some(vec![b, c]), over),
            Ok(split_path(&straight(3), 1))
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialized_split_is_checked() {
        let empty = "(affordable: [], overflow: None, cost: (steps: 0, range: InRange))";
        assert!(ron::from_str::<PathSplit>(empty).is_err());

        let split = split_path(&straight(4), 1);
        let text = ron::to_string(&split).unwrap();
        assert_eq!(ron::from_str::<PathSplit>(&text).unwrap(), split);
    }

    #[test]
    fn segments_reconstruct_the_path_for_every_budget() {
        for n in 1..=8 {
            let path = straight(n);
            for points in 0..=10u32 {
                let split = split_path(&path, points);
                let steps = (n - 1) as u32;

                assert_eq!(split.affordable().len(), points.min(steps) as usize + 1);
                assert_eq!(split.overflow().is_some(), steps > points);
                assert_eq!(split.cost().steps, steps);

                let mut rebuilt = split.affordable().to_vec();
                if let Some(overflow) = split.overflow() {
                    assert_eq!(overflow.first(), rebuilt.last());
                    rebuilt.extend_from_slice(&overflow[1..]);
                }
                assert_eq!(rebuilt, path.tiles());
            }
        }
    }
}
