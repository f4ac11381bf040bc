use std::fmt;

/// Discrete grid position expressed in tile coordinates.
///
/// Coordinates are plain keys: they carry no ownership and compare by value.
/// The derived ordering (by `x`, then `y`) is used wherever a deterministic
/// tie-break between cells is needed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
}

impl Coordinate {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Coordinate shifted by `(dx, dy)`, or `None` if it leaves the `i32` plane.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Option<Self> {
        match (self.x.checked_add(dx), self.y.checked_add(dy)) {
            (Some(x), Some(y)) => Some(Self::new(x, y)),
            _ => None,
        }
    }

    /// Orthogonal (4-way) step distance. Saturates at `u32::MAX`.
    pub fn manhattan(self, other: Self) -> u32 {
        self.x.abs_diff(other.x).saturating_add(self.y.abs_diff(other.y))
    }

    /// Diagonal-aware (8-way) step distance.
    pub fn chebyshev(self, other: Self) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }

    /// Squared Euclidean distance. Exact, so it orders candidates the same way
    /// the real distance would without any floating point.
    pub fn euclidean_sq(self, other: Self) -> u128 {
        let dx = u128::from(self.x.abs_diff(other.x));
        let dy = u128::from(self.y.abs_diff(other.y));
        dx * dx + dy * dy
    }

    /// Returns true if both coordinates differ by exactly one on a single axis.
    pub fn is_orthogonal_neighbor(self, other: Self) -> bool {
        self.manhattan(other) == 1
    }
}

impl From<(i32, i32)> for Coordinate {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Distance convention used by the board for movement and weapon reach.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DistanceMetric {
    /// 4-way movement: one step per axis unit.
    #[default]
    Manhattan,
    /// 8-way movement: a diagonal step costs the same as an orthogonal one.
    Chebyshev,
}

impl DistanceMetric {
    /// Picks the metric matching a board's diagonal-movement convention.
    pub const fn for_diagonals(use_diagonals: bool) -> Self {
        if use_diagonals {
            Self::Chebyshev
        } else {
            Self::Manhattan
        }
    }

    pub fn distance(self, a: Coordinate, b: Coordinate) -> u32 {
        match self {
            Self::Manhattan => a.manhattan(b),
            Self::Chebyshev => a.chebyshev(b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_agree_on_straight_lines() {
        let a = Coordinate::new(1, 1);
        let b = Coordinate::new(1, 5);
        assert_eq!(a.manhattan(b), 4);
        assert_eq!(a.chebyshev(b), 4);
        assert_eq!(a.euclidean_sq(b), 16);
    }

    #[test]
    fn metrics_differ_on_diagonals() {
        let a = Coordinate::new(0, 0);
        let b = Coordinate::new(-3, 2);
        assert_eq!(DistanceMetric::Manhattan.distance(a, b), 5);
        assert_eq!(DistanceMetric::Chebyshev.distance(a, b), 3);
        assert_eq!(a.euclidean_sq(b), 13);
    }

    #[test]
    fn orthogonal_neighbor_excludes_diagonals() {
        let a = Coordinate::new(2, 2);
        assert!(a.is_orthogonal_neighbor(a.offset(0, 1).unwrap()));
        assert!(!a.is_orthogonal_neighbor(a.offset(1, 1).unwrap()));
        assert!(!a.is_orthogonal_neighbor(a));
    }

    #[test]
    fn extreme_coordinates_do_not_overflow() {
        let low = Coordinate::new(i32::MIN, i32::MIN);
        let high = Coordinate::new(i32::MAX, i32::MAX);

        assert_eq!(high.offset(1, 0), None);
        assert_eq!(low.offset(0, -1), None);
        assert_eq!(high.offset(-1, 0), Some(Coordinate::new(i32::MAX - 1, i32::MAX)));

        assert_eq!(low.manhattan(high), u32::MAX);
        assert_eq!(low.chebyshev(high), u32::MAX);
        let span = u128::from(u32::MAX);
        assert_eq!(low.euclidean_sq(high), 2 * span * span);
    }
}
