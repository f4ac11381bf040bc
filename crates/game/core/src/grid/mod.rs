//! Coordinate-indexed dense grids.
//!
//! Boards are described sparsely (a list of `(coordinate, value)` pairs) but
//! queried constantly by the planner and resolvers. [`Grid`] scatters the
//! sparse description into a dense row-major array sized to the bounding box
//! of the inserted coordinates, so every lookup is a bounds check and an
//! index.
//!
//! The backing set and the dense array are deliberately separate: `insert`
//! and `remove` edit the backing set only, and [`Grid::rebuild`] is the
//! explicit step that re-scatters it. Gameplay never writes to a grid; edits
//! happen at level-build time.
mod coord;

pub use coord::{Coordinate, DistanceMetric};

use std::collections::BTreeMap;

use crate::error::{ErrorSeverity, GameError};

/// Errors raised while building a grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GridError {
    /// The grid was built from zero entries. The grid stays unset.
    #[error("grid built from an empty entry set")]
    EmptyInput,

    /// The bounding box holds more cells than [`GridBounds::MAX_CELLS`].
    #[error("grid bounding box of {width}x{height} cells is too large")]
    TooLarge { width: u64, height: u64 },
}

impl GameError for GridError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::EmptyInput => ErrorSeverity::Recoverable,
            Self::TooLarge { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyInput => "GRID_EMPTY_INPUT",
            Self::TooLarge { .. } => "GRID_TOO_LARGE",
        }
    }
}

/// Inclusive bounding box of every coordinate a grid was built from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridBounds {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl GridBounds {
    /// Largest number of dense cells a grid may allocate.
    pub const MAX_CELLS: u64 = 1 << 24;

    /// Degenerate box around a single coordinate.
    pub const fn around(coord: Coordinate) -> Self {
        Self {
            min_x: coord.x,
            min_y: coord.y,
            max_x: coord.x,
            max_y: coord.y,
        }
    }

    /// Grows the box to include `coord`.
    pub fn include(&mut self, coord: Coordinate) {
        self.min_x = self.min_x.min(coord.x);
        self.min_y = self.min_y.min(coord.y);
        self.max_x = self.max_x.max(coord.x);
        self.max_y = self.max_y.max(coord.y);
    }

    pub const fn width(&self) -> u64 {
        self.max_x.abs_diff(self.min_x) as u64 + 1
    }

    pub const fn height(&self) -> u64 {
        self.max_y.abs_diff(self.min_y) as u64 + 1
    }

    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Cell count of the box, if it fits under [`Self::MAX_CELLS`].
    ///
    /// # Errors
    ///
    /// Returns [`GridError::TooLarge`] otherwise.
    pub fn area(&self) -> Result<usize, GridError> {
        let too_large = GridError::TooLarge {
            width: self.width(),
            height: self.height(),
        };
        self.width()
            .checked_mul(self.height())
            .filter(|cells| *cells <= Self::MAX_CELLS)
            .and_then(|cells| usize::try_from(cells).ok())
            .ok_or(too_large)
    }

    /// Row-major offset of `(x, y)` inside the box, if it lies within it.
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if !self.contains(x, y) {
            return None;
        }
        let column = u64::from(x.abs_diff(self.min_x));
        let row = u64::from(y.abs_diff(self.min_y));
        let offset = row.checked_mul(self.width())?.checked_add(column)?;
        usize::try_from(offset).ok()
    }

    /// Inverse of [`Self::index`].
    fn coordinate(&self, index: usize) -> Option<Coordinate> {
        let index = u64::try_from(index).ok()?;
        let column = i64::try_from(index % self.width()).ok()?;
        let row = i64::try_from(index / self.width()).ok()?;
        let x = i32::try_from(i64::from(self.min_x) + column).ok()?;
        let y = i32::try_from(i64::from(self.min_y) + row).ok()?;
        Some(Coordinate::new(x, y))
    }
}

/// Dense rectangular grid over a sparse set of coordinates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid<T> {
    entries: BTreeMap<Coordinate, T>,
    cells: Vec<Option<T>>,
    bounds: Option<GridBounds>,
}

impl<T> Default for Grid<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
            cells: Vec::new(),
            bounds: None,
        }
    }
}

impl<T: Clone> Grid<T> {
    /// Creates an unset grid. Every lookup returns `None` until it is built.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a grid in one step.
    ///
    /// # Errors
    ///
    /// - [`GridError::EmptyInput`] if `entries` yields nothing
    /// - [`GridError::TooLarge`] if the bounding box cannot be allocated
    pub fn from_entries<I>(entries: I) -> Result<Self, GridError>
    where
        I: IntoIterator<Item = (Coordinate, T)>,
    {
        let mut grid = Self::new();
        grid.build(entries)?;
        Ok(grid)
    }

    /// Replaces the backing set with `entries` and scatters it into the dense
    /// array. When a coordinate appears more than once the last value wins.
    ///
    /// A failed build is logged and reported, and leaves the grid untouched.
    ///
    /// # Errors
    ///
    /// - [`GridError::EmptyInput`] if `entries` yields nothing
    /// - [`GridError::TooLarge`] if the bounding box cannot be allocated
    pub fn build<I>(&mut self, entries: I) -> Result<(), GridError>
    where
        I: IntoIterator<Item = (Coordinate, T)>,
    {
        let entries: BTreeMap<Coordinate, T> = entries.into_iter().collect();
        let (cells, bounds) = match scatter(&entries) {
            Ok(dense) => dense,
            Err(error) => {
                tracing::warn!(%error, "grid build skipped");
                return Err(error);
            }
        };

        self.entries = entries;
        self.cells = cells;
        self.bounds = Some(bounds);
        Ok(())
    }

    /// Re-scatters the backing set after `insert`/`remove` edits.
    ///
    /// If the rebuild fails (the backing set was emptied, or grew too large)
    /// the grid becomes unset again.
    ///
    /// # Errors
    ///
    /// - [`GridError::EmptyInput`] if the backing set is empty
    /// - [`GridError::TooLarge`] if the bounding box cannot be allocated
    pub fn rebuild(&mut self) -> Result<(), GridError> {
        match scatter(&self.entries) {
            Ok((cells, bounds)) => {
                self.cells = cells;
                self.bounds = Some(bounds);
                Ok(())
            }
            Err(error) => {
                tracing::warn!(%error, "grid rebuild failed; grid is now unset");
                self.cells.clear();
                self.bounds = None;
                Err(error)
            }
        }
    }
}

type Dense<T> = (Vec<Option<T>>, GridBounds);

fn scatter<T: Clone>(entries: &BTreeMap<Coordinate, T>) -> Result<Dense<T>, GridError> {
    let mut coords = entries.keys().copied();
    let first = coords.next().ok_or(GridError::EmptyInput)?;
    let bounds = coords.fold(GridBounds::around(first), |mut bounds, coord| {
        bounds.include(coord);
        bounds
    });

    let mut cells = vec![None; bounds.area()?];
    for (coord, value) in entries {
        if let Some(cell) = bounds
            .index(coord.x, coord.y)
            .and_then(|index| cells.get_mut(index))
        {
            *cell = Some(value.clone());
        }
    }
    Ok((cells, bounds))
}

impl<T> Grid<T> {
    /// Adds or replaces a backing entry. The dense array is not touched until
    /// [`Grid::rebuild`] runs.
    pub fn insert(&mut self, coord: Coordinate, value: T) -> Option<T> {
        self.entries.insert(coord, value)
    }

    /// Removes a backing entry. The dense array is not touched until
    /// [`Grid::rebuild`] runs.
    pub fn remove(&mut self, coord: Coordinate) -> Option<T> {
        self.entries.remove(&coord)
    }

    /// Looks up the cell at `(x, y)`.
    ///
    /// Coordinates outside the current bounding box, holes inside it, and any
    /// lookup on an unset grid all return `None`.
    pub fn get(&self, x: i32, y: i32) -> Option<&T> {
        debug_assert!(
            self.bounds.is_some() || self.entries.is_empty(),
            "grid queried before build while entries are pending"
        );
        let index = self.bounds?.index(x, y)?;
        self.cells.get(index)?.as_ref()
    }

    pub fn get_at(&self, coord: Coordinate) -> Option<&T> {
        self.get(coord.x, coord.y)
    }

    pub fn contains(&self, coord: Coordinate) -> bool {
        self.get_at(coord).is_some()
    }

    pub fn bounds(&self) -> Option<GridBounds> {
        self.bounds
    }

    /// Width of the dense array, or 0 if unset.
    pub fn width(&self) -> u64 {
        self.bounds.map_or(0, |bounds| bounds.width())
    }

    /// Height of the dense array, or 0 if unset.
    pub fn height(&self) -> u64 {
        self.bounds.map_or(0, |bounds| bounds.height())
    }

    pub fn is_built(&self) -> bool {
        self.bounds.is_some()
    }

    /// Backing set as last edited, which may differ from the dense array.
    pub fn entries(&self) -> &BTreeMap<Coordinate, T> {
        &self.entries
    }

    /// Present cells of the dense array in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Coordinate, &T)> + '_ {
        let bounds = self.bounds;
        self.cells
            .iter()
            .enumerate()
            .filter_map(move |(index, cell)| {
                let value = cell.as_ref()?;
                Some((bounds?.coordinate(index)?, value))
            })
    }
}
