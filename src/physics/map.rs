//! Collision Map
//!
//! A fixed-size grid of cell tags. Row 0 is the **top** row of the level.
//! World space has `y` pointing up with its origin at the bottom-left corner
//! of the map, so world row `r` (counted from the bottom) is stored in map
//! row `height - 1 - r`. Every world ↔ cell conversion goes through this
//! module.

use glam::{IVec2, Vec2};

use crate::errors::{HayloftError, Result};
use crate::physics::body::Aabb;

/// Semantic tag of one map cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Cell {
    #[default]
    Empty = 0,
    /// Solid hay bale.
    Hay = 1,
    /// Player start marker; empty for collision purposes.
    PlayerSpawn = 2,
}

impl Cell {
    #[inline]
    #[must_use]
    pub fn is_solid(self) -> bool {
        matches!(self, Cell::Hay)
    }
}

impl TryFrom<u8> for Cell {
    type Error = HayloftError;

    fn try_from(tag: u8) -> Result<Self> {
        match tag {
            0 => Ok(Cell::Empty),
            1 => Ok(Cell::Hay),
            2 => Ok(Cell::PlayerSpawn),
            other => Err(HayloftError::UnknownCell(other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollisionMap {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl CollisionMap {
    /// An all-empty map.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::Empty; width * height],
        }
    }

    /// Builds a map from row-major cells, top row first.
    pub fn from_cells(width: usize, height: usize, cells: Vec<Cell>) -> Result<Self> {
        let expected = width * height;
        if cells.len() != expected {
            return Err(HayloftError::MapSizeMismatch {
                width,
                height,
                expected,
                found: cells.len(),
            });
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Builds a map from raw level tags, top row first.
    pub fn from_tags(width: usize, height: usize, tags: &[u8]) -> Result<Self> {
        let cells = tags
            .iter()
            .map(|&t| Cell::try_from(t))
            .collect::<Result<Vec<_>>>()?;
        Self::from_cells(width, height, cells)
    }

    /// Builds a map from text rows, top row first: `#` hay, `P` spawn,
    /// `.` or space empty. Every row must be as wide as the first.
    pub fn from_rows(rows: &[&str]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.len());
        let mut cells = Vec::with_capacity(width * height);
        for (index, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(HayloftError::RaggedRow {
                    row: index,
                    expected: width,
                    found: row.len(),
                });
            }
            for byte in row.bytes() {
                cells.push(match byte {
                    b'#' => Cell::Hay,
                    b'P' => Cell::PlayerSpawn,
                    b'.' | b' ' => Cell::Empty,
                    other => return Err(HayloftError::UnknownCell(other)),
                });
            }
        }
        Self::from_cells(width, height, cells)
    }

    #[inline]
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    /// Cell at grid coordinates; `Empty` outside the map.
    #[must_use]
    pub fn get(&self, x: i32, y: i32) -> Cell {
        self.index(x, y).map_or(Cell::Empty, |i| self.cells[i])
    }

    /// Overwrites a cell. Does nothing outside the map.
    pub fn set(&mut self, x: i32, y: i32, value: Cell) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = value;
        }
    }

    #[inline]
    #[must_use]
    pub fn is_solid(&self, x: i32, y: i32) -> bool {
        self.get(x, y).is_solid()
    }

    /// Finds the spawn marker, clears it, and returns its grid coordinates.
    pub fn take_spawn(&mut self) -> Option<IVec2> {
        let i = self.cells.iter().position(|&c| c == Cell::PlayerSpawn)?;
        self.cells[i] = Cell::Empty;
        Some(IVec2::new((i % self.width) as i32, (i / self.width) as i32))
    }

    // ------------------------------------------------------------------------
    // World <-> cell conversion
    // ------------------------------------------------------------------------

    /// Map row holding world row `world_row` (counted from the bottom).
    #[inline]
    fn map_row(&self, world_row: i32) -> i32 {
        self.height as i32 - 1 - world_row
    }

    /// Grid cell containing a world point.
    #[must_use]
    pub fn world_to_cell(&self, point: Vec2, cell_size: f32) -> IVec2 {
        let world_row = (point.y / cell_size).floor() as i32;
        IVec2::new((point.x / cell_size).floor() as i32, self.map_row(world_row))
    }

    /// World-space box covered by grid cell `(x, y)`.
    #[must_use]
    pub fn cell_bounds(&self, cell: IVec2, cell_size: f32) -> Aabb {
        let world_row = self.map_row(cell.y);
        let min = Vec2::new(cell.x as f32, world_row as f32) * cell_size;
        Aabb::new(min, min + Vec2::splat(cell_size))
    }

    /// World-space center of grid cell `(x, y)`.
    #[must_use]
    pub fn cell_center(&self, cell: IVec2, cell_size: f32) -> Vec2 {
        self.cell_bounds(cell, cell_size).center()
    }

    /// First solid cell touched by the interior of `bounds`.
    ///
    /// The box's corners pick the cell range; a box edge lying exactly on a
    /// cell boundary does not reach into the next cell, so resting flush
    /// against a wall is not an overlap.
    #[must_use]
    pub fn first_solid_in(&self, bounds: &Aabb, cell_size: f32) -> Option<IVec2> {
        let min = bounds.min / cell_size;
        let max = bounds.max / cell_size;

        let (x0, x1) = (min.x.floor() as i32, max.x.ceil() as i32 - 1);
        let (r0, r1) = (min.y.floor() as i32, max.y.ceil() as i32 - 1);

        for world_row in r0..=r1 {
            let y = self.map_row(world_row);
            for x in x0..=x1 {
                if self.is_solid(x, y) {
                    return Some(IVec2::new(x, y));
                }
            }
        }
        None
    }
}
