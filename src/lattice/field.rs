//! Height field storage with periodic wraparound.

use std::ops::{Index, IndexMut};

use super::neighbors::Compass;
use crate::error::ConfigError;

/// Wraps a signed index into `[0, n)`.
///
/// `n` must be non-zero.
#[inline]
pub fn wrap_index(index: isize, n: usize) -> usize {
    debug_assert!(n > 0);
    index.rem_euclid(n as isize) as usize
}

/// A 2D surface height field on a torus.
///
/// Cells are stored in row-major order: cell `(i, j)` lives at `i * nx + j`,
/// with row `i` in `[0, ny)` and column `j` in `[0, nx)`.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightField<T> {
    nx: usize,
    ny: usize,
    cells: Vec<T>,
}

impl<T: Copy + Default> HeightField<T> {
    /// Creates a field of `nx` columns and `ny` rows filled with `T::default()`.
    pub fn new(nx: usize, ny: usize) -> Result<Self, ConfigError> {
        Self::filled(nx, ny, T::default())
    }

    /// Creates a field with every cell set to `value`.
    pub fn filled(nx: usize, ny: usize, value: T) -> Result<Self, ConfigError> {
        if nx == 0 || ny == 0 {
            return Err(ConfigError::InvalidDimensions { nx, ny });
        }
        Ok(Self {
            nx,
            ny,
            cells: vec![value; nx * ny],
        })
    }
}

impl<T: Copy> HeightField<T> {
    /// Builds a field from row-major cell values.
    pub fn from_vec(nx: usize, ny: usize, cells: Vec<T>) -> Result<Self, ConfigError> {
        if nx == 0 || ny == 0 || cells.len() != nx * ny {
            return Err(ConfigError::InvalidDimensions { nx, ny });
        }
        Ok(Self { nx, ny, cells })
    }

    /// Number of columns (wind axis).
    pub fn nx(&self) -> usize {
        self.nx
    }

    /// Number of rows (cross-wind axis).
    pub fn ny(&self) -> usize {
        self.ny
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Flat index of an in-range cell.
    #[inline]
    pub fn index_of(&self, i: usize, j: usize) -> usize {
        debug_assert!(i < self.ny && j < self.nx);
        i * self.nx + j
    }

    /// Normalizes a signed coordinate onto the torus.
    #[inline]
    pub fn wrap(&self, i: isize, j: isize) -> (usize, usize) {
        (wrap_index(i, self.ny), wrap_index(j, self.nx))
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> T {
        self.cells[self.index_of(i, j)]
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: T) {
        let idx = self.index_of(i, j);
        self.cells[idx] = value;
    }

    /// Value at a signed coordinate, wrapping both axes.
    #[inline]
    pub fn get_wrapped(&self, i: isize, j: isize) -> T {
        let (wi, wj) = self.wrap(i, j);
        self.get(wi, wj)
    }

    /// The wrapped coordinate of the neighbor of `(i, j)` in `direction`.
    #[inline]
    pub fn neighbor(&self, i: usize, j: usize, direction: Compass) -> (usize, usize) {
        let (di, dj) = direction.offset();
        self.wrap(i as isize + di, j as isize + dj)
    }

    /// All eight wrapped neighbors in compass order, starting at north (downwind).
    pub fn neighbors(&self, i: usize, j: usize) -> [(Compass, (usize, usize)); 8] {
        Compass::ALL.map(|dir| (dir, self.neighbor(i, j, dir)))
    }

    /// One row of the field (constant `i`, varying along the wind axis).
    pub fn row(&self, i: usize) -> &[T] {
        let start = i * self.nx;
        &self.cells[start..start + self.nx]
    }

    pub fn as_slice(&self) -> &[T] {
        &self.cells
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.cells
    }

    /// Returns an iterator over all `(i, j)` coordinates in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let nx = self.nx;
        (0..self.ny).flat_map(move |i| (0..nx).map(move |j| (i, j)))
    }

    /// Applies `f` to every cell, producing a field of the same shape.
    pub fn map<U: Copy>(&self, f: impl Fn(T) -> U) -> HeightField<U> {
        HeightField {
            nx: self.nx,
            ny: self.ny,
            cells: self.cells.iter().map(|&v| f(v)).collect(),
        }
    }
}

impl HeightField<f32> {
    /// Sum of all heights, accumulated in f64.
    pub fn total(&self) -> f64 {
        self.cells.iter().map(|&h| h as f64).sum()
    }

    /// Returns (min, max) height.
    pub fn height_range(&self) -> (f32, f32) {
        self.cells
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), &h| (lo.min(h), hi.max(h)))
    }
}

impl HeightField<u32> {
    /// Total number of slabs on the lattice.
    pub fn total_slabs(&self) -> u64 {
        self.cells.iter().map(|&h| h as u64).sum()
    }

    /// Copy as real heights, for the frame sinks.
    pub fn to_f32(&self) -> HeightField<f32> {
        self.map(|h| h as f32)
    }
}

impl<T: Copy> Index<(usize, usize)> for HeightField<T> {
    type Output = T;

    fn index(&self, (i, j): (usize, usize)) -> &T {
        &self.cells[self.index_of(i, j)]
    }
}

impl<T: Copy> IndexMut<(usize, usize)> for HeightField<T> {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut T {
        let idx = self.index_of(i, j);
        &mut self.cells[idx]
    }
}
