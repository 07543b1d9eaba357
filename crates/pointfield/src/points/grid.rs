//! Rectangular grids and the row-major index mapping.
//!
//! Model
//! - Grid points are stored flat; point `(x, y)` lives at `x + nx·y`.
//! - Coordinates per axis are `linspace(0, extent, n)` with both endpoints.

use nalgebra::Vector2;

use super::types::PointSet;
use crate::error::PointError;

/// Grid dimensions `nx × ny` (columns × rows).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridShape {
    pub nx: usize,
    pub ny: usize,
}

impl GridShape {
    #[inline]
    pub fn new(nx: usize, ny: usize) -> Self {
        Self { nx, ny }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nx * self.ny
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flat index of grid coordinate `(x, y)`; bijective on `[0, nx) × [0, ny)`.
    pub fn flat_index(&self, x: usize, y: usize) -> Result<usize, PointError> {
        if x >= self.nx {
            return Err(PointError::IndexOutOfRange {
                index: x,
                len: self.nx,
            });
        }
        if y >= self.ny {
            return Err(PointError::IndexOutOfRange {
                index: y,
                len: self.ny,
            });
        }
        Ok(x + self.nx * y)
    }

    /// Inverse of `flat_index`.
    pub fn coords(&self, index: usize) -> Result<(usize, usize), PointError> {
        if index >= self.len() {
            return Err(PointError::IndexOutOfRange {
                index,
                len: self.len(),
            });
        }
        Ok((index % self.nx, index / self.nx))
    }
}

/// `n` evenly spaced values over `[lo, hi]`, endpoints included. `n == 1` gives `[lo]`.
pub fn linspace(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![lo],
        _ => {
            let step = (hi - lo) / (n - 1) as f64;
            (0..n)
                .map(|k| if k == n - 1 { hi } else { lo + step * k as f64 })
                .collect()
        }
    }
}

/// Row-major grid over `[x_lo, x_hi] × [y_lo, y_hi]`.
pub(crate) fn grid_over(shape: GridShape, x: (f64, f64), y: (f64, f64)) -> PointSet {
    let xs = linspace(x.0, x.1, shape.nx);
    let ys = linspace(y.0, y.1, shape.ny);
    let mut pts = Vec::with_capacity(shape.len());
    for &py in &ys {
        for &px in &xs {
            pts.push(Vector2::new(px, py));
        }
    }
    PointSet::from_trusted(pts)
}
