//! Distance fields sampled over a rectangle (heatmap input).
//!
//! Model
//! - Samples sit on an `nx × ny` grid spanning the extent with both edges
//!   included; `values[(row, col)]` belongs to `y = y_min + row·dy`,
//!   `x = x_min + col·dx` (row 0 at the bottom).
//! - `to_set` is the grid generator → `cross` → column-minima pipeline.

use nalgebra::{DMatrix, Vector2};

use crate::distance::{cross, euclidean};
use crate::error::PointError;
use crate::nearest::{minima, Axis};
use crate::points::grid::grid_over;
use crate::points::{linspace, GridShape, PointSet};

/// Axis-aligned rectangle `[x_min, x_max] × [y_min, y_max]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Extent {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Extent {
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Result<Self, PointError> {
        let e = Self {
            x_min,
            x_max,
            y_min,
            y_max,
        };
        e.validate()?;
        Ok(e)
    }

    /// Square `[lo, hi]²`.
    pub fn square(lo: f64, hi: f64) -> Result<Self, PointError> {
        Self::new(lo, hi, lo, hi)
    }

    fn validate(&self) -> Result<(), PointError> {
        let all = [self.x_min, self.x_max, self.y_min, self.y_max];
        if !all.iter().all(|v| v.is_finite()) {
            return Err(PointError::invalid("extent must be finite"));
        }
        if self.x_min > self.x_max || self.y_min > self.y_max {
            return Err(PointError::invalid("extent min <= max required"));
        }
        Ok(())
    }

    /// Smallest extent holding `base` and every point, widened by `pad` on each side.
    pub fn covering<'a>(
        base: Extent,
        sets: impl IntoIterator<Item = &'a PointSet>,
        pad: f64,
    ) -> Result<Self, PointError> {
        if !(pad.is_finite() && pad >= 0.0) {
            return Err(PointError::invalid("pad must be finite and >= 0"));
        }
        let mut e = base;
        for (lo, hi) in sets.into_iter().filter_map(PointSet::bounds) {
            e.x_min = e.x_min.min(lo.x);
            e.y_min = e.y_min.min(lo.y);
            e.x_max = e.x_max.max(hi.x);
            e.y_max = e.y_max.max(hi.y);
        }
        Self::new(e.x_min - pad, e.x_max + pad, e.y_min - pad, e.y_max + pad)
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }
    #[inline]
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }
}

/// Scalar samples over an extent; see module docs for the layout.
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceField {
    pub extent: Extent,
    values: DMatrix<f64>,
}

impl DistanceField {
    /// Distance from each sample to `center`.
    pub fn to_point(
        extent: Extent,
        shape: GridShape,
        center: Vector2<f64>,
    ) -> Result<Self, PointError> {
        extent.validate()?;
        if !(center.x.is_finite() && center.y.is_finite()) {
            return Err(PointError::invalid("center must be finite"));
        }
        let xs = linspace(extent.x_min, extent.x_max, shape.nx);
        let ys = linspace(extent.y_min, extent.y_max, shape.ny);
        let values = DMatrix::from_fn(shape.ny, shape.nx, |r, c| {
            euclidean(Vector2::new(xs[c], ys[r]), center)
        });
        Ok(Self { extent, values })
    }

    /// Shortest distance from each sample to `reference`.
    pub fn to_set(
        extent: Extent,
        shape: GridShape,
        reference: &PointSet,
    ) -> Result<Self, PointError> {
        extent.validate()?;
        if reference.is_empty() {
            return Err(PointError::EmptySet {
                what: "distance field reference",
            });
        }
        let samples = grid_over(
            shape,
            (extent.x_min, extent.x_max),
            (extent.y_min, extent.y_max),
        );
        let mins = minima(&cross(reference, &samples), Axis::Column)?;
        // samples are row-major in (x, y), i.e. row-major in (row = y, col = x)
        let values = DMatrix::from_row_slice(shape.ny, shape.nx, &mins);
        Ok(Self { extent, values })
    }

    /// Samples per axis as `(nx, ny)`.
    pub fn resolution(&self) -> (usize, usize) {
        (self.values.ncols(), self.values.nrows())
    }

    pub fn value(&self, col: usize, row: usize) -> Option<f64> {
        self.values.get((row, col)).copied()
    }

    /// Position of sample `(col, row)`.
    pub fn sample_point(&self, col: usize, row: usize) -> Option<Vector2<f64>> {
        let (nx, ny) = self.resolution();
        if col >= nx || row >= ny {
            return None;
        }
        let at = |lo: f64, hi: f64, k: usize, n: usize| {
            if n <= 1 {
                lo
            } else {
                lo + (hi - lo) * k as f64 / (n - 1) as f64
            }
        };
        Some(Vector2::new(
            at(self.extent.x_min, self.extent.x_max, col, nx),
            at(self.extent.y_min, self.extent.y_max, row, ny),
        ))
    }

    /// `(min, max)` over all samples; `None` for an empty field.
    pub fn range(&self) -> Option<(f64, f64)> {
        if self.values.is_empty() {
            return None;
        }
        Some((self.values.min(), self.values.max()))
    }

    #[inline]
    pub fn values(&self) -> &DMatrix<f64> {
        &self.values
    }
}
