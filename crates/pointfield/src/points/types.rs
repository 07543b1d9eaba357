//! Point sets and validated counts.
//!
//! - `PointSet`: immutable ordered list of finite 2D points.
//! - `PointCount`: non-negative count converted from signed boundary input.
//!
//! References
//! - Code cross-refs: `rand::Layout`, `distance::{pairwise, cross_rows}`

use nalgebra::{DMatrix, Vector2};

use crate::error::PointError;

/// Ordered sequence of N finite points `(x, y)`; N may be zero.
///
/// Invariants:
/// - Every coordinate is finite.
/// - Never mutated after construction (no `&mut` accessors).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointSet {
    pts: Vec<Vector2<f64>>,
}

impl PointSet {
    /// Validate finiteness and wrap.
    pub fn new(pts: Vec<Vector2<f64>>) -> Result<Self, PointError> {
        if let Some(k) = pts.iter().position(|p| !(p.x.is_finite() && p.y.is_finite())) {
            return Err(PointError::invalid(format!("point {k} is not finite")));
        }
        Ok(Self { pts })
    }

    /// Generators only produce finite values from validated params.
    pub(crate) fn from_trusted(pts: Vec<Vector2<f64>>) -> Self {
        debug_assert!(pts.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
        Self { pts }
    }

    /// Build from an N×2 matrix (one point per row).
    pub fn from_matrix(m: &DMatrix<f64>) -> Result<Self, PointError> {
        if m.ncols() != 2 {
            return Err(PointError::ShapeMismatch {
                left: m.ncols(),
                right: 2,
            });
        }
        Self::new(
            m.row_iter()
                .map(|row| Vector2::new(row[0], row[1]))
                .collect(),
        )
    }

    /// N×2 matrix view used by `distance::cross_rows` and table output.
    pub fn to_matrix(&self) -> DMatrix<f64> {
        DMatrix::from_fn(self.pts.len(), 2, |i, j| self.pts[i][j])
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pts.len()
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pts.is_empty()
    }
    #[inline]
    pub fn get(&self, i: usize) -> Option<Vector2<f64>> {
        self.pts.get(i).copied()
    }
    #[inline]
    pub fn as_slice(&self) -> &[Vector2<f64>] {
        &self.pts
    }
    pub fn iter(&self) -> impl Iterator<Item = &Vector2<f64>> + '_ {
        self.pts.iter()
    }

    /// Point at `i`, or `IndexOutOfRange`.
    pub fn point(&self, i: usize) -> Result<Vector2<f64>, PointError> {
        self.get(i).ok_or(PointError::IndexOutOfRange {
            index: i,
            len: self.pts.len(),
        })
    }

    /// Axis-aligned bounds `(min, max)`; `None` for an empty set.
    pub fn bounds(&self) -> Option<(Vector2<f64>, Vector2<f64>)> {
        let first = *self.pts.first()?;
        Some(self.pts.iter().fold((first, first), |(lo, hi), p| {
            (lo.inf(p), hi.sup(p))
        }))
    }
}

impl<'a> IntoIterator for &'a PointSet {
    type Item = &'a Vector2<f64>;
    type IntoIter = std::slice::Iter<'a, Vector2<f64>>;
    fn into_iter(self) -> Self::IntoIter {
        self.pts.iter()
    }
}

/// Point count that is known to be non-negative.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PointCount(pub usize);

impl PointCount {
    #[inline]
    pub fn get(self) -> usize {
        self.0
    }
}

impl TryFrom<i64> for PointCount {
    type Error = PointError;
    fn try_from(n: i64) -> Result<Self, Self::Error> {
        usize::try_from(n)
            .map(PointCount)
            .map_err(|_| PointError::invalid(format!("point count must be >= 0, got {n}")))
    }
}

impl From<usize> for PointCount {
    fn from(n: usize) -> Self {
        PointCount(n)
    }
}
