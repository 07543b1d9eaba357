//! Pairwise Euclidean distance matrices.
//!
//! Model
//! - Rows index the first set (A), columns the second set (B): entry `(i, j)` is
//!   `‖a_i − b_j‖₂`.
//! - `pairwise` fills the upper triangle and mirrors it, so the self-distance
//!   matrix is exactly symmetric with an exactly zero diagonal.
//!
//! References
//! - Code cross-refs: `PointSet`, `nearest::{nearest, minima}`

use nalgebra::{DMatrix, DVectorView, Vector2};

use crate::error::PointError;
use crate::points::PointSet;

/// Distance between two points.
#[inline]
pub fn euclidean(p: Vector2<f64>, q: Vector2<f64>) -> f64 {
    (p - q).norm()
}

/// Matrix of distances between the points of A (rows) and B (columns).
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceMatrix {
    m: DMatrix<f64>,
}

impl DistanceMatrix {
    #[inline]
    pub fn nrows(&self) -> usize {
        self.m.nrows()
    }
    #[inline]
    pub fn ncols(&self) -> usize {
        self.m.ncols()
    }
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        self.m.shape()
    }
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.m.get((i, j)).copied()
    }

    /// Distances from point `i` of A to every point of B.
    pub fn row(&self, i: usize) -> Result<Vec<f64>, PointError> {
        if i >= self.nrows() {
            return Err(PointError::IndexOutOfRange {
                index: i,
                len: self.nrows(),
            });
        }
        Ok(self.m.row(i).iter().copied().collect())
    }

    /// Distances from every point of A to point `j` of B.
    pub fn column(&self, j: usize) -> Result<DVectorView<'_, f64>, PointError> {
        if j >= self.ncols() {
            return Err(PointError::IndexOutOfRange {
                index: j,
                len: self.ncols(),
            });
        }
        Ok(self.m.column(j))
    }

    #[inline]
    pub fn as_matrix(&self) -> &DMatrix<f64> {
        &self.m
    }
    #[inline]
    pub fn into_inner(self) -> DMatrix<f64> {
        self.m
    }

    /// Square, zero diagonal, and `|d_ij − d_ji| <= eps`.
    pub fn is_symmetric(&self, eps: f64) -> bool {
        let n = self.nrows();
        if n != self.ncols() {
            return false;
        }
        (0..n).all(|i| {
            self.m[(i, i)] == 0.0
                && (i + 1..n).all(|j| (self.m[(i, j)] - self.m[(j, i)]).abs() <= eps)
        })
    }
}

/// N×N distances within one set.
pub fn pairwise(set: &PointSet) -> DistanceMatrix {
    let pts = set.as_slice();
    let n = pts.len();
    let mut m = DMatrix::zeros(n, n);
    for i in 0..n {
        for j in i + 1..n {
            let d = euclidean(pts[i], pts[j]);
            m[(i, j)] = d;
            m[(j, i)] = d;
        }
    }
    DistanceMatrix { m }
}

/// N×M distances from every point of `a` to every point of `b`.
pub fn cross(a: &PointSet, b: &PointSet) -> DistanceMatrix {
    let (pa, pb) = (a.as_slice(), b.as_slice());
    DistanceMatrix {
        m: DMatrix::from_fn(pa.len(), pb.len(), |i, j| euclidean(pa[i], pb[j])),
    }
}

/// Cross distances between coordinate tables (one point per row, any dimension).
///
/// Fails with `ShapeMismatch` when the tables have different column counts and
/// with `InvalidParams` when a cell is NaN or infinite.
pub fn cross_rows(a: &DMatrix<f64>, b: &DMatrix<f64>) -> Result<DistanceMatrix, PointError> {
    if a.ncols() != b.ncols() {
        return Err(PointError::ShapeMismatch {
            left: a.ncols(),
            right: b.ncols(),
        });
    }
    for (name, t) in [("left", a), ("right", b)] {
        if let Some(k) = t.iter().position(|v| !v.is_finite()) {
            // column-major storage
            let (row, col) = (k % t.nrows(), k / t.nrows());
            return Err(PointError::invalid(format!(
                "{name} table cell ({row}, {col}) is not finite"
            )));
        }
    }
    Ok(DistanceMatrix {
        m: DMatrix::from_fn(a.nrows(), b.nrows(), |i, j| (a.row(i) - b.row(j)).norm()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cfg::DIST_EPS;
    use crate::points::{AnnulusParams, Layout, PointCount, ReplayToken, UniformParams};
    use nalgebra::dmatrix;
    use proptest::prelude::*;

    fn set(pts: &[(f64, f64)]) -> PointSet {
        PointSet::new(pts.iter().map(|&(x, y)| Vector2::new(x, y)).collect()).unwrap()
    }

    #[test]
    fn three_four_five() {
        let d = euclidean(Vector2::new(0.0, 0.0), Vector2::new(3.0, 4.0));
        assert!((d - 5.0).abs() < DIST_EPS);
        let m = cross(&set(&[(0.0, 0.0)]), &set(&[(3.0, 4.0)]));
        assert!((m.get(0, 0).unwrap() - 5.0).abs() < DIST_EPS);
    }

    #[test]
    fn single_point_is_zero_matrix() {
        let m = pairwise(&set(&[(2.5, -1.0)]));
        assert_eq!(m.shape(), (1, 1));
        assert_eq!(m.get(0, 0), Some(0.0));
    }

    #[test]
    fn empty_sets_give_empty_shapes() {
        let empty = PointSet::default();
        assert_eq!(pairwise(&empty).shape(), (0, 0));
        assert_eq!(cross(&empty, &set(&[(1.0, 1.0)])).shape(), (0, 1));
    }

    #[test]
    fn cross_shape_is_rows_by_columns() {
        let a = set(&[(0.0, 0.0), (1.0, 0.0)]);
        let b = set(&[(0.0, 1.0), (0.0, 2.0), (0.0, 3.0)]);
        let m = cross(&a, &b);
        assert_eq!(m.shape(), (2, 3));
        assert!((m.get(1, 0).unwrap() - 2f64.sqrt()).abs() < DIST_EPS);
        assert_eq!(m.row(0).unwrap(), vec![1.0, 2.0, 3.0]);
        assert!(m.row(2).is_err());
        assert_eq!(m.column(2).unwrap().len(), 2);
        assert!(m.column(3).is_err());
    }

    #[test]
    fn cross_rows_matches_cross_for_planar_tables() {
        let a = Layout::Uniform(UniformParams::default())
            .sample(ReplayToken::new(1, 0))
            .unwrap();
        let b = Layout::Annulus(AnnulusParams::band(PointCount(7)))
            .sample(ReplayToken::new(1, 1))
            .unwrap();
        let via_rows = cross_rows(&a.to_matrix(), &b.to_matrix()).unwrap();
        let direct = cross(&a, &b);
        assert!((via_rows.as_matrix() - direct.as_matrix()).amax() < DIST_EPS);
    }

    #[test]
    fn cross_rows_handles_other_dimensions() {
        let a = dmatrix![0.0, 0.0, 0.0];
        let b = dmatrix![1.0, 2.0, 2.0; 0.0, 0.0, 0.0];
        let m = cross_rows(&a, &b).unwrap();
        assert!((m.get(0, 0).unwrap() - 3.0).abs() < DIST_EPS);
        assert_eq!(m.get(0, 1), Some(0.0));
    }

    #[test]
    fn cross_rows_rejects_column_mismatch() {
        let a = dmatrix![0.0, 0.0];
        let b = dmatrix![0.0, 0.0, 0.0];
        assert_eq!(
            cross_rows(&a, &b),
            Err(PointError::ShapeMismatch { left: 2, right: 3 })
        );
    }

    #[test]
    fn cross_rows_rejects_non_finite_cells() {
        let a = dmatrix![0.0, 0.0; 1.0, f64::NAN];
        let b = dmatrix![3.0, 4.0];
        assert_eq!(
            cross_rows(&a, &b),
            Err(PointError::InvalidParams {
                reason: "left table cell (1, 1) is not finite".into()
            })
        );
        let inf = dmatrix![f64::NEG_INFINITY, 0.0];
        assert!(matches!(
            cross_rows(&b, &inf),
            Err(PointError::InvalidParams { .. })
        ));
    }

    fn arb_set(max: usize) -> impl Strategy<Value = PointSet> {
        prop::collection::vec((-100.0f64..100.0, -100.0f64..100.0), 0..max)
            .prop_map(|v| set(&v))
    }

    proptest! {
        #[test]
        fn self_distances_symmetric_zero_diagonal(s in arb_set(24)) {
            let m = pairwise(&s);
            prop_assert_eq!(m.shape(), (s.len(), s.len()));
            prop_assert!(m.is_symmetric(0.0));
        }

        #[test]
        fn distances_non_negative_and_triangle(s in arb_set(12)) {
            let m = pairwise(&s);
            let n = s.len();
            for i in 0..n {
                for j in 0..n {
                    let dij = m.get(i, j).unwrap();
                    prop_assert!(dij >= 0.0);
                    for k in 0..n {
                        let via = m.get(i, k).unwrap() + m.get(k, j).unwrap();
                        prop_assert!(dij <= via + DIST_EPS);
                    }
                }
            }
        }

        #[test]
        fn cross_agrees_with_pairwise_on_same_set(s in arb_set(16)) {
            let c = cross(&s, &s);
            let p = pairwise(&s);
            for i in 0..s.len() {
                for j in 0..s.len() {
                    prop_assert!((c.get(i, j).unwrap() - p.get(i, j).unwrap()).abs() <= DIST_EPS);
                }
            }
        }
    }
}
