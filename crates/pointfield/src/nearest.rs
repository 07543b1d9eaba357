//! Nearest-point queries over a distance matrix.
//!
//! - A query picks one column (a point of B, scanning the points of A) or one row.
//! - Ties go to the lowest index.
//! - `minima` reduces every column (or row) at once; it feeds distance fields.

use crate::distance::DistanceMatrix;
use crate::error::PointError;

/// Which side of the matrix a query index addresses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Axis {
    /// Query point is column `j` (set B); candidates are the rows (set A).
    #[default]
    Column,
    /// Query point is row `i` (set A); candidates are the columns (set B).
    Row,
}

/// Closest candidate for one query point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Nearest {
    pub index: usize,
    pub distance: f64,
}

/// Closest candidate to query `query` along `axis`.
pub fn nearest(m: &DistanceMatrix, query: usize, axis: Axis) -> Result<Nearest, PointError> {
    let (queries, candidates) = match axis {
        Axis::Column => (m.ncols(), m.nrows()),
        Axis::Row => (m.nrows(), m.ncols()),
    };
    if query >= queries {
        return Err(PointError::IndexOutOfRange {
            index: query,
            len: queries,
        });
    }
    if candidates == 0 {
        return Err(PointError::EmptySet {
            what: "no candidates to search",
        });
    }
    let dist = |k: usize| match axis {
        Axis::Column => m.as_matrix()[(k, query)],
        Axis::Row => m.as_matrix()[(query, k)],
    };
    let mut best = Nearest {
        index: 0,
        distance: dist(0),
    };
    for k in 1..candidates {
        let d = dist(k);
        // strict: first occurrence wins
        if d < best.distance {
            best = Nearest { index: k, distance: d };
        }
    }
    Ok(best)
}

/// Shortest distance from query point `query` to the other set.
pub fn shortest_distance(m: &DistanceMatrix, query: usize, axis: Axis) -> Result<f64, PointError> {
    nearest(m, query, axis).map(|n| n.distance)
}

/// Index (in the other set) of the point closest to `query`.
pub fn closest_point(m: &DistanceMatrix, query: usize, axis: Axis) -> Result<usize, PointError> {
    nearest(m, query, axis).map(|n| n.index)
}

/// Shortest distance for every query point along `axis`.
///
/// Errors with `EmptySet` when there are query points but no candidates.
pub fn minima(m: &DistanceMatrix, axis: Axis) -> Result<Vec<f64>, PointError> {
    let mat = m.as_matrix();
    let (queries, candidates) = match axis {
        Axis::Column => (m.ncols(), m.nrows()),
        Axis::Row => (m.nrows(), m.ncols()),
    };
    if queries == 0 {
        return Ok(Vec::new());
    }
    if candidates == 0 {
        return Err(PointError::EmptySet {
            what: "no candidates to reduce over",
        });
    }
    let out: Vec<f64> = match axis {
        Axis::Column => mat.column_iter().map(|c| c.min()).collect(),
        Axis::Row => mat.row_iter().map(|r| r.min()).collect(),
    };
    Ok(out)
}
