//! Curated entry points for the two reference experiments.
//!
//! - `pairs_experiment`: one annulus set and its all-pairs distance matrix.
//! - `nearest_experiment`: circle vs. grid, nearest circle point to one grid node.
//!
//! Both take their inputs fully specified; the CLI fills them from flags whose
//! defaults are the constants in `cfg`.

use nalgebra::Vector2;

use crate::cfg;
use crate::distance::{cross, pairwise, DistanceMatrix};
use crate::error::PointError;
use crate::field::{DistanceField, Extent};
use crate::nearest::{nearest, Axis, Nearest};
use crate::points::{
    AnnulusParams, GridParams, GridShape, Layout, PointCount, PointSet, ReplayToken,
};

/// Points plus their self-distance matrix.
#[derive(Clone, Debug)]
pub struct PairsOutcome {
    pub points: PointSet,
    pub distances: DistanceMatrix,
}

/// Self-distances of an already generated (or loaded) set.
pub fn pairs_of(points: PointSet) -> PairsOutcome {
    let distances = pairwise(&points);
    PairsOutcome { points, distances }
}

/// Annulus band `[radius_min, radius_max)` sampled from `tok`, then all pairs.
pub fn pairs_experiment(
    params: AnnulusParams,
    tok: ReplayToken,
) -> Result<PairsOutcome, PointError> {
    Ok(pairs_of(Layout::Annulus(params).sample(tok)?))
}

/// Inputs of the circle-versus-grid experiment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NearestSetup {
    pub circle: AnnulusParams,
    pub grid: GridParams,
    /// Grid coordinate `(x, y)` of the query node.
    pub query: (usize, usize),
}

impl Default for NearestSetup {
    fn default() -> Self {
        Self {
            circle: AnnulusParams::circle(
                PointCount(cfg::CIRCLE_COUNT),
                cfg::CIRCLE_RADIUS,
                Vector2::new(cfg::CIRCLE_OFFSET[0], cfg::CIRCLE_OFFSET[1]),
            ),
            grid: GridParams::default(),
            query: (7, 1),
        }
    }
}

/// Everything the nearest experiment reports or plots.
#[derive(Clone, Debug)]
pub struct NearestOutcome {
    pub circle: PointSet,
    pub grid: PointSet,
    /// Rows: circle points, columns: grid nodes.
    pub distances: DistanceMatrix,
    /// Flat index of the query node in `grid`.
    pub query_index: usize,
    pub query_point: Vector2<f64>,
    /// Closest circle point to the query node.
    pub closest: Nearest,
}

impl NearestOutcome {
    /// Base extent `[0, x_max] × [0, y_max]` of the grid, widened to the circle and padded.
    pub fn field_extent(&self, grid: &GridParams, pad: f64) -> Result<Extent, PointError> {
        let base = Extent::new(0.0, grid.x_max, 0.0, grid.y_max)?;
        Extent::covering(base, [&self.circle], pad)
    }

    /// Heatmap of distances to the query node.
    pub fn query_field(
        &self,
        extent: Extent,
        resolution: usize,
    ) -> Result<DistanceField, PointError> {
        DistanceField::to_point(
            extent,
            GridShape::new(resolution, resolution),
            self.query_point,
        )
    }

    /// Heatmap of shortest distances to the circle.
    pub fn circle_field(
        &self,
        extent: Extent,
        resolution: usize,
    ) -> Result<DistanceField, PointError> {
        DistanceField::to_set(extent, GridShape::new(resolution, resolution), &self.circle)
    }
}

/// Circle sampled from `tok`, grid, cross distances, nearest circle point to the query node.
pub fn nearest_experiment(
    setup: &NearestSetup,
    tok: ReplayToken,
) -> Result<NearestOutcome, PointError> {
    let circle = Layout::Annulus(setup.circle).sample(tok)?;
    let grid = Layout::Grid(setup.grid).sample(tok)?;
    let (qx, qy) = setup.query;
    let query_index = setup.grid.shape.flat_index(qx, qy)?;
    let query_point = grid.point(query_index)?;
    let distances = cross(&circle, &grid);
    let closest = nearest(&distances, query_index, Axis::Column)?;
    Ok(NearestOutcome {
        circle,
        grid,
        distances,
        query_index,
        query_point,
        closest,
    })
}
