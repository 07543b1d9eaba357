//! Point configurations in the plane: generation, distances, nearest points.
//!
//! Pipeline
//! - `points`: generate a `PointSet` from a `Layout` (uniform box, annulus, line, grid).
//! - `distance`: pairwise or cross Euclidean `DistanceMatrix`.
//! - `nearest`: per-query minimum and argmin, or all minima at once.
//! - `field`: distance fields over a rectangle, input for heatmaps.
//!
//! Everything here is pure and synchronous; rendering and file IO live in the CLI.

pub mod api;
pub mod cfg;
pub mod distance;
pub mod error;
pub mod field;
pub mod nearest;
pub mod points;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::PointError;
pub use nalgebra::{DMatrix, Vector2 as Vec2};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::distance::{cross, cross_rows, euclidean, pairwise, DistanceMatrix};
    pub use crate::error::PointError;
    pub use crate::field::{DistanceField, Extent};
    pub use crate::nearest::{closest_point, minima, nearest, shortest_distance, Axis, Nearest};
    pub use crate::points::{
        Angles, AnnulusParams, GridParams, GridShape, Layout, LayoutGenerator, LineParams,
        PointCount, PointSample, PointSet, ReplayToken, UniformParams,
    };
    pub use nalgebra::{DMatrix, Vector2 as Vec2};
}
