//! Defaults shared by the CLI and tests.
//!
//! Policy
//! - The literals of the two reference experiments live here once, so call sites
//!   (CLI flags, benches, tests) do not drift apart.

/// Annulus band of the all-pairs experiment: `r ∈ [0.45, 0.5)`.
pub const PAIRS_RADIUS_MIN: f64 = 0.45;
pub const PAIRS_RADIUS_MAX: f64 = 0.5;
pub const PAIRS_COUNT: usize = 5;

/// Circle of the nearest-point experiment: radius 3 around (5, 14).
pub const CIRCLE_RADIUS: f64 = 3.0;
pub const CIRCLE_OFFSET: [f64; 2] = [5.0, 14.0];
pub const CIRCLE_COUNT: usize = 10;

/// Grid of the nearest-point experiment: 10 × 3 over [0, 10]².
pub const GRID_NX: usize = 10;
pub const GRID_NY: usize = 3;
pub const GRID_EXTENT: f64 = 10.0;

/// Heatmap sampling: 100 × 100 samples, extent padded by 1 around the data.
pub const FIELD_RESOLUTION: usize = 100;
pub const FIELD_PAD: f64 = 1.0;

/// Tolerance for symmetry checks and float comparisons in tests.
pub const DIST_EPS: f64 = 1e-9;
