//! 2D point sets and their generators.
//!
//! Purpose
//! - Produce coordinate sets under a chosen distribution (uniform box,
//!   annulus/circle, line segment, rectangular grid) from one parameterized
//!   `Layout`, reproducibly via replay tokens.
//! - Provide the row-major grid index mapping used to address grid points.
//!
//! References
//! - Code cross-refs: `PointSet`, `Layout`, `LayoutGenerator`, `GridShape`

pub mod grid;
pub mod rand;
mod types;

pub use grid::{linspace, GridShape};
pub use self::rand::{
    Angles, AnnulusParams, GridParams, Layout, LayoutGenerator, LineParams, PointSample,
    ReplayToken, UniformParams,
};
pub use types::{PointCount, PointSet};
