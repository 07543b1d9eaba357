//! Point layouts (uniform box, annulus, line, grid) and replayable sampling.
//!
//! Purpose
//! - One parameterized generator instead of per-experiment copies: every layout
//!   is a `Layout` variant, validated once and sampled from a replay token.
//!
//! Model
//! - Random layouts draw from a `StdRng` seeded by a `(seed, index)` token, so a
//!   sample can be regenerated from its token alone.
//! - `LayoutGenerator` hands out consecutive indices under one seed and keeps the
//!   layout snapshot with every sample.
//!
//! References
//! - Code cross-refs: `PointSet`, `grid::{GridShape, grid_over}`

use std::f64::consts::TAU;

use nalgebra::Vector2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::grid::{grid_over, GridShape};
use super::types::{PointCount, PointSet};
use crate::cfg;
use crate::error::PointError;

/// How annulus angles are chosen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Angles {
    /// θ ~ U[0, 2π) independently per point.
    Random,
    /// θ_k = 2πk / count.
    Even,
}

/// Uniform box: `offset + scale ⊙ u`, `u ~ U[0,1)²`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UniformParams {
    pub count: PointCount,
    pub offset: Vector2<f64>,
    pub scale: Vector2<f64>,
}

impl Default for UniformParams {
    fn default() -> Self {
        Self {
            count: PointCount(cfg::PAIRS_COUNT),
            offset: Vector2::zeros(),
            scale: Vector2::new(1.0, 1.0),
        }
    }
}

/// Annulus/circle: radius in `[radius_min, radius_max)`, then shifted by `offset`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnnulusParams {
    pub count: PointCount,
    pub radius_min: f64,
    pub radius_max: f64,
    pub angles: Angles,
    pub offset: Vector2<f64>,
}

impl AnnulusParams {
    /// Thin band around the unit-half circle used by the all-pairs experiment.
    pub fn band(count: PointCount) -> Self {
        Self {
            count,
            radius_min: cfg::PAIRS_RADIUS_MIN,
            radius_max: cfg::PAIRS_RADIUS_MAX,
            angles: Angles::Random,
            offset: Vector2::zeros(),
        }
    }

    /// Fixed-radius circle at `offset`.
    pub fn circle(count: PointCount, radius: f64, offset: Vector2<f64>) -> Self {
        Self {
            count,
            radius_min: radius,
            radius_max: radius,
            angles: Angles::Random,
            offset,
        }
    }
}

impl Default for AnnulusParams {
    fn default() -> Self {
        Self::band(PointCount(cfg::PAIRS_COUNT))
    }
}

/// Points on a horizontal segment: `x = offset.x + U[x_min, x_max)`, `y = offset.y`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineParams {
    pub count: PointCount,
    pub x_min: f64,
    pub x_max: f64,
    pub offset: Vector2<f64>,
}

impl Default for LineParams {
    fn default() -> Self {
        Self {
            count: PointCount(cfg::PAIRS_COUNT),
            x_min: 0.0,
            x_max: 1.0,
            offset: Vector2::zeros(),
        }
    }
}

/// Row-major grid over `[0, x_max] × [0, y_max]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridParams {
    pub shape: GridShape,
    pub x_max: f64,
    pub y_max: f64,
}

impl Default for GridParams {
    fn default() -> Self {
        Self {
            shape: GridShape::new(cfg::GRID_NX, cfg::GRID_NY),
            x_max: cfg::GRID_EXTENT,
            y_max: cfg::GRID_EXTENT,
        }
    }
}

/// A point distribution plus its size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Layout {
    Uniform(UniformParams),
    Annulus(AnnulusParams),
    Line(LineParams),
    Grid(GridParams),
}

impl Layout {
    /// Number of points every sample of this layout has.
    pub fn len(&self) -> usize {
        match self {
            Layout::Uniform(p) => p.count.get(),
            Layout::Annulus(p) => p.count.get(),
            Layout::Line(p) => p.count.get(),
            Layout::Grid(p) => p.shape.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Short name used in logs and provenance.
    pub fn kind(&self) -> &'static str {
        match self {
            Layout::Uniform(_) => "uniform",
            Layout::Annulus(_) => "annulus",
            Layout::Line(_) => "line",
            Layout::Grid(_) => "grid",
        }
    }

    /// Deterministic layouts ignore the replay token.
    pub fn is_random(&self) -> bool {
        !matches!(self, Layout::Grid(_))
    }

    pub fn validate(&self) -> Result<(), PointError> {
        match self {
            Layout::Uniform(p) => {
                finite_vec("offset", p.offset)?;
                finite_vec("scale", p.scale)?;
                finite_vec("offset + scale", p.offset + p.scale)?;
            }
            Layout::Annulus(p) => {
                finite_vec("offset", p.offset)?;
                if !(p.radius_min.is_finite() && p.radius_max.is_finite()) {
                    return Err(PointError::invalid("radius bounds must be finite"));
                }
                if p.radius_min < 0.0 {
                    return Err(PointError::invalid("radius_min must be >= 0"));
                }
                if p.radius_min > p.radius_max {
                    return Err(PointError::invalid("radius_min <= radius_max required"));
                }
                let reach = Vector2::repeat(p.radius_max);
                finite_vec("offset + radius_max", p.offset.abs() + reach)?;
            }
            Layout::Line(p) => {
                finite_vec("offset", p.offset)?;
                if !(p.x_min.is_finite() && p.x_max.is_finite()) {
                    return Err(PointError::invalid("x range must be finite"));
                }
                if p.x_min > p.x_max {
                    return Err(PointError::invalid("x_min <= x_max required"));
                }
                if !(p.x_max - p.x_min).is_finite() {
                    return Err(PointError::invalid("x range overflows"));
                }
                let ends = [p.offset.x + p.x_min, p.offset.x + p.x_max];
                if !ends.iter().all(|x| x.is_finite()) {
                    return Err(PointError::invalid("offset + x range overflows"));
                }
            }
            Layout::Grid(p) => {
                if !(p.x_max.is_finite() && p.y_max.is_finite()) {
                    return Err(PointError::invalid("grid extent must be finite"));
                }
                if p.x_max < 0.0 || p.y_max < 0.0 {
                    return Err(PointError::invalid("grid extent must be >= 0"));
                }
            }
        }
        Ok(())
    }

    /// Draw one point set. The same token always yields the same set.
    pub fn sample(&self, tok: ReplayToken) -> Result<PointSet, PointError> {
        self.validate()?;
        Ok(self.sample_unchecked(&mut tok.to_std_rng()))
    }

    fn sample_unchecked(&self, rng: &mut StdRng) -> PointSet {
        let pts: Vec<Vector2<f64>> = match *self {
            Layout::Uniform(p) => (0..p.count.get())
                .map(|_| {
                    let u = Vector2::new(rng.gen::<f64>(), rng.gen::<f64>());
                    p.offset + p.scale.component_mul(&u)
                })
                .collect(),
            Layout::Annulus(p) => {
                let n = p.count.get();
                (0..n)
                    .map(|k| {
                        let r = uniform_in(rng, p.radius_min, p.radius_max);
                        let th = match p.angles {
                            Angles::Random => rng.gen::<f64>() * TAU,
                            Angles::Even => TAU * k as f64 / n as f64,
                        };
                        Vector2::new(r * th.cos(), r * th.sin()) + p.offset
                    })
                    .collect()
            }
            Layout::Line(p) => (0..p.count.get())
                .map(|_| {
                    let x = uniform_in(rng, p.x_min, p.x_max);
                    Vector2::new(p.offset.x + x, p.offset.y)
                })
                .collect(),
            Layout::Grid(p) => return grid_over(p.shape, (0.0, p.x_max), (0.0, p.y_max)),
        };
        PointSet::from_trusted(pts)
    }
}

fn finite_vec(name: &str, v: Vector2<f64>) -> Result<(), PointError> {
    if v.x.is_finite() && v.y.is_finite() {
        Ok(())
    } else {
        Err(PointError::invalid(format!("{name} must be finite")))
    }
}

/// `U[lo, hi)`; exactly `lo` when the range is empty.
fn uniform_in(rng: &mut StdRng, lo: f64, hi: f64) -> f64 {
    if hi - lo <= 0.0 {
        return lo;
    }
    lo + (hi - lo) * rng.gen::<f64>()
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    #[inline]
    pub fn new(seed: u64, index: u64) -> Self {
        Self { seed, index }
    }

    #[inline]
    fn to_std_rng(self) -> StdRng {
        // SplitMix64 finalizer; distinct indices under one seed get unrelated streams.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// A generated point set plus the metadata needed to regenerate it.
#[derive(Clone, Debug)]
pub struct PointSample {
    pub points: PointSet,
    pub layout: Layout,
    pub replay: ReplayToken,
}

/// Stream of samples from one layout under one seed.
pub struct LayoutGenerator {
    layout: Layout,
    seed: u64,
    next_index: u64,
}

impl LayoutGenerator {
    pub fn new(layout: Layout, seed: u64) -> Result<Self, PointError> {
        layout.validate()?;
        Ok(Self {
            layout,
            seed,
            next_index: 0,
        })
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn generate_next(&mut self) -> PointSample {
        let replay = ReplayToken::new(self.seed, self.next_index);
        self.next_index = self.next_index.wrapping_add(1);
        PointSample {
            points: self.layout.sample_unchecked(&mut replay.to_std_rng()),
            layout: self.layout,
            replay,
        }
    }

    pub fn regenerate(&self, replay: &ReplayToken) -> PointSet {
        self.layout.sample_unchecked(&mut replay.to_std_rng())
    }
}
