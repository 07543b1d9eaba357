use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use nalgebra::{DMatrix, Vector2};
use plotters::prelude::{BLUE, GREEN};
use pointfield::api::{self, NearestSetup};
use pointfield::cfg;
use pointfield::prelude::*;
use serde::Serialize;
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

mod provenance;
mod render;
mod table;

use provenance::{write_sidecar, Payload};
use render::{Figure, Links};

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Point configurations: generate, measure distances, plot")]
struct Cmd {
    /// Seed for every random draw; the same seed reproduces the same output
    #[arg(long, default_value_t = 0, global = true)]
    seed: u64,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Annulus points, their pairwise distances, and a plot linking every pair
    Pairs(PairsArgs),
    /// Circle vs. grid: closest circle point to one grid node, with heatmap
    Nearest(NearestArgs),
    /// Write one point layout to a CSV or Parquet table
    Generate(GenerateArgs),
    /// Cross distance matrix between two coordinate tables
    Distances {
        #[arg(long)]
        a: PathBuf,
        #[arg(long)]
        b: PathBuf,
        /// Write the matrix here instead of printing it
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Print a small provenance JSON block
    Report,
}

#[derive(Args)]
struct PairsArgs {
    #[arg(long, default_value_t = cfg::PAIRS_COUNT as i64, allow_negative_numbers = true)]
    count: i64,
    #[arg(long, default_value_t = cfg::PAIRS_RADIUS_MIN)]
    radius_min: f64,
    #[arg(long, default_value_t = cfg::PAIRS_RADIUS_MAX)]
    radius_max: f64,
    /// Evenly spaced angles instead of random ones
    #[arg(long)]
    even: bool,
    /// Load the points from a table (columns x, y) instead of sampling
    #[arg(long)]
    input: Option<PathBuf>,
    /// SVG with every pair linked
    #[arg(long)]
    plot: Option<PathBuf>,
    /// Write the points to a table
    #[arg(long)]
    csv: Option<PathBuf>,
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FieldKind {
    /// Distance to the query node
    Point,
    /// Shortest distance to the circle
    Set,
}

/// Segments drawn on the nearest-node heatmap.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum LinkKind {
    None,
    /// Every grid node to every circle point
    Cross,
}

impl From<LinkKind> for Links {
    fn from(kind: LinkKind) -> Self {
        match kind {
            LinkKind::None => Links::None,
            LinkKind::Cross => Links::Cross,
        }
    }
}

#[derive(Args)]
struct NearestArgs {
    #[arg(long, default_value_t = cfg::CIRCLE_COUNT as i64, allow_negative_numbers = true)]
    count: i64,
    #[arg(long, default_value_t = cfg::CIRCLE_RADIUS)]
    radius: f64,
    #[arg(long, default_value_t = cfg::CIRCLE_OFFSET[0], allow_negative_numbers = true)]
    offset_x: f64,
    #[arg(long, default_value_t = cfg::CIRCLE_OFFSET[1], allow_negative_numbers = true)]
    offset_y: f64,
    #[arg(long, default_value_t = cfg::GRID_NX as i64, allow_negative_numbers = true)]
    nx: i64,
    #[arg(long, default_value_t = cfg::GRID_NY as i64, allow_negative_numbers = true)]
    ny: i64,
    /// Grid spans [0, extent] on both axes
    #[arg(long, default_value_t = cfg::GRID_EXTENT)]
    extent: f64,
    #[arg(long, default_value_t = 7)]
    query_x: usize,
    #[arg(long, default_value_t = 1)]
    query_y: usize,
    /// SVG heatmap with both sets, the query node, and its closest point
    #[arg(long)]
    plot: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = FieldKind::Point)]
    field: FieldKind,
    #[arg(long, value_enum, default_value_t = LinkKind::None)]
    links: LinkKind,
    /// Heatmap samples per axis
    #[arg(long, default_value_t = cfg::FIELD_RESOLUTION)]
    resolution: usize,
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LayoutKind {
    Uniform,
    Annulus,
    Line,
    Grid,
}

#[derive(Args)]
struct GenerateArgs {
    #[arg(long, value_enum)]
    layout: LayoutKind,
    #[arg(long, default_value_t = cfg::PAIRS_COUNT as i64, allow_negative_numbers = true)]
    count: i64,
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    offset_x: f64,
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    offset_y: f64,
    /// Uniform: side length of the box
    #[arg(long, default_value_t = 1.0)]
    scale: f64,
    #[arg(long, default_value_t = cfg::PAIRS_RADIUS_MIN)]
    radius_min: f64,
    #[arg(long, default_value_t = cfg::PAIRS_RADIUS_MAX)]
    radius_max: f64,
    #[arg(long)]
    even: bool,
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    x_min: f64,
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    x_max: f64,
    #[arg(long, default_value_t = cfg::GRID_NX as i64, allow_negative_numbers = true)]
    nx: i64,
    #[arg(long, default_value_t = cfg::GRID_NY as i64, allow_negative_numbers = true)]
    ny: i64,
    #[arg(long, default_value_t = cfg::GRID_EXTENT)]
    extent: f64,
    #[arg(long)]
    out: PathBuf,
    /// Also plot the points
    #[arg(long)]
    plot: Option<PathBuf>,
}

impl GenerateArgs {
    fn to_layout(&self) -> Result<Layout> {
        let count = PointCount::try_from(self.count)?;
        let offset = Vector2::new(self.offset_x, self.offset_y);
        let layout = match self.layout {
            LayoutKind::Uniform => Layout::Uniform(UniformParams {
                count,
                offset,
                scale: Vector2::repeat(self.scale),
            }),
            LayoutKind::Annulus => Layout::Annulus(AnnulusParams {
                count,
                radius_min: self.radius_min,
                radius_max: self.radius_max,
                angles: angles(self.even),
                offset,
            }),
            LayoutKind::Line => Layout::Line(LineParams {
                count,
                x_min: self.x_min,
                x_max: self.x_max,
                offset,
            }),
            LayoutKind::Grid => Layout::Grid(GridParams {
                shape: grid_shape(self.nx, self.ny)?,
                x_max: self.extent,
                y_max: self.extent,
            }),
        };
        layout.validate()?;
        Ok(layout)
    }
}

fn angles(even: bool) -> Angles {
    if even {
        Angles::Even
    } else {
        Angles::Random
    }
}

fn grid_shape(nx: i64, ny: i64) -> Result<GridShape> {
    Ok(GridShape::new(
        PointCount::try_from(nx).context("grid nx")?.get(),
        PointCount::try_from(ny).context("grid ny")?.get(),
    ))
}

fn main() -> Result<()> {
    SubscriberBuilder::default()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Pairs(args) => pairs(&args, cmd.seed),
        Action::Nearest(args) => nearest_cmd(&args, cmd.seed),
        Action::Generate(args) => generate(&args, cmd.seed),
        Action::Distances { a, b, out, json } => distances(&a, &b, out.as_deref(), json),
        Action::Report => report(cmd.seed),
    }
}

#[derive(Serialize)]
struct PairsReport {
    seed: u64,
    points: Vec<[f64; 2]>,
    distances: Vec<Vec<f64>>,
}

fn pairs(args: &PairsArgs, seed: u64) -> Result<()> {
    let params = AnnulusParams {
        count: PointCount::try_from(args.count)?,
        radius_min: args.radius_min,
        radius_max: args.radius_max,
        angles: angles(args.even),
        offset: Vector2::zeros(),
    };
    tracing::info!(
        seed,
        count = args.count,
        radius_min = args.radius_min,
        radius_max = args.radius_max,
        input = ?args.input,
        "pairs"
    );
    let outcome = match &args.input {
        Some(path) => api::pairs_of(table::read_points(path)?),
        None => api::pairs_experiment(params, ReplayToken::new(seed, 0))?,
    };
    let prov = || {
        json!({
            "count": args.count,
            "radius_min": args.radius_min,
            "radius_max": args.radius_max,
            "even": args.even,
            "input": args.input,
        })
    };

    if args.json {
        let report = PairsReport {
            seed,
            points: coords(&outcome.points),
            distances: rows(outcome.distances.as_matrix()),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_points(&outcome.points);
        println!("distances:{:.6}", outcome.distances.as_matrix());
    }

    if let Some(path) = &args.csv {
        table::write_points(path, &outcome.points)?;
        write_sidecar(path, Payload::new("pairs", prov()).with_seed(seed))?;
    }
    if let Some(path) = &args.plot {
        Figure::new("All pairs")
            .layer(&outcome.points, BLUE, "")
            .links(Links::Pairwise)
            .render(path)?;
        write_sidecar(path, Payload::new("pairs", prov()).with_seed(seed))?;
    }
    Ok(())
}

#[derive(Serialize)]
struct NearestReport {
    seed: u64,
    query: [usize; 2],
    query_index: usize,
    query_point: [f64; 2],
    shortest_distance: f64,
    closest_index: usize,
    closest_point: [f64; 2],
}

fn nearest_cmd(args: &NearestArgs, seed: u64) -> Result<()> {
    let setup = NearestSetup {
        circle: AnnulusParams::circle(
            PointCount::try_from(args.count)?,
            args.radius,
            Vector2::new(args.offset_x, args.offset_y),
        ),
        grid: GridParams {
            shape: grid_shape(args.nx, args.ny)?,
            x_max: args.extent,
            y_max: args.extent,
        },
        query: (args.query_x, args.query_y),
    };
    tracing::info!(
        seed,
        count = args.count,
        nx = args.nx,
        ny = args.ny,
        query_x = args.query_x,
        query_y = args.query_y,
        "nearest"
    );
    let out = api::nearest_experiment(&setup, ReplayToken::new(seed, 0))?;
    let closest = out.circle.point(out.closest.index)?;
    tracing::info!(
        query_index = out.query_index,
        closest_index = out.closest.index,
        distance = out.closest.distance,
        "nearest_found"
    );

    if args.json {
        let report = NearestReport {
            seed,
            query: [args.query_x, args.query_y],
            query_index: out.query_index,
            query_point: [out.query_point.x, out.query_point.y],
            shortest_distance: out.closest.distance,
            closest_index: out.closest.index,
            closest_point: [closest.x, closest.y],
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("shortest distance: {}", out.closest.distance);
        println!(
            "closest point: {} ({}, {})",
            out.closest.index, closest.x, closest.y
        );
    }

    if let Some(path) = &args.plot {
        let extent = out.field_extent(&setup.grid, cfg::FIELD_PAD)?;
        let field = match args.field {
            FieldKind::Point => out.query_field(extent, args.resolution)?,
            FieldKind::Set => out.circle_field(extent, args.resolution)?,
        };
        Figure::new("Distance from grid node")
            .field(&field)
            .layer(&out.grid, GREEN, "grid")
            .layer(&out.circle, BLUE, "circle")
            .links(args.links.into())
            .highlight(out.query_point)
            .highlight(closest)
            .render(path)?;
        let params = json!({
            "count": args.count,
            "radius": args.radius,
            "offset": [args.offset_x, args.offset_y],
            "grid": [args.nx, args.ny],
            "extent": args.extent,
            "query": [args.query_x, args.query_y],
            "field": format!("{:?}", args.field),
            "links": format!("{:?}", args.links),
            "resolution": args.resolution,
        });
        write_sidecar(path, Payload::new("nearest", params).with_seed(seed))?;
    }
    Ok(())
}

fn generate(args: &GenerateArgs, seed: u64) -> Result<()> {
    let layout = args.to_layout()?;
    tracing::info!(
        seed,
        layout = layout.kind(),
        points = layout.len(),
        out = %args.out.display(),
        "generate"
    );
    let mut gen = LayoutGenerator::new(layout, seed)?;
    let sample = gen.generate_next();
    table::write_points(&args.out, &sample.points)?;
    let params = json!({
        "layout": layout.kind(),
        "points": layout.len(),
        "detail": format!("{:?}", sample.layout),
        "replay_index": sample.replay.index,
    });
    write_sidecar(&args.out, Payload::new("generate", params.clone()).with_seed(seed))?;
    if let Some(path) = &args.plot {
        Figure::new(format!("{} layout", layout.kind()))
            .layer(&sample.points, BLUE, "")
            .render(path)?;
        write_sidecar(path, Payload::new("generate", params).with_seed(seed))?;
    }
    Ok(())
}

fn distances(a: &Path, b: &Path, out: Option<&Path>, as_json: bool) -> Result<()> {
    tracing::info!(a = %a.display(), b = %b.display(), "distances");
    let left = table::read_rows(a)?;
    let right = table::read_rows(b)?;
    let m = cross_rows(&left, &right)
        .with_context(|| format!("comparing {} with {}", a.display(), b.display()))?;
    match out {
        Some(path) => {
            table::write_matrix(path, m.as_matrix())?;
            let params = json!({
                "a": a.to_string_lossy(),
                "b": b.to_string_lossy(),
                "shape": [m.nrows(), m.ncols()],
            });
            write_sidecar(path, Payload::new("distances", params))?;
        }
        None if as_json => println!("{}", serde_json::to_string_pretty(&rows(m.as_matrix()))?),
        None => println!("{:.6}", m.as_matrix()),
    }
    Ok(())
}

fn report(seed: u64) -> Result<()> {
    let obj = json!({
        "code_rev": provenance::current_git_rev(),
        "version": pointfield::VERSION,
        "seed": seed,
        "params": {},
        "outputs": []
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

fn print_points(set: &PointSet) {
    println!("points:");
    for (i, p) in set.iter().enumerate() {
        println!("  {i}: ({:.6}, {:.6})", p.x, p.y);
    }
}

fn coords(set: &PointSet) -> Vec<[f64; 2]> {
    set.iter().map(|p| [p.x, p.y]).collect()
}

fn rows(m: &DMatrix<f64>) -> Vec<Vec<f64>> {
    m.row_iter().map(|r| r.iter().copied().collect()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cmd::command().debug_assert();
    }

    #[test]
    fn defaults_reproduce_reference_experiments() {
        let cmd = Cmd::try_parse_from(["cli", "nearest"]).unwrap();
        let Action::Nearest(args) = cmd.action else {
            panic!("expected nearest");
        };
        assert_eq!((args.count, args.nx, args.ny), (10, 10, 3));
        assert_eq!((args.query_x, args.query_y), (7, 1));
        assert_eq!((args.offset_x, args.offset_y), (5.0, 14.0));
        assert_eq!(cmd.seed, 0);
    }

    #[test]
    fn negative_count_is_rejected_at_conversion() {
        let cmd = Cmd::try_parse_from(["cli", "pairs", "--count", "-3"]).unwrap();
        let Action::Pairs(args) = cmd.action else {
            panic!("expected pairs");
        };
        assert_eq!(args.count, -3);
        let err = pairs(&args, 0).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PointError>(),
            Some(PointError::InvalidParams { .. })
        ));
    }

    #[test]
    fn generate_grid_layout_from_flags() {
        let cmd = Cmd::try_parse_from([
            "cli", "--seed", "3", "generate", "--layout", "grid", "--nx", "4", "--ny", "2",
            "--out", "g.csv",
        ])
        .unwrap();
        assert_eq!(cmd.seed, 3);
        let Action::Generate(args) = cmd.action else {
            panic!("expected generate");
        };
        let layout = args.to_layout().unwrap();
        assert_eq!(layout.len(), 8);
        assert_eq!(layout.kind(), "grid");
    }

    #[test]
    fn generate_rejects_inverted_line() {
        let cmd = Cmd::try_parse_from([
            "cli", "generate", "--layout", "line", "--x-min", "2", "--x-max", "1", "--out",
            "l.csv",
        ])
        .unwrap();
        let Action::Generate(args) = cmd.action else {
            panic!("expected generate");
        };
        assert!(args.to_layout().is_err());
    }

    #[test]
    fn distances_reports_shape_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.csv");
        let b = dir.path().join("b.csv");
        std::fs::write(&a, "x,y\n0,0\n").unwrap();
        std::fs::write(&b, "x,y,z\n1,2,3\n").unwrap();
        let err = distances(&a, &b, None, false).unwrap_err();
        assert_eq!(
            err.downcast_ref::<PointError>(),
            Some(&PointError::ShapeMismatch { left: 2, right: 3 })
        );
    }

    #[test]
    fn nearest_writes_heatmap_and_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        let plot = dir.path().join("heat.svg");
        let plot_arg = plot.to_string_lossy().to_string();
        let cmd = Cmd::try_parse_from([
            "cli", "nearest", "--resolution", "12", "--field", "set", "--plot", &plot_arg,
        ])
        .unwrap();
        let Action::Nearest(args) = cmd.action else {
            panic!("expected nearest");
        };
        nearest_cmd(&args, 1).unwrap();
        assert!(plot.exists());
        assert!(dir.path().join("heat.provenance.json").exists());
    }

    #[test]
    fn nearest_cross_links_reach_the_figure() {
        let dir = tempfile::tempdir().unwrap();
        let plot = dir.path().join("links.svg");
        let plot_arg = plot.to_string_lossy().to_string();
        let render = |links: &str| {
            let cmd = Cmd::try_parse_from([
                "cli", "nearest", "--count", "2", "--nx", "3", "--ny", "1", "--query-x", "0",
                "--query-y", "0", "--resolution", "2", "--links", links, "--plot", &plot_arg,
            ])
            .unwrap();
            let Action::Nearest(args) = cmd.action else {
                panic!("expected nearest");
            };
            nearest_cmd(&args, 4).unwrap();
            std::fs::read_to_string(&plot)
                .unwrap()
                .matches("<polyline")
                .count()
        };
        let unlinked = render("none");
        assert_eq!(render("cross") - unlinked, 6);
        let sidecar = std::fs::read_to_string(dir.path().join("links.provenance.json")).unwrap();
        assert!(sidecar.contains("\"links\": \"Cross\""));
    }
}
