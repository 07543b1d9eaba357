//! Scatter plots and distance heatmaps (plotters, SVG backend).
//!
//! Uses the SVG backend so rendering needs no system fonts.

use anyhow::Result;
use nalgebra::Vector2;
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use pointfield::field::DistanceField;
use pointfield::points::PointSet;
use std::path::Path;

/// Line segments drawn under the markers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Links {
    #[default]
    None,
    /// Every pair within the first layer.
    Pairwise,
    /// Every pair between the first and second layer.
    Cross,
}

struct Layer<'a> {
    points: &'a PointSet,
    color: RGBColor,
    label: &'a str,
}

/// One SVG figure: scatter layers, optional links, highlights, and heatmap.
pub struct Figure<'a> {
    title: String,
    size: (u32, u32),
    layers: Vec<Layer<'a>>,
    links: Links,
    highlights: Vec<Vector2<f64>>,
    field: Option<&'a DistanceField>,
}

impl<'a> Figure<'a> {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            size: (800, 700),
            layers: Vec::new(),
            links: Links::None,
            highlights: Vec::new(),
            field: None,
        }
    }

    pub fn layer(mut self, points: &'a PointSet, color: RGBColor, label: &'a str) -> Self {
        self.layers.push(Layer {
            points,
            color,
            label,
        });
        self
    }

    pub fn links(mut self, links: Links) -> Self {
        self.links = links;
        self
    }

    /// Marked in red on top of everything else.
    pub fn highlight(mut self, p: Vector2<f64>) -> Self {
        self.highlights.push(p);
        self
    }

    /// Heatmap background; also fixes the plotted extent.
    pub fn field(mut self, field: &'a DistanceField) -> Self {
        self.field = Some(field);
        self
    }

    fn plot_range(&self) -> ((f64, f64), (f64, f64)) {
        if let Some(f) = self.field {
            let e = f.extent;
            return ((e.x_min, e.x_max), (e.y_min, e.y_max));
        }
        let mut lo = Vector2::repeat(f64::INFINITY);
        let mut hi = Vector2::repeat(f64::NEG_INFINITY);
        let bounds = self
            .layers
            .iter()
            .filter_map(|l| l.points.bounds())
            .chain(self.highlights.iter().map(|p| (*p, *p)));
        for (a, b) in bounds {
            lo = lo.inf(&a);
            hi = hi.sup(&b);
        }
        if !(lo.x.is_finite() && hi.x.is_finite()) {
            return ((0.0, 1.0), (0.0, 1.0));
        }
        let pad = |lo: f64, hi: f64| {
            let w = hi - lo;
            let m = if w > 0.0 { 0.05 * w } else { 0.5 };
            (lo - m, hi + m)
        };
        (pad(lo.x, hi.x), pad(lo.y, hi.y))
    }

    pub fn render(&self, path: &Path) -> Result<()> {
        let ((x0, x1), (y0, y1)) = self.plot_range();
        let root = SVGBackend::new(path, self.size).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&self.title, ("sans-serif", 20))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(x0..x1, y0..y1)?;

        chart.configure_mesh().x_desc("X").y_desc("Y").draw()?;

        if let Some(f) = self.field {
            draw_field(&mut chart, f)?;
        }

        let first = self.layers.first().map(|l| l.points);
        let second = self.layers.get(1).map(|l| l.points);
        let segments: Vec<(Vector2<f64>, Vector2<f64>)> = match (self.links, first, second) {
            (Links::Pairwise, Some(a), _) => {
                let pts = a.as_slice();
                (0..pts.len())
                    .flat_map(|i| (i + 1..pts.len()).map(move |j| (pts[i], pts[j])))
                    .collect()
            }
            (Links::Cross, Some(a), Some(b)) => a
                .iter()
                .flat_map(|p| b.iter().map(move |q| (*p, *q)))
                .collect(),
            _ => Vec::new(),
        };
        chart.draw_series(
            segments
                .iter()
                .map(|(p, q)| PathElement::new(vec![(p.x, p.y), (q.x, q.y)], &RED)),
        )?;

        let mut labelled = false;
        for layer in &self.layers {
            let color = layer.color;
            let series = chart.draw_series(
                layer
                    .points
                    .iter()
                    .map(move |p| Circle::new((p.x, p.y), 4, color.filled())),
            )?;
            if !layer.label.is_empty() {
                labelled = true;
                series
                    .label(layer.label)
                    .legend(move |(x, y)| Circle::new((x, y), 4, color.filled()));
            }
        }

        chart.draw_series(
            self.highlights
                .iter()
                .map(|p| Circle::new((p.x, p.y), 6, RED.filled())),
        )?;

        if labelled {
            chart
                .configure_series_labels()
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .draw()?;
        }

        root.present()?;
        tracing::info!(path = %path.display(), layers = self.layers.len(), "figure_written");
        Ok(())
    }
}

/// Cells span the extent edge to edge, row 0 at the bottom.
fn draw_field<DB: DrawingBackend>(
    chart: &mut ChartContext<'_, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    f: &DistanceField,
) -> Result<()> {
    let (nx, ny) = f.resolution();
    let Some((lo, hi)) = f.range() else {
        return Ok(());
    };
    let span = if hi > lo { hi - lo } else { 1.0 };
    let e = f.extent;
    let dx = e.width() / nx as f64;
    let dy = e.height() / ny as f64;
    let cells = (0..ny).flat_map(|r| (0..nx).map(move |c| (c, r)));
    chart
        .draw_series(cells.filter_map(|(c, r)| {
            let v = f.value(c, r)?;
            let xa = e.x_min + c as f64 * dx;
            let ya = e.y_min + r as f64 * dy;
            Some(Rectangle::new(
                [(xa, ya), (xa + dx, ya + dy)],
                field_color((v - lo) / span).filled(),
            ))
        }))
        .map_err(|err| anyhow::anyhow!("drawing field: {err}"))?;
    Ok(())
}

/// Dark blue (near) → teal → yellow (far).
fn field_color(t: f64) -> RGBColor {
    const STOPS: [(f64, [f64; 3]); 5] = [
        (0.00, [68.0, 1.0, 84.0]),
        (0.25, [59.0, 82.0, 139.0]),
        (0.50, [33.0, 145.0, 140.0]),
        (0.75, [94.0, 201.0, 98.0]),
        (1.00, [253.0, 231.0, 37.0]),
    ];
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let k = STOPS
        .windows(2)
        .position(|w| t <= w[1].0)
        .unwrap_or(STOPS.len() - 2);
    let (t0, c0) = STOPS[k];
    let (t1, c1) = STOPS[k + 1];
    let s = (t - t0) / (t1 - t0);
    let mix = |i: usize| (c0[i] + (c1[i] - c0[i]) * s).round() as u8;
    RGBColor(mix(0), mix(1), mix(2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pointfield::prelude::*;
    use tempfile::TempDir;

    fn circle() -> PointSet {
        Layout::Annulus(AnnulusParams::band(PointCount(6)))
            .sample(ReplayToken::new(1, 0))
            .unwrap()
    }

    #[test]
    fn pairwise_figure_written() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("pairs.svg");
        let pts = circle();
        Figure::new("pairs")
            .layer(&pts, BLUE, "")
            .links(Links::Pairwise)
            .render(&path)
            .unwrap();
        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        // 6 choose 2 segments
        assert!(svg.matches("<polyline").count() >= 15);
    }

    #[test]
    fn heatmap_figure_written() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("field.svg");
        let pts = circle();
        let extent = Extent::square(-1.0, 1.0).unwrap();
        let field = DistanceField::to_set(extent, GridShape::new(10, 10), &pts).unwrap();
        let grid = Layout::Grid(GridParams {
            shape: GridShape::new(3, 3),
            x_max: 0.5,
            y_max: 0.5,
        })
        .sample(ReplayToken::new(0, 0))
        .unwrap();
        Figure::new("field")
            .field(&field)
            .layer(&grid, GREEN, "grid")
            .layer(&pts, BLUE, "circle")
            .highlight(Vector2::new(0.25, 0.25))
            .render(&path)
            .unwrap();
        assert!(path.exists());
    }

    #[test]
    fn cross_links_join_every_pair_between_layers() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("cross.svg");
        let a = PointSet::new(vec![Vector2::new(0.0, 0.0), Vector2::new(1.0, 0.0)]).unwrap();
        let b = PointSet::new(vec![
            Vector2::new(0.0, 2.0),
            Vector2::new(1.0, 2.0),
            Vector2::new(2.0, 2.0),
        ])
        .unwrap();
        let count = |links| {
            Figure::new("cross")
                .layer(&a, GREEN, "")
                .layer(&b, BLUE, "")
                .links(links)
                .render(&path)
                .unwrap();
            std::fs::read_to_string(&path)
                .unwrap()
                .matches("<polyline")
                .count()
        };
        let unlinked = count(Links::None);
        assert_eq!(count(Links::Cross) - unlinked, 6);
    }

    #[test]
    fn empty_figure_still_renders() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("empty.svg");
        let empty = PointSet::default();
        Figure::new("empty")
            .layer(&empty, BLUE, "")
            .links(Links::Cross)
            .render(&path)
            .unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("<svg"));
    }

    #[test]
    fn field_color_endpoints() {
        let near = field_color(0.0);
        let far = field_color(1.0);
        assert_eq!((near.0, near.1, near.2), (68, 1, 84));
        assert_eq!((far.0, far.1, far.2), (253, 231, 37));
        let nan = field_color(f64::NAN);
        let over = field_color(2.0);
        assert_eq!((nan.0, nan.1, nan.2), (near.0, near.1, near.2));
        assert_eq!((over.0, over.1, over.2), (far.0, far.1, far.2));
    }
}
