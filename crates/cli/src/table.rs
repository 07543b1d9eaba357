//! Coordinate tables on disk (CSV or Parquet, picked by extension).
//!
//! - Point sets are written as columns `x`, `y`.
//! - Distance matrices are written one row per point of A, columns `d0..d{M-1}`.
//! - Reading returns every column as `f64`, one point per row, so callers can
//!   check the dimensionality themselves.

use anyhow::{bail, Context, Result};
use nalgebra::DMatrix;
use polars::prelude::*;
use pointfield::points::PointSet;
use std::fs::File;
use std::path::Path;

fn is_parquet(path: &Path) -> bool {
    path.extension().map(|e| e == "parquet").unwrap_or(false)
}

/// Columns of `m` named `{prefix}{j}`.
fn matrix_frame(m: &DMatrix<f64>, names: &[String]) -> Result<DataFrame> {
    let mut df = DataFrame::default();
    for (j, name) in names.iter().enumerate() {
        let col: Vec<f64> = m.column(j).iter().copied().collect();
        df.with_column(Series::new(name.as_str().into(), col))?;
    }
    Ok(df)
}

fn write_frame(path: &Path, df: &mut DataFrame) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    if is_parquet(path) {
        ParquetWriter::new(file).finish(df)?;
    } else {
        CsvWriter::new(file).include_header(true).finish(df)?;
    }
    tracing::info!(
        path = %path.display(),
        rows = df.height(),
        cols = df.width(),
        "table_written"
    );
    Ok(())
}

pub fn write_points(path: &Path, set: &PointSet) -> Result<()> {
    let names = ["x".to_string(), "y".to_string()];
    let mut df = matrix_frame(&set.to_matrix(), &names)?;
    write_frame(path, &mut df)
}

pub fn write_matrix(path: &Path, m: &DMatrix<f64>) -> Result<()> {
    let names: Vec<String> = (0..m.ncols()).map(|j| format!("d{j}")).collect();
    let mut df = matrix_frame(m, &names)?;
    write_frame(path, &mut df)
}

/// Load every column as `f64`; rows are points.
pub fn read_rows(path: &Path) -> Result<DMatrix<f64>> {
    let lf = if is_parquet(path) {
        LazyFrame::scan_parquet(path, ScanArgsParquet::default())?
    } else {
        LazyCsvReader::new(path)
            .with_infer_schema_length(Some(100))
            .finish()?
    };
    let df = lf
        .collect()
        .with_context(|| format!("reading {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        rows = df.height(),
        cols = df.width(),
        "table_read"
    );
    let mut cols: Vec<Vec<f64>> = Vec::with_capacity(df.width());
    for col in df.get_columns() {
        let cast = col
            .cast(&DataType::Float64)
            .with_context(|| format!("column {} is not numeric", col.name()))?;
        let mut values = Vec::with_capacity(df.height());
        for (i, v) in cast.f64()?.into_iter().enumerate() {
            match v {
                Some(v) => values.push(v),
                None => bail!("column {} has a missing value at row {i}", col.name()),
            }
        }
        cols.push(values);
    }
    Ok(DMatrix::from_fn(df.height(), cols.len(), |i, j| cols[j][i]))
}

/// Load an N×2 table as a point set.
pub fn read_points(path: &Path) -> Result<PointSet> {
    let rows = read_rows(path)?;
    PointSet::from_matrix(&rows).with_context(|| format!("loading points from {}", path.display()))
}
