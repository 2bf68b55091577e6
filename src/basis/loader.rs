//! basis::loader — read the FPCA basis from its static CSV resources.
//!
//! The resource directory holds, for each segment `b ∈ {0, 1}`:
//! - `B{b}_SoEfunc.csv`: a header row followed by one row per basis function
//!   (90 rows × 1001 comma-separated samples).
//! - `B{b}_SoFittedMean.csv`: a header row naming an `x` column followed by
//!   1001 rows holding the mean template.
//!
//! Loading happens once at start-up; read or parse failures are reported as
//! external-dependency failures.
use std::{fs, path::Path};

use ndarray::{Array1, Array2};
use tracing::debug;

use crate::basis::{
    basis_set::{BasisSet, N_COMPONENTS, N_SEGMENTS, RECON_RESOLUTION},
    errors::{BasisError, BasisResult},
};

/// Column holding the mean template in `B{b}_SoFittedMean.csv`.
const MEAN_COLUMN: &str = "x";

impl BasisSet {
    /// Load both segments from `dir` and build the basis set.
    ///
    /// Errors
    /// ------
    /// - [`BasisError::ResourceIo`] when a file cannot be read.
    /// - [`BasisError::ResourceParse`] on malformed rows or a missing `x`
    ///   column.
    /// - Any validation error from [`BasisSet::new`].
    pub fn from_csv_dir(dir: impl AsRef<Path>) -> BasisResult<Self> {
        let dir = dir.as_ref();
        let mut components = Vec::with_capacity(N_SEGMENTS);
        let mut means = Vec::with_capacity(N_SEGMENTS);
        for segment in 0..N_SEGMENTS {
            let efunc = dir.join(format!("B{segment}_SoEfunc.csv"));
            let mean = dir.join(format!("B{segment}_SoFittedMean.csv"));
            components.push(read_components(&efunc)?);
            means.push(read_mean(&mean)?);
            debug!(segment, path = %efunc.display(), "loaded FPCA basis segment");
        }
        BasisSet::new(components, means)
    }
}

fn read_text(path: &Path) -> BasisResult<String> {
    fs::read_to_string(path)
        .map_err(|e| BasisError::ResourceIo {
            path: path.display().to_string(),
            text: e.to_string(),
        })
}

fn split_fields(line: &str) -> impl Iterator<Item = &str> {
    line.split(',').map(|f| f.trim().trim_matches('"'))
}

fn parse_row(path: &Path, line_no: usize, line: &str) -> BasisResult<Vec<f64>> {
    split_fields(line)
        .map(|field| {
            field.parse::<f64>().map_err(|e| BasisError::ResourceParse {
                path: path.display().to_string(),
                line: line_no,
                text: format!("'{field}': {e}"),
            })
        })
        .collect()
}

fn read_components(path: &Path) -> BasisResult<Array2<f64>> {
    let text = read_text(path)?;
    let mut rows: Vec<Vec<f64>> = Vec::with_capacity(N_COMPONENTS);
    for (idx, line) in text.lines().enumerate().skip(1) {
        if line.trim().is_empty() {
            continue;
        }
        let row = parse_row(path, idx + 1, line)?;
        if row.len() != RECON_RESOLUTION {
            return Err(BasisError::ResourceParse {
                path: path.display().to_string(),
                line: idx + 1,
                text: format!("expected {RECON_RESOLUTION} samples, found {}", row.len()),
            });
        }
        rows.push(row);
    }
    let n_rows = rows.len();
    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((n_rows, RECON_RESOLUTION), flat).map_err(|e| {
        BasisError::ResourceParse { path: path.display().to_string(), line: 0, text: e.to_string() }
    })
}

fn read_mean(path: &Path) -> BasisResult<Array1<f64>> {
    let text = read_text(path)?;
    let mut lines = text.lines().enumerate();
    let column = lines
        .next()
        .and_then(|(_, header)| split_fields(header).position(|name| name == MEAN_COLUMN))
        .ok_or_else(|| BasisError::ResourceParse {
            path: path.display().to_string(),
            line: 1,
            text: format!("missing '{MEAN_COLUMN}' column"),
        })?;

    let mut values = Vec::with_capacity(RECON_RESOLUTION);
    for (idx, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        let row = parse_row(path, idx + 1, line)?;
        let value = row.get(column).copied().ok_or_else(|| BasisError::ResourceParse {
            path: path.display().to_string(),
            line: idx + 1,
            text: format!("row has no column {column}"),
        })?;
        values.push(value);
    }
    Ok(Array1::from(values))
}
