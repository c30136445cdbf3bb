//! Hit-graph data model.
//!
//! A hit graph represents detector hits as nodes and candidate track
//! segments as edges. Node features are cylindrical coordinates (r, phi, z);
//! the two incidence matrices associate each segment with its source and
//! target hit. Labels are continuous in [0, 1] (thresholded for display and
//! decision metrics).

use crate::error::{Error, Result};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Column index of the radial coordinate in the feature matrix.
pub const R_COL: usize = 0;
/// Column index of the azimuthal coordinate.
pub const PHI_COL: usize = 1;
/// Column index of the longitudinal coordinate.
pub const Z_COL: usize = 2;

/// One hit-graph event.
#[derive(Debug, Clone)]
pub struct HitGraph {
    /// Node features, one row per hit; columns (r, phi, z).
    pub x: Array2<f32>,
    /// Incoming incidence: `ri[(hit, seg)] == 1` iff `seg` ends at `hit`.
    pub ri: Array2<f32>,
    /// Outgoing incidence: `ro[(hit, seg)] == 1` iff `seg` starts at `hit`.
    pub ro: Array2<f32>,
    /// Per-segment labels in [0, 1].
    pub y: Array1<f32>,
}

/// On-disk representation of an event file (JSON, nested row vectors).
#[derive(Debug, Serialize, Deserialize)]
struct HitGraphFile {
    x: Vec<Vec<f32>>,
    ri: Vec<Vec<f32>>,
    ro: Vec<Vec<f32>>,
    y: Vec<f32>,
}

impl HitGraph {
    /// Number of hits (nodes).
    pub fn n_hits(&self) -> usize {
        self.x.nrows()
    }

    /// Number of candidate segments (edges).
    pub fn n_segments(&self) -> usize {
        self.y.len()
    }

    /// Number of node feature columns.
    pub fn n_features(&self) -> usize {
        self.x.ncols()
    }

    /// Check shape agreement between features, incidence matrices and labels.
    pub fn validate(&self) -> Result<()> {
        let n_hits = self.n_hits();
        let n_segments = self.n_segments();
        let shapes_agree = self.ri.nrows() == n_hits
            && self.ro.nrows() == n_hits
            && self.ri.ncols() == n_segments
            && self.ro.ncols() == n_segments;
        if !shapes_agree {
            return Err(Error::MalformedGraph {
                path: "<memory>".into(),
                message: format!(
                    "x is {}x{}, ri is {}x{}, ro is {}x{}, y has {}",
                    self.x.nrows(),
                    self.x.ncols(),
                    self.ri.nrows(),
                    self.ri.ncols(),
                    self.ro.nrows(),
                    self.ro.ncols(),
                    n_segments
                ),
            });
        }
        Ok(())
    }

    /// Per-segment (source hit, target hit) index pairs, derived from the
    /// incidence matrices. Columns are expected to be one-hot; the position
    /// of the column maximum is used.
    pub fn segment_endpoints(&self) -> Vec<(usize, usize)> {
        let n = self.n_segments();
        let mut pairs = Vec::with_capacity(n);
        for seg in 0..n {
            let source = column_argmax(&self.ro, seg);
            let target = column_argmax(&self.ri, seg);
            pairs.push((source, target));
        }
        pairs
    }

    /// Load an event from a JSON file, validating shape agreement.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let raw: HitGraphFile =
            serde_json::from_str(&content).map_err(|e| Error::MalformedGraph {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        let graph = Self {
            x: rows_to_array(raw.x, path)?,
            ri: rows_to_array(raw.ri, path)?,
            ro: rows_to_array(raw.ro, path)?,
            y: Array1::from_vec(raw.y),
        };
        graph.validate().map_err(|e| match e {
            Error::MalformedGraph { message, .. } => Error::MalformedGraph {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })?;
        Ok(graph)
    }

    /// Write an event to a JSON file (fixture and round-trip support).
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let raw = HitGraphFile {
            x: array_to_rows(&self.x),
            ri: array_to_rows(&self.ri),
            ro: array_to_rows(&self.ro),
            y: self.y.to_vec(),
        };
        let json = serde_json::to_string(&raw).map_err(|e| Error::MalformedGraph {
            path: path.as_ref().to_path_buf(),
            message: e.to_string(),
        })?;
        fs::write(path, json)?;
        Ok(())
    }
}

fn column_argmax(matrix: &Array2<f32>, col: usize) -> usize {
    let mut best = 0;
    let mut best_val = f32::NEG_INFINITY;
    for (row, &v) in matrix.column(col).iter().enumerate() {
        if v > best_val {
            best_val = v;
            best = row;
        }
    }
    best
}

fn rows_to_array(rows: Vec<Vec<f32>>, path: &Path) -> Result<Array2<f32>> {
    let n_rows = rows.len();
    let n_cols = rows.first().map_or(0, Vec::len);
    if rows.iter().any(|r| r.len() != n_cols) {
        return Err(Error::MalformedGraph {
            path: path.to_path_buf(),
            message: "ragged row lengths".into(),
        });
    }
    let flat: Vec<f32> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((n_rows, n_cols), flat).map_err(|e| Error::MalformedGraph {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn array_to_rows(array: &Array2<f32>) -> Vec<Vec<f32>> {
    array.rows().into_iter().map(|r| r.to_vec()).collect()
}

/// Three hits on a line, two segments: 0 -> 1 (real), 1 -> 2 (fake).
/// Shared fixture for module tests.
#[cfg(test)]
pub(crate) fn demo_graph() -> HitGraph {
    use ndarray::array;
    HitGraph {
        x: array![[1.0, 0.1, 10.0], [2.0, 0.2, 20.0], [3.0, 0.3, 30.0]],
        ri: array![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]],
        ro: array![[1.0, 0.0], [0.0, 1.0], [0.0, 0.0]],
        y: array![1.0, 0.0],
    }
}
