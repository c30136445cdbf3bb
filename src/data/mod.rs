//! Hit-graph dataset and batching loader.
//!
//! Events live as `*.json` files in the configured input directory, one hit
//! graph per file, ordered by file name. The held-out test set is the tail
//! of that ordering, served one event per batch through a [`DataLoader`]
//! with a collation function.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::graph::HitGraph;
use ndarray::Array1;
use std::fs;
use std::path::{Path, PathBuf};

/// One (inputs, target) example.
pub type Sample = (HitGraph, Array1<f32>);

/// Collation function turning a raw list of samples into a batch.
pub type CollateFn = fn(Vec<Sample>) -> Result<Batch>;

/// A collated batch as produced by [`DataLoader`] iteration.
///
/// With batch size 1 the batch dimension is squeezed away: `inputs` is the
/// single event's graph and `targets` its label vector.
#[derive(Debug, Clone)]
pub struct Batch {
    pub inputs: HitGraph,
    pub targets: Array1<f32>,
}

/// Dataset of hit-graph event files in a directory.
#[derive(Debug, Clone)]
pub struct HitGraphDataset {
    files: Vec<PathBuf>,
}

impl HitGraphDataset {
    /// Scan a directory for `*.json` event files, sorted by file name.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let mut files = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                files.push(path);
            }
        }
        files.sort();
        Ok(Self { files })
    }

    /// Dataset rooted at the configured input directory.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::from_dir(config.input_dir())
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Load event `index` and return it as an (inputs, target) pair.
    pub fn get(&self, index: usize) -> Result<Sample> {
        let path = self.files.get(index).ok_or(Error::DatasetBounds {
            requested: index,
            len: self.files.len(),
        })?;
        let graph = HitGraph::from_file(path)?;
        let target = graph.y.clone();
        Ok((graph, target))
    }

    /// Paths backing the dataset, in iteration order.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }
}

/// A view over a dataset restricted to an explicit index list.
#[derive(Debug, Clone)]
pub struct Subset {
    dataset: HitGraphDataset,
    indices: Vec<usize>,
}

impl Subset {
    /// Restrict `dataset` to `indices`. Every index must be in bounds.
    pub fn new(dataset: HitGraphDataset, indices: Vec<usize>) -> Result<Self> {
        if let Some(&bad) = indices.iter().find(|&&i| i >= dataset.len()) {
            return Err(Error::DatasetBounds {
                requested: bad,
                len: dataset.len(),
            });
        }
        Ok(Self { dataset, indices })
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Load the `position`-th selected example.
    pub fn get(&self, position: usize) -> Result<Sample> {
        let index = *self.indices.get(position).ok_or(Error::DatasetBounds {
            requested: position,
            len: self.indices.len(),
        })?;
        self.dataset.get(index)
    }

    /// The selected dataset indices, in iteration order.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }
}

/// Batching iterator over a [`Subset`] with a collation function.
pub struct DataLoader {
    subset: Subset,
    batch_size: usize,
    collate: CollateFn,
}

impl DataLoader {
    pub fn new(subset: Subset, batch_size: usize, collate: CollateFn) -> Self {
        assert!(batch_size > 0, "batch_size must be positive");
        Self {
            subset,
            batch_size,
            collate,
        }
    }

    /// Number of batches one full iteration yields.
    pub fn len(&self) -> usize {
        self.subset.len().div_ceil(self.batch_size)
    }

    pub fn is_empty(&self) -> bool {
        self.subset.is_empty()
    }

    /// Iterate batches in order. Events are read from disk lazily, one
    /// batch at a time.
    pub fn iter(&self) -> impl Iterator<Item = Result<Batch>> + '_ {
        (0..self.len()).map(move |batch_idx| {
            let start = batch_idx * self.batch_size;
            let end = (start + self.batch_size).min(self.subset.len());
            let samples: Result<Vec<Sample>> =
                (start..end).map(|i| self.subset.get(i)).collect();
            (self.collate)(samples?)
        })
    }
}

/// Collation for batch size 1: squeeze the batch dimension.
pub fn collate_single(mut samples: Vec<Sample>) -> Result<Batch> {
    if samples.len() != 1 {
        return Err(Error::DegenerateInput(format!(
            "collate_single expects batch size 1, got {}",
            samples.len()
        )));
    }
    let (inputs, targets) = samples.remove(0);
    Ok(Batch { inputs, targets })
}

/// Build the held-out test loader: the last `n_test` events of the full
/// dataset, one event per batch, in ascending index order.
pub fn test_data_loader(config: &Config, n_test: usize) -> Result<DataLoader> {
    let full = HitGraphDataset::from_config(config)?;
    let len = full.len();
    if n_test > len {
        return Err(Error::DatasetBounds {
            requested: n_test,
            len,
        });
    }
    let indices: Vec<usize> = (len - n_test..len).collect();
    let subset = Subset::new(full, indices)?;
    Ok(DataLoader::new(subset, 1, collate_single))
}
