//! YAML configuration loading and path accessors.
//!
//! The analysis helpers consume a small slice of the training configuration:
//! `output_dir`, `data.input_dir`, and the `model` sub-mapping. Anything else
//! in the file is ignored. Directory paths may contain `$VAR` / `${VAR}`
//! environment references, which are expanded on access.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration slice consumed by the analysis helpers.
///
/// The `model` sub-mapping is kept untyped: it mixes architecture
/// hyperparameters with training-only keys that [`crate::model::load_model`]
/// strips before construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Training output directory (summaries, checkpoints). May contain
    /// environment references.
    pub output_dir: String,
    /// Dataset configuration.
    pub data: DataConfig,
    /// Model architecture + hyperparameters, keyed by `name`.
    pub model: serde_yaml::Mapping,
}

/// Dataset-related configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory of hit-graph event files. May contain environment references.
    pub input_dir: String,
    /// Held-out test set size, taken from the back of the dataset.
    #[serde(default = "default_n_test")]
    pub n_test: usize,
}

fn default_n_test() -> usize {
    16
}

impl Config {
    /// Output directory with environment references expanded.
    pub fn output_dir(&self) -> PathBuf {
        PathBuf::from(expand_vars(&self.output_dir))
    }

    /// Dataset input directory with environment references expanded.
    pub fn input_dir(&self) -> PathBuf {
        PathBuf::from(expand_vars(&self.data.input_dir))
    }
}

/// Load a [`Config`] from a YAML file.
///
/// Parsing is restricted to plain YAML scalars/mappings/sequences
/// (serde_yaml has no object-construction mode). Missing consumed keys
/// surface as a parse error.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| Error::ConfigParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    serde_yaml::from_str(&content).map_err(|e| Error::ConfigParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Expand `$NAME` and `${NAME}` environment references in a string.
///
/// Set variables are substituted; unknown references are left verbatim,
/// matching `os.path.expandvars` semantics so configs written for the
/// training pipeline resolve identically here.
pub fn expand_vars(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }

        // `${NAME}` form
        if let Some(&(_, '{')) = chars.peek() {
            if let Some(end) = input[i + 2..].find('}') {
                let name = &input[i + 2..i + 2 + end];
                if let Ok(value) = env::var(name) {
                    out.push_str(&value);
                } else {
                    out.push_str(&input[i..i + 3 + end]);
                }
                // Skip past the closing brace.
                for _ in 0..end + 2 {
                    chars.next();
                }
                continue;
            }
            out.push(c);
            continue;
        }

        // `$NAME` form
        let rest = &input[i + 1..];
        let name_len = rest
            .chars()
            .take_while(|ch| ch.is_ascii_alphanumeric() || *ch == '_')
            .count();
        if name_len == 0 {
            out.push(c);
            continue;
        }
        let name: String = rest.chars().take(name_len).collect();
        if let Ok(value) = env::var(&name) {
            out.push_str(&value);
        } else {
            out.push('$');
            out.push_str(&name);
        }
        for _ in 0..name_len {
            chars.next();
        }
    }

    out
}
