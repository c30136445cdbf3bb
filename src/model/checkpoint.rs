//! Checkpoint files: load and save trained parameter state.
//!
//! A checkpoint is a JSON document holding at least the `model` key with the
//! parameter state dict, plus the epoch it was written at. Files live under
//! `<output_dir>/checkpoints/` and are named by a zero-padded epoch pattern.

use crate::error::{Error, Result};
use crate::model::state::StateDict;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Checkpoint subdirectory inside the training output directory.
pub const CHECKPOINT_DIR: &str = "checkpoints";

/// A serialized training snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    /// The model's parameter state.
    pub model: StateDict,
    /// Epoch the snapshot was taken at, when recorded.
    #[serde(default)]
    pub epoch: Option<usize>,
}

/// Path of the checkpoint written at `epoch`:
/// `<output_dir>/checkpoints/model_checkpoint_{epoch:03}.json`.
pub fn checkpoint_path(output_dir: &Path, epoch: usize) -> PathBuf {
    output_dir
        .join(CHECKPOINT_DIR)
        .join(format!("model_checkpoint_{epoch:03}.json"))
}

/// Load a checkpoint from a file.
pub fn load_checkpoint(path: &Path) -> Result<Checkpoint> {
    if !path.exists() {
        return Err(Error::CheckpointNotFound {
            path: path.to_path_buf(),
        });
    }
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| Error::CheckpointParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Write a checkpoint, creating parent directories as needed.
pub fn save_checkpoint(path: &Path, checkpoint: &Checkpoint) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string(checkpoint).map_err(|e| Error::CheckpointParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    fs::write(path, json)?;
    Ok(())
}
