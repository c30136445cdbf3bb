//! Per-epoch training summary table.
//!
//! The training pipeline appends one CSV row per epoch to
//! `<output_dir>/summaries_0.csv`. This module reads that table back for
//! plotting and best-epoch selection.

use crate::config::Config;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File name of the rank-0 summary table inside the output directory.
pub const SUMMARY_FILE: &str = "summaries_0.csv";

/// One training epoch's recorded metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochSummary {
    pub epoch: usize,
    pub train_loss: f64,
    pub valid_loss: f64,
    pub valid_acc: f64,
}

/// Load the per-epoch summary table for a training run.
pub fn load_summaries(config: &Config) -> Result<Vec<EpochSummary>> {
    let path = config.output_dir().join(SUMMARY_FILE);
    read_summary_file(&path)
}

/// Read a summary CSV with header-driven columns.
pub fn read_summary_file(path: &Path) -> Result<Vec<EpochSummary>> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| Error::SummaryParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut rows = Vec::new();
    for record in reader.deserialize() {
        let row: EpochSummary = record.map_err(|e| Error::SummaryParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        rows.push(row);
    }
    Ok(rows)
}

/// The epoch with the lowest validation loss, if any rows exist.
pub fn best_epoch(summaries: &[EpochSummary]) -> Option<&EpochSummary> {
    summaries
        .iter()
        .min_by(|a, b| a.valid_loss.total_cmp(&b.valid_loss))
}

/// Validation accuracy of the final recorded epoch.
pub fn final_valid_acc(summaries: &[EpochSummary]) -> Option<f64> {
    summaries.last().map(|s| s.valid_acc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DataConfig;
    use approx::assert_relative_eq;
    use std::fs;
    use tempfile::TempDir;

    fn config_for(dir: &Path) -> Config {
        Config {
            output_dir: dir.to_string_lossy().into_owned(),
            data: DataConfig {
                input_dir: "/unused".into(),
                n_test: 16,
            },
            model: serde_yaml::Mapping::new(),
        }
    }

    #[test]
    fn test_load_summaries_reads_all_rows() {
        let dir = TempDir::new().expect("temp dir");
        fs::write(
            dir.path().join(SUMMARY_FILE),
            "epoch,train_loss,valid_loss,valid_acc\n\
             0,0.693,0.671,0.55\n\
             1,0.512,0.502,0.74\n\
             2,0.401,0.433,0.81\n",
        )
        .expect("write");

        let summaries = load_summaries(&config_for(dir.path())).expect("load");
        assert_eq!(summaries.len(), 3);
        assert_eq!(summaries[0].epoch, 0);
        assert_relative_eq!(summaries[2].valid_acc, 0.81);
    }

    #[test]
    fn test_load_summaries_missing_file() {
        let dir = TempDir::new().expect("temp dir");
        let result = load_summaries(&config_for(dir.path()));
        assert!(matches!(result, Err(Error::SummaryParse { .. })));
    }

    #[test]
    fn test_load_summaries_malformed_row() {
        let dir = TempDir::new().expect("temp dir");
        fs::write(
            dir.path().join(SUMMARY_FILE),
            "epoch,train_loss,valid_loss,valid_acc\n0,not_a_number,0.5,0.5\n",
        )
        .expect("write");

        let result = load_summaries(&config_for(dir.path()));
        assert!(matches!(result, Err(Error::SummaryParse { .. })));
    }

    #[test]
    fn test_best_epoch_minimizes_valid_loss() {
        let rows = vec![
            EpochSummary {
                epoch: 0,
                train_loss: 0.7,
                valid_loss: 0.6,
                valid_acc: 0.6,
            },
            EpochSummary {
                epoch: 1,
                train_loss: 0.5,
                valid_loss: 0.4,
                valid_acc: 0.8,
            },
            EpochSummary {
                epoch: 2,
                train_loss: 0.4,
                valid_loss: 0.45,
                valid_acc: 0.79,
            },
        ];
        assert_eq!(best_epoch(&rows).map(|s| s.epoch), Some(1));
        assert_relative_eq!(final_valid_acc(&rows).unwrap(), 0.79);
    }

    #[test]
    fn test_best_epoch_empty() {
        assert!(best_epoch(&[]).is_none());
        assert!(final_valid_acc(&[]).is_none());
    }
}
