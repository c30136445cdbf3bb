//! trazar: analysis helpers for particle-tracking GNN results.
//!
//! The training pipeline writes a YAML config, per-epoch summary CSVs, and
//! parameter checkpoints; the dataset directory holds hit-graph event files.
//! This crate loads those artifacts back, runs inference over the held-out
//! test set, computes binary-classification metrics, and renders terminal
//! figures for training history, output scores, and event displays.
//!
//! # Example
//!
//! ```no_run
//! use trazar::{apply_model, compute_metrics, load_config, load_model, test_data_loader};
//!
//! # fn main() -> trazar::Result<()> {
//! let config = load_config("configs/segclf.yaml")?;
//! let model = load_model(&config, 20)?;
//! let loader = test_data_loader(&config, config.data.n_test)?;
//! let (preds, targets) = apply_model(model.as_ref(), &loader)?;
//! let metrics = compute_metrics(&preds, &targets, trazar::DEFAULT_THRESHOLD)?;
//! println!("AUC = {:.3}", metrics.roc_auc);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod graph;
pub mod inference;
pub mod metrics;
pub mod model;
pub mod plot;
pub mod summary;

pub use config::{expand_vars, load_config, Config, DataConfig};
pub use data::{test_data_loader, Batch, DataLoader, HitGraphDataset, Subset};
pub use error::{Error, Result};
pub use graph::HitGraph;
pub use inference::apply_model;
pub use metrics::{compute_metrics, concat_batches, Metrics, DEFAULT_THRESHOLD};
pub use model::{get_model, load_model, Model, StateDict};
pub use plot::{draw_sample, plot_outputs_roc, plot_train_history};
pub use summary::{load_summaries, EpochSummary};
