//! Model factory and checkpoint reload.
//!
//! Models are constructed from the `model` sub-mapping of the configuration
//! through a factory keyed by the `name` field. Training-only keys that the
//! training pipeline stores alongside the hyperparameters are stripped
//! before construction.

mod checkpoint;
mod dense;
mod linear;
mod segment;
mod state;

pub use checkpoint::{checkpoint_path, load_checkpoint, save_checkpoint, Checkpoint, CHECKPOINT_DIR};
pub use dense::{DenseSegmentClassifier, DenseSegmentClassifierConfig};
pub use linear::{sigmoid, tanh, Linear};
pub use segment::{SegmentClassifier, SegmentClassifierConfig};
pub use state::{ParamInfo, StateDict};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::graph::HitGraph;
use ndarray::Array1;

/// A trained (or trainable) segment-scoring model.
pub trait Model: std::fmt::Debug {
    /// Architecture name, as accepted by [`get_model`].
    fn name(&self) -> &'static str;

    /// Per-segment scores in [0, 1] for one hit graph.
    fn forward(&self, graph: &HitGraph) -> Array1<f32>;

    /// Serialize all parameters.
    fn state_dict(&self) -> StateDict;

    /// Replace all parameters, enforcing constructed shapes.
    fn load_state_dict(&mut self, state: &StateDict) -> Result<()>;
}

/// Keys the training pipeline stores in the model sub-config that are
/// irrelevant for inference. Stripping absent keys is a no-op.
pub const TRAINING_ONLY_KEYS: [&str; 5] = [
    "optimizer",
    "learning_rate",
    "loss_func",
    "lr_scaling",
    "lr_warmup_epochs",
];

/// Remove training-only keys from a model config mapping.
pub fn strip_training_keys(model_config: &mut serde_yaml::Mapping) {
    for key in TRAINING_ONLY_KEYS {
        model_config.remove(key);
    }
}

/// Construct a model from a config mapping, dispatching on `name`.
pub fn get_model(model_config: &serde_yaml::Mapping) -> Result<Box<dyn Model>> {
    let name = model_config
        .get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| Error::ModelConfig("missing architecture 'name'".into()))?
        .to_string();

    let mut rest = model_config.clone();
    rest.remove("name");
    let value = serde_yaml::Value::Mapping(rest);

    match name.as_str() {
        segment::ARCH => {
            let config: SegmentClassifierConfig =
                serde_yaml::from_value(value).map_err(|e| Error::ModelConfig(e.to_string()))?;
            Ok(Box::new(SegmentClassifier::new(config)))
        }
        dense::ARCH => {
            let config: DenseSegmentClassifierConfig =
                serde_yaml::from_value(value).map_err(|e| Error::ModelConfig(e.to_string()))?;
            Ok(Box::new(DenseSegmentClassifier::new(config)))
        }
        other => Err(Error::UnknownArchitecture(other.to_string())),
    }
}

/// Construct the configured model and reload its trained weights from the
/// checkpoint written at `reload_epoch`.
pub fn load_model(config: &Config, reload_epoch: usize) -> Result<Box<dyn Model>> {
    let mut model_config = config.model.clone();
    strip_training_keys(&mut model_config);
    let mut model = get_model(&model_config)?;

    let path = checkpoint_path(&config.output_dir(), reload_epoch);
    let checkpoint = load_checkpoint(&path)?;
    model.load_state_dict(&checkpoint.model)?;
    Ok(model)
}
