//! Dense per-segment baseline classifier.
//!
//! Scores each candidate segment from the concatenated raw features of its
//! two endpoint hits, with no message passing. Useful as a sanity baseline
//! against the recurrent classifier.

use crate::error::Result;
use crate::graph::HitGraph;
use crate::model::linear::{hstack, sigmoid, tanh, Linear};
use crate::model::state::StateDict;
use crate::model::Model;
use ndarray::Array1;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;

/// Architecture name used by the model factory.
pub const ARCH: &str = "dense_segment_classifier";

const INIT_SEED: u64 = 42;

#[derive(Debug, Clone, Deserialize)]
pub struct DenseSegmentClassifierConfig {
    #[serde(default = "default_input_dim")]
    pub input_dim: usize,
    #[serde(default = "default_hidden_dim")]
    pub hidden_dim: usize,
}

fn default_input_dim() -> usize {
    3
}

fn default_hidden_dim() -> usize {
    8
}

#[derive(Debug, Clone)]
pub struct DenseSegmentClassifier {
    config: DenseSegmentClassifierConfig,
    fc1: Linear,
    fc2: Linear,
}

impl DenseSegmentClassifier {
    pub fn new(config: DenseSegmentClassifierConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(INIT_SEED);
        let fc1 = Linear::new(2 * config.input_dim, config.hidden_dim, &mut rng);
        let fc2 = Linear::new(config.hidden_dim, 1, &mut rng);
        Self { config, fc1, fc2 }
    }

    pub fn config(&self) -> &DenseSegmentClassifierConfig {
        &self.config
    }
}

impl Model for DenseSegmentClassifier {
    fn name(&self) -> &'static str {
        ARCH
    }

    fn forward(&self, graph: &HitGraph) -> Array1<f32> {
        let bo = graph.ro.t().dot(&graph.x);
        let bi = graph.ri.t().dot(&graph.x);
        let b = hstack(&[bo.view(), bi.view()]);
        let z = tanh(&self.fc1.forward(&b));
        let scores = sigmoid(&self.fc2.forward(&z));
        scores.column(0).to_owned()
    }

    fn state_dict(&self) -> StateDict {
        let mut state = StateDict::new();
        self.fc1.write_state("fc1", &mut state);
        self.fc2.write_state("fc2", &mut state);
        state
    }

    fn load_state_dict(&mut self, state: &StateDict) -> Result<()> {
        self.fc1.read_state("fc1", state)?;
        self.fc2.read_state("fc2", state)?;
        Ok(())
    }
}
