//! Recurrent edge/node network segment classifier.
//!
//! The architecture alternates an edge network (scores each candidate
//! segment from its endpoint features) and a node network (aggregates
//! score-weighted neighbor features into new node states) for a fixed
//! number of message-passing rounds, then emits final segment scores
//! through the edge network.

use crate::error::Result;
use crate::graph::HitGraph;
use crate::model::linear::{hstack, sigmoid, tanh, Linear};
use crate::model::state::StateDict;
use crate::model::Model;
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;

/// Architecture name used by the model factory.
pub const ARCH: &str = "segment_classifier";

const INIT_SEED: u64 = 42;

/// Hyperparameters of the segment classifier.
#[derive(Debug, Clone, Deserialize)]
pub struct SegmentClassifierConfig {
    /// Node feature dimension (r, phi, z).
    #[serde(default = "default_input_dim")]
    pub input_dim: usize,
    /// Latent node-state dimension.
    #[serde(default = "default_hidden_dim")]
    pub hidden_dim: usize,
    /// Message-passing rounds.
    #[serde(default = "default_n_iters")]
    pub n_iters: usize,
}

fn default_input_dim() -> usize {
    3
}

fn default_hidden_dim() -> usize {
    8
}

fn default_n_iters() -> usize {
    3
}

/// GNN segment classifier over a hit graph.
#[derive(Debug, Clone)]
pub struct SegmentClassifier {
    config: SegmentClassifierConfig,
    input_network: Linear,
    edge_fc1: Linear,
    edge_fc2: Linear,
    node_fc: Linear,
}

impl SegmentClassifier {
    pub fn new(config: SegmentClassifierConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(INIT_SEED);
        // Node states are the latent vector concatenated with the raw
        // features; both networks consume that augmented representation.
        let aug = config.hidden_dim + config.input_dim;
        let input_network = Linear::new(config.input_dim, config.hidden_dim, &mut rng);
        let edge_fc1 = Linear::new(2 * aug, config.hidden_dim, &mut rng);
        let edge_fc2 = Linear::new(config.hidden_dim, 1, &mut rng);
        let node_fc = Linear::new(3 * aug, config.hidden_dim, &mut rng);
        Self {
            config,
            input_network,
            edge_fc1,
            edge_fc2,
            node_fc,
        }
    }

    pub fn config(&self) -> &SegmentClassifierConfig {
        &self.config
    }

    /// Score every candidate segment from the current augmented node states.
    fn edge_scores(&self, graph: &HitGraph, h_aug: &Array2<f32>) -> Array1<f32> {
        let bo = graph.ro.t().dot(h_aug);
        let bi = graph.ri.t().dot(h_aug);
        let b = hstack(&[bo.view(), bi.view()]);
        let z = tanh(&self.edge_fc1.forward(&b));
        let scores = sigmoid(&self.edge_fc2.forward(&z));
        scores.column(0).to_owned()
    }

    /// One aggregation round: score-weighted messages from both segment
    /// directions, concatenated with the current state.
    fn node_step(&self, graph: &HitGraph, h_aug: &Array2<f32>, e: &Array1<f32>) -> Array2<f32> {
        let bo = graph.ro.t().dot(h_aug);
        let bi = graph.ri.t().dot(h_aug);
        let rwo = &graph.ro * e;
        let rwi = &graph.ri * e;
        let mi = rwi.dot(&bo);
        let mo = rwo.dot(&bi);
        let m = hstack(&[mi.view(), mo.view(), h_aug.view()]);
        tanh(&self.node_fc.forward(&m))
    }
}

impl Model for SegmentClassifier {
    fn name(&self) -> &'static str {
        ARCH
    }

    fn forward(&self, graph: &HitGraph) -> Array1<f32> {
        let x = &graph.x;
        let mut h = tanh(&self.input_network.forward(x));
        for _ in 0..self.config.n_iters {
            let h_aug = hstack(&[h.view(), x.view()]);
            let e = self.edge_scores(graph, &h_aug);
            h = self.node_step(graph, &h_aug, &e);
        }
        let h_aug = hstack(&[h.view(), x.view()]);
        self.edge_scores(graph, &h_aug)
    }

    fn state_dict(&self) -> StateDict {
        let mut state = StateDict::new();
        self.input_network.write_state("input_network", &mut state);
        self.edge_fc1.write_state("edge_network.fc1", &mut state);
        self.edge_fc2.write_state("edge_network.fc2", &mut state);
        self.node_fc.write_state("node_network.fc", &mut state);
        state
    }

    fn load_state_dict(&mut self, state: &StateDict) -> Result<()> {
        self.input_network.read_state("input_network", state)?;
        self.edge_fc1.read_state("edge_network.fc1", state)?;
        self.edge_fc2.read_state("edge_network.fc2", state)?;
        self.node_fc.read_state("node_network.fc", state)?;
        Ok(())
    }
}
