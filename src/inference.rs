//! Inference over a data loader.
//!
//! Models here are inference-only (no gradient tape), so the original
//! pipeline's no-grad guard is implicit: a forward pass never records
//! training state. `apply_model` is a plain fold over the loader.

use crate::data::DataLoader;
use crate::error::Result;
use crate::model::Model;
use ndarray::Array1;

/// Run a model over every batch of a loader.
///
/// Returns two parallel sequences (predictions, targets), one entry per
/// batch, each squeezed to drop the batch dimension, in the loader's
/// iteration order.
pub fn apply_model(
    model: &dyn Model,
    loader: &DataLoader,
) -> Result<(Vec<Array1<f32>>, Vec<Array1<f32>>)> {
    let mut preds = Vec::with_capacity(loader.len());
    let mut targets = Vec::with_capacity(loader.len());
    for batch in loader.iter() {
        let batch = batch?;
        preds.push(model.forward(&batch.inputs));
        targets.push(batch.targets);
    }
    Ok((preds, targets))
}
