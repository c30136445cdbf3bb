//! Binary-classification metrics over segment scores.
//!
//! Decision metrics (accuracy, precision, recall) are computed at a fixed
//! threshold; the PR and ROC curves sweep every distinct score value against
//! the thresholded ground truth, so they depend on the threshold only
//! through the label binarization. All ten results are bundled into one
//! immutable [`Metrics`] record.

use crate::error::{Error, Result};
use ndarray::Array1;

/// Default decision threshold for binarizing scores and labels.
pub const DEFAULT_THRESHOLD: f32 = 0.5;

/// Evaluation results for one set of predictions.
///
/// Created once per [`compute_metrics`] call; never mutated.
#[derive(Debug, Clone)]
pub struct Metrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub prc_precision: Vec<f64>,
    pub prc_recall: Vec<f64>,
    pub prc_thresh: Vec<f64>,
    pub roc_fpr: Vec<f64>,
    pub roc_tpr: Vec<f64>,
    pub roc_thresh: Vec<f64>,
    pub roc_auc: f64,
}

/// Flatten per-batch score arrays into one array, preserving batch order.
pub fn concat_batches(batches: &[Array1<f32>]) -> Array1<f32> {
    let total: usize = batches.iter().map(Array1::len).sum();
    let mut flat = Vec::with_capacity(total);
    for batch in batches {
        flat.extend(batch.iter().copied());
    }
    Array1::from_vec(flat)
}

/// Compute all decision and curve metrics from per-batch predictions and
/// targets.
///
/// The result is a function of the flattened multiset of values: batch
/// boundaries and ordering do not matter. Empty input, mismatched lengths,
/// or a single-class target set (curves undefined) are errors.
pub fn compute_metrics(
    preds: &[Array1<f32>],
    targets: &[Array1<f32>],
    threshold: f32,
) -> Result<Metrics> {
    let scores: Vec<f64> = concat_batches(preds).iter().map(|&v| f64::from(v)).collect();
    let truth: Vec<f64> = concat_batches(targets)
        .iter()
        .map(|&v| f64::from(v))
        .collect();

    if scores.is_empty() {
        return Err(Error::DegenerateInput("no samples".into()));
    }
    if scores.len() != truth.len() {
        return Err(Error::DegenerateInput(format!(
            "{} predictions vs {} targets",
            scores.len(),
            truth.len()
        )));
    }

    let threshold = f64::from(threshold);
    let y_pred: Vec<bool> = scores.iter().map(|&p| p > threshold).collect();
    let y_true: Vec<bool> = truth.iter().map(|&t| t > threshold).collect();

    let n_pos = y_true.iter().filter(|&&t| t).count();
    let n_neg = y_true.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return Err(Error::DegenerateInput(
            "targets contain a single class; curves are undefined".into(),
        ));
    }

    // Decision-boundary counts.
    let mut tp = 0usize;
    let mut tn = 0usize;
    let mut fp = 0usize;
    let mut fn_ = 0usize;
    for (&p, &t) in y_pred.iter().zip(y_true.iter()) {
        match (t, p) {
            (true, true) => tp += 1,
            (false, false) => tn += 1,
            (false, true) => fp += 1,
            (true, false) => fn_ += 1,
        }
    }
    let accuracy = (tp + tn) as f64 / y_true.len() as f64;
    let precision = ratio(tp, tp + fp);
    let recall = ratio(tp, tp + fn_);

    let (prc_precision, prc_recall, prc_thresh) = precision_recall_curve(&scores, &y_true);
    let (roc_fpr, roc_tpr, roc_thresh) = roc_curve(&scores, &y_true);
    let roc_auc = auc(&roc_fpr, &roc_tpr);

    Ok(Metrics {
        accuracy,
        precision,
        recall,
        prc_precision,
        prc_recall,
        prc_thresh,
        roc_fpr,
        roc_tpr,
        roc_thresh,
        roc_auc,
    })
}

fn ratio(num: usize, denom: usize) -> f64 {
    if denom == 0 {
        0.0
    } else {
        num as f64 / denom as f64
    }
}

/// Scores sorted descending, paired with their binary labels and grouped by
/// distinct value so tied scores contribute one sweep point.
fn sorted_pairs(scores: &[f64], labels: &[bool]) -> Vec<(f64, bool)> {
    let mut pairs: Vec<(f64, bool)> = scores.iter().copied().zip(labels.iter().copied()).collect();
    pairs.sort_by(|a, b| b.0.total_cmp(&a.0));
    pairs
}

/// ROC curve: (false positive rate, true positive rate, thresholds).
///
/// The first point is (0, 0) at threshold +inf; subsequent points lower the
/// threshold through every distinct score, ending at (1, 1).
pub fn roc_curve(scores: &[f64], labels: &[bool]) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let pairs = sorted_pairs(scores, labels);
    let n_pos = labels.iter().filter(|&&t| t).count() as f64;
    let n_neg = labels.len() as f64 - n_pos;

    let mut fpr = vec![0.0];
    let mut tpr = vec![0.0];
    let mut thresh = vec![f64::INFINITY];

    let mut tp = 0.0;
    let mut fp = 0.0;
    let mut i = 0;
    while i < pairs.len() {
        let score = pairs[i].0;
        while i < pairs.len() && pairs[i].0 == score {
            if pairs[i].1 {
                tp += 1.0;
            } else {
                fp += 1.0;
            }
            i += 1;
        }
        fpr.push(fp / n_neg);
        tpr.push(tp / n_pos);
        thresh.push(score);
    }

    (fpr, tpr, thresh)
}

/// Precision-recall curve: (precision, recall, thresholds).
///
/// One point per distinct score, swept descending, plus a final
/// (precision=1, recall=0) endpoint with no threshold entry, so the value
/// arrays are one longer than the threshold array.
pub fn precision_recall_curve(scores: &[f64], labels: &[bool]) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let pairs = sorted_pairs(scores, labels);
    let n_pos = labels.iter().filter(|&&t| t).count() as f64;

    let mut precision = Vec::new();
    let mut recall = Vec::new();
    let mut thresh = Vec::new();

    let mut tp = 0.0;
    let mut fp = 0.0;
    let mut i = 0;
    while i < pairs.len() {
        let score = pairs[i].0;
        while i < pairs.len() && pairs[i].0 == score {
            if pairs[i].1 {
                tp += 1.0;
            } else {
                fp += 1.0;
            }
            i += 1;
        }
        precision.push(tp / (tp + fp));
        recall.push(tp / n_pos);
        thresh.push(score);
    }

    precision.push(1.0);
    recall.push(0.0);

    (precision, recall, thresh)
}

/// Trapezoidal area under a piecewise-linear curve.
pub fn auc(x: &[f64], y: &[f64]) -> f64 {
    x.windows(2)
        .zip(y.windows(2))
        .map(|(xs, ys)| (xs[1] - xs[0]) * (ys[1] + ys[0]) / 2.0)
        .sum()
}
