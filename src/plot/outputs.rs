//! Output-score histogram and ROC curve figure.

use crate::metrics::{concat_batches, Metrics};
use crate::plot::canvas::{frame, Canvas, Scale};
use ndarray::Array1;

/// Layout options for [`plot_outputs_roc`].
#[derive(Debug, Clone)]
pub struct OutputsOpts {
    /// Histogram bin count over [0, 1].
    pub bins: usize,
    /// Histogram bar width in cells.
    pub bar_width: usize,
    /// ROC panel width and height in cells.
    pub roc_width: usize,
    pub roc_height: usize,
}

impl Default for OutputsOpts {
    fn default() -> Self {
        Self {
            bins: 25,
            bar_width: 24,
            roc_width: 48,
            roc_height: 16,
        }
    }
}

/// Render the two-panel model-outputs figure: a log-scaled histogram of the
/// scores split into `real` / `fake` by the thresholded target, and the ROC
/// curve with its chance diagonal.
pub fn plot_outputs_roc(
    preds: &[Array1<f32>],
    targets: &[Array1<f32>],
    metrics: &Metrics,
    opts: &OutputsOpts,
) -> String {
    let scores = concat_batches(preds);
    let labels: Vec<bool> = concat_batches(targets).iter().map(|&t| t > 0.5).collect();

    let mut out = frame(
        "Model output",
        &histogram_body(&scores, &labels, opts),
        "bars: log-scaled counts per score bin",
    );
    out.push('\n');
    out.push_str(&frame(
        &format!("ROC curve, AUC = {:.3}", metrics.roc_auc),
        &roc_body(metrics, opts),
        "x: false positive rate  y: true positive rate  ·: chance",
    ));
    out
}

/// Print the figure to stdout.
pub fn print_outputs_roc(
    preds: &[Array1<f32>],
    targets: &[Array1<f32>],
    metrics: &Metrics,
    opts: &OutputsOpts,
) {
    print!("{}", plot_outputs_roc(preds, targets, metrics, opts));
}

fn histogram_body(scores: &Array1<f32>, labels: &[bool], opts: &OutputsOpts) -> String {
    let bins = opts.bins.max(1);
    let mut fake = vec![0usize; bins];
    let mut real = vec![0usize; bins];

    for (&score, &label) in scores.iter().zip(labels.iter()) {
        let bin = ((f64::from(score) * bins as f64) as usize).min(bins - 1);
        if label {
            real[bin] += 1;
        } else {
            fake[bin] += 1;
        }
    }

    let max_count = fake.iter().chain(real.iter()).copied().max().unwrap_or(0);
    let mut body = String::new();
    body.push_str(&format!(
        "{:>12}  {:<width$} {:>5}  {:<width$} {:>5}\n",
        "bin",
        "fake",
        "",
        "real",
        "",
        width = opts.bar_width,
    ));
    for bin in 0..bins {
        let lo = bin as f64 / bins as f64;
        let hi = (bin + 1) as f64 / bins as f64;
        body.push_str(&format!(
            "[{lo:.2}, {hi:.2})  {:<width$} {:>5}  {:<width$} {:>5}\n",
            log_bar(fake[bin], max_count, opts.bar_width),
            fake[bin],
            log_bar(real[bin], max_count, opts.bar_width),
            real[bin],
            width = opts.bar_width,
        ));
    }
    body
}

/// Bar length on a log scale, so a single entry is still visible next to
/// dominant bins.
fn log_bar(count: usize, max_count: usize, width: usize) -> String {
    if count == 0 || max_count == 0 {
        return String::new();
    }
    let scaled = (count as f64 + 1.0).ln() / (max_count as f64 + 1.0).ln();
    let len = ((scaled * width as f64).round() as usize).clamp(1, width);
    "█".repeat(len)
}

fn roc_body(metrics: &Metrics, opts: &OutputsOpts) -> String {
    let mut canvas = Canvas::new(opts.roc_width, opts.roc_height);
    let scale = Scale::new(0.0, 1.0);
    let width = canvas.width();
    let height = canvas.height();

    // Chance diagonal underneath the curve.
    canvas.line(
        (0, scale.project_flipped(0.0, height)),
        (width - 1, scale.project_flipped(1.0, height)),
        '·',
    );

    let mut prev: Option<(usize, usize)> = None;
    for (&fpr, &tpr) in metrics.roc_fpr.iter().zip(metrics.roc_tpr.iter()) {
        let cell = (
            scale.project(fpr, width),
            scale.project_flipped(tpr, height),
        );
        match prev {
            Some(p) => canvas.line(p, cell, '*'),
            None => canvas.set(cell.0, cell.1, '*'),
        }
        prev = Some(cell);
    }

    canvas.render()
}
