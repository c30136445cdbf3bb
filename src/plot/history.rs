//! Training-history figure: loss curves and validation accuracy.

use crate::plot::canvas::{frame, sparkline, Canvas, Scale};
use crate::summary::EpochSummary;

/// Layout options for [`plot_train_history`].
#[derive(Debug, Clone)]
pub struct HistoryOpts {
    /// Panel width in cells.
    pub width: usize,
    /// Panel height in cells.
    pub height: usize,
}

impl Default for HistoryOpts {
    fn default() -> Self {
        Self {
            width: 64,
            height: 14,
        }
    }
}

const TRAIN_MARK: char = '*';
const VALID_MARK: char = 'o';

/// Render the two-panel training-history figure.
///
/// Panel 0: train and validation loss per epoch. Panel 1: validation
/// accuracy per epoch, with the y-range pinned to [0, 1].
pub fn plot_train_history(summaries: &[EpochSummary], opts: &HistoryOpts) -> String {
    if summaries.is_empty() {
        return String::from("(no training summaries)\n");
    }

    let epochs: Vec<f64> = summaries.iter().map(|s| s.epoch as f64).collect();
    let train_loss: Vec<f64> = summaries.iter().map(|s| s.train_loss).collect();
    let valid_loss: Vec<f64> = summaries.iter().map(|s| s.valid_loss).collect();
    let valid_acc: Vec<f64> = summaries.iter().map(|s| s.valid_acc).collect();

    let x_scale = Scale::new(epochs[0], epochs[epochs.len() - 1]);
    let loss_scale = Scale::from_values(train_loss.iter().chain(valid_loss.iter()).copied())
        .expect("summaries are non-empty");

    let mut loss_panel = Canvas::new(opts.width, opts.height);
    draw_series(&mut loss_panel, &x_scale, &loss_scale, &epochs, &train_loss, TRAIN_MARK);
    draw_series(&mut loss_panel, &x_scale, &loss_scale, &epochs, &valid_loss, VALID_MARK);

    // Accuracy lives in [0, 1] regardless of the observed values.
    let acc_scale = Scale::new(0.0, 1.0);
    let mut acc_panel = Canvas::new(opts.width, opts.height);
    draw_series(&mut acc_panel, &x_scale, &acc_scale, &epochs, &valid_acc, VALID_MARK);

    let mut out = frame(
        "Loss",
        &loss_panel.render(),
        &format!(
            "x: epoch [{:.0}, {:.0}]  y: loss [{:.3}, {:.3}]  {TRAIN_MARK}: train  {VALID_MARK}: validation",
            x_scale.min(),
            x_scale.max(),
            loss_scale.min(),
            loss_scale.max(),
        ),
    );
    out.push_str(&format!("  valid loss {}\n\n", sparkline(&valid_loss, opts.width.min(32))));
    out.push_str(&frame(
        "Accuracy",
        &acc_panel.render(),
        &format!(
            "x: epoch [{:.0}, {:.0}]  y: accuracy [0, 1]  {VALID_MARK}: validation",
            x_scale.min(),
            x_scale.max(),
        ),
    ));
    out
}

/// Print the figure to stdout.
pub fn print_train_history(summaries: &[EpochSummary], opts: &HistoryOpts) {
    print!("{}", plot_train_history(summaries, opts));
}

fn draw_series(
    canvas: &mut Canvas,
    x_scale: &Scale,
    y_scale: &Scale,
    xs: &[f64],
    ys: &[f64],
    mark: char,
) {
    let width = canvas.width();
    let height = canvas.height();
    let mut prev: Option<(usize, usize)> = None;
    for (&x, &y) in xs.iter().zip(ys.iter()) {
        let cell = (
            x_scale.project(x, width),
            y_scale.project_flipped(y, height),
        );
        match prev {
            Some(p) => canvas.line(p, cell, mark),
            None => canvas.set(cell.0, cell.1, mark),
        }
        prev = Some(cell);
    }
}
