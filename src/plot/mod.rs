//! Terminal figure renderers.
//!
//! Every figure is rendered to a `String` of box-drawn panels; `print_*`
//! variants write it to stdout. Rendering is a pure transform of
//! already-computed inputs, with no plotting backend and no global state.

pub mod canvas;
mod history;
mod outputs;
mod sample;

pub use canvas::{frame, sparkline, Canvas, Scale, SHADE_RAMP, SPARK_CHARS};
pub use history::{plot_train_history, print_train_history, HistoryOpts};
pub use outputs::{plot_outputs_roc, print_outputs_roc, OutputsOpts};
pub use sample::{draw_sample, print_sample, DrawOptions};
