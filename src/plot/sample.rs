//! Hit-graph event display: 2D projections with labeled segments.

use crate::graph::{HitGraph, PHI_COL, R_COL, Z_COL};
use crate::plot::canvas::{frame, Canvas, Scale, SHADE_RAMP};
use ndarray::{Array1, Array2};

/// Rendering options for [`draw_sample`].
#[derive(Debug, Clone)]
pub struct DrawOptions {
    /// Shade segments by label value (block-glyph ramp). With `false`, a
    /// two-tone colormap split at 0.5 is used instead.
    pub alpha_labels: bool,
    /// Panel width in cells.
    pub width: usize,
    /// Panel height in cells.
    pub height: usize,
}

impl Default for DrawOptions {
    fn default() -> Self {
        Self {
            alpha_labels: true,
            width: 72,
            height: 18,
        }
    }
}

const HIT_MARK: char = 'o';

/// Render a hit graph as two 2D projections, (z, r) and (phi, r), with one
/// line segment per graph edge. Segment endpoint coordinates are derived
/// from the incidence matrices by column lookup.
pub fn draw_sample(
    x: &Array2<f32>,
    ri: &Array2<f32>,
    ro: &Array2<f32>,
    y: &Array1<f32>,
    opts: &DrawOptions,
) -> String {
    let graph = HitGraph {
        x: x.clone(),
        ri: ri.clone(),
        ro: ro.clone(),
        y: y.clone(),
    };
    let endpoints = graph.segment_endpoints();

    let mut out = projection_panel(&graph, &endpoints, Z_COL, "r vs z", "x: z  y: r", opts);
    out.push('\n');
    out.push_str(&projection_panel(
        &graph,
        &endpoints,
        PHI_COL,
        "r vs phi",
        "x: phi  y: r",
        opts,
    ));
    out
}

/// Print the figure to stdout.
pub fn print_sample(
    x: &Array2<f32>,
    ri: &Array2<f32>,
    ro: &Array2<f32>,
    y: &Array1<f32>,
    opts: &DrawOptions,
) {
    print!("{}", draw_sample(x, ri, ro, y, opts));
}

fn projection_panel(
    graph: &HitGraph,
    endpoints: &[(usize, usize)],
    x_col: usize,
    title: &str,
    footer: &str,
    opts: &DrawOptions,
) -> String {
    let mut canvas = Canvas::new(opts.width, opts.height);

    let x_scale = Scale::from_values(graph.x.column(x_col).iter().map(|&v| f64::from(v)));
    let r_scale = Scale::from_values(graph.x.column(R_COL).iter().map(|&v| f64::from(v)));
    let (Some(x_scale), Some(r_scale)) = (x_scale, r_scale) else {
        return frame(title, "(empty event)", footer);
    };

    let cell_of = |hit: usize| {
        (
            x_scale.project(f64::from(graph.x[(hit, x_col)]), opts.width),
            r_scale.project_flipped(f64::from(graph.x[(hit, R_COL)]), opts.height),
        )
    };

    // Segments first so hit marks stay visible on top.
    for (seg, &(source, target)) in endpoints.iter().enumerate() {
        let Some(mark) = segment_mark(graph.y[seg], opts.alpha_labels) else {
            continue;
        };
        canvas.line(cell_of(source), cell_of(target), mark);
    }

    for hit in 0..graph.n_hits() {
        let (col, row) = cell_of(hit);
        canvas.set(col, row, HIT_MARK);
    }

    frame(title, &canvas.render(), footer)
}

/// Glyph for a segment with label `value`, or `None` when the label shades
/// to invisibility.
fn segment_mark(value: f32, alpha_labels: bool) -> Option<char> {
    if alpha_labels {
        let steps = (SHADE_RAMP.len() - 1) as f32;
        let idx = (value.clamp(0.0, 1.0) * steps).round() as usize;
        (idx > 0).then(|| SHADE_RAMP[idx.min(SHADE_RAMP.len() - 1)])
    } else if value >= 0.5 {
        Some('█')
    } else {
        Some('░')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn event() -> (Array2<f32>, Array2<f32>, Array2<f32>, Array1<f32>) {
        // Three hits at increasing radius, two segments: real then fake.
        let x = array![[1.0, 0.1, 10.0], [2.0, 0.2, 20.0], [3.0, 0.3, 30.0]];
        let ri = array![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]];
        let ro = array![[1.0, 0.0], [0.0, 1.0], [0.0, 0.0]];
        let y = array![1.0, 0.0];
        (x, ri, ro, y)
    }

    #[test]
    fn test_draw_sample_has_both_projections() {
        let (x, ri, ro, y) = event();
        let figure = draw_sample(&x, &ri, &ro, &y, &DrawOptions::default());
        assert!(figure.contains("┌─ r vs z"));
        assert!(figure.contains("┌─ r vs phi"));
        assert!(figure.contains("x: phi  y: r"));
    }

    #[test]
    fn test_draw_sample_marks_hits() {
        let (x, ri, ro, y) = event();
        let figure = draw_sample(&x, &ri, &ro, &y, &DrawOptions::default());
        assert!(figure.matches(HIT_MARK).count() >= 6);
    }

    #[test]
    fn test_alpha_mode_skips_zero_labels() {
        assert_eq!(segment_mark(0.0, true), None);
        assert_eq!(segment_mark(0.1, true), None);
        assert_eq!(segment_mark(1.0, true), Some('█'));
        assert!(segment_mark(0.5, true).is_some());
    }

    #[test]
    fn test_cmap_mode_two_tone() {
        assert_eq!(segment_mark(0.9, false), Some('█'));
        assert_eq!(segment_mark(0.1, false), Some('░'));
    }

    #[test]
    fn test_real_segment_rendered_in_alpha_mode() {
        let (x, ri, ro, y) = event();
        let figure = draw_sample(&x, &ri, &ro, &y, &DrawOptions::default());
        // The label-1.0 segment draws with the solid glyph.
        assert!(figure.contains('█'));
    }

    #[test]
    fn test_empty_event() {
        let x = Array2::<f32>::zeros((0, 3));
        let ri = Array2::<f32>::zeros((0, 0));
        let ro = Array2::<f32>::zeros((0, 0));
        let y = Array1::<f32>::zeros(0);
        let figure = draw_sample(&x, &ri, &ro, &y, &DrawOptions::default());
        assert!(figure.contains("empty event"));
    }
}
