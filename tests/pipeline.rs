//! End-to-end analysis pipeline over a synthetic training run.
//!
//! Builds a full run layout on disk (config YAML, summary CSV, checkpoint,
//! event files) and walks the whole notebook flow: load config, load
//! summaries, reload the model, build the test loader, run inference,
//! compute metrics, render figures.

use ndarray::{array, Array1};
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use trazar::model::{checkpoint_path, save_checkpoint, Checkpoint, SegmentClassifier, SegmentClassifierConfig};
use trazar::plot::{DrawOptions, HistoryOpts, OutputsOpts};
use trazar::{
    apply_model, compute_metrics, load_config, load_model, load_summaries, test_data_loader,
    HitGraph, Model, DEFAULT_THRESHOLD,
};

const RELOAD_EPOCH: usize = 10;
const N_EVENTS: usize = 8;
const N_TEST: usize = 4;

fn event(tag: f32) -> HitGraph {
    HitGraph {
        x: array![
            [1.0, 0.1, 10.0 + tag],
            [2.0, 0.2, 20.0 + tag],
            [3.0, 0.3, 30.0 + tag],
            [4.0, 0.4, 40.0 + tag]
        ],
        ri: array![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0]
        ],
        ro: array![
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
            [0.0, 0.0, 0.0]
        ],
        y: array![1.0, 0.0, 1.0],
    }
}

fn write_run(root: &Path) -> std::path::PathBuf {
    let output_dir = root.join("run_01");
    let input_dir = root.join("hitgraphs");
    fs::create_dir_all(&output_dir).expect("output dir");
    fs::create_dir_all(&input_dir).expect("input dir");

    // Summary table.
    let mut csv = String::from("epoch,train_loss,valid_loss,valid_acc\n");
    for epoch in 0..=RELOAD_EPOCH {
        csv.push_str(&format!(
            "{epoch},{:.4},{:.4},{:.4}\n",
            0.7 - 0.05 * epoch as f64,
            0.72 - 0.045 * epoch as f64,
            0.5 + 0.04 * epoch as f64,
        ));
    }
    fs::write(output_dir.join("summaries_0.csv"), csv).expect("summaries");

    // Checkpoint from a reference model with the same hyperparameters the
    // config carries.
    let reference = SegmentClassifier::new(SegmentClassifierConfig {
        input_dim: 3,
        hidden_dim: 8,
        n_iters: 2,
    });
    save_checkpoint(
        &checkpoint_path(&output_dir, RELOAD_EPOCH),
        &Checkpoint {
            model: reference.state_dict(),
            epoch: Some(RELOAD_EPOCH),
        },
    )
    .expect("checkpoint");

    // Event files.
    for i in 0..N_EVENTS {
        event(i as f32)
            .to_file(input_dir.join(format!("event_{i:06}.json")))
            .expect("event file");
    }

    // Config, with training-only keys present to exercise stripping.
    let config_path = root.join("segclf.yaml");
    fs::write(
        &config_path,
        format!(
            "output_dir: {}\n\
             data:\n\
             \x20 input_dir: {}\n\
             \x20 n_test: {N_TEST}\n\
             model:\n\
             \x20 name: segment_classifier\n\
             \x20 hidden_dim: 8\n\
             \x20 n_iters: 2\n\
             \x20 optimizer: Adam\n\
             \x20 learning_rate: 0.001\n\
             \x20 loss_func: binary_cross_entropy\n",
            output_dir.display(),
            input_dir.display(),
        ),
    )
    .expect("config");
    config_path
}

#[test]
fn full_analysis_flow() {
    let root = TempDir::new().expect("temp dir");
    let config_path = write_run(root.path());

    let config = load_config(&config_path).expect("config");
    assert_eq!(config.data.n_test, N_TEST);

    let summaries = load_summaries(&config).expect("summaries");
    assert_eq!(summaries.len(), RELOAD_EPOCH + 1);

    let model = load_model(&config, RELOAD_EPOCH).expect("model");
    assert_eq!(model.name(), "segment_classifier");

    let loader = test_data_loader(&config, config.data.n_test).expect("loader");
    assert_eq!(loader.len(), N_TEST);

    let (preds, targets) = apply_model(model.as_ref(), &loader).expect("inference");
    assert_eq!(preds.len(), N_TEST);
    assert_eq!(targets.len(), N_TEST);
    for (p, t) in preds.iter().zip(targets.iter()) {
        assert_eq!(p.len(), 3);
        assert_eq!(t.len(), 3);
        assert!(p.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    let metrics = compute_metrics(&preds, &targets, DEFAULT_THRESHOLD).expect("metrics");
    assert!((0.0..=1.0).contains(&metrics.accuracy));
    assert!((0.0..=1.0).contains(&metrics.roc_auc));

    // Figures render without panicking and carry their fixed titles.
    let history = trazar::plot_train_history(&summaries, &HistoryOpts::default());
    assert!(history.contains("┌─ Loss"));
    assert!(history.contains("┌─ Accuracy"));

    let outputs = trazar::plot_outputs_roc(&preds, &targets, &metrics, &OutputsOpts::default());
    assert!(outputs.contains("ROC curve, AUC ="));

    let sample = loader.iter().next().expect("one batch").expect("batch");
    let figure = trazar::draw_sample(
        &sample.inputs.x,
        &sample.inputs.ri,
        &sample.inputs.ro,
        &sample.inputs.y,
        &DrawOptions::default(),
    );
    assert!(figure.contains("┌─ r vs z"));
    assert!(figure.contains("┌─ r vs phi"));
}

#[test]
fn reload_is_reproducible() {
    let root = TempDir::new().expect("temp dir");
    let config_path = write_run(root.path());
    let config = load_config(&config_path).expect("config");

    let model_a = load_model(&config, RELOAD_EPOCH).expect("model");
    let model_b = load_model(&config, RELOAD_EPOCH).expect("model");

    let graph = event(0.0);
    assert_eq!(model_a.forward(&graph), model_b.forward(&graph));
}

#[test]
fn missing_epoch_fails_cleanly() {
    let root = TempDir::new().expect("temp dir");
    let config_path = write_run(root.path());
    let config = load_config(&config_path).expect("config");

    let err = load_model(&config, 99).expect_err("no such checkpoint");
    assert!(err.to_string().contains("model_checkpoint_099.json"));
}

#[test]
fn config_paths_expand_environment() {
    let root = TempDir::new().expect("temp dir");
    write_run(root.path());

    std::env::set_var("TRAZAR_PIPELINE_ROOT", root.path());
    let config_path = root.path().join("env.yaml");
    fs::write(
        &config_path,
        "output_dir: $TRAZAR_PIPELINE_ROOT/run_01\n\
         data:\n\
         \x20 input_dir: ${TRAZAR_PIPELINE_ROOT}/hitgraphs\n\
         model:\n\
         \x20 name: segment_classifier\n",
    )
    .expect("config");

    let config = load_config(&config_path).expect("config");
    assert_eq!(config.output_dir(), root.path().join("run_01"));
    assert_eq!(config.input_dir(), root.path().join("hitgraphs"));

    let summaries = load_summaries(&config).expect("summaries resolve through env");
    assert!(!summaries.is_empty());
    std::env::remove_var("TRAZAR_PIPELINE_ROOT");
}

#[test]
fn preds_and_targets_line_up() {
    let root = TempDir::new().expect("temp dir");
    let config_path = write_run(root.path());
    let config = load_config(&config_path).expect("config");

    let model = load_model(&config, RELOAD_EPOCH).expect("model");
    let loader = test_data_loader(&config, 2).expect("loader");

    let (preds, targets) = apply_model(model.as_ref(), &loader).expect("inference");
    assert_eq!(preds.len(), 2);

    // Targets must be exactly the event labels, in loader order (the last
    // two events of the dataset).
    let expected: Array1<f32> = array![1.0, 0.0, 1.0];
    for t in &targets {
        assert_eq!(t, &expected);
    }
}
