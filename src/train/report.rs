use std::sync::mpsc;
use std::time::{Duration, Instant};

use serde::{Serialize, Deserialize};
use tracing::{debug, info, trace};

use crate::math::vector::argmax;
use crate::network::network::Network;
use crate::train::epoch_stats::{EpochStats, TrainingLog};

/// Statistics handed to a sink: the running logs and the per-layer
/// activations averaged over the batch that just finished.
#[derive(Debug, Clone, Copy)]
pub struct StatsSnapshot<'a> {
    /// One vector per layer, input layer included.
    pub batch_activations: &'a [Vec<f64>],
    pub log: &'a TrainingLog,
}

/// One previewed sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub predicted: usize,
    pub expected: usize,
    /// Probability of `predicted`; only filled when confidence was requested.
    pub confidence: Option<f64>,
}

/// Receiver for the trainer's periodic reports.
///
/// Sinks observe training; they must not influence it. The trainer produces
/// the same parameters whether or not a sink is attached.
pub trait ReportSink {
    fn plot_stats(&mut self, stats: &StatsSnapshot<'_>);

    fn display_predictions(&mut self, network: &Network, show_confidence: bool);

    fn epoch_finished(&mut self, _stats: &EpochStats) {}
}

/// Discards every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ReportSink for NullSink {
    fn plot_stats(&mut self, _stats: &StatsSnapshot<'_>) {}

    fn display_predictions(&mut self, _network: &Network, _show_confidence: bool) {}
}

/// Runs `network` over a fixed preview set. Works on a clone so the caller's
/// forward state is left as it was.
pub fn preview_predictions(
    network: &Network,
    inputs: &[Vec<f64>],
    labels: &[Vec<f64>],
    show_confidence: bool,
) -> Vec<Prediction> {
    let mut network = network.clone();
    inputs.iter()
        .zip(labels)
        .filter_map(|(x, y)| {
            let predicted = network.predict(x).ok()?;
            let confidence = if show_confidence {
                network.predict_confidence(predicted)
            } else {
                None
            };
            Some(Prediction { predicted, expected: argmax(y), confidence })
        })
        .collect()
}

/// Emits reports as `tracing` events.
#[derive(Debug, Clone, Default)]
pub struct LogSink {
    preview_inputs: Vec<Vec<f64>>,
    preview_labels: Vec<Vec<f64>>,
}

impl LogSink {
    pub fn new(preview_inputs: Vec<Vec<f64>>, preview_labels: Vec<Vec<f64>>) -> LogSink {
        LogSink { preview_inputs, preview_labels }
    }
}

impl ReportSink for LogSink {
    fn plot_stats(&mut self, stats: &StatsSnapshot<'_>) {
        let log = stats.log;
        info!(
            batches = log.loss.len(),
            loss = log.loss.last().copied(),
            train_accuracy = log.train_accuracy.last().copied(),
            test_accuracy = log.test_accuracy.last().copied(),
            "Training statistics."
        );
        for (layer, a) in stats.batch_activations.iter().enumerate() {
            let mean = a.iter().sum::<f64>() / a.len().max(1) as f64;
            debug!(layer, mean_activation = mean, "Batch activation.");
        }
    }

    fn display_predictions(&mut self, network: &Network, show_confidence: bool) {
        let predictions = preview_predictions(
            network,
            &self.preview_inputs,
            &self.preview_labels,
            show_confidence,
        );
        for p in predictions {
            info!(predicted = p.predicted, expected = p.expected, confidence = p.confidence, "Prediction.");
        }
    }

    fn epoch_finished(&mut self, stats: &EpochStats) {
        info!(
            epoch = stats.epoch,
            total_epochs = stats.total_epochs,
            mean_loss = stats.mean_loss,
            train_accuracy = stats.train_accuracy,
            test_accuracy = stats.test_accuracy,
            elapsed_ms = stats.elapsed_ms,
            "Epoch finished."
        );
    }
}

/// Owned report message sent by `ChannelSink`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Report {
    Stats {
        batch_activations: Vec<Vec<f64>>,
        log: TrainingLog,
    },
    Predictions {
        predictions: Vec<Prediction>,
    },
    Epoch(EpochStats),
}

/// Forwards reports over an unbounded channel, typically to a rendering
/// thread. `send` never blocks; once the receiver is dropped further reports
/// are discarded.
#[derive(Debug)]
pub struct ChannelSink {
    tx: mpsc::Sender<Report>,
    preview_inputs: Vec<Vec<f64>>,
    preview_labels: Vec<Vec<f64>>,
    connected: bool,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<Report>) -> ChannelSink {
        ChannelSink { tx, preview_inputs: vec![], preview_labels: vec![], connected: true }
    }

    /// Samples to predict whenever predictions are requested.
    pub fn with_preview(mut self, inputs: Vec<Vec<f64>>, labels: Vec<Vec<f64>>) -> Self {
        self.preview_inputs = inputs;
        self.preview_labels = labels;
        self
    }

    fn send(&mut self, report: Report) {
        if self.connected && self.tx.send(report).is_err() {
            trace!("Report receiver dropped; disabling channel sink.");
            self.connected = false;
        }
    }
}

impl ReportSink for ChannelSink {
    fn plot_stats(&mut self, stats: &StatsSnapshot<'_>) {
        self.send(Report::Stats {
            batch_activations: stats.batch_activations.to_vec(),
            log: stats.log.clone(),
        });
    }

    fn display_predictions(&mut self, network: &Network, show_confidence: bool) {
        let predictions = preview_predictions(
            network,
            &self.preview_inputs,
            &self.preview_labels,
            show_confidence,
        );
        self.send(Report::Predictions { predictions });
    }

    fn epoch_finished(&mut self, stats: &EpochStats) {
        self.send(Report::Epoch(stats.clone()));
    }
}

/// Wall-clock gating of reports. Statistics are due once `stats_interval`
/// has passed since the last statistics report; predictions once
/// `predictions_interval` has passed, and always on the first check.
#[derive(Debug, Clone)]
pub struct ReportCadence {
    stats_interval: Duration,
    predictions_interval: Duration,
    last_stats: Instant,
    last_predictions: Instant,
    predictions_shown: bool,
}

impl ReportCadence {
    pub fn new(stats_interval: Duration, predictions_interval: Duration, start: Instant) -> Self {
        ReportCadence {
            stats_interval,
            predictions_interval,
            last_stats: start,
            last_predictions: start,
            predictions_shown: false,
        }
    }

    /// Returns true, and restarts the statistics timer, if a report is due.
    pub fn stats_due(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last_stats) > self.stats_interval {
            self.last_stats = now;
            trace!("Statistics report due.");
            return true;
        }
        false
    }

    /// Returns true, and restarts the predictions timer, if a report is due.
    pub fn predictions_due(&mut self, now: Instant) -> bool {
        if !self.predictions_shown
            || now.saturating_duration_since(self.last_predictions) > self.predictions_interval
        {
            self.predictions_shown = true;
            self.last_predictions = now;
            trace!("Predictions report due.");
            return true;
        }
        false
    }
}
