use serde::{Serialize, Deserialize};

/// Per-epoch training statistics.
///
/// The trainer hands one `EpochStats` value to its report sink at the end of
/// every completed epoch. Accuracies are estimates from randomly drawn
/// samples taken after the epoch's last parameter update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Total epochs requested for this run.
    pub total_epochs: usize,
    /// Mean of the per-batch mean losses of this epoch.
    pub mean_loss: f64,
    pub train_accuracy: f64,
    pub test_accuracy: f64,
    /// Mini-batches processed, `floor(N / batch_size)`.
    pub batches: usize,
    /// Samples visited; the trailing `N mod batch_size` are skipped.
    pub samples_seen: usize,
    /// Wall-clock duration of this single epoch in milliseconds.
    pub elapsed_ms: u64,
}

/// Append-only logs kept across a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingLog {
    /// Mean loss of every mini-batch, in order.
    pub loss: Vec<f64>,
    /// Accuracy estimates taken at the start of every epoch.
    pub train_accuracy: Vec<f64>,
    pub test_accuracy: Vec<f64>,
}
