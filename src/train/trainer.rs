use std::time::Instant;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::data::dataset::Dataset;
use crate::error::{NetworkError, Result};
use crate::network::network::Network;
use crate::optim::sgd::Sgd;
use crate::train::epoch_stats::{EpochStats, TrainingLog};
use crate::train::evaluate::evaluate;
use crate::train::report::{NullSink, ReportCadence, ReportSink, StatsSnapshot};
use crate::train::train_config::TrainConfig;

/// Mini-batch SGD driver for a `Network`.
///
/// Owns the network, the data, the random source and the running logs.
/// Reports go to an injected `ReportSink` (a `NullSink` by default).
pub struct Trainer {
    network: Network,
    dataset: Dataset,
    config: TrainConfig,
    rng: StdRng,
    log: TrainingLog,
    batch_activations: Vec<Vec<f64>>,
    sink: Box<dyn ReportSink>,
}

impl Trainer {
    /// Builds a freshly initialized network from `config.shape`.
    pub fn new(config: TrainConfig, dataset: Dataset) -> Result<Trainer> {
        config.validate()?;
        let mut rng = seeded_rng(config.seed);
        let network = Network::new(config.shape.clone(), config.activation, &mut rng)?;
        Trainer::assemble(network, dataset, config, rng)
    }

    /// Trains an existing network. `config.shape` and `config.activation` are
    /// replaced by the network's own.
    pub fn with_network(network: Network, dataset: Dataset, mut config: TrainConfig) -> Result<Trainer> {
        config.validate()?;
        config.shape = network.shape().clone();
        config.activation = network.activation();
        let rng = seeded_rng(config.seed);
        Trainer::assemble(network, dataset, config, rng)
    }

    fn assemble(network: Network, dataset: Dataset, config: TrainConfig, rng: StdRng) -> Result<Trainer> {
        dataset.check_shape(network.shape())?;
        let batch_activations = network.shape().sizes().iter().map(|&s| vec![0.0; s]).collect();
        Ok(Trainer {
            network,
            dataset,
            config,
            rng,
            log: TrainingLog::default(),
            batch_activations,
            sink: Box::new(NullSink),
        })
    }

    pub fn with_sink(mut self, sink: impl ReportSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn network_mut(&mut self) -> &mut Network {
        &mut self.network
    }

    pub fn into_network(self) -> Network {
        self.network
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    pub fn log(&self) -> &TrainingLog {
        &self.log
    }

    /// Accuracy estimate on `n` random training samples.
    pub fn evaluate_train(&mut self, n: usize) -> Result<f64> {
        evaluate(&mut self.network, &self.dataset.train_inputs, &self.dataset.train_labels, n, &mut self.rng)
    }

    /// Accuracy estimate on `n` random test samples.
    pub fn evaluate_test(&mut self, n: usize) -> Result<f64> {
        evaluate(&mut self.network, &self.dataset.test_inputs, &self.dataset.test_labels, n, &mut self.rng)
    }

    /// Trains with the hyperparameters stored in the config.
    pub fn run(&mut self) -> Result<f64> {
        let (batch_size, learning_rate, epochs) =
            (self.config.batch_size, self.config.learning_rate, self.config.epochs);
        self.train(batch_size, learning_rate, epochs)
    }

    /// Runs `epochs` epochs of mini-batch SGD and returns the mean batch loss
    /// of the last completed epoch (0.0 if no batch ran).
    ///
    /// Each epoch shuffles all training indices, records accuracy estimates,
    /// then walks `floor(N / batch_size)` contiguous slices of the
    /// permutation. Gradients are summed over a batch and applied once at its
    /// end, scaled by `learning_rate` only.
    pub fn train(&mut self, batch_size: usize, learning_rate: f64, epochs: usize) -> Result<f64> {
        if batch_size == 0 {
            return Err(NetworkError::Configuration("batch_size must be at least 1".into()));
        }
        if !learning_rate.is_finite() {
            return Err(NetworkError::Configuration("learning_rate must be finite".into()));
        }

        let n = self.dataset.train_len();
        let num_batches = n / batch_size;
        if num_batches == 0 {
            warn!(n, batch_size, "Batch size exceeds the training set; no batches will run.");
        }

        let optimizer = Sgd::new(learning_rate);
        let eval_samples = self.config.eval_samples;
        let mut cadence = ReportCadence::new(
            self.config.stats_interval()?,
            self.config.predictions_interval()?,
            Instant::now(),
        );
        let mut permutation: Vec<usize> = (0..n).collect();
        let mut last_loss = 0.0;

        info!(n, batch_size, learning_rate, epochs, num_batches, "Training started.");

        for epoch in 1..=epochs {
            let t_start = Instant::now();
            permutation.shuffle(&mut self.rng);

            let test_accuracy = self.evaluate_test(eval_samples)?;
            let train_accuracy = self.evaluate_train(eval_samples)?;
            self.log.test_accuracy.push(test_accuracy);
            self.log.train_accuracy.push(train_accuracy);

            let mut epoch_loss = 0.0;
            for (k, batch) in batch_slices(&permutation, batch_size).enumerate() {
                let batch_loss = self.run_batch(batch, &optimizer)? / batch_size as f64;
                self.log.loss.push(batch_loss);
                epoch_loss += batch_loss;
                debug!(epoch, batch = k, loss = batch_loss, "Batch finished.");

                self.report(&mut cadence);
                self.reset_batch_activations();
            }

            let mean_loss = if num_batches > 0 { epoch_loss / num_batches as f64 } else { 0.0 };
            let stats = EpochStats {
                epoch,
                total_epochs: epochs,
                mean_loss,
                train_accuracy: self.evaluate_train(eval_samples)?,
                test_accuracy: self.evaluate_test(eval_samples)?,
                batches: num_batches,
                samples_seen: num_batches * batch_size,
                elapsed_ms: t_start.elapsed().as_millis() as u64,
            };
            info!(
                epoch,
                mean_loss,
                train_accuracy = stats.train_accuracy,
                test_accuracy = stats.test_accuracy,
                elapsed_ms = stats.elapsed_ms,
                "Epoch finished."
            );
            self.sink.epoch_finished(&stats);
            last_loss = mean_loss;
        }

        Ok(last_loss)
    }

    /// Forward/backward over one batch followed by a single parameter update.
    /// Returns the summed loss of the batch.
    fn run_batch(&mut self, indices: &[usize], optimizer: &Sgd) -> Result<f64> {
        self.network.zero_gradients();

        let scale = 1.0 / indices.len() as f64;
        let mut batch_loss = 0.0;
        for &idx in indices {
            let x = &self.dataset.train_inputs[idx];
            let y = &self.dataset.train_labels[idx];

            self.network.forward(x)?;
            self.network.backward(y)?;
            batch_loss += Network::loss(self.network.output(), y);

            for (l, acc) in self.batch_activations.iter_mut().enumerate() {
                for (a, v) in acc.iter_mut().zip(self.network.activations(l)) {
                    *a += v * scale;
                }
            }
        }

        optimizer.update(&mut self.network);
        Ok(batch_loss)
    }

    fn report(&mut self, cadence: &mut ReportCadence) {
        let now = Instant::now();
        if cadence.stats_due(now) {
            self.sink.plot_stats(&StatsSnapshot {
                batch_activations: &self.batch_activations,
                log: &self.log,
            });
        }
        if cadence.predictions_due(now) {
            self.sink.display_predictions(&self.network, true);
        }
    }

    fn reset_batch_activations(&mut self) {
        for acc in self.batch_activations.iter_mut() {
            acc.iter_mut().for_each(|a| *a = 0.0);
        }
    }
}

/// The mini-batches of one epoch: contiguous `batch_size` slices of
/// `permutation`. The trailing `len % batch_size` indices are not visited.
pub fn batch_slices(permutation: &[usize], batch_size: usize) -> std::slice::ChunksExact<'_, usize> {
    permutation.chunks_exact(batch_size)
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => {
            info!(seed, "Seeding training rng.");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    }
}
