// Demo driver: trains the default network on synthetic block-pattern digits.
// The library (src/lib.rs) has no opinion on where real data comes from.
//
//   cargo run --release -- [config.json]
use std::env;
use std::process;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info};
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::format;

use backprop_nn::{BlockPatterns, Dataset, LogSink, Result, TrainConfig, Trainer};

const TRAIN_PER_CLASS: usize = 500;
const TEST_PER_CLASS: usize = 100;
const PREVIEW_SAMPLES: usize = 10;

fn main() {
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .event_format(format().with_target(false))
        .init();

    if let Err(e) = run(env::args().nth(1)) {
        error!(%e, "Training failed.");
        process::exit(1);
    }
}

fn run(config_path: Option<String>) -> Result<()> {
    let config = match config_path {
        Some(path) => {
            info!(%path, "Loading config.");
            TrainConfig::load_json(&path)?
        }
        None => TrainConfig::default(),
    };

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let patterns = BlockPatterns::new(config.shape.output_size(), config.shape.input_size())
        .with_noise(0.3);
    let (train_x, train_y) = patterns.generate(TRAIN_PER_CLASS, &mut rng)?;
    let (test_x, test_y) = patterns.generate(TEST_PER_CLASS, &mut rng)?;

    let preview_x = test_x.iter().take(PREVIEW_SAMPLES).cloned().collect();
    let preview_y = test_y.iter().take(PREVIEW_SAMPLES).cloned().collect();
    let dataset = Dataset::new(train_x, train_y, test_x, test_y)?;
    info!(train = dataset.train_len(), test = dataset.test_len(), "Generated block-pattern dataset.");

    let mut trainer = Trainer::new(config, dataset)?
        .with_sink(LogSink::new(preview_x, preview_y));
    let final_loss = trainer.run()?;

    let test_samples = trainer.dataset().test_len();
    let test_accuracy = trainer.evaluate_test(test_samples)?;
    info!(final_loss, test_accuracy, "Training complete.");
    Ok(())
}
