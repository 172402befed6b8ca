pub mod trainer;
pub mod epoch_stats;
pub mod evaluate;
pub mod report;
pub mod train_config;

pub use trainer::{Trainer, batch_slices};
pub use epoch_stats::{EpochStats, TrainingLog};
pub use evaluate::evaluate;
pub use report::{ChannelSink, LogSink, NullSink, Prediction, Report, ReportCadence, ReportSink, StatsSnapshot};
pub use train_config::TrainConfig;
