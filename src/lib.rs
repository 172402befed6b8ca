pub mod error;
pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod loss;
pub mod optim;
pub mod data;
pub mod train;

// Convenience re-exports
pub use error::{NetworkError, Result};
pub use math::matrix::Matrix;
pub use activation::activation::ActivationFunction;
pub use layers::dense::Layer;
pub use network::{network::Network, shape::LayerShape};
pub use loss::cross_entropy::CrossEntropyLoss;
pub use optim::sgd::Sgd;
pub use data::{dataset::Dataset, synthetic::BlockPatterns};
pub use train::{
    evaluate::evaluate,
    report::{ChannelSink, LogSink, NullSink, Report, ReportSink},
    train_config::TrainConfig,
    trainer::Trainer,
    EpochStats,
};
