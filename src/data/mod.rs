pub mod dataset;
pub mod synthetic;

pub use dataset::{Dataset, one_hot, scale_pixels};
pub use synthetic::BlockPatterns;
