pub mod network;
pub mod shape;

pub use network::Network;
pub use shape::LayerShape;
