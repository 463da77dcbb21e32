//! Device drivers using platform abstraction

pub mod rfm69;

pub use rfm69::Rfm69Driver;
