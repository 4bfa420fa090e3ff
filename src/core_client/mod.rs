pub mod client;
pub mod error;

pub use client::{Client, Reply, Transfer};
pub use error::ClientError;
