//! Workpool SDK - Rust Client Library
//!
//! Typed client for the daemon's JSON-RPC queue API.
//!
//! # Example
//!
//! ```no_run
//! use workpool_sdk::WorkpoolClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = WorkpoolClient::connect("http://127.0.0.1:9527").await?;
//!
//!     let response = client.enqueue(2).await?;
//!     println!("{} (queue size {})", response.message, response.queue_size);
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod types;

pub use client::WorkpoolClient;
pub use error::{Result, SdkError};
pub use types::{EnqueueResponse, ProcessorStats, QueueSizeResponse, StatsResponse};
