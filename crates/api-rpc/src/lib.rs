//! JSON-RPC API Layer
//!
//! Maps JSON-RPC 2.0 calls onto processor submission and queue-size queries.

pub mod error;
pub mod handler;
pub mod server;
pub mod types;

pub use server::{RpcServer, RunningServer};
