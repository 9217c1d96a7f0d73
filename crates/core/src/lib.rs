// Workpool Core - Queue, Worker Pool & Ports
// NO transport or subscriber dependencies (composition happens in the daemon)

pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use error::{AppError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
