// Port Layer - Interfaces the core calls out through

pub mod item_processor;

// Re-exports
pub use item_processor::{ItemProcessor, ProcessError};
