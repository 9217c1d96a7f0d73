// Domain Layer - Pure data structures and entities

pub mod error;
pub mod message;
pub mod queue;

// Re-exports
pub use error::DomainError;
pub use message::Message;
pub use queue::Queue;
