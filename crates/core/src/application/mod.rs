// Application Layer - Processor, registry and use cases

pub mod processor;
pub mod registry;
pub mod submission;

// Re-exports
pub use processor::{FaultPolicy, LifecycleState, Processor, ProcessorConfig, ProcessorStats};
pub use registry::ProcessorRegistry;
pub use submission::SubmissionService;
