// Panic isolation for processing callbacks
use std::any::Any;
use std::panic::{catch_unwind, UnwindSafe};

/// Result of a panic-guarded execution
#[derive(Debug)]
pub(crate) enum PanicGuardResult<T> {
    /// Execution completed (the value may itself be an error)
    Success(T),
    /// Execution panicked, with the panic message
    Panicked(String),
}

/// Execute a closure with panic isolation
///
/// A panic inside `f` is caught and returned as `PanicGuardResult::Panicked`
/// instead of unwinding through the worker.
///
/// # Example
/// ```text
/// match execute_guarded(|| panic!("bad item")) {
///     PanicGuardResult::Panicked(msg) => assert_eq!(msg, "bad item"),
///     PanicGuardResult::Success(_) => unreachable!(),
/// }
/// ```
pub(crate) fn execute_guarded<F, T>(f: F) -> PanicGuardResult<T>
where
    F: FnOnce() -> T + UnwindSafe,
{
    match catch_unwind(f) {
        Ok(result) => PanicGuardResult::Success(result),
        Err(payload) => PanicGuardResult::Panicked(panic_message(payload.as_ref())),
    }
}

/// Readable message for a panic payload
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
