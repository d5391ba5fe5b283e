use miette::Diagnostic;
use thiserror::Error;

/// Distinguished failures produced by the resolution procedure. These are
/// carried as rejection reasons (wrapped in [`crate::value::Value::Error`]),
/// never raised as host-level errors.
#[derive(Debug, Error, Diagnostic)]
pub enum FutureError {
    #[error("chaining cycle detected: future #{id} cannot adopt itself")]
    ChainingCycle { id: u64 },

    #[error("nested adoption exceeded {limit} levels")]
    AdoptionDepthExceeded { limit: usize },
}
