use std::fmt::Display;

use thiserror::Error;

/// Failure modes of the engine.
///
/// Lookup misses are deliberately *not* errors: `extract`, `get` and the
/// glob search report absence through `Option`/empty results. `Error` is
/// reserved for malformed input, unsupported host data and resource
/// guards.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed JSON text. Carries serde_json's position and
    /// expected-token context.
    #[error(transparent)]
    Decode(#[from] serde_json::Error),

    /// Ingestion saw a host kind with no canonical mapping.
    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    /// A self-referential structure was found while ingesting,
    /// comparing or deep-cloning.
    #[error("cycle detected at depth {depth}")]
    CycleDetected { depth: usize },

    /// A path walk exceeded the configured segment count.
    #[error("max depth {0} reached")]
    MaxDepth(usize),

    /// A path walk saw an index above the configured bound.
    #[error("max index {0} reached")]
    MaxIndex(u64),

    /// A glob pattern did not compile to a key matcher.
    #[error("invalid glob pattern {pattern:?}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Free-form message raised through serde's error hook.
    #[error("{0}")]
    Message(String),
}

impl serde::ser::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}
