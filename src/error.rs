use thiserror::Error;

/// Everything the invoker can report. Faults inside native code are not here:
/// they take the process down before anything could be returned.
#[derive(Debug, Error)]
pub enum InvokerError {
    #[error("failed to load library {name}: {source}")]
    Load {
        name: String,
        #[source]
        source: libloading::Error,
    },

    #[error("failed to load library {name:?}: not a library name")]
    InvalidName { name: String },

    #[error("symbol {symbol} not found: {source}")]
    SymbolNotFound {
        symbol: String,
        #[source]
        source: libloading::Error,
    },

    #[error("symbol {symbol} is declared as {declared} but the descriptor says {expected}")]
    SignatureMismatch {
        symbol: String,
        declared: String,
        expected: String,
    },

    #[error("cannot pass {value:?} as a C string: {source}")]
    Marshal {
        value: String,
        #[source]
        source: std::ffi::NulError,
    },

    #[error("invalid signature descriptor {origin}: {reason}")]
    Descriptor { origin: String, reason: String },

    #[error("failed to close library {name}: {source}")]
    Close {
        name: String,
        #[source]
        source: libloading::Error,
    },
}
