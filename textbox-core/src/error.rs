/// Why a `{...}` block was rejected.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedReason {
    #[error("missing closing brace")]
    Unterminated,

    #[error("unknown control code")]
    UnknownCode,

    #[error("{0}")]
    InvalidArgument(String),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TextError {
    /// Unterminated `{`, unknown code name or bad argument. Offsets are byte offsets
    /// into the raw text.
    #[error("malformed control code `{body}` at offset {offset}: {reason}")]
    MalformedControlCode { body: String, offset: usize, reason: MalformedReason },

    #[error("text metrics unavailable for font `{font}`")]
    MetricsUnavailable { font: String },

    #[error("snapshot does not match its text: {0}")]
    SnapshotMismatch(String),
}

pub type Result<T> = std::result::Result<T, TextError>;
