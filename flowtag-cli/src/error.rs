//! CLI-specific error types and exit code mapping

use flowtag_core::error::FlowtagError;
use flowtag_tagger::TaggerError;

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to process exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration or lookup table failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// The flow log could not be opened or read.
    #[error("{0}")]
    SourceUnavailable(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (report write, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from flowtag-core.
    #[error("{0}")]
    Core(#[from] FlowtagError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                              |
    /// |------|--------------------------------------|
    /// | 0    | Success                              |
    /// | 1    | General / command error              |
    /// | 2    | Configuration or lookup table error  |
    /// | 3    | Flow log unavailable                 |
    /// | 10   | IO error                             |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::SourceUnavailable(_) => 3,
            Self::Io(_) => 10,
            Self::Core(core) => match core {
                FlowtagError::Config(_) => 2,
                FlowtagError::Source(_) => 3,
                FlowtagError::Io(_) => 10,
                FlowtagError::Parse(_) => 1,
            },
            Self::JsonSerialize(_) | Self::Command(_) => 1,
        }
    }
}

impl From<TaggerError> for CliError {
    fn from(e: TaggerError) -> Self {
        if e.is_config() {
            Self::Config(e.to_string())
        } else if e.is_source() {
            Self::SourceUnavailable(e.to_string())
        } else {
            match e {
                TaggerError::Io(io) => Self::Io(io),
                other => Self::Command(other.to_string()),
            }
        }
    }
}
