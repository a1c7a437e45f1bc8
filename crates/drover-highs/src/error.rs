//! Driver error types.

use drover_model::ModelError;
use std::time::Duration;

/// Error type for driving the external solver.
///
/// Structural problems in the solution file are loud and fatal; an
/// unparseable objective is not an error (the field is left unset), and
/// the solver's exit code and stderr are never inspected.
#[derive(Debug)]
pub enum DriveError {
    /// A required section marker was never found in the solution file.
    MissingSection { marker: &'static str },
    /// The solution file ended inside a section that requires more lines.
    TruncatedSolution { marker: &'static str },
    /// A known decision symbol's row carried no value token.
    MissingValue { symbol: String },
    /// A known decision symbol's row carried an unparseable value token.
    InvalidValue { symbol: String, text: String },
    /// The solution file never satisfied the completion predicate in time.
    Timeout { waited: Duration, polls: u64 },
    /// The cancellation token was triggered while waiting.
    Cancelled,
    /// Model-source failure while writing the model file.
    Model(ModelError),
    /// Raw I/O failure, propagated unmodified.
    Io(std::io::Error),
}

impl DriveError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            DriveError::MissingSection { .. } => "SOL_MISSING_SECTION",
            DriveError::TruncatedSolution { .. } => "SOL_TRUNCATED",
            DriveError::MissingValue { .. } => "SOL_MISSING_VALUE",
            DriveError::InvalidValue { .. } => "SOL_INVALID_VALUE",
            DriveError::Timeout { .. } => "WAIT_TIMEOUT",
            DriveError::Cancelled => "WAIT_CANCELLED",
            DriveError::Model(_) => "MODEL_SOURCE",
            DriveError::Io(_) => "DRIVER_IO",
        }
    }
}

impl std::fmt::Display for DriveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DriveError::MissingSection { marker } => write!(
                f,
                "[{}] Solution file has no {:?} section",
                self.code(),
                marker
            ),
            DriveError::TruncatedSolution { marker } => write!(
                f,
                "[{}] Solution file ends inside the {:?} section",
                self.code(),
                marker
            ),
            DriveError::MissingValue { symbol } => write!(
                f,
                "[{}] Row for decision symbol {} has no value",
                self.code(),
                symbol
            ),
            DriveError::InvalidValue { symbol, text } => write!(
                f,
                "[{}] Row for decision symbol {} has unparseable value {:?}",
                self.code(),
                symbol,
                text
            ),
            DriveError::Timeout { waited, polls } => write!(
                f,
                "[{}] Solution file incomplete after {:.1}s ({} polls)",
                self.code(),
                waited.as_secs_f64(),
                polls
            ),
            DriveError::Cancelled => {
                write!(f, "[{}] Wait cancelled before completion", self.code())
            }
            DriveError::Model(err) => {
                write!(f, "[{}] Model source failed: {}", self.code(), err)
            }
            DriveError::Io(err) => write!(f, "[{}] I/O failed: {}", self.code(), err),
        }
    }
}

impl std::error::Error for DriveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DriveError::Model(err) => Some(err),
            DriveError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DriveError {
    fn from(err: std::io::Error) -> Self {
        DriveError::Io(err)
    }
}

impl From<ModelError> for DriveError {
    fn from(err: ModelError) -> Self {
        DriveError::Model(err)
    }
}
