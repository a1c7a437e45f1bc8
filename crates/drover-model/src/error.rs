//! Model-side error types.

/// Errors from symbol-table and model-source operations.
#[derive(Debug)]
pub enum ModelError {
    /// Symbol is already present in the table.
    DuplicateSymbol(String),
    /// Symbol is not present in the table.
    UnknownSymbol(String),
    /// I/O failure while serializing the model file.
    Io(std::io::Error),
}

impl ModelError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            ModelError::DuplicateSymbol(_) => "SYMBOL_DUPLICATE",
            ModelError::UnknownSymbol(_) => "SYMBOL_UNKNOWN",
            ModelError::Io(_) => "MODEL_IO",
        }
    }
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::DuplicateSymbol(name) => {
                write!(f, "[{}] Symbol {} is already defined", self.code(), name)
            }
            ModelError::UnknownSymbol(name) => {
                write!(f, "[{}] Symbol {} does not exist", self.code(), name)
            }
            ModelError::Io(err) => {
                write!(f, "[{}] Model file I/O failed: {}", self.code(), err)
            }
        }
    }
}

impl std::error::Error for ModelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ModelError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ModelError {
    fn from(err: std::io::Error) -> Self {
        ModelError::Io(err)
    }
}
