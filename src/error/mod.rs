use std::fmt;
use thiserror::Error;

pub mod codes;

pub use codes::{describe_error_code, ErrorCode};

/// Which user callback produced a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackStage {
    /// The aggregate callback (`use`)
    Use,
    /// The per-item callback (`each`)
    Each,
}

impl fmt::Display for CallbackStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Use => write!(f, "use"),
            Self::Each => write!(f, "each"),
        }
    }
}

/// The error type for every populate operation
#[derive(Error, Debug)]
pub enum PopulateError {
    #[error("[E{code:04}] Invalid options: {message}")]
    InvalidOptions {
        code: u16,
        message: String,
        path: String,
    },

    #[error("[E{code:04}] Path value is not string-able: {kind} at '{path}' (item {index})")]
    NotStringable {
        code: u16,
        path: String,
        index: usize,
        kind: &'static str,
    },

    #[error("[E{code:04}] Callback `{stage}` failed: {message}")]
    Callback {
        code: u16,
        stage: CallbackStage,
        message: String,
        index: Option<usize>,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl PopulateError {
    /// Create an invalid options error for the offending path
    pub fn invalid_path(code: u16, message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::InvalidOptions {
            code,
            message: message.into(),
            path: path.into(),
        }
    }

    /// Create a unique key coercion error
    pub fn not_stringable(path: impl Into<String>, index: usize, kind: &'static str) -> Self {
        Self::NotStringable {
            code: ErrorCode::KEY_NOT_STRINGABLE,
            path: path.into(),
            index,
            kind,
        }
    }

    /// Wrap a failure from the aggregate callback
    pub fn use_failed(source: anyhow::Error) -> Self {
        Self::Callback {
            code: ErrorCode::CALLBACK_USE_FAILED,
            stage: CallbackStage::Use,
            message: source.to_string(),
            index: None,
            source: source.into(),
        }
    }

    /// Wrap a failure from the per-item callback at `index`
    pub fn each_failed(index: usize, source: anyhow::Error) -> Self {
        Self::Callback {
            code: ErrorCode::CALLBACK_EACH_FAILED,
            stage: CallbackStage::Each,
            message: source.to_string(),
            index: Some(index),
            source: source.into(),
        }
    }

    /// Get the error code
    pub fn code(&self) -> u16 {
        match self {
            Self::InvalidOptions { code, .. }
            | Self::NotStringable { code, .. }
            | Self::Callback { code, .. } => *code,
        }
    }

    /// Index of the item being processed when the error was raised, if any
    pub fn item_index(&self) -> Option<usize> {
        match self {
            Self::NotStringable { index, .. } => Some(*index),
            Self::Callback { index, .. } => *index,
            Self::InvalidOptions { .. } => None,
        }
    }

    /// Check if the error came from a user callback rather than the populator
    pub fn is_callback_failure(&self) -> bool {
        matches!(self, Self::Callback { .. })
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidOptions { message, path, .. } => {
                format!("Invalid path '{}': {}", path, message)
            }
            Self::NotStringable {
                path, index, kind, ..
            } => {
                format!(
                    "Item {} holds a value of type {} at '{}', which cannot be used as a unique key",
                    index, kind, path
                )
            }
            Self::Callback {
                stage,
                message,
                index,
                ..
            } => match index {
                Some(i) => format!("`{}` failed for item {}: {}", stage, i, message),
                None => format!("`{}` failed: {}", stage, message),
            },
        }
    }
}

/// Type alias for Results using PopulateError
pub type PopulateResult<T> = std::result::Result<T, PopulateError>;
