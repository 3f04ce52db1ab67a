//! Display error types

use thiserror::Error;

use crate::config::ConfigError;

/// Error taxonomy shared by display and controller errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Native backend unavailable, or device/context negotiation failed
    Initialization,
    /// Operation not valid in the current state
    InvalidState,
    /// Presenting a frame failed; there is no recovery path
    FatalIo,
}

/// Display lifecycle errors
#[derive(Error, Debug)]
pub enum DisplayError {
    /// Native window or context creation failed
    #[error("Display initialization failed: {0}")]
    Initialization(String),

    /// Operation not valid in the current lifecycle state
    #[error("Invalid display state: {0}")]
    InvalidState(String),

    /// Buffer swap failed
    #[error("Buffer swap failed: {0}")]
    SwapFailed(String),

    /// Configuration could not be loaded or was rejected
    #[error("Display configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl DisplayError {
    /// Position of this error in the taxonomy
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Initialization(_) | Self::Config(_) => ErrorKind::Initialization,
            Self::InvalidState(_) => ErrorKind::InvalidState,
            Self::SwapFailed(_) => ErrorKind::FatalIo,
        }
    }

    /// Convenience constructor for state errors
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }
}

/// Result type for display operations
pub type DisplayResult<T> = Result<T, DisplayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(DisplayError::Initialization("x".into()).kind(), ErrorKind::Initialization);
        assert_eq!(DisplayError::invalid_state("x").kind(), ErrorKind::InvalidState);
        assert_eq!(DisplayError::SwapFailed("x".into()).kind(), ErrorKind::FatalIo);
        assert_eq!(
            DisplayError::from(ConfigError::Invalid("bad".into())).kind(),
            ErrorKind::Initialization
        );
    }

    #[test]
    fn test_messages() {
        let e = DisplayError::SwapFailed("context lost".into());
        assert_eq!(e.to_string(), "Buffer swap failed: context lost");
    }
}
