//! Outcomes of an update tick that stop the normal frame loop.

use thiserror::Error;

use crate::controller::platform::PlatformError;

#[derive(Debug, Error)]
pub enum QuicktestError {
    /// The user asked to close the program. Not a failure.
    #[error("esc to exit the program")]
    ExitRequested,

    /// Anything the platform reports; fatal.
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),
}

impl QuicktestError {
    pub fn is_exit_request(&self) -> bool {
        matches!(self, QuicktestError::ExitRequested)
    }
}
