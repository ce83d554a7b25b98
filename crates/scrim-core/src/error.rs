#![forbid(unsafe_code)]

//! Configuration-error taxonomy.
//!
//! Only configuration problems surface as errors. No-op conditions
//! (hiding an already-hidden overlay, double-presenting) are absorbed
//! silently by the lifecycle guards and never reach this type.

use core::fmt;

/// Errors returned by the overlay coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// No container view was supplied and the host could not resolve a
    /// default (key/foreground) surface.
    NoContainerAvailable,
    /// A default-coordinator convenience function was called before a
    /// default instance was installed.
    NoDefaultCoordinator,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NoContainerAvailable => {
                write!(f, "no container view supplied and no default container available")
            }
            Error::NoDefaultCoordinator => {
                write!(f, "no default coordinator installed")
            }
        }
    }
}

impl std::error::Error for Error {}

/// Result alias for coordinator operations.
pub type Result<T> = std::result::Result<T, Error>;
