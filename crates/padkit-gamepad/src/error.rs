use thiserror::Error;

/// Error type for gamepad discovery and listening operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The backend could not open its discovery/watch mechanism.
    #[error("watch failed: {0}")]
    Watch(String),
    /// The raw device could not be opened (busy, permission denied,
    /// removed between enumeration and open).
    #[error("open failed: {0}")]
    Open(String),
    /// The manager is already watching.
    #[error("already watching")]
    AlreadyWatching,
    /// The manager was stopped; a stopped manager never watches again.
    #[error("watching already stopped")]
    WatchStopped,
    /// The gamepad is already delivering to a listener.
    #[error("already listening")]
    AlreadyListening,
    /// The gamepad was detached, or its manager stopped watching.
    #[error("gamepad detached")]
    Detached,
}

/// Convenient result alias for gamepad operations.
pub type Result<T> = std::result::Result<T, Error>;
