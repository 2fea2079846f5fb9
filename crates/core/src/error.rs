use thiserror::Error;

/// Top-level error type shared by every `sysmon` crate.
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("config error: {0}")]
    Config(String),

    #[error("fetch error: {0}")]
    Fetch(String),

    #[error("payload error: {0}")]
    Payload(String),

    /// The resource model was disposed and no longer polls.
    #[error("resource model has been disposed")]
    Disposed,

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

pub type Result<T, E = MonitorError> = std::result::Result<T, E>;
