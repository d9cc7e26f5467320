use thiserror::Error;

/// Convenience alias used throughout the workspace.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Aurora-X error domain.
///
/// Transient channel/budget conditions (duty exhaustion, LBT-busy, decode
/// insufficiency) are not represented here: those are recovered locally by
/// the component that observed them and never escalate to an `Error`. Only
/// structural failures (parse errors, deadline expiry) surface.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("serde: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("config: {0}")]
    Config(String),
    #[error("protocol: {0}")]
    Protocol(String),
    #[error("token deserialization overrun: {0}")]
    Deserialization(String),
    #[error("deadline exceeded after {elapsed_s:.3}s (deadline {deadline_s:.3}s)")]
    Deadline { elapsed_s: f64, deadline_s: f64 },
}

impl Error {
    /// Build a [`Error::Config`] from anything `Into<String>`.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`Error::Protocol`] from anything `Into<String>`.
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    /// Build a [`Error::Deserialization`] from anything `Into<String>`.
    pub fn deserialization(msg: impl Into<String>) -> Self {
        Self::Deserialization(msg.into())
    }
}
