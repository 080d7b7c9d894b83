use thiserror::Error;

/// Errors surfaced by the messenger and its collaborators.
///
/// Only caller mistakes and outbound failures ever reach user code. Untrusted
/// inbound traffic is dropped silently by the dispatcher and never turns into
/// one of these.
#[derive(Debug, Error)]
pub enum FrameError {
    /// A caller passed an argument the registry refuses (e.g. an empty event type).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// There is no parent (or opener) window to talk to.
    #[error("not embedded: no parent or opener window is available")]
    NotEmbedded,

    /// The host refused or failed to post a message.
    #[error("transport error: {0}")]
    Transport(String),

    /// A façade payload could not be turned into JSON.
    #[error("failed to serialize payload: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Configuration text could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FrameError>;
