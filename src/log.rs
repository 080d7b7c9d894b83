use crate::error::FrameError;

/// Where swallowed outbound failures are reported.
///
/// A messenger built with a sink never returns send errors to the caller; it
/// hands them to the sink instead.
pub trait LogSink: Send + Sync {
    fn error(&self, message: &str, err: &FrameError);
}

/// Forwards to `tracing::error!`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn error(&self, message: &str, err: &FrameError) {
        tracing::error!(error = %err, "{message}");
    }
}
