//! The host-window seam: what the library needs from the browsing context it
//! is embedded in, plus an in-memory implementation.

use parking_lot::Mutex;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::error::{FrameError, Result};

/// Opaque reference to a browsing context (a window, frame, or popup opener).
///
/// Equality is identity: two handles are equal only if they were cloned from
/// the same original. The label is for diagnostics only.
#[derive(Clone)]
pub struct WindowHandle(Arc<str>);

impl WindowHandle {
    pub fn new(label: impl Into<String>) -> Self {
        Self(Arc::from(label.into()))
    }

    pub fn label(&self) -> &str {
        &self.0
    }

    pub fn is_same(&self, other: &WindowHandle) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for WindowHandle {
    fn eq(&self, other: &Self) -> bool {
        self.is_same(other)
    }
}

impl Eq for WindowHandle {}

impl fmt::Debug for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("WindowHandle").field(&self.label()).finish()
    }
}

/// A raw incoming message event as delivered by the host. Any field may be
/// missing; the dispatcher treats such events as malformed.
#[derive(Debug, Clone, Default)]
pub struct InboundEvent {
    pub source: Option<WindowHandle>,
    pub origin: Option<String>,
    pub data: Option<Value>,
}

impl InboundEvent {
    pub fn new(source: &WindowHandle, origin: impl Into<String>, data: Value) -> Self {
        Self {
            source: Some(source.clone()),
            origin: Some(origin.into()),
            data: Some(data),
        }
    }
}

/// Callback attached to the host's incoming-message stream.
pub type MessageHandler = Arc<dyn Fn(&InboundEvent) + Send + Sync>;

/// What the library needs from its embedding browsing context.
pub trait HostWindow: Send + Sync {
    /// The trusted counterpart: the parent window, or the opener for a popup.
    /// `None` when the library is not embedded.
    fn parent(&self) -> Option<WindowHandle>;

    /// Subscribe `handler` to incoming message events.
    fn attach(&self, handler: MessageHandler);

    /// Remove a handler previously passed to [`attach`](Self::attach). Matching
    /// is by `Arc` identity.
    fn detach(&self, handler: &MessageHandler);

    /// Post `message` to `target`, restricted to `target_origin`.
    fn post_message(&self, target: &WindowHandle, message: &Value, target_origin: &str)
        -> Result<()>;
}

/// A message recorded by [`MemoryHost::post_message`].
#[derive(Debug, Clone, PartialEq)]
pub struct PostedMessage {
    pub target: WindowHandle,
    pub message: Value,
    pub target_origin: String,
}

#[derive(Default)]
struct MemoryHostState {
    parent: Option<WindowHandle>,
    handlers: Vec<MessageHandler>,
    attach_calls: usize,
    detach_calls: usize,
    outbox: Vec<PostedMessage>,
    fail_posts: Option<String>,
}

/// In-process [`HostWindow`]. Useful for tests and for embedding the
/// messenger outside a browser, where some other layer feeds it events.
#[derive(Default)]
pub struct MemoryHost {
    state: Mutex<MemoryHostState>,
}

impl MemoryHost {
    /// A host embedded under `parent`.
    pub fn embedded(parent: WindowHandle) -> Self {
        let host = Self::default();
        host.state.lock().parent = Some(parent);
        host
    }

    /// A top-level host with no parent or opener.
    pub fn standalone() -> Self {
        Self::default()
    }

    /// Make every subsequent `post_message` fail with `reason`.
    pub fn fail_posts(&self, reason: impl Into<String>) {
        self.state.lock().fail_posts = Some(reason.into());
    }

    /// Deliver `event` to every attached handler. Handlers are snapshotted
    /// first, so they may attach or detach during delivery.
    pub fn deliver(&self, event: &InboundEvent) {
        let handlers = self.state.lock().handlers.clone();
        for handler in handlers {
            handler(event);
        }
    }

    pub fn attached_handlers(&self) -> usize {
        self.state.lock().handlers.len()
    }

    pub fn attach_calls(&self) -> usize {
        self.state.lock().attach_calls
    }

    pub fn detach_calls(&self) -> usize {
        self.state.lock().detach_calls
    }

    /// Drain and return everything posted so far.
    pub fn take_outbox(&self) -> Vec<PostedMessage> {
        std::mem::take(&mut self.state.lock().outbox)
    }
}

impl HostWindow for MemoryHost {
    fn parent(&self) -> Option<WindowHandle> {
        self.state.lock().parent.clone()
    }

    fn attach(&self, handler: MessageHandler) {
        let mut state = self.state.lock();
        state.attach_calls += 1;
        state.handlers.push(handler);
    }

    fn detach(&self, handler: &MessageHandler) {
        let mut state = self.state.lock();
        state.detach_calls += 1;
        if let Some(pos) = state.handlers.iter().position(|h| Arc::ptr_eq(h, handler)) {
            state.handlers.remove(pos);
        }
    }

    fn post_message(
        &self,
        target: &WindowHandle,
        message: &Value,
        target_origin: &str,
    ) -> Result<()> {
        let mut state = self.state.lock();
        if let Some(reason) = &state.fail_posts {
            return Err(FrameError::Transport(reason.clone()));
        }
        state.outbox.push(PostedMessage {
            target: target.clone(),
            message: message.clone(),
            target_origin: target_origin.to_string(),
        });
        Ok(())
    }
}

/// Feed events from a channel into `host` until every sender is dropped.
///
/// A closed channel is a normal shutdown, like a browser closing the page.
/// Returns the number of events delivered.
#[cfg(feature = "tokio")]
pub async fn pump(host: &MemoryHost, mut rx: tokio::sync::mpsc::Receiver<InboundEvent>) -> usize {
    let mut delivered = 0;
    while let Some(event) = rx.recv().await {
        host.deliver(&event);
        delivered += 1;
    }
    tracing::debug!(delivered, "inbound channel closed");
    delivered
}
