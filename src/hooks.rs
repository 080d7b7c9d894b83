//! Typed façades over [`FrameMessenger`].
//!
//! Hook-style events share one logical event type and differ by a `hook`
//! field. Each façade builds one [`PayloadFilter`] per hook up front and reuses
//! it, so that registering the same listener twice collapses into one
//! registration and `off` finds what `on` added.

use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::error::Result;
use crate::messenger::FrameMessenger;
use crate::registry::{Listener, ListenerOptions, PayloadFilter};

pub const HOOK_FIELD: &str = "hook";
pub const LIFECYCLE_EVENT_TYPE: &str = "lifecycle";
pub const CONVERSATION_EVENT_TYPE: &str = "conversation";
pub const SHOW_TOAST_ACTION: &str = "showToast";
pub const DISMISS_TOAST_ACTION: &str = "dismissToast";

fn hook_filter(name: &'static str) -> PayloadFilter {
    Arc::new(move |data: &Value| data.get(HOOK_FIELD).and_then(Value::as_str) == Some(name))
}

/// A hook name on the wire.
pub trait Hook: Copy + PartialEq + 'static {
    const ALL: &'static [Self];

    fn as_str(self) -> &'static str;
}

/// Phases of the embedded app's lifecycle reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleHook {
    Mounted,
    Unmounted,
    Visible,
    Hidden,
}

impl Hook for LifecycleHook {
    const ALL: &'static [Self] = &[Self::Mounted, Self::Unmounted, Self::Visible, Self::Hidden];

    fn as_str(self) -> &'static str {
        match self {
            Self::Mounted => "mounted",
            Self::Unmounted => "unmounted",
            Self::Visible => "visible",
            Self::Hidden => "hidden",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConversationHook {
    Started,
    MessageReceived,
    Ended,
}

impl Hook for ConversationHook {
    const ALL: &'static [Self] = &[Self::Started, Self::MessageReceived, Self::Ended];

    fn as_str(self) -> &'static str {
        match self {
            Self::Started => "started",
            Self::MessageReceived => "messageReceived",
            Self::Ended => "ended",
        }
    }
}

/// Listener registration for one hook-style event type.
#[derive(Clone)]
pub struct HookRegistry<H: Hook> {
    messenger: FrameMessenger,
    event_type: &'static str,
    filters: Vec<(H, PayloadFilter)>,
}

impl<H: Hook> HookRegistry<H> {
    pub fn new(messenger: FrameMessenger, event_type: &'static str) -> Self {
        let filters = H::ALL.iter().map(|&h| (h, hook_filter(h.as_str()))).collect();
        Self {
            messenger,
            event_type,
            filters,
        }
    }

    fn options(&self, hook: H, once: bool) -> ListenerOptions {
        let filter = self
            .filters
            .iter()
            .find(|(h, _)| *h == hook)
            .map(|(_, f)| Arc::clone(f));
        ListenerOptions {
            once,
            payload_filter: filter,
        }
    }

    pub fn on(&self, hook: H, listener: Listener) -> Result<()> {
        self.messenger
            .add_listener(self.event_type, listener, self.options(hook, false))
    }

    pub fn once(&self, hook: H, listener: Listener) -> Result<()> {
        self.messenger
            .add_listener(self.event_type, listener, self.options(hook, true))
    }

    pub fn off(&self, hook: H, listener: &Listener) -> Result<()> {
        self.messenger
            .remove_listener(self.event_type, listener, self.options(hook, false))
    }

    /// Remove a listener added with [`once`](Self::once) before it fired.
    pub fn off_once(&self, hook: H, listener: &Listener) -> Result<()> {
        self.messenger
            .remove_listener(self.event_type, listener, self.options(hook, true))
    }
}

pub type LifecycleHooks = HookRegistry<LifecycleHook>;
pub type ConversationHooks = HookRegistry<ConversationHook>;

impl LifecycleHooks {
    pub fn lifecycle(messenger: FrameMessenger) -> Self {
        Self::new(messenger, LIFECYCLE_EVENT_TYPE)
    }
}

impl ConversationHooks {
    pub fn conversation(messenger: FrameMessenger) -> Self {
        Self::new(messenger, CONVERSATION_EVENT_TYPE)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastVariant {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub variant: ToastVariant,
}

impl Toast {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            variant: ToastVariant::default(),
        }
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    pub fn variant(mut self, variant: ToastVariant) -> Self {
        self.variant = variant;
        self
    }
}

/// Toast notifications rendered by the host page.
#[derive(Clone)]
pub struct Toasts {
    messenger: FrameMessenger,
}

impl Toasts {
    pub fn new(messenger: FrameMessenger) -> Self {
        Self { messenger }
    }

    pub fn show(&self, toast: &Toast) -> Result<()> {
        let payload = serde_json::to_value(toast)?;
        self.messenger.send(SHOW_TOAST_ACTION, Some(&payload))
    }

    pub fn dismiss(&self, id: &str) -> Result<()> {
        self.messenger
            .send(DISMISS_TOAST_ACTION, Some(&json!({ "id": id })))
    }
}
