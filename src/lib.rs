//! # frame_messaging
//!
//! The **embedded side** of a cross-window messaging protocol: a library that lives inside an
//! iframe (or popup) and exchanges structured, origin-validated messages with the page that
//! hosts it.
//!
//! - Register listeners per logical event type, with **one** window-level subscription
//!   shared by all of them
//! - Drop untrusted traffic silently (wrong source window, wrong origin, bad shape)
//! - Post decorated envelopes back to the parent
//!
//! ---
//!
//! ## How messages flow
//!
//! Outbound, every message is a JSON object: the caller's payload plus four protocol fields.
//!
//! ```json
//! { "title": "hi", "action": "showToast", "protocol": "frame-messaging",
//!   "protocolAgentName": "frame_messaging", "protocolAgentVersion": "0.2.0" }
//! ```
//!
//! Inbound, the host sends a JSON object whose discriminator field (default `eventType`) names
//! the logical event. Hook-style events add a `hook` field, e.g.
//! `{"eventType": "lifecycle", "hook": "mounted"}`.
//!
//! ### Most important gotchas (read this first)
//!
//! - **Identity, not value:** listeners and payload filters are `Arc`s and compare by pointer.
//!   Keep the `Arc` you registered if you want to remove it later; an identical closure built
//!   twice is two different listeners.
//! - **Event types are exact:** `"Foo"`, `" Foo"` and `"FOO"` are three event types.
//! - **Origin is exact too:** inbound origin must equal [`FrameConfig::target_origin`] byte for
//!   byte. The default target origin `"*"` is fine for sending but will not match any real
//!   inbound origin, so set it when you expect replies.
//! - **Silent rejection:** malformed or untrusted inbound events never produce errors. Enable
//!   `trace` logging for `frame_messaging` to see why something was dropped.
//!
//! ---
//!
//! ## Crate layout
//!
//! - [`messenger`]: [`FrameMessenger`], the API surface (listeners + outbound send).
//! - [`registry`]: listener storage and de-duplication rules.
//! - [`subscription`]: the one host subscription and its two states.
//! - [`dispatch`]: inbound trust checks and fan-out.
//! - [`codec`]: envelope building and payload sanitizing.
//! - [`host`]: the [`HostWindow`] seam, [`MemoryHost`], and the async pump.
//! - [`hooks`]: lifecycle/conversation hooks and toasts.
//! - [`config`], [`error`], [`log`]: settings, errors, and the failure sink.
//!
//! ---
//!
//! ## Quick start
//!
//! ```rust
//! use frame_messaging::{
//!     FrameConfig, FrameMessenger, InboundEvent, Listener, ListenerOptions, MemoryHost,
//!     WindowHandle,
//! };
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let parent = WindowHandle::new("parent");
//! let host = Arc::new(MemoryHost::embedded(parent.clone()));
//! let messenger = FrameMessenger::new(
//!     host.clone(),
//!     FrameConfig::default().with_target_origin("https://host.example.com"),
//! );
//!
//! let listener: Listener = Arc::new(|payload: serde_json::Value| {
//!     assert_eq!(payload["greeting"], "hello");
//! });
//! messenger
//!     .add_listener("greet", listener.clone(), ListenerOptions::default())
//!     .unwrap();
//! assert!(messenger.is_subscribed());
//!
//! host.deliver(&InboundEvent::new(
//!     &parent,
//!     "https://host.example.com",
//!     json!({"eventType": "greet", "greeting": "hello"}),
//! ));
//!
//! messenger
//!     .remove_listener("greet", &listener, ListenerOptions::default())
//!     .unwrap();
//! assert!(!messenger.is_subscribed());
//! ```
//!
//! ---
//!
//! ## Sending
//!
//! ```rust
//! use frame_messaging::{FrameMessenger, FrameConfig, MemoryHost, WindowHandle};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let host = Arc::new(MemoryHost::embedded(WindowHandle::new("parent")));
//! let messenger = FrameMessenger::new(host.clone(), FrameConfig::default());
//! messenger.send("resize", Some(&json!({"height": 420}))).unwrap();
//!
//! let posted = host.take_outbox();
//! assert_eq!(posted[0].message["action"], "resize");
//! assert_eq!(posted[0].target_origin, "*");
//! ```
//!
//! Send failures (not embedded, host refused the post) are returned as [`FrameError`] unless
//! the messenger was built with a [`LogSink`], in which case they are reported there and
//! swallowed.
//!
//! ---
//!
//! ## Feeding events from async code
//!
//! With the `tokio` feature, [`host::pump`] drains a channel of [`InboundEvent`]s into a
//! [`MemoryHost`]. Dropping every sender ends the pump normally.
//!
//! ```no_run
//! use frame_messaging::{host::pump, InboundEvent, MemoryHost, WindowHandle};
//!
//! #[tokio::main]
//! async fn main() {
//!     let host = MemoryHost::embedded(WindowHandle::new("parent"));
//!     let (tx, rx) = tokio::sync::mpsc::channel::<InboundEvent>(64);
//!     drop(tx);
//!     let delivered = pump(&host, rx).await;
//!     assert_eq!(delivered, 0);
//! }
//! ```

pub mod codec;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod hooks;
pub mod host;
pub mod log;
pub mod messenger;
pub mod registry;
pub mod subscription;

// -------- Core re-exports --------

#[doc(inline)]
pub use config::FrameConfig;
#[doc(inline)]
pub use error::{FrameError, Result};
#[doc(inline)]
pub use messenger::{FrameMessenger, FrameMessengerBuilder, WeakFrameMessenger};
#[doc(inline)]
pub use registry::{Listener, ListenerOptions, PayloadFilter};

// -------- Host re-exports --------

#[doc(inline)]
pub use host::{HostWindow, InboundEvent, MemoryHost, MessageHandler, WindowHandle};
#[doc(inline)]
pub use log::{LogSink, TracingSink};

// -------- Façade re-exports --------

#[doc(inline)]
pub use hooks::{ConversationHook, ConversationHooks, LifecycleHook, LifecycleHooks, Toast, Toasts};
