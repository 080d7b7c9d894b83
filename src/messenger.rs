use parking_lot::{Mutex, ReentrantMutex};
use serde_json::Value;
use std::sync::{Arc, Weak};
use tracing::{debug, trace};

use crate::codec::{build_envelope, ProtocolInfo};
use crate::config::FrameConfig;
use crate::dispatch::dispatch;
use crate::error::{FrameError, Result};
use crate::host::{HostWindow, InboundEvent, MessageHandler};
use crate::log::LogSink;
use crate::registry::{CountTransition, Listener, ListenerOptions, ListenerRegistry, Registration};
use crate::subscription::{SubscriptionController, SubscriptionState};

struct State {
    registry: ListenerRegistry,
    subscription: SubscriptionController,
}

struct Inner {
    config: FrameConfig,
    protocol: ProtocolInfo,
    host: Arc<dyn HostWindow>,
    log_sink: Option<Arc<dyn LogSink>>,
    /// Held from a registry change until its host call returns, so attach and
    /// detach reach the host in the order the transitions happened. Reentrant
    /// because hosts may deliver from inside `attach`.
    host_order: ReentrantMutex<()>,
    state: Mutex<State>,
}

/// One messaging surface: a listener registry, its host subscription, and the
/// outbound side.
///
/// Cloning is cheap and shares the same registry. Separate messengers built
/// on the same host keep separate registries and subscriptions.
///
/// Listeners and filters never run under the registry lock, and host
/// `attach`/`detach` calls are made after it is released. Listeners may add
/// or remove listeners (including themselves) while being dispatched, and a
/// host may deliver events from inside `attach`.
///
/// A listener that captures a clone of its own messenger keeps that messenger
/// alive for as long as it stays registered (registry -> listener -> messenger).
/// Capture a [`WeakFrameMessenger`] from [`downgrade`](Self::downgrade)
/// instead when the listener should not extend the messenger's lifetime:
///
/// ```rust
/// use frame_messaging::{
///     FrameConfig, FrameMessenger, Listener, ListenerOptions, MemoryHost, WindowHandle,
/// };
/// use std::sync::Arc;
///
/// let host = Arc::new(MemoryHost::embedded(WindowHandle::new("parent")));
/// let messenger = FrameMessenger::new(host.clone(), FrameConfig::default());
/// let weak = messenger.downgrade();
/// let listener: Listener = Arc::new(move |_payload: serde_json::Value| {
///     if let Some(messenger) = weak.upgrade() {
///         messenger.send("ack", None).expect("send ack");
///     }
/// });
/// messenger.add_listener("ping", listener, ListenerOptions::default()).unwrap();
///
/// drop(messenger);
/// assert_eq!(host.attached_handlers(), 0);
/// ```
#[derive(Clone)]
pub struct FrameMessenger {
    inner: Arc<Inner>,
}

impl FrameMessenger {
    pub fn new(host: Arc<dyn HostWindow>, config: FrameConfig) -> Self {
        Self::builder(host).config(config).build()
    }

    pub fn builder(host: Arc<dyn HostWindow>) -> FrameMessengerBuilder {
        FrameMessengerBuilder {
            host,
            config: FrameConfig::default(),
            log_sink: None,
        }
    }

    pub fn config(&self) -> &FrameConfig {
        &self.inner.config
    }

    pub fn host(&self) -> &Arc<dyn HostWindow> {
        &self.inner.host
    }

    /// Register `listener` for `event_type`.
    ///
    /// Registering the same listener `Arc` with the same options twice keeps a
    /// single registration. The first registration overall subscribes to the host.
    pub fn add_listener(
        &self,
        event_type: &str,
        listener: Listener,
        options: ListenerOptions,
    ) -> Result<()> {
        self.change(|registry| settle(registry.add(event_type, listener, options)))?;
        debug!(event_type, "listener added");
        Ok(())
    }

    /// Remove the registration matching `listener` and `options` exactly.
    ///
    /// Nothing matching is not an error. Removing the last registration
    /// unsubscribes from the host.
    pub fn remove_listener(
        &self,
        event_type: &str,
        listener: &Listener,
        options: ListenerOptions,
    ) -> Result<()> {
        self.change(|registry| settle(registry.remove(event_type, listener, &options)))?;
        debug!(event_type, "listener removal");
        Ok(())
    }

    /// Remove a `once` registration before it fires. Only the caller that
    /// actually removed it may invoke the listener.
    pub(crate) fn claim(&self, event_type: &str, registration: &Registration) -> bool {
        self.change(|registry| {
            match registry.take(event_type, &registration.listener, &registration.options) {
                Some(transition) => (true, transition),
                None => (false, CountTransition::Unchanged),
            }
        })
    }

    /// Run `op` on the registry, then make the host call its transition needs
    /// with the registry lock released.
    fn change<T>(&self, op: impl FnOnce(&mut ListenerRegistry) -> (T, CountTransition)) -> T {
        let _order = self.inner.host_order.lock();
        let (value, action) = {
            let mut state = self.inner.state.lock();
            let (value, transition) = op(&mut state.registry);
            trace!(?transition, total = state.registry.count(), "registry changed");
            (value, state.subscription.apply(transition))
        };
        if let Some(action) = action {
            action.perform(self.inner.host.as_ref());
        }
        value
    }

    pub fn listener_count(&self) -> usize {
        self.inner.state.lock().registry.count()
    }

    pub fn subscription_state(&self) -> SubscriptionState {
        self.inner.state.lock().subscription.state()
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription_state() == SubscriptionState::Subscribed
    }

    pub fn downgrade(&self) -> WeakFrameMessenger {
        WeakFrameMessenger {
            inner: Arc::downgrade(&self.inner),
        }
    }

    pub(crate) fn snapshot(&self, event_type: &str) -> Vec<Registration> {
        self.inner.state.lock().registry.snapshot(event_type)
    }

    /// Post `action` with `payload` to the parent window.
    ///
    /// With a log sink configured, failures are reported there and `Ok(())`
    /// is returned. Without one they are returned to the caller.
    pub fn send(&self, action: &str, payload: Option<&Value>) -> Result<()> {
        match self.try_send(action, payload) {
            Ok(()) => Ok(()),
            Err(err) => match &self.inner.log_sink {
                Some(sink) => {
                    sink.error(&format!("failed to send `{action}` to host window"), &err);
                    Ok(())
                }
                None => Err(err),
            },
        }
    }

    fn try_send(&self, action: &str, payload: Option<&Value>) -> Result<()> {
        let parent = self.inner.host.parent().ok_or(FrameError::NotEmbedded)?;
        let envelope = build_envelope(action, payload, &self.inner.protocol);
        self.inner
            .host
            .post_message(&parent, &envelope, &self.inner.config.target_origin)
    }
}

/// Split a registry result into the caller's result and the transition to apply.
fn settle(outcome: Result<CountTransition>) -> (Result<()>, CountTransition) {
    match outcome {
        Ok(transition) => (Ok(()), transition),
        Err(err) => (Err(err), CountTransition::Unchanged),
    }
}

/// Non-owning handle to a [`FrameMessenger`].
#[derive(Clone)]
pub struct WeakFrameMessenger {
    inner: Weak<Inner>,
}

impl WeakFrameMessenger {
    pub fn upgrade(&self) -> Option<FrameMessenger> {
        self.inner.upgrade().map(|inner| FrameMessenger { inner })
    }
}

/// Builder for [`FrameMessenger`].
pub struct FrameMessengerBuilder {
    host: Arc<dyn HostWindow>,
    config: FrameConfig,
    log_sink: Option<Arc<dyn LogSink>>,
}

impl FrameMessengerBuilder {
    pub fn config(mut self, config: FrameConfig) -> Self {
        self.config = config;
        self
    }

    pub fn log_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.log_sink = Some(sink);
        self
    }

    pub fn build(self) -> FrameMessenger {
        let inner = Arc::new_cyclic(|weak: &Weak<Inner>| {
            let weak = WeakFrameMessenger {
                inner: weak.clone(),
            };
            let handler: MessageHandler = Arc::new(move |event: &InboundEvent| {
                if let Some(messenger) = weak.upgrade() {
                    dispatch(&messenger, event);
                }
            });
            Inner {
                protocol: ProtocolInfo::from(&self.config),
                config: self.config,
                host: Arc::clone(&self.host),
                log_sink: self.log_sink,
                host_order: ReentrantMutex::new(()),
                state: Mutex::new(State {
                    registry: ListenerRegistry::new(),
                    subscription: SubscriptionController::new(self.host, handler),
                }),
            }
        });
        FrameMessenger { inner }
    }
}
