use std::sync::Arc;
use tracing::debug;

use crate::host::{HostWindow, MessageHandler};
use crate::registry::CountTransition;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionState {
    Unsubscribed,
    Subscribed,
}

/// A host call decided under the messenger's lock and performed after it is
/// released. Hosts may deliver events from inside `attach`.
#[must_use]
pub enum HostAction {
    Attach(MessageHandler),
    Detach(MessageHandler),
}

impl HostAction {
    pub fn perform(self, host: &dyn HostWindow) {
        match self {
            HostAction::Attach(handler) => {
                host.attach(handler);
                debug!("attached message handler to host window");
            }
            HostAction::Detach(handler) => {
                host.detach(&handler);
                debug!("detached message handler from host window");
            }
        }
    }
}

/// Owns the one host subscription of a messenger.
///
/// The handler is attached on the registry's 0 -> 1 transition and the very
/// same `Arc` is detached on 1 -> 0. Nothing else moves the state.
pub struct SubscriptionController {
    host: Arc<dyn HostWindow>,
    handler: MessageHandler,
    state: SubscriptionState,
}

impl SubscriptionController {
    pub fn new(host: Arc<dyn HostWindow>, handler: MessageHandler) -> Self {
        Self {
            host,
            handler,
            state: SubscriptionState::Unsubscribed,
        }
    }

    pub fn state(&self) -> SubscriptionState {
        self.state
    }

    pub fn is_subscribed(&self) -> bool {
        self.state == SubscriptionState::Subscribed
    }

    /// Move the state for `transition` and return the host call that goes with it.
    pub fn apply(&mut self, transition: CountTransition) -> Option<HostAction> {
        match (transition, self.state) {
            (CountTransition::Opened, SubscriptionState::Unsubscribed) => {
                self.state = SubscriptionState::Subscribed;
                Some(HostAction::Attach(Arc::clone(&self.handler)))
            }
            (CountTransition::Closed, SubscriptionState::Subscribed) => {
                self.state = SubscriptionState::Unsubscribed;
                Some(HostAction::Detach(Arc::clone(&self.handler)))
            }
            _ => None,
        }
    }
}

impl Drop for SubscriptionController {
    fn drop(&mut self) {
        if self.is_subscribed() {
            self.host.detach(&self.handler);
        }
    }
}
