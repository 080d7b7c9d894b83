//! Per-event-type listener storage with identity-based de-duplication.

use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{FrameError, Result};

/// User callback receiving a sanitized copy of the inbound data.
pub type Listener = Arc<dyn Fn(Value) + Send + Sync>;

/// Predicate run against the raw inbound data before a listener fires.
pub type PayloadFilter = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Options for a registration. `Default` is `{ once: false, payload_filter: None }`.
///
/// Filters compare by `Arc` identity. Two separately built closures with the
/// same body are different filters; share one `PayloadFilter` to make
/// registrations collide.
#[derive(Clone, Default)]
pub struct ListenerOptions {
    pub once: bool,
    pub payload_filter: Option<PayloadFilter>,
}

impl ListenerOptions {
    pub fn once() -> Self {
        Self {
            once: true,
            payload_filter: None,
        }
    }

    pub fn filtered(filter: PayloadFilter) -> Self {
        Self {
            once: false,
            payload_filter: Some(filter),
        }
    }

    pub fn with_once(mut self, once: bool) -> Self {
        self.once = once;
        self
    }

    pub fn with_filter(mut self, filter: PayloadFilter) -> Self {
        self.payload_filter = Some(filter);
        self
    }
}

impl fmt::Debug for ListenerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerOptions")
            .field("once", &self.once)
            .field("payload_filter", &self.payload_filter.is_some())
            .finish()
    }
}

/// Compare two `Arc<dyn _>` by the address of their allocation, ignoring vtables.
fn same_allocation<T: ?Sized>(a: &Arc<T>, b: &Arc<T>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

/// One stored listener plus its options.
#[derive(Clone)]
pub struct Registration {
    pub listener: Listener,
    pub options: ListenerOptions,
}

impl Registration {
    pub fn new(listener: Listener, options: ListenerOptions) -> Self {
        Self { listener, options }
    }

    /// Structural match: same listener, same `once`, same filter (or both none).
    pub fn matches(&self, listener: &Listener, options: &ListenerOptions) -> bool {
        let same_filter = match (&self.options.payload_filter, &options.payload_filter) {
            (None, None) => true,
            (Some(a), Some(b)) => same_allocation(a, b),
            _ => false,
        };
        same_allocation(&self.listener, listener)
            && self.options.once == options.once
            && same_filter
    }
}

/// Change in the registry's total size that the subscription cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountTransition {
    /// 0 -> 1: the first listener arrived.
    Opened,
    /// 1 -> 0: the last listener left.
    Closed,
    Unchanged,
}

/// Listeners keyed by exact event-type string.
///
/// Keys are not normalized: `"Foo"`, `" Foo"` and `"FOO"` are three different
/// event types.
#[derive(Default)]
pub struct ListenerRegistry {
    entries: HashMap<String, Vec<Registration>>,
    total: usize,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a registration unless a structural duplicate already exists.
    pub fn add(
        &mut self,
        event_type: &str,
        listener: Listener,
        options: ListenerOptions,
    ) -> Result<CountTransition> {
        validate_event_type(event_type)?;
        let list = self.entries.entry(event_type.to_string()).or_default();
        if list.iter().any(|r| r.matches(&listener, &options)) {
            return Ok(CountTransition::Unchanged);
        }
        list.push(Registration::new(listener, options));
        self.total += 1;
        Ok(if self.total == 1 {
            CountTransition::Opened
        } else {
            CountTransition::Unchanged
        })
    }

    /// Remove the first structural match, if any. Unknown event types and
    /// non-matching options are a no-op.
    pub fn remove(
        &mut self,
        event_type: &str,
        listener: &Listener,
        options: &ListenerOptions,
    ) -> Result<CountTransition> {
        validate_event_type(event_type)?;
        Ok(self
            .take(event_type, listener, options)
            .unwrap_or(CountTransition::Unchanged))
    }

    /// Remove the first structural match without validating `event_type`.
    /// Returns `None` when nothing matched.
    pub fn take(
        &mut self,
        event_type: &str,
        listener: &Listener,
        options: &ListenerOptions,
    ) -> Option<CountTransition> {
        let list = self.entries.get_mut(event_type)?;
        let pos = list.iter().position(|r| r.matches(listener, options))?;
        list.remove(pos);
        if list.is_empty() {
            self.entries.remove(event_type);
        }
        self.total -= 1;
        Some(if self.total == 0 {
            CountTransition::Closed
        } else {
            CountTransition::Unchanged
        })
    }

    /// Copy of the registrations for `event_type`, safe to iterate while the
    /// registry itself changes.
    pub fn snapshot(&self, event_type: &str) -> Vec<Registration> {
        self.entries.get(event_type).cloned().unwrap_or_default()
    }

    pub fn count(&self) -> usize {
        self.total
    }

    pub fn count_for(&self, event_type: &str) -> usize {
        self.entries.get(event_type).map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

fn validate_event_type(event_type: &str) -> Result<()> {
    if event_type.trim().is_empty() {
        return Err(FrameError::InvalidArgument(
            "event type must be a non-empty string".into(),
        ));
    }
    Ok(())
}
