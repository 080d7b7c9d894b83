//! The single inbound handler: trust checks, then fan-out.
//!
//! Every rejection is silent. Untrusted `postMessage` traffic must never be
//! able to raise errors inside the embedding page.

use serde_json::Value;
use tracing::trace;

use crate::codec::sanitize_for_user_space;
use crate::host::{InboundEvent, WindowHandle};
use crate::messenger::FrameMessenger;

/// Why an inbound event was dropped, in check order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Malformed,
    UnexpectedSource,
    UnexpectedOrigin,
    DataNotObject,
    MissingEventType,
}

/// A validated event: its raw event-type key and raw data.
#[derive(Debug)]
pub struct Accepted<'a> {
    pub event_type: &'a str,
    pub data: &'a Value,
}

/// Run the trust checks against an inbound event.
///
/// `expected_source` is the parent or opener; when there is none every event
/// is rejected. The origin must equal `target_origin` byte for byte.
pub fn validate<'a>(
    event: &'a InboundEvent,
    expected_source: Option<&WindowHandle>,
    target_origin: &str,
    event_type_field: &str,
) -> Result<Accepted<'a>, Rejection> {
    let (Some(source), Some(origin), Some(data)) = (&event.source, &event.origin, &event.data)
    else {
        return Err(Rejection::Malformed);
    };
    if !expected_source.is_some_and(|expected| expected.is_same(source)) {
        return Err(Rejection::UnexpectedSource);
    }
    if origin != target_origin {
        return Err(Rejection::UnexpectedOrigin);
    }
    let Value::Object(map) = data else {
        return Err(Rejection::DataNotObject);
    };
    match map.get(event_type_field) {
        Some(Value::String(event_type)) if !event_type.trim().is_empty() => Ok(Accepted {
            event_type: event_type.as_str(),
            data,
        }),
        _ => Err(Rejection::MissingEventType),
    }
}

/// Deliver an inbound event to the matching registrations of `messenger`.
pub(crate) fn dispatch(messenger: &FrameMessenger, event: &InboundEvent) {
    let config = messenger.config();
    let parent = messenger.host().parent();
    let accepted = match validate(
        event,
        parent.as_ref(),
        &config.target_origin,
        &config.event_type_field,
    ) {
        Ok(accepted) => accepted,
        Err(rejection) => {
            trace!(?rejection, "dropped inbound message");
            return;
        }
    };

    let registrations = messenger.snapshot(accepted.event_type);
    if registrations.is_empty() {
        return;
    }

    for registration in registrations {
        if let Some(filter) = &registration.options.payload_filter {
            if !filter(accepted.data) {
                continue;
            }
        }
        // A concurrent or earlier delivery may already have consumed it.
        if registration.options.once && !messenger.claim(accepted.event_type, &registration) {
            continue;
        }
        (registration.listener)(sanitize_for_user_space(accepted.data));
    }
}
