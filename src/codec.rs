//! Outbound envelope construction and inbound payload cleaning.
//!
//! Both directions work on owned clones: the caller's payload is never decorated
//! in place, and every listener gets its own copy of the inbound data.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::FrameConfig;

pub const ACTION_FIELD: &str = "action";
pub const PROTOCOL_FIELD: &str = "protocol";
pub const PROTOCOL_AGENT_NAME_FIELD: &str = "protocolAgentName";
pub const PROTOCOL_AGENT_VERSION_FIELD: &str = "protocolAgentVersion";

/// Protocol identity stamped onto every outbound envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProtocolInfo {
    pub protocol: String,
    pub agent_name: String,
    pub agent_version: String,
}

impl ProtocolInfo {
    pub fn new(
        protocol: impl Into<String>,
        agent_name: impl Into<String>,
        agent_version: impl Into<String>,
    ) -> Self {
        Self {
            protocol: protocol.into(),
            agent_name: agent_name.into(),
            agent_version: agent_version.into(),
        }
    }
}

impl From<&FrameConfig> for ProtocolInfo {
    fn from(cfg: &FrameConfig) -> Self {
        Self::new(
            cfg.protocol_name.clone(),
            cfg.protocol_agent_name.clone(),
            cfg.protocol_agent_version.clone(),
        )
    }
}

/// Build an outbound envelope for `action`.
///
/// A payload that is not a JSON object is ignored and the envelope starts empty.
/// The four protocol fields overwrite same-named payload keys.
pub fn build_envelope(action: &str, payload: Option<&Value>, info: &ProtocolInfo) -> Value {
    let mut envelope = match payload {
        Some(Value::Object(map)) => map.clone(),
        _ => Map::new(),
    };
    envelope.insert(ACTION_FIELD.into(), Value::String(action.to_string()));
    envelope.insert(PROTOCOL_FIELD.into(), Value::String(info.protocol.clone()));
    envelope.insert(
        PROTOCOL_AGENT_NAME_FIELD.into(),
        Value::String(info.agent_name.clone()),
    );
    envelope.insert(
        PROTOCOL_AGENT_VERSION_FIELD.into(),
        Value::String(info.agent_version.clone()),
    );
    Value::Object(envelope)
}

/// Clone inbound data for delivery to user code, dropping the internal
/// `protocol` marker.
pub fn sanitize_for_user_space(raw: &Value) -> Value {
    let mut clean = raw.clone();
    if let Value::Object(map) = &mut clean {
        map.remove(PROTOCOL_FIELD);
    }
    clean
}
