use serde::Deserialize;

pub const DEFAULT_TARGET_ORIGIN: &str = "*";
pub const DEFAULT_PROTOCOL_NAME: &str = "frame-messaging";
pub const DEFAULT_EVENT_TYPE_FIELD: &str = "eventType";

/// Construction-time settings for a [`FrameMessenger`](crate::FrameMessenger).
///
/// Every field has a default, so a TOML file only needs the keys it overrides:
///
/// ```toml
/// target_origin = "https://host.example.com"
/// protocol_name = "acme-frame"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FrameConfig {
    /// Origin outbound messages are posted to, and the exact origin inbound
    /// messages must carry.
    pub target_origin: String,
    pub protocol_name: String,
    pub protocol_agent_name: String,
    pub protocol_agent_version: String,
    /// Name of the inbound field carrying the logical event type.
    pub event_type_field: String,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            target_origin: DEFAULT_TARGET_ORIGIN.to_string(),
            protocol_name: DEFAULT_PROTOCOL_NAME.to_string(),
            protocol_agent_name: env!("CARGO_PKG_NAME").to_string(),
            protocol_agent_version: env!("CARGO_PKG_VERSION").to_string(),
            event_type_field: DEFAULT_EVENT_TYPE_FIELD.to_string(),
        }
    }
}

impl FrameConfig {
    pub fn with_target_origin(mut self, origin: impl Into<String>) -> Self {
        self.target_origin = origin.into();
        self
    }

    pub fn with_protocol_name(mut self, name: impl Into<String>) -> Self {
        self.protocol_name = name.into();
        self
    }

    pub fn with_protocol_agent(
        mut self,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        self.protocol_agent_name = name.into();
        self.protocol_agent_version = version.into();
        self
    }

    pub fn with_event_type_field(mut self, field: impl Into<String>) -> Self {
        self.event_type_field = field.into();
        self
    }

    /// Parse a configuration from TOML text. Missing keys keep their defaults.
    #[cfg(feature = "config")]
    pub fn from_toml_str(text: &str) -> crate::Result<Self> {
        toml::from_str(text).map_err(|e| crate::FrameError::Config(e.to_string()))
    }

    /// Read and parse a TOML configuration file.
    #[cfg(feature = "config")]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
