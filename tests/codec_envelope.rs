use frame_messaging::codec::{build_envelope, sanitize_for_user_space, ProtocolInfo};
use frame_messaging::FrameConfig;
use serde_json::json;

#[test]
fn show_toast_envelope_matches_wire_format() {
    let info = ProtocolInfo::new("p", "a", "1");
    let payload = json!({ "title": "hi" });

    let envelope = build_envelope("showToast", Some(&payload), &info);

    assert_eq!(
        envelope,
        json!({
            "title": "hi",
            "action": "showToast",
            "protocol": "p",
            "protocolAgentName": "a",
            "protocolAgentVersion": "1"
        })
    );
    // Caller's payload is untouched.
    assert_eq!(payload, json!({ "title": "hi" }));
}

#[test]
fn missing_payload_yields_protocol_fields_only() {
    let info = ProtocolInfo::new("p", "a", "1");
    let envelope = build_envelope("ping", None, &info);
    assert_eq!(envelope.as_object().unwrap().len(), 4);
    assert_eq!(envelope["action"], "ping");
}

#[test]
fn protocol_info_comes_from_config() {
    let cfg = FrameConfig::default()
        .with_protocol_name("acme")
        .with_protocol_agent("acme-sdk", "9.9.9");
    let info = ProtocolInfo::from(&cfg);
    assert_eq!(info, ProtocolInfo::new("acme", "acme-sdk", "9.9.9"));
}

#[test]
fn sanitize_strips_protocol_marker_only() {
    let raw = json!({
        "eventType": "lifecycle",
        "hook": "mounted",
        "protocol": "frame-messaging",
        "nested": { "protocol": "kept" }
    });

    let clean = sanitize_for_user_space(&raw);

    assert!(clean.get("protocol").is_none());
    assert_eq!(clean["eventType"], "lifecycle");
    assert_eq!(clean["hook"], "mounted");
    assert_eq!(clean["nested"]["protocol"], "kept");
    assert_eq!(raw["protocol"], "frame-messaging");
}
