mod common;

use frame_messaging::hooks::{ToastVariant, LIFECYCLE_EVENT_TYPE};
use frame_messaging::{
    ConversationHook, ConversationHooks, LifecycleHook, LifecycleHooks, Toast, Toasts,
};
use serde_json::json;

#[test]
fn lifecycle_hooks_filter_by_hook_name() {
    let h = common::harness();
    let hooks = LifecycleHooks::lifecycle(h.messenger.clone());
    let mounted = common::Recorder::new();
    let hidden = common::Recorder::new();

    hooks.on(LifecycleHook::Mounted, mounted.listener.clone()).unwrap();
    hooks.on(LifecycleHook::Hidden, hidden.listener.clone()).unwrap();

    h.deliver(json!({ "eventType": LIFECYCLE_EVENT_TYPE, "hook": "mounted" }));
    h.deliver(json!({ "eventType": LIFECYCLE_EVENT_TYPE, "hook": "mounted" }));
    h.deliver(json!({ "eventType": LIFECYCLE_EVENT_TYPE, "hook": "hidden" }));
    h.deliver(json!({ "eventType": LIFECYCLE_EVENT_TYPE, "hook": "visible" }));
    h.deliver(json!({ "eventType": LIFECYCLE_EVENT_TYPE }));

    assert_eq!(mounted.calls(), 2);
    assert_eq!(hidden.calls(), 1);
}

#[test]
fn registering_a_hook_twice_keeps_one_registration() {
    let h = common::harness();
    let hooks = LifecycleHooks::lifecycle(h.messenger.clone());
    let rec = common::Recorder::new();

    hooks.on(LifecycleHook::Visible, rec.listener.clone()).unwrap();
    hooks.on(LifecycleHook::Visible, rec.listener.clone()).unwrap();
    // A clone of the façade shares the same filters.
    hooks
        .clone()
        .on(LifecycleHook::Visible, rec.listener.clone())
        .unwrap();
    assert_eq!(h.messenger.listener_count(), 1);

    // Same listener on a different hook is a separate registration.
    hooks.on(LifecycleHook::Hidden, rec.listener.clone()).unwrap();
    assert_eq!(h.messenger.listener_count(), 2);

    hooks.off(LifecycleHook::Visible, &rec.listener).unwrap();
    hooks.off(LifecycleHook::Hidden, &rec.listener).unwrap();
    assert_eq!(h.messenger.listener_count(), 0);
    assert!(!h.messenger.is_subscribed());
}

#[test]
fn once_hook_fires_on_first_match_only() {
    let h = common::harness();
    let hooks = LifecycleHooks::lifecycle(h.messenger.clone());
    let rec = common::Recorder::new();

    hooks.once(LifecycleHook::Unmounted, rec.listener.clone()).unwrap();
    // `off` without once does not match a once registration.
    hooks.off(LifecycleHook::Unmounted, &rec.listener).unwrap();
    assert_eq!(h.messenger.listener_count(), 1);

    h.deliver(json!({ "eventType": "lifecycle", "hook": "mounted" }));
    h.deliver(json!({ "eventType": "lifecycle", "hook": "unmounted" }));
    h.deliver(json!({ "eventType": "lifecycle", "hook": "unmounted" }));

    assert_eq!(rec.calls(), 1);
    assert_eq!(rec.payloads()[0]["hook"], "unmounted");
    assert_eq!(h.messenger.listener_count(), 0);
}

#[test]
fn off_once_cancels_a_pending_once_hook() {
    let h = common::harness();
    let hooks = LifecycleHooks::lifecycle(h.messenger.clone());
    let rec = common::Recorder::new();

    hooks.once(LifecycleHook::Mounted, rec.listener.clone()).unwrap();
    hooks.off_once(LifecycleHook::Mounted, &rec.listener).unwrap();
    h.deliver(json!({ "eventType": "lifecycle", "hook": "mounted" }));

    assert_eq!(rec.calls(), 0);
    assert!(!h.messenger.is_subscribed());
}

#[test]
fn conversation_hooks_share_the_messenger_subscription() {
    let h = common::harness();
    let lifecycle = LifecycleHooks::lifecycle(h.messenger.clone());
    let conversation = ConversationHooks::conversation(h.messenger.clone());
    let started = common::Recorder::new();
    let received = common::Recorder::new();
    let mounted = common::Recorder::new();

    conversation
        .on(ConversationHook::Started, started.listener.clone())
        .unwrap();
    conversation
        .on(ConversationHook::MessageReceived, received.listener.clone())
        .unwrap();
    lifecycle.on(LifecycleHook::Mounted, mounted.listener.clone()).unwrap();
    assert_eq!(h.host.attach_calls(), 1);

    h.deliver(json!({ "eventType": "conversation", "hook": "messageReceived", "text": "hey" }));
    // Hook names do not leak across event types.
    h.deliver(json!({ "eventType": "lifecycle", "hook": "started" }));

    assert_eq!(started.calls(), 0);
    assert_eq!(received.calls(), 1);
    assert_eq!(received.payloads()[0]["text"], "hey");
    assert_eq!(mounted.calls(), 0);
}

#[test]
fn toasts_post_show_and_dismiss_envelopes() {
    let h = common::harness();
    let toasts = Toasts::new(h.messenger.clone());

    toasts
        .show(
            &Toast::new("Saved")
                .description("All changes stored")
                .variant(ToastVariant::Success),
        )
        .unwrap();
    toasts.show(&Toast::new("plain")).unwrap();
    toasts.dismiss("toast-1").unwrap();

    let posted = h.host.take_outbox();
    assert_eq!(posted.len(), 3);
    assert!(posted.iter().all(|p| p.target == h.parent));
    assert!(posted.iter().all(|p| p.target_origin == common::ORIGIN));

    let first = &posted[0].message;
    assert_eq!(first["action"], "showToast");
    assert_eq!(first["title"], "Saved");
    assert_eq!(first["description"], "All changes stored");
    assert_eq!(first["variant"], "success");
    assert_eq!(first["protocol"], "frame-messaging");

    assert!(posted[1].message.get("description").is_none());
    assert_eq!(posted[1].message["variant"], "info");

    assert_eq!(posted[2].message["action"], "dismissToast");
    assert_eq!(posted[2].message["id"], "toast-1");
}
