mod common;

use frame_messaging::subscription::SubscriptionState;
use frame_messaging::ListenerOptions;
use serde_json::json;

#[test]
fn starts_unsubscribed_without_touching_the_host() {
    let h = common::harness();
    assert_eq!(h.messenger.subscription_state(), SubscriptionState::Unsubscribed);
    assert_eq!(h.host.attach_calls(), 0);
    assert_eq!(h.host.attached_handlers(), 0);
}

#[test]
fn one_attach_and_one_detach_per_zero_crossing() {
    let h = common::harness();
    let a = common::Recorder::new();
    let b = common::Recorder::new();

    h.messenger
        .add_listener("one", a.listener.clone(), ListenerOptions::default())
        .unwrap();
    h.messenger
        .add_listener("two", b.listener.clone(), ListenerOptions::default())
        .unwrap();
    h.messenger
        .add_listener("one", b.listener.clone(), ListenerOptions::once())
        .unwrap();
    assert_eq!(h.host.attach_calls(), 1);
    assert_eq!(h.host.attached_handlers(), 1);

    // Remove and re-add while the count stays above zero.
    h.messenger
        .remove_listener("two", &b.listener, ListenerOptions::default())
        .unwrap();
    h.messenger
        .add_listener("two", b.listener.clone(), ListenerOptions::default())
        .unwrap();
    assert_eq!(h.host.attach_calls(), 1);
    assert_eq!(h.host.detach_calls(), 0);

    h.messenger
        .remove_listener("one", &a.listener, ListenerOptions::default())
        .unwrap();
    h.messenger
        .remove_listener("one", &b.listener, ListenerOptions::once())
        .unwrap();
    h.messenger
        .remove_listener("two", &b.listener, ListenerOptions::default())
        .unwrap();

    assert_eq!(h.host.detach_calls(), 1);
    assert_eq!(h.host.attached_handlers(), 0);
    assert!(!h.messenger.is_subscribed());
}

#[test]
fn resubscribes_after_going_back_to_zero() {
    let h = common::harness();
    let rec = common::Recorder::new();

    for _ in 0..3 {
        h.messenger
            .add_listener("ping", rec.listener.clone(), ListenerOptions::default())
            .unwrap();
        h.messenger
            .remove_listener("ping", &rec.listener, ListenerOptions::default())
            .unwrap();
    }

    assert_eq!(h.host.attach_calls(), 3);
    assert_eq!(h.host.detach_calls(), 3);
    assert_eq!(h.host.attached_handlers(), 0);
}

#[test]
fn duplicate_add_does_not_reattach() {
    let h = common::harness();
    let rec = common::Recorder::new();

    for _ in 0..5 {
        h.messenger
            .add_listener("ping", rec.listener.clone(), ListenerOptions::default())
            .unwrap();
    }
    assert_eq!(h.host.attach_calls(), 1);

    h.messenger
        .remove_listener("ping", &rec.listener, ListenerOptions::default())
        .unwrap();
    assert_eq!(h.host.detach_calls(), 1);
}

#[test]
fn no_delivery_after_unsubscribe() {
    let h = common::harness();
    let rec = common::Recorder::new();

    h.messenger
        .add_listener("ping", rec.listener.clone(), ListenerOptions::default())
        .unwrap();
    h.deliver(json!({ "eventType": "ping" }));
    h.messenger
        .remove_listener("ping", &rec.listener, ListenerOptions::default())
        .unwrap();
    h.deliver(json!({ "eventType": "ping" }));

    assert_eq!(rec.calls(), 1);
}

#[test]
fn dropping_the_messenger_detaches_its_handler() {
    let h = common::harness();
    let rec = common::Recorder::new();

    h.messenger
        .add_listener("ping", rec.listener.clone(), ListenerOptions::default())
        .unwrap();
    assert_eq!(h.host.attached_handlers(), 1);

    let common::Harness { host, messenger, .. } = h;
    drop(messenger);

    assert_eq!(host.attached_handlers(), 0);
}
