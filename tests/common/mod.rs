#![allow(dead_code)]

use frame_messaging::{FrameConfig, FrameMessenger, InboundEvent, Listener, MemoryHost, WindowHandle};
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub const ORIGIN: &str = "https://host.example.com";

/// An embedded messenger wired to an in-memory host.
///
/// The messenger trusts `parent` and `ORIGIN`, so `harness.event(..)` builds
/// events that pass every trust check.
pub struct Harness {
    pub parent: WindowHandle,
    pub host: Arc<MemoryHost>,
    pub messenger: FrameMessenger,
}

impl Harness {
    pub fn event(&self, data: Value) -> InboundEvent {
        InboundEvent::new(&self.parent, ORIGIN, data)
    }

    pub fn deliver(&self, data: Value) {
        self.host.deliver(&self.event(data));
    }
}

pub fn harness() -> Harness {
    harness_with(FrameConfig::default().with_target_origin(ORIGIN))
}

pub fn harness_with(config: FrameConfig) -> Harness {
    let parent = WindowHandle::new("parent");
    let host = Arc::new(MemoryHost::embedded(parent.clone()));
    let messenger = FrameMessenger::new(host.clone(), config);
    Harness {
        parent,
        host,
        messenger,
    }
}

/// A listener that counts calls and remembers every payload it saw.
pub struct Recorder {
    pub listener: Listener,
    calls: Arc<AtomicUsize>,
    seen: Arc<Mutex<Vec<Value>>>,
}

impl Recorder {
    pub fn new() -> Self {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let listener: Listener = {
            let calls = calls.clone();
            let seen = seen.clone();
            Arc::new(move |payload: Value| {
                calls.fetch_add(1, Ordering::SeqCst);
                seen.lock().push(payload);
            })
        };
        Self {
            listener,
            calls,
            seen,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn payloads(&self) -> Vec<Value> {
        self.seen.lock().clone()
    }
}
