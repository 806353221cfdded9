//! Push-event multiplexer.
//!
//! The backend publishes scanner, card-reader and payment notifications on a
//! single `GET /events` stream. An [`EventHub`] owns at most one connection
//! to that stream and fans every decoded [`PushEvent`] out to named
//! subscribers in the order they registered.
//!
//! Most callers share the process-wide hub from [`EventHub::global`].

mod sse;

use std::sync::{Arc, Mutex};

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use paydesk_types::PushEvent;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::PaydeskClient;

pub use sse::{Backoff, SseFrame, parse_sse_frame};

pub(crate) const EVENTS_TARGET: &str = "paydesk_events";

/// Callback invoked for every event delivered to a subscriber.
pub type Subscriber = Arc<dyn Fn(&PushEvent) + Send + Sync>;

static GLOBAL: Lazy<Arc<EventHub>> = Lazy::new(|| Arc::new(EventHub::new()));

/// Fan-out point for the server-push stream.
#[derive(Default)]
pub struct EventHub {
    subscribers: Mutex<IndexMap<String, Subscriber>>,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for EventHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventHub")
            .field("subscribers", &self.subscriber_names())
            .field("connected", &self.is_connected())
            .finish()
    }
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide hub.
    pub fn global() -> Arc<EventHub> {
        Arc::clone(&GLOBAL)
    }

    /// Register `callback` under `name`, replacing any previous subscriber
    /// with that name while keeping its position.
    pub fn subscribe<F>(&self, name: impl Into<String>, callback: F)
    where
        F: Fn(&PushEvent) + Send + Sync + 'static,
    {
        let name = name.into();
        debug!(target: EVENTS_TARGET, subscriber = %name, "subscribed");
        self.subscribers
            .lock()
            .expect("subscriber lock poisoned")
            .insert(name, Arc::new(callback));
    }

    /// Remove the subscriber registered under `name`. Returns whether one existed.
    pub fn unsubscribe(&self, name: &str) -> bool {
        self.subscribers
            .lock()
            .expect("subscriber lock poisoned")
            .shift_remove(name)
            .is_some()
    }

    pub fn subscriber_names(&self) -> Vec<String> {
        self.subscribers
            .lock()
            .expect("subscriber lock poisoned")
            .keys()
            .cloned()
            .collect()
    }

    /// Open the push stream unless it is already open.
    ///
    /// Must be called from within a tokio runtime. Returns `false` when a
    /// listener was already running.
    pub fn connect(self: &Arc<Self>, client: &PaydeskClient) -> bool {
        let mut listener = self.listener.lock().expect("listener lock poisoned");
        if listener.as_ref().is_some_and(|task| !task.is_finished()) {
            debug!(target: EVENTS_TARGET, "push stream already connected");
            return false;
        }
        *listener = Some(sse::spawn_listener(client.clone(), Arc::downgrade(self)));
        true
    }

    pub fn is_connected(&self) -> bool {
        self.listener
            .lock()
            .expect("listener lock poisoned")
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    /// Stop the stream listener. Subscribers stay registered.
    pub fn shutdown(&self) {
        if let Some(task) = self.listener.lock().expect("listener lock poisoned").take() {
            task.abort();
            debug!(target: EVENTS_TARGET, "push stream closed");
        }
    }

    /// Decode the data of one stream frame and deliver it.
    ///
    /// Payloads that are not a known event (keep-alives, greetings, unknown
    /// types) are dropped. Returns the delivered event.
    pub fn dispatch(&self, data: &str) -> Option<PushEvent> {
        match serde_json::from_str::<PushEvent>(data) {
            Ok(event) => {
                self.publish(&event);
                Some(event)
            }
            Err(error) => {
                debug!(target: EVENTS_TARGET, %error, data, "ignoring push payload");
                None
            }
        }
    }

    /// Deliver an already-decoded event to every subscriber.
    pub fn publish(&self, event: &PushEvent) {
        // Callbacks run without the lock so they may (un)subscribe.
        let subscribers: Vec<Subscriber> = self
            .subscribers
            .lock()
            .expect("subscriber lock poisoned")
            .values()
            .cloned()
            .collect();
        debug!(target: EVENTS_TARGET, kind = event.kind(), subscribers = subscribers.len(), "dispatching event");
        for subscriber in subscribers {
            subscriber(event);
        }
    }
}

impl Drop for EventHub {
    fn drop(&mut self) {
        if let Ok(listener) = self.listener.get_mut()
            && let Some(task) = listener.take()
        {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    fn recorder(hub: &EventHub, name: &str, log: &Arc<StdMutex<Vec<String>>>) {
        let log = Arc::clone(log);
        let label = name.to_string();
        hub.subscribe(name, move |event| {
            log.lock().unwrap().push(format!("{label}:{}", event.kind()));
        });
    }

    #[test]
    fn fans_out_in_registration_order() {
        let hub = EventHub::new();
        let log = Arc::new(StdMutex::new(Vec::new()));
        recorder(&hub, "terminal", &log);
        recorder(&hub, "toasts", &log);

        let event = hub.dispatch(r#"{"type":"timeout"}"#);
        assert_eq!(event, Some(PushEvent::Timeout));
        assert_eq!(*log.lock().unwrap(), vec!["terminal:timeout", "toasts:timeout"]);
    }

    #[test]
    fn resubscribing_replaces_in_place() {
        let hub = EventHub::new();
        let log = Arc::new(StdMutex::new(Vec::new()));
        recorder(&hub, "a", &log);
        recorder(&hub, "b", &log);
        recorder(&hub, "a", &log);
        assert_eq!(hub.subscriber_names(), vec!["a", "b"]);

        hub.dispatch(r#"{"type":"remove-nfc-card"}"#);
        assert_eq!(log.lock().unwrap().len(), 2);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let hub = EventHub::new();
        let log = Arc::new(StdMutex::new(Vec::new()));
        recorder(&hub, "a", &log);
        assert!(hub.unsubscribe("a"));
        assert!(!hub.unsubscribe("a"));

        hub.dispatch(r#"{"type":"timeout"}"#);
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn non_event_payloads_are_swallowed() {
        let hub = EventHub::new();
        let log = Arc::new(StdMutex::new(Vec::new()));
        recorder(&hub, "a", &log);

        assert_eq!(hub.dispatch("connected"), None);
        assert_eq!(hub.dispatch(r#"{"type":"ping"}"#), None);
        assert_eq!(hub.dispatch(""), None);
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn subscriber_may_unsubscribe_itself() {
        let hub = Arc::new(EventHub::new());
        let weak = Arc::downgrade(&hub);
        hub.subscribe("once", move |_| {
            if let Some(hub) = weak.upgrade() {
                hub.unsubscribe("once");
            }
        });
        hub.dispatch(r#"{"type":"timeout"}"#);
        assert!(hub.subscriber_names().is_empty());
    }

    #[tokio::test]
    async fn connect_is_idempotent_and_shutdown_stops() {
        let hub = Arc::new(EventHub::new());
        // Nothing listens on port 9; the listener keeps retrying in the background.
        let client = PaydeskClient::with_base_url("http://127.0.0.1:9", false).unwrap();

        assert!(hub.connect(&client));
        assert!(!hub.connect(&client));
        assert!(hub.is_connected());

        hub.shutdown();
        tokio::task::yield_now().await;
        assert!(!hub.is_connected());
        assert!(hub.connect(&client));
        hub.shutdown();
    }
}
