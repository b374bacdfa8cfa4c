use serde::{Deserialize, Serialize};
use tracing::debug;

/// Notification emitted by a [`crate::HealthState`] transition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HealthEvent {
    /// Health was changed by a heal or a non-lethal hit. `delta` is negative
    /// for damage and positive for healing.
    HealthChanged { health: f32, delta: f32 },
    Died,
    CooldownStarted,
    CooldownEnded,
}

impl HealthEvent {
    pub fn label(&self) -> &'static str {
        match self {
            HealthEvent::HealthChanged { .. } => "health_changed",
            HealthEvent::Died => "died",
            HealthEvent::CooldownStarted => "cooldown_started",
            HealthEvent::CooldownEnded => "cooldown_ended",
        }
    }
}

/// Handle returned by [`Listeners::subscribe`], used to unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&HealthEvent) + Send + Sync>;

/// Ordered observer list. Dispatch is synchronous and in subscription order.
#[derive(Default)]
pub struct Listeners {
    next_id: u64,
    entries: Vec<(ListenerId, Listener)>,
}

impl Listeners {
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&HealthEvent) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, Box::new(listener)));
        id
    }

    /// Returns `false` when `id` was not subscribed (or already removed).
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub(crate) fn dispatch(&mut self, event: HealthEvent) {
        debug!(
            target: "health_core.health",
            event = event.label(),
            listeners = self.entries.len(),
            "dispatching health event"
        );
        for (_, listener) in self.entries.iter_mut() {
            listener(&event);
        }
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn dispatch_reaches_listeners_in_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut listeners = Listeners::default();
        for tag in ["first", "second"] {
            let seen = Arc::clone(&seen);
            listeners.subscribe(move |event| seen.lock().unwrap().push((tag, *event)));
        }

        listeners.dispatch(HealthEvent::Died);

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![("first", HealthEvent::Died), ("second", HealthEvent::Died)]
        );
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let count = Arc::new(Mutex::new(0));
        let mut listeners = Listeners::default();
        let counter = Arc::clone(&count);
        let id = listeners.subscribe(move |_| *counter.lock().unwrap() += 1);

        listeners.dispatch(HealthEvent::CooldownStarted);
        assert!(listeners.unsubscribe(id));
        assert!(!listeners.unsubscribe(id));
        listeners.dispatch(HealthEvent::CooldownEnded);

        assert_eq!(*count.lock().unwrap(), 1);
        assert_eq!(format!("{listeners:?}"), "Listeners { count: 0 }");
    }
}
