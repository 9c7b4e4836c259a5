//! Store change events
//!
//! When a watched store emits "changed", a `ChangeEvent` naming the store is
//! forwarded to the watcher's channel. Events carry no data; read the store
//! after receiving one.

use std::time::Instant;

/// A store emitted a change notification
///
/// # Example
///
/// ```rust,ignore
/// for event in watcher.iter() {
///     if event.store_key == "TeamStore" {
///         let teams = team_store.get_item(project);
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ChangeEvent {
    /// `Store::key()` of the store that changed
    pub store_key: &'static str,

    /// When the notification was received
    pub timestamp: Instant,
}

impl ChangeEvent {
    pub fn new(store_key: &'static str) -> Self {
        Self {
            store_key,
            timestamp: Instant::now(),
        }
    }

    pub fn with_timestamp(store_key: &'static str, timestamp: Instant) -> Self {
        Self {
            store_key,
            timestamp,
        }
    }
}

impl PartialEq for ChangeEvent {
    fn eq(&self, other: &Self) -> bool {
        // Timestamp not included in equality
        self.store_key == other.store_key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_event_equality() {
        let a = ChangeEvent::new("TeamStore");
        let b = ChangeEvent::with_timestamp("TeamStore", Instant::now());
        let c = ChangeEvent::new("GitRepoStore");

        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
