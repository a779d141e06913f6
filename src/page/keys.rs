//! Page-wide keyboard subscription
//!
//! The page has a single key listener slot. Whoever holds the [`KeyGrab`]
//! receives key presses; dropping the grab frees the slot, so a listener can
//! never outlive its owner.

use parking_lot::Mutex;
use std::sync::Arc;

/// Keys the page reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Enter,
    Other,
}

#[derive(Debug, Default)]
pub struct KeyBus {
    owner: Mutex<Option<u64>>,
    next_id: Mutex<u64>,
}

impl KeyBus {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Take the listener slot, evicting any previous holder
    pub fn grab(self: &Arc<Self>) -> KeyGrab {
        let id = {
            let mut next = self.next_id.lock();
            *next += 1;
            *next
        };
        if let Some(previous) = self.owner.lock().replace(id) {
            tracing::debug!("Key listener {} evicted by {}", previous, id);
        }
        KeyGrab {
            id,
            bus: Arc::clone(self),
        }
    }

    /// Number of attached listeners (zero or one)
    pub fn listener_count(&self) -> usize {
        usize::from(self.owner.lock().is_some())
    }

    fn is_owner(&self, id: u64) -> bool {
        *self.owner.lock() == Some(id)
    }

    fn release(&self, id: u64) {
        let mut owner = self.owner.lock();
        if *owner == Some(id) {
            *owner = None;
        }
    }
}

/// Exclusive ownership of the key listener slot. Not `Clone`.
#[derive(Debug)]
pub struct KeyGrab {
    id: u64,
    bus: Arc<KeyBus>,
}

impl KeyGrab {
    /// False once another grab has evicted this one
    pub fn is_active(&self) -> bool {
        self.bus.is_owner(self.id)
    }
}

impl Drop for KeyGrab {
    fn drop(&mut self) {
        self.bus.release(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_releases_slot() {
        let bus = KeyBus::new();
        let grab = bus.grab();
        assert!(grab.is_active());
        assert_eq!(bus.listener_count(), 1);
        drop(grab);
        assert_eq!(bus.listener_count(), 0);
    }

    #[test]
    fn test_single_owner() {
        let bus = KeyBus::new();
        let first = bus.grab();
        let second = bus.grab();
        assert!(!first.is_active());
        assert!(second.is_active());
        assert_eq!(bus.listener_count(), 1);

        // A stale grab must not free the slot it no longer owns
        drop(first);
        assert!(second.is_active());
        drop(second);
        assert_eq!(bus.listener_count(), 0);
    }
}
