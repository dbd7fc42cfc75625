//=========================================================================
// Pending Queue
//=========================================================================
//
// Registrations that arrive before boot. Nothing renderer-backed can be
// built yet, so `add` only records the request here; `boot` replays the
// queue in insertion order and empties it.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::source::resolve_key;
use super::StateSource;

//=== PendingRegistration =================================================

/// A deferred `add` call.
#[derive(Debug)]
pub struct PendingRegistration {
    /// Queue length at the time of the call.
    pub index: usize,

    /// Explicit key passed to `add`, if any.
    pub key: Option<String>,

    pub source: StateSource,
    pub auto_start: bool,
}

impl PendingRegistration {
    /// Key this registration will resolve to on replay.
    pub fn resolved_key(&self) -> String {
        resolve_key(self.key.as_deref(), &self.source)
    }
}

//=== PendingQueue ========================================================

/// Registrations buffered until boot.
#[derive(Debug, Default)]
pub struct PendingQueue {
    queue: Vec<PendingRegistration>,
}

impl PendingQueue {
    /// Creates a new empty queue.
    pub fn new() -> Self {
        Self { queue: Vec::new() }
    }

    /// Buffers a registration and returns its queue index.
    pub fn push(&mut self, key: Option<String>, source: StateSource, auto_start: bool) -> usize {
        let index = self.queue.len();
        self.queue.push(PendingRegistration {
            index,
            key,
            source,
            auto_start,
        });
        index
    }

    /// Flags every buffered registration resolving to `key` for start on
    /// boot. Returns whether any matched.
    pub fn mark_auto_start(&mut self, key: &str) -> bool {
        let mut matched = false;
        for pending in self.queue.iter_mut().filter(|p| p.resolved_key() == key) {
            pending.auto_start = true;
            matched = true;
        }
        matched
    }

    pub fn iter(&self) -> impl Iterator<Item = &PendingRegistration> {
        self.queue.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Takes all buffered registrations, leaving the queue empty.
    pub fn take(&mut self) -> Vec<PendingRegistration> {
        std::mem::take(&mut self.queue)
    }
}

//=== Tests ===============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::StateConfig;

    #[test]
    fn push_assigns_queue_indices() {
        let mut queue = PendingQueue::new();

        assert_eq!(queue.push(Some("a".into()), StateSource::config(StateConfig::default()), false), 0);
        assert_eq!(queue.push(None, StateSource::config(StateConfig::new("b")), true), 1);

        let indices: Vec<_> = queue.iter().map(|p| p.index).collect();
        assert_eq!(indices, vec![0, 1]);
    }

    #[test]
    fn mark_auto_start_matches_resolved_key() {
        let mut queue = PendingQueue::new();
        queue.push(Some("title".into()), StateSource::config(StateConfig::default()), false);
        queue.push(None, StateSource::config(StateConfig::new("game")), false);

        assert!(queue.mark_auto_start("game"));
        assert!(!queue.mark_auto_start("credits"));

        let flags: Vec<_> = queue.iter().map(|p| p.auto_start).collect();
        assert_eq!(flags, vec![false, true]);
    }

    #[test]
    fn take_empties_queue_in_order() {
        let mut queue = PendingQueue::new();
        queue.push(Some("first".into()), StateSource::config(StateConfig::default()), false);
        queue.push(Some("second".into()), StateSource::config(StateConfig::default()), false);

        let taken = queue.take();

        assert!(queue.is_empty());
        let keys: Vec<_> = taken.iter().map(|p| p.resolved_key()).collect();
        assert_eq!(keys, vec!["first", "second"]);
    }
}
