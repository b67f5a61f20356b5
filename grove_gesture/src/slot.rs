//! Single-slot latest-value channel.
//!
//! The inference thread overwrites the slot with each new snapshot; there is no
//! queue, so a slow render loop only ever sees the newest one. Every publish
//! gets a sequence number and a reader hands out a given sequence at most once.

use std::sync::{Arc, Mutex, MutexGuard};

struct Stamped<T> {
    seq:   u64,
    value: Arc<T>,
}

type Shared<T> = Arc<Mutex<Option<Stamped<T>>>>;

pub struct SlotWriter<T> {
    shared:   Shared<T>,
    next_seq: u64,
}

pub struct SlotReader<T> {
    shared:    Shared<T>,
    last_seen: u64,
}

pub fn latest_slot<T>() -> (SlotWriter<T>, SlotReader<T>) {
    let shared: Shared<T> = Arc::new(Mutex::new(None));
    (
        SlotWriter { shared: Arc::clone(&shared), next_seq: 1 },
        SlotReader { shared, last_seen: 0 },
    )
}

fn lock<T>(shared: &Shared<T>) -> MutexGuard<'_, Option<Stamped<T>>> {
    // a panicking writer leaves a complete value behind; keep using it
    shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl<T> SlotWriter<T> {
    /// Replace whatever is in the slot. Returns the new sequence number.
    pub fn publish(&mut self, value: T) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        *lock(&self.shared) = Some(Stamped { seq, value: Arc::new(value) });
        seq
    }
}

impl<T> SlotReader<T> {
    /// The current value if it has not been handed out yet.
    pub fn take_fresh(&mut self) -> Option<Arc<T>> {
        let guard = lock(&self.shared);
        let stamped = guard.as_ref()?;
        if stamped.seq <= self.last_seen {
            return None;
        }
        self.last_seen = stamped.seq;
        Some(Arc::clone(&stamped.value))
    }

    /// The current value regardless of whether it was seen before.
    pub fn peek(&self) -> Option<Arc<T>> {
        lock(&self.shared).as_ref().map(|s| Arc::clone(&s.value))
    }

    pub fn last_seen(&self) -> u64 { self.last_seen }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn empty_slot_yields_nothing() {
        let (_w, mut r) = latest_slot::<u32>();
        assert!(r.take_fresh().is_none());
        assert!(r.peek().is_none());
    }

    #[test]
    fn each_value_is_taken_once() {
        let (mut w, mut r) = latest_slot();
        w.publish(7);
        assert_eq!(r.take_fresh().as_deref(), Some(&7));
        assert!(r.take_fresh().is_none());
        assert_eq!(r.peek().as_deref(), Some(&7));
    }

    #[test]
    fn publish_overwrites_unread_values() {
        let (mut w, mut r) = latest_slot();
        w.publish("a");
        w.publish("b");
        let seq = w.publish("c");
        assert_eq!(r.take_fresh().as_deref(), Some(&"c"));
        assert_eq!(r.last_seen(), seq);
        assert!(r.take_fresh().is_none());
    }

    #[test]
    fn works_across_threads() {
        let (mut w, mut r) = latest_slot();
        let handle = thread::spawn(move || {
            for i in 0..1_000u32 {
                w.publish(i);
            }
        });
        handle.join().unwrap();
        assert_eq!(r.take_fresh().as_deref(), Some(&999));
    }
}
