//! Single-slot, latest-wins handoff from the capture thread to the UI thread.
//!
//! The slot is a `crossbeam_channel::bounded(1)`. Publishing never blocks:
//! when the slot is full the stale value is evicted and the send retried.
//! The consumer drains the slot on every read and keeps the newest value, so
//! repeated reads between publications return the same `Arc<FaceSet>`.
//!
//! Clearing bumps a shared epoch. Sets stamped with an older epoch are
//! discarded by the consumer, so a result computed before a teardown can
//! never reappear after it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender, TryRecvError, TrySendError};

use crate::shared::face::FaceSet;

/// Creates a connected publisher/consumer pair with an empty slot.
pub fn channel() -> (HandoffPublisher, HandoffConsumer) {
    let (tx, rx) = crossbeam_channel::bounded(1);
    let epoch = Arc::new(AtomicU64::new(0));
    let publisher = HandoffPublisher {
        tx,
        evict: rx.clone(),
        epoch: Arc::clone(&epoch),
    };
    let consumer = HandoffConsumer {
        rx,
        epoch,
        current: Arc::new(FaceSet::empty(0)),
    };
    (publisher, consumer)
}

/// Capture-side end. Only the capture thread publishes, so there is exactly
/// one publisher per channel and it cannot be cloned:
///
/// ```compile_fail
/// let (tx, _rx) = face_overlay_core::pipeline::handoff::channel();
/// let _second = tx.clone();
/// ```
pub struct HandoffPublisher {
    tx: Sender<Arc<FaceSet>>,
    evict: Receiver<Arc<FaceSet>>,
    epoch: Arc<AtomicU64>,
}

impl HandoffPublisher {
    /// Current generation; stamp it on a set before starting detection.
    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::Acquire)
    }

    /// Overwrites the slot with `set`. Never blocks.
    ///
    /// Sets from an epoch that has since been cleared are dropped here.
    /// Returns `false` when the set was dropped.
    pub fn publish(&self, set: Arc<FaceSet>) -> bool {
        if set.epoch < self.epoch() {
            log::debug!(
                "Dropping face set from cleared epoch {} (ts {})",
                set.epoch,
                set.timestamp
            );
            return false;
        }

        let mut pending = set;
        loop {
            match self.tx.try_send(pending) {
                Ok(()) => return true,
                Err(TrySendError::Full(back)) => {
                    pending = back;
                    let _ = self.evict.try_recv();
                }
                Err(TrySendError::Disconnected(_)) => return false,
            }
        }
    }

    pub fn reset_handle(&self) -> ResetHandle {
        ResetHandle {
            epoch: Arc::clone(&self.epoch),
        }
    }
}

/// UI-side end. Holds the render snapshot.
pub struct HandoffConsumer {
    rx: Receiver<Arc<FaceSet>>,
    epoch: Arc<AtomicU64>,
    current: Arc<FaceSet>,
}

impl HandoffConsumer {
    /// Returns the most recently published set of the current epoch, or an
    /// empty set if nothing has been published since the last clear.
    ///
    /// Never returns a set older than one it already returned.
    pub fn consume(&mut self) -> Arc<FaceSet> {
        let epoch = self.epoch.load(Ordering::Acquire);
        if self.current.epoch < epoch {
            self.current = Arc::new(FaceSet::empty(epoch));
        }

        loop {
            match self.rx.try_recv() {
                Ok(set) => {
                    if set.epoch >= epoch && set.order_key() >= self.current.order_key() {
                        self.current = set;
                    }
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }

        Arc::clone(&self.current)
    }

    /// Last value returned by [`consume`](Self::consume), without draining.
    pub fn snapshot(&self) -> Arc<FaceSet> {
        Arc::clone(&self.current)
    }

    pub fn reset_handle(&self) -> ResetHandle {
        ResetHandle {
            epoch: Arc::clone(&self.epoch),
        }
    }
}

/// Clears the handoff from any thread.
#[derive(Clone)]
pub struct ResetHandle {
    epoch: Arc<AtomicU64>,
}

impl ResetHandle {
    /// Invalidates everything published so far. Returns the new epoch.
    pub fn clear(&self) -> u64 {
        self.epoch.fetch_add(1, Ordering::AcqRel) + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::face::{DetectedFace, RawFace};
    use std::thread;

    fn face_set(epoch: u64, sequence: u64, faces: usize) -> Arc<FaceSet> {
        let faces = (0..faces)
            .map(|i| {
                DetectedFace::try_from_raw(RawFace::with_bounds(i as f64, 0.0, 10.0, 10.0))
                    .unwrap()
            })
            .collect();
        Arc::new(FaceSet {
            faces,
            timestamp: sequence as i64 * 10,
            frame_width: 100,
            frame_height: 100,
            epoch,
            sequence,
        })
    }

    #[test]
    fn test_consume_before_publish_is_empty() {
        let (_tx, mut rx) = channel();
        assert!(rx.consume().is_empty());
    }

    #[test]
    fn test_latest_publish_wins() {
        let (tx, mut rx) = channel();
        for seq in 1..=5 {
            tx.publish(face_set(0, seq, seq as usize));
        }
        let seen = rx.consume();
        assert_eq!(seen.sequence, 5);
        assert_eq!(seen.len(), 5);
    }

    #[test]
    fn test_repeated_consume_returns_same_value() {
        let (tx, mut rx) = channel();
        tx.publish(face_set(0, 1, 2));
        let first = rx.consume();
        for _ in 0..10 {
            let again = rx.consume();
            assert!(Arc::ptr_eq(&first, &again));
        }
    }

    #[test]
    fn test_new_publish_replaces_snapshot() {
        let (tx, mut rx) = channel();
        tx.publish(face_set(0, 1, 2));
        assert_eq!(rx.consume().len(), 2);
        tx.publish(face_set(0, 2, 0));
        assert!(rx.consume().is_empty());
    }

    #[test]
    fn test_clear_empties_next_consume() {
        let (tx, mut rx) = channel();
        tx.publish(face_set(0, 1, 3));
        assert_eq!(rx.consume().len(), 3);

        tx.publish(face_set(0, 2, 4));
        tx.reset_handle().clear();

        let after = rx.consume();
        assert!(after.is_empty());
        assert_eq!(after.epoch, 1);
    }

    #[test]
    fn test_clear_before_first_consume() {
        let (tx, mut rx) = channel();
        tx.publish(face_set(0, 1, 3));
        rx.reset_handle().clear();
        assert!(rx.consume().is_empty());
    }

    #[test]
    fn test_stale_epoch_publish_is_dropped() {
        let (tx, mut rx) = channel();
        let stamped = tx.epoch();
        tx.reset_handle().clear();
        // Computed before the clear, published after it.
        assert!(!tx.publish(face_set(stamped, 1, 1)));
        assert!(rx.consume().is_empty());
    }

    #[test]
    fn test_publish_after_clear_is_visible() {
        let (tx, mut rx) = channel();
        let epoch = tx.reset_handle().clear();
        assert!(tx.publish(face_set(epoch, 7, 2)));
        let seen = rx.consume();
        assert_eq!(seen.sequence, 7);
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn test_never_goes_backwards() {
        let (tx, mut rx) = channel();
        tx.publish(face_set(0, 5, 1));
        assert_eq!(rx.consume().sequence, 5);
        tx.publish(face_set(0, 3, 1));
        assert_eq!(rx.consume().sequence, 5);
    }

    #[test]
    fn test_publish_without_consumer_does_not_block() {
        let (tx, rx) = channel();
        drop(rx);
        for seq in 1..100 {
            tx.publish(face_set(0, seq, 1));
        }
    }

    #[test]
    fn test_concurrent_consumer_sees_monotonic_sequences() {
        let (tx, mut rx) = channel();
        let producer = thread::spawn(move || {
            for seq in 1..=5_000 {
                tx.publish(face_set(0, seq, (seq % 4) as usize));
            }
        });

        let mut last = 0;
        while !producer.is_finished() {
            let seen = rx.consume();
            assert!(seen.sequence >= last, "{} < {}", seen.sequence, last);
            assert_eq!(seen.len(), (seen.sequence % 4) as usize);
            last = seen.sequence;
        }
        producer.join().unwrap();

        assert_eq!(rx.consume().sequence, 5_000);
    }
}
