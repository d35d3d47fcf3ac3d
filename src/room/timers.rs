//! Cancellable one-shot timers for a room.
//!
//! A timer never mutates state itself: it posts a [`RoomEvent::Timer`]
//! into the room's queue, so firings are serialized with network messages.
//! Cancellation is best-effort: a firing that loses the race against a
//! cancel or rearm is detected by its generation number and dropped.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::protocol::PlayerId;

use super::event::RoomEvent;

/// The timers a room can hold. One slot per kind; rearming replaces the
/// previous one-shot atomically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Destroys an idle WAITING room.
    RoomIdle,
    /// One countdown second elapsed.
    CountdownTick,
    /// The pause between a round win and the next round.
    InterRound,
    /// A disconnected player's grace period ran out.
    DisconnectGrace(PlayerId),
    /// The post-game rejoin window closed.
    RejoinWindow,
}

/// A timer firing, tagged with the generation it was armed under.
#[derive(Debug, Clone, Copy)]
pub struct TimerFired {
    pub kind: TimerKind,
    pub generation: u64,
}

struct ArmedTimer {
    generation: u64,
    task: JoinHandle<()>,
    /// Wall-clock deadline in epoch milliseconds, for client display.
    deadline_ms: i64,
}

impl Drop for ArmedTimer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Owner of all outstanding one-shots for one room.
pub struct TimerManager {
    tx: mpsc::UnboundedSender<RoomEvent>,
    armed: HashMap<TimerKind, ArmedTimer>,
    next_generation: u64,
}

impl TimerManager {
    pub fn new(tx: mpsc::UnboundedSender<RoomEvent>) -> Self {
        Self {
            tx,
            armed: HashMap::new(),
            next_generation: 0,
        }
    }

    /// Arm (or rearm) a one-shot. The previous timer of the same kind, if
    /// any, is aborted and its generation invalidated.
    pub fn arm(&mut self, kind: TimerKind, delay: Duration) {
        self.next_generation += 1;
        let generation = self.next_generation;
        let tx = self.tx.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(RoomEvent::Timer(TimerFired { kind, generation }));
        });
        let deadline_ms = chrono::Utc::now().timestamp_millis()
            + i64::try_from(delay.as_millis()).unwrap_or(i64::MAX);
        self.armed.insert(
            kind,
            ArmedTimer {
                generation,
                task,
                deadline_ms,
            },
        );
    }

    /// Cancel a timer. Idempotent; canceling an unarmed kind is a no-op.
    pub fn cancel(&mut self, kind: TimerKind) {
        self.armed.remove(&kind);
    }

    /// Cancel every outstanding timer (room teardown).
    pub fn cancel_all(&mut self) {
        self.armed.clear();
    }

    /// Validate a firing against the live generation. A stale firing (the
    /// timer was cancelled or rearmed after this one-shot was spawned)
    /// returns false and must be ignored. An accepted firing consumes the
    /// slot: the timer is one-shot and no longer armed afterwards.
    pub fn accept(&mut self, fired: TimerFired) -> bool {
        match self.armed.get(&fired.kind) {
            Some(armed) if armed.generation == fired.generation => {
                self.armed.remove(&fired.kind);
                true
            }
            _ => false,
        }
    }

    pub fn is_armed(&self, kind: TimerKind) -> bool {
        self.armed.contains_key(&kind)
    }

    /// Wall-clock deadline of an armed timer, for client display.
    pub fn deadline_ms(&self, kind: TimerKind) -> Option<i64> {
        self.armed.get(&kind).map(|t| t.deadline_ms)
    }

    /// Player ids with a grace timer currently armed.
    pub fn pending_grace(&self) -> Vec<PlayerId> {
        self.armed
            .keys()
            .filter_map(|kind| match kind {
                TimerKind::DisconnectGrace(id) => Some(*id),
                _ => None,
            })
            .collect()
    }
}
