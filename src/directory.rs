//! Room directory.
//!
//! A read-mostly map from room code to the handle of the owning task.
//! Resolution is allocate-on-miss: connecting to any well-formed code
//! either finds the live room or creates a fresh one in WAITING. Rooms
//! own their state and terminate themselves; the directory only forgets
//! dead handles, either on the next resolve or in the periodic sweep.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::config::RoomTimings;
use crate::room::{spawn_room, RoomHandle};

pub struct RoomDirectory {
    rooms: DashMap<String, RoomHandle>,
    timings: RoomTimings,
}

impl RoomDirectory {
    pub fn new(timings: RoomTimings) -> Self {
        Self {
            rooms: DashMap::new(),
            timings,
        }
    }

    /// Return the live room for a (normalized) code, spawning one when the
    /// code is unknown or its previous room has terminated. Creation is
    /// serialized per code by the map's entry lock.
    pub fn resolve(&self, code: &str) -> RoomHandle {
        match self.rooms.entry(code.to_string()) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().is_closed() {
                    tracing::debug!(code, "Replacing terminated room");
                    let handle = spawn_room(code, self.timings);
                    occupied.insert(handle.clone());
                    handle
                } else {
                    occupied.get().clone()
                }
            }
            Entry::Vacant(vacant) => {
                let handle = spawn_room(code, self.timings);
                vacant.insert(handle.clone());
                handle
            }
        }
    }

    /// Look up a room without creating one.
    pub fn get(&self, code: &str) -> Option<RoomHandle> {
        self.rooms
            .get(code)
            .map(|entry| entry.clone())
            .filter(|handle| !handle.is_closed())
    }

    /// Forget rooms whose tasks have terminated. Returns how many entries
    /// were removed.
    pub fn sweep(&self) -> usize {
        let before = self.rooms.len();
        self.rooms.retain(|_, handle| !handle.is_closed());
        before - self.rooms.len()
    }

    /// Number of directory entries, live or awaiting sweep.
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}
