#![forbid(unsafe_code)]

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::warn;
use serde::{Deserialize, Serialize};

// ***************************************************************************
//                              Friend Records
// ***************************************************************************
// ---------------------------------------------------------------------------
// Friend:
// ---------------------------------------------------------------------------
/** A single roster record.  The handle is the de-facto lookup key, but the
 * store never enforces its uniqueness; when duplicates exist, the first
 * record in insertion order wins every lookup.  Records have no identity
 * beyond their field values.
 */
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Friend {
    pub name: String,
    pub handle: String,
    pub skill: String,
}

impl Friend {
    pub fn new(name: &str, handle: &str, skill: &str) -> Self {
        Self {
            name: name.to_string(),
            handle: handle.to_string(),
            skill: skill.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// FriendPatch:
// ---------------------------------------------------------------------------
/// Partial record used by merge operations.  A None field leaves the stored
/// value untouched.
#[derive(Debug, Clone, Default)]
pub struct FriendPatch {
    pub name: Option<String>,
    pub handle: Option<String>,
    pub skill: Option<String>,
}

impl FriendPatch {
    /// True when the patch carries no field at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.handle.is_none() && self.skill.is_none()
    }
}

// ***************************************************************************
//                               Roster Store
// ***************************************************************************
// ---------------------------------------------------------------------------
// RosterStore:
// ---------------------------------------------------------------------------
/** The ordered, in-memory collection of friend records and the only state
 * this server owns.  The store is a cheap handle: cloning it clones the
 * Arc, so every route handler constructed with a clone sees the same
 * records.  Lifetime is the process lifetime; nothing persists.
 *
 * Lookups are linear scans and the first matching record wins.  Mutations
 * take the interior lock once per operation; there are no transaction
 * boundaries spanning a find and a later index-based mutation, so the
 * index mutators bounds-check and report failure instead of panicking.
 */
#[derive(Clone, Default)]
pub struct RosterStore {
    friends: Arc<RwLock<Vec<Friend>>>,
}

impl RosterStore {
    /// Create an empty store.
    #[allow(dead_code)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the given records in the given order.
    pub fn with_friends(friends: Vec<Friend>) -> Self {
        Self {
            friends: Arc::new(RwLock::new(friends)),
        }
    }

    /// Create the store every server process starts with.
    pub fn seeded() -> Self {
        Self::with_friends(vec![
            Friend::new("Rick", "rick", "portal gun"),
            Friend::new("Morty", "morty", "running"),
            Friend::new("Summer", "summer", "scheme spotting"),
            Friend::new("Beth", "beth", "horse surgery"),
            Friend::new("Jerry", "jerry", "surviving"),
        ])
    }

    // ------------------------------------------------------------------
    // Queries.
    // ------------------------------------------------------------------
    /// Return the first record whose handle equals the input, if any.
    pub fn find_by_handle(&self, handle: &str) -> Option<Friend> {
        self.read_guard()
            .iter()
            .find(|f| f.handle == handle)
            .cloned()
    }

    /// Return the index of the first record whose handle equals the input.
    pub fn find_index_by_handle(&self, handle: &str) -> Option<usize> {
        self.read_guard().iter().position(|f| f.handle == handle)
    }

    /// Return all records in store order.
    pub fn list_all(&self) -> Vec<Friend> {
        self.read_guard().clone()
    }

    pub fn len(&self) -> usize {
        self.read_guard().len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.read_guard().is_empty()
    }

    // ------------------------------------------------------------------
    // Mutations.
    // ------------------------------------------------------------------
    /// Add a record at the end.  No deduplication: a repeated handle is
    /// accepted and merely logged, and subsequent lookups keep resolving
    /// to the earliest record with that handle.
    pub fn append(&self, friend: Friend) {
        let mut friends = self.write_guard();
        if friends.iter().any(|f| f.handle == friend.handle) {
            warn!(
                "Appending duplicate handle '{}'; lookups will keep returning the first match.",
                friend.handle
            );
        }
        friends.push(friend);
    }

    /// Overwrite the record at the index in place.  Returns false when the
    /// index is out of range.
    pub fn replace_at(&self, index: usize, friend: Friend) -> bool {
        let mut friends = self.write_guard();
        match friends.get_mut(index) {
            Some(slot) => {
                *slot = friend;
                true
            }
            None => false,
        }
    }

    /// Remove the record at the index, shifting later records earlier.
    /// Returns the removed record, or None when the index is out of range.
    pub fn remove_at(&self, index: usize) -> Option<Friend> {
        let mut friends = self.write_guard();
        if index < friends.len() {
            Some(friends.remove(index))
        } else {
            None
        }
    }

    /// Overwrite the fields the patch carries on the record at the index;
    /// fields the patch omits are left untouched.  Returns false when the
    /// index is out of range.
    pub fn merge_at(&self, index: usize, patch: &FriendPatch) -> bool {
        let mut friends = self.write_guard();
        match friends.get_mut(index) {
            Some(friend) => {
                if let Some(name) = &patch.name {
                    friend.name = name.clone();
                }
                if let Some(handle) = &patch.handle {
                    friend.handle = handle.clone();
                }
                if let Some(skill) = &patch.skill {
                    friend.skill = skill.clone();
                }
                true
            }
            None => false,
        }
    }

    // ------------------------------------------------------------------
    // Lock access.
    // ------------------------------------------------------------------
    // A poisoned lock means a writer panicked mid-mutation; the roster is
    // then unusable and aborting is the only sound response.
    fn read_guard(&self) -> RwLockReadGuard<'_, Vec<Friend>> {
        self.friends.read().expect("roster lock poisoned")
    }

    fn write_guard(&self) -> RwLockWriteGuard<'_, Vec<Friend>> {
        self.friends.write().expect("roster lock poisoned")
    }
}
