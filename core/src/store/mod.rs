//! The story collection and its persistence.

use crate::store::backend::SlotBackend;
use crate::store::backend::error::BackendError;
use crate::types::{EncodedImage, Story, StoryId, millis_since_epoch};
use error::StoreError;
use std::collections::HashSet;
use std::time::{Duration, SystemTime};
use tracing::{debug, info, warn};

pub mod backend;

pub mod error {
    use super::*;
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum StoreError {
        #[error("Backend error: {0}")]
        Backend(#[from] BackendError),

        #[error("Serialization error: {0}")]
        Json(#[from] serde_json::Error),
    }
}

/// Result of an expiry sweep.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SweepOutcome {
    /// Ids removed by the sweep, in collection order.
    pub removed: Vec<StoryId>,
}

impl SweepOutcome {
    pub fn shrank(&self) -> bool {
        !self.removed.is_empty()
    }
}

/// Owns the ordered story collection and mirrors it into a single backend slot.
///
/// Insertion order is display order. Ids are unique within the collection.
pub struct StoryStore<B> {
    backend: B,
    slot_key: String,
    expiry: Duration,
    stories: Vec<Story>,
    last_issued: Option<u64>,
}

impl<B: SlotBackend> StoryStore<B> {
    /// Opens the store over `backend` and loads whatever the slot holds.
    pub fn open(backend: B, slot_key: impl Into<String>, expiry: Duration) -> Self {
        let mut store = Self {
            backend,
            slot_key: slot_key.into(),
            expiry,
            stories: Vec::new(),
            last_issued: None,
        };
        store.load();
        store
    }

    /// Replaces the in-memory collection with the persisted one.
    ///
    /// Missing data, unreadable slots and malformed JSON all recover to an
    /// empty collection.
    pub fn load(&mut self) {
        let stories = match self.backend.read(&self.slot_key) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Story>>(&raw) {
                Ok(stories) => stories,
                Err(error) => {
                    warn!(%error, slot = %self.slot_key, "persisted stories are malformed, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(error) => {
                warn!(%error, slot = %self.slot_key, "failed to read persisted stories, starting empty");
                Vec::new()
            }
        };

        self.stories = dedup_by_id(stories);
        debug!(count = self.stories.len(), "stories loaded");
    }

    /// Overwrites the slot with the full collection.
    pub fn save(&mut self) -> Result<(), StoreError> {
        let json = serde_json::to_string(&self.stories)?;
        self.backend.write(&self.slot_key, &json)?;
        Ok(())
    }
}

/// Mutations. Each one persists the whole collection before returning; on a
/// write failure the in-memory change is kept and the error returned.
impl<B: SlotBackend> StoryStore<B> {
    /// Appends a new story created at `now` and returns its id.
    pub fn add(&mut self, image: EncodedImage, now: SystemTime) -> Result<StoryId, StoreError> {
        let timestamp = millis_since_epoch(now);
        let id = self.next_id(timestamp);
        let story = Story::new(id.clone(), image, timestamp, &mut rand::thread_rng());

        info!(id = %story.id, name = %story.name, "story added");
        self.stories.push(story);
        self.save()?;
        Ok(id)
    }

    /// Removes the story with `id`. Returns `false` if no such story existed.
    pub fn delete(&mut self, id: &StoryId) -> Result<bool, StoreError> {
        let before = self.stories.len();
        self.stories.retain(|story| &story.id != id);
        let removed = self.stories.len() != before;

        if removed {
            info!(%id, "story deleted");
        } else {
            debug!(%id, "delete of unknown story ignored");
        }
        self.save()?;
        Ok(removed)
    }

    /// Removes every story whose age has reached the expiry window.
    ///
    /// Persists only when something was removed.
    pub fn sweep_expired(&mut self, now: SystemTime) -> Result<SweepOutcome, StoreError> {
        let now_millis = millis_since_epoch(now);
        let expiry = self.expiry;

        let (expired, kept): (Vec<Story>, Vec<Story>) = std::mem::take(&mut self.stories)
            .into_iter()
            .partition(|story| story.is_expired(now_millis, expiry));
        self.stories = kept;

        let outcome = SweepOutcome {
            removed: expired.into_iter().map(|story| story.id).collect(),
        };

        if outcome.shrank() {
            info!(removed = outcome.removed.len(), remaining = self.stories.len(), "expired stories swept");
            self.save()?;
        }
        Ok(outcome)
    }

    /// Mints an id from the creation instant, bumped past any id already in
    /// use or previously issued.
    fn next_id(&mut self, timestamp: u64) -> StoryId {
        let mut candidate = match self.last_issued {
            Some(last) => timestamp.max(last.saturating_add(1)),
            None => timestamp,
        };
        while self
            .stories
            .iter()
            .any(|story| story.id.as_millis() == Some(candidate))
        {
            candidate = candidate.saturating_add(1);
        }

        self.last_issued = Some(candidate);
        StoryId::from_millis(candidate)
    }
}

/// Read operations.
impl<B> StoryStore<B> {
    pub fn stories(&self) -> &[Story] {
        &self.stories
    }

    pub fn get(&self, index: usize) -> Option<&Story> {
        self.stories.get(index)
    }

    pub fn position(&self, id: &StoryId) -> Option<usize> {
        self.stories.iter().position(|story| &story.id == id)
    }

    pub fn len(&self) -> usize {
        self.stories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stories.is_empty()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

fn dedup_by_id(stories: Vec<Story>) -> Vec<Story> {
    let mut seen = HashSet::new();
    let total = stories.len();
    let unique: Vec<Story> = stories
        .into_iter()
        .filter(|story| seen.insert(story.id.clone()))
        .collect();

    if unique.len() != total {
        warn!(dropped = total - unique.len(), "duplicate story ids in persisted data");
    }
    unique
}
