//! Track catalog: resolves track identifiers to playable source locations.
//!
//! The relay treats the catalog as a black box behind [`TrackStore`]; one
//! synchronous lookup per request. [`MemoryStore`] is the in-process
//! implementation, seeded from `[[tracks]]` config entries and mutable
//! through the admin API.

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::Result;

/// A catalog record for one streamable track.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    /// Opaque identifier used in stream URLs.
    pub id: String,

    /// Display title; catalog metadata only.
    #[serde(default)]
    pub title: Option<String>,

    /// URL of the media bytes in the upstream store.
    pub source_url: String,

    /// Stored container/codec hint (e.g. "mp3", "flac") used to derive the
    /// Content-Type when the upstream omits one.
    #[serde(default)]
    pub format: Option<String>,

    /// Inactive tracks exist but are not cleared for playback.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Lookup interface the relay depends on.
#[async_trait]
pub trait TrackStore: Send + Sync {
    /// Resolve a track id. `Ok(None)` means the track does not exist.
    async fn lookup(&self, id: &str) -> Result<Option<Track>>;

    /// List all known tracks.
    async fn list(&self) -> Result<Vec<Track>>;

    /// Insert or replace a track record.
    async fn insert(&self, track: Track) -> Result<()>;

    /// Remove a track. Returns `false` if the id was unknown.
    async fn remove(&self, id: &str) -> Result<bool>;
}

/// In-memory catalog backed by a read-write-locked map.
#[derive(Default)]
pub struct MemoryStore {
    tracks: RwLock<HashMap<String, Track>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with the given tracks.
    pub fn with_tracks(tracks: Vec<Track>) -> Self {
        let map = tracks.into_iter().map(|t| (t.id.clone(), t)).collect();
        Self {
            tracks: RwLock::new(map),
        }
    }
}

#[async_trait]
impl TrackStore for MemoryStore {
    async fn lookup(&self, id: &str) -> Result<Option<Track>> {
        Ok(self.tracks.read().get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<Track>> {
        let mut tracks: Vec<Track> = self.tracks.read().values().cloned().collect();
        tracks.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(tracks)
    }

    async fn insert(&self, track: Track) -> Result<()> {
        self.tracks.write().insert(track.id.clone(), track);
        Ok(())
    }

    async fn remove(&self, id: &str) -> Result<bool> {
        Ok(self.tracks.write().remove(id).is_some())
    }
}
