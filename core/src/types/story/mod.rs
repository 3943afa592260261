use nutype::nutype;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, SystemTime};

/// Display names a new story is labelled with, picked uniformly at random.
pub const STORY_NAMES: [&str; 5] = ["My Story", "Story", "Moment", "Memory", "Update"];

/// Opaque story identifier. Persisted ids are taken as-is; the store only mints
/// decimal millisecond ids.
#[nutype(derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    AsRef,
    Deref,
    Display,
    Serialize,
    Deserialize,
))]
pub struct StoryId(String);

impl StoryId {
    pub(crate) fn from_millis(millis: u64) -> Self {
        Self::new(millis.to_string())
    }

    /// Numeric value of ids minted from a creation instant. Ids loaded from
    /// elsewhere may not be numeric.
    pub(crate) fn as_millis(&self) -> Option<u64> {
        self.as_str().parse().ok()
    }
}

/// A self-contained image payload, stored as a data URL so it can be embedded
/// directly by any renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncodedImage(String);

impl EncodedImage {
    pub fn from_data_url(data_url: impl Into<String>) -> Self {
        Self(data_url.into())
    }

    pub fn as_data_url(&self) -> &str {
        &self.0
    }

    /// Media type declared in the data URL header, e.g. `image/jpeg`.
    pub fn media_type(&self) -> Option<&str> {
        let header = self.0.strip_prefix("data:")?.split(',').next()?;
        header.split(';').next().filter(|m| !m.is_empty())
    }
}

impl fmt::Display for EncodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One user-submitted image post.
///
/// Field names match the persisted JSON layout: `{id, image, timestamp, name}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    pub id: StoryId,
    pub image: EncodedImage,
    /// Creation instant in milliseconds since the Unix epoch.
    pub timestamp: u64,
    pub name: String,
}

impl Story {
    pub(crate) fn new(id: StoryId, image: EncodedImage, timestamp: u64, rng: &mut impl Rng) -> Self {
        let name = STORY_NAMES[rng.gen_range(0..STORY_NAMES.len())].to_string();
        Self {
            id,
            image,
            timestamp,
            name,
        }
    }

    /// A story is expired once `timestamp + expiry <= now`.
    pub fn is_expired(&self, now_millis: u64, expiry: Duration) -> bool {
        let expiry_millis = u64::try_from(expiry.as_millis()).unwrap_or(u64::MAX);
        self.timestamp.saturating_add(expiry_millis) <= now_millis
    }
}

/// Milliseconds since the Unix epoch; instants before the epoch clamp to 0.
pub fn millis_since_epoch(time: SystemTime) -> u64 {
    time.duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}
