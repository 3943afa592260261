pub(crate) mod age;
pub use age::relative_age;

pub(crate) mod config;
pub use config::{
    ConfigError, ImageConfig, LifecycleConfig, StorageConfig, StoriesConfig, Timings,
    ViewerConfig, deadline_after,
};

pub(crate) mod story;
pub use story::{EncodedImage, STORY_NAMES, Story, StoryId, millis_since_epoch};
