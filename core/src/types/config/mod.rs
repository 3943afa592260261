mod app;
mod timings;

pub use app::{
    ConfigError, ImageConfig, LifecycleConfig, StorageConfig, StoriesConfig, ViewerConfig,
};
pub use timings::{Timings, deadline_after};
