pub mod controller;
pub mod intake;
pub mod store;
pub mod types;
pub mod viewer;

pub use controller::error::StoriesError;
pub use controller::{Input, Notice, Presenter, StoriesController, StoryThumbnail, ViewerFrame};
pub use intake::{ImageEncoder, ImageFile, ImageIntake};
pub use store::StoryStore;
pub use store::backend::{MemorySlots, RedbSlots, SlotBackend};
pub use viewer::{Viewer, ViewerState};
