//! Routes user input and timer ticks into the store, viewer and upload modal,
//! and tells the presentation layer what to draw.

use crate::intake::error::IntakeError;
use crate::intake::{ImageEncoder, ImageFile, ImageIntake};
use crate::store::StoryStore;
use crate::store::backend::{RedbSlots, SlotBackend};
use crate::types::{
    EncodedImage, StoriesConfig, StoryId, Timings, deadline_after, millis_since_epoch,
    relative_age,
};
use crate::viewer::{AdvanceToken, Affordances, Gestures, Navigation, Viewer, ViewerKey};
use error::StoriesError;
use std::fmt;
use std::path::Path;
use std::time::{Duration, SystemTime};
use tracing::{debug, error, info, warn};

pub mod upload;

pub use upload::{UploadModal, UploadView};

pub mod error {
    use crate::store::backend::error::BackendError;
    use crate::types::ConfigError;
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum StoriesError {
        #[error("Config error: {0}")]
        Config(#[from] ConfigError),

        #[error("Storage backend error: {0}")]
        Backend(#[from] BackendError),
    }
}

/// Database file name inside a data directory.
pub const DATABASE_FILE: &str = "stories.redb";

/// Discrete user actions and timer deliveries.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    /// The add button; opens the upload modal.
    AddClicked,
    CloseUpload,
    UploadBackdropClicked,
    /// A file chosen with the picker.
    FileSelected(ImageFile),
    /// A file dropped on the upload area.
    FileDropped(ImageFile),
    ConfirmUpload,
    Delete(StoryId),
    Open(usize),
    Next,
    Prev,
    Close,
    /// A tap on the viewer surface at `x` of `width`. `on_backdrop` is set
    /// when the tap landed outside the image.
    Tap {
        x: f32,
        width: f32,
        on_backdrop: bool,
    },
    /// A completed horizontal drag.
    Swipe {
        start_x: f32,
        end_x: f32,
    },
    Key(ViewerKey),
    /// A host-scheduled auto-advance went off.
    AutoAdvanceFired(AdvanceToken),
}

/// User-visible messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    NotAnImage,
    ProcessingFailed,
}

impl Notice {
    pub fn message(self) -> &'static str {
        match self {
            Notice::NotAnImage => "Please select an image file",
            Notice::ProcessingFailed => "Error processing image. Please try again.",
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryThumbnail {
    pub index: usize,
    pub id: StoryId,
    pub name: String,
    pub image: EncodedImage,
    pub age: String,
}

/// Everything the full-screen viewer draws. Its presence means body scroll is locked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerFrame {
    pub index: usize,
    pub id: StoryId,
    pub name: String,
    pub image: EncodedImage,
    pub age: String,
    pub affordances: Affordances,
    /// The progress indicator restarts at this instant and fills over `dwell`.
    pub progress_started_at: SystemTime,
    pub dwell: Duration,
}

/// The rendering layer.
pub trait Presenter {
    fn render_stories(&mut self, stories: &[StoryThumbnail]);
    /// `None` hides the viewer and releases the scroll lock.
    fn render_viewer(&mut self, frame: Option<&ViewerFrame>);
    fn render_upload(&mut self, upload: &UploadView<'_>);
    fn notify(&mut self, notice: Notice);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileSource {
    Picker,
    Drop,
}

pub struct StoriesController<B, P, E = ImageIntake> {
    store: StoryStore<B>,
    viewer: Viewer,
    upload: UploadModal,
    gestures: Gestures,
    timings: Timings,
    encoder: E,
    presenter: P,
    next_sweep_at: SystemTime,
}

impl<B, P, E> StoriesController<B, P, E>
where
    B: SlotBackend,
    P: Presenter,
    E: ImageEncoder,
{
    /// Loads persisted stories, renders them and runs the startup sweep.
    pub fn start(
        backend: B,
        encoder: E,
        presenter: P,
        config: &StoriesConfig,
        now: SystemTime,
    ) -> Self {
        let timings = Timings::from(config);
        let store = StoryStore::open(backend, config.storage.slot_key.clone(), timings.expiry);

        let mut controller = Self {
            store,
            viewer: Viewer::new(timings.auto_advance),
            upload: UploadModal::default(),
            gestures: Gestures::from(&config.viewer),
            timings,
            encoder,
            presenter,
            next_sweep_at: now,
        };

        controller.render_stories(now);
        controller.render_upload();
        controller.sweep(now);

        info!(stories = controller.store.len(), "stories controller started");
        controller
    }

    pub fn handle(&mut self, input: Input, now: SystemTime) {
        match input {
            Input::AddClicked => {
                self.upload.open();
                self.render_upload();
            }
            Input::CloseUpload | Input::UploadBackdropClicked => {
                self.upload.reset();
                self.render_upload();
            }
            Input::FileSelected(file) => self.accept_file(&file, FileSource::Picker),
            Input::FileDropped(file) => self.accept_file(&file, FileSource::Drop),
            Input::ConfirmUpload => self.confirm_upload(now),
            Input::Delete(id) => self.delete(&id, now),
            Input::Open(index) => {
                self.viewer.open(index, self.store.len(), now);
                self.render_viewer(now);
            }
            Input::Next => self.navigate(Navigation::Next, now),
            Input::Prev => self.navigate(Navigation::Prev, now),
            Input::Close => self.close_viewer(now),
            Input::Tap {
                x,
                width,
                on_backdrop,
            } => {
                if on_backdrop {
                    self.close_viewer(now);
                } else if let Some(navigation) = self.gestures.tap(x, width) {
                    self.navigate(navigation, now);
                }
            }
            Input::Swipe { start_x, end_x } => {
                if let Some(navigation) = self.gestures.swipe(start_x, end_x) {
                    self.navigate(navigation, now);
                }
            }
            Input::Key(key) => {
                if !self.viewer.is_open() {
                    return;
                }
                match key.navigation() {
                    Some(navigation) => self.navigate(navigation, now),
                    None => self.close_viewer(now),
                }
            }
            Input::AutoAdvanceFired(token) => {
                if self.viewer.fire(token, self.store.len(), now).is_some() {
                    self.render_viewer(now);
                }
            }
        }
    }

    /// Runs whatever timers are due: the periodic sweep and the auto-advance.
    pub fn tick(&mut self, now: SystemTime) {
        if now >= self.next_sweep_at {
            self.sweep(now);
        }
        if self.viewer.tick(self.store.len(), now).is_some() {
            self.render_viewer(now);
        }
    }

    /// The earliest instant [`tick`](Self::tick) has work to do.
    pub fn next_deadline(&self) -> SystemTime {
        match self.viewer.armed() {
            Some(armed) => armed.deadline.min(self.next_sweep_at),
            None => self.next_sweep_at,
        }
    }
}

impl<P: Presenter> StoriesController<RedbSlots, P, ImageIntake> {
    /// Opens the stories kept under `data_dir`, configured by the
    /// `stories.toml` next to them. Invalid config values fall back to defaults.
    pub fn open(data_dir: &Path, presenter: P, now: SystemTime) -> Result<Self, StoriesError> {
        let config = StoriesConfig::load(&StoriesConfig::path(data_dir))?;
        let problems = config.validate();
        if !problems.is_empty() {
            warn!(?problems, "invalid config values replaced with defaults");
        }
        let config = config.with_defaults_for_invalid();

        let backend = RedbSlots::open(&data_dir.join(DATABASE_FILE))?;
        let encoder = ImageIntake::new(&config.image);
        Ok(Self::start(backend, encoder, presenter, &config, now))
    }
}

/// Story operations.
impl<B, P, E> StoriesController<B, P, E>
where
    B: SlotBackend,
    P: Presenter,
    E: ImageEncoder,
{
    fn accept_file(&mut self, file: &ImageFile, source: FileSource) {
        if !self.upload.is_open() {
            debug!(file = %file.name, "file ignored, upload modal is closed");
            return;
        }

        if !file.is_image() {
            debug!(file = %file.name, media_type = %file.media_type, ?source, "non-image file rejected");
            if source == FileSource::Picker {
                self.presenter.notify(Notice::NotAnImage);
            }
            return;
        }

        match self.encoder.encode(file) {
            Ok(image) => {
                self.upload.set_pending(image);
                self.render_upload();
            }
            Err(IntakeError::NotAnImage(media_type)) => {
                debug!(file = %file.name, %media_type, "encoder rejected non-image file");
                self.presenter.notify(Notice::NotAnImage);
            }
            Err(error) => {
                warn!(%error, file = %file.name, "failed to process image");
                self.presenter.notify(Notice::ProcessingFailed);
            }
        }
    }

    fn confirm_upload(&mut self, now: SystemTime) {
        let Some(image) = self.upload.take_pending() else {
            return;
        };

        let shown = self.shown_id();
        if let Err(error) = self.store.add(image, now) {
            error!(%error, "failed to persist new story");
        }
        self.upload.reset();
        self.render_upload();
        self.collection_changed(shown, now);
    }

    fn delete(&mut self, id: &StoryId, now: SystemTime) {
        let shown = self.shown_id();
        if let Err(error) = self.store.delete(id) {
            error!(%error, %id, "failed to persist story deletion");
        }
        self.collection_changed(shown, now);
    }

    fn sweep(&mut self, now: SystemTime) {
        self.next_sweep_at = deadline_after(now, self.timings.sweep_interval);

        let shown = self.shown_id();
        match self.store.sweep_expired(now) {
            Ok(outcome) if outcome.shrank() => self.collection_changed(shown, now),
            Ok(_) => {}
            Err(error) => {
                error!(%error, "failed to persist expiry sweep");
                self.collection_changed(shown, now);
            }
        }
    }

    /// Re-renders the list and keeps an open viewer on the story it was
    /// showing, closing it if that story is gone.
    fn collection_changed(&mut self, shown: Option<StoryId>, now: SystemTime) {
        self.render_stories(now);

        if let Some(id) = shown {
            let index = self.store.position(&id);
            self.viewer.reindex(index, self.store.len());
            self.render_viewer(now);
        }
    }
}

/// Viewer operations.
impl<B, P, E> StoriesController<B, P, E>
where
    B: SlotBackend,
    P: Presenter,
    E: ImageEncoder,
{
    fn navigate(&mut self, navigation: Navigation, now: SystemTime) {
        if !self.viewer.is_open() {
            return;
        }
        self.viewer.navigate(navigation, self.store.len(), now);
        self.render_viewer(now);
    }

    fn close_viewer(&mut self, now: SystemTime) {
        if !self.viewer.is_open() {
            return;
        }
        self.viewer.close();
        self.render_viewer(now);
    }

    fn shown_id(&self) -> Option<StoryId> {
        let index = self.viewer.index()?;
        self.store.get(index).map(|story| story.id.clone())
    }
}

/// Rendering.
impl<B, P, E> StoriesController<B, P, E>
where
    B: SlotBackend,
    P: Presenter,
    E: ImageEncoder,
{
    fn render_stories(&mut self, now: SystemTime) {
        let now_millis = millis_since_epoch(now);
        let thumbnails: Vec<StoryThumbnail> = self
            .store
            .stories()
            .iter()
            .enumerate()
            .map(|(index, story)| StoryThumbnail {
                index,
                id: story.id.clone(),
                name: story.name.clone(),
                image: story.image.clone(),
                age: relative_age(story.timestamp, now_millis),
            })
            .collect();

        self.presenter.render_stories(&thumbnails);
    }

    fn render_viewer(&mut self, now: SystemTime) {
        let frame = self.viewer_frame(now);
        self.presenter.render_viewer(frame.as_ref());
    }

    fn render_upload(&mut self) {
        let view = self.upload.view();
        self.presenter.render_upload(&view);
    }

    fn viewer_frame(&self, now: SystemTime) -> Option<ViewerFrame> {
        let index = self.viewer.index()?;
        let story = self.store.get(index)?;
        let affordances = self.viewer.affordances(self.store.len())?;

        Some(ViewerFrame {
            index,
            id: story.id.clone(),
            name: story.name.clone(),
            image: story.image.clone(),
            age: relative_age(story.timestamp, millis_since_epoch(now)),
            affordances,
            progress_started_at: self.viewer.shown_at().unwrap_or(now),
            dwell: self.viewer.dwell(),
        })
    }
}

/// Accessors.
impl<B, P, E> StoriesController<B, P, E> {
    pub fn store(&self) -> &StoryStore<B> {
        &self.store
    }

    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    pub fn upload(&self) -> &UploadModal {
        &self.upload
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }
}
