//! Upload modal: open/closed plus at most one pending, already-encoded image.

use crate::types::EncodedImage;

#[derive(Debug, Default)]
pub struct UploadModal {
    open: bool,
    pending: Option<EncodedImage>,
}

/// What the presentation layer shows for the upload modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadView<'a> {
    pub open: bool,
    /// Preview of the pending image; the drop area is shown when `None`.
    pub preview: Option<&'a EncodedImage>,
}

impl UploadModal {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn pending(&self) -> Option<&EncodedImage> {
        self.pending.as_ref()
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    /// Closes the modal and discards any pending image.
    pub fn reset(&mut self) {
        self.open = false;
        self.pending = None;
    }

    /// Replaces the pending image; a newer selection always wins.
    pub fn set_pending(&mut self, image: EncodedImage) {
        self.pending = Some(image);
    }

    pub fn take_pending(&mut self) -> Option<EncodedImage> {
        self.pending.take()
    }

    pub fn view(&self) -> UploadView<'_> {
        UploadView {
            open: self.open,
            preview: self.pending.as_ref(),
        }
    }
}
