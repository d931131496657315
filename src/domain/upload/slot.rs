// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/upload/slot.rs
//
// Upload slot: the drop -> read -> crop -> preview lifecycle of one image field.

use super::file::{FileLike, FileSelection};
use crate::domain::image::{CropRegion, DisplayGeometry, RasterImage, crop};

/// Whether a slot crops a single image or forwards many.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotMode {
    Single,
    Multiple,
}

/// Observable lifecycle phase of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotPhase {
    /// Nothing dropped.
    Empty,
    /// A read is in flight, or a first crop was cancelled.
    Pending,
    /// The crop overlay is open.
    Cropping,
    /// A crop is committed.
    Previewed,
}

/// A file read the owner must perform before calling [`UploadSlot::finish_read`].
#[derive(Debug, Clone, PartialEq)]
pub struct ReadRequest {
    pub generation: u64,
    pub file: FileLike,
}

/// Result of offering dropped files to a slot.
#[derive(Debug, Clone, PartialEq)]
pub enum Intake {
    /// Nothing happened: no files, or the slot refuses drops.
    Ignored,
    /// Single mode: read this file, then enter the crop flow.
    Read(ReadRequest),
    /// Multiple mode: forward these files to the owner as-is.
    Forward(FileSelection),
}

/// State of one upload slot.
///
/// `original` is the untouched upload and is what every re-crop starts from.
/// `pending_crop` is non-empty exactly while the crop overlay is open.
/// `preview` is the committed crop.
#[derive(Debug, Clone)]
pub struct UploadSlot {
    mode: SlotMode,
    original: Option<RasterImage>,
    pending_crop: Option<RasterImage>,
    preview: Option<RasterImage>,
    /// Files forwarded by the last drop in multiple mode.
    forwarded: usize,
    /// Generation of the most recent read; older completions are stale.
    generation: u64,
    reading: bool,
}

impl UploadSlot {
    pub fn new(mode: SlotMode) -> Self {
        Self {
            mode,
            original: None,
            pending_crop: None,
            preview: None,
            forwarded: 0,
            generation: 0,
            reading: false,
        }
    }

    pub fn single() -> Self {
        Self::new(SlotMode::Single)
    }

    pub fn multiple() -> Self {
        Self::new(SlotMode::Multiple)
    }

    pub fn mode(&self) -> SlotMode {
        self.mode
    }

    pub fn phase(&self) -> SlotPhase {
        if self.pending_crop.is_some() {
            SlotPhase::Cropping
        } else if self.preview.is_some() {
            SlotPhase::Previewed
        } else if self.reading || self.original.is_some() {
            SlotPhase::Pending
        } else {
            SlotPhase::Empty
        }
    }

    pub fn original(&self) -> Option<&RasterImage> {
        self.original.as_ref()
    }

    /// The image the crop overlay works on, while it is open.
    pub fn crop_source(&self) -> Option<&RasterImage> {
        self.pending_crop.as_ref()
    }

    pub fn preview(&self) -> Option<&RasterImage> {
        self.preview.as_ref()
    }

    pub fn forwarded(&self) -> usize {
        self.forwarded
    }

    pub fn is_reading(&self) -> bool {
        self.reading
    }

    /// Single-mode slots stop taking drops once a preview is committed.
    pub fn accepts_drops(&self) -> bool {
        !(self.mode == SlotMode::Single && self.preview.is_some())
    }

    /// Offer already-filtered files to the slot.
    pub fn accept(&mut self, files: Vec<FileLike>) -> Intake {
        if files.is_empty() || !self.accepts_drops() {
            return Intake::Ignored;
        }

        match self.mode {
            SlotMode::Multiple => {
                self.forwarded = files.len();
                Intake::Forward(FileSelection::Multiple(files))
            }
            SlotMode::Single => {
                let Some(file) = files.into_iter().next() else {
                    return Intake::Ignored;
                };
                self.generation = self.generation.wrapping_add(1);
                self.reading = true;
                Intake::Read(ReadRequest {
                    generation: self.generation,
                    file,
                })
            }
        }
    }

    /// Complete the read started by [`Self::accept`] and open the crop overlay.
    ///
    /// Returns `false` when the result belongs to a superseded read and was dropped.
    pub fn finish_read(&mut self, generation: u64, image: RasterImage) -> bool {
        if !self.is_current(generation) {
            log::debug!(
                "Discarding stale read {} (current {})",
                generation,
                self.generation
            );
            return false;
        }

        self.reading = false;
        self.original = Some(image.clone());
        self.pending_crop = Some(image);
        true
    }

    /// The read for `generation` failed; the slot goes back to what it showed before.
    pub fn fail_read(&mut self, generation: u64) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.reading = false;
        true
    }

    fn is_current(&self, generation: u64) -> bool {
        self.reading && generation == self.generation
    }

    /// Apply the crop and commit the result as the preview.
    ///
    /// `Ok(None)` when the overlay is not open or the crop produced nothing;
    /// the slot is left untouched in that case.
    pub fn confirm_crop(
        &mut self,
        region: &CropRegion,
        geometry: &DisplayGeometry,
    ) -> anyhow::Result<Option<FileSelection>> {
        let Some(cropped) = crop(self.pending_crop.as_ref(), region, geometry)? else {
            return Ok(None);
        };

        let file = FileLike::from_image(&cropped);
        self.preview = Some(cropped);
        self.pending_crop = None;
        Ok(Some(FileSelection::Single(file)))
    }

    /// Close the overlay without committing. An existing preview is kept.
    pub fn cancel_crop(&mut self) {
        self.pending_crop = None;
    }

    /// Reopen the overlay on the retained original. Returns `false` if there
    /// is no preview to re-crop.
    pub fn recrop(&mut self) -> bool {
        match (&self.preview, &self.original) {
            (Some(_), Some(original)) => {
                self.pending_crop = Some(original.clone());
                true
            }
            _ => false,
        }
    }

    /// Clear everything and tell the owner.
    pub fn remove(&mut self) -> FileSelection {
        self.reset();
        FileSelection::None
    }

    /// Clear everything, invalidating any read in flight.
    pub fn reset(&mut self) {
        self.original = None;
        self.pending_crop = None;
        self.preview = None;
        self.forwarded = 0;
        self.reading = false;
        self.generation = self.generation.wrapping_add(1);
    }
}
