// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/model.rs
//
// Application state.

use std::collections::HashMap;
use std::sync::Arc;

use cosmic::iced_widget::text_editor;
use cosmic::widget::image::Handle;

use crate::app::view::crop::CropSelection;
use crate::config::AppConfig;
use crate::domain::image::RasterImage;
use crate::domain::product::{Field, Markup, ProductForm, ProductRecord, SlotId, TextEditing};
use crate::domain::upload::DropBatch;

// =============================================================================
// Description editor
// =============================================================================

/// Multi-line editor holding the description as an HTML fragment.
pub struct DescriptionEditor {
    content: text_editor::Content,
}

impl Default for DescriptionEditor {
    fn default() -> Self {
        Self {
            content: text_editor::Content::new(),
        }
    }
}

impl DescriptionEditor {
    pub fn content(&self) -> &text_editor::Content {
        &self.content
    }

    /// Apply an editor action. Returns `true` if the text changed.
    pub fn perform(&mut self, action: text_editor::Action) -> bool {
        let is_edit = action.is_edit();
        self.content.perform(action);
        is_edit
    }

    /// Replace the selection (or insert at the cursor) with `markup` applied to it.
    pub fn format(&mut self, markup: Markup) {
        let selection = self.content.selection().unwrap_or_default();
        let wrapped = markup.wrap(&selection);
        self.content
            .perform(text_editor::Action::Edit(text_editor::Edit::Paste(Arc::new(
                wrapped,
            ))));
    }
}

impl TextEditing for DescriptionEditor {
    fn value(&self) -> String {
        // The editor always keeps a trailing line; the record does not.
        let text = self.content.text();
        text.strip_suffix('\n').map(str::to_string).unwrap_or(text)
    }

    fn set_value(&mut self, value: &str) {
        self.content = text_editor::Content::with_text(value);
    }
}

// =============================================================================
// Numeric drafts
// =============================================================================

/// Text of the numeric inputs as typed. The record only keeps parsed values.
#[derive(Debug, Default, Clone)]
pub struct NumericDrafts {
    text: HashMap<Field, String>,
}

impl NumericDrafts {
    pub fn set(&mut self, field: Field, text: &str) {
        self.text.insert(field, text.to_string());
    }

    /// Text to show for `field`: the draft if there is one, else the record value.
    pub fn text(&self, field: Field, record: &ProductRecord) -> String {
        if let Some(draft) = self.text.get(&field) {
            return draft.clone();
        }
        let value = match field {
            Field::Price => record.price,
            Field::OldPrice => record.old_price,
            Field::Weight => record.weight,
            _ => return String::new(),
        };
        if value == 0.0 {
            String::new()
        } else {
            value.to_string()
        }
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }
}

// =============================================================================
// Image handles
// =============================================================================

/// Display handles for the images currently on screen, keyed by image id.
#[derive(Debug, Default)]
pub struct ImageCache {
    handles: HashMap<u64, Handle>,
}

impl ImageCache {
    pub fn get(&self, image: &RasterImage) -> Option<&Handle> {
        self.handles.get(&image.id())
    }

    /// Keep handles for exactly `images`, creating missing ones.
    pub fn sync<'a>(&mut self, images: impl IntoIterator<Item = &'a RasterImage>) {
        let live: Vec<&RasterImage> = images.into_iter().collect();
        self.handles
            .retain(|id, _| live.iter().any(|image| image.id() == *id));

        for image in live {
            self.handles
                .entry(image.id())
                .or_insert_with(|| Handle::from_bytes(image.bytes().to_vec()));
        }
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }
}

// =============================================================================
// Model
// =============================================================================

pub struct AppModel {
    // Form.
    pub form: ProductForm,
    pub description: DescriptionEditor,
    pub drafts: NumericDrafts,

    // Uploads.
    pub drop_batch: DropBatch,
    pub hovered: Option<SlotId>,
    pub images: ImageCache,

    // Tools.
    pub crop_selection: CropSelection,

    // UI state.
    pub error: Option<String>,
    pub notice: Option<String>,
}

impl AppModel {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            form: ProductForm::new(config.cancel_policy()),
            description: DescriptionEditor::default(),
            drafts: NumericDrafts::default(),
            drop_batch: DropBatch::default(),
            hovered: None,
            images: ImageCache::default(),
            crop_selection: CropSelection::default(),
            error: None,
            notice: None,
        }
    }

    pub fn set_error<S: Into<String>>(&mut self, msg: S) {
        self.error = Some(msg.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Every image some part of the form currently displays.
    pub fn displayed_images(&self) -> Vec<&RasterImage> {
        SlotId::ALL
            .into_iter()
            .flat_map(|id| {
                let slot = self.form.slot(id);
                [slot.crop_source(), slot.preview()]
            })
            .flatten()
            .collect()
    }

    /// Refresh display handles after the slots changed.
    pub fn sync_images(&mut self) {
        let mut images = std::mem::take(&mut self.images);
        images.sync(self.displayed_images());
        self.images = images;
    }
}
