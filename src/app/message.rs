// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/message.rs
//
// Application messages: events, user actions, and internal signals.

use std::path::PathBuf;

use cosmic::iced_widget::text_editor;

use crate::app::view::crop::DragHandle;
use crate::domain::image::RasterImage;
use crate::domain::product::{Field, Markup, SlotId};

/// Input from the crop dialog.
#[derive(Debug, Clone)]
pub enum CropMessage {
    DragStart {
        x: f32,
        y: f32,
        handle: DragHandle,
    },
    DragMove {
        x: f32,
        y: f32,
    },
    DragEnd,
    Apply,
    Cancel,
}

#[derive(Debug, Clone)]
pub enum AppMessage {
    // Record fields.
    FieldEdited(Field, String),
    CategorySelected(usize),
    DescriptionEdited(text_editor::Action),
    FormatDescription(Markup),

    // Upload zones.
    PickFiles(SlotId),
    FilesPicked(SlotId, Vec<PathBuf>),
    HoverEnter(SlotId),
    HoverExit(SlotId),
    FileDropped(PathBuf),
    FlushDrop(u64),
    ReadFinished {
        slot: SlotId,
        generation: u64,
        result: Result<RasterImage, String>,
    },
    Recrop(SlotId),
    Remove(SlotId),

    // Crop dialog.
    Crop(CropMessage),

    // Form.
    Submit,
    Cancel,

    // Errors.
    ClearError,
}
