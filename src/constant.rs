// SPDX-License-Identifier: GPL-3.0-or-later
// src/constant.rs
//
// Application constants that should not be changed by the user.

use std::time::Duration;

/// File extensions accepted by the upload drop zones, with their mime types.
pub const ACCEPTED_IMAGE_TYPES: &[(&str, &str)] = &[
    ("jpeg", "image/jpeg"),
    ("jpg", "image/jpeg"),
    ("png", "image/png"),
    ("webp", "image/webp"),
];

/// Default crop aspect ratio (width / height).
pub const DEFAULT_ASPECT_RATIO: f32 = 4.0 / 3.0;

/// Share of the image width covered by a freshly opened crop rectangle (percent).
pub const INITIAL_CROP_WIDTH: f32 = 90.0;

/// Offset of a freshly opened crop rectangle from the top-left corner (percent).
pub const INITIAL_CROP_OFFSET: f32 = 5.0;

/// File name given to a committed crop.
pub const CROPPED_FILE_NAME: &str = "cropped-image.jpg";

/// Mime type of a committed crop.
pub const CROPPED_MIME: &str = "image/jpeg";

/// Minimum crop selection edge in image pixels.
pub const MIN_SELECTION_SIZE: f32 = 1.0;

/// Per-path window drop events arriving within this window form one drop.
pub const DROP_BATCH_WINDOW: Duration = Duration::from_millis(60);

/// Product categories as `(value, label)`. The empty value is the placeholder.
pub const CATEGORIES: &[(&str, &str)] = &[
    ("", "Select Category"),
    ("electronics", "Electronics"),
    ("clothing", "Clothing"),
    ("books", "Books"),
];

/// Placeholder shown inside an empty drop zone.
pub const DROP_PLACEHOLDER: &str = "Drop files here to upload";

/// Maximum height of the preview shown inside a drop zone.
pub const PREVIEW_MAX_HEIGHT: f32 = 160.0;

/// Height of the crop dialog's image area.
pub const CROP_VIEW_HEIGHT: f32 = 480.0;

/// Height of the description editor.
pub const DESCRIPTION_HEIGHT: f32 = 220.0;
