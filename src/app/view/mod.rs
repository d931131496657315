// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/view/mod.rs
//
// View layer: form page, upload zones, description editor, crop dialog.

pub mod crop;
mod description;
mod form;
mod upload;

use cosmic::Element;

use crate::app::{AppMessage, AppModel};
use crate::config::AppConfig;

/// Render the window content. An open crop dialog replaces the form.
pub fn view<'a>(model: &'a AppModel, config: &'a AppConfig) -> Element<'a, AppMessage> {
    match model.form.cropping() {
        Some(slot) => crop::view(model, config, slot),
        None => form::view(model),
    }
}
