// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/view/crop/mod.rs
//
// Crop dialog: image with the selection overlay, plus apply/cancel controls.
// Inspired by cosmic-viewer (https://codeberg.org/bhh by Bryan Hyland

mod overlay;
mod selection;

pub use overlay::crop_overlay;
pub use selection::{CropSelection, DragHandle};

use cosmic::iced::{ContentFit, Length};
use cosmic::iced_widget::stack;
use cosmic::widget::{button, column, container, image, row, text};
use cosmic::Element;

use crate::app::message::CropMessage;
use crate::app::{AppMessage, AppModel};
use crate::config::AppConfig;
use crate::constant::CROP_VIEW_HEIGHT;
use crate::domain::product::SlotId;

/// Render the crop dialog for `slot`.
pub fn view<'a>(model: &'a AppModel, config: &'a AppConfig, slot: SlotId) -> Element<'a, AppMessage> {
    let canvas: Element<'a, AppMessage> = match model
        .form
        .slot(slot)
        .crop_source()
        .and_then(|source| model.images.get(source))
    {
        Some(handle) => {
            let img = image(handle.clone())
                .width(Length::Fill)
                .height(Length::Fill)
                .content_fit(ContentFit::Contain);
            let overlay = crop_overlay(&model.crop_selection, config.crop_show_grid);

            stack![img, overlay].into()
        }
        None => container(text("Loading image…"))
            .center(Length::Fill)
            .into(),
    };

    let apply = button::suggested("Crop").on_press_maybe(
        model
            .crop_selection
            .has_selection()
            .then_some(AppMessage::Crop(CropMessage::Apply)),
    );
    let cancel = button::standard("Cancel").on_press(AppMessage::Crop(CropMessage::Cancel));

    column()
        .push(text::title3(format!("Crop {}", slot.label())))
        .push(
            container(canvas)
                .width(Length::Fill)
                .height(Length::Fixed(CROP_VIEW_HEIGHT)),
        )
        .push(row().push(cancel).push(apply).spacing(8))
        .spacing(12)
        .padding(16)
        .into()
}
