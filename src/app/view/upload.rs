// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/view/upload.rs
//
// Upload drop zone for one slot.

use cosmic::iced::{ContentFit, Length};
use cosmic::iced_widget::mouse_area;
use cosmic::widget::{button, column, container, image, row, text};
use cosmic::{Element, theme};

use crate::app::{AppMessage, AppModel};
use crate::constant::{DROP_PLACEHOLDER, PREVIEW_MAX_HEIGHT};
use crate::domain::product::SlotId;
use crate::domain::upload::SlotMode;

pub fn view(model: &AppModel, id: SlotId) -> Element<'_, AppMessage> {
    let slot = model.form.slot(id);
    let selected = model.form.selected_files(id);

    let body: Element<'_, AppMessage> = match slot.mode() {
        SlotMode::Single => match slot.preview().and_then(|preview| model.images.get(preview)) {
            Some(handle) => column()
                .push(
                    image(handle.clone())
                        .height(Length::Fixed(PREVIEW_MAX_HEIGHT))
                        .content_fit(ContentFit::Contain),
                )
                .push(
                    row()
                        .push(button::standard("Crop").on_press(AppMessage::Recrop(id)))
                        .push(button::destructive("Remove").on_press(AppMessage::Remove(id)))
                        .spacing(8),
                )
                .spacing(8)
                .into(),
            None => placeholder(slot.is_reading()),
        },
        SlotMode::Multiple if !selected.is_empty() => {
            let names = selected.iter().fold(column().spacing(2), |list, file| {
                list.push(text::caption(file.name().to_string()))
            });

            column()
                .push(text::body(format!("{} file(s) selected", selected.len())))
                .push(names)
                .push(button::destructive("Remove").on_press(AppMessage::Remove(id)))
                .spacing(8)
                .into()
        }
        SlotMode::Multiple => placeholder(false),
    };

    let mut zone = column().push(body).spacing(12);
    if slot.accepts_drops() {
        zone = zone.push(button::standard("Select files").on_press(AppMessage::PickFiles(id)));
    }

    let class = if model.hovered == Some(id) {
        theme::Container::Primary
    } else {
        theme::Container::Card
    };
    let area = mouse_area(
        container(zone)
            .width(Length::Fill)
            .padding(16)
            .class(class),
    )
    .on_enter(AppMessage::HoverEnter(id))
    .on_exit(AppMessage::HoverExit(id));

    column()
        .push(text::heading(id.label()))
        .push(area)
        .spacing(4)
        .into()
}

fn placeholder<'a>(reading: bool) -> Element<'a, AppMessage> {
    let label = if reading { "Loading…" } else { DROP_PLACEHOLDER };
    container(text::body(label))
        .width(Length::Fill)
        .center_x(Length::Fill)
        .into()
}
