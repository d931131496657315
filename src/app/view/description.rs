// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/view/description.rs
//
// Description editor with its markup toolbar.

use cosmic::iced::Length;
use cosmic::iced_widget::text_editor;
use cosmic::widget::{button, column, row, text};
use cosmic::Element;

use crate::app::{AppMessage, AppModel};
use crate::constant::DESCRIPTION_HEIGHT;
use crate::domain::product::{Field, Markup};

pub fn view(model: &AppModel) -> Element<'_, AppMessage> {
    let toolbar = Markup::ALL
        .into_iter()
        .fold(row().spacing(4), |toolbar, markup| {
            toolbar.push(button::text(markup.label()).on_press(AppMessage::FormatDescription(markup)))
        });

    let editor = text_editor(model.description.content())
        .placeholder("Write a description…")
        .on_action(AppMessage::DescriptionEdited)
        .height(Length::Fixed(DESCRIPTION_HEIGHT));

    column()
        .push(text::heading(Field::Description.label()))
        .push(toolbar)
        .push(editor)
        .spacing(4)
        .into()
}
