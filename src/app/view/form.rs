// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/view/form.rs
//
// The product form page.

use cosmic::iced::Length;
use cosmic::widget::{button, column, container, dropdown, row, scrollable, text, text_input, warning};
use cosmic::Element;

use super::{description, upload};
use crate::app::{AppMessage, AppModel};
use crate::constant::CATEGORIES;
use crate::domain::product::{Field, SlotId};

pub fn view(model: &AppModel) -> Element<'_, AppMessage> {
    let record = model.form.record();

    let categories: Vec<&'static str> = CATEGORIES.iter().map(|(_, label)| *label).collect();
    let category = dropdown(categories, record.category_index(), AppMessage::CategorySelected);

    let numbers = [Field::Price, Field::OldPrice, Field::Weight]
        .into_iter()
        .fold(row().spacing(12), |numbers, field| {
            let input = text_input("0", model.drafts.text(field, record))
                .on_input(move |value| AppMessage::FieldEdited(field, value));
            numbers.push(labelled(field, input).width(Length::FillPortion(1)))
        });

    let mut page = column()
        .push(text::title3("Add Product"))
        .push(labelled(
            Field::Name,
            text_input("Product name", &record.name)
                .on_input(|value| AppMessage::FieldEdited(Field::Name, value)),
        ))
        .push(labelled(Field::Category, category))
        .push(labelled(
            Field::Model,
            text_input("Model", &record.model)
                .on_input(|value| AppMessage::FieldEdited(Field::Model, value)),
        ))
        .push(upload::view(model, SlotId::Main))
        .push(upload::view(model, SlotId::Additional))
        .push(numbers)
        .push(description::view(model))
        .spacing(16)
        .padding(24)
        .max_width(900);

    if let Some(error) = &model.error {
        page = page.push(warning(error.as_str()).on_close(AppMessage::ClearError));
    }
    if let Some(notice) = &model.notice {
        page = page.push(text::body(notice.as_str()));
    }

    page = page.push(
        row()
            .push(button::standard("Cancel").on_press(AppMessage::Cancel))
            .push(button::suggested("Submit").on_press(AppMessage::Submit))
            .spacing(8),
    );

    scrollable(container(page).center_x(Length::Fill)).into()
}

/// A field label above its input; required fields are marked.
fn labelled<'a>(
    field: Field,
    input: impl Into<Element<'a, AppMessage>>,
) -> cosmic::widget::Column<'a, AppMessage> {
    let label = if field.is_required() {
        format!("{} *", field.label())
    } else {
        field.label().to_string()
    };

    column().push(text::heading(label)).push(input).spacing(4)
}
