// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/product/record.rs
//
// The product record and its field-scoped update reducer.

use serde::Serialize;

use crate::constant::CATEGORIES;
use crate::domain::upload::FileLike;

/// Everything the form collects about one product.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub name: String,
    pub category: String,
    pub model: String,
    pub main_image: Option<FileLike>,
    pub additional_images: Vec<FileLike>,
    pub price: f64,
    pub old_price: f64,
    pub weight: f64,
    /// Rich text as an HTML fragment, stored unsanitised.
    pub description: String,
}

/// Fields that are edited as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Category,
    Model,
    Price,
    OldPrice,
    Weight,
    Description,
}

impl Field {
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Category => "Category",
            Self::Model => "Model",
            Self::Price => "Price",
            Self::OldPrice => "Old Price",
            Self::Weight => "Weight (gm)",
            Self::Description => "Description",
        }
    }

    pub fn is_required(self) -> bool {
        matches!(self, Self::Name)
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Price | Self::OldPrice | Self::Weight)
    }
}

/// A replacement of exactly one record field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    Name(String),
    Category(String),
    Model(String),
    MainImage(Option<FileLike>),
    AdditionalImages(Vec<FileLike>),
    Price(f64),
    OldPrice(f64),
    Weight(f64),
    Description(String),
}

impl FieldUpdate {
    /// Build the update for a text edit of `field`. Numeric fields go through
    /// [`parse_number`].
    pub fn from_text(field: Field, text: &str) -> Self {
        match field {
            Field::Name => Self::Name(text.to_string()),
            Field::Category => Self::Category(text.to_string()),
            Field::Model => Self::Model(text.to_string()),
            Field::Price => Self::Price(parse_number(text)),
            Field::OldPrice => Self::OldPrice(parse_number(text)),
            Field::Weight => Self::Weight(parse_number(text)),
            Field::Description => Self::Description(text.to_string()),
        }
    }
}

impl ProductRecord {
    /// Return the record with one field replaced. Last write wins.
    #[must_use]
    pub fn apply(self, update: FieldUpdate) -> Self {
        match update {
            FieldUpdate::Name(name) => Self { name, ..self },
            FieldUpdate::Category(category) => Self { category, ..self },
            FieldUpdate::Model(model) => Self { model, ..self },
            FieldUpdate::MainImage(main_image) => Self { main_image, ..self },
            FieldUpdate::AdditionalImages(additional_images) => Self {
                additional_images,
                ..self
            },
            FieldUpdate::Price(price) => Self { price, ..self },
            FieldUpdate::OldPrice(old_price) => Self { old_price, ..self },
            FieldUpdate::Weight(weight) => Self { weight, ..self },
            FieldUpdate::Description(description) => Self {
                description,
                ..self
            },
        }
    }

    /// First required field left empty, if any.
    pub fn missing_required(&self) -> Option<Field> {
        self.name.is_empty().then_some(Field::Name)
    }

    /// Index of the record's category in [`CATEGORIES`].
    pub fn category_index(&self) -> Option<usize> {
        CATEGORIES
            .iter()
            .position(|(value, _)| *value == self.category)
    }
}

/// Reducer form of [`ProductRecord::apply`]: `(record, field, text) -> record'`.
pub fn update(record: &ProductRecord, field: Field, text: &str) -> ProductRecord {
    record.clone().apply(FieldUpdate::from_text(field, text))
}

/// Parse a numeric input. Empty, non-numeric and non-finite input becomes `0`.
pub fn parse_number(text: &str) -> f64 {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

/// Category value for a dropdown index, the placeholder for anything unknown.
pub fn category_value(index: usize) -> &'static str {
    CATEGORIES.get(index).map_or("", |(value, _)| *value)
}
