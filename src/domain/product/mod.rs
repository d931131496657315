// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/product/mod.rs
//
// Product record, form container, description editing and submission.

pub mod form;
pub mod record;
pub mod submit;
pub mod text;

pub use form::{CancelPolicy, CropSource, ProductForm, SlotId, SubmitOutcome};
pub use record::{Field, FieldUpdate, ProductRecord, category_value, parse_number};
pub use submit::{LogSink, SubmissionSink};
pub use text::{Markup, TextEditing};
