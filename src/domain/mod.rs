// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/mod.rs
//
// UI-independent domain layer: images, upload slots and the product record.

pub mod image;
pub mod product;
pub mod upload;
