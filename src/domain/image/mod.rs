// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/image/mod.rs
//
// Raster images and the crop transform.

pub mod crop;
pub mod raster;

pub use crop::{CropRegion, CropUnit, DisplayGeometry, PixelRect, crop};
pub use raster::RasterImage;
