// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/image/crop.rs
//
// Crop operation domain model and the crop transform.

use std::io::Cursor;

use anyhow::Context;
use image::codecs::jpeg::JpegEncoder;

use super::raster::RasterImage;
use crate::constant::{CROPPED_FILE_NAME, CROPPED_MIME, INITIAL_CROP_OFFSET, INITIAL_CROP_WIDTH};

/// Units of a [`CropRegion`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CropUnit {
    /// Percent of the displayed image size (0..=100).
    #[default]
    Percent,
    /// Pixels of the displayed image.
    Pixel,
}

/// Crop rectangle relative to the displayed image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropRegion {
    pub unit: CropUnit,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl CropRegion {
    pub fn percent(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            unit: CropUnit::Percent,
            x,
            y,
            width,
            height,
        }
    }

    pub fn pixel(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            unit: CropUnit::Pixel,
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle a crop dialog opens with: 90% of the width at a 5% offset,
    /// height following `aspect_ratio`, shrunk to fit inside the image.
    pub fn initial(aspect_ratio: Option<f32>, natural_width: u32, natural_height: u32) -> Self {
        let img_w = natural_width.max(1) as f32;
        let img_h = natural_height.max(1) as f32;
        let offset_x = img_w * INITIAL_CROP_OFFSET / 100.0;
        let offset_y = img_h * INITIAL_CROP_OFFSET / 100.0;
        let max_w = img_w - 2.0 * offset_x;
        let max_h = img_h - 2.0 * offset_y;

        let mut w = img_w * INITIAL_CROP_WIDTH / 100.0;
        let mut h = match aspect_ratio {
            Some(aspect) => w / aspect,
            None => max_h,
        };
        if h > max_h {
            let shrink = max_h / h;
            w *= shrink;
            h = max_h;
        }
        let w = w.min(max_w);

        Self::percent(
            offset_x / img_w * 100.0,
            offset_y / img_h * 100.0,
            w / img_w * 100.0,
            h / img_h * 100.0,
        )
    }

    /// Check the region invariants: positive size, non-negative origin and,
    /// for percent units, no overflow past 100%.
    pub fn is_valid(&self) -> bool {
        let sized = self.width > 0.0 && self.height > 0.0 && self.x >= 0.0 && self.y >= 0.0;
        match self.unit {
            CropUnit::Percent => {
                sized && self.x + self.width <= 100.0 && self.y + self.height <= 100.0
            }
            CropUnit::Pixel => sized,
        }
    }

    /// The region in displayed pixels `(x, y, width, height)`.
    pub fn to_display_pixels(&self, geometry: &DisplayGeometry) -> (f32, f32, f32, f32) {
        match self.unit {
            CropUnit::Pixel => (self.x, self.y, self.width, self.height),
            CropUnit::Percent => {
                let dw = geometry.displayed_width / 100.0;
                let dh = geometry.displayed_height / 100.0;
                (self.x * dw, self.y * dh, self.width * dw, self.height * dh)
            }
        }
    }

    /// Map the region into natural image pixels, clamped to the image.
    ///
    /// A region with positive size whose origin lies inside the image always
    /// covers at least one pixel. Returns `None` for empty regions and for
    /// origins outside the image.
    pub fn to_natural_rect(&self, geometry: &DisplayGeometry) -> Option<PixelRect> {
        let (scale_x, scale_y) = geometry.scale()?;
        let (x, y, w, h) = self.to_display_pixels(geometry);
        if !(w > 0.0 && h > 0.0) {
            return None;
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let to_px = |v: f32| v.max(0.0).round() as u32;
        let origin = |v: f32, natural: u32| {
            let v = v.max(0.0);
            (v < natural as f32).then(|| to_px(v).min(natural - 1))
        };

        let x = origin(x * scale_x, geometry.natural_width)?;
        let y = origin(y * scale_y, geometry.natural_height)?;
        let width = to_px(w * scale_x).clamp(1, geometry.natural_width - x);
        let height = to_px(h * scale_y).clamp(1, geometry.natural_height - y);

        Some(PixelRect::new(x, y, width, height))
    }
}

/// Displayed vs. natural size of the image a region was drawn on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayGeometry {
    pub displayed_width: f32,
    pub displayed_height: f32,
    pub natural_width: u32,
    pub natural_height: u32,
}

impl DisplayGeometry {
    pub fn new(
        displayed_width: f32,
        displayed_height: f32,
        natural_width: u32,
        natural_height: u32,
    ) -> Self {
        Self {
            displayed_width,
            displayed_height,
            natural_width,
            natural_height,
        }
    }

    /// Geometry of an image displayed at its natural size.
    pub fn natural(width: u32, height: u32) -> Self {
        Self::new(width as f32, height as f32, width, height)
    }

    /// Natural-over-displayed scale factors, `None` for a collapsed display.
    pub fn scale(&self) -> Option<(f32, f32)> {
        if self.displayed_width > 0.0 && self.displayed_height > 0.0 {
            Some((
                self.natural_width as f32 / self.displayed_width,
                self.natural_height as f32 / self.displayed_height,
            ))
        } else {
            None
        }
    }
}

/// Crop region in natural pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn as_tuple(&self) -> (u32, u32, u32, u32) {
        (self.x, self.y, self.width, self.height)
    }
}

/// Crop `source` to `region` and re-encode the result as JPEG.
///
/// `Ok(None)` means there was nothing to crop: no source bound yet, a
/// collapsed display, or a region that maps to no pixels. The source is never
/// modified. The output goes through its data URI, the same handle the UI
/// would display.
pub fn crop(
    source: Option<&RasterImage>,
    region: &CropRegion,
    geometry: &DisplayGeometry,
) -> anyhow::Result<Option<RasterImage>> {
    let Some(source) = source else {
        log::debug!("Crop requested without a source image");
        return Ok(None);
    };
    let Some(rect) = region.to_natural_rect(geometry) else {
        log::debug!("Crop region {region:?} maps to no pixels");
        return Ok(None);
    };

    let decoded = source.to_dynamic()?;
    let (x, y, width, height) = rect.as_tuple();
    // JPEG has no alpha channel; flatten before encoding.
    let cropped = decoded.crop_imm(x, y, width, height).to_rgb8();

    let mut buf = Cursor::new(Vec::new());
    JpegEncoder::new(&mut buf)
        .encode_image(&cropped)
        .context("Failed to encode cropped image")?;

    let encoded = RasterImage::from_encoded(
        CROPPED_FILE_NAME,
        CROPPED_MIME,
        buf.into_inner(),
        width,
        height,
    );
    let uri = encoded.data_uri();
    log::debug!("Cropped {}x{} from {:?} ({} bytes as data URI)", width, height, source, uri.len());

    RasterImage::from_data_uri(CROPPED_FILE_NAME, &uri).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::image::raster::tests::png;

    fn expected(value: f32, natural: u32) -> u32 {
        (value * natural as f32 / 100.0).round() as u32
    }

    #[test]
    fn percent_crop_matches_scaled_dimensions() {
        let source = png(200, 150);
        let regions = [
            CropRegion::percent(5.0, 5.0, 90.0, 67.5),
            CropRegion::percent(0.0, 0.0, 100.0, 100.0),
            CropRegion::percent(10.0, 20.0, 33.0, 41.0),
            CropRegion::percent(50.0, 50.0, 50.0, 50.0),
        ];
        // Displayed size differs from the natural size on purpose.
        let geometry = DisplayGeometry::new(640.0, 480.0, 200, 150);

        for region in regions {
            assert!(region.is_valid());
            let out = crop(Some(&source), &region, &geometry).unwrap().unwrap();
            let (w, h) = out.dimensions();
            assert!(expected(region.width, 200).abs_diff(w) <= 1, "{region:?} -> {w}");
            assert!(expected(region.height, 150).abs_diff(h) <= 1, "{region:?} -> {h}");
        }
    }

    #[test]
    fn pixel_regions_scale_from_display_to_natural() {
        let source = png(400, 300);
        let geometry = DisplayGeometry::new(200.0, 150.0, 400, 300);
        let region = CropRegion::pixel(10.0, 10.0, 100.0, 75.0);

        let rect = region.to_natural_rect(&geometry).unwrap();
        assert_eq!(rect.as_tuple(), (20, 20, 200, 150));

        let out = crop(Some(&source), &region, &geometry).unwrap().unwrap();
        assert_eq!(out.dimensions(), (200, 150));
    }

    #[test]
    fn output_is_a_jpeg_named_like_a_cropped_file() {
        let source = png(64, 48);
        let out = crop(
            Some(&source),
            &CropRegion::percent(0.0, 0.0, 50.0, 50.0),
            &DisplayGeometry::natural(64, 48),
        )
        .unwrap()
        .unwrap();

        assert_eq!(out.mime(), "image/jpeg");
        assert_eq!(out.name(), "cropped-image.jpg");
        assert_eq!(image::guess_format(out.bytes()).unwrap(), image::ImageFormat::Jpeg);
        assert!(out.data_uri().starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn source_is_left_untouched() {
        let source = png(64, 48);
        let before = source.bytes().clone();
        let _ = crop(
            Some(&source),
            &CropRegion::percent(25.0, 25.0, 50.0, 50.0),
            &DisplayGeometry::natural(64, 48),
        )
        .unwrap();
        assert_eq!(source.bytes(), &before);
        assert_eq!(source.dimensions(), (64, 48));
    }

    #[test]
    fn missing_source_is_a_no_op() {
        let out = crop(
            None,
            &CropRegion::percent(0.0, 0.0, 50.0, 50.0),
            &DisplayGeometry::natural(10, 10),
        )
        .unwrap();
        assert!(out.is_none());
    }

    #[test]
    fn collapsed_display_is_a_no_op() {
        let source = png(10, 10);
        let out = crop(
            Some(&source),
            &CropRegion::percent(0.0, 0.0, 50.0, 50.0),
            &DisplayGeometry::new(0.0, 0.0, 10, 10),
        )
        .unwrap();
        assert!(out.is_none());
    }

    #[test]
    fn natural_rect_is_clamped_to_image() {
        let geometry = DisplayGeometry::natural(100, 100);
        let rect = CropRegion::pixel(80.0, 90.0, 50.0, 50.0)
            .to_natural_rect(&geometry)
            .unwrap();
        assert_eq!(rect.as_tuple(), (80, 90, 20, 10));

        assert!(CropRegion::pixel(120.0, 0.0, 10.0, 10.0)
            .to_natural_rect(&geometry)
            .is_none());
    }

    #[test]
    fn sub_pixel_regions_still_cover_one_pixel() {
        for (natural_w, natural_h) in [(7, 5), (33, 200)] {
            let source = png(natural_w, natural_h);
            let geometry = DisplayGeometry::natural(natural_w, natural_h);
            for x in [0.0, 40.0, 99.0] {
                let region = CropRegion::percent(x, 0.0, 1.0, 1.0);
                assert!(region.is_valid());

                let out = crop(Some(&source), &region, &geometry).unwrap().unwrap();
                let (w, h) = out.dimensions();
                assert!(w >= 1 && h >= 1);
                assert!(w <= expected(1.0, natural_w).max(1));
                assert!(h <= expected(1.0, natural_h).max(1));
            }
        }
    }

    #[test]
    fn region_at_the_far_edge_keeps_its_last_pixel() {
        let rect = CropRegion::percent(99.5, 99.5, 0.5, 0.5)
            .to_natural_rect(&DisplayGeometry::natural(7, 5))
            .unwrap();
        assert_eq!(rect.as_tuple(), (6, 4, 1, 1));
    }

    #[test]
    fn validity_rules() {
        assert!(CropRegion::percent(0.0, 0.0, 100.0, 100.0).is_valid());
        assert!(!CropRegion::percent(10.0, 0.0, 95.0, 50.0).is_valid());
        assert!(!CropRegion::percent(0.0, 0.0, 0.0, 50.0).is_valid());
        assert!(CropRegion::pixel(0.0, 0.0, 500.0, 500.0).is_valid());
    }

    #[test]
    fn initial_region_follows_aspect_ratio() {
        let region = CropRegion::initial(Some(4.0 / 3.0), 400, 300);
        assert!(region.is_valid());
        assert!((region.x - 5.0).abs() < 1e-3);
        assert!((region.y - 5.0).abs() < 1e-3);

        let w_px = region.width * 400.0 / 100.0;
        let h_px = region.height * 300.0 / 100.0;
        assert!((w_px / h_px - 4.0 / 3.0).abs() < 1e-3);
    }

    #[test]
    fn initial_region_fits_tall_aspect_in_wide_image() {
        // A 4:3 box at 90% width would overflow a very wide image vertically.
        let region = CropRegion::initial(Some(4.0 / 3.0), 1000, 100);
        assert!(region.is_valid());
        assert!(region.y + region.height <= 95.0 + 1e-3);
    }
}
