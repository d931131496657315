// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/view/crop/selection.rs
//
// Crop selection state and drag handle types.

use crate::constant::MIN_SELECTION_SIZE;
use crate::domain::image::{CropRegion, CropUnit, DisplayGeometry};
use crate::domain::product::CropSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragHandle {
    #[default]
    None,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Top,
    Bottom,
    Left,
    Right,
    Move,
}

/// Live crop rectangle in natural image pixels `(x, y, width, height)`.
#[derive(Debug, Clone, Default)]
pub struct CropSelection {
    pub region: Option<(f32, f32, f32, f32)>,
    pub image_size: (u32, u32),
    pub aspect_ratio: Option<f32>,
    pub is_dragging: bool,
    pub drag_handle: DragHandle,
    pub drag_start: Option<(f32, f32)>,
    pub drag_start_region: Option<(f32, f32, f32, f32)>,
}

impl CropSelection {
    /// Open a selection over an image with the default initial rectangle.
    pub fn open(width: u32, height: u32, aspect_ratio: Option<f32>) -> Self {
        let initial = CropRegion::initial(aspect_ratio, width, height);
        let (x, y, w, h) = initial.to_display_pixels(&DisplayGeometry::natural(width, height));

        Self {
            region: Some((x, y, w, h)),
            image_size: (width, height),
            aspect_ratio,
            ..Self::default()
        }
    }

    fn img_bounds(&self) -> (f32, f32) {
        (self.image_size.0 as f32, self.image_size.1 as f32)
    }

    pub fn start_new_selection(&mut self, x: f32, y: f32) {
        self.region = Some((x, y, 0.0, 0.0));
        self.is_dragging = true;
        self.drag_handle = DragHandle::None;
        self.drag_start = Some((x, y));
        self.drag_start_region = None;
    }

    pub fn start_handle_drag(&mut self, handle: DragHandle, x: f32, y: f32) {
        if handle == DragHandle::None || self.region.is_none() {
            self.start_new_selection(x, y);
            return;
        }
        self.is_dragging = true;
        self.drag_handle = handle;
        self.drag_start = Some((x, y));
        self.drag_start_region = self.region;
    }

    pub fn update_drag(&mut self, x: f32, y: f32) {
        if !self.is_dragging {
            return;
        }
        let (img_width, img_height) = self.img_bounds();
        let Some((start_x, start_y)) = self.drag_start else {
            return;
        };

        match self.drag_handle {
            DragHandle::None => {
                let x = x.clamp(0.0, img_width);
                let y = y.clamp(0.0, img_height);
                let min_x = start_x.min(x);
                let min_y = start_y.min(y);
                let w = (x - start_x).abs();
                let h = (y - start_y).abs();

                self.region = Some(match self.aspect_ratio {
                    Some(aspect) => {
                        // The longer drag axis drives the size.
                        let w = w.max(h * aspect);
                        let anchor = Anchor {
                            right: x < start_x,
                            bottom: y < start_y,
                            height_driven: false,
                        };
                        let origin_x = if anchor.right { start_x - w } else { start_x };
                        let origin_y = if anchor.bottom { start_y - w / aspect } else { start_y };
                        self.fit_aspect((origin_x, origin_y, w, w / aspect), anchor, aspect)
                    }
                    None => (min_x, min_y, w, h),
                });
            }
            DragHandle::Move => {
                if let Some((rx, ry, rw, rh)) = self.drag_start_region {
                    let dx = x - start_x;
                    let dy = y - start_y;
                    let new_x = (rx + dx).max(0.0).min(img_width - rw);
                    let new_y = (ry + dy).max(0.0).min(img_height - rh);
                    self.region = Some((new_x, new_y, rw, rh));
                }
            }
            handle => {
                if let Some((rx, ry, rw, rh)) = self.drag_start_region {
                    let dx = x - start_x;
                    let dy = y - start_y;

                    let resized = self.resize_region(rx, ry, rw, rh, dx, dy);
                    self.region = Some(match self.aspect_ratio {
                        Some(aspect) => self.fit_aspect(resized, Anchor::for_handle(handle), aspect),
                        None => resized,
                    });
                }
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn resize_region(
        &self,
        rx: f32,
        ry: f32,
        rw: f32,
        rh: f32,
        dx: f32,
        dy: f32,
    ) -> (f32, f32, f32, f32) {
        const MIN_SIZE: f32 = MIN_SELECTION_SIZE;
        let (img_width, img_height) = self.img_bounds();
        let right = rx + rw;
        let bottom = ry + rh;

        match self.drag_handle {
            DragHandle::TopLeft => {
                let new_rx = (rx + dx).max(0.0).min(right - MIN_SIZE);
                let new_ry = (ry + dy).max(0.0).min(bottom - MIN_SIZE);
                (new_rx, new_ry, right - new_rx, bottom - new_ry)
            }
            DragHandle::TopRight => {
                let new_right = (right + dx).max(rx + MIN_SIZE).min(img_width);
                let new_ry = (ry + dy).max(0.0).min(bottom - MIN_SIZE);
                (rx, new_ry, new_right - rx, bottom - new_ry)
            }
            DragHandle::BottomLeft => {
                let new_rx = (rx + dx).max(0.0).min(right - MIN_SIZE);
                let new_bottom = (bottom + dy).max(ry + MIN_SIZE).min(img_height);
                (new_rx, ry, right - new_rx, new_bottom - ry)
            }
            DragHandle::BottomRight => {
                let new_right = (right + dx).max(rx + MIN_SIZE).min(img_width);
                let new_bottom = (bottom + dy).max(ry + MIN_SIZE).min(img_height);
                (rx, ry, new_right - rx, new_bottom - ry)
            }
            DragHandle::Top => {
                let new_ry = (ry + dy).max(0.0).min(bottom - MIN_SIZE);
                (rx, new_ry, rw, bottom - new_ry)
            }
            DragHandle::Bottom => {
                let new_bottom = (bottom + dy).max(ry + MIN_SIZE).min(img_height);
                (rx, ry, rw, new_bottom - ry)
            }
            DragHandle::Left => {
                let new_rx = (rx + dx).max(0.0).min(right - MIN_SIZE);
                (new_rx, ry, right - new_rx, rh)
            }
            DragHandle::Right => {
                let new_right = (right + dx).max(rx + MIN_SIZE).min(img_width);
                (rx, ry, new_right - rx, rh)
            }
            _ => (rx, ry, rw, rh),
        }
    }

    /// Force `aspect` onto a freely resized rectangle, keeping the anchored
    /// edges in place and shrinking until it fits inside the image.
    fn fit_aspect(
        &self,
        (x, y, w, h): (f32, f32, f32, f32),
        anchor: Anchor,
        aspect: f32,
    ) -> (f32, f32, f32, f32) {
        let (img_width, img_height) = self.img_bounds();
        let right = x + w;
        let bottom = y + h;

        let (mut w, mut h) = if anchor.height_driven {
            (h * aspect, h)
        } else {
            (w, w / aspect)
        };

        let room_w = if anchor.right { right } else { img_width - x };
        let room_h = if anchor.bottom { bottom } else { img_height - y };
        let shrink = (room_w / w).min(room_h / h).min(1.0);
        if shrink.is_finite() && shrink > 0.0 {
            w *= shrink;
            h *= shrink;
        }

        let new_x = if anchor.right { right - w } else { x };
        let new_y = if anchor.bottom { bottom - h } else { y };
        (new_x.max(0.0), new_y.max(0.0), w, h)
    }

    pub fn end_drag(&mut self) {
        self.is_dragging = false;
        self.drag_start = None;
        self.drag_start_region = None;
    }

    pub fn reset(&mut self) {
        self.region = None;
        self.is_dragging = false;
        self.drag_handle = DragHandle::None;
        self.drag_start = None;
        self.drag_start_region = None;
    }

    /// Whether the rectangle is large enough to crop. Images smaller than two
    /// pixels on a side accept any non-empty rectangle.
    pub fn has_selection(&self) -> bool {
        let (img_width, img_height) = self.img_bounds();
        let min_edge = MIN_SELECTION_SIZE.min(img_width.min(img_height) / 2.0);
        self.region
            .is_some_and(|(_, _, w, h)| w > 0.0 && h > 0.0 && w >= min_edge && h >= min_edge)
    }
}

/// Which edges stay put while a handle is dragged.
#[derive(Debug, Clone, Copy)]
struct Anchor {
    right: bool,
    bottom: bool,
    height_driven: bool,
}

impl Anchor {
    fn for_handle(handle: DragHandle) -> Self {
        let (right, bottom, height_driven) = match handle {
            DragHandle::TopLeft => (true, true, false),
            DragHandle::TopRight => (false, true, false),
            DragHandle::BottomLeft => (true, false, false),
            DragHandle::Top => (false, true, true),
            DragHandle::Bottom => (false, false, true),
            DragHandle::Left => (true, false, false),
            _ => (false, false, false),
        };
        Self {
            right,
            bottom,
            height_driven,
        }
    }
}

impl CropSource for CropSelection {
    fn cropped_region(&self) -> Option<CropRegion> {
        if !self.has_selection() {
            return None;
        }
        let (x, y, w, h) = self.region?;
        let (img_width, img_height) = self.img_bounds();

        let to_percent = |v: f32, total: f32| (v / total * 100.0).clamp(0.0, 100.0);
        let x = to_percent(x, img_width);
        let y = to_percent(y, img_height);
        let region = CropRegion {
            unit: CropUnit::Percent,
            x,
            y,
            width: to_percent(w, img_width).min(100.0 - x),
            height: to_percent(h, img_height).min(100.0 - y),
        };
        region.is_valid().then_some(region)
    }

    fn geometry(&self) -> Option<DisplayGeometry> {
        let (width, height) = self.image_size;
        (width > 0 && height > 0).then(|| DisplayGeometry::natural(width, height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ASPECT: f32 = 4.0 / 3.0;

    fn ratio(selection: &CropSelection) -> f32 {
        let (_, _, w, h) = selection.region.unwrap();
        w / h
    }

    fn inside(selection: &CropSelection) -> bool {
        let (x, y, w, h) = selection.region.unwrap();
        let (iw, ih) = selection.img_bounds();
        x >= 0.0 && y >= 0.0 && x + w <= iw + 1e-3 && y + h <= ih + 1e-3
    }

    #[test]
    fn opens_with_initial_rectangle() {
        let selection = CropSelection::open(400, 300, Some(ASPECT));
        let (x, y, w, h) = selection.region.unwrap();
        assert!((x - 20.0).abs() < 1e-3);
        assert!((y - 15.0).abs() < 1e-3);
        assert!((w - 360.0).abs() < 1e-3);
        assert!((h - 270.0).abs() < 1e-3);
        assert!(selection.has_selection());
    }

    #[test]
    fn corner_drag_keeps_aspect_ratio() {
        let mut selection = CropSelection::open(400, 300, Some(ASPECT));
        selection.start_handle_drag(DragHandle::BottomRight, 380.0, 285.0);
        selection.update_drag(300.0, 200.0);

        assert!((ratio(&selection) - ASPECT).abs() < 1e-3);
        let (x, y, _, _) = selection.region.unwrap();
        assert!((x - 20.0).abs() < 1e-3 && (y - 15.0).abs() < 1e-3);
        assert!(inside(&selection));
    }

    #[test]
    fn top_left_drag_anchors_bottom_right() {
        let mut selection = CropSelection::open(400, 300, Some(ASPECT));
        selection.start_handle_drag(DragHandle::TopLeft, 20.0, 15.0);
        selection.update_drag(100.0, 40.0);

        let (x, y, w, h) = selection.region.unwrap();
        assert!((x + w - 380.0).abs() < 1e-3);
        assert!((y + h - 285.0).abs() < 1e-3);
        assert!((ratio(&selection) - ASPECT).abs() < 1e-3);
    }

    #[test]
    fn growing_past_the_image_is_clamped() {
        let mut selection = CropSelection::open(400, 300, Some(ASPECT));
        selection.start_handle_drag(DragHandle::Right, 380.0, 150.0);
        selection.update_drag(1000.0, 150.0);

        assert!(inside(&selection));
        assert!((ratio(&selection) - ASPECT).abs() < 1e-3);
    }

    #[test]
    fn new_selection_follows_aspect_ratio() {
        let mut selection = CropSelection::open(400, 300, Some(ASPECT));
        selection.start_handle_drag(DragHandle::None, 100.0, 100.0);
        selection.update_drag(180.0, 120.0);

        let (x, y, w, h) = selection.region.unwrap();
        assert_eq!((x, y), (100.0, 100.0));
        assert!((w - 80.0).abs() < 1e-3);
        assert!((h - 60.0).abs() < 1e-3);
    }

    #[test]
    fn free_selection_without_aspect() {
        let mut selection = CropSelection::open(400, 300, None);
        selection.start_new_selection(50.0, 50.0);
        selection.update_drag(10.0, 200.0);
        assert_eq!(selection.region, Some((10.0, 50.0, 40.0, 150.0)));
    }

    #[test]
    fn move_is_clamped_to_image() {
        let mut selection = CropSelection::open(400, 300, Some(ASPECT));
        selection.start_handle_drag(DragHandle::Move, 200.0, 150.0);
        selection.update_drag(500.0, 500.0);

        let (x, y, w, h) = selection.region.unwrap();
        assert!((x + w - 400.0).abs() < 1e-3);
        assert!((y + h - 300.0).abs() < 1e-3);
        selection.end_drag();
        assert!(!selection.is_dragging);
    }

    #[test]
    fn moves_without_drag_are_ignored() {
        let mut selection = CropSelection::open(400, 300, Some(ASPECT));
        let before = selection.region;
        selection.update_drag(0.0, 0.0);
        assert_eq!(selection.region, before);
    }

    #[test]
    fn exposes_percent_region() {
        let selection = CropSelection::open(400, 300, Some(ASPECT));
        let region = selection.cropped_region().unwrap();
        assert_eq!(region.unit, CropUnit::Percent);
        assert!((region.x - 5.0).abs() < 1e-3);
        assert!((region.width - 90.0).abs() < 1e-3);
        assert!((region.height - 90.0).abs() < 1e-3);
        assert_eq!(selection.geometry(), Some(DisplayGeometry::natural(400, 300)));
    }

    #[test]
    fn tiny_or_missing_selection_has_no_region() {
        let mut selection = CropSelection::open(400, 300, None);
        selection.reset();
        assert!(selection.cropped_region().is_none());

        selection.start_new_selection(10.0, 10.0);
        selection.update_drag(10.5, 10.5);
        assert!(selection.cropped_region().is_none());
    }

    #[test]
    fn one_pixel_images_can_be_cropped() {
        for (width, height) in [(1, 1), (1, 40), (40, 1)] {
            let selection = CropSelection::open(width, height, Some(ASPECT));
            assert!(selection.has_selection(), "{width}x{height}");
            assert!(selection.cropped_region().is_some(), "{width}x{height}");
        }
    }

    #[test]
    fn click_without_drag_is_not_a_selection() {
        let mut selection = CropSelection::open(400, 300, Some(ASPECT));
        selection.start_new_selection(50.0, 50.0);
        selection.end_drag();
        assert!(!selection.has_selection());
    }
}
