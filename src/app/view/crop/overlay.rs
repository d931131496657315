// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/view/crop/overlay.rs
//
// Crop overlay widget with selection UI (overlay, border, handles, grid).

use crate::app::message::{AppMessage, CropMessage};
use crate::app::view::crop::selection::{CropSelection, DragHandle};
use cosmic::{
    Element, Renderer,
    iced::{
        Color, Length, Point, Rectangle, Size,
        advanced::{
            Clipboard, Layout, Shell, Widget,
            layout::{Limits, Node},
            renderer::{Quad, Renderer as QuadRenderer},
            widget::Tree,
        },
        event::{Event, Status},
        mouse::{self, Button, Cursor},
    },
};

const HANDLE_SIZE: f32 = 12.0;
const HANDLE_HIT_SIZE: f32 = 24.0;
const OVERLAY_COLOR: Color = Color::from_rgba(0.0, 0.0, 0.0, 0.5);
const HANDLE_COLOR: Color = Color::WHITE;
const BORDER_COLOR: Color = Color::WHITE;
const BORDER_WIDTH: f32 = 2.0;
const GRID_COLOR: Color = Color::from_rgba(1.0, 1.0, 1.0, 0.8);
const GRID_WIDTH: f32 = 1.0;

/// Draws the selection over an image shown with `ContentFit::Contain` in the
/// same bounds, and turns mouse input into crop messages in image pixels.
pub struct CropOverlay {
    selection: CropSelection,
    show_grid: bool,
}

impl CropOverlay {
    pub fn new(selection: &CropSelection, show_grid: bool) -> Self {
        Self {
            selection: selection.clone(),
            show_grid,
        }
    }

    fn img_size(&self) -> (f32, f32) {
        let (w, h) = self.selection.image_size;
        (w.max(1) as f32, h.max(1) as f32)
    }

    /// Scale of the contained image and its top-left corner on screen.
    fn placement(&self, bounds: &Rectangle) -> (f32, Point) {
        let (img_w, img_h) = self.img_size();
        let scale = (bounds.width / img_w).min(bounds.height / img_h);
        let offset_x = (bounds.width - img_w * scale) / 2.0;
        let offset_y = (bounds.height - img_h * scale) / 2.0;
        (scale, Point::new(bounds.x + offset_x, bounds.y + offset_y))
    }

    fn screen_to_image(&self, bounds: &Rectangle, point: Point) -> (f32, f32) {
        let (img_w, img_h) = self.img_size();
        let (scale, origin) = self.placement(bounds);

        let x = ((point.x - origin.x) / scale).clamp(0.0, img_w);
        let y = ((point.y - origin.y) / scale).clamp(0.0, img_h);
        (x, y)
    }

    fn image_to_screen(&self, bounds: &Rectangle, img_x: f32, img_y: f32) -> Point {
        let (scale, origin) = self.placement(bounds);
        Point::new(origin.x + img_x * scale, origin.y + img_y * scale)
    }

    fn hit_test_handle(&self, bounds: &Rectangle, point: Point) -> DragHandle {
        let Some((rx, ry, rw, rh)) = self.selection.region else {
            return DragHandle::None;
        };

        let handles = [
            (rx, ry, DragHandle::TopLeft),
            (rx + rw, ry, DragHandle::TopRight),
            (rx, ry + rh, DragHandle::BottomLeft),
            (rx + rw, ry + rh, DragHandle::BottomRight),
            (rx + rw / 2.0, ry, DragHandle::Top),
            (rx + rw / 2.0, ry + rh, DragHandle::Bottom),
            (rx, ry + rh / 2.0, DragHandle::Left),
            (rx + rw, ry + rh / 2.0, DragHandle::Right),
        ];

        for (hx, hy, handle) in handles {
            if point_in_handle(point, self.image_to_screen(bounds, hx, hy)) {
                return handle;
            }
        }

        let top_left = self.image_to_screen(bounds, rx, ry);
        let bottom_right = self.image_to_screen(bounds, rx + rw, ry + rh);
        let selection_rect = Rectangle::new(
            top_left,
            Size::new(bottom_right.x - top_left.x, bottom_right.y - top_left.y),
        );

        if selection_rect.contains(point) {
            return DragHandle::Move;
        }

        DragHandle::None
    }

    fn cursor_for_handle(&self, handle: DragHandle) -> mouse::Interaction {
        match handle {
            DragHandle::None => mouse::Interaction::Crosshair,
            DragHandle::TopLeft | DragHandle::BottomRight => {
                mouse::Interaction::ResizingDiagonallyDown
            }
            DragHandle::TopRight | DragHandle::BottomLeft => {
                mouse::Interaction::ResizingDiagonallyUp
            }
            DragHandle::Top | DragHandle::Bottom => mouse::Interaction::ResizingVertically,
            DragHandle::Left | DragHandle::Right => mouse::Interaction::ResizingHorizontally,
            DragHandle::Move => mouse::Interaction::Grabbing,
        }
    }

    fn draw_selection(&self, renderer: &mut Renderer, bounds: Rectangle) {
        let visible = |(_, _, w, h): &(f32, f32, f32, f32)| *w > 0.0 && *h > 0.0;
        let Some((rx, ry, rw, rh)) = self.selection.region.filter(visible) else {
            draw_quad(renderer, bounds, OVERLAY_COLOR);
            return;
        };

        let top_left = self.image_to_screen(&bounds, rx, ry);
        let (sel_x, sel_y) = (top_left.x, top_left.y);
        let bottom_right = self.image_to_screen(&bounds, rx + rw, ry + rh);
        let sel_w = bottom_right.x - sel_x;
        let sel_h = bottom_right.y - sel_y;
        let sel_right = sel_x + sel_w;
        let sel_bottom = sel_y + sel_h;
        let right = bounds.x + bounds.width;
        let bottom = bounds.y + bounds.height;

        // Dim everything outside the selection.
        if sel_y > bounds.y {
            draw_quad(
                renderer,
                Rectangle::new(bounds.position(), Size::new(bounds.width, sel_y - bounds.y)),
                OVERLAY_COLOR,
            );
        }
        if sel_bottom < bottom {
            draw_quad(
                renderer,
                Rectangle::new(
                    Point::new(bounds.x, sel_bottom),
                    Size::new(bounds.width, bottom - sel_bottom),
                ),
                OVERLAY_COLOR,
            );
        }
        if sel_x > bounds.x {
            draw_quad(
                renderer,
                Rectangle::new(Point::new(bounds.x, sel_y), Size::new(sel_x - bounds.x, sel_h)),
                OVERLAY_COLOR,
            );
        }
        if sel_right < right {
            draw_quad(
                renderer,
                Rectangle::new(Point::new(sel_right, sel_y), Size::new(right - sel_right, sel_h)),
                OVERLAY_COLOR,
            );
        }

        // Border.
        let edges = [
            Rectangle::new(Point::new(sel_x, sel_y), Size::new(sel_w, BORDER_WIDTH)),
            Rectangle::new(
                Point::new(sel_x, sel_bottom - BORDER_WIDTH),
                Size::new(sel_w, BORDER_WIDTH),
            ),
            Rectangle::new(Point::new(sel_x, sel_y), Size::new(BORDER_WIDTH, sel_h)),
            Rectangle::new(
                Point::new(sel_right - BORDER_WIDTH, sel_y),
                Size::new(BORDER_WIDTH, sel_h),
            ),
        ];
        for edge in edges {
            draw_quad(renderer, edge, BORDER_COLOR);
        }

        let half = HANDLE_SIZE / 2.0;
        let handles = [
            (sel_x, sel_y),
            (sel_right, sel_y),
            (sel_x, sel_bottom),
            (sel_right, sel_bottom),
            (sel_x + sel_w / 2.0, sel_y),
            (sel_x + sel_w / 2.0, sel_bottom),
            (sel_x, sel_y + sel_h / 2.0),
            (sel_right, sel_y + sel_h / 2.0),
        ];
        for (hx, hy) in handles {
            draw_quad(
                renderer,
                Rectangle::new(
                    Point::new(hx - half, hy - half),
                    Size::new(HANDLE_SIZE, HANDLE_SIZE),
                ),
                HANDLE_COLOR,
            );
        }

        if self.show_grid && sel_w > 10.0 && sel_h > 10.0 {
            for i in 1..3 {
                let grid_x = sel_x + sel_w / 3.0 * i as f32;
                let grid_y = sel_y + sel_h / 3.0 * i as f32;
                draw_quad(
                    renderer,
                    Rectangle::new(Point::new(grid_x, sel_y), Size::new(GRID_WIDTH, sel_h)),
                    GRID_COLOR,
                );
                draw_quad(
                    renderer,
                    Rectangle::new(Point::new(sel_x, grid_y), Size::new(sel_w, GRID_WIDTH)),
                    GRID_COLOR,
                );
            }
        }
    }
}

fn point_in_handle(point: Point, handle_center: Point) -> bool {
    let half = HANDLE_HIT_SIZE / 2.0;
    point.x >= handle_center.x - half
        && point.x <= handle_center.x + half
        && point.y >= handle_center.y - half
        && point.y <= handle_center.y + half
}

fn draw_quad(renderer: &mut Renderer, bounds: Rectangle, color: Color) {
    renderer.fill_quad(
        Quad {
            bounds,
            ..Quad::default()
        },
        color,
    );
}

impl Widget<AppMessage, cosmic::Theme, Renderer> for CropOverlay {
    fn size(&self) -> Size<Length> {
        Size::new(Length::Fill, Length::Fill)
    }

    fn layout(&self, _tree: &mut Tree, _renderer: &Renderer, limits: &Limits) -> Node {
        Node::new(limits.max())
    }

    fn draw(
        &self,
        _tree: &Tree,
        renderer: &mut Renderer,
        _theme: &cosmic::Theme,
        _style: &cosmic::iced::advanced::renderer::Style,
        layout: Layout<'_>,
        _cursor: Cursor,
        _viewport: &Rectangle,
    ) {
        self.draw_selection(renderer, layout.bounds());
    }

    fn on_event(
        &mut self,
        _tree: &mut Tree,
        event: Event,
        layout: Layout<'_>,
        cursor: Cursor,
        _renderer: &Renderer,
        _clipboard: &mut dyn Clipboard,
        shell: &mut Shell<'_, AppMessage>,
        _viewport: &Rectangle,
    ) -> Status {
        let bounds = layout.bounds();

        match event {
            Event::Mouse(mouse::Event::ButtonPressed(Button::Left)) => {
                if let Some(pos) = cursor.position_over(bounds) {
                    let handle = self.hit_test_handle(&bounds, pos);
                    let (x, y) = self.screen_to_image(&bounds, pos);

                    shell.publish(AppMessage::Crop(CropMessage::DragStart { x, y, handle }));
                    return Status::Captured;
                }
            }
            Event::Mouse(mouse::Event::CursorMoved { position }) => {
                if self.selection.is_dragging {
                    let (x, y) = self.screen_to_image(&bounds, position);
                    shell.publish(AppMessage::Crop(CropMessage::DragMove { x, y }));
                    return Status::Captured;
                }
            }
            Event::Mouse(mouse::Event::ButtonReleased(Button::Left)) => {
                if self.selection.is_dragging {
                    shell.publish(AppMessage::Crop(CropMessage::DragEnd));
                    return Status::Captured;
                }
            }
            _ => {}
        }

        Status::Ignored
    }

    fn mouse_interaction(
        &self,
        _tree: &Tree,
        layout: Layout<'_>,
        cursor: Cursor,
        _viewport: &Rectangle,
        _renderer: &Renderer,
    ) -> mouse::Interaction {
        let bounds = layout.bounds();

        if self.selection.is_dragging {
            return self.cursor_for_handle(self.selection.drag_handle);
        }

        if let Some(pos) = cursor.position_over(bounds) {
            return self.cursor_for_handle(self.hit_test_handle(&bounds, pos));
        }

        mouse::Interaction::default()
    }
}

impl<'a> From<CropOverlay> for Element<'a, AppMessage> {
    fn from(overlay: CropOverlay) -> Self {
        Self::new(overlay)
    }
}

pub fn crop_overlay(selection: &CropSelection, show_grid: bool) -> CropOverlay {
    CropOverlay::new(selection, show_grid)
}
