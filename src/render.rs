use crate::anim::Animator;
use crate::camera::Camera;
use crate::quadtree::Rectangle;
use crate::sketch::Cell;
use crate::sketch::Shape;
use crate::sketch::Sketch;

/// Cells fainter than this are not drawn at all, since braille dots are either on or off.
const MIN_OPACITY: f32 = 0.5;

/// Maps sketch coordinates onto camera dots.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    /// Dots per sketch unit
    pub scale: f32,
}

impl Viewport {
    /// Fit a square sketch of side `size` into the camera, keeping its aspect ratio.
    pub fn fit(cam: &Camera, size: f32) -> Self {
        let dots = cam.width().min(cam.height()).saturating_sub(1) as f32;

        Viewport { scale: dots / size }
    }

    /// Negative coordinates end up on the first dot
    pub fn dot(&self, v: f32) -> usize {
        (v * self.scale).round() as usize
    }

    /// The corners of `r` in dots, as `(x0, y0, x1, y1)`.
    pub fn rect(&self, r: &Rectangle) -> (usize, usize, usize, usize) {
        let (min, max) = (r.min(), r.max());

        (self.dot(min.x), self.dot(min.y), self.dot(max.x), self.dot(max.y))
    }
}

/// Draw the outline of a cell and the shape picked for it.
pub fn draw_cell(cam: &mut Camera, view: &Viewport, cell: &Cell) {
    let (x0, y0, x1, y1) = view.rect(&cell.bounds);
    cam.draw_rect(x0, y0, x1, y1);

    let center = cell.bounds.center();
    let (cx, cy) = (view.dot(center.x), view.dot(center.y));

    match cell.shape {
        Shape::Empty => {}
        Shape::Dot => cam.draw_pixel(cx, cy),
        Shape::Square => {
            let (x0, y0, x1, y1) = view.rect(&cell.bounds.inset(cell.bounds.width() / 4.0));
            cam.draw_rect(x0, y0, x1, y1);
        }
        Shape::Cross => {
            let (x0, y0, x1, y1) = view.rect(&cell.bounds.inset(cell.bounds.width() / 8.0));
            cam.draw_hline(x0, x1, cy);
            cam.draw_vline(cx, y0, y1);
        }
    }
}

/// Draw every cell of the sketch.
pub fn draw_sketch(cam: &mut Camera, sketch: &Sketch) {
    let view = Viewport::fit(cam, sketch.settings().size);

    for cell in sketch.cells() {
        draw_cell(cam, &view, &cell);
    }
}

/// Draw the cells of the sketch that are visible enough according to `anim`.
pub fn draw_animated(cam: &mut Camera, sketch: &Sketch, anim: &Animator) {
    let view = Viewport::fit(cam, sketch.settings().size);

    for cell in sketch.cells() {
        if anim.opacity(cell.id) >= MIN_OPACITY {
            draw_cell(cam, &view, &cell);
        }
    }
}
