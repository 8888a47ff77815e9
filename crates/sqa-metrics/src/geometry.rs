//! Rectangle overlap.

use sqa_core::Bounds;

/// Intersection over union of two well-formed rectangles. Rectangles that do
/// not overlap (or only touch) score 0.
///
/// Areas are taken in `f64`: pixel coordinates are unbounded `i64` after
/// validation, and their products do not fit in `i64`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn iou(a: Bounds, b: Bounds) -> f64 {
    let left = a.left().max(b.left());
    let top = a.top().max(b.top());
    let right = a.right().min(b.right());
    let bottom = a.bottom().min(b.bottom());

    let width = (right - left).max(0);
    let height = (bottom - top).max(0);
    if width == 0 || height == 0 {
        return 0.0;
    }

    let intersection = width as f64 * height as f64;
    let union = area(a) + area(b) - intersection;
    (intersection / union).clamp(0.0, 1.0)
}

#[allow(clippy::cast_precision_loss)]
fn area(b: Bounds) -> f64 {
    b.width() as f64 * b.height() as f64
}
