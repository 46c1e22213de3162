//! Planar geometry for nets.
//!
//! - `Affine2`: face bases, net transform, fit-to-rect (composition, rigid
//!   segment alignment, reflection across a line).
//! - `BBox2`: axis-aligned bounds of placed net points.
//! - `polygon_area`, `point_in_polygon`: small polygon helpers used by `NetGraph`.

mod bbox;
mod types;

pub use bbox::BBox2;
pub use types::Affine2;

use nalgebra::Vector2;

/// Signed area of a closed polygon (positive for counter-clockwise).
pub fn polygon_area(points: &[Vector2<f64>]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut acc = 0.0;
    for i in 0..n {
        let p = points[i];
        let q = points[(i + 1) % n];
        acc += p.x * q.y - q.x * p.y;
    }
    0.5 * acc
}

/// Even-odd point-in-polygon test (boundary points may go either way).
pub fn point_in_polygon(p: Vector2<f64>, poly: &[Vector2<f64>]) -> bool {
    let n = poly.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (poly[i], poly[j]);
        if (a.y > p.y) != (b.y > p.y) {
            let x = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if p.x < x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests;
