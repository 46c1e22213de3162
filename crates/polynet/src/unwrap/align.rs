//! Pure placement maps used by the unwrapper.

use nalgebra::Vector2;

use crate::cfg::COMPONENT_GAP_FRAC;
use crate::geom2::{Affine2, BBox2};

/// Child chart → net map that lays the child's copy of a fold edge onto the
/// parent's copy.
///
/// `child_a`/`child_b` are the chart positions of the edge endpoints that sit
/// at `net_a`/`net_b` in the net. With `mirror` the result is additionally
/// reflected across the fold line, which keeps the child on the far side of the
/// edge when the chart orientations of parent and child disagree.
///
/// None if either copy of the edge is (near) zero length.
pub fn hinge_transform(
    child_a: Vector2<f64>,
    child_b: Vector2<f64>,
    net_a: Vector2<f64>,
    net_b: Vector2<f64>,
    mirror: bool,
) -> Option<Affine2> {
    let rigid = Affine2::rigid_from_segments(child_a, child_b, net_a, net_b)?;
    if !mirror {
        return Some(rigid);
    }
    let flip = Affine2::reflection_across(net_a, net_b)?;
    Some(flip.compose(&rigid))
}

/// Translation placing a new component's anchor chart just right of `net`,
/// bottoms aligned, separated by a gap proportional to the net's size.
pub fn component_offset(net: &BBox2, chart: &BBox2) -> Affine2 {
    let gap = COMPONENT_GAP_FRAC * net.width().max(net.height());
    Affine2::translation(Vector2::new(
        net.max.x + gap - chart.min.x,
        net.min.y - chart.min.y,
    ))
}
