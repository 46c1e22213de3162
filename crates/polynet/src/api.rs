//! Curated entry points (UNSTABLE).
//!
//! - Free functions for the two collaborator calls: unwrap a model, fit a net
//!   into a rectangle.
//! - Re-exports of the types those calls and the file adapters use.

use crate::error::{AnomalyLog, PolyResult};
use crate::geom2::BBox2;
use crate::net::NetGraph;
use crate::poly3::Polyhedron;
use crate::unwrap::UnwrapCfg;

// Model and net
pub use crate::net::{Align, Hinge, LineKind, LineStyle, NetFace, NetLine, NetPoint, StrokeStyle};
pub use crate::poly3::{Adjacency, EdgeKey, Face, Polyhedron as Model};
// Unwrapping
pub use crate::unwrap::{unwrap_with_stats, FaceState, UnwrapStats, Unwrapper};
// Files
pub use crate::format::{
    parse_net, read_net, read_polyhedron, render_net, write_net, write_polyhedron, Format,
    Imported, WriteMode,
};
// Built-in solids
pub use crate::shapes::{
    cube, cuboid, dodecahedron, icosahedron, octahedron, prism, tetrahedron,
};

/// Unwrap `model` starting at face `anchor`, optionally applying the explicit
/// fold order `order` (model vertex pairs) before the default traversal.
pub fn unwrap(
    model: &Polyhedron,
    anchor: usize,
    order: Option<&[[usize; 2]]>,
) -> PolyResult<(NetGraph, AnomalyLog)> {
    let cfg = UnwrapCfg {
        anchor,
        order: order.map(<[_]>::to_vec),
        ..UnwrapCfg::default()
    };
    crate::unwrap::unwrap(model, &cfg)
}

/// By-value `NetGraph::fit_to_rect`; the net is returned unchanged when it is
/// empty or `rect` is degenerate.
pub fn fit_to_rect(mut net: NetGraph, rect: &BBox2, margin: f64) -> NetGraph {
    net.fit_to_rect(rect, margin);
    net
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;

    #[test]
    fn unwrap_with_order_and_fit() {
        let c = cube(1.0);
        // -x to -z, then -x to -y.
        let order = [[0, 2], [0, 4]];
        let (net, log) = unwrap(&c, 0, Some(&order)).unwrap();
        assert!(log.is_empty(), "{log:?}");
        assert_eq!(net.counts().folds, 5);
        let fitted = fit_to_rect(net, &BBox2::new(vector![0.0, 0.0], vector![100.0, 50.0]), 5.0);
        let bb = fitted.find_bbox().unwrap();
        let target = BBox2::new(vector![5.0, 5.0], vector![95.0, 45.0]);
        assert!(bb.within(&target, 1e-9));
        assert!(
            (bb.width() - target.width()).abs() < 1e-9
                || (bb.height() - target.height()).abs() < 1e-9
        );
    }

    #[test]
    fn anchor_out_of_range_fails() {
        assert!(unwrap(&tetrahedron(), 9, None).is_err());
    }
}
