//! Polyhedron → net unwrapping.
//!
//! Purpose
//! - Pick a spanning tree of the dual graph (breadth-first from an anchor face,
//!   optionally seeded by an explicit edge order) and lay each face flat by a
//!   rigid 2D map that glues it to its parent along the fold edge.
//! - Emit a `NetGraph` with fold lines for tree edges and cut lines for every
//!   other edge, plus an `AnomalyLog` of everything skipped or suspicious.
//!
//! Guarantees
//! - Each placed face is an isometric copy of its model face (up to reflection
//!   for faces flagged `flipped`).
//! - For a closed, connected, consistently wound model: `faces - 1` folds and
//!   `interior edges - (faces - 1)` cuts.
//! - Overlap between faces is not detected.

mod align;
mod engine;
mod types;

pub use align::{component_offset, hinge_transform};
pub use engine::Unwrapper;
pub use types::{FaceState, UnwrapCfg, UnwrapStats};

use crate::error::{AnomalyLog, PolyResult};
use crate::net::NetGraph;
use crate::poly3::Polyhedron;

/// One-shot unwrap.
///
/// If the anchor face has no usable chart, the lowest usable face of its
/// component is anchored instead. Fails on empty input or an out-of-range anchor.
pub fn unwrap(poly: &Polyhedron, cfg: &UnwrapCfg) -> PolyResult<(NetGraph, AnomalyLog)> {
    let (net, log, _) = unwrap_with_stats(poly, cfg)?;
    Ok((net, log))
}

pub fn unwrap_with_stats(
    poly: &Polyhedron,
    cfg: &UnwrapCfg,
) -> PolyResult<(NetGraph, AnomalyLog, UnwrapStats)> {
    let mut u = Unwrapper::new(poly)?.with_all_components(cfg.all_components);
    if !u.anchor(cfg.anchor)? {
        if let Some(f) = u.fallback_anchor(cfg.anchor) {
            u.anchor(f)?;
        }
    }
    if let Some(order) = &cfg.order {
        for &[a, b] in order {
            u.unwrap_edge(a, b);
        }
    }
    Ok(u.finish_with_stats())
}
