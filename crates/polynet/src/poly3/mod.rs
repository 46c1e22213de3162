//! Polyhedron model (3D points + polygonal faces).
//!
//! Purpose
//! - Hold imported or constructed solids with ordered, normalized faces.
//! - Derive the edge map and dual graph used by the unwrapper.
//! - Project faces into local 2D charts.
//! - Report structural problems (non-manifold edges, winding mismatches,
//!   degenerate or non-planar faces) without failing.
//!
//! Conventions
//! - Faces are cyclic index lists; side `i` runs from `p[i]` to `p[i+1]`.
//! - Consistent winding means every interior edge is traversed once in each direction.
//! - Tolerances live in `crate::cfg` and scale with face size.

mod adjacency;
mod chart;
mod types;
mod validate;

pub use adjacency::{Adjacency, DualLink, EdgeInfo, EdgeKey, Incidence};
pub use chart::{ChartError, FaceChart};
pub use types::{CollapseReport, Face, Polyhedron};

pub(crate) use validate::same_direction;

#[cfg(test)]
mod tests;
