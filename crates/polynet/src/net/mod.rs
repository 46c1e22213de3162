//! Unfolded nets.
//!
//! Purpose
//! - `NetGraph` owns 2D points, lines (fold/cut/user), and faces with their
//!   placement bases; every cross-reference is an index into its arenas.
//! - Layout operations (bounding box, fit-to-rect, centering, baking the transform).
//! - The compact index-list grammar shared by the native format and hand-authored nets.

pub mod grammar;
mod graph;
mod types;

pub use graph::NetGraph;
pub use types::{
    Align, Hinge, LineKind, LineStyle, NetCounts, NetFace, NetLine, NetPoint, StrokeStyle,
};

#[cfg(test)]
mod tests;
