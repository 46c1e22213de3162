//! Unwrap configuration, per-face state, and summary counts.

use serde::Serialize;

/// Traversal state of a model face.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaceState {
    Unvisited,
    /// Transform known and net face emitted; neighbors not yet expanded.
    Queued,
    /// Neighbors expanded.
    Placed,
    /// No usable chart (degenerate); never placed.
    Skipped,
}

impl FaceState {
    /// Has a net face.
    #[inline]
    pub fn is_placed(self) -> bool {
        matches!(self, FaceState::Queued | FaceState::Placed)
    }
}

/// One-shot unwrap options.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UnwrapCfg {
    /// Face placed first, with the identity transform.
    pub anchor: usize,
    /// Model edges `[a, b]` to fold first, in order.
    pub order: Option<Vec<[usize; 2]>>,
    /// Lay out every dual-graph component side by side instead of only the anchor's.
    pub all_components: bool,
}

/// Counts describing a finished unwrap.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct UnwrapStats {
    pub faces_placed: usize,
    pub faces_skipped: usize,
    pub folds: usize,
    pub cuts: usize,
    /// Cuts along edges with a single incident face.
    pub boundary_cuts: usize,
    pub flipped_faces: usize,
    /// Dual-graph components of the model.
    pub components: usize,
    /// Components that received an anchor.
    pub components_unwrapped: usize,
}
