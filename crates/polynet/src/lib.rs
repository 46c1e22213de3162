//! Polyhedron nets: unwrap a polyhedral solid into a flat, foldable layout.
//!
//! Pipeline: `format` → `poly3::Polyhedron` → `unwrap` → `net::NetGraph` →
//! layout (`fit_to_rect`, `center`, `apply_transform`) → `format` (export).
//!
//! Error policy
//! - Fatal conditions (I/O, empty input, bad arguments) are `PolyError`.
//! - Everything recoverable (malformed lines, skipped faces, extra components)
//!   is an `Anomaly` in an `AnomalyLog` returned next to the partial result.
//!
//! API Policy
//! - `api` is the curated entry surface for callers; module paths may move.

mod cfg;
pub mod api;
pub mod error;
pub mod format;
pub mod geom2;
pub mod net;
pub mod poly3;
pub mod shapes;
pub mod unwrap;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::{Anomaly, AnomalyLog, PolyError, PolyResult};
pub use nalgebra::{Vector2 as Vec2, Vector3 as Vec3};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::error::{Anomaly, AnomalyLog, PolyError, PolyResult};
    pub use crate::format::{Format, Imported, WriteMode};
    pub use crate::geom2::{Affine2, BBox2};
    pub use crate::net::{LineKind, NetFace, NetGraph, NetLine};
    pub use crate::poly3::{Adjacency, EdgeKey, Polyhedron};
    pub use crate::unwrap::{UnwrapCfg, UnwrapStats, Unwrapper};
    pub use nalgebra::{Vector2 as Vec2, Vector3 as Vec3};
}
