//! Tolerance defaults (internal).
//!
//! Policy
//! - Fixed constants, scale-relative where a model length is at hand. Call sites
//!   multiply by the relevant length (edge length, face diameter, bbox size).
//! - Adjust here rather than threading tolerances through every API.

/// Edges shorter than `LENGTH_EPS * scale` are treated as zero length.
pub(crate) const LENGTH_EPS: f64 = 1e-12;
/// Faces with area below `AREA_EPS * diameter^2` are degenerate.
pub(crate) const AREA_EPS: f64 = 1e-10;
/// Out-of-plane deviation above `PLANAR_EPS * diameter` flags a non-planar face.
pub(crate) const PLANAR_EPS: f64 = 1e-6;
/// Gap between side-by-side component nets, as a fraction of the current net width.
pub(crate) const COMPONENT_GAP_FRAC: f64 = 0.1;
