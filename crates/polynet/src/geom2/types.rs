//! Planar affine maps.
//!
//! - `Affine2`: `x ↦ M x + t`, used for face bases, the net transform, and fit-to-rect.
//! - Constructors for the rigid motions the unwrapper needs: segment-to-segment
//!   alignment and reflection across a line.
//!
//! Array layout (`to_array`/`from_array`) is `[a, b, c, d, e, f]` with
//! `x' = a x + c y + e`, `y' = b x + d y + f`.

use nalgebra::{Matrix2, Vector2};

use crate::cfg::LENGTH_EPS;

/// 2D affine map: `x ↦ M x + t`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Affine2 {
    pub m: Matrix2<f64>,
    pub t: Vector2<f64>,
}

impl Default for Affine2 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Affine2 {
    #[inline]
    pub fn identity() -> Self {
        Self {
            m: Matrix2::identity(),
            t: Vector2::zeros(),
        }
    }

    #[inline]
    pub fn translation(t: Vector2<f64>) -> Self {
        Self {
            m: Matrix2::identity(),
            t,
        }
    }

    /// Uniform scaling about the origin.
    #[inline]
    pub fn scaling(s: f64) -> Self {
        Self {
            m: Matrix2::identity() * s,
            t: Vector2::zeros(),
        }
    }

    /// Counter-clockwise rotation about the origin.
    #[inline]
    pub fn rotation(theta: f64) -> Self {
        let (s, c) = theta.sin_cos();
        Self {
            m: Matrix2::new(c, -s, s, c),
            t: Vector2::zeros(),
        }
    }

    /// Reflection across the line through `a` and `b`. None if `a ≈ b`.
    pub fn reflection_across(a: Vector2<f64>, b: Vector2<f64>) -> Option<Self> {
        let d = b - a;
        let len = d.norm();
        if len <= LENGTH_EPS * a.norm().max(b.norm()).max(1.0) {
            return None;
        }
        let u = d / len;
        // F = 2 u uᵀ − I
        let f = Matrix2::new(
            2.0 * u.x * u.x - 1.0,
            2.0 * u.x * u.y,
            2.0 * u.x * u.y,
            2.0 * u.y * u.y - 1.0,
        );
        Some(Self { m: f, t: a - f * a })
    }

    /// Rotation plus translation taking `src_a → dst_a` and the direction of
    /// `src_b − src_a` onto that of `dst_b − dst_a`.
    ///
    /// When both segments have equal length this also takes `src_b → dst_b`.
    /// None if either segment is (near) zero length.
    pub fn rigid_from_segments(
        src_a: Vector2<f64>,
        src_b: Vector2<f64>,
        dst_a: Vector2<f64>,
        dst_b: Vector2<f64>,
    ) -> Option<Self> {
        let ds = src_b - src_a;
        let dd = dst_b - dst_a;
        let (ls, ld) = (ds.norm(), dd.norm());
        let scale = src_a
            .norm()
            .max(src_b.norm())
            .max(dst_a.norm())
            .max(dst_b.norm())
            .max(1.0);
        if ls <= LENGTH_EPS * scale || ld <= LENGTH_EPS * scale {
            return None;
        }
        let denom = ls * ld;
        let c = ds.dot(&dd) / denom;
        let s = (ds.x * dd.y - ds.y * dd.x) / denom;
        let m = Matrix2::new(c, -s, s, c);
        Some(Self {
            m,
            t: dst_a - m * src_a,
        })
    }

    /// Orthonormal frame with origin `o` and x axis towards `x`. None if `o ≈ x`.
    pub fn frame(o: Vector2<f64>, x: Vector2<f64>) -> Option<Self> {
        Self::rigid_from_segments(Vector2::zeros(), Vector2::new(1.0, 0.0), o, x)
    }

    #[inline]
    pub fn apply(&self, p: Vector2<f64>) -> Vector2<f64> {
        self.m * p + self.t
    }

    /// `self ∘ inner`: apply `inner` first, then `self`.
    #[inline]
    pub fn compose(&self, inner: &Affine2) -> Affine2 {
        Affine2 {
            m: self.m * inner.m,
            t: self.m * inner.t + self.t,
        }
    }

    #[inline]
    pub fn inverse(&self) -> Option<Self> {
        self.m.try_inverse().map(|minv| Self {
            m: minv,
            t: -minv * self.t,
        })
    }

    #[inline]
    pub fn is_orientation_preserving(&self) -> bool {
        self.m.determinant() > 0.0
    }

    /// `Mᵀ M ≈ I` within `tol` (max-abs).
    pub fn is_isometry(&self, tol: f64) -> bool {
        let g = self.m.transpose() * self.m - Matrix2::identity();
        g.iter().all(|v| v.abs() <= tol)
    }

    pub fn is_identity(&self, tol: f64) -> bool {
        (self.m - Matrix2::identity()).iter().all(|v| v.abs() <= tol)
            && self.t.iter().all(|v| v.abs() <= tol)
    }

    /// `[a, b, c, d, e, f]`, see module docs.
    pub fn to_array(&self) -> [f64; 6] {
        [
            self.m[(0, 0)],
            self.m[(1, 0)],
            self.m[(0, 1)],
            self.m[(1, 1)],
            self.t.x,
            self.t.y,
        ]
    }

    pub fn from_array(v: [f64; 6]) -> Self {
        Self {
            m: Matrix2::new(v[0], v[2], v[1], v[3]),
            t: Vector2::new(v[4], v[5]),
        }
    }
}
