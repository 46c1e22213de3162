//! Face-local 2D charts.
//!
//! Each face gets an orthonormal frame in its own plane:
//! - origin at the face's first point,
//! - x axis along the first side of non-zero length (projected into the plane),
//! - y = n × x with n the Newell normal.
//!
//! Seen from the side the normal points to, the face is counter-clockwise, so a
//! consistently wound face always has positive chart area.

use nalgebra::{Vector2, Vector3};

use super::types::Polyhedron;
use crate::cfg::{AREA_EPS, LENGTH_EPS};

#[derive(Clone, Debug)]
pub struct FaceChart {
    /// Projected face points, in face order.
    pub points: Vec<Vector2<f64>>,
    pub origin: Vector3<f64>,
    pub x: Vector3<f64>,
    pub y: Vector3<f64>,
    pub normal: Vector3<f64>,
}

/// Why a face has no chart.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ChartError {
    /// All sides are (near) zero length.
    NoEdge,
    /// Points are (near) collinear.
    ZeroArea(f64),
}

impl std::fmt::Display for ChartError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChartError::NoEdge => write!(f, "all sides have zero length"),
            ChartError::ZeroArea(a) => {
                write!(f, "zero area ({a:e}), fewer than 3 valid projected points")
            }
        }
    }
}

impl FaceChart {
    /// Chart coordinates of a 3D point.
    #[inline]
    pub fn project(&self, p: Vector3<f64>) -> Vector2<f64> {
        let d = p - self.origin;
        Vector2::new(d.dot(&self.x), d.dot(&self.y))
    }
}

impl Polyhedron {
    /// Project face `face` into its local chart.
    pub fn face_chart(&self, face: usize) -> Result<FaceChart, ChartError> {
        let pts: Vec<Vector3<f64>> = self.face_points(face).collect();
        let diameter = self.face_diameter(face);
        if diameter <= LENGTH_EPS {
            return Err(ChartError::NoEdge);
        }
        let newell = self.newell_normal(face);
        let area = 0.5 * newell.norm();
        if area <= AREA_EPS * diameter * diameter {
            return Err(ChartError::ZeroArea(area));
        }
        let normal = newell.normalize();
        let origin = pts[0];
        let n = pts.len();
        let mut x = None;
        for i in 0..n {
            let e = pts[(i + 1) % n] - pts[i];
            let in_plane = e - normal * normal.dot(&e);
            if in_plane.norm() > LENGTH_EPS * diameter {
                x = Some(in_plane.normalize());
                break;
            }
        }
        let x = x.ok_or(ChartError::NoEdge)?;
        let y = normal.cross(&x);
        let mut chart = FaceChart {
            points: Vec::with_capacity(n),
            origin,
            x,
            y,
            normal,
        };
        chart.points = pts.iter().map(|&p| chart.project(p)).collect();
        Ok(chart)
    }

    /// Largest distance of a face point from the plane through its first point.
    pub fn face_planarity_deviation(&self, face: usize) -> f64 {
        let Some(n) = self.face_normal(face) else {
            return 0.0;
        };
        let o = self.points[self.faces[face].points[0]];
        self.face_points(face)
            .map(|p| (p - o).dot(&n).abs())
            .fold(0.0, f64::max)
    }
}
