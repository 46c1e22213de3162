//! Polyhedron model: 3D points plus faces as cyclic index lists.
//!
//! Invariants:
//! - Every face index is `< points.len()`.
//! - A face has ≥ 3 distinct indices, no two consecutive (cyclically) equal.
//! - `class`, when set, is an arbitrary tag; `sets[c]` names class `c` if present.

use nalgebra::Vector3;

use crate::error::{PolyError, PolyResult};

/// One face: vertex indices in traversal order (counter-clockwise seen from outside
/// for consistently wound input).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Face {
    pub points: Vec<usize>,
    pub class: Option<usize>,
}

impl Face {
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Side `i` as the directed vertex pair `(p[i], p[i+1])`, wrapping at the end.
    #[inline]
    pub fn side(&self, i: usize) -> (usize, usize) {
        let n = self.points.len();
        (self.points[i % n], self.points[(i + 1) % n])
    }

    /// All sides in order.
    pub fn sides(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.points.len()).map(move |i| self.side(i))
    }
}

/// Summary of a `collapse_vertices` pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CollapseReport {
    /// Points removed because they coincided with an earlier point.
    pub merged_points: usize,
    /// Original indices of faces dropped after collapsing left < 3 distinct points.
    pub dropped_faces: Vec<usize>,
}

#[derive(Clone, Debug, Default)]
pub struct Polyhedron {
    pub name: Option<String>,
    pub points: Vec<Vector3<f64>>,
    pub faces: Vec<Face>,
    /// Names for face classes (index = class id).
    pub sets: Vec<String>,
}

impl Polyhedron {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    #[inline]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty() || self.faces.is_empty()
    }

    pub fn add_point(&mut self, p: Vector3<f64>) -> usize {
        self.points.push(p);
        self.points.len() - 1
    }

    /// Append a face after normalizing it.
    ///
    /// Consecutive duplicate indices (including last == first) are collapsed.
    /// Rejects out-of-range indices and faces with fewer than 3 distinct points.
    pub fn add_face(&mut self, indices: &[usize]) -> PolyResult<usize> {
        let points = normalize_face(indices, self.points.len())?;
        self.faces.push(Face {
            points,
            class: None,
        });
        Ok(self.faces.len() - 1)
    }

    pub fn add_face_with_class(&mut self, indices: &[usize], class: usize) -> PolyResult<usize> {
        let f = self.add_face(indices)?;
        self.faces[f].class = Some(class);
        Ok(f)
    }

    /// Append a named class and return its id.
    pub fn add_set(&mut self, name: impl Into<String>) -> usize {
        self.sets.push(name.into());
        self.sets.len() - 1
    }

    pub fn set_class(&mut self, face: usize, class: Option<usize>) -> PolyResult<()> {
        let count = self.faces.len();
        let f = self
            .faces
            .get_mut(face)
            .ok_or(PolyError::FaceOutOfRange { face, count })?;
        f.class = class;
        Ok(())
    }

    pub fn face_points(&self, face: usize) -> impl Iterator<Item = Vector3<f64>> + '_ {
        self.faces[face].points.iter().map(|&i| self.points[i])
    }

    /// Newell normal: direction is the face normal, length is twice the vector area.
    pub fn newell_normal(&self, face: usize) -> Vector3<f64> {
        let f = &self.faces[face];
        let mut n = Vector3::zeros();
        for (a, b) in f.sides() {
            let (p, q) = (self.points[a], self.points[b]);
            n.x += (p.y - q.y) * (p.z + q.z);
            n.y += (p.z - q.z) * (p.x + q.x);
            n.z += (p.x - q.x) * (p.y + q.y);
        }
        n
    }

    /// Unit normal; None for (near) zero-area faces.
    pub fn face_normal(&self, face: usize) -> Option<Vector3<f64>> {
        let n = self.newell_normal(face);
        let len = n.norm();
        (len > 0.0).then(|| n / len)
    }

    pub fn face_area(&self, face: usize) -> f64 {
        0.5 * self.newell_normal(face).norm()
    }

    /// Vertex average.
    pub fn face_center(&self, face: usize) -> Vector3<f64> {
        let f = &self.faces[face];
        let sum: Vector3<f64> = f.points.iter().map(|&i| self.points[i]).sum();
        sum / f.points.len() as f64
    }

    /// Longest distance between two vertices of the face.
    pub fn face_diameter(&self, face: usize) -> f64 {
        let pts: Vec<_> = self.face_points(face).collect();
        let mut d: f64 = 0.0;
        for (i, p) in pts.iter().enumerate() {
            for q in &pts[i + 1..] {
                d = d.max((p - q).norm());
            }
        }
        d
    }

    pub fn edge_length(&self, a: usize, b: usize) -> f64 {
        (self.points[a] - self.points[b]).norm()
    }

    /// Centroid of all points (zero for an empty model).
    pub fn centroid(&self) -> Vector3<f64> {
        if self.points.is_empty() {
            return Vector3::zeros();
        }
        self.points.iter().sum::<Vector3<f64>>() / self.points.len() as f64
    }

    /// Reverse the traversal order of one face.
    pub fn flip_face(&mut self, face: usize) {
        self.faces[face].points.reverse();
    }

    /// Merge points closer than `tol` into the earliest such point.
    ///
    /// Faces are remapped and re-normalized; faces left with fewer than three
    /// distinct points are dropped and reported.
    pub fn collapse_vertices(&mut self, tol: f64) -> CollapseReport {
        let n = self.points.len();
        let mut target: Vec<usize> = (0..n).collect();
        for i in 0..n {
            if target[i] != i {
                continue;
            }
            for j in (i + 1)..n {
                if target[j] == j && (self.points[i] - self.points[j]).norm() <= tol {
                    target[j] = i;
                }
            }
        }
        let mut remap = vec![usize::MAX; n];
        let mut kept = Vec::with_capacity(n);
        for i in 0..n {
            if target[i] == i {
                remap[i] = kept.len();
                kept.push(self.points[i]);
            }
        }
        let merged_points = n - kept.len();
        if merged_points == 0 {
            return CollapseReport::default();
        }
        for i in 0..n {
            remap[i] = remap[target[i]];
        }
        let new_count = kept.len();
        self.points = kept;

        let mut dropped_faces = Vec::new();
        let mut faces = Vec::with_capacity(self.faces.len());
        for (fi, f) in std::mem::take(&mut self.faces).into_iter().enumerate() {
            let mapped: Vec<usize> = f.points.iter().map(|&i| remap[i]).collect();
            match normalize_face(&mapped, new_count) {
                Ok(points) => faces.push(Face {
                    points,
                    class: f.class,
                }),
                Err(_) => dropped_faces.push(fi),
            }
        }
        self.faces = faces;
        tracing::debug!(merged_points, dropped = dropped_faces.len(), "collapsed vertices");
        CollapseReport {
            merged_points,
            dropped_faces,
        }
    }
}

/// Drop consecutive duplicates (cyclically), check bounds and distinct count.
pub(crate) fn normalize_face(indices: &[usize], point_count: usize) -> PolyResult<Vec<usize>> {
    if let Some(&bad) = indices.iter().find(|&&i| i >= point_count) {
        return Err(PolyError::InvalidFace {
            face: indices.to_vec(),
            reason: format!("index {bad} out of range ({point_count} points)"),
        });
    }
    let mut pts: Vec<usize> = Vec::with_capacity(indices.len());
    for &i in indices {
        if pts.last() != Some(&i) {
            pts.push(i);
        }
    }
    while pts.len() > 1 && pts.first() == pts.last() {
        pts.pop();
    }
    let mut distinct = pts.clone();
    distinct.sort_unstable();
    distinct.dedup();
    if distinct.len() < 3 {
        return Err(PolyError::InvalidFace {
            face: indices.to_vec(),
            reason: format!("{} distinct point(s), need at least 3", distinct.len()),
        });
    }
    Ok(pts)
}
