//! Built-in solids used in tests, benchmarks, and demos.
//!
//! Purpose
//! - Canonical, consistently wound (outward, counter-clockwise) polyhedra with
//!   deterministic vertex and face order, so tests can pin exact counts.
//!
//! Construction
//! - Platonic solids are centered at the origin; faces are ordered
//!   counter-clockwise around their outward direction by `order_ccw`.
//! - The dodecahedron is the dual of the icosahedron (face centroids), and tags
//!   its twelve faces with classes named after the months.
//! - Prisms put the bottom ring first (indices `0..n`), then the top ring.

pub mod rand;

use nalgebra::Vector3;

use crate::poly3::Polyhedron;

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Sort `idx` counter-clockwise as seen from the tip of `outward`.
pub fn order_ccw(points: &[Vector3<f64>], idx: &mut [usize], outward: Vector3<f64>) {
    if idx.len() < 3 {
        return;
    }
    let c = idx.iter().map(|&i| points[i]).sum::<Vector3<f64>>() / idx.len() as f64;
    let n = outward.normalize();
    let r0 = points[idx[0]] - c;
    let u = (r0 - n * n.dot(&r0)).normalize();
    let w = n.cross(&u);
    let angle = |i: usize| {
        let d = points[i] - c;
        d.dot(&w).atan2(d.dot(&u))
    };
    idx.sort_by(|&a, &b| angle(a).total_cmp(&angle(b)));
}

/// Solid from vertex sets of faces of an origin-centered convex body.
fn convex_from_vertex_sets(
    name: &str,
    points: Vec<Vector3<f64>>,
    sets: Vec<Vec<usize>>,
) -> Polyhedron {
    let mut poly = Polyhedron::with_name(name);
    poly.points = points;
    for mut f in sets {
        let c = f.iter().map(|&i| poly.points[i]).sum::<Vector3<f64>>();
        order_ccw(&poly.points, &mut f, c);
        // Vertex sets come from distinct, in-range indices.
        if let Err(e) = poly.add_face(&f) {
            tracing::error!(%e, "built-in solid produced an invalid face");
        }
    }
    poly
}

/// Axis-aligned box `[-x/2, x/2] × [-y/2, y/2] × [-z/2, z/2]`.
///
/// Vertex `i` has coordinate signs from bits (x: 1, y: 2, z: 4). Faces are
/// ordered -x, +x, -y, +y, -z, +z.
pub fn cuboid(x: f64, y: f64, z: f64) -> Polyhedron {
    let half = Vector3::new(x, y, z) * 0.5;
    let points: Vec<Vector3<f64>> = (0..8)
        .map(|i| {
            let s = |bit: usize| if i & bit != 0 { 1.0 } else { -1.0 };
            Vector3::new(s(1) * half.x, s(2) * half.y, s(4) * half.z)
        })
        .collect();
    let mut sets = Vec::with_capacity(6);
    for axis in 0..3 {
        for positive in [false, true] {
            let bit = 1 << axis;
            let f: Vec<usize> = (0..8).filter(|i| (i & bit != 0) == positive).collect();
            sets.push(f);
        }
    }
    let mut poly = convex_from_vertex_sets("Cuboid", points, sets);
    if x == y && y == z {
        poly.name = Some("Cube".into());
    }
    poly
}

/// Cube with edge length `side`.
pub fn cube(side: f64) -> Polyhedron {
    cuboid(side, side, side)
}

/// Regular tetrahedron inscribed in the cube `[-1,1]^3`.
pub fn tetrahedron() -> Polyhedron {
    let points = vec![
        Vector3::new(1.0, 1.0, 1.0),
        Vector3::new(1.0, -1.0, -1.0),
        Vector3::new(-1.0, 1.0, -1.0),
        Vector3::new(-1.0, -1.0, 1.0),
    ];
    let sets = (0..4)
        .map(|skip| (0..4).filter(|&i| i != skip).collect())
        .collect();
    convex_from_vertex_sets("Tetrahedron", points, sets)
}

/// Regular octahedron with vertices `±e_i`.
pub fn octahedron() -> Polyhedron {
    let mut points = Vec::with_capacity(6);
    for axis in 0..3 {
        for s in [1.0, -1.0] {
            let mut p = Vector3::zeros();
            p[axis] = s;
            points.push(p);
        }
    }
    let mut sets = Vec::with_capacity(8);
    for sx in 0..2 {
        for sy in 0..2 {
            for sz in 0..2 {
                sets.push(vec![sx, 2 + sy, 4 + sz]);
            }
        }
    }
    convex_from_vertex_sets("Octahedron", points, sets)
}

/// Regular icosahedron with vertices at cyclic permutations of `(0, ±1, ±φ)`.
///
/// Faces are the vertex triples at pairwise distance 2 (the edge length),
/// in lexicographic order.
pub fn icosahedron() -> Polyhedron {
    let phi = (1.0 + 5f64.sqrt()) / 2.0;
    let mut points = Vec::with_capacity(12);
    for s1 in [1.0, -1.0] {
        for s2 in [1.0, -1.0] {
            points.push(Vector3::new(0.0, s1, s2 * phi));
            points.push(Vector3::new(s1, s2 * phi, 0.0));
            points.push(Vector3::new(s2 * phi, 0.0, s1));
        }
    }
    let adjacent = |a: usize, b: usize| ((points[a] - points[b]).norm() - 2.0).abs() < 1e-9;
    let mut sets = Vec::with_capacity(20);
    for a in 0..12 {
        for b in (a + 1)..12 {
            if !adjacent(a, b) {
                continue;
            }
            for c in (b + 1)..12 {
                if adjacent(a, c) && adjacent(b, c) {
                    sets.push(vec![a, b, c]);
                }
            }
        }
    }
    convex_from_vertex_sets("Icosahedron", points, sets)
}

/// Regular dodecahedron as the dual of `icosahedron()`.
///
/// Point `k` is the centroid of icosahedron face `k`; face `v` gathers the five
/// icosahedron faces around vertex `v` and carries class `v` (a month name).
pub fn dodecahedron() -> Polyhedron {
    let ico = icosahedron();
    let points: Vec<Vector3<f64>> = (0..ico.face_count()).map(|f| ico.face_center(f)).collect();
    let sets: Vec<Vec<usize>> = (0..ico.point_count())
        .map(|v| {
            (0..ico.face_count())
                .filter(|&f| ico.faces[f].points.contains(&v))
                .collect()
        })
        .collect();
    let mut poly = convex_from_vertex_sets("Dodecahedron", points, sets);
    for (f, month) in MONTHS.iter().enumerate() {
        let class = poly.add_set(*month);
        if let Some(face) = poly.faces.get_mut(f) {
            face.class = Some(class);
        }
    }
    poly
}

/// Right prism over a regular `n`-gon (`n >= 3`) of circumradius `radius`.
///
/// Faces: bottom (outward -z), top (outward +z), then sides `i = 0..n` joining
/// bottom edge `(i, i+1)` to the top ring.
pub fn prism(n: usize, radius: f64, height: f64) -> Polyhedron {
    let n = n.max(3);
    let ring: Vec<(f64, f64)> = (0..n)
        .map(|k| {
            let th = 2.0 * std::f64::consts::PI * (k as f64) / (n as f64);
            (radius * th.cos(), radius * th.sin())
        })
        .collect();
    let mut poly = prism_over(&ring, height);
    poly.name = Some(format!("Prism {n}"));
    poly
}

/// Prism over a simple counter-clockwise polygon given as `(x, y)` pairs.
pub(crate) fn prism_over(ring: &[(f64, f64)], height: f64) -> Polyhedron {
    let n = ring.len();
    let mut poly = Polyhedron::with_name("Prism");
    for z in [0.0, height] {
        for &(x, y) in ring {
            poly.add_point(Vector3::new(x, y, z));
        }
    }
    let bottom: Vec<usize> = (0..n).rev().collect();
    let top: Vec<usize> = (n..2 * n).collect();
    let mut faces = vec![bottom, top];
    for i in 0..n {
        let j = (i + 1) % n;
        faces.push(vec![i, j, n + j, n + i]);
    }
    for f in faces {
        if let Err(e) = poly.add_face(&f) {
            tracing::error!(%e, "prism produced an invalid face");
        }
    }
    poly
}

#[cfg(test)]
mod tests {
    use super::*;

    fn euler(p: &Polyhedron) -> i64 {
        let e = p.adjacency().edges.len() as i64;
        p.point_count() as i64 - e + p.face_count() as i64
    }

    #[test]
    fn platonic_counts() {
        let cases = [
            (tetrahedron(), 4, 4, 6),
            (cube(1.0), 8, 6, 12),
            (octahedron(), 6, 8, 12),
            (icosahedron(), 12, 20, 30),
            (dodecahedron(), 20, 12, 30),
        ];
        for (p, v, f, e) in cases {
            assert_eq!(p.point_count(), v);
            assert_eq!(p.face_count(), f);
            assert_eq!(p.adjacency().edges.len(), e);
            assert_eq!(euler(&p), 2);
            assert!(p.validate().is_empty(), "{:?}", p.name);
        }
    }

    #[test]
    fn faces_wind_outward() {
        for p in [tetrahedron(), cube(3.0), octahedron(), icosahedron(), dodecahedron()] {
            for f in 0..p.face_count() {
                let n = p.face_normal(f).unwrap();
                assert!(n.dot(&p.face_center(f)) > 0.0);
            }
        }
    }

    #[test]
    fn dodecahedron_classes_are_months() {
        let d = dodecahedron();
        assert_eq!(d.sets.len(), 12);
        assert_eq!(d.sets[0], "January");
        for (f, face) in d.faces.iter().enumerate() {
            assert_eq!(face.class, Some(f));
            assert_eq!(face.len(), 5);
        }
    }

    #[test]
    fn prism_is_closed_and_outward() {
        let p = prism(7, 1.5, 2.0);
        assert_eq!(p.point_count(), 14);
        assert_eq!(p.face_count(), 9);
        assert_eq!(euler(&p), 2);
        assert!(p.validate().is_empty());
        let c = p.centroid();
        for f in 0..p.face_count() {
            let n = p.face_normal(f).unwrap();
            assert!(n.dot(&(p.face_center(f) - c)) > 0.0);
        }
    }

    #[test]
    fn cuboid_names() {
        assert_eq!(cube(2.0).name.as_deref(), Some("Cube"));
        assert_eq!(cuboid(1.0, 2.0, 3.0).name.as_deref(), Some("Cuboid"));
    }
}
