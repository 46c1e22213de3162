use super::*;
use crate::geom2::polygon_area;
use crate::shapes;
use nalgebra::vector;

fn square_points(poly: &mut Polyhedron) {
    poly.add_point(vector![0.0, 0.0, 0.0]);
    poly.add_point(vector![1.0, 0.0, 0.0]);
    poly.add_point(vector![1.0, 1.0, 0.0]);
    poly.add_point(vector![0.0, 1.0, 0.0]);
}

#[test]
fn add_face_normalizes_and_rejects() {
    let mut p = Polyhedron::new();
    square_points(&mut p);
    let f = p.add_face(&[0, 1, 1, 2, 0]).unwrap();
    assert_eq!(p.faces[f].points, vec![0, 1, 2]);
    assert!(matches!(
        p.add_face(&[0, 1, 0]),
        Err(crate::PolyError::InvalidFace { .. })
    ));
    assert!(matches!(
        p.add_face(&[0, 1, 9]),
        Err(crate::PolyError::InvalidFace { .. })
    ));
    assert_eq!(p.face_count(), 1);
}

#[test]
fn cube_adjacency_is_closed_manifold() {
    let cube = shapes::cube(2.0);
    let adj = cube.adjacency();
    assert_eq!(adj.edges.len(), 12);
    assert_eq!(adj.interior_edge_count(), 12);
    assert_eq!(adj.boundary_edge_count(), 0);
    assert!(adj.check_manifold().is_ok());
    for f in 0..6 {
        assert_eq!(adj.neighbors(f).len(), 4);
        let ns: Vec<_> = adj.neighbors(f).iter().map(|l| l.face).collect();
        let mut sorted = ns.clone();
        sorted.sort_unstable();
        assert_eq!(ns, sorted, "neighbors are sorted by face index");
    }
    assert_eq!(adj.components(), vec![(0..6).collect::<Vec<_>>()]);
    assert!(cube.validate().is_empty());
    assert!(cube.is_consistently_wound());
}

#[test]
fn side_links_point_at_the_shared_edge() {
    let cube = shapes::cube(1.0);
    let adj = cube.adjacency();
    for (f, links) in adj.dual.iter().enumerate() {
        for l in links {
            let (a, b) = cube.faces[f].side(l.side);
            let (c, d) = cube.faces[l.face].side(l.other_side);
            assert_eq!(EdgeKey::new(a, b), EdgeKey::new(c, d));
            assert_eq!(adj.face_edges[f][l.side], l.edge);
        }
    }
}

#[test]
fn triangle_has_only_boundary_edges() {
    let mut p = Polyhedron::new();
    square_points(&mut p);
    p.add_face(&[0, 1, 2]).unwrap();
    let adj = p.adjacency();
    assert_eq!(adj.boundary_edge_count(), 3);
    assert!(adj.neighbors(0).is_empty());
    assert!(p.validate().is_empty());
}

#[test]
fn non_manifold_edge_links_nothing() {
    let mut p = Polyhedron::new();
    p.add_point(vector![0.0, 0.0, 0.0]);
    p.add_point(vector![1.0, 0.0, 0.0]);
    p.add_point(vector![0.5, 1.0, 0.0]);
    p.add_point(vector![0.5, -1.0, 0.0]);
    p.add_point(vector![0.5, 0.0, 1.0]);
    p.add_face(&[0, 1, 2]).unwrap();
    p.add_face(&[1, 0, 3]).unwrap();
    p.add_face(&[0, 1, 4]).unwrap();
    let adj = p.adjacency();
    assert_eq!(adj.non_manifold_edges().count(), 1);
    assert!(matches!(
        adj.check_manifold(),
        Err(crate::PolyError::NonManifold { edges: 1 })
    ));
    assert!(adj.dual.iter().all(|l| l.is_empty()));
    let log = p.validate();
    assert_eq!(log.count("non_manifold"), 1);
    assert_eq!(log.count("disconnected_component"), 2);
}

#[test]
fn flipped_face_reports_winding_mismatches() {
    let mut cube = shapes::cube(1.0);
    cube.flip_face(3);
    let log = cube.validate();
    assert_eq!(log.count("inconsistent_winding"), 4);
    assert!(!cube.is_consistently_wound());
}

#[test]
fn validate_reports_duplicate_degenerate_and_non_planar() {
    let mut p = Polyhedron::new();
    square_points(&mut p);
    p.add_point(vector![2.0, 0.0, 0.0]);
    p.add_point(vector![1.0, 1.0, 0.3]);
    p.add_face(&[0, 1, 2]).unwrap();
    p.add_face(&[1, 2, 0]).unwrap();
    p.add_face(&[0, 1, 4]).unwrap(); // collinear
    p.add_face(&[0, 1, 5, 3]).unwrap(); // lifted corner
    let log = p.validate();
    assert_eq!(log.count("duplicate_face"), 1);
    assert_eq!(log.count("degenerate_face"), 1);
    assert_eq!(log.count("non_planar_face"), 1);
}

#[test]
fn charts_preserve_lengths_and_wind_ccw() {
    let solid = shapes::dodecahedron();
    for f in 0..solid.face_count() {
        let chart = solid.face_chart(f).unwrap();
        assert_eq!(chart.points[0], vector![0.0, 0.0]);
        assert!(chart.points[1].y.abs() < 1e-12);
        assert!(polygon_area(&chart.points) > 0.0);
        let face = &solid.faces[f];
        let n = face.len();
        for i in 0..n {
            let d2 = (chart.points[(i + 1) % n] - chart.points[i]).norm();
            let (a, b) = face.side(i);
            assert!((d2 - solid.edge_length(a, b)).abs() < 1e-12);
        }
    }
}

#[test]
fn collinear_face_has_no_chart() {
    let mut p = Polyhedron::new();
    p.add_point(vector![0.0, 0.0, 0.0]);
    p.add_point(vector![1.0, 0.0, 0.0]);
    p.add_point(vector![2.0, 0.0, 0.0]);
    p.add_face(&[0, 1, 2]).unwrap();
    assert!(matches!(p.face_chart(0), Err(ChartError::ZeroArea(_))));
}

#[test]
fn collapse_merges_and_drops() {
    let mut p = Polyhedron::new();
    square_points(&mut p);
    p.add_point(vector![1e-9, 0.0, 0.0]); // coincides with 0
    p.add_face(&[0, 1, 2]).unwrap();
    p.add_face(&[4, 2, 3]).unwrap();
    p.add_face(&[0, 4, 1]).unwrap(); // collapses to 2 points
    let rep = p.collapse_vertices(1e-6);
    assert_eq!(rep.merged_points, 1);
    assert_eq!(rep.dropped_faces, vec![2]);
    assert_eq!(p.point_count(), 4);
    assert_eq!(p.faces[1].points, vec![0, 2, 3]);
    assert_eq!(p.face_count(), 2);
}

#[test]
fn face_measures() {
    let cube = shapes::cube(2.0);
    for f in 0..6 {
        assert!((cube.face_area(f) - 4.0).abs() < 1e-12);
        let n = cube.face_normal(f).unwrap();
        let c = cube.face_center(f);
        // outward: normal points the same way as the face center
        assert!(n.dot(&c) > 0.0);
    }
}
