use super::*;
use nalgebra::{matrix, vector, Vector2};

fn close(a: Vector2<f64>, b: Vector2<f64>) -> bool {
    (a - b).norm() < 1e-12
}

#[test]
fn rigid_from_segments_maps_endpoints() {
    let ca = vector![1.0, 1.0];
    let cb = vector![1.0, 3.0];
    let na = vector![5.0, -2.0];
    let nb = vector![7.0, -2.0];
    let r = Affine2::rigid_from_segments(ca, cb, na, nb).unwrap();
    assert!(close(r.apply(ca), na));
    assert!(close(r.apply(cb), nb));
    assert!(r.is_isometry(1e-12));
    assert!(r.is_orientation_preserving());
    // Zero-length segment -> None
    assert!(Affine2::rigid_from_segments(ca, ca, na, nb).is_none());
}

#[test]
fn reflection_fixes_line_and_flips_orientation() {
    let a = vector![0.0, 1.0];
    let b = vector![2.0, 3.0];
    let f = Affine2::reflection_across(a, b).unwrap();
    assert!(close(f.apply(a), a));
    assert!(close(f.apply(b), b));
    assert!(!f.is_orientation_preserving());
    assert!(f.is_isometry(1e-12));
    // Point left of the line lands on the right at the same distance.
    let p = vector![0.0, 3.0];
    let q = f.apply(p);
    assert!(close(q, vector![2.0, 1.0]));
    // Involution
    assert!(f.compose(&f).is_identity(1e-12));
}

#[test]
fn compose_applies_inner_first() {
    let t = Affine2::translation(vector![1.0, 0.0]);
    let r = Affine2::rotation(std::f64::consts::FRAC_PI_2);
    let rt = r.compose(&t);
    // translate then rotate: (0,0) -> (1,0) -> (0,1)
    assert!(close(rt.apply(vector![0.0, 0.0]), vector![0.0, 1.0]));
    let tr = t.compose(&r);
    // rotate then translate: (0,0) -> (0,0) -> (1,0)
    assert!(close(tr.apply(vector![0.0, 0.0]), vector![1.0, 0.0]));
    let inv = rt.inverse().unwrap();
    assert!(inv.compose(&rt).is_identity(1e-12));
}

#[test]
fn array_layout_roundtrip() {
    let a = Affine2 {
        m: matrix![1.0, 2.0; 3.0, 4.0],
        t: vector![5.0, 6.0],
    };
    let v = a.to_array();
    assert_eq!(v, [1.0, 3.0, 2.0, 4.0, 5.0, 6.0]);
    assert_eq!(Affine2::from_array(v), a);
    // x' = a x + c y + e
    let p = a.apply(vector![1.0, 1.0]);
    assert_eq!(p, vector![1.0 + 2.0 + 5.0, 3.0 + 4.0 + 6.0]);
}

#[test]
fn frame_puts_x_axis_towards_target() {
    let f = Affine2::frame(vector![1.0, 1.0], vector![1.0, 4.0]).unwrap();
    assert!(close(f.apply(vector![0.0, 0.0]), vector![1.0, 1.0]));
    assert!(close(f.apply(vector![3.0, 0.0]), vector![1.0, 4.0]));
    assert!(close(f.apply(vector![0.0, 1.0]), vector![0.0, 1.0]));
}

#[test]
fn bbox_inset_and_union() {
    let bb = BBox2::from_points([vector![0.0, 0.0], vector![4.0, 2.0], vector![1.0, -1.0]]).unwrap();
    assert_eq!(bb.min, vector![0.0, -1.0]);
    assert_eq!(bb.max, vector![4.0, 2.0]);
    assert_eq!(bb.center(), vector![2.0, 0.5]);
    let inner = bb.inset(0.5).unwrap();
    assert_eq!(inner.width(), 3.0);
    assert_eq!(inner.height(), 2.0);
    // Margin larger than half the height does not fit.
    assert!(bb.inset(1.5).is_none());
    let u = bb.union(&BBox2::from_size(10.0, 1.0));
    assert_eq!(u.max, vector![10.0, 2.0]);
    assert!(bb.within(&u, 0.0));
    assert!(BBox2::from_points(std::iter::empty()).is_none());
}

#[test]
fn polygon_area_sign_and_containment() {
    let sq = [
        vector![0.0, 0.0],
        vector![2.0, 0.0],
        vector![2.0, 2.0],
        vector![0.0, 2.0],
    ];
    assert!((polygon_area(&sq) - 4.0).abs() < 1e-12);
    let mut rev = sq;
    rev.reverse();
    assert!((polygon_area(&rev) + 4.0).abs() < 1e-12);
    assert!(point_in_polygon(vector![1.0, 1.0], &sq));
    assert!(!point_in_polygon(vector![3.0, 1.0], &sq));
}
