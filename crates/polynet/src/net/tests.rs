use super::grammar::*;
use super::*;
use crate::geom2::{Affine2, BBox2};
use crate::PolyError;
use nalgebra::vector;
use std::io;
use std::sync::{Arc, Mutex};

/// Log sink for asserting on emitted events.
#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Captured {
    fn run<R>(&self, f: impl FnOnce() -> R) -> R {
        let sink = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || sink.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, f)
    }

    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

/// Two unit squares side by side: points 0..6, faces [0 1 4 3] and [1 2 5 4].
fn two_squares() -> NetGraph {
    let mut net = NetGraph::new();
    for y in [0.0, 1.0] {
        for x in [0.0, 1.0, 2.0] {
            net.add_point(vector![x, y], None);
        }
    }
    net.add_face(NetFace::new(vec![0, 1, 4, 3])).unwrap();
    net.add_face(NetFace::new(vec![1, 2, 5, 4])).unwrap();
    net.add_line(NetLine::segment(1, 4, LineKind::Fold, None)).unwrap();
    net.add_line(NetLine {
        points: vec![0, 1, 2, 5, 4, 3],
        closed: true,
        kind: LineKind::Cut,
        style: None,
        edge: None,
    })
    .unwrap();
    net
}

#[test]
fn line_spec_closing_rule() {
    let open = parse_line_spec("0 1 2", 5).unwrap();
    assert_eq!(open.points, vec![0, 1, 2]);
    assert!(!open.closed);
    let closed = parse_line_spec("0 1 2 0", 5).unwrap();
    assert_eq!(closed.points, vec![0, 1, 2]);
    assert!(closed.closed);
    assert_eq!(format_line_spec(&closed.points, true), "0 1 2 0");
    assert!(parse_line_spec("3", 5).is_err());
}

#[test]
fn face_spec_is_always_closed() {
    let f = parse_face_spec("4 5 6", Some("4 6"), 7).unwrap();
    assert_eq!(f.points, vec![4, 5, 6]);
    assert_eq!(f.align, Some(Align { origin: 4, x: 6 }));
    // trailing repeat of the first index is dropped
    let g = parse_face_spec("4 5 6 4", None, 7).unwrap();
    assert_eq!(g.points, vec![4, 5, 6]);
    assert!(parse_face_spec("4 5", None, 7).is_err());
    assert!(parse_face_spec("4 5 6", Some("4"), 7).is_err());
}

#[test]
fn malformed_lists_are_rejected() {
    match parse_index_list("a b c", 10) {
        Err(PolyError::MalformedIndexList { text, reason }) => {
            assert_eq!(text, "a b c");
            assert!(reason.contains("a"));
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(matches!(
        parse_index_list("1 2 10", 10),
        Err(PolyError::MalformedIndexList { .. })
    ));
    assert!(matches!(
        parse_index_list("1 -2", 10),
        Err(PolyError::MalformedIndexList { .. })
    ));
    assert_eq!(parse_index_list("  ", 10).unwrap(), Vec::<usize>::new());
}

#[test]
fn add_checks_indices() {
    let mut net = two_squares();
    assert!(net.add_line(NetLine::segment(0, 9, LineKind::User, None)).is_err());
    assert!(net.add_face(NetFace::new(vec![0, 1])).is_err());
    let mut styled = NetLine::segment(0, 3, LineKind::User, None);
    styled.style = Some(LineStyle::Shared(0));
    assert!(net.add_line(styled.clone()).is_err());
    net.add_style(StrokeStyle::default());
    let l = net.add_line(styled).unwrap();
    assert_eq!(net.line_style(l), Some(&StrokeStyle::default()));
    let c = net.counts();
    assert_eq!((c.points, c.faces, c.folds, c.cuts, c.user_lines), (6, 2, 1, 1, 1));
}

#[test]
fn fit_to_rect_fills_limiting_axis_and_centers() {
    let mut net = two_squares();
    let rect = BBox2::new(vector![10.0, 10.0], vector![20.0, 30.0]);
    let s = net.fit_to_rect(&rect, 1.0).unwrap();
    // target 8 x 18, net 2 x 1 -> limited by width
    assert!((s - 4.0).abs() < 1e-12);
    let bb = net.find_bbox().unwrap();
    assert!((bb.width() - 8.0).abs() < 1e-12);
    assert!((bb.height() - 4.0).abs() < 1e-12);
    assert!((bb.center() - rect.center()).norm() < 1e-12);
    assert!(bb.within(&rect.inset(1.0).unwrap(), 1e-12));
    // distances scale uniformly
    let d = (net.placed(0) - net.placed(5)).norm();
    assert!((d - 4.0 * 5f64.sqrt()).abs() < 1e-12);
}

#[test]
fn fit_ignores_margin_that_does_not_fit() {
    let mut net = two_squares();
    let rect = BBox2::from_size(4.0, 2.0);
    let logs = Captured::default();
    let s = logs.run(|| net.fit_to_rect(&rect, 5.0)).unwrap();
    assert!((s - 2.0).abs() < 1e-12);
    assert!(logs.text().contains("margin does not fit"), "{}", logs.text());
    let bb = net.find_bbox().unwrap();
    assert!((bb.min - rect.min).norm() < 1e-12);
    assert!((bb.max - rect.max).norm() < 1e-12);
    assert!(NetGraph::new().fit_to_rect(&rect, 0.0).is_none());

    let quiet = Captured::default();
    let mut again = two_squares();
    quiet.run(|| again.fit_to_rect(&rect, 0.5)).unwrap();
    assert!(!quiet.text().contains("margin"), "{}", quiet.text());
}

#[test]
fn apply_transform_bakes_and_resets() {
    let mut net = two_squares();
    net.transform = Affine2::rotation(0.7).compose(&Affine2::translation(vector![3.0, -1.0]));
    let before: Vec<_> = (0..net.points.len()).map(|i| net.placed(i)).collect();
    net.apply_transform(None);
    assert!(net.transform.is_identity(0.0));
    for (i, p) in before.iter().enumerate() {
        assert!((net.placed(i) - p).norm() < 1e-12);
    }
    assert!(net.faces.iter().all(|f| !f.flipped));
    let mirror = Affine2::reflection_across(vector![0.0, 0.0], vector![1.0, 0.0]).unwrap();
    net.apply_transform(Some(&mirror));
    assert!(net.faces.iter().all(|f| f.flipped));
}

#[test]
fn center_moves_bbox_to_origin() {
    let mut net = two_squares();
    net.center();
    let bb = net.find_bbox().unwrap();
    assert!(bb.center().norm() < 1e-12);
}

#[test]
fn face_at_finds_containing_face() {
    let mut net = two_squares();
    assert_eq!(net.face_at(vector![0.5, 0.5]), Some(0));
    assert_eq!(net.face_at(vector![1.5, 0.5]), Some(1));
    assert_eq!(net.face_at(vector![3.0, 0.5]), None);
    net.transform = Affine2::translation(vector![10.0, 0.0]);
    assert_eq!(net.face_at(vector![11.5, 0.5]), Some(1));
}

#[test]
fn face_frame_uses_align_hint() {
    let mut net = two_squares();
    let f0 = net.face_frame(0).unwrap();
    assert!((f0.apply(vector![1.0, 0.0]) - vector![1.0, 0.0]).norm() < 1e-12);
    net.faces[1].align = Some(Align { origin: 5, x: 4 });
    let f1 = net.face_frame(1).unwrap();
    assert!((f1.apply(vector![0.0, 0.0]) - vector![2.0, 1.0]).norm() < 1e-12);
    assert!((f1.apply(vector![1.0, 0.0]) - vector![1.0, 1.0]).norm() < 1e-12);
}
