//! File-level conversions between OFF, OBJ, and the native format.

use polynet::format::{read_net, read_polyhedron, write_net, write_polyhedron, Format, WriteMode};
use polynet::poly3::Polyhedron;
use polynet::shapes;
use polynet::unwrap::{unwrap, UnwrapCfg};
use polynet::PolyError;

fn sorted_areas(poly: &Polyhedron) -> Vec<f64> {
    let mut a: Vec<f64> = (0..poly.face_count()).map(|f| poly.face_area(f)).collect();
    a.sort_by(f64::total_cmp);
    a
}

#[test]
fn convert_through_every_format() {
    let dir = tempfile::tempdir().unwrap();
    let src = shapes::dodecahedron();
    let mut current = src.clone();
    // off -> obj -> idat -> off, re-reading each time.
    for (i, fmt) in [Format::Off, Format::Obj, Format::Idat, Format::Off]
        .into_iter()
        .enumerate()
    {
        let path = dir.path().join(format!("step{i}.{}", fmt.extension()));
        assert_eq!(
            write_polyhedron(&current, &path, None, WriteMode::Create).unwrap(),
            fmt
        );
        let imported = read_polyhedron(&path, None).unwrap();
        assert!(imported.log.is_empty(), "{fmt}: {:?}", imported.log);
        current = imported.value;
        assert_eq!(current.point_count(), src.point_count());
        assert_eq!(current.face_count(), src.face_count());
    }
    let (a, b) = (sorted_areas(&src), sorted_areas(&current));
    for (x, y) in a.iter().zip(&b) {
        assert!((x - y).abs() < 1e-12 * x.max(1.0));
    }
}

#[test]
fn format_override_beats_sniffing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cube.dat");
    write_polyhedron(&shapes::cube(1.0), &path, Some(Format::Obj), WriteMode::Create).unwrap();
    assert!(std::fs::read_to_string(&path).unwrap().contains("\nv "));
    // Reading OBJ text as OFF fails on the header.
    assert!(matches!(
        read_polyhedron(&path, Some(Format::Off)),
        Err(PolyError::UnknownFormat { .. })
    ));
    assert_eq!(read_polyhedron(&path, None).unwrap().value.face_count(), 6);
}

#[test]
fn unwrapped_net_survives_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dodeca.idat");
    let (mut net, _) = unwrap(&shapes::dodecahedron(), &UnwrapCfg::default()).unwrap();
    net.fit_to_rect(&polynet::geom2::BBox2::from_size(210.0, 297.0), 10.0);
    net.apply_transform(None);
    write_net(&net, &path, WriteMode::Create).unwrap();
    let back = read_net(&path).unwrap();
    assert!(back.log.is_empty());
    assert_eq!(back.value, net);
    let c = back.value.counts();
    assert_eq!((c.faces, c.folds, c.cuts), (12, 11, 19));
    let classes: Vec<_> = back.value.faces.iter().filter_map(|f| f.class).collect();
    assert_eq!(classes.len(), 12);
}

#[test]
fn failed_write_leaves_nothing_behind() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.off");
    assert!(matches!(
        write_polyhedron(&Polyhedron::new(), &path, None, WriteMode::Create),
        Err(PolyError::EmptyInput { .. })
    ));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
