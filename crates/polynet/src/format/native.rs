//! Native indented-attribute format (`idat`).
//!
//! Polyhedron file:
//! ```text
//! #Polyp
//! name Cube
//! vertices \
//!   -1 -1 -1
//!   ...
//! face 0 2 3 1
//!   class 0
//! set front
//!   faces 0 4
//! ```
//!
//! Net file:
//! ```text
//! #Polynet
//! name Cube net
//! source Cube
//! transform 1 0 0 1 0 0
//! style
//!   width 0.5
//!   color 255 0 0 255
//!   dash 2 1
//! points \
//!   0 0 to 0
//!   1 0 to 1
//! line 0 1
//!   kind fold
//!   edge 0 1
//!   style 0
//! face 0 1 2 3
//!   original 0
//!   matrix 1 0 0 1 0 0
//!   hinge 0 1 3
//!   back
//!   align 0 1
//! ```
//!
//! Indices in `face`, `line`, and `faces` refer to entries in file order.
//! `edge` lines in polyhedron files are derived data and skipped.

use std::fmt::Write as _;

use nalgebra::{Vector2, Vector3};

use super::attr::{first_line, parse_attrs, Attr};
use super::off::push_face;
use super::Imported;
use crate::error::{Anomaly, AnomalyLog, PolyError, PolyResult};
use crate::geom2::Affine2;
use crate::net::grammar::{
    format_index_list, format_line_spec, parse_align, parse_face_spec, parse_index_list,
    parse_line_spec,
};
use crate::net::{Hinge, LineKind, LineStyle, NetFace, NetGraph, NetLine, StrokeStyle};
use crate::poly3::{EdgeKey, Polyhedron};

pub const POLY_HEADER: &str = "#Polyp";
pub const NET_HEADER: &str = "#Polynet";

fn check_header(text: &str, header: &str) -> PolyResult<()> {
    match first_line(text) {
        Some(l) if l.split_whitespace().next() == Some(header) => Ok(()),
        Some(l) => Err(PolyError::UnknownFormat {
            name: l.to_string(),
        }),
        None => Err(PolyError::EmptyInput { what: "points" }),
    }
}

fn parse_floats<const N: usize>(text: &str) -> Option<[f64; N]> {
    let mut out = [0.0; N];
    let mut toks = text.split_whitespace();
    for v in &mut out {
        *v = toks.next()?.parse().ok().filter(|x: &f64| x.is_finite())?;
    }
    toks.next().is_none().then_some(out)
}

fn parse_usize(a: &Attr) -> Option<usize> {
    a.value.trim().parse().ok()
}

fn bad_value(a: &Attr, reason: &str) -> Anomaly {
    Anomaly::MalformedIndexList {
        line: Some(a.line),
        text: format!("{} {}", a.name, a.value),
        reason: reason.to_string(),
    }
}

fn ignored(a: &Attr) -> Anomaly {
    let text = if a.value.is_empty() {
        a.name.clone()
    } else {
        format!("{} {}", a.name, a.value)
    };
    Anomaly::IgnoredDirective { line: a.line, text }
}

/// Map file slots to model indices; Err names the first bad slot.
fn map_slots(slots: &[Option<usize>], idx: &[usize]) -> Result<Vec<usize>, String> {
    idx.iter()
        .map(|&i| match slots.get(i) {
            Some(Some(p)) => Ok(*p),
            Some(None) => Err(format!("references malformed entry {i}")),
            None => Err(format!("index {i} out of range ({} entries)", slots.len())),
        })
        .collect()
}

// ---------- polyhedron ----------

pub(crate) fn parse_polyhedron(text: &str) -> PolyResult<Imported<Polyhedron>> {
    check_header(text, POLY_HEADER)?;
    let attrs = parse_attrs(text);
    let mut log = AnomalyLog::new();
    let mut poly = Polyhedron::new();

    // Pass 1: vertices.
    let mut slots: Vec<Option<usize>> = Vec::new();
    for a in attrs.iter().filter(|a| a.name == "vertices") {
        for (ln, l) in &a.block {
            match parse_floats::<3>(l) {
                Some([x, y, z]) => slots.push(Some(poly.add_point(Vector3::new(x, y, z)))),
                None => {
                    log.push(Anomaly::MalformedPoint {
                        line: Some(*ln),
                        text: l.clone(),
                    });
                    slots.push(None);
                }
            }
        }
    }

    // Pass 2: everything else. `face_slots` maps file face order to model faces.
    let mut face_slots: Vec<Option<usize>> = Vec::new();
    let mut sets: Vec<&Attr> = Vec::new();
    for a in &attrs {
        match a.name.as_str() {
            "name" => poly.name = Some(a.value.clone()).filter(|n| !n.is_empty()),
            "vertices" | "edge" | "plane" => {}
            "face" => {
                let f = match parse_face_spec(&a.value, None, usize::MAX) {
                    Ok(spec) => push_face(&mut poly, &slots, &spec.points, a.line, &mut log),
                    Err(e) => {
                        log.push(Anomaly::MalformedIndexList {
                            line: Some(a.line),
                            text: a.value.clone(),
                            reason: e.to_string(),
                        });
                        None
                    }
                };
                for c in &a.children {
                    match (c.name.as_str(), f) {
                        ("class", Some(f)) => match parse_usize(c) {
                            Some(class) => poly.faces[f].class = Some(class),
                            None => log.push(bad_value(c, "expected a class id")),
                        },
                        ("class", None) => {}
                        _ => log.push(ignored(c)),
                    }
                }
                face_slots.push(f);
            }
            "set" => sets.push(a),
            _ => log.push(ignored(a)),
        }
    }
    for s in sets {
        let id = poly.add_set(s.value.clone());
        for c in &s.children {
            if c.name != "faces" {
                log.push(ignored(c));
                continue;
            }
            let faces = parse_index_list(&c.value, usize::MAX)
                .map_err(|e| e.to_string())
                .and_then(|idx| map_slots(&face_slots, &idx));
            match faces {
                Ok(faces) => {
                    for f in faces {
                        poly.faces[f].class = Some(id);
                    }
                }
                Err(reason) => log.push(bad_value(c, &reason)),
            }
        }
    }

    if poly.points.is_empty() {
        return Err(PolyError::EmptyInput { what: "points" });
    }
    if poly.faces.is_empty() {
        return Err(PolyError::EmptyInput { what: "faces" });
    }
    Ok(Imported { value: poly, log })
}

pub(crate) fn render_polyhedron(poly: &Polyhedron) -> PolyResult<String> {
    super::check_renderable(poly)?;
    let mut s = String::new();
    let _ = writeln!(s, "{POLY_HEADER}");
    if let Some(name) = &poly.name {
        let _ = writeln!(s, "name {name}");
    }
    s.push_str("vertices \\\n");
    for p in &poly.points {
        let _ = writeln!(s, "  {} {} {}", p.x, p.y, p.z);
    }
    for f in &poly.faces {
        let _ = writeln!(s, "face {}", format_index_list(&f.points));
        // Classes naming a set are written under the set instead.
        if let Some(c) = f.class.filter(|&c| c >= poly.sets.len()) {
            let _ = writeln!(s, "  class {c}");
        }
    }
    for (id, name) in poly.sets.iter().enumerate() {
        let _ = writeln!(s, "set {name}");
        let members: Vec<usize> = (0..poly.faces.len())
            .filter(|&f| poly.faces[f].class == Some(id))
            .collect();
        if !members.is_empty() {
            let _ = writeln!(s, "  faces {}", format_index_list(&members));
        }
    }
    Ok(s)
}

// ---------- net ----------

fn parse_stroke(a: &Attr, log: &mut AnomalyLog) -> StrokeStyle {
    let mut style = StrokeStyle::default();
    for c in &a.children {
        match c.name.as_str() {
            "width" => match parse_floats::<1>(&c.value) {
                Some([w]) if w >= 0.0 => style.width = w,
                _ => log.push(bad_value(c, "expected a non-negative width")),
            },
            "color" => {
                let rgba: Option<Vec<u8>> =
                    c.value.split_whitespace().map(|t| t.parse().ok()).collect();
                match rgba.as_deref() {
                    Some(&[r, g, b]) => style.color = [r, g, b, 255],
                    Some(&[r, g, b, al]) => style.color = [r, g, b, al],
                    _ => log.push(bad_value(c, "expected r g b [a] in 0..=255")),
                }
            }
            "dash" => {
                let dashes: Option<Vec<f64>> =
                    c.value.split_whitespace().map(|t| t.parse().ok()).collect();
                match dashes {
                    Some(d) if d.iter().all(|x| x.is_finite() && *x >= 0.0) => style.dashes = d,
                    _ => log.push(bad_value(c, "expected non-negative dash lengths")),
                }
            }
            _ => log.push(ignored(c)),
        }
    }
    style
}

fn write_stroke(s: &mut String, indent: &str, style: &StrokeStyle) {
    let [r, g, b, a] = style.color;
    let _ = writeln!(s, "{indent}width {}", style.width);
    let _ = writeln!(s, "{indent}color {r} {g} {b} {a}");
    if !style.dashes.is_empty() {
        let d: Vec<String> = style.dashes.iter().map(|x| x.to_string()).collect();
        let _ = writeln!(s, "{indent}dash {}", d.join(" "));
    }
}

fn write_affine(s: &mut String, key: &str, t: &Affine2) {
    let v = t.to_array();
    let _ = writeln!(s, "{key} {} {} {} {} {} {}", v[0], v[1], v[2], v[3], v[4], v[5]);
}

fn parse_line(
    net: &mut NetGraph,
    a: &Attr,
    slots: &[Option<usize>],
    kind: LineKind,
    closed: bool,
    log: &mut AnomalyLog,
) {
    let malformed = |reason: String| Anomaly::MalformedIndexList {
        line: Some(a.line),
        text: a.value.clone(),
        reason,
    };
    let spec = parse_line_spec(&a.value, usize::MAX).map_err(|e| e.to_string());
    let points = spec.and_then(|sp| Ok((map_slots(slots, &sp.points)?, sp.closed)));
    let (points, spec_closed) = match points {
        Ok(p) => p,
        Err(reason) => return log.push(malformed(reason)),
    };
    let mut line = NetLine {
        points,
        closed: closed || spec_closed,
        kind,
        style: None,
        edge: None,
    };
    for c in &a.children {
        match c.name.as_str() {
            "kind" => match LineKind::from_name(c.value.trim()) {
                Some(k) => line.kind = k,
                None => log.push(bad_value(c, "expected fold, cut, or user")),
            },
            "edge" => match parse_index_list(&c.value, usize::MAX).as_deref() {
                Ok(&[p, q]) if p != q => line.edge = Some(EdgeKey::new(p, q)),
                _ => log.push(bad_value(c, "expected two distinct vertex indices")),
            },
            "style" if c.value.is_empty() => {
                line.style = Some(LineStyle::Local(parse_stroke(c, log)));
            }
            "style" => match parse_usize(c) {
                Some(i) => line.style = Some(LineStyle::Shared(i)),
                None => log.push(bad_value(c, "expected a style index")),
            },
            _ => log.push(ignored(c)),
        }
    }
    if let Err(e) = net.add_line(line) {
        log.push(malformed(e.to_string()));
    }
}

fn parse_face(net: &mut NetGraph, a: &Attr, slots: &[Option<usize>], log: &mut AnomalyLog) {
    let malformed = |text: &str, reason: String| Anomaly::MalformedIndexList {
        line: Some(a.line),
        text: text.to_string(),
        reason,
    };
    let spec = parse_face_spec(&a.value, None, usize::MAX).map_err(|e| e.to_string());
    let points = match spec.and_then(|sp| map_slots(slots, &sp.points)) {
        Ok(p) => p,
        Err(reason) => return log.push(malformed(&a.value, reason)),
    };
    let mut face = NetFace::new(points);
    let mut basis = None;
    for c in &a.children {
        match c.name.as_str() {
            "original" => match parse_usize(c) {
                Some(o) => face.original = Some(o),
                None => log.push(bad_value(c, "expected a face index")),
            },
            "class" => match parse_usize(c) {
                Some(k) => face.class = Some(k),
                None => log.push(bad_value(c, "expected a class id")),
            },
            "matrix" => match parse_floats::<6>(&c.value) {
                Some(v) => basis = Some(Affine2::from_array(v)),
                None => log.push(bad_value(c, "expected six numbers")),
            },
            "hinge" => match parse_index_list(&c.value, usize::MAX).as_deref() {
                Ok(&[parent, side, parent_side]) => {
                    face.hinge = Some(Hinge {
                        parent,
                        side,
                        parent_side,
                    })
                }
                _ => log.push(bad_value(c, "expected parent side parent_side")),
            },
            "back" => face.flipped = true,
            "align" => {
                let align = parse_align(&c.value, usize::MAX)
                    .map_err(|e| e.to_string())
                    .and_then(|al| {
                        let m = map_slots(slots, &[al.origin, al.x])?;
                        Ok(crate::net::Align {
                            origin: m[0],
                            x: m[1],
                        })
                    });
                match align {
                    Ok(al) => face.align = Some(al),
                    Err(reason) => log.push(malformed(&c.value, reason)),
                }
            }
            _ => log.push(ignored(c)),
        }
    }
    match net.add_face(face) {
        Ok(f) => match basis {
            Some(b) => net.faces[f].basis = b,
            None => {
                if let Some(frame) = net.face_frame(f) {
                    net.faces[f].basis = frame;
                }
            }
        },
        Err(e) => log.push(malformed(&a.value, e.to_string())),
    }
}

pub(crate) fn parse_net(text: &str) -> PolyResult<Imported<NetGraph>> {
    check_header(text, NET_HEADER)?;
    let attrs = parse_attrs(text);
    let mut log = AnomalyLog::new();
    let mut net = NetGraph::new();

    // Pass 1: points and shared styles.
    let mut slots: Vec<Option<usize>> = Vec::new();
    for a in &attrs {
        match a.name.as_str() {
            "points" => {
                for (ln, l) in &a.block {
                    let (xy, to) = match l.split_once(" to ") {
                        Some((xy, to)) => (xy, Some(to.trim())),
                        None => (l.as_str(), None),
                    };
                    let source = match to.map(str::parse::<usize>) {
                        None => Some(None),
                        Some(Ok(v)) => Some(Some(v)),
                        Some(Err(_)) => None,
                    };
                    match (parse_floats::<2>(xy), source) {
                        (Some([x, y]), Some(source)) => {
                            slots.push(Some(net.add_point(Vector2::new(x, y), source)))
                        }
                        _ => {
                            log.push(Anomaly::MalformedPoint {
                                line: Some(*ln),
                                text: l.clone(),
                            });
                            slots.push(None);
                        }
                    }
                }
            }
            "style" => {
                let style = parse_stroke(a, &mut log);
                net.add_style(style);
            }
            _ => {}
        }
    }

    // Pass 2: header fields, lines, and faces.
    for a in &attrs {
        match a.name.as_str() {
            "points" | "style" => {}
            "name" => net.name = Some(a.value.clone()).filter(|n| !n.is_empty()),
            "source" => net.source = Some(a.value.clone()).filter(|n| !n.is_empty()),
            "transform" | "matrix" => match parse_floats::<6>(&a.value) {
                Some(v) => net.transform = Affine2::from_array(v),
                None => log.push(bad_value(a, "expected six numbers")),
            },
            "line" => parse_line(&mut net, a, &slots, LineKind::User, false, &mut log),
            "outline" => parse_line(&mut net, a, &slots, LineKind::Cut, true, &mut log),
            "face" => parse_face(&mut net, a, &slots, &mut log),
            _ => log.push(ignored(a)),
        }
    }

    if net.points.is_empty() {
        return Err(PolyError::EmptyInput { what: "points" });
    }
    Ok(Imported { value: net, log })
}

/// Render a net in the native `#Polynet` syntax. Local coordinates and
/// `transform` are written as stored.
pub fn render_net(net: &NetGraph) -> String {
    let mut s = String::new();
    let _ = writeln!(s, "{NET_HEADER}");
    if let Some(name) = &net.name {
        let _ = writeln!(s, "name {name}");
    }
    if let Some(source) = &net.source {
        let _ = writeln!(s, "source {source}");
    }
    if !net.transform.is_identity(0.0) {
        write_affine(&mut s, "transform", &net.transform);
    }
    for style in &net.styles {
        s.push_str("style\n");
        write_stroke(&mut s, "  ", style);
    }
    if !net.points.is_empty() {
        s.push_str("points \\\n");
        for p in &net.points {
            let _ = write!(s, "  {} {}", p.pos.x, p.pos.y);
            if let Some(src) = p.source {
                let _ = write!(s, " to {src}");
            }
            s.push('\n');
        }
    }
    for l in &net.lines {
        let _ = writeln!(s, "line {}", format_line_spec(&l.points, l.closed));
        if l.kind != LineKind::User {
            let _ = writeln!(s, "  kind {}", l.kind.as_str());
        }
        if let Some(e) = l.edge {
            let _ = writeln!(s, "  edge {} {}", e.0, e.1);
        }
        match &l.style {
            Some(LineStyle::Shared(i)) => {
                let _ = writeln!(s, "  style {i}");
            }
            Some(LineStyle::Local(st)) => {
                s.push_str("  style\n");
                write_stroke(&mut s, "    ", st);
            }
            None => {}
        }
    }
    for f in &net.faces {
        let _ = writeln!(s, "face {}", format_index_list(&f.points));
        if let Some(o) = f.original {
            let _ = writeln!(s, "  original {o}");
        }
        if let Some(c) = f.class {
            let _ = writeln!(s, "  class {c}");
        }
        write_affine(&mut s, "  matrix", &f.basis);
        if let Some(h) = f.hinge {
            let _ = writeln!(s, "  hinge {} {} {}", h.parent, h.side, h.parent_side);
        }
        if f.flipped {
            s.push_str("  back\n");
        }
        if let Some(al) = f.align {
            let _ = writeln!(s, "  align {} {}", al.origin, al.x);
        }
    }
    s
}
