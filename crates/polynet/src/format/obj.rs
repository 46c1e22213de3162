//! Wavefront OBJ (polygonal subset).
//!
//! - `o name`: model name (first one wins).
//! - `v x y z [w]`: vertex; `w` is ignored.
//! - `f a b c ...`: face; each token is `v`, `v/t`, `v/t/n`, or `v//n`.
//!   Indices are 1-based; negative indices count back from the last vertex read.
//! - Texture, normal, grouping, and material statements are accepted and dropped.

use std::fmt::Write as _;

use nalgebra::Vector3;

use super::off::push_face;
use super::{content_lines, Imported};
use crate::error::{Anomaly, AnomalyLog, PolyError, PolyResult};
use crate::poly3::Polyhedron;

const DROPPED: &[&str] = &[
    "vt", "vn", "vp", "g", "s", "l", "p", "mtllib", "usemtl", "cstype", "deg", "curv", "surf",
];

/// 0-based slot for one face token, relative to `count` vertices read so far.
fn face_index(tok: &str, count: usize) -> Result<usize, String> {
    let head = tok.split('/').next().unwrap_or(tok);
    let i: i64 = head
        .parse()
        .map_err(|_| format!("not an index: {tok}"))?;
    let resolved = match i {
        0 => return Err("index 0 is not valid in OBJ".into()),
        i if i > 0 => i - 1,
        i => count as i64 + i,
    };
    if resolved < 0 || resolved as usize >= count {
        return Err(format!("index {i} out of range ({count} vertices)"));
    }
    Ok(resolved as usize)
}

pub(crate) fn parse_obj(text: &str) -> PolyResult<Imported<Polyhedron>> {
    let mut log = AnomalyLog::new();
    let mut poly = Polyhedron::new();
    let mut slots: Vec<Option<usize>> = Vec::new();
    for (ln, l) in content_lines(text) {
        let (kw, rest) = match l.split_once(char::is_whitespace) {
            Some((k, r)) => (k, r.trim()),
            None => (l, ""),
        };
        match kw {
            "v" => {
                let vals: Option<Vec<f64>> = rest
                    .split_whitespace()
                    .take(3)
                    .map(|t| t.parse::<f64>().ok())
                    .collect();
                match vals {
                    Some(v) if v.len() == 3 && v.iter().all(|x| x.is_finite()) => {
                        slots.push(Some(poly.add_point(Vector3::new(v[0], v[1], v[2]))));
                    }
                    _ => {
                        log.push(Anomaly::MalformedPoint {
                            line: Some(ln),
                            text: l.to_string(),
                        });
                        slots.push(None);
                    }
                }
            }
            "f" => {
                let idx: Result<Vec<usize>, String> = rest
                    .split_whitespace()
                    .map(|t| face_index(t, slots.len()))
                    .collect();
                match idx {
                    Ok(idx) => {
                        push_face(&mut poly, &slots, &idx, ln, &mut log);
                    }
                    Err(reason) => log.push(Anomaly::MalformedIndexList {
                        line: Some(ln),
                        text: l.to_string(),
                        reason,
                    }),
                }
            }
            "o" => {
                if poly.name.is_none() && !rest.is_empty() {
                    poly.name = Some(rest.to_string());
                }
            }
            kw if DROPPED.contains(&kw) => {}
            _ => log.push(Anomaly::IgnoredDirective {
                line: ln,
                text: l.to_string(),
            }),
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

pub(crate) fn render_obj(poly: &Polyhedron) -> PolyResult<String> {
    super::check_renderable(poly)?;
    let mut s = String::new();
    let _ = writeln!(s, "# polynet {}", crate::VERSION);
    if let Some(name) = &poly.name {
        let _ = writeln!(s, "o {name}");
    }
    for p in &poly.points {
        let _ = writeln!(s, "v {} {} {}", p.x, p.y, p.z);
    }
    for f in &poly.faces {
        s.push('f');
        for i in &f.points {
            let _ = write!(s, " {}", i + 1);
        }
        s.push('\n');
    }
    Ok(s)
}
