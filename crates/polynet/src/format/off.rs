//! OFF (Object File Format).
//!
//! ```text
//! [ST][C][N][4][n]OFF      # keyword, optional for plain OFF
//! [dim]                    # only with the n prefix
//! nv nf [ne]
//! x y z [extra...]         # nv lines; 4 prefix adds a homogeneous w
//! k i0 i1 ... ik-1 [color] # nf lines
//! ```
//!
//! Per-vertex normals, colors, and texture coordinates (N, C, ST) and per-face
//! colors are read past and dropped.

use std::fmt::Write as _;

use nalgebra::Vector3;

use super::{content_lines, Imported};
use crate::error::{Anomaly, AnomalyLog, PolyError, PolyResult};
use crate::poly3::{EdgeKey, Polyhedron};

/// Largest `nOFF` dimension accepted; coordinates past z are dropped anyway.
const MAX_DIM: usize = 4;
/// Upper bound on slots reserved from a header count before any line is read.
const RESERVE_CAP: usize = 4096;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Header {
    homogeneous: bool,
    ndim: bool,
}

/// Parse the keyword token, e.g. `STCNOFF` or `4nOFF`.
fn parse_keyword(tok: &str) -> Option<Header> {
    let mut rest = tok.strip_suffix("OFF")?;
    let mut h = Header::default();
    for flag in ["ST", "C", "N", "4", "n"] {
        if let Some(r) = rest.strip_prefix(flag) {
            rest = r;
            match flag {
                "4" => h.homogeneous = true,
                "n" => h.ndim = true,
                _ => {}
            }
        }
    }
    rest.is_empty().then_some(h)
}

fn parse_count(tok: Option<&str>, what: &str) -> PolyResult<usize> {
    tok.and_then(|t| t.parse().ok())
        .ok_or_else(|| PolyError::MalformedIndexList {
            text: tok.unwrap_or("").to_string(),
            reason: format!("expected OFF {what}"),
        })
}

pub(crate) fn parse_off(text: &str) -> PolyResult<Imported<Polyhedron>> {
    let mut log = AnomalyLog::new();
    let mut lines = content_lines(text);
    let Some((_, first)) = lines.next() else {
        return Err(PolyError::EmptyInput { what: "points" });
    };
    let first_toks: Vec<&str> = first.split_whitespace().collect();
    let (header, mut toks) = match first_toks.first().and_then(|t| parse_keyword(t)) {
        Some(h) => (h, first_toks[1..].to_vec()),
        None if first_toks.first().is_some_and(|t| t.parse::<usize>().is_ok()) => {
            (Header::default(), first_toks)
        }
        None => {
            return Err(PolyError::UnknownFormat {
                name: first_toks.first().copied().unwrap_or("").to_string(),
            })
        }
    };
    let needed = if header.ndim { 3 } else { 2 };
    while toks.len() < needed {
        match lines.next() {
            Some((_, l)) => toks.extend(l.split_whitespace()),
            None => break,
        }
    }
    let mut toks = toks.into_iter();
    let dim = if header.ndim {
        let d = parse_count(toks.next(), "dimension")?;
        if d == 0 || d > MAX_DIM {
            return Err(PolyError::MalformedIndexList {
                text: d.to_string(),
                reason: format!("OFF dimension must be 1..={MAX_DIM}"),
            });
        }
        d
    } else {
        3
    };
    let nv = parse_count(toks.next(), "vertex count")?;
    let nf = parse_count(toks.next(), "face count")?;
    let coords = dim + usize::from(header.homogeneous);

    let mut poly = Polyhedron::new();
    // File vertex index -> model point index (None for malformed lines).
    let mut slots: Vec<Option<usize>> = Vec::with_capacity(nv.min(RESERVE_CAP));
    for k in 0..nv {
        let Some((ln, l)) = lines.next() else {
            log.push(Anomaly::InconsistentCounts {
                what: "vertex".into(),
                declared: nv,
                found: k,
            });
            break;
        };
        let vals: Option<Vec<f64>> = l
            .split_whitespace()
            .take(coords)
            .map(|t| t.parse::<f64>().ok())
            .collect();
        match vals {
            Some(v) if v.len() == coords && v.iter().all(|x| x.is_finite()) => {
                let get = |i: usize| if i < dim { v[i] } else { 0.0 };
                let mut p = Vector3::new(get(0), get(1), get(2));
                if header.homogeneous && v[dim] != 0.0 {
                    p /= v[dim];
                }
                slots.push(Some(poly.add_point(p)));
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

    for k in 0..nf {
        let Some((ln, l)) = lines.next() else {
            log.push(Anomaly::InconsistentCounts {
                what: "face".into(),
                declared: nf,
                found: k,
            });
            break;
        };
        let mut it = l.split_whitespace();
        let malformed = |reason: String| Anomaly::MalformedIndexList {
            line: Some(ln),
            text: l.to_string(),
            reason,
        };
        let Some(n) = it.next().and_then(|t| t.parse::<usize>().ok()) else {
            log.push(malformed("missing vertex count".into()));
            continue;
        };
        let idx: Result<Vec<usize>, String> = (0..n)
            .map(|_| match it.next() {
                Some(t) => t.parse::<usize>().map_err(|_| format!("not an index: {t}")),
                None => Err(format!("expected {n} indices")),
            })
            .collect();
        let idx = match idx {
            Ok(v) => v,
            Err(reason) => {
                log.push(malformed(reason));
                continue;
            }
        };
        push_face(&mut poly, &slots, &idx, ln, &mut log);
    }

    if poly.points.is_empty() {
        return Err(PolyError::EmptyInput { what: "points" });
    }
    if poly.faces.is_empty() {
        return Err(PolyError::EmptyInput { what: "faces" });
    }
    Ok(Imported { value: poly, log })
}

/// Map file indices through `slots` and add the face, logging anything invalid.
pub(crate) fn push_face(
    poly: &mut Polyhedron,
    slots: &[Option<usize>],
    idx: &[usize],
    line: usize,
    log: &mut AnomalyLog,
) -> Option<usize> {
    let invalid = |reason: String| Anomaly::InvalidFace {
        face: None,
        line: Some(line),
        reason,
    };
    let mut mapped = Vec::with_capacity(idx.len());
    for &i in idx {
        match slots.get(i) {
            Some(Some(p)) => mapped.push(*p),
            Some(None) => {
                log.push(invalid(format!("references malformed vertex {i}")));
                return None;
            }
            None => {
                log.push(invalid(format!(
                    "index {i} out of range ({} vertices)",
                    slots.len()
                )));
                return None;
            }
        }
    }
    match poly.add_face(&mapped) {
        Ok(f) => Some(f),
        Err(e) => {
            log.push(invalid(e.to_string()));
            None
        }
    }
}

pub(crate) fn render_off(poly: &Polyhedron) -> PolyResult<String> {
    super::check_renderable(poly)?;
    let edges: std::collections::BTreeSet<EdgeKey> = poly
        .faces
        .iter()
        .flat_map(|f| f.sides().map(|(a, b)| EdgeKey::new(a, b)))
        .collect();
    let mut s = String::new();
    let _ = writeln!(s, "OFF");
    if let Some(name) = &poly.name {
        let _ = writeln!(s, "# {name}");
    }
    let _ = writeln!(s, "{} {} {}", poly.points.len(), poly.faces.len(), edges.len());
    for p in &poly.points {
        let _ = writeln!(s, "{} {} {}", p.x, p.y, p.z);
    }
    for f in &poly.faces {
        let _ = write!(s, "{}", f.len());
        for i in &f.points {
            let _ = write!(s, " {i}");
        }
        s.push('\n');
    }
    Ok(s)
}
