//! Compact index-list text grammar for net lines and faces.
//!
//! - An index list is whitespace-separated non-negative integers.
//! - Line: at least two indices; if the first equals the last the line is
//!   closed and the repeated index is dropped.
//! - Face: at least three indices, always closed; a repeated first index at the
//!   end is tolerated and dropped.
//! - Align hint: exactly two indices `o x`.
//!
//! Every index must be `< bound` (the number of points known to the caller).

use super::types::Align;
use crate::error::{PolyError, PolyResult};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineSpec {
    pub points: Vec<usize>,
    pub closed: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FaceSpec {
    pub points: Vec<usize>,
    pub align: Option<Align>,
}

fn malformed(text: &str, reason: impl Into<String>) -> PolyError {
    PolyError::MalformedIndexList {
        text: text.to_string(),
        reason: reason.into(),
    }
}

pub fn parse_index_list(text: &str, bound: usize) -> PolyResult<Vec<usize>> {
    let mut out = Vec::new();
    for tok in text.split_whitespace() {
        let i: usize = tok
            .parse()
            .map_err(|_| malformed(text, format!("not an index: {tok}")))?;
        if i >= bound {
            return Err(malformed(
                text,
                format!("index {i} out of range ({bound} points)"),
            ));
        }
        out.push(i);
    }
    Ok(out)
}

pub fn parse_line_spec(text: &str, bound: usize) -> PolyResult<LineSpec> {
    let mut points = parse_index_list(text, bound)?;
    if points.len() < 2 {
        return Err(malformed(text, "a line needs at least two indices"));
    }
    let closed = points.len() > 2 && points.first() == points.last();
    if closed {
        points.pop();
    }
    Ok(LineSpec { points, closed })
}

pub fn parse_face_spec(text: &str, align: Option<&str>, bound: usize) -> PolyResult<FaceSpec> {
    let mut points = parse_index_list(text, bound)?;
    if points.len() > 3 && points.first() == points.last() {
        points.pop();
    }
    if points.len() < 3 {
        return Err(malformed(text, "a face needs at least three indices"));
    }
    let align = match align {
        Some(a) => Some(parse_align(a, bound)?),
        None => None,
    };
    Ok(FaceSpec { points, align })
}

pub fn parse_align(text: &str, bound: usize) -> PolyResult<Align> {
    match parse_index_list(text, bound)?.as_slice() {
        &[origin, x] if origin != x => Ok(Align { origin, x }),
        &[_, _] => Err(malformed(text, "align origin and x point coincide")),
        _ => Err(malformed(text, "align needs exactly two indices")),
    }
}

pub fn format_index_list(points: &[usize]) -> String {
    points
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Inverse of `parse_line_spec`: closed lines repeat their first index.
pub fn format_line_spec(points: &[usize], closed: bool) -> String {
    let mut s = format_index_list(points);
    if closed {
        if let Some(first) = points.first() {
            s.push(' ');
            s.push_str(&first.to_string());
        }
    }
    s
}
