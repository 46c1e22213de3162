//! File formats: OFF, Wavefront OBJ, and the native indented-attribute format.
//!
//! Purpose
//! - Parse text into a `Polyhedron` (or a `NetGraph` for native net files),
//!   collecting recoverable problems in an `AnomalyLog` instead of failing.
//! - Render models back to text; writes go through a temp file in the target
//!   directory and are persisted in one step.
//!
//! Conventions
//! - Exported face index lists are written in model order, so export→import
//!   reproduces them exactly.
//! - Fatal errors: nothing usable read (`EmptyInput`), unreadable or unwritable
//!   files, and an existing output under `WriteMode::Create`.

mod attr;
mod native;
mod obj;
mod off;

use std::io::Write as _;
use std::path::Path;

use crate::error::{AnomalyLog, PolyError, PolyResult};
use crate::net::NetGraph;
use crate::poly3::Polyhedron;

pub use native::{render_net, NET_HEADER, POLY_HEADER};

/// Parsed value plus everything that was skipped or suspicious on the way.
#[derive(Clone, Debug)]
pub struct Imported<T> {
    pub value: T,
    pub log: AnomalyLog,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WriteMode {
    /// Fail with `AlreadyExists` if the target exists.
    #[default]
    Create,
    Overwrite,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Format {
    Off,
    Obj,
    /// Native `#Polyp` / `#Polynet` text.
    Idat,
}

impl Format {
    pub const ALL: [Format; 3] = [Format::Off, Format::Obj, Format::Idat];

    pub fn name(&self) -> &'static str {
        match self {
            Format::Off => "off",
            Format::Obj => "obj",
            Format::Idat => "idat",
        }
    }

    pub fn extension(&self) -> &'static str {
        self.name()
    }

    pub fn from_name(name: &str) -> PolyResult<Self> {
        match name.to_ascii_lowercase().as_str() {
            "off" => Ok(Format::Off),
            "obj" => Ok(Format::Obj),
            "idat" => Ok(Format::Idat),
            _ => Err(PolyError::UnknownFormat {
                name: name.to_string(),
            }),
        }
    }

    /// Format implied by the file extension, if recognised.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "off" => Some(Format::Off),
            "obj" => Some(Format::Obj),
            "idat" | "polyp" | "polynet" => Some(Format::Idat),
            _ => None,
        }
    }

    /// Sniff the format from file contents.
    pub fn detect(contents: &str) -> Option<Self> {
        if let Some(first) = attr::first_line(contents) {
            if first.starts_with(POLY_HEADER) || first.starts_with(NET_HEADER) {
                return Some(Format::Idat);
            }
        }
        let mut lines = content_lines(contents);
        let (_, first) = lines.next()?;
        let tok = first.split_whitespace().next()?;
        if tok.ends_with("OFF") || tok.parse::<usize>().is_ok() {
            return Some(Format::Off);
        }
        std::iter::once(first)
            .chain(lines.map(|(_, l)| l))
            .find_map(|l| match l.split_whitespace().next() {
                Some("v" | "f" | "o") => Some(Format::Obj),
                _ => None,
            })
    }

    pub fn parse(&self, text: &str) -> PolyResult<Imported<Polyhedron>> {
        match self {
            Format::Off => off::parse_off(text),
            Format::Obj => obj::parse_obj(text),
            Format::Idat => native::parse_polyhedron(text),
        }
    }

    pub fn render(&self, poly: &Polyhedron) -> PolyResult<String> {
        match self {
            Format::Off => off::render_off(poly),
            Format::Obj => obj::render_obj(poly),
            Format::Idat => native::render_polyhedron(poly),
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Format {
    type Err = PolyError;

    fn from_str(s: &str) -> PolyResult<Self> {
        Format::from_name(s)
    }
}

/// Non-blank lines with comments stripped, as `(1-based line, trimmed text)`.
pub(crate) fn content_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, l)| (i + 1, attr::strip_comment(l).trim()))
        .filter(|(_, l)| !l.is_empty())
}

/// Reject models the writers cannot express faithfully.
pub(crate) fn check_renderable(poly: &Polyhedron) -> PolyResult<()> {
    if poly.points.is_empty() {
        return Err(PolyError::EmptyInput { what: "points" });
    }
    if poly.faces.is_empty() {
        return Err(PolyError::EmptyInput { what: "faces" });
    }
    let nv = poly.points.len();
    let max = poly.faces.iter().flat_map(|f| f.points.iter().copied()).max();
    match max {
        Some(m) if m >= nv => Err(PolyError::InconsistentCounts {
            what: "vertex",
            declared: nv,
            found: m + 1,
        }),
        _ => Ok(()),
    }
}

fn read_text(path: &Path) -> PolyResult<String> {
    std::fs::read_to_string(path).map_err(|e| PolyError::io(path, e))
}

/// Read a polyhedron. Format: `format`, else sniffed from contents, else extension.
pub fn read_polyhedron(path: &Path, format: Option<Format>) -> PolyResult<Imported<Polyhedron>> {
    let text = read_text(path)?;
    let fmt = format
        .or_else(|| Format::detect(&text))
        .or_else(|| Format::from_path(path))
        .ok_or_else(|| PolyError::UnknownFormat {
            name: path.display().to_string(),
        })?;
    let mut imported = fmt.parse(&text)?;
    if imported.value.name.is_none() {
        imported.value.name = path.file_stem().map(|s| s.to_string_lossy().into_owned());
    }
    tracing::info!(
        path = %path.display(),
        format = %fmt,
        points = imported.value.point_count(),
        faces = imported.value.face_count(),
        anomalies = imported.log.len(),
        "read polyhedron"
    );
    Ok(imported)
}

/// Write a polyhedron. Format: `format`, else extension, else native.
pub fn write_polyhedron(
    poly: &Polyhedron,
    path: &Path,
    format: Option<Format>,
    mode: WriteMode,
) -> PolyResult<Format> {
    let fmt = format
        .or_else(|| Format::from_path(path))
        .unwrap_or(Format::Idat);
    let text = fmt.render(poly)?;
    write_atomic(path, &text, mode)?;
    tracing::info!(
        path = %path.display(),
        format = %fmt,
        points = poly.point_count(),
        faces = poly.face_count(),
        "wrote polyhedron"
    );
    Ok(fmt)
}

pub fn parse_net(text: &str) -> PolyResult<Imported<NetGraph>> {
    native::parse_net(text)
}

pub fn read_net(path: &Path) -> PolyResult<Imported<NetGraph>> {
    let text = read_text(path)?;
    let imported = native::parse_net(&text)?;
    let c = imported.value.counts();
    tracing::info!(
        path = %path.display(),
        points = c.points,
        faces = c.faces,
        anomalies = imported.log.len(),
        "read net"
    );
    Ok(imported)
}

pub fn write_net(net: &NetGraph, path: &Path, mode: WriteMode) -> PolyResult<()> {
    let text = render_net(net);
    write_atomic(path, &text, mode)?;
    let c = net.counts();
    tracing::info!(
        path = %path.display(),
        points = c.points,
        faces = c.faces,
        folds = c.folds,
        cuts = c.cuts,
        "wrote net"
    );
    Ok(())
}

/// Write `text` to a temp file beside `path`, then move it into place.
///
/// A failed write leaves no partial file at `path`.
pub fn write_atomic(path: &Path, text: &str, mode: WriteMode) -> PolyResult<()> {
    let dir = match path.parent() {
        Some(d) if !d.as_os_str().is_empty() => d,
        _ => Path::new("."),
    };
    if mode == WriteMode::Create && path.exists() {
        return Err(PolyError::AlreadyExists {
            path: path.to_path_buf(),
        });
    }
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| PolyError::io(path, e))?;
    tmp.write_all(text.as_bytes())
        .and_then(|_| tmp.flush())
        .map_err(|e| PolyError::io(path, e))?;
    let persisted = match mode {
        WriteMode::Create => tmp.persist_noclobber(path),
        WriteMode::Overwrite => tmp.persist(path),
    };
    persisted.map_err(|e| PolyError::io(path, e.error))?;
    Ok(())
}
