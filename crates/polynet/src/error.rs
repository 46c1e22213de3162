//! Errors and anomalies.
//!
//! - `PolyError`: fatal conditions, returned as `Err` (I/O, empty input,
//!   out-of-range arguments, invalid programmatic input).
//! - `Anomaly` / `AnomalyLog`: recoverable conditions collected while importing,
//!   validating, and unwrapping. Damaged input still yields partial output; every
//!   dropped piece of geometry is recorded here.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

/// Result alias for fallible polynet operations.
pub type PolyResult<T> = Result<T, PolyError>;

/// Fatal errors.
#[derive(Debug, Error)]
pub enum PolyError {
    /// Face rejected by `Polyhedron::add_face`.
    #[error("invalid face {face:?}: {reason}")]
    InvalidFace {
        /// Index list as given by the caller.
        face: Vec<usize>,
        /// What was wrong with it.
        reason: String,
    },

    /// One or more edges are shared by more than two faces.
    #[error("non-manifold polyhedron: {edges} edge(s) shared by more than two faces")]
    NonManifold {
        /// Number of offending edges.
        edges: usize,
    },

    /// Index list text that does not parse.
    #[error("malformed index list {text:?}: {reason}")]
    MalformedIndexList {
        /// Offending text.
        text: String,
        /// Parse failure detail.
        reason: String,
    },

    /// Declared and actual element counts disagree.
    #[error("inconsistent {what} count: declared {declared}, found {found}")]
    InconsistentCounts {
        /// Which element kind (vertex, face, ...).
        what: &'static str,
        /// Count announced by a header or required by the caller.
        declared: usize,
        /// Count actually present.
        found: usize,
    },

    /// Input has no points or no faces.
    #[error("empty input: no {what}")]
    EmptyInput {
        /// Missing element kind.
        what: &'static str,
    },

    /// Face index argument outside the model.
    #[error("face index {face} out of range ({count} faces)")]
    FaceOutOfRange {
        /// Requested face.
        face: usize,
        /// Number of faces in the model.
        count: usize,
    },

    /// Format name or file contents not recognized.
    #[error("unknown format: {name}")]
    UnknownFormat {
        /// Name, extension, or path that failed to resolve.
        name: String,
    },

    /// Input file does not exist.
    #[error("file not found: {}", .path.display())]
    FileNotFound {
        /// Missing path.
        path: PathBuf,
    },

    /// Output exists and overwriting was not requested.
    #[error("refusing to overwrite existing file: {}", .path.display())]
    AlreadyExists {
        /// Existing path.
        path: PathBuf,
    },

    /// Any other I/O failure, tagged with the file involved.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// File being read or written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl PolyError {
    /// Wrap an I/O error for `path`, mapping `NotFound` and `AlreadyExists` to their own variants.
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound => PolyError::FileNotFound {
                path: path.to_path_buf(),
            },
            std::io::ErrorKind::AlreadyExists => PolyError::AlreadyExists {
                path: path.to_path_buf(),
            },
            _ => PolyError::Io {
                path: path.to_path_buf(),
                source,
            },
        }
    }
}

/// Recoverable condition recorded during import, validation, or unwrapping.
///
/// `line` fields are 1-based source line numbers when the anomaly came from a file.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Anomaly {
    InvalidFace {
        face: Option<usize>,
        line: Option<usize>,
        reason: String,
    },
    NonManifold {
        edge: [usize; 2],
        faces: Vec<usize>,
    },
    MalformedIndexList {
        line: Option<usize>,
        text: String,
        reason: String,
    },
    MalformedPoint {
        line: Option<usize>,
        text: String,
    },
    InconsistentCounts {
        what: String,
        declared: usize,
        found: usize,
    },
    DisconnectedComponent {
        component: usize,
        faces: usize,
        first_face: usize,
    },
    UnreachableFace {
        face: usize,
    },
    DegenerateFace {
        face: usize,
        area: f64,
    },
    DuplicateFace {
        face: usize,
        duplicate_of: usize,
    },
    NonPlanarFace {
        face: usize,
        deviation: f64,
    },
    InconsistentWinding {
        edge: [usize; 2],
        faces: [usize; 2],
    },
    SkippedFace {
        face: usize,
        reason: String,
    },
    SkippedOrderEdge {
        edge: [usize; 2],
        reason: String,
    },
    IgnoredDirective {
        line: usize,
        text: String,
    },
}

impl Anomaly {
    /// Stable snake_case tag (matches the serialized `kind`).
    pub fn kind(&self) -> &'static str {
        match self {
            Anomaly::InvalidFace { .. } => "invalid_face",
            Anomaly::NonManifold { .. } => "non_manifold",
            Anomaly::MalformedIndexList { .. } => "malformed_index_list",
            Anomaly::MalformedPoint { .. } => "malformed_point",
            Anomaly::InconsistentCounts { .. } => "inconsistent_counts",
            Anomaly::DisconnectedComponent { .. } => "disconnected_component",
            Anomaly::UnreachableFace { .. } => "unreachable_face",
            Anomaly::DegenerateFace { .. } => "degenerate_face",
            Anomaly::DuplicateFace { .. } => "duplicate_face",
            Anomaly::NonPlanarFace { .. } => "non_planar_face",
            Anomaly::InconsistentWinding { .. } => "inconsistent_winding",
            Anomaly::SkippedFace { .. } => "skipped_face",
            Anomaly::SkippedOrderEdge { .. } => "skipped_order_edge",
            Anomaly::IgnoredDirective { .. } => "ignored_directive",
        }
    }
}

fn at_line(line: &Option<usize>) -> String {
    match line {
        Some(l) => format!(" (line {l})"),
        None => String::new(),
    }
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Anomaly::InvalidFace { face, line, reason } => match face {
                Some(i) => write!(f, "invalid face {i}: {reason}{}", at_line(line)),
                None => write!(f, "invalid face: {reason}{}", at_line(line)),
            },
            Anomaly::NonManifold { edge, faces } => write!(
                f,
                "edge {}-{} shared by {} faces {:?}",
                edge[0],
                edge[1],
                faces.len(),
                faces
            ),
            Anomaly::MalformedIndexList { line, text, reason } => {
                write!(f, "malformed index list {text:?}: {reason}{}", at_line(line))
            }
            Anomaly::MalformedPoint { line, text } => {
                write!(f, "malformed point {text:?}{}", at_line(line))
            }
            Anomaly::InconsistentCounts {
                what,
                declared,
                found,
            } => write!(f, "{what} count: declared {declared}, found {found}"),
            Anomaly::DisconnectedComponent {
                component,
                faces,
                first_face,
            } => write!(
                f,
                "disconnected component {component}: {faces} face(s) starting at face {first_face}"
            ),
            Anomaly::UnreachableFace { face } => write!(f, "face {face} not reached by unwrap"),
            Anomaly::DegenerateFace { face, area } => {
                write!(f, "face {face} has (near) zero area {area:e}")
            }
            Anomaly::DuplicateFace { face, duplicate_of } => {
                write!(f, "face {face} duplicates face {duplicate_of}")
            }
            Anomaly::NonPlanarFace { face, deviation } => {
                write!(f, "face {face} is not planar (deviation {deviation:e})")
            }
            Anomaly::InconsistentWinding { edge, faces } => write!(
                f,
                "faces {} and {} traverse edge {}-{} in the same direction",
                faces[0], faces[1], edge[0], edge[1]
            ),
            Anomaly::SkippedFace { face, reason } => write!(f, "skipped face {face}: {reason}"),
            Anomaly::SkippedOrderEdge { edge, reason } => {
                write!(f, "skipped order edge {}-{}: {reason}", edge[0], edge[1])
            }
            Anomaly::IgnoredDirective { line, text } => {
                write!(f, "ignored {text:?} (line {line})")
            }
        }
    }
}

/// Ordered collection of anomalies; each push is also emitted as a `tracing` warning.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AnomalyLog {
    entries: Vec<Anomaly>,
}

impl AnomalyLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, anomaly: Anomaly) {
        tracing::warn!(kind = anomaly.kind(), "{anomaly}");
        self.entries.push(anomaly);
    }

    /// Append another log (entries were already traced when first pushed).
    pub fn append(&mut self, other: AnomalyLog) {
        self.entries.extend(other.entries);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn entries(&self) -> &[Anomaly] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Anomaly> {
        self.entries.iter()
    }

    /// Number of entries whose `kind()` equals `kind`.
    pub fn count(&self, kind: &str) -> usize {
        self.entries.iter().filter(|a| a.kind() == kind).count()
    }

    pub fn into_vec(self) -> Vec<Anomaly> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a AnomalyLog {
    type Item = &'a Anomaly;
    type IntoIter = std::slice::Iter<'a, Anomaly>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_maps_not_found() {
        let err = PolyError::io(
            Path::new("missing.off"),
            std::io::Error::from(std::io::ErrorKind::NotFound),
        );
        assert!(matches!(err, PolyError::FileNotFound { .. }));
        assert_eq!(err.to_string(), "file not found: missing.off");
    }

    #[test]
    fn log_counts_by_kind() {
        let mut log = AnomalyLog::new();
        log.push(Anomaly::UnreachableFace { face: 3 });
        log.push(Anomaly::UnreachableFace { face: 4 });
        log.push(Anomaly::MalformedIndexList {
            line: Some(7),
            text: "a b c".into(),
            reason: "not an integer: a".into(),
        });
        assert_eq!(log.len(), 3);
        assert_eq!(log.count("unreachable_face"), 2);
        assert_eq!(log.count("malformed_index_list"), 1);
        assert!(log.entries()[2].to_string().contains("line 7"));
    }

    #[test]
    fn append_keeps_order() {
        let mut a = AnomalyLog::new();
        a.push(Anomaly::SkippedFace {
            face: 2,
            reason: "collinear".into(),
        });
        let mut b = AnomalyLog::new();
        b.push(Anomaly::UnreachableFace { face: 5 });
        a.append(b);
        let kinds: Vec<_> = a.iter().map(Anomaly::kind).collect();
        assert_eq!(kinds, ["skipped_face", "unreachable_face"]);
        assert!(a.entries()[0].to_string().starts_with("skipped face 2"));
    }
}
