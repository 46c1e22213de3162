//! Net element types.

use nalgebra::Vector2;

use crate::geom2::Affine2;
use crate::poly3::EdgeKey;

/// 2D net point; `source` is the 3D vertex it came from, if any.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NetPoint {
    pub pos: Vector2<f64>,
    pub source: Option<usize>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LineKind {
    /// Hinge between two placed faces (spanning-tree edge).
    Fold,
    /// Boundary or cycle-closing edge.
    Cut,
    /// Hand-authored decoration.
    #[default]
    User,
}

impl LineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineKind::Fold => "fold",
            LineKind::Cut => "cut",
            LineKind::User => "user",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "fold" => Some(LineKind::Fold),
            "cut" => Some(LineKind::Cut),
            "user" => Some(LineKind::User),
            _ => None,
        }
    }
}

/// Stroke metadata carried through I/O (rendering is out of scope).
#[derive(Clone, Debug, PartialEq)]
pub struct StrokeStyle {
    pub width: f64,
    /// RGBA.
    pub color: [u8; 4],
    /// Dash pattern lengths; empty means solid.
    pub dashes: Vec<f64>,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            width: 1.0,
            color: [0, 0, 0, 255],
            dashes: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum LineStyle {
    Local(StrokeStyle),
    /// Index into `NetGraph::styles`.
    Shared(usize),
}

#[derive(Clone, Debug, PartialEq)]
pub struct NetLine {
    pub points: Vec<usize>,
    pub closed: bool,
    pub kind: LineKind,
    pub style: Option<LineStyle>,
    /// Model edge this line was drawn for.
    pub edge: Option<EdgeKey>,
}

impl NetLine {
    /// Open two-point segment.
    pub fn segment(a: usize, b: usize, kind: LineKind, edge: Option<EdgeKey>) -> Self {
        Self {
            points: vec![a, b],
            closed: false,
            kind,
            style: None,
            edge,
        }
    }
}

/// Optional placement hint: net point indices of the face origin and a point on its x axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Align {
    pub origin: usize,
    pub x: usize,
}

/// How a face hangs off its parent in the spanning tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hinge {
    /// Parent net face.
    pub parent: usize,
    /// Side of this face on the fold edge.
    pub side: usize,
    /// Side of the parent on the fold edge.
    pub parent_side: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NetFace {
    /// Net point indices, in the source face's order.
    pub points: Vec<usize>,
    /// Source model face.
    pub original: Option<usize>,
    /// Face chart → net placement.
    pub basis: Affine2,
    pub hinge: Option<Hinge>,
    pub class: Option<usize>,
    /// Placed mirror-imaged (shown from the back).
    pub flipped: bool,
    pub align: Option<Align>,
}

impl NetFace {
    pub fn new(points: Vec<usize>) -> Self {
        Self {
            points,
            original: None,
            basis: Affine2::identity(),
            hinge: None,
            class: None,
            flipped: false,
            align: None,
        }
    }
}

/// Per-kind element counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NetCounts {
    pub points: usize,
    pub faces: usize,
    pub folds: usize,
    pub cuts: usize,
    pub user_lines: usize,
}
