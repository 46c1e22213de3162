//! `NetGraph`: the unfolded net and its layout operations.
//!
//! Coordinates
//! - `points[i].pos` are local net coordinates; `transform` maps them to placed
//!   (net-space) coordinates. Layout ops (`fit_to_rect`, `center`) compose onto
//!   `transform`; `apply_transform` bakes it into the points.
//! - `NetFace::basis` maps the source face's chart into local net coordinates.

use nalgebra::Vector2;

use super::grammar::format_index_list;
use super::types::{
    Align, LineKind, LineStyle, NetCounts, NetFace, NetLine, NetPoint, StrokeStyle,
};
use crate::error::{PolyError, PolyResult};
use crate::geom2::{point_in_polygon, Affine2, BBox2};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct NetGraph {
    pub name: Option<String>,
    /// Name of the polyhedron this net was unwrapped from.
    pub source: Option<String>,
    pub points: Vec<NetPoint>,
    pub lines: Vec<NetLine>,
    pub faces: Vec<NetFace>,
    /// Shared stroke styles referenced by `LineStyle::Shared`.
    pub styles: Vec<StrokeStyle>,
    pub transform: Affine2,
}

fn bad_indices(points: &[usize], reason: String) -> PolyError {
    PolyError::MalformedIndexList {
        text: format_index_list(points),
        reason,
    }
}

impl NetGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_point(&mut self, pos: Vector2<f64>, source: Option<usize>) -> usize {
        self.points.push(NetPoint { pos, source });
        self.points.len() - 1
    }

    pub fn add_style(&mut self, style: StrokeStyle) -> usize {
        self.styles.push(style);
        self.styles.len() - 1
    }

    fn check_points(&self, points: &[usize], min: usize) -> PolyResult<()> {
        if points.len() < min {
            return Err(bad_indices(
                points,
                format!("{} index(es), need at least {min}", points.len()),
            ));
        }
        if let Some(&bad) = points.iter().find(|&&i| i >= self.points.len()) {
            return Err(bad_indices(
                points,
                format!("index {bad} out of range ({} points)", self.points.len()),
            ));
        }
        Ok(())
    }

    pub fn add_line(&mut self, line: NetLine) -> PolyResult<usize> {
        self.check_points(&line.points, 2)?;
        if let Some(LineStyle::Shared(s)) = line.style {
            if s >= self.styles.len() {
                return Err(bad_indices(
                    &line.points,
                    format!("style {s} out of range ({} styles)", self.styles.len()),
                ));
            }
        }
        self.lines.push(line);
        Ok(self.lines.len() - 1)
    }

    pub fn add_face(&mut self, face: NetFace) -> PolyResult<usize> {
        self.check_points(&face.points, 3)?;
        if let Some(Align { origin, x }) = face.align {
            self.check_points(&[origin, x], 2)?;
        }
        self.faces.push(face);
        Ok(self.faces.len() - 1)
    }

    /// Placed (net-space) position of point `i`.
    #[inline]
    pub fn placed(&self, i: usize) -> Vector2<f64> {
        self.transform.apply(self.points[i].pos)
    }

    /// Placed outline of a face.
    pub fn face_outline(&self, face: usize) -> Vec<Vector2<f64>> {
        self.faces[face].points.iter().map(|&i| self.placed(i)).collect()
    }

    /// Bounding box of all placed points; None for an empty net.
    pub fn find_bbox(&self) -> Option<BBox2> {
        BBox2::from_points((0..self.points.len()).map(|i| self.placed(i)))
    }

    /// Scale uniformly and translate so the placed net is centered in `rect`.
    ///
    /// `rect` is first inset by `margin` on every side when the margin fits;
    /// otherwise a warning is logged and the whole rect is used.
    /// The net fills the target exactly along its limiting axis. Returns the
    /// applied scale, or None (no change) for an empty net or a degenerate target.
    pub fn fit_to_rect(&mut self, rect: &BBox2, margin: f64) -> Option<f64> {
        let bb = self.find_bbox()?;
        let target = match rect.inset(margin.max(0.0)) {
            Some(t) => t,
            None if margin > 0.0 && rect.width() > 0.0 && rect.height() > 0.0 => {
                tracing::warn!(
                    margin,
                    width = rect.width(),
                    height = rect.height(),
                    "margin does not fit the rect; fitting to the whole rect"
                );
                *rect
            }
            None => *rect,
        };
        if target.width() <= 0.0 || target.height() <= 0.0 {
            return None;
        }
        let sx = if bb.width() > 0.0 {
            target.width() / bb.width()
        } else {
            f64::INFINITY
        };
        let sy = if bb.height() > 0.0 {
            target.height() / bb.height()
        } else {
            f64::INFINITY
        };
        let s = match sx.min(sy) {
            s if s.is_finite() => s,
            _ => 1.0,
        };
        let fit = Affine2::translation(target.center())
            .compose(&Affine2::scaling(s))
            .compose(&Affine2::translation(-bb.center()));
        self.transform = fit.compose(&self.transform);
        tracing::debug!(scale = s, "fitted net to rect");
        Some(s)
    }

    /// Translate so the placed bounding box is centered on the origin.
    pub fn center(&mut self) {
        if let Some(bb) = self.find_bbox() {
            self.transform = Affine2::translation(-bb.center()).compose(&self.transform);
        }
    }

    /// Bake `extra ∘ transform` into point positions and face bases, then reset
    /// `transform` to the identity. A mirroring map toggles every face's `flipped`.
    pub fn apply_transform(&mut self, extra: Option<&Affine2>) {
        let total = match extra {
            Some(e) => e.compose(&self.transform),
            None => self.transform,
        };
        for p in &mut self.points {
            p.pos = total.apply(p.pos);
        }
        let mirror = !total.is_orientation_preserving();
        for f in &mut self.faces {
            f.basis = total.compose(&f.basis);
            if mirror {
                f.flipped = !f.flipped;
            }
        }
        self.transform = Affine2::identity();
    }

    /// First face whose placed outline contains `p`.
    pub fn face_at(&self, p: Vector2<f64>) -> Option<usize> {
        (0..self.faces.len()).find(|&f| point_in_polygon(p, &self.face_outline(f)))
    }

    /// Net face placed for model face `original`.
    pub fn face_by_original(&self, original: usize) -> Option<usize> {
        self.faces.iter().position(|f| f.original == Some(original))
    }

    pub fn lines_of_kind(&self, kind: LineKind) -> impl Iterator<Item = &NetLine> {
        self.lines.iter().filter(move |l| l.kind == kind)
    }

    pub fn fold_lines(&self) -> impl Iterator<Item = &NetLine> {
        self.lines_of_kind(LineKind::Fold)
    }

    pub fn cut_lines(&self) -> impl Iterator<Item = &NetLine> {
        self.lines_of_kind(LineKind::Cut)
    }

    pub fn counts(&self) -> NetCounts {
        NetCounts {
            points: self.points.len(),
            faces: self.faces.len(),
            folds: self.fold_lines().count(),
            cuts: self.cut_lines().count(),
            user_lines: self.lines_of_kind(LineKind::User).count(),
        }
    }

    /// Resolved stroke style of a line, if any.
    pub fn line_style(&self, line: usize) -> Option<&StrokeStyle> {
        match self.lines[line].style.as_ref()? {
            LineStyle::Local(s) => Some(s),
            LineStyle::Shared(i) => self.styles.get(*i),
        }
    }

    /// Rigid frame of a face in local net coordinates: origin and x axis from the
    /// align hint, else from the face's first two points. None if they coincide.
    pub fn face_frame(&self, face: usize) -> Option<Affine2> {
        let f = &self.faces[face];
        let (o, x) = match f.align {
            Some(a) => (a.origin, a.x),
            None => (*f.points.first()?, *f.points.get(1)?),
        };
        let frame = Affine2::frame(self.points.get(o)?.pos, self.points.get(x)?.pos)?;
        if f.flipped {
            // Mirror the chart's y axis.
            let m = Affine2 {
                m: nalgebra::Matrix2::new(1.0, 0.0, 0.0, -1.0),
                t: Vector2::zeros(),
            };
            return Some(frame.compose(&m));
        }
        Some(frame)
    }
}
