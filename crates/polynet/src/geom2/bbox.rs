//! Axis-aligned 2D bounding box.

use nalgebra::Vector2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BBox2 {
    pub min: Vector2<f64>,
    pub max: Vector2<f64>,
}

impl BBox2 {
    /// Box spanning two corners given in any order.
    pub fn new(a: Vector2<f64>, b: Vector2<f64>) -> Self {
        Self {
            min: a.inf(&b),
            max: a.sup(&b),
        }
    }

    /// Box with lower-left corner at the origin.
    pub fn from_size(width: f64, height: f64) -> Self {
        Self::new(Vector2::zeros(), Vector2::new(width, height))
    }

    /// Tight box around `points`; None if empty.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Vector2<f64>>,
    {
        let mut it = points.into_iter();
        let first = it.next()?;
        let mut bb = Self {
            min: first,
            max: first,
        };
        for p in it {
            bb.add_point(p);
        }
        Some(bb)
    }

    #[inline]
    pub fn add_point(&mut self, p: Vector2<f64>) {
        self.min = self.min.inf(&p);
        self.max = self.max.sup(&p);
    }

    pub fn union(&self, other: &BBox2) -> BBox2 {
        BBox2 {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn center(&self) -> Vector2<f64> {
        (self.min + self.max) * 0.5
    }

    /// Shrink every side by `margin`. None when the margin does not fit.
    pub fn inset(&self, margin: f64) -> Option<BBox2> {
        if 2.0 * margin >= self.width() || 2.0 * margin >= self.height() {
            return None;
        }
        let d = Vector2::new(margin, margin);
        Some(BBox2 {
            min: self.min + d,
            max: self.max - d,
        })
    }

    /// Grow every side by `margin`.
    pub fn expand(&self, margin: f64) -> BBox2 {
        let d = Vector2::new(margin, margin);
        BBox2::new(self.min - d, self.max + d)
    }

    pub fn contains(&self, p: Vector2<f64>, tol: f64) -> bool {
        p.x >= self.min.x - tol
            && p.x <= self.max.x + tol
            && p.y >= self.min.y - tol
            && p.y <= self.max.y + tol
    }

    /// `self` lies within `outer` (with tolerance).
    pub fn within(&self, outer: &BBox2, tol: f64) -> bool {
        outer.contains(self.min, tol) && outer.contains(self.max, tol)
    }
}
