//! Edge map and dual graph.
//!
//! - Edges are keyed by the unordered vertex pair; each records every
//!   `(face, side)` incidence.
//! - The dual graph links two faces only through an edge with exactly two
//!   incidences on distinct faces. Non-manifold edges (> 2) never link faces.
//! - Neighbor lists are sorted by neighbor face index, then side, so traversals
//!   are deterministic.

use std::collections::{BTreeMap, HashMap, VecDeque};

use super::types::Polyhedron;
use crate::error::{Anomaly, AnomalyLog, PolyError, PolyResult};

/// Unordered vertex pair, stored with `0 <= 1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey(pub usize, pub usize);

impl EdgeKey {
    #[inline]
    pub fn new(a: usize, b: usize) -> Self {
        if a <= b {
            EdgeKey(a, b)
        } else {
            EdgeKey(b, a)
        }
    }

    #[inline]
    pub fn ends(&self) -> [usize; 2] {
        [self.0, self.1]
    }
}

/// `(face, side)` incidence of an edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Incidence {
    pub face: usize,
    pub side: usize,
}

#[derive(Clone, Debug)]
pub struct EdgeInfo {
    pub key: EdgeKey,
    pub faces: Vec<Incidence>,
}

impl EdgeInfo {
    #[inline]
    pub fn is_boundary(&self) -> bool {
        self.faces.len() == 1
    }

    #[inline]
    pub fn is_non_manifold(&self) -> bool {
        self.faces.len() > 2
    }

    /// Exactly two incidences on distinct faces.
    #[inline]
    pub fn is_interior(&self) -> bool {
        self.faces.len() == 2 && self.faces[0].face != self.faces[1].face
    }
}

/// Dual-graph link from one face to a neighbor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DualLink {
    /// Neighbor face.
    pub face: usize,
    /// Edge id in `Adjacency::edges`.
    pub edge: usize,
    /// Side index of the shared edge in the owning face.
    pub side: usize,
    /// Side index of the shared edge in the neighbor.
    pub other_side: usize,
}

#[derive(Clone, Debug, Default)]
pub struct Adjacency {
    /// All edges, sorted by key.
    pub edges: Vec<EdgeInfo>,
    /// `face_edges[f][s]` is the edge id of side `s` of face `f`.
    pub face_edges: Vec<Vec<usize>>,
    /// `dual[f]`: links to neighbor faces, sorted by (neighbor, side).
    pub dual: Vec<Vec<DualLink>>,
    index: HashMap<EdgeKey, usize>,
}

impl Adjacency {
    pub fn build(poly: &Polyhedron) -> Self {
        let mut map: BTreeMap<EdgeKey, Vec<Incidence>> = BTreeMap::new();
        for (fi, f) in poly.faces.iter().enumerate() {
            for (si, (a, b)) in f.sides().enumerate() {
                map.entry(EdgeKey::new(a, b))
                    .or_default()
                    .push(Incidence { face: fi, side: si });
            }
        }
        let edges: Vec<EdgeInfo> = map
            .into_iter()
            .map(|(key, faces)| EdgeInfo { key, faces })
            .collect();
        let index: HashMap<EdgeKey, usize> =
            edges.iter().enumerate().map(|(i, e)| (e.key, i)).collect();

        let mut face_edges: Vec<Vec<usize>> = poly
            .faces
            .iter()
            .map(|f| vec![usize::MAX; f.len()])
            .collect();
        let mut dual: Vec<Vec<DualLink>> = vec![Vec::new(); poly.faces.len()];
        for (ei, e) in edges.iter().enumerate() {
            for inc in &e.faces {
                face_edges[inc.face][inc.side] = ei;
            }
            if e.is_interior() {
                let (x, y) = (e.faces[0], e.faces[1]);
                dual[x.face].push(DualLink {
                    face: y.face,
                    edge: ei,
                    side: x.side,
                    other_side: y.side,
                });
                dual[y.face].push(DualLink {
                    face: x.face,
                    edge: ei,
                    side: y.side,
                    other_side: x.side,
                });
            }
        }
        for links in &mut dual {
            links.sort_by_key(|l| (l.face, l.side));
        }
        tracing::debug!(
            faces = poly.faces.len(),
            edges = edges.len(),
            "built adjacency"
        );
        Self {
            edges,
            face_edges,
            dual,
            index,
        }
    }

    pub fn edge_id(&self, a: usize, b: usize) -> Option<usize> {
        self.index.get(&EdgeKey::new(a, b)).copied()
    }

    pub fn edge(&self, a: usize, b: usize) -> Option<&EdgeInfo> {
        self.edge_id(a, b).map(|i| &self.edges[i])
    }

    #[inline]
    pub fn neighbors(&self, face: usize) -> &[DualLink] {
        &self.dual[face]
    }

    pub fn interior_edge_count(&self) -> usize {
        self.edges.iter().filter(|e| e.is_interior()).count()
    }

    pub fn boundary_edge_count(&self) -> usize {
        self.edges.iter().filter(|e| e.is_boundary()).count()
    }

    pub fn non_manifold_edges(&self) -> impl Iterator<Item = &EdgeInfo> {
        self.edges.iter().filter(|e| e.is_non_manifold())
    }

    /// Fail with `NonManifold` if any edge has more than two incidences.
    pub fn check_manifold(&self) -> PolyResult<()> {
        let edges = self.non_manifold_edges().count();
        if edges > 0 {
            return Err(PolyError::NonManifold { edges });
        }
        Ok(())
    }

    /// Record one `NonManifold` anomaly per offending edge.
    pub fn log_non_manifold(&self, log: &mut AnomalyLog) {
        for e in self.non_manifold_edges() {
            log.push(Anomaly::NonManifold {
                edge: e.key.ends(),
                faces: e.faces.iter().map(|i| i.face).collect(),
            });
        }
    }

    /// Connected components of the dual graph; faces ascending within each,
    /// components ordered by their smallest face.
    pub fn components(&self) -> Vec<Vec<usize>> {
        let n = self.dual.len();
        let mut seen = vec![false; n];
        let mut out = Vec::new();
        for start in 0..n {
            if seen[start] {
                continue;
            }
            seen[start] = true;
            let mut comp = vec![start];
            let mut queue = VecDeque::from([start]);
            while let Some(f) = queue.pop_front() {
                for l in &self.dual[f] {
                    if !seen[l.face] {
                        seen[l.face] = true;
                        comp.push(l.face);
                        queue.push_back(l.face);
                    }
                }
            }
            comp.sort_unstable();
            out.push(comp);
        }
        out
    }
}

impl Polyhedron {
    pub fn adjacency(&self) -> Adjacency {
        Adjacency::build(self)
    }
}
