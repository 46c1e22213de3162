//! Structural checks that never fail: everything found goes into an `AnomalyLog`.

use std::collections::HashMap;

use super::adjacency::Adjacency;
use super::types::Polyhedron;
use crate::cfg::{AREA_EPS, PLANAR_EPS};
use crate::error::{Anomaly, AnomalyLog};

impl Polyhedron {
    /// Report non-manifold edges, disconnected components, degenerate,
    /// duplicate, and non-planar faces, and winding mismatches.
    pub fn validate(&self) -> AnomalyLog {
        let mut log = AnomalyLog::new();
        if self.faces.is_empty() {
            return log;
        }
        let adj = Adjacency::build(self);
        adj.log_non_manifold(&mut log);

        let comps = adj.components();
        for (ci, comp) in comps.iter().enumerate().skip(1) {
            log.push(Anomaly::DisconnectedComponent {
                component: ci,
                faces: comp.len(),
                first_face: comp[0],
            });
        }

        let mut seen: HashMap<Vec<usize>, usize> = HashMap::new();
        for fi in 0..self.faces.len() {
            let d = self.face_diameter(fi);
            let area = self.face_area(fi);
            if area <= AREA_EPS * d * d {
                log.push(Anomaly::DegenerateFace { face: fi, area });
            } else {
                let dev = self.face_planarity_deviation(fi);
                if dev > PLANAR_EPS * d {
                    log.push(Anomaly::NonPlanarFace {
                        face: fi,
                        deviation: dev,
                    });
                }
            }
            let mut key = self.faces[fi].points.clone();
            key.sort_unstable();
            if let Some(&first) = seen.get(&key) {
                log.push(Anomaly::DuplicateFace {
                    face: fi,
                    duplicate_of: first,
                });
            } else {
                seen.insert(key, fi);
            }
        }

        for e in adj.edges.iter().filter(|e| e.is_interior()) {
            let (x, y) = (e.faces[0], e.faces[1]);
            if same_direction(self, x.face, x.side, y.face, y.side) {
                log.push(Anomaly::InconsistentWinding {
                    edge: e.key.ends(),
                    faces: [x.face, y.face],
                });
            }
        }
        tracing::debug!(anomalies = log.len(), "validated polyhedron");
        log
    }

    /// True when every interior edge is traversed in opposite directions by its two faces.
    pub fn is_consistently_wound(&self) -> bool {
        let adj = Adjacency::build(self);
        adj.edges
            .iter()
            .filter(|e| e.is_interior())
            .all(|e| {
                let (x, y) = (e.faces[0], e.faces[1]);
                !same_direction(self, x.face, x.side, y.face, y.side)
            })
    }
}

/// Both faces traverse the shared side in the same direction.
pub(crate) fn same_direction(poly: &Polyhedron, f: usize, s: usize, g: usize, t: usize) -> bool {
    poly.faces[f].side(s).0 == poly.faces[g].side(t).0
}
