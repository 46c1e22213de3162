//! Incremental unwrapper.
//!
//! Algorithm
//! - `anchor(f)` places a face (identity for the first; later anchors go to the
//!   right of the current net) and queues it.
//! - `unwrap_edge(a, b)` folds across one model edge when exactly one of its two
//!   faces is placed.
//! - `step()` dequeues the oldest queued face and places every unvisited dual
//!   neighbor (ascending face index), queueing them in turn. `total_unwrap()`
//!   runs this breadth-first expansion to completion.
//! - `finish()` reports unreached faces (or anchors further components), then
//!   draws one cut line per non-fold edge touching a placed face.
//!
//! A child reuses its parent's net points for the two fold-edge endpoints; all
//! its other points are new. Every net face records its hinge, so the spanning
//! tree is recoverable from the net alone.

use std::collections::VecDeque;

use super::align::{component_offset, hinge_transform};
use super::types::{FaceState, UnwrapStats};
use crate::error::{Anomaly, AnomalyLog, PolyError, PolyResult};
use crate::geom2::{Affine2, BBox2};
use crate::net::{Hinge, LineKind, NetFace, NetGraph, NetLine};
use crate::poly3::{Adjacency, DualLink, FaceChart, Polyhedron};

#[derive(Clone, Debug)]
struct Placement {
    net_face: usize,
    flipped: bool,
    /// Net point index for each position of the model face.
    net_points: Vec<usize>,
}

pub struct Unwrapper<'a> {
    poly: &'a Polyhedron,
    adj: Adjacency,
    charts: Vec<Option<FaceChart>>,
    state: Vec<FaceState>,
    placed: Vec<Option<Placement>>,
    fold_edge: Vec<bool>,
    queue: VecDeque<usize>,
    net: NetGraph,
    log: AnomalyLog,
    all_components: bool,
    components: Vec<Vec<usize>>,
    anchors: usize,
}

impl<'a> Unwrapper<'a> {
    /// Prepare an unwrap of `poly`. Fails only on empty input.
    ///
    /// Non-manifold edges and faces without a usable chart are logged here.
    pub fn new(poly: &'a Polyhedron) -> PolyResult<Self> {
        if poly.points.is_empty() {
            return Err(PolyError::EmptyInput { what: "points" });
        }
        if poly.faces.is_empty() {
            return Err(PolyError::EmptyInput { what: "faces" });
        }
        let adj = Adjacency::build(poly);
        let mut log = AnomalyLog::new();
        adj.log_non_manifold(&mut log);
        let n = poly.faces.len();
        let mut state = vec![FaceState::Unvisited; n];
        let mut charts = Vec::with_capacity(n);
        for (f, st) in state.iter_mut().enumerate() {
            match poly.face_chart(f) {
                Ok(c) => charts.push(Some(c)),
                Err(e) => {
                    log.push(Anomaly::SkippedFace {
                        face: f,
                        reason: e.to_string(),
                    });
                    *st = FaceState::Skipped;
                    charts.push(None);
                }
            }
        }
        let components = adj.components();
        let net = NetGraph {
            name: poly.name.as_ref().map(|s| format!("{s} net")),
            source: poly.name.clone(),
            ..NetGraph::default()
        };
        Ok(Self {
            poly,
            fold_edge: vec![false; adj.edges.len()],
            adj,
            charts,
            state,
            placed: vec![None; n],
            queue: VecDeque::new(),
            net,
            log,
            all_components: false,
            components,
            anchors: 0,
        })
    }

    /// Anchor every dual-graph component at `finish`, not just the first.
    pub fn with_all_components(mut self, on: bool) -> Self {
        self.all_components = on;
        self
    }

    #[inline]
    pub fn state(&self, face: usize) -> FaceState {
        self.state[face]
    }

    #[inline]
    pub fn adjacency(&self) -> &Adjacency {
        &self.adj
    }

    /// Net built so far (no cut lines until `finish`).
    #[inline]
    pub fn net(&self) -> &NetGraph {
        &self.net
    }

    #[inline]
    pub fn log(&self) -> &AnomalyLog {
        &self.log
    }

    /// Place `face` as the root of a new spanning tree.
    ///
    /// Returns `Ok(false)` if the face is already placed or has no chart.
    pub fn anchor(&mut self, face: usize) -> PolyResult<bool> {
        let count = self.poly.faces.len();
        if face >= count {
            return Err(PolyError::FaceOutOfRange { face, count });
        }
        if self.state[face] != FaceState::Unvisited {
            return Ok(false);
        }
        let Some(chart) = self.charts[face].as_ref() else {
            return Ok(false);
        };
        let basis = match self.net.find_bbox() {
            None => Affine2::identity(),
            Some(net_bb) => match BBox2::from_points(chart.points.iter().copied()) {
                Some(chart_bb) => component_offset(&net_bb, &chart_bb),
                None => Affine2::identity(),
            },
        };
        tracing::debug!(face, "anchoring face");
        self.place(face, basis, false, None);
        self.anchors += 1;
        Ok(true)
    }

    /// Lowest usable face in the same component as `face` (itself if usable).
    pub fn fallback_anchor(&self, face: usize) -> Option<usize> {
        let comp = self.components.iter().find(|c| c.contains(&face))?;
        comp.iter()
            .copied()
            .find(|&f| self.state[f] == FaceState::Unvisited)
    }

    /// Fold across model edge `a–b`.
    ///
    /// Applied only when exactly one of the edge's two faces is placed; anything
    /// else is logged as `SkippedOrderEdge`. Returns whether a face was placed.
    pub fn unwrap_edge(&mut self, a: usize, b: usize) -> bool {
        let edge = [a, b];
        let Some(eid) = self.adj.edge_id(a, b) else {
            self.skip_order_edge(edge, "not an edge of the model");
            return false;
        };
        let e = &self.adj.edges[eid];
        if !e.is_interior() {
            self.skip_order_edge(edge, "edge is not shared by exactly two faces");
            return false;
        }
        let (x, y) = (e.faces[0], e.faces[1]);
        let (parent, link) = match (
            self.state[x.face].is_placed(),
            self.state[y.face].is_placed(),
        ) {
            (true, false) => (
                x.face,
                DualLink {
                    face: y.face,
                    edge: eid,
                    side: x.side,
                    other_side: y.side,
                },
            ),
            (false, true) => (
                y.face,
                DualLink {
                    face: x.face,
                    edge: eid,
                    side: y.side,
                    other_side: x.side,
                },
            ),
            (true, true) => {
                self.skip_order_edge(edge, "both faces already placed");
                return false;
            }
            (false, false) => {
                self.skip_order_edge(edge, "neither face is placed");
                return false;
            }
        };
        if self.state[link.face] == FaceState::Skipped {
            self.skip_order_edge(edge, "face has no usable chart");
            return false;
        }
        if !self.attach(parent, &link) {
            self.skip_order_edge(edge, "fold edge has zero length");
            return false;
        }
        true
    }

    /// Expand the oldest queued face. Returns it, or None when the queue is empty.
    pub fn step(&mut self) -> Option<usize> {
        let face = self.queue.pop_front()?;
        self.state[face] = FaceState::Placed;
        let links = self.adj.dual[face].clone();
        for link in &links {
            if self.state[link.face] == FaceState::Unvisited {
                self.attach(face, link);
            }
        }
        Some(face)
    }

    /// Breadth-first expansion until the queue is empty.
    pub fn total_unwrap(&mut self) {
        while self.step().is_some() {}
    }

    pub fn finish(self) -> (NetGraph, AnomalyLog) {
        let (net, log, _) = self.finish_with_stats();
        (net, log)
    }

    pub fn finish_with_stats(mut self) -> (NetGraph, AnomalyLog, UnwrapStats) {
        self.total_unwrap();
        if self.all_components || self.anchors == 0 {
            while let Some(f) = self.next_unvisited() {
                if self.anchor(f).unwrap_or(false) {
                    self.total_unwrap();
                }
                if !self.all_components {
                    break;
                }
            }
        }
        self.report_unreached();
        let boundary_cuts = self.emit_cuts();

        let stats = UnwrapStats {
            faces_placed: self.net.faces.len(),
            faces_skipped: self
                .state
                .iter()
                .filter(|s| **s == FaceState::Skipped)
                .count(),
            folds: self.net.fold_lines().count(),
            cuts: self.net.cut_lines().count(),
            boundary_cuts,
            flipped_faces: self.net.faces.iter().filter(|f| f.flipped).count(),
            components: self.components.len(),
            components_unwrapped: self.anchors,
        };
        tracing::info!(
            faces = stats.faces_placed,
            folds = stats.folds,
            cuts = stats.cuts,
            anomalies = self.log.len(),
            "unwrapped polyhedron"
        );
        (self.net, self.log, stats)
    }

    fn next_unvisited(&self) -> Option<usize> {
        self.state.iter().position(|s| *s == FaceState::Unvisited)
    }

    fn skip_order_edge(&mut self, edge: [usize; 2], reason: &str) {
        self.log.push(Anomaly::SkippedOrderEdge {
            edge,
            reason: reason.to_string(),
        });
    }

    /// Place `link.face` across the shared edge of placed face `parent`.
    fn attach(&mut self, parent: usize, link: &DualLink) -> bool {
        let child = link.face;
        let (Some(pchart), Some(cchart), Some(pp)) = (
            self.charts[parent].as_ref(),
            self.charts[child].as_ref(),
            self.placed[parent].as_ref(),
        ) else {
            return false;
        };
        let pn = pchart.points.len();
        let cn = cchart.points.len();
        let (ps, cs) = (link.side, link.other_side);
        let (pa, pb) = self.poly.faces[parent].side(ps);
        let (ca, _) = self.poly.faces[child].side(cs);
        let inconsistent = ca == pa;
        // Chart positions of the child's copies of pa and pb.
        let (c_pa, c_pb) = if inconsistent {
            (cchart.points[cs], cchart.points[(cs + 1) % cn])
        } else {
            (cchart.points[(cs + 1) % cn], cchart.points[cs])
        };
        let (np_a, np_b) = (pp.net_points[ps], pp.net_points[(ps + 1) % pn]);
        let (net_a, net_b) = (self.net.points[np_a].pos, self.net.points[np_b].pos);
        let mirror = pp.flipped ^ inconsistent;
        let Some(basis) = hinge_transform(c_pa, c_pb, net_a, net_b, mirror) else {
            tracing::debug!(parent, child, "zero-length fold edge");
            return false;
        };
        if inconsistent {
            self.log.push(Anomaly::InconsistentWinding {
                edge: [pa.min(pb), pa.max(pb)],
                faces: [parent, child],
            });
        }
        let shared = if inconsistent {
            [(cs, np_a), ((cs + 1) % cn, np_b)]
        } else {
            [(cs, np_b), ((cs + 1) % cn, np_a)]
        };
        let hinge = Hinge {
            parent: pp.net_face,
            side: cs,
            parent_side: ps,
        };
        self.place(child, basis, mirror, Some((hinge, shared)));
        self.fold_edge[link.edge] = true;
        self.net.lines.push(NetLine::segment(
            np_a,
            np_b,
            LineKind::Fold,
            Some(self.adj.edges[link.edge].key),
        ));
        tracing::debug!(parent, child, mirror, "folded face");
        true
    }

    fn place(
        &mut self,
        face: usize,
        basis: Affine2,
        flipped: bool,
        hinge: Option<(Hinge, [(usize, usize); 2])>,
    ) {
        let Some(chart) = self.charts[face].as_ref() else {
            return;
        };
        let src = &self.poly.faces[face];
        let mut net_points = vec![usize::MAX; chart.points.len()];
        if let Some((_, shared)) = &hinge {
            for &(pos, np) in shared {
                net_points[pos] = np;
            }
        }
        for (k, np) in net_points.iter_mut().enumerate() {
            if *np == usize::MAX {
                *np = self
                    .net
                    .add_point(basis.apply(chart.points[k]), Some(src.points[k]));
            }
        }
        let net_face = self.net.faces.len();
        self.net.faces.push(NetFace {
            points: net_points.clone(),
            original: Some(face),
            basis,
            hinge: hinge.map(|(h, _)| h),
            class: src.class,
            flipped,
            align: None,
        });
        self.placed[face] = Some(Placement {
            net_face,
            flipped,
            net_points,
        });
        self.state[face] = FaceState::Queued;
        self.queue.push_back(face);
    }

    fn report_unreached(&mut self) {
        let mut pending = Vec::new();
        for (ci, comp) in self.components.iter().enumerate() {
            let any_placed = comp.iter().any(|&f| self.state[f].is_placed());
            let any_open = comp.iter().any(|&f| self.state[f] == FaceState::Unvisited);
            if !any_placed && any_open {
                pending.push(Anomaly::DisconnectedComponent {
                    component: ci,
                    faces: comp.len(),
                    first_face: comp[0],
                });
            }
        }
        for a in pending {
            self.log.push(a);
        }
        for f in 0..self.state.len() {
            if self.state[f] == FaceState::Unvisited {
                self.log.push(Anomaly::UnreachableFace { face: f });
            }
        }
    }

    /// One cut per non-fold edge touching a placed face, drawn on the earliest
    /// placed incident face. Returns the number of boundary cuts.
    fn emit_cuts(&mut self) -> usize {
        let mut boundary = 0;
        for (eid, e) in self.adj.edges.iter().enumerate() {
            if self.fold_edge[eid] {
                continue;
            }
            let first = e
                .faces
                .iter()
                .filter_map(|inc| self.placed[inc.face].as_ref().map(|p| (p, inc.side)))
                .min_by_key(|(p, _)| p.net_face);
            let Some((p, side)) = first else {
                continue;
            };
            let n = p.net_points.len();
            self.net.lines.push(NetLine::segment(
                p.net_points[side],
                p.net_points[(side + 1) % n],
                LineKind::Cut,
                Some(e.key),
            ));
            if e.is_boundary() {
                boundary += 1;
            }
        }
        boundary
    }
}
