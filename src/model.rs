use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, delta: Point) -> Self {
        Self {
            x: self.x + delta.x,
            y: self.y + delta.y,
        }
    }

    pub fn delta_to(self, other: Point) -> Point {
        Point {
            x: other.x - self.x,
            y: other.y - self.y,
        }
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Vertex {
    pub id: u64,
    pub position: Point,
}

/// A single wall segment between two vertices.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Edge {
    pub id: u64,
    #[serde(rename = "vertex_id_a")]
    pub vertex_a: u64,
    #[serde(rename = "vertex_id_b")]
    pub vertex_b: u64,
}

impl Edge {
    pub fn touches(&self, vertex: u64) -> bool {
        self.vertex_a == vertex || self.vertex_b == vertex
    }

    fn joins(&self, a: u64, b: u64) -> bool {
        (self.vertex_a == a && self.vertex_b == b) || (self.vertex_a == b && self.vertex_b == a)
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Alphabet {
    #[default]
    Regular,
    Braille,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Label {
    pub id: u64,
    pub text: String,
    pub position: Point,
    #[serde(default)]
    pub alphabet: Alphabet,
    pub size: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    Vertex,
    Edge,
    Label,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Vertex => write!(f, "vertex"),
            EntityKind::Edge => write!(f, "edge"),
            EntityKind::Label => write!(f, "label"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GraphError {
    /// Self-loop, unknown endpoint, or an existing wall between the same vertices.
    InvalidEdge { a: u64, b: u64 },
    MissingEntity { kind: EntityKind, id: u64 },
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphError::InvalidEdge { a, b } => write!(f, "invalid edge {a} -> {b}"),
            GraphError::MissingEntity { kind, id } => write!(f, "missing {kind} {id}"),
        }
    }
}

impl std::error::Error for GraphError {}

/// Vertices, walls and labels keyed by id. Every operation returns a new
/// graph; committed values are never mutated in place.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Graph {
    vertices: BTreeMap<u64, Vertex>,
    edges: BTreeMap<u64, Edge>,
    labels: BTreeMap<u64, Label>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.edges.is_empty() && self.labels.is_empty()
    }

    pub fn vertex(&self, id: u64) -> Option<&Vertex> {
        self.vertices.get(&id)
    }

    pub fn edge(&self, id: u64) -> Option<&Edge> {
        self.edges.get(&id)
    }

    pub fn label(&self, id: u64) -> Option<&Label> {
        self.labels.get(&id)
    }

    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.values()
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    pub fn labels(&self) -> impl Iterator<Item = &Label> {
        self.labels.values()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    /// Endpoint positions of an edge, or `MissingEntity` naming the first absent vertex.
    pub fn edge_endpoints(&self, edge: &Edge) -> Result<(Point, Point), GraphError> {
        let a = self
            .vertices
            .get(&edge.vertex_a)
            .ok_or(GraphError::MissingEntity {
                kind: EntityKind::Vertex,
                id: edge.vertex_a,
            })?;
        let b = self
            .vertices
            .get(&edge.vertex_b)
            .ok_or(GraphError::MissingEntity {
                kind: EntityKind::Vertex,
                id: edge.vertex_b,
            })?;
        Ok((a.position, b.position))
    }

    pub fn has_edge_between(&self, a: u64, b: u64) -> bool {
        self.edges.values().any(|e| e.joins(a, b))
    }

    /// One past the largest id in use by any entity, or 0 for an empty graph.
    pub fn next_id(&self) -> u64 {
        let max = [
            self.vertices.keys().next_back(),
            self.edges.keys().next_back(),
            self.labels.keys().next_back(),
        ]
        .into_iter()
        .flatten()
        .max();
        max.map_or(0, |m| m + 1)
    }

    pub fn add_vertex(&self, position: Point) -> (Graph, u64) {
        let id = self.next_id();
        let mut next = self.clone();
        next.vertices.insert(id, Vertex { id, position });
        (next, id)
    }

    pub fn add_edge(&self, a: u64, b: u64) -> Result<(Graph, u64), GraphError> {
        if a == b
            || !self.vertices.contains_key(&a)
            || !self.vertices.contains_key(&b)
            || self.has_edge_between(a, b)
        {
            return Err(GraphError::InvalidEdge { a, b });
        }
        let id = self.next_id();
        let mut next = self.clone();
        next.edges.insert(
            id,
            Edge {
                id,
                vertex_a: a,
                vertex_b: b,
            },
        );
        Ok((next, id))
    }

    pub fn remove_vertex(&self, id: u64) -> Graph {
        self.remove_vertices(&BTreeSet::from([id]))
    }

    /// Removes the given vertices together with every wall touching them.
    pub fn remove_vertices(&self, ids: &BTreeSet<u64>) -> Graph {
        let mut next = self.clone();
        next.vertices.retain(|id, _| !ids.contains(id));
        next.edges
            .retain(|_, e| !ids.contains(&e.vertex_a) && !ids.contains(&e.vertex_b));
        next
    }

    /// Folds `drop` into `keep`. Walls collapsing to a point or duplicating an
    /// existing wall are removed instead of rewritten.
    pub fn merge_vertices(&self, keep: u64, drop: u64) -> Graph {
        if keep == drop || !self.vertices.contains_key(&keep) || !self.vertices.contains_key(&drop)
        {
            return self.clone();
        }
        let mut next = self.clone();
        next.vertices.remove(&drop);

        let touching: Vec<Edge> = self.edges.values().filter(|e| e.touches(drop)).copied().collect();
        for edge in touching {
            next.edges.remove(&edge.id);
            let other = if edge.vertex_a == drop {
                edge.vertex_b
            } else {
                edge.vertex_a
            };
            if other == keep || other == drop || next.has_edge_between(keep, other) {
                continue;
            }
            let rewritten = if edge.vertex_a == drop {
                Edge {
                    vertex_a: keep,
                    ..edge
                }
            } else {
                Edge {
                    vertex_b: keep,
                    ..edge
                }
            };
            next.edges.insert(edge.id, rewritten);
        }
        next
    }

    /// Writes the given positions back; ids without a vertex are ignored.
    pub fn move_vertices(&self, positions: &BTreeMap<u64, Point>) -> Graph {
        let mut next = self.clone();
        for (id, pos) in positions {
            if let Some(v) = next.vertices.get_mut(id) {
                v.position = *pos;
            }
        }
        next
    }

    pub fn with_vertex_offset(&self, ids: &BTreeSet<u64>, delta: Point) -> Graph {
        let positions: BTreeMap<u64, Point> = ids
            .iter()
            .filter_map(|id| self.vertices.get(id).map(|v| (*id, v.position.offset(delta))))
            .collect();
        self.move_vertices(&positions)
    }

    pub fn add_label(
        &self,
        text: impl Into<String>,
        position: Point,
        alphabet: Alphabet,
        size: f64,
    ) -> (Graph, u64) {
        let id = self.next_id();
        let mut next = self.clone();
        next.labels.insert(
            id,
            Label {
                id,
                text: text.into(),
                position,
                alphabet,
                size,
            },
        );
        (next, id)
    }

    pub fn update_label_text(&self, id: u64, text: impl Into<String>) -> Graph {
        let mut next = self.clone();
        if let Some(label) = next.labels.get_mut(&id) {
            label.text = text.into();
        }
        next
    }

    pub fn move_label(&self, id: u64, position: Point) -> Graph {
        let mut next = self.clone();
        if let Some(label) = next.labels.get_mut(&id) {
            label.position = position;
        }
        next
    }

    pub fn remove_label(&self, id: u64) -> Graph {
        let mut next = self.clone();
        next.labels.remove(&id);
        next
    }

    /// Inserts entities with their own ids, used when rebuilding from files.
    pub(crate) fn insert_vertex(&mut self, vertex: Vertex) {
        self.vertices.insert(vertex.id, vertex);
    }

    pub(crate) fn insert_edge(&mut self, edge: Edge) {
        self.edges.insert(edge.id, edge);
    }

    pub(crate) fn insert_label(&mut self, label: Label) {
        self.labels.insert(label.id, label);
    }

    /// Every edge endpoint that does not resolve to a vertex.
    pub fn validate(&self) -> Vec<GraphError> {
        let mut errors = Vec::new();
        for edge in self.edges.values() {
            for id in [edge.vertex_a, edge.vertex_b] {
                if !self.vertices.contains_key(&id) {
                    errors.push(GraphError::MissingEntity {
                        kind: EntityKind::Vertex,
                        id,
                    });
                }
            }
            if edge.vertex_a == edge.vertex_b {
                errors.push(GraphError::InvalidEdge {
                    a: edge.vertex_a,
                    b: edge.vertex_b,
                });
            }
        }
        errors
    }

    /// Drops edges that `validate` would report, so the rest of the editor
    /// can rely on every wall having two distinct endpoints.
    pub fn without_dangling_edges(&self) -> Graph {
        let mut next = self.clone();
        next.edges.retain(|_, e| {
            e.vertex_a != e.vertex_b
                && self.vertices.contains_key(&e.vertex_a)
                && self.vertices.contains_key(&e.vertex_b)
        });
        next
    }

    /// Merges every vertex lying strictly within `radius` of a lower-id
    /// vertex into it. The lower id keeps its position. Afterwards no two
    /// vertices are closer than `radius`.
    pub fn merge_near_vertices(&self, radius: f64) -> Graph {
        let mut next = self.clone();
        if radius.is_nan() || radius <= 0.0 {
            return next;
        }
        let ids: Vec<u64> = self.vertices.keys().copied().collect();
        for (i, &keep) in ids.iter().enumerate() {
            let Some(anchor) = next.vertices.get(&keep).map(|v| v.position) else {
                continue;
            };
            for &drop in &ids[i + 1..] {
                let close = next.vertices.get(&drop).is_some_and(|v| {
                    (v.position.x - anchor.x).hypot(v.position.y - anchor.y) < radius
                });
                if close {
                    next = next.merge_vertices(keep, drop);
                }
            }
        }
        next
    }

    /// Snaps walls within `threshold_rad` of horizontal or vertical onto that
    /// axis through their midpoint. Walls are visited in id order, so a later
    /// wall may pull a shared corner off an earlier one.
    pub fn orthogonalize(&self, threshold_rad: f64) -> Graph {
        use std::f64::consts::FRAC_PI_2;

        let mut next = self.clone();
        for edge in self.edges.values() {
            let Ok((a, b)) = next.edge_endpoints(edge) else {
                continue;
            };
            // between -pi/2 and pi/2; NaN for a zero-length wall
            let angle = ((b.y - a.y) / (b.x - a.x)).atan();
            let (a, b) = if (FRAC_PI_2 - angle).abs() < threshold_rad
                || (-FRAC_PI_2 - angle).abs() < threshold_rad
            {
                let x = (a.x + b.x) / 2.0;
                (Point { x, ..a }, Point { x, ..b })
            } else if angle.abs() < threshold_rad {
                let y = (a.y + b.y) / 2.0;
                (Point { y, ..a }, Point { y, ..b })
            } else {
                continue;
            };
            next = next.move_vertices(&BTreeMap::from([(edge.vertex_a, a), (edge.vertex_b, b)]));
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn square() -> Graph {
        let g = Graph::new();
        let (g, a) = g.add_vertex(Point::new(0.0, 0.0));
        let (g, b) = g.add_vertex(Point::new(1.0, 0.0));
        let (g, c) = g.add_vertex(Point::new(1.0, 1.0));
        let (g, d) = g.add_vertex(Point::new(0.0, 1.0));
        let (g, _) = g.add_edge(a, b).unwrap();
        let (g, _) = g.add_edge(b, c).unwrap();
        let (g, _) = g.add_edge(c, d).unwrap();
        let (g, _) = g.add_edge(d, a).unwrap();
        g
    }

    #[test]
    fn ids_are_allocated_past_the_maximum() {
        let g = Graph::new();
        assert_eq!(g.next_id(), 0);
        let (g, a) = g.add_vertex(Point::ZERO);
        let (g, b) = g.add_vertex(Point::new(5.0, 0.0));
        let (g, e) = g.add_edge(a, b).unwrap();
        assert_eq!((a, b, e), (0, 1, 2));
        let g = g.remove_vertex(b);
        assert_eq!(g.next_id(), 1);
    }

    #[test]
    fn add_edge_refuses_self_loops_missing_and_duplicates() {
        let (g, a) = Graph::new().add_vertex(Point::ZERO);
        let (g, b) = g.add_vertex(Point::new(1.0, 0.0));
        assert_eq!(g.add_edge(a, a), Err(GraphError::InvalidEdge { a, b: a }));
        assert!(g.add_edge(a, 42).is_err());
        let (g, _) = g.add_edge(a, b).unwrap();
        assert!(g.add_edge(b, a).is_err());
    }

    #[test]
    fn remove_vertex_cascades_to_edges() {
        let g = square();
        let g2 = g.remove_vertex(0);
        assert_eq!(g2.vertex_count(), 3);
        assert_eq!(g2.edge_count(), 2);
        assert!(g2.edges().all(|e| !e.touches(0)));
        assert_eq!(g.vertex_count(), 4, "input graph is untouched");
    }

    #[test]
    fn merging_connected_pair_collapses_the_wall() {
        let (g, a) = Graph::new().add_vertex(Point::ZERO);
        let (g, b) = g.add_vertex(Point::new(5.0, 0.0));
        let (g, _) = g.add_edge(a, b).unwrap();
        let merged = g.merge_vertices(b, a);
        assert_eq!(merged.vertices().map(|v| v.id).collect::<Vec<_>>(), vec![1]);
        assert_eq!(merged.edge_count(), 0);
    }

    #[test]
    fn merging_rewrites_and_deduplicates() {
        // a - b - c, plus a second vertex d joined to c; merge d into a.
        let (g, a) = Graph::new().add_vertex(Point::ZERO);
        let (g, b) = g.add_vertex(Point::new(1.0, 0.0));
        let (g, c) = g.add_vertex(Point::new(2.0, 0.0));
        let (g, d) = g.add_vertex(Point::new(3.0, 0.0));
        let (g, _) = g.add_edge(a, b).unwrap();
        let (g, _) = g.add_edge(b, c).unwrap();
        let (g, dc) = g.add_edge(d, c).unwrap();
        let (g, db) = g.add_edge(d, b).unwrap();

        let merged = g.merge_vertices(a, d);
        assert!(merged.vertex(d).is_none());
        let rewritten = merged.edge(dc).unwrap();
        assert_eq!((rewritten.vertex_a, rewritten.vertex_b), (a, c));
        assert!(merged.edge(db).is_none(), "duplicate of a-b is dropped");
        assert!(merged.validate().is_empty());
    }

    #[test]
    fn merge_into_self_is_a_no_op() {
        let g = square();
        assert_eq!(g.merge_vertices(1, 1), g);
        assert_eq!(g.merge_vertices(1, 99), g);
    }

    #[test]
    fn labels_share_the_id_space() {
        let g = square();
        let (g, id) = g.add_label("Kitchen", Point::new(0.5, 0.5), Alphabet::Regular, 12.0);
        assert_eq!(id, 8);
        let g = g.update_label_text(id, "Hall").move_label(id, Point::new(2.0, 2.0));
        let label = g.label(id).unwrap();
        assert_eq!(label.text, "Hall");
        assert_eq!(label.position, Point::new(2.0, 2.0));
        let (_, v) = g.add_vertex(Point::ZERO);
        assert_eq!(v, 9);
        assert_eq!(g.remove_label(id).label_count(), 0);
    }

    #[test]
    fn dangling_edges_are_reported_and_dropped() {
        let mut g = square();
        g.insert_edge(Edge {
            id: 50,
            vertex_a: 0,
            vertex_b: 77,
        });
        assert_eq!(
            g.validate(),
            vec![GraphError::MissingEntity {
                kind: EntityKind::Vertex,
                id: 77
            }]
        );
        let clean = g.without_dangling_edges();
        assert!(clean.edge(50).is_none());
        assert_eq!(clean.edge_count(), 4);
    }

    #[test]
    fn near_vertices_collapse_into_the_lowest_id() {
        // two walls whose shared corner was written twice, 1 cm apart
        let (g, a) = Graph::new().add_vertex(Point::new(0.0, 0.0));
        let (g, b) = g.add_vertex(Point::new(2.0, 0.0));
        let (g, c) = g.add_vertex(Point::new(2.01, 0.0));
        let (g, d) = g.add_vertex(Point::new(2.0, 3.0));
        let (g, _) = g.add_edge(a, b).unwrap();
        let (g, cd) = g.add_edge(c, d).unwrap();
        let (g, bc) = g.add_edge(b, c).unwrap();

        let merged = g.merge_near_vertices(0.05);
        assert_eq!(merged.vertices().map(|v| v.id).collect::<Vec<_>>(), vec![a, b, d]);
        assert_eq!(merged.vertex(b).unwrap().position, Point::new(2.0, 0.0));
        assert!(merged.edge(bc).is_none(), "wall between the merged pair collapses");
        let e = merged.edge(cd).unwrap();
        assert_eq!((e.vertex_a, e.vertex_b), (b, d));
        assert_eq!(merged.edge_count(), 2);

        assert_eq!(g.merge_near_vertices(0.0), g);
        assert_eq!(g.merge_near_vertices(f64::NAN), g);
    }

    #[test]
    fn near_merge_drops_duplicate_walls() {
        // a-b and a'-b' on top of each other
        let (g, a) = Graph::new().add_vertex(Point::new(0.0, 0.0));
        let (g, b) = g.add_vertex(Point::new(1.0, 0.0));
        let (g, a2) = g.add_vertex(Point::new(0.0, 0.001));
        let (g, b2) = g.add_vertex(Point::new(1.0, 0.001));
        let (g, _) = g.add_edge(a, b).unwrap();
        let (g, _) = g.add_edge(a2, b2).unwrap();
        let merged = g.merge_near_vertices(0.01);
        assert_eq!(merged.vertex_count(), 2);
        assert_eq!(merged.edge_count(), 1);
        assert!(merged.has_edge_between(a, b));
    }

    #[test]
    fn orthogonalize_snaps_nearly_straight_walls() {
        let (g, a) = Graph::new().add_vertex(Point::new(0.0, 0.0));
        let (g, b) = g.add_vertex(Point::new(4.0, 0.25));
        let (g, c) = g.add_vertex(Point::new(10.0, 10.0));
        let (g, d) = g.add_vertex(Point::new(10.25, 14.0));
        let (g, e) = g.add_vertex(Point::new(20.0, 0.0));
        let (g, f) = g.add_vertex(Point::new(23.0, 3.0));
        let (g, _) = g.add_edge(a, b).unwrap();
        let (g, _) = g.add_edge(c, d).unwrap();
        let (g, _) = g.add_edge(e, f).unwrap();

        let snapped = g.orthogonalize(0.1);
        let pos = |id| snapped.vertex(id).unwrap().position;
        assert_eq!(pos(a), Point::new(0.0, 0.125));
        assert_eq!(pos(b), Point::new(4.0, 0.125));
        assert_eq!(pos(c), Point::new(10.125, 10.0));
        assert_eq!(pos(d), Point::new(10.125, 14.0));
        assert_eq!(pos(e), Point::new(20.0, 0.0), "45 degree wall is left alone");
        assert_eq!(pos(f), Point::new(23.0, 3.0));
    }

    #[test]
    fn orthogonalize_ignores_zero_length_walls() {
        let mut g = Graph::new();
        g.insert_vertex(Vertex { id: 0, position: Point::new(1.0, 1.0) });
        g.insert_vertex(Vertex { id: 1, position: Point::new(1.0, 1.0) });
        g.insert_edge(Edge { id: 2, vertex_a: 0, vertex_b: 1 });
        assert_eq!(g.orthogonalize(0.2), g);
    }

    #[derive(Clone, Debug)]
    enum Op {
        AddVertex(i16, i16),
        AddEdge(u8, u8),
        RemoveVertex(u8),
        Merge(u8, u8),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (any::<i16>(), any::<i16>()).prop_map(|(x, y)| Op::AddVertex(x, y)),
            (any::<u8>(), any::<u8>()).prop_map(|(a, b)| Op::AddEdge(a, b)),
            any::<u8>().prop_map(Op::RemoveVertex),
            (any::<u8>(), any::<u8>()).prop_map(|(a, b)| Op::Merge(a, b)),
        ]
    }

    fn pick(g: &Graph, idx: u8) -> Option<u64> {
        let ids: Vec<u64> = g.vertices().map(|v| v.id).collect();
        if ids.is_empty() {
            None
        } else {
            Some(ids[idx as usize % ids.len()])
        }
    }

    proptest! {
        #[test]
        fn random_edits_keep_edges_valid(ops in proptest::collection::vec(op_strategy(), 1..60)) {
            let mut g = Graph::new();
            for op in ops {
                g = match op {
                    Op::AddVertex(x, y) => g.add_vertex(Point::new(x as f64 * 0.1, y as f64 * 0.1)).0,
                    Op::AddEdge(a, b) => match (pick(&g, a), pick(&g, b)) {
                        (Some(a), Some(b)) => match g.add_edge(a, b) {
                            Ok((next, _)) => next,
                            Err(_) => g,
                        },
                        _ => g,
                    },
                    Op::RemoveVertex(a) => match pick(&g, a) {
                        Some(id) => {
                            let next = g.remove_vertex(id);
                            prop_assert!(next.edges().all(|e| !e.touches(id)));
                            next
                        }
                        None => g,
                    },
                    Op::Merge(a, b) => match (pick(&g, a), pick(&g, b)) {
                        (Some(a), Some(b)) => g.merge_vertices(a, b),
                        _ => g,
                    },
                };
                prop_assert!(g.validate().is_empty());
                prop_assert!(g.edges().all(|e| e.vertex_a != e.vertex_b));
            }
        }

        #[test]
        fn near_merge_leaves_no_close_pairs(
            points in proptest::collection::vec((0u8..40, 0u8..40), 1..30),
            walls in proptest::collection::vec((any::<u8>(), any::<u8>()), 0..30),
            radius in 0.05f64..0.5,
        ) {
            let mut g = Graph::new();
            for (x, y) in points {
                g = g.add_vertex(Point::new(x as f64 * 0.1, y as f64 * 0.1)).0;
            }
            for (a, b) in walls {
                if let (Some(a), Some(b)) = (pick(&g, a), pick(&g, b)) {
                    if let Ok((next, _)) = g.add_edge(a, b) {
                        g = next;
                    }
                }
            }
            let merged = g.merge_near_vertices(radius);
            let vs: Vec<Vertex> = merged.vertices().copied().collect();
            for (i, a) in vs.iter().enumerate() {
                prop_assert_eq!(Some(a), g.vertex(a.id), "survivors keep their position");
                for b in &vs[i + 1..] {
                    let d = (a.position.x - b.position.x).hypot(a.position.y - b.position.y);
                    prop_assert!(d >= radius);
                }
            }
            prop_assert!(merged.validate().is_empty());
            let edges: Vec<Edge> = merged.edges().copied().collect();
            for (i, e) in edges.iter().enumerate() {
                prop_assert!(edges[i + 1..].iter().all(|o| !o.joins(e.vertex_a, e.vertex_b)));
            }
        }

        #[test]
        fn nearly_horizontal_wall_becomes_level(
            x0 in -50.0f64..50.0,
            y0 in -50.0f64..50.0,
            len in 0.5f64..20.0,
            tilt in -0.09f64..0.09,
        ) {
            let (g, a) = Graph::new().add_vertex(Point::new(x0, y0));
            let (g, b) = g.add_vertex(Point::new(x0 + len * tilt.cos(), y0 + len * tilt.sin()));
            let (g, _) = g.add_edge(a, b).unwrap();
            let snapped = g.orthogonalize(0.1);
            let pa = snapped.vertex(a).unwrap().position;
            let pb = snapped.vertex(b).unwrap().position;
            prop_assert_eq!(pa.y, pb.y);
            prop_assert_eq!(pa.x, g.vertex(a).unwrap().position.x);
            prop_assert_eq!(snapped.edge_count(), 1);
        }
    }
}
