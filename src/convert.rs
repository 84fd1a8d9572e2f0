//! Conversion between the oriented-box wall representation produced by the
//! scan processor and the editable wall graph.

use crate::model::{Edge, Graph, Point, Vertex};
use anyhow::Context;
use log::warn;
use serde::{Deserialize, Serialize};

pub const WALL_THICKNESS_M: f64 = 0.1;
pub const WALL_HEIGHT_M: f64 = 1.0;

pub type Vec3 = [f64; 3];
pub type Mat3 = [[f64; 3]; 3];

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct BoxProperties {
    pub box_centers: Vec<Vec3>,
    pub box_extents: Vec<Vec3>,
    pub box_rotations: Vec<Mat3>,
}

impl BoxProperties {
    pub fn len(&self) -> usize {
        self.box_centers
            .len()
            .min(self.box_extents.len())
            .min(self.box_rotations.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn push(&mut self, center: Vec3, extent: Vec3, rotation: Mat3) {
        self.box_centers.push(center);
        self.box_extents.push(extent);
        self.box_rotations.push(rotation);
    }
}

pub fn z_rotation(angle: f64) -> Mat3 {
    let (sin, cos) = angle.sin_cos();
    [[cos, -sin, 0.0], [sin, cos, 0.0], [0.0, 0.0, 1.0]]
}

pub fn z_angle(rotation: &Mat3) -> f64 {
    rotation[1][0].atan2(rotation[0][0])
}

// Scan-processor convention: y' = x sin - y cos. Wall endpoints lie on the
// local x axis, so the flipped term is always zero.
fn apply_z_rot(p: Point, angle: f64) -> Point {
    let (sin, cos) = angle.sin_cos();
    Point {
        x: p.x * cos + p.y * sin,
        y: p.x * sin - p.y * cos,
    }
}

/// Two vertices and one wall per box, ids allocated sequentially after the
/// boxes already present in `graph`. Coincident endpoints are not merged.
pub fn append_boxes(graph: &Graph, boxes: &BoxProperties) -> Graph {
    let mut next = graph.clone();
    for i in 0..boxes.len() {
        let center = boxes.box_centers[i];
        let extent = boxes.box_extents[i];
        let theta = z_angle(&boxes.box_rotations[i]);

        let half = extent[0] / 2.0;
        let centre = Point::new(center[0], center[1]);
        let a = apply_z_rot(Point::new((-half).min(0.0), 0.0), theta).offset(centre);
        let b = apply_z_rot(Point::new(half.max(0.0), 0.0), theta).offset(centre);

        let id_a = next.next_id();
        let id_b = id_a + 1;
        let id_edge = id_a + 2;
        next.insert_vertex(Vertex {
            id: id_a,
            position: a,
        });
        next.insert_vertex(Vertex {
            id: id_b,
            position: b,
        });
        next.insert_edge(Edge {
            id: id_edge,
            vertex_a: id_a,
            vertex_b: id_b,
        });
    }
    next
}

pub fn boxes_to_graph(boxes: &BoxProperties) -> Graph {
    append_boxes(&Graph::new(), boxes)
}

/// One box per wall, in ascending edge id order. Thickness and height are
/// not stored in the graph and come back as the fixed defaults.
pub fn graph_to_boxes(graph: &Graph) -> BoxProperties {
    let mut out = BoxProperties::default();
    for edge in graph.edges() {
        let (a, b) = match graph.edge_endpoints(edge) {
            Ok(ends) => ends,
            Err(e) => {
                warn!("skipping wall {}: {e}", edge.id);
                continue;
            }
        };
        let mid = a.midpoint(b);
        let length = crate::app::geometry::distance(a, b);
        let angle = (b.y - a.y).atan2(b.x - a.x);
        out.push(
            [mid.x, mid.y, 0.0],
            [length, WALL_THICKNESS_M, WALL_HEIGHT_M],
            z_rotation(angle),
        );
    }
    out
}

pub fn load_box_properties(path: &str) -> anyhow::Result<BoxProperties> {
    let s = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    let boxes: BoxProperties =
        serde_json::from_str(&s).with_context(|| format!("parsing box properties in {path}"))?;
    if boxes.box_centers.len() != boxes.box_extents.len()
        || boxes.box_centers.len() != boxes.box_rotations.len()
    {
        warn!(
            "{path}: mismatched box arrays ({} centers, {} extents, {} rotations), using the first {}",
            boxes.box_centers.len(),
            boxes.box_extents.len(),
            boxes.box_rotations.len(),
            boxes.len()
        );
    }
    Ok(boxes)
}

pub fn save_box_properties(path: &str, boxes: &BoxProperties) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(boxes).context("serializing box properties")?;
    std::fs::write(path, json).with_context(|| format!("writing {path}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f64::consts::FRAC_PI_4;

    const EPS: f64 = 1e-9;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < EPS, "{a} != {b}");
    }

    #[test]
    fn single_wall_from_graph() {
        let (g, a) = Graph::new().add_vertex(Point::new(0.0, 0.0));
        let (g, b) = g.add_vertex(Point::new(5.0, 0.0));
        let (g, e) = g.add_edge(a, b).unwrap();
        assert_eq!(e, 2);

        let boxes = graph_to_boxes(&g);
        assert_eq!(boxes.len(), 1);
        assert_eq!(boxes.box_centers[0], [2.5, 0.0, 0.0]);
        assert_eq!(boxes.box_extents[0], [5.0, 0.1, 1.0]);
        assert_eq!(
            boxes.box_rotations[0],
            [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]
        );
    }

    #[test]
    fn boxes_get_sequential_ids() {
        let mut boxes = BoxProperties::default();
        boxes.push([0.0, 0.0, 0.0], [2.0, 0.1, 1.0], z_rotation(0.0));
        boxes.push([1.0, 1.0, 0.0], [2.0, 0.1, 1.0], z_rotation(FRAC_PI_4));
        let g = boxes_to_graph(&boxes);

        assert_eq!(g.vertices().map(|v| v.id).collect::<Vec<_>>(), vec![0, 1, 3, 4]);
        let walls: Vec<(u64, u64, u64)> =
            g.edges().map(|e| (e.id, e.vertex_a, e.vertex_b)).collect();
        assert_eq!(walls, vec![(2, 0, 1), (5, 3, 4)]);

        let a = g.vertex(0).unwrap().position;
        let b = g.vertex(1).unwrap().position;
        assert_close(a.x, -1.0);
        assert_close(a.y, 0.0);
        assert_close(b.x, 1.0);
    }

    #[test]
    fn coincident_endpoints_stay_separate() {
        let mut boxes = BoxProperties::default();
        boxes.push([1.0, 0.0, 0.0], [2.0, 0.1, 1.0], z_rotation(0.0));
        boxes.push([3.0, 0.0, 0.0], [2.0, 0.1, 1.0], z_rotation(0.0));
        let g = boxes_to_graph(&boxes);
        assert_eq!(g.vertex_count(), 4);
        let p1 = g.vertex(1).unwrap().position;
        let p3 = g.vertex(3).unwrap().position;
        assert_close(p1.x, p3.x);
    }

    #[test]
    fn mismatched_arrays_use_the_shortest() {
        let mut boxes = BoxProperties::default();
        boxes.push([0.0, 0.0, 0.0], [1.0, 0.1, 1.0], z_rotation(0.0));
        boxes.box_centers.push([9.0, 9.0, 0.0]);
        assert_eq!(boxes_to_graph(&boxes).edge_count(), 1);
    }

    #[test]
    fn thickness_and_height_are_defaulted() {
        let mut boxes = BoxProperties::default();
        boxes.push([0.5, 0.5, 0.3], [2.0_f64.sqrt(), 0.4, 2.5], z_rotation(FRAC_PI_4));
        let back = graph_to_boxes(&boxes_to_graph(&boxes));
        assert_close(back.box_extents[0][0], 2.0_f64.sqrt());
        assert_eq!(back.box_extents[0][1], WALL_THICKNESS_M);
        assert_eq!(back.box_extents[0][2], WALL_HEIGHT_M);
        assert_eq!(back.box_centers[0][2], 0.0);
    }

    proptest! {
        #[test]
        fn round_trip_keeps_center_and_angle(
            cx in -100.0f64..100.0,
            cy in -100.0f64..100.0,
            length in 0.01f64..50.0,
            theta in -3.0f64..3.0,
        ) {
            let mut boxes = BoxProperties::default();
            boxes.push([cx, cy, 0.0], [length, 0.2, 2.0], z_rotation(theta));
            let back = graph_to_boxes(&boxes_to_graph(&boxes));
            prop_assert_eq!(back.len(), 1);
            prop_assert!((back.box_centers[0][0] - cx).abs() < EPS);
            prop_assert!((back.box_centers[0][1] - cy).abs() < EPS);
            prop_assert!((back.box_extents[0][0] - length).abs() < EPS);
            prop_assert!((z_angle(&back.box_rotations[0]) - theta).abs() < EPS);
        }
    }
}
