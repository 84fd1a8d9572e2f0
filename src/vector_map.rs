//! The keyed `VectorMap` file format and the generate-model payload.

use crate::model::{Alphabet, Edge, EntityKind, Graph, GraphError, Label, Point, Vertex};
use anyhow::Context;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LabelFeature {
    pub id: u64,
    pub text: String,
    pub position: Point,
    pub size: f64,
    #[serde(default)]
    pub alphabet: Option<Alphabet>,
    /// Always written for the model generator. Older files carry only this
    /// flag and no alphabet.
    #[serde(default)]
    pub is_braille: bool,
}

impl LabelFeature {
    fn alphabet(&self) -> Alphabet {
        match (self.alphabet, self.is_braille) {
            (Some(a), _) => a,
            (None, true) => Alphabet::Braille,
            (None, false) => Alphabet::Regular,
        }
    }
}

// Label must be tried first: a label object also satisfies the vertex shape.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Feature {
    Label(LabelFeature),
    Edge(Edge),
    Vertex(Vertex),
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct VectorMap {
    pub features: BTreeMap<String, Feature>,
    pub vertices: Vec<u64>,
    pub edges: Vec<u64>,
    pub labels: Vec<u64>,
}

impl VectorMap {
    pub fn from_graph(graph: &Graph) -> Self {
        let mut map = VectorMap::default();
        for v in graph.vertices() {
            map.vertices.push(v.id);
            map.features.insert(v.id.to_string(), Feature::Vertex(*v));
        }
        for e in graph.edges() {
            map.edges.push(e.id);
            map.features.insert(e.id.to_string(), Feature::Edge(*e));
        }
        for l in graph.labels() {
            map.labels.push(l.id);
            map.features.insert(
                l.id.to_string(),
                Feature::Label(LabelFeature {
                    id: l.id,
                    text: l.text.clone(),
                    position: l.position,
                    size: l.size,
                    alphabet: Some(l.alphabet),
                    is_braille: l.alphabet == Alphabet::Braille,
                }),
            );
        }
        map
    }

    /// Rebuilds the graph from the id lists. Entries without a feature of the
    /// right kind, and walls whose endpoints did not load, are skipped and
    /// returned as errors.
    pub fn to_graph(&self) -> (Graph, Vec<GraphError>) {
        let mut graph = Graph::new();
        let mut errors = Vec::new();
        let missing = |kind, id| GraphError::MissingEntity { kind, id };

        for &id in &self.vertices {
            match self.features.get(&id.to_string()) {
                Some(Feature::Vertex(v)) => graph.insert_vertex(Vertex { id, ..*v }),
                _ => errors.push(missing(EntityKind::Vertex, id)),
            }
        }
        for &id in &self.edges {
            match self.features.get(&id.to_string()) {
                Some(Feature::Edge(e)) => graph.insert_edge(Edge { id, ..*e }),
                _ => errors.push(missing(EntityKind::Edge, id)),
            }
        }
        for &id in &self.labels {
            match self.features.get(&id.to_string()) {
                Some(Feature::Label(l)) => graph.insert_label(Label {
                    id,
                    text: l.text.clone(),
                    position: l.position,
                    alphabet: l.alphabet(),
                    size: l.size,
                }),
                _ => errors.push(missing(EntityKind::Label, id)),
            }
        }

        errors.extend(graph.validate());
        (graph.without_dangling_edges(), errors)
    }
}

pub fn load(path: &str) -> anyhow::Result<Graph> {
    let s = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    let map: VectorMap =
        serde_json::from_str(&s).with_context(|| format!("parsing vector map in {path}"))?;
    let (graph, errors) = map.to_graph();
    for e in &errors {
        warn!("{path}: skipped {e}");
    }
    info!(
        "loaded {path}: {} vertices, {} walls, {} labels",
        graph.vertex_count(),
        graph.edge_count(),
        graph.label_count()
    );
    Ok(graph)
}

pub fn save(path: &str, graph: &Graph) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&VectorMap::from_graph(graph))
        .context("serializing vector map")?;
    std::fs::write(path, json).with_context(|| format!("writing {path}"))?;
    info!("saved vector map to {path}");
    Ok(())
}

/// Physical dimensions handed to the model generator.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PhysicalParameters {
    pub model_scale_factor: f64,
    pub wall_height_mm: f64,
    pub wall_thickness_mm: f64,
    pub border_width_mm: f64,
    pub floor_thickness_mm: f64,
}

impl Default for PhysicalParameters {
    fn default() -> Self {
        Self {
            model_scale_factor: 1.0 / 120.0,
            wall_height_mm: 2.5,
            wall_thickness_mm: 2.5,
            border_width_mm: 5.0,
            floor_thickness_mm: 5.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParamError {
    pub name: &'static str,
    pub value: f64,
}

impl fmt::Display for ParamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} must be a positive number, got {}", self.name, self.value)
    }
}

impl std::error::Error for ParamError {}

impl PhysicalParameters {
    pub fn fields(&self) -> [(&'static str, f64); 5] {
        [
            ("model_scale_factor", self.model_scale_factor),
            ("wall_height_mm", self.wall_height_mm),
            ("wall_thickness_mm", self.wall_thickness_mm),
            ("border_width_mm", self.border_width_mm),
            ("floor_thickness_mm", self.floor_thickness_mm),
        ]
    }

    pub fn validate(&self) -> Result<(), ParamError> {
        match self
            .fields()
            .into_iter()
            .find(|(_, v)| !(v.is_finite() && *v > 0.0))
        {
            Some((name, value)) => Err(ParamError { name, value }),
            None => Ok(()),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GeneratePayload {
    pub vector_map: VectorMap,
    pub model_params: PhysicalParameters,
}

impl GeneratePayload {
    pub fn new(graph: &Graph, params: PhysicalParameters) -> Result<Self, ParamError> {
        params.validate()?;
        Ok(Self {
            vector_map: VectorMap::from_graph(graph),
            model_params: params,
        })
    }
}

pub fn write_payload(path: &str, graph: &Graph, params: PhysicalParameters) -> anyhow::Result<()> {
    let payload = GeneratePayload::new(graph, params)?;
    let json = serde_json::to_string_pretty(&payload).context("serializing payload")?;
    std::fs::write(path, json).with_context(|| format!("writing {path}"))?;
    info!("wrote generate payload to {path}");
    Ok(())
}
