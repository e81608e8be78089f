//! The validated workflow model.
//!
//! A [`Model`] is only ever produced by the model builder or the merger.
//! It has no mutating API: every invariant checked during the build holds
//! for the lifetime of the value.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use indexmap::IndexMap;
use smol_str::SmolStr;

/// Which keyword declared a vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize))]
#[cfg_attr(feature = "interchange", serde(rename_all = "snake_case"))]
pub enum VertexKind {
    Task,
    Step,
}

impl VertexKind {
    pub fn keyword(self) -> &'static str {
        match self {
            VertexKind::Task => "task",
            VertexKind::Step => "step",
        }
    }
}

impl fmt::Display for VertexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A parameter value.
///
/// `Decimal` is always finite; literals that overflow to infinity are
/// rejected while lowering.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize))]
#[cfg_attr(
    feature = "interchange",
    serde(tag = "type", content = "value", rename_all = "snake_case")
)]
pub enum Value {
    String(String),
    Integer(i64),
    Decimal(f64),
    Boolean(bool),
    /// Name of another vertex in the same model
    Reference(SmolStr),
}

impl Value {
    pub fn as_reference(&self) -> Option<&SmolStr> {
        match self {
            Value::Reference(name) => Some(name),
            _ => None,
        }
    }
}

/// Renders the value as a dflow literal that lexes back to the same value.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => {
                f.write_str("\"")?;
                for c in s.chars() {
                    match c {
                        '"' => f.write_str("\\\"")?,
                        '\\' => f.write_str("\\\\")?,
                        '\n' => f.write_str("\\n")?,
                        '\r' => f.write_str("\\r")?,
                        '\t' => f.write_str("\\t")?,
                        c => write!(f, "{}", c)?,
                    }
                }
                f.write_str("\"")
            }
            Value::Integer(i) => write!(f, "{}", i),
            // Debug is the shortest representation that parses back exactly
            // and always carries a fraction or an exponent.
            Value::Decimal(d) => write!(f, "{:?}", d),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Reference(name) => f.write_str(name),
        }
    }
}

/// A named unit of work
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize))]
pub struct Vertex {
    kind: VertexKind,
    name: SmolStr,
    parameters: IndexMap<SmolStr, Value>,
}

impl Vertex {
    pub(crate) fn new(kind: VertexKind, name: SmolStr, parameters: IndexMap<SmolStr, Value>) -> Self {
        Self {
            kind,
            name,
            parameters,
        }
    }

    pub fn kind(&self) -> VertexKind {
        self.kind
    }

    pub fn name(&self) -> &SmolStr {
        &self.name
    }

    /// Parameters in insertion order
    pub fn parameters(&self) -> impl Iterator<Item = (&SmolStr, &Value)> + '_ {
        self.parameters.iter()
    }

    pub fn parameter(&self, name: &str) -> Option<&Value> {
        self.parameters.get(name)
    }

    pub fn parameter_count(&self) -> usize {
        self.parameters.len()
    }
}

/// A dependency edge: `to` depends on `from`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize))]
pub struct Edge {
    pub from: SmolStr,
    pub to: SmolStr,
}

impl Edge {
    pub fn new(from: impl Into<SmolStr>, to: impl Into<SmolStr>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// A validated, acyclic workflow graph.
///
/// Equality is structural: two models are equal when they have the same
/// vertices (kind and parameters included) and the same edges, regardless
/// of declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize))]
pub struct Model {
    vertices: IndexMap<SmolStr, Vertex>,
    edges: BTreeSet<Edge>,
}

impl Model {
    pub(crate) fn from_parts(vertices: IndexMap<SmolStr, Vertex>, edges: BTreeSet<Edge>) -> Self {
        Self { vertices, edges }
    }

    pub fn vertex(&self, name: &str) -> Option<&Vertex> {
        self.vertices.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vertices.contains_key(name)
    }

    /// Vertices in declaration order
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> + '_ {
        self.vertices.values()
    }

    /// Edges in `(from, to)` order
    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.iter()
    }

    /// Names `name` depends on, sorted
    pub fn dependencies(&self, name: &str) -> Vec<&SmolStr> {
        let mut deps: Vec<_> = self
            .edges
            .iter()
            .filter(|e| e.to == name)
            .map(|e| &e.from)
            .collect();
        deps.sort();
        deps
    }

    /// Names that depend on `name`, sorted
    pub fn dependents(&self, name: &str) -> Vec<&SmolStr> {
        self.edges
            .iter()
            .filter(|e| e.from == name)
            .map(|e| &e.to)
            .collect()
    }

    /// Every vertex after all of its dependencies.
    ///
    /// Kahn's algorithm; among vertices that are ready at the same time the
    /// smallest name goes first, so the order is deterministic.
    pub fn topological_order(&self) -> Vec<&SmolStr> {
        let mut in_degree: BTreeMap<&SmolStr, usize> =
            self.vertices.keys().map(|name| (name, 0)).collect();
        for edge in &self.edges {
            if let Some(degree) = in_degree.get_mut(&edge.to) {
                *degree += 1;
            }
        }

        let mut ready: BTreeSet<&SmolStr> = in_degree
            .iter()
            .filter(|(_, degree)| **degree == 0)
            .map(|(name, _)| *name)
            .collect();
        let mut order = Vec::with_capacity(self.vertices.len());

        while let Some(name) = ready.pop_first() {
            order.push(name);
            for edge in self.edges.iter().filter(|e| &e.from == name) {
                if let Some(degree) = in_degree.get_mut(&edge.to) {
                    *degree -= 1;
                    if *degree == 0 {
                        ready.insert(&edge.to);
                    }
                }
            }
        }

        order
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}
