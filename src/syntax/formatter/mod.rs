//! Canonical serializer for dflow models
//!
//! Renders a [`Model`] back to document text. The output is deterministic:
//! vertices sorted by name, parameters in insertion order, then one
//! `depends on` clause per dependency in sorted order. Building the output
//! again yields a model equal to the input.

mod options;


use std::fmt;

use crate::hir::{Model, Vertex};
pub use options::FormatOptions;

/// Serialize with default options
pub fn serialize(model: &Model) -> String {
    serialize_with(model, &FormatOptions::default())
}

/// Serialize with the given indentation options
pub fn serialize_with(model: &Model, options: &FormatOptions) -> String {
    Canonical { model, options }.to_string()
}

/// A model together with its format options, displayed as document text.
struct Canonical<'a> {
    model: &'a Model,
    options: &'a FormatOptions,
}

impl fmt::Display for Canonical<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut vertices: Vec<&Vertex> = self.model.vertices().collect();
        vertices.sort_by(|a, b| a.name().cmp(b.name()));

        for (i, vertex) in vertices.into_iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            self.vertex(f, vertex)?;
        }
        Ok(())
    }
}

impl Canonical<'_> {
    fn vertex(&self, f: &mut fmt::Formatter<'_>, vertex: &Vertex) -> fmt::Result {
        let dependencies = self.model.dependencies(vertex.name());
        if vertex.parameter_count() == 0 && dependencies.is_empty() {
            return writeln!(f, "{} {} {{}}", vertex.kind(), vertex.name());
        }

        let indent = self.options.indent(1);
        writeln!(f, "{} {} {{", vertex.kind(), vertex.name())?;
        for (name, value) in vertex.parameters() {
            writeln!(f, "{}{} = {};", indent, name, value)?;
        }
        for dependency in dependencies {
            writeln!(f, "{}depends on {};", indent, dependency)?;
        }
        f.write_str("}\n")
    }
}
