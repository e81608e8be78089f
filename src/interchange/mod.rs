//! Model export formats.
//!
//! Structured renderings of a validated [`Model`] for tools that do not
//! speak dflow:
//!
//! - **JSON** - `{"vertices": {...}, "edges": [...]}`
//! - **YAML** - the same structure as YAML
//!
//! Export only. A model is always built from dflow text so that its
//! invariants are checked; there is no way back from these formats.

mod error;

use crate::hir::Model;

pub use error::InterchangeError;

/// Trait for model export formats.
pub trait ModelFormat: Send + Sync {
    /// Human-readable name of the format.
    fn name(&self) -> &'static str;

    /// File extension(s) for this format.
    fn extensions(&self) -> &'static [&'static str];

    /// Serialize the model.
    fn write(&self, model: &Model) -> Result<Vec<u8>, InterchangeError>;
}

/// Pretty-printed JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct Json;

impl ModelFormat for Json {
    fn name(&self) -> &'static str {
        "JSON"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["json"]
    }

    fn write(&self, model: &Model) -> Result<Vec<u8>, InterchangeError> {
        Ok(serde_json::to_vec_pretty(model)?)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Yaml;

impl ModelFormat for Yaml {
    fn name(&self) -> &'static str {
        "YAML"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["yaml", "yml"]
    }

    fn write(&self, model: &Model) -> Result<Vec<u8>, InterchangeError> {
        Ok(serde_yaml::to_string(model)?.into_bytes())
    }
}

/// Serialize a model to pretty-printed JSON.
pub fn to_json(model: &Model) -> Result<String, InterchangeError> {
    Ok(serde_json::to_string_pretty(model)?)
}

/// Serialize a model to YAML.
pub fn to_yaml(model: &Model) -> Result<String, InterchangeError> {
    Ok(serde_yaml::to_string(model)?)
}

/// Detect format from file extension.
pub fn detect_format(path: &std::path::Path) -> Result<Box<dyn ModelFormat>, InterchangeError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "json" => Ok(Box::new(Json)),
        "yaml" | "yml" => Ok(Box::new(Yaml)),
        other => Err(InterchangeError::Unsupported(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hir::build_model;
    use std::path::Path;

    fn sample() -> Model {
        build_model("task A { n = 1; r = B; }\nstep B {}\ntask C { depends on A; }").unwrap()
    }

    #[test]
    fn test_json_shape() {
        let json: serde_json::Value = serde_json::from_str(&to_json(&sample()).unwrap()).unwrap();
        assert_eq!(json["vertices"]["A"]["kind"], "task");
        assert_eq!(json["vertices"]["A"]["parameters"]["n"]["type"], "integer");
        assert_eq!(json["vertices"]["A"]["parameters"]["r"]["value"], "B");
        assert_eq!(json["edges"][0]["from"], "A");
        assert_eq!(json["edges"][0]["to"], "C");
    }

    #[test]
    fn test_yaml_mentions_every_vertex() {
        let yaml = to_yaml(&sample()).unwrap();
        for name in ["A:", "B:", "C:"] {
            assert!(yaml.contains(name), "missing {} in\n{}", name, yaml);
        }
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(detect_format(Path::new("out.JSON")).unwrap().name(), "JSON");
        assert_eq!(detect_format(Path::new("out.yml")).unwrap().name(), "YAML");
        assert!(detect_format(Path::new("out.xmi")).is_err());
    }
}
