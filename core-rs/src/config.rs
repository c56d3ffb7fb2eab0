/**
 * config.rs
 * Parser for viewer.yaml files (YAML format)
 *
 * Format:
 * ```yaml
 * apiVersion: ifcsv/v1
 * kind: Viewer
 * dataset:
 *   quads: ./resources/knowledge_graphs/ifc_schema.trig
 *   ontology: ./resources/ontologies/skos.rdf
 * namespaces:
 *   ifc: http://www.semantic.org/zeyupan/instances/CoALA4IFC_Schema_Inst#
 * rendering:
 *   baseSymbolSize: 10.0
 *   symbolScale: 7.0
 *   height: 500
 * schema:
 *   schemaGraph: ifc:IFC_SCHEMA_GRAPH
 *   commonConceptPrefix: ifc:CC
 * ```
 */

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::ViewerError;

pub const API_VERSION: &str = "ifcsv/v1";
pub const CONFIG_FILE_NAME: &str = "viewer.yaml";

/// viewer.yaml file structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ViewerConfig {
    pub api_version: String,
    pub kind: String,
    pub dataset: DatasetConfig,
    /// Extra prefix bindings on top of the built-in and file-declared ones
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub namespaces: BTreeMap<String, String>,
    #[serde(default)]
    pub rendering: RenderingConfig,
    #[serde(default)]
    pub schema: SchemaConfig,
}

/// Locations of the two dataset files loaded at startup
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatasetConfig {
    /// TriG serialization holding the schema and common-concept named graphs
    pub quads: PathBuf,
    /// RDF/XML ontology merged into the default graph
    pub ontology: PathBuf,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            quads: PathBuf::from(crate::DEFAULT_QUADS_PATH),
            ontology: PathBuf::from(crate::DEFAULT_ONTOLOGY_PATH),
        }
    }
}

impl DatasetConfig {
    /// Resolve relative paths against `root`
    pub fn resolved(&self, root: &Path) -> Self {
        let resolve = |p: &PathBuf| if p.is_absolute() { p.clone() } else { root.join(p) };
        Self {
            quads: resolve(&self.quads),
            ontology: resolve(&self.ontology),
        }
    }
}

/// Symbol sizing and chart dimensions
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RenderingConfig {
    pub base_symbol_size: f64,
    pub symbol_scale: f64,
    pub height: u32,
}

impl Default for RenderingConfig {
    fn default() -> Self {
        Self {
            base_symbol_size: 10.0,
            symbol_scale: 7.0,
            height: 500,
        }
    }
}

/// Names of the well-known graphs inside the dataset
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SchemaConfig {
    pub schema_graph: String,
    pub common_concept_prefix: String,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            schema_graph: "ifc:IFC_SCHEMA_GRAPH".to_string(),
            common_concept_prefix: "ifc:CC".to_string(),
        }
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            kind: "Viewer".to_string(),
            dataset: DatasetConfig::default(),
            namespaces: BTreeMap::new(),
            rendering: RenderingConfig::default(),
            schema: SchemaConfig::default(),
        }
    }
}

impl ViewerConfig {
    /// Load viewer.yaml from specified path
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ViewerError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ViewerError::FileNotFound(path.to_string_lossy().to_string()));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| ViewerError::Config(format!("Failed to read {}: {}", CONFIG_FILE_NAME, e)))?;

        let config: ViewerConfig = serde_yaml::from_str(&content)
            .map_err(|e| ViewerError::Config(format!("Invalid {} YAML: {}", CONFIG_FILE_NAME, e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Load viewer.yaml from a directory, falling back to defaults when absent
    ///
    /// Dataset paths are resolved against `root` either way.
    pub fn load_from_dir<P: AsRef<Path>>(root: P) -> Result<Self, ViewerError> {
        let root = root.as_ref();
        let path = root.join(CONFIG_FILE_NAME);
        let mut config = if path.exists() {
            Self::load(&path)?
        } else {
            tracing::debug!("no {} in {}, using defaults", CONFIG_FILE_NAME, root.display());
            Self::default()
        };
        config.dataset = config.dataset.resolved(root);
        Ok(config)
    }

    /// Validate viewer.yaml structure
    ///
    /// Ensures apiVersion and kind match, rendering sizes are usable,
    /// and every extra namespace binding has a non-empty prefix and IRI.
    pub fn validate(&self) -> Result<(), ViewerError> {
        if self.api_version != API_VERSION {
            return Err(ViewerError::Validation(format!(
                "Invalid apiVersion: expected '{}', got '{}'",
                API_VERSION, self.api_version
            )));
        }

        if self.kind != "Viewer" {
            return Err(ViewerError::Validation(format!(
                "Invalid kind: expected 'Viewer', got '{}'",
                self.kind
            )));
        }

        if !(self.rendering.base_symbol_size > 0.0) || !self.rendering.symbol_scale.is_finite() {
            return Err(ViewerError::Validation(
                "rendering.baseSymbolSize must be positive and symbolScale finite".to_string(),
            ));
        }

        for (prefix, iri) in &self.namespaces {
            if prefix.is_empty() || iri.is_empty() {
                return Err(ViewerError::Validation(format!(
                    "Namespace binding '{}' -> '{}' is incomplete",
                    prefix, iri
                )));
            }
        }

        Ok(())
    }

    /// Save viewer.yaml to specified path
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ViewerError> {
        let content = serde_yaml::to_string(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}
