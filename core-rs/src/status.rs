/**
 * status.rs
 * Dataset overview: graph and triple counts, subgraph statistics, namespace
 * listing and the class/property inventories that seed hierarchy rendering
 */

use oxigraph::model::{NamedNode, NamedNodeRef, NamedOrBlankNode, Subject, Term};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::config::SchemaConfig;
use crate::errors::{Result, ViewerError};
use crate::store::vocab::{owl, rdf, rdfs};
use crate::store::SchemaStore;

// ============================================================================
// Dataset counts
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetStatus {
    pub graph_count: usize,
    pub triple_count: usize,
    pub common_concept_graphs: usize,
    pub common_concept_triples: usize,
    pub schema_graph_triples: usize,
    pub ontology_triples: usize,
}

impl DatasetStatus {
    pub fn collect(store: &SchemaStore, schema: &SchemaConfig) -> Result<Self> {
        let schema_graph = store.resolve(&schema.schema_graph)?;

        let mut status = Self {
            graph_count: 0,
            triple_count: store.len()?,
            common_concept_graphs: 0,
            common_concept_triples: 0,
            schema_graph_triples: 0,
            ontology_triples: store.default_graph_len()?,
        };
        for graph in store.named_graphs()? {
            status.graph_count += 1;
            let label = graph_label(store, &graph);
            if label.starts_with(&schema.common_concept_prefix) {
                status.common_concept_graphs += 1;
                status.common_concept_triples += store.graph_len(&graph)?;
            }
            if matches!(&graph, NamedOrBlankNode::NamedNode(n) if *n == schema_graph) {
                status.schema_graph_triples = store.graph_len(&graph)?;
            }
        }
        Ok(status)
    }
}

fn graph_label(store: &SchemaStore, graph: &NamedOrBlankNode) -> String {
    match graph {
        NamedOrBlankNode::NamedNode(node) => store.label(node.as_ref()),
        NamedOrBlankNode::BlankNode(node) => store.label(node.as_ref()),
    }
}

// ============================================================================
// Subgraph statistics
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubgraphSort {
    #[default]
    Name,
    SizeDesc,
    SizeAsc,
}

impl FromStr for SubgraphSort {
    type Err = ViewerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "name" => Ok(Self::Name),
            "size-desc" => Ok(Self::SizeDesc),
            "size-asc" => Ok(Self::SizeAsc),
            other => Err(ViewerError::Validation(format!(
                "Unknown sort order '{}', expected name, size-desc or size-asc",
                other
            ))),
        }
    }
}

impl fmt::Display for SubgraphSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Name => "name",
            Self::SizeDesc => "size-desc",
            Self::SizeAsc => "size-asc",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubgraphStat {
    pub name: String,
    pub graph: String,
    pub triples: usize,
}

/// Display name of a subgraph label
///
/// `ifc:CC_Door_Panel_GRAPH` becomes `Door Panel`; other labels pass through.
pub fn subgraph_display_name(label: &str) -> String {
    match label.strip_prefix("ifc:CC_").and_then(|rest| rest.get(..rest.len().checked_sub(6)?)) {
        Some(core) => core.replace('_', " "),
        None => label.to_string(),
    }
}

/// Per-subgraph triple counts, excluding the schema graph
///
/// `keyword` matches the graph label case-insensitively.
pub fn subgraph_stats(
    store: &SchemaStore,
    schema: &SchemaConfig,
    keyword: Option<&str>,
    sort: SubgraphSort,
) -> Result<Vec<SubgraphStat>> {
    let schema_graph = store.resolve(&schema.schema_graph)?;
    let keyword = keyword.filter(|k| !k.is_empty()).map(str::to_lowercase);

    let mut stats = Vec::new();
    for graph in store.named_graphs()? {
        if matches!(&graph, NamedOrBlankNode::NamedNode(n) if *n == schema_graph) {
            continue;
        }
        let label = graph_label(store, &graph);
        if let Some(keyword) = &keyword {
            if !label.to_lowercase().contains(keyword) {
                continue;
            }
        }
        stats.push(SubgraphStat {
            name: subgraph_display_name(&label),
            triples: store.graph_len(&graph)?,
            graph: label,
        });
    }

    match sort {
        SubgraphSort::Name => stats.sort_by(|a, b| a.name.cmp(&b.name)),
        SubgraphSort::SizeDesc => {
            stats.sort_by(|a, b| b.triples.cmp(&a.triples).then_with(|| a.name.cmp(&b.name)))
        }
        SubgraphSort::SizeAsc => {
            stats.sort_by(|a, b| a.triples.cmp(&b.triples).then_with(|| a.name.cmp(&b.name)))
        }
    }
    Ok(stats)
}

// ============================================================================
// Namespaces
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceEntry {
    pub prefix: String,
    pub namespace: String,
}

/// Bound namespaces ordered by prefix, filtered on prefix or IRI
pub fn namespaces(store: &SchemaStore, keyword: Option<&str>) -> Vec<NamespaceEntry> {
    let keyword = keyword.filter(|k| !k.is_empty()).map(str::to_lowercase);
    store
        .namespaces()
        .namespaces()
        .filter(|(prefix, iri)| match &keyword {
            Some(k) => prefix.to_lowercase().contains(k) || iri.to_lowercase().contains(k),
            None => true,
        })
        .map(|(prefix, iri)| NamespaceEntry {
            prefix: prefix.to_string(),
            namespace: iri.to_string(),
        })
        .collect()
}

// ============================================================================
// Class and property inventories
// ============================================================================

/// Every named class: `owl:Class` instances plus both ends of `rdfs:subClassOf`
///
/// Ordered by label.
pub fn class_inventory(store: &SchemaStore) -> Result<Vec<NamedNode>> {
    let mut classes: BTreeMap<String, NamedNode> = BTreeMap::new();
    for subject in store.subjects(rdf::TYPE, owl::CLASS.into())? {
        if let Subject::NamedNode(node) = subject {
            classes.insert(store.label(node.as_ref()), node);
        }
    }
    for (subject, object) in store.subject_objects(rdfs::SUB_CLASS_OF)? {
        if let Subject::NamedNode(node) = subject {
            classes.insert(store.label(node.as_ref()), node);
        }
        if let Term::NamedNode(node) = object {
            classes.insert(store.label(node.as_ref()), node);
        }
    }
    Ok(classes.into_values().collect())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyType {
    ObjectProperty,
    DatatypeProperty,
    AnnotationProperty,
}

impl PropertyType {
    pub const ALL: [PropertyType; 3] = [
        Self::ObjectProperty,
        Self::DatatypeProperty,
        Self::AnnotationProperty,
    ];

    pub fn owl_class(&self) -> NamedNodeRef<'static> {
        match self {
            Self::ObjectProperty => owl::OBJECT_PROPERTY,
            Self::DatatypeProperty => owl::DATATYPE_PROPERTY,
            Self::AnnotationProperty => owl::ANNOTATION_PROPERTY,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ObjectProperty => "ObjectProperty",
            Self::DatatypeProperty => "DatatypeProperty",
            Self::AnnotationProperty => "AnnotationProperty",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyEntry {
    pub namespace: String,
    pub label: String,
    pub property_type: PropertyType,
    pub iri: String,
}

/// Declared properties grouped by OWL property type, each group ordered by label
#[derive(Debug, Clone, Default)]
pub struct PropertyInventory {
    groups: BTreeMap<&'static str, Vec<NamedNode>>,
}

impl PropertyInventory {
    pub fn collect(store: &SchemaStore) -> Result<Self> {
        let mut inventory = Self::default();
        for property_type in PropertyType::ALL {
            let mut members: Vec<(String, NamedNode)> = store
                .subjects(rdf::TYPE, property_type.owl_class().into())?
                .into_iter()
                .filter_map(|s| match s {
                    Subject::NamedNode(node) => Some((store.label(node.as_ref()), node)),
                    _ => None,
                })
                .collect();
            members.sort_by(|a, b| a.0.cmp(&b.0));
            inventory
                .groups
                .insert(property_type.as_str(), members.into_iter().map(|(_, n)| n).collect());
        }
        Ok(inventory)
    }

    pub fn of_type(&self, property_type: PropertyType) -> &[NamedNode] {
        self.groups
            .get(property_type.as_str())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_object_property(&self, iri: &NamedNode) -> bool {
        self.of_type(PropertyType::ObjectProperty).contains(iri)
    }

    /// Object, datatype, then annotation properties
    pub fn all(&self) -> Vec<NamedNode> {
        PropertyType::ALL
            .iter()
            .flat_map(|t| self.of_type(*t).iter().cloned())
            .collect()
    }

    /// Table rows, filtered case-insensitively on IRI or label
    pub fn entries(&self, store: &SchemaStore, keyword: Option<&str>) -> Vec<PropertyEntry> {
        let keyword = keyword.filter(|k| !k.is_empty()).map(str::to_lowercase);
        let mut entries = Vec::new();
        for property_type in PropertyType::ALL {
            for node in self.of_type(property_type) {
                let label = store.label(node.as_ref());
                if let Some(k) = &keyword {
                    if !node.as_str().to_lowercase().contains(k) && !label.to_lowercase().contains(k) {
                        continue;
                    }
                }
                entries.push(PropertyEntry {
                    namespace: crate::store::label_namespace(&label).to_string(),
                    label,
                    property_type,
                    iri: node.as_str().to_string(),
                });
            }
        }
        entries
    }
}
