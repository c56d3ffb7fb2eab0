//! Graph-visualization payload: nodes, links and categories
//!
//! Serializes to the shape graph widgets consume:
//! `{nodes: [{id, name, category, symbolSize?, draggable?, value?}],
//!   links: [{source, target, label, lineStyle?}], categories: [{name}]}`.
//!
//! Node ids are unique and categories are referenced by insertion index.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};

use crate::errors::{Result, ViewerError};

/// Category reserved for nodes whose type cannot be resolved
pub const UNDEFINED_CATEGORY: &str = "Undefined";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualNode {
    pub id: String,
    pub name: String,
    pub category: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draggable: Option<bool>,
    /// Opaque payload returned on click: the node's IRI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl VisualNode {
    /// Node whose id and display name are both `label`
    pub fn new(label: impl Into<String>, category: usize) -> Self {
        let label = label.into();
        Self {
            id: label.clone(),
            name: label,
            category,
            symbol: None,
            symbol_size: None,
            draggable: None,
            value: None,
        }
    }

    pub fn with_value(mut self, iri: impl Into<String>) -> Self {
        self.value = Some(iri.into());
        self
    }

    pub fn sized(mut self, size: f64) -> Self {
        self.symbol = Some("circle".to_string());
        self.symbol_size = Some(size);
        self
    }

    pub fn fixed(mut self) -> Self {
        self.draggable = Some(false);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineType {
    Solid,
    Dashed,
    Dotted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    #[serde(rename = "type")]
    pub line_type: LineType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curveness: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkLabel {
    pub show: bool,
    pub formatter: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualLink {
    pub source: String,
    pub target: String,
    /// Predicate label; hidden unless `show` is set
    pub label: LinkLabel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_style: Option<LineStyle>,
}

impl VisualLink {
    /// Solid link with a hidden predicate label
    pub fn new(source: impl Into<String>, target: impl Into<String>, predicate: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            label: LinkLabel {
                show: false,
                formatter: predicate.into(),
            },
            line_style: None,
        }
    }

    pub fn dashed(mut self) -> Self {
        let curveness = self.line_style.as_ref().and_then(|s| s.curveness);
        self.line_style = Some(LineStyle {
            line_type: LineType::Dashed,
            curveness,
        });
        self
    }

    pub fn curved(mut self, curveness: f64) -> Self {
        let line_type = self.line_style.as_ref().map_or(LineType::Solid, |s| s.line_type);
        self.line_style = Some(LineStyle {
            line_type,
            curveness: Some(curveness),
        });
        self
    }

    pub fn show_label(mut self) -> Self {
        self.label.show = true;
        self
    }

    pub fn predicate(&self) -> &str {
        &self.label.formatter
    }
}

/// Nodes, links and categories of one rendering
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VisualGraph {
    nodes: Vec<VisualNode>,
    links: Vec<VisualLink>,
    categories: Vec<Category>,
    #[serde(skip)]
    category_index: HashMap<String, usize>,
    #[serde(skip)]
    node_ids: HashSet<String>,
}

impl VisualGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Graph with categories reserved at fixed indices, in the given order
    pub fn with_categories<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut graph = Self::new();
        for name in names {
            graph.category(name);
        }
        graph
    }

    /// Index of `name`, appending it as a new category on first sight
    pub fn category(&mut self, name: impl Into<String>) -> usize {
        let name = name.into();
        if let Some(&index) = self.category_index.get(&name) {
            return index;
        }
        let index = self.categories.len();
        self.category_index.insert(name.clone(), index);
        self.categories.push(Category { name });
        index
    }

    pub fn category_of(&self, name: &str) -> Option<usize> {
        self.category_index.get(name).copied()
    }

    /// Add a node unless one with the same id exists; returns whether it was added
    pub fn add_node(&mut self, node: VisualNode) -> bool {
        if !self.node_ids.insert(node.id.clone()) {
            return false;
        }
        self.nodes.push(node);
        true
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node_ids.contains(id)
    }

    pub fn add_link(&mut self, link: VisualLink) {
        self.links.push(link);
    }

    pub fn nodes(&self) -> &[VisualNode] {
        &self.nodes
    }

    pub fn links(&self) -> &[VisualLink] {
        &self.links
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn node(&self, id: &str) -> Option<&VisualNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Check the payload invariants: unique node ids, link endpoints present,
    /// category indices in range
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for node in &self.nodes {
            if !seen.insert(node.id.as_str()) {
                return Err(ViewerError::Validation(format!("Duplicate node id: {}", node.id)));
            }
            if node.category >= self.categories.len() {
                return Err(ViewerError::Validation(format!(
                    "Node {} references category {} of {}",
                    node.id,
                    node.category,
                    self.categories.len()
                )));
            }
        }
        for link in &self.links {
            for end in [&link.source, &link.target] {
                if !seen.contains(end.as_str()) {
                    return Err(ViewerError::Validation(format!(
                        "Link {} -> {} references missing node {}",
                        link.source, link.target, end
                    )));
                }
            }
        }
        Ok(())
    }

    /// Content-derived identity for the rendered widget
    ///
    /// Independent of node and link insertion order.
    pub fn stable_key(&self) -> String {
        let mut nodes: Vec<String> = self
            .nodes
            .iter()
            .map(|n| {
                let category = self.categories.get(n.category).map_or("", |c| c.name.as_str());
                format!("{}|{}|{}", n.id, category, n.symbol_size.unwrap_or_default())
            })
            .collect();
        nodes.sort();
        let mut links: Vec<String> = self
            .links
            .iter()
            .map(|l| format!("{}|{}|{}", l.source, l.target, l.predicate()))
            .collect();
        links.sort();

        let mut hasher = crc32fast::Hasher::new();
        for entry in nodes.iter().chain(std::iter::once(&String::new())).chain(links.iter()) {
            hasher.update(entry.as_bytes());
            hasher.update(b"\n");
        }
        format!("graph-{:08x}", hasher.finalize())
    }

    /// Full chart options for a force-directed graph widget
    pub fn to_options(&self, title: &str, label_visible: bool) -> Value {
        json!({
            "title": { "text": title },
            "tooltip": {},
            "legend": [{ "data": self.categories.iter().map(|c| c.name.as_str()).collect::<Vec<_>>() }],
            "series": [{
                "type": "graph",
                "layout": "force",
                "data": self.nodes,
                "links": self.links,
                "categories": self.categories,
                "roam": true,
                "label": { "show": label_visible, "position": "right" },
                "edgeSymbol": ["none", "arrow"],
                "force": { "repulsion": 100, "edgeLength": 50 },
                "emphasis": { "focus": "adjacency" }
            }]
        })
    }
}
