/**
 * hierarchy.rs
 * Induced subgraph of one hierarchy predicate around a seed set
 *
 * An edge is taken once either endpoint is in the working set, and both of
 * its endpoints join the set, until nothing new is found. A seed therefore
 * pulls in its parents, its children and its parents' other children.
 * Blank-node and literal endpoints are never followed and never rendered.
 */

use oxigraph::model::{NamedNode, NamedNodeRef, Subject, Term};
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, warn};

use crate::config::RenderingConfig;
use crate::errors::Result;
use crate::graph::degree::{symbol_size, DegreeRefiner};
use crate::graph::edge::EdgeKind;
use crate::graph::model::{VisualGraph, VisualLink, VisualNode};
use crate::status::{class_inventory, PropertyInventory};
use crate::store::{label_namespace, SchemaStore};

/// Rendered hierarchy plus the degree bookkeeping behind its symbol sizes
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hierarchy {
    pub title: String,
    pub predicate: String,
    pub seed_count: usize,
    pub graph: VisualGraph,
    /// Direct children per node label
    pub in_degrees: BTreeMap<String, usize>,
    /// Direct children labels per node label, in link order
    pub inheritance: BTreeMap<String, Vec<String>>,
    pub refreshed: BTreeMap<String, usize>,
    pub skipped_edges: usize,
    pub cycles: usize,
}

impl Hierarchy {
    /// Chart options for the whole hierarchy
    pub fn to_options(&self, label_visible: bool) -> Value {
        self.graph.to_options(&self.title, label_visible)
    }
}

struct Edge {
    source: String,
    source_iri: NamedNode,
    target: String,
    target_iri: NamedNode,
}

pub struct HierarchyExtractor<'a> {
    store: &'a SchemaStore,
    rendering: RenderingConfig,
}

impl<'a> HierarchyExtractor<'a> {
    pub fn new(store: &'a SchemaStore, rendering: RenderingConfig) -> Self {
        Self { store, rendering }
    }

    /// Every named class, linked by `rdfs:subClassOf`
    pub fn class_hierarchy(&self) -> Result<Hierarchy> {
        let seeds = class_inventory(self.store)?;
        let mut hierarchy = self.extract(EdgeKind::SubClassOf.predicate(), &seeds)?;
        hierarchy.title = format!("Class Hierarchy\n\nTotal:{}", seeds.len());
        Ok(hierarchy)
    }

    /// Every declared object, datatype and annotation property, linked by `rdfs:subPropertyOf`
    pub fn property_hierarchy(&self) -> Result<Hierarchy> {
        let seeds = PropertyInventory::collect(self.store)?.all();
        let mut hierarchy = self.extract(EdgeKind::SubPropertyOf.predicate(), &seeds)?;
        hierarchy.title = format!("Property Hierarchy\n\nTotal:{}", seeds.len());
        Ok(hierarchy)
    }

    /// Hierarchy induced by `predicate` around `seeds`
    ///
    /// Nodes are the seeds in the given order followed by discovered nodes in
    /// link order. Links follow label order of `(subject, object)`.
    pub fn extract(&self, predicate: NamedNodeRef<'_>, seeds: &[NamedNode]) -> Result<Hierarchy> {
        let predicate_label = self.store.label(predicate);

        let mut skipped_edges = 0;
        let mut candidates = Vec::new();
        for (subject, object) in self.store.subject_objects(predicate)? {
            let (Subject::NamedNode(source_iri), Term::NamedNode(target_iri)) = (subject, object) else {
                skipped_edges += 1;
                continue;
            };
            candidates.push(Edge {
                source: self.store.label(source_iri.as_ref()),
                source_iri,
                target: self.store.label(target_iri.as_ref()),
                target_iri,
            });
        }
        if skipped_edges > 0 {
            debug!(predicate = %predicate_label, skipped_edges, "skipped edges with blank or literal endpoints");
        }
        candidates.sort_by(|a, b| (&a.source, &a.target).cmp(&(&b.source, &b.target)));
        candidates.dedup_by(|a, b| a.source == b.source && a.target == b.target);

        let mut order: Vec<(String, NamedNode)> = Vec::new();
        let mut known: HashSet<String> = HashSet::new();
        for seed in seeds {
            let label = self.store.label(seed.as_ref());
            if known.insert(label.clone()) {
                order.push((label, seed.clone()));
            }
        }

        let mut reached = known.clone();
        let mut taken = vec![false; candidates.len()];
        loop {
            let mut changed = false;
            for (i, edge) in candidates.iter().enumerate() {
                if taken[i] || !(reached.contains(&edge.source) || reached.contains(&edge.target)) {
                    continue;
                }
                taken[i] = true;
                changed = true;
                reached.insert(edge.source.clone());
                reached.insert(edge.target.clone());
            }
            if !changed {
                break;
            }
        }

        let edges: Vec<&Edge> = candidates
            .iter()
            .zip(&taken)
            .filter_map(|(edge, &taken)| taken.then_some(edge))
            .collect();
        for edge in &edges {
            for (label, iri) in [(&edge.source, &edge.source_iri), (&edge.target, &edge.target_iri)] {
                if known.insert(label.clone()) {
                    order.push((label.clone(), iri.clone()));
                }
            }
        }

        let mut in_degrees: HashMap<String, usize> = order.iter().map(|(label, _)| (label.clone(), 0)).collect();
        let mut inheritance: HashMap<String, Vec<String>> = HashMap::new();
        for edge in &edges {
            *in_degrees.entry(edge.target.clone()).or_insert(0) += 1;
            inheritance.entry(edge.target.clone()).or_default().push(edge.source.clone());
        }

        let mut refiner = DegreeRefiner::new(&in_degrees, &inheritance);
        refiner.refresh_all();
        let cycles = refiner.cycles();
        let refreshed = refiner.into_refreshed();
        if cycles > 0 {
            warn!(predicate = %predicate_label, cycles, "hierarchy contains cycles");
        }

        let mut graph = VisualGraph::new();
        for (label, iri) in &order {
            let category = graph.category(label_namespace(label));
            let node = VisualNode::new(label.clone(), category)
                .sized(symbol_size(refreshed.get(label).copied(), &self.rendering))
                .fixed()
                .with_value(iri.as_str());
            graph.add_node(node);
        }
        for edge in &edges {
            graph.add_link(VisualLink::new(edge.source.clone(), edge.target.clone(), predicate_label.clone()));
        }

        debug!(
            predicate = %predicate_label,
            nodes = graph.nodes().len(),
            links = graph.links().len(),
            "hierarchy extracted"
        );

        Ok(Hierarchy {
            title: predicate_label.clone(),
            predicate: predicate_label,
            seed_count: seeds.len(),
            graph,
            in_degrees: in_degrees.into_iter().collect(),
            inheritance: inheritance.into_iter().collect(),
            refreshed: refreshed.into_iter().collect(),
            skipped_edges,
            cycles,
        })
    }
}
