//! One-hop graphs around a focal instance, class or property
//!
//! Neighbors are visited in label order so a repeated render yields the
//! same payload. Literals and blank nodes are left out.

use oxigraph::model::{NamedNode, NamedNodeRef, Subject, Term};
use serde::Serialize;
use serde_json::Value;

use crate::errors::Result;
use crate::graph::edge::EdgeKind;
use crate::graph::model::{VisualGraph, VisualLink, VisualNode, UNDEFINED_CATEGORY};
use crate::store::vocab::{owl, rdf};
use crate::store::{iri_fragment, label_namespace, SchemaStore};

pub const INSTANCE_CATEGORY: &str = "Instance";
pub const CLASS_CATEGORY: &str = "Class";

#[derive(Debug, Clone, Serialize)]
pub struct Neighborhood {
    pub focus: String,
    pub title: String,
    pub graph: VisualGraph,
}

impl Neighborhood {
    pub fn to_options(&self, label_visible: bool) -> Value {
        self.graph.to_options(&self.title, label_visible)
    }
}

pub struct NeighborhoodBuilder<'a> {
    store: &'a SchemaStore,
}

impl<'a> NeighborhoodBuilder<'a> {
    pub fn new(store: &'a SchemaStore) -> Self {
        Self { store }
    }

    /// Focal individual with every outgoing and incoming non-literal neighbor
    ///
    /// Categories `Instance`, `Class` and `Undefined` sit at indices 0-2;
    /// other neighbors are grouped under their first declared type.
    pub fn instance(&self, focus: NamedNodeRef<'_>) -> Result<Neighborhood> {
        let focus_label = self.store.label(focus);
        let mut graph = VisualGraph::with_categories([INSTANCE_CATEGORY, CLASS_CATEGORY, UNDEFINED_CATEGORY]);
        graph.add_node(VisualNode::new(focus_label.clone(), 0).with_value(focus.as_str()));

        let mut outgoing: Vec<(String, String, NamedNode, bool)> = Vec::new();
        for (predicate, object) in self.store.predicate_objects(focus.into())? {
            let Term::NamedNode(object) = object else {
                continue;
            };
            outgoing.push((
                self.store.label(predicate.as_ref()),
                self.store.label(object.as_ref()),
                object,
                predicate.as_ref() == rdf::TYPE,
            ));
        }
        outgoing.sort_by(|a, b| (&a.0, &a.1).cmp(&(&b.0, &b.1)));

        for (predicate, label, object, is_type) in outgoing {
            if !graph.contains_node(&label) {
                let category = if is_type {
                    graph.category(CLASS_CATEGORY)
                } else {
                    self.type_category(&mut graph, object.as_ref())?
                };
                graph.add_node(VisualNode::new(label.clone(), category).with_value(object.as_str()));
            }
            graph.add_link(
                VisualLink::new(focus_label.clone(), label, predicate)
                    .dashed()
                    .show_label(),
            );
        }

        let mut incoming: Vec<(String, String, NamedNode)> = Vec::new();
        for (subject, predicate) in self.store.subject_predicates(focus.into())? {
            let Subject::NamedNode(subject) = subject else {
                continue;
            };
            incoming.push((
                self.store.label(predicate.as_ref()),
                self.store.label(subject.as_ref()),
                subject,
            ));
        }
        incoming.sort_by(|a, b| (&a.0, &a.1).cmp(&(&b.0, &b.1)));

        for (predicate, label, subject) in incoming {
            if !graph.contains_node(&label) {
                let category = self.type_category(&mut graph, subject.as_ref())?;
                graph.add_node(VisualNode::new(label.clone(), category).with_value(subject.as_str()));
            }
            graph.add_link(
                VisualLink::new(label, focus_label.clone(), predicate)
                    .dashed()
                    .show_label(),
            );
        }

        Ok(Neighborhood {
            title: short_title(&focus_label, focus),
            focus: focus_label,
            graph,
        })
    }

    /// Focal class with its direct subclasses and superclasses
    pub fn class(&self, focus: NamedNodeRef<'_>) -> Result<Neighborhood> {
        let edge = EdgeKind::SubClassOf;
        let focus_label = self.store.label(focus);
        let mut graph = VisualGraph::new();
        self.add_namespaced(&mut graph, &focus_label, focus);

        for (label, sub) in self.named_subjects(edge.predicate(), focus)? {
            self.add_namespaced(&mut graph, &label, sub.as_ref());
            graph.add_link(VisualLink::new(label, focus_label.clone(), edge.label()));
        }
        for (label, sup) in self.named_objects(focus, edge.predicate())? {
            self.add_namespaced(&mut graph, &label, sup.as_ref());
            graph.add_link(VisualLink::new(focus_label.clone(), label, edge.label()));
        }

        Ok(Neighborhood {
            title: focus_label.clone(),
            focus: focus_label,
            graph,
        })
    }

    /// Focal property with sub/super properties, inverses, domain and range
    pub fn property(&self, focus: NamedNodeRef<'_>) -> Result<Neighborhood> {
        let focus_label = self.store.label(focus);
        let mut graph = VisualGraph::new();
        self.add_namespaced(&mut graph, &focus_label, focus);

        let sub_property = EdgeKind::SubPropertyOf;
        for (label, sub) in self.named_subjects(sub_property.predicate(), focus)? {
            self.add_namespaced(&mut graph, &label, sub.as_ref());
            graph.add_link(VisualLink::new(label, focus_label.clone(), sub_property.label()));
        }
        for (label, sup) in self.named_objects(focus, sub_property.predicate())? {
            self.add_namespaced(&mut graph, &label, sup.as_ref());
            graph.add_link(VisualLink::new(focus_label.clone(), label, sub_property.label()));
        }

        let inverse = EdgeKind::InverseOf;
        for (label, other) in self.named_objects(focus, inverse.predicate())? {
            self.add_namespaced(&mut graph, &label, other.as_ref());
            for (source, target) in [(&focus_label, &label), (&label, &focus_label)] {
                graph.add_link(
                    VisualLink::new(source.clone(), target.clone(), inverse.label())
                        .dashed()
                        .show_label()
                        .curved(0.2),
                );
            }
        }

        for edge in [EdgeKind::Domain, EdgeKind::Range] {
            for (label, class) in self.named_objects(focus, edge.predicate())? {
                self.add_namespaced(&mut graph, &label, class.as_ref());
                graph.add_link(
                    VisualLink::new(focus_label.clone(), label, edge.label())
                        .dashed()
                        .show_label(),
                );
            }
        }

        Ok(Neighborhood {
            title: focus_label.clone(),
            focus: focus_label,
            graph,
        })
    }

    fn add_namespaced(&self, graph: &mut VisualGraph, label: &str, iri: NamedNodeRef<'_>) {
        if graph.contains_node(label) {
            return;
        }
        let category = graph.category(label_namespace(label));
        graph.add_node(VisualNode::new(label, category).with_value(iri.as_str()));
    }

    /// Category of the node's first declared type other than `owl:NamedIndividual`
    fn type_category(&self, graph: &mut VisualGraph, node: NamedNodeRef<'_>) -> Result<usize> {
        let mut types: Vec<String> = self
            .store
            .types_of(node.into())?
            .into_iter()
            .filter_map(|t| match t {
                Term::NamedNode(n) if n.as_ref() != owl::NAMED_INDIVIDUAL => Some(self.store.label(n.as_ref())),
                _ => None,
            })
            .collect();
        types.sort();
        Ok(match types.into_iter().next() {
            Some(declared) => graph.category(declared),
            None => graph.category(UNDEFINED_CATEGORY),
        })
    }

    fn named_subjects(&self, predicate: NamedNodeRef<'_>, object: NamedNodeRef<'_>) -> Result<Vec<(String, NamedNode)>> {
        let mut nodes: Vec<(String, NamedNode)> = self
            .store
            .subjects(predicate, object.into())?
            .into_iter()
            .filter_map(|s| match s {
                Subject::NamedNode(n) => Some((self.store.label(n.as_ref()), n)),
                _ => None,
            })
            .collect();
        nodes.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(nodes)
    }

    fn named_objects(&self, subject: NamedNodeRef<'_>, predicate: NamedNodeRef<'_>) -> Result<Vec<(String, NamedNode)>> {
        let mut nodes: Vec<(String, NamedNode)> = self
            .store
            .objects(subject.into(), predicate)?
            .into_iter()
            .filter_map(|o| match o {
                Term::NamedNode(n) => Some((self.store.label(n.as_ref()), n)),
                _ => None,
            })
            .collect();
        nodes.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(nodes)
    }
}

/// Local part of a `prefix:local` label; the IRI fragment when unabbreviated
fn short_title(label: &str, iri: NamedNodeRef<'_>) -> String {
    if label.starts_with('<') {
        return iri_fragment(iri.as_str()).to_string();
    }
    match label.split_once(':') {
        Some((_, local)) => local.to_string(),
        None => label.to_string(),
    }
}
