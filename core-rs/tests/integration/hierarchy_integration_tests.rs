//! Integration tests for hierarchy extraction
//!
//! Runs the extractor against in-memory TriG datasets:
//! - Seed expansion over subClassOf / subPropertyOf
//! - Namespace categories and degree-based sizing
//! - Blank-node and cycle handling
//! - Whole-ontology payloads

use ifcsv_core::graph::{EdgeKind, HierarchyExtractor};
use ifcsv_core::store::vocab::rdfs;
use ifcsv_core::{RenderingConfig, SchemaStore};
use oxigraph::model::NamedNode;
use std::collections::HashSet;

const IFC: &str = "http://www.semantic.org/zeyupan/instances/CoALA4IFC_Schema_Inst#";

fn ifc(local: &str) -> NamedNode {
    NamedNode::new(format!("{}{}", IFC, local)).unwrap()
}

const WALL_DATASET: &str = r#"
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix ifc: <http://www.semantic.org/zeyupan/instances/CoALA4IFC_Schema_Inst#> .

ifc:IfcWall rdfs:subClassOf ifc:IfcBuildingElement .
ifc:IfcWallStandardCase rdfs:subClassOf ifc:IfcWall .
"#;

const SIBLING_DATASET: &str = r#"
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix ifc: <http://www.semantic.org/zeyupan/instances/CoALA4IFC_Schema_Inst#> .

ifc:IfcWall rdfs:subClassOf ifc:IfcBuildingElement .
ifc:IfcSlab rdfs:subClassOf ifc:IfcBuildingElement .
ifc:IfcBuildingElement rdfs:subClassOf ifc:IfcElement .
ifc:IfcDoor rdfs:subClassOf ifc:IfcElement .
ifc:IfcSIUnit rdfs:subClassOf ifc:IfcNamedUnit .
"#;

const MIXED_DATASET: &str = r#"
@prefix rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix skos: <http://www.w3.org/2004/02/skos/core#> .
@prefix express: <http://www.semantic.org/zeyupan/ontologies/CoALA4IFC_Schema_Ont#> .
@prefix ifc: <http://www.semantic.org/zeyupan/instances/CoALA4IFC_Schema_Inst#> .

express:Entity a owl:Class ; rdfs:subClassOf express:Concept .
express:Enum a owl:Class ; rdfs:subClassOf express:Type .
express:Type rdfs:subClassOf express:Concept .
express:Concept rdfs:subClassOf skos:Concept .
express:Entity rdfs:subClassOf [ a owl:Restriction ; owl:onProperty express:name ] .

express:hasEntity a owl:ObjectProperty ; rdfs:subPropertyOf express:hasConcept .
express:hasType a owl:ObjectProperty ; rdfs:subPropertyOf express:hasConcept .
express:hasConcept a owl:ObjectProperty .
express:name a owl:DatatypeProperty .

ifc:IFC_SCHEMA_GRAPH {
    ifc:IfcA rdfs:subClassOf ifc:IfcB .
    ifc:IfcB rdfs:subClassOf ifc:IfcA .
}
"#;

/// Test: IfcWall seed pulls in its superclass and subclass
///
/// Three nodes, two links, a single `ifc` category at index 0.
#[test]
fn test_ifc_wall_scenario() {
    let store = SchemaStore::from_trig(WALL_DATASET).unwrap();
    let extractor = HierarchyExtractor::new(&store, RenderingConfig::default());

    let hierarchy = extractor.extract(rdfs::SUB_CLASS_OF, &[ifc("IfcWall")]).unwrap();
    let graph = &hierarchy.graph;

    let ids: HashSet<&str> = graph.nodes().iter().map(|n| n.id.as_str()).collect();
    let expected: HashSet<&str> = ["ifc:IfcWall", "ifc:IfcBuildingElement", "ifc:IfcWallStandardCase"]
        .into_iter()
        .collect();
    assert_eq!(ids, expected);
    assert_eq!(graph.links().len(), 2);
    assert_eq!(graph.categories().len(), 1);
    assert_eq!(graph.categories()[0].name, "ifc");
    assert!(graph.nodes().iter().all(|n| n.category == 0));
    graph.validate().unwrap();

    assert_eq!(hierarchy.in_degrees["ifc:IfcBuildingElement"], 1);
    assert_eq!(hierarchy.in_degrees["ifc:IfcWall"], 1);
    assert_eq!(hierarchy.in_degrees["ifc:IfcWallStandardCase"], 0);
    assert_eq!(hierarchy.refreshed["ifc:IfcBuildingElement"], 2);
}

/// Test: a discovered parent joins the working set and pulls in its other children
///
/// IfcWall reaches IfcBuildingElement, whose other subclass IfcSlab comes along,
/// then IfcElement and its subclass IfcDoor. The unit classes stay out.
#[test]
fn test_discovered_parent_pulls_in_siblings() {
    let store = SchemaStore::from_trig(SIBLING_DATASET).unwrap();
    let extractor = HierarchyExtractor::new(&store, RenderingConfig::default());

    let hierarchy = extractor.extract(rdfs::SUB_CLASS_OF, &[ifc("IfcWall")]).unwrap();
    let ids: Vec<&str> = hierarchy.graph.nodes().iter().map(|n| n.id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["ifc:IfcWall", "ifc:IfcBuildingElement", "ifc:IfcElement", "ifc:IfcDoor", "ifc:IfcSlab"]
    );
    assert_eq!(hierarchy.graph.links().len(), 4);
    assert!(hierarchy.graph.node("ifc:IfcSIUnit").is_none());
    assert!(hierarchy.graph.node("ifc:IfcNamedUnit").is_none());

    assert_eq!(hierarchy.in_degrees["ifc:IfcBuildingElement"], 2);
    assert_eq!(hierarchy.in_degrees["ifc:IfcElement"], 2);
    assert_eq!(hierarchy.refreshed["ifc:IfcElement"], 4);
    hierarchy.graph.validate().unwrap();
}

/// Test: seed order is preserved and duplicates collapse
#[test]
fn test_seeds_first_and_deduplicated() {
    let store = SchemaStore::from_trig(WALL_DATASET).unwrap();
    let extractor = HierarchyExtractor::new(&store, RenderingConfig::default());

    let hierarchy = extractor
        .extract(rdfs::SUB_CLASS_OF, &[ifc("IfcWallStandardCase"), ifc("IfcWall"), ifc("IfcWall")])
        .unwrap();
    let ids: Vec<&str> = hierarchy.graph.nodes().iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids[0], "ifc:IfcWallStandardCase");
    assert_eq!(ids[1], "ifc:IfcWall");
    assert_eq!(ids.len(), 3);
}

/// Test: every link carries the requested predicate and node ids are unique
#[test]
fn test_links_use_requested_predicate() {
    let store = SchemaStore::from_trig(MIXED_DATASET).unwrap();
    let extractor = HierarchyExtractor::new(&store, RenderingConfig::default());

    for hierarchy in [extractor.class_hierarchy().unwrap(), extractor.property_hierarchy().unwrap()] {
        let mut seen = HashSet::new();
        for node in hierarchy.graph.nodes() {
            assert!(seen.insert(node.id.clone()), "duplicate node {}", node.id);
        }
        assert!(hierarchy.graph.links().iter().all(|l| l.predicate() == hierarchy.predicate));
        hierarchy.graph.validate().unwrap();
    }
}

/// Test: blank nodes never become nodes or link endpoints
#[test]
fn test_blank_nodes_are_skipped() {
    let store = SchemaStore::from_trig(MIXED_DATASET).unwrap();
    let extractor = HierarchyExtractor::new(&store, RenderingConfig::default());
    let hierarchy = extractor.class_hierarchy().unwrap();

    assert!(hierarchy.graph.nodes().iter().all(|n| !n.id.starts_with("_:")));
    assert!(hierarchy
        .graph
        .links()
        .iter()
        .all(|l| !l.source.starts_with("_:") && !l.target.starts_with("_:")));
    assert_eq!(hierarchy.skipped_edges, 1);
}

/// Test: cyclic subClassOf data renders with finite sizes
#[test]
fn test_cyclic_hierarchy_terminates() {
    let store = SchemaStore::from_trig(MIXED_DATASET).unwrap();
    let extractor = HierarchyExtractor::new(&store, RenderingConfig::default());

    let hierarchy = extractor.extract(rdfs::SUB_CLASS_OF, &[ifc("IfcA")]).unwrap();
    assert_eq!(hierarchy.graph.nodes().len(), 2);
    assert_eq!(hierarchy.graph.links().len(), 2);
    assert!(hierarchy.cycles >= 1);
    assert!(hierarchy
        .graph
        .nodes()
        .iter()
        .all(|n| n.symbol_size.map_or(false, f64::is_finite)));
}

/// Test: whole-ontology titles count the seeds
#[test]
fn test_whole_ontology_titles() {
    let store = SchemaStore::from_trig(MIXED_DATASET).unwrap();
    let extractor = HierarchyExtractor::new(&store, RenderingConfig::default());

    // express:Entity, Enum, Type, Concept, skos:Concept, ifc:IfcA, ifc:IfcB
    let classes = extractor.class_hierarchy().unwrap();
    assert_eq!(classes.title, "Class Hierarchy\n\nTotal:7");
    assert_eq!(classes.seed_count, 7);

    let properties = extractor.property_hierarchy().unwrap();
    assert_eq!(properties.title, "Property Hierarchy\n\nTotal:4");
    assert_eq!(properties.predicate, EdgeKind::SubPropertyOf.label());
    assert_eq!(properties.in_degrees["express:hasConcept"], 2);

    let options = properties.to_options(true);
    assert_eq!(options["title"]["text"], "Property Hierarchy\n\nTotal:4");
    assert_eq!(options["series"][0]["label"]["show"], true);
}

/// Test: categories follow namespace first-sight order
#[test]
fn test_namespace_categories() {
    let store = SchemaStore::from_trig(MIXED_DATASET).unwrap();
    let extractor = HierarchyExtractor::new(&store, RenderingConfig::default());
    let hierarchy = extractor.class_hierarchy().unwrap();

    let names: Vec<&str> = hierarchy.graph.categories().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["express", "ifc", "skos"]);
    let skos = hierarchy.graph.node("skos:Concept").unwrap();
    assert_eq!(skos.category, 2);
}

/// Test: rendering twice gives the same payload
#[test]
fn test_repeat_render_is_identical() {
    let store = SchemaStore::from_trig(MIXED_DATASET).unwrap();
    let extractor = HierarchyExtractor::new(&store, RenderingConfig::default());

    let first = extractor.class_hierarchy().unwrap();
    let second = extractor.class_hierarchy().unwrap();
    assert_eq!(first.graph, second.graph);
    assert_eq!(first.graph.stable_key(), second.graph.stable_key());
    assert_eq!(
        serde_json::to_string(&first.to_options(false)).unwrap(),
        serde_json::to_string(&second.to_options(false)).unwrap()
    );
}
