//! Integration tests for concept detail resolution
//!
//! Resolves every detail kind against one in-memory schema graph:
//! - Entity sections (ancestors, subtypes, attributes, property sets)
//! - Enumerations, selects, derived types and set templates
//! - Unknown tags and unknown IRIs
//! - Session caches and drill-down navigation

use ifcsv_core::schema::{
    CollectionKind, ConceptBody, ConceptKind, ConceptResolver, Selection, Session, SessionRegistry,
};
use ifcsv_core::SchemaStore;
use oxigraph::io::RdfFormat;
use std::sync::Arc;

const IFC: &str = "http://www.semantic.org/zeyupan/instances/CoALA4IFC_Schema_Inst#";

fn ifc(local: &str) -> String {
    format!("{}{}", IFC, local)
}

const SCHEMA: &str = r#"
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix express: <http://www.semantic.org/zeyupan/ontologies/CoALA4IFC_Schema_Ont#> .
@prefix ifc: <http://www.semantic.org/zeyupan/instances/CoALA4IFC_Schema_Inst#> .

ifc:IFC_SCHEMA_GRAPH {
    ifc:IfcRoot a express:Entity, owl:NamedIndividual ;
        express:name "IfcRoot" ;
        express:definitions "Root of every entity" ;
        express:superClassOf ifc:IfcWall .

    ifc:IfcWall a express:Entity, owl:NamedIndividual ;
        express:name "IfcWall" ;
        express:definitions "A wall.\nUsually vertical." ;
        express:subClassOf ifc:IfcRoot ;
        express:superClassOf ifc:IfcWallStandardCase ;
        express:hasDirectAttribute ifc:IfcWall_PredefinedType, ifc:IfcWall_Name, ifc:IfcWall_Tag ;
        express:hasInverseAttribute ifc:IfcWall_HasOpenings .

    ifc:IfcWallStandardCase a express:Entity ;
        express:name "IfcWallStandardCase" ;
        express:subClassOf ifc:IfcWall .

    ifc:IfcRelVoidsElement a express:Entity ;
        express:name "IfcRelVoidsElement" .

    ifc:IfcWall_PredefinedType express:name "PredefinedType" ;
        express:is_optional true ;
        express:direct_attr_num 3 ;
        express:cardinality "1" ;
        express:attrRange ifc:IfcWallTypeEnum .
    ifc:IfcWall_Name express:name "Name" ;
        express:is_optional false ;
        express:direct_attr_num 1 ;
        express:cardinality "1" ;
        express:description "Human readable name" ;
        express:attrRange ifc:IfcLabel .
    ifc:IfcWall_Tag express:name "Tag" ;
        express:is_optional true ;
        express:direct_attr_num 2 ;
        express:cardinality "1" ;
        express:attrRange ifc:IfcIdentifier .
    ifc:IfcWall_HasOpenings express:name "HasOpenings" ;
        express:is_optional false ;
        express:cardinality "SET [0:?]" ;
        express:attrRange ifc:IfcRelVoidsElement .

    ifc:IfcWallTypeEnum a express:Enum ;
        express:name "IfcWallTypeEnum" ;
        express:hasValue ifc:IfcWallTypeEnum_SOLIDWALL, ifc:IfcWallTypeEnum_MOVABLE .
    ifc:IfcWallTypeEnum_SOLIDWALL a express:EnumValue ;
        express:name "SOLIDWALL" ;
        express:description "Solid wall" .
    ifc:IfcWallTypeEnum_MOVABLE a express:EnumValue ;
        express:name "MOVABLE" ;
        express:description "Movable partition" .

    ifc:IfcLabel a express:DerivedType ;
        express:name "IfcLabel" ;
        express:derivedFrom ifc:STRING ;
        express:cardinality "1" .
    ifc:IfcIdentifier a express:DerivedType ;
        express:name "IfcIdentifier" ;
        express:derivedFrom ifc:STRING ;
        express:cardinality "1" .
    ifc:IfcLineIndex a express:DerivedType ;
        express:name "IfcLineIndex" ;
        express:derivedFrom ifc:IfcPositiveInteger ;
        express:cardinality "LIST [2:?]" .

    ifc:IfcSel a express:Select ;
        express:name "IfcSel" ;
        express:hasValue ifc:IfcMemberA, ifc:IfcMemberB .
    ifc:IfcMemberA a express:Entity, owl:NamedIndividual ;
        express:name "IfcMemberA" .
    ifc:IfcMemberB a express:Enum, owl:NamedIndividual ;
        express:name "IfcMemberB" .

    ifc:Pset_WallCommon a express:PropertySetTemplate ;
        express:name "Pset_WallCommon" ;
        express:applicableTo ifc:IfcWall ;
        express:hasPropTemplate ifc:Pset_WallCommon_IsExternal, ifc:Pset_WallCommon_Status .
    ifc:Pset_WallCommon_IsExternal express:name "IsExternal" ;
        express:data_type "IfcBoolean" ;
        express:property_type "P_SINGLEVALUE" ;
        express:dataType ifc:IfcBoolean .
    ifc:Pset_WallCommon_Status express:name "Status" ;
        express:data_type "IfcLabel" ;
        express:dataType ifc:PEnum_ElementStatus .
    ifc:IfcBoolean a express:DerivedType ;
        express:name "IfcBoolean" .
    ifc:PEnum_ElementStatus a express:PropertyEnumeration ;
        express:name "PEnum_ElementStatus" ;
        express:hasValue ifc:PEnum_ElementStatus_NEW .
    ifc:PEnum_ElementStatus_NEW a express:EnumValue ;
        express:name "NEW" ;
        express:description "Newly built" .
}
"#;

fn store() -> SchemaStore {
    SchemaStore::from_trig(SCHEMA).unwrap()
}

/// Test: entity sections are complete and direct attributes follow their index
#[test]
fn test_entity_detail() {
    let store = store();
    let resolver = ConceptResolver::new(&store);

    let detail = resolver.resolve(ConceptKind::Entity, &ifc("IfcWall")).unwrap().unwrap();
    assert_eq!(detail.label, "IfcWall");
    assert_eq!(detail.definitions.as_deref(), Some("A wall.\nUsually vertical."));
    assert_eq!(detail.definitions_markdown(), "A wall.\n\nUsually vertical.");

    let ConceptBody::Entity(entity) = &detail.body else {
        panic!("expected entity body, got {:?}", detail.kind());
    };

    let supers: Vec<&str> = entity.super_entities.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(supers, vec!["IfcRoot"]);
    assert_eq!(entity.super_entities[0].definitions, "Root of every entity");
    let subs: Vec<&str> = entity.sub_entities.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(subs, vec!["IfcWallStandardCase"]);

    let direct: Vec<(Option<u32>, &str)> = entity
        .direct_attributes
        .iter()
        .map(|a| (a.index, a.name.as_str()))
        .collect();
    assert_eq!(direct, vec![(Some(1), "Name"), (Some(2), "Tag"), (Some(3), "PredefinedType")]);

    let name = &entity.direct_attributes[0];
    assert_eq!(name.range, "IfcLabel");
    assert_eq!(name.express_type, "express:DerivedType");
    assert_eq!(name.optional_flag(), "F");
    assert_eq!(name.description, "Human readable name");
    assert_eq!(entity.direct_attributes[2].optional_flag(), "T");
    assert_eq!(entity.direct_attributes[2].express_type, "express:Enum");

    assert_eq!(entity.inverse_attributes.len(), 1);
    assert_eq!(entity.inverse_attributes[0].index, None);
    assert_eq!(entity.inverse_attributes[0].cardinality, "SET [0:?]");

    assert_eq!(entity.pset_templates.len(), 1);
    assert_eq!(entity.pset_templates[0].name, "Pset_WallCommon");
    assert_eq!(entity.pset_templates[0].express_type, "express:PropertySetTemplate");
}

/// Test: subtypes inherit property sets declared on an ancestor
#[test]
fn test_subtype_inherits_pset_templates() {
    let store = store();
    let resolver = ConceptResolver::new(&store);

    let detail = resolver
        .resolve(ConceptKind::Entity, &ifc("IfcWallStandardCase"))
        .unwrap()
        .unwrap();
    let ConceptBody::Entity(entity) = &detail.body else {
        panic!("expected entity body");
    };
    let supers: Vec<&str> = entity.super_entities.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(supers, vec!["IfcRoot", "IfcWall"]);
    assert!(entity.direct_attributes.is_empty());
    assert_eq!(entity.pset_templates[0].iri, ifc("Pset_WallCommon"));
}

/// Test: select with an entity member and an enum member
///
/// Both members carry a tag that resolves to a detail kind.
#[test]
fn test_select_members_have_resolvable_tags() {
    let store = store();
    let resolver = ConceptResolver::new(&store);

    let detail = resolver.resolve_tag("express:Select", &ifc("IfcSel")).unwrap().unwrap();
    let ConceptBody::Select(select) = &detail.body else {
        panic!("expected select body");
    };

    assert_eq!(select.members.len(), 2);
    assert_eq!(select.members[0].name, "IfcMemberA");
    assert_eq!(select.members[0].kind(), Some(ConceptKind::Entity));
    assert_eq!(select.members[1].name, "IfcMemberB");
    assert_eq!(select.members[1].kind(), Some(ConceptKind::Enum));

    for member in &select.members {
        let selection = member.selection().unwrap();
        assert!(resolver.resolve_selection(&selection).unwrap().is_some());
    }
}

/// Test: enumeration members and every entity using the enumeration
#[test]
fn test_enum_detail() {
    let store = store();
    let resolver = ConceptResolver::new(&store);

    let detail = resolver.resolve(ConceptKind::Enum, &ifc("IfcWallTypeEnum")).unwrap().unwrap();
    let ConceptBody::Enum(enumeration) = &detail.body else {
        panic!("expected enum body");
    };

    let members: Vec<&str> = enumeration.members.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(members, vec!["MOVABLE", "SOLIDWALL"]);
    assert_eq!(enumeration.members[1].description, "Solid wall");

    // Declared on IfcWall, inherited by IfcWallStandardCase
    let users: Vec<&str> = enumeration.referenced_by.iter().map(|r| r.entity.as_str()).collect();
    assert_eq!(users, vec!["IfcWall", "IfcWallStandardCase"]);
    assert!(enumeration
        .referenced_by
        .iter()
        .all(|r| r.attribute == "PredefinedType" && r.direct_attr_num == Some(3)));
}

/// Test: property enumeration lists the templates whose properties use it
#[test]
fn test_property_enumeration_detail() {
    let store = store();
    let resolver = ConceptResolver::new(&store);

    let detail = resolver
        .resolve(ConceptKind::PropertyEnumeration, &ifc("PEnum_ElementStatus"))
        .unwrap()
        .unwrap();
    let ConceptBody::PropertyEnumeration(penum) = &detail.body else {
        panic!("expected property enumeration body");
    };
    assert_eq!(penum.members.len(), 1);
    assert_eq!(penum.members[0].name, "NEW");
    assert_eq!(penum.pset_templates.len(), 1);
    assert_eq!(penum.pset_templates[0].pset_name, "Pset_WallCommon");
    assert_eq!(penum.pset_templates[0].property_name, "Status");
    assert_eq!(
        detail.drill_down(),
        vec![Selection::new(ConceptKind::PropertySetTemplate, ifc("Pset_WallCommon"))]
    );
}

/// Test: derived types report their base and multiplicity
#[test]
fn test_derived_type_detail() {
    let store = store();
    let resolver = ConceptResolver::new(&store);

    let label = resolver.resolve(ConceptKind::DerivedType, &ifc("IfcLabel")).unwrap().unwrap();
    let ConceptBody::DerivedType(single) = &label.body else {
        panic!("expected derived type body");
    };
    assert_eq!(single.derived_from.as_deref(), Some("STRING"));
    assert_eq!(single.derived_from_display().as_deref(), Some("*STRING*"));
    assert!(!single.is_collection());
    assert_eq!(single.referenced_by.len(), 2);

    let index = resolver
        .resolve(ConceptKind::DerivedType, &ifc("IfcLineIndex"))
        .unwrap()
        .unwrap();
    let ConceptBody::DerivedType(list) = &index.body else {
        panic!("expected derived type body");
    };
    assert!(list.is_collection());
    assert_eq!(list.derived_from_display().as_deref(), Some("LIST [2:?] *IfcPositiveInteger*"));
    assert!(list.referenced_by.is_empty());
}

/// Test: set template properties and applicable entities including subtypes
#[test]
fn test_set_template_detail() {
    let store = store();
    let resolver = ConceptResolver::new(&store);

    let detail = resolver
        .resolve(ConceptKind::PropertySetTemplate, &ifc("Pset_WallCommon"))
        .unwrap()
        .unwrap();
    let ConceptBody::PropertySetTemplate(template) = &detail.body else {
        panic!("expected property set template body");
    };

    let props: Vec<(&str, &str)> = template
        .properties
        .iter()
        .map(|p| (p.name.as_str(), p.express_type.as_str()))
        .collect();
    assert_eq!(
        props,
        vec![("IsExternal", "express:DerivedType"), ("Status", "express:PropertyEnumeration")]
    );
    assert_eq!(template.properties[0].property_type.as_deref(), Some("P_SINGLEVALUE"));
    assert_eq!(template.properties[1].property_type, None);
    assert_eq!(template.applicable_entities, vec![ifc("IfcWall"), ifc("IfcWallStandardCase")]);
}

/// Test: unknown tags and kinds without a strategy give no detail
#[test]
fn test_unresolvable_selections() {
    let store = store();
    let resolver = ConceptResolver::new(&store);

    assert!(resolver.resolve_tag("express:Attribute", &ifc("IfcWall")).unwrap().is_none());
    assert!(resolver.resolve_tag("IfcWall", &ifc("IfcWall")).unwrap().is_none());
    assert!(resolver.resolve(ConceptKind::Class, &ifc("IfcWall")).unwrap().is_none());
    assert!(resolver.resolve(ConceptKind::Type, &ifc("IfcSel")).unwrap().is_none());
}

/// Test: an IRI absent from the store resolves to empty sections
#[test]
fn test_unknown_iri_gives_empty_sections() {
    let store = store();
    let resolver = ConceptResolver::new(&store);

    let detail = resolver
        .resolve(ConceptKind::Entity, &ifc("IfcDoesNotExist"))
        .unwrap()
        .unwrap();
    assert_eq!(detail.definitions, None);
    assert!(detail.drill_down().is_empty());
    let ConceptBody::Entity(entity) = &detail.body else {
        panic!("expected entity body");
    };
    assert!(entity.super_entities.is_empty());
    assert!(entity.direct_attributes.is_empty());
    assert!(entity.pset_templates.is_empty());
}

/// Test: declared kinds ignore non-EXPRESS types
#[test]
fn test_kinds_of() {
    let store = store();
    let resolver = ConceptResolver::new(&store);
    assert_eq!(resolver.kinds_of(&ifc("IfcMemberB")).unwrap(), vec![ConceptKind::Enum]);
    assert!(resolver.kinds_of(&ifc("IfcDoesNotExist")).unwrap().is_empty());
}

/// Test: every drill-down target of an entity opens through the session
#[test]
fn test_session_drill_down() {
    let store = store();
    let resolver = ConceptResolver::new(&store);
    let mut session = Session::new();

    let wall = session
        .open(&resolver, Selection::new(ConceptKind::Entity, ifc("IfcWall")))
        .unwrap()
        .unwrap();
    let targets = wall.drill_down();
    assert!(targets.contains(&Selection::new(ConceptKind::Entity, ifc("IfcRoot"))));
    assert!(targets.contains(&Selection::new(ConceptKind::Entity, ifc("IfcWallStandardCase"))));
    assert!(targets.contains(&Selection::new(ConceptKind::Enum, ifc("IfcWallTypeEnum"))));
    assert!(targets.contains(&Selection::new(ConceptKind::DerivedType, ifc("IfcLabel"))));
    assert!(targets.contains(&Selection::new(ConceptKind::Entity, ifc("IfcRelVoidsElement"))));
    assert!(targets.contains(&Selection::new(ConceptKind::PropertySetTemplate, ifc("Pset_WallCommon"))));

    for target in &targets {
        let detail = session.open(&resolver, target.clone()).unwrap().unwrap();
        assert_eq!(detail.kind(), target.kind);
    }

    let again = session
        .open(&resolver, Selection::new(ConceptKind::Entity, ifc("IfcWall")))
        .unwrap()
        .unwrap();
    assert!(Arc::ptr_eq(&wall, &again));
    assert_eq!(session.history().len(), targets.len() + 2);
    assert_eq!(session.concepts().stats(), (1, targets.len() as u64 + 1));
}

/// Test: the concept cache is keyed by IRI alone
///
/// A second selection of the same IRI under another kind returns the first record.
#[test]
fn test_cache_keyed_by_iri() {
    let store = store();
    let resolver = ConceptResolver::new(&store);
    let mut session = Session::new();

    let first = session
        .open(&resolver, Selection::new(ConceptKind::Enum, ifc("IfcMemberB")))
        .unwrap()
        .unwrap();
    let second = session
        .open(&resolver, Selection::new(ConceptKind::Select, ifc("IfcMemberB")))
        .unwrap()
        .unwrap();
    assert_eq!(second.kind(), ConceptKind::Enum);
    assert!(Arc::ptr_eq(&first, &second));
}

/// Test: two sessions never see each other's entries
#[test]
fn test_session_isolation() {
    let store = store();
    let resolver = ConceptResolver::new(&store);
    let mut registry = SessionRegistry::new();
    let alice = registry.create();
    let bob = registry.create();

    let a = registry
        .get_mut(&alice)
        .unwrap()
        .open(&resolver, Selection::new(ConceptKind::Entity, ifc("IfcWall")))
        .unwrap()
        .unwrap();
    let b = registry
        .get_mut(&bob)
        .unwrap()
        .open(&resolver, Selection::new(ConceptKind::Entity, ifc("IfcWall")))
        .unwrap()
        .unwrap();

    assert_eq!(a, b);
    assert!(!Arc::ptr_eq(&a, &b));
    assert_eq!(registry.get(&alice).unwrap().concepts().stats(), (0, 1));
    assert_eq!(registry.get(&bob).unwrap().concepts().stats(), (0, 1));
}

/// Test: collections list members by name and filter case-insensitively
#[test]
fn test_collections() {
    let store = store();
    let mut session = Session::new();

    let entities = session.collection(&store, CollectionKind::Entities).unwrap();
    let names: Vec<&str> = entities.members().map(|m| m.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["IfcMemberA", "IfcRelVoidsElement", "IfcRoot", "IfcWall", "IfcWallStandardCase"]
    );
    let walls: Vec<&str> = entities.filter("wall").iter().map(|m| m.name.as_str()).collect();
    assert_eq!(walls, vec!["IfcWall", "IfcWallStandardCase"]);
    assert_eq!(
        entities.get("IfcWall").unwrap().selection(),
        Some(Selection::new(ConceptKind::Entity, ifc("IfcWall")))
    );

    let templates = session.collection(&store, CollectionKind::SetTemplates).unwrap();
    assert_eq!(templates.len(), 1);
    let derived = session.collection(&store, CollectionKind::DerivedTypes).unwrap();
    assert_eq!(derived.len(), 4);
}

/// Test: drill-down tags survive a dataset that renames the schema prefix
///
/// Ontology editors write the schema namespace as `xmlns:CoALA4IFC_Schema_Ont`.
/// Labels follow the file, tags stay `express:*` so selections still resolve.
#[test]
fn test_drill_down_tags_independent_of_declared_prefix() {
    let mut store = store();
    store
        .load_str(
            r#"<?xml version="1.0"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:CoALA4IFC_Schema_Ont="http://www.semantic.org/zeyupan/ontologies/CoALA4IFC_Schema_Ont#">
  <rdf:Description rdf:about="http://www.semantic.org/zeyupan/ontologies/CoALA4IFC_Schema_Ont#Entity"/>
</rdf:RDF>
"#,
            RdfFormat::RdfXml,
        )
        .unwrap();
    let entity_iri = oxigraph::model::NamedNode::new(ConceptKind::Entity.uri()).unwrap();
    assert_eq!(store.label(entity_iri.as_ref()), "CoALA4IFC_Schema_Ont:Entity");

    let resolver = ConceptResolver::new(&store);
    let detail = resolver.resolve(ConceptKind::Select, &ifc("IfcSel")).unwrap().unwrap();
    let ConceptBody::Select(select) = &detail.body else {
        panic!("expected select body");
    };
    assert_eq!(select.members[0].express_type, "express:Entity");
    assert_eq!(
        select.members[0].selection(),
        Some(Selection::new(ConceptKind::Entity, ifc("IfcMemberA")))
    );
    assert_eq!(detail.drill_down().len(), 2);

    let wall = resolver.resolve(ConceptKind::Entity, &ifc("IfcWall")).unwrap().unwrap();
    assert!(wall
        .drill_down()
        .contains(&Selection::new(ConceptKind::PropertySetTemplate, ifc("Pset_WallCommon"))));

    let mut session = Session::new();
    let entities = session.collection(&store, CollectionKind::Entities).unwrap();
    assert!(entities.members().all(|m| m.selection().is_some()));
}

/// Test: a derived type without a cardinality still reports its base
#[test]
fn test_derived_type_without_cardinality() {
    let store = SchemaStore::from_trig(
        r#"
@prefix express: <http://www.semantic.org/zeyupan/ontologies/CoALA4IFC_Schema_Ont#> .
@prefix ifc: <http://www.semantic.org/zeyupan/instances/CoALA4IFC_Schema_Inst#> .

ifc:IFC_SCHEMA_GRAPH {
    ifc:IfcText a express:DerivedType ;
        express:name "IfcText" ;
        express:derivedFrom ifc:STRING .
}
"#,
    )
    .unwrap();
    let resolver = ConceptResolver::new(&store);

    let detail = resolver.resolve(ConceptKind::DerivedType, &ifc("IfcText")).unwrap().unwrap();
    let ConceptBody::DerivedType(text) = &detail.body else {
        panic!("expected derived type body");
    };
    assert_eq!(text.derived_from.as_deref(), Some("STRING"));
    assert_eq!(text.cardinality, None);
    assert_eq!(text.derived_from_display().as_deref(), Some("*STRING*"));
    assert!(!text.is_collection());
}

/// Test: inverse attributes carry no index and list by name
#[test]
fn test_inverse_attributes_sorted_by_name() {
    let store = SchemaStore::from_trig(
        r#"
@prefix express: <http://www.semantic.org/zeyupan/ontologies/CoALA4IFC_Schema_Ont#> .
@prefix ifc: <http://www.semantic.org/zeyupan/instances/CoALA4IFC_Schema_Inst#> .

ifc:IFC_SCHEMA_GRAPH {
    ifc:IfcElement a express:Entity ;
        express:name "IfcElement" ;
        express:hasInverseAttribute ifc:IfcElement_HasOpenings, ifc:IfcElement_ConnectedTo .
    ifc:IfcElement_HasOpenings express:name "HasOpenings" ;
        express:is_optional false ;
        express:cardinality "SET [0:?]" ;
        express:attrRange ifc:IfcRelVoidsElement .
    ifc:IfcElement_ConnectedTo express:name "ConnectedTo" ;
        express:is_optional false ;
        express:cardinality "SET [0:?]" ;
        express:attrRange ifc:IfcRelConnectsElements .
    ifc:IfcRelVoidsElement a express:Entity .
    ifc:IfcRelConnectsElements a express:Entity .
}
"#,
    )
    .unwrap();
    let resolver = ConceptResolver::new(&store);

    let detail = resolver.resolve(ConceptKind::Entity, &ifc("IfcElement")).unwrap().unwrap();
    let ConceptBody::Entity(entity) = &detail.body else {
        panic!("expected entity body");
    };
    let names: Vec<&str> = entity.inverse_attributes.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["ConnectedTo", "HasOpenings"]);
    assert!(entity.inverse_attributes.iter().all(|a| a.index.is_none()));
}
