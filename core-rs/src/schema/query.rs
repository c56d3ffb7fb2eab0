/**
 * query.rs
 * Parametrized SPARQL builders for the IFC schema ontology
 *
 * Every builder takes full IRIs (already validated as named nodes) and
 * returns a query that runs against the union of all graphs unless noted.
 */

use crate::schema::kind::ConceptKind;
use crate::store::namespace::EXPRESS_NS;

const PREFIXES: &str = r#"PREFIX rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#>
PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>
PREFIX owl: <http://www.w3.org/2002/07/owl#>
PREFIX skos: <http://www.w3.org/2004/02/skos/core#>
PREFIX express: <http://www.semantic.org/zeyupan/ontologies/CoALA4IFC_Schema_Ont#>
PREFIX ifc: <http://www.semantic.org/zeyupan/instances/CoALA4IFC_Schema_Inst#>"#;

pub struct SparqlQuery {
    query: String,
}

impl SparqlQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.query
    }

    // =============================================================================
    // Shared
    // =============================================================================

    /// `express:definitions` text of a concept
    pub fn definitions(iri: &str) -> Self {
        Self::new(format!(
            r#"{PREFIXES}
            SELECT DISTINCT ?definitions
            WHERE {{
                <{iri}> express:definitions ?definitions .
            }}"#
        ))
    }

    /// EXPRESS type tags of a concept (`rdf:type` objects in the express namespace)
    pub fn concept_kinds(iri: &str) -> Self {
        Self::new(format!(
            r#"{PREFIXES}
            SELECT DISTINCT ?express_type
            WHERE {{
                <{iri}> a ?express_type .
                FILTER (STRSTARTS(str(?express_type), "{EXPRESS_NS}"))
            }}"#
        ))
    }

    /// Entities referencing a type through an attribute range, including
    /// every subtype of the declaring entity
    pub fn referencing_entities(type_iri: &str) -> Self {
        Self::new(format!(
            r#"{PREFIXES}
            SELECT DISTINCT ?entity_name ?entity ?attribute_name ?direct_attr_num ?cardinality
            WHERE {{
                ?attr express:attrRange <{type_iri}> ;
                    express:name ?attribute_name ;
                    express:direct_attr_num ?direct_attr_num ;
                    express:cardinality ?cardinality .
                ?direct_entity express:hasDirectAttribute ?attr ;
                    express:superClassOf* ?entity .
                ?entity express:name ?entity_name .
            }}"#
        ))
    }

    // =============================================================================
    // Enumerations and selects
    // =============================================================================

    /// Enumeration values with their descriptions
    pub fn enum_members(iri: &str) -> Self {
        Self::new(format!(
            r#"{PREFIXES}
            SELECT DISTINCT ?member ?member_name ?member_description
            WHERE {{
                <{iri}> express:hasValue ?member .
                ?member a express:EnumValue ;
                    express:name ?member_name ;
                    express:description ?member_description .
            }}"#
        ))
    }

    /// Property-set templates declaring a property typed by this enumeration
    pub fn property_enumeration_psets(iri: &str) -> Self {
        Self::new(format!(
            r#"{PREFIXES}
            SELECT DISTINCT ?pset_template ?pset_template_name ?prop ?prop_name
            WHERE {{
                ?prop express:dataType <{iri}> ;
                    express:name ?prop_name .
                ?pset_template express:hasPropTemplate ?prop ;
                    express:name ?pset_template_name .
            }}"#
        ))
    }

    /// Select members and their own type tags
    pub fn select_members(iri: &str) -> Self {
        Self::new(format!(
            r#"{PREFIXES}
            SELECT DISTINCT ?member ?member_name ?express_type
            WHERE {{
                <{iri}> express:hasValue ?member .
                ?member express:name ?member_name ;
                    a ?express_type .
                FILTER (STRSTARTS(str(?express_type), "{EXPRESS_NS}"))
            }}"#
        ))
    }

    /// Base type and multiplicity of a derived type
    pub fn derived_type(iri: &str) -> Self {
        Self::new(format!(
            r#"{PREFIXES}
            SELECT ?derived_from ?cardinality
            WHERE {{
                <{iri}> express:derivedFrom ?derived_from .
                OPTIONAL {{ <{iri}> express:cardinality ?cardinality . }}
            }}"#
        ))
    }

    // =============================================================================
    // Entities
    // =============================================================================

    /// Transitive super-entities
    pub fn super_entities(iri: &str) -> Self {
        Self::new(format!(
            r#"{PREFIXES}
            SELECT DISTINCT ?entity ?entity_name ?definitions
            WHERE {{
                <{iri}> express:subClassOf+ ?entity .
                ?entity express:name ?entity_name .
                OPTIONAL {{ ?entity express:definitions ?definitions }}
            }}"#
        ))
    }

    /// Transitive sub-entities
    pub fn sub_entities(iri: &str) -> Self {
        Self::new(format!(
            r#"{PREFIXES}
            SELECT DISTINCT ?entity ?entity_name ?definitions
            WHERE {{
                ?entity express:subClassOf+ <{iri}> .
                ?entity express:name ?entity_name .
                OPTIONAL {{ ?entity express:definitions ?definitions }}
            }}"#
        ))
    }

    /// Directly declared attributes with their index and range type
    pub fn direct_attributes(iri: &str) -> Self {
        Self::attributes(iri, "hasDirectAttribute", "express:direct_attr_num ?direct_attr_num ;")
    }

    /// Inverse attributes; these carry no declared index
    pub fn inverse_attributes(iri: &str) -> Self {
        Self::attributes(iri, "hasInverseAttribute", "")
    }

    fn attributes(iri: &str, relation: &str, index_pattern: &str) -> Self {
        Self::new(format!(
            r#"{PREFIXES}
            SELECT DISTINCT ?attr ?attr_name ?description ?optional ?direct_attr_num ?cardinality ?attrRange ?express_type
            WHERE {{
                <{iri}> express:{relation} ?attr .
                ?attr express:name ?attr_name ;
                    express:is_optional ?optional ;
                    {index_pattern}
                    express:cardinality ?cardinality ;
                    express:attrRange ?attrRange .
                OPTIONAL {{ ?attr express:description ?description }}
                ?attrRange a ?express_type .
                FILTER (STRSTARTS(str(?express_type), "{EXPRESS_NS}"))
            }}"#
        ))
    }

    /// Property/quantity set templates applicable to the entity or any ancestor
    pub fn entity_pset_templates(iri: &str) -> Self {
        Self::new(format!(
            r#"{PREFIXES}
            SELECT DISTINCT ?pset ?pset_name ?definitions ?express_type
            WHERE {{
                <{iri}> express:subClassOf* ?ae .
                ?pset a ?express_type ;
                    express:applicableTo ?ae ;
                    express:name ?pset_name .
                OPTIONAL {{ ?pset express:definitions ?definitions }}
                FILTER (STRSTARTS(str(?express_type), "{EXPRESS_NS}"))
            }}"#
        ))
    }

    // =============================================================================
    // Property and quantity set templates
    // =============================================================================

    /// Declared properties of a set template
    pub fn pset_properties(iri: &str) -> Self {
        Self::new(format!(
            r#"{PREFIXES}
            SELECT DISTINCT ?prop ?prop_name ?description ?data_type ?property_type ?dataType ?express_type
            WHERE {{
                <{iri}> express:hasPropTemplate ?prop .
                ?prop express:name ?prop_name ;
                    express:data_type ?data_type ;
                    express:dataType ?dataType .
                OPTIONAL {{ ?prop express:description ?description }}
                OPTIONAL {{ ?prop express:property_type ?property_type }}
                ?dataType a ?express_type .
                FILTER (STRSTARTS(str(?express_type), "{EXPRESS_NS}"))
            }}"#
        ))
    }

    /// Entities a set template applies to, including every subtype
    pub fn pset_applicable_entities(iri: &str) -> Self {
        Self::new(format!(
            r#"{PREFIXES}
            SELECT DISTINCT ?applicable_entity
            WHERE {{
                <{iri}> express:applicableTo ?ae .
                ?ae express:superClassOf* ?applicable_entity .
            }}"#
        ))
    }

    // =============================================================================
    // Collections and navigation
    // =============================================================================

    /// Named individuals of the given kinds
    pub fn collection_members(kinds: &[ConceptKind]) -> Self {
        let filter = kinds
            .iter()
            .map(|k| format!("?express_type = <{}>", k.uri()))
            .collect::<Vec<_>>()
            .join(" || ");
        let filter = if filter.is_empty() { "false".to_string() } else { filter };
        Self::new(format!(
            r#"{PREFIXES}
            SELECT DISTINCT ?individual ?individual_name ?express_type
            WHERE {{
                ?individual rdf:type ?express_type ;
                    express:name ?individual_name .
                FILTER ({filter})
            }}"#
        ))
    }

    /// Data schemas (layers) in a concept scheme
    pub fn data_schemas(root_iri: &str) -> Self {
        Self::new(format!(
            r#"{PREFIXES}
            SELECT DISTINCT ?data_schema ?ds_name
            WHERE {{
                ?data_schema rdf:type express:Layer ;
                    skos:inScheme <{root_iri}> ;
                    express:name ?ds_name .
            }}"#
        ))
    }

    /// Conceptual groups of a layer
    pub fn conceptual_groups(layer_iri: &str) -> Self {
        Self::new(format!(
            r#"{PREFIXES}
            SELECT DISTINCT ?conceptual_group ?cg_name ?cg_definitions
            WHERE {{
                ?conceptual_group rdf:type express:Group ;
                    express:name ?cg_name .
                OPTIONAL {{ ?conceptual_group express:definitions ?cg_definitions }}
                <{layer_iri}> express:hasConceptualGroup ?conceptual_group .
            }}"#
        ))
    }

    /// Concepts of a conceptual group, read from the schema graph only
    ///
    /// The linking predicate can be any sub-property of `express:hasConcept`.
    pub fn group_concepts(group_iri: &str, schema_graph_iri: &str) -> Self {
        Self::new(format!(
            r#"{PREFIXES}
            SELECT DISTINCT ?concept ?concept_name ?concept_type ?concept_definitions
            WHERE {{
                GRAPH <{schema_graph_iri}> {{
                    ?concept rdf:type ?concept_type ;
                        express:name ?concept_name .
                    OPTIONAL {{ ?concept express:definitions ?concept_definitions }}
                    <{group_iri}> ?pred ?concept .
                    FILTER (?concept_type != owl:Class)
                }}
                ?pred rdfs:subPropertyOf* express:hasConcept .
            }}"#
        ))
    }

    // =============================================================================
    // OWL characteristics
    // =============================================================================

    /// Whether the property is declared with the given OWL characteristic class
    pub fn has_owl_type(property_iri: &str, owl_class: &str) -> Self {
        Self::new(format!(
            r#"{PREFIXES}
            ASK {{
                <{property_iri}> a owl:{owl_class} .
            }}"#
        ))
    }
}
