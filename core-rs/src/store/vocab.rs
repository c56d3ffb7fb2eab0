//! IRIs of the terms the viewer looks up by pattern
//!
//! `oxigraph::model::vocab` covers rdf/rdfs/xsd; OWL, SKOS and the
//! EXPRESS schema ontology are declared here the same way.

pub use oxigraph::model::vocab::{rdf, rdfs};

pub mod owl {
    use oxigraph::model::NamedNodeRef;

    pub const CLASS: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#Class");
    pub const OBJECT_PROPERTY: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#ObjectProperty");
    pub const DATATYPE_PROPERTY: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#DatatypeProperty");
    pub const ANNOTATION_PROPERTY: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#AnnotationProperty");
    pub const NAMED_INDIVIDUAL: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#NamedIndividual");
    pub const INVERSE_OF: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#inverseOf");
}

pub mod skos {
    use oxigraph::model::NamedNodeRef;

    pub const DEFINITION: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2004/02/skos/core#definition");
}

/// EXPRESS schema ontology terms (`express:` prefix)
pub mod express {
    use oxigraph::model::NamedNodeRef;

    pub const NAME: NamedNodeRef<'static> = NamedNodeRef::new_unchecked(
        "http://www.semantic.org/zeyupan/ontologies/CoALA4IFC_Schema_Ont#name",
    );
    pub const DEFINITIONS: NamedNodeRef<'static> = NamedNodeRef::new_unchecked(
        "http://www.semantic.org/zeyupan/ontologies/CoALA4IFC_Schema_Ont#definitions",
    );
}
