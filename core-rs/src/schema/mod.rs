//! IFC schema concepts
//!
//! Typed SPARQL builders, the per-kind detail resolver, session caches,
//! collections, navigation and node metadata.

pub mod cache;
pub mod collection;
pub mod detail;
pub mod kind;
pub mod metadata;
pub mod navigation;
pub mod query;

pub use cache::{widget_key, ConceptCache, Session, SessionRegistry};
pub use collection::{Collection, CollectionKind, CollectionMember};
pub use detail::{
    Attribute, ConceptBody, ConceptDetail, ConceptRef, ConceptResolver, DerivedTypeDetail, EntityDetail,
    EnumDetail, EnumMember, PropertyEnumerationDetail, PsetUsage, ReferencingEntity, SelectDetail,
    SelectMember, Selection, SetTemplateDetail, TemplateProperty,
};
pub use kind::ConceptKind;
pub use metadata::{Annotation, NodeMetadata, OwlCharacteristic};
pub use navigation::{ConceptualGroup, DataSchema, GroupConcept, SchemaNavigator};
pub use query::SparqlQuery;
