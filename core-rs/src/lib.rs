//! # IFC Schema Viewer Core
//!
//! Browsing and visualization core for the IFC4.3 schema expressed as an
//! RDF/OWL knowledge graph. Answers the questions a schema browser asks
//! (what does this entity inherit, which property sets apply, what does this
//! select resolve to) and turns hierarchies into graph-widget payloads.
//!
//! ## Pipeline
//!
//! ```text
//!   selection (kind, IRI)           hierarchy request (predicate, seeds)
//!          │                                   │
//!          ▼                                   ▼
//!  ┌─────────────────┐               ┌──────────────────┐
//!  │ ConceptResolver │               │ HierarchyExtractor│
//!  └────────┬────────┘               └────────┬─────────┘
//!           │   SPARQL / quad patterns        │
//!           ▼                                 ▼
//!  ┌──────────────────────────────────────────────────┐
//!  │          SchemaStore (Oxigraph, read-only)       │
//!  └──────────────────────────────────────────────────┘
//!           │                                 │
//!           ▼                                 ▼
//!   ConceptDetail (cached per Session)   DegreeRefiner → VisualGraph
//! ```
//!
//! The store is loaded once and never mutated, so every render of the same
//! input produces the same payload.

pub mod config;
pub mod errors;
pub mod graph;
pub mod schema;
pub mod status;
pub mod store;

pub use config::{DatasetConfig, RenderingConfig, SchemaConfig, ViewerConfig};
pub use errors::{Result, ViewerError};
pub use graph::{
    refresh_degree, symbol_size, DegreeRefiner, EdgeKind, Hierarchy, HierarchyExtractor, Neighborhood,
    NeighborhoodBuilder, VisualGraph, VisualLink, VisualNode,
};
pub use schema::{
    widget_key, Collection, CollectionKind, ConceptBody, ConceptDetail, ConceptKind, ConceptResolver,
    NodeMetadata, SchemaNavigator, Selection, Session, SessionRegistry, SparqlQuery,
};
pub use status::{DatasetStatus, PropertyInventory, PropertyType, SubgraphSort, SubgraphStat};
pub use store::{NamespaceManager, QueryRow, SchemaStore};

/// Crate version reported by the CLI
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default dataset file locations, relative to the working directory
pub const DEFAULT_QUADS_PATH: &str = "resources/knowledge_graphs/ifc_schema.trig";
pub const DEFAULT_ONTOLOGY_PATH: &str = "resources/ontologies/skos.rdf";
