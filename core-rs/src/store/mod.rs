//! RDF dataset access
//!
//! - `library`: the in-memory Oxigraph store, pattern lookups and SPARQL execution
//! - `namespace`: prefix bindings and `prefix:local` labels
//! - `vocab`: IRIs used in pattern lookups

pub mod library;
pub mod namespace;
pub mod vocab;

pub use library::{QueryRow, SchemaStore};
pub use namespace::{iri_fragment, label_namespace, NamespaceManager, EXPRESS_NS, IFC_NS};
