//! Node metadata: IRI, namespace, literal annotations and OWL property characteristics

use oxigraph::model::{NamedNodeRef, Term};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use crate::errors::Result;
use crate::schema::query::SparqlQuery;
use crate::store::namespace::label_namespace;
use crate::store::vocab::{owl, rdfs, skos};
use crate::store::SchemaStore;

/// OWL property characteristics checked for object properties
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OwlCharacteristic {
    Asymmetric,
    Reflexive,
    Irreflexive,
    Symmetric,
    Transitive,
}

impl OwlCharacteristic {
    pub const ALL: [OwlCharacteristic; 5] = [
        Self::Asymmetric,
        Self::Reflexive,
        Self::Irreflexive,
        Self::Symmetric,
        Self::Transitive,
    ];

    /// Local name of the OWL class, e.g. `TransitiveProperty`
    pub const fn owl_class(&self) -> &'static str {
        match self {
            Self::Asymmetric => "AsymmetricProperty",
            Self::Reflexive => "ReflexiveProperty",
            Self::Irreflexive => "IrreflexiveProperty",
            Self::Symmetric => "SymmetricProperty",
            Self::Transitive => "TransitiveProperty",
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Asymmetric => "Asymmetric",
            Self::Reflexive => "Reflexive",
            Self::Irreflexive => "Irreflexive",
            Self::Symmetric => "Symmetric",
            Self::Transitive => "Transitive",
        }
    }
}

/// One literal statement about the node
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Annotation {
    /// `Label (en)`, `Comment (fr)`, `Definition (en)` or the predicate label
    pub heading: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeMetadata {
    pub iri: String,
    pub label: String,
    pub namespace: String,
    pub annotations: Vec<Annotation>,
    pub characteristics: Vec<OwlCharacteristic>,
}

impl NodeMetadata {
    pub fn collect(store: &SchemaStore, node: NamedNodeRef<'_>) -> Result<Self> {
        let label = store.label(node);

        let mut annotations = Vec::new();
        for (predicate, object) in store.predicate_objects(node.into())? {
            let Term::Literal(literal) = object else {
                continue;
            };
            let language = literal.language().unwrap_or("en");
            let heading = if predicate.as_ref() == rdfs::LABEL {
                format!("Label ({})", language)
            } else if predicate.as_ref() == rdfs::COMMENT {
                format!("Comment ({})", language)
            } else if predicate.as_ref() == skos::DEFINITION {
                format!("Definition ({})", language)
            } else {
                store.label(predicate.as_ref())
            };
            annotations.push(Annotation {
                heading,
                value: literal.value().to_string(),
            });
        }
        annotations.sort();

        let mut characteristics = Vec::new();
        let is_object_property = store
            .types_of(node.into())?
            .iter()
            .any(|t| matches!(t, Term::NamedNode(n) if n.as_ref() == owl::OBJECT_PROPERTY));
        if is_object_property {
            for characteristic in OwlCharacteristic::ALL {
                if store.ask(&SparqlQuery::has_owl_type(node.as_str(), characteristic.owl_class()))? {
                    characteristics.push(characteristic);
                }
            }
        }

        Ok(Self {
            iri: node.as_str().to_string(),
            namespace: label_namespace(&label).to_string(),
            label,
            annotations,
            characteristics,
        })
    }

    /// Markdown block: bold headings, one paragraph per entry
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        let _ = write!(out, "**IRI:** {}\n\n", self.iri);
        let _ = write!(out, "**Namespace:** {}\n\n", self.namespace);
        for annotation in &self.annotations {
            let _ = write!(out, "**{}:** {}\n\n", annotation.heading, annotation.value);
        }
        for characteristic in &self.characteristics {
            let _ = write!(out, "**{}:** True\n\n", characteristic.name());
        }
        out
    }
}
