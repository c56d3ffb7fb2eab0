//! Predicates that become links in rendered graphs

use oxigraph::model::NamedNodeRef;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::store::vocab::{owl, rdfs};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EdgeKind {
    SubClassOf,
    SubPropertyOf,
    InverseOf,
    Domain,
    Range,
}

impl EdgeKind {
    pub const ALL: [EdgeKind; 5] = [
        Self::SubClassOf,
        Self::SubPropertyOf,
        Self::InverseOf,
        Self::Domain,
        Self::Range,
    ];

    pub fn predicate(&self) -> NamedNodeRef<'static> {
        match self {
            Self::SubClassOf => rdfs::SUB_CLASS_OF,
            Self::SubPropertyOf => rdfs::SUB_PROPERTY_OF,
            Self::InverseOf => owl::INVERSE_OF,
            Self::Domain => rdfs::DOMAIN,
            Self::Range => rdfs::RANGE,
        }
    }

    /// Link label used in payloads
    pub const fn label(&self) -> &'static str {
        match self {
            Self::SubClassOf => "rdfs:subClassOf",
            Self::SubPropertyOf => "rdfs:subPropertyOf",
            Self::InverseOf => "owl:inverseOf",
            Self::Domain => "rdfs:domain",
            Self::Range => "rdfs:range",
        }
    }

    pub fn from_predicate(predicate: NamedNodeRef<'_>) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.predicate() == predicate)
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
