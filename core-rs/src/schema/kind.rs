//! EXPRESS concept kinds - the closed set of type tags in the schema ontology
//!
//! Each variant is bound to a class IRI in the `express:` namespace. Detail
//! resolution only exists for the seven resolvable kinds; `Type`, `Class`
//! and `Property` are tags without a detail record.

use oxigraph::model::Term;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::ViewerError;
use crate::store::namespace::EXPRESS_NS;
use crate::store::SchemaStore;

/// Type tag of a schema concept
///
/// # Examples
///
/// ```
/// use ifcsv_core::schema::ConceptKind;
///
/// let kind: ConceptKind = "express:Select".parse().unwrap();
/// assert_eq!(kind, ConceptKind::Select);
/// assert!(kind.has_detail());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConceptKind {
    Entity,
    Enum,
    PropertyEnumeration,
    Select,
    DerivedType,
    PropertySetTemplate,
    QuantitySetTemplate,
    /// Base of Enum, Select and DerivedType
    Type,
    Class,
    Property,
}

impl ConceptKind {
    /// Every kind, resolvable ones first
    pub const ALL: [ConceptKind; 10] = [
        Self::Entity,
        Self::Enum,
        Self::PropertyEnumeration,
        Self::Select,
        Self::DerivedType,
        Self::PropertySetTemplate,
        Self::QuantitySetTemplate,
        Self::Type,
        Self::Class,
        Self::Property,
    ];

    /// Local name of the kind in the `express:` namespace
    #[must_use]
    pub const fn local_name(&self) -> &'static str {
        match self {
            Self::Entity => "Entity",
            Self::Enum => "Enum",
            Self::PropertyEnumeration => "PropertyEnumeration",
            Self::Select => "Select",
            Self::DerivedType => "DerivedType",
            Self::PropertySetTemplate => "PropertySetTemplate",
            Self::QuantitySetTemplate => "QuantitySetTemplate",
            Self::Type => "Type",
            Self::Class => "Class",
            Self::Property => "Property",
        }
    }

    /// Full class IRI
    ///
    /// ```
    /// use ifcsv_core::schema::ConceptKind;
    ///
    /// assert!(ConceptKind::Entity.uri().ends_with("CoALA4IFC_Schema_Ont#Entity"));
    /// ```
    pub fn uri(&self) -> String {
        format!("{}{}", EXPRESS_NS, self.local_name())
    }

    /// Compact tag as shown in tables, e.g. `express:Entity`
    pub fn tag(&self) -> String {
        format!("express:{}", self.local_name())
    }

    /// Parse from a class IRI
    #[must_use]
    pub fn from_uri(uri: &str) -> Option<Self> {
        uri.strip_prefix(EXPRESS_NS).and_then(Self::from_local_name)
    }

    /// Parse from a compact tag; unknown tags yield `None`
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        tag.strip_prefix("express:").and_then(Self::from_local_name)
    }

    fn from_local_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.local_name() == name)
    }

    /// Whether the resolver has a detail strategy for this kind
    pub const fn has_detail(&self) -> bool {
        !matches!(self, Self::Type | Self::Class | Self::Property)
    }

    /// Enum, Select and DerivedType carry the referencing-entities section
    pub const fn is_type(&self) -> bool {
        matches!(self, Self::Type | Self::Enum | Self::Select | Self::DerivedType)
    }
}

impl fmt::Display for ConceptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "express:{}", self.local_name())
    }
}

impl FromStr for ConceptKind {
    type Err = ViewerError;

    /// Accepts `express:Entity`, the full IRI, or the bare local name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s)
            .or_else(|| Self::from_uri(s))
            .or_else(|| Self::from_local_name(s))
            .ok_or_else(|| ViewerError::Validation(format!("Unknown concept kind: {}", s)))
    }
}

/// Compact tag of a type term
///
/// Schema namespace terms always read `express:<local>`, whatever prefix the
/// dataset declares for that namespace. Other terms use the store label.
pub fn type_tag(store: &SchemaStore, term: &Term) -> String {
    match term {
        Term::NamedNode(node) => match node.as_str().strip_prefix(EXPRESS_NS) {
            Some(local) => format!("express:{}", local),
            None => store.label(node.as_ref()),
        },
        other => store.label(other.as_ref()),
    }
}
