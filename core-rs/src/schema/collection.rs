//! Concept collections: every individual of a group of EXPRESS kinds, keyed by name

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Instant;
use tracing::debug;

use crate::errors::{Result, ViewerError};
use crate::schema::detail::Selection;
use crate::schema::kind::{type_tag, ConceptKind};
use crate::schema::query::SparqlQuery;
use crate::store::SchemaStore;

/// Browsable groups of concepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CollectionKind {
    Entities,
    Enumerations,
    PropertyEnumerations,
    Selects,
    DerivedTypes,
    /// Property and quantity set templates together
    SetTemplates,
}

impl CollectionKind {
    pub const ALL: [CollectionKind; 6] = [
        Self::Entities,
        Self::Enumerations,
        Self::PropertyEnumerations,
        Self::Selects,
        Self::DerivedTypes,
        Self::SetTemplates,
    ];

    pub fn kinds(&self) -> &'static [ConceptKind] {
        match self {
            Self::Entities => &[ConceptKind::Entity],
            Self::Enumerations => &[ConceptKind::Enum],
            Self::PropertyEnumerations => &[ConceptKind::PropertyEnumeration],
            Self::Selects => &[ConceptKind::Select],
            Self::DerivedTypes => &[ConceptKind::DerivedType],
            Self::SetTemplates => &[ConceptKind::PropertySetTemplate, ConceptKind::QuantitySetTemplate],
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Entities => "entities",
            Self::Enumerations => "enumerations",
            Self::PropertyEnumerations => "property-enumerations",
            Self::Selects => "selects",
            Self::DerivedTypes => "derived-types",
            Self::SetTemplates => "set-templates",
        }
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CollectionKind {
    type Err = ViewerError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| {
                ViewerError::Validation(format!(
                    "Unknown collection '{}' (expected one of: {})",
                    s,
                    Self::ALL.map(|k| k.as_str()).join(", ")
                ))
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionMember {
    pub iri: String,
    pub name: String,
    pub express_type: String,
}

impl CollectionMember {
    pub fn selection(&self) -> Option<Selection> {
        Selection::from_tag(&self.express_type, self.iri.clone())
    }
}

/// Members of one collection, ordered and keyed by name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub kind: CollectionKind,
    members: BTreeMap<String, CollectionMember>,
}

impl Collection {
    pub fn load(store: &SchemaStore, kind: CollectionKind) -> Result<Self> {
        let started = Instant::now();
        let mut rows: Vec<CollectionMember> = store
            .select(&SparqlQuery::collection_members(kind.kinds()))?
            .iter()
            .map(|row| CollectionMember {
                iri: row.text("individual"),
                name: row.text("individual_name"),
                express_type: row
                    .term("express_type")
                    .map(|t| type_tag(store, t))
                    .unwrap_or_default(),
            })
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.iri.cmp(&b.iri)));

        let mut members = BTreeMap::new();
        for member in rows {
            members.entry(member.name.clone()).or_insert(member);
        }
        debug!(
            collection = %kind,
            members = members.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "collection loaded"
        );
        Ok(Self { kind, members })
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&CollectionMember> {
        self.members.get(name)
    }

    pub fn members(&self) -> impl Iterator<Item = &CollectionMember> {
        self.members.values()
    }

    /// Members whose name contains `keyword`, case-insensitively; all when empty
    pub fn filter(&self, keyword: &str) -> Vec<&CollectionMember> {
        let keyword = keyword.to_lowercase();
        self.members
            .iter()
            .filter(|(name, _)| keyword.is_empty() || name.to_lowercase().contains(&keyword))
            .map(|(_, member)| member)
            .collect()
    }
}
