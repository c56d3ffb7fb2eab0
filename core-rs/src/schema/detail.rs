//! Concept detail records and the resolver that builds them
//!
//! Resolution is a closed match over [`ConceptKind`]: each resolvable kind
//! has one function issuing the typed queries from [`SparqlQuery`]. Missing
//! triples give empty sections, and kinds without a strategy give `None`.
//!
//! Rows that point at another concept expose a [`Selection`] so a caller can
//! drill down without the resolver knowing anything about rendering.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

use crate::errors::Result;
use crate::schema::kind::{type_tag, ConceptKind};
use crate::schema::query::SparqlQuery;
use crate::store::library::QueryRow;
use crate::store::namespace::iri_fragment;
use crate::store::SchemaStore;

/// Base of the buildingSMART IFC4.3 lexical documentation pages
pub const DOC_BASE_URL: &str = "https://ifc43-docs.standards.buildingsmart.org/IFC/RELEASE/IFC4x3/HTML/lexical";

/// Navigation event: open the detail of `iri` as `kind`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Selection {
    pub kind: ConceptKind,
    pub iri: String,
}

impl Selection {
    pub fn new(kind: ConceptKind, iri: impl Into<String>) -> Self {
        Self {
            kind,
            iri: iri.into(),
        }
    }

    /// Selection from a compact tag; `None` when the tag is not a known kind
    pub fn from_tag(tag: &str, iri: impl Into<String>) -> Option<Self> {
        ConceptKind::from_tag(tag).map(|kind| Self::new(kind, iri))
    }
}

/// Another concept referenced from a detail record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptRef {
    pub iri: String,
    pub name: String,
    /// Compact type tag, e.g. `express:Entity`
    pub express_type: String,
    #[serde(default)]
    pub definitions: String,
}

impl ConceptRef {
    pub fn selection(&self) -> Option<Selection> {
        Selection::from_tag(&self.express_type, self.iri.clone())
    }
}

/// An entity that uses a type as an attribute range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferencingEntity {
    pub entity: String,
    pub entity_iri: String,
    pub attribute: String,
    pub direct_attr_num: Option<u32>,
    pub cardinality: String,
}

impl ReferencingEntity {
    pub fn selection(&self) -> Selection {
        Selection::new(ConceptKind::Entity, self.entity_iri.clone())
    }
}

/// One value of an enumeration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumMember {
    pub name: String,
    pub description: String,
}

/// A property-set template property typed by a property enumeration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PsetUsage {
    pub pset_iri: String,
    pub pset_name: String,
    pub property_iri: String,
    pub property_name: String,
}

impl PsetUsage {
    pub fn selection(&self) -> Selection {
        Selection::new(ConceptKind::PropertySetTemplate, self.pset_iri.clone())
    }
}

/// One alternative of a select type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectMember {
    pub iri: String,
    pub name: String,
    pub express_type: String,
}

impl SelectMember {
    pub fn kind(&self) -> Option<ConceptKind> {
        ConceptKind::from_tag(&self.express_type)
    }

    pub fn selection(&self) -> Option<Selection> {
        Selection::from_tag(&self.express_type, self.iri.clone())
    }
}

/// Direct or inverse attribute of an entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribute {
    /// Declared position; inverse attributes have none
    pub index: Option<u32>,
    pub name: String,
    pub optional: bool,
    pub cardinality: String,
    /// Fragment of the range IRI
    pub range: String,
    pub range_iri: String,
    pub express_type: String,
    pub description: String,
}

impl Attribute {
    /// `T` / `F` as shown in attribute tables
    pub fn optional_flag(&self) -> &'static str {
        if self.optional {
            "T"
        } else {
            "F"
        }
    }

    pub fn selection(&self) -> Option<Selection> {
        Selection::from_tag(&self.express_type, self.range_iri.clone())
    }
}

/// Property declared by a property or quantity set template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateProperty {
    pub name: String,
    pub property_type: Option<String>,
    /// Declared primitive data type
    pub data_type: String,
    pub data_type_iri: String,
    /// Type tag of `data_type_iri`
    pub express_type: String,
    pub description: String,
}

impl TemplateProperty {
    pub fn selection(&self) -> Option<Selection> {
        Selection::from_tag(&self.express_type, self.data_type_iri.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityDetail {
    pub super_entities: Vec<ConceptRef>,
    pub sub_entities: Vec<ConceptRef>,
    /// Ascending by declared index
    pub direct_attributes: Vec<Attribute>,
    /// Ascending by name; inverse attributes carry no declared index
    pub inverse_attributes: Vec<Attribute>,
    pub pset_templates: Vec<ConceptRef>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumDetail {
    pub members: Vec<EnumMember>,
    pub referenced_by: Vec<ReferencingEntity>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyEnumerationDetail {
    pub members: Vec<EnumMember>,
    pub pset_templates: Vec<PsetUsage>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectDetail {
    pub members: Vec<SelectMember>,
    pub referenced_by: Vec<ReferencingEntity>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedTypeDetail {
    /// Fragment of the base type IRI
    pub derived_from: Option<String>,
    pub derived_from_iri: Option<String>,
    pub cardinality: Option<String>,
    pub referenced_by: Vec<ReferencingEntity>,
}

impl DerivedTypeDetail {
    /// `*Base*` for a single value, `<cardinality> *Base*` for a collection
    pub fn derived_from_display(&self) -> Option<String> {
        let base = self.derived_from.as_deref()?;
        Some(match self.cardinality.as_deref() {
            Some("1") => format!("*{}*", base),
            Some(cardinality) => format!("{} *{}*", cardinality, base),
            None => format!("*{}*", base),
        })
    }

    pub fn is_collection(&self) -> bool {
        self.cardinality.as_deref().map_or(false, |c| c != "1")
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetTemplateDetail {
    pub properties: Vec<TemplateProperty>,
    /// IRIs of every entity the template applies to, subtypes included
    pub applicable_entities: Vec<String>,
}

/// Per-kind sections of a concept detail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "sections")]
pub enum ConceptBody {
    Entity(EntityDetail),
    Enum(EnumDetail),
    PropertyEnumeration(PropertyEnumerationDetail),
    Select(SelectDetail),
    DerivedType(DerivedTypeDetail),
    PropertySetTemplate(SetTemplateDetail),
    QuantitySetTemplate(SetTemplateDetail),
}

impl ConceptBody {
    pub fn kind(&self) -> ConceptKind {
        match self {
            Self::Entity(_) => ConceptKind::Entity,
            Self::Enum(_) => ConceptKind::Enum,
            Self::PropertyEnumeration(_) => ConceptKind::PropertyEnumeration,
            Self::Select(_) => ConceptKind::Select,
            Self::DerivedType(_) => ConceptKind::DerivedType,
            Self::PropertySetTemplate(_) => ConceptKind::PropertySetTemplate,
            Self::QuantitySetTemplate(_) => ConceptKind::QuantitySetTemplate,
        }
    }
}

/// Full descriptive record of one concept
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptDetail {
    pub iri: String,
    /// IRI fragment, e.g. `IfcWall`
    pub label: String,
    pub definitions: Option<String>,
    pub body: ConceptBody,
}

impl ConceptDetail {
    pub fn kind(&self) -> ConceptKind {
        self.body.kind()
    }

    /// `express:Entity` style tag of the record
    pub fn express_type(&self) -> String {
        self.kind().tag()
    }

    /// buildingSMART documentation page for this concept
    pub fn doc_url(&self) -> String {
        format!("{}/{}.htm", DOC_BASE_URL, self.label)
    }

    /// Definitions with single line breaks doubled for markdown display
    ///
    /// Derived types keep their text as stored.
    pub fn definitions_markdown(&self) -> String {
        let text = self.definitions.as_deref().unwrap_or_default();
        match self.body {
            ConceptBody::DerivedType(_) => text.to_string(),
            _ => text.replace('\n', "\n\n"),
        }
    }

    /// Every concept reachable in one click from this record
    pub fn drill_down(&self) -> Vec<Selection> {
        let mut out = BTreeSet::new();
        let referencing = |out: &mut BTreeSet<Selection>, rows: &[ReferencingEntity]| {
            out.extend(rows.iter().map(ReferencingEntity::selection));
        };
        match &self.body {
            ConceptBody::Entity(entity) => {
                out.extend(entity.super_entities.iter().filter_map(ConceptRef::selection));
                out.extend(entity.sub_entities.iter().filter_map(ConceptRef::selection));
                out.extend(entity.direct_attributes.iter().filter_map(Attribute::selection));
                out.extend(entity.inverse_attributes.iter().filter_map(Attribute::selection));
                out.extend(entity.pset_templates.iter().filter_map(ConceptRef::selection));
            }
            ConceptBody::Enum(detail) => referencing(&mut out, &detail.referenced_by),
            ConceptBody::PropertyEnumeration(detail) => {
                out.extend(detail.pset_templates.iter().map(PsetUsage::selection));
            }
            ConceptBody::Select(detail) => {
                out.extend(detail.members.iter().filter_map(SelectMember::selection));
                referencing(&mut out, &detail.referenced_by);
            }
            ConceptBody::DerivedType(detail) => referencing(&mut out, &detail.referenced_by),
            ConceptBody::PropertySetTemplate(detail) | ConceptBody::QuantitySetTemplate(detail) => {
                out.extend(detail.properties.iter().filter_map(TemplateProperty::selection));
                out.extend(
                    detail
                        .applicable_entities
                        .iter()
                        .map(|iri| Selection::new(ConceptKind::Entity, iri.clone())),
                );
            }
        }
        out.into_iter().collect()
    }
}

/// Builds [`ConceptDetail`] records from the store
pub struct ConceptResolver<'a> {
    store: &'a SchemaStore,
}

impl<'a> ConceptResolver<'a> {
    pub fn new(store: &'a SchemaStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &'a SchemaStore {
        self.store
    }

    /// Resolve `iri` as `kind`; `None` when the kind has no detail strategy
    pub fn resolve(&self, kind: ConceptKind, iri: &str) -> Result<Option<ConceptDetail>> {
        let body = match kind {
            ConceptKind::Entity => ConceptBody::Entity(self.entity(iri)?),
            ConceptKind::Enum => ConceptBody::Enum(self.enumeration(iri)?),
            ConceptKind::PropertyEnumeration => {
                ConceptBody::PropertyEnumeration(self.property_enumeration(iri)?)
            }
            ConceptKind::Select => ConceptBody::Select(self.select(iri)?),
            ConceptKind::DerivedType => ConceptBody::DerivedType(self.derived_type(iri)?),
            ConceptKind::PropertySetTemplate => ConceptBody::PropertySetTemplate(self.set_template(iri)?),
            ConceptKind::QuantitySetTemplate => ConceptBody::QuantitySetTemplate(self.set_template(iri)?),
            ConceptKind::Type | ConceptKind::Class | ConceptKind::Property => {
                debug!(%kind, iri, "no detail strategy");
                return Ok(None);
            }
        };

        Ok(Some(ConceptDetail {
            iri: iri.to_string(),
            label: iri_fragment(iri).to_string(),
            definitions: self.definitions(iri)?,
            body,
        }))
    }

    /// Resolve by compact tag; unknown tags give `None` rather than an error
    pub fn resolve_tag(&self, tag: &str, iri: &str) -> Result<Option<ConceptDetail>> {
        match ConceptKind::from_tag(tag) {
            Some(kind) => self.resolve(kind, iri),
            None => {
                debug!(tag, iri, "unrecognized type tag");
                Ok(None)
            }
        }
    }

    pub fn resolve_selection(&self, selection: &Selection) -> Result<Option<ConceptDetail>> {
        self.resolve(selection.kind, &selection.iri)
    }

    /// EXPRESS kinds declared for `iri`, in declaration-independent order
    pub fn kinds_of(&self, iri: &str) -> Result<Vec<ConceptKind>> {
        let mut kinds: Vec<ConceptKind> = self
            .store
            .select(&SparqlQuery::concept_kinds(iri))?
            .iter()
            .filter_map(|row| row.value("express_type"))
            .filter_map(|uri| ConceptKind::from_uri(&uri))
            .collect();
        kinds.sort();
        kinds.dedup();
        Ok(kinds)
    }

    fn definitions(&self, iri: &str) -> Result<Option<String>> {
        let mut values: Vec<String> = self
            .store
            .select(&SparqlQuery::definitions(iri))?
            .iter()
            .filter_map(|row| row.value("definitions"))
            .collect();
        values.sort();
        Ok(values.into_iter().next())
    }

    fn express_type(&self, row: &QueryRow, var: &str) -> String {
        row.term(var)
            .map(|term| type_tag(self.store, term))
            .unwrap_or_default()
    }

    fn entity(&self, iri: &str) -> Result<EntityDetail> {
        let related = |query: SparqlQuery| -> Result<Vec<ConceptRef>> {
            let mut refs: Vec<ConceptRef> = self
                .store
                .select(&query)?
                .iter()
                .map(|row| ConceptRef {
                    iri: row.text("entity"),
                    name: row.text("entity_name"),
                    express_type: ConceptKind::Entity.tag(),
                    definitions: row.text("definitions"),
                })
                .collect();
            refs.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.iri.cmp(&b.iri)));
            refs.dedup_by(|a, b| a.iri == b.iri);
            Ok(refs)
        };

        let super_entities = related(SparqlQuery::super_entities(iri))?;
        let sub_entities = related(SparqlQuery::sub_entities(iri))?;

        let mut direct_attributes = self.attributes(SparqlQuery::direct_attributes(iri))?;
        direct_attributes.sort_by(|a, b| {
            a.index
                .unwrap_or(u32::MAX)
                .cmp(&b.index.unwrap_or(u32::MAX))
                .then_with(|| a.name.cmp(&b.name))
        });

        let mut inverse_attributes = self.attributes(SparqlQuery::inverse_attributes(iri))?;
        inverse_attributes.sort_by(|a, b| a.name.cmp(&b.name));

        let mut pset_templates: Vec<ConceptRef> = self
            .store
            .select(&SparqlQuery::entity_pset_templates(iri))?
            .iter()
            .map(|row| ConceptRef {
                iri: row.text("pset"),
                name: row.text("pset_name"),
                express_type: self.express_type(row, "express_type"),
                definitions: row.text("definitions"),
            })
            .collect();
        pset_templates.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.express_type.cmp(&b.express_type)));

        Ok(EntityDetail {
            super_entities,
            sub_entities,
            direct_attributes,
            inverse_attributes,
            pset_templates,
        })
    }

    fn attributes(&self, query: SparqlQuery) -> Result<Vec<Attribute>> {
        Ok(self
            .store
            .select(&query)?
            .iter()
            .map(|row| {
                let range_iri = row.text("attrRange");
                Attribute {
                    index: row.value("direct_attr_num").and_then(|n| n.trim().parse().ok()),
                    name: row.text("attr_name"),
                    optional: parse_flag(&row.text("optional")),
                    cardinality: row.text("cardinality"),
                    range: iri_fragment(&range_iri).to_string(),
                    range_iri,
                    express_type: self.express_type(row, "express_type"),
                    description: row.text("description"),
                }
            })
            .collect())
    }

    fn referencing_entities(&self, iri: &str) -> Result<Vec<ReferencingEntity>> {
        let mut rows: Vec<ReferencingEntity> = self
            .store
            .select(&SparqlQuery::referencing_entities(iri))?
            .iter()
            .map(|row| ReferencingEntity {
                entity: row.text("entity_name"),
                entity_iri: row.text("entity"),
                attribute: row.text("attribute_name"),
                direct_attr_num: row.value("direct_attr_num").and_then(|n| n.trim().parse().ok()),
                cardinality: row.text("cardinality"),
            })
            .collect();
        rows.sort_by(|a, b| {
            a.entity
                .cmp(&b.entity)
                .then_with(|| a.direct_attr_num.cmp(&b.direct_attr_num))
                .then_with(|| a.attribute.cmp(&b.attribute))
        });
        Ok(rows)
    }

    fn members(&self, iri: &str) -> Result<Vec<EnumMember>> {
        let mut members: Vec<EnumMember> = self
            .store
            .select(&SparqlQuery::enum_members(iri))?
            .iter()
            .map(|row| EnumMember {
                name: row.text("member_name"),
                description: row.text("member_description"),
            })
            .collect();
        members.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.description.cmp(&b.description)));
        Ok(members)
    }

    fn enumeration(&self, iri: &str) -> Result<EnumDetail> {
        Ok(EnumDetail {
            members: self.members(iri)?,
            referenced_by: self.referencing_entities(iri)?,
        })
    }

    fn property_enumeration(&self, iri: &str) -> Result<PropertyEnumerationDetail> {
        let mut pset_templates: Vec<PsetUsage> = self
            .store
            .select(&SparqlQuery::property_enumeration_psets(iri))?
            .iter()
            .map(|row| PsetUsage {
                pset_iri: row.text("pset_template"),
                pset_name: row.text("pset_template_name"),
                property_iri: row.text("prop"),
                property_name: row.text("prop_name"),
            })
            .collect();
        pset_templates.sort_by(|a, b| {
            a.pset_name
                .cmp(&b.pset_name)
                .then_with(|| a.property_name.cmp(&b.property_name))
        });

        Ok(PropertyEnumerationDetail {
            members: self.members(iri)?,
            pset_templates,
        })
    }

    fn select(&self, iri: &str) -> Result<SelectDetail> {
        let mut members: Vec<SelectMember> = self
            .store
            .select(&SparqlQuery::select_members(iri))?
            .iter()
            .map(|row| SelectMember {
                iri: row.text("member"),
                name: row.text("member_name"),
                express_type: self.express_type(row, "express_type"),
            })
            .collect();
        members.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.express_type.cmp(&b.express_type)));

        Ok(SelectDetail {
            members,
            referenced_by: self.referencing_entities(iri)?,
        })
    }

    fn derived_type(&self, iri: &str) -> Result<DerivedTypeDetail> {
        let rows = self.store.select(&SparqlQuery::derived_type(iri))?;
        let first = rows.iter().min_by_key(|row| (row.text("derived_from"), row.text("cardinality")));
        let derived_from_iri = first.and_then(|row| row.value("derived_from"));

        Ok(DerivedTypeDetail {
            derived_from: derived_from_iri.as_deref().map(|d| iri_fragment(d).to_string()),
            derived_from_iri,
            cardinality: first.and_then(|row| row.value("cardinality")),
            referenced_by: self.referencing_entities(iri)?,
        })
    }

    fn set_template(&self, iri: &str) -> Result<SetTemplateDetail> {
        let mut properties: Vec<TemplateProperty> = self
            .store
            .select(&SparqlQuery::pset_properties(iri))?
            .iter()
            .map(|row| TemplateProperty {
                name: row.text("prop_name"),
                property_type: row.value("property_type"),
                data_type: row.text("data_type"),
                data_type_iri: row.text("dataType"),
                express_type: self.express_type(row, "express_type"),
                description: row.text("description"),
            })
            .collect();
        properties.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.express_type.cmp(&b.express_type)));

        let applicable: BTreeSet<String> = self
            .store
            .select(&SparqlQuery::pset_applicable_entities(iri))?
            .iter()
            .filter_map(|row| row.value("applicable_entity"))
            .collect();

        Ok(SetTemplateDetail {
            properties,
            applicable_entities: applicable.into_iter().collect(),
        })
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "true" | "1" | "t" | "yes")
}
