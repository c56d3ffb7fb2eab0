//! Schema navigation: data schemas (layers) → conceptual groups → concepts

use oxigraph::model::NamedNode;
use serde::{Deserialize, Serialize};

use crate::config::SchemaConfig;
use crate::errors::Result;
use crate::schema::detail::Selection;
use crate::schema::kind::type_tag;
use crate::schema::query::SparqlQuery;
use crate::store::SchemaStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSchema {
    pub iri: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptualGroup {
    pub iri: String,
    pub name: String,
    pub definitions: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupConcept {
    pub iri: String,
    pub name: String,
    pub express_type: String,
    pub definitions: String,
}

impl GroupConcept {
    pub fn selection(&self) -> Option<Selection> {
        Selection::from_tag(&self.express_type, self.iri.clone())
    }
}

pub struct SchemaNavigator<'a> {
    store: &'a SchemaStore,
    schema_graph: NamedNode,
}

impl<'a> SchemaNavigator<'a> {
    /// Navigator reading concepts from the configured schema graph
    pub fn new(store: &'a SchemaStore, schema: &SchemaConfig) -> Result<Self> {
        Ok(Self {
            store,
            schema_graph: store.resolve(&schema.schema_graph)?,
        })
    }

    pub fn data_schemas(&self, root_iri: &str) -> Result<Vec<DataSchema>> {
        let mut schemas: Vec<DataSchema> = self
            .store
            .select(&SparqlQuery::data_schemas(root_iri))?
            .iter()
            .map(|row| DataSchema {
                iri: row.text("data_schema"),
                name: row.text("ds_name"),
            })
            .collect();
        schemas.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(schemas)
    }

    pub fn conceptual_groups(&self, layer_iri: &str) -> Result<Vec<ConceptualGroup>> {
        let mut groups: Vec<ConceptualGroup> = self
            .store
            .select(&SparqlQuery::conceptual_groups(layer_iri))?
            .iter()
            .map(|row| ConceptualGroup {
                iri: row.text("conceptual_group"),
                name: row.text("cg_name"),
                definitions: row.text("cg_definitions"),
            })
            .collect();
        groups.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(groups)
    }

    /// Concepts linked from a group by `express:hasConcept` or any sub-property of it
    pub fn concepts(&self, group_iri: &str) -> Result<Vec<GroupConcept>> {
        let query = SparqlQuery::group_concepts(group_iri, self.schema_graph.as_str());
        let mut concepts: Vec<GroupConcept> = self
            .store
            .select(&query)?
            .iter()
            .map(|row| GroupConcept {
                iri: row.text("concept"),
                name: row.text("concept_name"),
                express_type: row
                    .term("concept_type")
                    .map(|t| type_tag(self.store, t))
                    .unwrap_or_default(),
                definitions: row.text("concept_definitions"),
            })
            .collect();
        concepts.sort_by(|a, b| {
            a.express_type
                .cmp(&b.express_type)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(concepts)
    }
}
