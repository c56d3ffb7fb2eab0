//! Session-scoped memoization of concept details and collections
//!
//! A [`Session`] owns its caches; nothing is shared between sessions. Entries
//! are never evicted, which is only correct because the store is read-only.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::errors::Result;
use crate::schema::collection::{Collection, CollectionKind};
use crate::schema::detail::{ConceptDetail, ConceptResolver, Selection};
use crate::store::SchemaStore;

/// Concept details keyed by IRI
#[derive(Debug, Default)]
pub struct ConceptCache {
    entries: HashMap<String, Arc<ConceptDetail>>,
    hits: u64,
    misses: u64,
}

impl ConceptCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached detail for the selected IRI, resolving it on first use
    ///
    /// Selections whose kind has no detail are not cached.
    pub fn get_or_resolve(
        &mut self,
        resolver: &ConceptResolver<'_>,
        selection: &Selection,
    ) -> Result<Option<Arc<ConceptDetail>>> {
        if let Some(detail) = self.entries.get(&selection.iri) {
            self.hits += 1;
            return Ok(Some(Arc::clone(detail)));
        }

        self.misses += 1;
        let Some(detail) = resolver.resolve_selection(selection)? else {
            return Ok(None);
        };
        let detail = Arc::new(detail);
        self.entries.insert(selection.iri.clone(), Arc::clone(&detail));
        Ok(Some(detail))
    }

    pub fn contains(&self, iri: &str) -> bool {
        self.entries.contains_key(iri)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(hits, misses)`
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}

/// One user's browsing state
#[derive(Debug)]
pub struct Session {
    id: Uuid,
    concepts: ConceptCache,
    collections: HashMap<CollectionKind, Arc<Collection>>,
    history: Vec<Selection>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            concepts: ConceptCache::new(),
            collections: HashMap::new(),
            history: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Handle a navigation event: record it and return the (cached) detail
    pub fn open(
        &mut self,
        resolver: &ConceptResolver<'_>,
        selection: Selection,
    ) -> Result<Option<Arc<ConceptDetail>>> {
        let detail = self.concepts.get_or_resolve(resolver, &selection)?;
        debug!(session = %self.id, kind = %selection.kind, iri = %selection.iri, "concept opened");
        self.history.push(selection);
        Ok(detail)
    }

    /// Collection members, loaded once per session
    pub fn collection(&mut self, store: &SchemaStore, kind: CollectionKind) -> Result<Arc<Collection>> {
        if let Some(collection) = self.collections.get(&kind) {
            return Ok(Arc::clone(collection));
        }
        let collection = Arc::new(Collection::load(store, kind)?);
        self.collections.insert(kind, Arc::clone(&collection));
        Ok(collection)
    }

    pub fn concepts(&self) -> &ConceptCache {
        &self.concepts
    }

    /// Every selection opened in this session, oldest first
    pub fn history(&self) -> &[Selection] {
        &self.history
    }
}

/// Sessions isolated by identity
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<Uuid, Session>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh session and return its id
    pub fn create(&mut self) -> Uuid {
        let session = Session::new();
        let id = session.id();
        self.sessions.insert(id, session);
        id
    }

    pub fn get(&self, id: &Uuid) -> Option<&Session> {
        self.sessions.get(id)
    }

    pub fn get_mut(&mut self, id: &Uuid) -> Option<&mut Session> {
        self.sessions.get_mut(id)
    }

    pub fn remove(&mut self, id: &Uuid) -> Option<Session> {
        self.sessions.remove(id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// Stable identity for a rendered table or chart
///
/// Derived from content only, so re-rendering the same concept section
/// always yields the same key and different sections never collide in
/// practice.
pub fn widget_key(iri: &str, section: &str) -> String {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(iri.as_bytes());
    hasher.update(&[0]);
    hasher.update(section.as_bytes());
    format!("{}-{:08x}", section, hasher.finalize())
}
