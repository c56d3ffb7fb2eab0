/**
 * library.rs
 * Read-only RDF dataset for the schema viewer, backed by an in-memory Oxigraph store
 */

use oxigraph::io::RdfFormat;
use oxigraph::model::{
    GraphName, GraphNameRef, NamedNode, NamedNodeRef, NamedOrBlankNode, Subject, SubjectRef, Term,
    TermRef,
};
use oxigraph::sparql::{Query, QueryResults};
use oxigraph::store::Store;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

use crate::config::DatasetConfig;
use crate::errors::{Result, ViewerError};
use crate::schema::query::SparqlQuery;
use crate::store::namespace::NamespaceManager;
use crate::store::vocab::rdf;

/// One SELECT solution, keyed by variable name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryRow {
    bindings: HashMap<String, Term>,
}

impl QueryRow {
    pub fn term(&self, var: &str) -> Option<&Term> {
        self.bindings.get(var)
    }

    /// Lexical value of a literal, the IRI of a named node, `_:id` for a blank node
    pub fn value(&self, var: &str) -> Option<String> {
        self.term(var).map(term_value)
    }

    /// Like [`value`](Self::value) but unbound variables read as the empty string
    pub fn text(&self, var: &str) -> String {
        self.value(var).unwrap_or_default()
    }

    pub fn named_node(&self, var: &str) -> Option<&NamedNode> {
        match self.term(var) {
            Some(Term::NamedNode(node)) => Some(node),
            _ => None,
        }
    }

    /// N-Triples rendering of every binding
    pub fn to_strings(&self) -> HashMap<String, String> {
        self.bindings
            .iter()
            .map(|(var, term)| (var.clone(), term.to_string()))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl FromIterator<(String, Term)> for QueryRow {
    fn from_iter<I: IntoIterator<Item = (String, Term)>>(iter: I) -> Self {
        Self {
            bindings: iter.into_iter().collect(),
        }
    }
}

pub(crate) fn term_value(term: &Term) -> String {
    match term {
        Term::NamedNode(node) => node.as_str().to_string(),
        Term::BlankNode(node) => format!("_:{}", node.as_str()),
        Term::Literal(literal) => literal.value().to_string(),
        #[allow(unreachable_patterns)]
        other => other.to_string(),
    }
}

/// Which graph a SPARQL query sees as its default graph
#[derive(Debug, Clone, Copy)]
enum QueryScope<'a> {
    Union,
    Graph(NamedNodeRef<'a>),
}

/// The viewer's dataset: schema quads plus the merged ontology file
///
/// The store is only ever read after loading. SELECT and ASK queries run with
/// the default graph set to the union of every graph unless a named graph is
/// given explicitly.
pub struct SchemaStore {
    store: Store,
    namespaces: NamespaceManager,
}

impl fmt::Debug for SchemaStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaStore")
            .field("namespaces", &self.namespaces.namespaces().count())
            .finish_non_exhaustive()
    }
}

impl SchemaStore {
    /// Empty store with the default namespace bindings
    pub fn new() -> Result<Self> {
        Ok(Self {
            store: Store::new()?,
            namespaces: NamespaceManager::new(),
        })
    }

    /// Load the TriG quads file and the RDF/XML ontology file
    ///
    /// Both files are required; a missing one fails with `DatasetMissing`.
    pub fn open(dataset: &DatasetConfig) -> Result<Self> {
        for path in [&dataset.quads, &dataset.ontology] {
            if !path.is_file() {
                return Err(ViewerError::DatasetMissing(path.display().to_string()));
            }
        }

        let mut store = Self::new()?;
        store.load_file(&dataset.quads, RdfFormat::TriG)?;
        store.load_file(&dataset.ontology, RdfFormat::RdfXml)?;
        info!(
            quads = store.len()?,
            graphs = store.named_graphs()?.len(),
            "dataset loaded"
        );
        Ok(store)
    }

    /// Convenience constructor for a single in-memory TriG document
    pub fn from_trig(document: &str) -> Result<Self> {
        let mut store = Self::new()?;
        store.load_str(document, RdfFormat::TriG)?;
        Ok(store)
    }

    /// Add bindings on top of the defaults and file-declared prefixes
    pub fn with_namespaces<'a>(mut self, bindings: impl IntoIterator<Item = (&'a String, &'a String)>) -> Self {
        for (prefix, iri) in bindings {
            self.namespaces.bind(prefix, iri);
        }
        self
    }

    pub fn load_file(&mut self, path: &Path, format: RdfFormat) -> Result<()> {
        if !path.exists() {
            return Err(ViewerError::FileNotFound(path.display().to_string()));
        }
        if path.is_dir() {
            return Err(ViewerError::Parse(format!("Path is a directory: {}", path.display())));
        }

        let started = Instant::now();
        let content = fs::read_to_string(path)?;
        self.load_str(&content, format)?;
        debug!(
            path = %path.display(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "loaded RDF file"
        );
        Ok(())
    }

    /// Parse `document` into the store and harvest its prefix declarations
    pub fn load_str(&mut self, document: &str, format: RdfFormat) -> Result<()> {
        self.store
            .load_from_reader(format, document.as_bytes())
            .map_err(|e| ViewerError::Parse(e.to_string()))?;
        let declared = self.namespaces.scan_declarations(document);
        debug!(declared, "namespace declarations harvested");
        Ok(())
    }

    pub fn namespaces(&self) -> &NamespaceManager {
        &self.namespaces
    }

    /// N3-style label of a term under the store's bindings
    pub fn label<'a>(&self, term: impl Into<TermRef<'a>>) -> String {
        self.namespaces.label(term)
    }

    /// Full IRI for `prefix:local`, `<iri>` or a bare IRI
    pub fn resolve(&self, label: &str) -> Result<NamedNode> {
        let iri = self
            .namespaces
            .expand(label)
            .ok_or_else(|| ViewerError::InvalidIri(label.to_string()))?;
        Ok(NamedNode::new(iri)?)
    }

    /// Number of quads across every graph
    pub fn len(&self) -> Result<usize> {
        Ok(self.store.len()?)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.store.is_empty()?)
    }

    pub fn named_graphs(&self) -> Result<Vec<NamedOrBlankNode>> {
        let mut graphs = self.store.named_graphs().collect::<std::result::Result<Vec<_>, _>>()?;
        graphs.sort_by_key(|g| g.to_string());
        Ok(graphs)
    }

    /// Number of quads in one named graph
    pub fn graph_len(&self, graph: &NamedOrBlankNode) -> Result<usize> {
        let mut count = 0;
        for quad in self
            .store
            .quads_for_pattern(None, None, None, Some(GraphNameRef::from(graph.as_ref())))
        {
            quad?;
            count += 1;
        }
        Ok(count)
    }

    /// Number of quads outside any named graph (the RDF/XML ontology lands here)
    pub fn default_graph_len(&self) -> Result<usize> {
        let mut count = 0;
        for quad in self
            .store
            .quads_for_pattern(None, None, None, Some(GraphNameRef::DefaultGraph))
        {
            quad?;
            count += 1;
        }
        Ok(count)
    }

    /// Distinct `(subject, object)` pairs for `predicate`, across every graph
    pub fn subject_objects(&self, predicate: NamedNodeRef<'_>) -> Result<Vec<(Subject, Term)>> {
        let mut seen = HashSet::new();
        let mut pairs = Vec::new();
        for quad in self.store.quads_for_pattern(None, Some(predicate), None, None) {
            let quad = quad?;
            let pair = (quad.subject, quad.object);
            if seen.insert(pair.clone()) {
                pairs.push(pair);
            }
        }
        Ok(pairs)
    }

    /// Distinct objects of `(subject, predicate, ?)`
    pub fn objects(&self, subject: SubjectRef<'_>, predicate: NamedNodeRef<'_>) -> Result<Vec<Term>> {
        let mut seen = HashSet::new();
        let mut objects = Vec::new();
        for quad in self.store.quads_for_pattern(Some(subject), Some(predicate), None, None) {
            let object = quad?.object;
            if seen.insert(object.clone()) {
                objects.push(object);
            }
        }
        Ok(objects)
    }

    /// Distinct subjects of `(?, predicate, object)`
    pub fn subjects(&self, predicate: NamedNodeRef<'_>, object: TermRef<'_>) -> Result<Vec<Subject>> {
        let mut seen = HashSet::new();
        let mut subjects = Vec::new();
        for quad in self.store.quads_for_pattern(None, Some(predicate), Some(object), None) {
            let subject = quad?.subject;
            if seen.insert(subject.clone()) {
                subjects.push(subject);
            }
        }
        Ok(subjects)
    }

    /// Distinct `(predicate, object)` pairs leaving `subject`
    pub fn predicate_objects(&self, subject: SubjectRef<'_>) -> Result<Vec<(NamedNode, Term)>> {
        let mut seen = HashSet::new();
        let mut pairs = Vec::new();
        for quad in self.store.quads_for_pattern(Some(subject), None, None, None) {
            let quad = quad?;
            let pair = (quad.predicate, quad.object);
            if seen.insert(pair.clone()) {
                pairs.push(pair);
            }
        }
        Ok(pairs)
    }

    /// Distinct `(subject, predicate)` pairs pointing at `object`
    pub fn subject_predicates(&self, object: TermRef<'_>) -> Result<Vec<(Subject, NamedNode)>> {
        let mut seen = HashSet::new();
        let mut pairs = Vec::new();
        for quad in self.store.quads_for_pattern(None, None, Some(object), None) {
            let quad = quad?;
            let pair = (quad.subject, quad.predicate);
            if seen.insert(pair.clone()) {
                pairs.push(pair);
            }
        }
        Ok(pairs)
    }

    /// `rdf:type` objects of `subject`
    pub fn types_of(&self, subject: SubjectRef<'_>) -> Result<Vec<Term>> {
        self.objects(subject, rdf::TYPE)
    }

    /// Run a SELECT over the whole dataset
    pub fn select(&self, query: &SparqlQuery) -> Result<Vec<QueryRow>> {
        self.run_select(query.as_str(), QueryScope::Union)
    }

    /// Run a SELECT whose default graph is the single named graph `graph`
    pub fn select_in_graph(&self, query: &SparqlQuery, graph: NamedNodeRef<'_>) -> Result<Vec<QueryRow>> {
        self.run_select(query.as_str(), QueryScope::Graph(graph))
    }

    /// Run an ASK over the whole dataset
    pub fn ask(&self, query: &SparqlQuery) -> Result<bool> {
        match self.execute(query.as_str(), QueryScope::Union)? {
            QueryResults::Boolean(answer) => Ok(answer),
            _ => Err(ViewerError::Query("Expected an ASK query".to_string())),
        }
    }

    /// Execute arbitrary SPARQL, rendering every term in N-Triples form
    ///
    /// ASK answers come back as one row with a `result` binding.
    pub fn query_sparql(&self, query: &str) -> Result<Vec<HashMap<String, String>>> {
        match self.execute(query, QueryScope::Union)? {
            QueryResults::Solutions(solutions) => {
                let mut rows = Vec::new();
                for solution in solutions {
                    let solution = solution?;
                    let mut row = HashMap::new();
                    for (var, term) in solution.iter() {
                        row.insert(var.as_str().to_string(), term.to_string());
                    }
                    rows.push(row);
                }
                Ok(rows)
            }
            QueryResults::Boolean(result) => {
                let mut row = HashMap::new();
                row.insert("result".to_string(), result.to_string());
                Ok(vec![row])
            }
            QueryResults::Graph(_) => Err(ViewerError::Query(
                "CONSTRUCT and DESCRIBE queries are not supported".to_string(),
            )),
        }
    }

    fn run_select(&self, query: &str, scope: QueryScope<'_>) -> Result<Vec<QueryRow>> {
        let started = Instant::now();
        let rows = match self.execute(query, scope)? {
            QueryResults::Solutions(solutions) => {
                let mut rows = Vec::new();
                for solution in solutions {
                    let solution = solution?;
                    rows.push(
                        solution
                            .iter()
                            .map(|(var, term)| (var.as_str().to_string(), term.clone()))
                            .collect::<QueryRow>(),
                    );
                }
                rows
            }
            _ => return Err(ViewerError::Query("Expected a SELECT query".to_string())),
        };
        debug!(
            rows = rows.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "sparql select"
        );
        Ok(rows)
    }

    fn execute(&self, query: &str, scope: QueryScope<'_>) -> Result<QueryResults> {
        let mut parsed = Query::parse(query, None).map_err(|e| ViewerError::Query(e.to_string()))?;
        match scope {
            QueryScope::Union => parsed.dataset_mut().set_default_graph_as_union(),
            QueryScope::Graph(graph) => parsed
                .dataset_mut()
                .set_default_graph(vec![GraphName::NamedNode(graph.into_owned())]),
        }
        Ok(self.store.query(parsed)?)
    }
}
