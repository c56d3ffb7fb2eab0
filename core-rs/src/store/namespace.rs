//! Prefix bindings and compact `prefix:local` labels
//!
//! Labels follow the N3 convention: a bound namespace gives `prefix:local`,
//! an unbound IRI is wrapped as `<iri>`, blank nodes print as `_:id` and
//! literals print their lexical value.

use oxigraph::model::TermRef;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

/// Namespace of the EXPRESS-derived schema ontology (`express:` prefix)
pub const EXPRESS_NS: &str = "http://www.semantic.org/zeyupan/ontologies/CoALA4IFC_Schema_Ont#";

/// Namespace of the IFC schema individuals (`ifc:` prefix)
pub const IFC_NS: &str = "http://www.semantic.org/zeyupan/instances/CoALA4IFC_Schema_Inst#";

pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const RDFS_NS: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub const OWL_NS: &str = "http://www.w3.org/2002/07/owl#";
pub const SKOS_NS: &str = "http://www.w3.org/2004/02/skos/core#";
pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema#";

const DEFAULT_BINDINGS: &[(&str, &str)] = &[
    ("rdf", RDF_NS),
    ("rdfs", RDFS_NS),
    ("owl", OWL_NS),
    ("xsd", XSD_NS),
    ("xml", "http://www.w3.org/XML/1998/namespace"),
    ("skos", SKOS_NS),
    ("dc", "http://purl.org/dc/elements/1.1/"),
    ("dcterms", "http://purl.org/dc/terms/"),
    ("express", EXPRESS_NS),
    ("ifc", IFC_NS),
];

// Turtle/TriG `@prefix p: <iri> .` and SPARQL-style `PREFIX p: <iri>`
static TURTLE_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?mi)^\s*@?prefix\s+([A-Za-z][\w.-]*)?:\s*<([^>\s]*)>").expect("valid prefix regex")
});

// RDF/XML `xmlns:p="iri"`
static XMLNS_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"xmlns:([A-Za-z][\w.-]*)\s*=\s*["']([^"']+)["']"#).expect("valid xmlns regex")
});

/// Prefix ↔ namespace bindings used to abbreviate IRIs
#[derive(Debug, Clone)]
pub struct NamespaceManager {
    /// prefix -> namespace IRI
    bindings: BTreeMap<String, String>,
}

impl Default for NamespaceManager {
    fn default() -> Self {
        Self::new()
    }
}

impl NamespaceManager {
    /// Manager preloaded with the RDF/OWL/SKOS and IFC schema bindings
    pub fn new() -> Self {
        let mut manager = Self::empty();
        for (prefix, iri) in DEFAULT_BINDINGS {
            manager.bind(prefix, iri);
        }
        manager
    }

    pub fn empty() -> Self {
        Self {
            bindings: BTreeMap::new(),
        }
    }

    /// Bind `prefix` to `iri`, replacing any earlier binding of either side
    pub fn bind(&mut self, prefix: &str, iri: &str) {
        self.bindings.retain(|p, ns| p != prefix && ns != iri);
        self.bindings.insert(prefix.to_string(), iri.to_string());
    }

    /// All bindings ordered by prefix
    pub fn namespaces(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bindings.iter().map(|(p, ns)| (p.as_str(), ns.as_str()))
    }

    pub fn namespace(&self, prefix: &str) -> Option<&str> {
        self.bindings.get(prefix).map(String::as_str)
    }

    /// Harvest prefix declarations from a Turtle/TriG or RDF/XML document
    ///
    /// Returns the number of bindings added. The empty Turtle prefix is skipped.
    pub fn scan_declarations(&mut self, document: &str) -> usize {
        let mut found = Vec::new();
        for caps in TURTLE_PREFIX.captures_iter(document) {
            if let (Some(prefix), Some(iri)) = (caps.get(1), caps.get(2)) {
                found.push((prefix.as_str().to_string(), iri.as_str().to_string()));
            }
        }
        for caps in XMLNS_PREFIX.captures_iter(document) {
            found.push((caps[1].to_string(), caps[2].to_string()));
        }
        let count = found.len();
        for (prefix, iri) in found {
            self.bind(&prefix, &iri);
        }
        count
    }

    /// `prefix:local` for a bound namespace, `<iri>` otherwise
    pub fn abbreviate(&self, iri: &str) -> String {
        let best = self
            .bindings
            .iter()
            .filter(|(_, ns)| iri.len() > ns.len() && iri.starts_with(ns.as_str()))
            .filter(|(_, ns)| is_local_name(&iri[ns.len()..]))
            .max_by_key(|(_, ns)| ns.len());

        match best {
            Some((prefix, ns)) => format!("{}:{}", prefix, &iri[ns.len()..]),
            None => format!("<{}>", iri),
        }
    }

    /// N3-style label for any RDF term
    pub fn label<'a>(&self, term: impl Into<TermRef<'a>>) -> String {
        let term = term.into();
        if let TermRef::NamedNode(node) = term {
            self.abbreviate(node.as_str())
        } else if let TermRef::BlankNode(node) = term {
            format!("_:{}", node.as_str())
        } else if let TermRef::Literal(literal) = term {
            literal.value().to_string()
        } else {
            term.to_string()
        }
    }

    /// Inverse of [`abbreviate`](Self::abbreviate): `prefix:local` or `<iri>` to a full IRI
    ///
    /// Strings that are neither are assumed to already be full IRIs.
    pub fn expand(&self, label: &str) -> Option<String> {
        if let Some(inner) = label.strip_prefix('<').and_then(|l| l.strip_suffix('>')) {
            return Some(inner.to_string());
        }
        if label.starts_with("_:") {
            return None;
        }
        if let Some((prefix, local)) = label.split_once(':') {
            if let Some(ns) = self.bindings.get(prefix) {
                return Some(format!("{}{}", ns, local));
            }
            if local.starts_with("//") {
                return Some(label.to_string());
            }
        }
        None
    }
}

/// Namespace part of a label: everything before the first `:`
pub fn label_namespace(label: &str) -> &str {
    label.split(':').next().unwrap_or(label)
}

/// Fragment (or last path segment) of an IRI
pub fn iri_fragment(iri: &str) -> &str {
    match iri.rfind(|c| c == '#' || c == '/') {
        Some(pos) => &iri[pos + 1..],
        None => iri,
    }
}

fn is_local_name(local: &str) -> bool {
    !local.is_empty()
        && !local
            .chars()
            .any(|c| matches!(c, '/' | '#' | '?' | ' ' | '<' | '>' | '"' | '{' | '}'))
}
