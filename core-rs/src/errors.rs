//! Error types for the IFC schema viewer core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("Dataset file missing: {0}")]
    DatasetMissing(String),

    #[error("Failed to parse RDF: {0}")]
    Parse(String),

    #[error("Oxigraph error: {0}")]
    Store(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Invalid IRI: {0}")]
    InvalidIri(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Regex error: {0}")]
    Regex(String),
}

impl From<regex::Error> for ViewerError {
    fn from(err: regex::Error) -> Self {
        ViewerError::Regex(err.to_string())
    }
}

impl From<oxigraph::sparql::EvaluationError> for ViewerError {
    fn from(err: oxigraph::sparql::EvaluationError) -> Self {
        ViewerError::Query(err.to_string())
    }
}

impl From<oxigraph::store::StorageError> for ViewerError {
    fn from(err: oxigraph::store::StorageError) -> Self {
        ViewerError::Store(err.to_string())
    }
}

impl From<oxigraph::model::IriParseError> for ViewerError {
    fn from(err: oxigraph::model::IriParseError) -> Self {
        ViewerError::InvalidIri(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ViewerError>;
