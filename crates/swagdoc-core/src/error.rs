use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported Swagger version: {0} (expected 2.0)")]
    UnsupportedVersion(String),
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("unresolved reference: {0}")]
    UnresolvedRef(String),

    #[error("invalid reference format: {0}")]
    InvalidRefFormat(String),

    #[error("reference target not found: {0}")]
    RefTargetNotFound(String),
}

/// Authoring errors in the source document that leave nothing to document.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("{verb} {path} references a model definition that does not have a title member")]
    UntitledModel { verb: String, path: String },

    #[error("operation {verb} {path} does not have an operationId or summary member")]
    MissingOperationName { verb: String, path: String },

    #[error("failed to encode example for {id}: {source}")]
    Example {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid API base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "remote")]
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("remote specification {0} requires the `remote` feature")]
    RemoteDisabled(String),

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("resolve error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("{0}")]
    Build(#[from] BuildError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },
}
