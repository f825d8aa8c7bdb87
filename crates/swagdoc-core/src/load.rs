use std::path::Path;

#[cfg(feature = "remote")]
use std::time::Duration;

use log::debug;

use crate::error::LoadError;
use crate::parse::ref_resolve::expand;
use crate::parse::spec::SwaggerSpec;
use crate::parse::{from_json, from_yaml};

#[cfg(feature = "remote")]
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Load a Swagger document from a file path or an `http(s)://` URL, and expand
/// its local references.
pub fn load_document(source: &str) -> Result<SwaggerSpec, LoadError> {
    let content = if is_url(source) {
        fetch(source)?
    } else {
        std::fs::read_to_string(source).map_err(|e| LoadError::Io {
            path: source.into(),
            source: e,
        })?
    };
    debug!("loaded {source} ({} bytes)", content.len());
    parse_document(&content, looks_like_json(Path::new(source), &content))
}

/// Parse and expand a document held in memory.
pub fn parse_document(content: &str, json: bool) -> Result<SwaggerSpec, LoadError> {
    let doc = if json {
        from_json(content)?
    } else {
        from_yaml(content)?
    };
    Ok(expand(&doc)?)
}

fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

fn looks_like_json(path: &Path, content: &str) -> bool {
    path.extension().is_some_and(|ext| ext == "json") || content.trim_start().starts_with('{')
}

#[cfg(feature = "remote")]
fn fetch(url: &str) -> Result<String, LoadError> {
    let fetch_error = |source| LoadError::Fetch {
        url: url.to_string(),
        source,
    };
    let client = reqwest::blocking::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(fetch_error)?;
    client
        .get(url)
        .send()
        .and_then(|response| response.error_for_status())
        .and_then(|response| response.text())
        .map_err(fetch_error)
}

#[cfg(not(feature = "remote"))]
fn fetch(url: &str) -> Result<String, LoadError> {
    Err(LoadError::RemoteDisabled(url.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL_YAML: &str = r#"
swagger: "2.0"
info:
  title: Minimal
  version: "1.0"
paths: {}
"#;

    #[test]
    fn test_load_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("swagger.yaml");
        std::fs::write(&path, MINIMAL_YAML).unwrap();
        let doc = load_document(path.to_str().unwrap()).unwrap();
        assert_eq!(doc.info.title, "Minimal");
    }

    #[test]
    fn test_load_json_by_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("swagger.txt");
        std::fs::write(
            &path,
            r#"{"swagger": "2.0", "info": {"title": "Json", "version": "1"}, "paths": {}}"#,
        )
        .unwrap();
        let doc = load_document(path.to_str().unwrap()).unwrap();
        assert_eq!(doc.info.title, "Json");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.yaml");
        let err = load_document(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn test_wrong_version_rejected() {
        let err = parse_document("swagger: \"1.2\"\ninfo: {title: Old, version: \"1\"}\n", false)
            .unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)));
    }

    #[test]
    fn test_dangling_reference_rejected() {
        let yaml = r##"
swagger: "2.0"
info: {title: Broken, version: "1"}
paths:
  /a:
    get:
      summary: A
      responses:
        "200":
          description: ok
          schema:
            $ref: "#/definitions/Missing"
"##;
        let err = parse_document(yaml, false).unwrap_err();
        assert!(matches!(err, LoadError::Resolve(_)));
    }
}
