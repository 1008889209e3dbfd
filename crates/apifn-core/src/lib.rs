pub mod error;
pub mod model;
pub mod parse;
pub mod transform;
pub mod types;

use std::fs;
use std::path::Path;

use error::{ParseError, TransformError};
use model::Api;

/// Parse and resolve an API description from YAML.
pub fn load_api_yaml(input: &str) -> Result<Api, TransformError> {
    let doc = parse::from_yaml(input)?;
    transform::transform(&doc)
}

/// Parse and resolve an API description from JSON.
pub fn load_api_json(input: &str) -> Result<Api, TransformError> {
    let doc = parse::from_json(input)?;
    transform::transform(&doc)
}

/// Load an API description file, choosing the decoder by extension.
pub fn load_api_file(path: &Path) -> Result<Api, TransformError> {
    let content = fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("yaml");
    match ext {
        "json" => load_api_json(&content),
        _ => load_api_yaml(&content),
    }
}
