pub mod document;
pub mod resource;
pub mod security;
pub mod type_decl;

use crate::error::ParseError;
use document::ApiDocument;
use resource::ResourceDeclaration;

/// Parse an API description document from YAML.
pub fn from_yaml(input: &str) -> Result<ApiDocument, ParseError> {
    let mut doc: ApiDocument = serde_yaml_ng::from_str(input)?;
    validate_document(&doc)?;
    fold_resources(&mut doc);
    Ok(doc)
}

/// Parse an API description document from JSON.
pub fn from_json(input: &str) -> Result<ApiDocument, ParseError> {
    let mut doc: ApiDocument = serde_json::from_str(input)?;
    validate_document(&doc)?;
    fold_resources(&mut doc);
    Ok(doc)
}

fn validate_document(doc: &ApiDocument) -> Result<(), ParseError> {
    if doc.title.trim().is_empty() {
        return Err(ParseError::MissingField("title".to_string()));
    }
    Ok(())
}

fn fold_resources(doc: &mut ApiDocument) {
    for (path, resource) in doc.resources.iter_mut() {
        fold_verbs(path, resource);
    }
}

/// Move verbs written directly under a resource into its `methods`.
/// An entry already under `methods` wins over a direct one.
fn fold_verbs(path: &str, resource: &mut ResourceDeclaration) {
    for (verb, method) in resource.take_verbs() {
        if resource.methods.contains_key(verb) {
            log::warn!("`{verb}` declared twice in resource {path}, keeping the one under methods");
            continue;
        }
        resource.methods.insert(verb.to_string(), method);
    }
    for (child_path, child) in resource.resources.iter_mut() {
        fold_verbs(&format!("{path}{child_path}"), child);
    }
}
