use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A security scheme definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecuritySchemeDeclaration {
    /// e.g. `OAuth 2.0`, `Basic Authentication`, `Pass Through`, `x-custom`.
    #[serde(rename = "type")]
    pub scheme_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub settings: serde_json::Value,
}

/// One `securedBy` entry other than `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SecuredByEntry {
    Name(String),
    WithSettings(IndexMap<String, serde_json::Value>),
}

/// `securedBy` list; `None` entries mean anonymous access is allowed.
pub type SecuredByDeclaration = Vec<Option<SecuredByEntry>>;
