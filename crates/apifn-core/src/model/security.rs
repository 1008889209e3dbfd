use serde::Serialize;

/// A declared security scheme.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecurityScheme {
    pub name: String,
    #[serde(rename = "type")]
    pub scheme_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "serde_json::Value::is_null")]
    pub settings: serde_json::Value,
}

/// A security requirement on a method.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecuredBy {
    /// `None` when anonymous access is allowed.
    pub scheme: Option<String>,
    #[serde(skip_serializing_if = "serde_json::Value::is_null")]
    pub settings: serde_json::Value,
}
