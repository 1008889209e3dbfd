use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The `type` facet: a single type expression or a list of them (multiple inheritance).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeExpression {
    Single(String),
    Multiple(Vec<String>),
}

impl TypeExpression {
    pub fn expressions(&self) -> Vec<&str> {
        match self {
            TypeExpression::Single(s) => vec![s.as_str()],
            TypeExpression::Multiple(list) => list.iter().map(String::as_str).collect(),
        }
    }
}

/// A type declaration: either a bare type expression (`string`, `Comic[]`)
/// or a full declaration object carrying facets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeDeclaration {
    Expression(String),
    Declaration(Box<TypeDeclarationObject>),
    /// A null value (`id:` or `application/json: ~`), resolved to the default type.
    Empty,
}

impl TypeDeclaration {
    /// The `required` facet, if the declaration carries one.
    pub fn required(&self) -> Option<bool> {
        match self {
            TypeDeclaration::Expression(_) | TypeDeclaration::Empty => None,
            TypeDeclaration::Declaration(d) => d.required,
        }
    }

    pub fn annotations(&self) -> IndexMap<String, serde_json::Value> {
        match self {
            TypeDeclaration::Expression(_) | TypeDeclaration::Empty => IndexMap::new(),
            TypeDeclaration::Declaration(d) => d.annotations.clone(),
        }
    }
}

/// A declaration object with its own facets.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDeclarationObject {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_expression: Option<TypeExpression>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "default", skip_serializing_if = "Option::is_none")]
    pub default_value: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub discriminator_value: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub annotations: IndexMap<String, serde_json::Value>,

    // Scalar constraints
    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiple_of: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    // Array constraints
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<TypeDeclaration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_items: Option<bool>,

    // Object constraints
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, TypeDeclaration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_properties: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_properties: Option<u64>,
}
