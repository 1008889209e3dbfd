use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::resource::ResourceDeclaration;
use super::security::{SecuredByDeclaration, SecuritySchemeDeclaration};
use super::type_decl::TypeDeclaration;

/// Top-level API description document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDocument {
    #[serde(default)]
    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_uri: Option<String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub types: IndexMap<String, TypeDeclaration>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub annotations: IndexMap<String, serde_json::Value>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub security_schemes: IndexMap<String, SecuritySchemeDeclaration>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub secured_by: Option<SecuredByDeclaration>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub resources: IndexMap<String, ResourceDeclaration>,
}
