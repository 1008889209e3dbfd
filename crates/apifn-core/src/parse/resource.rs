use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use super::security::SecuredByDeclaration;
use super::type_decl::TypeDeclaration;

/// A response declaration, keyed by status code in its method.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResponseDeclaration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub headers: IndexMap<String, TypeDeclaration>,

    /// Bodies keyed by mime type.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub body: IndexMap<String, TypeDeclaration>,
}

/// A method declaration, keyed by HTTP verb in its resource.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodDeclaration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub annotations: IndexMap<String, serde_json::Value>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub query_parameters: IndexMap<String, TypeDeclaration>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub headers: IndexMap<String, TypeDeclaration>,

    /// Request bodies keyed by mime type.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub body: IndexMap<String, TypeDeclaration>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub responses: IndexMap<String, ResponseDeclaration>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub secured_by: Option<SecuredByDeclaration>,
}

/// A resource declaration, keyed by its relative URI (`/users/{id}`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDeclaration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub annotations: IndexMap<String, serde_json::Value>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub uri_parameters: IndexMap<String, TypeDeclaration>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub methods: IndexMap<String, MethodDeclaration>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub resources: IndexMap<String, ResourceDeclaration>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub secured_by: Option<SecuredByDeclaration>,

    /// Verbs written directly under the resource instead of under `methods`.
    /// The parser moves them into `methods`.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub get: Option<MethodDeclaration>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub post: Option<MethodDeclaration>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub put: Option<MethodDeclaration>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub delete: Option<MethodDeclaration>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub patch: Option<MethodDeclaration>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub options: Option<MethodDeclaration>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub head: Option<MethodDeclaration>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub trace: Option<MethodDeclaration>,
}

impl ResourceDeclaration {
    /// Take the verbs written directly under the resource, in a fixed order.
    pub fn take_verbs(&mut self) -> Vec<(&'static str, MethodDeclaration)> {
        [
            ("get", self.get.take()),
            ("post", self.post.take()),
            ("put", self.put.take()),
            ("delete", self.delete.take()),
            ("patch", self.patch.take()),
            ("options", self.options.take()),
            ("head", self.head.take()),
            ("trace", self.trace.take()),
        ]
        .into_iter()
        .filter_map(|(verb, method)| method.map(|m| (verb, m)))
        .collect()
    }
}

/// A verb key that is present, even with a null value, declares the method.
fn present<'de, D>(deserializer: D) -> Result<Option<MethodDeclaration>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Some(
        Option::<MethodDeclaration>::deserialize(deserializer)?.unwrap_or_default(),
    ))
}
