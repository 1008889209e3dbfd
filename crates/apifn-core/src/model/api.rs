use indexmap::IndexMap;

use super::Annotations;
use super::method::{Method, Parameter};
use super::security::SecurityScheme;
use crate::types::Type;

/// A resource and its nested resources.
#[derive(Debug, Clone)]
pub struct Resource {
    pub relative_uri: String,
    pub full_path: String,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub annotations: Annotations,
    pub uri_parameters: Vec<Parameter>,
    pub methods: Vec<Method>,
    pub resources: Vec<Resource>,
}

/// A resolved API description.
#[derive(Debug, Clone)]
pub struct Api {
    pub title: String,
    pub version: Option<String>,
    pub description: Option<String>,
    pub base_uri: Option<String>,
    pub types: IndexMap<String, Type>,
    pub annotations: Annotations,
    pub security_schemes: Vec<SecurityScheme>,
    pub resources: Vec<Resource>,
}

impl Api {
    /// Every method in document order, depth-first over nested resources.
    pub fn all_methods(&self) -> Vec<&Method> {
        fn walk<'a>(resources: &'a [Resource], out: &mut Vec<&'a Method>) {
            for resource in resources {
                out.extend(resource.methods.iter());
                walk(&resource.resources, out);
            }
        }

        let mut out = Vec::new();
        walk(&self.resources, &mut out);
        out
    }

    pub fn annotation(&self, name: &str) -> Option<&serde_json::Value> {
        self.annotations.get(name)
    }

    pub fn security_scheme(&self, name: &str) -> Option<&SecurityScheme> {
        self.security_schemes.iter().find(|s| s.name == name)
    }

    pub fn named_type(&self, name: &str) -> Option<&Type> {
        self.types.get(name)
    }
}
