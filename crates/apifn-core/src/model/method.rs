use std::fmt;

use serde::Serialize;

use super::Annotations;
use super::security::SecuredBy;
use crate::types::Type;

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
    Trace,
}

impl HttpMethod {
    /// Upper-case wire form, e.g. `GET`.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
            HttpMethod::Trace => "TRACE",
        }
    }

    /// Lower-case name as written in a description, e.g. `get`.
    pub fn name(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
            HttpMethod::Patch => "patch",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
            HttpMethod::Trace => "trace",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let method = match name.to_ascii_lowercase().as_str() {
            "get" => HttpMethod::Get,
            "post" => HttpMethod::Post,
            "put" => HttpMethod::Put,
            "delete" => HttpMethod::Delete,
            "patch" => HttpMethod::Patch,
            "options" => HttpMethod::Options,
            "head" => HttpMethod::Head,
            "trace" => HttpMethod::Trace,
            _ => return None,
        };
        Some(method)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a parameter value goes in the HTTP request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Uri,
    Query,
    Headers,
    Body,
}

impl ParameterLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterLocation::Uri => "uri",
            ParameterLocation::Query => "query",
            ParameterLocation::Headers => "headers",
            ParameterLocation::Body => "body",
        }
    }
}

impl fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A declared URI, query or header parameter.
#[derive(Debug, Clone)]
pub struct Parameter {
    pub name: String,
    pub location: ParameterLocation,
    pub required: bool,
    pub param_type: Type,
    pub description: Option<String>,
    pub annotations: Annotations,
}

/// A request or response body for one mime type.
#[derive(Debug, Clone)]
pub struct Body {
    pub mime_type: String,
    pub body_type: Type,
    pub annotations: Annotations,
}

impl Body {
    pub fn is_json(&self) -> bool {
        self.mime_type.contains("json")
    }
}

/// A declared response.
#[derive(Debug, Clone)]
pub struct Response {
    pub code: String,
    pub description: Option<String>,
    pub bodies: Vec<Body>,
}

/// A method on a resource.
#[derive(Debug, Clone)]
pub struct Method {
    pub method: HttpMethod,
    /// Concatenated relative URIs from the root, e.g. `/hello/{id}`.
    pub full_path: String,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub annotations: Annotations,
    /// URI parameters (outermost resource first), then query parameters, then headers.
    pub parameters: Vec<Parameter>,
    pub bodies: Vec<Body>,
    pub responses: Vec<Response>,
    pub secured_by: Vec<SecuredBy>,
}

impl Method {
    pub fn annotation(&self, name: &str) -> Option<&serde_json::Value> {
        self.annotations.get(name)
    }
}
