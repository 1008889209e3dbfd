use apifn_core::model::{HttpMethod, ParameterLocation};
use serde_json::Value;

/// One located argument of a [`Request`].
#[derive(Debug, Clone, PartialEq)]
pub struct RequestParameter {
    pub name: String,
    pub location: ParameterLocation,
    pub value: Value,
}

/// Credentials passed through to the transport.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Auth {
    pub user: Option<String>,
    pub password: Option<String>,
    pub access_token: Option<String>,
}

/// A fully resolved request, built fresh for every call.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// URL template, still containing `{name}` placeholders.
    pub url: String,
    pub method: HttpMethod,
    pub parameters: Vec<RequestParameter>,
    pub auth: Option<Auth>,
}

impl Request {
    pub fn new(url: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            url: url.into(),
            method,
            parameters: Vec::new(),
            auth: None,
        }
    }

    pub fn parameter(
        mut self,
        name: impl Into<String>,
        location: ParameterLocation,
        value: Value,
    ) -> Self {
        self.parameters.push(RequestParameter {
            name: name.into(),
            location,
            value,
        });
        self
    }
}

/// JavaScript-style truthiness: `null`, `false`, `0`, `NaN` and `""` are falsy.
///
/// Attachment of query, header and body values (and the decision of which
/// arguments make it into a request at all) uses this test, while validation
/// only treats `null` or a missing key as absent.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Render a value for a URI segment, query string or header.
pub(crate) fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
