use apifn_core::model::{Annotations, Method, ParameterLocation};
use apifn_core::transform::normalize_type;
use apifn_core::types::Type;
use serde::Serialize;

/// Name of the parameter synthesized from a JSON request body.
pub const BODY_PARAMETER: &str = "body";

/// An effective parameter of a callable function.
#[derive(Debug, Clone, Serialize)]
pub struct Parameter {
    pub name: String,
    pub location: ParameterLocation,
    pub required: bool,
    #[serde(rename = "type", serialize_with = "serialize_type")]
    pub param_type: Type,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Annotations::is_empty")]
    pub annotations: Annotations,
}

impl Parameter {
    pub fn annotation(&self, name: &str) -> Option<&serde_json::Value> {
        self.annotations.get(name)
    }
}

fn serialize_type<S: serde::Serializer>(ty: &Type, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(ty)
}

/// The effective parameter list of a method.
///
/// Declared parameters come first, in declaration order, with normalized
/// types. A JSON request body adds one trailing required `body` parameter.
pub fn resolve_parameters(method: &Method) -> Vec<Parameter> {
    let mut parameters: Vec<Parameter> = method
        .parameters
        .iter()
        .map(|p| Parameter {
            name: p.name.clone(),
            location: p.location,
            required: p.required,
            param_type: normalize_type(&p.param_type),
            description: p.description.clone(),
            annotations: p.annotations.clone(),
        })
        .collect();

    if let Some(body) = method.bodies.iter().find(|b| b.is_json()) {
        parameters.push(Parameter {
            name: BODY_PARAMETER.to_string(),
            location: ParameterLocation::Body,
            required: true,
            param_type: normalize_type(&body.body_type),
            description: None,
            annotations: body.annotations.clone(),
        });
    }

    parameters
}

/// The normalized type of the first JSON body of the first 2xx response.
pub fn resolve_return_type(method: &Method) -> Option<Type> {
    method
        .responses
        .iter()
        .filter(|r| r.code.starts_with('2'))
        .find_map(|r| r.bodies.iter().find(|b| b.is_json()))
        .map(|b| normalize_type(&b.body_type))
}
