pub mod api;
pub mod method;
pub mod security;

pub use api::{Api, Resource};
pub use method::{Body, HttpMethod, Method, Parameter, ParameterLocation, Response};
pub use security::{SecuredBy, SecurityScheme};

/// Annotation values keyed by annotation name, in declaration order.
pub type Annotations = indexmap::IndexMap<String, serde_json::Value>;
