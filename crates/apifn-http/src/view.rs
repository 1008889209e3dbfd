use std::sync::Arc;

use apifn_core::model::{Annotations, SecuredBy};
use apifn_core::types::Type;
use serde::Deserialize;
use serde_json::Value;

use crate::error::CallError;
use crate::module::Module;
use crate::operation::{Arguments, Operation};
use crate::parameters::Parameter;
use crate::request::Request;
use crate::validation::{ValidationReport, validate_arguments};

/// Annotation holding the list of view descriptors of an operation.
pub const VIEWS_ANNOTATION: &str = "views";

/// One entry of a `views` annotation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewDescription {
    pub id: String,
    #[serde(default)]
    pub fixed_parameters: Arguments,
    pub display_name: Option<String>,
    pub description: Option<String>,
}

/// A pre-filled, reduced interface over an [`Operation`].
///
/// Fixed parameters are hidden from [`ViewOverlay::parameters`] and always
/// override caller-supplied values of the same name.
#[derive(Debug, Clone)]
pub struct ViewOverlay {
    operation: Arc<Operation>,
    view: ViewDescription,
}

impl ViewOverlay {
    pub fn new(operation: Arc<Operation>, view: ViewDescription) -> Self {
        Self { operation, view }
    }

    pub fn id(&self) -> &str {
        &self.view.id
    }

    pub fn display_name(&self) -> &str {
        self.view.display_name.as_deref().unwrap_or(&self.view.id)
    }

    pub fn description(&self) -> Option<&str> {
        self.view.description.as_deref()
    }

    pub fn view(&self) -> &ViewDescription {
        &self.view
    }

    pub fn operation(&self) -> &Arc<Operation> {
        &self.operation
    }

    /// Parameters of the operation that the view leaves open.
    pub fn parameters(&self) -> Vec<&Parameter> {
        self.operation
            .parameters()
            .iter()
            .filter(|p| !self.view.fixed_parameters.contains_key(&p.name))
            .collect()
    }

    pub fn return_type(&self) -> Option<&Type> {
        self.operation.return_type()
    }

    pub fn annotations(&self) -> &Annotations {
        self.operation.annotations()
    }

    pub fn secured_by(&self) -> &[SecuredBy] {
        self.operation.secured_by()
    }

    pub fn module(&self) -> Option<Module> {
        self.operation.module()
    }

    /// Caller arguments with every fixed parameter written over them.
    pub fn fill(&self, args: &Arguments) -> Arguments {
        let mut merged = args.clone();
        for (name, value) in &self.view.fixed_parameters {
            merged.insert(name.clone(), value.clone());
        }
        merged
    }

    pub fn validate_parameters(&self, args: &Arguments) -> ValidationReport {
        validate_arguments(self.operation.parameters(), &self.fill(args))
    }

    pub fn request(&self, args: &Arguments) -> Result<Request, CallError> {
        self.operation.request(&self.fill(args))
    }

    pub async fn call(&self, args: &Arguments) -> Result<Value, CallError> {
        self.operation.call(&self.fill(args)).await
    }
}

/// Decode the `views` annotation of an operation.
///
/// Entries that are not view descriptors are skipped with a warning.
pub(crate) fn view_descriptions(operation: &Operation) -> Vec<ViewDescription> {
    let Some(Value::Array(entries)) = operation.annotations().get(VIEWS_ANNOTATION) else {
        return Vec::new();
    };
    entries
        .iter()
        .filter_map(|entry| match ViewDescription::deserialize(entry) {
            Ok(view) => Some(view),
            Err(e) => {
                log::warn!("skipping view of {}: {e}", operation.id());
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_view_description_defaults() {
        let view: ViewDescription = serde_json::from_value(json!({"id": "all"})).unwrap();
        assert_eq!(view.id, "all");
        assert!(view.fixed_parameters.is_empty());
        assert!(view.display_name.is_none());
    }

    #[test]
    fn test_view_description_rejects_non_objects() {
        assert!(serde_json::from_value::<ViewDescription>(json!("not a view")).is_err());
        assert!(serde_json::from_value::<ViewDescription>(json!({"fixedParameters": {}})).is_err());
    }
}
