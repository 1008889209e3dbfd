use std::sync::{OnceLock, Weak};

use apifn_core::model::{Annotations, Method, SecuredBy};
use apifn_core::types::Type;
use serde_json::Value;

use crate::error::CallError;
use crate::module::{Module, ModuleInner};
use crate::parameters::{Parameter, resolve_parameters, resolve_return_type};
use crate::request::{Request, is_truthy, value_to_string};
use crate::validation::{ValidationReport, validate_arguments};

/// Arguments of a call, keyed by parameter name.
pub type Arguments = serde_json::Map<String, Value>;

/// Annotation that overrides the derived operation id.
pub const ID_ANNOTATION: &str = "id";

/// One method of the API description, callable over HTTP.
///
/// Id, parameters and return type are computed on first access and cached
/// for the lifetime of the operation.
#[derive(Debug)]
pub struct Operation {
    module: Weak<ModuleInner>,
    method: Method,
    id: OnceLock<String>,
    parameters: OnceLock<Vec<Parameter>>,
    return_type: OnceLock<Option<Type>>,
}

impl Operation {
    pub(crate) fn new(module: Weak<ModuleInner>, method: Method) -> Self {
        Self {
            module,
            method,
            id: OnceLock::new(),
            parameters: OnceLock::new(),
            return_type: OnceLock::new(),
        }
    }

    /// The `id` annotation when it is truthy (a number is written out as
    /// text), otherwise the resource path joined with `.` followed by the verb.
    pub fn id(&self) -> &str {
        self.id.get_or_init(|| {
            match self.method.annotation(ID_ANNOTATION).filter(|v| is_truthy(v)) {
                Some(id) => value_to_string(id),
                None => derive_id(&self.method),
            }
        })
    }

    pub fn display_name(&self) -> &str {
        self.method.display_name.as_deref().unwrap_or_else(|| self.id())
    }

    pub fn description(&self) -> Option<&str> {
        self.method.description.as_deref()
    }

    pub fn parameters(&self) -> &[Parameter] {
        self.parameters.get_or_init(|| resolve_parameters(&self.method))
    }

    pub fn return_type(&self) -> Option<&Type> {
        self.return_type
            .get_or_init(|| resolve_return_type(&self.method))
            .as_ref()
    }

    pub fn annotations(&self) -> &Annotations {
        &self.method.annotations
    }

    pub fn secured_by(&self) -> &[SecuredBy] {
        &self.method.secured_by
    }

    /// The underlying method of the API description.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The owning module, or `None` once it has been dropped.
    pub fn module(&self) -> Option<Module> {
        self.module.upgrade().map(Module::from_inner)
    }

    pub fn validate_parameters(&self, args: &Arguments) -> ValidationReport {
        validate_arguments(self.parameters(), args)
    }

    /// Build the request for a call without performing any I/O.
    ///
    /// Only arguments with a truthy value are carried over.
    ///
    /// ## Errors
    ///
    /// Returns [`CallError::MissingBaseUri`] when the module has no base URI
    /// configured, and [`CallError::ModuleDropped`] when the module is gone.
    pub fn request(&self, args: &Arguments) -> Result<Request, CallError> {
        let module = self.module().ok_or(CallError::ModuleDropped)?;
        let settings = module.settings();
        let base_uri = settings
            .base_uri
            .as_deref()
            .filter(|uri| !uri.is_empty())
            .ok_or(CallError::MissingBaseUri)?;

        let mut request = Request::new(
            format!("{base_uri}{}", self.method.full_path),
            self.method.method,
        );
        for param in self.parameters() {
            if let Some(value) = args.get(&param.name).filter(|v| is_truthy(v)) {
                request = request.parameter(param.name.clone(), param.location, value.clone());
            }
        }
        request.auth = settings.auth();
        Ok(request)
    }

    /// Invoke the operation and resolve to the decoded response body.
    ///
    /// ## Errors
    ///
    /// Fails before any I/O with the errors of [`Operation::request`], and
    /// with [`CallError::Execute`] when no response was received.
    pub async fn call(&self, args: &Arguments) -> Result<Value, CallError> {
        let request = self.request(args)?;
        let module = self.module().ok_or(CallError::ModuleDropped)?;
        log::debug!("calling {}", self.id());
        Ok(module.executor().execute(request).await?)
    }
}

fn derive_id(method: &Method) -> String {
    let mut chars = method.full_path.chars();
    chars.next();
    let path: String = chars.map(|c| if c == '/' { '.' } else { c }).collect();
    format!("{path}.{}", method.method.name())
}

#[cfg(test)]
mod tests {
    use apifn_core::load_api_yaml;
    use apifn_core::model::HttpMethod;

    use super::*;

    fn method(yaml: &str) -> Method {
        load_api_yaml(yaml).unwrap().all_methods()[0].clone()
    }

    #[test]
    fn test_derive_id() {
        let m = method(
            r#"
title: T
resources:
  /hello/{id}:
    methods:
      put: {}
"#,
        );
        assert_eq!(derive_id(&m), "hello.{id}.put");
    }

    #[test]
    fn test_id_annotation_wins() {
        let op = Operation::new(
            Weak::new(),
            method(
                r#"
title: T
resources:
  /a:
    methods:
      get:
        annotations:
          id: listA
"#,
            ),
        );
        assert_eq!(op.id(), "listA");
        assert_eq!(op.display_name(), "listA");
    }

    #[test]
    fn test_empty_id_annotation_is_ignored() {
        let op = Operation::new(
            Weak::new(),
            method(
                r#"
title: T
resources:
  /a/b:
    methods:
      delete:
        displayName: Remove b
        annotations:
          id: ""
"#,
            ),
        );
        assert_eq!(op.id(), "a.b.delete");
        assert_eq!(op.display_name(), "Remove b");
        assert_eq!(op.method().method, HttpMethod::Delete);
    }

    #[test]
    fn test_numeric_id_annotation() {
        let yaml = |id: &str| {
            format!("title: T\nresources:\n  /a:\n    get:\n      annotations:\n        id: {id}\n")
        };
        let op = Operation::new(Weak::new(), method(&yaml("42")));
        assert_eq!(op.id(), "42");
        let op = Operation::new(Weak::new(), method(&yaml("0")));
        assert_eq!(op.id(), "a.get");
        let op = Operation::new(Weak::new(), method(&yaml("false")));
        assert_eq!(op.id(), "a.get");
    }

    #[test]
    fn test_detached_operation() {
        let op = Operation::new(
            Weak::new(),
            method("title: T\nresources:\n  /a:\n    methods:\n      get: {}\n"),
        );
        assert!(op.module().is_none());
        assert!(matches!(
            op.request(&Arguments::new()),
            Err(CallError::ModuleDropped)
        ));
    }
}
