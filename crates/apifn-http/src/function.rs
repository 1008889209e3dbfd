use std::sync::Arc;

use apifn_core::model::{Annotations, SecuredBy};
use apifn_core::types::Type;
use serde_json::Value;

use crate::error::CallError;
use crate::module::Module;
use crate::operation::{Arguments, Operation};
use crate::parameters::Parameter;
use crate::request::Request;
use crate::validation::ValidationReport;
use crate::view::ViewOverlay;

/// A callable exposed by a [`Module`]: an operation or a view over one.
#[derive(Debug, Clone)]
pub enum Function {
    Operation(Arc<Operation>),
    View(ViewOverlay),
}

impl Function {
    pub fn id(&self) -> &str {
        match self {
            Function::Operation(op) => op.id(),
            Function::View(view) => view.id(),
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Function::Operation(op) => op.display_name(),
            Function::View(view) => view.display_name(),
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            Function::Operation(op) => op.description(),
            Function::View(view) => view.description(),
        }
    }

    pub fn parameters(&self) -> Vec<&Parameter> {
        match self {
            Function::Operation(op) => op.parameters().iter().collect(),
            Function::View(view) => view.parameters(),
        }
    }

    pub fn return_type(&self) -> Option<&Type> {
        match self {
            Function::Operation(op) => op.return_type(),
            Function::View(view) => view.return_type(),
        }
    }

    pub fn annotations(&self) -> &Annotations {
        match self {
            Function::Operation(op) => op.annotations(),
            Function::View(view) => view.annotations(),
        }
    }

    pub fn secured_by(&self) -> &[SecuredBy] {
        match self {
            Function::Operation(op) => op.secured_by(),
            Function::View(view) => view.secured_by(),
        }
    }

    pub fn module(&self) -> Option<Module> {
        match self {
            Function::Operation(op) => op.module(),
            Function::View(view) => view.module(),
        }
    }

    pub fn validate_parameters(&self, args: &Arguments) -> ValidationReport {
        match self {
            Function::Operation(op) => op.validate_parameters(args),
            Function::View(view) => view.validate_parameters(args),
        }
    }

    pub fn request(&self, args: &Arguments) -> Result<Request, CallError> {
        match self {
            Function::Operation(op) => op.request(args),
            Function::View(view) => view.request(args),
        }
    }

    pub async fn call(&self, args: &Arguments) -> Result<Value, CallError> {
        match self {
            Function::Operation(op) => op.call(args).await,
            Function::View(view) => view.call(args).await,
        }
    }

    pub fn is_view(&self) -> bool {
        matches!(self, Function::View(_))
    }

    /// The operation this function calls.
    pub fn operation(&self) -> &Arc<Operation> {
        match self {
            Function::Operation(op) => op,
            Function::View(view) => view.operation(),
        }
    }
}
