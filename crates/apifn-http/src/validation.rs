use apifn_core::types::Status;
use indexmap::IndexMap;
use serde::Serialize;

use crate::operation::Arguments;
use crate::parameters::Parameter;

/// Outcome of checking arguments against a function's parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_ok: bool,
    pub missed_required_parameters: Vec<String>,
    pub errors: IndexMap<String, Status>,
}

/// Check every parameter independently; never fails.
///
/// A parameter is absent when its key is missing or its value is `null`.
/// Present values are checked against the parameter's type even when other
/// parameters have already failed.
pub fn validate_arguments<'a>(
    parameters: impl IntoIterator<Item = &'a Parameter>,
    args: &Arguments,
) -> ValidationReport {
    let mut missed = Vec::new();
    let mut errors = IndexMap::new();

    for param in parameters {
        match args.get(&param.name).filter(|v| !v.is_null()) {
            None => {
                if param.required {
                    missed.push(param.name.clone());
                }
            }
            Some(value) => {
                let status = param.param_type.validate(value);
                if status.is_error() {
                    errors.insert(param.name.clone(), status);
                }
            }
        }
    }

    ValidationReport {
        is_ok: missed.is_empty() && errors.is_empty(),
        missed_required_parameters: missed,
        errors,
    }
}
