use indexmap::IndexMap;

use crate::error::TransformError;
use crate::model::*;
use crate::parse::document::ApiDocument;
use crate::parse::resource::{MethodDeclaration, ResourceDeclaration, ResponseDeclaration};
use crate::parse::security::{SecuredByDeclaration, SecuredByEntry};
use crate::parse::type_decl::TypeDeclaration;
use crate::types::{Builtin, Type};

use super::type_resolver::{TypeResolver, split_optional};

/// Transform a parsed description document into the resolved API model.
pub fn transform(doc: &ApiDocument) -> Result<Api, TransformError> {
    // Phase 1: Resolve named types
    let mut resolver = TypeResolver::new(&doc.types);
    let types = resolver.resolve_all()?;

    // Phase 2: Security schemes and the API-wide default requirement
    let security_schemes: Vec<SecurityScheme> = doc
        .security_schemes
        .iter()
        .map(|(name, s)| SecurityScheme {
            name: name.clone(),
            scheme_type: s.scheme_type.clone(),
            description: s.description.clone(),
            settings: s.settings.clone(),
        })
        .collect();
    let secured_by = doc
        .secured_by
        .as_ref()
        .map(convert_secured_by)
        .unwrap_or_default();

    // Phase 3: Resources and their methods
    let scope = Scope {
        path: String::new(),
        uri_parameters: Vec::new(),
        secured_by,
    };
    let resources = resolve_resources(&mut resolver, &doc.resources, &scope)?;

    let api = Api {
        title: doc.title.clone(),
        version: doc.version.clone(),
        description: doc.description.clone(),
        base_uri: doc.base_uri.clone(),
        types,
        annotations: doc.annotations.clone(),
        security_schemes,
        resources,
    };

    for method in api.all_methods() {
        for requirement in &method.secured_by {
            if let Some(ref scheme) = requirement.scheme
                && api.security_scheme(scheme).is_none()
            {
                log::warn!(
                    "{} {} is secured by undeclared scheme `{scheme}`",
                    method.method,
                    method.full_path
                );
            }
        }
    }

    Ok(api)
}

/// What a resource inherits from its ancestors.
struct Scope {
    path: String,
    uri_parameters: Vec<Parameter>,
    secured_by: Vec<SecuredBy>,
}

fn resolve_resources(
    resolver: &mut TypeResolver<'_>,
    decls: &IndexMap<String, ResourceDeclaration>,
    parent: &Scope,
) -> Result<Vec<Resource>, TransformError> {
    let mut resources = Vec::with_capacity(decls.len());

    for (relative_uri, decl) in decls {
        let own_uri_parameters =
            resolve_uri_parameters(resolver, relative_uri, &decl.uri_parameters)?;

        let mut uri_parameters: Vec<Parameter> = parent
            .uri_parameters
            .iter()
            .filter(|p| !own_uri_parameters.iter().any(|o| o.name == p.name))
            .cloned()
            .collect();
        uri_parameters.extend(own_uri_parameters.iter().cloned());

        let scope = Scope {
            path: format!("{}{}", parent.path, relative_uri),
            uri_parameters,
            secured_by: decl
                .secured_by
                .as_ref()
                .map(convert_secured_by)
                .unwrap_or_else(|| parent.secured_by.clone()),
        };

        let mut methods = Vec::with_capacity(decl.methods.len());
        for (verb, method_decl) in &decl.methods {
            methods.push(build_method(resolver, verb, method_decl, &scope)?);
        }

        let children = resolve_resources(resolver, &decl.resources, &scope)?;

        resources.push(Resource {
            relative_uri: relative_uri.clone(),
            full_path: scope.path,
            display_name: decl.display_name.clone(),
            description: decl.description.clone(),
            annotations: decl.annotations.clone(),
            uri_parameters: own_uri_parameters,
            methods,
            resources: children,
        });
    }

    Ok(resources)
}

/// URI parameters of one resource, in template order.
///
/// Placeholders with no declaration get an implicit required `string`
/// parameter; declared parameters missing from the template come last.
fn resolve_uri_parameters(
    resolver: &mut TypeResolver<'_>,
    relative_uri: &str,
    decls: &IndexMap<String, TypeDeclaration>,
) -> Result<Vec<Parameter>, TransformError> {
    let placeholders = uri_placeholders(relative_uri);
    let mut params = Vec::new();

    for placeholder in &placeholders {
        let declared = decls
            .iter()
            .find(|(raw, _)| raw.trim_end_matches('?') == *placeholder);
        let param = match declared {
            Some((_, decl)) => {
                build_parameter(resolver, placeholder, true, ParameterLocation::Uri, decl)?
            }
            None => Parameter {
                name: placeholder.to_string(),
                location: ParameterLocation::Uri,
                required: true,
                param_type: Type::builtin(Builtin::String),
                description: None,
                annotations: Annotations::new(),
            },
        };
        params.push(param);
    }

    for (raw, decl) in decls {
        let name = raw.trim_end_matches('?');
        if !placeholders.contains(&name) {
            params.push(build_parameter(
                resolver,
                name,
                true,
                ParameterLocation::Uri,
                decl,
            )?);
        }
    }

    Ok(params)
}

fn build_method(
    resolver: &mut TypeResolver<'_>,
    verb: &str,
    decl: &MethodDeclaration,
    scope: &Scope,
) -> Result<Method, TransformError> {
    let method =
        HttpMethod::from_name(verb).ok_or_else(|| TransformError::UnsupportedMethod(verb.into()))?;

    let mut parameters = scope.uri_parameters.clone();
    for (raw, param_decl) in &decl.query_parameters {
        let (name, required) = split_optional(raw, param_decl.required());
        parameters.push(build_parameter(
            resolver,
            &name,
            required,
            ParameterLocation::Query,
            param_decl,
        )?);
    }
    for (raw, param_decl) in &decl.headers {
        let (name, required) = split_optional(raw, param_decl.required());
        parameters.push(build_parameter(
            resolver,
            &name,
            required,
            ParameterLocation::Headers,
            param_decl,
        )?);
    }

    let bodies = resolve_bodies(resolver, &decl.body)?;

    let mut responses = Vec::with_capacity(decl.responses.len());
    for (code, response) in &decl.responses {
        responses.push(build_response(resolver, code, response)?);
    }

    Ok(Method {
        method,
        full_path: scope.path.clone(),
        display_name: decl.display_name.clone(),
        description: decl.description.clone(),
        annotations: decl.annotations.clone(),
        parameters,
        bodies,
        responses,
        secured_by: decl
            .secured_by
            .as_ref()
            .map(convert_secured_by)
            .unwrap_or_else(|| scope.secured_by.clone()),
    })
}

fn build_parameter(
    resolver: &mut TypeResolver<'_>,
    name: &str,
    required: bool,
    location: ParameterLocation,
    decl: &TypeDeclaration,
) -> Result<Parameter, TransformError> {
    let description = match decl {
        TypeDeclaration::Declaration(obj) => obj.description.clone(),
        TypeDeclaration::Expression(_) | TypeDeclaration::Empty => None,
    };
    Ok(Parameter {
        name: name.to_string(),
        location,
        required,
        param_type: resolver.resolve_declaration("", decl)?,
        description,
        annotations: decl.annotations(),
    })
}

fn resolve_bodies(
    resolver: &mut TypeResolver<'_>,
    decls: &IndexMap<String, TypeDeclaration>,
) -> Result<Vec<Body>, TransformError> {
    decls
        .iter()
        .map(|(mime_type, decl)| {
            Ok(Body {
                mime_type: mime_type.clone(),
                body_type: resolver.resolve_body(decl)?,
                annotations: decl.annotations(),
            })
        })
        .collect()
}

fn build_response(
    resolver: &mut TypeResolver<'_>,
    code: &str,
    decl: &ResponseDeclaration,
) -> Result<Response, TransformError> {
    Ok(Response {
        code: code.to_string(),
        description: decl.description.clone(),
        bodies: resolve_bodies(resolver, &decl.body)?,
    })
}

fn convert_secured_by(decl: &SecuredByDeclaration) -> Vec<SecuredBy> {
    decl.iter()
        .filter_map(|entry| match entry {
            None => Some(SecuredBy {
                scheme: None,
                settings: serde_json::Value::Null,
            }),
            Some(SecuredByEntry::Name(name)) => Some(SecuredBy {
                scheme: Some(name.clone()),
                settings: serde_json::Value::Null,
            }),
            Some(SecuredByEntry::WithSettings(map)) => {
                map.first().map(|(name, settings)| SecuredBy {
                    scheme: Some(name.clone()),
                    settings: settings.clone(),
                })
            }
        })
        .collect()
}

/// Names of `{placeholder}` segments in a URI template, in order.
fn uri_placeholders(uri: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut rest = uri;
    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            break;
        };
        out.push(&after[..close]);
        rest = &after[close + 1..];
    }
    out
}
