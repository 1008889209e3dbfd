use serde_json::Value;

use super::{Builtin, Facet, Property, Status, Type, TypeKind};

pub(super) fn validate(ty: &Type, value: &Value) -> Status {
    let mut status = Status::ok();
    check(ty, value, &mut status);
    status
}

fn check(ty: &Type, value: &Value, status: &mut Status) {
    match &ty.0.kind {
        TypeKind::Builtin(builtin) => check_builtin(*builtin, value, status),
        TypeKind::Union(members) => {
            if !members.iter().any(|m| m.validate(value).is_ok()) {
                status.add(format!("value does not match {ty}"));
            }
        }
        TypeKind::Reference(_) => match ty.referenced() {
            Some(target) => check(&target, value, status),
            None => status.add(format!("unresolved type `{}`", ty.name())),
        },
        TypeKind::Declared {
            super_types,
            facets,
        } => {
            for super_type in super_types {
                check(super_type, value, status);
            }
            for facet in facets {
                check_facet(ty, facet, value, status);
            }
        }
    }
}

fn check_builtin(builtin: Builtin, value: &Value, status: &mut Status) {
    let matches = match builtin {
        Builtin::Any => true,
        Builtin::String | Builtin::DateTime | Builtin::File => value.is_string(),
        Builtin::DateOnly => value.as_str().is_some_and(is_date_only),
        Builtin::Number => value.is_number(),
        Builtin::Integer => is_integer(value),
        Builtin::Boolean => value.is_boolean(),
        Builtin::Object => value.is_object(),
        Builtin::Array => value.is_array(),
        Builtin::Nil => value.is_null(),
    };
    if !matches {
        status.add(format!(
            "expected {} but got {}",
            builtin.name(),
            value_kind(value)
        ));
    }
}

fn check_facet(owner: &Type, facet: &Facet, value: &Value, status: &mut Status) {
    match facet {
        Facet::Enum(values) => {
            if !values.contains(value) {
                let allowed: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                status.add(format!("value must be one of [{}]", allowed.join(", ")));
            }
        }
        Facet::Pattern(re) => {
            if let Some(s) = value.as_str()
                && !re.is_match(s)
            {
                status.add(format!("value does not match pattern `{}`", re.as_str()));
            }
        }
        Facet::MinLength(min) => {
            if let Some(s) = value.as_str()
                && (s.chars().count() as u64) < *min
            {
                status.add(format!("length must be at least {min}"));
            }
        }
        Facet::MaxLength(max) => {
            if let Some(s) = value.as_str()
                && (s.chars().count() as u64) > *max
            {
                status.add(format!("length must be at most {max}"));
            }
        }
        Facet::Minimum(min) => {
            if let Some(n) = value.as_f64()
                && n < *min
            {
                status.add(format!("value must be >= {min}"));
            }
        }
        Facet::Maximum(max) => {
            if let Some(n) = value.as_f64()
                && n > *max
            {
                status.add(format!("value must be <= {max}"));
            }
        }
        Facet::MultipleOf(step) => {
            if let Some(n) = value.as_f64()
                && *step != 0.0
                && (n / step).fract() != 0.0
            {
                status.add(format!("value must be a multiple of {step}"));
            }
        }
        Facet::Items(item_type) => {
            if let Some(items) = value.as_array() {
                for (i, item) in items.iter().enumerate() {
                    status.absorb(&format!("[{i}]"), item_type.validate(item));
                }
            }
        }
        Facet::MinItems(min) => {
            if let Some(items) = value.as_array()
                && (items.len() as u64) < *min
            {
                status.add(format!("array must have at least {min} items"));
            }
        }
        Facet::MaxItems(max) => {
            if let Some(items) = value.as_array()
                && (items.len() as u64) > *max
            {
                status.add(format!("array must have at most {max} items"));
            }
        }
        Facet::UniqueItems(true) => {
            if let Some(items) = value.as_array() {
                let duplicated = items
                    .iter()
                    .enumerate()
                    .any(|(i, item)| items[..i].contains(item));
                if duplicated {
                    status.add("array items must be unique");
                }
            }
        }
        Facet::Properties(properties) => {
            if let Some(object) = value.as_object() {
                for property in properties {
                    match object.get(&property.name) {
                        Some(v) => {
                            status.absorb(&property.name, property.property_type.validate(v))
                        }
                        None if property.required => {
                            status.add(format!("missing required property `{}`", property.name))
                        }
                        None => {}
                    }
                }
            }
        }
        Facet::AdditionalProperties(false) => {
            if let Some(object) = value.as_object() {
                let known = collect_properties(owner);
                for key in object.keys() {
                    if !known.iter().any(|p| &p.name == key) {
                        status.add(format!("unexpected property `{key}`"));
                    }
                }
            }
        }
        Facet::MinProperties(min) => {
            if let Some(object) = value.as_object()
                && (object.len() as u64) < *min
            {
                status.add(format!("object must have at least {min} properties"));
            }
        }
        Facet::MaxProperties(max) => {
            if let Some(object) = value.as_object()
                && (object.len() as u64) > *max
            {
                status.add(format!("object must have at most {max} properties"));
            }
        }
        _ => {}
    }
}

/// All properties visible on a type, inherited ones first.
fn collect_properties(ty: &Type) -> Vec<&Property> {
    let mut out = Vec::new();
    for super_type in ty.super_types() {
        out.extend(collect_properties(super_type));
    }
    for facet in ty.declared_facets() {
        if let Facet::Properties(properties) = facet {
            out.extend(properties.iter());
        }
    }
    out
}

fn is_integer(value: &Value) -> bool {
    if value.is_i64() || value.is_u64() {
        return true;
    }
    value.as_f64().is_some_and(|n| n.fract() == 0.0)
}

fn is_date_only(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit())
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "nil",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
