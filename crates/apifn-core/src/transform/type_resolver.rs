use std::collections::HashMap;

use indexmap::IndexMap;
use regex::Regex;

use crate::error::ResolveError;
use crate::parse::type_decl::{TypeDeclaration, TypeDeclarationObject};
use crate::types::{Builtin, Facet, Property, Type};

/// Resolves type expressions and declarations against a document's named types.
///
/// Every inline declaration produces an anonymous subtype of whatever it
/// references, even when it adds no facets; the normalizer collapses those.
///
/// A named type may refer to itself through `properties` or `items`; those
/// references become forward handles bound once the type is resolved. A
/// named type that inherits from itself is a [`ResolveError::CircularType`].
pub struct TypeResolver<'a> {
    declarations: &'a IndexMap<String, TypeDeclaration>,
    resolved: HashMap<String, Type>,
    stack: Vec<Frame>,
    forward: HashMap<String, Vec<Type>>,
}

/// One level of the resolution in progress.
enum Frame {
    Named(String),
    /// Inside `properties` or `items`, where a value is one level deeper.
    Nested,
}

impl<'a> TypeResolver<'a> {
    pub fn new(declarations: &'a IndexMap<String, TypeDeclaration>) -> Self {
        Self {
            declarations,
            resolved: HashMap::new(),
            stack: Vec::new(),
            forward: HashMap::new(),
        }
    }

    /// Resolve every named type, in declaration order.
    pub fn resolve_all(&mut self) -> Result<IndexMap<String, Type>, ResolveError> {
        let mut out = IndexMap::new();
        for name in self.declarations.keys() {
            out.insert(name.clone(), self.resolve_named(name)?);
        }
        Ok(out)
    }

    pub fn resolve_named(&mut self, name: &str) -> Result<Type, ResolveError> {
        if let Some(ty) = self.resolved.get(name) {
            return Ok(ty.clone());
        }
        let Some(decl) = self.declarations.get(name) else {
            return Err(ResolveError::UnknownType(name.to_string()));
        };
        let open = self
            .stack
            .iter()
            .position(|f| matches!(f, Frame::Named(n) if n == name));
        if let Some(start) = open {
            let frames = &self.stack[start..];
            if frames.iter().any(|f| matches!(f, Frame::Nested)) {
                let reference = Type::reference(name);
                self.forward
                    .entry(name.to_string())
                    .or_default()
                    .push(reference.clone());
                return Ok(reference);
            }
            let mut chain: Vec<&str> = frames
                .iter()
                .filter_map(|f| match f {
                    Frame::Named(n) => Some(n.as_str()),
                    Frame::Nested => None,
                })
                .collect();
            chain.push(name);
            return Err(ResolveError::CircularType(chain.join(" -> ")));
        }

        self.stack.push(Frame::Named(name.to_string()));
        let result = self.resolve_declaration(name, decl);
        self.stack.pop();

        let ty = result?;
        for reference in self.forward.remove(name).unwrap_or_default() {
            reference.bind(&ty);
        }
        log::debug!("resolved type {name}");
        self.resolved.insert(name.to_string(), ty.clone());
        Ok(ty)
    }

    fn nested<T>(
        &mut self,
        resolve: impl FnOnce(&mut Self) -> Result<T, ResolveError>,
    ) -> Result<T, ResolveError> {
        self.stack.push(Frame::Nested);
        let result = resolve(self);
        self.stack.pop();
        result
    }

    /// Resolve a type expression: a built-in, a named type, `T[]`, or `A | B`.
    pub fn resolve_expression(&mut self, expr: &str) -> Result<Type, ResolveError> {
        let expr = strip_parens(expr.trim());
        if expr.is_empty() {
            return Err(ResolveError::InvalidTypeExpression(expr.to_string()));
        }

        let members = split_union(expr);
        if members.len() > 1 {
            let members = members
                .into_iter()
                .map(|m| self.resolve_expression(m))
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(Type::union("", members));
        }

        if let Some(item) = expr.strip_suffix("[]") {
            let item_type = self.nested(|r| r.resolve_expression(item))?;
            return Ok(Type::declared(
                "",
                vec![Type::builtin(Builtin::Array)],
                vec![Facet::Items(item_type)],
            ));
        }

        if let Some(builtin) = Builtin::from_name(expr) {
            return Ok(Type::builtin(builtin));
        }
        if expr.contains(|c: char| c.is_whitespace() || "()[]|".contains(c)) {
            return Err(ResolveError::InvalidTypeExpression(expr.to_string()));
        }
        self.resolve_named(expr)
    }

    /// Resolve a declaration into a type with the given name (empty for inline).
    ///
    /// A declaration without `type`, `properties` or `items` is a `string`.
    pub fn resolve_declaration(
        &mut self,
        name: &str,
        decl: &TypeDeclaration,
    ) -> Result<Type, ResolveError> {
        self.resolve_with_default(name, decl, Builtin::String)
    }

    /// Resolve a body declaration, whose default type is `any`.
    pub fn resolve_body(&mut self, decl: &TypeDeclaration) -> Result<Type, ResolveError> {
        self.resolve_with_default("", decl, Builtin::Any)
    }

    fn resolve_with_default(
        &mut self,
        name: &str,
        decl: &TypeDeclaration,
        default: Builtin,
    ) -> Result<Type, ResolveError> {
        match decl {
            TypeDeclaration::Empty => Ok(Type::declared(
                name,
                vec![Type::builtin(default)],
                Vec::new(),
            )),
            TypeDeclaration::Expression(expr) => {
                let super_type = self.resolve_expression(expr)?;
                Ok(Type::declared(name, vec![super_type], Vec::new()))
            }
            TypeDeclaration::Declaration(obj) => {
                let super_types = match &obj.type_expression {
                    Some(te) => te
                        .expressions()
                        .into_iter()
                        .map(|e| self.resolve_expression(e))
                        .collect::<Result<Vec<_>, _>>()?,
                    None => vec![Type::builtin(default_builtin(obj, default))],
                };
                let facets = self.resolve_facets(name, obj)?;
                Ok(Type::declared(name, super_types, facets))
            }
        }
    }

    fn resolve_facets(
        &mut self,
        name: &str,
        obj: &TypeDeclarationObject,
    ) -> Result<Vec<Facet>, ResolveError> {
        let mut facets = Vec::new();

        if let Some(ref v) = obj.display_name {
            facets.push(Facet::DisplayName(v.clone()));
        }
        if let Some(ref v) = obj.description {
            facets.push(Facet::Description(v.clone()));
        }
        if let Some(ref v) = obj.default_value {
            facets.push(Facet::Default(v.clone()));
        }
        if let Some(ref v) = obj.example {
            facets.push(Facet::Example(v.clone()));
        }
        if let Some(ref v) = obj.examples {
            facets.push(Facet::Examples(v.clone()));
        }
        if let Some(v) = obj.required {
            facets.push(Facet::Required(v));
        }
        if let Some(ref v) = obj.discriminator {
            facets.push(Facet::Discriminator(v.clone()));
        }
        if let Some(ref v) = obj.discriminator_value {
            facets.push(Facet::DiscriminatorValue(v.clone()));
        }
        for (annotation, value) in &obj.annotations {
            facets.push(Facet::Annotation {
                name: annotation.clone(),
                value: value.clone(),
            });
        }

        if !obj.enum_values.is_empty() {
            facets.push(Facet::Enum(obj.enum_values.clone()));
        }
        if let Some(ref pattern) = obj.pattern {
            let re = Regex::new(pattern).map_err(|source| ResolveError::InvalidPattern {
                name: display_name(name),
                source,
            })?;
            facets.push(Facet::Pattern(re));
        }
        if let Some(v) = obj.min_length {
            facets.push(Facet::MinLength(v));
        }
        if let Some(v) = obj.max_length {
            facets.push(Facet::MaxLength(v));
        }
        if let Some(v) = obj.minimum {
            facets.push(Facet::Minimum(v));
        }
        if let Some(v) = obj.maximum {
            facets.push(Facet::Maximum(v));
        }
        if let Some(v) = obj.multiple_of {
            facets.push(Facet::MultipleOf(v));
        }
        if let Some(ref v) = obj.format {
            facets.push(Facet::Format(v.clone()));
        }

        if let Some(ref items) = obj.items {
            let item_type = self.nested(|r| r.resolve_declaration("", items))?;
            facets.push(Facet::Items(item_type));
        }
        if let Some(v) = obj.min_items {
            facets.push(Facet::MinItems(v));
        }
        if let Some(v) = obj.max_items {
            facets.push(Facet::MaxItems(v));
        }
        if let Some(v) = obj.unique_items {
            facets.push(Facet::UniqueItems(v));
        }

        if !obj.properties.is_empty() {
            let mut properties = Vec::with_capacity(obj.properties.len());
            for (raw_name, prop_decl) in &obj.properties {
                let (prop_name, required) = split_optional(raw_name, prop_decl.required());
                properties.push(Property {
                    name: prop_name,
                    required,
                    property_type: self.nested(|r| r.resolve_declaration("", prop_decl))?,
                });
            }
            facets.push(Facet::Properties(properties));
        }
        if let Some(v) = obj.additional_properties {
            facets.push(Facet::AdditionalProperties(v));
        }
        if let Some(v) = obj.min_properties {
            facets.push(Facet::MinProperties(v));
        }
        if let Some(v) = obj.max_properties {
            facets.push(Facet::MaxProperties(v));
        }

        Ok(facets)
    }
}

/// Split a `name?` key into its bare name and required flag.
///
/// A trailing `?` marks the entry optional; otherwise an explicit `required`
/// facet wins and the default is required.
pub fn split_optional(raw: &str, required: Option<bool>) -> (String, bool) {
    match raw.strip_suffix('?') {
        Some(bare) => (bare.to_string(), required.unwrap_or(false)),
        None => (raw.to_string(), required.unwrap_or(true)),
    }
}

fn default_builtin(obj: &TypeDeclarationObject, default: Builtin) -> Builtin {
    if !obj.properties.is_empty() {
        Builtin::Object
    } else if obj.items.is_some() {
        Builtin::Array
    } else {
        default
    }
}

fn display_name(name: &str) -> String {
    if name.is_empty() {
        "<inline>".to_string()
    } else {
        name.to_string()
    }
}

/// Remove one pair of parentheses wrapping the whole expression.
fn strip_parens(expr: &str) -> &str {
    if !(expr.starts_with('(') && expr.ends_with(')')) {
        return expr;
    }
    let inner = &expr[1..expr.len() - 1];
    let mut depth = 0i32;
    for c in inner.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return expr;
                }
            }
            _ => {}
        }
    }
    if depth == 0 { inner.trim() } else { expr }
}

/// Split on `|` outside parentheses.
fn split_union(expr: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, c) in expr.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            '|' if depth == 0 => {
                parts.push(expr[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(expr[start..].trim());
    parts
}
