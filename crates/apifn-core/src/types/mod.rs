mod facet;
mod status;
mod validate;

use std::fmt;
use std::sync::{Arc, OnceLock, Weak};

pub use facet::{Facet, FacetKind, Property};
pub use status::{Severity, Status};

/// A built-in type of the type system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    Any,
    String,
    Number,
    Integer,
    Boolean,
    Object,
    Array,
    Nil,
    DateOnly,
    DateTime,
    File,
}

impl Builtin {
    pub fn name(&self) -> &'static str {
        match self {
            Builtin::Any => "any",
            Builtin::String => "string",
            Builtin::Number => "number",
            Builtin::Integer => "integer",
            Builtin::Boolean => "boolean",
            Builtin::Object => "object",
            Builtin::Array => "array",
            Builtin::Nil => "nil",
            Builtin::DateOnly => "date-only",
            Builtin::DateTime => "datetime",
            Builtin::File => "file",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let builtin = match name {
            "any" => Builtin::Any,
            "string" => Builtin::String,
            "number" => Builtin::Number,
            "integer" => Builtin::Integer,
            "boolean" => Builtin::Boolean,
            "object" => Builtin::Object,
            "array" => Builtin::Array,
            "nil" => Builtin::Nil,
            "date-only" => Builtin::DateOnly,
            "datetime" => Builtin::DateTime,
            "file" => Builtin::File,
            _ => return None,
        };
        Some(builtin)
    }
}

#[derive(Debug)]
enum TypeKind {
    Builtin(Builtin),
    Declared {
        super_types: Vec<Type>,
        facets: Vec<Facet>,
    },
    Union(Vec<Type>),
    /// A named type referenced from inside its own declaration, bound once
    /// the named type is resolved. Weak so recursive types do not leak.
    Reference(OnceLock<Weak<TypeNode>>),
}

#[derive(Debug)]
struct TypeNode {
    name: String,
    kind: TypeKind,
}

/// A shared handle to a resolved type.
///
/// Anonymous inline declarations have an empty name. Equality is identity,
/// except that two handles to the same built-in are always equal.
#[derive(Debug, Clone)]
pub struct Type(Arc<TypeNode>);

impl Type {
    pub fn builtin(builtin: Builtin) -> Self {
        Type(Arc::new(TypeNode {
            name: builtin.name().to_string(),
            kind: TypeKind::Builtin(builtin),
        }))
    }

    pub fn declared(name: impl Into<String>, super_types: Vec<Type>, facets: Vec<Facet>) -> Self {
        Type(Arc::new(TypeNode {
            name: name.into(),
            kind: TypeKind::Declared {
                super_types,
                facets,
            },
        }))
    }

    pub fn union(name: impl Into<String>, members: Vec<Type>) -> Self {
        Type(Arc::new(TypeNode {
            name: name.into(),
            kind: TypeKind::Union(members),
        }))
    }

    /// A forward handle to a named type that is still being resolved.
    pub(crate) fn reference(name: impl Into<String>) -> Self {
        Type(Arc::new(TypeNode {
            name: name.into(),
            kind: TypeKind::Reference(OnceLock::new()),
        }))
    }

    /// Point a forward handle at its resolved type. No-op on other types.
    pub(crate) fn bind(&self, target: &Type) {
        if let TypeKind::Reference(cell) = &self.0.kind {
            let _ = cell.set(Arc::downgrade(&target.0));
        }
    }

    pub fn is_reference(&self) -> bool {
        matches!(self.0.kind, TypeKind::Reference(_))
    }

    /// The type a reference points at, or `None` when this is not a
    /// reference or its target has been dropped with the API.
    pub fn referenced(&self) -> Option<Type> {
        match &self.0.kind {
            TypeKind::Reference(cell) => cell.get().and_then(Weak::upgrade).map(Type),
            _ => None,
        }
    }

    fn dereferenced(&self) -> Type {
        self.referenced().unwrap_or_else(|| self.clone())
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn is_anonymous(&self) -> bool {
        self.0.name.is_empty()
    }

    pub fn super_types(&self) -> &[Type] {
        match &self.0.kind {
            TypeKind::Declared { super_types, .. } => super_types,
            _ => &[],
        }
    }

    /// Facets attached directly to this type, excluding inherited ones.
    pub fn declared_facets(&self) -> &[Facet] {
        match &self.0.kind {
            TypeKind::Declared { facets, .. } => facets,
            _ => &[],
        }
    }

    pub fn union_members(&self) -> &[Type] {
        match &self.0.kind {
            TypeKind::Union(members) => members,
            _ => &[],
        }
    }

    pub fn as_builtin(&self) -> Option<Builtin> {
        match &self.0.kind {
            TypeKind::Builtin(b) => Some(*b),
            _ => None,
        }
    }

    /// Validate a JSON value against this type, its supertypes and its facets.
    pub fn validate(&self, value: &serde_json::Value) -> Status {
        validate::validate(self, value)
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.0, &other.0) {
            return true;
        }
        let (this, other) = (self.dereferenced(), other.dereferenced());
        if Arc::ptr_eq(&this.0, &other.0) {
            return true;
        }
        match (this.as_builtin(), other.as_builtin()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_anonymous() {
            return write!(f, "{}", self.0.name);
        }
        match &self.0.kind {
            TypeKind::Union(members) => {
                let names: Vec<String> = members.iter().map(|m| m.to_string()).collect();
                write!(f, "{}", names.join(" | "))
            }
            TypeKind::Declared { super_types, .. } => {
                let names: Vec<String> = super_types.iter().map(|s| s.to_string()).collect();
                write!(f, "<anonymous {}>", names.join(", "))
            }
            TypeKind::Builtin(b) => write!(f, "{}", b.name()),
            TypeKind::Reference(_) => write!(f, "{}", self.0.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_equality() {
        assert_eq!(Type::builtin(Builtin::String), Type::builtin(Builtin::String));
        assert_ne!(Type::builtin(Builtin::String), Type::builtin(Builtin::Integer));
    }

    #[test]
    fn test_declared_identity() {
        let a = Type::declared("", vec![Type::builtin(Builtin::String)], vec![]);
        let b = Type::declared("", vec![Type::builtin(Builtin::String)], vec![]);
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn test_display() {
        let string = Type::builtin(Builtin::String);
        let nil = Type::builtin(Builtin::Nil);
        assert_eq!(Type::union("", vec![string.clone(), nil]).to_string(), "string | nil");
        assert_eq!(
            Type::declared("", vec![string.clone()], vec![]).to_string(),
            "<anonymous string>"
        );
        assert_eq!(Type::declared("Name", vec![string], vec![]).to_string(), "Name");
    }

    #[test]
    fn test_reference_binds_to_target() {
        let reference = Type::reference("Node");
        assert!(reference.referenced().is_none());

        let node = Type::declared("Node", vec![Type::builtin(Builtin::Object)], vec![]);
        reference.bind(&node);
        assert!(reference.is_reference());
        assert_eq!(reference.referenced(), Some(node.clone()));
        assert_eq!(reference, node);
        assert_eq!(reference.to_string(), "Node");

        drop(node);
        assert!(reference.referenced().is_none());
    }

    #[test]
    fn test_builtin_names_round_trip() {
        for name in ["any", "string", "integer", "date-only", "datetime", "file"] {
            assert_eq!(Builtin::from_name(name).map(|b| b.name()), Some(name));
        }
        assert!(Builtin::from_name("Comic").is_none());
    }
}
