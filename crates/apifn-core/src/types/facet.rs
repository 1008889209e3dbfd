use regex::Regex;

use super::Type;

/// The metadata kind of a declared facet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FacetKind {
    DisplayName,
    Description,
    Default,
    Example,
    Examples,
    Required,
    DiscriminatorValue,
    Annotation,
    NotScalar,
    Discriminator,
    Enum,
    Pattern,
    MinLength,
    MaxLength,
    Minimum,
    Maximum,
    MultipleOf,
    Format,
    Items,
    MinItems,
    MaxItems,
    UniqueItems,
    Properties,
    AdditionalProperties,
    MinProperties,
    MaxProperties,
}

impl FacetKind {
    /// Whether the facet only documents a type and never narrows it.
    pub fn is_meta(self) -> bool {
        matches!(
            self,
            FacetKind::DisplayName
                | FacetKind::DiscriminatorValue
                | FacetKind::Description
                | FacetKind::Annotation
                | FacetKind::Example
                | FacetKind::Examples
                | FacetKind::Default
                | FacetKind::Required
                | FacetKind::NotScalar
        )
    }
}

/// A property of an object type.
#[derive(Debug, Clone)]
pub struct Property {
    pub name: String,
    pub required: bool,
    pub property_type: Type,
}

/// A facet declared directly on a type.
#[derive(Debug, Clone)]
pub enum Facet {
    DisplayName(String),
    Description(String),
    Default(serde_json::Value),
    Example(serde_json::Value),
    Examples(serde_json::Value),
    Required(bool),
    DiscriminatorValue(serde_json::Value),
    Annotation {
        name: String,
        value: serde_json::Value,
    },
    NotScalar,
    Discriminator(String),
    Enum(Vec<serde_json::Value>),
    Pattern(Regex),
    MinLength(u64),
    MaxLength(u64),
    Minimum(f64),
    Maximum(f64),
    MultipleOf(f64),
    Format(String),
    Items(Type),
    MinItems(u64),
    MaxItems(u64),
    UniqueItems(bool),
    Properties(Vec<Property>),
    AdditionalProperties(bool),
    MinProperties(u64),
    MaxProperties(u64),
}

impl Facet {
    pub fn kind(&self) -> FacetKind {
        match self {
            Facet::DisplayName(_) => FacetKind::DisplayName,
            Facet::Description(_) => FacetKind::Description,
            Facet::Default(_) => FacetKind::Default,
            Facet::Example(_) => FacetKind::Example,
            Facet::Examples(_) => FacetKind::Examples,
            Facet::Required(_) => FacetKind::Required,
            Facet::DiscriminatorValue(_) => FacetKind::DiscriminatorValue,
            Facet::Annotation { .. } => FacetKind::Annotation,
            Facet::NotScalar => FacetKind::NotScalar,
            Facet::Discriminator(_) => FacetKind::Discriminator,
            Facet::Enum(_) => FacetKind::Enum,
            Facet::Pattern(_) => FacetKind::Pattern,
            Facet::MinLength(_) => FacetKind::MinLength,
            Facet::MaxLength(_) => FacetKind::MaxLength,
            Facet::Minimum(_) => FacetKind::Minimum,
            Facet::Maximum(_) => FacetKind::Maximum,
            Facet::MultipleOf(_) => FacetKind::MultipleOf,
            Facet::Format(_) => FacetKind::Format,
            Facet::Items(_) => FacetKind::Items,
            Facet::MinItems(_) => FacetKind::MinItems,
            Facet::MaxItems(_) => FacetKind::MaxItems,
            Facet::UniqueItems(_) => FacetKind::UniqueItems,
            Facet::Properties(_) => FacetKind::Properties,
            Facet::AdditionalProperties(_) => FacetKind::AdditionalProperties,
            Facet::MinProperties(_) => FacetKind::MinProperties,
            Facet::MaxProperties(_) => FacetKind::MaxProperties,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_kinds() {
        assert!(FacetKind::Default.is_meta());
        assert!(FacetKind::Required.is_meta());
        assert!(FacetKind::NotScalar.is_meta());
        assert!(!FacetKind::Enum.is_meta());
        assert!(!FacetKind::Format.is_meta());
        assert!(!FacetKind::Properties.is_meta());
    }
}
