use crate::types::Type;

/// Collapse an anonymous wrapper type onto the type it wraps.
///
/// A type is a wrapper when it has no name, exactly one supertype, and every
/// facet declared directly on it is metadata (see [`FacetKind::is_meta`]).
/// Such a type narrows nothing, so the normalized supertype is returned
/// instead. Any other type is returned unchanged.
///
/// [`FacetKind::is_meta`]: crate::types::FacetKind::is_meta
pub fn normalize_type(ty: &Type) -> Type {
    if ty.is_anonymous()
        && ty.super_types().len() == 1
        && ty.declared_facets().iter().all(|f| f.kind().is_meta())
    {
        return normalize_type(&ty.super_types()[0]);
    }
    ty.clone()
}
