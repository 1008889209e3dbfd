pub mod doc_to_model;
pub mod type_normalizer;
pub mod type_resolver;

pub use doc_to_model::transform;
pub use type_normalizer::normalize_type;
