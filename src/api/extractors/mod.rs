//! Custom request extractors.

mod principal;
mod validated_json;

pub use principal::Authenticated;
pub use validated_json::ValidatedJson;
