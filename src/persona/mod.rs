//! Persona system: the seven roles, their templates, the routing rules that
//! switch between them, and the manifest an install creates.

pub mod manifest;
pub mod registry;
pub mod rules;
pub mod types;

pub use manifest::Manifest;
pub use registry::{TemplateKind, TemplateStore};
pub use rules::RuleKind;
pub use types::{PersonaNames, PersonaRole};
