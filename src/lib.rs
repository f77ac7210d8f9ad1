// Re-export core modules for use by the binary or other consumers
pub mod content;
pub mod core;
pub mod session;
pub mod systems;

// Expose the main Session wrapper and types needed for interaction
pub use crate::content::case::{CaseDefinition, ContentError};
pub use crate::content::catalog::CaseCatalog;
pub use crate::core::session::{CaseAction, CaseSnapshot, Session, SessionSnapshot};
