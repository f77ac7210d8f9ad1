pub mod case;
pub mod catalog;

pub use case::{
    load_case_file, CaseDefinition, Closing, ContentError, Envelope, DEFAULT_SUSPECTS,
    ENVELOPE_COUNT, OTHER_INDETERMINATE,
};
pub use catalog::{CaseCatalog, CaseSummary, DEFAULT_CONTENT_DIR};
