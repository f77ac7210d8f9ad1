pub mod library;
pub mod progress;
pub mod registry;

pub use library::CaseLibrary;
pub use progress::{
    CaseProgress, Culprit, Decision, Hypothesis, SuspectFile, SuspectStatus, TimelineEvent,
};
pub use registry::{SessionRegistry, ViewTarget};
