use chrono::{DateTime, Utc};

use crate::session::progress::{CaseProgress, Hypothesis, SuspectStatus, TimelineEvent};

/// Mutation referenced a suspect name outside the case roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSuspectError {
    pub name: String,
}

impl std::fmt::Display for UnknownSuspectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "no suspect named {} in this case", self.name)
    }
}

impl std::error::Error for UnknownSuspectError {}

pub fn set_notes(progress: &mut CaseProgress, text: impl Into<String>) {
    progress.notes = text.into();
}

/// Blank text is ignored and returns false; anything else is appended trimmed.
pub fn append_hypothesis(progress: &mut CaseProgress, text: &str, now: DateTime<Utc>) -> bool {
    let text = text.trim();
    if text.is_empty() {
        return false;
    }
    progress.hypotheses.push(Hypothesis {
        at: now,
        text: text.to_string(),
    });
    true
}

/// Blank text is ignored and returns false; anything else is appended trimmed.
pub fn append_timeline_event(progress: &mut CaseProgress, text: &str, now: DateTime<Utc>) -> bool {
    let text = text.trim();
    if text.is_empty() {
        return false;
    }
    progress.timeline.push(TimelineEvent {
        at: now,
        event: text.to_string(),
    });
    true
}

pub fn set_suspect_status(
    progress: &mut CaseProgress,
    name: &str,
    status: SuspectStatus,
) -> Result<(), UnknownSuspectError> {
    match progress.suspect_mut(name) {
        Some(file) => {
            file.status = status;
            Ok(())
        }
        None => Err(UnknownSuspectError {
            name: name.to_string(),
        }),
    }
}

pub fn set_suspect_notes(
    progress: &mut CaseProgress,
    name: &str,
    text: &str,
) -> Result<(), UnknownSuspectError> {
    match progress.suspect_mut(name) {
        Some(file) => {
            file.notes = text.to_string();
            Ok(())
        }
        None => Err(UnknownSuspectError {
            name: name.to_string(),
        }),
    }
}
