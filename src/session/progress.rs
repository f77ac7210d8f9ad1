use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::content::case::{CaseDefinition, ENVELOPE_COUNT, OTHER_INDETERMINATE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SuspectStatus {
    #[default]
    Neutral,
    Suspect,
    Priority,
    Dismissed,
}

impl SuspectStatus {
    pub fn label(self) -> &'static str {
        match self {
            SuspectStatus::Neutral => "Neutral",
            SuspectStatus::Suspect => "Suspect",
            SuspectStatus::Priority => "Priority",
            SuspectStatus::Dismissed => "Dismissed",
        }
    }

    /// Sidebar badge glyph for the status.
    pub fn badge(self) -> &'static str {
        match self {
            SuspectStatus::Neutral => "⚪",
            SuspectStatus::Suspect => "🟠",
            SuspectStatus::Priority => "🔴",
            SuspectStatus::Dismissed => "🟢",
        }
    }
}

impl std::fmt::Display for SuspectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SuspectFile {
    pub name: String,
    pub status: SuspectStatus,
    pub notes: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimelineEvent {
    pub at: DateTime<Utc>,
    pub event: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Hypothesis {
    pub at: DateTime<Utc>,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Culprit {
    Named(String),
    OtherIndeterminate,
}

impl std::fmt::Display for Culprit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Culprit::Named(name) => f.write_str(name),
            Culprit::OtherIndeterminate => f.write_str(OTHER_INDETERMINATE),
        }
    }
}

/// The final accusation record. Frozen once stored; only a case reset
/// produces a state without one again.
#[derive(Debug, Clone, Serialize)]
pub struct Decision {
    pub culprit: Culprit,
    pub method: String,
    pub motive: String,
    pub reasoning: String,
    pub submitted_at: DateTime<Utc>,
}

/// Mutable investigation record for one case within the running session.
///
/// Fields are crate-private: every mutation goes through the transition
/// functions in `systems`, which re-validate regardless of what the caller
/// already checked.
#[derive(Debug, Clone, Serialize)]
pub struct CaseProgress {
    pub(crate) started: bool,
    pub(crate) current_envelope: u32,
    pub(crate) max_opened_envelope: u32,
    pub(crate) notes: String,
    pub(crate) timeline: Vec<TimelineEvent>,
    pub(crate) hypotheses: Vec<Hypothesis>,
    pub(crate) suspects: Vec<SuspectFile>,
    pub(crate) decision: Option<Decision>,
}

impl CaseProgress {
    pub fn new(roster: &[String]) -> Self {
        Self {
            started: false,
            current_envelope: 1,
            max_opened_envelope: 0,
            notes: String::new(),
            timeline: Vec::new(),
            hypotheses: Vec::new(),
            suspects: roster
                .iter()
                .map(|name| SuspectFile {
                    name: name.clone(),
                    status: SuspectStatus::Neutral,
                    notes: String::new(),
                })
                .collect(),
            decision: None,
        }
    }

    pub fn for_case(case: &CaseDefinition) -> Self {
        Self::new(&case.suspect_roster())
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn current_envelope(&self) -> u32 {
        self.current_envelope
    }

    /// The frontier: highest unlocked envelope, 0 before the case starts.
    pub fn max_opened_envelope(&self) -> u32 {
        self.max_opened_envelope
    }

    pub fn progress_percent(&self) -> u8 {
        (self.max_opened_envelope * 100 / ENVELOPE_COUNT) as u8
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn timeline(&self) -> &[TimelineEvent] {
        &self.timeline
    }

    pub fn hypotheses(&self) -> &[Hypothesis] {
        &self.hypotheses
    }

    pub fn suspects(&self) -> &[SuspectFile] {
        &self.suspects
    }

    pub fn suspect(&self, name: &str) -> Option<&SuspectFile> {
        self.suspects.iter().find(|file| file.name == name)
    }

    pub(crate) fn suspect_mut(&mut self, name: &str) -> Option<&mut SuspectFile> {
        self.suspects.iter_mut().find(|file| file.name == name)
    }

    pub fn decision(&self) -> Option<&Decision> {
        self.decision.as_ref()
    }

    pub fn decision_submitted(&self) -> bool {
        self.decision.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_progress_starts_locked() {
        let progress = CaseProgress::new(&["A".to_string(), "B".to_string()]);
        assert!(!progress.started());
        assert_eq!(progress.current_envelope(), 1);
        assert_eq!(progress.max_opened_envelope(), 0);
        assert_eq!(progress.progress_percent(), 0);
        assert!(!progress.decision_submitted());
    }

    #[test]
    fn roster_is_seeded_neutral_in_order() {
        let progress = CaseProgress::new(&["B".to_string(), "A".to_string()]);
        let suspects = progress.suspects();
        assert_eq!(suspects[0].name, "B");
        assert_eq!(suspects[1].name, "A");
        assert!(suspects
            .iter()
            .all(|file| file.status == SuspectStatus::Neutral && file.notes.is_empty()));
    }
}
