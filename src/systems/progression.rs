use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::content::case::{CaseDefinition, Closing, ENVELOPE_COUNT, OTHER_INDETERMINATE};
use crate::session::progress::{CaseProgress, Culprit, Decision};

/// Navigation or confirmation aimed past the unlocked frontier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockedEnvelopeError {
    pub requested: u32,
    pub frontier: u32,
}

impl std::fmt::Display for LockedEnvelopeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "envelope {} is locked; highest unlocked envelope is {}",
            self.requested, self.frontier
        )
    }
}

impl std::error::Error for LockedEnvelopeError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionField {
    Culprit,
    Method,
    Motive,
    Reasoning,
}

impl DecisionField {
    pub fn label(self) -> &'static str {
        match self {
            DecisionField::Culprit => "culprit",
            DecisionField::Method => "method",
            DecisionField::Motive => "motive",
            DecisionField::Reasoning => "reasoning",
        }
    }
}

impl std::fmt::Display for DecisionField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecisionError {
    EnvelopesRemaining { frontier: u32 },
    AlreadySubmitted,
    Incomplete { missing: Vec<DecisionField> },
    UnknownCulprit { name: String },
}

impl std::fmt::Display for DecisionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecisionError::EnvelopesRemaining { frontier } => write!(
                f,
                "all {} envelopes must be read before deciding; highest unlocked is {}",
                ENVELOPE_COUNT, frontier
            ),
            DecisionError::AlreadySubmitted => {
                f.write_str("the decision is already submitted and cannot change")
            }
            DecisionError::Incomplete { missing } => {
                let fields: Vec<&str> = missing.iter().map(|field| field.label()).collect();
                write!(f, "decision is missing: {}", fields.join(", "))
            }
            DecisionError::UnknownCulprit { name } => write!(
                f,
                "{} is neither a roster suspect nor {}",
                name, OTHER_INDETERMINATE
            ),
        }
    }
}

impl std::error::Error for DecisionError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmOutcome {
    Unlocked { next: u32 },
    NoChange,
}

/// Derived state of one envelope relative to the frontier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EnvelopeGate {
    Locked,
    Open,
    Confirmed,
}

/// Raw decision form input as the renderer collected it.
#[derive(Debug, Clone, Default)]
pub struct DecisionDraft {
    pub culprit: String,
    pub method: String,
    pub motive: String,
    pub reasoning: String,
}

/// First call unlocks envelope 1 and returns true. Re-invocation is an
/// idempotent no-op; it never resets progress.
pub fn start_case(progress: &mut CaseProgress) -> bool {
    if progress.started {
        return false;
    }
    progress.started = true;
    progress.max_opened_envelope = 1;
    progress.current_envelope = 1;
    true
}

/// Moves the reading position to any unlocked envelope. The engine
/// re-validates regardless of what the caller already checked.
pub fn navigate(progress: &mut CaseProgress, envelope_id: u32) -> Result<(), LockedEnvelopeError> {
    if envelope_id == 0 || envelope_id > progress.max_opened_envelope {
        return Err(LockedEnvelopeError {
            requested: envelope_id,
            frontier: progress.max_opened_envelope,
        });
    }
    progress.current_envelope = envelope_id;
    Ok(())
}

/// The only operation that advances the frontier. Confirming a non-frontier
/// envelope (a revisit) or the last envelope is a harmless no-op.
pub fn confirm_reading(progress: &mut CaseProgress, envelope_id: u32) -> ConfirmOutcome {
    if !progress.started
        || envelope_id != progress.max_opened_envelope
        || envelope_id >= ENVELOPE_COUNT
    {
        return ConfirmOutcome::NoChange;
    }
    progress.max_opened_envelope += 1;
    ConfirmOutcome::Unlocked {
        next: progress.max_opened_envelope,
    }
}

pub fn envelope_gate(progress: &CaseProgress, envelope_id: u32) -> EnvelopeGate {
    if envelope_id > progress.max_opened_envelope {
        EnvelopeGate::Locked
    } else if envelope_id == progress.max_opened_envelope {
        EnvelopeGate::Open
    } else {
        EnvelopeGate::Confirmed
    }
}

pub fn can_decide(progress: &CaseProgress) -> bool {
    progress.max_opened_envelope >= ENVELOPE_COUNT
}

/// Validates and freezes the final accusation. Rejections leave the record
/// untouched; there are no partial commits.
pub fn submit_decision(
    progress: &mut CaseProgress,
    draft: &DecisionDraft,
    now: DateTime<Utc>,
) -> Result<(), DecisionError> {
    if !can_decide(progress) {
        return Err(DecisionError::EnvelopesRemaining {
            frontier: progress.max_opened_envelope,
        });
    }
    if progress.decision.is_some() {
        return Err(DecisionError::AlreadySubmitted);
    }

    let culprit_raw = draft.culprit.trim();
    let mut missing = Vec::new();
    if culprit_raw.is_empty() {
        missing.push(DecisionField::Culprit);
    }
    if draft.method.trim().is_empty() {
        missing.push(DecisionField::Method);
    }
    if draft.motive.trim().is_empty() {
        missing.push(DecisionField::Motive);
    }
    if draft.reasoning.trim().is_empty() {
        missing.push(DecisionField::Reasoning);
    }
    if !missing.is_empty() {
        return Err(DecisionError::Incomplete { missing });
    }

    let culprit = if culprit_raw == OTHER_INDETERMINATE {
        Culprit::OtherIndeterminate
    } else if progress.suspects.iter().any(|file| file.name == culprit_raw) {
        Culprit::Named(culprit_raw.to_string())
    } else {
        return Err(DecisionError::UnknownCulprit {
            name: culprit_raw.to_string(),
        });
    };

    progress.decision = Some(Decision {
        culprit,
        method: draft.method.trim().to_string(),
        motive: draft.motive.trim().to_string(),
        reasoning: draft.reasoning.trim().to_string(),
        submitted_at: now,
    });
    Ok(())
}

pub fn can_view_closing(progress: &CaseProgress) -> bool {
    progress.decision.is_some()
}

/// Sole access path to the closing narrative. Nothing is revealed until the
/// decision is submitted.
pub fn closing_reveal<'a>(
    progress: &CaseProgress,
    case: &'a CaseDefinition,
) -> Option<&'a Closing> {
    if can_view_closing(progress) {
        Some(&case.closing)
    } else {
        None
    }
}
