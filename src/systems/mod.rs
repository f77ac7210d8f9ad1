pub mod notebook;
pub mod progression;

use bevy_ecs::prelude::*;
use chrono::{DateTime, Utc};

use crate::core::session::{ActionQueue, CaseAction, SessionEventLog};
use crate::session::library::CaseLibrary;
use crate::session::registry::SessionRegistry;
use crate::systems::progression::ConfirmOutcome;

/// System: applies queued user actions to the active case, one at a time.
pub fn case_action_system(
    actions: Res<ActionQueue>,
    library: Res<CaseLibrary>,
    mut registry: ResMut<SessionRegistry>,
    mut log: ResMut<SessionEventLog>,
) {
    log.0.clear();
    let now = Utc::now();
    for action in actions.0.iter() {
        apply_action(action, &library, &mut registry, &mut log, now);
    }
}

fn apply_action(
    action: &CaseAction,
    library: &CaseLibrary,
    registry: &mut SessionRegistry,
    log: &mut SessionEventLog,
    now: DateTime<Utc>,
) {
    // Session-level actions do not need an active case.
    match action {
        CaseAction::SwitchCase(slug) => {
            match library.find(slug) {
                Some(case) => {
                    registry.switch_active_case(&case.slug);
                    registry.get_or_create(case);
                    log.0.push(format!("Active case is now {}.", case.slug));
                }
                None => log.0.push(format!("No case named {} in the library.", slug)),
            }
            return;
        }
        CaseAction::SwitchView(view) => {
            registry.switch_view(*view);
            log.0.push(format!("View: {:?}.", view));
            return;
        }
        CaseAction::ResetAll => {
            registry.reset_all();
            log.0.push("All investigation state cleared.".to_string());
            return;
        }
        _ => {}
    }

    let Some(slug) = registry.active_case().map(|slug| slug.to_string()) else {
        log.0.push("No active case selected.".to_string());
        return;
    };
    let Some(case) = library.find(&slug) else {
        log.0.push(format!("Active case {} is missing from the library.", slug));
        return;
    };

    if matches!(action, CaseAction::ResetCase) {
        registry.reset_case(case);
        log.0.push(format!("Case {} reset to a fresh state.", case.slug));
        return;
    }

    let progress = registry.get_or_create(case);
    match action {
        CaseAction::StartCase => {
            if progression::start_case(progress) {
                log.0.push("Case started. Envelope 1 unlocked.".to_string());
            } else {
                log.0.push("Case already in progress.".to_string());
            }
        }
        CaseAction::OpenEnvelope(id) => match progression::navigate(progress, *id) {
            Ok(()) => log.0.push(format!("Now reading envelope {}.", id)),
            Err(err) => log.0.push(format!("Navigation rejected: {}.", err)),
        },
        CaseAction::ConfirmReading(id) => match progression::confirm_reading(progress, *id) {
            ConfirmOutcome::Unlocked { next } => {
                log.0.push(format!("Reading confirmed. Envelope {} unlocked.", next));
            }
            ConfirmOutcome::NoChange => {
                log.0.push("Reading confirmed. Nothing new unlocked.".to_string());
            }
        },
        CaseAction::SetNotes(text) => {
            notebook::set_notes(progress, text.clone());
            log.0.push("Notes updated.".to_string());
        }
        CaseAction::AddHypothesis(text) => {
            if notebook::append_hypothesis(progress, text, now) {
                log.0.push("Hypothesis recorded.".to_string());
            } else {
                log.0.push("Empty hypothesis ignored.".to_string());
            }
        }
        CaseAction::AddTimelineEvent(text) => {
            if notebook::append_timeline_event(progress, text, now) {
                log.0.push("Timeline event added.".to_string());
            } else {
                log.0.push("Empty timeline event ignored.".to_string());
            }
        }
        CaseAction::SetSuspectStatus { name, status } => {
            match notebook::set_suspect_status(progress, name, *status) {
                Ok(()) => log.0.push(format!("{} marked {}.", name, status)),
                Err(err) => log.0.push(format!("Suspect update rejected: {}.", err)),
            }
        }
        CaseAction::SetSuspectNotes { name, notes } => {
            match notebook::set_suspect_notes(progress, name, notes) {
                Ok(()) => log.0.push(format!("Notes on {} updated.", name)),
                Err(err) => log.0.push(format!("Suspect update rejected: {}.", err)),
            }
        }
        CaseAction::SubmitDecision(draft) => {
            match progression::submit_decision(progress, draft, now) {
                Ok(()) => log.0.push("Decision recorded. The closing is unlocked.".to_string()),
                Err(err) => log.0.push(format!("Decision rejected: {}.", err)),
            }
        }
        CaseAction::SwitchCase(_)
        | CaseAction::SwitchView(_)
        | CaseAction::ResetCase
        | CaseAction::ResetAll => {}
    }
}
