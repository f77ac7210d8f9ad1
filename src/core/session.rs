use bevy_ecs::prelude::*;
use serde::Serialize;

use crate::content::case::{CaseDefinition, Closing};
use crate::core::ecs::{create_schedule, create_world};
use crate::session::library::CaseLibrary;
use crate::session::progress::{CaseProgress, Decision, Hypothesis, SuspectStatus, TimelineEvent};
use crate::session::registry::{SessionRegistry, ViewTarget};
use crate::systems::progression::{self, DecisionDraft, EnvelopeGate};

/// Entries shown by the notebook's most-recent-first read paths.
pub const RECENT_LIMIT: usize = 12;

/// User intents fed into the session each dispatch.
#[derive(Debug, Clone)]
pub enum CaseAction {
    StartCase,
    OpenEnvelope(u32),
    ConfirmReading(u32),
    SetNotes(String),
    AddHypothesis(String),
    AddTimelineEvent(String),
    SetSuspectStatus { name: String, status: SuspectStatus },
    SetSuspectNotes { name: String, notes: String },
    SubmitDecision(DecisionDraft),
    SwitchCase(String),
    SwitchView(ViewTarget),
    ResetCase,
    ResetAll,
}

/// Resource storing the intents for the next dispatch.
#[derive(Resource, Default, Debug)]
pub struct ActionQueue(pub Vec<CaseAction>);

/// Outcome lines produced while applying the latest dispatch.
#[derive(Resource, Default, Debug)]
pub struct SessionEventLog(pub Vec<String>);

/// Data snapshot returned to the renderer after each dispatch.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub active_view: ViewTarget,
    pub case: Option<CaseSnapshot>,
    pub events: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CaseSnapshot {
    pub slug: String,
    pub title: String,
    pub subtitle: String,
    pub started: bool,
    pub current_envelope: u32,
    pub max_opened_envelope: u32,
    pub progress_percent: u8,
    pub envelopes: Vec<EnvelopeStatus>,
    pub current: Option<EnvelopeView>,
    pub notes: String,
    pub recent_hypotheses: Vec<Hypothesis>,
    pub recent_timeline: Vec<TimelineEvent>,
    pub suspects: Vec<SuspectView>,
    pub can_decide: bool,
    pub decision: Option<Decision>,
    /// Present only once the decision is submitted. No snapshot of an
    /// undecided case carries closing text.
    pub closing: Option<Closing>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnvelopeStatus {
    pub id: u32,
    pub gate: EnvelopeGate,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnvelopeView {
    pub id: u32,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SuspectView {
    pub name: String,
    pub status: SuspectStatus,
    pub badge: &'static str,
    pub notes: String,
}

impl SessionSnapshot {
    fn capture(world: &World) -> Self {
        let registry = world.resource::<SessionRegistry>();
        let library = world.resource::<CaseLibrary>();
        let log = world.resource::<SessionEventLog>();

        let case = registry.active_case().and_then(|slug| {
            let case = library.find(slug)?;
            let progress = registry.progress(slug)?;
            Some(CaseSnapshot::capture(case, progress))
        });

        Self {
            active_view: registry.active_view(),
            case,
            events: log.0.clone(),
        }
    }
}

impl CaseSnapshot {
    fn capture(case: &CaseDefinition, progress: &CaseProgress) -> Self {
        let envelopes = case
            .envelopes
            .iter()
            .map(|envelope| EnvelopeStatus {
                id: envelope.id,
                gate: progression::envelope_gate(progress, envelope.id),
            })
            .collect();

        let current = progress
            .started()
            .then(|| case.envelope(progress.current_envelope()))
            .flatten()
            .map(|envelope| EnvelopeView {
                id: envelope.id,
                title: envelope.title.clone(),
                body: envelope.body.clone(),
            });

        let suspects = progress
            .suspects()
            .iter()
            .map(|file| SuspectView {
                name: file.name.clone(),
                status: file.status,
                badge: file.status.badge(),
                notes: file.notes.clone(),
            })
            .collect();

        Self {
            slug: case.slug.clone(),
            title: case.title.clone(),
            subtitle: case.subtitle.clone(),
            started: progress.started(),
            current_envelope: progress.current_envelope(),
            max_opened_envelope: progress.max_opened_envelope(),
            progress_percent: progress.progress_percent(),
            envelopes,
            current,
            notes: progress.notes().to_string(),
            recent_hypotheses: progress
                .hypotheses()
                .iter()
                .rev()
                .take(RECENT_LIMIT)
                .cloned()
                .collect(),
            recent_timeline: progress
                .timeline()
                .iter()
                .rev()
                .take(RECENT_LIMIT)
                .cloned()
                .collect(),
            suspects,
            can_decide: progression::can_decide(progress),
            decision: progress.decision().cloned(),
            closing: progression::closing_reveal(progress, case).cloned(),
        }
    }
}

/// Wrapper around the ECS world and schedule.
///
/// All mutation flows through [`Session::dispatch`], so a session has exactly
/// one writer even when the host processes requests from several frontends.
pub struct Session {
    world: World,
    schedule: Schedule,
}

impl Session {
    /// Build a session over the given library, activating its first case.
    pub fn new(library: CaseLibrary) -> Self {
        let mut world = create_world(library);
        let schedule = create_schedule();

        let first = world.resource::<CaseLibrary>().first().cloned();
        if let Some(case) = first {
            let mut registry = world.resource_mut::<SessionRegistry>();
            registry.switch_active_case(&case.slug);
            registry.get_or_create(&case);
        }

        Self { world, schedule }
    }

    /// Apply user actions and return a snapshot for rendering.
    pub fn dispatch(&mut self, actions: Vec<CaseAction>) -> SessionSnapshot {
        {
            let mut queue = self.world.resource_mut::<ActionQueue>();
            queue.0 = actions;
        }

        self.schedule.run(&mut self.world);
        SessionSnapshot::capture(&self.world)
    }

    /// Read-only snapshot of the current state.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::capture(&self.world)
    }

    pub fn library(&self) -> &CaseLibrary {
        self.world.resource::<CaseLibrary>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::case::{Closing, Envelope, ENVELOPE_COUNT};

    fn case(slug: &str) -> CaseDefinition {
        CaseDefinition {
            slug: slug.to_string(),
            title: format!("Case {}", slug),
            subtitle: "A test investigation".to_string(),
            suspects: vec!["Daniel Moreira".to_string(), "Laura Moreira".to_string()],
            envelopes: (1..=ENVELOPE_COUNT)
                .map(|id| Envelope {
                    id,
                    title: format!("Envelope {}", id),
                    body: format!("testimony {}", id),
                })
                .collect(),
            closing: Closing {
                title: "The truth".to_string(),
                body: "what actually happened".to_string(),
            },
        }
    }

    fn session() -> Session {
        Session::new(CaseLibrary::new(vec![case("aurora"), case("cliffside")]))
    }

    fn full_draft() -> DecisionDraft {
        DecisionDraft {
            culprit: "Daniel Moreira".to_string(),
            method: "blunt strike".to_string(),
            motive: "inheritance".to_string(),
            reasoning: "prints and the timeline gap".to_string(),
        }
    }

    #[test]
    fn the_first_case_is_active_from_the_start() {
        let session = session();
        let snapshot = session.snapshot();
        let case = snapshot.case.unwrap();
        assert_eq!(case.slug, "aurora");
        assert!(!case.started);
        assert!(case.closing.is_none());
    }

    #[test]
    fn dispatch_walkthrough_unlocks_decision_and_closing() {
        let mut session = session();

        let snapshot = session.dispatch(vec![CaseAction::StartCase]);
        let case = snapshot.case.unwrap();
        assert!(case.started);
        assert_eq!(case.max_opened_envelope, 1);

        // Locked navigation is rejected and leaves the position alone.
        let snapshot = session.dispatch(vec![CaseAction::OpenEnvelope(2)]);
        let case = snapshot.case.unwrap();
        assert_eq!(case.current_envelope, 1);
        assert!(snapshot.events[0].starts_with("Navigation rejected"));

        for id in 1..ENVELOPE_COUNT {
            session.dispatch(vec![
                CaseAction::ConfirmReading(id),
                CaseAction::OpenEnvelope(id + 1),
            ]);
        }
        let snapshot = session.snapshot();
        let case = snapshot.case.unwrap();
        assert_eq!(case.max_opened_envelope, ENVELOPE_COUNT);
        assert!(case.can_decide);
        assert!(case.closing.is_none());

        let snapshot = session.dispatch(vec![CaseAction::SubmitDecision(DecisionDraft {
            culprit: String::new(),
            ..full_draft()
        })]);
        let case = snapshot.case.unwrap();
        assert!(case.decision.is_none());
        assert!(snapshot.events[0].starts_with("Decision rejected"));

        let snapshot = session.dispatch(vec![CaseAction::SubmitDecision(full_draft())]);
        let case = snapshot.case.unwrap();
        assert!(case.decision.is_some());
        assert_eq!(
            case.closing.as_ref().map(|closing| closing.title.as_str()),
            Some("The truth")
        );
    }

    #[test]
    fn premature_decision_is_rejected_through_dispatch() {
        let mut session = session();
        session.dispatch(vec![CaseAction::StartCase]);

        let snapshot = session.dispatch(vec![CaseAction::SubmitDecision(full_draft())]);
        let case = snapshot.case.unwrap();
        assert!(case.decision.is_none());
        assert!(case.closing.is_none());
    }

    #[test]
    fn switching_cases_keeps_both_records() {
        let mut session = session();
        session.dispatch(vec![CaseAction::StartCase, CaseAction::ConfirmReading(1)]);

        let snapshot = session.dispatch(vec![CaseAction::SwitchCase("cliffside".to_string())]);
        let case = snapshot.case.unwrap();
        assert_eq!(case.slug, "cliffside");
        assert!(!case.started);

        let snapshot = session.dispatch(vec![CaseAction::SwitchCase("aurora".to_string())]);
        let case = snapshot.case.unwrap();
        assert_eq!(case.max_opened_envelope, 2);
    }

    #[test]
    fn unknown_case_switch_is_reported_not_fatal() {
        let mut session = session();
        let snapshot = session.dispatch(vec![CaseAction::SwitchCase("nowhere".to_string())]);
        assert_eq!(snapshot.case.unwrap().slug, "aurora");
        assert!(snapshot.events[0].starts_with("No case named"));
    }

    #[test]
    fn reset_case_is_local_reset_all_is_total() {
        let mut session = session();
        session.dispatch(vec![CaseAction::StartCase]);
        session.dispatch(vec![CaseAction::SwitchCase("cliffside".to_string())]);
        session.dispatch(vec![CaseAction::StartCase, CaseAction::ResetCase]);

        let snapshot = session.snapshot();
        assert!(!snapshot.case.unwrap().started);
        let snapshot = session.dispatch(vec![CaseAction::SwitchCase("aurora".to_string())]);
        assert!(snapshot.case.unwrap().started);

        let snapshot = session.dispatch(vec![CaseAction::ResetAll]);
        assert!(snapshot.case.is_none());
        assert_eq!(snapshot.active_view, ViewTarget::Cover);
    }

    #[test]
    fn notebook_actions_flow_through_dispatch() {
        let mut session = session();
        session.dispatch(vec![
            CaseAction::StartCase,
            CaseAction::AddHypothesis("the owner lied".to_string()),
            CaseAction::AddTimelineEvent("00h05 argument at reception".to_string()),
            CaseAction::SetNotes("war room".to_string()),
            CaseAction::SetSuspectStatus {
                name: "Laura Moreira".to_string(),
                status: SuspectStatus::Priority,
            },
        ]);

        let snapshot = session.snapshot();
        let case = snapshot.case.unwrap();
        assert_eq!(case.recent_hypotheses[0].text, "the owner lied");
        assert_eq!(case.recent_timeline[0].event, "00h05 argument at reception");
        assert_eq!(case.notes, "war room");
        let laura = case
            .suspects
            .iter()
            .find(|suspect| suspect.name == "Laura Moreira")
            .unwrap();
        assert_eq!(laura.status, SuspectStatus::Priority);
        assert_eq!(laura.badge, "🔴");
    }

    #[test]
    fn recent_views_are_most_recent_first_and_capped() {
        let mut session = session();
        let mut actions = vec![CaseAction::StartCase];
        for index in 0..(RECENT_LIMIT + 3) {
            actions.push(CaseAction::AddHypothesis(format!("hypothesis {}", index)));
        }
        let snapshot = session.dispatch(actions);
        let case = snapshot.case.unwrap();
        assert_eq!(case.recent_hypotheses.len(), RECENT_LIMIT);
        assert_eq!(
            case.recent_hypotheses[0].text,
            format!("hypothesis {}", RECENT_LIMIT + 2)
        );
    }

    #[test]
    fn snapshots_serialize_for_export() {
        let session = session();
        let raw = serde_json::to_string(&session.snapshot()).unwrap();
        assert!(raw.contains("aurora"));
    }
}
