use std::collections::HashMap;

use bevy_ecs::prelude::*;
use serde::Serialize;

use crate::content::case::CaseDefinition;
use crate::session::progress::CaseProgress;

/// Views the renderer routes between. Gating lives in the engine, not here;
/// selecting a view never reveals content on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ViewTarget {
    #[default]
    Cover,
    Envelopes,
    Notebook,
    Decision,
    Closing,
}

/// Maps case slug to its investigation record for the running session.
///
/// Each case's record is independent; switching the active case never touches
/// any record, so switching away and back resumes exactly where the user
/// left off.
#[derive(Resource, Debug, Default)]
pub struct SessionRegistry {
    states: HashMap<String, CaseProgress>,
    active_case: Option<String>,
    active_view: ViewTarget,
}

impl SessionRegistry {
    /// Returns the record for the case, creating a fresh one on first access.
    pub fn get_or_create(&mut self, case: &CaseDefinition) -> &mut CaseProgress {
        self.states
            .entry(case.slug.clone())
            .or_insert_with(|| CaseProgress::for_case(case))
    }

    pub fn progress(&self, slug: &str) -> Option<&CaseProgress> {
        self.states.get(slug)
    }

    pub fn progress_mut(&mut self, slug: &str) -> Option<&mut CaseProgress> {
        self.states.get_mut(slug)
    }

    /// Replaces one case's record with a fresh default. Other cases keep
    /// their state.
    pub fn reset_case(&mut self, case: &CaseDefinition) {
        self.states
            .insert(case.slug.clone(), CaseProgress::for_case(case));
    }

    /// Clears every record and the session-level selection.
    pub fn reset_all(&mut self) {
        self.states.clear();
        self.active_case = None;
        self.active_view = ViewTarget::Cover;
    }

    pub fn switch_active_case(&mut self, slug: &str) {
        self.active_case = Some(slug.to_string());
    }

    pub fn active_case(&self) -> Option<&str> {
        self.active_case.as_deref()
    }

    pub fn switch_view(&mut self, view: ViewTarget) {
        self.active_view = view;
    }

    pub fn active_view(&self) -> ViewTarget {
        self.active_view
    }

    pub fn tracked_cases(&self) -> usize {
        self.states.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::case::{Closing, Envelope, ENVELOPE_COUNT};
    use crate::session::progress::SuspectStatus;
    use crate::systems::notebook::set_suspect_status;
    use crate::systems::progression::{confirm_reading, start_case};

    fn case(slug: &str) -> CaseDefinition {
        CaseDefinition {
            slug: slug.to_string(),
            title: format!("Case {}", slug),
            subtitle: String::new(),
            suspects: vec!["A".to_string(), "B".to_string()],
            envelopes: (1..=ENVELOPE_COUNT)
                .map(|id| Envelope {
                    id,
                    title: format!("Envelope {}", id),
                    body: "testimony".to_string(),
                })
                .collect(),
            closing: Closing {
                title: "Closing".to_string(),
                body: "reveal".to_string(),
            },
        }
    }

    #[test]
    fn get_or_create_is_idempotent() {
        let mut registry = SessionRegistry::default();
        let first = case("first");
        start_case(registry.get_or_create(&first));
        confirm_reading(registry.get_or_create(&first), 1);

        // A second access must return the same record, not a fresh one.
        assert_eq!(registry.get_or_create(&first).max_opened_envelope(), 2);
        assert_eq!(registry.tracked_cases(), 1);
    }

    #[test]
    fn mutating_one_case_leaves_others_untouched() {
        let mut registry = SessionRegistry::default();
        let a = case("a");
        let b = case("b");
        registry.get_or_create(&a);
        registry.get_or_create(&b);

        let progress_a = registry.get_or_create(&a);
        start_case(progress_a);
        confirm_reading(progress_a, 1);
        set_suspect_status(progress_a, "A", SuspectStatus::Priority).unwrap();

        let progress_b = registry.progress("b").unwrap();
        assert!(!progress_b.started());
        assert_eq!(progress_b.max_opened_envelope(), 0);
        assert_eq!(progress_b.suspect("A").unwrap().status, SuspectStatus::Neutral);
    }

    #[test]
    fn reset_case_replaces_only_that_record() {
        let mut registry = SessionRegistry::default();
        let a = case("a");
        let b = case("b");
        start_case(registry.get_or_create(&a));
        start_case(registry.get_or_create(&b));

        registry.reset_case(&a);
        assert!(!registry.progress("a").unwrap().started());
        assert!(registry.progress("b").unwrap().started());
    }

    #[test]
    fn reset_all_clears_records_and_selection() {
        let mut registry = SessionRegistry::default();
        let a = case("a");
        start_case(registry.get_or_create(&a));
        registry.switch_active_case("a");
        registry.switch_view(ViewTarget::Decision);

        registry.reset_all();
        assert_eq!(registry.tracked_cases(), 0);
        assert!(registry.active_case().is_none());
        assert_eq!(registry.active_view(), ViewTarget::Cover);
    }

    #[test]
    fn switching_cases_preserves_progress() {
        let mut registry = SessionRegistry::default();
        let a = case("a");
        let b = case("b");
        let progress_a = registry.get_or_create(&a);
        start_case(progress_a);
        confirm_reading(progress_a, 1);

        registry.switch_active_case("b");
        registry.get_or_create(&b);
        registry.switch_active_case("a");
        assert_eq!(registry.progress("a").unwrap().max_opened_envelope(), 2);
    }
}
