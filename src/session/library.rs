use bevy_ecs::prelude::*;

use crate::content::case::CaseDefinition;

/// Loaded case definitions for the running session, in catalog order.
#[derive(Resource, Debug, Default, Clone)]
pub struct CaseLibrary {
    pub cases: Vec<CaseDefinition>,
}

impl CaseLibrary {
    pub fn new(cases: Vec<CaseDefinition>) -> Self {
        Self { cases }
    }

    pub fn find(&self, slug: &str) -> Option<&CaseDefinition> {
        self.cases.iter().find(|case| case.slug == slug)
    }

    pub fn first(&self) -> Option<&CaseDefinition> {
        self.cases.first()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }
}
