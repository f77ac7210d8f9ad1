use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Number of evidence envelopes every playable case carries.
pub const ENVELOPE_COUNT: u32 = 6;

/// Roster used when a case document declares no suspects of its own.
pub const DEFAULT_SUSPECTS: [&str; 3] = [
    "Daniel Moreira",
    "Laura Moreira",
    "Proprietário (Sr. Álvaro)",
];

/// Culprit sentinel accepted alongside the roster in a final decision.
pub const OTHER_INDETERMINATE: &str = "Other/Indeterminate";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseDefinition {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub suspects: Vec<String>,
    pub envelopes: Vec<Envelope>,
    pub closing: Closing,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub id: u32,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Closing {
    pub title: String,
    pub body: String,
}

#[derive(Debug)]
pub enum ContentError {
    Io { path: String, source: std::io::Error },
    Json { path: String, source: serde_json::Error },
    Validation(String),
    CaseNotFound(String),
    EmptyCatalog(String),
}

impl std::fmt::Display for ContentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentError::Io { path, source } => {
                write!(f, "failed to read {}: {}", path, source)
            }
            ContentError::Json { path, source } => {
                write!(f, "failed to parse {}: {}", path, source)
            }
            ContentError::Validation(message) => write!(f, "{}", message),
            ContentError::CaseNotFound(slug) => write!(f, "no case matching slug {}", slug),
            ContentError::EmptyCatalog(root) => {
                write!(f, "no playable case documents under {}", root)
            }
        }
    }
}

impl std::error::Error for ContentError {}

pub fn load_case_file(path: impl AsRef<Path>) -> Result<CaseDefinition, ContentError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| ContentError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let case: CaseDefinition =
        serde_json::from_str(&raw).map_err(|source| ContentError::Json {
            path: path.display().to_string(),
            source,
        })?;
    case.validate()?;
    Ok(case)
}

impl CaseDefinition {
    pub fn validate(&self) -> Result<(), ContentError> {
        if self.slug.trim().is_empty() {
            return Err(ContentError::Validation(
                "case slug cannot be empty".to_string(),
            ));
        }
        if self.title.trim().is_empty() {
            return Err(ContentError::Validation(format!(
                "case {} missing title",
                self.slug
            )));
        }
        if self.envelopes.len() as u32 != ENVELOPE_COUNT {
            return Err(ContentError::Validation(format!(
                "case {} must carry exactly {} envelopes, found {}",
                self.slug,
                ENVELOPE_COUNT,
                self.envelopes.len()
            )));
        }
        for (position, envelope) in self.envelopes.iter().enumerate() {
            let expected = position as u32 + 1;
            if envelope.id != expected {
                return Err(ContentError::Validation(format!(
                    "case {} envelope ids must run 1..{} without gaps, found {} at position {}",
                    self.slug, ENVELOPE_COUNT, envelope.id, expected
                )));
            }
            if envelope.title.trim().is_empty() || envelope.body.trim().is_empty() {
                return Err(ContentError::Validation(format!(
                    "case {} envelope {} missing title or body",
                    self.slug, envelope.id
                )));
            }
        }
        let mut names = HashSet::new();
        for name in &self.suspects {
            if name.trim().is_empty() {
                return Err(ContentError::Validation(format!(
                    "case {} has a blank suspect name",
                    self.slug
                )));
            }
            if !names.insert(name.as_str()) {
                return Err(ContentError::Validation(format!(
                    "case {} duplicate suspect {}",
                    self.slug, name
                )));
            }
        }
        if self.closing.title.trim().is_empty() || self.closing.body.trim().is_empty() {
            return Err(ContentError::Validation(format!(
                "case {} missing closing narrative",
                self.slug
            )));
        }
        Ok(())
    }

    pub fn envelope(&self, id: u32) -> Option<&Envelope> {
        self.envelopes.iter().find(|envelope| envelope.id == id)
    }

    /// Suspect names as declared, or the default roster for a case without one.
    pub fn suspect_roster(&self) -> Vec<String> {
        if self.suspects.is_empty() {
            DEFAULT_SUSPECTS.iter().map(|name| name.to_string()).collect()
        } else {
            self.suspects.clone()
        }
    }
}
