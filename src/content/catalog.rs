use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use bevy_utils::tracing::warn;

use crate::content::case::{load_case_file, CaseDefinition, ContentError};

/// Directory scanned for case documents when none is given on the command line.
pub const DEFAULT_CONTENT_DIR: &str = "./content";

#[derive(Debug, Clone)]
pub struct CaseSummary {
    pub slug: String,
    pub title: String,
    pub path: PathBuf,
}

/// Scans a directory of `*.json` case documents.
///
/// Malformed documents are skipped with a warning; they never abort the scan.
#[derive(Debug, Clone)]
pub struct CaseCatalog {
    root: PathBuf,
}

impl CaseCatalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Every parseable case in the catalog, sorted by file name.
    pub fn list_cases(&self) -> Result<Vec<CaseSummary>, ContentError> {
        let cases = self.scan()?;
        if cases.is_empty() {
            return Err(ContentError::EmptyCatalog(self.root.display().to_string()));
        }
        Ok(cases
            .into_iter()
            .map(|(path, case)| CaseSummary {
                slug: case.slug,
                title: case.title,
                path,
            })
            .collect())
    }

    /// Full definitions for every playable case, in catalog order.
    pub fn load_all(&self) -> Result<Vec<CaseDefinition>, ContentError> {
        let cases = self.scan()?;
        if cases.is_empty() {
            return Err(ContentError::EmptyCatalog(self.root.display().to_string()));
        }
        Ok(cases.into_iter().map(|(_, case)| case).collect())
    }

    pub fn load_case(&self, slug: &str) -> Result<CaseDefinition, ContentError> {
        self.scan()?
            .into_iter()
            .map(|(_, case)| case)
            .find(|case| case.slug == slug)
            .ok_or_else(|| ContentError::CaseNotFound(slug.to_string()))
    }

    fn scan(&self) -> Result<Vec<(PathBuf, CaseDefinition)>, ContentError> {
        let entries = fs::read_dir(&self.root).map_err(|source| ContentError::Io {
            path: self.root.display().to_string(),
            source,
        })?;

        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().map(|ext| ext == "json").unwrap_or(false))
            .collect();
        files.sort();

        let mut seen = HashSet::new();
        let mut cases = Vec::new();
        for path in files {
            match load_case_file(&path) {
                Ok(case) => {
                    if !seen.insert(case.slug.clone()) {
                        warn!(
                            "skipping case document {}: duplicate slug {}",
                            path.display(),
                            case.slug
                        );
                        continue;
                    }
                    cases.push((path, case));
                }
                Err(err) => warn!("skipping case document {}: {}", path.display(), err),
            }
        }
        Ok(cases)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::case::{Closing, Envelope, ENVELOPE_COUNT};

    fn write_case(dir: &Path, file: &str, slug: &str) {
        let case = CaseDefinition {
            slug: slug.to_string(),
            title: format!("Case {}", slug),
            subtitle: String::new(),
            suspects: Vec::new(),
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
        };
        let raw = serde_json::to_string_pretty(&case).unwrap();
        fs::write(dir.join(file), raw).unwrap();
    }

    #[test]
    fn listing_skips_malformed_documents_and_sorts_by_file_name() {
        let dir = tempfile::tempdir().unwrap();
        write_case(dir.path(), "b-case.json", "second");
        write_case(dir.path(), "a-case.json", "first");
        fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let catalog = CaseCatalog::new(dir.path());
        let summaries = catalog.list_cases().unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].slug, "first");
        assert_eq!(summaries[1].slug, "second");
    }

    #[test]
    fn duplicate_slugs_keep_the_first_document() {
        let dir = tempfile::tempdir().unwrap();
        write_case(dir.path(), "a.json", "same");
        write_case(dir.path(), "b.json", "same");

        let catalog = CaseCatalog::new(dir.path());
        let summaries = catalog.list_cases().unwrap();
        assert_eq!(summaries.len(), 1);
        assert!(summaries[0].path.ends_with("a.json"));
    }

    #[test]
    fn empty_catalog_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("broken.json"), "[]").unwrap();

        let catalog = CaseCatalog::new(dir.path());
        let err = catalog.list_cases().unwrap_err();
        assert!(matches!(err, ContentError::EmptyCatalog(_)));
    }

    #[test]
    fn load_case_resolves_by_slug() {
        let dir = tempfile::tempdir().unwrap();
        write_case(dir.path(), "a.json", "aurora");

        let catalog = CaseCatalog::new(dir.path());
        assert_eq!(catalog.load_case("aurora").unwrap().slug, "aurora");
        let err = catalog.load_case("missing").unwrap_err();
        assert!(matches!(err, ContentError::CaseNotFound(_)));
    }
}
