use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::escalation::keyword_severity;
use crate::models::{DiagnosisRecord, DiagnosisSource, Language};
use crate::normalize::{normalize, KeywordMatcher};

use super::generic::generic_record;
use super::{SymptomDatabase, SymptomEntry, SymptomError};

/// A database entry with its keywords normalized and compiled once at load.
///
/// `matchers` has one element per source keyword, in the same order.
#[derive(Debug, Clone)]
pub struct NormalizedSymptomEntry {
    pub source: SymptomEntry,
    pub matchers: Vec<KeywordMatcher>,
}

impl NormalizedSymptomEntry {
    pub fn new(source: SymptomEntry) -> Self {
        let matchers = source.keywords.iter().map(|k| KeywordMatcher::new(k)).collect();
        Self { source, matchers }
    }

    /// First keyword (in declaration order) found in `normalized_text`.
    pub fn first_match(&self, normalized_text: &str) -> Option<&KeywordMatcher> {
        self.matchers.iter().find(|m| m.matches(normalized_text))
    }
}

/// Keyword diagnosis over a loaded symptom database.
///
/// Pure after construction: `diagnose` reads the index and allocates only
/// the returned record. A degraded engine (no database) answers every query
/// with the generic record.
#[derive(Debug, Clone, Default)]
pub struct SymptomEngine {
    index: BTreeMap<Language, Vec<NormalizedSymptomEntry>>,
}

impl SymptomEngine {
    pub fn new(db: SymptomDatabase) -> Self {
        let mut index = BTreeMap::new();
        for language in Language::ALL {
            if let Some(entries) = db.bucket(language) {
                let normalized = entries.iter().cloned().map(NormalizedSymptomEntry::new).collect();
                index.insert(language, normalized);
            }
        }
        Self { index }
    }

    /// Engine with no database. Every query gets the generic record.
    pub fn degraded() -> Self {
        Self::default()
    }

    /// Build from a load attempt, falling back to degraded mode on failure.
    pub fn from_load_result(result: Result<SymptomDatabase, SymptomError>) -> Self {
        match result {
            Ok(db) => Self::new(db),
            Err(e) => {
                warn!(error = %e, "Symptom database unavailable, running in degraded mode");
                Self::degraded()
            }
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.index.is_empty()
    }

    /// Diagnose free text in a free-form language code (`"hi-IN"`, `"kn"`, ...).
    pub fn diagnose(&self, raw_text: &str, requested_language: &str) -> DiagnosisRecord {
        self.diagnose_in(raw_text, Language::from_code(requested_language))
    }

    /// Scan the language's bucket, then English, then fall back to the
    /// generic record. First entry with any matching keyword wins.
    pub fn diagnose_in(&self, raw_text: &str, language: Language) -> DiagnosisRecord {
        let text = normalize(raw_text);

        let found = self
            .scan(language, &text)
            .or_else(|| match language {
                Language::En => None,
                _ => self.scan(Language::En, &text),
            });

        match found {
            Some((bucket, entry, matcher)) => {
                debug!(
                    requested = %language,
                    bucket = %bucket,
                    keyword = matcher.keyword(),
                    issue = %entry.source.issue,
                    "Symptom matched"
                );
                matched_record(bucket, entry, matcher)
            }
            None => {
                debug!(language = %language, degraded = self.is_degraded(), "No symptom match");
                generic_record(language)
            }
        }
    }

    /// A language without a bucket scans English in its place.
    fn scan<'a>(
        &'a self,
        language: Language,
        text: &str,
    ) -> Option<(Language, &'a NormalizedSymptomEntry, &'a KeywordMatcher)> {
        let (bucket, entries) = match self.index.get(&language) {
            Some(entries) => (language, entries),
            None => (Language::En, self.index.get(&Language::En)?),
        };
        entries
            .iter()
            .find_map(|entry| entry.first_match(text).map(|m| (bucket, entry, m)))
    }
}

fn matched_record(
    bucket: Language,
    entry: &NormalizedSymptomEntry,
    matcher: &KeywordMatcher,
) -> DiagnosisRecord {
    let source = &entry.source;
    DiagnosisRecord {
        issue: source.issue.clone(),
        guidance: source.guidance.clone(),
        department: source.department.clone(),
        confidence: None,
        severity: keyword_severity(&source.issue, &source.guidance),
        remedies: None,
        is_generic: false,
        source: DiagnosisSource::Symptom {
            language: bucket,
            matched_keyword: Some(matcher.keyword().to_string()),
        },
    }
}
