use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::models::Language;

use super::SymptomError;

/// Department used when an entry does not name one.
pub const DEFAULT_DEPARTMENT: &str = "General Medicine";

fn default_department() -> String {
    DEFAULT_DEPARTMENT.to_string()
}

/// One condition in a language bucket. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomEntry {
    /// Matched in order; the first entry with any matching keyword wins.
    #[serde(default)]
    pub keywords: Vec<String>,
    pub issue: String,
    pub guidance: String,
    #[serde(default = "default_department")]
    pub department: String,
}

/// Ordered symptom entries per language.
///
/// Every bucket present is non-empty. A database with no buckets at all is
/// never constructed; loading reports [`SymptomError::EmptyDatabase`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymptomDatabase {
    buckets: BTreeMap<Language, Vec<SymptomEntry>>,
}

impl SymptomDatabase {
    /// Build from language buckets, dropping empty ones.
    pub fn from_buckets(
        buckets: impl IntoIterator<Item = (Language, Vec<SymptomEntry>)>,
    ) -> Result<Self, SymptomError> {
        let mut kept = BTreeMap::new();
        for (language, entries) in buckets {
            if entries.is_empty() {
                warn!(language = %language, "Skipping empty symptom bucket");
                continue;
            }
            kept.insert(language, entries);
        }
        if kept.is_empty() {
            return Err(SymptomError::EmptyDatabase);
        }
        Ok(Self { buckets: kept })
    }

    /// Parse `{"en": [...], "hi": [...], "kn": [...]}`.
    ///
    /// Unknown language keys are skipped with a warning rather than failing
    /// the whole load.
    pub fn from_json_str(json: &str) -> Result<Self, SymptomError> {
        let raw: BTreeMap<String, Vec<SymptomEntry>> = serde_json::from_str(json)?;
        let buckets = raw.into_iter().filter_map(|(key, entries)| {
            match Language::from_str(&key) {
                Ok(language) => Some((language, entries)),
                Err(_) => {
                    warn!(key = %key, entries = entries.len(), "Skipping unknown language bucket");
                    None
                }
            }
        });
        Self::from_buckets(buckets)
    }

    pub fn bucket(&self, language: Language) -> Option<&[SymptomEntry]> {
        self.buckets.get(&language).map(Vec::as_slice)
    }

    pub fn languages(&self) -> impl Iterator<Item = Language> + '_ {
        self.buckets.keys().copied()
    }

    pub fn entry_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }
}

/// Read and parse a symptom database file on the current thread.
pub fn load_symptom_database_blocking(path: &Path) -> Result<SymptomDatabase, SymptomError> {
    let json = std::fs::read_to_string(path).map_err(|e| map_read_error(path, e))?;
    let db = SymptomDatabase::from_json_str(&json)?;
    log_loaded(path, &db);
    Ok(db)
}

/// Read and parse a symptom database file without blocking the runtime.
pub async fn load_symptom_database(path: &Path) -> Result<SymptomDatabase, SymptomError> {
    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| map_read_error(path, e))?;
    let db = SymptomDatabase::from_json_str(&json)?;
    log_loaded(path, &db);
    Ok(db)
}

fn map_read_error(path: &Path, e: std::io::Error) -> SymptomError {
    if e.kind() == std::io::ErrorKind::NotFound {
        SymptomError::NotFound(path.to_path_buf())
    } else {
        SymptomError::Io(e)
    }
}

fn log_loaded(path: &Path, db: &SymptomDatabase) {
    info!(
        path = %path.display(),
        languages = db.buckets.len(),
        entries = db.entry_count(),
        "Symptom database loaded"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "en": [
            {"keywords": ["fever", "temperature"], "issue": "Fever", "guidance": "Rest", "department": "General Medicine"},
            {"keywords": ["rash"], "issue": "Rash", "guidance": "Keep dry"}
        ],
        "hi": [
            {"keywords": ["बुखार"], "issue": "बुखार", "guidance": "आराम करें", "department": "General Medicine"}
        ]
    }"#;

    #[test]
    fn parses_buckets_in_order() {
        let db = SymptomDatabase::from_json_str(SAMPLE).unwrap();
        assert_eq!(db.languages().collect::<Vec<_>>(), vec![Language::En, Language::Hi]);
        assert_eq!(db.entry_count(), 3);

        let en = db.bucket(Language::En).unwrap();
        assert_eq!(en[0].issue, "Fever");
        assert_eq!(en[0].keywords, vec!["fever", "temperature"]);
        assert_eq!(en[1].issue, "Rash");
        assert!(db.bucket(Language::Kn).is_none());
    }

    #[test]
    fn missing_department_defaults() {
        let db = SymptomDatabase::from_json_str(SAMPLE).unwrap();
        assert_eq!(db.bucket(Language::En).unwrap()[1].department, DEFAULT_DEPARTMENT);
    }

    #[test]
    fn missing_keywords_default_to_empty() {
        let db = SymptomDatabase::from_json_str(
            r#"{"en": [{"issue": "Cold", "guidance": "Warm fluids"}]}"#,
        )
        .unwrap();
        assert!(db.bucket(Language::En).unwrap()[0].keywords.is_empty());
    }

    #[test]
    fn unknown_and_empty_buckets_skipped() {
        let db = SymptomDatabase::from_json_str(
            r#"{"fr": [{"issue": "Fièvre", "guidance": "Repos"}], "kn": [], "en": [{"issue": "Cold", "guidance": "Rest"}]}"#,
        )
        .unwrap();
        assert_eq!(db.languages().collect::<Vec<_>>(), vec![Language::En]);
    }

    #[test]
    fn empty_database_is_error() {
        let err = SymptomDatabase::from_json_str(r#"{"en": []}"#).unwrap_err();
        assert!(matches!(err, SymptomError::EmptyDatabase));
        let err = SymptomDatabase::from_json_str("{}").unwrap_err();
        assert!(matches!(err, SymptomError::EmptyDatabase));
    }

    #[test]
    fn malformed_json_is_error() {
        let err = SymptomDatabase::from_json_str(r#"{"en": [{"issue": 3}]}"#).unwrap_err();
        assert!(matches!(err, SymptomError::Json(_)));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let db = load_symptom_database_blocking(file.path()).unwrap();
        assert_eq!(db.entry_count(), 3);
    }

    #[tokio::test]
    async fn async_load_matches_blocking() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let db = load_symptom_database(file.path()).await.unwrap();
        assert_eq!(db, load_symptom_database_blocking(file.path()).unwrap());
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_symptom_database(&dir.path().join("symptoms.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, SymptomError::NotFound(_)));
    }

    #[test]
    fn bundled_database_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/symptoms.json");
        let db = load_symptom_database_blocking(&path).unwrap();
        for language in Language::ALL {
            assert!(db.bucket(language).is_some(), "missing bucket {language}");
        }
    }
}
