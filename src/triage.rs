//! Shared triage state and request routing.
//!
//! `TriageState` is created at startup in degraded mode and shared behind an
//! `Arc`. The symptom database loads in the background and is swapped in
//! when ready; queries arriving before that get the generic record instead
//! of waiting.

use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;
use tracing::{info, warn};

use crate::config::ClassifierConfig;
use crate::escalation::{plan_handoff, Handoff};
use crate::models::{DiagnosisRecord, ImageCondition, Language};
use crate::symptoms::{load_symptom_database, SymptomDatabase, SymptomEngine, SymptomError};
use crate::vision::{record_for, ImageClassifier};

// ═══════════════════════════════════════════════════════════
// TriageState
// ═══════════════════════════════════════════════════════════

pub struct TriageState {
    /// Replaced wholesale on load; readers clone the `Arc` and drop the lock.
    engine: RwLock<Arc<SymptomEngine>>,
    classifier: ImageClassifier,
}

impl TriageState {
    /// Degraded state: no database yet.
    pub fn new(config: ClassifierConfig) -> Self {
        Self::with_engine(SymptomEngine::degraded(), config)
    }

    pub fn with_engine(engine: SymptomEngine, config: ClassifierConfig) -> Self {
        Self {
            engine: RwLock::new(Arc::new(engine)),
            classifier: ImageClassifier::new(config),
        }
    }

    /// Snapshot of the current engine.
    ///
    /// A poisoned lock still holds a complete engine (writers only swap an
    /// `Arc`), so poisoning is ignored.
    pub fn engine(&self) -> Arc<SymptomEngine> {
        self.engine
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn install_engine(&self, engine: SymptomEngine) {
        let mut guard = self.engine.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(engine);
    }

    /// Install the outcome of a load attempt. Returns whether a database is
    /// now active. A failed load leaves the current engine in place.
    pub fn install_database(&self, result: Result<SymptomDatabase, SymptomError>) -> bool {
        match result {
            Ok(db) => {
                self.install_engine(SymptomEngine::new(db));
                true
            }
            Err(e) => {
                warn!(error = %e, "Symptom database load failed, keeping current engine");
                self.is_ready()
            }
        }
    }

    /// Load the database from `path` and install it.
    pub async fn load_database(&self, path: &Path) -> bool {
        let ready = self.install_database(load_symptom_database(path).await);
        info!(path = %path.display(), ready, "Symptom engine refreshed");
        ready
    }

    /// True once a database has been installed.
    pub fn is_ready(&self) -> bool {
        !self.engine().is_degraded()
    }

    pub fn classifier(&self) -> &ImageClassifier {
        &self.classifier
    }
}

impl Default for TriageState {
    fn default() -> Self {
        Self::new(ClassifierConfig::default())
    }
}

// ═══════════════════════════════════════════════════════════
// Requests
// ═══════════════════════════════════════════════════════════

/// One user query: typed/spoken text or a photo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriageRequest {
    Text { text: String, language: Language },
    Image { bytes: Vec<u8>, language: Language },
}

impl TriageRequest {
    /// Build a request from whatever the user supplied.
    ///
    /// A pending photo wins over typed text. Blank text with no photo is no
    /// request at all.
    pub fn from_parts(text: Option<&str>, language_code: &str, image: Option<Vec<u8>>) -> Option<Self> {
        let language = Language::from_code(language_code);
        if let Some(bytes) = image {
            return Some(Self::Image { bytes, language });
        }
        let text = text.map(str::trim).filter(|t| !t.is_empty())?;
        Some(Self::Text {
            text: text.to_string(),
            language,
        })
    }

    /// UI language of the request; drives speech and generic messages.
    pub fn language(&self) -> Language {
        match self {
            Self::Text { language, .. } | Self::Image { language, .. } => *language,
        }
    }
}

/// Diagnosis plus what the host should do with it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriageOutcome {
    pub record: DiagnosisRecord,
    pub handoff: Handoff,
}

// ═══════════════════════════════════════════════════════════
// TriageService
// ═══════════════════════════════════════════════════════════

/// Routes requests to the symptom engine or the image classifier.
#[derive(Clone, Default)]
pub struct TriageService {
    state: Arc<TriageState>,
}

impl TriageService {
    pub fn new(state: Arc<TriageState>) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &Arc<TriageState> {
        &self.state
    }

    /// Diagnose a request. Never fails.
    ///
    /// Text is matched inline. Images are decoded and classified on the
    /// blocking pool.
    pub async fn assess(&self, request: TriageRequest) -> DiagnosisRecord {
        match request {
            TriageRequest::Text { text, language } => self.state.engine().diagnose_in(&text, language),
            TriageRequest::Image { bytes, .. } => {
                let classifier = *self.state.classifier();
                match tokio::task::spawn_blocking(move || classifier.classify_bytes(&bytes)).await {
                    Ok(record) => record,
                    Err(e) => {
                        warn!(error = %e, "Image classification task failed");
                        record_for(ImageCondition::Unanalyzable)
                    }
                }
            }
        }
    }

    /// Diagnose and plan the hand-off in one step.
    pub async fn assess_and_plan(&self, request: TriageRequest, online: bool) -> TriageOutcome {
        let language = request.language();
        let record = self.assess(request).await;
        let handoff = plan_handoff(&record, language, online);
        TriageOutcome { record, handoff }
    }
}
