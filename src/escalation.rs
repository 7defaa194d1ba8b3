//! Emergency detection and the hand-off to speech and hospital lookup.
//!
//! The core never speaks or fetches. It decides what should be announced,
//! in which locale, and whether a hospital lookup is warranted; the host
//! carries that out.

use std::sync::LazyLock;

use serde::Serialize;
use tracing::warn;

use crate::models::{DiagnosisRecord, Language, Severity};
use crate::normalize::normalize;

/// Phrases that mark a matched symptom as an emergency, in every supported
/// script. Matched by plain containment after normalization.
pub const EMERGENCY_PHRASES: &[&str] = &[
    "chest pain",
    "breathlessness",
    "difficulty breathing",
    "severe",
    "unconscious",
    "heavy bleeding",
    "सीने में दर्द",
    "सांस लेने में तकलीफ",
    "ಸೀನ್",
    "ಉಸಿರಾಟದ ತೊಂದರೆ",
];

static NORMALIZED_EMERGENCY_PHRASES: LazyLock<Vec<String>> = LazyLock::new(|| {
    EMERGENCY_PHRASES
        .iter()
        .map(|p| normalize(p))
        .filter(|p| !p.is_empty())
        .collect()
});

/// First emergency phrase found in `text`, normalized.
pub fn find_emergency_phrase(text: &str) -> Option<&'static str> {
    let text = normalize(text);
    NORMALIZED_EMERGENCY_PHRASES
        .iter()
        .find(|phrase| text.contains(phrase.as_str()))
        .map(String::as_str)
}

pub fn is_emergency(text: &str) -> bool {
    find_emergency_phrase(text).is_some()
}

/// Severity of a keyword-path record: `high` when its issue or guidance
/// carries an emergency phrase, else `none`. Applies to the generic record
/// too.
pub fn keyword_severity(issue: &str, guidance: &str) -> Severity {
    if is_emergency(&format!("{issue} {guidance}")) {
        Severity::High
    } else {
        Severity::None
    }
}

/// Request for the hospital-lookup collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HospitalQuery {
    pub department: String,
    /// `hi-IN` for Hindi, `en-IN` otherwise.
    pub accept_language: &'static str,
}

/// Everything the host needs to present a diagnosis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Handoff {
    /// `"{issue}. {guidance}"`
    pub announcement: String,
    pub speech_locale: &'static str,
    /// Present only for high-severity results while online.
    pub hospital_query: Option<HospitalQuery>,
}

/// Plan the presentation of `record` for a user speaking `language`.
pub fn plan_handoff(record: &DiagnosisRecord, language: Language, online: bool) -> Handoff {
    let hospital_query = if record.needs_escalation() {
        if online {
            Some(HospitalQuery {
                department: record.department.clone(),
                accept_language: match language {
                    Language::Hi => "hi-IN",
                    _ => "en-IN",
                },
            })
        } else {
            warn!(issue = %record.issue, "High-severity result while offline, hospital lookup skipped");
            None
        }
    } else {
        None
    };

    Handoff {
        announcement: record.announcement(),
        speech_locale: language.speech_locale(),
        hospital_query,
    }
}
