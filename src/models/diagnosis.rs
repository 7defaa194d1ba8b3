use serde::{Deserialize, Serialize};

use super::enums::{ImageCondition, Language, Severity};

/// Where a diagnosis came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosisSource {
    /// Keyword match (or generic fallback) over symptom text.
    Symptom {
        /// Bucket the answer came from (`en` after a fallback match).
        language: Language,
        /// Normalized keyword that matched. `None` for the generic record.
        matched_keyword: Option<String>,
    },
    /// Heuristic photo classification.
    Image { condition: ImageCondition },
}

/// Unified output of both engines, handed to the presentation layer.
///
/// Created per query and never persisted by the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisRecord {
    pub issue: String,
    pub guidance: String,
    pub department: String,
    /// Classifier confidence in [0, 1]. Keyword matches carry none.
    pub confidence: Option<f32>,
    pub severity: Severity,
    pub remedies: Option<String>,
    /// True when no match was found and a fallback message was substituted.
    pub is_generic: bool,
    pub source: DiagnosisSource,
}

impl DiagnosisRecord {
    /// Text handed to speech synthesis: `"{issue}. {guidance}"`.
    pub fn announcement(&self) -> String {
        format!("{}. {}", self.issue, self.guidance)
    }

    /// High-severity results trigger hospital lookup.
    pub fn needs_escalation(&self) -> bool {
        self.severity == Severity::High
    }

    pub fn condition(&self) -> Option<ImageCondition> {
        match &self.source {
            DiagnosisSource::Image { condition } => Some(*condition),
            DiagnosisSource::Symptom { .. } => None,
        }
    }

    /// True for the dedicated "could not analyze this photo" record.
    pub fn is_unanalyzable(&self) -> bool {
        self.condition() == Some(ImageCondition::Unanalyzable)
    }
}
