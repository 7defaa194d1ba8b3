use crate::escalation::keyword_severity;
use crate::models::{DiagnosisRecord, DiagnosisSource, Language};

use super::DEFAULT_DEPARTMENT;

/// Localized title and message shown when nothing matched.
pub fn generic_guidance(language: Language) -> (&'static str, &'static str) {
    match language {
        Language::En => (
            "Symptom Not Recognized",
            "Couldn't identify the symptom. Please provide more details or upload a photo. Visit doctor for severe symptoms.",
        ),
        Language::Hi => (
            "लक्षण अपरिचित",
            "मैं इस लक्षण को पहचान नहीं पाया। कृपया और विस्तार से बताएं या फोटो अपलोड करें। गंभीर लक्षणों के लिए तुरंत डॉक्टर से संपर्क करें।",
        ),
        Language::Kn => (
            "ಲಕ್ಷಣ ಗುರುತಿಸಲಿಲ್ಲ",
            "ಈ ಲಕ್ಷಣವನ್ನು ಗುರುತಿಸಲಿಲ್ಲ. ದಯವಿಟ್ಟು ಹೆಚ್ಚಿನ ವಿವರಗಳು ನೀಡಿ ಅಥವಾ ಫೋಟೋ ಅಪ್‌ಲೋಡ್ ಮಾಡಿ.",
        ),
    }
}

/// The "symptom not recognized" record for `language`.
///
/// Scanned for emergency phrases like a matched entry. The English text
/// mentions severe symptoms, so it comes out `high`.
pub fn generic_record(language: Language) -> DiagnosisRecord {
    let (title, text) = generic_guidance(language);
    DiagnosisRecord {
        issue: title.to_string(),
        guidance: text.to_string(),
        department: DEFAULT_DEPARTMENT.to_string(),
        confidence: None,
        severity: keyword_severity(title, text),
        remedies: None,
        is_generic: true,
        source: DiagnosisSource::Symptom {
            language,
            matched_keyword: None,
        },
    }
}
