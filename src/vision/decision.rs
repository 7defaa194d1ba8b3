//! Ordered decision tree over image statistics.
//!
//! Rules are evaluated top to bottom and the first predicate that holds
//! wins, so a feature set satisfying two rules always gets the earlier one.
//! The last rule is unconditional. Each outcome maps to a fixed template
//! (guidance, home remedy, department, confidence, severity).

use serde::Serialize;

use crate::models::{DiagnosisRecord, DiagnosisSource, ImageCondition, Severity};

use super::color::ColorStats;
use super::edges::EdgeStats;
use super::shape::ShapeStats;
use super::texture::TextureStats;

// ═══════════════════════════════════════════════════════════
// Thresholds
// ═══════════════════════════════════════════════════════════

pub const HEALTHY_MIN_SKIN_RATIO: f64 = 0.82;
pub const HEALTHY_MAX_EDGE_DENSITY: f64 = 0.08;
pub const HEALTHY_MAX_TEXTURE: f64 = 0.25;

pub const WOUND_MIN_IRREGULARITY: f64 = 0.35;
pub const WOUND_MIN_DARK_RATIO: f64 = 0.12;
pub const WOUND_MIN_TEXTURE: f64 = 0.4;

pub const BURN_MIN_BRIGHT_RED_RATIO: f64 = 0.018;
pub const BURN_MAX_TEXTURE: f64 = 0.2;
pub const BURN_MIN_LARGE_SMOOTH: usize = 2;

pub const RASH_MIN_RED_RATIO: f64 = 0.035;
pub const RASH_MIN_EDGE_DENSITY: f64 = 0.12;
pub const RASH_MIN_SMALL_IRREGULAR: usize = 15;

pub const ABSCESS_MIN_GREEN_RATIO: f64 = 0.01;
pub const ABSCESS_MIN_CIRCULAR: usize = 1;
pub const ABSCESS_MIN_TEXTURE: f64 = 0.45;

pub const MILD_MIN_EDGE_DENSITY: f64 = 0.09;
pub const MILD_MIN_TEXTURE: f64 = 0.3;

// ═══════════════════════════════════════════════════════════
// Features + rules
// ═══════════════════════════════════════════════════════════

/// Everything the decision tree looks at for one image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ImageFeatures {
    pub color: ColorStats,
    pub edges: EdgeStats,
    pub texture: TextureStats,
    pub shapes: ShapeStats,
}

/// One branch of the tree.
pub struct DecisionRule {
    pub condition: ImageCondition,
    pub predicate: fn(&ImageFeatures) -> bool,
}

/// Branches in evaluation order.
pub static DECISION_RULES: [DecisionRule; 7] = [
    DecisionRule {
        condition: ImageCondition::HealthySkin,
        predicate: |f| {
            f.color.skin_ratio > HEALTHY_MIN_SKIN_RATIO
                && f.edges.edge_density < HEALTHY_MAX_EDGE_DENSITY
                && f.texture.score < HEALTHY_MAX_TEXTURE
        },
    },
    DecisionRule {
        condition: ImageCondition::Wound,
        predicate: |f| {
            f.shapes.mean_irregularity > WOUND_MIN_IRREGULARITY
                && f.color.dark_ratio > WOUND_MIN_DARK_RATIO
                && f.texture.score > WOUND_MIN_TEXTURE
        },
    },
    DecisionRule {
        condition: ImageCondition::Burn,
        predicate: |f| {
            f.color.bright_red_ratio > BURN_MIN_BRIGHT_RED_RATIO
                && f.texture.score < BURN_MAX_TEXTURE
                && f.shapes.large_smooth_count > BURN_MIN_LARGE_SMOOTH
        },
    },
    DecisionRule {
        condition: ImageCondition::Rash,
        predicate: |f| {
            f.color.red_ratio > RASH_MIN_RED_RATIO
                && f.edges.edge_density > RASH_MIN_EDGE_DENSITY
                && f.shapes.small_irregular_count > RASH_MIN_SMALL_IRREGULAR
        },
    },
    DecisionRule {
        condition: ImageCondition::Abscess,
        predicate: |f| {
            f.color.green_ratio > ABSCESS_MIN_GREEN_RATIO
                && f.shapes.circular_count > ABSCESS_MIN_CIRCULAR
                && f.texture.score > ABSCESS_MIN_TEXTURE
        },
    },
    DecisionRule {
        condition: ImageCondition::MildIssue,
        predicate: |f| {
            f.edges.edge_density > MILD_MIN_EDGE_DENSITY || f.texture.score > MILD_MIN_TEXTURE
        },
    },
    DecisionRule {
        condition: ImageCondition::CleanSkin,
        predicate: |_| true,
    },
];

/// First matching branch.
pub fn decide(features: &ImageFeatures) -> ImageCondition {
    DECISION_RULES
        .iter()
        .find(|rule| (rule.predicate)(features))
        .map(|rule| rule.condition)
        .unwrap_or(ImageCondition::CleanSkin)
}

// ═══════════════════════════════════════════════════════════
// Outcome templates
// ═══════════════════════════════════════════════════════════

/// Static presentation data attached to a classified condition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConditionTemplate {
    pub issue: &'static str,
    pub guidance: &'static str,
    pub remedies: Option<&'static str>,
    pub department: &'static str,
    pub confidence: f32,
    pub severity: Severity,
}

pub fn template(condition: ImageCondition) -> ConditionTemplate {
    match condition {
        ImageCondition::HealthySkin => ConditionTemplate {
            issue: "Healthy Skin - Perfect Condition",
            guidance: "Excellent skin health. Normal texture and smooth surface detected.",
            remedies: Some("Coconut oil daily"),
            department: "None",
            confidence: 0.97,
            severity: Severity::None,
        },
        ImageCondition::Wound => ConditionTemplate {
            issue: "Open Wound/Cut",
            guidance: "Clean with soap and water, apply Betadine, bandage. Get a tetanus shot if the wound is deep or dirty.",
            remedies: Some("Honey, Aloe vera"),
            department: "General Surgery",
            confidence: 0.88,
            severity: Severity::High,
        },
        ImageCondition::Burn => ConditionTemplate {
            issue: "Burn Injury",
            guidance: "Cool with running water for 20 minutes. No butter or toothpaste. Cover loosely with a clean cloth.",
            remedies: Some("Aloe vera gel"),
            department: "Plastic Surgery",
            confidence: 0.85,
            severity: Severity::High,
        },
        ImageCondition::Rash => ConditionTemplate {
            issue: "Skin Rash/Infection",
            guidance: "Clean with antiseptic, apply antibiotic cream. If it spreads or you develop a fever, see a doctor within 24 hours.",
            remedies: Some("Neem paste, Turmeric powder with water"),
            department: "Dermatology",
            confidence: 0.92,
            severity: Severity::Medium,
        },
        ImageCondition::Abscess => ConditionTemplate {
            issue: "Boil/Abscess (Infection)",
            guidance: "Hot compress 4 times a day, no squeezing. Antibiotics are needed if painful or swollen.",
            remedies: Some("Turmeric milk, Garlic paste"),
            department: "General Medicine",
            confidence: 0.78,
            severity: Severity::Medium,
        },
        ImageCondition::MildIssue => ConditionTemplate {
            issue: "Possible Mild Skin Issue",
            guidance: "Minor texture changes detected. Monitor for 2-3 days. Take a new photo if it worsens.",
            remedies: Some("Turmeric and honey paste"),
            department: "Dermatology",
            confidence: 0.78,
            severity: Severity::Low,
        },
        ImageCondition::CleanSkin => ConditionTemplate {
            issue: "Clean Healthy Skin",
            guidance: "No medical issues. Normal skin texture and structure.",
            remedies: Some("Aloe vera / Coconut oil"),
            department: "None",
            confidence: 0.95,
            severity: Severity::None,
        },
        ImageCondition::Unanalyzable => ConditionTemplate {
            issue: "Unable to Analyze Image",
            guidance: "The photo could not be read. Retake it in good light, close to the affected area, and try again.",
            remedies: None,
            department: "None",
            confidence: 0.0,
            severity: Severity::None,
        },
    }
}

/// Build the diagnosis record for a classified condition.
pub fn record_for(condition: ImageCondition) -> DiagnosisRecord {
    let t = template(condition);
    DiagnosisRecord {
        issue: t.issue.to_string(),
        guidance: t.guidance.to_string(),
        department: t.department.to_string(),
        confidence: Some(t.confidence),
        severity: t.severity,
        remedies: t.remedies.map(str::to_string),
        is_generic: false,
        source: DiagnosisSource::Image { condition },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn healthy() -> ImageFeatures {
        let mut f = ImageFeatures::default();
        f.color.skin_ratio = 0.9;
        f.edges.edge_density = 0.02;
        f.texture.score = 0.1;
        f
    }

    fn wound() -> ImageFeatures {
        let mut f = ImageFeatures::default();
        f.shapes.mean_irregularity = 0.5;
        f.color.dark_ratio = 0.2;
        f.texture.score = 0.5;
        f
    }

    fn burn() -> ImageFeatures {
        let mut f = ImageFeatures::default();
        f.color.bright_red_ratio = 0.05;
        f.color.red_ratio = 0.05;
        f.texture.score = 0.1;
        f.shapes.large_smooth_count = 3;
        f
    }

    fn rash() -> ImageFeatures {
        let mut f = ImageFeatures::default();
        f.color.red_ratio = 0.05;
        f.edges.edge_density = 0.2;
        f.shapes.small_irregular_count = 20;
        f
    }

    fn abscess() -> ImageFeatures {
        let mut f = ImageFeatures::default();
        f.color.green_ratio = 0.02;
        f.shapes.circular_count = 2;
        f.texture.score = 0.5;
        f
    }

    #[test]
    fn each_branch_reachable() {
        assert_eq!(decide(&healthy()), ImageCondition::HealthySkin);
        assert_eq!(decide(&wound()), ImageCondition::Wound);
        assert_eq!(decide(&burn()), ImageCondition::Burn);
        assert_eq!(decide(&rash()), ImageCondition::Rash);
        assert_eq!(decide(&abscess()), ImageCondition::Abscess);

        let mut mild = ImageFeatures::default();
        mild.edges.edge_density = 0.1;
        assert_eq!(decide(&mild), ImageCondition::MildIssue);
        let mut mild_texture = ImageFeatures::default();
        mild_texture.texture.score = 0.31;
        assert_eq!(decide(&mild_texture), ImageCondition::MildIssue);

        assert_eq!(decide(&ImageFeatures::default()), ImageCondition::CleanSkin);
    }

    #[test]
    fn earlier_branch_wins_on_overlap() {
        // Burn and Rash both hold -> Burn.
        let mut f = burn();
        f.edges.edge_density = 0.2;
        f.shapes.small_irregular_count = 20;
        assert!((DECISION_RULES[3].predicate)(&f));
        assert_eq!(decide(&f), ImageCondition::Burn);

        // Wound and Abscess both hold -> Wound.
        let mut f = wound();
        f.color.green_ratio = 0.02;
        f.shapes.circular_count = 2;
        assert!((DECISION_RULES[4].predicate)(&f));
        assert_eq!(decide(&f), ImageCondition::Wound);

        // Healthy and Burn both hold -> Healthy.
        let mut f = burn();
        f.color.skin_ratio = 0.9;
        assert_eq!(decide(&f), ImageCondition::HealthySkin);

        // Rash and Mild both hold -> Rash.
        assert!((DECISION_RULES[5].predicate)(&rash()));
        assert_eq!(decide(&rash()), ImageCondition::Rash);
    }

    #[test]
    fn thresholds_are_strict() {
        let mut f = healthy();
        f.color.skin_ratio = HEALTHY_MIN_SKIN_RATIO;
        assert_ne!(decide(&f), ImageCondition::HealthySkin);

        let mut f = burn();
        f.shapes.large_smooth_count = BURN_MIN_LARGE_SMOOTH;
        assert_ne!(decide(&f), ImageCondition::Burn);

        let mut f = ImageFeatures::default();
        f.edges.edge_density = MILD_MIN_EDGE_DENSITY;
        assert_eq!(decide(&f), ImageCondition::CleanSkin);
    }

    #[test]
    fn rule_order_matches_conditions() {
        let order: Vec<_> = DECISION_RULES.iter().map(|r| r.condition).collect();
        assert_eq!(
            order,
            vec![
                ImageCondition::HealthySkin,
                ImageCondition::Wound,
                ImageCondition::Burn,
                ImageCondition::Rash,
                ImageCondition::Abscess,
                ImageCondition::MildIssue,
                ImageCondition::CleanSkin,
            ]
        );
    }

    #[test]
    fn templates_carry_fixed_confidence_and_severity() {
        let cases = [
            (ImageCondition::HealthySkin, 0.97, Severity::None),
            (ImageCondition::Wound, 0.88, Severity::High),
            (ImageCondition::Burn, 0.85, Severity::High),
            (ImageCondition::Rash, 0.92, Severity::Medium),
            (ImageCondition::Abscess, 0.78, Severity::Medium),
            (ImageCondition::MildIssue, 0.78, Severity::Low),
            (ImageCondition::CleanSkin, 0.95, Severity::None),
            (ImageCondition::Unanalyzable, 0.0, Severity::None),
        ];
        for (condition, confidence, severity) in cases {
            let record = record_for(condition);
            assert_eq!(record.confidence, Some(confidence), "{condition}");
            assert_eq!(record.severity, severity, "{condition}");
            assert_eq!(record.condition(), Some(condition));
            assert!(!record.is_generic);
        }
    }

    #[test]
    fn unanalyzable_has_distinct_issue() {
        let unable = record_for(ImageCondition::Unanalyzable);
        let clean = record_for(ImageCondition::CleanSkin);
        assert_ne!(unable.issue, clean.issue);
        assert!(unable.is_unanalyzable());
        assert!(unable.remedies.is_none());
    }
}
