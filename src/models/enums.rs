use serde::{Deserialize, Serialize};

use super::ModelError;

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ModelError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(Language {
    En => "en",
    Hi => "hi",
    Kn => "kn",
});

// Declaration order is the urgency order: None < Low < Medium < High.
str_enum!(Severity {
    None => "none",
    Low => "low",
    Medium => "medium",
    High => "high",
});

str_enum!(ImageCondition {
    HealthySkin => "healthy_skin",
    Wound => "wound",
    Burn => "burn",
    Rash => "rash",
    Abscess => "abscess",
    MildIssue => "mild_issue",
    CleanSkin => "clean_skin",
    Unanalyzable => "unanalyzable",
});

impl Language {
    /// Every language with a symptom bucket, fallback language first.
    pub const ALL: [Language; 3] = [Language::En, Language::Hi, Language::Kn];

    /// Resolve a free-form language code (`"hi-IN"`, `"kn"`, `"fr"`, ...).
    ///
    /// Case-sensitive prefix match: anything starting with `hi` is Hindi,
    /// `kn` is Kannada, everything else (including empty input and `"HI"`)
    /// is English.
    pub fn from_code(code: &str) -> Self {
        if code.starts_with("hi") {
            Language::Hi
        } else if code.starts_with("kn") {
            Language::Kn
        } else {
            Language::En
        }
    }

    /// BCP-47 locale handed to speech recognition / synthesis collaborators.
    pub fn speech_locale(&self) -> &'static str {
        match self {
            Language::En => "en-IN",
            Language::Hi => "hi-IN",
            Language::Kn => "kn-IN",
        }
    }
}

impl ImageCondition {
    /// Conditions that count as "nothing wrong".
    pub fn is_healthy(&self) -> bool {
        matches!(self, ImageCondition::HealthySkin | ImageCondition::CleanSkin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn language_round_trip() {
        for (variant, s) in [
            (Language::En, "en"),
            (Language::Hi, "hi"),
            (Language::Kn, "kn"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(Language::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn severity_round_trip() {
        for (variant, s) in [
            (Severity::None, "none"),
            (Severity::Low, "low"),
            (Severity::Medium, "medium"),
            (Severity::High, "high"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(Severity::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn severity_is_ordinal() {
        assert!(Severity::None < Severity::Low);
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
    }

    #[test]
    fn invalid_enum_value_rejected() {
        let err = ImageCondition::from_str("sunburn").unwrap_err();
        assert!(err.to_string().contains("ImageCondition"));
        assert!(err.to_string().contains("sunburn"));
    }

    #[test]
    fn language_prefix_resolution() {
        assert_eq!(Language::from_code("hi"), Language::Hi);
        assert_eq!(Language::from_code("hi-IN"), Language::Hi);
        assert_eq!(Language::from_code("kn-IN"), Language::Kn);
        assert_eq!(Language::from_code("en-US"), Language::En);
        assert_eq!(Language::from_code("fr"), Language::En);
        assert_eq!(Language::from_code(""), Language::En);
        assert_eq!(Language::from_code("HI-in"), Language::En);
        assert_eq!(Language::from_code("Kn"), Language::En);
        assert_eq!(Language::from_code(" hi"), Language::En);
    }

    #[test]
    fn speech_locales() {
        assert_eq!(Language::En.speech_locale(), "en-IN");
        assert_eq!(Language::Hi.speech_locale(), "hi-IN");
        assert_eq!(Language::Kn.speech_locale(), "kn-IN");
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&ImageCondition::HealthySkin).unwrap();
        assert_eq!(json, "\"healthy_skin\"");
        let parsed: Severity = serde_json::from_str("\"medium\"").unwrap();
        assert_eq!(parsed, Severity::Medium);
    }
}
