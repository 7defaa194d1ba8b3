use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::vision::MAX_ANALYSIS_DIMENSION;

/// Application-level constants
pub const APP_NAME: &str = "SwasthyaMitra";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable that points at an alternate symptom database.
pub const SYMPTOM_DATABASE_ENV: &str = "SWASTHYA_SYMPTOMS";

/// File name of the bundled symptom database.
pub const SYMPTOM_DATABASE_FILE: &str = "symptoms.json";

/// Every 8th pixel is sampled by the fast classifier.
pub const DEFAULT_FAST_SAMPLE_STRIDE: usize = 8;

/// Get the application data directory
/// ~/SwasthyaMitra/ on all platforms. Falls back to the working directory
/// when no home directory can be determined.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Symptom database location: `$SWASTHYA_SYMPTOMS` if set, otherwise
/// `~/SwasthyaMitra/symptoms.json`.
pub fn symptom_database_path() -> PathBuf {
    match std::env::var_os(SYMPTOM_DATABASE_ENV) {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => app_data_dir().join(SYMPTOM_DATABASE_FILE),
    }
}

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    if cfg!(debug_assertions) {
        "swasthya_lib=debug,swasthya=debug,warn"
    } else {
        "swasthya_lib=info,swasthya=info,warn"
    }
}

/// Which pipeline the image classifier runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierMode {
    /// Color, edges, texture, shapes, decision tree.
    #[default]
    Full,
    /// Sparse color sampling only.
    Fast,
}

/// Image classifier tuning knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Longest edge after downscale. Must be at least 1.
    pub max_dimension: u32,
    pub mode: ClassifierMode,
    /// Pixel stride of the fast path.
    pub fast_sample_stride: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            max_dimension: MAX_ANALYSIS_DIMENSION,
            mode: ClassifierMode::Full,
            fast_sample_stride: DEFAULT_FAST_SAMPLE_STRIDE,
        }
    }
}

impl ClassifierConfig {
    pub fn fast() -> Self {
        Self {
            mode: ClassifierMode::Fast,
            ..Self::default()
        }
    }
}
