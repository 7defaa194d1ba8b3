//! Multilingual keyword diagnosis.
//!
//! 1. Database: per-language ordered symptom entries loaded from JSON
//! 2. Engine: normalized keyword index, first-match scan with English fallback
//! 3. Generic: localized "not recognized" records

mod database;
mod engine;
mod generic;

use std::path::PathBuf;

use thiserror::Error;

// ═══════════════════════════════════════════════════════════════════════════
// Error type
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Error, Debug)]
pub enum SymptomError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Symptom database not found: {0}")]
    NotFound(PathBuf),

    #[error("Symptom database has no usable entries")]
    EmptyDatabase,
}

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports
// ═══════════════════════════════════════════════════════════════════════════

pub use database::*;
pub use engine::*;
pub use generic::*;
