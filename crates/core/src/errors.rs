use thiserror::Error;

/// Unified error type for the entire token-dashboard-core library.
/// Every public function returns `Result<T, CoreError>`.
///
/// Numeric degeneracy during generation (a step that would go non-positive or
/// non-finite) is not represented here: generators clamp to a floor instead.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Caller contract ─────────────────────────────────────────────
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Not found: {0}")]
    NotFound(String),

    // ── Configuration ───────────────────────────────────────────────
    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}
