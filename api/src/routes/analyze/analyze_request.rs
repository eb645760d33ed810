use serde::Deserialize;

/// Request payload for /api/analyze.
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    /// Source code to analyze. Required; kept optional so a missing field
    /// gets a dedicated error message.
    #[serde(default)]
    pub code: Option<String>,
    /// Accepted for compatibility and ignored. Defaults to `true`.
    #[serde(default)]
    pub apply_fix: Option<bool>,
}

impl AnalyzeRequest {
    pub fn apply_fix(&self) -> bool {
        self.apply_fix.unwrap_or(true)
    }
}
