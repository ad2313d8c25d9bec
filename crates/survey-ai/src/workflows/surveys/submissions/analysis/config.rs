use serde::{Deserialize, Serialize};

/// Dials backing the hybrid scoring rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Numeric ratings at or below this value count as negative.
    pub low_score_max: f64,
    /// Numeric ratings at or above this value count as positive.
    pub high_score_min: f64,
    /// Net keyword hits at which the lexicon overrides the classifier.
    pub keyword_dominance: i32,
    /// Classifier confidence below which a contradicted verdict is downgraded.
    pub weak_confidence: f64,
    /// Confidence bonus applied when keywords dominate.
    pub confidence_boost: f64,
    /// Reconciled confidence never exceeds this cap.
    pub confidence_cap: f64,
    /// Free text at or below this many characters is not scored.
    pub short_text_limit: usize,
    /// Stored consolidated text is truncated to this many characters.
    pub stored_text_limit: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            low_score_max: 4.0,
            high_score_min: 8.0,
            keyword_dominance: 2,
            weak_confidence: 0.7,
            confidence_boost: 0.1,
            confidence_cap: 0.95,
            short_text_limit: 3,
            stored_text_limit: 1000,
        }
    }
}
