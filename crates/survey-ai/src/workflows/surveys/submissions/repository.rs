use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::analysis::{HybridResult, SentimentLabel};
use super::domain::{Answer, SurveyId, SurveyMetadata, SurveyStatus};

/// Repository record holding a survey link, its answers, and the analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyRecord {
    pub survey_id: SurveyId,
    pub metadata: SurveyMetadata,
    pub status: SurveyStatus,
    pub answers: Vec<Answer>,
    pub analysis: Option<AnalysisRecord>,
}

impl SurveyRecord {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.metadata.expires_at < now
    }

    pub fn rationale(&self) -> String {
        match &self.analysis {
            Some(analysis) => analysis
                .dissatisfaction_reason
                .clone()
                .unwrap_or_else(|| "no dissatisfaction detected".to_string()),
            None => "pending analysis".to_string(),
        }
    }

    pub fn analysis_view(&self) -> AnalysisView {
        AnalysisView {
            survey_id: self.survey_id.clone(),
            status: self.status.label(),
            sentiment: self
                .analysis
                .as_ref()
                .map(|analysis| analysis.sentiment.label()),
            confidence: self.analysis.as_ref().map(|analysis| analysis.confidence),
            total_score: self.analysis.as_ref().map(|analysis| analysis.total_score),
            should_alert: self.analysis.as_ref().map(|analysis| analysis.should_alert),
            rationale: self.rationale(),
        }
    }
}

/// Persisted shape of one hybrid analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub consolidated_text: String,
    pub sentiment: SentimentLabel,
    pub confidence: f64,
    pub total_score: i32,
    pub dissatisfaction_reason: Option<String>,
    pub should_alert: bool,
    pub model: String,
    pub analyzed_at: DateTime<Utc>,
}

impl AnalysisRecord {
    /// Snapshot a result for storage, truncating the consolidated text.
    pub fn from_result(
        result: &HybridResult,
        model: &str,
        text_limit: usize,
        analyzed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            consolidated_text: result.consolidated_text.chars().take(text_limit).collect(),
            sentiment: result.overall_sentiment,
            confidence: result.overall_confidence,
            total_score: result.total_score,
            dissatisfaction_reason: result.dissatisfaction_reason.clone(),
            should_alert: result.should_alert,
            model: model.to_string(),
            analyzed_at,
        }
    }
}

/// Storage abstraction so the service module can be exercised in isolation.
pub trait SurveyRepository: Send + Sync {
    fn insert(&self, record: SurveyRecord) -> Result<SurveyRecord, RepositoryError>;
    fn update(&self, record: SurveyRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &SurveyId) -> Result<Option<SurveyRecord>, RepositoryError>;
    /// Answered surveys that still lack an analysis, oldest first.
    fn unanalyzed(&self, limit: usize) -> Result<Vec<SurveyRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Trait describing the outbound dissatisfaction-alert hook (e-mail adapters
/// and similar); delivery mechanics live entirely behind it.
pub trait AlertNotifier: Send + Sync {
    fn notify(&self, alert: DissatisfactionAlert) -> Result<(), NotificationError>;
}

/// Complete, already-decided payload handed to the notifier exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DissatisfactionAlert {
    pub survey_id: SurveyId,
    pub client_name: String,
    pub product_type: String,
    pub agent_name: String,
    pub sentiment: SentimentLabel,
    pub confidence: f64,
    pub total_score: i32,
    pub reason: Option<String>,
    pub consolidated_text: String,
}

impl DissatisfactionAlert {
    pub fn from_record(record: &SurveyRecord, analysis: &AnalysisRecord) -> Self {
        Self {
            survey_id: record.survey_id.clone(),
            client_name: record.metadata.client_name.clone(),
            product_type: record.metadata.product_type.clone(),
            agent_name: record.metadata.agent_name.clone(),
            sentiment: analysis.sentiment,
            confidence: analysis.confidence,
            total_score: analysis.total_score,
            reason: analysis.dissatisfaction_reason.clone(),
            consolidated_text: analysis.consolidated_text.clone(),
        }
    }
}

/// Alert dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("alert transport unavailable: {0}")]
    Transport(String),
}

/// Sanitized representation of a survey's exposed analysis state.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisView {
    pub survey_id: SurveyId,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_score: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub should_alert: Option<bool>,
    pub rationale: String,
}
