use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};
use uuid::Uuid;

use super::analysis::{AnalysisConfig, AnalysisEngine, SentimentClassifier};
use super::domain::{Answer, SurveyId, SurveyMetadata, SurveyStatus, SurveySubmission};
use super::repository::{
    AlertNotifier, AnalysisRecord, DissatisfactionAlert, NotificationError, RepositoryError,
    SurveyRecord, SurveyRepository,
};

/// Service composing the repository, the alert notifier, and the engine.
pub struct SurveySubmissionService<R, N, C> {
    repository: Arc<R>,
    notifier: Arc<N>,
    engine: AnalysisEngine<C>,
}

impl<R, N, C> SurveySubmissionService<R, N, C>
where
    R: SurveyRepository + 'static,
    N: AlertNotifier + 'static,
    C: SentimentClassifier + 'static,
{
    pub fn new(repository: Arc<R>, notifier: Arc<N>, classifier: C, config: AnalysisConfig) -> Self {
        Self {
            repository,
            notifier,
            engine: AnalysisEngine::new(classifier, config),
        }
    }

    /// Create an open survey link for a client.
    pub fn create_survey(
        &self,
        metadata: SurveyMetadata,
    ) -> Result<SurveyRecord, SubmissionServiceError> {
        let record = SurveyRecord {
            survey_id: SurveyId(Uuid::new_v4().to_string()),
            metadata,
            status: SurveyStatus::Open,
            answers: Vec::new(),
            analysis: None,
        };

        let stored = self.repository.insert(record)?;
        info!(survey_id = %stored.survey_id.0, "survey link created");
        Ok(stored)
    }

    /// Accept a client submission: persist the raw answers first, then score.
    ///
    /// Scoring failures never abort the submission; the raw answers stay
    /// persisted and the record is returned without an analysis.
    pub async fn submit(
        &self,
        survey_id: &SurveyId,
        submission: SurveySubmission,
        now: DateTime<Utc>,
    ) -> Result<SurveyRecord, SubmissionServiceError> {
        let mut record = self
            .repository
            .fetch(survey_id)?
            .ok_or(RepositoryError::NotFound)?;

        match record.status {
            SurveyStatus::Answered => return Err(SubmissionServiceError::AlreadyAnswered),
            SurveyStatus::Expired => return Err(SubmissionServiceError::Expired),
            SurveyStatus::Open => {}
        }

        if record.is_expired(now) {
            record.status = SurveyStatus::Expired;
            self.repository.update(record)?;
            return Err(SubmissionServiceError::Expired);
        }

        record.answers = submission
            .answers
            .iter()
            .filter_map(|raw| Answer::from_form(&raw.question, &raw.value))
            .collect();
        record.status = SurveyStatus::Answered;
        self.repository.update(record.clone())?;

        Ok(self.analyze_and_store(record, now).await)
    }

    /// Fetch a survey and its current analysis state.
    pub fn get(&self, survey_id: &SurveyId) -> Result<SurveyRecord, SubmissionServiceError> {
        let record = self
            .repository
            .fetch(survey_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// Re-run the analysis for answered surveys that never got one.
    pub async fn reprocess_pending(
        &self,
        limit: usize,
        now: DateTime<Utc>,
    ) -> Result<ReprocessSummary, SubmissionServiceError> {
        let pending = self.repository.unanalyzed(limit)?;
        let mut summary = ReprocessSummary::default();

        for record in pending {
            if record.answers.is_empty() {
                summary.skipped += 1;
                continue;
            }
            let record = self.analyze_and_store(record, now).await;
            summary.processed += 1;
            if record
                .analysis
                .as_ref()
                .map(|analysis| analysis.should_alert)
                .unwrap_or(false)
            {
                summary.alerted += 1;
            }
        }

        Ok(summary)
    }

    async fn analyze_and_store(&self, mut record: SurveyRecord, now: DateTime<Utc>) -> SurveyRecord {
        let outcome = self.engine.analyze(&record.answers).await;
        for warning in &outcome.warnings {
            warn!(
                survey_id = %record.survey_id.0,
                detail = %warning.summary(),
                "analysis warning"
            );
        }

        let analysis = AnalysisRecord::from_result(
            &outcome.result,
            self.engine.model_name(),
            self.engine.config().stored_text_limit,
            now,
        );
        record.analysis = Some(analysis.clone());

        info!(
            survey_id = %record.survey_id.0,
            sentiment = analysis.sentiment.label(),
            total_score = analysis.total_score,
            should_alert = analysis.should_alert,
            "hybrid analysis complete"
        );

        if let Err(err) = self.repository.update(record.clone()) {
            error!(
                survey_id = %record.survey_id.0,
                error = %err,
                "failed to persist analysis; raw answers remain stored"
            );
        }

        if analysis.should_alert {
            let alert = DissatisfactionAlert::from_record(&record, &analysis);
            if let Err(err) = self.notifier.notify(alert) {
                error!(
                    survey_id = %record.survey_id.0,
                    error = %err,
                    "dissatisfaction alert dispatch failed"
                );
            }
        }

        record
    }
}

/// Counters returned by a reprocessing pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReprocessSummary {
    pub processed: usize,
    pub alerted: usize,
    pub skipped: usize,
}

/// Error raised by the submission service.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionServiceError {
    #[error("survey link expired")]
    Expired,
    #[error("survey already answered")]
    AlreadyAnswered,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Notification(#[from] NotificationError),
}
