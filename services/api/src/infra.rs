use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use metrics_exporter_prometheus::PrometheusHandle;
use survey_ai::workflows::surveys::submissions::{
    AlertNotifier, AnalysisConfig, DissatisfactionAlert, NotificationError, RepositoryError,
    SurveyId, SurveyRecord, SurveyRepository, SurveyStatus,
};
use tracing::warn;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemorySurveyRepository {
    records: Arc<Mutex<HashMap<SurveyId, SurveyRecord>>>,
}

impl SurveyRepository for InMemorySurveyRepository {
    fn insert(&self, record: SurveyRecord) -> Result<SurveyRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.survey_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.survey_id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: SurveyRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.survey_id) {
            guard.insert(record.survey_id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &SurveyId) -> Result<Option<SurveyRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn unanalyzed(&self, limit: usize) -> Result<Vec<SurveyRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| record.status == SurveyStatus::Answered && record.analysis.is_none())
            .take(limit)
            .cloned()
            .collect())
    }
}

/// Notifier that surfaces alerts to operators through the log stream; the
/// real e-mail adapter plugs in behind the same trait.
#[derive(Default, Clone)]
pub(crate) struct TracingAlertNotifier;

impl AlertNotifier for TracingAlertNotifier {
    fn notify(&self, alert: DissatisfactionAlert) -> Result<(), NotificationError> {
        warn!(
            survey_id = %alert.survey_id.0,
            client = %alert.client_name,
            product = %alert.product_type,
            agent = %alert.agent_name,
            sentiment = alert.sentiment.label(),
            total_score = alert.total_score,
            reason = alert.reason.as_deref().unwrap_or("-"),
            "dissatisfaction alert"
        );
        Ok(())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryAlertNotifier {
    events: Arc<Mutex<Vec<DissatisfactionAlert>>>,
}

impl AlertNotifier for InMemoryAlertNotifier {
    fn notify(&self, alert: DissatisfactionAlert) -> Result<(), NotificationError> {
        let mut guard = self.events.lock().expect("notifier mutex poisoned");
        guard.push(alert);
        Ok(())
    }
}

impl InMemoryAlertNotifier {
    pub(crate) fn events(&self) -> Vec<DissatisfactionAlert> {
        self.events.lock().expect("notifier mutex poisoned").clone()
    }
}

pub(crate) fn default_analysis_config() -> AnalysisConfig {
    AnalysisConfig::default()
}
