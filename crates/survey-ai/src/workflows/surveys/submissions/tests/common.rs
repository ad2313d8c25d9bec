use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use chrono::{Duration, TimeZone, Utc};
use serde_json::Value;

use crate::workflows::surveys::submissions::analysis::{
    AnalysisConfig, ClassifierVerdict, SentimentClassifier, SentimentLabel, VerdictSource,
};
use crate::workflows::surveys::submissions::domain::{
    Answer, RawAnswer, SurveyId, SurveyMetadata, SurveyStatus, SurveySubmission,
};
use crate::workflows::surveys::submissions::repository::{
    AlertNotifier, DissatisfactionAlert, NotificationError, RepositoryError, SurveyRecord,
    SurveyRepository,
};
use crate::workflows::surveys::submissions::{submission_router, SurveySubmissionService};

pub(super) fn submission_epoch() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 11, 3, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn metadata() -> SurveyMetadata {
    SurveyMetadata {
        client_code: "CLI-042".to_string(),
        client_name: "Distribuidora Aurora".to_string(),
        product_type: "Treinamento".to_string(),
        agent_name: "Marina Lopes".to_string(),
        // far enough out that router tests running on the wall clock agree
        // with service tests pinned to `submission_epoch`
        expires_at: Utc
            .with_ymd_and_hms(2099, 1, 1, 0, 0, 0)
            .single()
            .expect("valid timestamp"),
    }
}

pub(super) fn expired_metadata() -> SurveyMetadata {
    SurveyMetadata {
        expires_at: submission_epoch() - Duration::days(1),
        ..metadata()
    }
}

pub(super) fn analysis_config() -> AnalysisConfig {
    AnalysisConfig::default()
}

pub(super) fn raw(question: &str, value: &str) -> RawAnswer {
    RawAnswer {
        question: question.to_string(),
        value: value.to_string(),
    }
}

pub(super) fn dissatisfied_submission() -> SurveySubmission {
    SurveySubmission {
        answers: vec![
            raw("Nota geral", "3"),
            raw("Comentário", "Achei tudo muito confuso e perdi tempo"),
        ],
    }
}

pub(super) fn satisfied_submission() -> SurveySubmission {
    SurveySubmission {
        answers: vec![
            raw("Como avalia o atendimento?", "Muito Satisfeito"),
            raw("Você recomenda?", "Sim"),
        ],
    }
}

pub(super) fn typed_answers(submission: &SurveySubmission) -> Vec<Answer> {
    submission
        .answers
        .iter()
        .filter_map(|raw| Answer::from_form(&raw.question, &raw.value))
        .collect()
}

/// Deterministic classifier returning one scripted verdict and counting calls.
#[derive(Clone)]
pub(super) struct ScriptedClassifier {
    verdict: ClassifierVerdict,
    calls: Arc<AtomicUsize>,
}

impl ScriptedClassifier {
    pub(super) fn returning(label: SentimentLabel, confidence: f64) -> Self {
        Self {
            verdict: ClassifierVerdict {
                label,
                confidence,
                source: VerdictSource::RemoteModel,
            },
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub(super) fn neutral() -> Self {
        Self::returning(SentimentLabel::Neutral, 0.5)
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SentimentClassifier for ScriptedClassifier {
    async fn classify(&self, _text: &str) -> ClassifierVerdict {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.verdict.clone()
    }

    fn model_name(&self) -> &str {
        "scripted-model"
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<SurveyId, SurveyRecord>>>,
}

impl SurveyRepository for MemoryRepository {
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
        guard.insert(record.survey_id.clone(), record);
        Ok(())
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

pub(super) struct UnavailableRepository;

impl SurveyRepository for UnavailableRepository {
    fn insert(&self, _record: SurveyRecord) -> Result<SurveyRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: SurveyRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &SurveyId) -> Result<Option<SurveyRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn unanalyzed(&self, _limit: usize) -> Result<Vec<SurveyRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifier {
    events: Arc<Mutex<Vec<DissatisfactionAlert>>>,
}

impl MemoryNotifier {
    pub(super) fn events(&self) -> Vec<DissatisfactionAlert> {
        self.events.lock().expect("notifier mutex poisoned").clone()
    }
}

impl AlertNotifier for MemoryNotifier {
    fn notify(&self, alert: DissatisfactionAlert) -> Result<(), NotificationError> {
        self.events
            .lock()
            .expect("notifier mutex poisoned")
            .push(alert);
        Ok(())
    }
}

pub(super) struct FailingNotifier;

impl AlertNotifier for FailingNotifier {
    fn notify(&self, _alert: DissatisfactionAlert) -> Result<(), NotificationError> {
        Err(NotificationError::Transport("smtp unreachable".to_string()))
    }
}

pub(super) type TestService = SurveySubmissionService<MemoryRepository, MemoryNotifier, ScriptedClassifier>;

pub(super) fn build_service(
    classifier: ScriptedClassifier,
) -> (TestService, Arc<MemoryRepository>, Arc<MemoryNotifier>) {
    let repository = Arc::new(MemoryRepository::default());
    let notifier = Arc::new(MemoryNotifier::default());
    let service = SurveySubmissionService::new(
        repository.clone(),
        notifier.clone(),
        classifier,
        analysis_config(),
    );
    (service, repository, notifier)
}

pub(super) fn submission_router_with_service(service: TestService) -> axum::Router {
    submission_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
