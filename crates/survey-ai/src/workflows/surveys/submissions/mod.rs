//! Survey submission intake, hybrid sentiment scoring, and alerting.
//!
//! A submission flows through intake classification (each raw form value is
//! typed once), per-answer scoring, free-text reconciliation against the
//! remote classifier, and finally the alert gate. The repository and
//! notifier traits keep persistence and e-mail delivery behind seams.

pub mod analysis;
pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use analysis::{
    should_alert, AnalysisBreakdown, AnalysisConfig, AnalysisEngine, AnalysisOutcome,
    AnalysisWarning, ClassifierVerdict, HybridResult, KeywordLexicon, KeywordMatch,
    LocalKeywordClassifier, NumericAnswerScore, RemoteSentimentClassifier, RetryPolicy,
    SatisfactionAnswerScore, SentimentClassifier, SentimentLabel, SentimentVerdict,
    TextAnswerScore, VerdictSource, YesNoAnswerScore,
};
pub use domain::{
    Answer, AnswerKind, RawAnswer, SurveyId, SurveyMetadata, SurveyStatus, SurveySubmission,
    SATISFACTION_LABELS,
};
pub use repository::{
    AlertNotifier, AnalysisRecord, AnalysisView, DissatisfactionAlert, NotificationError,
    RepositoryError, SurveyRecord, SurveyRepository,
};
pub use router::submission_router;
pub use service::{ReprocessSummary, SubmissionServiceError, SurveySubmissionService};
