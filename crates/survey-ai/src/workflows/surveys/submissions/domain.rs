use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for survey links handed to clients.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurveyId(pub String);

/// The five labels a satisfaction-scale widget can submit.
pub const SATISFACTION_LABELS: [&str; 5] = [
    "Muito Insatisfeito",
    "Insatisfeito",
    "Neutro",
    "Satisfeito",
    "Muito Satisfeito",
];

/// Survey context captured when an agent generates the link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyMetadata {
    pub client_code: String,
    pub client_name: String,
    pub product_type: String,
    pub agent_name: String,
    pub expires_at: DateTime<Utc>,
}

/// High level status tracked for a survey link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurveyStatus {
    Open,
    Answered,
    Expired,
}

impl SurveyStatus {
    pub const fn label(self) -> &'static str {
        match self {
            SurveyStatus::Open => "open",
            SurveyStatus::Answered => "answered",
            SurveyStatus::Expired => "expired",
        }
    }
}

/// One raw question/value pair as posted by the client form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAnswer {
    pub question: String,
    pub value: String,
}

/// Payload submitted when a client completes a survey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveySubmission {
    pub answers: Vec<RawAnswer>,
}

/// The four shapes a survey answer can take.
///
/// The kind is decided once at intake, from the value itself, and never
/// re-derived during scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerKind {
    FreeText,
    NumericScale,
    SatisfactionScale,
    YesNo,
}

impl AnswerKind {
    /// Classify a non-empty form value by its shape and content.
    pub fn classify(value: &str) -> Self {
        if has_numeric_shape(value) {
            return AnswerKind::NumericScale;
        }
        if SATISFACTION_LABELS.contains(&value) {
            return AnswerKind::SatisfactionScale;
        }
        if matches!(
            value.to_lowercase().as_str(),
            "sim" | "não" | "yes" | "no"
        ) {
            return AnswerKind::YesNo;
        }
        AnswerKind::FreeText
    }
}

fn has_numeric_shape(value: &str) -> bool {
    let digits: String = value.chars().filter(|c| !matches!(c, '.' | ',')).collect();
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

/// A typed answer ready for scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub question_text: String,
    pub kind: AnswerKind,
    pub raw_value: String,
}

impl Answer {
    /// Build a typed answer from a raw form pair; blank values are dropped.
    pub fn from_form(question: &str, value: &str) -> Option<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self {
            question_text: question.trim().to_string(),
            kind: AnswerKind::classify(trimmed),
            raw_value: trimmed.to_string(),
        })
    }
}
