use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::lexicon::{KeywordLexicon, KeywordMatch};
use crate::config::ClassifierConfig;

/// Normalized texts shorter than this skip classification entirely.
const MIN_CLASSIFIABLE_CHARS: usize = 3;

static MARKUP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));
static SYMBOL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s.,!?;:()-]").expect("valid regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Strip markup and stray symbols, collapse whitespace, trim.
pub(crate) fn normalize_text(text: &str) -> String {
    let without_markup = MARKUP_RE.replace_all(text, "");
    let cleaned = SYMBOL_RE.replace_all(&without_markup, " ");
    let collapsed = WHITESPACE_RE.replace_all(&cleaned, " ");
    collapsed.trim().to_string()
}

/// Sentiment label space shared across the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    pub const fn label(self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
        }
    }

    fn from_remote(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "positive" => SentimentLabel::Positive,
            "negative" => SentimentLabel::Negative,
            _ => SentimentLabel::Neutral,
        }
    }
}

/// Where a classification verdict came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictSource {
    RemoteModel,
    LocalFallback,
}

/// Outcome of one classification call, remote or fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierVerdict {
    pub label: SentimentLabel,
    pub confidence: f64,
    pub source: VerdictSource,
}

impl ClassifierVerdict {
    fn short_text() -> Self {
        Self {
            label: SentimentLabel::Neutral,
            confidence: 0.5,
            source: VerdictSource::LocalFallback,
        }
    }
}

/// Keyword-only verdict used whenever the remote service cannot answer.
pub fn fallback_verdict(keywords: &KeywordMatch) -> ClassifierVerdict {
    let score = keywords.score();
    let (label, confidence) = if score >= 2 {
        (SentimentLabel::Positive, 0.8)
    } else if score <= -2 {
        (SentimentLabel::Negative, 0.8)
    } else {
        (SentimentLabel::Neutral, 0.6)
    };

    ClassifierVerdict {
        label,
        confidence,
        source: VerdictSource::LocalFallback,
    }
}

/// Sentiment classification boundary.
///
/// Implementations are infallible by contract: transport problems must
/// degrade to a fallback verdict, never surface to the caller.
#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> ClassifierVerdict;

    /// Marker persisted with each analysis to record which model decided.
    fn model_name(&self) -> &str;
}

/// Bounded retry schedule for the remote call.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Same attempt budget without sleeping, for tests.
    pub fn without_delay(max_attempts: u32) -> Self {
        Self::new(max_attempts, Duration::ZERO)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(5))
    }
}

#[derive(Debug, thiserror::Error)]
enum RemoteCallError {
    #[error("transport failure: {0}")]
    Transport(reqwest::Error),
    #[error("service returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("unparseable payload: {0}")]
    Payload(reqwest::Error),
}

#[derive(Debug, Serialize)]
struct ClassifyRequest<'a> {
    model: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct ClassifyResponse {
    label: String,
    confidence: f64,
}

/// Adapter for the remote sentiment classification service.
pub struct RemoteSentimentClassifier {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    retry: RetryPolicy,
    lexicon: KeywordLexicon,
}

impl RemoteSentimentClassifier {
    pub fn new(
        endpoint: String,
        model: String,
        timeout: Duration,
        retry: RetryPolicy,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            model,
            retry,
            lexicon: KeywordLexicon::default(),
        })
    }

    pub fn from_config(config: &ClassifierConfig) -> Result<Self, reqwest::Error> {
        Self::new(
            config.endpoint.clone(),
            config.model.clone(),
            config.request_timeout(),
            RetryPolicy::new(config.max_attempts, config.retry_delay()),
        )
    }

    async fn request(&self, text: &str) -> Result<ClassifierVerdict, RemoteCallError> {
        let payload = ClassifyRequest {
            model: &self.model,
            text,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(RemoteCallError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteCallError::Status(status));
        }

        let parsed = response
            .json::<ClassifyResponse>()
            .await
            .map_err(RemoteCallError::Payload)?;

        Ok(ClassifierVerdict {
            label: SentimentLabel::from_remote(&parsed.label),
            confidence: parsed.confidence.clamp(0.0, 1.0),
            source: VerdictSource::RemoteModel,
        })
    }
}

#[async_trait]
impl SentimentClassifier for RemoteSentimentClassifier {
    async fn classify(&self, text: &str) -> ClassifierVerdict {
        let normalized = normalize_text(text);
        if normalized.chars().count() < MIN_CLASSIFIABLE_CHARS {
            debug!("text below classification threshold, returning neutral verdict");
            return ClassifierVerdict::short_text();
        }

        for attempt in 1..=self.retry.max_attempts {
            match self.request(&normalized).await {
                Ok(verdict) => {
                    debug!(attempt, label = verdict.label.label(), "remote classification succeeded");
                    return verdict;
                }
                Err(err) => {
                    warn!(
                        attempt,
                        max_attempts = self.retry.max_attempts,
                        error = %err,
                        "remote classification attempt failed"
                    );
                    if attempt < self.retry.max_attempts {
                        tokio::time::sleep(self.retry.delay).await;
                    }
                }
            }
        }

        warn!("remote classification exhausted retries, using keyword fallback");
        fallback_verdict(&self.lexicon.scan(&normalized))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Offline classifier backed purely by the keyword lexicon.
///
/// Used by the CLI demo and anywhere the remote service is undesirable.
#[derive(Debug, Clone)]
pub struct LocalKeywordClassifier {
    lexicon: KeywordLexicon,
    model: String,
}

impl Default for LocalKeywordClassifier {
    fn default() -> Self {
        Self {
            lexicon: KeywordLexicon::default(),
            model: "keyword-lexicon".to_string(),
        }
    }
}

#[async_trait]
impl SentimentClassifier for LocalKeywordClassifier {
    async fn classify(&self, text: &str) -> ClassifierVerdict {
        let normalized = normalize_text(text);
        if normalized.chars().count() < MIN_CLASSIFIABLE_CHARS {
            return ClassifierVerdict::short_text();
        }
        fallback_verdict(&self.lexicon.scan(&normalized))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_markup_and_collapses_whitespace() {
        let normalized = normalize_text("  <b>Muito</b>   bom!\n Recomendo © demais  ");
        assert_eq!(normalized, "Muito bom! Recomendo demais");
    }

    #[test]
    fn remote_labels_outside_the_space_map_to_neutral() {
        assert_eq!(SentimentLabel::from_remote("POSITIVE"), SentimentLabel::Positive);
        assert_eq!(SentimentLabel::from_remote("negative"), SentimentLabel::Negative);
        assert_eq!(SentimentLabel::from_remote("mixed"), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_remote(""), SentimentLabel::Neutral);
    }

    #[test]
    fn fallback_follows_keyword_thresholds() {
        let lexicon = KeywordLexicon::default();

        let strong_negative = fallback_verdict(&lexicon.scan("confuso e inútil"));
        assert_eq!(strong_negative.label, SentimentLabel::Negative);
        assert_eq!(strong_negative.confidence, 0.8);
        assert_eq!(strong_negative.source, VerdictSource::LocalFallback);

        let strong_positive = fallback_verdict(&lexicon.scan("excelente e didático"));
        assert_eq!(strong_positive.label, SentimentLabel::Positive);
        assert_eq!(strong_positive.confidence, 0.8);

        let weak = fallback_verdict(&lexicon.scan("achei ruim"));
        assert_eq!(weak.label, SentimentLabel::Neutral);
        assert_eq!(weak.confidence, 0.6);
    }

    #[tokio::test]
    async fn local_classifier_short_circuits_tiny_text() {
        let classifier = LocalKeywordClassifier::default();
        let verdict = classifier.classify("ok").await;
        assert_eq!(verdict.label, SentimentLabel::Neutral);
        assert_eq!(verdict.confidence, 0.5);
        assert_eq!(verdict.source, VerdictSource::LocalFallback);
    }
}
