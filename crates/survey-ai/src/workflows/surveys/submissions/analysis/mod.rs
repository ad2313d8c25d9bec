mod alert;
mod config;
mod lexicon;
mod reconciler;
mod scoring;

pub mod classifier;

pub use alert::should_alert;
pub use classifier::{
    fallback_verdict, ClassifierVerdict, LocalKeywordClassifier, RemoteSentimentClassifier,
    RetryPolicy, SentimentClassifier, SentimentLabel, VerdictSource,
};
pub use config::AnalysisConfig;
pub use lexicon::{KeywordLexicon, KeywordMatch};
pub use reconciler::SentimentVerdict;

use serde::{Deserialize, Serialize};

use super::domain::{Answer, AnswerKind};

/// Hybrid sentiment engine for one survey response.
///
/// Stateless apart from configuration: every [`analyze`](Self::analyze) call
/// owns its own accumulators, so concurrent submissions never contend.
pub struct AnalysisEngine<C> {
    config: AnalysisConfig,
    lexicon: KeywordLexicon,
    classifier: C,
}

impl<C> AnalysisEngine<C>
where
    C: SentimentClassifier,
{
    pub fn new(classifier: C, config: AnalysisConfig) -> Self {
        Self {
            config,
            lexicon: KeywordLexicon::default(),
            classifier,
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn model_name(&self) -> &str {
        self.classifier.model_name()
    }

    /// Reconcile the keyword signal and the classifier verdict for one text.
    pub async fn reconcile_text(&self, text: &str) -> SentimentVerdict {
        let verdict = self.classifier.classify(text).await;
        let keywords = self.lexicon.scan(&classifier::normalize_text(text));
        reconciler::reconcile(keywords, &verdict, &self.config)
    }

    /// Score every answer and consolidate the free-text narrative.
    ///
    /// Never fails: malformed input and classifier fallbacks degrade into
    /// warnings while the result is still produced.
    pub async fn analyze(&self, answers: &[Answer]) -> AnalysisOutcome {
        let mut total_score = 0;
        let mut consolidated_parts: Vec<&str> = Vec::new();
        let mut breakdown = AnalysisBreakdown::default();
        let mut warnings = Vec::new();

        for answer in answers {
            match answer.kind {
                AnswerKind::FreeText => {
                    let trimmed = answer.raw_value.trim();
                    if trimmed.chars().count() <= self.config.short_text_limit {
                        continue;
                    }

                    let verdict = self.reconcile_text(&answer.raw_value).await;
                    if verdict.source == VerdictSource::LocalFallback {
                        warnings.push(AnalysisWarning::ClassifierFallback {
                            stage: answer.question_text.clone(),
                        });
                    }

                    let points = points_for(verdict.sentiment);
                    total_score += points;
                    consolidated_parts.push(&answer.raw_value);
                    breakdown.text.push(TextAnswerScore {
                        question: answer.question_text.clone(),
                        text: answer.raw_value.clone(),
                        sentiment: verdict.sentiment,
                        confidence: verdict.confidence,
                        source: verdict.source,
                        points,
                    });
                }
                AnswerKind::NumericScale => {
                    match scoring::score_numeric(&answer.raw_value, &self.config) {
                        Some((value, points)) => {
                            total_score += points;
                            breakdown.numeric.push(NumericAnswerScore {
                                question: answer.question_text.clone(),
                                value,
                                points,
                            });
                        }
                        None => warnings.push(AnalysisWarning::MalformedNumeric {
                            question: answer.question_text.clone(),
                            raw: answer.raw_value.clone(),
                        }),
                    }
                }
                AnswerKind::SatisfactionScale => {
                    let points = scoring::score_satisfaction(&answer.raw_value);
                    total_score += points;
                    breakdown.satisfaction.push(SatisfactionAnswerScore {
                        question: answer.question_text.clone(),
                        answer: answer.raw_value.clone(),
                        points,
                    });
                }
                AnswerKind::YesNo => {
                    let points = scoring::score_yes_no(&answer.question_text, &answer.raw_value);
                    total_score += points;
                    breakdown.yes_no.push(YesNoAnswerScore {
                        question: answer.question_text.clone(),
                        answer: answer.raw_value.clone(),
                        points,
                    });
                }
            }
        }

        let consolidated_text = consolidated_parts.join(" ");

        let (overall_sentiment, overall_confidence, evidence) =
            if consolidated_text.trim().is_empty() {
                (SentimentLabel::Neutral, 0.5, KeywordMatch::default())
            } else {
                let verdict = self.reconcile_text(&consolidated_text).await;
                if verdict.source == VerdictSource::LocalFallback {
                    warnings.push(AnalysisWarning::ClassifierFallback {
                        stage: "consolidated text".to_string(),
                    });
                }
                (verdict.sentiment, verdict.confidence, verdict.evidence)
            };

        let dissatisfaction_reason = if overall_sentiment == SentimentLabel::Negative {
            Some(alert::dissatisfaction_reason(&breakdown, &evidence))
        } else {
            None
        };

        let should_alert = alert::should_alert(overall_sentiment, total_score);

        AnalysisOutcome {
            result: HybridResult {
                overall_sentiment,
                overall_confidence,
                total_score,
                consolidated_text,
                dissatisfaction_reason,
                should_alert,
                breakdown,
            },
            warnings,
        }
    }
}

fn points_for(sentiment: SentimentLabel) -> i32 {
    match sentiment {
        SentimentLabel::Positive => 1,
        SentimentLabel::Negative => -1,
        SentimentLabel::Neutral => 0,
    }
}

/// Survey-level aggregate produced once per submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HybridResult {
    pub overall_sentiment: SentimentLabel,
    pub overall_confidence: f64,
    pub total_score: i32,
    pub consolidated_text: String,
    pub dissatisfaction_reason: Option<String>,
    pub should_alert: bool,
    pub breakdown: AnalysisBreakdown,
}

/// Result plus the diagnostics gathered along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOutcome {
    pub result: HybridResult,
    pub warnings: Vec<AnalysisWarning>,
}

/// Per-kind audit trail kept for rationale building and alert rendering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisBreakdown {
    pub text: Vec<TextAnswerScore>,
    pub numeric: Vec<NumericAnswerScore>,
    pub satisfaction: Vec<SatisfactionAnswerScore>,
    pub yes_no: Vec<YesNoAnswerScore>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextAnswerScore {
    pub question: String,
    pub text: String,
    pub sentiment: SentimentLabel,
    pub confidence: f64,
    pub source: VerdictSource,
    pub points: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericAnswerScore {
    pub question: String,
    pub value: f64,
    pub points: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SatisfactionAnswerScore {
    pub question: String,
    pub answer: String,
    pub points: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YesNoAnswerScore {
    pub question: String,
    pub answer: String,
    pub points: i32,
}

/// Non-fatal problems observed while scoring one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisWarning {
    MalformedNumeric { question: String, raw: String },
    ClassifierFallback { stage: String },
}

impl AnalysisWarning {
    pub fn summary(&self) -> String {
        match self {
            AnalysisWarning::MalformedNumeric { question, raw } => {
                format!("unparseable numeric answer '{raw}' for '{question}'")
            }
            AnalysisWarning::ClassifierFallback { stage } => {
                format!("classifier fell back to keyword heuristic for '{stage}'")
            }
        }
    }
}
