use serde::{Deserialize, Serialize};

use super::classifier::{ClassifierVerdict, SentimentLabel, VerdictSource};
use super::config::AnalysisConfig;
use super::lexicon::KeywordMatch;

/// Final sentiment for one text after merging both signals.
///
/// `evidence` keeps the raw keyword hits for audits and alert rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentVerdict {
    pub sentiment: SentimentLabel,
    pub confidence: f64,
    pub evidence: KeywordMatch,
    pub source: VerdictSource,
}

/// Merge the keyword signal with the classifier verdict.
///
/// Keyword evidence only wins when it is strong (net hits at the dominance
/// threshold) or when a weakly-confident classifier is contradicted by it;
/// a confident classifier disagreement is never overridden.
pub(crate) fn reconcile(
    keywords: KeywordMatch,
    verdict: &ClassifierVerdict,
    config: &AnalysisConfig,
) -> SentimentVerdict {
    let score = keywords.score();

    if score.abs() >= config.keyword_dominance {
        let sentiment = if score > 0 {
            SentimentLabel::Positive
        } else {
            SentimentLabel::Negative
        };
        let confidence =
            (verdict.confidence + config.confidence_boost).clamp(0.0, config.confidence_cap);
        return SentimentVerdict {
            sentiment,
            confidence,
            evidence: keywords,
            source: verdict.source,
        };
    }

    let contradicted_weakly = verdict.confidence < config.weak_confidence
        && ((score > 0 && verdict.label == SentimentLabel::Negative)
            || (score < 0 && verdict.label == SentimentLabel::Positive));
    if contradicted_weakly {
        return SentimentVerdict {
            sentiment: SentimentLabel::Neutral,
            confidence: 0.6,
            evidence: keywords,
            source: verdict.source,
        };
    }

    SentimentVerdict {
        sentiment: verdict.label,
        confidence: verdict.confidence.clamp(0.0, 1.0),
        evidence: keywords,
        source: verdict.source,
    }
}
