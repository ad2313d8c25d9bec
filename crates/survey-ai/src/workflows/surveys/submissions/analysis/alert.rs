use super::classifier::SentimentLabel;
use super::lexicon::KeywordMatch;
use super::AnalysisBreakdown;

/// Decide whether a scored survey warrants a dissatisfaction alert.
///
/// A negative narrative tone or a negative net point balance each trigger
/// on their own; the two signals are never required to agree.
pub fn should_alert(sentiment: SentimentLabel, total_score: i32) -> bool {
    sentiment == SentimentLabel::Negative || total_score <= -1
}

/// Build the human-readable rationale attached to negative results.
pub(crate) fn dissatisfaction_reason(
    breakdown: &AnalysisBreakdown,
    evidence: &KeywordMatch,
) -> String {
    let mut reasons = Vec::new();

    for _ in breakdown.text.iter().filter(|scored| scored.points < 0) {
        if evidence.negative_hits.is_empty() {
            reasons.push("Comentário com sentimento negativo".to_string());
        } else {
            let mentions: Vec<&str> = evidence
                .negative_hits
                .iter()
                .take(3)
                .map(String::as_str)
                .collect();
            reasons.push(format!("Mencionou: {}", mentions.join(", ")));
        }
    }

    let low_ratings: Vec<String> = breakdown
        .numeric
        .iter()
        .filter(|scored| scored.points < 0)
        .take(2)
        .map(|scored| format_rating(scored.value))
        .collect();
    if !low_ratings.is_empty() {
        reasons.push(format!("Notas baixas: {}", low_ratings.join(", ")));
    }

    let negative_labels: Vec<&str> = breakdown
        .satisfaction
        .iter()
        .filter(|scored| scored.points < 0)
        .take(2)
        .map(|scored| scored.answer.as_str())
        .collect();
    if !negative_labels.is_empty() {
        reasons.push(format!("Avaliou como: {}", negative_labels.join(", ")));
    }

    if reasons.is_empty() {
        "Sentimento negativo detectado".to_string()
    } else {
        reasons.join("; ")
    }
}

fn format_rating(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
