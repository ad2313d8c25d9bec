use super::config::AnalysisConfig;

/// Question contexts where "não" is the bad answer.
static NORMAL_CONTEXTS: &[&str] = &[
    "recomenda",
    "satisfeito",
    "atendeu",
    "gostou",
    "aprovou",
    "valeu",
    "útil",
    "claro",
    "entendeu",
];

/// Question contexts where "sim" is the bad answer.
static INVERSE_CONTEXTS: &[&str] = &["dificuldade", "problema", "confuso", "difícil"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum YesNo {
    Sim,
    Nao,
}

fn parse_yes_no(raw: &str) -> Option<YesNo> {
    match raw.trim().to_lowercase().as_str() {
        "sim" | "yes" => Some(YesNo::Sim),
        "não" | "nao" | "no" => Some(YesNo::Nao),
        _ => None,
    }
}

/// Convert a 0-10 rating into points; malformed input yields `None`.
pub(crate) fn score_numeric(raw: &str, config: &AnalysisConfig) -> Option<(f64, i32)> {
    let value: f64 = raw.trim().replace(',', ".").parse().ok()?;
    let points = if value <= config.low_score_max {
        -1
    } else if value >= config.high_score_min {
        1
    } else {
        0
    };
    Some((value, points))
}

/// Convert a satisfaction-scale label into points.
///
/// Unknown labels score zero, matching the tolerant handling of survey data.
pub(crate) fn score_satisfaction(raw: &str) -> i32 {
    match raw.trim() {
        "Muito Insatisfeito" | "Insatisfeito" => -1,
        "Satisfeito" | "Muito Satisfeito" => 1,
        _ => 0,
    }
}

/// Score a yes/no answer from the context of its question.
///
/// Questions matching neither context list score zero regardless of the
/// answer, since the polarity of the question is unknown.
pub(crate) fn score_yes_no(question: &str, raw: &str) -> i32 {
    let Some(answer) = parse_yes_no(raw) else {
        return 0;
    };

    let question_lower = question.to_lowercase();
    let inverse = INVERSE_CONTEXTS
        .iter()
        .any(|context| question_lower.contains(context));
    let normal = NORMAL_CONTEXTS
        .iter()
        .any(|context| question_lower.contains(context));

    if inverse {
        match answer {
            YesNo::Sim => -1,
            YesNo::Nao => 1,
        }
    } else if normal {
        match answer {
            YesNo::Sim => 1,
            YesNo::Nao => -1,
        }
    } else {
        0
    }
}
