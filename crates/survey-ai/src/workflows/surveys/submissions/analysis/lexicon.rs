use serde::{Deserialize, Serialize};

/// Phrases that signal dissatisfaction in free-text answers.
static NEGATIVE_PHRASES: &[&str] = &[
    "confuso",
    "difícil",
    "não entendi",
    "perdido",
    "mal explicado",
    "desorganizado",
    "ruim",
    "péssimo",
    "horrível",
    "terrível",
    "perdi tempo",
    "decepcionante",
    "frustante",
    "chato",
    "não recomendo",
    "muito técnico",
    "muito rápido",
    "muito lento",
    "não consegui",
    "não aprendi",
    "inútil",
    "fraco",
];

/// Phrases that signal satisfaction in free-text answers.
static POSITIVE_PHRASES: &[&str] = &[
    "excelente",
    "ótimo",
    "muito bom",
    "perfeito",
    "maravilhoso",
    "claro",
    "útil",
    "aprendi",
    "recomendo",
    "fantástico",
    "didático",
    "objetivo",
    "prático",
    "esclarecedor",
    "valeu a pena",
    "superou expectativas",
    "adorei",
];

/// Hits found by scanning one text against the lexicon.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordMatch {
    pub positive_hits: Vec<String>,
    pub negative_hits: Vec<String>,
}

impl KeywordMatch {
    /// Net keyword signal: positive hits minus negative hits.
    pub fn score(&self) -> i32 {
        self.positive_hits.len() as i32 - self.negative_hits.len() as i32
    }
}

/// Immutable satisfaction/dissatisfaction phrase lists.
///
/// Matching is plain case-insensitive substring search: phrases are not
/// mutually exclusive and no word boundaries are enforced.
#[derive(Debug, Clone, Copy)]
pub struct KeywordLexicon {
    negative: &'static [&'static str],
    positive: &'static [&'static str],
}

impl Default for KeywordLexicon {
    fn default() -> Self {
        Self {
            negative: NEGATIVE_PHRASES,
            positive: POSITIVE_PHRASES,
        }
    }
}

impl KeywordLexicon {
    pub fn scan(&self, text: &str) -> KeywordMatch {
        let lowered = text.to_lowercase();

        let negative_hits = self
            .negative
            .iter()
            .filter(|phrase| lowered.contains(*phrase))
            .map(|phrase| phrase.to_string())
            .collect();

        let positive_hits = self
            .positive
            .iter()
            .filter(|phrase| lowered.contains(*phrase))
            .map(|phrase| phrase.to_string())
            .collect();

        KeywordMatch {
            positive_hits,
            negative_hits,
        }
    }
}
