//! Built-in polarity/subjectivity lexicon for `LexiconScorer`.
//!
//! Each entry is `(word, polarity, subjectivity)`; polarity in [-1, 1],
//! subjectivity in [0, 1]. Words are matched as whole lowercase tokens.

use ahash::AHashMap;
use std::sync::OnceLock;

pub const ENTRIES: &[(&str, f64, f64)] = &[
    // favourable
    ("good", 0.7, 0.6),
    ("great", 0.8, 0.75),
    ("best", 1.0, 0.3),
    ("better", 0.5, 0.5),
    ("nice", 0.6, 1.0),
    ("love", 0.5, 0.6),
    ("loved", 0.7, 0.8),
    ("lovely", 0.5, 0.75),
    ("happy", 0.8, 1.0),
    ("glad", 0.5, 1.0),
    ("excellent", 1.0, 1.0),
    ("fantastic", 0.4, 0.9),
    ("amazing", 0.6, 0.9),
    ("awesome", 1.0, 1.0),
    ("wonderful", 1.0, 1.0),
    ("brilliant", 0.9, 1.0),
    ("beautiful", 0.85, 1.0),
    ("perfect", 1.0, 1.0),
    ("delicious", 1.0, 1.0),
    ("tasty", 0.6, 0.8),
    ("fresh", 0.3, 0.5),
    ("clean", 0.37, 0.69),
    ("safe", 0.5, 0.5),
    ("secure", 0.4, 0.6),
    ("friendly", 0.375, 0.5),
    ("helpful", 0.4, 0.4),
    ("kind", 0.6, 0.9),
    ("easy", 0.43, 0.83),
    ("fine", 0.42, 0.5),
    ("interesting", 0.5, 0.5),
    ("fun", 0.3, 0.2),
    ("enjoyed", 0.4, 0.5),
    ("cheap", 0.4, 0.7),
    ("affordable", 0.3, 0.6),
    ("free", 0.4, 0.8),
    ("recommended", 0.4, 0.5),
    ("reliable", 0.5, 0.6),
    ("quick", 0.33, 0.5),
    ("fast", 0.2, 0.6),
    ("comfortable", 0.4, 0.75),
    ("peaceful", 0.5, 0.8),
    ("calm", 0.3, 0.75),
    ("popular", 0.6, 0.8),
    ("cool", 0.35, 0.65),
    ("proud", 0.8, 1.0),
    ("success", 0.3, 0.0),
    ("successful", 0.75, 0.95),
    ("thanks", 0.2, 0.2),
    ("thank", 0.2, 0.2),
    ("important", 0.4, 1.0),
    ("special", 0.36, 0.57),
    ("large", 0.21, 0.43),
    ("big", 0.0, 0.1),
    ("new", 0.136, 0.455),
    ("first", 0.25, 0.33),
    ("real", 0.2, 0.3),
    ("available", 0.4, 0.4),
    ("sure", 0.5, 0.89),
    ("hopeful", 0.3, 0.6),
    ("positive", 0.23, 0.55),
    // critical
    ("bad", -0.7, 0.67),
    ("worse", -0.4, 0.6),
    ("worst", -1.0, 1.0),
    ("terrible", -1.0, 1.0),
    ("horrible", -1.0, 1.0),
    ("awful", -1.0, 1.0),
    ("disgusting", -1.0, 1.0),
    ("poor", -0.4, 0.6),
    ("sad", -0.5, 1.0),
    ("unhappy", -0.6, 0.9),
    ("angry", -0.5, 1.0),
    ("annoying", -0.8, 0.9),
    ("annoyed", -0.4, 0.6),
    ("frustrated", -0.7, 0.7),
    ("frustrating", -0.4, 0.7),
    ("stupid", -0.8, 1.0),
    ("dumb", -0.375, 0.5),
    ("wrong", -0.5, 0.9),
    ("hard", -0.29, 0.54),
    ("difficult", -0.5, 1.0),
    ("expensive", -0.5, 0.7),
    ("dirty", -0.6, 0.8),
    ("dangerous", -0.6, 0.9),
    ("unsafe", -0.5, 0.5),
    ("risky", -0.3, 0.6),
    ("scary", -0.5, 1.0),
    ("afraid", -0.6, 0.9),
    ("worried", -0.4, 0.7),
    ("anxious", -0.25, 0.75),
    ("slow", -0.3, 0.4),
    ("broken", -0.4, 0.4),
    ("crowded", -0.3, 0.5),
    ("noisy", -0.4, 0.6),
    ("polluted", -0.6, 0.7),
    ("corrupt", -0.5, 0.5),
    ("useless", -0.5, 0.2),
    ("fake", -0.5, 1.0),
    ("rude", -0.3, 0.6),
    ("sick", -0.71, 0.86),
    ("miserable", -1.0, 1.0),
    ("disappointed", -0.75, 0.75),
    ("disappointing", -0.6, 0.7),
    ("tragic", -0.75, 0.75),
    ("sorry", -0.5, 1.0),
    ("hate", -0.8, 0.9),
    ("crazy", -0.6, 0.9),
    ("impossible", -0.67, 1.0),
    ("unfair", -0.5, 0.9),
    ("painful", -0.7, 0.9),
    ("weird", -0.5, 1.0),
    ("serious", -0.33, 0.67),
    ("old", 0.1, 0.2),
    ("last", 0.0, 0.067),
    ("negative", -0.3, 0.4),
    ("problem", -0.1, 0.2),
];

/// Multipliers applied to the next assessed word.
pub const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("really", 1.2),
    ("extremely", 1.5),
    ("incredibly", 1.5),
    ("super", 1.3),
    ("so", 1.2),
    ("too", 1.2),
    ("highly", 1.4),
    ("quite", 1.1),
    ("totally", 1.3),
    ("absolutely", 1.5),
    ("pretty", 1.1),
    ("most", 1.2),
    ("slightly", 0.6),
    ("somewhat", 0.7),
    ("barely", 0.5),
];

pub const NEGATORS: &[&str] = &["not", "never", "no", "nothing", "neither", "nor", "without", "hardly"];

pub fn lookup(word: &str) -> Option<(f64, f64)> {
    static MAP: OnceLock<AHashMap<&'static str, (f64, f64)>> = OnceLock::new();
    MAP.get_or_init(|| ENTRIES.iter().map(|&(w, p, s)| (w, (p, s))).collect())
        .get(word)
        .copied()
}

pub fn intensity(word: &str) -> Option<f64> {
    INTENSIFIERS.iter().find(|(w, _)| *w == word).map(|&(_, f)| f)
}

pub fn is_negator(word: &str) -> bool {
    NEGATORS.contains(&word) || word.ends_with("n't")
}
