//! Keyword-bag emotion classifier.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Joy,
    Anger,
    Sadness,
    Fear,
    Surprise,
    Trust,
    Neutral,
}

impl Emotion {
    /// Scoring order; also the tie-break order.
    pub const SCORED: [Emotion; 6] = [
        Emotion::Joy,
        Emotion::Anger,
        Emotion::Sadness,
        Emotion::Fear,
        Emotion::Surprise,
        Emotion::Trust,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Emotion::Joy => "joy",
            Emotion::Anger => "anger",
            Emotion::Sadness => "sadness",
            Emotion::Fear => "fear",
            Emotion::Surprise => "surprise",
            Emotion::Trust => "trust",
            Emotion::Neutral => "neutral",
        }
    }

    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Emotion::Joy => &["good", "great", "love", "happy", "excellent", "fantastic", "amazing", "wonderful", "brilliant", "awesome"],
            Emotion::Anger => &["angry", "furious", "hate", "bad", "terrible", "awful", "horrible", "disgusting", "annoyed", "frustrated"],
            Emotion::Sadness => &["sad", "depressed", "unhappy", "disappointed", "grief", "suffering", "miserable", "tragic", "sorry"],
            Emotion::Fear => &["afraid", "scared", "worried", "anxious", "nervous", "concerned", "frightened", "terrified", "panic"],
            Emotion::Surprise => &["surprised", "shocked", "amazed", "unexpected", "shocking", "astonishing", "astounded", "bewildered"],
            Emotion::Trust => &["confident", "trusted", "reliable", "secure", "believe", "faith", "assured", "safe", "certain"],
            Emotion::Neutral => &[],
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Emotion {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let low = s.trim().to_lowercase();
        Emotion::SCORED
            .into_iter()
            .chain([Emotion::Neutral])
            .find(|e| e.as_str() == low)
            .ok_or_else(|| format!("unknown emotion: {s}"))
    }
}

/// Number of distinct keywords of each scored emotion found as substrings.
pub fn emotion_scores(text: &str) -> [(Emotion, usize); 6] {
    let lower = text.to_lowercase();
    Emotion::SCORED.map(|e| (e, e.keywords().iter().filter(|kw| lower.contains(*kw)).count()))
}

/// Argmax over `emotion_scores`; the earliest emotion wins ties, all-zero is neutral.
pub fn detect_emotion(text: &str) -> Emotion {
    if text.trim().is_empty() {
        return Emotion::Neutral;
    }
    let mut best = (Emotion::Neutral, 0usize);
    for (e, n) in emotion_scores(text) {
        if n > best.1 {
            best = (e, n);
        }
    }
    best.0
}
