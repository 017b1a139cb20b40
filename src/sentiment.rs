//! Polarity/subjectivity scoring and the positive/neutral/negative label.
//!
//! `PolarityScorer` is the seam for any scoring backend; `LexiconScorer` is the
//! built-in one. Callers go through `analyze_sentiment`, which never fails: empty
//! text and scorer errors both collapse to the neutral default.

use crate::lexicon;
use anyhow::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

pub const POSITIVE_THRESHOLD: f64 = 0.1;
pub const NEGATIVE_THRESHOLD: f64 = -0.1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative];

    pub fn as_str(self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "positive" => Ok(Sentiment::Positive),
            "neutral" => Ok(Sentiment::Neutral),
            "negative" => Ok(Sentiment::Negative),
            other => Err(format!("unknown sentiment: {other}")),
        }
    }
}

/// `> 0.1` positive, `< -0.1` negative, otherwise neutral.
pub fn label_for(polarity: f64) -> Sentiment {
    if polarity > POSITIVE_THRESHOLD {
        Sentiment::Positive
    } else if polarity < NEGATIVE_THRESHOLD {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SentimentScore {
    pub polarity: f64,
    pub subjectivity: f64,
    pub sentiment: Sentiment,
}

impl SentimentScore {
    pub const NEUTRAL: SentimentScore = SentimentScore { polarity: 0.0, subjectivity: 0.0, sentiment: Sentiment::Neutral };
}

/// Maps text to `(polarity, subjectivity)`.
pub trait PolarityScorer: Send + Sync {
    fn score(&self, text: &str) -> Result<(f64, f64)>;
}

/// Score `text` and attach the label. Never fails.
pub fn analyze_sentiment(scorer: &dyn PolarityScorer, text: &str) -> SentimentScore {
    if text.trim().is_empty() {
        return SentimentScore::NEUTRAL;
    }
    match scorer.score(text) {
        Ok((p, s)) if p.is_finite() && s.is_finite() => {
            let polarity = p.clamp(-1.0, 1.0);
            SentimentScore { polarity, subjectivity: s.clamp(0.0, 1.0), sentiment: label_for(polarity) }
        }
        Ok(_) => SentimentScore::NEUTRAL,
        Err(e) => {
            tracing::debug!("polarity scorer failed, using neutral default: {e:#}");
            SentimentScore::NEUTRAL
        }
    }
}

/// Lexicon scorer: averages the polarity/subjectivity of every assessed word.
///
/// - an intensifier multiplies the next assessed word (`very good` > `good`)
/// - a negator within the two preceding tokens flips polarity at half strength
/// - `!` right after an assessment boosts its polarity by 25%
#[derive(Clone, Debug, Default)]
pub struct LexiconScorer;

const NEGATION_REACH: u8 = 2;

fn token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[a-z]+(?:'[a-z]+)?|!").expect("static regex"))
}

impl PolarityScorer for LexiconScorer {
    fn score(&self, text: &str) -> Result<(f64, f64)> {
        let lower = text.to_lowercase().replace('\u{2019}', "'");
        let mut assessments: Vec<(f64, f64)> = Vec::new();
        let mut negate_left: u8 = 0;
        let mut intensity = 1.0f64;
        let mut last_was_assessment = false;

        for m in token_re().find_iter(&lower) {
            let tok = m.as_str();
            if tok == "!" {
                if last_was_assessment {
                    if let Some(last) = assessments.last_mut() {
                        last.0 = (last.0 * 1.25).clamp(-1.0, 1.0);
                    }
                }
                continue;
            }
            if lexicon::is_negator(tok) {
                negate_left = NEGATION_REACH + 1;
                last_was_assessment = false;
                continue;
            }
            if let Some(f) = lexicon::intensity(tok) {
                intensity *= f;
                last_was_assessment = false;
                continue;
            }
            if let Some((p, s)) = lexicon::lookup(tok) {
                let mut polarity = p * intensity;
                let subjectivity = s * intensity;
                if negate_left > 0 {
                    polarity *= -0.5;
                }
                assessments.push((polarity.clamp(-1.0, 1.0), subjectivity.clamp(0.0, 1.0)));
                negate_left = 0;
                intensity = 1.0;
                last_was_assessment = true;
                continue;
            }
            // ordinary word: intensifiers only bind to the adjacent word
            intensity = 1.0;
            negate_left = negate_left.saturating_sub(1);
            last_was_assessment = false;
        }

        if assessments.is_empty() {
            return Ok((0.0, 0.0));
        }
        let n = assessments.len() as f64;
        let polarity = assessments.iter().map(|a| a.0).sum::<f64>() / n;
        let subjectivity = assessments.iter().map(|a| a.1).sum::<f64>() / n;
        Ok((polarity.clamp(-1.0, 1.0), subjectivity.clamp(0.0, 1.0)))
    }
}
