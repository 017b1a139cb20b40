//! Word frequency over titles and bodies.

use ahash::{AHashMap, AHashSet};
use regex::Regex;
use std::sync::OnceLock;

/// English function words plus the very common request verbs found in city threads.
pub const STOPWORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "is", "was",
    "are", "be", "been", "being", "have", "has", "had", "do", "does", "did", "will", "would",
    "could", "should", "may", "might", "must", "can", "this", "that", "these", "those",
    "i", "you", "he", "she", "it", "we", "they", "what", "which", "who", "when", "where",
    "why", "how", "all", "each", "every", "both", "few", "more", "some", "any", "no",
    "not", "only", "same", "so", "than", "too", "very", "just", "am", "as", "if",
    "me", "my", "myself", "our", "ours", "ourselves", "your", "yours", "yourself",
    "yourselves", "him", "his", "himself", "her", "hers", "herself", "its", "itself",
    "their", "theirs", "themselves", "whom", "having", "ought", "them", "there", "here",
    "need", "help", "please", "thanks", "thank", "want", "like", "give", "get", "make",
    "take", "go", "come", "know", "see", "find", "use", "think", "say", "tell", "ask",
    "work", "call", "try", "feel", "seem", "look", "watch", "follow", "play", "include",
    "continue", "set", "learn", "change", "lead", "understand", "stop", "create", "speak",
    "read", "allow", "add", "spend", "grow", "open", "walk", "win", "offer", "remember",
    "love", "consider", "appear", "buy", "wait", "serve", "die", "send", "expect", "build",
    "stay", "fall", "cut", "reach", "kill", "remain", "suggest", "raise", "pass", "sell",
    "require", "report", "decide", "pull", "explain", "develop", "carry", "break",
    "receive", "agree", "support", "hit", "produce", "eat", "cover", "catch", "draw",
    "choose", "cause", "begin", "drink", "hold", "write", "provide", "pay", "meet",
    "shall", "wish", "trying", "anyone", "someone", "everybody", "nobody", "everything",
    "nothing", "going", "making", "from", "with", "about", "pm", "re",
];

/// Shorter list used for title vocabulary in the dataset overviews.
pub const TITLE_STOPWORDS: &[&str] = &[
    "the", "a", "an", "to", "of", "and", "in", "for", "on", "is", "it", "i", "you", "me", "my",
    "we", "be", "are", "was", "were", "at", "or", "from", "this", "that", "with", "as", "by",
    "about", "any", "can", "do", "how", "what", "why", "where",
];

fn word_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b[a-z]+\b").expect("static regex"))
}

pub fn stopword_set<I, S>(base: &[&str], extra: I) -> AHashSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    base.iter()
        .map(|s| s.to_string())
        .chain(extra.into_iter().map(|s| s.as_ref().trim().to_lowercase()))
        .collect()
}

/// Most common tokens across `texts`; ties keep first-seen order.
/// Tokens are lowercase ASCII letter runs longer than `min_len` and not in `stopwords`.
pub fn keyword_frequency<'a, I>(texts: I, stopwords: &AHashSet<String>, min_len: usize, n: usize) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: AHashMap<String, (usize, usize)> = AHashMap::new();
    let mut seen = 0usize;
    for text in texts {
        let lower = text.to_lowercase();
        for m in word_re().find_iter(&lower) {
            let w = m.as_str();
            if w.len() <= min_len || stopwords.contains(w) {
                continue;
            }
            let entry = counts.entry(w.to_string()).or_insert((0, seen));
            entry.0 += 1;
            seen += 1;
        }
    }
    let mut v: Vec<(String, usize, usize)> = counts.into_iter().map(|(w, (c, first))| (w, c, first)).collect();
    v.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    v.into_iter().take(n).map(|(w, c, _)| (w, c)).collect()
}

