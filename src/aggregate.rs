//! Grouped statistics over analyzed posts.
//! Implement `Aggregator` for custom state; `GroupStats` is the one behind every report table.

use crate::classify::AnalyzedPost;
use crate::emotion::Emotion;
use crate::sentiment::Sentiment;
use crate::util::percent;
use ahash::AHashMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub trait Aggregator: Send + Default + Serialize + DeserializeOwned {
    fn ingest(&mut self, record: &AnalyzedPost);
    fn merge(&mut self, other: Self);
}

/// Dimension to group by. A post with several topics lands in each topic group.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupKey {
    Topic,
    Subreddit,
    Sentiment,
    Emotion,
}

impl GroupKey {
    pub fn column(self) -> &'static str {
        match self {
            GroupKey::Topic => "topic",
            GroupKey::Subreddit => "subreddit",
            GroupKey::Sentiment => "sentiment",
            GroupKey::Emotion => "emotion",
        }
    }

    fn keys_for(self, p: &AnalyzedPost) -> Vec<String> {
        match self {
            GroupKey::Topic => p.classification.topics.clone(),
            GroupKey::Subreddit => vec![subreddit_key(&p.post.subreddit)],
            GroupKey::Sentiment => vec![p.classification.sentiment.as_str().to_string()],
            GroupKey::Emotion => vec![p.classification.emotion.as_str().to_string()],
        }
    }
}

impl FromStr for GroupKey {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "topic" => Ok(GroupKey::Topic),
            "subreddit" => Ok(GroupKey::Subreddit),
            "sentiment" => Ok(GroupKey::Sentiment),
            "emotion" => Ok(GroupKey::Emotion),
            other => Err(format!("unknown group key: {other}")),
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

fn subreddit_key(raw: &str) -> String {
    let s = raw.trim();
    if s.is_empty() { "unknown".to_string() } else { s.to_string() }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentBreakdown {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

impl SentimentBreakdown {
    pub fn get(&self, s: Sentiment) -> usize {
        match s {
            Sentiment::Positive => self.positive,
            Sentiment::Neutral => self.neutral,
            Sentiment::Negative => self.negative,
        }
    }
    fn bump(&mut self, s: Sentiment) {
        match s {
            Sentiment::Positive => self.positive += 1,
            Sentiment::Neutral => self.neutral += 1,
            Sentiment::Negative => self.negative += 1,
        }
    }
    pub fn total(&self) -> usize {
        self.positive + self.neutral + self.negative
    }
}

/// Running sums for one group.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupStats {
    pub count: usize,
    pub sentiments: SentimentBreakdown,
    pub sum_polarity: f64,
    pub sum_subjectivity: f64,
    pub sum_upvotes: i64,
    pub sum_comments: i64,
    pub emotions: BTreeMap<Emotion, usize>,
}

impl Aggregator for GroupStats {
    fn ingest(&mut self, record: &AnalyzedPost) {
        let c = &record.classification;
        self.count += 1;
        self.sentiments.bump(c.sentiment);
        self.sum_polarity += c.polarity;
        self.sum_subjectivity += c.subjectivity;
        self.sum_upvotes = self.sum_upvotes.saturating_add(record.post.upvotes);
        self.sum_comments = self.sum_comments.saturating_add(record.post.comments);
        *self.emotions.entry(c.emotion).or_insert(0) += 1;
    }

    fn merge(&mut self, other: Self) {
        self.count += other.count;
        self.sentiments.positive += other.sentiments.positive;
        self.sentiments.neutral += other.sentiments.neutral;
        self.sentiments.negative += other.sentiments.negative;
        self.sum_polarity += other.sum_polarity;
        self.sum_subjectivity += other.sum_subjectivity;
        self.sum_upvotes = self.sum_upvotes.saturating_add(other.sum_upvotes);
        self.sum_comments = self.sum_comments.saturating_add(other.sum_comments);
        for (e, n) in other.emotions {
            *self.emotions.entry(e).or_insert(0) += n;
        }
    }
}

impl GroupStats {
    fn mean(&self, sum: f64) -> f64 {
        if self.count == 0 { 0.0 } else { sum / self.count as f64 }
    }

    /// Most frequent emotion; the earlier emotion wins ties.
    pub fn dominant_emotion(&self) -> Emotion {
        let mut best = (Emotion::Neutral, 0usize);
        for (e, n) in &self.emotions {
            if *n > best.1 {
                best = (*e, *n);
            }
        }
        best.0
    }

    pub fn into_row(self, group_key: String) -> AggregateRow {
        let avg_upvotes = self.mean(self.sum_upvotes as f64);
        let avg_comments = self.mean(self.sum_comments as f64);
        AggregateRow {
            group_key,
            post_count: self.count,
            sentiment_breakdown: self.sentiments,
            avg_polarity: self.mean(self.sum_polarity),
            avg_subjectivity: self.mean(self.sum_subjectivity),
            avg_upvotes,
            avg_comments,
            avg_engagement: avg_upvotes + avg_comments,
            dominant_emotion: self.dominant_emotion(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AggregateRow {
    pub group_key: String,
    pub post_count: usize,
    pub sentiment_breakdown: SentimentBreakdown,
    pub avg_polarity: f64,
    pub avg_subjectivity: f64,
    pub avg_upvotes: f64,
    pub avg_comments: f64,
    pub avg_engagement: f64,
    pub dominant_emotion: Emotion,
}

impl AggregateRow {
    /// Share of this group's posts with sentiment `s`, in percent.
    pub fn sentiment_percent(&self, s: Sentiment) -> f64 {
        percent(self.sentiment_breakdown.get(s), self.post_count)
    }
}

/// Group `posts` by `key`. Rows are sorted by post count descending, ties by key ascending.
pub fn aggregate(posts: &[AnalyzedPost], key: GroupKey) -> Vec<AggregateRow> {
    let mut groups: AHashMap<String, GroupStats> = AHashMap::new();
    for p in posts {
        for k in key.keys_for(p) {
            groups.entry(k).or_default().ingest(p);
        }
    }
    let mut rows: Vec<AggregateRow> = groups.into_iter().map(|(k, s)| s.into_row(k)).collect();
    rows.sort_by(|a, b| b.post_count.cmp(&a.post_count).then_with(|| a.group_key.cmp(&b.group_key)));
    rows
}

/// Fold every post into one `Aggregator`.
pub fn aggregate_all<A: Aggregator>(posts: &[AnalyzedPost]) -> A {
    let mut acc = A::default();
    for p in posts {
        acc.ingest(p);
    }
    acc
}

// ----------------------------- Distributions ----------------------------------

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    pub label: String,
    pub count: usize,
    pub percent: f64,
}

fn distribution_from(counts: Vec<(String, usize)>, total: usize) -> Vec<Distribution> {
    let mut out: Vec<Distribution> = counts
        .into_iter()
        .filter(|(_, n)| *n > 0)
        .map(|(label, count)| Distribution { percent: percent(count, total), label, count })
        .collect();
    // stable: equal counts keep their incoming order
    out.sort_by(|a, b| b.count.cmp(&a.count));
    out
}

pub fn sentiment_distribution(posts: &[AnalyzedPost]) -> Vec<Distribution> {
    let counts = Sentiment::ALL
        .iter()
        .map(|s| (s.as_str().to_string(), posts.iter().filter(|p| p.classification.sentiment == *s).count()))
        .collect();
    distribution_from(counts, posts.len())
}

pub fn emotion_distribution(posts: &[AnalyzedPost]) -> Vec<Distribution> {
    let counts = Emotion::SCORED
        .into_iter()
        .chain([Emotion::Neutral])
        .map(|e| (e.as_str().to_string(), posts.iter().filter(|p| p.classification.emotion == e).count()))
        .collect();
    distribution_from(counts, posts.len())
}

/// Topic occurrence counts; percentages are of total posts, so they can sum past 100.
pub fn topic_counts(posts: &[AnalyzedPost]) -> Vec<Distribution> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: AHashMap<String, usize> = AHashMap::new();
    for p in posts {
        for t in &p.classification.topics {
            let n = counts.entry(t.clone()).or_insert(0);
            if *n == 0 {
                order.push(t.clone());
            }
            *n += 1;
        }
    }
    let counts = order.into_iter().map(|t| { let n = counts[&t]; (t, n) }).collect();
    distribution_from(counts, posts.len())
}

/// `(subjective, objective, mixed)` counts: `> 0.7`, `< 0.3`, and the rest.
pub fn subjectivity_bands(posts: &[AnalyzedPost]) -> (usize, usize, usize) {
    posts.iter().fold((0, 0, 0), |(s, o, m), p| {
        let v = p.classification.subjectivity;
        if v > 0.7 {
            (s + 1, o, m)
        } else if v < 0.3 {
            (s, o + 1, m)
        } else {
            (s, o, m + 1)
        }
    })
}

// ----------------------------- Top-N ----------------------------------

/// The `n` posts passing `filter` with the largest `key`, descending.
/// Equal keys keep input order.
pub fn top_n_by<'a, K, F>(posts: &'a [AnalyzedPost], n: usize, key: K, filter: F) -> Vec<&'a AnalyzedPost>
where
    K: Fn(&AnalyzedPost) -> f64,
    F: Fn(&AnalyzedPost) -> bool,
{
    let mut v: Vec<(f64, &AnalyzedPost)> = posts.iter().filter(|p| filter(p)).map(|p| (key(p), p)).collect();
    v.sort_by(|a, b| b.0.total_cmp(&a.0));
    v.into_iter().take(n).map(|(_, p)| p).collect()
}

pub fn most_positive(posts: &[AnalyzedPost], n: usize) -> Vec<&AnalyzedPost> {
    top_n_by(posts, n, |p| p.classification.polarity, |_| true)
}

pub fn most_negative(posts: &[AnalyzedPost], n: usize) -> Vec<&AnalyzedPost> {
    top_n_by(posts, n, |p| -p.classification.polarity, |_| true)
}

/// Highest-upvoted posts carrying sentiment label `s`.
pub fn top_by_upvotes_with(posts: &[AnalyzedPost], n: usize, s: Sentiment) -> Vec<&AnalyzedPost> {
    top_n_by(posts, n, |p| p.post.upvotes as f64, |p| p.classification.sentiment == s)
}
