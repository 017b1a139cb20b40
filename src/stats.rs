//! Dataset-level statistics over raw posts: engagement summaries, timelines,
//! author activity, column profile and data-quality flags.

use crate::post::{format_timestamp, Post, DELETED_AUTHOR};
use ahash::AHashMap;
use serde::Serialize;
use std::collections::BTreeMap;
use time::{Date, OffsetDateTime};

/// `describe()`-style summary. `std` is the sample standard deviation
/// (0 for fewer than two values); quantiles use linear interpolation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct EngagementStats {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub q50: f64,
    pub q75: f64,
    pub max: f64,
}

impl EngagementStats {
    pub fn describe(values: &[i64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut v: Vec<f64> = values.iter().map(|&x| x as f64).collect();
        v.sort_by(|a, b| a.total_cmp(b));
        let n = v.len();
        let mean = v.iter().sum::<f64>() / n as f64;
        let std = if n > 1 {
            (v.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64).sqrt()
        } else {
            0.0
        };
        Some(Self {
            count: n,
            mean,
            std,
            min: v[0],
            q25: quantile(&v, 0.25),
            q50: quantile(&v, 0.50),
            q75: quantile(&v, 0.75),
            max: v[n - 1],
        })
    }

    /// Labelled rows in `describe()` order.
    pub fn rows(&self) -> [(&'static str, f64); 8] {
        [
            ("count", self.count as f64),
            ("mean", self.mean),
            ("std", self.std),
            ("min", self.min),
            ("25%", self.q25),
            ("50%", self.q50),
            ("75%", self.q75),
            ("max", self.max),
        ]
    }
}

fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = (sorted.len() - 1) as f64 * q;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

pub fn upvote_stats(posts: &[Post]) -> Option<EngagementStats> {
    EngagementStats::describe(&posts.iter().map(|p| p.upvotes).collect::<Vec<_>>())
}

pub fn comment_stats(posts: &[Post]) -> Option<EngagementStats> {
    EngagementStats::describe(&posts.iter().map(|p| p.comments).collect::<Vec<_>>())
}

/// Earliest and latest creation time plus the inclusive span in days.
pub fn date_span(posts: &[Post]) -> Option<(OffsetDateTime, OffsetDateTime, i64)> {
    let mut it = posts.iter().filter_map(|p| p.created_at);
    let first = it.next()?;
    let (lo, hi) = it.fold((first, first), |(lo, hi), t| (lo.min(t), hi.max(t)));
    Some((lo, hi, (hi - lo).whole_days() + 1))
}

pub fn daily_counts(posts: &[Post]) -> Vec<(Date, usize)> {
    let mut m: BTreeMap<Date, usize> = BTreeMap::new();
    for t in posts.iter().filter_map(|p| p.created_at) {
        *m.entry(t.date()).or_insert(0) += 1;
    }
    m.into_iter().collect()
}

/// Posts per UTC hour, only hours that occur, ascending.
pub fn hourly_counts(posts: &[Post]) -> Vec<(u8, usize)> {
    let mut m: BTreeMap<u8, usize> = BTreeMap::new();
    for t in posts.iter().filter_map(|p| p.created_at) {
        *m.entry(t.hour()).or_insert(0) += 1;
    }
    m.into_iter().collect()
}

/// Value counts of `key`, count descending; ties keep first-seen order.
fn value_counts<F: Fn(&Post) -> String>(posts: &[Post], key: F) -> Vec<(String, usize)> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: AHashMap<String, usize> = AHashMap::new();
    for p in posts {
        let k = key(p);
        let n = counts.entry(k.clone()).or_insert(0);
        if *n == 0 {
            order.push(k);
        }
        *n += 1;
    }
    let mut v: Vec<(String, usize)> = order.into_iter().map(|k| { let n = counts[&k]; (k, n) }).collect();
    v.sort_by(|a, b| b.1.cmp(&a.1));
    v
}

pub fn author_counts(posts: &[Post], n: usize) -> Vec<(String, usize)> {
    let mut v = value_counts(posts, |p| p.author.clone());
    v.truncate(n);
    v
}

pub fn subreddit_counts(posts: &[Post]) -> Vec<(String, usize)> {
    value_counts(posts, |p| p.subreddit.clone())
}

pub fn media_counts(posts: &[Post]) -> Vec<(String, usize)> {
    value_counts(posts, |p| p.media_type().to_string())
}

/// The `n` posts with the largest `key`, descending; equal keys keep input order.
pub fn top_posts_by<'a, K: Fn(&Post) -> i64>(posts: &'a [Post], n: usize, key: K) -> Vec<&'a Post> {
    let mut v: Vec<&Post> = posts.iter().collect();
    v.sort_by(|a, b| key(b).cmp(&key(a)));
    v.truncate(n);
    v
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ColumnProfile {
    pub name: &'static str,
    pub kind: &'static str,
    pub non_null: usize,
    pub missing: usize,
    pub sample: String,
}

/// Per-column presence counts for the fixed post columns.
pub fn column_profile(posts: &[Post]) -> Vec<ColumnProfile> {
    type Getter = fn(&Post) -> Option<String>;
    let cols: [(&'static str, &'static str, Getter); 8] = [
        ("title", "text", |p| (!p.title.is_empty()).then(|| p.title.clone())),
        ("body", "text", |p| (!p.body.is_empty()).then(|| p.body.clone())),
        ("url", "text", |p| (!p.url.is_empty()).then(|| p.url.clone())),
        ("author", "text", |p| Some(p.author.clone())),
        ("upvotes", "integer", |p| Some(p.upvotes.to_string())),
        ("comments", "integer", |p| Some(p.comments.to_string())),
        ("date", "timestamp", |p| p.created_at.map(format_timestamp)),
        ("subreddit", "text", |p| (!p.subreddit.is_empty()).then(|| p.subreddit.clone())),
    ];
    cols.iter()
        .map(|(name, kind, get)| {
            let values: Vec<Option<String>> = posts.iter().map(get).collect();
            let non_null = values.iter().filter(|v| v.is_some()).count();
            let sample = values.iter().flatten().next().cloned().unwrap_or_default();
            ColumnProfile { name: *name, kind: *kind, non_null, missing: posts.len() - non_null, sample: crate::util::truncate_chars(&sample, 60) }
        })
        .collect()
}

/// Human-readable data-quality flags; a single all-clear line when none apply.
pub fn quality_issues(posts: &[Post]) -> Vec<String> {
    let mut issues = Vec::new();
    if posts.iter().any(|p| p.title.trim().is_empty()) {
        issues.push("Missing titles detected.".to_string());
    }
    if posts.iter().any(|p| p.author == DELETED_AUTHOR) {
        issues.push("Deleted authors present.".to_string());
    }
    if posts.iter().any(|p| p.upvotes < 0) {
        issues.push("Negative upvotes found (unexpected).".to_string());
    }
    if posts.iter().any(|p| p.comments < 0) {
        issues.push("Negative comments found (unexpected).".to_string());
    }
    if posts.iter().map(|p| p.upvotes).max() == Some(0) {
        issues.push("All upvotes are zero, possible scrape issue.".to_string());
    }
    if posts.iter().any(|p| p.created_at.is_none()) {
        issues.push("Posts without a parseable date found.".to_string());
    }
    if let Some((_, _, span)) = date_span(posts) {
        if span < 2 {
            issues.push("Date range unusually narrow.".to_string());
        }
    }
    if issues.is_empty() {
        issues.push("No major data quality flags detected.".to_string());
    }
    issues
}
