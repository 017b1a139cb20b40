use crate::aggregate::AggregateRow;
use crate::classify::{AnalyzedPost, AnalyzedRow, TOPIC_SEPARATOR};
use crate::emotion::Emotion;
use crate::pipeline::Analysis;
use crate::store::write_csv;
use anyhow::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const TOPIC_SENTIMENT_CSV: &str = "01_topic_sentiment_analysis.csv";
pub const SUBREDDIT_SENTIMENT_CSV: &str = "02_sentiment_by_subreddit.csv";
pub const MOST_POSITIVE_CSV: &str = "03_most_positive_posts.csv";
pub const MOST_NEGATIVE_CSV: &str = "04_most_negative_posts.csv";
pub const FULL_ANALYSIS_CSV: &str = "05_posts_with_advanced_analysis.csv";
pub const TOP_KEYWORDS_CSV: &str = "06_top_keywords.csv";
pub const EMOTION_DISTRIBUTION_CSV: &str = "07_emotion_distribution.csv";

pub const ANALYSIS_FILES: [&str; 7] = [
    TOPIC_SENTIMENT_CSV,
    SUBREDDIT_SENTIMENT_CSV,
    MOST_POSITIVE_CSV,
    MOST_NEGATIVE_CSV,
    FULL_ANALYSIS_CSV,
    TOP_KEYWORDS_CSV,
    EMOTION_DISTRIBUTION_CSV,
];

#[derive(Serialize)]
struct TopicRow<'a> {
    topic: &'a str,
    total_posts: usize,
    positive: usize,
    neutral: usize,
    negative: usize,
    avg_polarity: f64,
    avg_subjectivity: f64,
    dominant_emotion: Emotion,
    avg_upvotes: f64,
    avg_comments: f64,
    avg_engagement: f64,
}

impl<'a> From<&'a AggregateRow> for TopicRow<'a> {
    fn from(r: &'a AggregateRow) -> Self {
        Self {
            topic: &r.group_key,
            total_posts: r.post_count,
            positive: r.sentiment_breakdown.positive,
            neutral: r.sentiment_breakdown.neutral,
            negative: r.sentiment_breakdown.negative,
            avg_polarity: r.avg_polarity,
            avg_subjectivity: r.avg_subjectivity,
            dominant_emotion: r.dominant_emotion,
            avg_upvotes: r.avg_upvotes,
            avg_comments: r.avg_comments,
            avg_engagement: r.avg_engagement,
        }
    }
}

#[derive(Serialize)]
struct SubredditRow<'a> {
    subreddit: &'a str,
    total_posts: usize,
    positive: usize,
    neutral: usize,
    negative: usize,
    avg_polarity: f64,
    avg_upvotes: f64,
    avg_comments: f64,
    avg_subjectivity: f64,
}

impl<'a> From<&'a AggregateRow> for SubredditRow<'a> {
    fn from(r: &'a AggregateRow) -> Self {
        Self {
            subreddit: &r.group_key,
            total_posts: r.post_count,
            positive: r.sentiment_breakdown.positive,
            neutral: r.sentiment_breakdown.neutral,
            negative: r.sentiment_breakdown.negative,
            avg_polarity: r.avg_polarity,
            avg_upvotes: r.avg_upvotes,
            avg_comments: r.avg_comments,
            avg_subjectivity: r.avg_subjectivity,
        }
    }
}

#[derive(Serialize)]
struct ExtremeRow<'a> {
    title: &'a str,
    author: &'a str,
    upvotes: i64,
    polarity: f64,
    emotion: Emotion,
    topics: String,
}

impl<'a> From<&'a AnalyzedPost> for ExtremeRow<'a> {
    fn from(a: &'a AnalyzedPost) -> Self {
        Self {
            title: &a.post.title,
            author: &a.post.author,
            upvotes: a.post.upvotes,
            polarity: a.classification.polarity,
            emotion: a.classification.emotion,
            topics: a.classification.topics.join(TOPIC_SEPARATOR),
        }
    }
}

#[derive(Serialize)]
struct KeywordRow<'a> {
    rank: usize,
    keyword: &'a str,
    count: usize,
}

#[derive(Serialize)]
struct EmotionRow<'a> {
    emotion: &'a str,
    posts: usize,
    percent: f64,
}

/// Write the seven analysis tables into `dir`, overwriting earlier runs.
pub fn write_analysis_csvs(dir: &Path, analysis: &Analysis) -> Result<Vec<PathBuf>> {
    let path = |name: &str| dir.join(name);

    write_csv(&path(TOPIC_SENTIMENT_CSV), analysis.by_topic.iter().map(TopicRow::from))?;
    write_csv(&path(SUBREDDIT_SENTIMENT_CSV), analysis.by_subreddit.iter().map(SubredditRow::from))?;
    write_csv(&path(MOST_POSITIVE_CSV), analysis.most_positive().into_iter().map(ExtremeRow::from))?;
    write_csv(&path(MOST_NEGATIVE_CSV), analysis.most_negative().into_iter().map(ExtremeRow::from))?;
    write_csv(&path(FULL_ANALYSIS_CSV), analysis.posts.iter().map(AnalyzedRow::from))?;
    write_csv(
        &path(TOP_KEYWORDS_CSV),
        analysis
            .keywords
            .iter()
            .enumerate()
            .map(|(i, (k, c))| KeywordRow { rank: i + 1, keyword: k, count: *c }),
    )?;
    write_csv(
        &path(EMOTION_DISTRIBUTION_CSV),
        analysis.emotions.iter().map(|d| EmotionRow { emotion: &d.label, posts: d.count, percent: d.percent }),
    )?;

    Ok(ANALYSIS_FILES.iter().map(|n| path(n)).collect())
}
