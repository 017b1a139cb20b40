//! Per-post classification: sentiment, emotion and topic labels in one pass.

use crate::config::SentimentField;
use crate::emotion::{detect_emotion, Emotion};
use crate::post::{format_timestamp, Post};
use crate::progress::ProgressScope;
use crate::sentiment::{analyze_sentiment, LexiconScorer, PolarityScorer, Sentiment};
use crate::topics::TopicTable;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub polarity: f64,
    pub subjectivity: f64,
    pub sentiment: Sentiment,
    pub emotion: Emotion,
    pub topics: Vec<String>,
}

impl ClassificationResult {
    pub fn has_topic(&self, label: &str) -> bool {
        self.topics.iter().any(|t| t == label)
    }
}

/// A post with its classification appended. The post is never modified.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedPost {
    #[serde(flatten)]
    pub post: Post,
    #[serde(flatten)]
    pub classification: ClassificationResult,
}

/// Flat CSV row for an analyzed post (`csv` can't serialize flattened structs).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnalyzedRow {
    pub title: String,
    pub body: String,
    pub url: String,
    pub author: String,
    pub upvotes: i64,
    pub comments: i64,
    pub date: String,
    pub subreddit: String,
    pub polarity: f64,
    pub subjectivity: f64,
    pub sentiment: Sentiment,
    pub emotion: Emotion,
    pub topics: String,
}

pub const TOPIC_SEPARATOR: &str = ", ";

impl From<&AnalyzedPost> for AnalyzedRow {
    fn from(a: &AnalyzedPost) -> Self {
        let p = &a.post;
        let c = &a.classification;
        Self {
            title: p.title.clone(),
            body: p.body.clone(),
            url: p.url.clone(),
            author: p.author.clone(),
            upvotes: p.upvotes,
            comments: p.comments,
            date: p.created_at.map(format_timestamp).unwrap_or_default(),
            subreddit: p.subreddit.clone(),
            polarity: c.polarity,
            subjectivity: c.subjectivity,
            sentiment: c.sentiment,
            emotion: c.emotion,
            topics: c.topics.join(TOPIC_SEPARATOR),
        }
    }
}

impl From<AnalyzedRow> for AnalyzedPost {
    fn from(r: AnalyzedRow) -> Self {
        let mut post = Post::new(r.title, r.body)
            .with_url(r.url)
            .with_author(r.author)
            .with_subreddit(r.subreddit)
            .with_votes(r.upvotes, r.comments);
        post.created_at = crate::post::parse_timestamp(&r.date);
        let topics = r
            .topics
            .split(TOPIC_SEPARATOR)
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
        Self {
            post,
            classification: ClassificationResult {
                polarity: r.polarity,
                subjectivity: r.subjectivity,
                sentiment: r.sentiment,
                emotion: r.emotion,
                topics,
            },
        }
    }
}

/// Combines the polarity scorer, the emotion keywords and a topic table.
pub struct Classifier {
    scorer: Box<dyn PolarityScorer>,
    topics: TopicTable,
    sentiment_field: SentimentField,
}

impl Default for Classifier {
    fn default() -> Self {
        Self { scorer: Box::new(LexiconScorer), topics: TopicTable::default(), sentiment_field: SentimentField::Body }
    }
}

impl Classifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scorer(mut self, scorer: impl PolarityScorer + 'static) -> Self {
        self.scorer = Box::new(scorer);
        self
    }
    pub fn with_topics(mut self, topics: TopicTable) -> Self {
        self.topics = topics;
        self
    }
    pub fn with_sentiment_field(mut self, field: SentimentField) -> Self {
        self.sentiment_field = field;
        self
    }

    pub fn topics(&self) -> &TopicTable {
        &self.topics
    }

    fn sentiment_text<'a>(&self, post: &'a Post) -> std::borrow::Cow<'a, str> {
        match self.sentiment_field {
            SentimentField::Body => post.body.as_str().into(),
            SentimentField::Title => post.title.as_str().into(),
            SentimentField::Combined => post.text().into(),
        }
    }

    pub fn classify(&self, post: &Post) -> ClassificationResult {
        let text = self.sentiment_text(post);
        let score = analyze_sentiment(self.scorer.as_ref(), &text);
        ClassificationResult {
            polarity: score.polarity,
            subjectivity: score.subjectivity,
            sentiment: score.sentiment,
            emotion: detect_emotion(&text),
            topics: self.topics.categorize(&post.text()),
        }
    }

    /// Classify every post in parallel. Output order equals input order.
    pub fn classify_all(&self, posts: &[Post], progress: bool) -> Vec<AnalyzedPost> {
        let pb = ProgressScope::count(progress, "Classify", posts.len() as u64);
        let out: Vec<AnalyzedPost> = posts
            .par_iter()
            .map(|p| {
                let classification = self.classify(p);
                pb.inc(1);
                AnalyzedPost { post: p.clone(), classification }
            })
            .collect();
        pb.finish(format!("classified {}", out.len()));
        tracing::info!("Classified {} posts", out.len());
        out
    }
}
