#![allow(dead_code)]

use anyhow::{anyhow, Result};
use citypulse::{
    AnalyzedPost, ClassificationResult, Emotion, Listing, ListingSource, PageRequest, Post, Sentiment,
};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use time::macros::datetime;
use time::OffsetDateTime;

/// Fresh directory that outlives the test (inspect it on failure).
pub fn scratch_dir() -> PathBuf {
    tempfile::tempdir().unwrap().into_path()
}

pub fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

pub fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path).unwrap().lines().filter(|l| !l.is_empty()).map(str::to_string).collect()
}

pub const T0: OffsetDateTime = datetime!(2025-11-10 08:30:00 UTC);

pub fn post(title: &str, url: &str) -> Post {
    Post::new(title, "").with_url(url).with_author("rahim").with_subreddit("dhaka").with_created_at(T0)
}

/// Six posts across two subreddits with clear sentiment and topic signals.
///
/// - p1 r/dhaka: positive body, food topic, joy
/// - p2 r/dhaka: negative body, traffic/infrastructure, anger
/// - p3 r/bangladesh: neutral body, housing
/// - p4 r/dhaka: positive body, food, joy, highest upvotes
/// - p5 r/bangladesh: negative body, fear
/// - p6 r/dhaka: no body, deleted author
pub fn sample_posts() -> Vec<Post> {
    vec![
        Post::new("Best biryani in Old Dhaka?", "The kacchi at this restaurant was excellent and delicious")
            .with_url("https://reddit.com/r/dhaka/comments/p1")
            .with_author("rahim")
            .with_subreddit("dhaka")
            .with_votes(120, 45)
            .with_created_at(datetime!(2025-11-10 08:30:00 UTC)),
        Post::new("Traffic on the Mirpur road", "Terrible traffic again, the road is awful and I am frustrated")
            .with_url("https://reddit.com/r/dhaka/comments/p2")
            .with_author("karim")
            .with_subreddit("dhaka")
            .with_votes(80, 60)
            .with_created_at(datetime!(2025-11-11 18:05:00 UTC)),
        Post::new("Flat rent in Dhanmondi", "Rent for a two bed flat near the lake")
            .with_url("https://reddit.com/r/bangladesh/comments/p3")
            .with_author("salma")
            .with_subreddit("bangladesh")
            .with_votes(15, 9)
            .with_created_at(datetime!(2025-11-11 20:40:00 UTC)),
        Post::new("Great cafe in Gulshan", "Lovely coffee, great food, happy with the service")
            .with_url("https://reddit.com/r/dhaka/comments/p4")
            .with_author("rahim")
            .with_subreddit("dhaka")
            .with_votes(300, 20)
            .with_created_at(datetime!(2025-11-12 10:00:00 UTC)),
        Post::new("Safety at night", "I am worried and scared walking home, it feels bad")
            .with_url("https://reddit.com/r/bangladesh/comments/p5")
            .with_author("nadia")
            .with_subreddit("bangladesh")
            .with_votes(40, 33)
            .with_created_at(datetime!(2025-11-13 23:15:00 UTC)),
        Post::new("Question", "")
            .with_url("https://reddit.com/r/dhaka/comments/p6")
            .with_subreddit("dhaka")
            .with_votes(1, 0)
            .with_created_at(datetime!(2025-11-14 01:00:00 UTC)),
    ]
}

/// Hand-built analyzed post, for aggregation tests that should not depend on the scorer.
pub fn analyzed(subreddit: &str, polarity: f64, emotion: Emotion, topics: &[&str], upvotes: i64) -> AnalyzedPost {
    let sentiment = citypulse::label_for(polarity);
    AnalyzedPost {
        post: Post::new(format!("{subreddit} post {polarity}"), "")
            .with_url(format!("https://reddit.com/{subreddit}/{polarity}"))
            .with_subreddit(subreddit)
            .with_votes(upvotes, upvotes / 2),
        classification: ClassificationResult {
            polarity,
            subjectivity: 0.5,
            sentiment,
            emotion,
            topics: topics.iter().map(|t| t.to_string()).collect(),
        },
    }
}

pub fn count_sentiment(posts: &[AnalyzedPost], s: Sentiment) -> usize {
    posts.iter().filter(|p| p.classification.sentiment == s).count()
}

/// In-memory listing source. Pages are keyed by `(subreddit, after)`; a missing
/// key is an empty final page. Subreddits listed in `failing` return an error.
#[derive(Default)]
pub struct FakeSource {
    pages: HashMap<(String, Option<String>), Listing>,
    failing: Vec<String>,
    pub calls: Mutex<Vec<PageRequest>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, sub: &str, after: Option<&str>, posts: Vec<Post>, next: Option<&str>) -> Self {
        self.pages.insert(
            (sub.to_string(), after.map(str::to_string)),
            Listing { posts, after: next.map(str::to_string) },
        );
        self
    }

    pub fn failing(mut self, sub: &str) -> Self {
        self.failing.push(sub.to_string());
        self
    }

    pub fn requests(&self) -> Vec<PageRequest> {
        self.calls.lock().unwrap().clone()
    }
}

impl ListingSource for FakeSource {
    fn fetch_page(&self, req: &PageRequest) -> Result<Listing> {
        self.calls.lock().unwrap().push(req.clone());
        if self.failing.contains(&req.subreddit) {
            return Err(anyhow!("HTTP 503 for r/{}", req.subreddit));
        }
        Ok(self.pages.get(&(req.subreddit.clone(), req.after.clone())).cloned().unwrap_or_default())
    }
}
