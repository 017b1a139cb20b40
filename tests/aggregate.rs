#[path = "common/mod.rs"]
mod common;

use citypulse::{
    aggregate, aggregate_all, emotion_distribution, most_negative, most_positive, sentiment_distribution,
    subjectivity_bands, top_by_upvotes_with, topic_counts, Aggregator, AnalyzedPost, Emotion, GroupKey, GroupStats,
    Sentiment,
};
use common::*;
use serde::{Deserialize, Serialize};

fn fixture() -> Vec<AnalyzedPost> {
    vec![
        analyzed("dhaka", 0.6, Emotion::Joy, &["Food/Dining", "Housing/Real Estate"], 100),
        analyzed("dhaka", -0.4, Emotion::Anger, &["Infrastructure/Urban"], 40),
        analyzed("bangladesh", 0.0, Emotion::Neutral, &["Housing/Real Estate"], 10),
        analyzed("bangladesh", 0.3, Emotion::Joy, &["Food/Dining"], 60),
        analyzed("", -0.8, Emotion::Fear, &["General"], 5),
    ]
}

#[test]
fn sentiment_counts_sum_to_total() {
    let posts = fixture();
    let dist = sentiment_distribution(&posts);
    assert_eq!(dist.iter().map(|d| d.count).sum::<usize>(), posts.len());
    let pct: f64 = dist.iter().map(|d| d.percent).sum();
    assert!((pct - 100.0).abs() < 1e-9);
    assert_eq!(dist[0].label, "positive");
    assert_eq!(dist[0].count, 2);

    let emotions = emotion_distribution(&posts);
    assert_eq!(emotions.iter().map(|d| d.count).sum::<usize>(), posts.len());
    assert_eq!(emotions[0].label, "joy");
}

#[test]
fn posts_land_in_every_topic_they_carry() {
    let posts = fixture();
    let rows = aggregate(&posts, GroupKey::Topic);

    // 2 topics on the first post, one on the rest
    assert_eq!(rows.iter().map(|r| r.post_count).sum::<usize>(), posts.len() + 1);

    // count desc, ties by key asc
    let keys: Vec<&str> = rows.iter().map(|r| r.group_key.as_str()).collect();
    assert_eq!(keys, vec!["Food/Dining", "Housing/Real Estate", "General", "Infrastructure/Urban"]);

    let food = &rows[0];
    assert_eq!(food.sentiment_breakdown.positive, 2);
    assert_eq!(food.sentiment_breakdown.total(), food.post_count);
    assert!((food.avg_polarity - 0.45).abs() < 1e-9);
    assert!((food.avg_upvotes - 80.0).abs() < 1e-9);
    assert!((food.avg_comments - 40.0).abs() < 1e-9);
    assert!((food.avg_engagement - 120.0).abs() < 1e-9);
    assert_eq!(food.dominant_emotion, Emotion::Joy);
    assert!((food.sentiment_percent(Sentiment::Positive) - 100.0).abs() < 1e-9);

    let topics = topic_counts(&posts);
    assert_eq!(topics[0].label, "Food/Dining");
    assert_eq!(topics[0].count, 2);
}

#[test]
fn empty_subreddit_groups_as_unknown() {
    let rows = aggregate(&fixture(), GroupKey::Subreddit);
    let keys: Vec<&str> = rows.iter().map(|r| r.group_key.as_str()).collect();
    assert_eq!(keys, vec!["bangladesh", "dhaka", "unknown"]);
}

#[test]
fn single_key_groupings_count_each_post_once() {
    let posts = fixture();
    for key in [GroupKey::Subreddit, GroupKey::Sentiment, GroupKey::Emotion] {
        let rows = aggregate(&posts, key);
        assert_eq!(rows.iter().map(|r| r.post_count).sum::<usize>(), posts.len(), "{key:?}");
        for row in &rows {
            assert_eq!(row.sentiment_breakdown.total(), row.post_count, "{key:?} {}", row.group_key);
        }
    }

    let rows = aggregate(&posts, GroupKey::Sentiment);
    let keys: Vec<(&str, usize)> = rows.iter().map(|r| (r.group_key.as_str(), r.post_count)).collect();
    assert_eq!(keys, vec![("negative", 2), ("positive", 2), ("neutral", 1)]);
    for row in &rows {
        let own: Sentiment = row.group_key.parse().unwrap();
        for s in Sentiment::ALL {
            let want = if s == own { row.post_count } else { 0 };
            assert_eq!(row.sentiment_breakdown.get(s), want, "{} / {s}", row.group_key);
        }
    }
}

#[test]
fn huge_counts_saturate_instead_of_overflowing() {
    let mut big = analyzed("dhaka", 0.5, Emotion::Joy, &["General"], 0);
    big.post.upvotes = i64::MAX;
    big.post.comments = i64::MAX;
    assert_eq!(big.post.engagement(), i64::MAX);

    let posts = vec![big.clone(), big];
    let rows = aggregate(&posts, GroupKey::Subreddit);
    assert_eq!(rows[0].post_count, 2);
    assert!(rows[0].avg_upvotes > 0.0);

    let mut a = GroupStats::default();
    a.ingest(&posts[0]);
    let mut b = GroupStats::default();
    b.ingest(&posts[1]);
    a.merge(b);
    assert_eq!(a.sum_upvotes, i64::MAX);
}

#[test]
fn dominant_emotion_ties_prefer_the_earlier_emotion() {
    let posts = vec![
        analyzed("dhaka", 0.0, Emotion::Anger, &["General"], 1),
        analyzed("dhaka", 0.0, Emotion::Joy, &["General"], 1),
    ];
    let rows = aggregate(&posts, GroupKey::Subreddit);
    assert_eq!(rows[0].dominant_emotion, Emotion::Joy);
}

#[test]
fn group_stats_merge_matches_single_pass() {
    let posts = fixture();
    let whole: GroupStats = aggregate_all(&posts);

    let mut left: GroupStats = aggregate_all(&posts[..2]);
    let right: GroupStats = aggregate_all(&posts[2..]);
    left.merge(right);

    assert_eq!(left.count, whole.count);
    assert_eq!(left.sentiments, whole.sentiments);
    assert_eq!(left.emotions, whole.emotions);
    assert_eq!(left.sum_upvotes, whole.sum_upvotes);
    assert!((left.sum_polarity - whole.sum_polarity).abs() < 1e-9);
}

/// A custom aggregator: total upvotes per sentiment label.
#[derive(Default, Serialize, Deserialize)]
struct UpvotesBySentiment {
    positive: i64,
    negative: i64,
}

impl Aggregator for UpvotesBySentiment {
    fn ingest(&mut self, record: &AnalyzedPost) {
        match record.classification.sentiment {
            Sentiment::Positive => self.positive += record.post.upvotes,
            Sentiment::Negative => self.negative += record.post.upvotes,
            Sentiment::Neutral => {}
        }
    }
    fn merge(&mut self, other: Self) {
        self.positive += other.positive;
        self.negative += other.negative;
    }
}

#[test]
fn custom_aggregator_folds_every_post() {
    let agg: UpvotesBySentiment = aggregate_all(&fixture());
    assert_eq!(agg.positive, 160);
    assert_eq!(agg.negative, 45);
}

#[test]
fn extremes_and_bands() {
    let posts = fixture();
    let pos = most_positive(&posts, 2);
    assert_eq!(pos.len(), 2);
    assert_eq!(pos[0].classification.polarity, 0.6);
    assert_eq!(pos[1].classification.polarity, 0.3);

    let neg = most_negative(&posts, 1);
    assert_eq!(neg[0].classification.polarity, -0.8);

    let top = top_by_upvotes_with(&posts, 5, Sentiment::Positive);
    let ups: Vec<i64> = top.iter().map(|p| p.post.upvotes).collect();
    assert_eq!(ups, vec![100, 60]);

    // every fixture post has subjectivity 0.5
    assert_eq!(subjectivity_bands(&posts), (0, 0, 5));
    assert_eq!(count_sentiment(&posts, Sentiment::Negative), 2);
}
