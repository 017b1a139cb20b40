use super::tables::ANALYSIS_FILES;
use crate::pipeline::Analysis;
use crate::post::format_timestamp;
use crate::sentiment::Sentiment;
use crate::util::percent;
use std::fmt::Write;

const RULE: &str = "============================================";

/// Plain-text run summary written to `00_summary_report.txt`.
pub fn summary_text(analysis: &Analysis) -> String {
    let mut out = String::new();
    let total = analysis.len();

    let _ = writeln!(out, "CITY REDDIT SENTIMENT & TOPIC ANALYSIS");
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "Generated: {}", format_timestamp(analysis.generated_at));
    let _ = writeln!(out);

    let mut subs: Vec<&str> = Vec::new();
    for p in &analysis.posts {
        let s = p.post.subreddit.as_str();
        if !s.is_empty() && !subs.contains(&s) {
            subs.push(s);
        }
    }
    let mut dates = analysis.posts.iter().filter_map(|p| p.post.created_at);
    let range = dates.next().map(|first| dates.fold((first, first), |(lo, hi), t| (lo.min(t), hi.max(t))));

    let _ = writeln!(out, "DATASET:");
    let _ = writeln!(out, "  - Total Posts: {total}");
    let _ = writeln!(out, "  - Subreddits: {}", if subs.is_empty() { "n/a".to_string() } else { subs.join(", ") });
    match range {
        Some((lo, hi)) => {
            let _ = writeln!(out, "  - Date Range: {} to {}", format_timestamp(lo), format_timestamp(hi));
        }
        None => {
            let _ = writeln!(out, "  - Date Range: n/a");
        }
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "SENTIMENT DISTRIBUTION:");
    for s in Sentiment::ALL {
        let n = analysis.posts.iter().filter(|p| p.classification.sentiment == s).count();
        let _ = writeln!(out, "  - {}: {} ({:.1}%)", capitalize(s.as_str()), n, percent(n, total));
    }
    let _ = writeln!(out, "  - Avg Polarity: {:.3}", analysis.avg_polarity());
    let _ = writeln!(out, "  - Avg Subjectivity: {:.3}", analysis.avg_subjectivity());
    let (subjective, objective, mixed) = analysis.subjectivity;
    let _ = writeln!(
        out,
        "  - Subjective / Objective / Mixed: {} ({:.1}%) / {} ({:.1}%) / {} ({:.1}%)",
        subjective,
        percent(subjective, total),
        objective,
        percent(objective, total),
        mixed,
        percent(mixed, total)
    );
    let _ = writeln!(out);

    let _ = writeln!(out, "EMOTION DISTRIBUTION:");
    for d in analysis.emotions.iter().take(5) {
        let _ = writeln!(out, "  - {}: {} ({:.1}%)", d.label, d.count, d.percent);
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "TOP TOPICS:");
    for (i, row) in analysis.by_topic.iter().take(5).enumerate() {
        let _ = writeln!(out, "  {}. {}: {} posts", i + 1, row.group_key, row.post_count);
    }
    let _ = writeln!(out);

    if !analysis.keywords.is_empty() {
        let words: Vec<String> = analysis.keywords.iter().take(10).map(|(w, c)| format!("{w} ({c})")).collect();
        let _ = writeln!(out, "TOP KEYWORDS:");
        let _ = writeln!(out, "  {}", words.join(", "));
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "OUTPUT FILES:");
    for (i, name) in ANALYSIS_FILES.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", i + 1, name);
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "KEY FINDINGS:");
    let discussed: Vec<String> =
        analysis.topics.iter().take(2).map(|d| format!("{} ({:.1}%)", d.label, d.percent)).collect();
    let _ = writeln!(out, "  - Most discussed: {}", if discussed.is_empty() { "N/A".to_string() } else { discussed.join(", ") });
    let _ = writeln!(out, "  - Most positive topic: {}", most_positive_topic(analysis).unwrap_or("N/A"));
    let _ = writeln!(out, "  - Most common emotion: {}", analysis.emotions.first().map(|d| d.label.as_str()).unwrap_or("N/A"));
    let (up, com) = engagement_means(analysis);
    let _ = writeln!(out, "  - Engagement avg: {up:.1} upvotes, {com:.1} comments");
    out
}

/// Topic with the highest positive share; the first such topic in report order wins ties.
fn most_positive_topic(analysis: &Analysis) -> Option<&str> {
    let mut best: Option<(&str, f64)> = None;
    for row in &analysis.by_topic {
        let share = row.sentiment_percent(Sentiment::Positive);
        if best.map_or(true, |(_, b)| share > b) {
            best = Some((&row.group_key, share));
        }
    }
    best.map(|(k, _)| k)
}

fn engagement_means(analysis: &Analysis) -> (f64, f64) {
    let n = analysis.len();
    if n == 0 {
        return (0.0, 0.0);
    }
    let up: f64 = analysis.posts.iter().map(|p| p.post.upvotes as f64).sum();
    let com: f64 = analysis.posts.iter().map(|p| p.post.comments as f64).sum();
    (up / n as f64, com / n as f64)
}

fn capitalize(s: &str) -> String {
    let mut c = s.chars();
    match c.next() {
        Some(f) => f.to_uppercase().chain(c).collect(),
        None => String::new(),
    }
}
