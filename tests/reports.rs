#[path = "common/mod.rs"]
mod common;

use citypulse::{
    dataset_overview_html, dataset_overview_markdown, escape_html, run_analyze, run_report, save_posts,
    sentiment_dashboard_html, summary_text, Analysis, AnalyzeOptions, Classifier, Emotion, ReportOptions,
    ANALYSIS_FILES, DATASET_OVERVIEW_HTML, DATASET_OVERVIEW_MD, SENTIMENT_OVERVIEW_HTML, SUMMARY_TXT,
};
use common::*;
use std::fs;

fn quiet() -> AnalyzeOptions {
    AnalyzeOptions::default().with_progress(false)
}

#[test]
fn analyze_writes_every_table_and_the_summary() {
    let dir = scratch_dir();
    let input = dir.join("posts.json");
    save_posts(&input, &sample_posts()).unwrap();
    let out = dir.join("analysis");

    let analysis = run_analyze(&input, &out, &quiet()).unwrap();
    assert_eq!(analysis.len(), 6);

    for name in ANALYSIS_FILES {
        assert!(out.join(name).exists(), "missing {name}");
    }
    assert!(out.join(SUMMARY_TXT).exists());
    assert!(out.join("analyzed_posts.json").exists());

    let topic = read_lines(&out.join("01_topic_sentiment_analysis.csv"));
    assert_eq!(
        topic[0],
        "topic,total_posts,positive,neutral,negative,avg_polarity,avg_subjectivity,dominant_emotion,avg_upvotes,avg_comments,avg_engagement"
    );
    let subs = read_lines(&out.join("02_sentiment_by_subreddit.csv"));
    assert_eq!(
        subs[0],
        "subreddit,total_posts,positive,neutral,negative,avg_polarity,avg_upvotes,avg_comments,avg_subjectivity"
    );
    // dhaka has four posts, bangladesh two
    assert!(subs[1].starts_with("dhaka,4,2,1,1,"));
    assert!(subs[2].starts_with("bangladesh,2,0,1,1,"));

    let extremes = read_lines(&out.join("03_most_positive_posts.csv"));
    assert_eq!(extremes[0], "title,author,upvotes,polarity,emotion,topics");
    assert_eq!(extremes.len(), 7);

    let keywords = read_lines(&out.join("06_top_keywords.csv"));
    assert_eq!(keywords[0], "rank,keyword,count");
    assert!(keywords[1].starts_with("1,"));

    let emotions = read_lines(&out.join("07_emotion_distribution.csv"));
    assert_eq!(emotions[0], "emotion,posts,percent");
    assert!(emotions[1].starts_with("joy,2,"));
}

#[test]
fn summary_lists_counts_and_output_files() {
    let analyzed = Classifier::new().classify_all(&sample_posts(), false);
    let analysis = Analysis::build(analyzed, &quiet());
    let text = summary_text(&analysis);

    assert!(text.starts_with("CITY REDDIT SENTIMENT & TOPIC ANALYSIS\n"));
    assert!(text.contains("  - Total Posts: 6\n"));
    assert!(text.contains("  - Subreddits: dhaka, bangladesh\n"));
    assert!(text.contains("  - Date Range: 2025-11-10 08:30:00 to 2025-11-14 01:00:00\n"));
    assert!(text.contains("  - Positive: 2 (33.3%)\n"));
    assert!(text.contains("  - Neutral: 2 (33.3%)\n"));
    assert!(text.contains("  - Negative: 2 (33.3%)\n"));
    assert!(text.contains("  - Most common emotion: joy\n"));
    for name in ANALYSIS_FILES {
        assert!(text.contains(name));
    }
}

#[test]
fn summary_of_an_empty_run_has_no_panics() {
    let analysis = Analysis::build(Vec::new(), &quiet());
    let text = summary_text(&analysis);
    assert!(text.contains("  - Total Posts: 0\n"));
    assert!(text.contains("  - Date Range: n/a\n"));
    assert!(text.contains("  - Most discussed: N/A\n"));
    assert!(text.contains("  - Positive: 0 (0.0%)\n"));
}

#[test]
fn summary_survives_counts_at_the_integer_limit() {
    let raw = serde_json::json!({"title": "viral", "url": "https://reddit.com/v", "upvotes": 18446744073709551615u64, "comments": 5});
    let post: citypulse::Post = serde_json::from_value(raw).unwrap();
    assert_eq!(post.upvotes, i64::MAX);
    assert_eq!(post.engagement(), i64::MAX);

    let analyzed = Classifier::new().classify_all(&[post.clone(), post], false);
    let analysis = Analysis::build(analyzed, &quiet());
    let text = summary_text(&analysis);
    assert!(text.contains("  - Total Posts: 2\n"));
}

#[test]
fn html_text_is_escaped() {
    assert_eq!(escape_html(r#"<a href="x">Tom & Jerry</a>"#), "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&lt;/a&gt;");
    assert_eq!(escape_html("plain"), "plain");

    let mut hostile = analyzed("dhaka", 0.8, Emotion::Joy, &["Food/Dining"], 10);
    hostile.post.title = "<script>alert(1)</script>".to_string();
    let analysis = Analysis::build(vec![hostile, analyzed("dhaka", -0.4, Emotion::Anger, &[], 3)], &quiet());
    let html = sentiment_dashboard_html(&analysis);

    assert!(!html.contains("<script>alert"));
    assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    assert!(html.contains("<h2>6) Top Positive Posts</h2>"));
    assert!(html.contains("<h2>7) Top Negative Posts</h2>"));
    assert!(html.ends_with("</body></html>"));
}

#[test]
fn dataset_overview_html_sections() {
    let mut posts = sample_posts();
    posts[2].title = "Rent <b>spike</b>".to_string();
    let html = dataset_overview_html(&posts, &ReportOptions::default().with_dataset_name("Dhaka"));

    assert!(html.contains("<title>Dhaka Dataset Overview</title>"));
    assert!(html.contains("Rent &lt;b&gt;spike&lt;/b&gt;"));
    assert!(!html.contains("<b>spike"));
    assert!(html.contains("4 days"));
    for h in ["1. Column Dictionary", "2. Subreddit Distribution", "9. Data Quality", "10. Sample Records"] {
        assert!(html.contains(h), "missing {h}");
    }
    assert!(html.contains("<li class=\"warn\">Deleted authors present.</li>"));
}

#[test]
fn markdown_overview_sections_and_pipe_escaping() {
    let mut posts = sample_posts();
    posts[0].title = "Biryani | kacchi".to_string();
    let md = dataset_overview_markdown(&posts, &ReportOptions::default().with_sample_rows(2));

    assert!(md.starts_with("# City Posts Dataset Overview\n"));
    for h in [
        "## 1. Dataset Snapshot",
        "## 2. Subreddit Distribution",
        "## 3. Engagement Statistics",
        "## 4. Title Vocabulary",
        "## 5. Temporal Distribution",
        "## 6. Author Activity",
        "## 7. Data Quality Checks",
        "## 8. Sample Records",
    ] {
        assert!(md.contains(h), "missing {h}");
    }
    assert!(md.contains("- Total rows: **6**"));
    assert!(md.contains("Biryani \\| kacchi"));
    assert!(md.contains("| dhaka | 4 | 66.7% |"));
    assert!(md.contains("### Head (first 2)"));
    assert!(md.contains("- Deleted authors present."));
}

#[test]
fn report_stage_writes_three_files() {
    let dir = scratch_dir();
    let input = dir.join("posts.csv");
    save_posts(&input, &sample_posts()).unwrap();
    let out = dir.join("reports");

    let written = run_report(&input, &out, &ReportOptions::default().with_progress(false)).unwrap();
    let names: Vec<String> =
        written.iter().map(|p| p.file_name().unwrap().to_string_lossy().into_owned()).collect();
    assert_eq!(names, vec![DATASET_OVERVIEW_HTML, DATASET_OVERVIEW_MD, SENTIMENT_OVERVIEW_HTML]);
    for p in &written {
        assert!(fs::metadata(p).unwrap().len() > 0);
    }
}
