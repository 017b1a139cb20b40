//! Stage orchestration: each `run_*` reads its inputs, does one stage, and
//! writes its own outputs.

use crate::aggregate::{
    aggregate, emotion_distribution, most_negative, most_positive, sentiment_distribution, subjectivity_bands,
    topic_counts, AggregateRow, Distribution, GroupKey,
};
use crate::classify::{AnalyzedPost, Classifier};
use crate::collect::{CollectOutcome, Collector, ListingSource, RedditSource};
use crate::config::{AnalyzeOptions, CollectOptions, ExportOptions, FilterOptions, ReportOptions};
use crate::filters::{drop_pseudo_authors, AreaCount, AreaFilter, RelevanceFilter};
use crate::keywords::{keyword_frequency, stopword_set, STOPWORDS};
use crate::merge::{merge_files, MergeOutcome};
use crate::post::Post;
use crate::report;
use crate::stats::subreddit_counts;
use crate::store::{load_posts, save_analyzed, save_posts, write_csv};
use crate::util::init_tracing_once;
use anyhow::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;

/// Everything the analysis reports need, computed once.
#[derive(Clone, Debug)]
pub struct Analysis {
    pub posts: Vec<AnalyzedPost>,
    pub by_topic: Vec<AggregateRow>,
    pub by_subreddit: Vec<AggregateRow>,
    pub by_emotion: Vec<AggregateRow>,
    pub sentiments: Vec<Distribution>,
    pub emotions: Vec<Distribution>,
    pub topics: Vec<Distribution>,
    /// `(subjective, objective, mixed)`
    pub subjectivity: (usize, usize, usize),
    pub keywords: Vec<(String, usize)>,
    pub top_posts: usize,
    pub generated_at: OffsetDateTime,
}

impl Analysis {
    pub fn build(posts: Vec<AnalyzedPost>, opts: &AnalyzeOptions) -> Self {
        let stop = stopword_set(STOPWORDS, &opts.extra_stopwords);
        let texts = posts.iter().flat_map(|p| [p.post.title.as_str(), p.post.body.as_str()]);
        let keywords = keyword_frequency(texts, &stop, opts.min_keyword_len, opts.top_keywords);
        Self {
            by_topic: aggregate(&posts, GroupKey::Topic),
            by_subreddit: aggregate(&posts, GroupKey::Subreddit),
            by_emotion: aggregate(&posts, GroupKey::Emotion),
            sentiments: sentiment_distribution(&posts),
            emotions: emotion_distribution(&posts),
            topics: topic_counts(&posts),
            subjectivity: subjectivity_bands(&posts),
            keywords,
            top_posts: opts.top_posts,
            generated_at: OffsetDateTime::now_utc(),
            posts,
        }
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn most_positive(&self) -> Vec<&AnalyzedPost> {
        most_positive(&self.posts, self.top_posts)
    }

    pub fn most_negative(&self) -> Vec<&AnalyzedPost> {
        most_negative(&self.posts, self.top_posts)
    }

    pub fn avg_polarity(&self) -> f64 {
        mean(self.posts.iter().map(|p| p.classification.polarity))
    }

    pub fn avg_subjectivity(&self) -> f64 {
        mean(self.posts.iter().map(|p| p.classification.subjectivity))
    }

    pub fn polarity_range(&self) -> Option<(f64, f64)> {
        let mut it = self.posts.iter().map(|p| p.classification.polarity);
        let first = it.next()?;
        Some(it.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }
}

fn mean(it: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = it.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 { 0.0 } else { sum / n as f64 }
}

fn configure_threads(parallelism: Option<usize>) {
    if let Some(n) = parallelism {
        if n > 0 {
            rayon::ThreadPoolBuilder::new().num_threads(n).build_global().ok();
        }
    }
}

// ----------------------------- Stages ----------------------------------

/// Collect with the HTTP source and write the posts to `output`.
pub fn run_collect(opts: CollectOptions, output: &Path) -> Result<CollectOutcome> {
    let source = RedditSource::from_options(&opts)?;
    run_collect_with(source, opts, output)
}

pub fn run_collect_with<S: ListingSource>(source: S, opts: CollectOptions, output: &Path) -> Result<CollectOutcome> {
    init_tracing_once();
    tracing::info!(
        "Collecting from {} subreddit(s), {} query(ies), cap {} total / {} per subreddit",
        opts.subreddits.len(),
        opts.queries.len().max(1),
        opts.max_posts_total,
        opts.max_posts_per_subreddit
    );
    let outcome = Collector::new(source, opts).run()?;
    if outcome.failed_loops > 0 {
        tracing::warn!("{} subreddit loop(s) ended early on fetch errors", outcome.failed_loops);
    }
    save_posts(output, &outcome.posts)?;
    Ok(outcome)
}

pub fn run_merge(inputs: &[PathBuf], output: &Path) -> Result<MergeOutcome> {
    init_tracing_once();
    merge_files(inputs, output)
}

pub fn apply_filters(posts: Vec<Post>, opts: &FilterOptions) -> Result<Vec<Post>> {
    let mut posts = posts;
    if opts.relevance {
        let before = posts.len();
        posts = RelevanceFilter::new(&opts.city_keywords).apply(posts);
        tracing::info!("Relevance filter kept {} of {} posts", posts.len(), before);
    }
    if opts.areas {
        posts = AreaFilter::new(&opts.area_names, &opts.city_subreddit)?.apply(posts);
    }
    if !opts.window.is_unbounded() {
        let before = posts.len();
        posts = opts.window.apply(posts);
        tracing::info!("Date window kept {} of {} posts", posts.len(), before);
    }
    if opts.drop_pseudo_authors {
        posts = drop_pseudo_authors(posts);
    }
    Ok(posts)
}

/// What `run_filter` kept, with the breakdowns it wrote beside the output.
#[derive(Clone, Debug, Default)]
pub struct FilterOutcome {
    pub kept: usize,
    /// `(subreddit, posts)`, most posts first.
    pub by_subreddit: Vec<(String, usize)>,
    /// Empty unless the area filter ran.
    pub by_area: Vec<AreaCount>,
}

#[derive(Serialize)]
struct SubredditCount<'a> {
    subreddit: &'a str,
    posts: usize,
}

/// `<dir>/<stem>_<suffix>.csv` for an output named `<stem>.<ext...>`.
fn side_path(output: &Path, suffix: &str) -> PathBuf {
    let name = output.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let stem = name.split('.').next().filter(|s| !s.is_empty()).unwrap_or("filtered");
    output.with_file_name(format!("{stem}_{suffix}.csv"))
}

/// Filter `input` into `output`. Also writes `<stem>_breakdown.csv`
/// (posts per subreddit) and, with the area filter on, `<stem>_areas.csv`.
pub fn run_filter(input: &Path, output: &Path, opts: &FilterOptions) -> Result<FilterOutcome> {
    init_tracing_once();
    let posts = load_posts(input)?;
    let kept = apply_filters(posts, opts)?;
    save_posts(output, &kept)?;

    let by_subreddit = subreddit_counts(&kept);
    let breakdown = side_path(output, "breakdown");
    write_csv(&breakdown, by_subreddit.iter().map(|(s, n)| SubredditCount { subreddit: s, posts: *n }))?;
    tracing::info!("Wrote {}", breakdown.display());

    let by_area = if opts.areas {
        let counts = AreaFilter::new(&opts.area_names, &opts.city_subreddit)?.area_counts(&kept);
        let areas = side_path(output, "areas");
        write_csv(&areas, counts.iter())?;
        tracing::info!("Wrote {}", areas.display());
        counts
    } else {
        Vec::new()
    };

    Ok(FilterOutcome { kept: kept.len(), by_subreddit, by_area })
}

/// Write the flat CSV exports for `input` under `out_dir`. Returns the files written.
pub fn run_export(input: &Path, out_dir: &Path, opts: &ExportOptions) -> Result<Vec<PathBuf>> {
    init_tracing_once();
    let posts = load_posts(input)?;
    report::write_formatted_exports(out_dir, &posts, opts)
}

/// Classify `input`, write the analysis CSVs, the text summary and
/// `analyzed_posts.json` under `out_dir`.
pub fn run_analyze(input: &Path, out_dir: &Path, opts: &AnalyzeOptions) -> Result<Analysis> {
    init_tracing_once();
    configure_threads(opts.parallelism);
    let posts = load_posts(input)?;
    tracing::info!("Loaded {} posts from {}", posts.len(), input.display());

    let classifier = Classifier::new().with_sentiment_field(opts.sentiment_field);
    let analyzed = classifier.classify_all(&posts, opts.progress);
    let analysis = Analysis::build(analyzed, opts);

    report::write_analysis_csvs(out_dir, &analysis)?;
    report::write_summary(out_dir, &analysis)?;
    save_analyzed(&out_dir.join("analyzed_posts.json"), &analysis.posts)?;
    tracing::info!("Analysis written to {}", out_dir.display());
    Ok(analysis)
}

/// Write the HTML dataset overview, the Markdown overview and the HTML
/// sentiment dashboard for `input` under `out_dir`. Returns the files written.
pub fn run_report(input: &Path, out_dir: &Path, opts: &ReportOptions) -> Result<Vec<PathBuf>> {
    init_tracing_once();
    let posts = load_posts(input)?;
    let classifier = Classifier::new().with_sentiment_field(opts.sentiment_field);
    let analyze_opts = AnalyzeOptions::default()
        .with_sentiment_field(opts.sentiment_field)
        .with_top_posts(opts.top_posts)
        .with_progress(opts.progress);
    let analysis = Analysis::build(classifier.classify_all(&posts, opts.progress), &analyze_opts);
    report::write_overviews(out_dir, &posts, &analysis, opts)
}
