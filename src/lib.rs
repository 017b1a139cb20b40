mod config;
mod post;
mod util;
mod progress;
mod pipeline;

mod collect;
mod filters;
mod merge;
mod ndjson;
mod store;

mod lexicon;
mod sentiment;
mod emotion;
mod topics;
mod keywords;
mod classify;

mod aggregate;
mod stats;
mod report;

pub use crate::config::{
    AnalyzeOptions, CollectMode, CollectOptions, ExportOptions, FilterOptions, ReportOptions, SentimentField,
    DEFAULT_BASE_URL, DEFAULT_USER_AGENT,
};
pub use crate::post::{format_day, format_timestamp, from_unix_seconds, parse_timestamp, Post, DELETED_AUTHOR};
pub use crate::pipeline::{
    apply_filters, run_analyze, run_collect, run_collect_with, run_export, run_filter, run_merge, run_report, Analysis,
    FilterOutcome,
};

// export collection: the page source seam, the HTTP source and the paginating collector
pub use crate::collect::{
    chunk_queries, parse_listing, CollectOutcome, Collector, Listing, ListingSource, PageRequest, RedditSource,
};

// export filters and URL-dedup merge
pub use crate::filters::{
    drop_pseudo_authors, mentions_any, AreaCount, AreaFilter, DateWindow, RelevanceFilter, DEFAULT_AREAS,
    DEFAULT_CITY_KEYWORDS, DEFAULT_CITY_SUBREDDIT,
};
pub use crate::merge::{expand_inputs, merge_by_url, merge_files, MergeOutcome};

// export NDJSON helpers and format-dispatching load/save
pub use crate::ndjson::{is_zst, NdjsonReader, NdjsonWriter};
pub use crate::store::{load_analyzed, load_posts, save_analyzed, save_posts, write_csv, Format};

// export classification
pub use crate::sentiment::{
    analyze_sentiment, label_for, LexiconScorer, PolarityScorer, Sentiment, SentimentScore, NEGATIVE_THRESHOLD,
    POSITIVE_THRESHOLD,
};
pub use crate::emotion::{detect_emotion, emotion_scores, Emotion};
pub use crate::topics::{TopicTable, DEFAULT_TOPICS, GENERAL, GENERAL_INTEREST_TOPICS};
pub use crate::keywords::{keyword_frequency, stopword_set, STOPWORDS, TITLE_STOPWORDS};
pub use crate::classify::{AnalyzedPost, AnalyzedRow, ClassificationResult, Classifier, TOPIC_SEPARATOR};

// export aggregation and dataset statistics
pub use crate::aggregate::{
    aggregate, aggregate_all, emotion_distribution, most_negative, most_positive, sentiment_distribution,
    subjectivity_bands, top_by_upvotes_with, top_n_by, topic_counts, AggregateRow, Aggregator, Distribution,
    GroupKey, GroupStats, SentimentBreakdown,
};
pub use crate::stats::{
    author_counts, column_profile, comment_stats, daily_counts, date_span, hourly_counts, media_counts,
    quality_issues, subreddit_counts, top_posts_by, upvote_stats, ColumnProfile, EngagementStats,
};

// export report builders and writers
pub use crate::report::{
    dataset_overview_html, dataset_overview_markdown, escape_html, sentiment_dashboard_html, subreddit_file_stem,
    summary_text, write_analysis_csvs, write_formatted_exports, write_overviews, write_summary, ANALYSIS_FILES,
    DATASET_OVERVIEW_HTML, DATASET_OVERVIEW_MD, EXPORT_SUMMARY_CSV, FULL_DATA_CSV, POSTS_BY_DATE_CSV,
    SENTIMENT_OVERVIEW_HTML, SUMMARY_TXT, TOP_BY_COMMENTS_CSV, TOP_BY_UPVOTES_CSV,
};

// Expose progress and tracing helpers to the binary.
pub use crate::progress::{make_count_progress, make_spinner, ProgressScope};
pub use crate::util::{init_tracing_once, normalize_subreddit, percent, truncate_chars};
