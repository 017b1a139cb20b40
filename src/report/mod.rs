//! Report writers: the numbered analysis CSVs, the plain-text summary,
//! the HTML dashboards, the Markdown dataset overview and the flat CSV exports.
//!
//! Builders return `String`s; the `write_*` functions promote them into place
//! atomically so a failed run never leaves half a report behind.

mod export;
mod html;
mod markdown;
mod tables;
mod text;

pub use export::{
    subreddit_file_stem, write_formatted_exports, EXPORT_SUMMARY_CSV, FULL_DATA_CSV, POSTS_BY_DATE_CSV,
    TOP_BY_COMMENTS_CSV, TOP_BY_UPVOTES_CSV,
};
pub use html::{dataset_overview_html, escape_html, sentiment_dashboard_html};
pub use markdown::dataset_overview_markdown;
pub use tables::{write_analysis_csvs, ANALYSIS_FILES};
pub use text::summary_text;

use crate::config::ReportOptions;
use crate::keywords::{keyword_frequency, stopword_set, TITLE_STOPWORDS};
use crate::pipeline::Analysis;
use crate::post::Post;
use crate::util::write_string_atomic;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub const SUMMARY_TXT: &str = "00_summary_report.txt";
pub const DATASET_OVERVIEW_HTML: &str = "dataset_overview.html";
pub const DATASET_OVERVIEW_MD: &str = "dataset_overview.md";
pub const SENTIMENT_OVERVIEW_HTML: &str = "sentiment_overview.html";

pub fn write_summary(dir: &Path, analysis: &Analysis) -> Result<PathBuf> {
    let path = dir.join(SUMMARY_TXT);
    write_string_atomic(&path, &summary_text(analysis)).with_context(|| format!("write {}", path.display()))?;
    Ok(path)
}

/// Write both dataset overviews and the sentiment dashboard into `dir`.
pub fn write_overviews(dir: &Path, posts: &[Post], analysis: &Analysis, opts: &ReportOptions) -> Result<Vec<PathBuf>> {
    let outputs = [
        (DATASET_OVERVIEW_HTML, dataset_overview_html(posts, opts)),
        (DATASET_OVERVIEW_MD, dataset_overview_markdown(posts, opts)),
        (SENTIMENT_OVERVIEW_HTML, sentiment_dashboard_html(analysis)),
    ];
    let mut written = Vec::with_capacity(outputs.len());
    for (name, body) in outputs {
        let path = dir.join(name);
        write_string_atomic(&path, &body).with_context(|| format!("write {}", path.display()))?;
        tracing::info!("Wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}

/// Most common title tokens longer than two letters.
fn title_vocabulary(posts: &[Post], n: usize) -> Vec<(String, usize)> {
    let stop = stopword_set(TITLE_STOPWORDS, std::iter::empty::<&str>());
    keyword_frequency(posts.iter().map(|p| p.title.as_str()), &stop, 2, n)
}

/// The first and last `n` posts in input order.
fn head_tail(posts: &[Post], n: usize) -> (&[Post], &[Post]) {
    let n = n.min(posts.len());
    (&posts[..n], &posts[posts.len() - n..])
}

/// Bar width in pixels, scaled against the largest count.
fn bar_width(count: usize, max: usize, full: f64) -> f64 {
    if max == 0 { 0.0 } else { full * count as f64 / max as f64 }
}
