use crate::config::ExportOptions;
use crate::post::{format_timestamp, Post};
use crate::stats::{date_span, top_posts_by};
use crate::store::write_csv;
use anyhow::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const EXPORT_SUMMARY_CSV: &str = "01_summary.csv";
pub const TOP_BY_UPVOTES_CSV: &str = "02_top_by_upvotes.csv";
pub const TOP_BY_COMMENTS_CSV: &str = "03_top_by_comments.csv";
pub const POSTS_BY_DATE_CSV: &str = "05_posts_by_date.csv";
pub const FULL_DATA_CSV: &str = "06_full_data.csv";

#[derive(Serialize)]
struct MetricRow {
    #[serde(rename = "Metric")]
    metric: &'static str,
    #[serde(rename = "Value")]
    value: String,
}

#[derive(Serialize)]
struct ListedPost<'a> {
    title: &'a str,
    author: &'a str,
    upvotes: i64,
    comments: i64,
    subreddit: &'a str,
    date: String,
    url: &'a str,
}

impl<'a> From<&'a Post> for ListedPost<'a> {
    fn from(p: &'a Post) -> Self {
        Self {
            title: &p.title,
            author: &p.author,
            upvotes: p.upvotes,
            comments: p.comments,
            subreddit: &p.subreddit,
            date: p.created_at.map(format_timestamp).unwrap_or_default(),
            url: &p.url,
        }
    }
}

/// Same columns as `ListedPost` minus the subreddit, which the file name carries.
#[derive(Serialize)]
struct SubredditPost<'a> {
    title: &'a str,
    author: &'a str,
    upvotes: i64,
    comments: i64,
    date: String,
    url: &'a str,
}

impl<'a> From<&'a Post> for SubredditPost<'a> {
    fn from(p: &'a Post) -> Self {
        Self {
            title: &p.title,
            author: &p.author,
            upvotes: p.upvotes,
            comments: p.comments,
            date: p.created_at.map(format_timestamp).unwrap_or_default(),
            url: &p.url,
        }
    }
}

fn summary_rows(posts: &[Post]) -> Vec<MetricRow> {
    let n = posts.len();
    let total_up = posts.iter().fold(0i64, |acc, p| acc.saturating_add(p.upvotes));
    let total_com = posts.iter().fold(0i64, |acc, p| acc.saturating_add(p.comments));
    let avg = |field: fn(&Post) -> i64| {
        if n == 0 { 0.0 } else { posts.iter().map(|p| field(p) as f64).sum::<f64>() / n as f64 }
    };
    let range = match date_span(posts) {
        Some((lo, hi, _)) => format!("{} to {}", format_timestamp(lo), format_timestamp(hi)),
        None => "n/a".to_string(),
    };
    vec![
        MetricRow { metric: "Total Posts", value: n.to_string() },
        MetricRow { metric: "Total Upvotes", value: total_up.to_string() },
        MetricRow { metric: "Total Comments", value: total_com.to_string() },
        MetricRow { metric: "Avg Upvotes", value: format!("{:.2}", avg(|p| p.upvotes)) },
        MetricRow { metric: "Avg Comments", value: format!("{:.2}", avg(|p| p.comments)) },
        MetricRow { metric: "Date Range", value: range },
    ]
}

/// File-name-safe form of a subreddit name; anything outside `[A-Za-z0-9_-]`
/// becomes `_`, and an empty name becomes `unknown`.
pub fn subreddit_file_stem(subreddit: &str) -> String {
    let s: String = subreddit
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
        .collect();
    if s.is_empty() { "unknown".to_string() } else { s }
}

/// Posts grouped by sanitized subreddit, groups in first-seen order.
fn by_subreddit(posts: &[Post]) -> Vec<(String, Vec<Post>)> {
    let mut groups: Vec<(String, Vec<Post>)> = Vec::new();
    for p in posts {
        let stem = subreddit_file_stem(&p.subreddit);
        match groups.iter_mut().find(|(s, _)| *s == stem) {
            Some((_, g)) => g.push(p.clone()),
            None => groups.push((stem, vec![p.clone()])),
        }
    }
    groups
}

fn write_table<T, I>(dir: &Path, name: &str, rows: I, written: &mut Vec<PathBuf>) -> Result<()>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    let path = dir.join(name);
    write_csv(&path, rows)?;
    tracing::info!("Wrote {}", path.display());
    written.push(path);
    Ok(())
}

/// Write the flat spreadsheet exports into `dir`: a metric summary, the top
/// posts by upvotes and by comments, one file per subreddit (upvotes
/// descending), every post newest first (undated last), and the full data.
pub fn write_formatted_exports(dir: &Path, posts: &[Post], opts: &ExportOptions) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    write_table(dir, EXPORT_SUMMARY_CSV, summary_rows(posts), &mut written)?;

    let top_up = top_posts_by(posts, opts.top_posts, |p| p.upvotes);
    write_table(dir, TOP_BY_UPVOTES_CSV, top_up.into_iter().map(ListedPost::from), &mut written)?;
    let top_com = top_posts_by(posts, opts.top_posts, |p| p.comments);
    write_table(dir, TOP_BY_COMMENTS_CSV, top_com.into_iter().map(ListedPost::from), &mut written)?;

    for (stem, group) in by_subreddit(posts) {
        let rows = top_posts_by(&group, group.len(), |p| p.upvotes);
        write_table(dir, &format!("04_posts_{stem}.csv"), rows.into_iter().map(SubredditPost::from), &mut written)?;
    }

    // None sorts below Some, so undated posts land last
    let mut newest: Vec<&Post> = posts.iter().collect();
    newest.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    write_table(dir, POSTS_BY_DATE_CSV, newest.into_iter().map(ListedPost::from), &mut written)?;
    write_table(dir, FULL_DATA_CSV, posts.iter(), &mut written)?;

    Ok(written)
}
