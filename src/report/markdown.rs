use super::{head_tail, title_vocabulary};
use crate::config::ReportOptions;
use crate::post::{format_day, format_timestamp, Post};
use crate::stats::{
    author_counts, column_profile, comment_stats, daily_counts, date_span, hourly_counts, quality_issues,
    subreddit_counts, top_posts_by, upvote_stats, EngagementStats,
};
use crate::util::{percent, truncate_chars};
use std::fmt::Write;

/// Pipe-table with a `---` separator row. Cell text has `|` escaped and newlines flattened.
fn md_table<S: AsRef<str>>(headers: &[&str], rows: &[Vec<S>]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "| {} |", headers.join(" | "));
    let _ = writeln!(out, "| {} |", vec!["---"; headers.len()].join(" | "));
    for r in rows {
        let cells: Vec<String> = r.iter().map(|c| md_cell(c.as_ref())).collect();
        let _ = writeln!(out, "| {} |", cells.join(" | "));
    }
    out
}

fn md_cell(s: &str) -> String {
    s.replace('|', "\\|").replace(['\r', '\n'], " ")
}

fn stat_lines(md: &mut Vec<String>, stats: Option<EngagementStats>) {
    match stats {
        Some(s) => md.extend(s.rows().iter().map(|(name, v)| format!("- {name}: {v:.2}"))),
        None => md.push("_No rows._".to_string()),
    }
}

/// Markdown dataset overview: snapshot, distributions, engagement, vocabulary,
/// timeline, authors, quality flags and sample rows.
pub fn dataset_overview_markdown(posts: &[Post], opts: &ReportOptions) -> String {
    let rows = posts.len();
    let columns = column_profile(posts);
    let subs = subreddit_counts(posts);
    let mut md: Vec<String> = Vec::new();

    md.push(format!("# {} Dataset Overview\n", opts.dataset_name));
    md.push("> Auto-generated summary of the collected posts.".to_string());

    md.push("\n## 1. Dataset Snapshot\n".to_string());
    md.push(format!("- Total rows: **{rows}**"));
    md.push(format!("- Total columns: **{}**", columns.len()));
    if let Some((lo, hi, days)) = date_span(posts) {
        md.push(format!("- Date range: **{}** to **{}** ({} days)", format_timestamp(lo), format_timestamp(hi), days));
    }
    let names: Vec<&str> = subs.iter().map(|(s, _)| s.as_str()).collect();
    md.push(format!("- Subreddits present: {}", names.join(", ")));
    md.push("\n### Columns\n".to_string());
    let col_rows: Vec<Vec<String>> = columns
        .iter()
        .map(|c| vec![c.name.to_string(), c.kind.to_string(), c.non_null.to_string(), c.missing.to_string(), c.sample.clone()])
        .collect();
    md.push(md_table(&["Name", "Type", "Non-Null", "Missing", "Sample"], &col_rows));

    md.push("\n## 2. Subreddit Distribution\n".to_string());
    let sub_rows: Vec<Vec<String>> =
        subs.iter().map(|(s, n)| vec![s.clone(), n.to_string(), format!("{:.1}%", percent(*n, rows))]).collect();
    md.push(md_table(&["Subreddit", "Posts", "Percent"], &sub_rows));

    md.push("\n## 3. Engagement Statistics\n".to_string());
    md.push("### Upvotes\n".to_string());
    stat_lines(&mut md, upvote_stats(posts));
    md.push("\n### Comments\n".to_string());
    stat_lines(&mut md, comment_stats(posts));

    let n = opts.top_posts;
    md.push(format!("\n### Top {n} by Upvotes\n"));
    let up_rows: Vec<Vec<String>> = top_posts_by(posts, n, |p| p.upvotes)
        .into_iter()
        .map(|p| vec![p.upvotes.to_string(), p.comments.to_string(), p.subreddit.clone(), truncate_chars(&p.title, 80)])
        .collect();
    md.push(md_table(&["Upvotes", "Comments", "Subreddit", "Title"], &up_rows));

    md.push(format!("\n### Top {n} by Comments\n"));
    let com_rows: Vec<Vec<String>> = top_posts_by(posts, n, |p| p.comments)
        .into_iter()
        .map(|p| vec![p.comments.to_string(), p.upvotes.to_string(), p.subreddit.clone(), truncate_chars(&p.title, 80)])
        .collect();
    md.push(md_table(&["Comments", "Upvotes", "Subreddit", "Title"], &com_rows));

    md.push(format!("\n### Top {n} by Engagement Score (Upvotes + Comments)\n"));
    let eng_rows: Vec<Vec<String>> = top_posts_by(posts, n, Post::engagement)
        .into_iter()
        .map(|p| {
            vec![
                p.engagement().to_string(),
                p.upvotes.to_string(),
                p.comments.to_string(),
                p.subreddit.clone(),
                truncate_chars(&p.title, 70),
            ]
        })
        .collect();
    md.push(md_table(&["Eng.Score", "Upvotes", "Comments", "Subreddit", "Title"], &eng_rows));

    md.push(format!("\n## 4. Title Vocabulary (Top {} Tokens)\n", opts.vocabulary));
    let word_rows: Vec<Vec<String>> =
        title_vocabulary(posts, opts.vocabulary).into_iter().map(|(w, c)| vec![w, c.to_string()]).collect();
    md.push(md_table(&["Word", "Frequency"], &word_rows));

    md.push("\n## 5. Temporal Distribution\n".to_string());
    let days = daily_counts(posts);
    if days.is_empty() {
        md.push("_Date parsing failed; no temporal stats._".to_string());
    } else {
        md.push(format!("### Posts per Day (first {} days shown)\n", opts.days_shown));
        let day_rows: Vec<Vec<String>> =
            days.iter().take(opts.days_shown).map(|(d, n)| vec![format_day(*d), n.to_string()]).collect();
        md.push(md_table(&["Date", "Posts"], &day_rows));
    }
    md.push("\n### Hour of Day Posting Pattern\n".to_string());
    let hours = hourly_counts(posts);
    if hours.is_empty() {
        md.push("_Hour extraction unavailable._".to_string());
    } else {
        let hour_rows: Vec<Vec<String>> = hours.iter().map(|(h, n)| vec![h.to_string(), n.to_string()]).collect();
        md.push(md_table(&["Hour", "Posts"], &hour_rows));
    }

    md.push(format!("\n## 6. Author Activity (Top {})\n", opts.authors_shown));
    let author_rows: Vec<Vec<String>> =
        author_counts(posts, opts.authors_shown).into_iter().map(|(a, n)| vec![a, n.to_string()]).collect();
    md.push(md_table(&["Author", "Posts"], &author_rows));

    md.push("\n## 7. Data Quality Checks\n".to_string());
    md.extend(quality_issues(posts).into_iter().map(|i| format!("- {i}")));

    md.push("\n## 8. Sample Records\n".to_string());
    let (head, tail) = head_tail(posts, opts.sample_rows);
    let sample_headers = ["Date", "Subreddit", "Upvotes", "Comments", "Title"];
    md.push(format!("### Head (first {})\n", head.len()));
    md.push(md_table(&sample_headers, &head.iter().map(sample_row).collect::<Vec<_>>()));
    md.push(format!("### Tail (last {})\n", tail.len()));
    md.push(md_table(&sample_headers, &tail.iter().map(sample_row).collect::<Vec<_>>()));

    let mut out = md.join("\n");
    out.push('\n');
    out
}

fn sample_row(p: &Post) -> Vec<String> {
    vec![
        p.created_at.map(format_timestamp).unwrap_or_default(),
        p.subreddit.clone(),
        p.upvotes.to_string(),
        p.comments.to_string(),
        truncate_chars(&p.title, 60),
    ]
}
