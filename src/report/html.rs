use super::{bar_width, head_tail, title_vocabulary};
use crate::aggregate::Distribution;
use crate::classify::{AnalyzedPost, TOPIC_SEPARATOR};
use crate::config::ReportOptions;
use crate::pipeline::Analysis;
use crate::post::{format_day, format_timestamp, Post};
use crate::stats::{
    column_profile, comment_stats, daily_counts, date_span, hourly_counts, author_counts, media_counts,
    quality_issues, subreddit_counts, top_posts_by, upvote_stats, EngagementStats,
};
use crate::util::{percent, truncate_chars};
use std::fmt::Write;

const STYLE: &str = "body{font-family:Segoe UI,Arial,sans-serif;margin:24px;background:#fafafa;color:#222}\
h1,h2{margin-top:36px}table{border-collapse:collapse;width:100%;margin:12px 0;font-size:14px}\
th,td{border:1px solid #ddd;padding:6px;vertical-align:top}th{background:#222;color:#fff;position:sticky;top:0}\
tr:nth-child(even){background:#f4f4f4}.grid{display:grid;grid-template-columns:repeat(auto-fit,minmax(220px,1fr));gap:12px}\
.card{background:#fff;border:1px solid #ddd;border-radius:6px;padding:12px;box-shadow:0 1px 2px rgba(0,0,0,.06)}\
.pill{background:#4A90E2;color:#fff;padding:2px 8px;border-radius:20px;font-size:12px;margin-right:6px}\
.bar{height:14px;background:#4A90E2;border-radius:3px}.row{display:flex;gap:12px;align-items:center;margin:4px 0}\
.label{width:140px;font-size:12px}.small{font-size:12px;color:#555}.mono{font-family:Consolas,monospace;font-size:12px}\
.warn{color:#B00020;font-weight:600}.ok{color:#0A7F2E;font-weight:600}details{margin:8px 0}summary{cursor:pointer;font-weight:600}";

const FILTER_SCRIPT: &str = "<script>function filterTable(id,val){const v=val.toLowerCase();\
document.querySelectorAll('#'+id+' tbody tr').forEach(r=>{r.style.display=r.textContent.toLowerCase().includes(v)?'':'none';});}</script>";

const BAR_PX: f64 = 220.0;
const TITLE_CHARS: usize = 140;

/// Escape text for HTML element content and quoted attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn open_page(out: &mut String, title: &str, script: bool) {
    let _ = write!(
        out,
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"UTF-8\" /><title>{}</title><style>{}</style>",
        escape_html(title),
        STYLE
    );
    if script {
        out.push_str(FILTER_SCRIPT);
    }
    let _ = write!(out, "</head><body><h1>{}</h1>", escape_html(title));
}

fn close_page(out: &mut String, hint: &str) {
    let _ = write!(out, "<p class=\"small\">{}</p></body></html>", escape_html(hint));
}

fn card(out: &mut String, label: &str, value: &str) {
    let _ = write!(
        out,
        "<div class=\"card\"><h3>{}</h3><div class=\"pill\">{}</div></div>",
        escape_html(label),
        escape_html(value)
    );
}

fn bar_row(out: &mut String, label: &str, count: usize, max: usize, total: usize) {
    let _ = write!(
        out,
        "<div class=\"row\"><div class=\"label\">{}</div><div class=\"bar\" style=\"width:{:.1}px\"></div><div class=\"small\">{} ({:.1}%)</div></div>",
        escape_html(label),
        bar_width(count, max, BAR_PX),
        count,
        percent(count, total)
    );
}

fn distribution_bars(out: &mut String, items: &[Distribution], total: usize) {
    let max = items.iter().map(|d| d.count).max().unwrap_or(0);
    for d in items {
        bar_row(out, &title_case(&d.label), d.count, max, total);
    }
}

fn table_head(out: &mut String, id: Option<&str>, headers: &[&str]) {
    match id {
        Some(id) => {
            let _ = write!(out, "<table id=\"{}\">", escape_html(id));
        }
        None => out.push_str("<table>"),
    }
    out.push_str("<thead><tr>");
    for h in headers {
        let _ = write!(out, "<th>{}</th>", escape_html(h));
    }
    out.push_str("</tr></thead><tbody>");
}

fn table_row<S: AsRef<str>>(out: &mut String, cells: &[S]) {
    out.push_str("<tr>");
    for c in cells {
        let _ = write!(out, "<td>{}</td>", escape_html(c.as_ref()));
    }
    out.push_str("</tr>");
}

fn table_end(out: &mut String) {
    out.push_str("</tbody></table>");
}

fn title_case(s: &str) -> String {
    s.split(' ')
        .map(|w| {
            let mut c = w.chars();
            match c.next() {
                Some(f) => f.to_uppercase().chain(c).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ----------------------------- Sentiment dashboard ----------------------------------

/// Sentiment, emotion and topic breakdowns plus the most polar posts.
pub fn sentiment_dashboard_html(analysis: &Analysis) -> String {
    let total = analysis.len();
    let mut out = String::new();
    open_page(&mut out, "Sentiment Analysis Overview", false);
    let _ = write!(out, "<p class=\"small\">Generated: {} UTC</p>", format_timestamp(analysis.generated_at));

    out.push_str("<div class=\"grid\">");
    card(&mut out, "Total Posts", &total.to_string());
    card(&mut out, "Avg Polarity", &format!("{:.3}", analysis.avg_polarity()));
    card(&mut out, "Avg Subjectivity", &format!("{:.3}", analysis.avg_subjectivity()));
    out.push_str("</div>");

    if !analysis.sentiments.is_empty() {
        out.push_str("<h2>1) Sentiment Distribution</h2>");
        distribution_bars(&mut out, &analysis.sentiments, total);
    }
    if !analysis.emotions.is_empty() {
        out.push_str("<h2>2) Emotion Distribution</h2>");
        distribution_bars(&mut out, &analysis.emotions, total);
    }
    if !analysis.topics.is_empty() {
        out.push_str("<h2>3) Top Topics</h2><div>");
        let top: Vec<Distribution> = analysis.topics.iter().take(20).cloned().collect();
        let max = top.iter().map(|d| d.count).max().unwrap_or(0);
        for d in &top {
            bar_row(&mut out, &d.label, d.count, max, total);
        }
        out.push_str("</div>");
    }

    let headers = ["Topic", "Posts", "Positive", "Negative", "Neutral", "Avg Polarity"];
    if !analysis.by_topic.is_empty() {
        out.push_str("<h2>4) Sentiment by Topic</h2>");
        table_head(&mut out, None, &headers);
        for r in analysis.by_topic.iter().take(12) {
            let b = &r.sentiment_breakdown;
            table_row(
                &mut out,
                &[
                    r.group_key.clone(),
                    r.post_count.to_string(),
                    b.positive.to_string(),
                    b.negative.to_string(),
                    b.neutral.to_string(),
                    format!("{:.3}", r.avg_polarity),
                ],
            );
        }
        table_end(&mut out);
    }
    if !analysis.by_subreddit.is_empty() {
        out.push_str("<h2>5) Subreddit Comparison</h2>");
        let mut headers = headers;
        headers[0] = "Subreddit";
        table_head(&mut out, None, &headers);
        for r in &analysis.by_subreddit {
            let b = &r.sentiment_breakdown;
            table_row(
                &mut out,
                &[
                    r.group_key.clone(),
                    r.post_count.to_string(),
                    b.positive.to_string(),
                    b.negative.to_string(),
                    b.neutral.to_string(),
                    format!("{:.3}", r.avg_polarity),
                ],
            );
        }
        table_end(&mut out);
    }

    let polar = [("6) Top Positive Posts", analysis.most_positive()), ("7) Top Negative Posts", analysis.most_negative())];
    for (heading, posts) in polar {
        if posts.is_empty() {
            continue;
        }
        let _ = write!(out, "<h2>{heading}</h2>");
        table_head(&mut out, None, &["Polarity", "Subreddit", "Title", "Emotion", "Topics", "Upvotes", "Comments"]);
        for p in posts {
            table_row(&mut out, &polar_cells(p));
        }
        table_end(&mut out);
    }

    close_page(&mut out, "Tip: Press Ctrl+F in your browser to search within this page.");
    out
}

fn polar_cells(p: &AnalyzedPost) -> [String; 7] {
    [
        format!("{:.3}", p.classification.polarity),
        p.post.subreddit.clone(),
        truncate_chars(&p.post.title, TITLE_CHARS),
        p.classification.emotion.as_str().to_string(),
        p.classification.topics.join(TOPIC_SEPARATOR),
        p.post.upvotes.to_string(),
        p.post.comments.to_string(),
    ]
}

// ----------------------------- Dataset overview ----------------------------------

/// Structure, engagement, timeline and quality overview of a raw post set.
pub fn dataset_overview_html(posts: &[Post], opts: &ReportOptions) -> String {
    let rows = posts.len();
    let title = format!("{} Dataset Overview", opts.dataset_name);
    let mut out = String::new();
    open_page(&mut out, &title, true);

    let span = date_span(posts);
    let subs = subreddit_counts(posts);
    let columns = column_profile(posts);

    out.push_str("<div class=\"grid\">");
    card(&mut out, "Rows", &rows.to_string());
    card(&mut out, "Columns", &columns.len().to_string());
    if let Some((_, _, days)) = span {
        card(&mut out, "Date Span", &format!("{days} days"));
    }
    if !subs.is_empty() {
        card(&mut out, "Subreddits", &subs.len().to_string());
    }
    out.push_str("</div>");
    if let Some((lo, hi, _)) = span {
        let _ = write!(
            out,
            "<p class=\"small\">Date range: {} to {}</p>",
            format_timestamp(lo),
            format_timestamp(hi)
        );
    }

    out.push_str("<h2>1. Column Dictionary</h2>");
    out.push_str("<input placeholder=\"Filter columns...\" oninput=\"filterTable('col_table',this.value)\" style=\"padding:6px;width:240px;border:1px solid #ccc;border-radius:4px\" />");
    table_head(&mut out, Some("col_table"), &["Name", "Type", "Non-Null", "Missing", "Sample"]);
    for c in &columns {
        table_row(&mut out, &[c.name.to_string(), c.kind.to_string(), c.non_null.to_string(), c.missing.to_string(), c.sample.clone()]);
    }
    table_end(&mut out);

    if !subs.is_empty() {
        out.push_str("<h2>2. Subreddit Distribution</h2><div>");
        let max = subs.first().map(|(_, n)| *n).unwrap_or(0);
        for (s, n) in &subs {
            bar_row(&mut out, s, *n, max, rows);
        }
        out.push_str("</div>");
    }

    if let (Some(up), Some(com)) = (upvote_stats(posts), comment_stats(posts)) {
        out.push_str("<h2>3. Engagement Statistics</h2><div class=\"grid\">");
        stat_cards(&mut out, "Upvotes", &up);
        stat_cards(&mut out, "Comments", &com);
        out.push_str("</div>");
    }

    out.push_str("<h2>4. Top Posts</h2>");
    let n = opts.top_posts;
    top_table(&mut out, &format!("Top {n} by Upvotes"), &["Upvotes", "Comments", "Subreddit", "Title"], top_posts_by(posts, n, |p| p.upvotes), |p| {
        vec![p.upvotes.to_string(), p.comments.to_string(), p.subreddit.clone(), truncate_chars(&p.title, 120)]
    });
    top_table(&mut out, &format!("Top {n} by Comments"), &["Comments", "Upvotes", "Subreddit", "Title"], top_posts_by(posts, n, |p| p.comments), |p| {
        vec![p.comments.to_string(), p.upvotes.to_string(), p.subreddit.clone(), truncate_chars(&p.title, 120)]
    });
    top_table(
        &mut out,
        &format!("Top {n} by Engagement Score"),
        &["Engagement", "Upvotes", "Comments", "Subreddit", "Title"],
        top_posts_by(posts, n, Post::engagement),
        |p| vec![p.engagement().to_string(), p.upvotes.to_string(), p.comments.to_string(), p.subreddit.clone(), truncate_chars(&p.title, 120)],
    );

    let vocab = title_vocabulary(posts, opts.vocabulary);
    let _ = write!(out, "<h2>5. Title Vocabulary (Top {})</h2>", opts.vocabulary);
    out.push_str("<table><thead><tr><th>Word</th><th>Freq</th><th>Bar</th></tr></thead><tbody>");
    let max_word = vocab.first().map(|(_, c)| *c).unwrap_or(0);
    for (w, c) in &vocab {
        let _ = write!(
            out,
            "<tr><td>{}</td><td>{}</td><td><div class=\"bar\" style=\"width:{:.1}px\"></div></td></tr>",
            escape_html(w),
            c,
            bar_width(*c, max_word, 200.0)
        );
    }
    table_end(&mut out);

    out.push_str("<h2>6. Temporal Distribution</h2>");
    let days = daily_counts(posts);
    if days.is_empty() {
        out.push_str("<p class=\"small\">No parsed date data available.</p>");
    } else {
        out.push_str("<h4>Posts per Day</h4>");
        table_head(&mut out, None, &["Date", "Posts"]);
        for (d, n) in &days {
            table_row(&mut out, &[format_day(*d), n.to_string()]);
        }
        table_end(&mut out);
    }
    let hours = hourly_counts(posts);
    if !hours.is_empty() {
        out.push_str("<h4>Posts by Hour (UTC)</h4><div>");
        let max = hours.iter().map(|(_, n)| *n).max().unwrap_or(0);
        for (h, n) in &hours {
            bar_row(&mut out, &format!("Hour {h}"), *n, max, rows);
        }
        out.push_str("</div>");
    }

    let authors = author_counts(posts, opts.authors_shown);
    if !authors.is_empty() {
        out.push_str("<h2>7. Top Authors</h2>");
        table_head(&mut out, None, &["Author", "Posts"]);
        for (a, n) in &authors {
            table_row(&mut out, &[a.clone(), n.to_string()]);
        }
        table_end(&mut out);
    }

    let media = media_counts(posts);
    if !media.is_empty() {
        out.push_str("<h2>8. Media Types</h2><div>");
        let max = media.first().map(|(_, n)| *n).unwrap_or(0);
        for (m, n) in &media {
            bar_row(&mut out, m, *n, max, rows);
        }
        out.push_str("</div>");
    }

    out.push_str("<h2>9. Data Quality</h2><ul>");
    for issue in quality_issues(posts) {
        let class = if issue.starts_with("No major") { "ok" } else { "warn" };
        let _ = write!(out, "<li class=\"{}\">{}</li>", class, escape_html(&issue));
    }
    out.push_str("</ul>");

    let (head, tail) = head_tail(posts, opts.sample_rows);
    let sample_headers = ["Date", "Subreddit", "Upvotes", "Comments", "Title"];
    out.push_str("<h2>10. Sample Records</h2>");
    let _ = write!(out, "<details open><summary>Head (first {})</summary>", head.len());
    table_head(&mut out, None, &sample_headers);
    for p in head {
        table_row(&mut out, &sample_cells(p));
    }
    table_end(&mut out);
    let _ = write!(out, "</details><details><summary>Tail (last {})</summary>", tail.len());
    table_head(&mut out, None, &sample_headers);
    for p in tail {
        table_row(&mut out, &sample_cells(p));
    }
    table_end(&mut out);
    out.push_str("</details>");

    close_page(&mut out, "Use browser Find (Ctrl+F) or the column filter box to locate fields.");
    out
}

fn stat_cards(out: &mut String, label: &str, stats: &EngagementStats) {
    for (name, v) in stats.rows() {
        let _ = write!(
            out,
            "<div class=\"card\"><h4>{} {}</h4><div class=\"mono\">{:.2}</div></div>",
            escape_html(label),
            escape_html(name),
            v
        );
    }
}

fn top_table<F>(out: &mut String, summary: &str, headers: &[&str], posts: Vec<&Post>, cells: F)
where
    F: Fn(&Post) -> Vec<String>,
{
    let _ = write!(out, "<details open><summary>{}</summary>", escape_html(summary));
    table_head(out, None, headers);
    for p in posts {
        table_row(out, &cells(p));
    }
    table_end(out);
    out.push_str("</details>");
}

fn sample_cells(p: &Post) -> [String; 5] {
    [
        p.created_at.map(format_timestamp).unwrap_or_default(),
        p.subreddit.clone(),
        p.upvotes.to_string(),
        p.comments.to_string(),
        truncate_chars(&p.title, 120),
    ]
}
