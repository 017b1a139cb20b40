//! Post-level filters: city relevance, neighbourhood mentions, date bounds,
//! and pseudo-author removal.

use crate::post::Post;
use anyhow::{Context, Result};
use regex::{Regex, RegexBuilder};
use serde::Serialize;
use time::{Duration, OffsetDateTime};

pub const DEFAULT_CITY_KEYWORDS: &[&str] = &["dhaka", "bangladesh", "bd", "bengal"];

pub const DEFAULT_CITY_SUBREDDIT: &str = "dhaka";

/// Neighbourhoods and city-corporation names used by `AreaFilter::with_defaults`.
pub const DEFAULT_AREAS: &[&str] = &[
    "dncc", "dscc", "dhaka north city corporation", "dhaka south city corporation",
    "uttara", "mirpur", "pallabi", "airport", "shahjalal", "mohammadpur", "dhanmondi", "shyamoli", "tejgaon",
    "turag", "banani", "gulshan", "badda", "khilgaon", "shantinagar", "kallyanpur", "gabtoli", "agargaon",
    "old dhaka", "puran dhaka", "sadarghat", "lalbagh", "kotwali", "kamrangirchar", "motijheel", "ramna",
    "baridhara", "jatrabari", "paltan", "banasree", "demra", "wari",
    "uttarkhan", "bashundhara", "mohakhali", "rampura", "khilkhet", "niketon", "kafrul",
    "dhaka",
];

/// Keep posts whose lowercased title contains any city keyword (substring match).
#[derive(Clone, Debug)]
pub struct RelevanceFilter {
    keywords: Vec<String>,
}

impl Default for RelevanceFilter {
    fn default() -> Self {
        Self::new(DEFAULT_CITY_KEYWORDS.iter().copied())
    }
}

impl RelevanceFilter {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        Self { keywords }
    }

    pub fn matches(&self, post: &Post) -> bool {
        let title = post.title.to_lowercase();
        self.keywords.iter().any(|k| title.contains(k.as_str()))
    }

    pub fn apply(&self, posts: Vec<Post>) -> Vec<Post> {
        posts.into_iter().filter(|p| self.matches(p)).collect()
    }
}

/// Whole-word neighbourhood matcher over title + body. Spaces inside an area
/// name also match hyphens (`old dhaka` matches `old-dhaka`). Posts from the
/// city subreddit always pass.
#[derive(Clone, Debug)]
pub struct AreaFilter {
    areas: Vec<(String, Regex)>,
    any: Option<Regex>,
    city_subreddit: String,
}

fn area_pattern(area: &str) -> String {
    let parts: Vec<String> = area.split_whitespace().map(regex::escape).collect();
    format!(r"\b{}\b", parts.join(r"[\s-]"))
}

impl AreaFilter {
    pub fn new<I, S>(areas: I, city_subreddit: &str) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut compiled = Vec::new();
        let mut patterns = Vec::new();
        for a in areas {
            let name = a.as_ref().trim().to_lowercase();
            if name.is_empty() {
                continue;
            }
            let pat = area_pattern(&name);
            let re = RegexBuilder::new(&pat)
                .case_insensitive(true)
                .build()
                .with_context(|| format!("area pattern for '{name}'"))?;
            patterns.push(pat);
            compiled.push((name, re));
        }
        let any = if patterns.is_empty() {
            None
        } else {
            Some(RegexBuilder::new(&patterns.join("|")).case_insensitive(true).build().context("combined area pattern")?)
        };
        Ok(Self { areas: compiled, any, city_subreddit: crate::util::normalize_subreddit(city_subreddit) })
    }

    pub fn with_defaults() -> Result<Self> {
        Self::new(DEFAULT_AREAS.iter().copied(), DEFAULT_CITY_SUBREDDIT)
    }

    pub fn mentions_area(&self, post: &Post) -> bool {
        self.any.as_ref().is_some_and(|re| re.is_match(&post.text()))
    }

    /// Areas mentioned in `post`, in list order.
    pub fn areas_mentioned(&self, post: &Post) -> Vec<&str> {
        let text = post.text();
        self.areas.iter().filter(|(_, re)| re.is_match(&text)).map(|(n, _)| n.as_str()).collect()
    }

    pub fn matches(&self, post: &Post) -> bool {
        (!self.city_subreddit.is_empty() && post.subreddit_lower() == self.city_subreddit) || self.mentions_area(post)
    }

    /// Per-area mention counts for the areas at least one post mentions,
    /// most-mentioned first; ties keep list order.
    pub fn area_counts(&self, posts: &[Post]) -> Vec<AreaCount> {
        let texts: Vec<String> = posts.iter().map(Post::text).collect();
        let mut out: Vec<AreaCount> = self
            .areas
            .iter()
            .filter_map(|(name, re)| {
                let hits: Vec<&Post> =
                    posts.iter().zip(&texts).filter(|(_, t)| re.is_match(t)).map(|(p, _)| p).collect();
                if hits.is_empty() {
                    return None;
                }
                let n = hits.len() as f64;
                let up: f64 = hits.iter().map(|p| p.upvotes as f64).sum();
                let com: f64 = hits.iter().map(|p| p.comments as f64).sum();
                let total = hits.iter().fold(0i64, |acc, p| acc.saturating_add(p.engagement()));
                Some(AreaCount {
                    area: name.clone(),
                    posts: hits.len(),
                    avg_upvotes: up / n,
                    avg_comments: com / n,
                    total_engagement: total,
                })
            })
            .collect();
        out.sort_by(|a, b| b.posts.cmp(&a.posts));
        out
    }

    pub fn apply(&self, posts: Vec<Post>) -> Vec<Post> {
        let before = posts.len();
        let kept: Vec<Post> = posts.into_iter().filter(|p| self.matches(p)).collect();
        tracing::info!("Area filter kept {} of {} posts", kept.len(), before);
        kept
    }
}

/// One row of the area breakdown written next to area-filtered output.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AreaCount {
    pub area: String,
    pub posts: usize,
    pub avg_upvotes: f64,
    pub avg_comments: f64,
    pub total_engagement: i64,
}

/// Inclusive creation-time bounds. With any bound set, posts without a
/// timestamp are rejected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DateWindow {
    pub start: Option<OffsetDateTime>,
    pub end: Option<OffsetDateTime>,
}

impl DateWindow {
    pub fn new(start: Option<OffsetDateTime>, end: Option<OffsetDateTime>) -> Self {
        Self { start, end }
    }

    pub fn last_days(days: u32) -> Self {
        Self::since(OffsetDateTime::now_utc(), days)
    }

    /// `days` days back from `now`, open-ended at the top.
    pub fn since(now: OffsetDateTime, days: u32) -> Self {
        Self { start: Some(now - Duration::days(days as i64)), end: None }
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn contains(&self, ts: Option<OffsetDateTime>) -> bool {
        if self.is_unbounded() {
            return true;
        }
        match ts {
            Some(t) => self.start.map_or(true, |s| t >= s) && self.end.map_or(true, |e| t <= e),
            None => false,
        }
    }

    /// True when `ts` is older than the start bound. Listings come newest
    /// first, so such a post marks the end of the window.
    pub fn is_before_start(&self, ts: Option<OffsetDateTime>) -> bool {
        matches!((self.start, ts), (Some(s), Some(t)) if t < s)
    }

    pub fn apply(&self, posts: Vec<Post>) -> Vec<Post> {
        posts.into_iter().filter(|p| self.contains(p.created_at)).collect()
    }
}

/// Drop posts by `[deleted]`, `[removed]`, or with an empty author.
pub fn drop_pseudo_authors(posts: Vec<Post>) -> Vec<Post> {
    posts.into_iter().filter(|p| !p.is_pseudo_author()).collect()
}

/// Case-insensitive substring check used for the collector's `must_mention` list.
pub fn mentions_any(post: &Post, keywords: &[String]) -> bool {
    let text = post.text().to_lowercase();
    keywords.iter().any(|k| text.contains(k.as_str()))
}
