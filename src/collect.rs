//! Paginated collection of subreddit listings.
//!
//! `ListingSource` is the fetch seam: `RedditSource` talks to the public JSON
//! endpoints, tests plug in an in-memory source. `Collector` owns the loop:
//! cursor pagination, per-subreddit and global caps, the date window (paging
//! stops once a post older than its start shows up), a fixed delay between
//! pages, and url dedup across queries. There is no retry; a
//! failed page ends the current (query, subreddit) loop only.

use crate::config::{CollectMode, CollectOptions};
use crate::filters::mentions_any;
use crate::post::{from_unix_seconds, Post};
use crate::progress::ProgressScope;
use ahash::AHashSet;
use anyhow::{anyhow, bail, Context, Result};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;

/// One page request against a subreddit listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub subreddit: String,
    pub query: Option<String>,
    pub mode: CollectMode,
    pub after: Option<String>,
    pub limit: u32,
}

impl PageRequest {
    pub fn path(&self) -> String {
        match self.mode {
            CollectMode::Search => format!("/r/{}/search.json", self.subreddit),
            CollectMode::New => format!("/r/{}/new.json", self.subreddit),
        }
    }

    /// Query-string parameters, in request order.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut p: Vec<(&'static str, String)> = Vec::with_capacity(6);
        if self.mode == CollectMode::Search {
            p.push(("q", self.query.clone().unwrap_or_default()));
            p.push(("restrict_sr", "on".to_string()));
            p.push(("sort", "new".to_string()));
        }
        p.push(("limit", self.limit.to_string()));
        if self.mode == CollectMode::Search {
            p.push(("t", "all".to_string()));
        }
        if let Some(a) = &self.after {
            p.push(("after", a.clone()));
        }
        p
    }
}

/// Posts from one page plus the cursor for the next (`None` when exhausted).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Listing {
    pub posts: Vec<Post>,
    pub after: Option<String>,
}

pub trait ListingSource {
    fn fetch_page(&self, req: &PageRequest) -> Result<Listing>;
}

impl<T: ListingSource + ?Sized> ListingSource for &T {
    fn fetch_page(&self, req: &PageRequest) -> Result<Listing> {
        (**self).fetch_page(req)
    }
}

// ----------------------------- Reddit JSON ----------------------------------

#[derive(Deserialize)]
struct RawListing {
    data: RawListingData,
}

#[derive(Deserialize)]
struct RawListingData {
    #[serde(default)]
    children: Vec<RawChild>,
    #[serde(default)]
    after: Option<String>,
}

#[derive(Deserialize)]
struct RawChild {
    data: RawPost,
}

#[derive(Deserialize)]
struct RawPost {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    selftext: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    score: Option<i64>,
    #[serde(default)]
    num_comments: Option<i64>,
    #[serde(default)]
    created_utc: Option<f64>,
    #[serde(default)]
    subreddit: Option<String>,
    #[serde(default)]
    permalink: Option<String>,
}

impl RawPost {
    fn into_post(self, base_url: &str) -> Post {
        let permalink = self.permalink.filter(|p| !p.is_empty()).map(|p| {
            if p.starts_with('/') { format!("{base_url}{p}") } else { p }
        });
        let url = self.url.filter(|u| !u.is_empty()).or_else(|| permalink.clone()).unwrap_or_default();
        let mut post = Post::new(self.title.unwrap_or_default(), self.selftext.unwrap_or_default())
            .with_url(url)
            .with_subreddit(self.subreddit.unwrap_or_default())
            .with_votes(self.score.unwrap_or(0), self.num_comments.unwrap_or(0));
        if let Some(a) = self.author.filter(|a| !a.trim().is_empty()) {
            post = post.with_author(a);
        }
        post.created_at = self.created_utc.and_then(from_unix_seconds);
        post.permalink = permalink;
        post
    }
}

/// Decode a listing response body.
pub fn parse_listing(body: &str, base_url: &str) -> Result<Listing> {
    let raw: RawListing = serde_json::from_str(body).context("decode listing JSON")?;
    let posts = raw.data.children.into_iter().map(|c| c.data.into_post(base_url)).collect();
    let after = raw.data.after.filter(|a| !a.is_empty());
    Ok(Listing { posts, after })
}

/// Blocking client for the public listing endpoints.
pub struct RedditSource {
    client: Client,
    base_url: String,
}

impl RedditSource {
    pub fn new(base_url: &str, user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .context("build HTTP client")?;
        Ok(Self { client, base_url: base_url.trim_end_matches('/').to_string() })
    }

    pub fn from_options(opts: &CollectOptions) -> Result<Self> {
        Self::new(&opts.base_url, &opts.user_agent, opts.request_timeout)
    }
}

impl ListingSource for RedditSource {
    fn fetch_page(&self, req: &PageRequest) -> Result<Listing> {
        let url = format!("{}{}", self.base_url, req.path());
        let response = self
            .client
            .get(&url)
            .query(&req.params())
            .send()
            .with_context(|| format!("GET {url}"))?;

        if !response.status().is_success() {
            return Err(anyhow!("GET {} failed: {}", url, response.status()));
        }
        let body = response.text().with_context(|| format!("read body of {url}"))?;
        parse_listing(&body, &self.base_url)
    }
}

// ----------------------------- Collector ----------------------------------

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CollectOutcome {
    pub posts: Vec<Post>,
    pub pages_fetched: usize,
    pub failed_loops: usize,
    pub outside_window: usize,
    pub duplicates: usize,
}

pub struct Collector<S: ListingSource> {
    source: S,
    opts: CollectOptions,
}

impl<S: ListingSource> Collector<S> {
    pub fn new(source: S, opts: CollectOptions) -> Self {
        Self { source, opts }
    }

    pub fn options(&self) -> &CollectOptions {
        &self.opts
    }

    pub fn run(&self) -> Result<CollectOutcome> {
        let opts = &self.opts;
        if opts.subreddits.is_empty() {
            bail!("no subreddits to collect from");
        }
        let queries: Vec<Option<String>> = match opts.mode {
            CollectMode::New => vec![None],
            CollectMode::Search => {
                if opts.queries.is_empty() {
                    bail!("search mode needs at least one query");
                }
                opts.queries.iter().cloned().map(Some).collect()
            }
        };

        let pb = ProgressScope::spinner(opts.progress, "Collect");
        let mut out = CollectOutcome::default();
        let mut seen: AHashSet<String> = AHashSet::new();

        'queries: for query in &queries {
            for sub in &opts.subreddits {
                if out.posts.len() >= opts.max_posts_total {
                    break 'queries;
                }
                let taken = self.collect_one(query.as_deref(), sub, &mut out, &mut seen, &pb);
                tracing::info!(
                    "r/{}{}: collected {} posts (total {})",
                    sub,
                    query.as_deref().map(|q| format!(" [{q}]")).unwrap_or_default(),
                    taken,
                    out.posts.len()
                );
            }
        }

        pb.finish(format!("collected {}", out.posts.len()));
        Ok(out)
    }

    fn collect_one(
        &self,
        query: Option<&str>,
        sub: &str,
        out: &mut CollectOutcome,
        seen: &mut AHashSet<String>,
        pb: &ProgressScope,
    ) -> usize {
        let opts = &self.opts;
        let mut after: Option<String> = None;
        let mut taken = 0usize;

        let capped = |taken: usize, total: usize| taken >= opts.max_posts_per_subreddit || total >= opts.max_posts_total;

        while !capped(taken, out.posts.len()) {
            let req = PageRequest {
                subreddit: sub.to_string(),
                query: query.map(str::to_string),
                mode: opts.mode,
                after: after.clone(),
                limit: opts.page_limit,
            };
            let listing = match self.source.fetch_page(&req) {
                Ok(l) => l,
                Err(e) => {
                    tracing::warn!("r/{}: fetch failed, moving on: {:#}", sub, e);
                    out.failed_loops += 1;
                    break;
                }
            };
            out.pages_fetched += 1;
            if listing.posts.is_empty() {
                tracing::debug!("r/{}: empty page, done", sub);
                break;
            }

            let mut crossed = false;
            for mut post in listing.posts {
                if capped(taken, out.posts.len()) {
                    break;
                }
                if !opts.window.contains(post.created_at) {
                    out.outside_window += 1;
                    crossed |= opts.window.is_before_start(post.created_at);
                    continue;
                }
                if let Some(kws) = &opts.must_mention {
                    if !mentions_any(&post, kws) {
                        continue;
                    }
                }
                if !post.url.is_empty() && !seen.insert(post.url.clone()) {
                    out.duplicates += 1;
                    continue;
                }
                if post.subreddit.trim().is_empty() {
                    post.subreddit = sub.to_string();
                }
                out.posts.push(post);
                taken += 1;
                pb.inc(1);
            }

            if crossed {
                tracing::debug!("r/{}: passed the start of the date window, done", sub);
                break;
            }
            after = listing.after;
            if after.is_none() || capped(taken, out.posts.len()) {
                break;
            }
            if !opts.page_delay.is_zero() {
                std::thread::sleep(opts.page_delay);
            }
        }
        taken
    }
}

/// Group `keywords` into `("a" OR "b" ...)` search strings of at most `size` terms.
pub fn chunk_queries<S: AsRef<str>>(keywords: &[S], size: usize) -> Vec<String> {
    keywords
        .chunks(size.max(1))
        .map(|chunk| {
            let parts: Vec<String> = chunk.iter().map(|k| format!("\"{}\"", k.as_ref().trim())).collect();
            format!("({})", parts.join(" OR "))
        })
        .collect()
}
