use crate::filters::{DateWindow, DEFAULT_AREAS, DEFAULT_CITY_KEYWORDS, DEFAULT_CITY_SUBREDDIT};
use crate::util::{env_override, normalize_subreddit};
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://www.reddit.com";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Which listing endpoint the collector pages through.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollectMode {
    /// `/r/{sub}/search.json?q=...&restrict_sr=on&sort=new`
    Search,
    /// `/r/{sub}/new.json`, newest first, no query.
    New,
}

impl FromStr for CollectMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "search" => Ok(CollectMode::Search),
            "new" => Ok(CollectMode::New),
            other => Err(format!("unknown mode '{other}', expected search|new")),
        }
    }
}

/// Collector options with builder chaining.
#[derive(Clone, Debug)]
pub struct CollectOptions {
    pub base_url: String,
    pub user_agent: String,
    pub mode: CollectMode,
    pub queries: Vec<String>,
    pub subreddits: Vec<String>,        // normalized lowercase, no "r/"
    pub max_posts_total: usize,
    pub max_posts_per_subreddit: usize, // per (query, subreddit) loop
    pub page_limit: u32,                // `limit` parameter, max 100
    pub window: DateWindow,
    pub page_delay: Duration,           // fixed sleep between pages
    pub request_timeout: Duration,
    pub must_mention: Option<Vec<String>>, // lowercase keywords; keep posts mentioning any
    pub progress: bool,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            base_url: env_override("CITYPULSE_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            user_agent: env_override("CITYPULSE_USER_AGENT").unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            mode: CollectMode::Search,
            queries: Vec::new(),
            subreddits: Vec::new(),
            max_posts_total: 2000,
            max_posts_per_subreddit: 500,
            page_limit: 100,
            window: DateWindow::default(),
            page_delay: Duration::from_secs(1),
            request_timeout: Duration::from_secs(10),
            must_mention: None,
            progress: true,
        }
    }
}

impl CollectOptions {
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }
    pub fn with_user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = ua.into();
        self
    }
    pub fn with_mode(mut self, mode: CollectMode) -> Self {
        self.mode = mode;
        self
    }
    pub fn with_query(mut self, q: impl Into<String>) -> Self {
        self.queries = vec![q.into()];
        self
    }
    pub fn with_queries<I, S>(mut self, qs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.queries = qs.into_iter().map(Into::into).collect();
        self
    }
    pub fn with_subreddits<I, S>(mut self, subs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut v: Vec<String> = Vec::new();
        for s in subs {
            let n = normalize_subreddit(s.as_ref());
            if !n.is_empty() && !v.contains(&n) {
                v.push(n);
            }
        }
        self.subreddits = v;
        self
    }
    pub fn with_max_posts_total(mut self, n: usize) -> Self {
        self.max_posts_total = n;
        self
    }
    pub fn with_max_posts_per_subreddit(mut self, n: usize) -> Self {
        self.max_posts_per_subreddit = n;
        self
    }
    pub fn with_page_limit(mut self, n: u32) -> Self {
        self.page_limit = n.clamp(1, 100);
        self
    }
    pub fn with_window(mut self, window: DateWindow) -> Self {
        self.window = window;
        self
    }
    /// Only keep posts created within the last `days` days (relative to now).
    pub fn with_last_days(mut self, days: u32) -> Self {
        self.window = DateWindow::last_days(days);
        self
    }
    pub fn with_page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = delay;
        self
    }
    pub fn with_request_timeout(mut self, t: Duration) -> Self {
        self.request_timeout = t;
        self
    }
    pub fn with_must_mention<I, S>(mut self, kws: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let v: Vec<String> = kws.into_iter().map(|s| s.as_ref().trim().to_lowercase()).filter(|s| !s.is_empty()).collect();
        self.must_mention = if v.is_empty() { None } else { Some(v) };
        self
    }
    pub fn with_progress(mut self, yes: bool) -> Self {
        self.progress = yes;
        self
    }
}

/// Which text feeds the polarity scorer and the emotion classifier.
/// Topics always look at title + body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SentimentField {
    #[default]
    Body,
    Title,
    Combined,
}

impl FromStr for SentimentField {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "body" => Ok(SentimentField::Body),
            "title" => Ok(SentimentField::Title),
            "combined" | "both" => Ok(SentimentField::Combined),
            other => Err(format!("unknown field '{other}', expected body|title|combined")),
        }
    }
}

/// Analysis options: classifier input, parallelism, and top-N sizes for reports.
#[derive(Clone, Debug)]
pub struct AnalyzeOptions {
    pub sentiment_field: SentimentField,
    pub parallelism: Option<usize>, // Some(N) to set rayon threads, None to use default
    pub progress: bool,
    pub top_posts: usize,           // most positive / most negative tables
    pub top_keywords: usize,
    pub min_keyword_len: usize,     // tokens must be longer than this
    pub extra_stopwords: Vec<String>,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            sentiment_field: SentimentField::Body,
            parallelism: None,
            progress: true,
            top_posts: 15,
            top_keywords: 30,
            min_keyword_len: 2,
            extra_stopwords: Vec::new(),
        }
    }
}

impl AnalyzeOptions {
    pub fn with_sentiment_field(mut self, f: SentimentField) -> Self {
        self.sentiment_field = f;
        self
    }
    pub fn with_parallelism(mut self, threads: usize) -> Self {
        self.parallelism = Some(threads);
        self
    }
    pub fn with_progress(mut self, yes: bool) -> Self {
        self.progress = yes;
        self
    }
    pub fn with_top_posts(mut self, n: usize) -> Self {
        self.top_posts = n.max(1);
        self
    }
    pub fn with_top_keywords(mut self, n: usize) -> Self {
        self.top_keywords = n.max(1);
        self
    }
    /// Extra words (e.g. the city name) to drop from keyword counts.
    pub fn with_extra_stopwords<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extra_stopwords = words.into_iter().map(|s| s.as_ref().trim().to_lowercase()).collect();
        self
    }
}

/// Which filters `filter` applies, in order: relevance, areas, dates, pseudo-authors.
#[derive(Clone, Debug)]
pub struct FilterOptions {
    pub relevance: bool,
    pub city_keywords: Vec<String>,
    pub areas: bool,
    pub area_names: Vec<String>,
    pub city_subreddit: String,
    pub window: DateWindow,
    pub drop_pseudo_authors: bool,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            relevance: false,
            city_keywords: DEFAULT_CITY_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            areas: false,
            area_names: DEFAULT_AREAS.iter().map(|s| s.to_string()).collect(),
            city_subreddit: DEFAULT_CITY_SUBREDDIT.to_string(),
            window: DateWindow::default(),
            drop_pseudo_authors: false,
        }
    }
}

impl FilterOptions {
    pub fn with_relevance(mut self, yes: bool) -> Self {
        self.relevance = yes;
        self
    }
    pub fn with_city_keywords<I, S>(mut self, kws: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.city_keywords = kws.into_iter().map(|s| s.as_ref().trim().to_lowercase()).filter(|s| !s.is_empty()).collect();
        self
    }
    pub fn with_areas(mut self, yes: bool) -> Self {
        self.areas = yes;
        self
    }
    pub fn with_area_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.area_names = names.into_iter().map(|s| s.as_ref().to_string()).collect();
        self
    }
    pub fn with_city_subreddit(mut self, sub: impl AsRef<str>) -> Self {
        self.city_subreddit = normalize_subreddit(sub.as_ref());
        self
    }
    pub fn with_window(mut self, window: DateWindow) -> Self {
        self.window = window;
        self
    }
    pub fn with_drop_pseudo_authors(mut self, yes: bool) -> Self {
        self.drop_pseudo_authors = yes;
        self
    }
}

/// Sizes of the tables in the HTML and Markdown reports.
#[derive(Clone, Debug)]
pub struct ReportOptions {
    pub dataset_name: String,
    pub sentiment_field: SentimentField,
    pub top_posts: usize,
    pub vocabulary: usize,
    pub days_shown: usize,
    pub authors_shown: usize,
    pub sample_rows: usize,
    pub progress: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            dataset_name: "City Posts".to_string(),
            sentiment_field: SentimentField::Body,
            top_posts: 15,
            vocabulary: 30,
            days_shown: 20,
            authors_shown: 20,
            sample_rows: 5,
            progress: true,
        }
    }
}

impl ReportOptions {
    pub fn with_dataset_name(mut self, name: impl Into<String>) -> Self {
        self.dataset_name = name.into();
        self
    }
    pub fn with_sentiment_field(mut self, f: SentimentField) -> Self {
        self.sentiment_field = f;
        self
    }
    pub fn with_top_posts(mut self, n: usize) -> Self {
        self.top_posts = n.max(1);
        self
    }
    pub fn with_vocabulary(mut self, n: usize) -> Self {
        self.vocabulary = n.max(1);
        self
    }
    pub fn with_sample_rows(mut self, n: usize) -> Self {
        self.sample_rows = n;
        self
    }
    pub fn with_progress(mut self, yes: bool) -> Self {
        self.progress = yes;
        self
    }
}

/// Row limits for the flat CSV exports.
#[derive(Clone, Debug)]
pub struct ExportOptions {
    pub top_posts: usize,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self { top_posts: 50 }
    }
}

impl ExportOptions {
    pub fn with_top_posts(mut self, n: usize) -> Self {
        self.top_posts = n.max(1);
        self
    }
}
