#[path = "common/mod.rs"]
mod common;

use citypulse::{
    chunk_queries, load_posts, parse_listing, run_collect_with, CollectMode, CollectOptions, Collector, DateWindow,
    PageRequest,
};
use common::*;
use std::time::Duration;
use time::macros::datetime;

fn opts(mode: CollectMode) -> CollectOptions {
    CollectOptions::default()
        .with_mode(mode)
        .with_subreddits(["dhaka"])
        .with_page_delay(Duration::ZERO)
        .with_progress(false)
}

fn urls(prefix: &str, n: usize) -> Vec<citypulse::Post> {
    (0..n).map(|i| post(&format!("{prefix} {i}"), &format!("https://reddit.com/{prefix}/{i}"))).collect()
}

#[test]
fn follows_the_cursor_until_exhausted() {
    let source = FakeSource::new()
        .page("dhaka", None, urls("a", 2), Some("t3_b"))
        .page("dhaka", Some("t3_b"), urls("b", 1), None);

    let outcome = Collector::new(&source, opts(CollectMode::New)).run().unwrap();
    assert_eq!(outcome.posts.len(), 3);
    assert_eq!(outcome.pages_fetched, 2);

    let afters: Vec<Option<String>> = source.requests().into_iter().map(|r| r.after).collect();
    assert_eq!(afters, vec![None, Some("t3_b".to_string())]);
}

#[test]
fn stops_on_empty_page() {
    let source = FakeSource::new()
        .page("dhaka", None, urls("a", 2), Some("t3_x"))
        .page("dhaka", Some("t3_x"), vec![], Some("t3_y"));
    let outcome = Collector::new(&source, opts(CollectMode::New)).run().unwrap();
    assert_eq!(outcome.posts.len(), 2);
    assert_eq!(source.requests().len(), 2);
}

#[test]
fn per_subreddit_and_global_caps() {
    let source = FakeSource::new().page("dhaka", None, urls("a", 5), Some("t3_more"));
    let outcome = Collector::new(&source, opts(CollectMode::New).with_max_posts_per_subreddit(3)).run().unwrap();
    assert_eq!(outcome.posts.len(), 3);
    // cap reached on the first page, so no second request
    assert_eq!(source.requests().len(), 1);

    let source = FakeSource::new()
        .page("a", None, urls("a", 2), None)
        .page("b", None, urls("b", 2), None)
        .page("c", None, urls("c", 2), None);
    let o = opts(CollectMode::New).with_subreddits(["a", "b", "c"]).with_max_posts_total(3);
    let outcome = Collector::new(&source, o).run().unwrap();
    assert_eq!(outcome.posts.len(), 3);
    let subs: Vec<String> = source.requests().into_iter().map(|r| r.subreddit).collect();
    assert_eq!(subs, vec!["a", "b"]);
}

#[test]
fn a_failing_subreddit_does_not_stop_the_others() {
    let source = FakeSource::new().failing("broken").page("dhaka", None, urls("d", 2), None);
    let o = opts(CollectMode::New).with_subreddits(["broken", "dhaka"]);
    let outcome = Collector::new(&source, o).run().unwrap();
    assert_eq!(outcome.failed_loops, 1);
    assert_eq!(outcome.posts.len(), 2);
}

#[test]
fn dedups_by_url_across_queries_and_fills_subreddit() {
    let mut page = urls("q", 2);
    page[1].subreddit.clear();
    let source = FakeSource::new().page("dhaka", None, page, None);
    let o = opts(CollectMode::Search).with_queries(["metro", "traffic"]);
    let outcome = Collector::new(&source, o).run().unwrap();

    assert_eq!(outcome.posts.len(), 2);
    assert_eq!(outcome.duplicates, 2);
    assert_eq!(outcome.posts[1].subreddit, "dhaka");

    let queries: Vec<Option<String>> = source.requests().into_iter().map(|r| r.query).collect();
    assert_eq!(queries, vec![Some("metro".to_string()), Some("traffic".to_string())]);
}

#[test]
fn window_and_must_mention_filter_posts() {
    let mut page = urls("w", 3);
    page[0] = page[0].clone().with_created_at(datetime!(2020-01-01 0:00 UTC));
    page[1].title = "Metro rail update".to_string();
    page[2].title = "Unrelated".to_string();
    let source = FakeSource::new().page("dhaka", None, page, None);

    let window = DateWindow::new(Some(datetime!(2025-01-01 0:00 UTC)), None);
    let o = opts(CollectMode::New).with_window(window).with_must_mention(["METRO"]);
    let outcome = Collector::new(&source, o).run().unwrap();

    assert_eq!(outcome.outside_window, 1);
    assert_eq!(outcome.posts.len(), 1);
    assert_eq!(outcome.posts[0].title, "Metro rail update");
}

#[test]
fn stops_paging_once_the_window_start_is_crossed() {
    let fresh = post("fresh", "https://reddit.com/new/1").with_created_at(datetime!(2025-06-01 0:00 UTC));
    let stale = |n: &str| post(n, &format!("https://reddit.com/old/{n}")).with_created_at(datetime!(2020-01-01 0:00 UTC));
    let source = FakeSource::new()
        .page("dhaka", None, vec![fresh, stale("a")], Some("t3_b"))
        .page("dhaka", Some("t3_b"), vec![stale("b")], Some("t3_c"))
        .page("dhaka", Some("t3_c"), vec![stale("c")], None);

    let window = DateWindow::new(Some(datetime!(2025-01-01 0:00 UTC)), None);
    let outcome = Collector::new(&source, opts(CollectMode::New).with_window(window)).run().unwrap();

    assert_eq!(source.requests().len(), 1);
    assert_eq!(outcome.pages_fetched, 1);
    assert_eq!(outcome.posts.len(), 1);
    assert_eq!(outcome.outside_window, 1);
}

#[test]
fn posts_newer_than_the_window_do_not_stop_paging() {
    let future = |n: &str| post(n, &format!("https://reddit.com/f/{n}")).with_created_at(datetime!(2026-01-01 0:00 UTC));
    let source = FakeSource::new()
        .page("dhaka", None, vec![future("a")], Some("t3_b"))
        .page("dhaka", Some("t3_b"), urls("in", 1), None);

    let window = DateWindow::new(None, Some(datetime!(2025-12-01 0:00 UTC)));
    let outcome = Collector::new(&source, opts(CollectMode::New).with_window(window)).run().unwrap();

    assert_eq!(source.requests().len(), 2);
    assert_eq!(outcome.outside_window, 1);
    assert_eq!(outcome.posts.len(), 1);
}

#[test]
fn rejects_unusable_options() {
    let source = FakeSource::new();
    assert!(Collector::new(&source, opts(CollectMode::Search)).run().is_err());
    let no_subs = CollectOptions::default().with_mode(CollectMode::New).with_progress(false);
    assert!(Collector::new(&source, no_subs).run().is_err());
    assert!(source.requests().is_empty());
}

#[test]
fn request_parameters() {
    let req = PageRequest {
        subreddit: "dhaka".to_string(),
        query: Some("flat rent".to_string()),
        mode: CollectMode::Search,
        after: Some("t3_z".to_string()),
        limit: 100,
    };
    assert_eq!(req.path(), "/r/dhaka/search.json");
    let params: Vec<(&str, String)> = req.params();
    let expected: Vec<(&str, String)> = vec![
        ("q", "flat rent".into()),
        ("restrict_sr", "on".into()),
        ("sort", "new".into()),
        ("limit", "100".into()),
        ("t", "all".into()),
        ("after", "t3_z".into()),
    ];
    assert_eq!(params, expected);

    let new = PageRequest { mode: CollectMode::New, query: None, after: None, ..req };
    assert_eq!(new.path(), "/r/dhaka/new.json");
    assert_eq!(new.params(), vec![("limit", "100".to_string())]);
}

#[test]
fn chunks_keywords_into_or_queries() {
    let q = chunk_queries(&["gulshan", "banani", "old dhaka"], 2);
    assert_eq!(q, vec![r#"("gulshan" OR "banani")"#.to_string(), r#"("old dhaka")"#.to_string()]);
    assert!(chunk_queries::<&str>(&[], 3).is_empty());
}

#[test]
fn parses_reddit_listing_json() {
    let body = r#"{
      "kind": "Listing",
      "data": {
        "after": "t3_next",
        "children": [
          {"kind": "t3", "data": {
            "title": "Rain in Dhaka", "selftext": "", "url": "",
            "author": "", "score": 42, "ups": 42, "num_comments": 7,
            "created": 1763592351.0, "created_utc": 1763592351.0,
            "subreddit": "dhaka", "permalink": "/r/dhaka/comments/abc/rain/"
          }},
          {"kind": "t3", "data": {
            "title": "Photo", "url": "https://i.redd.it/x.jpg", "author": "rahim",
            "score": 3, "num_comments": 0, "created_utc": 1763592000, "subreddit": "bangladesh"
          }}
        ]
      }
    }"#;
    let listing = parse_listing(body, "https://www.reddit.com").unwrap();
    assert_eq!(listing.after.as_deref(), Some("t3_next"));
    assert_eq!(listing.posts.len(), 2);

    let first = &listing.posts[0];
    assert_eq!(first.url, "https://www.reddit.com/r/dhaka/comments/abc/rain/");
    assert_eq!(first.permalink.as_deref(), Some("https://www.reddit.com/r/dhaka/comments/abc/rain/"));
    assert_eq!(first.author, "[deleted]");
    assert_eq!(first.upvotes, 42);
    assert_eq!(first.comments, 7);
    assert_eq!(first.created_at, Some(datetime!(2025-11-19 22:45:51 UTC)));

    assert_eq!(listing.posts[1].url, "https://i.redd.it/x.jpg");
    assert!(parse_listing("<html>rate limited</html>", "https://www.reddit.com").is_err());
}

#[test]
fn collect_stage_writes_output() {
    let dir = scratch_dir();
    let out = dir.join("raw.ndjson.zst");
    let source = FakeSource::new().page("dhaka", None, sample_posts(), None);
    let outcome = run_collect_with(&source, opts(CollectMode::New), &out).unwrap();
    assert_eq!(outcome.posts.len(), 6);
    assert_eq!(load_posts(&out).unwrap(), outcome.posts);
}
