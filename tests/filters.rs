#[path = "common/mod.rs"]
mod common;

use citypulse::{
    apply_filters, drop_pseudo_authors, load_posts, mentions_any, run_filter, save_posts, AreaFilter, DateWindow,
    FilterOptions, Post, RelevanceFilter,
};
use common::*;
use time::macros::datetime;

#[test]
fn relevance_is_a_title_substring_match() {
    let f = RelevanceFilter::default();
    assert!(f.matches(&post("Best biryani in Dhaka?", "u1")));
    assert!(f.matches(&post("BD visa queue", "u2")));
    assert!(!f.matches(&post("Visiting Chittagong", "u3")));

    // body text does not count
    let body_only = Post::new("Weekend plans", "somewhere in dhaka");
    assert!(!f.matches(&body_only));

    let custom = RelevanceFilter::new([" Sylhet ", ""]);
    assert!(custom.matches(&post("Tea gardens of sylhet", "u4")));
    assert!(!custom.matches(&post("Best biryani in Dhaka?", "u5")));
}

#[test]
fn area_matching_is_whole_word_and_hyphen_tolerant() {
    let f = AreaFilter::new(["gulshan", "old dhaka"], "dhaka").unwrap();

    let hyphen = post("Street food in old-dhaka", "u1").with_subreddit("bangladesh");
    assert!(f.matches(&hyphen));
    assert_eq!(f.areas_mentioned(&hyphen), vec!["old dhaka"]);

    let partial = post("Gulshanite meetup", "u2").with_subreddit("bangladesh");
    assert!(!f.mentions_area(&partial));
    assert!(!f.matches(&partial));

    let both = Post::new("GULSHAN vs Old Dhaka", "which one").with_subreddit("bangladesh");
    assert_eq!(f.areas_mentioned(&both), vec!["gulshan", "old dhaka"]);

    // posts from the city subreddit always pass
    let city = post("Nothing local here", "u3").with_subreddit("r/Dhaka");
    assert!(f.matches(&city));
    assert!(f.areas_mentioned(&city).is_empty());
}

#[test]
fn empty_area_list_only_passes_the_city_subreddit() {
    let f = AreaFilter::new(Vec::<String>::new(), "dhaka").unwrap();
    let posts = vec![
        post("Gulshan", "u1").with_subreddit("bangladesh"),
        post("anything", "u2"),
    ];
    let kept = f.apply(posts);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].url, "u2");

    assert!(AreaFilter::with_defaults().unwrap().matches(&post("Mirpur 10 flyover", "u3").with_subreddit("bd")));
}

#[test]
fn date_window_is_inclusive_and_rejects_missing_dates_when_bounded() {
    let w = DateWindow::new(Some(datetime!(2025-11-11 0:00 UTC)), Some(datetime!(2025-11-13 23:15 UTC)));
    assert!(w.contains(Some(datetime!(2025-11-11 0:00 UTC))));
    assert!(w.contains(Some(datetime!(2025-11-13 23:15 UTC))));
    assert!(!w.contains(Some(datetime!(2025-11-10 23:59 UTC))));
    assert!(!w.contains(None));

    assert!(DateWindow::default().is_unbounded());
    assert!(DateWindow::default().contains(None));

    assert!(w.is_before_start(Some(datetime!(2025-11-10 23:59 UTC))));
    assert!(!w.is_before_start(Some(datetime!(2025-11-14 0:00 UTC))));
    assert!(!w.is_before_start(None));
    assert!(!DateWindow::default().is_before_start(Some(datetime!(2000-01-01 0:00 UTC))));

    let mut posts = sample_posts();
    posts.push(Post::new("undated", "").with_url("u-undated"));
    let kept: Vec<String> = w.apply(posts).into_iter().map(|p| p.url).collect();
    assert_eq!(
        kept,
        vec![
            "https://reddit.com/r/dhaka/comments/p2",
            "https://reddit.com/r/bangladesh/comments/p3",
            "https://reddit.com/r/dhaka/comments/p4",
            "https://reddit.com/r/bangladesh/comments/p5",
        ]
    );

    let since = DateWindow::since(datetime!(2025-11-14 01:00 UTC), 2);
    assert_eq!(since.start, Some(datetime!(2025-11-12 01:00 UTC)));
    assert_eq!(since.end, None);
}

#[test]
fn pseudo_authors_and_must_mention() {
    let mut posts = sample_posts();
    posts.push(post("removed", "u-r").with_author("[removed]"));
    posts.push(post("blank", "u-b").with_author(""));
    let kept = drop_pseudo_authors(posts);
    assert_eq!(kept.len(), 5);
    assert!(kept.iter().all(|p| !p.is_pseudo_author()));

    let kws = vec!["kacchi".to_string(), "metro".to_string()];
    let sample = sample_posts();
    assert!(mentions_any(&sample[0], &kws));
    assert!(!mentions_any(&sample[1], &kws));
}

#[test]
fn filters_run_in_order_through_the_stage() {
    let opts = FilterOptions::default()
        .with_relevance(true)
        .with_city_keywords(["dhaka", "gulshan", "mirpur"])
        .with_drop_pseudo_authors(true);
    let kept = apply_filters(sample_posts(), &opts).unwrap();
    let titles: Vec<&str> = kept.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["Best biryani in Old Dhaka?", "Traffic on the Mirpur road", "Great cafe in Gulshan"]);

    let dir = scratch_dir();
    let input = dir.join("raw.json");
    let output = dir.join("filtered.csv");
    save_posts(&input, &sample_posts()).unwrap();

    let area_opts = FilterOptions::default()
        .with_areas(true)
        .with_area_names(["dhanmondi"])
        .with_city_subreddit("dhaka")
        .with_window(DateWindow::new(None, Some(datetime!(2025-11-12 0:00 UTC))));
    let outcome = run_filter(&input, &output, &area_opts).unwrap();
    assert_eq!(outcome.kept, 3);
    assert_eq!(outcome.by_subreddit, vec![("dhaka".to_string(), 2), ("bangladesh".to_string(), 1)]);
    let urls: Vec<String> = load_posts(&output).unwrap().into_iter().map(|p| p.url).collect();
    assert_eq!(
        urls,
        vec![
            "https://reddit.com/r/dhaka/comments/p1",
            "https://reddit.com/r/dhaka/comments/p2",
            "https://reddit.com/r/bangladesh/comments/p3",
        ]
    );
}

#[test]
fn area_counts_rank_mentioned_areas() {
    let f = AreaFilter::new(["gulshan", "mirpur", "dhanmondi", "uttara"], "dhaka").unwrap();
    let mut posts = sample_posts();
    posts.push(post("Mirpur metro station", "u-m").with_votes(20, 10));

    let counts = f.area_counts(&posts);
    let names: Vec<(&str, usize)> = counts.iter().map(|c| (c.area.as_str(), c.posts)).collect();
    // uttara has no mentions; equal counts keep list order
    assert_eq!(names, vec![("mirpur", 2), ("gulshan", 1), ("dhanmondi", 1)]);

    let mirpur = &counts[0];
    assert!((mirpur.avg_upvotes - 50.0).abs() < 1e-9);
    assert!((mirpur.avg_comments - 35.0).abs() < 1e-9);
    assert_eq!(mirpur.total_engagement, 170);
    assert!(f.area_counts(&[]).is_empty());
}

#[test]
fn filter_stage_writes_breakdowns_beside_the_output() {
    let dir = scratch_dir();
    let input = dir.join("raw.json");
    let output = dir.join("city.ndjson.zst");
    save_posts(&input, &sample_posts()).unwrap();

    let opts = FilterOptions::default()
        .with_areas(true)
        .with_area_names(["dhanmondi", "mirpur"])
        .with_city_subreddit("dhaka");
    let outcome = run_filter(&input, &output, &opts).unwrap();
    assert_eq!(outcome.kept, 5);
    assert_eq!(outcome.by_area.len(), 2);

    let breakdown = read_lines(&dir.join("city_breakdown.csv"));
    assert_eq!(breakdown, vec!["subreddit,posts", "dhaka,4", "bangladesh,1"]);

    let areas = read_lines(&dir.join("city_areas.csv"));
    assert_eq!(areas[0], "area,posts,avg_upvotes,avg_comments,total_engagement");
    assert!(areas[1].starts_with("dhanmondi,1,"));
    assert!(areas[1].ends_with(",24"));
    assert!(areas[2].starts_with("mirpur,1,"));
    assert!(areas[2].ends_with(",140"));

    let plain = dir.join("plain.json");
    let outcome = run_filter(&input, &plain, &FilterOptions::default()).unwrap();
    assert_eq!(outcome.kept, 6);
    assert!(outcome.by_area.is_empty());
    assert!(dir.join("plain_breakdown.csv").exists());
    assert!(!dir.join("plain_areas.csv").exists());
}
