use anyhow::Result;
use citypulse::{
    chunk_queries, init_tracing_once, run_analyze, run_collect, run_export, run_filter, run_merge, run_report,
    AnalyzeOptions, CollectMode, CollectOptions, DateWindow, ExportOptions, FilterOptions, ReportOptions,
    SentimentField,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

/// Collect Reddit posts about a city, classify them, and render reports.
#[derive(Parser, Debug)]
#[command(name = "citypulse")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Hide progress bars
    #[arg(long, global = true)]
    no_progress: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Page through subreddit listings and save the posts
    Collect {
        /// Search query; repeat for several
        #[arg(long = "query", short = 'q')]
        queries: Vec<String>,

        /// Keywords OR-ed together into chunked search queries
        #[arg(long, value_delimiter = ',')]
        keywords: Vec<String>,

        /// Keywords per chunked query
        #[arg(long, default_value_t = 5)]
        chunk: usize,

        /// Subreddit to collect from; repeat for several
        #[arg(long = "subreddit", short = 's', required = true)]
        subreddits: Vec<String>,

        /// search | new
        #[arg(long, default_value = "search")]
        mode: CollectMode,

        #[arg(long, default_value_t = 2000)]
        max_total: usize,

        #[arg(long, default_value_t = 500)]
        max_per_sub: usize,

        /// Only keep posts from the last D days
        #[arg(long)]
        days: Option<u32>,

        /// Delay between page requests
        #[arg(long, default_value_t = 1000)]
        delay_ms: u64,

        /// Keep only posts whose title or body mentions one of these
        #[arg(long, value_delimiter = ',')]
        must_mention: Vec<String>,

        /// Output file (.csv, .json, .ndjson, .ndjson.zst)
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Merge post files, deduplicating by url
    Merge {
        /// Files or directories
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        #[arg(short, long)]
        output: PathBuf,
    },

    /// Keep only city-relevant posts
    Filter {
        input: PathBuf,

        #[arg(short, long)]
        output: PathBuf,

        /// Title must mention a city keyword
        #[arg(long)]
        relevance: bool,

        /// Post must name a known area, or come from the city subreddit
        #[arg(long)]
        areas: bool,

        /// City subreddit exempt from the area check
        #[arg(long)]
        city_sub: Option<String>,

        /// Only keep posts from the last D days
        #[arg(long)]
        days: Option<u32>,

        /// Drop [deleted] and [removed] authors
        #[arg(long)]
        drop_deleted: bool,
    },

    /// Classify posts and write the analysis tables and summary
    Analyze {
        input: PathBuf,

        /// Output directory
        #[arg(short, long)]
        output: PathBuf,

        /// body | title | combined
        #[arg(long, default_value = "body")]
        field: SentimentField,

        /// Worker threads for classification
        #[arg(long)]
        threads: Option<usize>,

        #[arg(long, default_value_t = 15)]
        top: usize,
    },

    /// Render the HTML and Markdown overviews and the sentiment dashboard
    Report {
        input: PathBuf,

        /// Output directory
        #[arg(short, long)]
        output: PathBuf,

        /// Dataset name used in page titles
        #[arg(long, default_value = "City Posts")]
        name: String,

        /// body | title | combined
        #[arg(long, default_value = "body")]
        field: SentimentField,
    },

    /// Write flat CSV exports: summary, top posts, per-subreddit and by-date lists
    Export {
        input: PathBuf,

        /// Output directory
        #[arg(short, long)]
        output: PathBuf,

        /// Rows in the top-posts files
        #[arg(long, default_value_t = 50)]
        top: usize,
    },
}

fn main() -> Result<()> {
    init_tracing_once();
    let args = Args::parse();
    let progress = !args.no_progress;

    match args.command {
        Command::Collect {
            queries,
            keywords,
            chunk,
            subreddits,
            mode,
            max_total,
            max_per_sub,
            days,
            delay_ms,
            must_mention,
            output,
        } => {
            let mut queries = queries;
            queries.extend(chunk_queries(&keywords, chunk));
            let mut opts = CollectOptions::default()
                .with_mode(mode)
                .with_queries(queries)
                .with_subreddits(subreddits)
                .with_max_posts_total(max_total)
                .with_max_posts_per_subreddit(max_per_sub)
                .with_page_delay(Duration::from_millis(delay_ms))
                .with_progress(progress);
            if let Some(d) = days {
                opts = opts.with_last_days(d);
            }
            if !must_mention.is_empty() {
                opts = opts.with_must_mention(must_mention);
            }
            let outcome = run_collect(opts, &output)?;
            println!(
                "Collected {} posts ({} pages, {} duplicates, {} outside window, {} failed loops) -> {}",
                outcome.posts.len(),
                outcome.pages_fetched,
                outcome.duplicates,
                outcome.outside_window,
                outcome.failed_loops,
                output.display()
            );
        }
        Command::Merge { inputs, output } => {
            let outcome = run_merge(&inputs, &output)?;
            println!(
                "Merged {} posts into {} unique ({} duplicates, {} without url) -> {}",
                outcome.total_in,
                outcome.posts.len(),
                outcome.duplicates_removed,
                outcome.missing_url,
                output.display()
            );
        }
        Command::Filter { input, output, relevance, areas, city_sub, days, drop_deleted } => {
            let mut opts = FilterOptions::default()
                .with_relevance(relevance)
                .with_areas(areas)
                .with_drop_pseudo_authors(drop_deleted);
            if let Some(sub) = city_sub {
                opts = opts.with_city_subreddit(sub);
            }
            if let Some(d) = days {
                opts = opts.with_window(DateWindow::last_days(d));
            }
            let outcome = run_filter(&input, &output, &opts)?;
            println!("Kept {} posts -> {}", outcome.kept, output.display());
            for (sub, n) in &outcome.by_subreddit {
                println!("  r/{sub}: {n}");
            }
        }
        Command::Analyze { input, output, field, threads, top } => {
            let mut opts = AnalyzeOptions::default()
                .with_sentiment_field(field)
                .with_top_posts(top)
                .with_progress(progress);
            if let Some(t) = threads {
                opts = opts.with_parallelism(t);
            }
            let analysis = run_analyze(&input, &output, &opts)?;
            println!("Analyzed {} posts -> {}", analysis.len(), output.display());
        }
        Command::Report { input, output, name, field } => {
            let opts = ReportOptions::default()
                .with_dataset_name(name)
                .with_sentiment_field(field)
                .with_progress(progress);
            let written = run_report(&input, &output, &opts)?;
            for path in written {
                println!("Wrote {}", path.display());
            }
        }
        Command::Export { input, output, top } => {
            let written = run_export(&input, &output, &ExportOptions::default().with_top_posts(top))?;
            println!("Wrote {} files -> {}", written.len(), output.display());
        }
    }

    Ok(())
}
