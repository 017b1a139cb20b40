//! Progress reporting utilities: count-style bars for pages fetched and posts classified.

use indicatif::{ProgressBar, ProgressStyle};

const COUNT_TEMPLATE: &str = "{spinner:.green} {msg} {pos}/{len} [{bar:.cyan/blue}] {percent:>3}%  \
     it/s: {per_sec}  elapsed: {elapsed_precise}  eta: {eta_precise}";

fn count_style() -> ProgressStyle {
    ProgressStyle::with_template(COUNT_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
}

/// Count-style progress bar (items processed out of total), with an optional label.
pub fn make_count_progress(total: u64, label: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(count_style());
    if !label.is_empty() {
        pb.set_message(label.to_string());
    }
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Open-ended spinner for work without a known total (paginated fetches).
pub fn make_spinner(label: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.green} {msg} {pos} posts  elapsed: {elapsed_precise}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(label.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Optional bar: `None` when progress is disabled, so call sites stay branch-free.
pub struct ProgressScope {
    pb: Option<ProgressBar>,
}

impl ProgressScope {
    pub fn count(enabled: bool, label: &str, total: u64) -> Self {
        Self { pb: enabled.then(|| make_count_progress(total, label)) }
    }
    pub fn spinner(enabled: bool, label: &str) -> Self {
        Self { pb: enabled.then(|| make_spinner(label)) }
    }
    #[inline] pub fn inc(&self, delta: u64) { if let Some(pb) = &self.pb { pb.inc(delta); } }
    pub fn set_message(&self, msg: impl Into<String>) {
        if let Some(pb) = &self.pb { pb.set_message(msg.into()); }
    }
    pub fn finish<T: Into<String>>(&self, msg: T) {
        if let Some(pb) = &self.pb { pb.finish_with_message(msg.into()); }
    }
}
