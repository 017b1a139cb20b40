//! URL-keyed dedup merge of post lists and post files.

use crate::post::Post;
use crate::store::{load_posts, save_posts, Format};
use ahash::AHashMap;
use anyhow::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MergeOutcome {
    pub posts: Vec<Post>,
    pub total_in: usize,
    pub duplicates_removed: usize,
    pub missing_url: usize,
}

/// Concatenate `lists` and keep one post per url. A later duplicate replaces the
/// earlier value but stays at the earlier position. Posts with an empty url are dropped.
pub fn merge_by_url<I>(lists: I) -> MergeOutcome
where
    I: IntoIterator<Item = Vec<Post>>,
{
    let mut out: Vec<Post> = Vec::new();
    let mut index: AHashMap<String, usize> = AHashMap::new();
    let mut total_in = 0usize;
    let mut duplicates_removed = 0usize;
    let mut missing_url = 0usize;

    for list in lists {
        for p in list {
            total_in += 1;
            let key = p.url.trim();
            if key.is_empty() {
                missing_url += 1;
                continue;
            }
            match index.get(key).copied() {
                Some(i) => {
                    out[i] = p;
                    duplicates_removed += 1;
                }
                None => {
                    index.insert(key.to_string(), out.len());
                    out.push(p);
                }
            }
        }
    }

    MergeOutcome { posts: out, total_in, duplicates_removed, missing_url }
}

/// Expand directories into their supported post files (sorted); plain paths pass through.
pub fn expand_inputs(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(input)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file() && Format::is_supported(e.path()))
                .map(|e| e.into_path())
                .collect();
            found.sort();
            files.extend(found);
        } else {
            files.push(input.clone());
        }
    }
    files
}

/// Load every input, merge by url, and write the result to `output`.
/// Missing inputs count as empty lists.
pub fn merge_files(inputs: &[PathBuf], output: &Path) -> Result<MergeOutcome> {
    let mut lists = Vec::new();
    for path in expand_inputs(inputs) {
        if !path.exists() {
            tracing::warn!("{} not found; treating as empty", path.display());
            continue;
        }
        let posts = load_posts(&path)?;
        tracing::info!("Loaded {} posts from {}", posts.len(), path.display());
        lists.push(posts);
    }
    let outcome = merge_by_url(lists);
    save_posts(output, &outcome.posts)?;
    tracing::info!(
        "Merged {} posts into {} unique ({} duplicates removed, {} without url)",
        outcome.total_in,
        outcome.posts.len(),
        outcome.duplicates_removed,
        outcome.missing_url
    );
    Ok(outcome)
}
