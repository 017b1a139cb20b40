//! Flat-file persistence for posts and analyzed posts.
//! The format is picked from the extension: `.csv`, `.json` (array),
//! `.jsonl`/`.ndjson` (one object per line), `.zst` (compressed NDJSON).

use crate::classify::{AnalyzedPost, AnalyzedRow};
use crate::ndjson::{NdjsonReader, NdjsonWriter};
use crate::post::Post;
use crate::util::{create_staging, replace_file_atomic};
use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Csv,
    Json,
    Ndjson,
    NdjsonZst,
}

impl Format {
    pub fn from_path(path: &Path) -> Result<Format> {
        let ext = path.extension().and_then(|e| e.to_str()).map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("csv") => Ok(Format::Csv),
            Some("json") => Ok(Format::Json),
            Some("jsonl") | Some("ndjson") => Ok(Format::Ndjson),
            Some("zst") => Ok(Format::NdjsonZst),
            _ => bail!("unsupported file type: {} (expected .csv, .json, .jsonl, .ndjson or .zst)", path.display()),
        }
    }

    pub fn is_supported(path: &Path) -> bool {
        Format::from_path(path).is_ok()
    }
}

// ----------------------------- Posts ----------------------------------

pub fn load_posts(path: &Path) -> Result<Vec<Post>> {
    let posts = match Format::from_path(path)? {
        Format::Csv => read_csv_posts(path)?,
        Format::Json => read_json_array::<Post>(path)?,
        Format::Ndjson | Format::NdjsonZst => NdjsonReader::open(path)?.read_all(path)?,
    };
    tracing::debug!("Loaded {} posts from {}", posts.len(), path.display());
    Ok(posts)
}

pub fn save_posts(path: &Path, posts: &[Post]) -> Result<()> {
    match Format::from_path(path)? {
        Format::Csv => write_csv(path, posts.iter())?,
        Format::Json => write_json_array(path, posts)?,
        Format::Ndjson | Format::NdjsonZst => write_ndjson(path, posts)?,
    }
    tracing::info!("Wrote {} posts to {}", posts.len(), path.display());
    Ok(())
}

// ----------------------------- Analyzed posts ----------------------------------

/// CSV rows are flat (`topics` joined by `", "`); JSON forms keep `topics` as an array.
pub fn load_analyzed(path: &Path) -> Result<Vec<AnalyzedPost>> {
    match Format::from_path(path)? {
        Format::Csv => Ok(read_csv::<AnalyzedRow>(path)?.into_iter().map(AnalyzedPost::from).collect()),
        Format::Json => read_json_array(path),
        Format::Ndjson | Format::NdjsonZst => NdjsonReader::open(path)?.read_all(path),
    }
}

pub fn save_analyzed(path: &Path, posts: &[AnalyzedPost]) -> Result<()> {
    match Format::from_path(path)? {
        Format::Csv => write_csv(path, posts.iter().map(AnalyzedRow::from))?,
        Format::Json => write_json_array(path, posts)?,
        Format::Ndjson | Format::NdjsonZst => write_ndjson(path, posts)?,
    }
    tracing::info!("Wrote {} analyzed posts to {}", posts.len(), path.display());
    Ok(())
}

// ----------------------------- Codecs ----------------------------------

fn read_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("open {}", path.display()))?;
    let mut out = Vec::new();
    let mut skipped = 0usize;
    for (i, rec) in rdr.deserialize::<T>().enumerate() {
        match rec {
            Ok(v) => out.push(v),
            Err(e) => {
                skipped += 1;
                tracing::warn!("{}: row {}: skipping: {}", path.display(), i + 1, e);
            }
        }
    }
    if skipped > 0 {
        tracing::warn!("{}: skipped {} malformed rows", path.display(), skipped);
    }
    Ok(out)
}

/// Post rows go through a map of raw cell strings so text columns keep their
/// exact contents (`007` stays `007`); the lenient field decoders then parse
/// counts and dates from those strings.
fn read_csv_posts(path: &Path) -> Result<Vec<Post>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("open {}", path.display()))?;
    let headers = rdr.headers().with_context(|| format!("read header of {}", path.display()))?.clone();
    let mut out = Vec::new();
    let mut skipped = 0usize;
    for (i, rec) in rdr.records().enumerate() {
        let row = rec.map_err(anyhow::Error::from).and_then(|rec| {
            let cells: serde_json::Map<String, serde_json::Value> = headers
                .iter()
                .zip(rec.iter())
                .map(|(h, v)| (h.to_string(), serde_json::Value::String(v.to_string())))
                .collect();
            Ok(serde_json::from_value::<Post>(serde_json::Value::Object(cells))?)
        });
        match row {
            Ok(p) => out.push(p),
            Err(e) => {
                skipped += 1;
                tracing::warn!("{}: row {}: skipping: {}", path.display(), i + 1, e);
            }
        }
    }
    if skipped > 0 {
        tracing::warn!("{}: skipped {} malformed rows", path.display(), skipped);
    }
    Ok(out)
}

/// Serialize rows to CSV (header from the first row's field names) via a staging file.
pub fn write_csv<T, I>(path: &Path, rows: I) -> Result<()>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    let (tmp, f) = create_staging(path)?;
    {
        let mut w = csv::Writer::from_writer(BufWriter::new(f));
        for row in rows {
            w.serialize(row).with_context(|| format!("write {}", tmp.display()))?;
        }
        w.flush().with_context(|| format!("flush {}", tmp.display()))?;
    }
    replace_file_atomic(&tmp, path)
}

fn read_json_array<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(f)).with_context(|| format!("parse JSON array {}", path.display()))
}

fn write_json_array<T: Serialize>(path: &Path, items: &[T]) -> Result<()> {
    let (tmp, f) = create_staging(path)?;
    {
        let mut w = BufWriter::new(f);
        serde_json::to_writer_pretty(&mut w, items).with_context(|| format!("write {}", tmp.display()))?;
        w.write_all(b"\n")?;
        w.flush()?;
    }
    replace_file_atomic(&tmp, path)
}

fn write_ndjson<T: Serialize>(path: &Path, items: &[T]) -> Result<()> {
    let mut w = NdjsonWriter::create(path)?;
    for it in items {
        w.write_record(it)?;
    }
    w.finish()
}
