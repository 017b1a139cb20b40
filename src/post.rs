//! Post record shared by every stage, plus timestamp parsing/formatting.
//!
//! Input files come from several collectors that never agreed on column names,
//! so deserialization accepts the common aliases (`selftext`, `score`,
//! `num_comments`, `created_utc`, `created_at`) and tolerates missing or null fields.
//! Only one alias per field: raw Reddit objects carry both `ups` and `score`,
//! and serde rejects a field that appears twice.

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime};

pub const DELETED_AUTHOR: &str = "[deleted]";

/// One collected Reddit post. Immutable once collected; analysis results are
/// attached alongside it (see `AnalyzedPost`) rather than written into it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Post {
    #[serde(default, deserialize_with = "de_text")]
    pub title: String,
    #[serde(default, alias = "selftext", deserialize_with = "de_text")]
    pub body: String,
    #[serde(default, deserialize_with = "de_text")]
    pub url: String,
    #[serde(default = "deleted_author", deserialize_with = "de_author")]
    pub author: String,
    #[serde(default, alias = "score", deserialize_with = "de_count")]
    pub upvotes: i64,
    #[serde(default, alias = "num_comments", deserialize_with = "de_count")]
    pub comments: i64,
    #[serde(
        rename = "date",
        alias = "created_utc",
        alias = "created_at",
        default,
        deserialize_with = "de_timestamp",
        serialize_with = "ser_timestamp"
    )]
    pub created_at: Option<OffsetDateTime>,
    #[serde(default, deserialize_with = "de_text")]
    pub subreddit: String,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub permalink: Option<String>,
}

impl Post {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            url: String::new(),
            author: DELETED_AUTHOR.to_string(),
            upvotes: 0,
            comments: 0,
            created_at: None,
            subreddit: String::new(),
            permalink: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self { self.url = url.into(); self }
    pub fn with_author(mut self, author: impl Into<String>) -> Self { self.author = author.into(); self }
    pub fn with_subreddit(mut self, sub: impl Into<String>) -> Self { self.subreddit = sub.into(); self }
    pub fn with_votes(mut self, upvotes: i64, comments: i64) -> Self { self.upvotes = upvotes; self.comments = comments; self }
    pub fn with_created_at(mut self, ts: OffsetDateTime) -> Self { self.created_at = Some(ts); self }

    /// Upvotes plus comments.
    pub fn engagement(&self) -> i64 {
        self.upvotes.saturating_add(self.comments)
    }

    /// Title and body joined by a single space (used for keyword matching).
    pub fn text(&self) -> String {
        let mut s = String::with_capacity(self.title.len() + self.body.len() + 1);
        s.push_str(&self.title);
        s.push(' ');
        s.push_str(&self.body);
        s
    }

    pub fn is_pseudo_author(&self) -> bool {
        let a = self.author.trim().to_lowercase();
        a.is_empty() || a == "[deleted]" || a == "[removed]"
    }

    pub fn subreddit_lower(&self) -> String {
        let s = self.subreddit.trim().to_lowercase();
        s.strip_prefix("r/").map(str::to_string).unwrap_or(s)
    }

    /// Coarse media kind from the link host.
    pub fn media_type(&self) -> &'static str {
        let u = self.url.to_lowercase();
        if u.is_empty() {
            "Text"
        } else if u.contains("i.redd.it") || u.contains("imgur") {
            "Image"
        } else if u.contains("v.redd.it") || u.contains("youtube") || u.contains("youtu.be") {
            "Video"
        } else if u.contains("reddit.com/gallery") {
            "Gallery"
        } else if u.contains("reddit.com") {
            "Text/Link"
        } else {
            "External Link"
        }
    }
}

fn deleted_author() -> String {
    DELETED_AUTHOR.to_string()
}

// ----------------------------- Timestamps ----------------------------------

/// Parse the timestamp shapes seen in collected data:
/// `YYYY-MM-DD HH:MM:SS`, RFC3339, `YYYY-MM-DDTHH:MM:SS`, `YYYY-MM-DD`,
/// and unix seconds (integer or fractional). Naive values are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<OffsetDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(secs) = s.parse::<f64>() {
        return from_unix_seconds(secs);
    }
    if let Ok(dt) = OffsetDateTime::parse(s, &Rfc3339) {
        return Some(dt);
    }
    let space = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    if let Ok(dt) = PrimitiveDateTime::parse(s, &space) {
        return Some(dt.assume_utc());
    }
    let tee = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
    if let Ok(dt) = PrimitiveDateTime::parse(s, &tee) {
        return Some(dt.assume_utc());
    }
    // fractional seconds: drop them and retry
    if let Some((head, _frac)) = s.split_once('.') {
        if head.len() == 19 {
            return parse_timestamp(head);
        }
    }
    let day = format_description!("[year]-[month]-[day]");
    Date::parse(s, &day).ok().map(|d| d.midnight().assume_utc())
}

pub fn from_unix_seconds(secs: f64) -> Option<OffsetDateTime> {
    if !secs.is_finite() {
        return None;
    }
    OffsetDateTime::from_unix_timestamp(secs.trunc() as i64).ok()
}

/// `YYYY-MM-DD HH:MM:SS`, the format every report prints.
pub fn format_timestamp(ts: OffsetDateTime) -> String {
    let f = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    ts.format(&f).unwrap_or_else(|_| ts.unix_timestamp().to_string())
}

pub fn format_day(date: Date) -> String {
    let f = format_description!("[year]-[month]-[day]");
    date.format(&f).unwrap_or_default()
}

fn ser_timestamp<S: Serializer>(ts: &Option<OffsetDateTime>, s: S) -> Result<S::Ok, S::Error> {
    match ts {
        Some(t) => s.serialize_str(&format_timestamp(*t)),
        None => s.serialize_none(),
    }
}

// ----------------------------- Lenient field decoding ----------------------------------

struct TimestampVisitor;

impl<'de> Visitor<'de> for TimestampVisitor {
    type Value = Option<OffsetDateTime>;
    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a timestamp string or unix seconds")
    }
    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> { Ok(OffsetDateTime::from_unix_timestamp(v).ok()) }
    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> { Ok(OffsetDateTime::from_unix_timestamp(v as i64).ok()) }
    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> { Ok(from_unix_seconds(v)) }
    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> { Ok(parse_timestamp(v)) }
    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> { Ok(None) }
    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> { Ok(None) }
    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> { d.deserialize_any(self) }
}

fn de_timestamp<'de, D: Deserializer<'de>>(d: D) -> Result<Option<OffsetDateTime>, D::Error> {
    d.deserialize_any(TimestampVisitor)
}

struct CountVisitor;

impl<'de> Visitor<'de> for CountVisitor {
    type Value = i64;
    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an integer count")
    }
    fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> { Ok(v) }
    fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> { Ok(i64::try_from(v).unwrap_or(i64::MAX)) }
    fn visit_f64<E: de::Error>(self, v: f64) -> Result<i64, E> { Ok(if v.is_finite() { v as i64 } else { 0 }) }
    fn visit_bool<E: de::Error>(self, v: bool) -> Result<i64, E> { Ok(v as i64) }
    fn visit_str<E: de::Error>(self, v: &str) -> Result<i64, E> {
        let t = v.trim();
        Ok(t.parse::<i64>().ok().or_else(|| t.parse::<f64>().ok().map(|f| f as i64)).unwrap_or(0))
    }
    fn visit_none<E: de::Error>(self) -> Result<i64, E> { Ok(0) }
    fn visit_unit<E: de::Error>(self) -> Result<i64, E> { Ok(0) }
    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<i64, D::Error> { d.deserialize_any(self) }
}

fn de_count<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    d.deserialize_any(CountVisitor)
}

struct TextVisitor;

impl<'de> Visitor<'de> for TextVisitor {
    type Value = Option<String>;
    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a string")
    }
    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> { Ok(Some(v.to_string())) }
    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> { Ok(Some(v)) }
    // JSON sources sometimes carry numbers in text fields; keep their text form.
    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> { Ok(Some(v.to_string())) }
    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> { Ok(Some(v.to_string())) }
    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> { Ok(Some(v.to_string())) }
    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> { Ok(Some(v.to_string())) }
    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> { Ok(None) }
    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> { Ok(None) }
    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> { d.deserialize_any(self) }
}

fn de_opt_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(d.deserialize_any(TextVisitor)?.filter(|s| !s.is_empty()))
}

fn de_text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(d.deserialize_any(TextVisitor)?.unwrap_or_default())
}

fn de_author<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(d.deserialize_any(TextVisitor)?
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(deleted_author))
}
