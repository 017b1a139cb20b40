use crate::util::{create_staging, replace_file_atomic};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use zstd::stream::read::Decoder;
use zstd::stream::write::Encoder;

const READ_BUF: usize = 64 * 1024;
const ZSTD_LEVEL: i32 = 3;

pub fn is_zst(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()).is_some_and(|e| e.eq_ignore_ascii_case("zst"))
}

/// NDJSON reader over a plain or zstd-compressed file.
/// `.zst` inputs are decoded as a stream with a raised window limit.
pub struct NdjsonReader {
    rdr: Box<dyn BufRead>,
}

impl NdjsonReader {
    pub fn open(path: &Path) -> Result<Self> {
        let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
        let rdr: Box<dyn BufRead> = if is_zst(path) {
            let mut decoder = Decoder::new(f).with_context(|| format!("zstd decoder for {}", path.display()))?;
            decoder.window_log_max(31)?;
            Box::new(BufReader::with_capacity(READ_BUF, decoder))
        } else {
            Box::new(BufReader::with_capacity(READ_BUF, f))
        };
        Ok(Self { rdr })
    }

    /// Read the next line into `buf`. Returns the number of bytes read (0 on EOF).
    /// Strips trailing `\r?\n`.
    pub fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        buf.clear();
        let n = self.rdr.read_line(buf)?;
        if n == 0 { return Ok(0); }
        if buf.ends_with('\n') {
            buf.pop();
            if buf.ends_with('\r') { buf.pop(); }
        }
        Ok(n)
    }

    /// Decode every non-empty line as `T`. Lines that fail to parse are skipped with a warning.
    pub fn read_all<T: DeserializeOwned>(mut self, label: &Path) -> Result<Vec<T>> {
        let mut out = Vec::new();
        let mut buf = String::with_capacity(16 * 1024);
        let mut line_no = 0usize;
        let mut skipped = 0usize;
        loop {
            let n = self.read_line(&mut buf).with_context(|| format!("read {}", label.display()))?;
            if n == 0 { break; }
            line_no += 1;
            if buf.trim().is_empty() { continue; }
            match serde_json::from_str::<T>(&buf) {
                Ok(v) => out.push(v),
                Err(e) => {
                    skipped += 1;
                    tracing::warn!("{}:{}: skipping malformed line: {}", label.display(), line_no, e);
                }
            }
        }
        if skipped > 0 {
            tracing::warn!("{}: skipped {} malformed lines", label.display(), skipped);
        }
        Ok(out)
    }
}

enum Sink {
    Plain(BufWriter<File>),
    Zst(Encoder<'static, BufWriter<File>>),
}

impl Sink {
    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Sink::Plain(w) => w,
            Sink::Zst(e) => e,
        }
    }

    fn finish(self) -> io::Result<()> {
        match self {
            Sink::Plain(mut w) => w.flush(),
            Sink::Zst(e) => {
                let mut w = e.finish()?;
                w.flush()
            }
        }
    }
}

/// NDJSON writer that stages output next to `dest` and promotes it on `finish`.
/// `.zst` destinations are zstd-compressed.
pub struct NdjsonWriter {
    tmp: PathBuf,
    dest: PathBuf,
    sink: Option<Sink>,
}

impl NdjsonWriter {
    pub fn create(dest: &Path) -> Result<Self> {
        let (tmp, f) = create_staging(dest)?;
        let w = BufWriter::new(f);
        let sink = if is_zst(dest) {
            Sink::Zst(Encoder::new(w, ZSTD_LEVEL).with_context(|| format!("zstd encoder for {}", dest.display()))?)
        } else {
            Sink::Plain(w)
        };
        Ok(Self { tmp, dest: dest.to_path_buf(), sink: Some(sink) })
    }

    pub fn write_record<T: Serialize>(&mut self, rec: &T) -> Result<()> {
        if let Some(sink) = &mut self.sink {
            let w = sink.writer();
            serde_json::to_writer(&mut *w, rec)?;
            w.write_all(b"\n")?;
        }
        Ok(())
    }

    /// Flushes (finishing the zstd frame if any) and atomically replaces `dest`.
    pub fn finish(mut self) -> Result<()> {
        if let Some(sink) = self.sink.take() {
            sink.finish().with_context(|| format!("flush {}", self.tmp.display()))?;
        }
        replace_file_atomic(&self.tmp, &self.dest)
    }
}
