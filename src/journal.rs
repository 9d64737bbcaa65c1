//! Append-only JSON-lines journal of engine events.
//!
//! Enabled by setting `TGM_LOG_PATH`; each drained [`GameEvent`] becomes one line tagged with
//! the frame it was drained on.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::core::GameEvent;

pub const LOG_PATH_ENV: &str = "TGM_LOG_PATH";

#[derive(Serialize)]
struct Record<'a> {
    frame: u64,
    #[serde(flatten)]
    event: &'a GameEvent,
}

pub struct EventJournal<W: Write> {
    out: W,
    line: Vec<u8>,
    records: u64,
}

impl EventJournal<BufWriter<File>> {
    /// Open (or create) `path` for appending.
    pub fn open(path: &str) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("opening event journal {path}"))?;
        Ok(Self::new(BufWriter::new(file)))
    }

    /// Journal at `TGM_LOG_PATH`, or `None` when it is unset or blank.
    pub fn from_env() -> Result<Option<Self>> {
        let path = std::env::var(LOG_PATH_ENV)
            .ok()
            .map(|s| s.trim().to_string())
            .and_then(|s| if s.is_empty() { None } else { Some(s) });
        path.map(|p| Self::open(&p)).transpose()
    }
}

impl<W: Write> EventJournal<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            line: Vec::with_capacity(256),
            records: 0,
        }
    }

    pub fn record(&mut self, frame: u64, event: &GameEvent) -> Result<()> {
        self.line.clear();
        serde_json::to_writer(&mut self.line, &Record { frame, event })?;
        self.line.push(b'\n');
        self.out.write_all(&self.line)?;
        self.records += 1;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }

    /// Number of events written
    pub fn records(&self) -> u64 {
        self.records
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ShapeKind, Track};

    #[test]
    fn test_one_json_object_per_line() {
        let mut journal = EventJournal::new(Vec::new());
        journal
            .record(3, &GameEvent::Cue { track: Track::Start })
            .unwrap();
        journal
            .record(
                95,
                &GameEvent::Spawned {
                    shape: ShapeKind::T,
                    alternate: false,
                },
            )
            .unwrap();
        assert_eq!(journal.records(), 2);

        let text = String::from_utf8(journal.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["frame"], 3);
        assert_eq!(first["event"], "cue");
        assert_eq!(first["track"], "Start");

        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["event"], "spawned");
        assert_eq!(second["shape"], "T");
        assert_eq!(second["alternate"], false);
    }
}
