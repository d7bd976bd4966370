//! The trace file parser.

use crate::{SharedHandler, TraceError, TraceEvent, TraceOp};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracesim_core::{Event, EventSource, SourceError};
use tracesim_types::SimTime;
use tracing::trace;

/// Parses a filesystem call trace into [`TraceEvent`]s.
///
/// A lazy, finite, non-restartable reader: each `next_record` call consumes
/// lines until it finds a recognized operation (skipping blanks, comments
/// and unknown operations iteratively) or hits end-of-stream. Implements
/// [`EventSource`], so it plugs directly into the multiplexer.
pub struct TraceParser<R> {
    reader: R,
    handler: SharedHandler,
    line: usize,
}

impl TraceParser<BufReader<File>> {
    /// Open a trace file on disk.
    pub fn open(path: impl AsRef<Path>, handler: SharedHandler) -> Result<Self, TraceError> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file), handler))
    }
}

impl<R: BufRead> TraceParser<R> {
    /// Parse from any buffered reader.
    pub fn new(reader: R, handler: SharedHandler) -> Self {
        Self {
            reader,
            handler,
            line: 0,
        }
    }

    /// Read the next recognized record, or `None` at end-of-stream.
    pub fn next_record(&mut self) -> Result<Option<TraceEvent>, TraceError> {
        let mut buf = String::new();
        loop {
            buf.clear();
            self.line += 1;
            if self.reader.read_line(&mut buf)? == 0 {
                return Ok(None);
            }

            let record = buf.trim();
            if record.is_empty() || record.starts_with('#') {
                continue;
            }

            let mut tokens = record.split_whitespace();
            let Some(operation) = tokens.next() else {
                continue;
            };

            let op = match operation {
                "read" => {
                    let time = self.parse_time(tokens.next())?;
                    let path = self.parse_path(tokens.next())?;
                    let length = self.parse_length(tokens.next())?;
                    return Ok(Some(self.event(time, TraceOp::Read { path, length })));
                }
                "write" => {
                    let time = self.parse_time(tokens.next())?;
                    let path = self.parse_path(tokens.next())?;
                    let length = self.parse_length(tokens.next())?;
                    return Ok(Some(self.event(time, TraceOp::Write { path, length })));
                }
                "close" => {
                    let time = self.parse_time(tokens.next())?;
                    let path = self.parse_path(tokens.next())?;
                    return Ok(Some(self.event(time, TraceOp::Close { path })));
                }
                "unlink" => {
                    let time = self.parse_time(tokens.next())?;
                    let path = self.parse_path(tokens.next())?;
                    return Ok(Some(self.event(time, TraceOp::Unlink { path })));
                }
                other => other,
            };

            trace!(operation = op, line = self.line, "skipping unrecognized trace operation");
        }
    }

    fn event(&self, time: SimTime, op: TraceOp) -> TraceEvent {
        TraceEvent::new(time, op, self.handler.clone())
    }

    /// Parse a `<microseconds>-<anything>` timestamp token: only the
    /// portion before the first `-` is used, converted to milliseconds by
    /// integer division.
    fn parse_time(&self, token: Option<&str>) -> Result<SimTime, TraceError> {
        let token = token.ok_or_else(|| self.malformed("missing timestamp"))?;
        let micros_text = token.split('-').next().unwrap_or(token);
        let micros: u64 = micros_text
            .parse()
            .map_err(|_| self.malformed(&format!("bad timestamp '{token}'")))?;
        Ok(SimTime::from_millis(micros / 1_000))
    }

    fn parse_path(&self, token: Option<&str>) -> Result<String, TraceError> {
        token
            .map(str::to_string)
            .ok_or_else(|| self.malformed("missing path"))
    }

    fn parse_length(&self, token: Option<&str>) -> Result<u64, TraceError> {
        let token = token.ok_or_else(|| self.malformed("missing length"))?;
        token
            .parse()
            .map_err(|_| self.malformed(&format!("bad length '{token}'")))
    }

    fn malformed(&self, reason: &str) -> TraceError {
        TraceError::MalformedRecord {
            line: self.line,
            reason: reason.to_string(),
        }
    }
}

impl<R: BufRead> EventSource for TraceParser<R> {
    fn next_event(&mut self) -> Result<Option<Box<dyn Event>>, SourceError> {
        match self.next_record() {
            Ok(Some(event)) => Ok(Some(Box::new(event))),
            Ok(None) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}
