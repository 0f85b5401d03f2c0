// src/stream.rs

//! NDJSON record streams
//!
//! Exported records arrive one JSON object per line; imports are emitted
//! the same way.

use serde_json::Value;
use std::io::{BufRead, Write};

use crate::error::{Error, Result};

/// Iterator over the records of an NDJSON stream
///
/// Blank lines are skipped. Every other line must hold a JSON object.
pub struct RecordReader<R: BufRead> {
    reader: R,
    line: usize,
    buffer: String,
}

impl<R: BufRead> RecordReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            buffer: String::new(),
        }
    }
}

impl<R: BufRead> Iterator for RecordReader<R> {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buffer.clear();
            match self.reader.read_line(&mut self.buffer) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(e.into())),
            }
            self.line += 1;

            let text = self.buffer.trim();
            if text.is_empty() {
                continue;
            }

            let parsed = serde_json::from_str::<Value>(text)
                .map_err(|e| Error::InvalidRecord(format!("line {}: {}", self.line, e)))
                .and_then(|value| {
                    if value.is_object() {
                        Ok(value)
                    } else {
                        Err(Error::InvalidRecord(format!(
                            "line {}: expected a JSON object",
                            self.line
                        )))
                    }
                });
            return Some(parsed);
        }
    }
}

/// Write one record as a single NDJSON line
pub fn write_record<W: Write>(writer: &mut W, record: &Value) -> Result<()> {
    serde_json::to_writer(&mut *writer, record)?;
    writer.write_all(b"\n")?;
    Ok(())
}
