//! Line-oriented JSONL reading with transparent gzip handling

use crate::error::{Error, Result};
use crate::record::Record;
use flate2::read::GzDecoder;
use serde_json::Value;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// Magic bytes at the start of every gzip stream
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Iterator over the records of one JSONL file.
///
/// Compression is detected from the file's magic bytes rather than its
/// extension, so a mis-labeled plain-text `.jsonl.gz` still reads. Blank
/// lines are skipped; a line that is not a JSON object is an error carrying
/// the path and line number.
pub struct JsonlReader {
    lines: Lines<BufReader<Box<dyn Read + Send>>>,
    path: PathBuf,
    line_number: usize,
}

impl JsonlReader {
    /// Open a JSONL file, sniffing for gzip compression
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut file = File::open(&path)?;

        let mut magic = [0u8; 2];
        let read = file.read(&mut magic)?;
        file.seek(SeekFrom::Start(0))?;

        let reader: Box<dyn Read + Send> = if read == 2 && magic == GZIP_MAGIC {
            Box::new(GzDecoder::new(file))
        } else {
            Box::new(file)
        };

        Ok(Self {
            lines: BufReader::new(reader).lines(),
            path,
            line_number: 0,
        })
    }

    fn parse_line(&self, line: &str) -> Result<Record> {
        let value: Value = serde_json::from_str(line).map_err(|e| {
            Error::transform(
                self.path.display().to_string(),
                format!("line {}: invalid JSON ({e})", self.line_number),
            )
        })?;

        match value {
            Value::Object(map) => Ok(map),
            other => Err(Error::transform(
                self.path.display().to_string(),
                format!(
                    "line {}: expected a JSON object, got {}",
                    self.line_number,
                    type_name(&other)
                ),
            )),
        }
    }
}

impl Iterator for JsonlReader {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => {
                    return Some(Err(Error::transform(
                        self.path.display().to_string(),
                        format!("line {}: {e}", self.line_number + 1),
                    )))
                }
            };
            self.line_number += 1;

            if line.trim().is_empty() {
                continue;
            }
            return Some(self.parse_line(&line));
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
