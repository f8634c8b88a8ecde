//! Address trace reader.
//!
//! A trace is a text stream with one access per line:
//!
//! ```text
//! # kind address
//! I 0x00400000
//! D 7fff1230
//! ```
//!
//! `I` marks an instruction fetch and `D` a data access (either case). The
//! address is hexadecimal with an optional `0x` prefix and must fit in 32
//! bits. Blank lines and lines starting with `#` are skipped; anything after
//! the address is ignored.

use std::io::{self, BufRead};

use thiserror::Error;

use crate::common::AccessType;

/// A single access read from a trace.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraceRecord {
    /// Whether the access is a fetch or a data access.
    pub access: AccessType,
    /// Byte address.
    pub addr: u32,
}

/// Failure while reading a trace.
#[derive(Debug, Error)]
pub enum TraceError {
    /// The underlying reader failed.
    #[error("failed to read trace: {0}")]
    Io(#[from] io::Error),

    /// A line did not start with a known access kind.
    #[error("line {line}: unknown access kind {kind:?}, expected I or D")]
    UnknownKind {
        /// 1-based line number.
        line: usize,
        /// The rejected kind field.
        kind: String,
    },

    /// A line had no address, or the address was not 32-bit hexadecimal.
    #[error("line {line}: invalid address {text:?}")]
    InvalidAddress {
        /// 1-based line number.
        line: usize,
        /// The rejected address field (empty if missing).
        text: String,
    },
}

/// Parses one trace line.
///
/// # Returns
///
/// `Ok(None)` for blank and comment lines, otherwise the parsed record.
///
/// # Errors
///
/// Returns [`TraceError::UnknownKind`] or [`TraceError::InvalidAddress`]
/// tagged with `line_no`.
pub fn parse_line(text: &str, line_no: usize) -> Result<Option<TraceRecord>, TraceError> {
    let text = text.trim();
    if text.is_empty() || text.starts_with('#') {
        return Ok(None);
    }

    let mut fields = text.split_whitespace();
    let kind = fields.next().unwrap_or_default();
    let access = match kind {
        "I" | "i" => AccessType::Fetch,
        "D" | "d" => AccessType::Data,
        _ => {
            return Err(TraceError::UnknownKind {
                line: line_no,
                kind: kind.to_string(),
            });
        }
    };

    let raw = fields.next().unwrap_or_default();
    let digits = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .unwrap_or(raw);
    let addr = u32::from_str_radix(digits, 16).map_err(|_| TraceError::InvalidAddress {
        line: line_no,
        text: raw.to_string(),
    })?;

    Ok(Some(TraceRecord { access, addr }))
}

/// Iterator over the records of a trace.
///
/// Yields one `Result` per access; iteration can continue after an error.
#[derive(Debug)]
pub struct TraceReader<R> {
    lines: io::Lines<R>,
    line_no: usize,
}

impl<R: BufRead> TraceReader<R> {
    /// Wraps a buffered reader.
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
        }
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = Result<TraceRecord, TraceError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = self.lines.next()?;
            self.line_no += 1;
            let parsed = line
                .map_err(TraceError::from)
                .and_then(|text| parse_line(&text, self.line_no));
            match parsed {
                Ok(Some(record)) => return Some(Ok(record)),
                Ok(None) => {}
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
