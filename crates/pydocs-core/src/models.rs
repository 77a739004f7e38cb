use encoding_rs::{Encoding, UTF_8};
use sha2::{Digest, Sha256};

use crate::error::AppError;

/// Raw outcome of one HTTP GET, as returned by a [`Fetcher`](crate::traits::Fetcher).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// Final URL of the request.
    pub url: String,
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(url: impl Into<String>, status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            url: url.into(),
            status,
            body: body.into(),
        }
    }

    /// Shorthand for a `200 OK` response.
    pub fn ok(url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self::new(url, 200, body)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A fetched page whose text encoding has been forced by the caller.
#[derive(Debug, Clone)]
pub struct Page {
    pub response: RawResponse,
    encoding: &'static Encoding,
}

impl Page {
    /// Wrap a response, forcing its text encoding to `label`.
    ///
    /// Unknown labels fall back to UTF-8.
    pub fn new(response: RawResponse, label: &str) -> Self {
        let encoding = Encoding::for_label(label.as_bytes()).unwrap_or(UTF_8);
        Self { response, encoding }
    }

    pub fn url(&self) -> &str {
        &self.response.url
    }

    pub fn encoding(&self) -> &'static str {
        self.encoding.name()
    }

    /// Body decoded with the forced encoding. Malformed sequences are replaced.
    pub fn text(&self) -> String {
        let (text, _, _) = self.encoding.decode(&self.response.body);
        text.into_owned()
    }
}

/// Tabular result of one extraction routine: a header row plus data rows
/// of the same arity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultTable {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl ResultTable {
    pub fn new<S: Into<String>>(header: impl IntoIterator<Item = S>) -> Self {
        Self {
            header: header.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a data row. Rows whose length differs from the header are rejected.
    pub fn push_row<S: Into<String>>(
        &mut self,
        row: impl IntoIterator<Item = S>,
    ) -> Result<(), AppError> {
        let row: Vec<String> = row.into_iter().map(Into::into).collect();
        if row.len() != self.header.len() {
            return Err(AppError::ColumnMismatch {
                expected: self.header.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Data rows, without the header.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn width(&self) -> usize {
        self.header.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Header first, then every data row.
    pub fn all_rows(&self) -> impl Iterator<Item = &[String]> {
        std::iter::once(self.header.as_slice()).chain(self.rows.iter().map(Vec::as_slice))
    }
}

/// Count-by-label aggregation that remembers first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusTally {
    counts: Vec<(String, usize)>,
}

impl StatusTally {
    pub const TOTAL_LABEL: &'static str = "Total";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, label: &str) {
        match self.counts.iter_mut().find(|(l, _)| l == label) {
            Some((_, count)) => *count += 1,
            None => self.counts.push((label.to_string(), 1)),
        }
    }

    pub fn get(&self, label: &str) -> usize {
        self.counts
            .iter()
            .find(|(l, _)| l == label)
            .map_or(0, |(_, c)| *c)
    }

    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, c)| c).sum()
    }

    /// Two-column table (label, count) in first-seen order with `Total` last.
    pub fn into_table(self, header: [&str; 2]) -> ResultTable {
        let total = self.total();
        let mut table = ResultTable::new(header);
        table.rows = self
            .counts
            .into_iter()
            .map(|(label, count)| vec![label, count.to_string()])
            .chain(std::iter::once(vec![
                Self::TOTAL_LABEL.to_string(),
                total.to_string(),
            ]))
            .collect();
        table
    }
}

/// Compute a SHA-256 hash of a string, returned as 64-char hex.
pub fn compute_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}
