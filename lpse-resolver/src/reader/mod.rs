//! Request line reader.
//!
//! Each input line is one request: an LPSE path, optionally followed by `?`
//! and a query string. Blank lines and lines starting with `#` are skipped.

use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tracing::debug;

use crate::errors::PipelineError;

/// One request read from the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestLine {
    /// 1-based line number in the input.
    pub line: u64,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_string: Option<String>,
}

impl RequestLine {
    /// Split a raw input line into path and query string.
    ///
    /// Returns `None` for blank and comment lines.
    pub fn parse(line: u64, raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() || raw.starts_with('#') {
            return None;
        }

        let (path, query_string) = match raw.split_once('?') {
            Some((path, query)) => (path, Some(query.to_string())),
            None => (raw, None),
        };

        Some(Self {
            line,
            path: path.to_string(),
            query_string,
        })
    }
}

/// Reads request lines from any buffered async source.
pub struct LineReader<R> {
    lines: Lines<R>,
    line_number: u64,
}

impl<R: AsyncBufRead + Unpin> LineReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_number: 0,
        }
    }

    /// The next request, or `None` at end of input.
    pub async fn next_request(&mut self) -> Result<Option<RequestLine>, PipelineError> {
        loop {
            let Some(raw) = self
                .lines
                .next_line()
                .await
                .map_err(|e| PipelineError::read(e.to_string()))?
            else {
                return Ok(None);
            };
            self.line_number += 1;

            match RequestLine::parse(self.line_number, &raw) {
                Some(request) => return Ok(Some(request)),
                None => debug!(line = self.line_number, "Skipping blank or comment line"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_splits_query_string() {
        let request = RequestLine::parse(3, " /shop/default/Acme/b/?q=boot \n").unwrap();
        assert_eq!(request.line, 3);
        assert_eq!(request.path, "/shop/default/Acme/b/");
        assert_eq!(request.query_string.as_deref(), Some("q=boot"));
    }

    #[test]
    fn test_parse_skips_comments() {
        assert!(RequestLine::parse(1, "").is_none());
        assert!(RequestLine::parse(1, "# a comment").is_none());
    }

    #[tokio::test]
    async fn test_reader_counts_skipped_lines() {
        let input: &[u8] = b"# header\n\n/shop/default/\n/shop/brief/\n";
        let mut reader = LineReader::new(input);

        let first = reader.next_request().await.unwrap().unwrap();
        assert_eq!(first.line, 3);
        assert_eq!(first.path, "/shop/default/");

        let second = reader.next_request().await.unwrap().unwrap();
        assert_eq!(second.line, 4);

        assert!(reader.next_request().await.unwrap().is_none());
    }
}
