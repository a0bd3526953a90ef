use std::collections::HashSet;

use crate::config::ParserConfig;
use crate::error::ParseError;
use crate::types::{Headers, ParsedRequest};

/// Line separator for every part of the request.
pub const LINE_SEPARATOR: &str = "\r\n";

/// Separator between a header name and its value.
pub const HEADER_DELIMITER: &str = ": ";

// ---------------------------------------------------------------------------
// Lenient parsing
// ---------------------------------------------------------------------------

/// Decompose a raw request into its textual parts.
///
/// This never fails. Malformed input yields absent or partial fields:
///
/// * a request line with fewer than three space-separated fields leaves the
///   trailing fields `None`;
/// * a header line without `": "` is stored with the whole line as its name
///   and no value;
/// * input without any `\r\n` is a lone request line, so headers and body
///   stay empty.
///
/// The body starts `headers.len() + 1` lines into the block after the
/// request line, rather than at the blank line that actually ends the
/// headers. When a header name repeats, the overwritten entries are not
/// counted and the body picks up the lines it should have skipped. Callers
/// relying on an exact body should use [`parse_request_strict`], which
/// rejects such input.
///
/// ```rust
/// use rawframe::parse_request;
///
/// let req = parse_request("GET /a HTTP/1.1\r\nHost: x\r\n\r\nBODY");
/// assert_eq!(req.method.as_deref(), Some("GET"));
/// assert_eq!(req.headers.get("Host"), Some(Some("x")));
/// assert_eq!(req.body, "BODY");
/// ```
pub fn parse_request(raw: &str) -> ParsedRequest {
    let mut lines = raw.split(LINE_SEPARATOR);
    let request_line = lines.next().unwrap_or_default();
    let block: Vec<&str> = lines.collect();

    let RequestLine {
        method,
        url,
        version,
        ..
    } = split_request_line(request_line);
    if version.is_none() {
        tracing::debug!(request_line, "request line has fewer than three fields");
    }

    let mut headers = Headers::new();
    let mut terminated = false;
    for line in &block {
        if line.is_empty() {
            terminated = true;
            break;
        }

        let HeaderLine { name, value, .. } = split_header_line(line);
        if value.is_none() {
            tracing::debug!(line, "header line has no ': ' delimiter");
        }
        if headers
            .insert(name.to_owned(), value.map(str::to_owned))
            .is_some()
        {
            tracing::debug!(name, "duplicate header overwritten; body boundary will shift");
        }
    }
    if !terminated && !block.is_empty() {
        tracing::debug!("header block has no terminating blank line");
    }

    // Skip count comes from the stored headers, not the scan position.
    let body = block
        .get(headers.len() + 1..)
        .map(|rest| rest.join(LINE_SEPARATOR))
        .unwrap_or_default();

    tracing::trace!(
        lines = block.len() + 1,
        headers = headers.len(),
        body_len = body.len(),
        "request parsed"
    );

    ParsedRequest {
        method: method.map(str::to_owned),
        url: url.map(str::to_owned),
        version: version.map(str::to_owned),
        headers,
        body,
        raw: raw.to_owned(),
    }
}

// ---------------------------------------------------------------------------
// Strict parsing
// ---------------------------------------------------------------------------

/// Parse a raw request, rejecting any input the lenient parser would
/// decompose incorrectly or incompletely.
///
/// On success the result is identical to [`parse_request`] for the same
/// input; on such input the body boundary always matches the blank line.
///
/// # Errors
///
/// Returns [`ParseError`] for a malformed request line, a header line that
/// lacks or repeats the `": "` delimiter, a duplicate header name, a missing
/// blank line after the headers, or any limit in `config` being exceeded.
pub fn parse_request_strict(raw: &str, config: &ParserConfig) -> Result<ParsedRequest, ParseError> {
    check_strict(raw, config).inspect_err(|e| {
        tracing::debug!(error = %e, "strict parse rejected request");
    })?;

    let request = parse_request(raw);
    if request.body.len() > config.max_body_size {
        tracing::debug!(body_len = request.body.len(), "strict parse rejected request");
        return Err(ParseError::BodyTooLarge);
    }
    Ok(request)
}

fn check_strict(raw: &str, config: &ParserConfig) -> Result<(), ParseError> {
    let mut lines = raw.split(LINE_SEPARATOR);
    let request_line = lines.next().unwrap_or_default();

    if request_line.len() > config.max_request_line_len {
        return Err(ParseError::RequestLineTooLong);
    }
    if !split_request_line(request_line).is_well_formed() {
        return Err(ParseError::InvalidRequestLine(request_line.to_owned()));
    }

    let mut seen = HashSet::new();
    for line in lines {
        if line.is_empty() {
            return Ok(());
        }
        if line.len() > config.max_header_line_len {
            return Err(ParseError::HeaderTooLarge);
        }
        if seen.len() >= config.max_headers_count {
            return Err(ParseError::TooManyHeaders);
        }

        let header = split_header_line(line);
        if header.value.is_none() {
            return Err(ParseError::MalformedHeader(line.to_owned()));
        }
        if header.truncated {
            return Err(ParseError::AmbiguousHeader(line.to_owned()));
        }
        let name = header.name;
        if !seen.insert(name) {
            return Err(ParseError::DuplicateHeader(name.to_owned()));
        }
    }

    Err(ParseError::MissingHeaderTerminator)
}

// ---------------------------------------------------------------------------
// Line splitting helpers
// ---------------------------------------------------------------------------

/// The request line split on single spaces. Both parse modes read it
/// through [`split_request_line`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RequestLine<'a> {
    method: Option<&'a str>,
    url: Option<&'a str>,
    version: Option<&'a str>,
    /// A fourth field exists; it is ignored by the lenient parser.
    extra_fields: bool,
}

impl RequestLine<'_> {
    /// Exactly three fields, none empty.
    fn is_well_formed(&self) -> bool {
        !self.extra_fields
            && [self.method, self.url, self.version]
                .into_iter()
                .all(|f| f.is_some_and(|f| !f.is_empty()))
    }
}

/// A header line split on `": "`. Both parse modes read it through
/// [`split_header_line`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HeaderLine<'a> {
    name: &'a str,
    value: Option<&'a str>,
    /// A second delimiter exists; everything from it on is dropped.
    truncated: bool,
}

/// First three single-space-separated fields. Empty fields from consecutive
/// spaces are kept.
fn split_request_line(line: &str) -> RequestLine<'_> {
    let mut fields = line.split(' ');
    RequestLine {
        method: fields.next(),
        url: fields.next(),
        version: fields.next(),
        extra_fields: fields.next().is_some(),
    }
}

/// Name before the first delimiter; value up to the second delimiter, if any.
fn split_header_line(line: &str) -> HeaderLine<'_> {
    let mut parts = line.split(HEADER_DELIMITER);
    HeaderLine {
        name: parts.next().unwrap_or_default(),
        value: parts.next(),
        truncated: parts.next().is_some(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields<'a>(line: &RequestLine<'a>) -> (Option<&'a str>, Option<&'a str>, Option<&'a str>) {
        (line.method, line.url, line.version)
    }

    #[test]
    fn request_line_three_fields() {
        let line = split_request_line("GET / HTTP/1.1");
        assert_eq!(fields(&line), (Some("GET"), Some("/"), Some("HTTP/1.1")));
        assert!(line.is_well_formed());
    }

    #[test]
    fn request_line_extra_fields_ignored() {
        let line = split_request_line("GET / HTTP/1.1 junk");
        assert_eq!(fields(&line), (Some("GET"), Some("/"), Some("HTTP/1.1")));
        assert!(line.extra_fields);
        assert!(!line.is_well_formed());
    }

    #[test]
    fn request_line_double_space_keeps_empty_field() {
        let line = split_request_line("GET  HTTP/1.1");
        assert_eq!(fields(&line), (Some("GET"), Some(""), Some("HTTP/1.1")));
        assert!(!line.is_well_formed());
    }

    #[test]
    fn request_line_empty() {
        let line = split_request_line("");
        assert_eq!(fields(&line), (Some(""), None, None));
        assert!(!line.is_well_formed());
    }

    #[test]
    fn header_line_simple() {
        let header = split_header_line("Host: x");
        assert_eq!((header.name, header.value), ("Host", Some("x")));
        assert!(!header.truncated);
    }

    #[test]
    fn header_line_without_space_after_colon() {
        let header = split_header_line("Host:x");
        assert_eq!((header.name, header.value), ("Host:x", None));
    }

    #[test]
    fn header_line_second_delimiter_truncates_value() {
        let header = split_header_line("X: a: b");
        assert_eq!((header.name, header.value), ("X", Some("a")));
        assert!(header.truncated);
    }

    #[test]
    fn header_line_empty_value() {
        let header = split_header_line("X: ");
        assert_eq!((header.name, header.value), ("X", Some("")));
    }

    #[test]
    fn strict_rejections_follow_lenient_split() {
        let config = ParserConfig::default();
        for line in ["Host: x", "Host:x", "X: a: b", ": v", "X: ", "bare"] {
            let header = split_header_line(line);
            let raw = format!("GET / HTTP/1.1\r\n{line}\r\n\r\n");
            let strict = check_strict(&raw, &config);
            match (header.value, header.truncated) {
                (None, _) => assert_eq!(strict, Err(ParseError::MalformedHeader(line.into()))),
                (Some(_), true) => {
                    assert_eq!(strict, Err(ParseError::AmbiguousHeader(line.into())))
                }
                (Some(_), false) => assert_eq!(strict, Ok(()), "line {line:?}"),
            }
        }
    }

    #[test]
    fn strict_counts_headers_against_limit() {
        let config = ParserConfig {
            max_headers_count: 1,
            ..ParserConfig::default()
        };
        assert_eq!(
            check_strict("GET / HTTP/1.1\r\nA: 1\r\nB: 2\r\n\r\n", &config),
            Err(ParseError::TooManyHeaders)
        );
        assert_eq!(check_strict("GET / HTTP/1.1\r\nA: 1\r\n\r\n", &config), Ok(()));
    }
}
