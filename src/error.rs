use thiserror::Error;

/// Reasons strict parsing rejects a request.
///
/// The lenient [`parse_request`](crate::parse_request) never produces these;
/// it degrades silently instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The request line is not exactly three non-empty space-separated fields.
    #[error("invalid request line: '{0}'")]
    InvalidRequestLine(String),
    /// The request line exceeds the configured maximum length.
    #[error("request line exceeds maximum allowed length")]
    RequestLineTooLong,
    /// A header line has no `": "` delimiter.
    #[error("malformed header line: '{0}'")]
    MalformedHeader(String),
    /// A header line has more than one `": "` delimiter.
    #[error("ambiguous header line (multiple ': ' delimiters): '{0}'")]
    AmbiguousHeader(String),
    /// The same header name appears more than once.
    #[error("duplicate header: '{0}'")]
    DuplicateHeader(String),
    /// A header line exceeds the configured maximum length.
    #[error("header line exceeds maximum allowed length")]
    HeaderTooLarge,
    /// The number of headers exceeds the configured maximum.
    #[error("number of headers exceeds maximum")]
    TooManyHeaders,
    /// The input ended before a blank line closed the header block.
    #[error("header block is not terminated by a blank line")]
    MissingHeaderTerminator,
    /// The body exceeds the configured maximum size.
    #[error("body exceeds maximum allowed size")]
    BodyTooLarge,
}

/// Errors raised while loading a [`ParserConfig`](crate::ParserConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
