//! # rawframe
//!
//! Decomposes a raw textual HTTP/1.x request into its method, target,
//! version, header mapping and body, without interpreting any of them.
//!
//! The default entry point, [`parse_request`], never fails: malformed input
//! yields absent or partial fields instead of an error. Use
//! [`parse_request_strict`] to reject input that would decompose
//! incorrectly.
//!
//! ## Quick start
//!
//! ```rust
//! use rawframe::parse_request;
//!
//! let raw = "POST /submit HTTP/1.1\r\nHost: example.com\r\n\r\nname=John";
//! let request = parse_request(raw);
//! assert_eq!(request.method.as_deref(), Some("POST"));
//! assert_eq!(request.url.as_deref(), Some("/submit"));
//! assert_eq!(request.header_value("host"), Some("example.com"));
//! assert_eq!(request.body, "name=John");
//! assert_eq!(request.raw, raw);
//! ```
//!
//! ## Strict parsing
//!
//! ```rust
//! use rawframe::{parse_request_strict, ParseError, ParserConfig};
//!
//! let config = ParserConfig::default();
//! let err = parse_request_strict("GET / HTTP/1.1\r\nA: 1\r\nA: 2\r\n\r\n", &config)
//!     .unwrap_err();
//! assert_eq!(err, ParseError::DuplicateHeader("A".into()));
//! ```

mod config;
mod error;
mod output;
mod parser;
mod types;

// Re-export public API.
pub use config::ParserConfig;
pub use error::{ConfigError, ParseError};
pub use output::{format_debug, format_headers_only, format_json};
pub use parser::{HEADER_DELIMITER, LINE_SEPARATOR, parse_request, parse_request_strict};
pub use types::{Headers, ParsedRequest};
