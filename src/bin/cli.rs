use std::io::{IsTerminal, Read};
use std::path::PathBuf;
use std::process;

use clap::{CommandFactory, Parser as ClapParser};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use rawframe::{
    ParserConfig, format_debug, format_headers_only, format_json, parse_request,
    parse_request_strict,
};

/// rawframe CLI: decompose a raw HTTP/1.x request.
///
/// Reads a raw request from a file, --raw string, or stdin and outputs
/// a structured representation in the chosen format.
///
/// Escape sequences (\r, \n, \t, \\) in the --raw value are interpreted so
/// you can pass a full request as a single shell argument.
#[derive(ClapParser)]
#[command(name = "rawframe-cli", version, about, long_about = None)]
struct Cli {
    /// Path to a file containing a raw HTTP request.
    /// Reads from stdin when neither FILE nor --raw is given.
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Raw request string (escape sequences \r \n \t \\ are expanded).
    #[arg(long)]
    raw: Option<String>,

    /// Output format.
    #[arg(short, long, default_value = "json", value_enum)]
    format: OutputFormat,

    /// Pretty-print JSON output (ignored for other formats).
    #[arg(short, long)]
    pretty: bool,

    /// Reject malformed requests instead of decomposing them best-effort.
    #[arg(short, long)]
    strict: bool,

    /// TOML file with strict-mode limits (requires --strict).
    #[arg(long, value_name = "PATH", requires = "strict")]
    config: Option<PathBuf>,

    /// Maximum number of headers allowed (requires --strict).
    #[arg(long, requires = "strict")]
    max_headers: Option<usize>,

    /// Maximum allowed body size in bytes (requires --strict).
    #[arg(long, requires = "strict")]
    max_body_size: Option<usize>,

    /// Log parser diagnostics to stderr (overridden by RUST_LOG).
    #[arg(short, long)]
    verbose: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum OutputFormat {
    /// JSON output
    Json,
    /// Human-readable debug output
    Debug,
    /// Request-line + headers only
    Headers,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "rawframe=debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // When no input source is provided and stdin is a terminal (not piped),
    // show help instead of blocking.
    if cli.file.is_none() && cli.raw.is_none() && std::io::stdin().is_terminal() {
        Cli::command().print_help().ok();
        println!();
        process::exit(0);
    }

    let data = match read_input(&cli) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error reading input: {e}");
            process::exit(1);
        }
    };

    let request = if cli.strict {
        let config = match build_config(&cli) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Config error: {e}");
                process::exit(1);
            }
        };
        match parse_request_strict(&data, &config) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("Parse error: {e}");
                process::exit(2);
            }
        }
    } else {
        parse_request(&data)
    };

    let output = match cli.format {
        OutputFormat::Json => format_json(&request, cli.pretty),
        OutputFormat::Debug => format_debug(&request),
        OutputFormat::Headers => format_headers_only(&request),
    };

    print!("{output}");
}

/// Config file (if any) with command-line overrides applied on top.
fn build_config(cli: &Cli) -> Result<ParserConfig, rawframe::ConfigError> {
    let mut config = match &cli.config {
        Some(path) => ParserConfig::load(path)?,
        None => ParserConfig::default(),
    };
    if let Some(max) = cli.max_headers {
        config.max_headers_count = max;
    }
    if let Some(max) = cli.max_body_size {
        config.max_body_size = max;
    }
    config.validate()?;
    Ok(config)
}

/// Read the raw request from --raw, a file, or stdin.
///
/// Non-UTF-8 bytes are replaced with U+FFFD.
fn read_input(cli: &Cli) -> Result<String, std::io::Error> {
    if let Some(raw) = &cli.raw {
        return Ok(unescape(raw));
    }
    let bytes = match &cli.file {
        Some(path) => std::fs::read(path)?,
        None => {
            let mut buf = Vec::new();
            std::io::stdin().read_to_end(&mut buf)?;
            buf
        }
    };
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Expand C-style escape sequences (`\r`, `\n`, `\t`, `\\`) in a string.
///
/// Any other `\X` sequence is kept as-is (both the backslash and `X`).
fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('r') => out.push('\r'),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unescape_expands_crlf() {
        assert_eq!(unescape(r"GET / HTTP/1.1\r\n\r\n"), "GET / HTTP/1.1\r\n\r\n");
    }

    #[test]
    fn unescape_keeps_unknown_sequences() {
        assert_eq!(unescape(r"a\qb\"), "a\\qb\\");
    }

    #[test]
    fn cli_overrides_apply_on_top_of_defaults() {
        let cli = Cli::parse_from(["rawframe-cli", "--strict", "--max-headers", "3", "--raw", "x"]);
        let config = build_config(&cli).unwrap();
        assert_eq!(config.max_headers_count, 3);
        assert_eq!(config.max_body_size, ParserConfig::default().max_body_size);
    }

    #[test]
    fn zero_header_override_rejected() {
        let cli = Cli::parse_from(["rawframe-cli", "-s", "--max-headers", "0", "--raw", "x"]);
        assert!(build_config(&cli).is_err());
    }

    #[test]
    fn limit_flags_require_strict() {
        for args in [
            ["--config", "limits.toml"],
            ["--max-headers", "3"],
            ["--max-body-size", "10"],
        ] {
            let argv = ["rawframe-cli", "--raw", "x"].into_iter().chain(args);
            let err = Cli::try_parse_from(argv).err().expect("flag accepted without --strict");
            assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
        }
    }

    #[test]
    fn missing_config_file_fails_in_strict_mode() {
        let cli = Cli::parse_from([
            "rawframe-cli",
            "--strict",
            "--config",
            "/nonexistent/rawframe.toml",
            "--raw",
            "x",
        ]);
        assert!(matches!(build_config(&cli), Err(rawframe::ConfigError::Io(_))));
    }
}
