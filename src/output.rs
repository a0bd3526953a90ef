use crate::types::ParsedRequest;

/// Serialize a [`ParsedRequest`] to a JSON string.
///
/// Headers become an object in their original order. When `pretty` is
/// `true` the output is indented for readability. Serialization errors are
/// rendered as an `{"error": ...}` object.
pub fn format_json(request: &ParsedRequest, pretty: bool) -> String {
    let result = if pretty {
        serde_json::to_string_pretty(request)
    } else {
        serde_json::to_string(request)
    };
    result.unwrap_or_else(|e| json_error(&e))
}

fn json_error(e: &serde_json::Error) -> String {
    serde_json::json!({ "error": e.to_string() }).to_string()
}

/// Render a [`ParsedRequest`] in a human-readable debug format.
pub fn format_debug(request: &ParsedRequest) -> String {
    let mut out = String::with_capacity(256);

    out.push_str("=== Parsed Request ===\n");
    out.push_str(&format!("Method:  {}\n", field(&request.method)));
    out.push_str(&format!("URL:     {}\n", field(&request.url)));
    out.push_str(&format!("Version: {}\n", field(&request.version)));

    out.push_str(&format!("\n--- Headers ({}) ---\n", request.headers.len()));
    for (name, value) in request.headers.iter() {
        match value {
            Some(value) => out.push_str(&format!("  {name}: {value}\n")),
            None => out.push_str(&format!("  {name} (no value)\n")),
        }
    }

    if request.has_body() {
        out.push_str(&format!("\n--- Body ({} bytes) ---\n", request.body.len()));
        out.push_str(&request.body);
        out.push('\n');
    } else {
        out.push_str("\n--- No Body ---\n");
    }

    out.push_str("======================\n");
    out
}

/// Render only the request line and headers (no body).
///
/// Absent request-line fields render as empty strings; a header without a
/// value renders as its bare name.
pub fn format_headers_only(request: &ParsedRequest) -> String {
    let mut out = String::with_capacity(64 + request.headers.len() * 40);

    out.push_str(&format!(
        "{} {} {}\n",
        field(&request.method),
        field(&request.url),
        field(&request.version)
    ));

    for (name, value) in request.headers.iter() {
        match value {
            Some(value) => out.push_str(&format!("{name}: {value}\n")),
            None => out.push_str(&format!("{name}\n")),
        }
    }

    out
}

fn field(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_error_escapes_message() {
        let err = serde_json::from_str::<serde_json::Value>("\"unterminated").unwrap_err();
        let rendered = json_error(&err);
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["error"], err.to_string());
    }
}
