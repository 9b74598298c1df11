use crate::format::FormatterRegistry;
use crate::types::{HeaderMultiMap, ResultValue, DEFAULT_CONTENT_TYPE};

/// Turns a raw HTTP response into a [`ResultValue`].
#[derive(Default)]
pub struct ResponseProcessor {
    formatters: FormatterRegistry,
}

impl ResponseProcessor {
    pub fn new(formatters: FormatterRegistry) -> Self {
        Self { formatters }
    }

    pub fn formatters(&self) -> &FormatterRegistry {
        &self.formatters
    }

    /// Build the result for a response that arrived.
    ///
    /// The body size is measured on the raw body; the stored body is the
    /// formatted text.
    pub fn process(
        &self,
        status: u16,
        headers: HeaderMultiMap,
        body: Option<&str>,
        url: &str,
    ) -> ResultValue {
        let content_type = content_type(&headers);

        let (formatted, body_size_bytes) = match body {
            Some(raw) => (
                self.formatters.format(raw, &content_type),
                raw.len() as u64,
            ),
            None => (String::new(), 0),
        };

        ResultValue {
            status_code: i32::from(status),
            url: url.to_string(),
            headers,
            content_type,
            body: formatted,
            body_size_bytes,
            captured_at_millis: chrono::Utc::now().timestamp_millis(),
            is_error: false,
            error_message: None,
        }
    }
}

/// First `content-type` value, matched case-insensitively on the header name.
pub fn content_type(headers: &HeaderMultiMap) -> String {
    headers
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("content-type"))
        .and_then(|(_, values)| values.first())
        .cloned()
        .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string())
}
