//! Content-type driven body formatting.
//!
//! A [`FormatterRegistry`] holds an ordered list of rules, each pairing a
//! predicate over the response content type with a [`BodyFormatter`]. The
//! first matching rule wins; bodies that match nothing go to the fallback
//! formatter. New content types are supported by registering another rule.
//!
//! ```ignore
//! use courier_http::format::{FormatterRegistry, Passthrough};
//!
//! let mut registry = FormatterRegistry::default();
//! registry.register(|ct| ct.contains("text/csv"), Passthrough);
//! let pretty = registry.format("{\"a\":1}", "application/json; charset=utf-8");
//! ```

/// A text transform applied to a response body for display.
///
/// Implementations must be pure: the same input always yields the same output.
pub trait BodyFormatter: Send + Sync {
    fn format(&self, body: &str) -> String;
}

impl<T: BodyFormatter + ?Sized> BodyFormatter for Box<T> {
    fn format(&self, body: &str) -> String {
        self.as_ref().format(body)
    }
}

/// Returns the body untouched.
///
/// Used for HTML, XML and anything without a dedicated formatter.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl BodyFormatter for Passthrough {
    fn format(&self, body: &str) -> String {
        body.to_string()
    }
}

/// Streaming JSON pretty-printer.
///
/// Works character by character without parsing: structural characters
/// outside string literals get newlines and two-space indentation, and
/// insignificant whitespace outside strings is dropped. Malformed input is
/// not rejected; it is laid out by the same rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonPrettyPrinter;

impl JsonPrettyPrinter {
    const INDENT_WIDTH: usize = 2;

    fn push_indent(out: &mut String, level: usize) {
        out.push_str(&" ".repeat(level * Self::INDENT_WIDTH));
    }
}

impl BodyFormatter for JsonPrettyPrinter {
    fn format(&self, body: &str) -> String {
        let trimmed = body.trim();
        if !trimmed.starts_with(['{', '[']) {
            return body.to_string();
        }

        let mut out = String::with_capacity(trimmed.len() * 2);
        let mut indent_level: usize = 0;
        let mut in_string = false;
        let mut escape_next = false;

        for c in trimmed.chars() {
            if escape_next {
                out.push(c);
                escape_next = false;
                continue;
            }

            if c == '\\' && in_string {
                out.push(c);
                escape_next = true;
                continue;
            }

            if c == '"' {
                in_string = !in_string;
                out.push(c);
                continue;
            }

            if in_string {
                out.push(c);
                continue;
            }

            match c {
                '{' | '[' => {
                    out.push(c);
                    out.push('\n');
                    indent_level += 1;
                    Self::push_indent(&mut out, indent_level);
                }
                '}' | ']' => {
                    out.push('\n');
                    indent_level = indent_level.saturating_sub(1);
                    Self::push_indent(&mut out, indent_level);
                    out.push(c);
                }
                ',' => {
                    out.push(c);
                    out.push('\n');
                    Self::push_indent(&mut out, indent_level);
                }
                ':' => {
                    out.push(c);
                    out.push(' ');
                }
                c if c.is_whitespace() => {}
                c => out.push(c),
            }
        }

        out
    }
}

type ContentTypePredicate = Box<dyn Fn(&str) -> bool + Send + Sync>;

struct Rule {
    matches: ContentTypePredicate,
    formatter: Box<dyn BodyFormatter>,
}

/// Ordered content-type → formatter dispatch table.
pub struct FormatterRegistry {
    rules: Vec<Rule>,
    fallback: Box<dyn BodyFormatter>,
}

impl FormatterRegistry {
    /// An empty registry that passes every body through.
    pub fn empty() -> Self {
        Self {
            rules: Vec::new(),
            fallback: Box::new(Passthrough),
        }
    }

    /// Append a rule. Rules are tried in registration order.
    pub fn register<P, F>(&mut self, matches: P, formatter: F) -> &mut Self
    where
        P: Fn(&str) -> bool + Send + Sync + 'static,
        F: BodyFormatter + 'static,
    {
        self.rules.push(Rule {
            matches: Box::new(matches),
            formatter: Box::new(formatter),
        });
        self
    }

    /// Replace the formatter used when no rule matches.
    pub fn with_fallback(mut self, formatter: impl BodyFormatter + 'static) -> Self {
        self.fallback = Box::new(formatter);
        self
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Pick the formatter for a content type.
    pub fn resolve(&self, content_type: &str) -> &dyn BodyFormatter {
        self.rules
            .iter()
            .find(|rule| (rule.matches)(content_type))
            .map(|rule| rule.formatter.as_ref())
            .unwrap_or(self.fallback.as_ref())
    }

    /// Format a body. Blank bodies always format to the empty string.
    pub fn format(&self, body: &str, content_type: &str) -> String {
        if body.trim().is_empty() {
            return String::new();
        }
        self.resolve(content_type).format(body)
    }
}

impl Default for FormatterRegistry {
    /// JSON is pretty-printed; HTML and XML have reserved pass-through slots.
    fn default() -> Self {
        let mut registry = Self::empty();
        registry
            .register(|ct| ct.contains("application/json"), JsonPrettyPrinter)
            .register(|ct| ct.contains("text/html"), Passthrough)
            .register(
                |ct| ct.contains("application/xml") || ct.contains("text/xml"),
                Passthrough,
            );
        registry
    }
}

/// Pretty-print a JSON body with the default printer.
pub fn format_json(body: &str) -> String {
    JsonPrettyPrinter.format(body)
}
