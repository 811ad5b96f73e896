//! Ariadne-based rendering for parse and generator errors.
//!
//! Every problem the expansion pipeline finds becomes a [`Diagnostic`]: a
//! code, a message and a primary span, optionally a related span and a help
//! line. Diagnostics render either as an ariadne report or as one JSON object
//! per line.

use std::ops::Range;

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use serde::Serialize;
use stubby_common::span::Span;
use stubby_parser::ParseError;

use crate::error::GenError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub code: &'static str,
    pub severity: Severity,
    pub message: String,
    pub span: Span,
    /// Text attached to the primary span.
    pub label: String,
    pub related: Option<(String, Span)>,
    pub help: Option<String>,
}

impl Diagnostic {
    pub fn from_parse_error(error: &ParseError) -> Self {
        Self {
            code: "P0001",
            severity: Severity::Error,
            message: format!("parse error: {}", error.message),
            span: error.span,
            label: error.message.clone(),
            related: error.related.clone(),
            help: None,
        }
    }

    pub fn from_gen_error(error: &GenError) -> Self {
        Self {
            code: error.kind.code(),
            severity: Severity::Error,
            message: format!("cannot mock {}", error),
            span: error.span,
            label: error.kind.to_string(),
            related: None,
            help: error.kind.help(),
        }
    }

    /// The mock attribute on something that is not a class or struct.
    pub fn unsupported_target(attribute: &str, keyword: &str, span: Span) -> Self {
        Self {
            code: "W0001",
            severity: Severity::Warning,
            message: format!("`@{attribute}` on `{keyword}` is ignored"),
            span,
            label: "only classes and structs can be mocked".to_string(),
            related: None,
            help: None,
        }
    }

    /// The mock attribute on a type declared inside a body the parser keeps
    /// opaque (an enum, extension, protocol or function body).
    pub fn unreachable_target(attribute: &str, container: &str, span: Span) -> Self {
        Self {
            code: "W0002",
            severity: Severity::Warning,
            message: format!("`@{attribute}` inside `{container}` is ignored"),
            span,
            label: "this type is not expanded".to_string(),
            related: None,
            help: Some(
                "mocked types must be top-level or nested in a class or struct".to_string(),
            ),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// How diagnostics are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiagnosticOptions {
    pub color: bool,
    pub json: bool,
}

impl DiagnosticOptions {
    pub fn colorless() -> Self {
        Self {
            color: false,
            json: false,
        }
    }
}

#[derive(Serialize)]
struct JsonSpan<'a> {
    start: usize,
    end: usize,
    label: &'a str,
}

#[derive(Serialize)]
struct JsonDiagnostic<'a> {
    code: &'a str,
    severity: Severity,
    message: &'a str,
    file: &'a str,
    spans: Vec<JsonSpan<'a>>,
    fix: Option<&'a str>,
}

/// Render one diagnostic. JSON output is a single line without a trailing
/// newline; report output ends with one.
pub fn render_diagnostic(
    diagnostic: &Diagnostic,
    source: &str,
    file_name: &str,
    options: &DiagnosticOptions,
) -> String {
    if options.json {
        render_json(diagnostic, source, file_name)
    } else {
        render_report(diagnostic, source, options.color)
    }
}

fn label_range(span: Span, source: &str) -> Range<usize> {
    span.to_label_range(source.len())
}

fn render_json(diagnostic: &Diagnostic, source: &str, file_name: &str) -> String {
    let mut spans = vec![json_span(diagnostic.span, &diagnostic.label, source)];
    if let Some((label, span)) = &diagnostic.related {
        spans.push(json_span(*span, label, source));
    }
    let json = JsonDiagnostic {
        code: diagnostic.code,
        severity: diagnostic.severity,
        message: &diagnostic.message,
        file: file_name,
        spans,
        fix: diagnostic.help.as_deref(),
    };
    serde_json::to_string(&json).unwrap_or_else(|_| diagnostic.message.clone())
}

fn json_span<'a>(span: Span, label: &'a str, source: &str) -> JsonSpan<'a> {
    let range = label_range(span, source);
    JsonSpan {
        start: range.start,
        end: range.end,
        label,
    }
}

fn render_report(diagnostic: &Diagnostic, source: &str, color: bool) -> String {
    let config = Config::default().with_color(color);
    let kind = match diagnostic.severity {
        Severity::Error => ReportKind::Error,
        Severity::Warning => ReportKind::Warning,
    };
    let primary = label_range(diagnostic.span, source);
    let label_color = match diagnostic.severity {
        Severity::Error => Color::Red,
        Severity::Warning => Color::Yellow,
    };

    let mut builder = Report::build(kind, primary.clone())
        .with_code(diagnostic.code)
        .with_message(&diagnostic.message)
        .with_config(config)
        .with_label(
            Label::new(primary)
                .with_message(&diagnostic.label)
                .with_color(label_color),
        );
    if let Some((message, span)) = &diagnostic.related {
        builder.add_label(
            Label::new(label_range(*span, source))
                .with_message(message)
                .with_color(Color::Blue),
        );
    }
    if let Some(help) = &diagnostic.help {
        builder.set_help(help);
    }

    let mut buf = Vec::new();
    if builder.finish().write(Source::from(source), &mut buf).is_err() {
        return format!("error[{}]: {}\n", diagnostic.code, diagnostic.message);
    }
    String::from_utf8_lossy(&buf).into_owned()
}
