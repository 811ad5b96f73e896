//! Output side of mock expansion.
//!
//! [`expand_to_string`] runs the generator over a file and splices each
//! expansion back into the source. Layout of the generated part goes through
//! a small document IR ([`ir`]) and printer ([`printer`]); the rest of the
//! file is left untouched.

pub mod emit;
pub mod ir;
pub mod printer;

use stubby_gen::{expand_source, Diagnostic, MockConfig};
use tracing::debug;

pub use printer::FormatConfig;

/// Result of expanding one file.
#[derive(Debug)]
pub struct Expanded {
    /// The source with every successful expansion applied.
    pub text: String,
    /// Names of the types that were expanded, in source order.
    pub types: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Expanded {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Expand every mocked type in `source`.
///
/// # Example
///
/// ```
/// use stubby_fmt::{expand_to_string, FormatConfig};
/// use stubby_gen::MockConfig;
///
/// let out = expand_to_string(
///     "@Mock class Bell {\n    func ring() {}\n}\n",
///     &MockConfig::default(),
///     &FormatConfig::default(),
/// );
/// assert!(out.text.contains("let mock = BellMock()"));
/// assert!(out.text.contains("func ring() { ringCalls.record() }"));
/// ```
pub fn expand_to_string(source: &str, mock: &MockConfig, format: &FormatConfig) -> Expanded {
    let result = expand_source(source, mock);
    let mut splices = Vec::new();
    let mut types = Vec::with_capacity(result.mocks.len());
    for (def, expansion) in &result.mocks {
        splices.extend(emit::splices_for(source, def, expansion, mock, format));
        types.push(expansion.type_name.clone());
    }
    debug!(types = types.len(), splices = splices.len(), "expanded source");
    Expanded {
        text: emit::apply_splices(source, splices),
        types,
        diagnostics: result.diagnostics,
    }
}

/// Collapse every run of whitespace to one space and trim the ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
