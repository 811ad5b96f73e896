//! Mock companion generation.
//!
//! The pipeline for one file is [`expand_source`]: parse, find types
//! carrying `@Mock`, lower each to a [`decl::TypeDecl`], and run
//! [`generate`] to get a [`expansion::MockExpansion`]. `generate` is pure and
//! can be driven directly from hand-built declarations.

pub mod config;
pub mod decl;
pub mod diagnostics;
pub mod error;
pub mod expand;
pub mod expansion;
pub mod generate;
pub mod lower;

pub use config::MockConfig;
pub use diagnostics::{render_diagnostic, Diagnostic, DiagnosticOptions, Severity};
pub use error::{GenError, GenErrorKind};
pub use expand::{expand_source, SourceExpansion};
pub use generate::generate;
pub use lower::lower_type_def;
