//! Generator errors.

use stubby_common::span::Span;
use thiserror::Error;

/// A member the generator could not build a companion field for.
///
/// No partial companion is produced for a type that has one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("member `{member}`: {kind}")]
pub struct GenError {
    /// The member's name, or `<unnamed>`.
    pub member: String,
    pub kind: GenErrorKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenErrorKind {
    #[error("property has no type annotation")]
    MissingPropertyType,
    #[error("parameter {index} has no type")]
    MissingParamType { index: usize },
    #[error("parameter {index} has no usable name")]
    MissingParamName { index: usize },
    #[error("member has no name")]
    MissingMemberName,
    #[error("companion field `{field}` is already generated for `{first}`")]
    DuplicateField { field: String, first: String },
    #[error("generic methods cannot be recorded (type parameters: {})", .params.join(", "))]
    GenericMethod { params: Vec<String> },
}

impl GenErrorKind {
    /// Stable diagnostic code.
    pub fn code(&self) -> &'static str {
        match self {
            GenErrorKind::MissingPropertyType => "G0001",
            GenErrorKind::MissingParamType { .. } => "G0002",
            GenErrorKind::MissingParamName { .. } => "G0003",
            GenErrorKind::MissingMemberName => "G0004",
            GenErrorKind::DuplicateField { .. } => "G0005",
            GenErrorKind::GenericMethod { .. } => "G0006",
        }
    }

    /// A suggestion shown under the diagnostic, where one exists.
    pub fn help(&self) -> Option<String> {
        match self {
            GenErrorKind::MissingPropertyType => {
                Some("write the type explicitly: `var name: Type`".to_string())
            }
            GenErrorKind::MissingParamName { .. } => {
                Some("give the parameter a binding name, e.g. `_ value: Int`".to_string())
            }
            GenErrorKind::DuplicateField { .. } => Some(
                "overloaded or clashing members need distinct names to be mocked".to_string(),
            ),
            GenErrorKind::GenericMethod { .. } => Some(
                "the companion has no type parameters to store the arguments with; \
                 mock a non-generic wrapper instead"
                    .to_string(),
            ),
            _ => None,
        }
    }
}

impl GenError {
    pub fn new(member: impl Into<String>, kind: GenErrorKind, span: Span) -> Self {
        Self {
            member: member.into(),
            kind,
            span,
        }
    }
}
