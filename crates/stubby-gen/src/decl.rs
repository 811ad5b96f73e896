//! Structured input to the generator.
//!
//! These types are what the front end hands over: a type declaration with
//! its members already split into properties, methods and everything else,
//! and every type reference already rendered to canonical text. Nothing here
//! refers back to the syntax tree, so the generator can be driven from any
//! source that can fill them in.

use stubby_common::effect::EffectKind;
use stubby_common::span::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Class,
    Struct,
}

/// A type marked for mocking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    pub name: String,
    pub kind: TypeKind,
    /// In declaration order.
    pub members: Vec<Member>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Member {
    Property(PropertyDecl),
    Method(MethodDecl),
    Other(OpaqueMember),
}

impl Member {
    pub fn span(&self) -> Span {
        match self {
            Member::Property(p) => p.span,
            Member::Method(m) => m.span,
            Member::Other(o) => o.span,
        }
    }
}

/// `var name: Type`. The type is `None` when it was left to inference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDecl {
    pub name: String,
    pub ty: Option<String>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    pub name: String,
    /// Names of the method's own type parameters (`func f<T>`).
    pub generic_params: Vec<String>,
    pub params: Vec<ParamDecl>,
    /// `None` means the method returns nothing.
    pub return_type: Option<String>,
    pub effects: Effects,
    /// Attribute text as written, e.g. `@discardableResult`.
    pub attributes: Vec<String>,
    pub modifiers: Vec<String>,
    /// The signature from `func` up to the body, canonically spaced.
    pub signature_text: String,
    pub span: Span,
}

/// One parameter. `label` is the call-site name, `name` the binding used
/// inside the body. A parameter written with a single name has both set to
/// that name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDecl {
    pub label: Option<String>,
    pub name: Option<String>,
    pub ty: Option<String>,
    pub span: Span,
}

impl ParamDecl {
    /// The name the delegating body refers to the argument by.
    pub fn binding(&self) -> Option<&str> {
        self.name.as_deref().or(self.label.as_deref())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Effects {
    pub is_async: bool,
    /// `throws`, typed `throws(E)` or `rethrows`.
    pub is_failable: bool,
}

impl Effects {
    pub fn kind(self) -> EffectKind {
        EffectKind::from_flags(self.is_async, self.is_failable)
    }
}

/// Members the generator passes over: initializers, nested types and
/// anything it does not model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpaqueMember {
    pub kind: OpaqueKind,
    pub name: Option<String>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpaqueKind {
    Initializer,
    NestedType,
    Other,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binding_prefers_internal_name() {
        let param = ParamDecl {
            label: Some("from".into()),
            name: Some("url".into()),
            ty: Some("URL".into()),
            span: Span::new(0, 0),
        };
        assert_eq!(param.binding(), Some("url"));

        let label_only = ParamDecl {
            name: None,
            ..param
        };
        assert_eq!(label_only.binding(), Some("from"));
    }

    #[test]
    fn effects_select_kind() {
        let effects = Effects {
            is_async: true,
            is_failable: true,
        };
        assert_eq!(effects.kind(), EffectKind::AsyncFailable);
        assert_eq!(Effects::default().kind(), EffectKind::Plain);
    }
}
