//! Rowan-based concrete syntax tree types.
//!
//! Defines the `StubbyLanguage` marker type that connects [`SyntaxKind`] to
//! rowan's generic tree infrastructure, plus type aliases for convenience.

use crate::syntax_kind::SyntaxKind;

/// Marker type for the declaration language in rowan's generic tree system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StubbyLanguage {}

impl rowan::Language for StubbyLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 <= SyntaxKind::LAST as u16, "invalid raw syntax kind {}", raw.0);
        // Safety: SyntaxKind is #[repr(u16)] with contiguous discriminants
        // starting at 0, and the range was checked above.
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        rowan::SyntaxKind(kind as u16)
    }
}

/// A CST node (interior node with children).
pub type SyntaxNode = rowan::SyntaxNode<StubbyLanguage>;

/// A CST token (leaf node with text).
pub type SyntaxToken = rowan::SyntaxToken<StubbyLanguage>;

/// Either a node or a token in the CST.
pub type SyntaxElement = rowan::SyntaxElement<StubbyLanguage>;
