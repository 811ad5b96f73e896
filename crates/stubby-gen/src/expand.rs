//! Whole-file expansion: find every mocked type and generate its companion.

use stubby_common::span::Span;
use stubby_parser::ast::item::{Attribute, TypeDef};
use stubby_parser::ast::{first_significant_token, AstNode};
use stubby_parser::{Parse, SyntaxKind, SyntaxNode, SyntaxToken};
use tracing::{debug, warn};

use crate::config::MockConfig;
use crate::diagnostics::Diagnostic;
use crate::expansion::MockExpansion;
use crate::generate::generate;
use crate::lower::lower_type_def;

/// Everything found in one source file.
pub struct SourceExpansion {
    pub parse: Parse,
    /// Each mocked type with its expansion, in source order.
    pub mocks: Vec<(TypeDef, MockExpansion)>,
    pub diagnostics: Vec<Diagnostic>,
}

impl SourceExpansion {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Parse `source` and expand every type carrying the mock attribute.
///
/// A file that fails to parse yields only its parse diagnostics. A type
/// whose expansion fails is left out of `mocks`; the others still expand.
pub fn expand_source(source: &str, config: &MockConfig) -> SourceExpansion {
    let parse = stubby_parser::parse(source);
    let mut diagnostics: Vec<Diagnostic> = parse
        .errors()
        .iter()
        .map(Diagnostic::from_parse_error)
        .collect();
    let mut mocks = Vec::new();
    if !parse.ok() {
        return SourceExpansion {
            parse,
            mocks,
            diagnostics,
        };
    }

    let tree = parse.tree();
    for def in tree.all_type_defs() {
        if !def.has_attribute(&config.attribute) {
            continue;
        }
        let Some(decl) = lower_type_def(&def) else {
            continue;
        };
        let companion = config.companion_name(&decl.name);
        if def.declares_type(&companion) {
            warn!(
                r#type = %decl.name,
                %companion,
                "companion already present, skipping"
            );
            continue;
        }
        match generate(&decl, config) {
            Ok(expansion) => mocks.push((def, expansion)),
            Err(error) => {
                debug!(r#type = %decl.name, %error, "expansion failed");
                diagnostics.push(Diagnostic::from_gen_error(&error));
            }
        }
    }

    for node in tree.syntax().descendants() {
        match node.kind() {
            SyntaxKind::OTHER_ITEM | SyntaxKind::NESTED_TYPE => {
                let Some(attribute) = node
                    .children()
                    .filter_map(Attribute::cast)
                    .find(|a| a.name().as_deref() == Some(config.attribute.as_str()))
                else {
                    continue;
                };
                diagnostics.push(Diagnostic::unsupported_target(
                    &config.attribute,
                    &keyword_of(&node),
                    attribute.span(),
                ));
            }
            SyntaxKind::BLOCK => {
                for span in attributes_in_block(&node, &config.attribute) {
                    let container = node
                        .parent()
                        .map(|parent| keyword_of(&parent))
                        .unwrap_or_default();
                    diagnostics.push(Diagnostic::unreachable_target(
                        &config.attribute,
                        &container,
                        span,
                    ));
                }
            }
            _ => {}
        }
    }
    diagnostics.sort_by_key(|d| d.span.start);

    SourceExpansion {
        parse,
        mocks,
        diagnostics,
    }
}

/// The keyword introducing a declaration node (`enum`, `func`, ...).
fn keyword_of(node: &SyntaxNode) -> String {
    first_significant_token(node)
        .map(|t| t.text().to_string())
        .unwrap_or_default()
}

/// Spans of `@<attribute>` inside an opaque block. Block bodies are flat
/// token runs, so the name is the token right after `@`.
fn attributes_in_block(block: &SyntaxNode, attribute: &str) -> Vec<Span> {
    let tokens: Vec<SyntaxToken> = block
        .children_with_tokens()
        .filter_map(|it| it.into_token())
        .collect();
    tokens
        .windows(2)
        .filter(|pair| {
            pair[0].kind() == SyntaxKind::AT
                && pair[1].kind() == SyntaxKind::IDENT
                && pair[1].text() == attribute
        })
        .map(|pair| {
            Span::new(
                pair[0].text_range().start().into(),
                pair[1].text_range().end().into(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GenErrorKind;

    #[test]
    fn only_marked_types_expand() {
        let result = expand_source(
            "@Mock class A { func f() {} }\nclass B { func g() {} }\n@Mock struct C {}",
            &MockConfig::default(),
        );
        assert!(!result.has_errors());
        let names: Vec<_> = result.mocks.iter().map(|(_, e)| e.type_name.as_str()).collect();
        assert_eq!(names, ["A", "C"]);
    }

    #[test]
    fn parse_errors_stop_expansion() {
        let result = expand_source("@Mock class A { var }", &MockConfig::default());
        assert!(result.has_errors());
        assert!(result.mocks.is_empty());
        assert_eq!(result.diagnostics[0].code, "P0001");
    }

    #[test]
    fn failing_type_does_not_block_others() {
        let result = expand_source(
            "@Mock class A { var x = 1 }\n@Mock class B { func f() {} }",
            &MockConfig::default(),
        );
        assert!(result.has_errors());
        assert_eq!(result.mocks.len(), 1);
        assert_eq!(result.mocks[0].1.type_name, "B");
        assert_eq!(
            result.diagnostics[0].code,
            GenErrorKind::MissingPropertyType.code()
        );
    }

    #[test]
    fn existing_companion_is_skipped() {
        let result = expand_source(
            "@Mock class A {\n  func f() {}\n  class AMock {}\n}",
            &MockConfig::default(),
        );
        assert!(result.mocks.is_empty());
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn attribute_on_other_items_warns() {
        let result = expand_source("@Mock enum E { case a }", &MockConfig::default());
        assert!(!result.has_errors());
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].code, "W0001");
        assert_eq!(result.diagnostics[0].message, "`@Mock` on `enum` is ignored");
    }

    #[test]
    fn custom_attribute_name() {
        let config = MockConfig {
            attribute: "Fake".into(),
            ..MockConfig::default()
        };
        let result = expand_source("@Mock class A {}\n@Fake class B {}", &config);
        assert_eq!(result.mocks.len(), 1);
        assert_eq!(result.mocks[0].1.companion.name, "BMock");
    }

    #[test]
    fn nested_types_expand_outer_first() {
        let result = expand_source(
            "@Mock class Outer {\n  func f() {}\n  @Mock struct Inner { func g() {} }\n  class Plain { @Mock class Deep {} }\n}",
            &MockConfig::default(),
        );
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
        let names: Vec<_> = result.mocks.iter().map(|(_, e)| e.type_name.as_str()).collect();
        assert_eq!(names, ["Outer", "Inner", "Deep"]);
    }

    #[test]
    fn attribute_in_opaque_body_warns() {
        let result = expand_source(
            "enum Namespace {\n  @Mock class A { func f() {} }\n}",
            &MockConfig::default(),
        );
        assert!(result.mocks.is_empty());
        assert!(!result.has_errors());
        assert_eq!(result.diagnostics.len(), 1);
        let warning = &result.diagnostics[0];
        assert_eq!(warning.code, "W0002");
        assert_eq!(warning.message, "`@Mock` inside `enum` is ignored");
        assert_eq!((warning.span.start, warning.span.end), (19, 24));
    }

    #[test]
    fn attribute_on_nested_enum_warns() {
        let result = expand_source("class A {\n  @Mock enum K { case a }\n}", &MockConfig::default());
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].code, "W0001");
    }

    #[test]
    fn generic_methods_are_rejected() {
        let result = expand_source(
            "@Mock class A { func g<T>(v: T) {} }",
            &MockConfig::default(),
        );
        assert!(result.has_errors());
        assert!(result.mocks.is_empty());
        assert_eq!(result.diagnostics[0].code, "G0006");
    }
}
