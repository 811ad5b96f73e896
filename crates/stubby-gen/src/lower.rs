//! AST to generator input.
//!
//! Lowering copies names and renders type references to canonical text. It
//! never fills in a missing piece: an absent name or type stays absent and
//! `generate` reports it against the member.

use stubby_parser::ast::item::{
    FuncDecl, Member as AstMember, Param, PropertyDecl as AstProperty, TypeDef, TypeDefKind,
};
use stubby_parser::ast::AstNode;
use stubby_common::span::Span;
use tracing::trace;

use crate::decl::{
    Effects, Member, MethodDecl, OpaqueKind, OpaqueMember, ParamDecl, PropertyDecl, TypeDecl,
    TypeKind,
};

/// Modifiers that make a member belong to the type rather than an instance.
/// Those members have no per-instance recorder to forward to.
const TYPE_LEVEL_MODIFIERS: &[&str] = &["static", "class"];

/// Lower a parsed type definition. `None` when the definition is too broken
/// to name (no keyword or no name), which only happens after a parse error.
pub fn lower_type_def(def: &TypeDef) -> Option<TypeDecl> {
    let kind = match def.kind()? {
        TypeDefKind::Class => TypeKind::Class,
        TypeDefKind::Struct => TypeKind::Struct,
    };
    let name = def.name()?.text();
    let members = def.members().iter().map(lower_member).collect();
    Some(TypeDecl {
        name,
        kind,
        members,
        span: def.span(),
    })
}

fn lower_member(member: &AstMember) -> Member {
    match member {
        AstMember::Property(prop) if !is_type_level(prop.modifiers().map(|m| m.text())) => {
            Member::Property(lower_property(prop))
        }
        AstMember::Func(func) if !is_type_level(func.modifiers().map(|m| m.text())) => {
            Member::Method(lower_func(func))
        }
        AstMember::Property(prop) => {
            opaque(OpaqueKind::Other, prop.name().map(|n| n.text()), prop.span())
        }
        AstMember::Func(func) => {
            opaque(OpaqueKind::Other, func.name().map(|n| n.text()), func.span())
        }
        AstMember::Init(init) => opaque(OpaqueKind::Initializer, None, init.span()),
        AstMember::TypeDef(def) => {
            opaque(OpaqueKind::NestedType, def.name().map(|n| n.text()), def.span())
        }
        AstMember::NestedType(nested) => {
            opaque(OpaqueKind::NestedType, nested.name().map(|n| n.text()), nested.span())
        }
        AstMember::Other(other) => opaque(OpaqueKind::Other, None, other.span()),
    }
}

fn is_type_level(mut modifiers: impl Iterator<Item = String>) -> bool {
    modifiers.any(|m| TYPE_LEVEL_MODIFIERS.contains(&m.as_str()))
}

fn opaque(kind: OpaqueKind, name: Option<String>, span: Span) -> Member {
    trace!(?kind, ?name, "passing member through");
    Member::Other(OpaqueMember { kind, name, span })
}

fn lower_property(prop: &AstProperty) -> PropertyDecl {
    PropertyDecl {
        name: prop.name().map(|n| n.text()).unwrap_or_default(),
        ty: prop
            .type_annotation()
            .and_then(|ann| ann.ty())
            .map(|ty| ty.text()),
        span: prop.span(),
    }
}

fn lower_func(func: &FuncDecl) -> MethodDecl {
    let params = func
        .param_list()
        .map(|list| list.params().map(|p| lower_param(&p)).collect())
        .unwrap_or_default();
    let effects = func
        .effects()
        .map(|e| Effects {
            is_async: e.is_async(),
            is_failable: e.is_failable(),
        })
        .unwrap_or_default();
    MethodDecl {
        name: func.name().map(|n| n.text()).unwrap_or_default(),
        generic_params: func
            .generic_params()
            .map(|list| list.names())
            .unwrap_or_default(),
        params,
        return_type: func.return_type().and_then(|r| r.ty()).map(|ty| ty.text()),
        effects,
        attributes: func.attributes().map(|a| a.text()).collect(),
        modifiers: func.modifiers().map(|m| m.text()).collect(),
        signature_text: func.signature_text(),
        span: func.span(),
    }
}

fn lower_param(param: &Param) -> ParamDecl {
    let name = param.name().map(|n| n.text());
    // A single written name is both the label and the binding.
    let label = param.label().or_else(|| name.clone());
    ParamDecl {
        label,
        name,
        ty: param.ty().map(|ty| ty.text()),
        span: param.span(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stubby_parser::parse;

    fn lower(source: &str) -> TypeDecl {
        let parse = parse(source);
        assert!(parse.ok(), "{:?}", parse.errors());
        let def = parse.tree().type_defs().next().unwrap();
        lower_type_def(&def).unwrap()
    }

    #[test]
    fn members_in_declaration_order() {
        let decl = lower(
            "class Service {\n  var count: Int\n  init() {}\n  func load(from url: URL, _ retries: Int) async throws -> Data { fatalError() }\n  struct Nested {}\n}",
        );
        assert_eq!(decl.name, "Service");
        assert_eq!(decl.kind, TypeKind::Class);
        assert_eq!(decl.members.len(), 4);

        let Member::Property(prop) = &decl.members[0] else {
            panic!("expected property");
        };
        assert_eq!(prop.name, "count");
        assert_eq!(prop.ty.as_deref(), Some("Int"));

        assert!(matches!(
            &decl.members[1],
            Member::Other(OpaqueMember {
                kind: OpaqueKind::Initializer,
                ..
            })
        ));

        let Member::Method(method) = &decl.members[2] else {
            panic!("expected method");
        };
        assert_eq!(method.name, "load");
        assert_eq!(method.return_type.as_deref(), Some("Data"));
        assert!(method.effects.is_async && method.effects.is_failable);
        assert_eq!(
            method.signature_text,
            "func load(from url: URL, _ retries: Int) async throws -> Data"
        );
        let params: Vec<_> = method
            .params
            .iter()
            .map(|p| (p.label.as_deref(), p.name.as_deref(), p.ty.as_deref()))
            .collect();
        assert_eq!(
            params,
            [
                (Some("from"), Some("url"), Some("URL")),
                (Some("_"), Some("retries"), Some("Int")),
            ]
        );

        let Member::Other(nested) = &decl.members[3] else {
            panic!("expected nested type");
        };
        assert_eq!(nested.kind, OpaqueKind::NestedType);
        assert_eq!(nested.name.as_deref(), Some("Nested"));
    }

    #[test]
    fn method_type_parameters() {
        let decl = lower("class A { func convert<In, Out: Codable>(_ value: In) -> Out { fatalError() }\n func plain() {} }");
        let Member::Method(generic) = &decl.members[0] else {
            panic!("expected method");
        };
        assert_eq!(generic.generic_params, ["In", "Out"]);
        let Member::Method(plain) = &decl.members[1] else {
            panic!("expected method");
        };
        assert!(plain.generic_params.is_empty());
    }

    #[test]
    fn single_name_is_label_and_binding() {
        let decl = lower("struct S { func f(x: Int) {} }");
        let Member::Method(method) = &decl.members[0] else {
            panic!("expected method");
        };
        assert_eq!(method.params[0].label.as_deref(), Some("x"));
        assert_eq!(method.params[0].name.as_deref(), Some("x"));
        assert_eq!(method.return_type, None);
        assert_eq!(decl.kind, TypeKind::Struct);
    }

    #[test]
    fn inferred_property_type_stays_missing() {
        let decl = lower("class A { var items = [1, 2] }");
        let Member::Property(prop) = &decl.members[0] else {
            panic!("expected property");
        };
        assert_eq!(prop.ty, None);
    }

    #[test]
    fn type_level_members_pass_through() {
        let decl = lower("class A { static func make() -> A { A() }\n class var shared: A { A() } }");
        assert!(decl.members.iter().all(|m| matches!(m, Member::Other(_))));
    }

    #[test]
    fn attributes_and_modifiers_are_kept() {
        let decl = lower("class A { @discardableResult public func save() -> Bool { true } }");
        let Member::Method(method) = &decl.members[0] else {
            panic!("expected method");
        };
        assert_eq!(method.attributes, ["@discardableResult"]);
        assert_eq!(method.modifiers, ["public"]);
        assert_eq!(method.signature_text, "func save() -> Bool");
    }

    #[test]
    fn member_span_excludes_leading_trivia() {
        let source = "class A {\n    func f() {}\n}";
        let decl = lower(source);
        let span = decl.members[0].span();
        assert_eq!(&source[span.start as usize..span.end as usize], "func f() {}");
    }
}
