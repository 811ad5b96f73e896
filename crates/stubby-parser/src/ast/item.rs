//! Typed AST nodes for declarations.
//!
//! Covers: SourceFile, ImportDecl, OtherItem, TypeDef, Attribute, Modifier,
//! GenericParamList, MemberList, PropertyDecl, FuncDecl, Effects, InitDecl, NestedType,
//! OtherMember, ParamList, Param, TypeAnnotation, ReturnType, TypeRef, Name,
//! Block.

use crate::ast::{
    ast_node, canonical_text, child_node, child_nodes, child_token, first_significant_token,
    render_tokens, AstNode,
};
use crate::cst::{SyntaxNode, SyntaxToken};
use crate::syntax_kind::SyntaxKind;

// ── Source File ──────────────────────────────────────────────────────────

ast_node!(SourceFile, SOURCE_FILE);

impl SourceFile {
    /// All top-level items in the source file.
    pub fn items(&self) -> impl Iterator<Item = Item> + '_ {
        self.syntax.children().filter_map(Item::cast)
    }

    /// All top-level class and struct definitions.
    pub fn type_defs(&self) -> impl Iterator<Item = TypeDef> + '_ {
        child_nodes(&self.syntax)
    }

    /// Every class and struct definition, nested ones included, in source
    /// order (an outer type before the types inside it).
    pub fn all_type_defs(&self) -> impl Iterator<Item = TypeDef> + '_ {
        self.syntax.descendants().filter_map(TypeDef::cast)
    }
}

// ── Item enum ────────────────────────────────────────────────────────────

/// Any top-level declaration.
#[derive(Debug, Clone)]
pub enum Item {
    ImportDecl(ImportDecl),
    TypeDef(TypeDef),
    OtherItem(OtherItem),
}

impl Item {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::IMPORT_DECL => Some(Item::ImportDecl(ImportDecl { syntax: node })),
            SyntaxKind::TYPE_DEF => Some(Item::TypeDef(TypeDef { syntax: node })),
            SyntaxKind::OTHER_ITEM => Some(Item::OtherItem(OtherItem { syntax: node })),
            _ => None,
        }
    }

    pub fn syntax(&self) -> &SyntaxNode {
        match self {
            Item::ImportDecl(it) => it.syntax(),
            Item::TypeDef(it) => it.syntax(),
            Item::OtherItem(it) => it.syntax(),
        }
    }
}

// ── Import ───────────────────────────────────────────────────────────────

ast_node!(ImportDecl, IMPORT_DECL);

impl ImportDecl {
    /// The imported module path, e.g. `Foundation` or `struct Foo.Bar`.
    pub fn path(&self) -> String {
        render_tokens(
            self.syntax
                .children_with_tokens()
                .filter_map(|it| it.into_token())
                .skip_while(|t| t.kind().is_trivia() || t.text() == "import"),
        )
    }
}

// ── Other top-level item ─────────────────────────────────────────────────

ast_node!(OtherItem, OTHER_ITEM);

impl OtherItem {
    pub fn attributes(&self) -> impl Iterator<Item = Attribute> + '_ {
        child_nodes(&self.syntax)
    }

    /// The token that introduces the item (`enum`, `func`, `protocol`, ...).
    pub fn keyword(&self) -> Option<SyntaxToken> {
        first_significant_token(&self.syntax)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes().any(|a| a.name().as_deref() == Some(name))
    }
}

// ── Type Definition ──────────────────────────────────────────────────────

/// `class` or `struct`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeDefKind {
    Class,
    Struct,
}

ast_node!(TypeDef, TYPE_DEF);

impl TypeDef {
    pub fn attributes(&self) -> impl Iterator<Item = Attribute> + '_ {
        child_nodes(&self.syntax)
    }

    pub fn modifiers(&self) -> impl Iterator<Item = Modifier> + '_ {
        child_nodes(&self.syntax)
    }

    /// The attribute with the given name, if present.
    pub fn attribute(&self, name: &str) -> Option<Attribute> {
        self.attributes().find(|a| a.name().as_deref() == Some(name))
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    pub fn kind(&self) -> Option<TypeDefKind> {
        if child_token(&self.syntax, SyntaxKind::CLASS_KW).is_some() {
            Some(TypeDefKind::Class)
        } else if child_token(&self.syntax, SyntaxKind::STRUCT_KW).is_some() {
            Some(TypeDefKind::Struct)
        } else {
            None
        }
    }

    pub fn name(&self) -> Option<Name> {
        child_node(&self.syntax)
    }

    pub fn member_list(&self) -> Option<MemberList> {
        child_node(&self.syntax)
    }

    /// Members in declaration order. Empty when the body is missing.
    pub fn members(&self) -> Vec<Member> {
        self.member_list()
            .map(|list| list.members().collect())
            .unwrap_or_default()
    }

    /// Whether a type named `name` is declared directly in the body.
    pub fn declares_type(&self, name: &str) -> bool {
        self.members().iter().any(|member| {
            let declared = match member {
                Member::TypeDef(def) => def.name(),
                Member::NestedType(nested) => nested.name(),
                _ => None,
            };
            declared.is_some_and(|n| n.text() == name)
        })
    }
}

// ── Generic parameters ───────────────────────────────────────────────────

ast_node!(GenericParamList, GENERIC_PARAM_LIST);

impl GenericParamList {
    /// Parameter names in order: `<T: Codable, U>` gives `T`, `U`.
    pub fn names(&self) -> Vec<String> {
        let mut names = Vec::new();
        let mut depth = 0u32;
        let mut expect_name = false;
        for token in self
            .syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .filter(|t| !t.kind().is_trivia())
        {
            match token.kind() {
                SyntaxKind::LT => {
                    depth += 1;
                    expect_name = depth == 1;
                }
                SyntaxKind::GT => depth = depth.saturating_sub(1),
                SyntaxKind::COMMA if depth == 1 => expect_name = true,
                SyntaxKind::IDENT if expect_name => {
                    names.push(token.text().to_string());
                    expect_name = false;
                }
                _ => expect_name = false,
            }
        }
        names
    }
}

// ── Attributes and modifiers ─────────────────────────────────────────────

ast_node!(Attribute, ATTRIBUTE);

impl Attribute {
    /// Dotted attribute name without the `@`: `Mock`, `Module.Wrapper`.
    pub fn name(&self) -> Option<String> {
        let name: String = self
            .syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .filter(|t| matches!(t.kind(), SyntaxKind::IDENT | SyntaxKind::DOT))
            .map(|t| t.text().to_string())
            .collect();
        (!name.is_empty()).then_some(name)
    }

    /// The parenthesised argument run, including the parentheses.
    pub fn args(&self) -> Option<SyntaxNode> {
        self.syntax
            .children()
            .find(|n| n.kind() == SyntaxKind::ATTRIBUTE_ARGS)
    }

    /// Canonical text of the whole attribute.
    pub fn text(&self) -> String {
        canonical_text(&self.syntax)
    }
}

ast_node!(Modifier, MODIFIER);

impl Modifier {
    /// `public`, `private(set)`, `static`, ...
    pub fn text(&self) -> String {
        canonical_text(&self.syntax)
    }
}

// ── Member List ──────────────────────────────────────────────────────────

ast_node!(MemberList, MEMBER_LIST);

impl MemberList {
    pub fn members(&self) -> impl Iterator<Item = Member> + '_ {
        self.syntax.children().filter_map(Member::cast)
    }

    pub fn l_brace(&self) -> Option<SyntaxToken> {
        child_token(&self.syntax, SyntaxKind::L_BRACE)
    }

    /// The closing brace. Missing only when the file failed to parse.
    pub fn r_brace(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .filter(|t| t.kind() == SyntaxKind::R_BRACE)
            .last()
    }
}

/// A declaration inside a type body.
#[derive(Debug, Clone)]
pub enum Member {
    Property(PropertyDecl),
    Func(FuncDecl),
    Init(InitDecl),
    TypeDef(TypeDef),
    NestedType(NestedType),
    Other(OtherMember),
}

impl Member {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::PROPERTY_DECL => Some(Member::Property(PropertyDecl { syntax: node })),
            SyntaxKind::FUNC_DECL => Some(Member::Func(FuncDecl { syntax: node })),
            SyntaxKind::INIT_DECL => Some(Member::Init(InitDecl { syntax: node })),
            SyntaxKind::TYPE_DEF => Some(Member::TypeDef(TypeDef { syntax: node })),
            SyntaxKind::NESTED_TYPE => Some(Member::NestedType(NestedType { syntax: node })),
            SyntaxKind::OTHER_MEMBER => Some(Member::Other(OtherMember { syntax: node })),
            _ => None,
        }
    }

    pub fn syntax(&self) -> &SyntaxNode {
        match self {
            Member::Property(it) => it.syntax(),
            Member::Func(it) => it.syntax(),
            Member::Init(it) => it.syntax(),
            Member::TypeDef(it) => it.syntax(),
            Member::NestedType(it) => it.syntax(),
            Member::Other(it) => it.syntax(),
        }
    }
}

// ── Property ─────────────────────────────────────────────────────────────

ast_node!(PropertyDecl, PROPERTY_DECL);

impl PropertyDecl {
    pub fn attributes(&self) -> impl Iterator<Item = Attribute> + '_ {
        child_nodes(&self.syntax)
    }

    pub fn modifiers(&self) -> impl Iterator<Item = Modifier> + '_ {
        child_nodes(&self.syntax)
    }

    /// Whether the property is declared with `let`.
    pub fn is_let(&self) -> bool {
        child_token(&self.syntax, SyntaxKind::LET_KW).is_some()
    }

    pub fn name(&self) -> Option<Name> {
        child_node(&self.syntax)
    }

    pub fn type_annotation(&self) -> Option<TypeAnnotation> {
        child_node(&self.syntax)
    }

    /// The `= expression` part, including the `=`.
    pub fn initializer(&self) -> Option<SyntaxNode> {
        self.syntax
            .children()
            .find(|n| n.kind() == SyntaxKind::INITIALIZER)
    }

    /// Computed-property or observer block.
    pub fn accessor_block(&self) -> Option<Block> {
        child_node(&self.syntax)
    }
}

// ── Function ─────────────────────────────────────────────────────────────

ast_node!(FuncDecl, FUNC_DECL);

impl FuncDecl {
    pub fn attributes(&self) -> impl Iterator<Item = Attribute> + '_ {
        child_nodes(&self.syntax)
    }

    pub fn modifiers(&self) -> impl Iterator<Item = Modifier> + '_ {
        child_nodes(&self.syntax)
    }

    pub fn name(&self) -> Option<Name> {
        child_node(&self.syntax)
    }

    pub fn generic_params(&self) -> Option<GenericParamList> {
        child_node(&self.syntax)
    }

    pub fn param_list(&self) -> Option<ParamList> {
        child_node(&self.syntax)
    }

    pub fn effects(&self) -> Option<Effects> {
        child_node(&self.syntax)
    }

    pub fn return_type(&self) -> Option<ReturnType> {
        child_node(&self.syntax)
    }

    pub fn body(&self) -> Option<Block> {
        child_node(&self.syntax)
    }

    /// `func name<T>(params) effects -> R where ...`, without attributes,
    /// modifiers or body, in canonical spacing.
    pub fn signature_text(&self) -> String {
        let tokens = self.syntax.children_with_tokens().flat_map(|child| {
            let tokens: Vec<SyntaxToken> = match child {
                rowan::NodeOrToken::Token(t) => vec![t],
                rowan::NodeOrToken::Node(n) => match n.kind() {
                    SyntaxKind::ATTRIBUTE | SyntaxKind::MODIFIER | SyntaxKind::BLOCK => Vec::new(),
                    _ => n
                        .descendants_with_tokens()
                        .filter_map(|it| it.into_token())
                        .collect(),
                },
            };
            tokens
        });
        render_tokens(tokens)
    }
}

ast_node!(Effects, EFFECTS);

impl Effects {
    pub fn is_async(&self) -> bool {
        child_token(&self.syntax, SyntaxKind::ASYNC_KW).is_some()
    }

    /// `throws`, `throws(E)` or `rethrows`.
    pub fn is_failable(&self) -> bool {
        child_token(&self.syntax, SyntaxKind::THROWS_KW).is_some()
            || child_token(&self.syntax, SyntaxKind::RETHROWS_KW).is_some()
    }

    /// The error type of a typed `throws(E)`.
    pub fn thrown_type(&self) -> Option<TypeRef> {
        child_node(&self.syntax)
    }
}

// ── Initializer, nested types, other members ─────────────────────────────

ast_node!(InitDecl, INIT_DECL);

impl InitDecl {
    /// `init?` or `init!`.
    pub fn is_optional(&self) -> bool {
        child_token(&self.syntax, SyntaxKind::QUESTION).is_some()
            || child_token(&self.syntax, SyntaxKind::BANG).is_some()
    }

    pub fn param_list(&self) -> Option<ParamList> {
        child_node(&self.syntax)
    }

    pub fn effects(&self) -> Option<Effects> {
        child_node(&self.syntax)
    }
}

ast_node!(NestedType, NESTED_TYPE);

impl NestedType {
    pub fn attributes(&self) -> impl Iterator<Item = Attribute> + '_ {
        child_nodes(&self.syntax)
    }

    /// `enum`, `protocol`, `extension` or `actor`.
    pub fn keyword(&self) -> Option<SyntaxToken> {
        first_significant_token(&self.syntax)
    }

    pub fn name(&self) -> Option<Name> {
        child_node(&self.syntax)
    }
}

ast_node!(OtherMember, OTHER_MEMBER);

impl OtherMember {
    /// `subscript`, `typealias`, `deinit` or `#`.
    pub fn keyword(&self) -> Option<SyntaxToken> {
        first_significant_token(&self.syntax)
    }
}

// ── Parameters ───────────────────────────────────────────────────────────

ast_node!(ParamList, PARAM_LIST);

impl ParamList {
    pub fn params(&self) -> impl Iterator<Item = Param> + '_ {
        child_nodes(&self.syntax)
    }
}

ast_node!(Param, PARAM);

impl Param {
    /// The external label when both a label and a binding name are written.
    pub fn label(&self) -> Option<String> {
        self.syntax
            .children()
            .find(|n| n.kind() == SyntaxKind::PARAM_LABEL)
            .map(|n| canonical_text(&n))
    }

    /// The binding name (the only name when just one is written).
    pub fn name(&self) -> Option<Name> {
        child_node(&self.syntax)
    }

    pub fn type_annotation(&self) -> Option<TypeAnnotation> {
        child_node(&self.syntax)
    }

    pub fn ty(&self) -> Option<TypeRef> {
        self.type_annotation().and_then(|ann| ann.ty())
    }

    /// The `= default` part, including the `=`.
    pub fn default_value(&self) -> Option<SyntaxNode> {
        self.syntax
            .children()
            .find(|n| n.kind() == SyntaxKind::INITIALIZER)
    }
}

// ── Types ────────────────────────────────────────────────────────────────

ast_node!(TypeAnnotation, TYPE_ANNOTATION);

impl TypeAnnotation {
    pub fn ty(&self) -> Option<TypeRef> {
        child_node(&self.syntax)
    }
}

ast_node!(ReturnType, RETURN_TYPE);

impl ReturnType {
    pub fn ty(&self) -> Option<TypeRef> {
        child_node(&self.syntax)
    }
}

/// Any type node: path, tuple, function, collection, optional, ...
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    syntax: SyntaxNode,
}

impl AstNode for TypeRef {
    fn cast(node: SyntaxNode) -> Option<Self> {
        node.kind().is_type().then_some(Self { syntax: node })
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.syntax
    }
}

impl TypeRef {
    pub fn kind(&self) -> SyntaxKind {
        self.syntax.kind()
    }

    /// Canonical text of the type.
    pub fn text(&self) -> String {
        canonical_text(&self.syntax)
    }
}

// ── Names and blocks ─────────────────────────────────────────────────────

ast_node!(Name, NAME);

impl Name {
    pub fn text(&self) -> String {
        canonical_text(&self.syntax)
    }

    pub fn is_wildcard(&self) -> bool {
        self.text() == "_"
    }
}

ast_node!(Block, BLOCK);

#[cfg(test)]
mod tests {
    use super::*;

    fn source_file(src: &str) -> SourceFile {
        let parse = crate::parse(src);
        assert!(parse.ok(), "{:?}", parse.errors());
        parse.tree()
    }

    fn only_type(src: &str) -> TypeDef {
        source_file(src).type_defs().next().expect("type definition")
    }

    #[test]
    fn items_in_order() {
        let file = source_file("import Foundation\n@Mock class A {}\nenum E { case a }\n");
        let kinds: Vec<&str> = file
            .items()
            .map(|item| match item {
                Item::ImportDecl(_) => "import",
                Item::TypeDef(_) => "type",
                Item::OtherItem(_) => "other",
            })
            .collect();
        assert_eq!(kinds, ["import", "type", "other"]);
    }

    #[test]
    fn import_path() {
        let file = source_file("import Foundation.NSString");
        let Some(Item::ImportDecl(import)) = file.items().next() else {
            panic!("expected import");
        };
        assert_eq!(import.path(), "Foundation.NSString");
    }

    #[test]
    fn type_def_header() {
        let def = only_type("@Mock public final class Service: Base {}");
        assert_eq!(def.kind(), Some(TypeDefKind::Class));
        assert_eq!(def.name().unwrap().text(), "Service");
        assert!(def.has_attribute("Mock"));
        let modifiers: Vec<String> = def.modifiers().map(|m| m.text()).collect();
        assert_eq!(modifiers, ["public", "final"]);
    }

    #[test]
    fn attribute_with_arguments() {
        let def = only_type("@available(iOS 13, *) struct S {}");
        let attr = def.attributes().next().unwrap();
        assert_eq!(attr.name().as_deref(), Some("available"));
        assert!(attr.args().is_some());
        assert_eq!(def.kind(), Some(TypeDefKind::Struct));
    }

    #[test]
    fn members_in_declaration_order() {
        let def = only_type(
            "class A {\n  var x: Int\n  init() {}\n  func f() {}\n  enum K { case a }\n  struct S {}\n  deinit {}\n}",
        );
        let kinds: Vec<&str> = def
            .members()
            .iter()
            .map(|m| match m {
                Member::Property(_) => "property",
                Member::Func(_) => "func",
                Member::Init(_) => "init",
                Member::TypeDef(_) => "type",
                Member::NestedType(_) => "nested",
                Member::Other(_) => "other",
            })
            .collect();
        assert_eq!(kinds, ["property", "init", "func", "nested", "type", "other"]);
    }

    #[test]
    fn property_parts() {
        let def = only_type("class A { private(set) var count: Int = 0 { didSet { print(count) } } }");
        let Member::Property(prop) = &def.members()[0] else {
            panic!("expected property");
        };
        assert!(!prop.is_let());
        assert_eq!(prop.name().unwrap().text(), "count");
        assert_eq!(prop.type_annotation().unwrap().ty().unwrap().text(), "Int");
        assert!(prop.initializer().is_some());
        assert!(prop.accessor_block().is_some());
        assert_eq!(prop.modifiers().next().unwrap().text(), "private(set)");
    }

    #[test]
    fn func_parts() {
        let def = only_type(
            "class A { @discardableResult func load(from url: URL, _ retries: Int) async throws -> Data { fatalError() } }",
        );
        let Member::Func(func) = &def.members()[0] else {
            panic!("expected func");
        };
        assert_eq!(func.name().unwrap().text(), "load");
        let params: Vec<(Option<String>, String, String)> = func
            .param_list()
            .unwrap()
            .params()
            .map(|p| (p.label(), p.name().unwrap().text(), p.ty().unwrap().text()))
            .collect();
        assert_eq!(
            params,
            [
                (Some("from".to_string()), "url".to_string(), "URL".to_string()),
                (Some("_".to_string()), "retries".to_string(), "Int".to_string()),
            ]
        );
        let effects = func.effects().unwrap();
        assert!(effects.is_async());
        assert!(effects.is_failable());
        assert_eq!(func.return_type().unwrap().ty().unwrap().text(), "Data");
        assert!(func.body().is_some());
        assert_eq!(
            func.signature_text(),
            "func load(from url: URL, _ retries: Int) async throws -> Data"
        );
    }

    #[test]
    fn signature_text_normalises_spacing() {
        let def = only_type("class A { func f<T>( x :T ,y: [T] )->T? {} }");
        let Member::Func(func) = &def.members()[0] else {
            panic!("expected func");
        };
        assert_eq!(func.signature_text(), "func f<T>(x: T, y: [T]) -> T?");
    }

    #[test]
    fn rethrows_and_typed_throws_are_failable() {
        let def = only_type("class A { func f() rethrows {}\n func g() throws(MyError) {} }");
        let members = def.members();
        for member in &members {
            let Member::Func(func) = member else {
                panic!("expected func");
            };
            assert!(func.effects().unwrap().is_failable());
        }
        let Member::Func(g) = &members[1] else { unreachable!() };
        assert_eq!(g.effects().unwrap().thrown_type().unwrap().text(), "MyError");
    }

    #[test]
    fn wildcard_name() {
        let def = only_type("class A { func f(_: Int) {} }");
        let Member::Func(func) = &def.members()[0] else {
            panic!("expected func");
        };
        let param = func.param_list().unwrap().params().next().unwrap();
        assert!(param.label().is_none());
        assert!(param.name().unwrap().is_wildcard());
    }

    #[test]
    fn nested_type_and_init() {
        let def = only_type("class A { init?(x: Int) throws {}\n protocol P {} }");
        let members = def.members();
        let Member::Init(init) = &members[0] else {
            panic!("expected init");
        };
        assert!(init.is_optional());
        assert!(init.effects().unwrap().is_failable());
        let Member::NestedType(nested) = &members[1] else {
            panic!("expected nested type");
        };
        assert_eq!(nested.keyword().unwrap().text(), "protocol");
        assert_eq!(nested.name().unwrap().text(), "P");
    }

    #[test]
    fn nested_struct_is_a_full_definition() {
        let def = only_type("class A {\n  @Mock final class Inner { func f() {} }\n  struct AMock {}\n}");
        let members = def.members();
        let Member::TypeDef(inner) = &members[0] else {
            panic!("expected nested definition");
        };
        assert!(inner.has_attribute("Mock"));
        assert_eq!(inner.kind(), Some(TypeDefKind::Class));
        assert_eq!(inner.members().len(), 1);
        assert!(def.declares_type("AMock"));
        assert!(def.declares_type("Inner"));
        assert!(!def.declares_type("Other"));
    }

    #[test]
    fn all_type_defs_visits_outer_first() {
        let names: Vec<String> = source_file("class A { struct B { class C {} } }\nstruct D {}")
            .all_type_defs()
            .filter_map(|d| d.name())
            .map(|n| n.text())
            .collect();
        assert_eq!(names, ["A", "B", "C", "D"]);
    }

    #[test]
    fn generic_param_names() {
        let def = only_type("class A { func f<T: Codable, U, V: Collection<Int>>(x: T) {} }");
        let Member::Func(func) = &def.members()[0] else {
            panic!("expected func");
        };
        assert_eq!(func.generic_params().unwrap().names(), ["T", "U", "V"]);
    }
}
