//! Event-based parser for the declaration language.
//!
//! The parser consumes a token stream and produces events (Open/Close/Advance)
//! that are later converted into a rowan green tree. This decouples parsing
//! logic from tree construction.
//!
//! # Architecture
//!
//! 1. Parse functions call `open()` to start a node, `advance()` to consume
//!    tokens, and `close()` to finish a node with its actual kind.
//! 2. Events are collected into a flat `Vec<Event>`.
//! 3. `build_tree()` converts events into a rowan `GreenNode`.
//!
//! `open_before()` wraps a previously completed node (e.g. turning a parsed
//! `Int` into `OPTIONAL_TYPE(Int ?)`) using the "forward parent" technique.
//!
//! # Trivia
//!
//! Whitespace and comments are skipped by lookahead. `open()` flushes
//! pending trivia into the enclosing node first, so every node's range
//! starts at its first significant token. That keeps member spans tight,
//! which the emitter relies on when it copies members out of the source.

pub(crate) mod blocks;
pub(crate) mod items;
pub(crate) mod types;

use stubby_common::span::Span;
use stubby_common::token::Token;

use crate::error::ParseError;
use crate::syntax_kind::SyntaxKind;

/// A parser event, later replayed into a rowan green tree.
#[derive(Debug)]
enum Event {
    /// Start a node. The kind starts as TOMBSTONE and is patched by `close()`.
    Open {
        kind: SyntaxKind,
        forward_parent: Option<usize>,
    },
    Close,
    /// Consume the next raw token (trivia included).
    Advance,
}

/// A started but not-yet-closed node.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MarkOpened {
    index: usize,
}

/// A completed node, usable with `open_before()`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MarkClosed {
    index: usize,
}

pub(crate) struct Parser<'src> {
    /// All tokens from the lexer (including Eof).
    tokens: Vec<Token>,
    /// Current position in the token stream.
    pos: usize,
    events: Vec<Event>,
    source: &'src str,
    errors: Vec<ParseError>,
    /// Whether an error has been encountered (first-error-only strategy).
    has_error: bool,
}

impl<'src> Parser<'src> {
    pub(crate) fn new(tokens: Vec<Token>, source: &'src str) -> Self {
        Self {
            tokens,
            pos: 0,
            events: Vec::new(),
            source,
            errors: Vec::new(),
            has_error: false,
        }
    }

    // ── Lookahead ──────────────────────────────────────────────────────

    pub(crate) fn current(&self) -> SyntaxKind {
        self.nth(0)
    }

    /// Kind of the Nth significant token ahead, `EOF` past the end.
    pub(crate) fn nth(&self, n: usize) -> SyntaxKind {
        self.nth_pos(n)
            .map(|pos| SyntaxKind::from(self.tokens[pos].kind.clone()))
            .unwrap_or(SyntaxKind::EOF)
    }

    pub(crate) fn current_text(&self) -> &'src str {
        self.nth_text(0)
    }

    /// Text of the Nth significant token ahead, empty past the end.
    pub(crate) fn nth_text(&self, n: usize) -> &'src str {
        match self.nth_pos(n) {
            Some(pos) => {
                let span = self.tokens[pos].span;
                &self.source[span.start as usize..span.end as usize]
            }
            None => "",
        }
    }

    pub(crate) fn current_span(&self) -> Span {
        match self.nth_pos(0) {
            Some(pos) => self.tokens[pos].span,
            None => Span::empty_at(self.source.len() as u32),
        }
    }

    pub(crate) fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    pub(crate) fn at_any(&self, kinds: &[SyntaxKind]) -> bool {
        kinds.contains(&self.current())
    }

    /// Whether the current token is an identifier spelled `text`.
    pub(crate) fn at_contextual(&self, text: &str) -> bool {
        self.at(SyntaxKind::IDENT) && self.current_text() == text
    }

    /// Whether whitespace or a comment separates the current token from the
    /// previously consumed one (`@escaping (` vs `@available(`).
    pub(crate) fn has_leading_trivia(&self) -> bool {
        self.nth_pos(0).is_some_and(|pos| pos > self.pos)
    }

    fn nth_pos(&self, n: usize) -> Option<usize> {
        let mut remaining = n;
        for pos in self.pos..self.tokens.len() {
            if self.tokens[pos].kind.is_trivia() {
                continue;
            }
            if remaining == 0 {
                return Some(pos);
            }
            remaining -= 1;
        }
        None
    }

    // ── Mutation: node management ──────────────────────────────────────

    /// Start a new node. Pending trivia is attached to the parent first.
    pub(crate) fn open(&mut self) -> MarkOpened {
        self.eat_trivia();
        let mark = MarkOpened {
            index: self.events.len(),
        };
        self.events.push(Event::Open {
            kind: SyntaxKind::TOMBSTONE,
            forward_parent: None,
        });
        mark
    }

    /// Start a new node that will wrap the already completed `completed`.
    pub(crate) fn open_before(&mut self, completed: MarkClosed) -> MarkOpened {
        let mark = MarkOpened {
            index: self.events.len(),
        };
        self.events.push(Event::Open {
            kind: SyntaxKind::TOMBSTONE,
            forward_parent: None,
        });
        if let Event::Open { forward_parent, .. } = &mut self.events[completed.index] {
            *forward_parent = Some(mark.index);
        }
        mark
    }

    /// Close a node, patching its Open event with the actual kind.
    pub(crate) fn close(&mut self, m: MarkOpened, kind: SyntaxKind) -> MarkClosed {
        if let Event::Open {
            kind: slot_kind, ..
        } = &mut self.events[m.index]
        {
            *slot_kind = kind;
        }
        self.events.push(Event::Close);
        MarkClosed { index: m.index }
    }

    // ── Mutation: token consumption ────────────────────────────────────

    /// Consume the current significant token along with any trivia before it.
    pub(crate) fn advance(&mut self) {
        self.eat_trivia();
        if self.pos < self.tokens.len() {
            self.events.push(Event::Advance);
            self.pos += 1;
        }
    }

    /// Consume the current token wrapped in an ERROR_NODE.
    pub(crate) fn advance_with_error(&mut self, message: &str) {
        self.error(message);
        let m = self.open();
        self.advance();
        self.close(m, SyntaxKind::ERROR_NODE);
    }

    /// Consume `kind` or record an "expected ..." error.
    pub(crate) fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.eat(kind) {
            true
        } else {
            self.error(&format!("expected {}", kind.describe()));
            false
        }
    }

    pub(crate) fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn eat_trivia(&mut self) {
        while self.pos < self.tokens.len() && self.tokens[self.pos].kind.is_trivia() {
            self.events.push(Event::Advance);
            self.pos += 1;
        }
    }

    // ── Error reporting ────────────────────────────────────────────────

    /// Record a parse error at the current token. Only the first is kept.
    pub(crate) fn error(&mut self, message: &str) {
        if self.has_error {
            return;
        }
        let span = self.current_span();
        self.errors.push(ParseError::new(message, span));
        self.has_error = true;
    }

    /// Record a parse error pointing back at where a construct started.
    pub(crate) fn error_with_related(&mut self, message: &str, related_span: Span, related_msg: &str) {
        if self.has_error {
            return;
        }
        let span = self.current_span();
        self.errors
            .push(ParseError::with_related(message, span, related_msg, related_span));
        self.has_error = true;
    }

    pub(crate) fn has_error(&self) -> bool {
        self.has_error
    }

    // ── Tree building ──────────────────────────────────────────────────

    /// Replay the events into a rowan `GreenNode`.
    ///
    /// A node with a `forward_parent` chain is opened outermost wrapper
    /// first; the wrapper Open events are tombstoned so they are skipped
    /// when the loop reaches them.
    pub(crate) fn build_tree(mut self) -> (rowan::GreenNode, Vec<ParseError>) {
        let mut builder = rowan::GreenNodeBuilder::new();
        let mut token_pos: usize = 0;
        let mut forward_parents: Vec<SyntaxKind> = Vec::new();

        for i in 0..self.events.len() {
            match self.events[i] {
                Event::Open {
                    kind,
                    forward_parent: Some(_),
                } => {
                    forward_parents.clear();
                    forward_parents.push(kind);
                    let mut next = self.take_forward_parent(i);
                    while let Some(idx) = next {
                        next = self.take_forward_parent(idx);
                        if let Event::Open { kind, .. } = &mut self.events[idx] {
                            forward_parents.push(*kind);
                            *kind = SyntaxKind::TOMBSTONE;
                        }
                    }
                    for &fk in forward_parents.iter().rev() {
                        if fk != SyntaxKind::TOMBSTONE {
                            builder.start_node(rowan::SyntaxKind(fk as u16));
                        }
                    }
                }
                Event::Open {
                    kind,
                    forward_parent: None,
                } => {
                    if kind != SyntaxKind::TOMBSTONE {
                        builder.start_node(rowan::SyntaxKind(kind as u16));
                    }
                }
                Event::Close => builder.finish_node(),
                Event::Advance => {
                    if let Some(token) = self.tokens.get(token_pos) {
                        let kind = SyntaxKind::from(token.kind.clone());
                        let text = &self.source[token.span.start as usize..token.span.end as usize];
                        builder.token(rowan::SyntaxKind(kind as u16), text);
                        token_pos += 1;
                    }
                }
            }
        }

        (builder.finish(), self.errors)
    }

    fn take_forward_parent(&mut self, idx: usize) -> Option<usize> {
        match &mut self.events[idx] {
            Event::Open { forward_parent, .. } => forward_parent.take(),
            _ => None,
        }
    }
}

// ── Top-level parsing ──────────────────────────────────────────────────

/// Parse a complete source file into a SOURCE_FILE node.
pub(crate) fn parse_source_file(p: &mut Parser) {
    let root = p.open();

    loop {
        while p.eat(SyntaxKind::SEMICOLON) {}

        if p.at(SyntaxKind::EOF) || p.has_error() {
            break;
        }
        items::parse_item(p);
    }

    // After an error the rest of the file is kept as one error node so the
    // tree still covers every byte.
    if !p.at(SyntaxKind::EOF) {
        let m = p.open();
        while !p.at(SyntaxKind::EOF) {
            p.advance();
        }
        p.close(m, SyntaxKind::ERROR_NODE);
    }
    p.advance(); // EOF (and trailing trivia)

    p.close(root, SyntaxKind::SOURCE_FILE);
}
