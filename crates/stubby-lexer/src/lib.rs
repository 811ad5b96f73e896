// stubby lexer -- tokenizer for the declaration language.
//
// Every byte of the input ends up in exactly one token (whitespace and
// comments included), so the parser can build a lossless tree and the
// emitter can copy members back out verbatim.

mod cursor;

use cursor::Cursor;
use stubby_common::error::{LexError, LexErrorKind};
use stubby_common::span::Span;
use stubby_common::token::{keyword_from_str, Token, TokenKind};

/// Converts source text into a stream of tokens.
///
/// Implements `Iterator<Item = Token>`; the last item is always `Eof`.
/// Problems are recorded as [`LexError`]s and the offending text becomes an
/// `Error` token, so lexing never stops early.
pub struct Lexer<'src> {
    cursor: Cursor<'src>,
    emitted_eof: bool,
    errors: Vec<LexError>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            cursor: Cursor::new(source),
            emitted_eof: false,
            errors: Vec::new(),
        }
    }

    /// Tokenize the entire source, including the final `Eof` token.
    pub fn tokenize(source: &str) -> Vec<Token> {
        Lexer::new(source).collect()
    }

    /// Tokenize the entire source and return the errors found along the way.
    pub fn tokenize_with_errors(source: &str) -> (Vec<Token>, Vec<LexError>) {
        let mut lexer = Lexer::new(source);
        let tokens: Vec<Token> = lexer.by_ref().collect();
        (tokens, lexer.errors)
    }

    /// Errors recorded so far.
    pub fn errors(&self) -> &[LexError] {
        &self.errors
    }

    fn next_token(&mut self) -> Token {
        let start = self.cursor.pos();

        let Some(c) = self.cursor.peek() else {
            return Token::new(TokenKind::Eof, start, start);
        };

        match c {
            ' ' | '\t' | '\r' | '\n' => {
                self.cursor
                    .eat_while(|c| matches!(c, ' ' | '\t' | '\r' | '\n'));
                self.token(TokenKind::Whitespace, start)
            }

            '(' => self.single_char_token(TokenKind::LParen, start),
            ')' => self.single_char_token(TokenKind::RParen, start),
            '[' => self.single_char_token(TokenKind::LBracket, start),
            ']' => self.single_char_token(TokenKind::RBracket, start),
            '{' => self.single_char_token(TokenKind::LBrace, start),
            '}' => self.single_char_token(TokenKind::RBrace, start),
            ',' => self.single_char_token(TokenKind::Comma, start),
            ':' => self.single_char_token(TokenKind::Colon, start),
            ';' => self.single_char_token(TokenKind::Semicolon, start),
            '@' => self.single_char_token(TokenKind::At, start),
            '#' => self.single_char_token(TokenKind::Hash, start),

            // Generic brackets are never merged with neighbours, so
            // `Array<Set<Int>>` closes with two `Gt` tokens.
            '<' => self.single_char_token(TokenKind::Lt, start),
            '>' => self.single_char_token(TokenKind::Gt, start),
            '?' => self.single_char_token(TokenKind::Question, start),
            '!' => self.single_char_token(TokenKind::Bang, start),
            '&' => self.single_char_token(TokenKind::Amp, start),
            '\\' => self.single_char_token(TokenKind::Operator, start),

            '.' => self.lex_dot(start),
            '/' if matches!(self.cursor.peek_next(), Some('/')) => self.lex_line_comment(start),
            '/' if matches!(self.cursor.peek_next(), Some('*')) => self.lex_block_comment(start),
            '-' if self.cursor.peek_next() == Some('>') => {
                self.cursor.advance();
                self.cursor.advance();
                self.token(TokenKind::Arrow, start)
            }
            '=' if !self.cursor.peek_next().is_some_and(is_operator_char) => {
                self.single_char_token(TokenKind::Eq, start)
            }
            c if is_operator_char(c) => {
                self.cursor.eat_while(is_operator_char);
                self.token(TokenKind::Operator, start)
            }

            '0'..='9' => self.lex_number(start),
            '"' => self.lex_string(start),
            '`' => self.lex_escaped_ident(start),
            c if is_ident_start(c) => self.lex_ident(start),

            other => {
                self.cursor.advance();
                self.error(LexErrorKind::UnexpectedCharacter(other), start);
                self.token(TokenKind::Error, start)
            }
        }
    }

    // ── Helpers ──────────────────────────────────────────────────────────

    fn token(&self, kind: TokenKind, start: u32) -> Token {
        Token::new(kind, start, self.cursor.pos())
    }

    fn single_char_token(&mut self, kind: TokenKind, start: u32) -> Token {
        self.cursor.advance();
        self.token(kind, start)
    }

    fn error(&mut self, kind: LexErrorKind, start: u32) {
        self.errors
            .push(LexError::new(kind, Span::new(start, self.cursor.pos())));
    }

    /// `.` -> `Dot`, `...` -> `Ellipsis`
    fn lex_dot(&mut self, start: u32) -> Token {
        if self.cursor.peek_next() == Some('.') && self.cursor.peek_nth(2) == Some('.') {
            self.cursor.advance();
            self.cursor.advance();
            self.cursor.advance();
            return self.token(TokenKind::Ellipsis, start);
        }
        self.single_char_token(TokenKind::Dot, start)
    }

    // ── Comments ─────────────────────────────────────────────────────────

    /// `// ...` up to (not including) the newline.
    fn lex_line_comment(&mut self, start: u32) -> Token {
        self.cursor.eat_while(|c| c != '\n');
        self.token(TokenKind::LineComment, start)
    }

    /// `/* ... */`, nesting allowed.
    fn lex_block_comment(&mut self, start: u32) -> Token {
        self.cursor.advance(); // '/'
        self.cursor.advance(); // '*'
        let mut depth = 1u32;

        while depth > 0 {
            match self.cursor.advance() {
                None => {
                    self.error(LexErrorKind::UnterminatedBlockComment, start);
                    return self.token(TokenKind::Error, start);
                }
                Some('/') if self.cursor.peek() == Some('*') => {
                    self.cursor.advance();
                    depth += 1;
                }
                Some('*') if self.cursor.peek() == Some('/') => {
                    self.cursor.advance();
                    depth -= 1;
                }
                Some(_) => {}
            }
        }
        self.token(TokenKind::BlockComment, start)
    }

    // ── Number literals ──────────────────────────────────────────────────

    /// Decimal, hex (`0x`), binary (`0b`), octal (`0o`) and float literals.
    /// Underscore separators are allowed everywhere after the first digit.
    fn lex_number(&mut self, start: u32) -> Token {
        let first = self.cursor.advance();

        if first == Some('0') {
            let radix_digit: Option<fn(char) -> bool> = match self.cursor.peek() {
                Some('x') => Some(is_hex_digit),
                Some('b') => Some(is_binary_digit),
                Some('o') => Some(is_octal_digit),
                _ => None,
            };
            if let Some(is_digit) = radix_digit {
                self.cursor.advance();
                self.cursor.eat_while(is_digit);
                return self.token(TokenKind::IntLiteral, start);
            }
        }

        self.cursor.eat_while(|c| c.is_ascii_digit() || c == '_');

        let mut is_float = false;
        // `1.5` is a float, `1.description` and `1...3` are not.
        if self.cursor.peek() == Some('.') && self.cursor.peek_next().is_some_and(|c| c.is_ascii_digit())
        {
            self.cursor.advance();
            self.cursor.eat_while(|c| c.is_ascii_digit() || c == '_');
            is_float = true;
        }
        if matches!(self.cursor.peek(), Some('e' | 'E')) {
            self.cursor.advance();
            if matches!(self.cursor.peek(), Some('+' | '-')) {
                self.cursor.advance();
            }
            self.cursor.eat_while(|c| c.is_ascii_digit() || c == '_');
            is_float = true;
        }

        let kind = if is_float {
            TokenKind::FloatLiteral
        } else {
            TokenKind::IntLiteral
        };
        self.token(kind, start)
    }

    // ── String literals ──────────────────────────────────────────────────

    /// A whole string literal, quotes included, as one token.
    ///
    /// Interpolations `\( ... )` are skipped with paren counting; the
    /// declaration skeleton never needs to look inside them.
    fn lex_string(&mut self, start: u32) -> Token {
        self.cursor.advance(); // opening '"'
        let multiline = self.cursor.peek() == Some('"') && self.cursor.peek_next() == Some('"');
        if multiline {
            self.cursor.advance();
            self.cursor.advance();
        }

        loop {
            match self.cursor.peek() {
                None => break,
                Some('\n') if !multiline => break,
                Some('"') if !multiline => {
                    self.cursor.advance();
                    return self.token(TokenKind::StringLiteral, start);
                }
                Some('"')
                    if self.cursor.peek_next() == Some('"')
                        && self.cursor.peek_nth(2) == Some('"') =>
                {
                    self.cursor.advance();
                    self.cursor.advance();
                    self.cursor.advance();
                    return self.token(TokenKind::StringLiteral, start);
                }
                Some('\\') => {
                    self.cursor.advance();
                    if self.cursor.eat('(') {
                        self.skip_interpolation();
                    } else {
                        self.cursor.advance();
                    }
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }

        self.error(LexErrorKind::UnterminatedString, start);
        self.token(TokenKind::Error, start)
    }

    /// Skip to the `)` that closes an interpolation whose `(` was consumed.
    fn skip_interpolation(&mut self) {
        let mut depth = 1u32;
        while let Some(c) = self.cursor.peek() {
            match c {
                '\n' => return,
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        self.cursor.advance();
                        return;
                    }
                }
                _ => {}
            }
            self.cursor.advance();
        }
    }

    // ── Identifiers and keywords ─────────────────────────────────────────

    fn lex_ident(&mut self, start: u32) -> Token {
        self.cursor.advance();
        self.cursor.eat_while(is_ident_continue);
        let text = self.cursor.slice(start, self.cursor.pos());

        let kind = match text {
            "_" => TokenKind::Underscore,
            _ => keyword_from_str(text).unwrap_or(TokenKind::Ident),
        };
        self.token(kind, start)
    }

    /// `` `default` `` -- a keyword used as a plain identifier.
    fn lex_escaped_ident(&mut self, start: u32) -> Token {
        self.cursor.advance(); // opening '`'
        self.cursor.eat_while(|c| c != '`' && c != '\n');
        if self.cursor.eat('`') {
            self.token(TokenKind::Ident, start)
        } else {
            self.error(LexErrorKind::UnterminatedEscapedIdent, start);
            self.token(TokenKind::Error, start)
        }
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.emitted_eof {
            return None;
        }
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            self.emitted_eof = true;
        }
        Some(token)
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

fn is_hex_digit(c: char) -> bool {
    c.is_ascii_hexdigit() || c == '_'
}

fn is_binary_digit(c: char) -> bool {
    matches!(c, '0' | '1' | '_')
}

fn is_octal_digit(c: char) -> bool {
    matches!(c, '0'..='7' | '_')
}

/// Characters that form free-standing operator runs (`+`, `==`, `||`, ...).
fn is_operator_char(c: char) -> bool {
    matches!(c, '+' | '-' | '*' | '/' | '%' | '=' | '|' | '^' | '~')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::tokenize(source)
            .into_iter()
            .map(|t| t.kind)
            .filter(|k| *k != TokenKind::Whitespace)
            .collect()
    }

    #[test]
    fn lex_method_signature() {
        assert_eq!(
            kinds("func load(id: Int) async throws -> String"),
            vec![
                TokenKind::Func,
                TokenKind::Ident,
                TokenKind::LParen,
                TokenKind::Ident,
                TokenKind::Colon,
                TokenKind::Ident,
                TokenKind::RParen,
                TokenKind::Async,
                TokenKind::Throws,
                TokenKind::Arrow,
                TokenKind::Ident,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lex_spans_accurate() {
        let tokens = Lexer::tokenize("var x = 42");
        let spans: Vec<_> = tokens.iter().map(|t| (t.span.start, t.span.end)).collect();
        assert_eq!(
            spans,
            vec![(0, 3), (3, 4), (4, 5), (5, 6), (6, 7), (7, 8), (8, 10), (10, 10)]
        );
    }

    #[test]
    fn tokens_cover_every_byte() {
        let source = "@Mock\nclass A { // note\n  func f() { print(\"}\") }\n}";
        let tokens = Lexer::tokenize(source);
        let mut expected_start = 0;
        for tok in &tokens {
            assert_eq!(tok.span.start, expected_start, "gap before {tok:?}");
            expected_start = tok.span.end;
        }
        assert_eq!(expected_start as usize, source.len());
    }

    #[test]
    fn unexpected_character_is_recorded() {
        let (tokens, errors) = Lexer::tokenize_with_errors("var x§");
        assert_eq!(tokens[3].kind, TokenKind::Error);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, LexErrorKind::UnexpectedCharacter('§'));
    }
}
