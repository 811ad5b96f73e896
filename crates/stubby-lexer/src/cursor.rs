/// Character cursor over declaration source.
///
/// Positions are byte offsets into the UTF-8 source, which is what spans
/// and the rowan tree both use.
pub struct Cursor<'src> {
    source: &'src str,
    pos: u32,
    chars: std::str::Chars<'src>,
}

impl<'src> Cursor<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            pos: 0,
            chars: source.chars(),
        }
    }

    /// The current character, not consumed.
    pub fn peek(&self) -> Option<char> {
        self.chars.clone().next()
    }

    /// The character after the current one, not consumed.
    pub fn peek_next(&self) -> Option<char> {
        self.peek_nth(1)
    }

    /// The character `n` positions ahead (`peek_nth(0) == peek()`).
    pub fn peek_nth(&self, n: usize) -> Option<char> {
        self.chars.clone().nth(n)
    }

    /// Consume the current character and advance the position.
    pub fn advance(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.pos += c.len_utf8() as u32;
        Some(c)
    }

    /// Consume the current character if it equals `expected`.
    pub fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub fn pos(&self) -> u32 {
        self.pos
    }

    pub fn is_eof(&self) -> bool {
        self.peek().is_none()
    }

    /// Advance while the predicate holds for the current character.
    pub fn eat_while(&mut self, predicate: impl Fn(char) -> bool) {
        while let Some(c) = self.peek() {
            if !predicate(c) {
                break;
            }
            self.advance();
        }
    }

    /// Source text between two byte offsets.
    ///
    /// # Panics
    ///
    /// Panics if the offsets are out of bounds or not on UTF-8 boundaries.
    pub fn slice(&self, start: u32, end: u32) -> &'src str {
        &self.source[start as usize..end as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peek_does_not_advance() {
        let cursor = Cursor::new("ab");
        assert_eq!(cursor.peek(), Some('a'));
        assert_eq!(cursor.peek_next(), Some('b'));
        assert_eq!(cursor.peek_nth(2), None);
        assert_eq!(cursor.pos(), 0);
    }

    #[test]
    fn advance_tracks_multibyte_utf8() {
        let mut cursor = Cursor::new("\u{00E9}a");
        assert_eq!(cursor.advance(), Some('\u{00E9}'));
        assert_eq!(cursor.pos(), 2);
        assert_eq!(cursor.advance(), Some('a'));
        assert_eq!(cursor.pos(), 3);
        assert!(cursor.is_eof());
    }

    #[test]
    fn eat_only_matches_expected() {
        let mut cursor = Cursor::new("->");
        assert!(!cursor.eat('>'));
        assert!(cursor.eat('-'));
        assert!(cursor.eat('>'));
        assert!(cursor.is_eof());
    }

    #[test]
    fn eat_while_and_slice() {
        let mut cursor = Cursor::new("   func");
        cursor.eat_while(|c| c == ' ');
        assert_eq!(cursor.pos(), 3);
        assert_eq!(cursor.slice(3, 7), "func");
    }
}
