//! Scan position over the joined argument buffer.

use std::sync::LazyLock;

use regex::Regex;

static IDENTIFIER_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+").expect("static regex must compile"));

// Double-quoted span, single-quoted span, then a bare non-whitespace run.
static VALUE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(?:"([^"]*)"|'([^']*)'|(\S+))"#).expect("static regex must compile")
});

/// A value token read from the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// Token text with surrounding quotes removed.
    pub text: &'a str,
    /// `true` if the token was quoted.
    pub quoted: bool,
    /// Bytes the token occupies in the buffer, quotes included.
    pub len: usize,
}

/// Byte cursor over a borrowed buffer.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Unconsumed input.
    pub fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    pub fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    /// Consumes `literal` if the input continues with it. An empty literal
    /// always matches.
    pub fn eat(&mut self, literal: &str) -> bool {
        if self.rest().starts_with(literal) {
            self.pos += literal.len();
            true
        } else {
            false
        }
    }

    /// Consumes an identifier token (`[A-Za-z0-9_]+`).
    pub fn eat_identifier(&mut self) -> Option<&'a str> {
        self.eat_match(&IDENTIFIER_TOKEN)
    }

    /// Consumes the match of an anchored regex.
    pub fn eat_match(&mut self, re: &Regex) -> Option<&'a str> {
        let rest = self.rest();
        let found = re.find(rest).filter(|m| m.start() == 0)?;
        self.pos += found.end();
        Some(&rest[..found.end()])
    }

    /// Reads the next value token without consuming it.
    pub fn peek_token(&self) -> Option<Token<'a>> {
        let rest = self.rest();
        let caps = VALUE_TOKEN.captures(rest)?;
        let len = caps.get(0)?.end();
        let (text, quoted) = match (caps.get(1), caps.get(2), caps.get(3)) {
            (Some(m), _, _) | (_, Some(m), _) => (m.as_str(), true),
            (_, _, Some(m)) => (m.as_str(), false),
            _ => return None,
        };
        Some(Token { text, quoted, len })
    }

    /// Skips whitespace and consumes the next value token.
    pub fn take_token(&mut self) -> Option<Token<'a>> {
        self.skip_whitespace();
        let token = self.peek_token()?;
        self.advance(token.len);
        Some(token)
    }

    /// Moves forward by `len` bytes.
    pub fn advance(&mut self, len: usize) {
        self.pos = (self.pos + len).min(self.input.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_strip_quotes() {
        let mut cursor = Cursor::new(r#"  "a b" 'c d' plain"#);
        let first = cursor.take_token().unwrap();
        assert_eq!(first.text, "a b");
        assert!(first.quoted);
        assert_eq!(cursor.take_token().unwrap().text, "c d");
        let last = cursor.take_token().unwrap();
        assert_eq!(last.text, "plain");
        assert!(!last.quoted);
        assert!(cursor.take_token().is_none());
        assert!(cursor.is_at_end());
    }

    #[test]
    fn test_unterminated_quote_is_bare() {
        let mut cursor = Cursor::new(r#""abc def"#);
        assert_eq!(cursor.take_token().unwrap().text, r#""abc"#);
        assert_eq!(cursor.take_token().unwrap().text, "def");
    }

    #[test]
    fn test_eat_literal_and_identifier() {
        let mut cursor = Cursor::new("--input=x");
        assert!(!cursor.eat("/"));
        assert!(cursor.eat("--"));
        assert_eq!(cursor.eat_identifier(), Some("input"));
        assert!(cursor.eat(""));
        assert!(cursor.eat("="));
        assert_eq!(cursor.rest(), "x");
    }

    #[test]
    fn test_identifier_requires_word_characters() {
        let mut cursor = Cursor::new("-input");
        assert_eq!(cursor.eat_identifier(), None);
        assert_eq!(cursor.rest(), "-input");
    }
}
