use crate::error::{Error, ErrorCode};
use crate::syntax::token::{Token, TokenKind};

/// Splits command text into whitespace-separated tokens.
pub struct Lexer<'a> {
    source: &'a [u8],
    pos: usize,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source: source.as_bytes(), pos: 0, line: 1, column: 1 }
    }

    /// Number the first line `line` instead of 1.
    pub fn starting_at(mut self, line: usize) -> Self {
        self.line = line;
        self
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>, Vec<Error>> {
        let mut tokens = Vec::new();
        let mut errors = Vec::new();

        loop {
            self.skip_whitespace();

            if self.is_at_end() {
                tokens.push(Token::new(TokenKind::Eof, "", self.line, self.column));
                break;
            }

            match self.next_token() {
                Ok(Some(tok)) => tokens.push(tok),
                Ok(None) => {}
                Err(e) => errors.push(e),
            }
        }

        if errors.is_empty() { Ok(tokens) } else { Err(errors) }
    }

    fn next_token(&mut self) -> Result<Option<Token>, Error> {
        let line = self.line;
        let col = self.column;
        let start = self.pos;

        let kind = match self.peek() {
            b'"' => {
                self.advance();
                TokenKind::Str(self.read_string(line, col)?)
            }
            b'\'' => {
                self.advance();
                let name = self.read_chunk();
                if name.is_empty() {
                    return Err(Error::new(ErrorCode::C005, line, col, "`'` must be followed by a name"));
                }
                TokenKind::Symbol(name)
            }
            b'#' => {
                if self.is_hex_sequence() { TokenKind::Word(self.read_chunk()) }
                else { self.skip_line(); return Ok(None); }
            }
            _ => {
                let chunk = self.read_chunk();
                if looks_numeric(&chunk) {
                    match chunk.parse() {
                        Ok(n) => TokenKind::Number(n),
                        Err(_) => {
                            return Err(Error::new(ErrorCode::C003, line, col,
                                format!("invalid number `{chunk}`")));
                        }
                    }
                } else {
                    TokenKind::Word(chunk)
                }
            }
        };

        let lexeme = String::from_utf8_lossy(&self.source[start..self.pos]).into_owned();
        Ok(Some(Token::new(kind, lexeme, line, col)))
    }

    // ─── Primitives ──────────────────────────────────────────────────────────

    fn advance(&mut self) -> u8 {
        let ch = self.source[self.pos];
        self.pos += 1;
        if ch == b'\n' { self.line += 1; self.column = 1; }
        else { self.column += 1; }
        ch
    }

    fn peek(&self) -> u8 {
        if self.is_at_end() { 0 } else { self.source[self.pos] }
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn skip_whitespace(&mut self) {
        while !self.is_at_end() && self.peek().is_ascii_whitespace() {
            self.advance();
        }
    }

    fn skip_line(&mut self) {
        while !self.is_at_end() && self.peek() != b'\n' { self.advance(); }
    }

    // ─── Readers ─────────────────────────────────────────────────────────────

    /// `#` followed by 6 hex digits is a colour, not a comment.
    fn is_hex_sequence(&self) -> bool {
        self.pos + 7 <= self.source.len()
            && self.source[self.pos + 1..self.pos + 7].iter().all(|b| b.is_ascii_hexdigit())
    }

    /// Everything up to the next whitespace byte.
    fn read_chunk(&mut self) -> String {
        let start = self.pos;
        while !self.is_at_end() && !self.peek().is_ascii_whitespace() {
            self.advance();
        }
        String::from_utf8_lossy(&self.source[start..self.pos]).into_owned()
    }

    fn read_string(&mut self, start_line: usize, start_col: usize) -> Result<String, Error> {
        let mut bytes = Vec::new();
        loop {
            if self.is_at_end() || self.peek() == b'\n' {
                return Err(Error::new(ErrorCode::C004, start_line, start_col,
                    "unterminated string literal"));
            }
            let ch = self.advance();
            if ch == b'"' { break; }
            if ch == b'\\' && !self.is_at_end() {
                match self.advance() {
                    b'n'  => bytes.push(b'\n'),
                    b't'  => bytes.push(b'\t'),
                    other => bytes.push(other),
                }
            } else {
                bytes.push(ch);
            }
        }
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Starts like a number: a digit, or a sign / point followed by one.
fn looks_numeric(chunk: &str) -> bool {
    let b = chunk.as_bytes();
    match b.first() {
        Some(c) if c.is_ascii_digit() => true,
        Some(b'-' | b'+') => match b.get(1) {
            Some(c) if c.is_ascii_digit() => true,
            Some(b'.') => b.get(2).is_some_and(u8::is_ascii_digit),
            _ => false,
        },
        Some(b'.') => b.get(1).is_some_and(u8::is_ascii_digit),
        _ => false,
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(src: &str) -> Vec<TokenKind> {
        Lexer::new(src).tokenize().unwrap().into_iter().map(|t| t.kind).collect()
    }

    fn lex_err(src: &str) -> Vec<Error> {
        Lexer::new(src).tokenize().unwrap_err()
    }

    #[test]
    fn empty() {
        assert_eq!(lex(""), vec![TokenKind::Eof]);
    }

    #[test]
    fn numbers() {
        assert_eq!(lex("42 -1.5 .5 +3"), vec![
            TokenKind::Number(42.0),
            TokenKind::Number(-1.5),
            TokenKind::Number(0.5),
            TokenKind::Number(3.0),
            TokenKind::Eof,
        ]);
    }

    #[test]
    fn operators_are_words() {
        assert_eq!(lex("+ - dup"), vec![
            TokenKind::Word("+".into()),
            TokenKind::Word("-".into()),
            TokenKind::Word("dup".into()),
            TokenKind::Eof,
        ]);
    }

    #[test]
    fn symbol_and_string() {
        assert_eq!(lex(r#"'x "two words""#), vec![
            TokenKind::Symbol("x".into()),
            TokenKind::Str("two words".into()),
            TokenKind::Eof,
        ]);
    }

    #[test]
    fn string_escapes() {
        assert_eq!(lex(r#""a\"b\n""#), vec![TokenKind::Str("a\"b\n".into()), TokenKind::Eof]);
    }

    #[test]
    fn hex_colour_is_a_word_and_hash_is_a_comment() {
        assert_eq!(lex("#ff0000"), vec![TokenKind::Word("#ff0000".into()), TokenKind::Eof]);
        assert_eq!(lex("1 # note\n2"), vec![TokenKind::Number(1.0), TokenKind::Number(2.0), TokenKind::Eof]);
    }

    #[test]
    fn lexeme_keeps_source_text() {
        let tokens = Lexer::new("007").tokenize().unwrap();
        assert_eq!(tokens[0].lexeme, "007");
        assert_eq!(tokens[0].text(), Some("007"));
    }

    #[test]
    fn bad_number() {
        let errs = lex_err("1.2.3");
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].code, ErrorCode::C003);
    }

    #[test]
    fn unterminated_string() {
        let errs = lex_err(r#""oops"#);
        assert_eq!(errs[0].code, ErrorCode::C004);
    }

    #[test]
    fn empty_symbol() {
        assert_eq!(lex_err("' x")[0].code, ErrorCode::C005);
    }

    #[test]
    fn line_and_column_tracking() {
        let tokens = Lexer::new("a\n  b").starting_at(5).tokenize().unwrap();
        assert_eq!((tokens[0].line, tokens[0].column), (5, 1));
        assert_eq!((tokens[1].line, tokens[1].column), (6, 3));
    }
}
