#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Number(f64),
    Str(String),    // "quoted", escapes resolved
    Symbol(String), // 'name, quote stripped
    Word(String),   // anything else: verbs, ids, operators, #rrggbb
    Eof,
}

impl TokenKind {
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Str(_)    => "string",
            Self::Symbol(_) => "symbol",
            Self::Word(_)   => "word",
            Self::Eof       => "end of line",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Source text of the token, as typed.
    pub lexeme: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: usize, column: usize) -> Self {
        Self { kind, lexeme: lexeme.into(), line, column }
    }

    /// Name-like text of the token: the contents of a word, string or symbol,
    /// or the lexeme of a number.
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Word(s) | TokenKind::Str(s) | TokenKind::Symbol(s) => Some(s),
            TokenKind::Number(_) => Some(&self.lexeme),
            TokenKind::Eof => None,
        }
    }
}
