use thiserror::Error as ThisError;

/// Command-line diagnostic codes. All `C` codes come from `syntax::command`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    C001, // unknown shape kind
    C002, // wrong argument count
    C003, // invalid number
    C004, // unterminated string literal
    C005, // empty symbol
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::C001 => "C001",
            Self::C002 => "C002",
            Self::C003 => "C003",
            Self::C004 => "C004",
            Self::C005 => "C005",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parse diagnostic for one command line.
#[derive(Debug, Clone, PartialEq, ThisError)]
#[error("[{code}] {line}:{column}: {message}")]
pub struct Error {
    pub code: ErrorCode,
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl Error {
    pub fn new(code: ErrorCode, line: usize, column: usize, message: impl Into<String>) -> Self {
        Self { code, line, column, message: message.into() }
    }
}

// ─── Runtime errors ───────────────────────────────────────────────────────────

/// Everything that can abort a `run`. Primitives validate their inputs before
/// touching the environment, so the failing instruction itself never leaves a
/// partial write behind.
#[derive(Debug, Clone, PartialEq, ThisError)]
pub enum RuntimeError {
    #[error("stack underflow: needed {needed} value(s), depth is {depth}")]
    StackUnderflow { needed: usize, depth: usize },

    #[error("undefined word `{0}`")]
    UndefinedWord(String),

    #[error("unknown shape `{0}`")]
    UnknownShape(String),

    #[error("type mismatch: expected {expected}, got {found}")]
    TypeMismatch { expected: &'static str, found: &'static str },

    #[error("invalid binding: {0}")]
    InvalidBinding(String),
}

impl RuntimeError {
    pub fn mismatch(expected: &'static str, found: &crate::Value) -> Self {
        Self::TypeMismatch { expected, found: found.type_name() }
    }
}

/// Failure of a whole command line: either it did not parse or it did not run.
#[derive(Debug, Clone, PartialEq, ThisError)]
pub enum ExecError {
    #[error(transparent)]
    Parse(#[from] Error),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}
