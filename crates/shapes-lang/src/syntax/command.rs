//! One human-typed command per line, encoded as a program for the runtime.
//!
//! Verbs with a fixed shape (`add`, `pin`, `rotate`, ...) take their arguments
//! in reading order and are rewritten into the stack order the primitive pops.
//! Any other line is read as a raw program.

use crate::error::{Error, ErrorCode};
use crate::runtime::value::Value;
use crate::syntax::lexer::Lexer;
use crate::syntax::token::{Token, TokenKind};
use crate::types::shape::{Geometry, Shape, ShapeKind};

/// Parse line number `line` of some input into a program. Blank and comment
/// lines give an empty program.
pub fn parse_line(line: usize, src: &str) -> Result<Vec<Value>, Error> {
    let mut tokens = Lexer::new(src).starting_at(line).tokenize().map_err(|mut errs| errs.remove(0))?;
    let eof = tokens.pop().unwrap_or_else(|| Token::new(TokenKind::Eof, "", line, 1));

    let Some((head, args)) = tokens.split_first() else { return Ok(Vec::new()) };
    Command { verb: head, args, eof: &eof }.encode()
}

/// Parse every line of `src`. Empty programs are dropped; all parse errors
/// are collected.
pub fn parse_script(src: &str) -> Result<Vec<Vec<Value>>, Vec<Error>> {
    let mut programs = Vec::new();
    let mut errors = Vec::new();

    for (i, line) in src.lines().enumerate() {
        match parse_line(i + 1, line) {
            Ok(p) if p.is_empty() => {}
            Ok(p) => programs.push(p),
            Err(e) => errors.push(e),
        }
    }

    if errors.is_empty() { Ok(programs) } else { Err(errors) }
}

// ─── Verbs ────────────────────────────────────────────────────────────────────

struct Command<'a> {
    verb: &'a Token,
    args: &'a [Token],
    eof: &'a Token,
}

impl Command<'_> {
    fn encode(&self) -> Result<Vec<Value>, Error> {
        let TokenKind::Word(verb) = &self.verb.kind else { return Ok(self.raw()) };
        let a = self.args;

        match verb.as_str() {
            "add" => self.add(),
            "remove" => {
                self.arity(1, 1, "remove <id>")?;
                Ok(vec![id(&a[0]), Value::word("remove")])
            }
            "stop" => {
                self.arity(1, 1, "stop <id>")?;
                Ok(vec![id(&a[0]), Value::word("stop")])
            }
            "pin" => {
                self.arity(3, 3, "pin <id> <x> <y>")?;
                Ok(vec![num(&a[2])?, num(&a[1])?, id(&a[0]), Value::word("pin")])
            }
            "rotate" => {
                self.arity(2, 3, "rotate <id> <angle> [<rate>]")?;
                let mut program = Vec::with_capacity(4);
                if let Some(rate) = a.get(2) {
                    program.push(num(rate)?);
                }
                program.extend([num(&a[1])?, id(&a[0]), Value::word("rotate")]);
                Ok(program)
            }
            "move" => {
                self.arity(3, 3, "move <id> <vx> <vy>")?;
                Ok(vec![num(&a[2])?, num(&a[1])?, id(&a[0]), Value::word("move")])
            }
            "modify" => {
                self.arity(4, 5, "modify <id> <v1> <v2> <v3> [<v4>]")?;
                let mut program = a[1..].iter().rev().map(num).collect::<Result<Vec<_>, _>>()?;
                program.extend([id(&a[0]), Value::word("modify")]);
                Ok(program)
            }
            "bind" => {
                self.arity(4, 4, "bind <parent> <child> <x> <y>")?;
                Ok(vec![num(&a[3])?, num(&a[2])?, id(&a[1]), id(&a[0]), Value::word("bind")])
            }
            "show" => {
                if a.is_empty() {
                    return Err(self.wrong_count("show <text>"));
                }
                let text = a.iter().map(|t| t.lexeme.as_str()).collect::<Vec<_>>().join(" ");
                Ok(vec![Value::string(text), Value::word("show")])
            }
            _ => Ok(self.raw()),
        }
    }

    /// `add <kind> <id> <n>... [fill]`
    fn add(&self) -> Result<Vec<Value>, Error> {
        let Some(kind_tok) = self.args.first() else {
            return Err(self.wrong_count("add circle|rect <id> ..."));
        };
        let kind = kind_tok.text()
            .and_then(ShapeKind::parse)
            .ok_or_else(|| Error::new(ErrorCode::C001, kind_tok.line, kind_tok.column,
                format!("unknown shape kind `{}`, expected circle or rect", kind_tok.lexeme)))?;

        let usage = match kind {
            ShapeKind::Circle => "add circle <id> <cx> <cy> <r> [fill]",
            ShapeKind::Rect   => "add rect <id> <x> <y> <width> <height> [fill]",
        };
        let n = kind.arity();
        self.arity(n + 2, n + 3, usage)?;

        let values = self.args[2..2 + n].iter().map(number).collect::<Result<Vec<_>, _>>()?;
        let geometry = Geometry::from_values(kind, &values).ok_or_else(|| self.wrong_count(usage))?;
        let mut shape = Shape::new(geometry);
        if let Some(fill) = self.args.get(n + 2) {
            shape = shape.with_fill(fill.text().unwrap_or_default());
        }
        Ok(vec![Value::Shape(shape), id(&self.args[1]), Value::word("add")])
    }

    fn raw(&self) -> Vec<Value> {
        std::iter::once(self.verb).chain(self.args).filter_map(literal).collect()
    }

    fn arity(&self, min: usize, max: usize, usage: &str) -> Result<(), Error> {
        if (min..=max).contains(&self.args.len()) { Ok(()) } else { Err(self.wrong_count(usage)) }
    }

    fn wrong_count(&self, usage: &str) -> Error {
        let found = self.args.len();
        let at = self.args.get(found.saturating_sub(1)).unwrap_or(self.eof);
        Error::new(ErrorCode::C002, at.line, at.column,
            format!("wrong number of arguments ({found}), usage: {usage}"))
    }
}

// ─── Token conversions ────────────────────────────────────────────────────────

fn id(tok: &Token) -> Value {
    Value::string(tok.text().unwrap_or_default())
}

fn number(tok: &Token) -> Result<f64, Error> {
    match tok.kind {
        TokenKind::Number(n) => Ok(n),
        ref other => Err(Error::new(ErrorCode::C003, tok.line, tok.column,
            format!("expected a number, found {} `{}`", other.describe(), tok.lexeme))),
    }
}

fn num(tok: &Token) -> Result<Value, Error> {
    number(tok).map(Value::Number)
}

fn literal(tok: &Token) -> Option<Value> {
    match &tok.kind {
        TokenKind::Number(n) => Some(Value::Number(*n)),
        TokenKind::Str(s)    => Some(Value::string(s)),
        TokenKind::Symbol(s) => Some(Value::symbol(s)),
        TokenKind::Word(w)   => Some(Value::word(w)),
        TokenKind::Eof       => None,
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
