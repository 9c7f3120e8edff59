use std::fmt;
use std::rc::Rc;

use crate::error::RuntimeError;
use crate::runtime::stack::Stack;
use crate::types::shape::Shape;
use crate::Runtime;

/// Native operation signature: takes the stack, hands back the resulting stack.
pub type PrimitiveFn = dyn Fn(&mut Runtime, Stack) -> Result<Stack, RuntimeError>;

/// A named native operation. Cloning shares the underlying function.
#[derive(Clone)]
pub struct Primitive {
    name: Rc<str>,
    func: Rc<PrimitiveFn>,
}

impl Primitive {
    pub fn new(
        name: &str,
        func: impl Fn(&mut Runtime, Stack) -> Result<Stack, RuntimeError> + 'static,
    ) -> Self {
        Self { name: name.into(), func: Rc::new(func) }
    }

    pub fn name(&self) -> &str { &self.name }

    pub fn apply(&self, rt: &mut Runtime, stack: Stack) -> Result<Stack, RuntimeError> {
        (self.func)(rt, stack)
    }
}

impl fmt::Debug for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Primitive({})", self.name)
    }
}

impl PartialEq for Primitive {
    fn eq(&self, other: &Self) -> bool { Rc::ptr_eq(&self.func, &other.func) }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Str(Rc<str>),
    /// Resolved through the environment before execution.
    Word(Rc<str>),
    /// Literal identifier, never looked up.
    Symbol(Rc<str>),
    Primitive(Primitive),
    Shape(Shape),
}

impl Value {
    pub fn number(v: f64) -> Self { Self::Number(v) }
    pub fn string(s: impl AsRef<str>) -> Self { Self::Str(s.as_ref().into()) }
    pub fn word(s: impl AsRef<str>) -> Self { Self::Word(s.as_ref().into()) }
    pub fn symbol(s: impl AsRef<str>) -> Self { Self::Symbol(s.as_ref().into()) }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Number(_)    => "number",
            Self::Str(_)       => "string",
            Self::Word(_)      => "word",
            Self::Symbol(_)    => "symbol",
            Self::Primitive(_) => "primitive",
            Self::Shape(_)     => "shape",
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n)    => write!(f, "number({n})"),
            Self::Str(s)       => write!(f, "string({s:?})"),
            Self::Word(w)      => write!(f, "word({w})"),
            Self::Symbol(s)    => write!(f, "symbol({s})"),
            Self::Primitive(p) => write!(f, "primitive({})", p.name()),
            Self::Shape(s)     => {
                let values: Vec<String> = s.geometry.values().iter().map(|v| v.to_string()).collect();
                write!(f, "{}({})", s.kind().name(), values.join(", "))
            }
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self { Self::Number(v) }
}

impl From<Shape> for Value {
    fn from(s: Shape) -> Self { Self::Shape(s) }
}
