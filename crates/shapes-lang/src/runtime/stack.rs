use std::rc::Rc;

use crate::error::RuntimeError;
use crate::runtime::value::Value;
use crate::types::shape::Shape;

/// Default number of entries `top_items` reports.
pub const SHOW_DEPTH: usize = 20;

/// LIFO value stack. The top is the most recently pushed value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stack(Vec<Value>);

impl Stack {
    pub fn new() -> Self { Self(Vec::new()) }

    pub fn push(&mut self, v: Value) { self.0.push(v); }

    /// Push and hand the stack back, for building stacks inline.
    pub fn with(mut self, v: impl Into<Value>) -> Self {
        self.0.push(v.into());
        self
    }

    pub fn pop(&mut self) -> Result<Value, RuntimeError> {
        self.0.pop().ok_or(RuntimeError::StackUnderflow { needed: 1, depth: 0 })
    }

    /// Value at depth `i` (0 = top) without removing it.
    pub fn peek(&self, i: usize) -> Result<&Value, RuntimeError> {
        let depth = self.depth();
        if i >= depth {
            return Err(RuntimeError::StackUnderflow { needed: i + 1, depth });
        }
        Ok(&self.0[depth - 1 - i])
    }

    pub fn depth(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    /// Bottom-to-top view.
    pub fn as_slice(&self) -> &[Value] { &self.0 }

    pub fn into_vec(self) -> Vec<Value> { self.0 }

    /// Up to `n` values, top first.
    pub fn top_items(&self, n: usize) -> impl Iterator<Item = &Value> {
        self.0.iter().rev().take(n)
    }

    // ─── Typed pops ──────────────────────────────────────────────────────────

    pub fn pop_number(&mut self) -> Result<f64, RuntimeError> {
        match self.pop()? {
            Value::Number(n) => Ok(n),
            other => Err(RuntimeError::mismatch("number", &other)),
        }
    }

    /// Shape ids travel as strings; symbols are accepted too so that
    /// hand-written programs can say `'a remove`.
    pub fn pop_id(&mut self) -> Result<Rc<str>, RuntimeError> {
        match self.pop()? {
            Value::Str(s) | Value::Symbol(s) => Ok(s),
            other => Err(RuntimeError::mismatch("string", &other)),
        }
    }

    pub fn pop_symbol(&mut self) -> Result<Rc<str>, RuntimeError> {
        match self.pop()? {
            Value::Symbol(s) => Ok(s),
            other => Err(RuntimeError::mismatch("symbol", &other)),
        }
    }

    pub fn pop_shape(&mut self) -> Result<Shape, RuntimeError> {
        match self.pop()? {
            Value::Shape(s) => Ok(s),
            other => Err(RuntimeError::mismatch("shape", &other)),
        }
    }

    /// Pops the top value only if it is a number; anything else stays put.
    pub fn pop_optional_number(&mut self) -> Option<f64> {
        let n = self.0.last()?.as_number()?;
        self.0.pop();
        Some(n)
    }
}

impl From<Vec<Value>> for Stack {
    fn from(v: Vec<Value>) -> Self { Self(v) }
}

impl FromIterator<Value> for Stack {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self { Self(iter.into_iter().collect()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pop_on_empty_underflows() {
        let mut s = Stack::new();
        assert_eq!(s.pop(), Err(RuntimeError::StackUnderflow { needed: 1, depth: 0 }));
    }

    #[test]
    fn peek_counts_from_top() {
        let s = Stack::new().with(1.0).with(2.0).with(3.0);
        assert_eq!(s.peek(0), Ok(&Value::Number(3.0)));
        assert_eq!(s.peek(2), Ok(&Value::Number(1.0)));
        assert_eq!(s.peek(3), Err(RuntimeError::StackUnderflow { needed: 4, depth: 3 }));
        assert_eq!(s.depth(), 3);
    }

    #[test]
    fn typed_pop_reports_found_type() {
        let mut s = Stack::new().with(Value::string("a"));
        assert_eq!(
            s.pop_number(),
            Err(RuntimeError::TypeMismatch { expected: "number", found: "string" })
        );
    }

    #[test]
    fn optional_number_leaves_other_values() {
        let mut s = Stack::new().with(Value::string("keep"));
        assert_eq!(s.pop_optional_number(), None);
        assert_eq!(s.depth(), 1);

        let mut s = Stack::new().with(4.0);
        assert_eq!(s.pop_optional_number(), Some(4.0));
        assert!(s.is_empty());
    }

    #[test]
    fn top_items_lists_top_first() {
        let s = Stack::new().with(1.0).with(2.0).with(3.0);
        let top: Vec<_> = s.top_items(2).cloned().collect();
        assert_eq!(top, vec![Value::Number(3.0), Value::Number(2.0)]);
    }
}
