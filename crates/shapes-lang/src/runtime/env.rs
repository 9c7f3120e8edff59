use std::collections::HashMap;

use crate::error::RuntimeError;
use crate::runtime::value::Value;
use crate::types::shape::Shape;

/// The session namespace.
///
/// Ordinary bindings (`def`, library definitions) and registered shapes are
/// kept in separate tables. `lookup` reads bindings first and then shapes, so
/// a variable may shadow a shape id during word resolution, but `define`
/// can never overwrite or drop a shape record, and `register` never touches
/// a binding.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    bindings: HashMap<String, Value>,
    shapes: HashMap<String, Shape>,
}

impl Environment {
    pub fn new() -> Self { Self::default() }

    // ─── Bindings ─────────────────────────────────────────────────────────────

    pub fn define(&mut self, key: impl Into<String>, value: Value) -> &mut Self {
        self.bindings.insert(key.into(), value);
        self
    }

    pub fn lookup(&self, word: &str) -> Result<Value, RuntimeError> {
        if let Some(v) = self.bindings.get(word) {
            return Ok(v.clone());
        }
        self.shapes.get(word)
            .map(|s| Value::Shape(s.clone()))
            .ok_or_else(|| RuntimeError::UndefinedWord(word.to_string()))
    }

    pub fn is_defined(&self, word: &str) -> bool {
        self.bindings.contains_key(word) || self.shapes.contains_key(word)
    }

    /// Names of all ordinary bindings, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.bindings.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    // ─── Shape registry ───────────────────────────────────────────────────────

    pub fn register(&mut self, id: impl Into<String>, shape: Shape) {
        self.shapes.insert(id.into(), shape);
    }

    pub fn unregister(&mut self, id: &str) -> Result<Shape, RuntimeError> {
        self.shapes.remove(id).ok_or_else(|| RuntimeError::UnknownShape(id.to_string()))
    }

    pub fn shape(&self, id: &str) -> Result<&Shape, RuntimeError> {
        self.shapes.get(id).ok_or_else(|| RuntimeError::UnknownShape(id.to_string()))
    }

    pub fn shape_mut(&mut self, id: &str) -> Result<&mut Shape, RuntimeError> {
        self.shapes.get_mut(id).ok_or_else(|| RuntimeError::UnknownShape(id.to_string()))
    }

    pub fn has_shape(&self, id: &str) -> bool { self.shapes.contains_key(id) }

    /// Registered shape ids, sorted.
    pub fn shape_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.shapes.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    // ─── Graph queries ────────────────────────────────────────────────────────

    /// Topmost ancestor of `id`, or `id` itself when it has no parent.
    pub fn root_of(&self, id: &str) -> Result<String, RuntimeError> {
        let mut current = id.to_string();
        for _ in 0..=self.shapes.len() {
            match &self.shape(&current)?.bindings.parent {
                Some(p) => current = p.clone(),
                None => return Ok(current),
            }
        }
        Err(RuntimeError::InvalidBinding(format!("parent chain of `{id}` is cyclic")))
    }

    /// Whether `ancestor` appears on the parent chain of `id` (or is `id`).
    pub fn is_ancestor(&self, ancestor: &str, id: &str) -> bool {
        let mut current = Some(id.to_string());
        for _ in 0..=self.shapes.len() {
            match current {
                Some(ref c) if c == ancestor => return true,
                Some(c) => current = self.shapes.get(&c).and_then(|s| s.bindings.parent.clone()),
                None => return false,
            }
        }
        false
    }

    /// Verify the scene-graph invariants: edges are mirrored on both ends,
    /// point at registered shapes, children are listed once, and no parent
    /// chain loops.
    pub fn check_graph(&self) -> Result<(), RuntimeError> {
        let broken = |msg: String| Err(RuntimeError::InvalidBinding(msg));
        for id in self.shape_ids() {
            let shape = &self.shapes[id];
            if let Some(p) = &shape.bindings.parent {
                match self.shapes.get(p) {
                    None => return broken(format!("`{id}` has unregistered parent `{p}`")),
                    Some(parent) if !parent.bindings.children.iter().any(|c| c == id) =>
                        return broken(format!("`{p}` does not list child `{id}`")),
                    Some(_) => {}
                }
            }
            for (i, c) in shape.bindings.children.iter().enumerate() {
                if shape.bindings.children[..i].contains(c) {
                    return broken(format!("`{id}` lists child `{c}` twice"));
                }
                match self.shapes.get(c) {
                    None => return broken(format!("`{id}` has unregistered child `{c}`")),
                    Some(child) if child.bindings.parent.as_deref() != Some(id) =>
                        return broken(format!("`{c}` does not point back to parent `{id}`")),
                    Some(_) => {}
                }
            }
            self.root_of(id)?;
        }
        Ok(())
    }
}
