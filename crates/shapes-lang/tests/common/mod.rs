//! Shared fixtures: a surface that records the node tree, and a session
//! wired to it.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use shapes_lang::surface::ROOT;
use shapes_lang::{
    AttrValue, Attribute, Input, NodeKind, RenderSurface, Runtime, RuntimeError, ShapeKind, Stack, Value,
};

// ─── Recording surface ───────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub attributes: Vec<Attribute>,
    pub container: Option<String>,
}

#[derive(Debug, Default)]
pub struct Recorder {
    pub nodes: HashMap<String, Node>,
}

impl Recorder {
    pub fn node(&self, id: &str) -> &Node {
        self.nodes.get(id).unwrap_or_else(|| panic!("no node `{id}`"))
    }

    pub fn attr(&self, id: &str, name: &str) -> AttrValue {
        self.node(id).attributes.iter()
            .find(|a| a.name == name)
            .map(|a| a.value.clone())
            .unwrap_or_else(|| panic!("node `{id}` has no attribute `{name}`"))
    }

    pub fn number(&self, id: &str, name: &str) -> f64 {
        match self.attr(id, name) {
            AttrValue::Number(n) => n,
            other => panic!("expected number for `{id}.{name}`, got {other:?}"),
        }
    }

    pub fn angle(&self, id: &str) -> f64 {
        match self.attr(id, "transform") {
            AttrValue::Rotate { angle, .. } => angle,
            other => panic!("expected rotation for `{id}`, got {other:?}"),
        }
    }

    pub fn container(&self, id: &str) -> Option<&str> {
        self.node(id).container.as_deref()
    }

    pub fn has(&self, id: &str) -> bool { self.nodes.contains_key(id) }
}

impl RenderSurface for Recorder {
    fn create_node(&mut self, kind: ShapeKind, id: &str) {
        self.nodes.insert(id.to_string(), Node { kind: NodeKind::Shape(kind), attributes: Vec::new(), container: None });
    }

    fn get_node(&self, id: &str) -> Option<NodeKind> { self.nodes.get(id).map(|n| n.kind) }

    fn set_attributes(&mut self, id: &str, attributes: &[Attribute]) {
        let Some(node) = self.nodes.get_mut(id) else { return };
        for a in attributes {
            match node.attributes.iter_mut().find(|old| old.name == a.name) {
                Some(old) => old.value = a.value.clone(),
                None => node.attributes.push(a.clone()),
            }
        }
    }

    fn create_group(&mut self, group_id: &str) {
        self.nodes.entry(group_id.to_string())
            .or_insert(Node { kind: NodeKind::Group, attributes: Vec::new(), container: None });
    }

    fn append_child(&mut self, container_id: &str, id: &str) {
        if container_id != ROOT && !self.nodes.contains_key(container_id) { return }
        if let Some(node) = self.nodes.get_mut(id) {
            node.container = Some(container_id.to_string());
        }
    }

    fn remove_child(&mut self, container_id: &str, id: &str) {
        if let Some(node) = self.nodes.get_mut(id) {
            if node.container.as_deref() == Some(container_id) {
                node.container = None;
            }
        }
    }

    fn delete_node(&mut self, id: &str) {
        if self.nodes.remove(id).is_none() { return }
        for node in self.nodes.values_mut() {
            if node.container.as_deref() == Some(id) {
                node.container = Some(ROOT.to_string());
            }
        }
    }
}

// ─── Session helpers ─────────────────────────────────────────────────────────

pub type Shared<T> = Rc<RefCell<T>>;

pub struct Session {
    pub rt: Runtime,
    pub surface: Shared<Recorder>,
    pub shown: Shared<Vec<String>>,
}

pub fn session() -> Session {
    let surface = Rc::new(RefCell::new(Recorder::default()));
    let shown = Rc::new(RefCell::new(Vec::new()));
    let rt = Runtime::new(surface.clone(), shown.clone());
    Session { rt, surface, shown }
}

impl Session {
    /// Run command lines in order, panicking on any failure.
    pub fn exec(&mut self, lines: &[&str]) -> Stack {
        let mut last = Stack::new();
        for line in lines {
            last = self.rt.exec_line(line).unwrap_or_else(|e| panic!("`{line}` failed: {e}"));
        }
        last
    }

    pub fn exec_err(&mut self, line: &str) -> RuntimeError {
        match self.rt.exec_line(line) {
            Ok(stack) => panic!("expected `{line}` to fail, got stack {:?}", stack.as_slice()),
            Err(shapes_lang::ExecError::Runtime(e)) => e,
            Err(e) => panic!("expected a runtime error for `{line}`, got {e}"),
        }
    }

    /// Advance the clock by `secs` in one tick.
    pub fn advance(&mut self, secs: f64) {
        self.rt.tick(&Input { dt: secs });
    }

    pub fn position(&self, id: &str) -> (f64, f64) {
        self.rt.env().shape(id).unwrap_or_else(|e| panic!("{e}")).position()
    }

    pub fn rotation(&self, id: &str) -> f64 {
        self.rt.env().shape(id).unwrap_or_else(|e| panic!("{e}")).rotation
    }

    pub fn parent(&self, id: &str) -> Option<String> {
        self.rt.env().shape(id).unwrap_or_else(|e| panic!("{e}")).bindings.parent.clone()
    }

    pub fn children(&self, id: &str) -> Vec<String> {
        self.rt.env().shape(id).unwrap_or_else(|e| panic!("{e}")).bindings.children.clone()
    }
}

pub fn numbers(stack: &Stack) -> Vec<f64> {
    stack.as_slice().iter().map(|v| match v {
        Value::Number(n) => *n,
        other => panic!("expected number on stack, got {other}"),
    }).collect()
}
