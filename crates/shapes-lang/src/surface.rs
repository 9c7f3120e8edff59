//! Contracts the core drives but does not implement: the rendering surface
//! that materializes shapes as nodes, and the display sink behind `show`.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::info;

use crate::types::shape::ShapeKind;

/// Container id of the top-level node; every unbound shape lives here.
pub const ROOT: &str = "root";

/// Id of the grouping node `bind` creates for a parent/child pair.
pub fn group_id(parent: &str, child: &str) -> String {
    format!("{parent}+{child}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Shape(ShapeKind),
    Group,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Number(f64),
    Text(String),
    /// Rotation in degrees around (cx, cy), in surface coordinates.
    Rotate { angle: f64, cx: f64, cy: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: &'static str,
    pub value: AttrValue,
}

impl Attribute {
    pub fn new(name: &'static str, value: AttrValue) -> Self { Self { name, value } }
}

/// Retained node tree the scene primitives keep in sync with shape records.
///
/// A node belongs to exactly one container; `append_child` moves it there
/// from wherever it was. Operations on unknown ids are ignored.
pub trait RenderSurface {
    fn create_node(&mut self, kind: ShapeKind, id: &str);
    fn get_node(&self, id: &str) -> Option<NodeKind>;
    /// Set (or replace) the named attributes, keeping any others.
    fn set_attributes(&mut self, id: &str, attributes: &[Attribute]);
    fn create_group(&mut self, group_id: &str);
    fn append_child(&mut self, container_id: &str, id: &str);
    fn remove_child(&mut self, container_id: &str, id: &str);
    fn delete_node(&mut self, id: &str);
}

impl<S: RenderSurface> RenderSurface for Rc<RefCell<S>> {
    fn create_node(&mut self, kind: ShapeKind, id: &str) { self.borrow_mut().create_node(kind, id) }
    fn get_node(&self, id: &str) -> Option<NodeKind> { self.borrow().get_node(id) }
    fn set_attributes(&mut self, id: &str, attributes: &[Attribute]) { self.borrow_mut().set_attributes(id, attributes) }
    fn create_group(&mut self, group_id: &str) { self.borrow_mut().create_group(group_id) }
    fn append_child(&mut self, container_id: &str, id: &str) { self.borrow_mut().append_child(container_id, id) }
    fn remove_child(&mut self, container_id: &str, id: &str) { self.borrow_mut().remove_child(container_id, id) }
    fn delete_node(&mut self, id: &str) { self.borrow_mut().delete_node(id) }
}

/// Surface that draws nothing. Every lookup misses.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSurface;

impl RenderSurface for NullSurface {
    fn create_node(&mut self, _kind: ShapeKind, _id: &str) {}
    fn get_node(&self, _id: &str) -> Option<NodeKind> { None }
    fn set_attributes(&mut self, _id: &str, _attributes: &[Attribute]) {}
    fn create_group(&mut self, _group_id: &str) {}
    fn append_child(&mut self, _container_id: &str, _id: &str) {}
    fn remove_child(&mut self, _container_id: &str, _id: &str) {}
    fn delete_node(&mut self, _id: &str) {}
}

// ─── Display ──────────────────────────────────────────────────────────────────

pub trait DisplaySink {
    fn display(&mut self, text: &str);
}

impl DisplaySink for Vec<String> {
    fn display(&mut self, text: &str) { self.push(text.to_string()); }
}

impl<D: DisplaySink> DisplaySink for Rc<RefCell<D>> {
    fn display(&mut self, text: &str) { self.borrow_mut().display(text) }
}

/// Sends `show` output to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DisplaySink for TracingSink {
    fn display(&mut self, text: &str) {
        info!(target: "shapes::show", "{text}");
    }
}
