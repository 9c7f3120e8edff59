//! The node tree behind `RenderSurface`.
//!
//! Every node lives in a flat map keyed by id and records its container, so
//! `append_child` is a move: the node leaves its old container first. The
//! root group always exists and cannot be moved or deleted.

use std::collections::HashMap;

use tracing::{debug, warn};

use shapes_lang::surface::ROOT;
use shapes_lang::{AttrValue, Attribute, NodeKind, RenderSurface, ShapeKind};

use crate::color::{parse_color, Rgba};
use crate::tessellate::{self, DrawItem, RenderMode};

/// Stroke width of circle outlines, in pixels.
pub const OUTLINE_WIDTH: f32 = 2.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    /// In the order they were first set.
    pub attributes: Vec<Attribute>,
    pub children: Vec<String>,
    pub parent: Option<String>,
}

impl Node {
    fn new(kind: NodeKind) -> Self {
        Self { kind, attributes: Vec::new(), children: Vec::new(), parent: None }
    }

    pub fn attribute(&self, name: &str) -> Option<&AttrValue> {
        self.attributes.iter().find(|a| a.name == name).map(|a| &a.value)
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        match self.attribute(name)? {
            AttrValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Scene {
    nodes: HashMap<String, Node>,
}

impl Scene {
    pub fn new() -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(ROOT.to_string(), Node::new(NodeKind::Group));
        Self { nodes }
    }

    // ─── Queries ──────────────────────────────────────────────────────────────

    pub fn node(&self, id: &str) -> Option<&Node> { self.nodes.get(id) }

    pub fn contains(&self, id: &str) -> bool { self.nodes.contains_key(id) }

    /// Container of `id`; `None` for the root and for detached nodes.
    pub fn container(&self, id: &str) -> Option<&str> {
        self.nodes.get(id)?.parent.as_deref()
    }

    pub fn children(&self, id: &str) -> &[String] {
        self.nodes.get(id).map(|n| n.children.as_slice()).unwrap_or_default()
    }

    /// Number of nodes, the root included.
    pub fn len(&self) -> usize { self.nodes.len() }

    pub fn is_empty(&self) -> bool { self.nodes.len() == 1 }

    /// Whether `ancestor` is `id` or contains it, directly or through groups.
    pub fn is_within(&self, id: &str, ancestor: &str) -> bool {
        let mut current = Some(id);
        while let Some(c) = current {
            if c == ancestor {
                return true;
            }
            current = self.container(c);
        }
        false
    }

    // ─── Drawing ──────────────────────────────────────────────────────────────

    /// Shapes reachable from the root, in paint order: depth first, each
    /// container's children in append order. Detached nodes are not drawn.
    pub fn draw_list(&self) -> Vec<DrawItem> {
        let mut items = Vec::new();
        let mut pending: Vec<&str> = self.children(ROOT).iter().rev().map(String::as_str).collect();

        while let Some(id) = pending.pop() {
            let Some(node) = self.nodes.get(id) else { continue };
            match node.kind {
                NodeKind::Group => pending.extend(node.children.iter().rev().map(String::as_str)),
                NodeKind::Shape(kind) => match draw_item(id, kind, node) {
                    Some(item) => items.push(item),
                    None => debug!(id, "node has incomplete geometry, not drawn"),
                },
            }
        }
        items
    }

    // ─── Tree edits ───────────────────────────────────────────────────────────

    fn detach(&mut self, id: &str) {
        let Some(parent) = self.nodes.get_mut(id).and_then(|n| n.parent.take()) else { return };
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.retain(|c| c != id);
        }
    }
}

impl Default for Scene {
    fn default() -> Self { Self::new() }
}

impl RenderSurface for Scene {
    fn create_node(&mut self, kind: ShapeKind, id: &str) {
        if id == ROOT {
            warn!("refusing to replace the root node");
            return;
        }
        match self.nodes.get_mut(id) {
            Some(node) => {
                node.kind = NodeKind::Shape(kind);
                node.attributes.clear();
            }
            None => {
                self.nodes.insert(id.to_string(), Node::new(NodeKind::Shape(kind)));
            }
        }
    }

    fn get_node(&self, id: &str) -> Option<NodeKind> {
        self.nodes.get(id).map(|n| n.kind)
    }

    fn set_attributes(&mut self, id: &str, attributes: &[Attribute]) {
        let Some(node) = self.nodes.get_mut(id) else {
            debug!(id, "set_attributes on unknown node");
            return;
        };
        for a in attributes {
            match node.attributes.iter_mut().find(|old| old.name == a.name) {
                Some(old) => old.value = a.value.clone(),
                None => node.attributes.push(a.clone()),
            }
        }
    }

    fn create_group(&mut self, group_id: &str) {
        self.nodes.entry(group_id.to_string()).or_insert_with(|| Node::new(NodeKind::Group));
    }

    fn append_child(&mut self, container_id: &str, id: &str) {
        if id == ROOT || !self.contains(id) {
            debug!(container_id, id, "append of unknown node ignored");
            return;
        }
        match self.nodes.get(container_id).map(|n| n.kind) {
            Some(NodeKind::Group) => {}
            _ => {
                debug!(container_id, id, "append into a missing or non-group container ignored");
                return;
            }
        }
        if self.is_within(container_id, id) {
            warn!(container_id, id, "append would nest a node inside itself");
            return;
        }

        self.detach(id);
        if let Some(c) = self.nodes.get_mut(container_id) {
            c.children.push(id.to_string());
        }
        if let Some(n) = self.nodes.get_mut(id) {
            n.parent = Some(container_id.to_string());
        }
    }

    fn remove_child(&mut self, container_id: &str, id: &str) {
        if self.container(id) == Some(container_id) {
            self.detach(id);
        }
    }

    /// Children of a deleted node move to the root.
    fn delete_node(&mut self, id: &str) {
        if id == ROOT || !self.contains(id) {
            return;
        }
        self.detach(id);
        let Some(node) = self.nodes.remove(id) else { return };
        for child in node.children {
            if let Some(c) = self.nodes.get_mut(&child) {
                c.parent = None;
            }
            self.append_child(ROOT, &child);
        }
    }
}

// ─── Tessellation ─────────────────────────────────────────────────────────────

fn draw_item(id: &str, kind: ShapeKind, node: &Node) -> Option<DrawItem> {
    let n = |name: &str| node.number(name);
    let points = match kind {
        ShapeKind::Circle => tessellate::circle(n("cx")?, n("cy")?, n("r")?),
        ShapeKind::Rect   => tessellate::rect(n("x")?, n("y")?, n("width")?, n("height")?),
    };
    let points = match node.attribute("transform") {
        Some(AttrValue::Rotate { angle, cx, cy }) => tessellate::rotate(points, *angle, *cx, *cy),
        _ => points,
    };
    let color = match node.attribute("fill") {
        Some(AttrValue::Text(fill)) => parse_color(fill).unwrap_or_else(|| {
            debug!(id, fill = %fill, "unknown fill, using black");
            Rgba::BLACK
        }),
        _ => Rgba::BLACK,
    };
    let mode = match kind {
        ShapeKind::Circle => RenderMode::Outline(OUTLINE_WIDTH),
        ShapeKind::Rect   => RenderMode::Fill,
    };
    Some(DrawItem { id: id.to_string(), kind, points, mode, color })
}
