//! Scene-graph words: `add`, `bind`, `render`, `pin`, `modify`, `remove`.
//!
//! Shape records live in the environment; positions stored on a record are
//! local to its parent (if any). Only `render` converts to absolute surface
//! coordinates, by adding the parent's stored position, and it never writes
//! the result back to the record.

use tracing::debug;

use crate::error::RuntimeError;
use crate::runtime::env::Environment;
use crate::runtime::interpreter::call;
use crate::runtime::stack::Stack;
use crate::runtime::value::Value;
use crate::surface::{AttrValue, Attribute, NodeKind, ROOT, group_id};
use crate::types::shape::{Geometry, Shape};
use crate::Runtime;
use super::motion::halt;
use super::{Module, define_primitive};

pub struct SceneModule;

impl Module for SceneModule {
    fn name(&self) -> &'static str { "scene" }

    fn install(&self, env: &mut Environment) {
        define_primitive(env, "add", add);
        define_primitive(env, "bind", bind);
        define_primitive(env, "render", |rt, mut stack| {
            let id = stack.pop_id()?;
            render(rt, &id)?;
            Ok(stack)
        });
        define_primitive(env, "pin", pin);
        define_primitive(env, "modify", modify);
        define_primitive(env, "remove", remove);
    }
}

// ─── Primitives ───────────────────────────────────────────────────────────────

/// ( shape id -- )
fn add(rt: &mut Runtime, mut stack: Stack) -> Result<Stack, RuntimeError> {
    let id = stack.pop_id()?;
    let shape = stack.pop_shape()?;
    register(rt, &id, shape)?;
    Ok(stack)
}

/// ( y x child parent -- )
fn bind(rt: &mut Runtime, mut stack: Stack) -> Result<Stack, RuntimeError> {
    let parent = stack.pop_id()?;
    let child = stack.pop_id()?;
    let x = stack.pop_number()?;
    let y = stack.pop_number()?;

    let linked = check_binding(rt.env(), &parent, &child)?;

    rt.env_mut().shape_mut(&child)?.set_position((x, y));

    if !linked {
        rt.env_mut().shape_mut(&parent)?.bindings.children.push(child.to_string());
        rt.env_mut().shape_mut(&child)?.bindings.parent = Some(parent.to_string());
        debug!(%parent, %child, "bound");

        let group = group_id(&parent, &child);
        let surface = rt.surface_mut();
        surface.create_group(&group);
        surface.append_child(ROOT, &group);
        surface.append_child(&group, &parent);
        surface.append_child(&group, &child);
    }

    call(rt, "render", vec![Value::Str(child.clone())])?;
    render_children(rt, &child)?;
    Ok(stack)
}

/// ( y x id -- )
fn pin(rt: &mut Runtime, mut stack: Stack) -> Result<Stack, RuntimeError> {
    let id = stack.pop_id()?;
    let x = stack.pop_number()?;
    let y = stack.pop_number()?;

    let top = rt.env().root_of(&id)?;
    rt.env_mut().shape_mut(&top)?.set_position((x, y));
    render(rt, &top)?;
    render_children(rt, &top)?;
    Ok(stack)
}

/// ( vN .. v1 id -- ) with N = 3 for circles, 4 for rects; v1 is the first attribute.
fn modify(rt: &mut Runtime, mut stack: Stack) -> Result<Stack, RuntimeError> {
    let id = stack.pop_id()?;
    let kind = rt.env().shape(&id)?.kind();

    let values = (0..kind.arity())
        .map(|_| stack.pop_number())
        .collect::<Result<Vec<_>, _>>()?;
    let geometry = Geometry::from_values(kind, &values)
        .ok_or(RuntimeError::StackUnderflow { needed: kind.arity(), depth: values.len() })?;

    let mut shape = rt.env().shape(&id)?.clone();
    shape.geometry = geometry;
    register(rt, &id, shape)?;
    render_children(rt, &id)?;
    Ok(stack)
}

/// ( id -- )
fn remove(rt: &mut Runtime, mut stack: Stack) -> Result<Stack, RuntimeError> {
    let id = stack.pop_id()?;
    let removed = rt.env_mut().unregister(&id)?;
    let (lx, ly) = removed.position();

    if let Some(p) = &removed.bindings.parent {
        if let Ok(parent) = rt.env_mut().shape_mut(p) {
            parent.bindings.children.retain(|c| **c != *id);
        }
    }
    for c in &removed.bindings.children {
        if let Ok(child) = rt.env_mut().shape_mut(c) {
            let (cx, cy) = child.position();
            child.set_position((cx + lx, cy + ly));
            child.bindings.parent = None;
        }
    }
    debug!(%id, children = removed.bindings.children.len(), "removed");

    // Move survivors out of the groups that are about to disappear.
    let survivors = removed.bindings.children.iter().chain(&removed.bindings.parent);
    for s in survivors {
        if rt.env().has_shape(s) {
            render(rt, s)?;
        }
    }

    let surface = rt.surface_mut();
    if let Some(p) = &removed.bindings.parent {
        surface.delete_node(&group_id(p, &id));
    }
    for c in &removed.bindings.children {
        surface.delete_node(&group_id(&id, c));
    }
    surface.delete_node(&id);
    Ok(stack)
}

// ─── Shared operations ────────────────────────────────────────────────────────

/// Register `shape` under `id` and bring its node up to date. Re-registering
/// keeps the previous record's edges and task handles. A new record starts
/// unbound, and tasks left over from a removed shape of the same id are
/// cancelled.
pub(crate) fn register(rt: &mut Runtime, id: &str, shape: Shape) -> Result<(), RuntimeError> {
    let kind = shape.kind();
    let record = if rt.env().has_shape(id) {
        shape.replacing(rt.env().shape(id)?)
    } else {
        halt(rt, id);
        shape.detached()
    };
    rt.env_mut().register(id, record);

    let surface = rt.surface_mut();
    match surface.get_node(id) {
        Some(NodeKind::Shape(k)) if k == kind => {}
        Some(_) => {
            surface.delete_node(id);
            surface.create_node(kind, id);
        }
        None => surface.create_node(kind, id),
    }
    render(rt, id)
}

/// Push the record of `id` to its node in absolute coordinates and place the
/// node in its container. Reads the record only, so repeating it is harmless.
pub(crate) fn render(rt: &mut Runtime, id: &str) -> Result<(), RuntimeError> {
    let (kind, attributes, container) = {
        let env = rt.env();
        let shape = env.shape(id)?;
        let (geometry, container) = match &shape.bindings.parent {
            Some(p) => {
                let (px, py) = env.shape(p)?.position();
                (shape.geometry.translated(px, py), group_id(p, id))
            }
            None => (shape.geometry.clone(), ROOT.to_string()),
        };
        (shape.kind(), node_attributes(&geometry, shape), container)
    };

    let surface = rt.surface_mut();
    if surface.get_node(id).is_none() {
        surface.create_node(kind, id);
    }
    surface.set_attributes(id, &attributes);
    surface.append_child(&container, id);
    Ok(())
}

/// Run `render` as a sub-program for every child of `id`.
pub(crate) fn render_children(rt: &mut Runtime, id: &str) -> Result<(), RuntimeError> {
    let children = rt.env().shape(id)?.bindings.children.clone();
    for c in children {
        call(rt, "render", vec![Value::string(c)])?;
    }
    Ok(())
}

fn node_attributes(absolute: &Geometry, shape: &Shape) -> Vec<Attribute> {
    let mut attrs = absolute.attributes();
    attrs.push(Attribute::new("fill", AttrValue::Text(shape.fill.clone())));
    let (cx, cy) = absolute.center();
    attrs.push(Attribute::new("transform", AttrValue::Rotate { angle: shape.rotation, cx, cy }));
    attrs
}

/// Validate a `bind`; returns whether the edge already exists.
fn check_binding(env: &Environment, parent: &str, child: &str) -> Result<bool, RuntimeError> {
    env.shape(parent)?;
    let current = env.shape(child)?.bindings.parent.as_deref();
    if parent == child {
        return Err(RuntimeError::InvalidBinding(format!("`{child}` cannot be its own parent")));
    }
    match current {
        Some(p) if p == parent => return Ok(true),
        Some(p) => {
            return Err(RuntimeError::InvalidBinding(format!("`{child}` is already bound to `{p}`")));
        }
        None => {}
    }
    if env.is_ancestor(child, parent) {
        return Err(RuntimeError::InvalidBinding(format!("binding `{child}` under `{parent}` would form a cycle")));
    }
    Ok(false)
}
