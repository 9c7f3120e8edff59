//! Retained rendering surface for `shapes-lang`.
//!
//! `Scene` stores the node tree the scene primitives build and turns it into
//! flat, screen-space draw items for a painter.

pub mod color;
pub mod scene;
pub mod tessellate;

pub use color::{parse_color, Rgba};
pub use scene::{Node, Scene};
pub use tessellate::{DrawItem, RenderMode};

use std::cell::RefCell;
use std::rc::Rc;

/// A scene shared between the runtime that writes it and the host that
/// paints it.
pub type SharedScene = Rc<RefCell<Scene>>;

pub fn shared() -> SharedScene {
    Rc::new(RefCell::new(Scene::new()))
}
