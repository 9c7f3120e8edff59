//! Standard library construction.
//!
//! A `Library` is an ordered chain of modules. Loading it into an environment
//! applies every module in registration order, so a later module sees the
//! definitions of the earlier ones and can shadow them by defining the same
//! name again.

use crate::error::RuntimeError;
use crate::runtime::env::Environment;
use crate::runtime::stack::Stack;
use crate::runtime::value::{Primitive, Value};
use crate::Runtime;

pub mod core;
pub mod motion;
pub mod scene;

// ─── Module ───────────────────────────────────────────────────────────────────

/// One link of the library chain.
pub trait Module {
    fn name(&self) -> &'static str;
    fn install(&self, env: &mut Environment);
}

/// Closure-backed module, built by `Library::layer`.
struct Layer<F> {
    name: &'static str,
    install: F,
}

impl<F: Fn(&mut Environment)> Module for Layer<F> {
    fn name(&self) -> &'static str { self.name }
    fn install(&self, env: &mut Environment) { (self.install)(env) }
}

// ─── Library ──────────────────────────────────────────────────────────────────

pub struct Library {
    modules: Vec<Box<dyn Module>>,
}

impl Library {
    pub fn new() -> Self { Self { modules: Vec::new() } }

    pub fn register(&mut self, m: Box<dyn Module>) { self.modules.push(m); }

    /// Append a closure as the next module in the chain.
    pub fn layer(mut self, name: &'static str, install: impl Fn(&mut Environment) + 'static) -> Self {
        self.register(Box::new(Layer { name, install }));
        self
    }

    pub fn get(&self, name: &str) -> Option<&dyn Module> {
        self.modules.iter().find(|m| m.name() == name).map(|m| m.as_ref())
    }

    pub fn module_names(&self) -> Vec<&'static str> {
        self.modules.iter().map(|m| m.name()).collect()
    }

    /// Run the whole chain over `env` and return it.
    pub fn load(&self, mut env: Environment) -> Environment {
        for m in &self.modules {
            m.install(&mut env);
        }
        env
    }

    pub fn standard() -> Self {
        let mut l = Self::new();
        l.register(Box::new(core::CoreModule));
        l.register(Box::new(scene::SceneModule));
        l.register(Box::new(motion::MotionModule));
        l
    }
}

impl Default for Library {
    fn default() -> Self { Self::standard() }
}

// ─── Shared helpers ───────────────────────────────────────────────────────────

/// Bind `name` to a primitive.
pub fn define_primitive(
    env: &mut Environment,
    name: &str,
    f: impl Fn(&mut Runtime, Stack) -> Result<Stack, RuntimeError> + 'static,
) {
    env.define(name, Value::Primitive(Primitive::new(name, f)));
}
