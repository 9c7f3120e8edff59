pub mod syntax;
pub mod types;
pub mod runtime;
pub mod error;
pub mod namespaces;
pub mod surface;

pub use error::{Error, ErrorCode, ExecError, RuntimeError};
pub use namespaces::{Library, Module};
pub use runtime::env::Environment;
pub use runtime::interpreter::run;
pub use runtime::scheduler::{Channel, Scheduler, SchedulerConfig, TaskId};
pub use runtime::stack::Stack;
pub use runtime::value::{Primitive, Value};
pub use syntax::command::{parse_line, parse_script};
pub use syntax::token::{Token, TokenKind};
pub use surface::{AttrValue, Attribute, DisplaySink, NodeKind, NullSurface, RenderSurface, TracingSink};
pub use types::shape::{Geometry, Shape, ShapeKind};

use std::time::Duration;

use tracing::{debug, warn};

use namespaces::motion;
use runtime::scheduler::TaskAction;

// ─── Public API types ─────────────────────────────────────────────────────────

/// Host clock input for one `tick`.
#[derive(Debug, Clone, Default)]
pub struct Input {
    /// Seconds elapsed since the previous tick.
    pub dt: f64,
}

// ─── Runtime ──────────────────────────────────────────────────────────────────

/// One scripting session: the environment, the animation scheduler and the
/// surfaces they drive. Every primitive receives it by `&mut`.
///
/// Lifecycle:
///   1. `Runtime::new(surface, display)` loads the standard library into a
///      fresh environment.
///   2. `exec` / `exec_line` run programs to completion.
///   3. `tick(input)` advances the animation clock and fires due ticks,
///      between programs.
pub struct Runtime {
    env: Environment,
    scheduler: Scheduler,
    surface: Box<dyn RenderSurface>,
    display: Box<dyn DisplaySink>,
}

impl Runtime {
    pub fn new(surface: impl RenderSurface + 'static, display: impl DisplaySink + 'static) -> Self {
        Self::with_library(&Library::standard(), surface, display)
    }

    pub fn with_library(
        library: &Library,
        surface: impl RenderSurface + 'static,
        display: impl DisplaySink + 'static,
    ) -> Self {
        Self {
            env: library.load(Environment::new()),
            scheduler: Scheduler::default(),
            surface: Box::new(surface),
            display: Box::new(display),
        }
    }

    /// Standard library, no drawing, `show` output to the log.
    pub fn headless() -> Self { Self::new(NullSurface, TracingSink) }

    pub fn with_config(mut self, config: SchedulerConfig) -> Self {
        self.scheduler.set_config(config);
        self
    }

    pub fn env(&self) -> &Environment { &self.env }
    pub fn env_mut(&mut self) -> &mut Environment { &mut self.env }

    pub fn scheduler(&self) -> &Scheduler { &self.scheduler }
    pub fn scheduler_mut(&mut self) -> &mut Scheduler { &mut self.scheduler }

    pub fn surface_mut(&mut self) -> &mut dyn RenderSurface { self.surface.as_mut() }

    pub fn display(&mut self, text: &str) { self.display.display(text) }

    // ─── Execution ────────────────────────────────────────────────────────────

    /// Run `program` on an empty stack.
    pub fn exec(&mut self, program: &[Value]) -> Result<Stack, RuntimeError> {
        run(self, program, 0, Stack::new())
    }

    /// Parse one command line and run it.
    pub fn exec_line(&mut self, line: &str) -> Result<Stack, ExecError> {
        let program = syntax::command::parse_line(1, line)?;
        Ok(self.exec(&program)?)
    }

    /// Run a multi-line script, one program per line, stopping at the first
    /// failure.
    pub fn exec_script(&mut self, source: &str) -> Result<(), ExecError> {
        let programs = syntax::command::parse_script(source)
            .map_err(|mut errs| ExecError::Parse(errs.remove(0)))?;
        for program in &programs {
            self.exec(program)?;
        }
        Ok(())
    }

    // ─── Animation ────────────────────────────────────────────────────────────

    /// Advance the animation clock by `input.dt` and fire every tick that
    /// fell due, oldest first.
    ///
    /// A tick whose shape has been removed fails with `UnknownShape`; that
    /// task is dropped and nothing is reported. Any other tick failure also
    /// drops the task, with a warning.
    pub fn tick(&mut self, input: &Input) {
        let dt = Duration::try_from_secs_f64(input.dt).unwrap_or(Duration::ZERO);
        let until = self.scheduler.now().saturating_add(dt);

        for (_, id) in self.scheduler.advance(until) {
            let Some(task) = self.scheduler.task(id).cloned() else { continue };
            let result = match task.action {
                TaskAction::Rotate { step } => motion::rotate_by(self, &task.shape, step),
                TaskAction::Translate { dx, dy } => motion::translate_by(self, &task.shape, dx, dy),
            };
            match result {
                Ok(()) => {}
                Err(RuntimeError::UnknownShape(shape)) => {
                    debug!(?id, %shape, "tick on removed shape, dropping task");
                    self.scheduler.cancel(id);
                }
                Err(e) => {
                    warn!(?id, shape = %task.shape, error = %e, "tick failed, dropping task");
                    self.scheduler.cancel(id);
                    motion::clear_handle(self, &task.shape, task.channel);
                }
            }
        }
    }
}

impl Default for Runtime {
    fn default() -> Self { Self::headless() }
}
