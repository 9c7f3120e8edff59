//! Animation words: `rotate`, `move`, `stop`, plus the per-tick updates the
//! scheduler fires through `Runtime::tick`.

use crate::error::RuntimeError;
use crate::runtime::env::Environment;
use crate::runtime::scheduler::{Channel, TaskAction};
use crate::runtime::stack::Stack;
use crate::types::shape::MotionTasks;
use crate::Runtime;
use super::scene::{render, render_children};
use super::{Module, define_primitive};

pub struct MotionModule;

impl Module for MotionModule {
    fn name(&self) -> &'static str { "motion" }

    fn install(&self, env: &mut Environment) {
        define_primitive(env, "rotate", rotate);
        define_primitive(env, "move", translate);
        define_primitive(env, "stop", stop);
    }
}

/// ( [rate] angle id -- )
///
/// Without a rate (or with rate 0) the angle is applied once. Otherwise the
/// shape turns by `angle` in the direction of `rate`, `|rate|` times a second.
fn rotate(rt: &mut Runtime, mut stack: Stack) -> Result<Stack, RuntimeError> {
    let id = stack.pop_id()?;
    let angle = stack.pop_number()?;
    let rate = stack.pop_optional_number().unwrap_or(0.0);
    rt.env().shape(&id)?;

    rt.scheduler_mut().cancel_channel(&id, Channel::Rotation);
    rt.env_mut().shape_mut(&id)?.rotation_task = None;

    if rate == 0.0 || rate.is_nan() {
        rotate_by(rt, &id, angle)?;
    } else {
        let step = angle * rate.signum();
        let task = rt.scheduler_mut().start(&id, Channel::Rotation, TaskAction::Rotate { step }, rate);
        rt.env_mut().shape_mut(&id)?.rotation_task = Some(task);
    }
    Ok(stack)
}

/// ( vy vx id -- )
///
/// Each axis with a nonzero velocity gets its own task moving the shape one
/// unit in the direction of the velocity, `|v|` times a second. Always
/// replaces whatever motion the shape had.
fn translate(rt: &mut Runtime, mut stack: Stack) -> Result<Stack, RuntimeError> {
    let id = stack.pop_id()?;
    let vx = stack.pop_number()?;
    let vy = stack.pop_number()?;
    rt.env().shape(&id)?;

    let scheduler = rt.scheduler_mut();
    scheduler.cancel_channel(&id, Channel::MotionX);
    scheduler.cancel_channel(&id, Channel::MotionY);

    let moving = |v: f64| v != 0.0 && !v.is_nan();
    let x = moving(vx).then(|| {
        scheduler.start(&id, Channel::MotionX, TaskAction::Translate { dx: vx.signum(), dy: 0.0 }, vx)
    });
    let y = moving(vy).then(|| {
        scheduler.start(&id, Channel::MotionY, TaskAction::Translate { dx: 0.0, dy: vy.signum() }, vy)
    });

    let motion = (x.is_some() || y.is_some()).then_some(MotionTasks { x, y });
    rt.env_mut().shape_mut(&id)?.motion_tasks = motion;

    if motion.is_none() {
        render(rt, &id)?;
    }
    Ok(stack)
}

/// ( id -- ) Halts the animation of `id`, or of its parent when it has one.
fn stop(rt: &mut Runtime, mut stack: Stack) -> Result<Stack, RuntimeError> {
    let id = stack.pop_id()?;
    let target = rt.env().shape(&id)?.bindings.parent.clone().unwrap_or_else(|| id.to_string());
    halt(rt, &target);
    Ok(stack)
}

/// Cancel every channel of `id`.
pub fn halt(rt: &mut Runtime, id: &str) {
    for channel in Channel::ALL {
        rt.scheduler_mut().cancel_channel(id, channel);
    }
    if let Ok(shape) = rt.env_mut().shape_mut(id) {
        shape.rotation_task = None;
        shape.motion_tasks = None;
    }
}

// ─── Tick updates ─────────────────────────────────────────────────────────────

/// Add `step` degrees to the live rotation of `id` and re-render it.
pub(crate) fn rotate_by(rt: &mut Runtime, id: &str, step: f64) -> Result<(), RuntimeError> {
    rt.env_mut().shape_mut(id)?.rotation += step;
    render(rt, id)
}

/// Shift the live position of `id` and re-render it and its children.
pub(crate) fn translate_by(rt: &mut Runtime, id: &str, dx: f64, dy: f64) -> Result<(), RuntimeError> {
    let shape = rt.env_mut().shape_mut(id)?;
    let (x, y) = shape.position();
    shape.set_position((x + dx, y + dy));
    render(rt, id)?;
    render_children(rt, id)
}

/// Forget a dead task's handle on its shape, if the shape is still around.
pub(crate) fn clear_handle(rt: &mut Runtime, id: &str, channel: Channel) {
    let Ok(shape) = rt.env_mut().shape_mut(id) else { return };
    match channel {
        Channel::Rotation => shape.rotation_task = None,
        Channel::MotionX | Channel::MotionY => {
            let Some(m) = shape.motion_tasks.as_mut() else { return };
            if channel == Channel::MotionX { m.x = None } else { m.y = None }
            if m.x.is_none() && m.y.is_none() {
                shape.motion_tasks = None;
            }
        }
    }
}
