//! The stack machine. Words resolve through the environment, primitives are
//! applied to the stack, everything else is pushed as a literal. There is no
//! control flow beyond program order; primitives that need to run further
//! instructions build a sub-program and call `run` again on the same runtime.

use tracing::trace;

use crate::error::RuntimeError;
use crate::runtime::stack::Stack;
use crate::runtime::value::Value;
use crate::Runtime;

/// Execute `program[start..]` against `stack` and return the resulting stack.
///
/// The first failing instruction aborts the run and its error is returned;
/// effects of the instructions before it stay committed.
pub fn run(rt: &mut Runtime, program: &[Value], start: usize, mut stack: Stack) -> Result<Stack, RuntimeError> {
    for (pc, instr) in program.iter().enumerate().skip(start) {
        trace!(pc, instr = %instr, depth = stack.depth(), "exec");

        let resolved = match instr {
            Value::Word(name) => rt.env().lookup(name)?,
            other => other.clone(),
        };

        stack = match resolved {
            Value::Primitive(p) => p.apply(rt, stack)?,
            literal => {
                stack.push(literal);
                stack
            }
        };
    }
    Ok(stack)
}

/// Run a single primitive by name on a fresh stack holding `args` (bottom first).
pub(crate) fn call(rt: &mut Runtime, word: &str, args: Vec<Value>) -> Result<Stack, RuntimeError> {
    let mut program = args;
    program.push(Value::word(word));
    run(rt, &program, 0, Stack::new())
}
