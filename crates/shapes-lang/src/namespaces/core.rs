//! Always-loaded words: arithmetic, stack shuffling, `def` and `show`.

use crate::error::RuntimeError;
use crate::runtime::env::Environment;
use crate::runtime::stack::Stack;
use crate::runtime::value::Value;
use crate::Runtime;
use super::{Module, define_primitive};

pub struct CoreModule;

impl Module for CoreModule {
    fn name(&self) -> &'static str { "core" }

    fn install(&self, env: &mut Environment) {
        // ( x y -- x op y )
        binary(env, "+", |x, y| x + y);
        binary(env, "-", |x, y| x - y);
        binary(env, "*", |x, y| x * y);
        binary(env, "/", |x, y| x / y);

        define_primitive(env, "sqrt", |_, mut stack| {
            let x = stack.pop_number()?;
            Ok(stack.with(x.sqrt()))
        });

        define_primitive(env, "dup", |_, mut stack| {
            let top = stack.peek(0)?.clone();
            stack.push(top);
            Ok(stack)
        });
        define_primitive(env, "drop", |_, mut stack| {
            stack.pop()?;
            Ok(stack)
        });
        define_primitive(env, "swap", |_, mut stack| {
            let y = stack.pop()?;
            let x = stack.pop()?;
            stack.push(y);
            stack.push(x);
            Ok(stack)
        });

        // ( value 'name -- )
        define_primitive(env, "def", def);

        // ( value -- )
        define_primitive(env, "show", |rt, mut stack| {
            let text = match stack.pop()? {
                Value::Str(s) => s.to_string(),
                other => other.to_string(),
            };
            rt.display(&text);
            Ok(stack)
        });
    }
}

fn binary(env: &mut Environment, name: &str, op: fn(f64, f64) -> f64) {
    define_primitive(env, name, move |_, mut stack| {
        let y = stack.pop_number()?;
        let x = stack.pop_number()?;
        Ok(stack.with(op(x, y)))
    });
}

fn def(rt: &mut Runtime, mut stack: Stack) -> Result<Stack, RuntimeError> {
    let name = stack.pop_symbol()?;
    let value = stack.pop()?;
    rt.env_mut().define(&*name, value);
    Ok(stack)
}
