//! Stack machine and library tests.
//!
//! Programs are built either by hand or through the command parser and run
//! on a fresh runtime; the resulting stack is inspected.

mod common;

use common::*;
use shapes_lang::namespaces::define_primitive;
use shapes_lang::{run, ExecError, Library, NullSurface, Runtime, RuntimeError, Stack, Value};

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn eval(line: &str) -> Vec<f64> {
    numbers(&session().exec(&[line]))
}

fn eval_err(line: &str) -> RuntimeError {
    session().exec_err(line)
}

// ─── Arithmetic ──────────────────────────────────────────────────────────────

#[test]
fn add_two_numbers() {
    let mut rt = Runtime::headless();
    let program = [Value::number(1.0), Value::number(2.0), Value::word("+")];
    let stack = rt.exec(&program).unwrap();
    assert_eq!(stack.as_slice(), &[Value::Number(3.0)]);
}

#[test]
fn operand_order() {
    assert_eq!(eval("10 4 -"), vec![6.0]);
    assert_eq!(eval("12 4 /"), vec![3.0]);
    assert_eq!(eval("3 5 *"), vec![15.0]);
}

#[test]
fn distance_on_the_stack() {
    // (0,0) to (3,4)
    assert_eq!(eval("3 0 - dup * 4 0 - dup * + sqrt"), vec![5.0]);
}

#[test]
fn distance_with_definitions() {
    let mut s = session();
    let stack = s.exec(&[
        "0 'x1 def 0 'y1 def 3 'x2 def 4 'y2 def",
        "x2 x1 - 'dx def y2 y1 - 'dy def",
        "dx dx * dy dy * + sqrt",
    ]);
    assert_eq!(numbers(&stack), vec![5.0]);
}

#[test]
fn stack_words() {
    assert_eq!(eval("1 2 swap"), vec![2.0, 1.0]);
    assert_eq!(eval("1 2 drop"), vec![1.0]);
    assert_eq!(eval("7 dup"), vec![7.0, 7.0]);
}

// ─── Errors ──────────────────────────────────────────────────────────────────

#[test]
fn undefined_word() {
    assert_eq!(eval_err("1 frobnicate"), RuntimeError::UndefinedWord("frobnicate".into()));
}

#[test]
fn underflow() {
    assert_eq!(eval_err("1 +"), RuntimeError::StackUnderflow { needed: 1, depth: 0 });
    assert_eq!(eval_err("dup"), RuntimeError::StackUnderflow { needed: 1, depth: 0 });
}

#[test]
fn type_mismatch() {
    assert_eq!(
        eval_err(r#""a" 1 +"#),
        RuntimeError::TypeMismatch { expected: "number", found: "string" },
    );
    assert_eq!(
        eval_err("1 2 def"),
        RuntimeError::TypeMismatch { expected: "symbol", found: "number" },
    );
}

#[test]
fn earlier_effects_survive_a_failure() {
    let mut s = session();
    s.exec_err("5 'x def nope");
    assert_eq!(numbers(&s.exec(&["x"])), vec![5.0]);
}

// ─── Interpreter loop ────────────────────────────────────────────────────────

#[test]
fn start_index_skips_instructions() {
    let mut rt = Runtime::headless();
    let program = [Value::word("nope"), Value::number(2.0), Value::number(3.0), Value::word("*")];
    let stack = run(&mut rt, &program, 1, Stack::new()).unwrap();
    assert_eq!(numbers(&stack), vec![6.0]);
}

#[test]
fn start_past_the_end_runs_nothing() {
    let mut rt = Runtime::headless();
    let program = [Value::word("nope")];
    let stack = run(&mut rt, &program, 5, Stack::new().with(1.0)).unwrap();
    assert_eq!(numbers(&stack), vec![1.0]);
}

#[test]
fn literals_are_pushed_untouched() {
    let mut rt = Runtime::headless();
    let program = [Value::string("hi"), Value::symbol("add")];
    let stack = rt.exec(&program).unwrap();
    assert_eq!(stack.as_slice(), &program);
}

#[test]
fn definitions_shadow_primitives() {
    let mut s = session();
    s.exec(&["10 '+ def"]);
    assert_eq!(numbers(&s.exec(&["1 2 +"])), vec![1.0, 2.0, 10.0]);
}

// ─── Library ─────────────────────────────────────────────────────────────────

#[test]
fn standard_library_order() {
    assert_eq!(Library::standard().module_names(), vec!["core", "scene", "motion"]);
    assert!(Library::standard().get("scene").is_some());
    assert!(Library::standard().get("network").is_none());
}

#[test]
fn empty_library_knows_nothing() {
    let mut rt = Runtime::with_library(&Library::new(), NullSurface, Vec::<String>::new());
    assert_eq!(
        rt.exec_line("1 2 +").unwrap_err(),
        ExecError::Runtime(RuntimeError::UndefinedWord("+".into())),
    );
}

#[test]
fn later_layers_see_and_shadow_earlier_ones() {
    let library = Library::standard()
        .layer("extras", |env| {
            define_primitive(env, "+", |_, mut stack| {
                let y = stack.pop_number()?;
                let x = stack.pop_number()?;
                Ok(stack.with(x + y + 100.0))
            });
            // Built from a word an earlier layer defined.
            if let Ok(sqrt) = env.lookup("sqrt") {
                env.define("root", sqrt);
            }
        });
    let mut rt = Runtime::with_library(&library, NullSurface, Vec::<String>::new());
    assert_eq!(numbers(&rt.exec_line("1 2 +").unwrap()), vec![103.0]);
    assert_eq!(numbers(&rt.exec_line("81 root").unwrap()), vec![9.0]);
}

#[test]
fn loading_is_idempotent() {
    let library = Library::standard();
    let a = library.load(shapes_lang::Environment::new());
    let b = library.load(shapes_lang::Environment::new());
    assert_eq!(a.names(), b.names());
    assert!(a.is_defined("rotate") && a.is_defined("def"));
}

// ─── Display ─────────────────────────────────────────────────────────────────

#[test]
fn show_uses_the_display_sink() {
    let mut s = session();
    s.exec(&["7 show", "show hello there", "'x show", "add circle c 1 2 3", "c show"]);
    assert_eq!(*s.shown.borrow(), vec![
        "number(7)".to_string(),
        "hello there".to_string(),
        "symbol(x)".to_string(),
        "circle(1, 2, 3)".to_string(),
    ]);
}

#[test]
fn top_items_lists_top_first() {
    let stack: Stack = (1..=25).map(|n| Value::number(n as f64)).collect();
    let top: Vec<String> = stack.top_items(3).map(|v| v.to_string()).collect();
    assert_eq!(top, vec!["number(25)", "number(24)", "number(23)"]);
}

// ─── Scripts ─────────────────────────────────────────────────────────────────

#[test]
fn script_runs_line_by_line() {
    let mut s = session();
    s.rt.exec_script("# scene\nadd circle a 1 1 1\n\nadd rect b 0 0 2 2\nbind a b 3 3\n").unwrap();
    assert_eq!(s.parent("b").as_deref(), Some("a"));
}

#[test]
fn script_stops_at_the_first_runtime_error() {
    let mut s = session();
    let err = s.rt.exec_script("add circle a 0 0 1\nremove ghost\nadd circle b 0 0 1").unwrap_err();
    assert_eq!(err, ExecError::Runtime(RuntimeError::UnknownShape("ghost".into())));
    assert!(s.rt.env().has_shape("a"));
    assert!(!s.rt.env().has_shape("b"));
}

#[test]
fn script_with_a_parse_error_runs_nothing() {
    let mut s = session();
    let err = s.rt.exec_script("add circle a 0 0 1\nadd hexagon h 1 2 3").unwrap_err();
    match err {
        ExecError::Parse(e) => {
            assert_eq!(e.code, shapes_lang::ErrorCode::C001);
            assert_eq!(e.line, 2);
        }
        other => panic!("expected a parse error, got {other}"),
    }
    assert!(!s.rt.env().has_shape("a"));
}

#[test]
fn demo_script_runs() {
    let mut s = session();
    s.rt.exec_script(include_str!("../../../demos/solar.shapes")).unwrap();
    assert_eq!(s.parent("moon").as_deref(), Some("planet"));
    assert_eq!(s.rt.scheduler().len(), 3);
    assert_eq!(*s.shown.borrow(), vec!["ready".to_string()]);
    s.rt.env().check_graph().unwrap();
}
