//! The builtin primitive library.
//!
//! Maps each primitive name to a callable taking a call-site context
//! and an ordered argument list. The table is built once at startup
//! and read-only afterwards; the evaluator resolves names through
//! [`lookup`] and invokes the callables with evaluated arguments.

use std::io::{self, Write};
use std::sync::Arc;

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

use crate::error::{BuiltinError, Result};
use crate::fmtstr;
use crate::validate::{
    expect_argc, expect_argc_at_least, expect_boolean, expect_condition, expect_list,
    expect_number, expect_string, expect_type, expect_type_in,
};
use crate::value::{NativeFn, Tag, Value};

// ============================================================================
// Call Context
// ============================================================================

/// Call-site context handed to every primitive: the name the callable
/// was invoked under, threaded into every error message.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    name: &'a str,
}

impl<'a> Context<'a> {
    pub fn new(name: &'a str) -> Self {
        Context { name }
    }

    pub fn name(&self) -> &'a str {
        self.name
    }
}

// ============================================================================
// Dispatch
// ============================================================================

static PRIMITIVES: Lazy<FxHashMap<&'static str, NativeFn>> = Lazy::new(build_table);

/// Look up a primitive by name. `None` means the name is not a
/// builtin and the evaluator should treat it as a user binding.
pub fn lookup(name: &str) -> Option<&'static NativeFn> {
    PRIMITIVES.get(name)
}

/// All primitive names, for seeding a global namespace.
pub fn names() -> impl Iterator<Item = &'static str> {
    PRIMITIVES.keys().copied()
}

/// Look up and invoke in one step.
pub fn call(name: &str, args: &[Value]) -> Result<Value> {
    let ctx = Context::new(name);
    match lookup(name) {
        Some(f) => f(&ctx, args),
        None => Err(BuiltinError::precondition(&ctx, "unknown primitive")),
    }
}

// ============================================================================
// Arithmetic
// ============================================================================

/// Shared validation for the binary numeric operators. Operand tags
/// must both be number; faults of the underlying f64 operation
/// (division by zero, overflow to inf) pass through untouched.
fn arith(ctx: &Context, args: &[Value], op: impl Fn(f64, f64) -> f64) -> Result<Value> {
    expect_argc(ctx, 2, args.len())?;
    let a = expect_number(ctx, &args[0])?;
    let b = expect_number(ctx, &args[1])?;
    Ok(Value::number(op(a, b)))
}

fn add(ctx: &Context, args: &[Value]) -> Result<Value> {
    arith(ctx, args, |a, b| a + b)
}

fn sub(ctx: &Context, args: &[Value]) -> Result<Value> {
    arith(ctx, args, |a, b| a - b)
}

fn mul(ctx: &Context, args: &[Value]) -> Result<Value> {
    arith(ctx, args, |a, b| a * b)
}

fn div(ctx: &Context, args: &[Value]) -> Result<Value> {
    arith(ctx, args, |a, b| a / b)
}

fn rem(ctx: &Context, args: &[Value]) -> Result<Value> {
    arith(ctx, args, |a, b| a % b)
}

fn pow(ctx: &Context, args: &[Value]) -> Result<Value> {
    arith(ctx, args, f64::powf)
}

fn neg(ctx: &Context, args: &[Value]) -> Result<Value> {
    expect_argc(ctx, 1, args.len())?;
    let n = expect_number(ctx, &args[0])?;
    Ok(Value::number(-n))
}

// ============================================================================
// List Operations
// ============================================================================

fn list(_ctx: &Context, args: &[Value]) -> Result<Value> {
    Ok(Value::list(args.to_vec()))
}

fn cons(ctx: &Context, args: &[Value]) -> Result<Value> {
    expect_argc(ctx, 2, args.len())?;
    let tail = expect_list(ctx, &args[1])?;
    let mut items = Vec::with_capacity(tail.len() + 1);
    items.push(args[0].clone());
    items.extend_from_slice(tail);
    Ok(Value::list(items))
}

fn car(ctx: &Context, args: &[Value]) -> Result<Value> {
    expect_argc(ctx, 1, args.len())?;
    let items = expect_list(ctx, &args[0])?;
    expect_condition(ctx, !items.is_empty(), "car of empty list")?;
    Ok(items[0].clone())
}

fn cdr(ctx: &Context, args: &[Value]) -> Result<Value> {
    expect_argc(ctx, 1, args.len())?;
    let items = expect_list(ctx, &args[0])?;
    if items.len() <= 1 {
        return Ok(Value::empty_list());
    }
    Ok(Value::list(items[1..].to_vec()))
}

fn length(ctx: &Context, args: &[Value]) -> Result<Value> {
    expect_argc(ctx, 1, args.len())?;
    let count = match &args[0] {
        Value::List(items) => items.len(),
        Value::String(s) => s.chars().count(),
        other => {
            return Err(BuiltinError::type_error(
                ctx,
                &[Tag::List, Tag::String],
                other.tag(),
            ));
        }
    };
    Ok(Value::number(count as f64))
}

/// A "pair" here is a list of exactly two elements, not a cons cell.
fn is_pair(ctx: &Context, args: &[Value]) -> Result<Value> {
    expect_argc(ctx, 1, args.len())?;
    let items = expect_list(ctx, &args[0])?;
    Ok(Value::boolean(items.len() == 2))
}

fn is_null(ctx: &Context, args: &[Value]) -> Result<Value> {
    expect_argc(ctx, 1, args.len())?;
    let items = expect_list(ctx, &args[0])?;
    Ok(Value::boolean(items.is_empty()))
}

// ============================================================================
// Type Introspection
// ============================================================================

fn type_of(ctx: &Context, args: &[Value]) -> Result<Value> {
    expect_argc(ctx, 1, args.len())?;
    Ok(Value::string(args[0].tag().name()))
}

fn not(ctx: &Context, args: &[Value]) -> Result<Value> {
    expect_argc(ctx, 1, args.len())?;
    let b = expect_boolean(ctx, &args[0])?;
    Ok(Value::boolean(!b))
}

// ============================================================================
// Equality and Ordering
// ============================================================================

/// Tags the `=` primitive accepts for its first operand.
const COMPARABLE: [Tag; 5] = [
    Tag::Number,
    Tag::String,
    Tag::Boolean,
    Tag::List,
    Tag::Character,
];

/// Recursive equality. Lists compare length first (a mismatch is
/// plain inequality, before any element validation), then element by
/// element with the same semantics, short-circuiting on the first
/// unequal pair. Cyclic lists are unsupported; the host value model
/// is acyclic.
fn values_equal(ctx: &Context, a: &Value, b: &Value) -> Result<bool> {
    expect_type_in(ctx, a, &COMPARABLE)?;
    expect_type(ctx, b, a.tag())?;
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => Ok(x == y),
        (Value::String(x), Value::String(y)) => Ok(x == y),
        (Value::Boolean(x), Value::Boolean(y)) => Ok(x == y),
        (Value::Character(x), Value::Character(y)) => Ok(x == y),
        (Value::List(xs), Value::List(ys)) => {
            if xs.len() != ys.len() {
                return Ok(false);
            }
            for (x, y) in xs.iter().zip(ys.iter()) {
                if !values_equal(ctx, x, y)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        _ => Ok(false),
    }
}

fn eq(ctx: &Context, args: &[Value]) -> Result<Value> {
    expect_argc(ctx, 2, args.len())?;
    Ok(Value::boolean(values_equal(ctx, &args[0], &args[1])?))
}

fn lt(ctx: &Context, args: &[Value]) -> Result<Value> {
    expect_argc(ctx, 2, args.len())?;
    expect_type_in(ctx, &args[0], &[Tag::Number, Tag::String])?;
    expect_type(ctx, &args[1], args[0].tag())?;
    let below = match (&args[0], &args[1]) {
        (Value::Number(a), Value::Number(b)) => a < b,
        (Value::String(a), Value::String(b)) => a < b,
        _ => false,
    };
    Ok(Value::boolean(below))
}

// ============================================================================
// Formatting and Printing
// ============================================================================

fn print(_ctx: &Context, args: &[Value]) -> Result<Value> {
    print_impl(args, false)
}

fn println(_ctx: &Context, args: &[Value]) -> Result<Value> {
    print_impl(args, true)
}

// The stdout lock is held for the whole call so concurrent callers
// never interleave output.
fn print_impl(args: &[Value], newline: bool) -> Result<Value> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            write!(handle, " ").map_err(io_fault)?;
        }
        write!(handle, "{}", fmtstr::display_text(arg)).map_err(io_fault)?;
    }

    if newline {
        writeln!(handle).map_err(io_fault)?;
    }

    handle.flush().map_err(io_fault)?;

    Ok(Value::empty_list())
}

fn io_fault(e: io::Error) -> BuiltinError {
    BuiltinError::Io(e.to_string())
}

fn format(ctx: &Context, args: &[Value]) -> Result<Value> {
    expect_argc_at_least(ctx, 1, args.len())?;
    let template = expect_string(ctx, &args[0])?;
    Ok(Value::string(fmtstr::render(ctx, template, &args[1..])?))
}

fn to_string(ctx: &Context, args: &[Value]) -> Result<Value> {
    expect_argc(ctx, 1, args.len())?;
    Ok(Value::string(args[0].to_string()))
}

// ============================================================================
// Table Construction
// ============================================================================

/// Declarative source of the per-tag predicates (`number?`, `list?`,
/// ...), expanded into uniform callables at table-build time.
const PREDICATES: [(&str, Tag); 7] = [
    ("atom?", Tag::Atom),
    ("list?", Tag::List),
    ("number?", Tag::Number),
    ("string?", Tag::String),
    ("boolean?", Tag::Boolean),
    ("character?", Tag::Character),
    ("function?", Tag::Function),
];

fn build_table() -> FxHashMap<&'static str, NativeFn> {
    let mut table: FxHashMap<&'static str, NativeFn> = FxHashMap::default();

    // Arithmetic
    table.insert("+", Arc::new(add));
    table.insert("-", Arc::new(sub));
    table.insert("*", Arc::new(mul));
    table.insert("/", Arc::new(div));
    table.insert("%", Arc::new(rem));
    table.insert("^", Arc::new(pow));
    table.insert("neg", Arc::new(neg));

    // Lists
    table.insert("list", Arc::new(list));
    table.insert("cons", Arc::new(cons));
    table.insert("car", Arc::new(car));
    table.insert("cdr", Arc::new(cdr));
    table.insert("length", Arc::new(length));
    table.insert("pair?", Arc::new(is_pair));
    table.insert("null?", Arc::new(is_null));

    // Type introspection
    table.insert("type", Arc::new(type_of));
    table.insert("not", Arc::new(not));
    for (name, tag) in PREDICATES {
        table.insert(
            name,
            Arc::new(move |ctx: &Context, args: &[Value]| {
                expect_argc(ctx, 1, args.len())?;
                Ok(Value::boolean(args[0].tag() == tag))
            }),
        );
    }

    // Equality and ordering. The derived operators delegate to `<`
    // and `not` with arguments reordered, never reimplementing the
    // validation: `<=` keeps rejecting booleans even though `=`
    // accepts them.
    table.insert("=", Arc::new(eq));
    table.insert("<", Arc::new(lt));
    table.insert(
        "!=",
        Arc::new(|ctx: &Context, args: &[Value]| {
            let equal = eq(ctx, args)?;
            not(ctx, &[equal])
        }),
    );
    table.insert(
        ">",
        Arc::new(|ctx: &Context, args: &[Value]| {
            expect_argc(ctx, 2, args.len())?;
            lt(ctx, &[args[1].clone(), args[0].clone()])
        }),
    );
    table.insert(
        "<=",
        Arc::new(|ctx: &Context, args: &[Value]| {
            expect_argc(ctx, 2, args.len())?;
            let flipped = lt(ctx, &[args[1].clone(), args[0].clone()])?;
            not(ctx, &[flipped])
        }),
    );
    table.insert(
        ">=",
        Arc::new(|ctx: &Context, args: &[Value]| {
            let below = lt(ctx, args)?;
            not(ctx, &[below])
        }),
    );

    // Formatting and printing
    table.insert("print", Arc::new(print));
    table.insert("println", Arc::new(println));
    table.insert("format", Arc::new(format));
    table.insert("to-string", Arc::new(to_string));

    table
}
