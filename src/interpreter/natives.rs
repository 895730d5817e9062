use std::cell::RefCell;
use std::io::{self, BufRead, Write};
use std::rc::Rc;
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use rand::Rng;
use tracing::debug;
use crate::interpreter::environment::Environment;
use crate::interpreter::error::LangResult;
use crate::interpreter::value::Value;


type NativeFn = fn(&[Value], &Rc<RefCell<Environment>>) -> Value;

const NATIVES: [(&str, NativeFn); 13] = [
    ("print", native_print),
    ("println", native_println),
    ("time", native_time),
    ("numToStr", native_num_to_str),
    ("strToNum", native_str_to_num),
    ("input", native_input),
    ("round", native_round),
    ("rand", native_rand),
    ("len", native_len),
    ("substr", native_substr),
    ("sleep", native_sleep),
    ("fileRead", native_file_read),
    ("fileWrite", native_file_write),
];

/// Prepares a root environment: the constants `null`, `true` and `false`, plus every native function.
///
/// Natives never fail; bad arguments produce `null` (or `false` for the file functions).
pub fn register(environment: &Rc<RefCell<Environment>>) -> LangResult<()> {
    let mut environment = environment.borrow_mut();

    environment.declare("null", Value::Null, true)?;
    environment.declare("true", Value::Bool(true), true)?;
    environment.declare("false", Value::Bool(false), true)?;

    for (name, function) in NATIVES {
        environment.declare(name, Value::native(name, function), true)?;
    }

    debug!(natives = NATIVES.len(), "registered native functions");
    Ok(())
}

fn number_arg(args: &[Value], index: usize) -> Option<f64> {
    match args.get(index) {
        Some(Value::Number(value)) => Some(*value),
        _ => None,
    }
}

fn string_arg(args: &[Value], index: usize) -> Option<&str> {
    match args.get(index) {
        Some(Value::String(value)) => Some(value.as_str()),
        _ => None,
    }
}

/// Writes every argument's display form. With `newline`, each argument gets its own line.
fn write_values(out: &mut impl Write, args: &[Value], newline: bool) -> io::Result<()> {
    for arg in args {
        write!(out, "{}", arg)?;

        if newline {
            writeln!(out)?;
        }
    }

    out.flush()
}

fn native_print(args: &[Value], _: &Rc<RefCell<Environment>>) -> Value {
    let _ = write_values(&mut io::stdout().lock(), args, false);
    Value::Null
}

fn native_println(args: &[Value], _: &Rc<RefCell<Environment>>) -> Value {
    let _ = write_values(&mut io::stdout().lock(), args, true);
    Value::Null
}

fn native_time(_: &[Value], _: &Rc<RefCell<Environment>>) -> Value {
    SystemTime::now().duration_since(UNIX_EPOCH)
        .map(|duration| Value::Number(duration.as_secs() as f64))
        .unwrap_or(Value::Null)
}

fn native_num_to_str(args: &[Value], _: &Rc<RefCell<Environment>>) -> Value {
    match number_arg(args, 0) {
        Some(value) => Value::String(value.to_string()),
        None => Value::Null,
    }
}

fn native_str_to_num(args: &[Value], _: &Rc<RefCell<Environment>>) -> Value {
    string_arg(args, 0)
        .and_then(|value| value.parse::<f64>().ok())
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

fn native_input(_: &[Value], _: &Rc<RefCell<Environment>>) -> Value {
    let mut line = String::new();

    match io::stdin().lock().read_line(&mut line) {
        Ok(_) => Value::String(line.trim_end_matches(['\n', '\r']).to_owned()),
        Err(_) => Value::Null,
    }
}

fn native_round(args: &[Value], _: &Rc<RefCell<Environment>>) -> Value {
    let value = match number_arg(args, 0) {
        Some(value) => value,
        None => return Value::Null,
    };

    let digits = number_arg(args, 1).unwrap_or(0.0).trunc() as i32;
    let factor = 10f64.powi(digits);

    Value::Number((value * factor).round() / factor)
}

fn native_rand(args: &[Value], _: &Rc<RefCell<Environment>>) -> Value {
    let bound = number_arg(args, 0).unwrap_or(100.0).trunc() as i64;

    if bound <= 0 {
        return Value::Null;
    }

    Value::Number(rand::thread_rng().gen_range(0..bound) as f64)
}

fn native_len(args: &[Value], _: &Rc<RefCell<Environment>>) -> Value {
    match string_arg(args, 0) {
        Some(value) => Value::Number(value.len() as f64),
        None => Value::Null,
    }
}

fn native_substr(args: &[Value], _: &Rc<RefCell<Environment>>) -> Value {
    let (value, from, to) = match (string_arg(args, 0), number_arg(args, 1), number_arg(args, 2)) {
        (Some(value), Some(from), Some(to)) if from >= 0.0 && to >= 0.0 => (value, from as usize, to as usize),
        _ => return Value::Null,
    };

    // Byte range; fails on reversed ranges and on ranges that split a character
    value.get(from..to)
        .map(|value| Value::String(value.to_owned()))
        .unwrap_or(Value::Null)
}

fn native_sleep(args: &[Value], _: &Rc<RefCell<Environment>>) -> Value {
    let millis = match number_arg(args, 0) {
        Some(millis) if millis > 0.0 => millis,
        _ => return Value::Null,
    };

    // Too large (or NaN) for a Duration
    if let Ok(duration) = Duration::try_from_secs_f64(millis / 1000.0) {
        thread::sleep(duration);
    }

    Value::Null
}

fn native_file_read(args: &[Value], _: &Rc<RefCell<Environment>>) -> Value {
    string_arg(args, 0)
        .and_then(|path| std::fs::read_to_string(path).ok())
        .map(Value::String)
        .unwrap_or(Value::Bool(false))
}

fn native_file_write(args: &[Value], _: &Rc<RefCell<Environment>>) -> Value {
    match (string_arg(args, 0), string_arg(args, 1)) {
        (Some(path), Some(content)) => Value::Bool(std::fs::write(path, content).is_ok()),
        _ => Value::Bool(false),
    }
}
