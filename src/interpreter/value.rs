use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt::{Debug, Display, Formatter};
use std::rc::Rc;
use crate::interpreter::ast::Node;
use crate::interpreter::environment::Environment;


pub type NativeCallable = dyn Fn(&[Value], &Rc<RefCell<Environment>>) -> Value;

/// A user-defined function together with the environment it was declared in.
pub struct Function {
    pub name: String,
    pub parameters: Vec<String>,
    pub body: Rc<Vec<Node>>,
    pub environment: Rc<RefCell<Environment>>,
}

#[derive(Clone)]
pub enum Value {
    Null,
    Number(f64),
    String(String),
    Bool(bool),
    Object(Rc<RefCell<BTreeMap<String, Value>>>),
    Function(Rc<Function>),
    NativeFunction {
        name: String,
        call: Rc<NativeCallable>,
    },

    // Control-flow sentinels, interpreted by the enclosing loop or switch
    Break,
    Continue,
}

impl Value {
    pub fn native<F>(name: &str, call: F) -> Value
    where F: Fn(&[Value], &Rc<RefCell<Environment>>) -> Value + 'static {
        Value::NativeFunction { name: name.to_owned(), call: Rc::new(call) }
    }

    pub fn object(properties: BTreeMap<String, Value>) -> Value {
        Value::Object(Rc::new(RefCell::new(properties)))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Bool(_) => "bool",
            Value::Object(_) => "object",
            Value::Function(_) => "function",
            Value::NativeFunction { .. } => "native function",
            Value::Break => "break",
            Value::Continue => "continue",
        }
    }

    pub fn is_sentinel(&self) -> bool {
        matches!(self, Value::Break | Value::Continue)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Number(left), Value::Number(right)) => left == right,
            (Value::String(left), Value::String(right)) => left == right,
            (Value::Bool(left), Value::Bool(right)) => left == right,
            (Value::Object(left), Value::Object(right)) => Rc::ptr_eq(left, right) || *left.borrow() == *right.borrow(),
            (Value::Function(left), Value::Function(right)) => Rc::ptr_eq(left, right),
            (Value::NativeFunction { call: left, .. }, Value::NativeFunction { call: right, .. }) => Rc::ptr_eq(left, right),
            (Value::Break, Value::Break) => true,
            (Value::Continue, Value::Continue) => true,
            _ => false,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Number(value) => write!(f, "{}", value),
            Value::String(value) => write!(f, "{}", value),
            Value::Bool(value) => write!(f, "{}", value),
            Value::Object(properties) => {
                let properties = properties.borrow();

                if properties.is_empty() {
                    return write!(f, "{{}}");
                }

                let properties = properties.iter()
                    .map(|(key, value)| match value {
                        Value::String(value) => format!("{}: \"{}\"", key, value),
                        _ => format!("{}: {}", key, value),
                    })
                    .collect::<Vec<String>>().join(", ");

                write!(f, "{{ {} }}", properties)
            },
            Value::Function(function) => write!(f, "<fn {}({})>", function.name, function.parameters.join(", ")),
            Value::NativeFunction { name, .. } => write!(f, "<native fn {}>", name),
            Value::Break => write!(f, "<break>"),
            Value::Continue => write!(f, "<continue>"),
        }
    }
}

impl Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::String(value) => write!(f, "{:?}", value),
            _ => write!(f, "{}", self),
        }
    }
}
