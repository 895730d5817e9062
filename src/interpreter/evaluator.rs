use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use tracing::{debug, trace};
use crate::interpreter::ast::{BinaryOperator, CaseTest, ConditionOperator, Node, NodeKind, Property, SwitchCase};
use crate::interpreter::environment::Environment;
use crate::interpreter::error::{Error, ErrorKind, LangResult};
use crate::interpreter::value::{Function, Value};
use crate::util;


pub const DEFAULT_MAX_CALL_DEPTH: usize = 10_000;

/// Tree-walking evaluator.
///
/// Break and continue are ordinary [`Value`]s: block evaluation stops at the
/// first one it sees and hands it up to the loop or switch that interprets it.
pub struct Evaluator {
    max_call_depth: usize,
    depth: usize,
}

impl Evaluator {
    pub fn new(max_call_depth: usize) -> Evaluator {
        Evaluator { max_call_depth, depth: 0 }
    }

    /// Evaluates `node` in `environment`. Errors gain the position of every node they pass through.
    pub fn evaluate(&mut self, node: &Node, environment: &Rc<RefCell<Environment>>) -> LangResult<Value> {
        util::ensure_sufficient_stack(|| self.evaluate_node(node, environment))
            .map_err(|err| err.with_trace(node.pos))
    }

    fn evaluate_node(&mut self, node: &Node, environment: &Rc<RefCell<Environment>>) -> LangResult<Value> {
        match &node.kind {
            NodeKind::Program(statements) => self.evaluate_statements(statements, environment),

            NodeKind::VariableDeclaration { name, constant, value } => {
                let value = match value {
                    Some(value) => self.evaluate(value, environment)?,
                    None => Value::Null,
                };

                Ok(environment.borrow_mut().declare(name, value, *constant)?)
            },
            NodeKind::FunctionDeclaration { name, parameters, body } => {
                let function = Value::Function(Rc::new(Function {
                    name: name.clone(),
                    parameters: parameters.clone(),
                    body: Rc::clone(body),
                    environment: Rc::clone(environment),
                }));

                Ok(environment.borrow_mut().declare(name, function, false)?)
            },
            NodeKind::IfExpression { condition, body, otherwise } =>
                self.evaluate_if(condition.as_deref(), body, otherwise.as_deref(), environment),
            NodeKind::ForExpression { init, condition, increment, post_condition, body } =>
                self.evaluate_for(init.as_deref(), condition.as_deref(), increment.as_deref(), post_condition.as_deref(), body, environment),
            NodeKind::SwitchExpression { value, cases } => self.evaluate_switch(value, cases, environment),
            NodeKind::BreakExpression => Ok(Value::Break),
            NodeKind::ContinueExpression => Ok(Value::Continue),

            NodeKind::BinaryExpression { left, operator, right } => {
                let left = self.evaluate(left, environment)?;
                let right = self.evaluate(right, environment)?;

                Self::evaluate_binary(left, *operator, right)
            },
            NodeKind::ConditionExpression { left, operator, right } => {
                // Both sides are always evaluated; `&&` and `||` don't short-circuit
                let left = self.evaluate(left, environment)?;
                let right = self.evaluate(right, environment)?;

                Self::evaluate_condition_operator(left, *operator, right)
            },
            NodeKind::AssignmentExpression { assignee, value } => {
                let name = match &assignee.kind {
                    NodeKind::Identifier(name) => name,
                    _ => return Err(Error::at(ErrorKind::InvalidAssignmentTarget, assignee.pos)),
                };

                let value = self.evaluate(value, environment)?;
                let result = environment.borrow_mut().assign(name, value);

                result.map_err(|kind| Error::at(kind, assignee.pos))
            },
            NodeKind::CallExpression { callee, args } => self.evaluate_call(callee, args, environment),
            NodeKind::MemberExpression { object, property, computed } =>
                self.evaluate_member(object, property, *computed, environment),
            NodeKind::ObjectLiteral(properties) => self.evaluate_object(properties, environment),

            NodeKind::Identifier(name) => Ok(environment.borrow().lookup(name)?),
            NodeKind::NumericLiteral(value) => Ok(Value::Number(*value)),
            NodeKind::StringLiteral(value) => Ok(Value::String(value.clone())),
        }
    }

    /// Runs every statement and yields the last value. Used for programs and function bodies.
    pub fn evaluate_statements(&mut self, statements: &[Node], environment: &Rc<RefCell<Environment>>) -> LangResult<Value> {
        let mut result = Value::Null;

        for statement in statements {
            result = self.evaluate(statement, environment)?;
        }

        Ok(result)
    }

    /// Runs a block body, stopping at the first break or continue and yielding it.
    fn evaluate_block(&mut self, statements: &[Node], environment: &Rc<RefCell<Environment>>) -> LangResult<Value> {
        let mut result = Value::Null;

        for statement in statements {
            result = self.evaluate(statement, environment)?;

            if result.is_sentinel() {
                break;
            }
        }

        Ok(result)
    }

    fn evaluate_condition(&mut self, condition: &Node, environment: &Rc<RefCell<Environment>>) -> LangResult<bool> {
        match self.evaluate(condition, environment)? {
            Value::Bool(value) => Ok(value),
            value => Err(Error::at(ErrorKind::NonBooleanCondition(value.type_name()), condition.pos)),
        }
    }

    fn evaluate_if(&mut self, condition: Option<&Node>, body: &[Node], otherwise: Option<&Node>,
                   environment: &Rc<RefCell<Environment>>) -> LangResult<Value> {
        let run = match condition {
            Some(condition) => self.evaluate_condition(condition, environment)?,
            None => true,
        };

        if run {
            self.evaluate_block(body, environment)
        } else if let Some(otherwise) = otherwise {
            self.evaluate(otherwise, environment)
        } else {
            Ok(Value::Null)
        }
    }

    fn evaluate_for(&mut self, init: Option<&Node>, condition: Option<&Node>, increment: Option<&Node>,
                    post_condition: Option<&Node>, body: &[Node], environment: &Rc<RefCell<Environment>>) -> LangResult<Value> {
        // Runs in the enclosing scope; `init` and body declarations stay visible after the loop
        if let Some(init) = init {
            self.evaluate(init, environment)?;
        }

        let mut result = Value::Null;
        let mut iterations = 0usize;

        loop {
            if let Some(condition) = condition {
                if !self.evaluate_condition(condition, environment)? {
                    break;
                }
            }

            iterations += 1;

            match self.evaluate_block(body, environment)? {
                Value::Break => break,
                // Skips the rest of the body, but not the post-condition and increment
                Value::Continue => {},
                value => result = value,
            }

            if let Some(post_condition) = post_condition {
                if !self.evaluate_condition(post_condition, environment)? {
                    break;
                }
            }

            if let Some(increment) = increment {
                self.evaluate(increment, environment)?;
            }
        }

        trace!(iterations, "loop finished");
        Ok(result)
    }

    fn evaluate_switch(&mut self, value: &Node, cases: &[SwitchCase], environment: &Rc<RefCell<Environment>>) -> LangResult<Value> {
        let value = self.evaluate(value, environment)?;

        // Every clause is visited; a matching clause does not stop the ones after it
        for case in cases {
            let matches = match (&case.test, &value) {
                (CaseTest::Default, _) => true,
                (CaseTest::Number(test), Value::Number(value)) => test == value,
                (CaseTest::String(test), Value::String(value)) => test == value,
                (test, value) => return Err(Error::at(ErrorKind::SwitchTypeMismatch {
                    value: value.type_name(),
                    case: Self::case_type_name(test),
                }, case.pos)),
            };

            if !matches {
                continue;
            }

            match self.evaluate_block(&case.body, environment)? {
                Value::Break => break,
                Value::Continue => return Ok(Value::Continue),
                _ => {},
            }
        }

        Ok(Value::Null)
    }

    fn case_type_name(test: &CaseTest) -> &'static str {
        match test {
            CaseTest::Default => "default",
            CaseTest::Number(_) => "number",
            CaseTest::String(_) => "string",
        }
    }

    fn evaluate_binary(left: Value, operator: BinaryOperator, right: Value) -> LangResult<Value> {
        match (left, right) {
            (Value::Number(left), Value::Number(right)) => match operator {
                BinaryOperator::Add => Ok(Value::Number(left + right)),
                BinaryOperator::Subtract => Ok(Value::Number(left - right)),
                BinaryOperator::Multiply => Ok(Value::Number(left * right)),
                BinaryOperator::Divide => if right == 0.0 {
                    Err(Error::new(ErrorKind::DivisionByZero))
                } else {
                    Ok(Value::Number(left / right))
                },
                BinaryOperator::Modulo => {
                    // Both operands are truncated to integers first
                    let (left, right) = (left.trunc() as i64, right.trunc() as i64);

                    if right == 0 {
                        Err(Error::new(ErrorKind::DivisionByZero))
                    } else {
                        Ok(Value::Number(left.wrapping_rem(right) as f64))
                    }
                },
            },
            (Value::String(left), Value::String(right)) => match operator {
                BinaryOperator::Add => Ok(Value::String(left + &right)),
                _ => Err(Error::new(ErrorKind::UnsupportedOperator {
                    operator: operator.to_string(), left: "string", right: "string",
                })),
            },
            _ => Ok(Value::Null),
        }
    }

    fn evaluate_condition_operator(left: Value, operator: ConditionOperator, right: Value) -> LangResult<Value> {
        let result = match (&left, &right) {
            (Value::Number(left), Value::Number(right)) => Self::compare(left, operator, right),
            (Value::String(left), Value::String(right)) => Self::compare(left, operator, right),
            (Value::Bool(left), Value::Bool(right)) => match operator {
                ConditionOperator::And => Some(*left && *right),
                ConditionOperator::Or => Some(*left || *right),
                _ => None,
            },
            _ => return Ok(Value::Null),
        };

        result.map(Value::Bool).ok_or_else(|| Error::new(ErrorKind::UnsupportedOperator {
            operator: operator.to_string(), left: left.type_name(), right: right.type_name(),
        }))
    }

    fn compare<T: PartialOrd + ?Sized>(left: &T, operator: ConditionOperator, right: &T) -> Option<bool> {
        match operator {
            ConditionOperator::Equal => Some(left == right),
            ConditionOperator::NotEqual => Some(left != right),
            ConditionOperator::Greater => Some(left > right),
            ConditionOperator::GreaterEqual => Some(left >= right),
            ConditionOperator::Less => Some(left < right),
            ConditionOperator::LessEqual => Some(left <= right),
            ConditionOperator::And | ConditionOperator::Or | ConditionOperator::Not => None,
        }
    }

    fn evaluate_call(&mut self, callee: &Node, args: &[Node], environment: &Rc<RefCell<Environment>>) -> LangResult<Value> {
        let args = args.iter()
            .map(|arg| self.evaluate(arg, environment))
            .collect::<LangResult<Vec<Value>>>()?;

        match self.evaluate(callee, environment)? {
            Value::NativeFunction { name, call } => {
                trace!(native = %name, args = args.len(), "calling native function");
                Ok(call(&args, environment))
            },
            Value::Function(function) => self.call_function(&function, args),
            value => Err(Error::at(ErrorKind::NotCallable(value.type_name()), callee.pos)),
        }
    }

    /// Calls `function` in a new frame below its declaration environment.
    ///
    /// Parameters without a matching argument stay undeclared; surplus arguments are ignored.
    pub fn call_function(&mut self, function: &Function, args: Vec<Value>) -> LangResult<Value> {
        if self.depth >= self.max_call_depth {
            return Err(Error::new(ErrorKind::CallDepthExceeded(self.max_call_depth)));
        }

        debug!(function = %function.name, depth = self.depth, "calling function");

        let scope = Environment::new_with_parent(Rc::clone(&function.environment));

        for (parameter, arg) in function.parameters.iter().zip(args) {
            scope.borrow_mut().declare(parameter, arg, false)?;
        }

        self.depth += 1;
        let result = self.evaluate_statements(&function.body, &scope);
        self.depth -= 1;

        result
    }

    fn evaluate_member(&mut self, object: &Node, property: &Node, computed: bool, environment: &Rc<RefCell<Environment>>) -> LangResult<Value> {
        let target = self.evaluate(object, environment)?;

        let key = if computed {
            match self.evaluate(property, environment)? {
                Value::String(key) => key,
                Value::Number(key) => key.to_string(),
                value => return Err(Error::at(ErrorKind::InvalidPropertyKey(value.type_name()), property.pos)),
            }
        } else {
            match &property.kind {
                NodeKind::Identifier(name) => name.clone(),
                _ => return Err(Error::at(ErrorKind::InvalidPropertyKey("expression"), property.pos)),
            }
        };

        match target {
            Value::Object(properties) => {
                let value = properties.borrow().get(&key).cloned();
                Ok(value.unwrap_or(Value::Null))
            },
            value => Err(Error::at(ErrorKind::NotAnObject(value.type_name()), object.pos)),
        }
    }

    fn evaluate_object(&mut self, properties: &[Property], environment: &Rc<RefCell<Environment>>) -> LangResult<Value> {
        let mut object = BTreeMap::new();

        for property in properties {
            let value = match &property.value {
                Some(value) => self.evaluate(value, environment)?,
                None => environment.borrow().lookup(&property.key)
                    .map_err(|kind| Error::at(kind, property.pos))?,
            };

            object.insert(property.key.clone(), value);
        }

        Ok(Value::object(object))
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Evaluator::new(DEFAULT_MAX_CALL_DEPTH)
    }
}
