use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;
use crate::interpreter::ast::NodeKind;
use crate::interpreter::environment::Environment;
use crate::interpreter::error::LangResult;
use crate::interpreter::evaluator::Evaluator;
use crate::interpreter::natives;
use crate::interpreter::parser;
use crate::interpreter::value::Value;


/// Parses and evaluates source text against one persistent root environment.
pub struct Interpreter {
    environment: Rc<RefCell<Environment>>,
    evaluator: Evaluator,
}

impl Interpreter {
    pub fn new(max_call_depth: usize) -> LangResult<Interpreter> {
        let environment = Environment::new_global();
        natives::register(&environment)?;

        Ok(Interpreter {
            environment,
            evaluator: Evaluator::new(max_call_depth),
        })
    }

    pub fn environment(&self) -> &Rc<RefCell<Environment>> {
        &self.environment
    }

    /// Declares a constant host function in the root environment.
    pub fn define_native<F>(&mut self, name: &str, call: F) -> LangResult<()>
    where F: Fn(&[Value], &Rc<RefCell<Environment>>) -> Value + 'static {
        self.environment.borrow_mut().declare(name, Value::native(name, call), true)?;
        Ok(())
    }

    /// Runs `source`, keeping its declarations for later runs. Yields the value of the last statement.
    pub fn run(&mut self, source: &str) -> LangResult<Value> {
        let program = parser::parse(source)?;

        match &program.kind {
            NodeKind::Program(statements) => {
                debug!(statements = statements.len(), "evaluating program");
                self.evaluator.evaluate_statements(statements, &self.environment)
            },
            _ => self.evaluator.evaluate(&program, &self.environment),
        }
    }
}
