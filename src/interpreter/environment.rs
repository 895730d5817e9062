use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use crate::interpreter::error::ErrorKind;
use crate::interpreter::value::Value;

#[cfg(test)]
mod tests;

/// One frame of the scope chain.
///
/// Parents are held strongly: a function value keeps its declaration
/// environment (and everything above it) alive for as long as it is reachable.
#[derive(Default)]
pub struct Environment {
    parent: Option<Rc<RefCell<Environment>>>,
    variables: HashMap<String, Value>,
    constants: HashSet<String>,
}

impl Environment {
    pub fn new_global() -> Rc<RefCell<Environment>> {
        Rc::new(RefCell::new(Environment::default()))
    }

    pub fn new_with_parent(parent: Rc<RefCell<Environment>>) -> Rc<RefCell<Environment>> {
        Rc::new(RefCell::new(Environment {
            parent: Some(parent),
            variables: HashMap::new(),
            constants: HashSet::new(),
        }))
    }

    /// Declares `name` in this frame. Fails without changing anything if the frame already has it.
    pub fn declare(&mut self, name: &str, value: Value, constant: bool) -> Result<Value, ErrorKind> {
        if self.variables.contains_key(name) {
            return Err(ErrorKind::Redeclaration(name.to_owned()));
        }

        if constant {
            self.constants.insert(name.to_owned());
        }

        self.variables.insert(name.to_owned(), value.clone());
        Ok(value)
    }

    /// Assigns to the nearest frame that owns `name`.
    pub fn assign(&mut self, name: &str, value: Value) -> Result<Value, ErrorKind> {
        if let Some(slot) = self.variables.get_mut(name) {
            if self.constants.contains(name) {
                return Err(ErrorKind::ConstantAssignment(name.to_owned()));
            }

            *slot = value.clone();
            return Ok(value);
        }

        match &self.parent {
            Some(parent) => parent.borrow_mut().assign(name, value),
            None => Err(ErrorKind::Unresolved(name.to_owned())),
        }
    }

    pub fn lookup(&self, name: &str) -> Result<Value, ErrorKind> {
        match self.variables.get(name) {
            Some(value) => Ok(value.clone()),
            None => match &self.parent {
                Some(parent) => parent.borrow().lookup(name),
                None => Err(ErrorKind::Unresolved(name.to_owned())),
            },
        }
    }

    pub fn has_variable(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    pub fn is_constant(&self, name: &str) -> bool {
        self.constants.contains(name)
    }
}
