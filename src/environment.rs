use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::RuntimeError;
use crate::object::Value;
use crate::token::Token;

pub type EnvRef = Rc<RefCell<Environment>>;

#[derive(Debug, Default)]
pub struct Environment {
    pub enclosing: Option<EnvRef>,
    values: HashMap<String, Value>,
}

impl Environment {
    pub fn new(enclosing: Option<EnvRef>) -> EnvRef {
        Rc::new(RefCell::new(Environment { enclosing, values: HashMap::new() }))
    }

    /// Unconditionally binds `name` in this scope, shadowing any existing binding.
    pub fn define(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    fn ancestor(this: &EnvRef, distance: usize) -> EnvRef {
        let mut env = Rc::clone(this);
        for _ in 0..distance {
            let parent = env
                .borrow()
                .enclosing
                .clone()
                .expect("resolver distance exceeds environment chain depth");
            env = parent;
        }
        env
    }

    pub fn get(this: &EnvRef, name: &Token) -> Result<Value, RuntimeError> {
        if let Some(value) = this.borrow().values.get(&name.lexeme) {
            return Ok(value.clone());
        }

        if let Some(enclosing) = &this.borrow().enclosing {
            return Environment::get(enclosing, name);
        }

        Err(RuntimeError {
            token: name.clone(),
            message: format!("Undefined variable '{}'.", name.lexeme),
        })
    }

    pub fn get_at(this: &EnvRef, distance: usize, name: &str) -> Value {
        Environment::ancestor(this, distance)
            .borrow()
            .values
            .get(name)
            .cloned()
            .unwrap_or_else(|| panic!("resolved variable '{name}' missing from its scope"))
    }

    pub fn assign(this: &EnvRef, name: &Token, value: Value) -> Result<(), RuntimeError> {
        if this.borrow().values.contains_key(&name.lexeme) {
            this.borrow_mut().values.insert(name.lexeme.clone(), value);
            return Ok(());
        }

        if let Some(enclosing) = this.borrow().enclosing.clone() {
            return Environment::assign(&enclosing, name, value);
        }

        Err(RuntimeError {
            token: name.clone(),
            message: format!("Undefined variable '{}'.", name.lexeme),
        })
    }

    pub fn assign_at(this: &EnvRef, distance: usize, name: &Token, value: Value) {
        Environment::ancestor(this, distance)
            .borrow_mut()
            .values
            .insert(name.lexeme.clone(), value);
    }
}
