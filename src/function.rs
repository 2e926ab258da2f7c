use std::fmt::{self, Debug, Display};
use std::rc::Rc;

use crate::environment::{EnvRef, Environment};
use crate::error::{ReturnSignal, RuntimeError};
use crate::interpreter::Interpreter;
use crate::object::{Callable, Value};
use crate::stmt::FunctionData;
use crate::token::{Token, Type};

/// A user-defined function or method, closed over the environment in which it was declared.
#[derive(Debug, Clone)]
pub struct Function {
    pub declaration: Rc<FunctionData>,
    pub closure: EnvRef,
    pub is_initializer: bool,
}

impl Function {
    pub fn new(declaration: Rc<FunctionData>, closure: EnvRef, is_initializer: bool) -> Self {
        Function { declaration, closure, is_initializer }
    }

    /// Returns a fresh function wrapping the same body but closed over an environment that
    /// additionally binds `this` to the given instance.
    pub fn bind(&self, instance: Value) -> Function {
        let env = Environment::new(Some(Rc::clone(&self.closure)));
        env.borrow_mut().define("this", instance);
        Function::new(Rc::clone(&self.declaration), env, self.is_initializer)
    }
}

impl Callable for Function {
    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Value>) -> Result<Value, RuntimeError> {
        let env = Environment::new(Some(Rc::clone(&self.closure)));

        for (param, arg) in self.declaration.params.iter().zip(arguments.into_iter()) {
            env.borrow_mut().define(&param.lexeme, arg);
        }

        let signal = interpreter.execute_block(&self.declaration.body, env)?;

        if self.is_initializer {
            return Ok(Environment::get_at(&self.closure, 0, "this"));
        }

        match signal {
            Some(ReturnSignal { value }) => Ok(value),
            None => Ok(Value::Nil),
        }
    }

    fn arity(&self) -> usize {
        self.declaration.params.len()
    }
}

impl Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<fn {}>", self.declaration.name.lexeme)
    }
}

/// A host-provided function exposed to language code, e.g. `clock`.
pub struct NativeFunction {
    pub name: &'static str,
    pub arity: usize,
    pub function: fn(&mut Interpreter, Vec<Value>) -> Result<Value, RuntimeError>,
}

impl Callable for NativeFunction {
    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Value>) -> Result<Value, RuntimeError> {
        (self.function)(interpreter, arguments)
    }

    fn arity(&self) -> usize {
        self.arity
    }
}

impl NativeFunction {
    /// The native function table installed in globals at startup.
    pub fn globals() -> Vec<NativeFunction> {
        vec![
            NativeFunction {
                name: "clock",
                arity: 0,
                function: |_, _| {
                    let now = std::time::SystemTime::now()
                        .duration_since(std::time::UNIX_EPOCH)
                        .unwrap_or_default()
                        .as_secs_f64();
                    Ok(Value::Number(now))
                },
            },
            NativeFunction {
                name: "input",
                arity: 0,
                function: |_, _| {
                    let mut line = String::new();
                    std::io::stdin()
                        .read_line(&mut line)
                        .map_err(|e| RuntimeError {
                            token: Token::new(Type::Identifier, "input".into(), None, 0),
                            message: format!("Failed to read stdin: {e}"),
                        })?;
                    if line.ends_with('\n') {
                        line.pop();
                        if line.ends_with('\r') {
                            line.pop();
                        }
                    }
                    Ok(Value::String(line))
                },
            },
        ]
    }
}

impl Display for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native fn>")
    }
}

impl Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native fn>")
    }
}
