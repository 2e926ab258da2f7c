use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;
use std::rc::Rc;

use crate::class::{self, Class};
use crate::environment::{EnvRef, Environment};
use crate::error::{ReturnSignal, RuntimeError};
use crate::expr::*;
use crate::function::{Function, NativeFunction};
use crate::literal::Literal;
use crate::object::{Callable, Value};
use crate::stmt::*;
use crate::token::Type;

/// Walks the AST, evaluating expressions and executing statements. Output goes through an
/// injectable sink so tests can capture `print` without touching real stdout.
pub struct Interpreter {
    pub globals: EnvRef,
    environment: EnvRef,
    locals: HashMap<NodeId, usize>,
    output: Box<dyn Write>,
}

impl Interpreter {
    pub fn new(output: Box<dyn Write>) -> Self {
        let globals = Environment::new(None);
        for native in NativeFunction::globals() {
            globals.borrow_mut().define(native.name, Value::NativeFunction(Rc::new(native)));
        }

        Interpreter { environment: Rc::clone(&globals), globals, locals: HashMap::new(), output }
    }

    pub fn resolve(&mut self, id: NodeId, depth: usize) {
        self.locals.insert(id, depth);
    }

    /// Exposed crate-internally so tests can assert the resolver is idempotent.
    pub(crate) fn locals(&self) -> &HashMap<NodeId, usize> {
        &self.locals
    }

    pub fn interpret(&mut self, statements: &[Stmt]) -> Result<(), RuntimeError> {
        for statement in statements {
            self.execute(statement)?;
        }
        Ok(())
    }

    fn execute(&mut self, stmt: &Stmt) -> Result<Option<ReturnSignal>, RuntimeError> {
        stmt.accept(self)
    }

    fn evaluate(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        expr.accept(self)
    }

    /// Runs `statements` in a fresh child of `environment`, restoring the caller's environment
    /// on every exit path, including a propagating return.
    pub fn execute_block(
        &mut self,
        statements: &[Stmt],
        environment: EnvRef,
    ) -> Result<Option<ReturnSignal>, RuntimeError> {
        tracing::debug!("enter new environment");
        let previous = std::mem::replace(&mut self.environment, environment);

        let mut result = Ok(None);
        for statement in statements {
            match self.execute(statement) {
                Ok(None) => continue,
                other => {
                    result = other;
                    break;
                }
            }
        }

        self.environment = previous;
        tracing::debug!("restored enclosing environment");
        result
    }

    fn lookup_variable(&mut self, id: NodeId, name: &crate::token::Token) -> Result<Value, RuntimeError> {
        match self.locals.get(&id) {
            Some(&distance) => {
                tracing::debug!(name = %name.lexeme, distance, "variable distance");
                Ok(Environment::get_at(&self.environment, distance, &name.lexeme))
            }
            None => {
                tracing::debug!(name = %name.lexeme, "variable treated as global");
                Environment::get(&self.globals, name)
            }
        }
    }

    fn check_number_operand(&self, operator: &crate::token::Token, value: &Value) -> Result<f64, RuntimeError> {
        match value {
            Value::Number(n) => Ok(*n),
            _ => Err(RuntimeError { token: operator.clone(), message: "Operand must be a number.".to_string() }),
        }
    }

    fn check_number_operands(
        &self,
        operator: &crate::token::Token,
        left: &Value,
        right: &Value,
    ) -> Result<(f64, f64), RuntimeError> {
        match (left, right) {
            (Value::Number(l), Value::Number(r)) => Ok((*l, *r)),
            _ => Err(RuntimeError { token: operator.clone(), message: "Operands must be numbers.".to_string() }),
        }
    }
}

impl ExprVisitor<Result<Value, RuntimeError>> for Interpreter {
    fn visit_literal_expr(&mut self, literal: &Literal) -> Result<Value, RuntimeError> {
        Ok(Value::from(literal.clone()))
    }

    fn visit_grouping_expr(&mut self, data: &GroupingData) -> Result<Value, RuntimeError> {
        self.evaluate(&data.expr)
    }

    fn visit_unary_expr(&mut self, data: &UnaryData) -> Result<Value, RuntimeError> {
        let right = self.evaluate(&data.expr)?;

        match data.operator.kind {
            Type::Minus => Ok(Value::Number(-self.check_number_operand(&data.operator, &right)?)),
            Type::Bang => Ok(Value::Bool(!right.is_truthy())),
            _ => unreachable!("unary operator token kind is closed to Bang/Minus"),
        }
    }

    fn visit_binary_expr(&mut self, data: &BinaryData) -> Result<Value, RuntimeError> {
        let left = self.evaluate(&data.left)?;
        let right = self.evaluate(&data.right)?;

        match data.operator.kind {
            Type::Minus => {
                let (l, r) = self.check_number_operands(&data.operator, &left, &right)?;
                Ok(Value::Number(l - r))
            }
            Type::Slash => {
                let (l, r) = self.check_number_operands(&data.operator, &left, &right)?;
                Ok(Value::Number(l / r))
            }
            Type::Star => {
                let (l, r) = self.check_number_operands(&data.operator, &left, &right)?;
                Ok(Value::Number(l * r))
            }
            Type::Plus => match (left, right) {
                (Value::Number(l), Value::Number(r)) => Ok(Value::Number(l + r)),
                (Value::String(l), Value::String(r)) => Ok(Value::String(l + &r)),
                _ => Err(RuntimeError {
                    token: data.operator.clone(),
                    message: "Operands must be two numbers or two strings.".to_string(),
                }),
            },
            Type::Greater => {
                let (l, r) = self.check_number_operands(&data.operator, &left, &right)?;
                Ok(Value::Bool(l > r))
            }
            Type::GreaterEqual => {
                let (l, r) = self.check_number_operands(&data.operator, &left, &right)?;
                Ok(Value::Bool(l >= r))
            }
            Type::Less => {
                let (l, r) = self.check_number_operands(&data.operator, &left, &right)?;
                Ok(Value::Bool(l < r))
            }
            Type::LessEqual => {
                let (l, r) = self.check_number_operands(&data.operator, &left, &right)?;
                Ok(Value::Bool(l <= r))
            }
            Type::BangEqual => Ok(Value::Bool(left != right)),
            Type::EqualEqual => Ok(Value::Bool(left == right)),
            _ => unreachable!("binary operator token kind is closed to the arithmetic/comparison set"),
        }
    }

    fn visit_variable_expr(&mut self, data: &VariableData) -> Result<Value, RuntimeError> {
        self.lookup_variable(data.id, &data.name)
    }

    fn visit_assign_expr(&mut self, data: &AssignData) -> Result<Value, RuntimeError> {
        let value = self.evaluate(&data.value)?;

        match self.locals.get(&data.id) {
            Some(&distance) => Environment::assign_at(&self.environment, distance, &data.name, value.clone()),
            None => Environment::assign(&self.globals, &data.name, value.clone())?,
        }

        Ok(value)
    }

    fn visit_logical_expr(&mut self, data: &LogicalData) -> Result<Value, RuntimeError> {
        let left = self.evaluate(&data.left)?;

        if data.operator.kind == Type::Or {
            if left.is_truthy() {
                return Ok(left);
            }
        } else if !left.is_truthy() {
            return Ok(left);
        }

        self.evaluate(&data.right)
    }

    fn visit_call_expr(&mut self, data: &CallData) -> Result<Value, RuntimeError> {
        let callee = self.evaluate(&data.callee)?;
        tracing::debug!(callee = %callee, "evaluating call");

        let mut arguments = Vec::with_capacity(data.arguments.len());
        for argument in &data.arguments {
            arguments.push(self.evaluate(argument)?);
        }

        let arity = match &callee {
            Value::Function(f) => f.arity(),
            Value::NativeFunction(f) => f.arity(),
            Value::Class(c) => c.borrow().arity(),
            _ => {
                return Err(RuntimeError {
                    token: data.paren.clone(),
                    message: "Can only call functions and classes.".to_string(),
                })
            }
        };

        if arity != arguments.len() {
            return Err(RuntimeError {
                token: data.paren.clone(),
                message: format!("Expected {arity} arguments but got {}.", arguments.len()),
            });
        }

        match callee {
            Value::Function(f) => f.call(self, arguments),
            Value::NativeFunction(f) => f.call(self, arguments),
            Value::Class(c) => class::construct(&c, self, arguments),
            _ => unreachable!("non-callable values are rejected above"),
        }
    }

    fn visit_get_expr(&mut self, data: &GetData) -> Result<Value, RuntimeError> {
        let object = self.evaluate(&data.object)?;

        match &object {
            Value::Instance(instance) => instance.borrow().get(&data.name, &object),
            _ => Err(RuntimeError {
                token: data.name.clone(),
                message: "Only instances have properties.".to_string(),
            }),
        }
    }

    fn visit_set_expr(&mut self, data: &SetData) -> Result<Value, RuntimeError> {
        let object = self.evaluate(&data.object)?;

        let Value::Instance(instance) = object else {
            return Err(RuntimeError {
                token: data.name.clone(),
                message: "Only instances have fields.".to_string(),
            });
        };

        let value = self.evaluate(&data.value)?;
        instance.borrow_mut().set(&data.name, value.clone());
        Ok(value)
    }

    fn visit_this_expr(&mut self, data: &ThisData) -> Result<Value, RuntimeError> {
        self.lookup_variable(data.id, &data.keyword)
    }

    fn visit_super_expr(&mut self, data: &SuperData) -> Result<Value, RuntimeError> {
        let distance = *self.locals.get(&data.id).expect("resolver must record a distance for 'super'");

        let superclass = Environment::get_at(&self.environment, distance, "super");
        let Value::Class(superclass) = superclass else {
            unreachable!("'super' always resolves to the superclass object");
        };

        let this = Environment::get_at(&self.environment, distance - 1, "this");

        let method = superclass.borrow().find_method(&data.method.lexeme).ok_or_else(|| RuntimeError {
            token: data.method.clone(),
            message: format!("Undefined property '{}'.", data.method.lexeme),
        })?;

        Ok(Value::Function(Rc::new(method.bind(this))))
    }
}

impl StmtVisitor<Result<Option<ReturnSignal>, RuntimeError>> for Interpreter {
    fn visit_expression_stmt(&mut self, data: &ExpressionData) -> Result<Option<ReturnSignal>, RuntimeError> {
        self.evaluate(&data.expr)?;
        Ok(None)
    }

    fn visit_print_stmt(&mut self, data: &PrintData) -> Result<Option<ReturnSignal>, RuntimeError> {
        let value = self.evaluate(&data.expr)?;
        let _ = writeln!(self.output, "{value}");
        Ok(None)
    }

    fn visit_var_stmt(&mut self, data: &VarData) -> Result<Option<ReturnSignal>, RuntimeError> {
        let value = match &data.initializer {
            Some(expr) => self.evaluate(expr)?,
            None => Value::Nil,
        };
        self.environment.borrow_mut().define(&data.name.lexeme, value);
        Ok(None)
    }

    fn visit_block_stmt(&mut self, data: &BlockData) -> Result<Option<ReturnSignal>, RuntimeError> {
        let scope = Environment::new(Some(Rc::clone(&self.environment)));
        self.execute_block(&data.statements, scope)
    }

    fn visit_if_stmt(&mut self, data: &IfData) -> Result<Option<ReturnSignal>, RuntimeError> {
        if self.evaluate(&data.condition)?.is_truthy() {
            self.execute(&data.then_branch)
        } else if let Some(else_branch) = &data.else_branch {
            self.execute(else_branch)
        } else {
            Ok(None)
        }
    }

    fn visit_while_stmt(&mut self, data: &WhileData) -> Result<Option<ReturnSignal>, RuntimeError> {
        while self.evaluate(&data.condition)?.is_truthy() {
            if let Some(signal) = self.execute(&data.body)? {
                return Ok(Some(signal));
            }
        }
        Ok(None)
    }

    fn visit_function_stmt(&mut self, data: &FunctionData) -> Result<Option<ReturnSignal>, RuntimeError> {
        let function = Function::new(Rc::new(data.clone()), Rc::clone(&self.environment), false);
        self.environment.borrow_mut().define(&data.name.lexeme, Value::Function(Rc::new(function)));
        Ok(None)
    }

    fn visit_return_stmt(&mut self, data: &ReturnData) -> Result<Option<ReturnSignal>, RuntimeError> {
        let value = match &data.value {
            Some(expr) => self.evaluate(expr)?,
            None => Value::Nil,
        };
        Ok(Some(ReturnSignal { value }))
    }

    fn visit_class_stmt(&mut self, data: &ClassData) -> Result<Option<ReturnSignal>, RuntimeError> {
        let superclass = match &data.superclass {
            Some(expr) => {
                let value = self.evaluate(expr)?;
                let Value::Class(class) = value else {
                    let token = match expr {
                        Expr::Variable(v) => v.name.clone(),
                        _ => unreachable!("superclass expression is always a Variable"),
                    };
                    return Err(RuntimeError { token, message: "Superclass must be a class.".to_string() });
                };
                Some(class)
            }
            None => None,
        };

        self.environment.borrow_mut().define(&data.name.lexeme, Value::Nil);

        let method_closure = if let Some(superclass) = &superclass {
            let env = Environment::new(Some(Rc::clone(&self.environment)));
            env.borrow_mut().define("super", Value::Class(Rc::clone(superclass)));
            env
        } else {
            Rc::clone(&self.environment)
        };

        let mut methods = HashMap::new();
        for method in &data.methods {
            let is_initializer = method.name.lexeme == "init";
            let function = Function::new(Rc::new(method.clone()), Rc::clone(&method_closure), is_initializer);
            methods.insert(method.name.lexeme.clone(), function);
        }

        let class = Rc::new(RefCell::new(Class::new(data.name.lexeme.clone(), superclass, methods)));
        Environment::assign(&self.environment, &data.name, Value::Class(class))?;

        Ok(None)
    }
}
