use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::{self, Debug, Display};
use std::rc::Rc;

use crate::error::RuntimeError;
use crate::function::Function;
use crate::interpreter::Interpreter;
use crate::object::Value;
use crate::token::Token;

/// Constructs a new instance of `class` and runs its `init` method, if any. Takes the class's own
/// `Rc` handle (rather than a bare `&Class`) since the constructed `Instance` must hold a strong
/// reference back to it; this is why class construction is not expressed through `Callable`.
pub fn construct(
    class: &Rc<RefCell<Class>>,
    interpreter: &mut Interpreter,
    arguments: Vec<Value>,
) -> Result<Value, RuntimeError> {
    let instance = Rc::new(RefCell::new(Instance::new(Rc::clone(class))));

    if let Some(init) = class.borrow().find_method("init") {
        init.bind(Value::Instance(Rc::clone(&instance))).call(interpreter, arguments)?;
    }

    Ok(Value::Instance(instance))
}

#[derive(Debug)]
pub struct Class {
    pub name: String,
    pub superclass: Option<Rc<RefCell<Class>>>,
    pub methods: HashMap<String, Function>,
}

impl Class {
    pub fn new(name: String, superclass: Option<Rc<RefCell<Class>>>, methods: HashMap<String, Function>) -> Self {
        Class { name, superclass, methods }
    }

    /// Looks up a method by name, walking the superclass chain.
    pub fn find_method(&self, name: &str) -> Option<Function> {
        if let Some(method) = self.methods.get(name) {
            return Some(method.clone());
        }
        self.superclass.as_ref().and_then(|sup| sup.borrow().find_method(name))
    }
}

impl Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl Class {
    pub fn arity(&self) -> usize {
        self.find_method("init").map(|init| init.arity()).unwrap_or(0)
    }
}

#[derive(Debug)]
pub struct Instance {
    pub class: Rc<RefCell<Class>>,
    pub fields: HashMap<String, Value>,
}

impl Instance {
    pub fn new(class: Rc<RefCell<Class>>) -> Self {
        Instance { class, fields: HashMap::new() }
    }

    pub fn get(&self, name: &Token, this: &Value) -> Result<Value, RuntimeError> {
        if let Some(field) = self.fields.get(&name.lexeme) {
            return Ok(field.clone());
        }

        if let Some(method) = self.class.borrow().find_method(&name.lexeme) {
            return Ok(Value::Function(Rc::new(method.bind(this.clone()))));
        }

        Err(RuntimeError {
            token: name.clone(),
            message: format!("Undefined property '{}'.", name.lexeme),
        })
    }

    pub fn set(&mut self, name: &Token, value: Value) {
        self.fields.insert(name.lexeme.clone(), value);
    }
}

impl Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} instance", self.class.borrow().name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::Environment;
    use crate::stmt::FunctionData;
    use crate::token::Type;

    fn ident(name: &str) -> Token {
        Token::new(Type::Identifier, name.to_string(), None, 1)
    }

    fn method(name: &str) -> Function {
        let declaration =
            Rc::new(FunctionData { name: ident(name), params: Vec::new(), body: Vec::new() });
        Function::new(declaration, Environment::new(None), name == "init")
    }

    #[test]
    fn find_method_walks_the_superclass_chain() {
        let mut base_methods = HashMap::new();
        base_methods.insert("greet".to_string(), method("greet"));
        let base = Rc::new(RefCell::new(Class::new("Base".to_string(), None, base_methods)));

        let derived = Class::new("Derived".to_string(), Some(Rc::clone(&base)), HashMap::new());

        assert!(derived.find_method("greet").is_some());
        assert!(derived.find_method("missing").is_none());
    }

    #[test]
    fn a_method_defined_on_the_subclass_shadows_the_superclass_version() {
        let mut base_methods = HashMap::new();
        base_methods.insert("greet".to_string(), method("greet"));
        let base = Rc::new(RefCell::new(Class::new("Base".to_string(), None, base_methods)));

        let mut derived_methods = HashMap::new();
        derived_methods.insert("greet".to_string(), method("greet"));
        let derived = Class::new("Derived".to_string(), Some(base), derived_methods);

        let found = derived.find_method("greet").unwrap();
        assert!(Rc::ptr_eq(&found.declaration, &derived.methods.get("greet").unwrap().declaration));
    }

    #[test]
    fn arity_is_the_initializers_arity_or_zero_without_one() {
        let no_init = Class::new("Plain".to_string(), None, HashMap::new());
        assert_eq!(no_init.arity(), 0);

        let mut methods = HashMap::new();
        let declaration = Rc::new(FunctionData {
            name: ident("init"),
            params: vec![ident("a"), ident("b")],
            body: Vec::new(),
        });
        methods.insert("init".to_string(), Function::new(declaration, Environment::new(None), true));
        let with_init = Class::new("Sized".to_string(), None, methods);
        assert_eq!(with_init.arity(), 2);
    }

    #[test]
    fn instance_get_reports_undefined_property() {
        let class = Rc::new(RefCell::new(Class::new("Empty".to_string(), None, HashMap::new())));
        let instance = Instance::new(class);
        let err = instance.get(&ident("missing"), &Value::Nil).unwrap_err();
        assert_eq!(err.message, "Undefined property 'missing'.");
    }

    #[test]
    fn instance_display_appends_instance() {
        let class = Rc::new(RefCell::new(Class::new("Widget".to_string(), None, HashMap::new())));
        let instance = Instance::new(class);
        assert_eq!(instance.to_string(), "Widget instance");
    }
}
