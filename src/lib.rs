#![allow(clippy::needless_return)]

//! wisp is a small dynamically typed programming language with lexical scoping, closures, and
//! single-inheritance classes. It is implemented as a tree-walking interpreter: a hand-written
//! recursive-descent parser builds an AST, a resolver pass statically fixes the scope of every
//! variable reference, and an evaluator walks the resolved tree directly rather than compiling it
//! to bytecode.
//!
//! ## Scanning
//! The first step converts source text into a list of tokens. The scanner is implemented in the
//! [`scanner`](scanner) module over a peekable character iterator. It reports syntax errors as a
//! [`ScanError`](error::ScanError) — an unterminated string or an unrecognized character — and
//! keeps scanning afterwards so a single pass can surface more than one problem.
//!
//! ## Parsing
//! The parser, in [`parser`](parser), is recursive descent: one method per grammar rule, turning
//! tokens into [`Expr`](expr::Expr) and [`Stmt`](stmt::Stmt) nodes. Expressions produce a
//! [`Value`](object::Value); statements perform a side effect. Parse errors are reported as a
//! [`ParseError`](error::ParseError) and the parser synchronizes to the next statement boundary so
//! it, too, can report more than one error per run.
//!
//! ## Resolving
//! [`resolver`](resolver) performs a static pass over the AST that assigns each variable/`this`/
//! `super` reference a scope distance, fixing the classic bug where a closure captures the wrong
//! binding after a later shadowing declaration. It reports [`ResolveError`](error::ResolveError)
//! for scope-sensitive mistakes that are syntactically valid but never executable, such as
//! returning a value from an initializer.
//!
//! ## Interpreting
//! [`interpreter`](interpreter) walks the resolved AST, consulting the resolver's distance table
//! for every variable lookup instead of searching. It reports [`RuntimeError`](error::RuntimeError)
//! for the failures that can only be detected at runtime — calling a non-callable value, adding a
//! string to a number, and so on.

use std::fs;
use std::io::{self, Write};

pub mod class;
pub mod environment;
pub mod error;
pub mod expr;
pub mod function;
pub mod interpreter;
pub mod literal;
pub mod object;
pub mod parser;
pub mod resolver;
pub mod scanner;
pub mod stmt;
pub mod token;

#[cfg(test)]
mod ast_printer;

use error::Report;
use interpreter::Interpreter;
use parser::Parser;
use resolver::Resolver;
use scanner::Scanner;

/// Glues the scanner, parser, resolver, and evaluator together. One instance persists across an
/// entire REPL session so the global environment survives between lines.
#[allow(non_camel_case_types)]
pub struct wisp {
    interpreter: Interpreter,
}

impl wisp {
    pub fn new(output: Box<dyn Write>) -> Self {
        wisp { interpreter: Interpreter::new(output) }
    }

    /// Runs a file to completion. Check [`error::did_error`]/[`error::did_runtime_error`]
    /// afterwards to pick an exit code.
    pub fn run_file(&mut self, path: &str) -> io::Result<()> {
        let source = fs::read_to_string(path)?;
        self.run(&source);
        Ok(())
    }

    /// Runs one REPL line. The global environment persists; only the error flags reset.
    pub fn run_line(&mut self, source: &str) {
        self.run(source);
        error::reset_error();
    }

    fn run(&mut self, source: &str) {
        let scanner = Scanner::new(source);
        let tokens = scanner.scan_tokens();

        if error::did_error() {
            return;
        }

        let mut parser = Parser::new(tokens);
        let statements = parser.parse();

        if error::did_error() {
            return;
        }

        let mut resolver = Resolver::new(&mut self.interpreter);
        resolver.resolve(&statements);

        if error::did_error() {
            return;
        }

        if let Err(runtime_error) = self.interpreter.interpret(&statements) {
            runtime_error.report();
        }
    }
}
