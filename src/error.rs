use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;

use crate::object::Value;
use crate::token::{Token, Type};

static HAD_ERROR: AtomicBool = AtomicBool::new(false);
static HAD_RUNTIME_ERROR: AtomicBool = AtomicBool::new(false);

/// True if a scan, parse, resolve, or runtime error has been reported.
pub fn did_error() -> bool {
    HAD_ERROR.load(Ordering::Relaxed) || HAD_RUNTIME_ERROR.load(Ordering::Relaxed)
}

/// True if a runtime error has been reported.
pub fn did_runtime_error() -> bool {
    HAD_RUNTIME_ERROR.load(Ordering::Relaxed)
}

/// Clears both flags. Used by the REPL between lines; the global environment is untouched.
pub fn reset_error() {
    HAD_ERROR.store(false, Ordering::Relaxed);
    HAD_RUNTIME_ERROR.store(false, Ordering::Relaxed);
}

/// Prints an error to stderr, logs it, and flips the matching process-wide flag.
pub trait Report {
    fn report(&self);
}

#[derive(Debug, Error)]
#[error("[line {line}] Error: {message}")]
pub struct ScanError {
    pub line: usize,
    pub message: String,
}

impl Report for ScanError {
    fn report(&self) {
        eprintln!("[line {}] Error: {}", self.line, self.message);
        tracing::warn!(line = self.line, message = %self.message, "scan error");
        HAD_ERROR.store(true, Ordering::Relaxed);
    }
}

#[derive(Debug, Error)]
#[error("parse error at '{}': {message}", token.lexeme)]
pub struct ParseError {
    pub token: Token,
    pub message: String,
}

impl Report for ParseError {
    fn report(&self) {
        if self.token.kind == Type::Eof {
            eprintln!("[line {}] Error at end: {}", self.token.line, self.message);
        } else {
            eprintln!(
                "[line {}] Error at '{}': {}",
                self.token.line, self.token.lexeme, self.message
            );
        }
        tracing::warn!(line = self.token.line, message = %self.message, "parse error");
        HAD_ERROR.store(true, Ordering::Relaxed);
    }
}

#[derive(Debug, Error)]
#[error("resolve error at '{}': {message}", token.lexeme)]
pub struct ResolveError {
    pub token: Token,
    pub message: String,
}

impl Report for ResolveError {
    fn report(&self) {
        eprintln!("Error at '{}': {}", self.token.lexeme, self.message);
        tracing::warn!(message = %self.message, "resolve error");
        HAD_ERROR.store(true, Ordering::Relaxed);
    }
}

#[derive(Debug, Error)]
#[error("runtime error: {message}")]
pub struct RuntimeError {
    pub token: Token,
    pub message: String,
}

impl Report for RuntimeError {
    fn report(&self) {
        eprintln!("{}\n[line {}]", self.message, self.token.line);
        tracing::error!(line = self.token.line, message = %self.message, "runtime error");
        HAD_RUNTIME_ERROR.store(true, Ordering::Relaxed);
    }
}

#[derive(Debug, Error)]
#[error("usage error: {message}")]
pub struct UsageError {
    pub message: String,
}

impl Report for UsageError {
    fn report(&self) {
        eprintln!("{}", self.message);
        tracing::error!(message = %self.message, "usage error");
    }
}

/// A function-local return in flight. Not a real error: caught only by the call site that
/// invoked the function, never propagated as a reported failure.
#[derive(Debug)]
pub struct ReturnSignal {
    pub value: Value,
}
