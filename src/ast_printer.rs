//! A debug-only `ExprVisitor<String>` used by parser tests to check that two programs parse to
//! the same tree. Never exposed outside the crate: printing is not part of the language surface.
//!
//! `Literal`/`Unary`/`Binary`/`Grouping` print as fully-parenthesized infix text (e.g. `(1 + 2)`,
//! `-4`) rather than the Lisp-style prefix form used for the remaining variants, specifically so
//! that output stays valid surface syntax: feeding it back through the scanner/parser and printing
//! again reproduces the same text. The other variants (`Assign`, `Call`, ...) keep the old prefix
//! form since nothing requires them to round-trip.

use crate::expr::*;
use crate::literal::Literal;

macro_rules! parenthesize {
    ( $self:ident, $name:expr, $( $x:expr ),+ ) => {{
        let mut string = String::new();
        string += "(";
        string += $name;
        $(
            string += " ";
            string += &$x.accept($self);
        )*
        string += ")";
        string
    }};
}

pub struct AstPrinter;

impl AstPrinter {
    pub fn print(&mut self, expr: &Expr) -> String {
        expr.accept(self)
    }
}

impl ExprVisitor<String> for AstPrinter {
    fn visit_literal_expr(&mut self, literal: &Literal) -> String {
        literal.to_string()
    }

    fn visit_unary_expr(&mut self, data: &UnaryData) -> String {
        format!("{}{}", data.operator.lexeme, data.expr.accept(self))
    }

    fn visit_binary_expr(&mut self, data: &BinaryData) -> String {
        format!("({} {} {})", data.left.accept(self), data.operator.lexeme, data.right.accept(self))
    }

    fn visit_grouping_expr(&mut self, data: &GroupingData) -> String {
        // No parens of its own: a parenthesized `Binary`/`Unary` child already carries them, and a
        // bare `Literal` child needs none to stay reparseable.
        data.expr.accept(self)
    }

    fn visit_variable_expr(&mut self, data: &VariableData) -> String {
        data.name.lexeme.clone()
    }

    fn visit_assign_expr(&mut self, data: &AssignData) -> String {
        parenthesize!(self, format!("= {}", data.name.lexeme).as_str(), data.value)
    }

    fn visit_logical_expr(&mut self, data: &LogicalData) -> String {
        parenthesize!(self, &data.operator.lexeme, &data.left, &data.right)
    }

    fn visit_call_expr(&mut self, data: &CallData) -> String {
        let mut string = data.callee.accept(self);
        string += "(";
        string += &data.arguments.iter().map(|arg| arg.accept(self)).collect::<Vec<_>>().join(" ");
        string += ")";
        string
    }

    fn visit_get_expr(&mut self, data: &GetData) -> String {
        parenthesize!(self, &format!(".{}", data.name.lexeme), data.object)
    }

    fn visit_set_expr(&mut self, data: &SetData) -> String {
        parenthesize!(self, &format!("=.{}", data.name.lexeme), data.object, data.value)
    }

    fn visit_this_expr(&mut self, _data: &ThisData) -> String {
        "this".to_string()
    }

    fn visit_super_expr(&mut self, data: &SuperData) -> String {
        format!("(super.{})", data.method.lexeme)
    }
}
