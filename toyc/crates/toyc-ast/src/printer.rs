//! Indented diagnostic dump of a tree.
//!
//! The output is for humans only and has no grammar beyond one line per node,
//! indented by depth, with `--section--` headers where a node owns more than
//! one list.

use std::fmt;
use std::io::{self, Write};

use crate::ast::*;

/// Spaces per depth level
pub const DEFAULT_INDENT: usize = 3;

/// Print `node` at `depth` onto `out`. An absent node prints nothing.
pub fn print_tree<W: Write>(node: Option<&Node>, depth: usize, out: &mut W) -> io::Result<()> {
    TreePrinter::new(out).print(node, depth)
}

/// Recursive tree printer writing to any [`Write`] sink
pub struct TreePrinter<W: Write> {
    out: W,
    indent: usize,
}

impl<W: Write> TreePrinter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            indent: DEFAULT_INDENT,
        }
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn print(&mut self, node: Option<&Node>, depth: usize) -> io::Result<()> {
        let Some(node) = node else {
            return Ok(());
        };

        match node {
            Node::Program(program) => {
                self.line(depth, format_args!("Whole Program AST:"))?;
                self.header(depth + 1, "globalvars")?;
                for decl in &program.globals {
                    self.var_decl(decl, depth + 1)?;
                }
                self.header(depth + 1, "functions")?;
                for function in &program.functions {
                    self.function(function, depth + 1)?;
                }
                self.header(depth + 1, "program")?;
                self.list(&program.statements, depth + 1)?;
            }
            Node::VarDecl(decl) => self.var_decl(decl, depth)?,
            Node::Function(function) => self.function(function, depth)?,
            Node::StatementBlock(block) => {
                self.line(depth, format_args!("Statement block"))?;
                self.list(&block.statements, depth + 1)?;
            }
            Node::FunctionCall(call) => {
                self.line(depth, format_args!("Function call ({})", call.name))?;
                for arg in &call.args {
                    self.argument(arg, depth + 1)?;
                }
            }
            Node::Argument(arg) => self.argument(arg, depth)?,
            Node::Assignment(assign) => {
                if let Access::Array { index } = &assign.target {
                    self.line(depth, format_args!("Assignment to ({}) array var", assign.name))?;
                    self.header(depth + 1, "index")?;
                    self.print(Some(index), depth + 1)?;
                } else {
                    self.line(depth, format_args!("Assignment to ({}) simple var", assign.name))?;
                }
                self.header(depth + 1, "right hand side")?;
                self.print(Some(&assign.value), depth + 1)?;
            }
            Node::While(w) => {
                self.line(depth, format_args!("While loop"))?;
                self.print(Some(&w.cond), depth + 1)?;
                self.header(depth + 1, "body")?;
                self.list(&w.body, depth + 1)?;
            }
            Node::IfThen(branch) => {
                self.line(depth, format_args!("If then"))?;
                self.print(Some(&branch.cond), depth + 1)?;
                self.header(depth + 1, "ifpart")?;
                self.list(&branch.then_branch, depth + 1)?;
                self.header(depth + 1, "elsepart")?;
                self.list(&branch.else_branch, depth + 1)?;
            }
            Node::IfThenElse(branch) => {
                self.line(depth, format_args!("If-Then-Else"))?;
                self.print(Some(&branch.cond), depth + 1)?;
                self.list(&branch.then_branch, depth + 1)?;
                self.list(&branch.else_branch, depth + 1)?;
            }
            Node::Expression(e) => {
                let op = e.op.symbol();
                self.line(depth, format_args!("Expression (op {},{})", op as u32, op))?;
                self.print(Some(&e.lhs), depth + 1)?;
                self.print(Some(&e.rhs), depth + 1)?;
            }
            Node::RelationalExpression(r) => {
                let op = r.op.symbol();
                self.line(
                    depth,
                    format_args!("Relational Expression (op {},{})", op as u32, op),
                )?;
                self.print(Some(&r.lhs), depth + 1)?;
                self.print(Some(&r.rhs), depth + 1)?;
            }
            Node::VariableRef(var) => {
                if let Access::Array { index } = &var.access {
                    self.line(depth, format_args!("Variable ref ({}) array ref", var.name))?;
                    self.print(Some(index), depth + 1)?;
                } else {
                    self.line(depth, format_args!("Variable ref ({})", var.name))?;
                }
            }
            Node::Constant(c) => match &c.value {
                ConstValue::Int(v) => self.line(depth, format_args!("Int Constant = {}", v))?,
                ConstValue::Long(v) => self.line(depth, format_args!("Long Constant = {}", v))?,
                ConstValue::Str(text) => {
                    self.line(depth, format_args!("String Constant = ({})", text))?
                }
                ConstValue::ReturnValue => self.line(depth, format_args!("Return value"))?,
            },
        }
        Ok(())
    }

    fn list(&mut self, nodes: &[Node], depth: usize) -> io::Result<()> {
        for node in nodes {
            self.print(Some(node), depth)?;
        }
        Ok(())
    }

    fn var_decl(&mut self, decl: &VarDecl, depth: usize) -> io::Result<()> {
        let name = &decl.name;
        match (decl.ty, decl.storage) {
            (ValueType::Int, DeclStorage::GlobalArray { len }) => self.line(
                depth,
                format_args!("Variable declaration ({}) type int array size {}", name, len),
            )?,
            (ValueType::Int | ValueType::Long | ValueType::String, _) => self.line(
                depth,
                format_args!("Variable declaration ({}) type {}", name, decl.ty),
            )?,
            (ValueType::ReturnValue, _) => self.line(
                depth,
                format_args!("Variable declaration ({}) type unknown ({})", name, decl.ty),
            )?,
        }
        self.print(decl.init.as_deref(), depth + 1)
    }

    fn function(&mut self, function: &Function, depth: usize) -> io::Result<()> {
        self.line(depth, format_args!("Function def ({})", function.name))?;
        self.header(depth + 1, "params")?;
        for param in &function.params {
            self.var_decl(param, depth + 1)?;
        }
        self.header(depth + 1, "locals")?;
        for local in &function.locals {
            self.var_decl(local, depth + 1)?;
        }
        self.header(depth + 1, "body")?;
        self.list(&function.body, depth + 1)
    }

    fn argument(&mut self, arg: &Argument, depth: usize) -> io::Result<()> {
        self.line(depth, format_args!("Funcall argument"))?;
        self.print(Some(&arg.expr), depth + 1)
    }

    fn header(&mut self, depth: usize, title: &str) -> io::Result<()> {
        self.line(depth, format_args!("--{}--", title))
    }

    fn line(&mut self, depth: usize, text: fmt::Arguments<'_>) -> io::Result<()> {
        let width = depth * self.indent;
        write!(self.out, "{:width$}", "", width = width)?;
        self.out.write_fmt(text)?;
        self.out.write_all(b"\n")
    }
}
