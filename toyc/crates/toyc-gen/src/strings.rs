//! String-literal collection.
//!
//! Before any code is emitted the whole tree is walked once and every string
//! literal gets a dense id, starting at 0 for the compilation unit. The data
//! section declares one `.SC<id>` label per literal; the generator later
//! refers to a literal through the same id.

use std::fmt;
use std::io::{self, Write};

use toyc_ast::{Access, ConstValue, Function, Node, VarDecl};
use toyc_util::{FxHashMap, IndexVec};

toyc_util::define_idx!(StringId);

impl fmt::Display for StringId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ".SC{}", self.0)
    }
}

/// Literal texts of one compilation unit, in collection order
///
/// Ids are keyed by the address of the constant they were collected from, so
/// a lookup is only meaningful against the tree passed to the last
/// [`collect`](StringTable::collect).
#[derive(Debug, Default, Clone)]
pub struct StringTable {
    literals: IndexVec<StringId, String>,
    by_node: FxHashMap<usize, StringId>,
}

fn node_key(value: &ConstValue) -> usize {
    value as *const ConstValue as usize
}

impl StringTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset the table, then number every literal under `root` and write its
    /// declaration line to `out`.
    ///
    /// Each occurrence gets its own id and its own line, even when the same
    /// text appears twice.
    pub fn collect<W: Write>(&mut self, root: &Node, out: &mut W) -> io::Result<()> {
        self.reset();
        self.walk(root, out)
    }

    pub fn reset(&mut self) {
        self.literals.clear();
        self.by_node.clear();
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    pub fn get(&self, id: StringId) -> Option<&str> {
        self.literals.get(id).map(String::as_str)
    }

    /// Id collected for this exact constant
    pub fn id_of(&self, value: &ConstValue) -> Option<StringId> {
        self.by_node.get(&node_key(value)).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (StringId, &str)> {
        self.literals
            .iter_enumerated()
            .map(|(id, text)| (id, text.as_str()))
    }

    fn intern<W: Write>(&mut self, value: &ConstValue, text: &str, out: &mut W) -> io::Result<()> {
        let id = self.literals.push(text.to_owned());
        self.by_node.insert(node_key(value), id);
        writeln!(out, "{}:\t.string \t{}", id, text)
    }

    fn walk<W: Write>(&mut self, node: &Node, out: &mut W) -> io::Result<()> {
        match node {
            Node::Program(program) => {
                for decl in &program.globals {
                    self.walk_decl(decl, out)?;
                }
                for function in &program.functions {
                    self.walk_function(function, out)?;
                }
                self.walk_list(&program.statements, out)
            }
            Node::VarDecl(decl) => self.walk_decl(decl, out),
            Node::Function(function) => self.walk_function(function, out),
            Node::StatementBlock(block) => self.walk_list(&block.statements, out),
            Node::FunctionCall(call) => {
                for arg in &call.args {
                    self.walk(&arg.expr, out)?;
                }
                Ok(())
            }
            Node::Argument(arg) => self.walk(&arg.expr, out),
            Node::Assignment(assign) => {
                self.walk(&assign.value, out)?;
                self.walk_access(&assign.target, out)
            }
            Node::While(w) => {
                self.walk(&w.cond, out)?;
                self.walk_list(&w.body, out)
            }
            Node::IfThen(branch) | Node::IfThenElse(branch) => {
                self.walk(&branch.cond, out)?;
                self.walk_list(&branch.then_branch, out)?;
                self.walk_list(&branch.else_branch, out)
            }
            Node::Expression(e) => {
                self.walk(&e.lhs, out)?;
                self.walk(&e.rhs, out)
            }
            Node::RelationalExpression(r) => {
                self.walk(&r.lhs, out)?;
                self.walk(&r.rhs, out)
            }
            Node::VariableRef(var) => self.walk_access(&var.access, out),
            Node::Constant(c) => match c.value {
                ConstValue::Str(ref text) if c.value.as_literal().is_some() => {
                    self.intern(&c.value, text, out)
                }
                _ => Ok(()),
            },
        }
    }

    fn walk_list<W: Write>(&mut self, nodes: &[Node], out: &mut W) -> io::Result<()> {
        for node in nodes {
            self.walk(node, out)?;
        }
        Ok(())
    }

    fn walk_decl<W: Write>(&mut self, decl: &VarDecl, out: &mut W) -> io::Result<()> {
        match &decl.init {
            Some(init) => self.walk(init, out),
            None => Ok(()),
        }
    }

    fn walk_function<W: Write>(&mut self, function: &Function, out: &mut W) -> io::Result<()> {
        for param in &function.params {
            self.walk_decl(param, out)?;
        }
        self.walk_list(&function.body, out)?;
        for local in &function.locals {
            self.walk_decl(local, out)?;
        }
        Ok(())
    }

    fn walk_access<W: Write>(&mut self, access: &Access, out: &mut W) -> io::Result<()> {
        match access {
            Access::Array { index } => self.walk(index, out),
            _ => Ok(()),
        }
    }
}
