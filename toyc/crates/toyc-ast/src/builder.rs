//! Node construction and destruction.
//!
//! [`Node::new`] is the single factory: it produces a fully initialised node
//! of the requested kind. The shorthand constructors below build the shapes
//! the parser hands over, and are what tests use to assemble trees.

use crate::ast::*;

/// Operand used to fill a required child of a freshly created node
fn zero() -> Box<Node> {
    Box::new(Node::int(0))
}

impl Node {
    /// Create a node of `kind` with every field at its zero value.
    ///
    /// Scalars default to zero, storage to `Global`, value types to
    /// `ReturnValue`, lists are empty and optional children absent. A
    /// required operand becomes the integer constant 0.
    pub fn new(kind: NodeKind) -> Node {
        match kind {
            NodeKind::Program => Node::Program(Program::default()),
            NodeKind::VarDecl => Node::VarDecl(VarDecl::default()),
            NodeKind::Function => Node::Function(Function::default()),
            NodeKind::StatementBlock => Node::StatementBlock(StatementBlock::default()),
            NodeKind::FunctionCall => Node::FunctionCall(FunctionCall::default()),
            NodeKind::Argument => Node::Argument(Argument {
                position: 0,
                expr: zero(),
            }),
            NodeKind::Assignment => Node::Assignment(Assignment {
                name: String::new(),
                target: Access::Global,
                value: zero(),
            }),
            NodeKind::While => Node::While(While {
                cond: zero(),
                body: Vec::new(),
            }),
            NodeKind::IfThen => Node::IfThen(IfThen::with_cond(zero())),
            NodeKind::IfThenElse => Node::IfThenElse(IfThen::with_cond(zero())),
            NodeKind::Expression => Node::Expression(Expression {
                op: ArithOp::Unknown('\0'),
                lhs: zero(),
                rhs: zero(),
            }),
            NodeKind::RelationalExpression => Node::RelationalExpression(RelationalExpression {
                op: RelOp::Unknown('\0'),
                lhs: zero(),
                rhs: zero(),
            }),
            NodeKind::VariableRef => Node::VariableRef(VariableRef::default()),
            NodeKind::Constant => Node::Constant(Constant::default()),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Program(_) => NodeKind::Program,
            Node::VarDecl(_) => NodeKind::VarDecl,
            Node::Function(_) => NodeKind::Function,
            Node::StatementBlock(_) => NodeKind::StatementBlock,
            Node::FunctionCall(_) => NodeKind::FunctionCall,
            Node::Argument(_) => NodeKind::Argument,
            Node::Assignment(_) => NodeKind::Assignment,
            Node::While(_) => NodeKind::While,
            Node::IfThen(_) => NodeKind::IfThen,
            Node::IfThenElse(_) => NodeKind::IfThenElse,
            Node::Expression(_) => NodeKind::Expression,
            Node::RelationalExpression(_) => NodeKind::RelationalExpression,
            Node::VariableRef(_) => NodeKind::VariableRef,
            Node::Constant(_) => NodeKind::Constant,
        }
    }

    /// Number of nodes in the tree rooted here, this node included.
    ///
    /// Entries of typed lists (`VarDecl`, `Function`, `Argument`) count as
    /// nodes exactly as their boxed counterparts do.
    pub fn count(&self) -> usize {
        1 + match self {
            Node::Program(p) => {
                p.globals.iter().map(VarDecl::count).sum::<usize>()
                    + p.functions.iter().map(Function::count).sum::<usize>()
                    + count_list(&p.statements)
            }
            Node::VarDecl(d) => d.count() - 1,
            Node::Function(f) => f.count() - 1,
            Node::StatementBlock(b) => count_list(&b.statements),
            Node::FunctionCall(c) => c.args.iter().map(Argument::count).sum(),
            Node::Argument(a) => a.count() - 1,
            Node::Assignment(a) => a.value.count() + access_count(&a.target),
            Node::While(w) => w.cond.count() + count_list(&w.body),
            Node::IfThen(i) | Node::IfThenElse(i) => {
                i.cond.count() + count_list(&i.then_branch) + count_list(&i.else_branch)
            }
            Node::Expression(e) => e.lhs.count() + e.rhs.count(),
            Node::RelationalExpression(r) => r.lhs.count() + r.rhs.count(),
            Node::VariableRef(v) => access_count(&v.access),
            Node::Constant(_) => 0,
        }
    }

    // ------------------------------------------------------------------
    // Shorthand constructors
    // ------------------------------------------------------------------

    pub fn int(value: i64) -> Node {
        Node::Constant(Constant {
            value: ConstValue::Int(value),
        })
    }

    /// String constant; `text` should include its quote characters
    pub fn string(text: impl Into<String>) -> Node {
        Node::Constant(Constant {
            value: ConstValue::Str(text.into()),
        })
    }

    pub fn return_value() -> Node {
        Node::Constant(Constant {
            value: ConstValue::ReturnValue,
        })
    }

    pub fn var(name: impl Into<String>, access: Access) -> Node {
        Node::VariableRef(VariableRef {
            name: name.into(),
            access,
        })
    }

    pub fn global_ref(name: impl Into<String>) -> Node {
        Node::var(name, Access::Global)
    }

    pub fn array_ref(name: impl Into<String>, index: Node) -> Node {
        Node::var(
            name,
            Access::Array {
                index: Box::new(index),
            },
        )
    }

    pub fn assign(name: impl Into<String>, target: Access, value: Node) -> Node {
        Node::Assignment(Assignment {
            name: name.into(),
            target,
            value: Box::new(value),
        })
    }

    pub fn binary(op: char, lhs: Node, rhs: Node) -> Node {
        Node::Expression(Expression {
            op: ArithOp::from(op),
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        })
    }

    pub fn relational(op: char, lhs: Node, rhs: Node) -> Node {
        Node::RelationalExpression(RelationalExpression {
            op: RelOp::from(op),
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        })
    }

    /// Call whose arguments are numbered by their position in `args`
    pub fn call(name: impl Into<String>, args: Vec<Node>) -> Node {
        let args = args
            .into_iter()
            .enumerate()
            .map(|(position, expr)| Argument {
                position: position as u32,
                expr: Box::new(expr),
            })
            .collect();
        Node::FunctionCall(FunctionCall {
            name: name.into(),
            args,
        })
    }

    pub fn while_loop(cond: Node, body: Vec<Node>) -> Node {
        Node::While(While {
            cond: Box::new(cond),
            body,
        })
    }

    pub fn if_then(cond: Node, then_branch: Vec<Node>, else_branch: Vec<Node>) -> Node {
        Node::IfThen(IfThen {
            cond: Box::new(cond),
            then_branch,
            else_branch,
        })
    }

    pub fn block(statements: Vec<Node>) -> Node {
        Node::StatementBlock(StatementBlock { statements })
    }
}

impl IfThen {
    fn with_cond(cond: Box<Node>) -> Self {
        Self {
            cond,
            then_branch: Vec::new(),
            else_branch: Vec::new(),
        }
    }
}

impl VarDecl {
    pub fn int(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ValueType::Int,
            storage: DeclStorage::Global,
            init: None,
        }
    }

    pub fn int_array(name: impl Into<String>, len: u32) -> Self {
        Self {
            storage: DeclStorage::GlobalArray { len },
            ..Self::int(name)
        }
    }

    pub fn string(name: impl Into<String>, literal: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ValueType::String,
            storage: DeclStorage::Global,
            init: Some(Box::new(Node::string(literal))),
        }
    }

    pub fn param(name: impl Into<String>, slot: u32) -> Self {
        Self {
            storage: DeclStorage::Param { slot },
            ..Self::int(name)
        }
    }

    pub fn local(name: impl Into<String>, slot: u32) -> Self {
        Self {
            storage: DeclStorage::Local { slot },
            ..Self::int(name)
        }
    }

    fn count(&self) -> usize {
        1 + self.init.as_ref().map_or(0, |init| init.count())
    }
}

impl Function {
    pub fn new(name: impl Into<String>, body: Vec<Node>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            body,
            locals: Vec::new(),
        }
    }

    fn count(&self) -> usize {
        1 + self.params.iter().map(VarDecl::count).sum::<usize>()
            + self.locals.iter().map(VarDecl::count).sum::<usize>()
            + count_list(&self.body)
    }
}

impl Argument {
    fn count(&self) -> usize {
        1 + self.expr.count()
    }
}

fn count_list(nodes: &[Node]) -> usize {
    nodes.iter().map(Node::count).sum()
}

fn access_count(access: &Access) -> usize {
    match access {
        Access::Array { index } => index.count(),
        _ => 0,
    }
}

/// Release a whole tree.
///
/// Ownership is strictly tree-shaped, so dropping the root frees every
/// child, list entry and owned string exactly once. `None` is a no-op.
pub fn destroy_tree(node: Option<Node>) {
    drop(node);
}
