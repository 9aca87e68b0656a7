//! toyc-ast - AST Node Definitions
//!
//! One closed sum type, [`Node`], with a payload struct per node kind. Every
//! payload carries only the fields meaningful for its kind, so a child slot
//! that does not apply to a kind simply does not exist.
//!
//! Lists (declarations, functions, parameters, arguments, statements) are
//! `Vec`s owned by the parent. Names and literal text are owned `String`s.
//!
//! The model derives serde so the external parser/symbol-table stage can hand
//! over a resolved tree as a `kind`-tagged JSON document:
//!
//! ```json
//! { "kind": "Assignment", "name": "x",
//!   "target": { "class": "global" },
//!   "value": { "kind": "Constant", "value": { "int": 5 } } }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// A node of the abstract syntax tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Node {
    /// Root of a compilation unit
    Program(Program),

    /// Variable declaration (global, parameter or local)
    VarDecl(VarDecl),

    /// Function definition
    Function(Function),

    /// Braced statement list
    StatementBlock(StatementBlock),

    /// Call to a declared function or runtime helper
    FunctionCall(FunctionCall),

    /// One positional argument of a call
    Argument(Argument),

    /// Store to a variable or array element
    Assignment(Assignment),

    /// Pre-tested loop
    While(While),

    /// Conditional with an optional else-branch
    IfThen(IfThen),

    /// Conditional produced by an explicit `else` production
    IfThenElse(IfThen),

    /// Binary arithmetic
    Expression(Expression),

    /// Comparison used as a branch condition
    RelationalExpression(RelationalExpression),

    /// Read of a variable or array element
    VariableRef(VariableRef),

    /// Literal or call-return value
    Constant(Constant),
}

/// Fieldless tag of a [`Node`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Program,
    VarDecl,
    Function,
    StatementBlock,
    FunctionCall,
    Argument,
    Assignment,
    While,
    IfThen,
    IfThenElse,
    Expression,
    RelationalExpression,
    VariableRef,
    Constant,
}

impl NodeKind {
    pub const ALL: [NodeKind; 14] = [
        NodeKind::Program,
        NodeKind::VarDecl,
        NodeKind::Function,
        NodeKind::StatementBlock,
        NodeKind::FunctionCall,
        NodeKind::Argument,
        NodeKind::Assignment,
        NodeKind::While,
        NodeKind::IfThen,
        NodeKind::IfThenElse,
        NodeKind::Expression,
        NodeKind::RelationalExpression,
        NodeKind::VariableRef,
        NodeKind::Constant,
    ];
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Static type or role of a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    Int,
    Long,
    String,
    #[default]
    ReturnValue,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Int => write!(f, "int"),
            ValueType::Long => write!(f, "long"),
            ValueType::String => write!(f, "string"),
            ValueType::ReturnValue => write!(f, "return value"),
        }
    }
}

/// Where a variable lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageClass {
    #[default]
    Global,
    GlobalArray,
    Param,
    Local,
}

/// Root of a compilation unit
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Program {
    #[serde(default)]
    pub globals: Vec<VarDecl>,
    #[serde(default)]
    pub functions: Vec<Function>,
    /// Top-level statements run from the program entry point
    #[serde(default)]
    pub statements: Vec<Node>,
}

/// Variable declaration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VarDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: ValueType,
    #[serde(default)]
    pub storage: DeclStorage,
    /// String literal initialiser of a string-typed declaration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub init: Option<Box<Node>>,
}

/// Storage of a declared variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "class", rename_all = "snake_case")]
pub enum DeclStorage {
    #[default]
    Global,
    GlobalArray { len: u32 },
    Param { slot: u32 },
    Local { slot: u32 },
}

impl DeclStorage {
    pub fn class(&self) -> StorageClass {
        match self {
            DeclStorage::Global => StorageClass::Global,
            DeclStorage::GlobalArray { .. } => StorageClass::GlobalArray,
            DeclStorage::Param { .. } => StorageClass::Param,
            DeclStorage::Local { .. } => StorageClass::Local,
        }
    }
}

/// Function definition
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    #[serde(default)]
    pub params: Vec<VarDecl>,
    #[serde(default)]
    pub body: Vec<Node>,
    #[serde(default)]
    pub locals: Vec<VarDecl>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatementBlock {
    #[serde(default)]
    pub statements: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub args: Vec<Argument>,
}

/// One call argument; `position` selects the argument register
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    pub position: u32,
    pub expr: Box<Node>,
}

/// How an assignment target or variable reference is reached
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "class", rename_all = "snake_case")]
pub enum Access {
    /// Named word in the data section
    #[default]
    Global,
    /// Element of a named global array
    Array { index: Box<Node> },
    /// Incoming parameter saved in the frame
    Param { slot: u32 },
    /// Function-local frame slot
    Local { slot: u32 },
}

impl Access {
    pub fn class(&self) -> StorageClass {
        match self {
            Access::Global => StorageClass::Global,
            Access::Array { .. } => StorageClass::GlobalArray,
            Access::Param { .. } => StorageClass::Param,
            Access::Local { .. } => StorageClass::Local,
        }
    }

    /// Frame slot of a parameter or local
    pub fn slot(&self) -> Option<u32> {
        match self {
            Access::Param { slot } | Access::Local { slot } => Some(*slot),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub name: String,
    #[serde(default)]
    pub target: Access,
    pub value: Box<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct While {
    pub cond: Box<Node>,
    #[serde(default)]
    pub body: Vec<Node>,
}

/// Payload shared by [`Node::IfThen`] and [`Node::IfThenElse`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IfThen {
    pub cond: Box<Node>,
    #[serde(default)]
    pub then_branch: Vec<Node>,
    #[serde(default)]
    pub else_branch: Vec<Node>,
}

/// Arithmetic operator, decoded from its character code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "char", into = "char")]
pub enum ArithOp {
    Add,
    Sub,
    Unknown(char),
}

impl ArithOp {
    pub fn symbol(self) -> char {
        match self {
            ArithOp::Add => '+',
            ArithOp::Sub => '-',
            ArithOp::Unknown(c) => c,
        }
    }
}

impl From<char> for ArithOp {
    fn from(c: char) -> Self {
        match c {
            '+' => ArithOp::Add,
            '-' => ArithOp::Sub,
            other => ArithOp::Unknown(other),
        }
    }
}

impl From<ArithOp> for char {
    fn from(op: ArithOp) -> Self {
        op.symbol()
    }
}

/// Relational operator, decoded from its character code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "char", into = "char")]
pub enum RelOp {
    Eq,
    Ne,
    Lt,
    Gt,
    Unknown(char),
}

impl RelOp {
    pub fn symbol(self) -> char {
        match self {
            RelOp::Eq => '=',
            RelOp::Ne => '!',
            RelOp::Lt => '<',
            RelOp::Gt => '>',
            RelOp::Unknown(c) => c,
        }
    }
}

impl From<char> for RelOp {
    fn from(c: char) -> Self {
        match c {
            '=' => RelOp::Eq,
            '!' => RelOp::Ne,
            '<' => RelOp::Lt,
            '>' => RelOp::Gt,
            other => RelOp::Unknown(other),
        }
    }
}

impl From<RelOp> for char {
    fn from(op: RelOp) -> Self {
        op.symbol()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expression {
    pub op: ArithOp,
    pub lhs: Box<Node>,
    pub rhs: Box<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationalExpression {
    pub op: RelOp,
    pub lhs: Box<Node>,
    pub rhs: Box<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VariableRef {
    pub name: String,
    #[serde(default)]
    pub access: Access,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Constant {
    pub value: ConstValue,
}

/// Payload of a [`Constant`]
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstValue {
    Int(i64),
    Long(i64),
    /// Literal text including its surrounding quote characters
    Str(String),
    /// The value left in the call-return register by the last call
    #[default]
    ReturnValue,
}

impl ConstValue {
    pub fn value_type(&self) -> ValueType {
        match self {
            ConstValue::Int(_) => ValueType::Int,
            ConstValue::Long(_) => ValueType::Long,
            ConstValue::Str(_) => ValueType::String,
            ConstValue::ReturnValue => ValueType::ReturnValue,
        }
    }

    /// Text of a string literal, as opposed to a bound identifier
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            ConstValue::Str(text) if text.starts_with('"') => Some(text),
            _ => None,
        }
    }
}
