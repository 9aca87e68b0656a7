//! Lowering of a resolved tree to RV32 assembly text.
//!
//! One pass, no buffering: every node writes its instructions straight to
//! the sink as it is visited. Expression results land in `t0`; `t1` is the
//! second operand register and the address register for array accesses.
//! Binary operators spill their left operand to the stack while the right
//! operand is evaluated.

use std::io::Write;

use tracing::{debug, trace};
use toyc_ast::{
    Access, ArithOp, Argument, Assignment, ConstValue, DeclStorage, Expression, Function,
    FunctionCall, IfThen, Node, Program, RelOp, RelationalExpression, ValueType, VarDecl,
    VariableRef, While,
};
use toyc_util::DiagnosticCode;

use crate::context::GenContext;
use crate::error::{CodeGenError, Result};
use crate::riscv::{self, Label, FRAME_SIZE, POP_T1, PUSH_T0, SAVED_ARG_REGS, WORD_SIZE};
use crate::runtime;

/// Emit the complete listing for the program rooted at `root`.
///
/// The string table in `ctx` is rebuilt from `root`; the label counters carry
/// on from wherever previous runs left them.
pub fn generate<W: Write>(root: &Node, ctx: &mut GenContext, out: &mut W) -> Result<()> {
    let Node::Program(program) = root else {
        return Err(CodeGenError::NotAProgram { found: root.kind() });
    };

    debug!(
        globals = program.globals.len(),
        functions = program.functions.len(),
        statements = program.statements.len(),
        "generating program"
    );

    let mut codegen = CodeGen { ctx, out };
    codegen.program(root, program)?;

    debug!(
        literals = codegen.ctx.strings().len(),
        warnings = codegen.ctx.handler().warning_count(),
        "finished program"
    );
    Ok(())
}

/// [`generate`] into a fresh `String`
pub fn generate_string(root: &Node, ctx: &mut GenContext) -> Result<String> {
    let mut out = Vec::new();
    generate(root, ctx, &mut out)?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}

struct CodeGen<'a, W: Write> {
    ctx: &'a mut GenContext,
    out: &'a mut W,
}

impl<'a, W: Write> CodeGen<'a, W> {
    fn emit(&mut self, text: &str) -> Result<()> {
        self.out.write_all(text.as_bytes())?;
        Ok(())
    }

    fn placeholder(&mut self, code: DiagnosticCode, message: String) -> Result<()> {
        self.ctx.placeholder(code, message, &mut *self.out)
    }

    fn program(&mut self, root: &Node, program: &Program) -> Result<()> {
        self.emit(runtime::FILE_HEADER)?;
        self.emit(runtime::DATA_SECTION)?;
        self.emit(runtime::STRING_CONSTANTS)?;
        self.ctx.strings_mut().collect(root, &mut *self.out)?;

        self.emit(runtime::GLOBAL_SYMBOLS)?;
        for decl in &program.globals {
            self.data_decl(decl)?;
        }

        self.emit(runtime::TEXT_SECTION)?;
        self.list(&program.statements)?;
        runtime::write_exit(&mut *self.out)?;

        self.emit(runtime::FUNCTIONS_HEADER)?;
        for function in &program.functions {
            self.function(function)?;
        }

        runtime::write_library(&mut *self.out)?;
        Ok(())
    }

    fn list(&mut self, nodes: &[Node]) -> Result<()> {
        for node in nodes {
            self.node(node)?;
        }
        Ok(())
    }

    fn node(&mut self, node: &Node) -> Result<()> {
        match node {
            Node::Program(_) => self.placeholder(
                DiagnosticCode::W_NESTED_PROGRAM,
                "nested program ignored".to_string(),
            ),
            Node::VarDecl(decl) => self.data_decl(decl),
            Node::Function(function) => self.function(function),
            Node::StatementBlock(block) => self.list(&block.statements),
            Node::FunctionCall(call) => self.call(call),
            Node::Argument(arg) => self.argument(arg),
            Node::Assignment(assign) => self.assignment(assign),
            Node::While(w) => self.while_loop(w),
            Node::IfThen(branch) | Node::IfThenElse(branch) => self.if_then(branch),
            Node::Expression(e) => self.expression(e),
            Node::RelationalExpression(r) => {
                let label = self.ctx.detached_label()?;
                self.ctx.handler().warn(
                    DiagnosticCode::W_DETACHED_RELATIONAL,
                    format!(
                        "relational expression outside a condition branches to undefined label {}",
                        label
                    ),
                );
                self.relational(r, label)
            }
            Node::VariableRef(var) => self.var_ref(var),
            Node::Constant(c) => self.constant(&c.value),
        }
    }

    fn data_decl(&mut self, decl: &VarDecl) -> Result<()> {
        let name = &decl.name;
        match (decl.ty, decl.storage) {
            (ValueType::Int, DeclStorage::GlobalArray { len }) => {
                let bytes = u64::from(len) * u64::from(WORD_SIZE);
                writeln!(self.out, "{}: .space {}", name, bytes)?;
            }
            (ValueType::Int, _) => writeln!(self.out, "{}: .word 0", name)?,
            (ValueType::String, _) => {
                let id = decl
                    .init
                    .as_deref()
                    .and_then(literal_value)
                    .and_then(|value| self.ctx.strings().id_of(value));
                match id {
                    Some(id) => writeln!(self.out, "{}: .word {}", name, id)?,
                    None => self.placeholder(
                        DiagnosticCode::W_UNBOUND_STRING,
                        format!("string variable {} has no literal initialiser", name),
                    )?,
                }
            }
            (ty @ (ValueType::Long | ValueType::ReturnValue), _) => self.placeholder(
                DiagnosticCode::W_UNSUPPORTED_DECL,
                format!("unsupported declaration of {} with type {}", name, ty),
            )?,
        }
        Ok(())
    }

    fn function(&mut self, function: &Function) -> Result<()> {
        debug!(
            function = %function.name,
            params = function.params.len(),
            locals = function.locals.len(),
            "lowering function"
        );
        let name = &function.name;
        write!(self.out, "#\n# Function def for {}\n#\n{}:\n", name, name)?;
        riscv::write_prologue(&mut *self.out)?;
        self.list(&function.body)?;
        riscv::write_epilogue(&mut *self.out)?;
        Ok(())
    }

    fn call(&mut self, call: &FunctionCall) -> Result<()> {
        trace!(callee = %call.name, helper = runtime::is_helper(&call.name), "lowering call");
        writeln!(self.out, "\t#--function call to {}--", call.name)?;
        for arg in &call.args {
            self.argument(arg)?;
        }
        writeln!(self.out, "\tjal\t\t{}", call.name)?;
        Ok(())
    }

    fn argument(&mut self, arg: &Argument) -> Result<()> {
        self.node(&arg.expr)?;
        if arg.position >= SAVED_ARG_REGS {
            return self.placeholder(
                DiagnosticCode::W_ARG_REGISTER_OVERFLOW,
                format!(
                    "argument {} has no register (only a0-a{} are passed)",
                    arg.position,
                    SAVED_ARG_REGS - 1
                ),
            );
        }
        writeln!(self.out, "\tmv\t\ta{}, t0", arg.position)?;
        Ok(())
    }

    /// Frame offset of `slot`, or a placeholder when it lies outside the frame
    fn frame_offset(&mut self, name: &str, slot: u32) -> Result<Option<u32>> {
        if riscv::slot_in_frame(slot) {
            return Ok(Some(riscv::slot_offset(slot)));
        }
        self.placeholder(
            DiagnosticCode::W_FRAME_SLOT_OVERFLOW,
            format!(
                "slot {} of {} lies outside the {}-byte frame",
                slot, name, FRAME_SIZE
            ),
        )?;
        Ok(None)
    }

    fn assignment(&mut self, assign: &Assignment) -> Result<()> {
        self.emit("\t#--assignment--\n")?;
        self.node(&assign.value)?;
        let name = &assign.name;
        match &assign.target {
            Access::Global => writeln!(self.out, "\tsw\t\tt0, {}, t1", name)?,
            Access::Param { slot } | Access::Local { slot } => {
                if let Some(offset) = self.frame_offset(name, *slot)? {
                    writeln!(self.out, "\tsw\t\tt0, {}(fp)", offset)?;
                }
            }
            Access::Array { index } => {
                self.emit(PUSH_T0)?;
                self.node(index)?;
                write!(
                    self.out,
                    "\tslli\tt0, t0, 2\n\tla\t\tt1, {}\n\tadd\t\tt1, t1, t0\n\tlw\t\tt0, 0(sp)\n\taddi\tsp, sp, 4\n\tsw\t\tt0, 0(t1)\n",
                    name
                )?;
            }
        }
        Ok(())
    }

    /// Test-at-bottom loop: jump to the condition, which branches back to
    /// the body while it holds.
    fn while_loop(&mut self, w: &While) -> Result<()> {
        let body = self.ctx.fresh_label()?;
        let test = self.ctx.fresh_label()?;
        write!(
            self.out,
            "\t#--while-loop--\n\tb\t\t{}\n{}:\n\t#--loop-body--\n",
            test, body
        )?;
        self.list(&w.body)?;
        write!(self.out, "\t#--loop-condition--\n{}:\n", test)?;
        self.condition(&w.cond, body)?;
        self.emit("\t#--end-loop--\n")
    }

    /// The condition branches to the then-branch; the else-branch is laid
    /// out first as the fall-through path.
    fn if_then(&mut self, branch: &IfThen) -> Result<()> {
        let then = self.ctx.fresh_label()?;
        let end = self.ctx.fresh_label()?;
        self.emit("\t#--ifthenelse--\n")?;
        self.condition(&branch.cond, then)?;
        self.emit("\t#--else--\n")?;
        self.list(&branch.else_branch)?;
        write!(self.out, "\tb\t\t{}\n{}:\n\t#--if--\n", end, then)?;
        self.list(&branch.then_branch)?;
        write!(self.out, "{}:\n\t#--endif--\n", end)?;
        Ok(())
    }

    /// Branch to `target` when `cond` holds
    fn condition(&mut self, cond: &Node, target: Label) -> Result<()> {
        match cond {
            Node::RelationalExpression(r) => self.relational(r, target),
            other => {
                self.node(other)?;
                writeln!(self.out, "\tbnez\tt0, {}", target)?;
                Ok(())
            }
        }
    }

    fn relational(&mut self, r: &RelationalExpression, target: Label) -> Result<()> {
        let op = r.op.symbol();
        writeln!(
            self.out,
            "\t# Relational Expression (op {},{})",
            op as u32, op
        )?;
        self.node(&r.lhs)?;
        self.emit(PUSH_T0)?;
        self.node(&r.rhs)?;
        self.emit(POP_T1)?;
        let instr = match r.op {
            RelOp::Eq => "beq",
            RelOp::Ne => "bne",
            RelOp::Lt => "blt",
            RelOp::Gt => "bgt",
            RelOp::Unknown(c) => {
                return self.placeholder(
                    DiagnosticCode::W_UNKNOWN_REL_OP,
                    format!("unknown relational operator {} ({:?})", c as u32, c),
                );
            }
        };
        writeln!(self.out, "\t{}\t\tt1, t0, {}", instr, target)?;
        Ok(())
    }

    fn expression(&mut self, e: &Expression) -> Result<()> {
        self.emit("\t#--binary-op-expression--\n")?;
        self.node(&e.lhs)?;
        self.emit(PUSH_T0)?;
        self.node(&e.rhs)?;
        self.emit(POP_T1)?;
        let instr = match e.op {
            ArithOp::Add => "add",
            ArithOp::Sub => "sub",
            ArithOp::Unknown(c) => {
                return self.placeholder(
                    DiagnosticCode::W_UNKNOWN_ARITH_OP,
                    format!("unknown arithmetic operator {} ({:?})", c as u32, c),
                );
            }
        };
        writeln!(self.out, "\t{}\t\tt0, t1, t0", instr)?;
        Ok(())
    }

    fn var_ref(&mut self, var: &VariableRef) -> Result<()> {
        let name = &var.name;
        match &var.access {
            Access::Global => writeln!(self.out, "\tlw\t\tt0, {}", name)?,
            Access::Param { slot } | Access::Local { slot } => {
                if let Some(offset) = self.frame_offset(name, *slot)? {
                    writeln!(self.out, "\tlw\t\tt0, {}(fp)", offset)?;
                }
            }
            Access::Array { index } => {
                self.node(index)?;
                write!(
                    self.out,
                    "\tslli\tt0, t0, 2\n\tla\t\tt1, {}\n\tadd\t\tt1, t1, t0\n\tlw\t\tt0, 0(t1)\n",
                    name
                )?;
            }
        }
        Ok(())
    }

    fn constant(&mut self, value: &ConstValue) -> Result<()> {
        match value {
            ConstValue::Int(v) => writeln!(self.out, "\tli\t\tt0, {}", v)?,
            ConstValue::Str(text) => {
                let id = self.ctx.strings().id_of(value);
                match id {
                    Some(id) => writeln!(self.out, "\tla\t\tt0, {}", id)?,
                    None => self.placeholder(
                        DiagnosticCode::W_UNBOUND_STRING,
                        format!("string constant {} is not a collected literal", text),
                    )?,
                }
            }
            ConstValue::Long(v) => self.placeholder(
                DiagnosticCode::W_UNKNOWN_CONSTANT,
                format!("long constant {} cannot be loaded", v),
            )?,
            ConstValue::ReturnValue => self.emit("\tmv\t\tt0, a0\n")?,
        }
        Ok(())
    }
}

fn literal_value(node: &Node) -> Option<&ConstValue> {
    match node {
        Node::Constant(c) => Some(&c.value),
        _ => None,
    }
}
