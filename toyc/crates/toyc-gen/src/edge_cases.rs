//! Edge case tests for toyc-gen

#[cfg(test)]
mod tests {
    use crate::{generate_string, CodeGenError, GenContext, GenOptions};
    use toyc_ast::{Access, Argument, ConstValue, Constant, FunctionCall, Node, Program, VarDecl};
    use toyc_ast::{DeclStorage, ValueType};
    use toyc_util::DiagnosticCode;

    fn statements(statements: Vec<Node>) -> Node {
        Node::Program(Program {
            statements,
            ..Program::default()
        })
    }

    fn lenient(root: &Node) -> (String, GenContext) {
        let mut ctx = GenContext::default();
        let asm = generate_string(root, &mut ctx).unwrap();
        (asm, ctx)
    }

    fn strict(root: &Node) -> CodeGenError {
        let mut ctx = GenContext::new(GenOptions {
            strict: true,
            ..GenOptions::default()
        });
        generate_string(root, &mut ctx).unwrap_err()
    }

    fn malformed_code(err: &CodeGenError) -> Option<DiagnosticCode> {
        match err {
            CodeGenError::Malformed { code, .. } => Some(*code),
            _ => None,
        }
    }

    fn long(value: i64) -> Node {
        Node::Constant(Constant {
            value: ConstValue::Long(value),
        })
    }

    // ==================== EDGE CASES ====================

    /// EDGE CASE: Empty program still has every section and the exit
    #[test]
    fn test_edge_empty_program() {
        let (asm, ctx) = lenient(&Node::new(toyc_ast::NodeKind::Program));
        assert!(asm.contains("\t.data\n"));
        assert!(asm.contains("program:\n\tli\t\ta0, 0\n\tli\t\ta7, 93\n\tecall\n"));
        assert!(asm.contains("#\n# Declared Functions\n#\n\n#\n# Library functions\n"));
        assert_eq!(ctx.handler().warning_count(), 0);
    }

    /// EDGE CASE: Unknown arithmetic operator
    #[test]
    fn test_edge_unknown_arith_op() {
        let root = statements(vec![Node::binary('*', Node::int(2), Node::int(3))]);
        let (asm, ctx) = lenient(&root);
        assert!(asm.contains("\taddi\tsp, sp, 4\n\t# unknown arithmetic operator 42 ('*')\n"));
        assert!(ctx.handler().contains(DiagnosticCode::W_UNKNOWN_ARITH_OP));

        let err = strict(&root);
        assert_eq!(malformed_code(&err), Some(DiagnosticCode::W_UNKNOWN_ARITH_OP));
        assert_eq!(err.code(), Some(DiagnosticCode::E_STRICT_PLACEHOLDER));
    }

    /// EDGE CASE: Unknown relational operator inside a loop condition
    #[test]
    fn test_edge_unknown_rel_op() {
        let root = statements(vec![Node::while_loop(
            Node::relational('?', Node::int(1), Node::int(2)),
            vec![],
        )]);
        let (asm, ctx) = lenient(&root);
        assert!(asm.contains("\t# unknown relational operator 63 ('?')\n\t#--end-loop--\n"));
        assert!(ctx.handler().contains(DiagnosticCode::W_UNKNOWN_REL_OP));
        assert_eq!(malformed_code(&strict(&root)), Some(DiagnosticCode::W_UNKNOWN_REL_OP));
    }

    /// EDGE CASE: Long constants have no load sequence
    #[test]
    fn test_edge_long_constant() {
        let root = statements(vec![Node::assign("x", Access::Global, long(1 << 40))]);
        let (asm, ctx) = lenient(&root);
        assert!(asm.contains("\t# long constant 1099511627776 cannot be loaded\n\tsw\t\tt0, x, t1\n"));
        assert!(ctx.handler().contains(DiagnosticCode::W_UNKNOWN_CONSTANT));
    }

    /// EDGE CASE: String constant that is an identifier, not a literal
    #[test]
    fn test_edge_unbound_string_constant() {
        let root = statements(vec![Node::string("greeting")]);
        let (asm, ctx) = lenient(&root);
        assert!(asm.contains("\t# string constant greeting is not a collected literal\n"));
        assert!(ctx.handler().contains(DiagnosticCode::W_UNBOUND_STRING));
    }

    /// EDGE CASE: String variable with no initialiser
    #[test]
    fn test_edge_string_decl_without_literal() {
        let decl = VarDecl {
            name: "s".to_string(),
            ty: ValueType::String,
            storage: DeclStorage::Global,
            init: None,
        };
        let root = Node::Program(Program {
            globals: vec![decl],
            ..Program::default()
        });
        let (asm, ctx) = lenient(&root);
        assert!(asm.contains("\t# string variable s has no literal initialiser\n"));
        assert_eq!(ctx.handler().warning_count(), 1);
    }

    /// EDGE CASE: Declarations with no storage layout
    #[test]
    fn test_edge_unsupported_declarations() {
        let long_decl = VarDecl {
            name: "big".to_string(),
            ty: ValueType::Long,
            ..VarDecl::default()
        };
        let untyped = VarDecl {
            name: "what".to_string(),
            ..VarDecl::default()
        };
        let root = Node::Program(Program {
            globals: vec![long_decl, untyped],
            ..Program::default()
        });
        let (asm, ctx) = lenient(&root);
        assert!(asm.contains("\t# unsupported declaration of big with type long\n"));
        assert!(asm.contains("\t# unsupported declaration of what with type return value\n"));
        assert_eq!(ctx.handler().warning_count(), 2);
        assert_eq!(malformed_code(&strict(&root)), Some(DiagnosticCode::W_UNSUPPORTED_DECL));
    }

    /// EDGE CASE: Zero-length array
    #[test]
    fn test_edge_zero_length_array() {
        let root = Node::Program(Program {
            globals: vec![VarDecl::int_array("none", 0)],
            ..Program::default()
        });
        let (asm, _) = lenient(&root);
        assert!(asm.contains("none: .space 0\n"));
    }

    /// EDGE CASE: Last slot inside the frame and first slot outside it
    #[test]
    fn test_edge_frame_slot_limits() {
        let root = statements(vec![
            Node::assign("a", Access::Local { slot: 29 }, Node::int(1)),
            Node::assign("b", Access::Local { slot: 30 }, Node::int(2)),
        ]);
        let (asm, ctx) = lenient(&root);
        assert!(asm.contains("\tsw\t\tt0, 124(fp)\n"));
        assert!(asm.contains("\t# slot 30 of b lies outside the 128-byte frame\n"));
        assert_eq!(ctx.handler().warning_count(), 1);
        assert_eq!(malformed_code(&strict(&root)), Some(DiagnosticCode::W_FRAME_SLOT_OVERFLOW));
    }

    /// EDGE CASE: Huge slot does not overflow the offset arithmetic
    #[test]
    fn test_edge_huge_slot() {
        let root = statements(vec![Node::var("p", Access::Param { slot: u32::MAX })]);
        let (_, ctx) = lenient(&root);
        assert!(ctx.handler().contains(DiagnosticCode::W_FRAME_SLOT_OVERFLOW));
    }

    /// EDGE CASE: Seventh argument has no register
    #[test]
    fn test_edge_argument_register_overflow() {
        let args: Vec<Node> = (0..7).map(Node::int).collect();
        let root = statements(vec![Node::call("many", args)]);
        let (asm, ctx) = lenient(&root);
        assert!(asm.contains("\tmv\t\ta5, t0\n"));
        assert!(!asm.contains("\tmv\t\ta6, t0\n"));
        assert!(asm.contains("\t# argument 6 has no register (only a0-a5 are passed)\n"));
        assert!(ctx.handler().contains(DiagnosticCode::W_ARG_REGISTER_OVERFLOW));
    }

    /// EDGE CASE: Argument positions are taken from the node, not the list order
    #[test]
    fn test_edge_argument_position_from_node() {
        let call = Node::FunctionCall(FunctionCall {
            name: "f".to_string(),
            args: vec![Argument {
                position: 3,
                expr: Box::new(Node::int(9)),
            }],
        });
        let (asm, _) = lenient(&statements(vec![call]));
        assert!(asm.contains("\tli\t\tt0, 9\n\tmv\t\ta3, t0\n\tjal\t\tf\n"));
    }

    /// EDGE CASE: Relational expression used as a plain statement
    #[test]
    fn test_edge_detached_relational() {
        let root = statements(vec![
            Node::relational('=', Node::int(1), Node::int(1)),
            Node::relational('!', Node::int(1), Node::int(2)),
        ]);
        let (asm, ctx) = lenient(&root);
        assert!(asm.contains("\tbeq\t\tt1, t0, .LL100\n"));
        assert!(asm.contains("\tbne\t\tt1, t0, .LL101\n"));
        assert!(!asm.contains(".LL100:"));
        assert_eq!(ctx.handler().warning_count(), 2);
        assert!(ctx.handler().contains(DiagnosticCode::W_DETACHED_RELATIONAL));
    }

    /// EDGE CASE: Detached relational labels do not disturb branch labels
    #[test]
    fn test_edge_detached_relational_independent_counter() {
        let root = statements(vec![
            Node::relational('<', Node::int(0), Node::int(1)),
            Node::while_loop(Node::relational('<', Node::int(0), Node::int(1)), vec![]),
        ]);
        let (asm, _) = lenient(&root);
        assert!(asm.contains("\tb\t\t.LL101\n.LL100:\n"));
        assert_eq!(asm.matches("\tblt\t\tt1, t0, .LL100\n").count(), 2);
    }

    /// EDGE CASE: If without an else-branch
    #[test]
    fn test_edge_if_without_else() {
        let root = statements(vec![Node::if_then(Node::int(1), vec![Node::int(2)], vec![])]);
        let (asm, _) = lenient(&root);
        assert!(asm.contains(
            "\t#--ifthenelse--\n\tli\t\tt0, 1\n\tbnez\tt0, .LL100\n\t#--else--\n\tb\t\t.LL101\n.LL100:\n\t#--if--\n\tli\t\tt0, 2\n.LL101:\n\t#--endif--\n"
        ));
    }

    /// EDGE CASE: Nested program node
    #[test]
    fn test_edge_nested_program() {
        let root = statements(vec![Node::new(toyc_ast::NodeKind::Program)]);
        let (asm, ctx) = lenient(&root);
        assert_eq!(asm.matches("# RISC-V assembly output").count(), 1);
        assert!(asm.contains("\t# nested program ignored\n"));
        assert!(ctx.handler().contains(DiagnosticCode::W_NESTED_PROGRAM));
    }

    /// EDGE CASE: Statement block is transparent
    #[test]
    fn test_edge_statement_block() {
        let flat = statements(vec![Node::int(1), Node::int(2)]);
        let nested = statements(vec![Node::block(vec![Node::int(1), Node::block(vec![Node::int(2)])])]);
        assert_eq!(lenient(&flat).0, lenient(&nested).0);
    }

    /// EDGE CASE: Return value constant after a call
    #[test]
    fn test_edge_return_value() {
        let root = statements(vec![
            Node::call("readInt", vec![]),
            Node::assign("x", Access::Global, Node::return_value()),
        ]);
        let (asm, _) = lenient(&root);
        assert!(asm.contains("\tjal\t\treadInt\n\t#--assignment--\n\tmv\t\tt0, a0\n\tsw\t\tt0, x, t1\n"));
    }

    /// EDGE CASE: Negative integer constant
    #[test]
    fn test_edge_negative_constant() {
        let (asm, _) = lenient(&statements(vec![Node::int(-17)]));
        assert!(asm.contains("\tli\t\tt0, -17\n"));
    }

    /// EDGE CASE: Diagnostics can be drained between runs
    #[test]
    fn test_edge_take_diagnostics() {
        let root = statements(vec![long(1)]);
        let mut ctx = GenContext::default();
        generate_string(&root, &mut ctx).unwrap();
        let diagnostics = ctx.take_diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, Some(DiagnosticCode::W_UNKNOWN_CONSTANT));
        assert_eq!(ctx.handler().warning_count(), 0);
    }

    /// EDGE CASE: Strict mode stops at the first malformed node
    #[test]
    fn test_edge_strict_stops_early() {
        let root = statements(vec![long(1), Node::binary('/', Node::int(1), Node::int(1))]);
        let err = strict(&root);
        assert_eq!(malformed_code(&err), Some(DiagnosticCode::W_UNKNOWN_CONSTANT));
        assert_eq!(err.code(), Some(DiagnosticCode::E_STRICT_PLACEHOLDER));
        assert_eq!(
            err.to_string(),
            "long constant 1 cannot be loaded [E0002]\n  = note: reported as warning W0103 outside strict mode"
        );
    }

    fn with_label_base(label_base: u32) -> GenContext {
        GenContext::new(GenOptions {
            label_base,
            ..GenOptions::default()
        })
    }

    fn one_loop() -> Node {
        statements(vec![Node::while_loop(
            Node::relational('<', Node::int(0), Node::int(1)),
            vec![],
        )])
    }

    /// EDGE CASE: The last two label numbers are still usable
    #[test]
    fn test_edge_label_base_at_limit() {
        let mut ctx = with_label_base(u32::MAX - 1);
        let asm = generate_string(&one_loop(), &mut ctx).unwrap();
        assert!(asm.contains("\tb\t\t.LL4294967295\n.LL4294967294:\n"));
    }

    /// EDGE CASE: Running out of label numbers is an error, not a wrap
    #[test]
    fn test_edge_label_numbers_exhausted() {
        let mut ctx = with_label_base(u32::MAX);
        let err = generate_string(&one_loop(), &mut ctx).unwrap_err();
        assert!(matches!(err, CodeGenError::LabelsExhausted));
        assert_eq!(err.code(), Some(DiagnosticCode::E_LABELS_EXHAUSTED));

        let mut ctx = with_label_base(u32::MAX);
        assert_eq!(ctx.fresh_label().unwrap().0, u32::MAX);
        assert!(ctx.fresh_label().is_err());
        assert_eq!(ctx.detached_label().unwrap().0, u32::MAX);
        assert!(ctx.detached_label().is_err());
    }
}
