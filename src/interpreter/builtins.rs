//! Builtin procedures
//!
//! Builtins are ordinary procedure declarations synthesized once and
//! registered in the interpreter's base scope; their bodies use the
//! WriteStream statement the parser never produces.

use crate::frontend::ast::*;
use crate::utils::Span;
use std::sync::LazyLock;

/// `write(value: REAL)` — appends its argument to STDOUT.
pub static WRITE: LazyLock<ProcedureDecl> = LazyLock::new(|| {
    let value_var = || Var {
        name: "value".to_string(),
        span: Span::dummy(),
    };
    ProcedureDecl {
        name: "write".to_string(),
        params: vec![Param {
            var: value_var(),
            type_spec: TypeSpec {
                name: TypeName::Real,
                span: Span::dummy(),
            },
            span: Span::dummy(),
        }],
        block: Block {
            declarations: Vec::new(),
            compound: Compound {
                children: vec![Statement::WriteStream(WriteStream {
                    stream: StreamKind::Stdout,
                    var: value_var(),
                    span: Span::dummy(),
                })],
                span: Span::dummy(),
            },
            span: Span::dummy(),
        },
        span: Span::dummy(),
    }
});
