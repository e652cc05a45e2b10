//! Verify a tiny hand-built program and render its diagnostics, showing the
//! full pipeline: sources in, AST checked, messages out.
//!
//! Run with `cargo run --example typecheck`.

use std::io::IsTerminal;
use std::process::ExitCode;

use forge_compiler::ast::{FunctionFlags, IntFlags, Node, UnaryOperator};
use forge_compiler::source::SourceRange;
use forge_compiler::{CompileSession, OutputStream};

fn main() -> ExitCode {
    let mut session = CompileSession::new();
    let file = session.add_source("demo.frg", "fn f() -> u8 {\n  return ~true;\n}\n");

    // The AST the parser would produce for the source above. The `true`
    // literal carries its real source range so the diagnostic can underline
    // it.
    let operand_start = session
        .sources
        .location_of(file, 25)
        .expect("demo source is registered");
    let null = SourceRange::NULL;
    let mut root = Some(Box::new(Node::declaration_block(
        null,
        vec![Node::declaration_function(
            null,
            FunctionFlags::empty(),
            "f",
            Node::type_function(
                null,
                Vec::new(),
                None,
                None,
                Node::type_int(null, IntFlags::UNSIGNED, 8),
            ),
            Some(Node::statement_block(
                null,
                vec![Node::statement_return(
                    null,
                    Some(Node::value_unary(
                        null,
                        UnaryOperator::BitNot,
                        Node::value_bool(SourceRange::new(operand_start, 4), true),
                    )),
                )],
            )),
        )],
    )));

    session.verify(&mut root);

    let stdout = std::io::stdout();
    let interactive = stdout.is_terminal();
    let mut stream = OutputStream::new(stdout.lock(), interactive, interactive);
    session
        .render(&mut stream)
        .expect("rendering to stdout succeeds");

    ExitCode::from(session.exit_code())
}
