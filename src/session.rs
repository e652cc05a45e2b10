//! One compilation, from registered sources to a pass/fail status.
//!
//! `CompileSession` replaces what would otherwise be process-global state:
//! it owns the source map and the message buffer, and every subsystem
//! reaches them through it. Constructing a session starts a compilation;
//! dropping it ends one.

use std::io::{self, Write};

use crate::ast::visitor::NodeSlot;
use crate::message::MessageBuffer;
use crate::source::{SourceContext, SourceFileId};
use crate::stream::OutputStream;
use crate::verification;

#[derive(Debug, Default)]
pub struct CompileSession {
    pub sources: SourceContext,
    pub messages: MessageBuffer,
}

impl CompileSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a source file's contents for diagnostics to point into.
    pub fn add_source(&mut self, path: impl Into<String>, text: impl Into<String>) -> SourceFileId {
        self.sources.add_file(path, text)
    }

    /// Run the well-formedness walk over a parsed program.
    pub fn verify(&mut self, root: &mut NodeSlot) -> bool {
        verification::verify(&mut self.messages, root)
    }

    /// Render every buffered message followed by the summary line.
    pub fn render<W: Write>(&self, stream: &mut OutputStream<W>) -> io::Result<()> {
        self.messages.render(stream, Some(&self.sources))?;
        self.messages.render_summary(stream)
    }

    /// `0` on clean success, `1` when any error-or-worse message exists.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        u8::from(self.messages.has_errors())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{FunctionFlags, IntFlags, Node, UnaryOperator};
    use crate::source::SourceRange;

    #[test]
    fn test_session_end_to_end_clean() {
        let mut session = CompileSession::new();
        session.add_source("test.frg", "fn f() -> u8 {\n  return ~0u8;\n}\n");

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
                            Node::value_int_u8(null, 0),
                        )),
                    )],
                )),
            )],
        )));

        assert!(session.verify(&mut root));
        let mut stream = OutputStream::buffer();
        session.render(&mut stream).unwrap();
        assert_eq!(
            "compiled with 0 warnings and 0 errors\n",
            stream.into_string()
        );
        assert_eq!(0, session.exit_code());
    }

    #[test]
    fn test_session_renders_failure_with_sample() {
        let mut session = CompileSession::new();
        let file = session.add_source("test.frg", "fn f() -> u8 {\n  return ~true;\n}\n");
        let operand_start = session.sources.location_of(file, 25).unwrap();
        assert_eq!((2, 11), (operand_start.line, operand_start.column));

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

        assert!(!session.verify(&mut root));
        let mut stream = OutputStream::buffer();
        session.render(&mut stream).unwrap();
        let rendered = stream.into_string();
        assert!(rendered.contains(
            "test.frg:2:11: error [ET-6] Operator ~'s operand must be integer, but is 'bool'"
        ));
        assert!(rendered.contains("  return ~true;"));
        assert!(rendered.contains("^^^^"));
        assert!(rendered.contains("compiled with 0 warnings and 1 error\n"));
    }
}
