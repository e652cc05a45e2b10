//! Verification: the well-formedness walk and the type resolver.
//!
//! [`verify`] drives a full check of a parsed program: it loads every
//! top-level declaration into a fresh scope, installs the well-formedness
//! handlers on a visitor, and walks the tree. Diagnostics accumulate in the
//! message buffer; a single error never stops sibling subtrees from being
//! checked.

pub mod resolve;
pub mod well_formed;

use tracing::debug;

pub use resolve::{containing_numeric_type, is_numeric, resolve_type};
pub use well_formed::{VerifyContext, add_handlers};

use crate::ast::visitor::{NodeSlot, Visitor};
use crate::ast::Node;
use crate::message::{MessageBuffer, Severity};
use crate::scope::{Scope, ScopeError};

/// Check a parsed program rooted at a `declaration-block`.
///
/// Returns `true` when the walk added no error-or-worse diagnostics, in
/// which case the tree is ready for backend lowering.
pub fn verify(messages: &mut MessageBuffer, root: &mut NodeSlot) -> bool {
    let errors_before = messages.error_count();

    let Some(node) = root.as_deref() else {
        messages.emit(
            Severity::InternalError,
            None,
            None,
            "Cannot verify an empty program".to_string(),
        );
        return false;
    };
    let Node::DeclarationBlock(block) = node else {
        messages.emit(
            Severity::InternalError,
            None,
            Some(*node.range()),
            format!(
                "Root node must be a 'declaration-block', but is '{}'",
                node.kind().name()
            ),
        );
        return false;
    };

    debug!(
        declarations = block.declarations.len(),
        "verifying declaration block"
    );

    // Pre-populate the outermost frame so bodies can refer to declarations
    // that appear after them in the file.
    let mut scope = Scope::new();
    for declaration in &block.declarations {
        match scope.add_declaration(declaration) {
            Ok(()) => {}
            Err(ScopeError::Redeclaration(name)) => {
                messages.emit(
                    Severity::Error,
                    None,
                    Some(*declaration.range()),
                    format!("Symbol '{name}' is already declared"),
                );
            }
            // An unnamed top-level node is reported by the structural
            // handlers during the walk.
            Err(ScopeError::NotANamedDeclaration(_)) => {}
        }
    }

    let mut visitor = Visitor::new();
    add_handlers(&mut visitor);
    let mut context = VerifyContext::new(messages, scope);
    visitor.visit(&mut context, root);
    drop(context);

    messages.error_count() == errors_before
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinaryOperator, FunctionFlags, IntFlags, PropertyFlags, UnaryOperator};
    use crate::message::MessageQuery;
    use crate::source::SourceRange;

    fn null() -> SourceRange {
        SourceRange::NULL
    }

    fn function_returning(return_type: Node, body_value: Node) -> Node {
        Node::declaration_block(
            null(),
            vec![Node::declaration_function(
                null(),
                FunctionFlags::empty(),
                "f",
                Node::type_function(null(), Vec::new(), None, None, return_type),
                Some(Node::statement_block(
                    null(),
                    vec![Node::statement_return(null(), Some(body_value))],
                )),
            )],
        )
    }

    #[test]
    fn test_clean_program() {
        let mut messages = MessageBuffer::new();
        let mut root = Some(Box::new(function_returning(
            Node::type_int(null(), IntFlags::UNSIGNED, 8),
            Node::value_unary(
                null(),
                UnaryOperator::BitNot,
                Node::value_int_u8(null(), 0),
            ),
        )));
        assert!(verify(&mut messages, &mut root));
        assert!(messages.is_empty());
    }

    #[test]
    fn test_mismatched_return_type_is_et_5() {
        let mut messages = MessageBuffer::new();
        let mut root = Some(Box::new(function_returning(
            Node::type_int(null(), IntFlags::UNSIGNED, 8),
            Node::value_bool(null(), true),
        )));
        assert!(!verify(&mut messages, &mut root));
        let query = MessageQuery {
            code: Some("ET-5"),
            ..MessageQuery::default()
        };
        assert_eq!(
            "Cannot return value of type 'bool' in function with return type 'u8'",
            messages.query_single(&query).unwrap().text()
        );
    }

    #[test]
    fn test_root_must_be_declaration_block() {
        let mut messages = MessageBuffer::new();
        let mut root = Some(Box::new(Node::value_bool(null(), true)));
        assert!(!verify(&mut messages, &mut root));
        assert_eq!(1, messages.error_count());
    }

    #[test]
    fn test_duplicate_top_level_symbols() {
        let mut messages = MessageBuffer::new();
        let make_f = || {
            Node::declaration_function(
                null(),
                FunctionFlags::empty(),
                "f",
                Node::type_function(null(), Vec::new(), None, None, Node::type_void(null())),
                None,
            )
        };
        let mut root = Some(Box::new(Node::declaration_block(
            null(),
            vec![make_f(), make_f()],
        )));
        assert!(!verify(&mut messages, &mut root));
        assert_eq!(
            "Symbol 'f' is already declared",
            messages.messages()[0].text()
        );
    }

    #[test]
    fn test_function_argument_is_in_scope_for_body() {
        let mut messages = MessageBuffer::new();
        let argument = Node::declaration_function_argument(
            null(),
            crate::ast::ArgumentFlags::empty(),
            Node::declaration_property(
                null(),
                PropertyFlags::empty(),
                "a",
                Some(Node::type_int(null(), IntFlags::UNSIGNED, 8)),
            ),
            None,
        );
        let mut root = Some(Box::new(Node::declaration_block(
            null(),
            vec![Node::declaration_function(
                null(),
                FunctionFlags::empty(),
                "f",
                Node::type_function(
                    null(),
                    vec![argument],
                    None,
                    None,
                    Node::type_int(null(), IntFlags::UNSIGNED, 8),
                ),
                Some(Node::statement_block(
                    null(),
                    vec![Node::statement_return(
                        null(),
                        Some(Node::value_symbol(null(), "a")),
                    )],
                )),
            )],
        )));
        assert!(verify(&mut messages, &mut root));
        assert!(messages.is_empty());
    }

    #[test]
    fn test_undeclared_symbol_in_body() {
        let mut messages = MessageBuffer::new();
        let mut root = Some(Box::new(function_returning(
            Node::type_int(null(), IntFlags::UNSIGNED, 8),
            Node::value_symbol(null(), "missing"),
        )));
        assert!(!verify(&mut messages, &mut root));
        let query = MessageQuery {
            code: Some("ET-1"),
            ..MessageQuery::default()
        };
        assert_eq!(
            "Symbol 'missing' must be declared",
            messages.query_single(&query).unwrap().text()
        );
    }

    #[test]
    fn test_both_shift_operands_report_independently() {
        let mut messages = MessageBuffer::new();
        let mut root = Some(Box::new(function_returning(
            Node::type_bool(null()),
            Node::value_binary(
                null(),
                BinaryOperator::BitShiftRight,
                Node::value_bool(null(), true),
                Node::value_bool(null(), true),
            ),
        )));
        assert!(!verify(&mut messages, &mut root));
        assert_eq!(2, messages.error_count());
        let query = MessageQuery {
            code: Some("ET-6"),
            ..MessageQuery::default()
        };
        assert_eq!(2, messages.query(&query).count());
    }

    #[test]
    fn test_errors_do_not_stop_sibling_functions() {
        let mut messages = MessageBuffer::new();
        let bad = Node::declaration_function(
            null(),
            FunctionFlags::empty(),
            "bad",
            Node::type_function(
                null(),
                Vec::new(),
                None,
                None,
                Node::type_int(null(), IntFlags::UNSIGNED, 8),
            ),
            Some(Node::statement_block(
                null(),
                vec![Node::statement_return(
                    null(),
                    Some(Node::value_unary(
                        null(),
                        UnaryOperator::BitNot,
                        Node::value_bool(null(), true),
                    )),
                )],
            )),
        );
        let also_bad = Node::declaration_function(
            null(),
            FunctionFlags::empty(),
            "also_bad",
            Node::type_function(
                null(),
                Vec::new(),
                None,
                None,
                Node::type_int(null(), IntFlags::UNSIGNED, 8),
            ),
            Some(Node::statement_block(
                null(),
                vec![Node::statement_return(
                    null(),
                    Some(Node::value_symbol(null(), "missing")),
                )],
            )),
        );
        let mut root = Some(Box::new(Node::declaration_block(null(), vec![bad, also_bad])));
        assert!(!verify(&mut messages, &mut root));
        assert_eq!(2, messages.error_count());
    }
}
