//! Well-formedness handlers installed on the visitor by the verification
//! driver: structural invariants (internal `IS-*` diagnostics), operator
//! operand-category checks (`ET-6`), return-type agreement (`ET-5`), and
//! scope bookkeeping for function bodies.

use crate::ast::visitor::{Flow, NodeSlot, Visitor};
use crate::ast::{Node, NodeKind, is_valid_symbol};
use crate::codes;
use crate::message::{MessageBuffer, Severity};
use crate::scope::{Scope, ScopeError};
use crate::source::SourceRange;
use crate::verification::resolve::{is_numeric, resolve_type};

/// State threaded through a verification walk.
pub struct VerifyContext<'a> {
    pub messages: &'a mut MessageBuffer,
    pub scope: Scope,
    /// Declared return types of the enclosing functions, innermost last.
    return_types: Vec<Option<Node>>,
}

impl<'a> VerifyContext<'a> {
    #[must_use]
    pub fn new(messages: &'a mut MessageBuffer, scope: Scope) -> Self {
        Self {
            messages,
            scope,
            return_types: Vec::new(),
        }
    }

    fn emit_redeclaration(&mut self, name: &str, range: &SourceRange) {
        self.messages.emit(
            Severity::Error,
            None,
            Some(*range),
            format!("Symbol '{name}' is already declared"),
        );
    }

    fn add_to_scope(&mut self, declaration: &Node) {
        match self.scope.add_declaration(declaration) {
            Ok(()) => {}
            Err(ScopeError::Redeclaration(name)) => {
                self.emit_redeclaration(&name, declaration.range());
            }
            Err(ScopeError::NotANamedDeclaration(_)) => {
                codes::emit_is_5_ast_node_property_null(
                    self.messages,
                    declaration.range(),
                    declaration.kind(),
                    "name",
                );
            }
        }
    }
}

/// Install every well-formedness handler on a visitor.
pub fn add_handlers(visitor: &mut Visitor<VerifyContext<'_>>) {
    visitor.add_handler_where(|_| true, structural_pre);
    visitor.add_handler(
        NodeKind::DeclarationFunction,
        Some(function_pre),
        Some(function_post),
    );
    visitor.add_handler(NodeKind::StatementBlock, Some(block_pre), Some(block_post));
    visitor.add_handler(NodeKind::DeclarationAssignment, Some(assignment_pre), None);
    visitor.add_handler(NodeKind::StatementReturn, Some(return_pre), None);
    visitor.add_handler(NodeKind::ValueBitNot, Some(unary_integer_pre), None);
    for kind in [
        NodeKind::ValueNegate,
        NodeKind::ValueIncrement,
        NodeKind::ValueDecrement,
    ] {
        visitor.add_handler(kind, Some(unary_numeric_pre), None);
    }
    for kind in [
        NodeKind::ValueBitShiftLeft,
        NodeKind::ValueBitShiftRight,
        NodeKind::ValueBitShiftLeftAssign,
        NodeKind::ValueBitShiftRightAssign,
    ] {
        visitor.add_handler(kind, Some(shift_pre), None);
    }
    visitor.add_handler_where(binary_operator_resolves_by_containment, binary_numeric_pre);
}

fn binary_operator_resolves_by_containment(kind: NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::ValueBitAnd
            | NodeKind::ValueBitOr
            | NodeKind::ValueBitXor
            | NodeKind::ValueAdd
            | NodeKind::ValueSubtract
            | NodeKind::ValueMultiply
            | NodeKind::ValueDivide
            | NodeKind::ValueDivideInt
            | NodeKind::ValueModulo
            | NodeKind::ValueExponentiate
    )
}

/// Per-kind structural invariants the parser is supposed to uphold.
/// Violations are compiler bugs and therefore internal-severity.
fn structural_pre(ctx: &mut VerifyContext, parents: &[NodeKind], slot: &mut NodeSlot) -> Flow {
    let Some(node) = slot.as_deref() else {
        return Flow::Continue;
    };
    let kind = node.kind();
    let range = node.range();

    let mut require = |messages: &mut MessageBuffer, present: bool, property: &str| {
        if !present {
            codes::emit_is_5_ast_node_property_null(messages, range, kind, property);
        }
    };

    match node {
        Node::TypeSymbol(payload) => {
            check_symbol(ctx.messages, range, &payload.name);
        }
        Node::TypePointer(payload) => {
            require(ctx.messages, payload.value.is_some(), "value");
        }
        Node::TypeArray(payload) => {
            require(ctx.messages, payload.element.is_some(), "element");
        }
        Node::TypeFunction(payload) => {
            require(ctx.messages, payload.return_type.is_some(), "return-type");
            for (index, argument) in payload.arguments.iter().enumerate() {
                if argument.kind() != NodeKind::DeclarationFunctionArgument {
                    codes::emit_is_9_ast_node_property_unexpected_element(
                        ctx.messages,
                        range,
                        kind,
                        "arguments",
                        index,
                    );
                }
            }
        }
        Node::DeclarationUnion(payload) => {
            check_symbol(ctx.messages, range, &payload.name);
        }
        Node::DeclarationStructure(payload) => {
            check_symbol(ctx.messages, range, &payload.name);
        }
        Node::DeclarationProperty(payload) => {
            check_symbol(ctx.messages, range, &payload.name);
            // A property inside a union always carries a type.
            if parents.last() == Some(&NodeKind::DeclarationUnion) && payload.ty.is_none() {
                codes::emit_is_5_ast_node_property_null(ctx.messages, range, kind, "type");
            }
        }
        Node::DeclarationInterface(payload) => {
            check_symbol(ctx.messages, range, &payload.name);
        }
        Node::DeclarationFunctionArgument(payload) => {
            require(ctx.messages, payload.property.is_some(), "property");
        }
        Node::DeclarationFunction(payload) => {
            check_symbol(ctx.messages, range, &payload.name);
            require(ctx.messages, payload.ty.is_some(), "type");
        }
        Node::DeclarationAssignment(payload) => {
            require(ctx.messages, payload.property.is_some(), "property");
        }
        Node::DeclarationBlock(payload) => {
            for (index, declaration) in payload.declarations.iter().enumerate() {
                if !declaration.kind().is_declaration() {
                    codes::emit_is_9_ast_node_property_unexpected_element(
                        ctx.messages,
                        range,
                        kind,
                        "declarations",
                        index,
                    );
                }
            }
        }
        Node::StatementIfConditionalClause(payload) => {
            require(ctx.messages, payload.condition.is_some(), "condition");
            require(ctx.messages, payload.body.is_some(), "body");
        }
        Node::StatementIf(payload) => {
            for (index, clause) in payload.clauses.iter().enumerate() {
                if clause.kind() != NodeKind::StatementIfConditionalClause {
                    codes::emit_is_9_ast_node_property_unexpected_element(
                        ctx.messages,
                        range,
                        kind,
                        "clauses",
                        index,
                    );
                }
            }
        }
        Node::StatementWhile(payload) => {
            require(ctx.messages, payload.condition.is_some(), "condition");
            require(ctx.messages, payload.body.is_some(), "body");
        }
        Node::ValueSymbol(payload) => {
            check_symbol(ctx.messages, range, &payload.name);
        }
        Node::ValueCallKeywordArgument(payload) => {
            check_symbol(ctx.messages, range, &payload.name);
            require(ctx.messages, payload.value.is_some(), "value");
        }
        Node::ValueCall(payload) => {
            require(ctx.messages, payload.callee.is_some(), "callee");
        }
        Node::ValueCast(payload) => {
            require(ctx.messages, payload.value.is_some(), "value");
            require(ctx.messages, payload.ty.is_some(), "type");
        }
        Node::ValueUnary(payload) => {
            require(ctx.messages, payload.operand.is_some(), "operand");
        }
        Node::ValueBinary(payload) => {
            require(ctx.messages, payload.left.is_some(), "left");
            require(ctx.messages, payload.right.is_some(), "right");
        }
        _ => {}
    }
    Flow::Continue
}

fn check_symbol(messages: &mut MessageBuffer, range: &SourceRange, name: &str) {
    if !is_valid_symbol(name) {
        codes::emit_is_7_invalid_symbol(messages, range, name);
    }
}

fn function_pre(ctx: &mut VerifyContext, _parents: &[NodeKind], slot: &mut NodeSlot) -> Flow {
    let Some(Node::DeclarationFunction(function)) = slot.as_deref() else {
        return Flow::Continue;
    };

    ctx.scope.push_frame();
    let mut return_type = None;
    if let Some(Node::TypeFunction(ty)) = function.ty.as_deref() {
        return_type = ty.return_type.as_deref().cloned();
        for argument in &ty.arguments {
            if argument.declaration_name().is_some() {
                ctx.add_to_scope(argument);
            }
        }
    }
    ctx.return_types.push(return_type);
    Flow::Continue
}

fn function_post(ctx: &mut VerifyContext, _parents: &[NodeKind], _slot: &mut NodeSlot) -> Flow {
    ctx.scope.pop_frame();
    ctx.return_types.pop();
    Flow::Continue
}

fn block_pre(ctx: &mut VerifyContext, _parents: &[NodeKind], _slot: &mut NodeSlot) -> Flow {
    ctx.scope.push_frame();
    Flow::Continue
}

fn block_post(ctx: &mut VerifyContext, _parents: &[NodeKind], _slot: &mut NodeSlot) -> Flow {
    ctx.scope.pop_frame();
    Flow::Continue
}

/// Local assignments go into the current frame. Top-level assignments were
/// loaded with the declaration block before the walk started.
fn assignment_pre(ctx: &mut VerifyContext, parents: &[NodeKind], slot: &mut NodeSlot) -> Flow {
    if !parents.contains(&NodeKind::DeclarationFunction) {
        return Flow::Continue;
    }
    let Some(node) = slot.as_deref() else {
        return Flow::Continue;
    };
    if node.declaration_name().is_some() {
        ctx.add_to_scope(node);
    }
    Flow::Continue
}

fn return_pre(ctx: &mut VerifyContext, _parents: &[NodeKind], slot: &mut NodeSlot) -> Flow {
    let Some(Node::StatementReturn(statement)) = slot.as_deref() else {
        return Flow::Continue;
    };
    let Some(Some(expected)) = ctx.return_types.last().cloned() else {
        return Flow::Continue;
    };

    match statement.value.as_deref() {
        Some(value) => {
            let Some(actual) = resolve_type(ctx.messages, &ctx.scope, value) else {
                return Flow::Continue;
            };
            if !actual.same_type(&expected) {
                codes::emit_et_5_mismatched_return_type(
                    ctx.messages,
                    value.range(),
                    &expected,
                    &actual,
                );
            }
        }
        None => {
            let actual = Node::type_void(SourceRange::NULL);
            if !actual.same_type(&expected) {
                codes::emit_et_5_mismatched_return_type(
                    ctx.messages,
                    &statement.range,
                    &expected,
                    &actual,
                );
            }
        }
    }
    Flow::Continue
}

fn unary_operand<'a>(slot: &'a NodeSlot) -> Option<(&'a str, &'a Node)> {
    match slot.as_deref() {
        Some(Node::ValueUnary(payload)) => payload
            .operand
            .as_deref()
            .map(|operand| (payload.operator.symbol(), operand)),
        _ => None,
    }
}

fn unary_integer_pre(ctx: &mut VerifyContext, _parents: &[NodeKind], slot: &mut NodeSlot) -> Flow {
    let Some((symbol, operand)) = unary_operand(slot) else {
        return Flow::Continue;
    };
    if let Some(ty) = resolve_type(ctx.messages, &ctx.scope, operand) {
        if !matches!(ty, Node::TypeInt(_)) {
            codes::emit_et_6_operator_unexpected_operand_type(
                ctx.messages,
                operand.range(),
                symbol,
                "operand",
                "integer",
                &ty,
            );
        }
    }
    Flow::Continue
}

fn unary_numeric_pre(ctx: &mut VerifyContext, _parents: &[NodeKind], slot: &mut NodeSlot) -> Flow {
    let Some((symbol, operand)) = unary_operand(slot) else {
        return Flow::Continue;
    };
    if let Some(ty) = resolve_type(ctx.messages, &ctx.scope, operand) {
        if !is_numeric(&ty) {
            codes::emit_et_6_operator_unexpected_operand_type(
                ctx.messages,
                operand.range(),
                symbol,
                "operand",
                "numeric",
                &ty,
            );
        }
    }
    Flow::Continue
}

fn binary_operands<'a>(
    slot: &'a NodeSlot,
) -> Option<(&'a str, Option<&'a Node>, Option<&'a Node>)> {
    match slot.as_deref() {
        Some(Node::ValueBinary(payload)) => Some((
            payload.operator.symbol(),
            payload.left.as_deref(),
            payload.right.as_deref(),
        )),
        _ => None,
    }
}

/// Shift operands: the shifted side must be an integer, the shift amount
/// exactly `u32`.
fn shift_pre(ctx: &mut VerifyContext, _parents: &[NodeKind], slot: &mut NodeSlot) -> Flow {
    let Some((symbol, left, right)) = binary_operands(slot) else {
        return Flow::Continue;
    };

    if let Some(left) = left {
        if let Some(ty) = resolve_type(ctx.messages, &ctx.scope, left) {
            if !matches!(ty, Node::TypeInt(_)) {
                codes::emit_et_6_operator_unexpected_operand_type(
                    ctx.messages,
                    left.range(),
                    symbol,
                    "left-hand side",
                    "integer",
                    &ty,
                );
            }
        }
    }
    if let Some(right) = right {
        if let Some(ty) = resolve_type(ctx.messages, &ctx.scope, right) {
            let expected = Node::type_int(SourceRange::NULL, crate::ast::IntFlags::UNSIGNED, 32);
            if !ty.same_type(&expected) {
                codes::emit_et_6_operator_unexpected_operand_type(
                    ctx.messages,
                    right.range(),
                    symbol,
                    "right-hand side",
                    "'u32'",
                    &ty,
                );
            }
        }
    }
    Flow::Continue
}

/// Arithmetic and bitwise combining operators take numeric operands on both
/// sides; each side reports independently.
fn binary_numeric_pre(ctx: &mut VerifyContext, _parents: &[NodeKind], slot: &mut NodeSlot) -> Flow {
    let Some((symbol, left, right)) = binary_operands(slot) else {
        return Flow::Continue;
    };

    for (operand, operand_name) in [(left, "left-hand side"), (right, "right-hand side")] {
        let Some(operand) = operand else { continue };
        if let Some(ty) = resolve_type(ctx.messages, &ctx.scope, operand) {
            if !is_numeric(&ty) {
                codes::emit_et_6_operator_unexpected_operand_type(
                    ctx.messages,
                    operand.range(),
                    symbol,
                    operand_name,
                    "numeric",
                    &ty,
                );
            }
        }
    }
    Flow::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinaryOperator, UnaryOperator};
    use crate::message::MessageQuery;

    fn null() -> SourceRange {
        SourceRange::NULL
    }

    fn run(root: Node) -> MessageBuffer {
        let mut messages = MessageBuffer::new();
        let mut visitor = Visitor::new();
        add_handlers(&mut visitor);
        let mut ctx = VerifyContext::new(&mut messages, Scope::new());
        let mut slot = Some(Box::new(root));
        visitor.visit(&mut ctx, &mut slot);
        drop(ctx);
        messages
    }

    #[test]
    fn test_every_kind_has_a_handler() {
        let mut visitor: Visitor<VerifyContext<'static>> = Visitor::new();
        add_handlers(&mut visitor);
        for kind in NodeKind::all() {
            assert!(visitor.has_handler_for(kind), "{kind:?} has no handler");
        }
    }

    #[test]
    fn test_bit_not_of_bool_is_et_6() {
        let messages = run(Node::value_unary(
            null(),
            UnaryOperator::BitNot,
            Node::value_bool(null(), true),
        ));
        assert_eq!(1, messages.error_count());
        let query = MessageQuery {
            code: Some("ET-6"),
            ..MessageQuery::default()
        };
        let message = messages.query_single(&query).unwrap();
        assert_eq!(
            "Operator ~'s operand must be integer, but is 'bool'",
            message.text()
        );
        assert!(message.children().is_empty());
    }

    #[test]
    fn test_negate_of_bool_is_et_6_numeric() {
        let messages = run(Node::value_unary(
            null(),
            UnaryOperator::Negate,
            Node::value_bool(null(), true),
        ));
        let query = MessageQuery {
            code: Some("ET-6"),
            ..MessageQuery::default()
        };
        assert_eq!(
            "Operator -'s operand must be numeric, but is 'bool'",
            messages.query_single(&query).unwrap().text()
        );
    }

    #[test]
    fn test_shift_operand_checks_are_independent() {
        let messages = run(Node::value_binary(
            null(),
            BinaryOperator::BitShiftRight,
            Node::value_bool(null(), true),
            Node::value_bool(null(), true),
        ));
        assert_eq!(2, messages.error_count());
        let texts: Vec<&str> = messages.messages().iter().map(|m| m.text()).collect();
        assert_eq!(
            vec![
                "Operator >>'s left-hand side must be integer, but is 'bool'",
                "Operator >>'s right-hand side must be 'u32', but is 'bool'",
            ],
            texts
        );
    }

    #[test]
    fn test_shift_right_amount_must_be_u32() {
        let messages = run(Node::value_binary(
            null(),
            BinaryOperator::BitShiftRight,
            Node::value_int_u8(null(), 0),
            Node::value_int_i32(null(), 0),
        ));
        assert_eq!(1, messages.error_count());
        assert_eq!(
            "Operator >>'s right-hand side must be 'u32', but is 'i32'",
            messages.messages()[0].text()
        );
    }

    #[test]
    fn test_well_formed_shift_is_clean() {
        let messages = run(Node::value_binary(
            null(),
            BinaryOperator::BitShiftRight,
            Node::value_int_u8(null(), 1),
            Node::value_int_u32(null(), 1),
        ));
        assert_eq!(0, messages.error_count());
        assert_eq!(0, messages.warning_count());
    }

    #[test]
    fn test_missing_operand_is_internal() {
        let root = Node::ValueUnary(crate::ast::ValueUnary {
            range: null(),
            operator: UnaryOperator::BitNot,
            operand: None,
        });
        let messages = run(root);
        let query = MessageQuery {
            code: Some("IS-5"),
            ..MessageQuery::default()
        };
        let message = messages.query_single(&query).unwrap();
        assert_eq!(
            "AST node 'value-bit-not' cannot have null 'operand'",
            message.text()
        );
        assert_eq!(Severity::InternalError, message.severity());
    }

    #[test]
    fn test_union_property_requires_type() {
        let union = Node::declaration_union(
            null(),
            "U",
            vec![Node::declaration_property(
                null(),
                crate::ast::PropertyFlags::empty(),
                "tag",
                None,
            )],
        );
        let messages = run(union);
        let query = MessageQuery {
            code: Some("IS-5"),
            ..MessageQuery::default()
        };
        assert_eq!(
            "AST node 'declaration-property' cannot have null 'type'",
            messages.query_single(&query).unwrap().text()
        );
    }
}
