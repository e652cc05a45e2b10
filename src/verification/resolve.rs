//! The type resolver: computes the type of any AST node under a scope.
//!
//! Resolution returns a freshly owned type tree, or `None` when the node has
//! no type; diagnostics describing the failure go into the message buffer.
//! Operand-category failures on operators stay silent here so the
//! well-formedness pass can report them with the operand's own range.

use tracing::trace;

use crate::ast::{IntFlags, Node, PointerFlags, TypeFloat, TypeInt, UnaryOperator};
use crate::codes;
use crate::message::MessageBuffer;
use crate::scope::Scope;
use crate::source::SourceRange;

/// Compute the type of `node` under `scope`, as a freshly owned type tree.
pub fn resolve_type<H>(
    messages: &mut MessageBuffer,
    scope: &Scope<H>,
    node: &Node,
) -> Option<Node> {
    trace!(kind = node.kind().name(), "resolving type");

    if node.kind().is_type() {
        return Some(node.clone());
    }

    match node {
        Node::DeclarationUnion(payload) => {
            codes::emit_eft_1_unsupported_requirement(
                messages,
                &payload.range,
                9,
                "Union declarations",
            );
            None
        }
        Node::DeclarationStructure(payload) => {
            codes::emit_eft_1_unsupported_requirement(
                messages,
                &payload.range,
                10,
                "Struct declarations",
            );
            None
        }
        Node::DeclarationInterface(payload) => {
            codes::emit_eft_1_unsupported_requirement(
                messages,
                &payload.range,
                11,
                "Interface declarations",
            );
            None
        }
        Node::DeclarationProperty(payload) => match payload.ty.as_deref() {
            Some(ty) => Some(ty.clone()),
            None => {
                codes::emit_eft_1_unsupported_requirement(
                    messages,
                    &payload.range,
                    11,
                    "Dynamic objects",
                );
                None
            }
        },
        Node::DeclarationFunctionArgument(payload) => match payload.property.as_deref() {
            Some(property) => resolve_type(messages, scope, property),
            None => {
                codes::emit_is_5_ast_node_property_null(
                    messages,
                    &payload.range,
                    node.kind(),
                    "property",
                );
                None
            }
        },
        Node::DeclarationFunction(payload) => match payload.ty.as_deref() {
            Some(ty) => Some(ty.clone()),
            None => {
                codes::emit_is_5_ast_node_property_null(
                    messages,
                    &payload.range,
                    node.kind(),
                    "type",
                );
                None
            }
        },
        Node::DeclarationAssignment(payload) => match payload.property.as_deref() {
            Some(property) => resolve_type(messages, scope, property),
            None => {
                codes::emit_is_5_ast_node_property_null(
                    messages,
                    &payload.range,
                    node.kind(),
                    "property",
                );
                None
            }
        },
        Node::ValueBool(_) => Some(Node::type_bool(SourceRange::NULL)),
        Node::ValueInt(payload) => Some(Node::TypeInt(TypeInt::new(
            SourceRange::NULL,
            payload.ty.flags,
            payload.ty.bit_width,
        ))),
        Node::ValueFloat(payload) => Some(Node::TypeFloat(TypeFloat::new(
            SourceRange::NULL,
            payload.ty.bit_width,
        ))),
        Node::ValueCharacter(payload) => {
            codes::emit_eft_1_unsupported_requirement(
                messages,
                &payload.range,
                5,
                "Character literals",
            );
            None
        }
        Node::ValueString(payload) => {
            codes::emit_eft_1_unsupported_requirement(
                messages,
                &payload.range,
                4,
                "String literals",
            );
            None
        }
        Node::ValueArray(payload) => {
            let first = match payload.elements.first() {
                Some(first) => first,
                None => {
                    codes::emit_is_8_ast_node_property_null_element(
                        messages,
                        &payload.range,
                        node.kind(),
                        "elements",
                        0,
                    );
                    return None;
                }
            };
            let element_type = resolve_type(messages, scope, first)?;
            Some(Node::type_array(
                SourceRange::NULL,
                payload.elements.len() as u64,
                element_type,
            ))
        }
        Node::ValueArrayRepeated(payload) => {
            let element = require_child(messages, node, &payload.element, "element")?;
            let element_type = resolve_type(messages, scope, element)?;
            Some(Node::type_array(
                SourceRange::NULL,
                payload.length,
                element_type,
            ))
        }
        Node::ValueStructure(payload) => {
            codes::emit_eft_1_unsupported_requirement(
                messages,
                &payload.range,
                10,
                "Struct declarations",
            );
            None
        }
        Node::ValueSymbol(payload) => match scope.get_declaration(&payload.name) {
            Some(declaration) => resolve_type(messages, scope, declaration),
            None => {
                codes::emit_et_1_undeclared_symbol(messages, &payload.range, &payload.name);
                None
            }
        },
        Node::ValueCallKeywordArgument(payload) => {
            let value = require_child(messages, node, &payload.value, "value")?;
            resolve_type(messages, scope, value)
        }
        Node::ValueCall(payload) => {
            let callee = require_child(messages, node, &payload.callee, "callee")?;
            let callee_type = resolve_type(messages, scope, callee)?;
            let Node::TypeFunction(function) = &callee_type else {
                codes::emit_et_3_cannot_call_non_function(messages, &payload.range, &callee_type);
                return None;
            };
            match function.return_type.as_deref() {
                Some(return_type) => Some(return_type.clone()),
                None => {
                    codes::emit_is_5_ast_node_property_null(
                        messages,
                        &payload.range,
                        callee_type.kind(),
                        "return-type",
                    );
                    None
                }
            }
        }
        Node::ValueCast(payload) => {
            let ty = require_child(messages, node, &payload.ty, "type")?;
            Some(ty.clone())
        }
        Node::ValueUnary(payload) => {
            let operand = require_child(messages, node, &payload.operand, "operand")?;
            match payload.operator {
                UnaryOperator::Dereference => {
                    let operand_type = resolve_type(messages, scope, operand)?;
                    match &operand_type {
                        Node::TypePointer(pointer)
                            if !pointer.flags.contains(PointerFlags::IMPLICIT_DEREFERENCE) =>
                        {
                            let inner = match pointer.value.as_deref() {
                                Some(inner) => inner.clone(),
                                None => {
                                    codes::emit_is_5_ast_node_property_null(
                                        messages,
                                        &payload.range,
                                        operand_type.kind(),
                                        "value",
                                    );
                                    return None;
                                }
                            };
                            Some(Node::type_pointer(
                                SourceRange::NULL,
                                pointer.flags | PointerFlags::IMPLICIT_DEREFERENCE,
                                inner,
                            ))
                        }
                        _ => {
                            codes::emit_et_2_cannot_dereference_non_pointer(
                                messages,
                                &payload.range,
                                &operand_type,
                            );
                            None
                        }
                    }
                }
                UnaryOperator::GetAddress => {
                    let operand_type = resolve_type(messages, scope, operand)?;
                    match &operand_type {
                        Node::TypePointer(pointer)
                            if pointer.flags.contains(PointerFlags::IMPLICIT_DEREFERENCE) =>
                        {
                            Some(Node::type_pointer(
                                SourceRange::NULL,
                                PointerFlags::empty(),
                                operand_type.clone(),
                            ))
                        }
                        _ => {
                            codes::emit_et_4_cannot_get_address_non_reference(
                                messages,
                                &payload.range,
                                &operand_type,
                            );
                            None
                        }
                    }
                }
                UnaryOperator::LogicalNot => Some(Node::type_bool(SourceRange::NULL)),
                UnaryOperator::BitNot => {
                    let operand_type = resolve_type(messages, scope, operand)?;
                    match operand_type {
                        Node::TypeInt(_) => Some(operand_type),
                        _ => None,
                    }
                }
                UnaryOperator::Negate => {
                    let operand_type = resolve_type(messages, scope, operand)?;
                    match operand_type {
                        Node::TypeInt(mut ty) => {
                            ty.flags.remove(IntFlags::UNSIGNED);
                            Some(Node::TypeInt(ty))
                        }
                        Node::TypeFloat(_) => Some(operand_type),
                        _ => None,
                    }
                }
                UnaryOperator::Increment | UnaryOperator::Decrement => {
                    let operand_type = resolve_type(messages, scope, operand)?;
                    match operand_type {
                        Node::TypeInt(_) | Node::TypeFloat(_) => Some(operand_type),
                        _ => None,
                    }
                }
            }
        }
        Node::ValueBinary(payload) => {
            if payload.operator.resolves_to_bool() {
                return Some(Node::type_bool(SourceRange::NULL));
            }
            let left = require_child(messages, node, &payload.left, "left")?;
            if payload.operator.resolves_by_containment() {
                let left_type = resolve_type(messages, scope, left)?;
                if !is_numeric(&left_type) {
                    return None;
                }
                let right = require_child(messages, node, &payload.right, "right")?;
                let right_type = resolve_type(messages, scope, right)?;
                if !is_numeric(&right_type) {
                    return None;
                }
                let containing = containing_numeric_type(&left_type, &right_type);
                if containing.is_none() {
                    codes::emit_it_1_no_containing_type(
                        messages,
                        &payload.range,
                        &left_type,
                        &right_type,
                    );
                }
                containing
            } else {
                // Shifts, plain assignment, and the compound assignments all
                // take the left operand's type.
                resolve_type(messages, scope, left)
            }
        }
        _ => {
            messages.emit(
                crate::message::Severity::InternalError,
                None,
                Some(*node.range()),
                format!("Cannot resolve a type for AST node '{}'", node.kind().name()),
            );
            None
        }
    }
}

fn require_child<'a>(
    messages: &mut MessageBuffer,
    parent: &Node,
    child: &'a Option<Box<Node>>,
    property_name: &str,
) -> Option<&'a Node> {
    match child.as_deref() {
        Some(child) => Some(child),
        None => {
            codes::emit_is_5_ast_node_property_null(
                messages,
                parent.range(),
                parent.kind(),
                property_name,
            );
            None
        }
    }
}

/// Whether a type node is `int` or `float`.
#[must_use]
pub fn is_numeric(ty: &Node) -> bool {
    matches!(ty, Node::TypeInt(_) | Node::TypeFloat(_))
}

/// The float width needed to hold an integer type: 32 bits up to `i32` and
/// `u16`, 64 beyond. Unsigned widths double first, the same widening the
/// mixed-sign integer rule applies.
fn float_width_for_int(ty: &TypeInt) -> u8 {
    let effective = if ty.is_unsigned() {
        u16::from(ty.bit_width) * 2
    } else {
        u16::from(ty.bit_width)
    };
    if effective <= 32 { 32 } else { 64 }
}

/// The smallest numeric type both operand types promote into losslessly, or
/// `None` when either operand is not numeric.
///
/// Containment is reflexive and commutative. Mixing signed with unsigned
/// yields a signed integer one width wider than the unsigned side (capped at
/// 64); a 64-bit unsigned operand falls back to `f64`.
#[must_use]
pub fn containing_numeric_type(a: &Node, b: &Node) -> Option<Node> {
    match (a, b) {
        (Node::TypeInt(a), Node::TypeInt(b)) => {
            if a.is_unsigned() == b.is_unsigned() {
                return Some(Node::TypeInt(TypeInt::new(
                    SourceRange::NULL,
                    a.flags,
                    a.bit_width.max(b.bit_width),
                )));
            }
            let (signed, unsigned) = if a.is_unsigned() { (b, a) } else { (a, b) };
            if unsigned.bit_width == 64 {
                return Some(Node::TypeFloat(TypeFloat::new(SourceRange::NULL, 64)));
            }
            let widened = (unsigned.bit_width * 2).min(64);
            Some(Node::TypeInt(TypeInt::new(
                SourceRange::NULL,
                IntFlags::empty(),
                signed.bit_width.max(widened),
            )))
        }
        (Node::TypeFloat(a), Node::TypeFloat(b)) => Some(Node::TypeFloat(TypeFloat::new(
            SourceRange::NULL,
            a.bit_width.max(b.bit_width),
        ))),
        (Node::TypeInt(int), Node::TypeFloat(float))
        | (Node::TypeFloat(float), Node::TypeInt(int)) => Some(Node::TypeFloat(TypeFloat::new(
            SourceRange::NULL,
            float.bit_width.max(float_width_for_int(int)),
        ))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ArgumentFlags, BinaryOperator, FunctionFlags, PropertyFlags};

    fn null() -> SourceRange {
        SourceRange::NULL
    }

    fn int(flags: IntFlags, width: u8) -> Node {
        Node::type_int(null(), flags, width)
    }

    fn float(width: u8) -> Node {
        Node::type_float(null(), width)
    }

    fn signed(width: u8) -> Node {
        int(IntFlags::empty(), width)
    }

    fn unsigned(width: u8) -> Node {
        int(IntFlags::UNSIGNED, width)
    }

    fn assert_contains(expected: &Node, a: &Node, b: &Node) {
        let forward = containing_numeric_type(a, b).expect("containing type");
        let backward = containing_numeric_type(b, a).expect("containing type");
        assert!(forward.same_type(expected), "got {forward:?}");
        assert!(backward.same_type(expected), "commutativity violated");
    }

    #[test]
    fn test_containment_same_sign_ints() {
        assert_contains(&signed(8), &signed(8), &signed(8));
        assert_contains(&signed(64), &signed(8), &signed(64));
        assert_contains(&unsigned(32), &unsigned(16), &unsigned(32));
    }

    #[test]
    fn test_containment_mixed_sign_ints() {
        assert_contains(&signed(64), &signed(8), &unsigned(32));
        assert_contains(&signed(16), &signed(8), &unsigned(8));
        assert_contains(&signed(64), &signed(64), &unsigned(8));
        assert_contains(&float(64), &signed(32), &unsigned(64));
    }

    #[test]
    fn test_containment_floats() {
        assert_contains(&float(32), &float(32), &float(32));
        assert_contains(&float(64), &float(32), &float(64));
    }

    #[test]
    fn test_containment_int_with_float() {
        assert_contains(&float(32), &signed(8), &float(32));
        assert_contains(&float(32), &signed(32), &float(32));
        assert_contains(&float(64), &unsigned(32), &float(32));
        assert_contains(&float(64), &signed(64), &float(32));
        assert_contains(&float(64), &signed(8), &float(64));
    }

    #[test]
    fn test_containment_rejects_non_numeric() {
        let bool_type = Node::type_bool(null());
        assert!(containing_numeric_type(&bool_type, &signed(32)).is_none());
        assert!(
            containing_numeric_type(&bool_type, &Node::type_symbol(null(), "b")).is_none()
        );
    }

    #[test]
    fn test_containment_is_reflexive_over_the_grid() {
        let mut types = Vec::new();
        for width in [8u8, 16, 32, 64] {
            types.push(signed(width));
            types.push(unsigned(width));
        }
        types.push(float(32));
        types.push(float(64));
        for ty in &types {
            let contained = containing_numeric_type(ty, ty).unwrap();
            assert!(contained.same_type(ty), "{ty:?} is not reflexive");
        }
    }

    fn resolve(messages: &mut MessageBuffer, node: &Node) -> Option<Node> {
        let scope: Scope = Scope::new();
        resolve_type(messages, &scope, node)
    }

    #[test]
    fn test_resolve_primitive_types_is_identity() {
        let mut messages = MessageBuffer::new();
        for ty in [
            Node::type_bool(null()),
            Node::type_void(null()),
            signed(32),
            float(64),
        ] {
            let resolved = resolve(&mut messages, &ty).unwrap();
            assert!(resolved.same_type(&ty));
        }
        assert!(messages.is_empty());
    }

    #[test]
    fn test_resolve_literals_match_their_tags() {
        let mut messages = MessageBuffer::new();

        let resolved = resolve(&mut messages, &Node::value_int_i32(null(), 5)).unwrap();
        assert!(resolved.same_type(&signed(32)));

        let resolved = resolve(&mut messages, &Node::value_int_u16(null(), 5)).unwrap();
        assert!(resolved.same_type(&unsigned(16)));

        let resolved = resolve(&mut messages, &Node::value_float_f32(null(), 5.2)).unwrap();
        assert!(resolved.same_type(&float(32)));

        let resolved = resolve(&mut messages, &Node::value_bool(null(), true)).unwrap();
        assert!(resolved.same_type(&Node::type_bool(null())));

        assert!(messages.is_empty());
    }

    #[test]
    fn test_resolve_declarations() {
        let mut messages = MessageBuffer::new();

        let property = Node::declaration_property(
            null(),
            PropertyFlags::empty(),
            "x",
            Some(signed(32)),
        );
        assert!(resolve(&mut messages, &property).unwrap().same_type(&signed(32)));

        let argument = Node::declaration_function_argument(
            null(),
            ArgumentFlags::empty(),
            property.clone(),
            None,
        );
        assert!(resolve(&mut messages, &argument).unwrap().same_type(&signed(32)));

        let assignment = Node::declaration_assignment(null(), property, None);
        assert!(resolve(&mut messages, &assignment).unwrap().same_type(&signed(32)));

        let function = Node::declaration_function(
            null(),
            FunctionFlags::empty(),
            "f",
            Node::type_function(null(), Vec::new(), None, None, signed(32)),
            None,
        );
        let resolved = resolve(&mut messages, &function).unwrap();
        let Node::TypeFunction(ty) = &resolved else {
            panic!("expected function type");
        };
        assert!(ty.return_type.as_deref().unwrap().same_type(&signed(32)));

        assert!(messages.is_empty());
    }

    #[test]
    fn test_resolve_unsupported_declarations() {
        let mut messages = MessageBuffer::new();
        let union = Node::declaration_union(null(), "U", Vec::new());
        assert!(resolve(&mut messages, &union).is_none());
        assert_eq!(Some("EFT-1"), messages.messages()[0].code());
        assert_eq!(
            "Language feature is not yet supported ('Union declarations')",
            messages.messages()[0].text()
        );
    }

    #[test]
    fn test_resolve_undeclared_symbol_emits_exactly_one_et_1() {
        let mut messages = MessageBuffer::new();
        let symbol = Node::value_symbol(null(), "x");
        assert!(resolve(&mut messages, &symbol).is_none());
        assert_eq!(1, messages.len());
        assert_eq!(1, messages.error_count());
        assert_eq!(Some("ET-1"), messages.messages()[0].code());
        assert_eq!("Symbol 'x' must be declared", messages.messages()[0].text());
    }

    #[test]
    fn test_resolve_symbol_through_scope() {
        let mut messages = MessageBuffer::new();
        let mut scope: Scope = Scope::new();
        scope
            .add_declaration(&Node::declaration_assignment(
                null(),
                Node::declaration_property(
                    null(),
                    PropertyFlags::empty(),
                    "x",
                    Some(signed(32)),
                ),
                None,
            ))
            .unwrap();
        let symbol = Node::value_symbol(null(), "x");
        let resolved = resolve_type(&mut messages, &scope, &symbol).unwrap();
        assert!(resolved.same_type(&signed(32)));
        assert!(messages.is_empty());
    }

    #[test]
    fn test_resolve_bit_not() {
        let mut messages = MessageBuffer::new();
        let node = Node::value_unary(
            null(),
            UnaryOperator::BitNot,
            Node::value_int_u64(null(), 5),
        );
        assert!(resolve(&mut messages, &node).unwrap().same_type(&unsigned(64)));

        // Non-integer operands fail silently; the well-formedness pass owns
        // the ET-6 report.
        let node = Node::value_unary(null(), UnaryOperator::BitNot, Node::value_bool(null(), true));
        assert!(resolve(&mut messages, &node).is_none());
        assert!(messages.is_empty());
    }

    #[test]
    fn test_resolve_negate_drops_unsigned() {
        let mut messages = MessageBuffer::new();
        let node = Node::value_unary(
            null(),
            UnaryOperator::Negate,
            Node::value_int_u8(null(), 5),
        );
        assert!(resolve(&mut messages, &node).unwrap().same_type(&signed(8)));

        let node = Node::value_unary(
            null(),
            UnaryOperator::Negate,
            Node::value_float_f64(null(), 5.0),
        );
        assert!(resolve(&mut messages, &node).unwrap().same_type(&float(64)));
    }

    #[test]
    fn test_resolve_dereference_and_get_address() {
        let mut messages = MessageBuffer::new();
        let mut scope: Scope = Scope::new();
        scope
            .add_declaration(&Node::declaration_assignment(
                null(),
                Node::declaration_property(
                    null(),
                    PropertyFlags::empty(),
                    "p",
                    Some(Node::type_pointer(null(), PointerFlags::empty(), signed(32))),
                ),
                None,
            ))
            .unwrap();

        let dereference = Node::value_unary(
            null(),
            UnaryOperator::Dereference,
            Node::value_symbol(null(), "p"),
        );
        let resolved = resolve_type(&mut messages, &scope, &dereference).unwrap();
        let Node::TypePointer(pointer) = &resolved else {
            panic!("expected pointer");
        };
        assert!(pointer.flags.contains(PointerFlags::IMPLICIT_DEREFERENCE));
        assert!(pointer.value.as_deref().unwrap().same_type(&signed(32)));
        assert!(messages.is_empty());

        // Taking the address of the dereference result wraps the reference
        // in a plain pointer again.
        let address = Node::value_unary(null(), UnaryOperator::GetAddress, dereference.clone());
        let resolved = resolve_type(&mut messages, &scope, &address).unwrap();
        let Node::TypePointer(pointer) = &resolved else {
            panic!("expected pointer");
        };
        assert!(!pointer.flags.contains(PointerFlags::IMPLICIT_DEREFERENCE));
        assert!(messages.is_empty());

        // Dereferencing a non-pointer is ET-2.
        let bad = Node::value_unary(
            null(),
            UnaryOperator::Dereference,
            Node::value_int_i32(null(), 5),
        );
        assert!(resolve_type(&mut messages, &scope, &bad).is_none());
        assert_eq!(Some("ET-2"), messages.messages()[0].code());
        assert_eq!(
            "Cannot dereference non-pointer type 'i32'",
            messages.messages()[0].text()
        );

        // Taking the address of a non-reference is ET-4.
        let bad = Node::value_unary(
            null(),
            UnaryOperator::GetAddress,
            Node::value_int_i32(null(), 5),
        );
        assert!(resolve_type(&mut messages, &scope, &bad).is_none());
        assert_eq!(Some("ET-4"), messages.messages()[1].code());
    }

    #[test]
    fn test_resolve_call() {
        let mut messages = MessageBuffer::new();
        let mut scope: Scope = Scope::new();
        scope
            .add_declaration(&Node::declaration_function(
                null(),
                FunctionFlags::empty(),
                "f",
                Node::type_function(null(), Vec::new(), None, None, unsigned(8)),
                None,
            ))
            .unwrap();

        let call = Node::value_call(null(), Node::value_symbol(null(), "f"), Vec::new(), Vec::new());
        let resolved = resolve_type(&mut messages, &scope, &call).unwrap();
        assert!(resolved.same_type(&unsigned(8)));
        assert!(messages.is_empty());

        let bad = Node::value_call(
            null(),
            Node::value_bool(null(), true),
            Vec::new(),
            Vec::new(),
        );
        assert!(resolve_type(&mut messages, &scope, &bad).is_none());
        assert_eq!(Some("ET-3"), messages.messages()[0].code());
        assert_eq!(
            "Cannot call non-function type 'bool'",
            messages.messages()[0].text()
        );
    }

    #[test]
    fn test_resolve_cast_takes_target_type() {
        let mut messages = MessageBuffer::new();
        let cast = Node::value_cast(null(), Node::value_bool(null(), true), signed(64));
        assert!(resolve(&mut messages, &cast).unwrap().same_type(&signed(64)));
        assert!(messages.is_empty());
    }

    #[test]
    fn test_resolve_arrays() {
        let mut messages = MessageBuffer::new();
        let array = Node::value_array(
            null(),
            vec![
                Node::value_int_u8(null(), 1),
                Node::value_int_u8(null(), 2),
                Node::value_int_u8(null(), 3),
            ],
        );
        let resolved = resolve(&mut messages, &array).unwrap();
        assert!(resolved.same_type(&Node::type_array(null(), 3, unsigned(8))));

        let repeated =
            Node::value_array_repeated(null(), 16, Node::value_float_f32(null(), 0.0));
        let resolved = resolve(&mut messages, &repeated).unwrap();
        assert!(resolved.same_type(&Node::type_array(null(), 16, float(32))));
        assert!(messages.is_empty());
    }

    #[test]
    fn test_resolve_comparisons_yield_bool() {
        let mut messages = MessageBuffer::new();
        for operator in [
            BinaryOperator::Equals,
            BinaryOperator::IsLessThan,
            BinaryOperator::LogicalAnd,
        ] {
            let node = Node::value_binary(
                null(),
                operator,
                Node::value_int_i32(null(), 1),
                Node::value_int_i32(null(), 2),
            );
            let resolved = resolve(&mut messages, &node).unwrap();
            assert!(resolved.same_type(&Node::type_bool(null())));
        }
        assert!(messages.is_empty());
    }

    #[test]
    fn test_resolve_add_uses_containment_and_add_assign_uses_left() {
        let mut messages = MessageBuffer::new();

        let add = Node::value_binary(
            null(),
            BinaryOperator::Add,
            Node::value_int_i32(null(), 5),
            Node::value_int_i64(null(), 5),
        );
        assert!(resolve(&mut messages, &add).unwrap().same_type(&signed(64)));

        let add_assign = Node::value_binary(
            null(),
            BinaryOperator::AddAssign,
            Node::value_int_i32(null(), 5),
            Node::value_int_i64(null(), 5),
        );
        assert!(
            resolve(&mut messages, &add_assign)
                .unwrap()
                .same_type(&signed(32))
        );
        assert!(messages.is_empty());
    }

    #[test]
    fn test_resolve_shift_is_left_typed() {
        let mut messages = MessageBuffer::new();
        let shift = Node::value_binary(
            null(),
            BinaryOperator::BitShiftRight,
            Node::value_int_u8(null(), 0),
            Node::value_int_i32(null(), 0),
        );
        assert!(resolve(&mut messages, &shift).unwrap().same_type(&unsigned(8)));
        assert!(messages.is_empty());
    }
}
