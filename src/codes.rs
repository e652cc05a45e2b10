//! The stable diagnostic catalog.
//!
//! Every message the core emits goes through one of these typed emitters so
//! the code strings and wording stay identical across call sites. Codes are
//! grouped by prefix: `EFT-*` unsupported language features, `ES-*` lexical
//! errors, `ET-*` type errors, `IT-*` internal type issues, `IS-*` internal
//! structural issues.

use crate::ast::format::format_type;
use crate::ast::{Node, NodeKind};
use crate::message::{MessageBuffer, MessageId, Severity};
use crate::source::SourceRange;

#[track_caller]
pub fn emit_eft_1_unsupported_requirement(
    messages: &mut MessageBuffer,
    range: &SourceRange,
    requirement_number: u32,
    requirement_title: &str,
) -> MessageId {
    let message = messages.emit(
        Severity::Error,
        Some("EFT-1"),
        Some(*range),
        format!("Language feature is not yet supported ('{requirement_title}')"),
    );
    let _ = messages.emit_child(
        message,
        Severity::Note,
        None,
        format!("It is described in Requirement-{requirement_number}"),
    );
    message
}

#[track_caller]
pub fn emit_eft_3_unsupported_proposal(
    messages: &mut MessageBuffer,
    range: &SourceRange,
    proposal_number: u32,
    proposal_title: &str,
) -> MessageId {
    let message = messages.emit(
        Severity::Error,
        Some("EFT-3"),
        Some(*range),
        format!("Language feature is not yet supported ('{proposal_title}')"),
    );
    let _ = messages.emit_child(
        message,
        Severity::Note,
        None,
        format!("It is described in Proposal-{proposal_number}"),
    );
    message
}

#[track_caller]
pub fn emit_es_1_unexpected_character(
    messages: &mut MessageBuffer,
    range: &SourceRange,
    value: char,
) -> MessageId {
    messages.emit(
        Severity::Error,
        Some("ES-1"),
        Some(*range),
        format!("Unexpected character '{value}' (0x{:02x})", value as u32),
    )
}

#[track_caller]
pub fn emit_es_2_unexpected_byte(
    messages: &mut MessageBuffer,
    range: &SourceRange,
    value: u8,
) -> MessageId {
    messages.emit(
        Severity::Error,
        Some("ES-2"),
        Some(*range),
        format!("Unexpected byte 0x{value:02x}"),
    )
}

#[track_caller]
pub fn emit_es_3_string_ends_with_backslash(
    messages: &mut MessageBuffer,
    range: &SourceRange,
) -> MessageId {
    messages.emit(
        Severity::Error,
        Some("ES-3"),
        Some(*range),
        "Backslash in string must have at least one character afterwards".to_string(),
    )
}

#[track_caller]
pub fn emit_es_4_escape_x_expects_2_hex_digits(
    messages: &mut MessageBuffer,
    range: &SourceRange,
    digit_count: usize,
) -> MessageId {
    debug_assert!(digit_count < 2);
    let message = messages.emit(
        Severity::Error,
        Some("ES-4"),
        Some(*range),
        format!(
            "Escape '\\x' must be followed by exactly 2 hexadecimal digits ({})",
            if digit_count == 1 {
                "only found one"
            } else {
                "found none"
            }
        ),
    );
    let _ = messages.emit_child(
        message,
        Severity::Note,
        None,
        "For example: '\\x20'".to_string(),
    );
    message
}

#[track_caller]
pub fn emit_es_5_escape_u_expects_opening_brace(
    messages: &mut MessageBuffer,
    range: &SourceRange,
) -> MessageId {
    let message = messages.emit(
        Severity::Error,
        Some("ES-5"),
        Some(*range),
        "Escape '\\u' must be followed by '{'".to_string(),
    );
    let _ = messages.emit_child(
        message,
        Severity::Note,
        None,
        "For example: '\\u{20}'".to_string(),
    );
    message
}

#[track_caller]
pub fn emit_es_6_escape_u_expects_closing_brace(
    messages: &mut MessageBuffer,
    range: &SourceRange,
) -> MessageId {
    let message = messages.emit(
        Severity::Error,
        Some("ES-6"),
        Some(*range),
        "Escape '\\u{' must be followed by a closing '}'".to_string(),
    );
    let _ = messages.emit_child(
        message,
        Severity::Note,
        None,
        "For example: '\\u{20}'".to_string(),
    );
    message
}

#[track_caller]
pub fn emit_es_7_escape_u_expects_hex_digits(
    messages: &mut MessageBuffer,
    range: &SourceRange,
    digit_count: usize,
) -> MessageId {
    debug_assert!(digit_count == 0 || digit_count > 6);
    let message = messages.emit(
        Severity::Error,
        Some("ES-7"),
        Some(*range),
        format!(
            "Escape '\\u{{' must be followed by between 1 and 6 hexadecimal digits ({digit_count} were provided)"
        ),
    );
    let _ = messages.emit_child(
        message,
        Severity::Note,
        None,
        "For example: '\\u{20}'".to_string(),
    );
    message
}

#[track_caller]
pub fn emit_es_8_unexpected_end_of_literal(
    messages: &mut MessageBuffer,
    range: &SourceRange,
) -> MessageId {
    messages.emit(
        Severity::Error,
        Some("ES-8"),
        Some(*range),
        "Unexpected end of literal".to_string(),
    )
}

#[track_caller]
pub fn emit_es_9_multiple_characters_in_character_literal(
    messages: &mut MessageBuffer,
    range: &SourceRange,
) -> MessageId {
    let message = messages.emit(
        Severity::Error,
        Some("ES-9"),
        Some(*range),
        "Character literal contains more than one character".to_string(),
    );
    let _ = messages.emit_child(
        message,
        Severity::Note,
        None,
        "If this was supposed to be a string, use double quotes instead".to_string(),
    );
    message
}

#[track_caller]
pub fn emit_es_10_invalid_bit_width_for_int(
    messages: &mut MessageBuffer,
    range: &SourceRange,
    bit_width: u64,
) -> MessageId {
    let message = messages.emit(
        Severity::Error,
        Some("ES-10"),
        Some(*range),
        format!("Invalid bit width for integer literal: {bit_width}"),
    );
    let _ = messages.emit_child(
        message,
        Severity::Note,
        None,
        "Valid bit widths are: 8, 16, 32, 64".to_string(),
    );
    message
}

#[track_caller]
pub fn emit_es_11_invalid_bit_width_for_float(
    messages: &mut MessageBuffer,
    range: &SourceRange,
    bit_width: u64,
) -> MessageId {
    let message = messages.emit(
        Severity::Error,
        Some("ES-11"),
        Some(*range),
        format!("Invalid bit width for float literal: {bit_width}"),
    );
    let _ = messages.emit_child(
        message,
        Severity::Note,
        None,
        "Valid bit widths are: 32, 64".to_string(),
    );
    message
}

#[track_caller]
pub fn emit_et_1_undeclared_symbol(
    messages: &mut MessageBuffer,
    range: &SourceRange,
    symbol_name: &str,
) -> MessageId {
    messages.emit(
        Severity::Error,
        Some("ET-1"),
        Some(*range),
        format!("Symbol '{symbol_name}' must be declared"),
    )
}

#[track_caller]
pub fn emit_et_2_cannot_dereference_non_pointer(
    messages: &mut MessageBuffer,
    range: &SourceRange,
    ty: &Node,
) -> MessageId {
    messages.emit(
        Severity::Error,
        Some("ET-2"),
        Some(*range),
        format!("Cannot dereference non-pointer type '{}'", format_type(ty)),
    )
}

#[track_caller]
pub fn emit_et_3_cannot_call_non_function(
    messages: &mut MessageBuffer,
    range: &SourceRange,
    ty: &Node,
) -> MessageId {
    messages.emit(
        Severity::Error,
        Some("ET-3"),
        Some(*range),
        format!("Cannot call non-function type '{}'", format_type(ty)),
    )
}

#[track_caller]
pub fn emit_et_4_cannot_get_address_non_reference(
    messages: &mut MessageBuffer,
    range: &SourceRange,
    ty: &Node,
) -> MessageId {
    messages.emit(
        Severity::Error,
        Some("ET-4"),
        Some(*range),
        format!(
            "Cannot get address of value with non-reference type '{}'",
            format_type(ty)
        ),
    )
}

#[track_caller]
pub fn emit_et_5_mismatched_return_type(
    messages: &mut MessageBuffer,
    range: &SourceRange,
    expected: &Node,
    actual: &Node,
) -> MessageId {
    messages.emit(
        Severity::Error,
        Some("ET-5"),
        Some(*range),
        format!(
            "Cannot return value of type '{}' in function with return type '{}'",
            format_type(actual),
            format_type(expected)
        ),
    )
}

/// `operand_name` is `operand`, `left-hand side`, or `right-hand side`;
/// `expected` is preformatted (`integer`, `numeric`, `'u32'`).
#[track_caller]
pub fn emit_et_6_operator_unexpected_operand_type(
    messages: &mut MessageBuffer,
    range: &SourceRange,
    operator: &str,
    operand_name: &str,
    expected: &str,
    operand_type: &Node,
) -> MessageId {
    messages.emit(
        Severity::Error,
        Some("ET-6"),
        Some(*range),
        format!(
            "Operator {operator}'s {operand_name} must be {expected}, but is '{}'",
            format_type(operand_type)
        ),
    )
}

#[track_caller]
pub fn emit_it_1_no_containing_type(
    messages: &mut MessageBuffer,
    range: &SourceRange,
    type_a: &Node,
    type_b: &Node,
) -> MessageId {
    messages.emit(
        Severity::InternalError,
        Some("IT-1"),
        Some(*range),
        format!(
            "Unable to find a type that can contain both '{}' and '{}'",
            format_type(type_a),
            format_type(type_b)
        ),
    )
}

#[track_caller]
pub fn emit_is_1_code_point_limit(
    messages: &mut MessageBuffer,
    range: &SourceRange,
    code_point: u32,
) -> MessageId {
    messages.emit(
        Severity::InternalError,
        Some("IS-1"),
        Some(*range),
        format!("Unicode code point specified exceeds 0xffffff ({code_point:x})"),
    )
}

#[track_caller]
pub fn emit_is_2_empty_literal(messages: &mut MessageBuffer, range: &SourceRange) -> MessageId {
    messages.emit(
        Severity::InternalError,
        Some("IS-2"),
        Some(*range),
        "Cannot parse empty string as literal".to_string(),
    )
}

#[track_caller]
pub fn emit_is_3_literal_must_start_with_quote(
    messages: &mut MessageBuffer,
    range: &SourceRange,
) -> MessageId {
    messages.emit(
        Severity::InternalError,
        Some("IS-3"),
        Some(*range),
        "String or character literal must start with a quote".to_string(),
    )
}

#[track_caller]
pub fn emit_is_4_float_literal_missing_dot(
    messages: &mut MessageBuffer,
    range: &SourceRange,
) -> MessageId {
    messages.emit(
        Severity::InternalError,
        Some("IS-4"),
        Some(*range),
        "Cannot parse string without '.' as float literal".to_string(),
    )
}

#[track_caller]
pub fn emit_is_5_ast_node_property_null(
    messages: &mut MessageBuffer,
    range: &SourceRange,
    kind: NodeKind,
    property_name: &str,
) -> MessageId {
    messages.emit(
        Severity::InternalError,
        Some("IS-5"),
        Some(*range),
        format!(
            "AST node '{}' cannot have null '{property_name}'",
            kind.name()
        ),
    )
}

#[track_caller]
pub fn emit_is_6_ast_node_property_empty_string(
    messages: &mut MessageBuffer,
    range: &SourceRange,
    kind: NodeKind,
    property_name: &str,
) -> MessageId {
    messages.emit(
        Severity::InternalError,
        Some("IS-6"),
        Some(*range),
        format!(
            "AST node '{}' cannot have '{property_name}' that is an empty string",
            kind.name()
        ),
    )
}

#[track_caller]
pub fn emit_is_7_invalid_symbol(
    messages: &mut MessageBuffer,
    range: &SourceRange,
    symbol: &str,
) -> MessageId {
    let message = messages.emit(
        Severity::InternalError,
        Some("IS-7"),
        Some(*range),
        format!("Symbol '{symbol}' is invalid"),
    );
    let _ = messages.emit_child(
        message,
        Severity::Note,
        None,
        "Symbols must start with an underscore or a letter and contain underscores, letters, and numbers"
            .to_string(),
    );
    message
}

#[track_caller]
pub fn emit_is_8_ast_node_property_null_element(
    messages: &mut MessageBuffer,
    range: &SourceRange,
    kind: NodeKind,
    property_name: &str,
    index: usize,
) -> MessageId {
    messages.emit(
        Severity::InternalError,
        Some("IS-8"),
        Some(*range),
        format!(
            "AST node '{}' property '{property_name}' has invalid null element at index {index}",
            kind.name()
        ),
    )
}

#[track_caller]
pub fn emit_is_9_ast_node_property_unexpected_element(
    messages: &mut MessageBuffer,
    range: &SourceRange,
    kind: NodeKind,
    property_name: &str,
    index: usize,
) -> MessageId {
    messages.emit(
        Severity::InternalError,
        Some("IS-9"),
        Some(*range),
        format!(
            "AST node '{}' property '{property_name}' has element of unexpected AST kind at index {index}",
            kind.name()
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::MessageQuery;
    use crate::source::SourceRange;

    #[test]
    fn test_eft_1_attaches_requirement_note() {
        let mut messages = MessageBuffer::new();
        emit_eft_1_unsupported_requirement(
            &mut messages,
            &SourceRange::NULL,
            9,
            "Union declarations",
        );
        let query = MessageQuery {
            code: Some("EFT-1"),
            ..MessageQuery::default()
        };
        let message = messages.query_single(&query).unwrap();
        assert_eq!(
            "Language feature is not yet supported ('Union declarations')",
            message.text()
        );
        assert_eq!(1, message.children().len());
        assert_eq!(
            "It is described in Requirement-9",
            message.children()[0].text()
        );
    }

    #[test]
    fn test_et_6_wording() {
        let mut messages = MessageBuffer::new();
        let operand_type = Node::type_bool(SourceRange::NULL);
        emit_et_6_operator_unexpected_operand_type(
            &mut messages,
            &SourceRange::NULL,
            "~",
            "operand",
            "integer",
            &operand_type,
        );
        assert_eq!(
            "Operator ~'s operand must be integer, but is 'bool'",
            messages.messages()[0].text()
        );
    }

    #[test]
    fn test_texts_satisfy_message_invariants() {
        let mut messages = MessageBuffer::new();
        let range = SourceRange::NULL;
        let bool_type = Node::type_bool(range);
        emit_es_1_unexpected_character(&mut messages, &range, '$');
        emit_es_3_string_ends_with_backslash(&mut messages, &range);
        emit_es_10_invalid_bit_width_for_int(&mut messages, &range, 12);
        emit_et_1_undeclared_symbol(&mut messages, &range, "x");
        emit_et_2_cannot_dereference_non_pointer(&mut messages, &range, &bool_type);
        emit_it_1_no_containing_type(&mut messages, &range, &bool_type, &bool_type);
        emit_is_7_invalid_symbol(&mut messages, &range, "2x");
        for message in messages.messages() {
            let text = message.text();
            assert!(text.chars().next().unwrap().is_ascii_uppercase());
            assert!(!text.ends_with(['.', ',', ':', '\n', ' ']));
        }
    }
}
