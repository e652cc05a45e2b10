//! Canonical debug dump of an AST, used by snapshot tests and `--ast-debug`
//! style tooling. The format is stable: one `[kind-name]` per node, two-space
//! indentation per level, `label = …` properties, `label[i] = …` list
//! elements, and `[null]` for absent children.

use std::fmt::Write;

use crate::ast::Node;
use crate::lexical::{format_char, format_int, format_str};

/// Render the canonical dump of a tree rooted at `node`.
#[must_use]
pub fn dump(node: &Node) -> String {
    let mut out = String::new();
    write_node(&mut out, Some(node), 0);
    out
}

fn pad(out: &mut String, indent: usize) {
    for _ in 0..indent {
        out.push(' ');
    }
}

fn property(out: &mut String, indent: usize, label: &str) {
    out.push('\n');
    pad(out, indent);
    let _ = write!(out, "{label} = ");
}

fn list_property(out: &mut String, indent: usize, label: &str, index: usize) {
    out.push('\n');
    pad(out, indent);
    let _ = write!(out, "{label}[{index}] = ");
}

fn child(out: &mut String, indent: usize, label: &str, node: &Option<Box<Node>>) {
    property(out, indent, label);
    write_node(out, node.as_deref(), indent);
}

fn children(out: &mut String, indent: usize, label: &str, nodes: &[Node]) {
    for (index, node) in nodes.iter().enumerate() {
        list_property(out, indent, label, index);
        write_node(out, Some(node), indent);
    }
}

fn scalar(out: &mut String, indent: usize, label: &str, value: impl std::fmt::Display) {
    property(out, indent, label);
    let _ = write!(out, "{value}");
}

fn flags_text(flags: &[(&'static str, bool)]) -> String {
    let set: Vec<&str> = flags
        .iter()
        .filter(|(_, on)| *on)
        .map(|(name, _)| *name)
        .collect();
    if set.is_empty() {
        "none".to_string()
    } else {
        set.join("|")
    }
}

fn write_node(out: &mut String, node: Option<&Node>, indent: usize) {
    let Some(node) = node else {
        out.push_str("[null]");
        return;
    };

    let _ = write!(out, "[{}]", node.kind().name());
    let indent = indent + 2;

    match node {
        Node::TypeVoid { .. } | Node::TypeBool { .. } => {}
        Node::TypeInt(payload) => {
            scalar(
                out,
                indent,
                "flags",
                flags_text(&[("unsigned", payload.is_unsigned())]),
            );
            scalar(out, indent, "bit-width", payload.bit_width);
        }
        Node::TypeFloat(payload) => {
            scalar(out, indent, "bit-width", payload.bit_width);
        }
        Node::TypeSymbol(payload) => {
            scalar(out, indent, "name", format_str(&payload.name));
        }
        Node::TypePointer(payload) => {
            scalar(
                out,
                indent,
                "flags",
                flags_text(&[
                    ("constant", payload.flags.contains(super::PointerFlags::CONSTANT)),
                    (
                        "implicit-dereference",
                        payload
                            .flags
                            .contains(super::PointerFlags::IMPLICIT_DEREFERENCE),
                    ),
                ]),
            );
            child(out, indent, "value", &payload.value);
        }
        Node::TypeArray(payload) => {
            scalar(out, indent, "length", payload.length);
            child(out, indent, "element", &payload.element);
        }
        Node::TypeFunction(payload) => {
            children(out, indent, "arguments", &payload.arguments);
            child(
                out,
                indent,
                "variadic-positional-arguments",
                &payload.variadic_positional,
            );
            child(
                out,
                indent,
                "variadic-keyword-arguments",
                &payload.variadic_keyword,
            );
            child(out, indent, "return-type", &payload.return_type);
        }
        Node::DeclarationUnion(payload) => {
            scalar(out, indent, "name", format_str(&payload.name));
            children(out, indent, "properties", &payload.properties);
        }
        Node::DeclarationStructure(payload) => {
            scalar(out, indent, "name", format_str(&payload.name));
            children(out, indent, "declarations", &payload.declarations);
        }
        Node::DeclarationProperty(payload) => {
            scalar(
                out,
                indent,
                "flags",
                flags_text(&[(
                    "optional",
                    payload.flags.contains(super::PropertyFlags::OPTIONAL),
                )]),
            );
            scalar(out, indent, "name", format_str(&payload.name));
            child(out, indent, "type", &payload.ty);
        }
        Node::DeclarationInterface(payload) => {
            scalar(
                out,
                indent,
                "flags",
                flags_text(&[(
                    "abstract",
                    payload.flags.contains(super::InterfaceFlags::ABSTRACT),
                )]),
            );
            scalar(out, indent, "name", format_str(&payload.name));
            children(out, indent, "extends", &payload.extends);
            children(out, indent, "declarations", &payload.declarations);
        }
        Node::DeclarationFunctionArgument(payload) => {
            scalar(
                out,
                indent,
                "flags",
                flags_text(&[(
                    "keyword",
                    payload.flags.contains(super::ArgumentFlags::KEYWORD),
                )]),
            );
            child(out, indent, "property", &payload.property);
            child(out, indent, "default-value", &payload.default_value);
        }
        Node::DeclarationFunction(payload) => {
            scalar(
                out,
                indent,
                "flags",
                flags_text(&[
                    (
                        "mutable",
                        payload.flags.contains(super::FunctionFlags::MUTABLE),
                    ),
                    (
                        "override",
                        payload.flags.contains(super::FunctionFlags::OVERRIDE),
                    ),
                ]),
            );
            scalar(out, indent, "name", format_str(&payload.name));
            child(out, indent, "type", &payload.ty);
            child(out, indent, "body", &payload.body);
        }
        Node::DeclarationAssignment(payload) => {
            child(out, indent, "property", &payload.property);
            child(out, indent, "value", &payload.value);
        }
        Node::DeclarationBlock(payload) => {
            children(out, indent, "declarations", &payload.declarations);
        }
        Node::StatementReturn(payload) => {
            child(out, indent, "value", &payload.value);
        }
        Node::StatementIfConditionalClause(payload) => {
            child(out, indent, "condition", &payload.condition);
            child(out, indent, "body", &payload.body);
        }
        Node::StatementIf(payload) => {
            children(out, indent, "clauses", &payload.clauses);
            child(out, indent, "else", &payload.else_clause);
        }
        Node::StatementWhile(payload) => {
            child(out, indent, "condition", &payload.condition);
            child(out, indent, "body", &payload.body);
        }
        Node::StatementBlock(payload) => {
            children(out, indent, "statements", &payload.statements);
        }
        Node::ValueBool(payload) => {
            scalar(out, indent, "value", payload.value);
        }
        Node::ValueInt(payload) => {
            property(out, indent, "type");
            write_node(out, Some(&Node::TypeInt(payload.ty)), indent);
            scalar(out, indent, "value", format_int(payload));
        }
        Node::ValueFloat(payload) => {
            property(out, indent, "type");
            write_node(out, Some(&Node::TypeFloat(payload.ty)), indent);
            property(out, indent, "value");
            let _ = write!(out, "{}{}", payload.value, payload.ty.keyword());
        }
        Node::ValueCharacter(payload) => {
            scalar(out, indent, "value", format_char(payload.value));
        }
        Node::ValueString(payload) => {
            scalar(out, indent, "value", format_str(&payload.value));
        }
        Node::ValueArray(payload) => {
            children(out, indent, "elements", &payload.elements);
        }
        Node::ValueArrayRepeated(payload) => {
            scalar(out, indent, "length", payload.length);
            child(out, indent, "element", &payload.element);
        }
        Node::ValueStructure(payload) => {
            children(out, indent, "assignments", &payload.assignments);
        }
        Node::ValueSymbol(payload) => {
            scalar(out, indent, "name", format_str(&payload.name));
        }
        Node::ValueCallKeywordArgument(payload) => {
            scalar(out, indent, "name", format_str(&payload.name));
            child(out, indent, "value", &payload.value);
        }
        Node::ValueCall(payload) => {
            child(out, indent, "callee", &payload.callee);
            children(out, indent, "arguments", &payload.arguments);
            children(out, indent, "keyword-arguments", &payload.keyword_arguments);
        }
        Node::ValueCast(payload) => {
            child(out, indent, "value", &payload.value);
            child(out, indent, "type", &payload.ty);
        }
        Node::ValueUnary(payload) => {
            child(out, indent, "operand", &payload.operand);
        }
        Node::ValueBinary(payload) => {
            child(out, indent, "left", &payload.left);
            child(out, indent, "right", &payload.right);
        }
    }
}
