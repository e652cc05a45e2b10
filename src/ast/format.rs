//! User-facing rendering of type nodes, used when a diagnostic needs to name
//! a type (`Operator ~'s operand must be integer, but is 'bool'`).

use std::fmt::Write;

use crate::ast::{Node, PointerFlags};

/// Render a type node the way the language spells it.
#[must_use]
pub fn format_type(node: &Node) -> String {
    let mut out = String::new();
    write_type(&mut out, node);
    out
}

fn write_type(out: &mut String, node: &Node) {
    match node {
        Node::TypeVoid { .. } => out.push_str("void"),
        Node::TypeBool { .. } => out.push_str("bool"),
        Node::TypeInt(payload) => out.push_str(payload.keyword()),
        Node::TypeFloat(payload) => out.push_str(payload.keyword()),
        Node::TypeSymbol(payload) => out.push_str(&payload.name),
        Node::TypePointer(payload) => {
            if payload.flags.contains(PointerFlags::IMPLICIT_DEREFERENCE) {
                out.push('&');
            } else {
                out.push('*');
            }
            if payload.flags.contains(PointerFlags::CONSTANT) {
                out.push_str("const ");
            }
            match payload.value.as_deref() {
                Some(inner) => write_type(out, inner),
                None => out.push('?'),
            }
        }
        Node::TypeArray(payload) => {
            let _ = write!(out, "[{}]", payload.length);
            match payload.element.as_deref() {
                Some(element) => write_type(out, element),
                None => out.push('?'),
            }
        }
        Node::TypeFunction(payload) => {
            out.push_str("fn(");
            let mut first = true;
            for argument in &payload.arguments {
                if !first {
                    out.push_str(", ");
                }
                first = false;
                write_argument(out, argument);
            }
            if payload.variadic_positional.is_some() {
                if !first {
                    out.push_str(", ");
                }
                out.push_str("...");
            }
            out.push(')');
            if let Some(return_type) = payload.return_type.as_deref() {
                out.push_str(" -> ");
                write_type(out, return_type);
            }
        }
        // Not a type node; fall back to the kind's display name so a broken
        // caller still produces something readable.
        other => out.push_str(other.kind().name()),
    }
}

fn write_argument(out: &mut String, argument: &Node) {
    let ty = match argument {
        Node::DeclarationFunctionArgument(payload) => payload
            .property
            .as_deref()
            .and_then(|property| match property {
                Node::DeclarationProperty(property) => property.ty.as_deref(),
                _ => None,
            }),
        Node::DeclarationProperty(payload) => payload.ty.as_deref(),
        _ => None,
    };
    match ty {
        Some(ty) => write_type(out, ty),
        None => out.push('?'),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ArgumentFlags, IntFlags, PropertyFlags};
    use crate::source::SourceRange;

    fn null() -> SourceRange {
        SourceRange::NULL
    }

    #[test]
    fn test_primitives() {
        assert_eq!("bool", format_type(&Node::type_bool(null())));
        assert_eq!("void", format_type(&Node::type_void(null())));
        assert_eq!(
            "u32",
            format_type(&Node::type_int(null(), IntFlags::UNSIGNED, 32))
        );
        assert_eq!(
            "i64",
            format_type(&Node::type_int(null(), IntFlags::empty(), 64))
        );
        assert_eq!("f32", format_type(&Node::type_float(null(), 32)));
        assert_eq!("Point", format_type(&Node::type_symbol(null(), "Point")));
    }

    #[test]
    fn test_pointer_and_reference() {
        let pointee = Node::type_int(null(), IntFlags::empty(), 8);
        assert_eq!(
            "*i8",
            format_type(&Node::type_pointer(
                null(),
                PointerFlags::empty(),
                pointee.clone()
            ))
        );
        assert_eq!(
            "&i8",
            format_type(&Node::type_pointer(
                null(),
                PointerFlags::IMPLICIT_DEREFERENCE,
                pointee
            ))
        );
    }

    #[test]
    fn test_array_and_function() {
        assert_eq!(
            "[4]bool",
            format_type(&Node::type_array(null(), 4, Node::type_bool(null())))
        );

        let function = Node::type_function(
            null(),
            vec![Node::declaration_function_argument(
                null(),
                ArgumentFlags::empty(),
                Node::declaration_property(
                    null(),
                    PropertyFlags::empty(),
                    "a",
                    Some(Node::type_int(null(), IntFlags::empty(), 32)),
                ),
                None,
            )],
            None,
            None,
            Node::type_int(null(), IntFlags::UNSIGNED, 8),
        );
        assert_eq!("fn(i32) -> u8", format_type(&function));
    }
}
