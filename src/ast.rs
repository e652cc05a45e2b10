//! The abstract syntax tree: one sum type over every kind of node the parser
//! can produce, with deep cloning, kind-aware structural type equality, and
//! constructor-enforced local invariants.

use bitflags::bitflags;

use crate::source::SourceRange;

pub mod debug;
pub mod format;
pub mod kind;
pub mod visitor;

pub use kind::{KindFlags, KindInfo, NodeKind};

bitflags! {
    /// Modifier bits on an integer type.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct IntFlags: u8 {
        const UNSIGNED = 1 << 0;
    }
}

bitflags! {
    /// Modifier bits on a pointer type. `IMPLICIT_DEREFERENCE` marks an
    /// l-value reference, eligible for address-taking.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PointerFlags: u8 {
        const CONSTANT = 1 << 0;
        const IMPLICIT_DEREFERENCE = 1 << 1;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PropertyFlags: u8 {
        const OPTIONAL = 1 << 0;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct InterfaceFlags: u8 {
        const ABSTRACT = 1 << 0;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ArgumentFlags: u8 {
        const KEYWORD = 1 << 0;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct FunctionFlags: u8 {
        const MUTABLE = 1 << 0;
        const OVERRIDE = 1 << 1;
    }
}

/// The operator carried by a unary value node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Dereference,
    GetAddress,
    BitNot,
    Negate,
    LogicalNot,
    Increment,
    Decrement,
}

impl UnaryOperator {
    #[must_use]
    pub fn kind(self) -> NodeKind {
        match self {
            Self::Dereference => NodeKind::ValueDereference,
            Self::GetAddress => NodeKind::ValueGetAddress,
            Self::BitNot => NodeKind::ValueBitNot,
            Self::Negate => NodeKind::ValueNegate,
            Self::LogicalNot => NodeKind::ValueLogicalNot,
            Self::Increment => NodeKind::ValueIncrement,
            Self::Decrement => NodeKind::ValueDecrement,
        }
    }

    #[must_use]
    pub fn symbol(self) -> &'static str {
        self.kind().operator_symbol().unwrap_or_default()
    }
}

/// The operator carried by a binary value node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Access,
    BitAnd,
    BitOr,
    BitXor,
    BitShiftLeft,
    BitShiftRight,
    Add,
    Subtract,
    Multiply,
    Divide,
    DivideInt,
    Modulo,
    Exponentiate,
    Equals,
    NotEquals,
    IsLessThan,
    IsLessThanOrEqualTo,
    IsGreaterThan,
    IsGreaterThanOrEqualTo,
    LogicalAnd,
    LogicalOr,
    Assign,
    BitAndAssign,
    BitOrAssign,
    BitXorAssign,
    BitShiftLeftAssign,
    BitShiftRightAssign,
    AddAssign,
    SubtractAssign,
    MultiplyAssign,
    DivideAssign,
    DivideIntAssign,
    ModuloAssign,
    ExponentiateAssign,
    LogicalAndAssign,
    LogicalOrAssign,
}

impl BinaryOperator {
    #[must_use]
    pub fn kind(self) -> NodeKind {
        match self {
            Self::Access => NodeKind::ValueAccess,
            Self::BitAnd => NodeKind::ValueBitAnd,
            Self::BitOr => NodeKind::ValueBitOr,
            Self::BitXor => NodeKind::ValueBitXor,
            Self::BitShiftLeft => NodeKind::ValueBitShiftLeft,
            Self::BitShiftRight => NodeKind::ValueBitShiftRight,
            Self::Add => NodeKind::ValueAdd,
            Self::Subtract => NodeKind::ValueSubtract,
            Self::Multiply => NodeKind::ValueMultiply,
            Self::Divide => NodeKind::ValueDivide,
            Self::DivideInt => NodeKind::ValueDivideInt,
            Self::Modulo => NodeKind::ValueModulo,
            Self::Exponentiate => NodeKind::ValueExponentiate,
            Self::Equals => NodeKind::ValueEquals,
            Self::NotEquals => NodeKind::ValueNotEquals,
            Self::IsLessThan => NodeKind::ValueIsLessThan,
            Self::IsLessThanOrEqualTo => NodeKind::ValueIsLessThanOrEqualTo,
            Self::IsGreaterThan => NodeKind::ValueIsGreaterThan,
            Self::IsGreaterThanOrEqualTo => NodeKind::ValueIsGreaterThanOrEqualTo,
            Self::LogicalAnd => NodeKind::ValueLogicalAnd,
            Self::LogicalOr => NodeKind::ValueLogicalOr,
            Self::Assign => NodeKind::ValueAssign,
            Self::BitAndAssign => NodeKind::ValueBitAndAssign,
            Self::BitOrAssign => NodeKind::ValueBitOrAssign,
            Self::BitXorAssign => NodeKind::ValueBitXorAssign,
            Self::BitShiftLeftAssign => NodeKind::ValueBitShiftLeftAssign,
            Self::BitShiftRightAssign => NodeKind::ValueBitShiftRightAssign,
            Self::AddAssign => NodeKind::ValueAddAssign,
            Self::SubtractAssign => NodeKind::ValueSubtractAssign,
            Self::MultiplyAssign => NodeKind::ValueMultiplyAssign,
            Self::DivideAssign => NodeKind::ValueDivideAssign,
            Self::DivideIntAssign => NodeKind::ValueDivideIntAssign,
            Self::ModuloAssign => NodeKind::ValueModuloAssign,
            Self::ExponentiateAssign => NodeKind::ValueExponentiateAssign,
            Self::LogicalAndAssign => NodeKind::ValueLogicalAndAssign,
            Self::LogicalOrAssign => NodeKind::ValueLogicalOrAssign,
        }
    }

    #[must_use]
    pub fn symbol(self) -> &'static str {
        self.kind().operator_symbol().unwrap_or_default()
    }

    /// Whether the operator resolves to the smallest containing numeric type
    /// of its operands rather than the left operand's type.
    #[must_use]
    pub fn resolves_by_containment(self) -> bool {
        use BinaryOperator::*;

        matches!(
            self,
            BitAnd
                | BitOr
                | BitXor
                | Add
                | Subtract
                | Multiply
                | Divide
                | DivideInt
                | Modulo
                | Exponentiate
        )
    }

    /// Whether the operator yields `bool` regardless of its operand types.
    #[must_use]
    pub fn resolves_to_bool(self) -> bool {
        use BinaryOperator::*;

        matches!(
            self,
            Equals
                | NotEquals
                | IsLessThan
                | IsLessThanOrEqualTo
                | IsGreaterThan
                | IsGreaterThanOrEqualTo
                | LogicalAnd
                | LogicalOr
        )
    }
}

/// An integer type: signedness flag plus one of the fixed bit widths.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypeInt {
    pub range: SourceRange,
    pub flags: IntFlags,
    pub bit_width: u8,
}

impl TypeInt {
    #[must_use]
    pub fn new(range: SourceRange, flags: IntFlags, bit_width: u8) -> Self {
        debug_assert!(matches!(bit_width, 8 | 16 | 32 | 64));
        Self {
            range,
            flags,
            bit_width,
        }
    }

    #[must_use]
    pub fn is_unsigned(&self) -> bool {
        self.flags.contains(IntFlags::UNSIGNED)
    }

    /// The source-language keyword for this type, e.g. `u32`.
    #[must_use]
    pub fn keyword(&self) -> &'static str {
        match (self.is_unsigned(), self.bit_width) {
            (false, 8) => "i8",
            (false, 16) => "i16",
            (false, 32) => "i32",
            (false, 64) => "i64",
            (true, 8) => "u8",
            (true, 16) => "u16",
            (true, 32) => "u32",
            _ => "u64",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypeFloat {
    pub range: SourceRange,
    pub bit_width: u8,
}

impl TypeFloat {
    #[must_use]
    pub fn new(range: SourceRange, bit_width: u8) -> Self {
        debug_assert!(matches!(bit_width, 32 | 64));
        Self { range, bit_width }
    }

    #[must_use]
    pub fn keyword(&self) -> &'static str {
        if self.bit_width == 32 { "f32" } else { "f64" }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeSymbol {
    pub range: SourceRange,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypePointer {
    pub range: SourceRange,
    pub flags: PointerFlags,
    pub value: Option<Box<Node>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeArray {
    pub range: SourceRange,
    pub length: u64,
    pub element: Option<Box<Node>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeFunction {
    pub range: SourceRange,
    pub arguments: Vec<Node>,
    pub variadic_positional: Option<Box<Node>>,
    pub variadic_keyword: Option<Box<Node>>,
    pub return_type: Option<Box<Node>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeclarationUnion {
    pub range: SourceRange,
    pub name: String,
    pub properties: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeclarationStructure {
    pub range: SourceRange,
    pub name: String,
    pub declarations: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeclarationProperty {
    pub range: SourceRange,
    pub flags: PropertyFlags,
    pub name: String,
    pub ty: Option<Box<Node>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeclarationInterface {
    pub range: SourceRange,
    pub flags: InterfaceFlags,
    pub name: String,
    pub extends: Vec<Node>,
    pub declarations: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeclarationFunctionArgument {
    pub range: SourceRange,
    pub flags: ArgumentFlags,
    pub property: Option<Box<Node>>,
    pub default_value: Option<Box<Node>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeclarationFunction {
    pub range: SourceRange,
    pub flags: FunctionFlags,
    pub name: String,
    pub ty: Option<Box<Node>>,
    pub body: Option<Box<Node>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeclarationAssignment {
    pub range: SourceRange,
    pub property: Option<Box<Node>>,
    pub value: Option<Box<Node>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeclarationBlock {
    pub range: SourceRange,
    pub declarations: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatementReturn {
    pub range: SourceRange,
    pub value: Option<Box<Node>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfConditionalClause {
    pub range: SourceRange,
    pub condition: Option<Box<Node>>,
    pub body: Option<Box<Node>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatementIf {
    pub range: SourceRange,
    pub clauses: Vec<Node>,
    pub else_clause: Option<Box<Node>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatementWhile {
    pub range: SourceRange,
    pub condition: Option<Box<Node>>,
    pub body: Option<Box<Node>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatementBlock {
    pub range: SourceRange,
    pub statements: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValueBool {
    pub range: SourceRange,
    pub value: bool,
}

/// An integer literal. The value is kept as raw two's-complement bits; the
/// embedded type tag says how to interpret them.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueInt {
    pub range: SourceRange,
    pub ty: TypeInt,
    pub value: u64,
}

impl ValueInt {
    /// The literal value sign-extended from its declared width.
    #[must_use]
    pub fn as_i64(&self) -> i64 {
        let shift = 64 - u32::from(self.ty.bit_width);
        ((self.value << shift) as i64) >> shift
    }

    /// The literal value zero-extended from its declared width.
    #[must_use]
    pub fn as_u64(&self) -> u64 {
        if self.ty.bit_width == 64 {
            self.value
        } else {
            self.value & ((1u64 << self.ty.bit_width) - 1)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValueFloat {
    pub range: SourceRange,
    pub ty: TypeFloat,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValueCharacter {
    pub range: SourceRange,
    pub value: char,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValueString {
    pub range: SourceRange,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValueArray {
    pub range: SourceRange,
    pub elements: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValueArrayRepeated {
    pub range: SourceRange,
    pub length: u64,
    pub element: Option<Box<Node>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValueStructure {
    pub range: SourceRange,
    pub assignments: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValueSymbol {
    pub range: SourceRange,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValueCallKeywordArgument {
    pub range: SourceRange,
    pub name: String,
    pub value: Option<Box<Node>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValueCall {
    pub range: SourceRange,
    pub callee: Option<Box<Node>>,
    pub arguments: Vec<Node>,
    pub keyword_arguments: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValueCast {
    pub range: SourceRange,
    pub value: Option<Box<Node>>,
    pub ty: Option<Box<Node>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValueUnary {
    pub range: SourceRange,
    pub operator: UnaryOperator,
    pub operand: Option<Box<Node>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValueBinary {
    pub range: SourceRange,
    pub operator: BinaryOperator,
    pub left: Option<Box<Node>>,
    pub right: Option<Box<Node>>,
}

/// One AST node. Every child is exclusively owned; `Clone` is a deep copy.
///
/// Unary and binary operator values share payload layouts and carry their
/// operator as data, the same way the original parser treats them; the
/// fine-grained [`NodeKind`] is recovered through [`Node::kind`].
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    TypeVoid { range: SourceRange },
    TypeBool { range: SourceRange },
    TypeInt(TypeInt),
    TypeFloat(TypeFloat),
    TypeSymbol(TypeSymbol),
    TypePointer(TypePointer),
    TypeArray(TypeArray),
    TypeFunction(TypeFunction),
    DeclarationUnion(DeclarationUnion),
    DeclarationStructure(DeclarationStructure),
    DeclarationProperty(DeclarationProperty),
    DeclarationInterface(DeclarationInterface),
    DeclarationFunctionArgument(DeclarationFunctionArgument),
    DeclarationFunction(DeclarationFunction),
    DeclarationAssignment(DeclarationAssignment),
    DeclarationBlock(DeclarationBlock),
    StatementReturn(StatementReturn),
    StatementIfConditionalClause(IfConditionalClause),
    StatementIf(StatementIf),
    StatementWhile(StatementWhile),
    StatementBlock(StatementBlock),
    ValueBool(ValueBool),
    ValueInt(ValueInt),
    ValueFloat(ValueFloat),
    ValueCharacter(ValueCharacter),
    ValueString(ValueString),
    ValueArray(ValueArray),
    ValueArrayRepeated(ValueArrayRepeated),
    ValueStructure(ValueStructure),
    ValueSymbol(ValueSymbol),
    ValueCallKeywordArgument(ValueCallKeywordArgument),
    ValueCall(ValueCall),
    ValueCast(ValueCast),
    ValueUnary(ValueUnary),
    ValueBinary(ValueBinary),
}

/// Whether a name is a lexically valid Forge symbol: `_` or a letter first,
/// then `_`, letters, and digits.
#[must_use]
pub fn is_valid_symbol(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

fn boxed(node: Node) -> Option<Box<Node>> {
    Some(Box::new(node))
}

impl Node {
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::TypeVoid { .. } => NodeKind::TypeVoid,
            Self::TypeBool { .. } => NodeKind::TypeBool,
            Self::TypeInt(_) => NodeKind::TypeInt,
            Self::TypeFloat(_) => NodeKind::TypeFloat,
            Self::TypeSymbol(_) => NodeKind::TypeSymbol,
            Self::TypePointer(_) => NodeKind::TypePointer,
            Self::TypeArray(_) => NodeKind::TypeArray,
            Self::TypeFunction(_) => NodeKind::TypeFunction,
            Self::DeclarationUnion(_) => NodeKind::DeclarationUnion,
            Self::DeclarationStructure(_) => NodeKind::DeclarationStructure,
            Self::DeclarationProperty(_) => NodeKind::DeclarationProperty,
            Self::DeclarationInterface(_) => NodeKind::DeclarationInterface,
            Self::DeclarationFunctionArgument(_) => NodeKind::DeclarationFunctionArgument,
            Self::DeclarationFunction(_) => NodeKind::DeclarationFunction,
            Self::DeclarationAssignment(_) => NodeKind::DeclarationAssignment,
            Self::DeclarationBlock(_) => NodeKind::DeclarationBlock,
            Self::StatementReturn(_) => NodeKind::StatementReturn,
            Self::StatementIfConditionalClause(_) => NodeKind::StatementIfConditionalClause,
            Self::StatementIf(_) => NodeKind::StatementIf,
            Self::StatementWhile(_) => NodeKind::StatementWhile,
            Self::StatementBlock(_) => NodeKind::StatementBlock,
            Self::ValueBool(_) => NodeKind::ValueBool,
            Self::ValueInt(_) => NodeKind::ValueInt,
            Self::ValueFloat(_) => NodeKind::ValueFloat,
            Self::ValueCharacter(_) => NodeKind::ValueCharacter,
            Self::ValueString(_) => NodeKind::ValueString,
            Self::ValueArray(_) => NodeKind::ValueArray,
            Self::ValueArrayRepeated(_) => NodeKind::ValueArrayRepeated,
            Self::ValueStructure(_) => NodeKind::ValueStructure,
            Self::ValueSymbol(_) => NodeKind::ValueSymbol,
            Self::ValueCallKeywordArgument(_) => NodeKind::ValueCallKeywordArgument,
            Self::ValueCall(_) => NodeKind::ValueCall,
            Self::ValueCast(_) => NodeKind::ValueCast,
            Self::ValueUnary(payload) => payload.operator.kind(),
            Self::ValueBinary(payload) => payload.operator.kind(),
        }
    }

    #[must_use]
    pub fn range(&self) -> &SourceRange {
        match self {
            Self::TypeVoid { range } | Self::TypeBool { range } => range,
            Self::TypeInt(payload) => &payload.range,
            Self::TypeFloat(payload) => &payload.range,
            Self::TypeSymbol(payload) => &payload.range,
            Self::TypePointer(payload) => &payload.range,
            Self::TypeArray(payload) => &payload.range,
            Self::TypeFunction(payload) => &payload.range,
            Self::DeclarationUnion(payload) => &payload.range,
            Self::DeclarationStructure(payload) => &payload.range,
            Self::DeclarationProperty(payload) => &payload.range,
            Self::DeclarationInterface(payload) => &payload.range,
            Self::DeclarationFunctionArgument(payload) => &payload.range,
            Self::DeclarationFunction(payload) => &payload.range,
            Self::DeclarationAssignment(payload) => &payload.range,
            Self::DeclarationBlock(payload) => &payload.range,
            Self::StatementReturn(payload) => &payload.range,
            Self::StatementIfConditionalClause(payload) => &payload.range,
            Self::StatementIf(payload) => &payload.range,
            Self::StatementWhile(payload) => &payload.range,
            Self::StatementBlock(payload) => &payload.range,
            Self::ValueBool(payload) => &payload.range,
            Self::ValueInt(payload) => &payload.range,
            Self::ValueFloat(payload) => &payload.range,
            Self::ValueCharacter(payload) => &payload.range,
            Self::ValueString(payload) => &payload.range,
            Self::ValueArray(payload) => &payload.range,
            Self::ValueArrayRepeated(payload) => &payload.range,
            Self::ValueStructure(payload) => &payload.range,
            Self::ValueSymbol(payload) => &payload.range,
            Self::ValueCallKeywordArgument(payload) => &payload.range,
            Self::ValueCall(payload) => &payload.range,
            Self::ValueCast(payload) => &payload.range,
            Self::ValueUnary(payload) => &payload.range,
            Self::ValueBinary(payload) => &payload.range,
        }
    }

    /// The name a declaration introduces into scope, if this node is a
    /// declaration that has one.
    #[must_use]
    pub fn declaration_name(&self) -> Option<&str> {
        match self {
            Self::DeclarationUnion(payload) => Some(&payload.name),
            Self::DeclarationStructure(payload) => Some(&payload.name),
            Self::DeclarationProperty(payload) => Some(&payload.name),
            Self::DeclarationInterface(payload) => Some(&payload.name),
            Self::DeclarationFunction(payload) => Some(&payload.name),
            Self::DeclarationFunctionArgument(payload) => {
                payload.property.as_deref()?.declaration_name()
            }
            Self::DeclarationAssignment(payload) => {
                payload.property.as_deref()?.declaration_name()
            }
            _ => None,
        }
    }

    // Constructors. Each takes owned children and asserts the local
    // invariants the parser is expected to uphold.

    #[must_use]
    pub fn type_void(range: SourceRange) -> Self {
        Self::TypeVoid { range }
    }

    #[must_use]
    pub fn type_bool(range: SourceRange) -> Self {
        Self::TypeBool { range }
    }

    #[must_use]
    pub fn type_int(range: SourceRange, flags: IntFlags, bit_width: u8) -> Self {
        Self::TypeInt(TypeInt::new(range, flags, bit_width))
    }

    #[must_use]
    pub fn type_float(range: SourceRange, bit_width: u8) -> Self {
        Self::TypeFloat(TypeFloat::new(range, bit_width))
    }

    #[must_use]
    pub fn type_symbol(range: SourceRange, name: impl Into<String>) -> Self {
        let name = name.into();
        debug_assert!(is_valid_symbol(&name));
        Self::TypeSymbol(TypeSymbol { range, name })
    }

    #[must_use]
    pub fn type_pointer(range: SourceRange, flags: PointerFlags, value: Node) -> Self {
        Self::TypePointer(TypePointer {
            range,
            flags,
            value: boxed(value),
        })
    }

    #[must_use]
    pub fn type_array(range: SourceRange, length: u64, element: Node) -> Self {
        Self::TypeArray(TypeArray {
            range,
            length,
            element: boxed(element),
        })
    }

    #[must_use]
    pub fn type_function(
        range: SourceRange,
        arguments: Vec<Node>,
        variadic_positional: Option<Node>,
        variadic_keyword: Option<Node>,
        return_type: Node,
    ) -> Self {
        Self::TypeFunction(TypeFunction {
            range,
            arguments,
            variadic_positional: variadic_positional.map(Box::new),
            variadic_keyword: variadic_keyword.map(Box::new),
            return_type: boxed(return_type),
        })
    }

    #[must_use]
    pub fn declaration_union(
        range: SourceRange,
        name: impl Into<String>,
        properties: Vec<Node>,
    ) -> Self {
        let name = name.into();
        debug_assert!(is_valid_symbol(&name));
        Self::DeclarationUnion(DeclarationUnion {
            range,
            name,
            properties,
        })
    }

    #[must_use]
    pub fn declaration_structure(
        range: SourceRange,
        name: impl Into<String>,
        declarations: Vec<Node>,
    ) -> Self {
        let name = name.into();
        debug_assert!(is_valid_symbol(&name));
        Self::DeclarationStructure(DeclarationStructure {
            range,
            name,
            declarations,
        })
    }

    #[must_use]
    pub fn declaration_property(
        range: SourceRange,
        flags: PropertyFlags,
        name: impl Into<String>,
        ty: Option<Node>,
    ) -> Self {
        let name = name.into();
        debug_assert!(is_valid_symbol(&name));
        Self::DeclarationProperty(DeclarationProperty {
            range,
            flags,
            name,
            ty: ty.map(Box::new),
        })
    }

    #[must_use]
    pub fn declaration_interface(
        range: SourceRange,
        flags: InterfaceFlags,
        name: impl Into<String>,
        extends: Vec<Node>,
        declarations: Vec<Node>,
    ) -> Self {
        let name = name.into();
        debug_assert!(is_valid_symbol(&name));
        Self::DeclarationInterface(DeclarationInterface {
            range,
            flags,
            name,
            extends,
            declarations,
        })
    }

    #[must_use]
    pub fn declaration_function_argument(
        range: SourceRange,
        flags: ArgumentFlags,
        property: Node,
        default_value: Option<Node>,
    ) -> Self {
        debug_assert_eq!(NodeKind::DeclarationProperty, property.kind());
        Self::DeclarationFunctionArgument(DeclarationFunctionArgument {
            range,
            flags,
            property: boxed(property),
            default_value: default_value.map(Box::new),
        })
    }

    #[must_use]
    pub fn declaration_function(
        range: SourceRange,
        flags: FunctionFlags,
        name: impl Into<String>,
        ty: Node,
        body: Option<Node>,
    ) -> Self {
        let name = name.into();
        debug_assert!(is_valid_symbol(&name));
        debug_assert_eq!(NodeKind::TypeFunction, ty.kind());
        Self::DeclarationFunction(DeclarationFunction {
            range,
            flags,
            name,
            ty: boxed(ty),
            body: body.map(Box::new),
        })
    }

    #[must_use]
    pub fn declaration_assignment(range: SourceRange, property: Node, value: Option<Node>) -> Self {
        debug_assert_eq!(NodeKind::DeclarationProperty, property.kind());
        Self::DeclarationAssignment(DeclarationAssignment {
            range,
            property: boxed(property),
            value: value.map(Box::new),
        })
    }

    #[must_use]
    pub fn declaration_block(range: SourceRange, declarations: Vec<Node>) -> Self {
        Self::DeclarationBlock(DeclarationBlock {
            range,
            declarations,
        })
    }

    #[must_use]
    pub fn statement_return(range: SourceRange, value: Option<Node>) -> Self {
        Self::StatementReturn(StatementReturn {
            range,
            value: value.map(Box::new),
        })
    }

    #[must_use]
    pub fn statement_if_conditional_clause(
        range: SourceRange,
        condition: Node,
        body: Node,
    ) -> Self {
        Self::StatementIfConditionalClause(IfConditionalClause {
            range,
            condition: boxed(condition),
            body: boxed(body),
        })
    }

    #[must_use]
    pub fn statement_if(range: SourceRange, clauses: Vec<Node>, else_clause: Option<Node>) -> Self {
        debug_assert!(!clauses.is_empty());
        Self::StatementIf(StatementIf {
            range,
            clauses,
            else_clause: else_clause.map(Box::new),
        })
    }

    #[must_use]
    pub fn statement_while(range: SourceRange, condition: Node, body: Node) -> Self {
        Self::StatementWhile(StatementWhile {
            range,
            condition: boxed(condition),
            body: boxed(body),
        })
    }

    #[must_use]
    pub fn statement_block(range: SourceRange, statements: Vec<Node>) -> Self {
        Self::StatementBlock(StatementBlock { range, statements })
    }

    #[must_use]
    pub fn value_bool(range: SourceRange, value: bool) -> Self {
        Self::ValueBool(ValueBool { range, value })
    }

    #[must_use]
    pub fn value_int(range: SourceRange, ty: TypeInt, value: u64) -> Self {
        Self::ValueInt(ValueInt { range, ty, value })
    }

    #[must_use]
    pub fn value_int_i8(range: SourceRange, value: i8) -> Self {
        Self::value_int(range, TypeInt::new(range, IntFlags::empty(), 8), value as u64)
    }

    #[must_use]
    pub fn value_int_i16(range: SourceRange, value: i16) -> Self {
        Self::value_int(
            range,
            TypeInt::new(range, IntFlags::empty(), 16),
            value as u64,
        )
    }

    #[must_use]
    pub fn value_int_i32(range: SourceRange, value: i32) -> Self {
        Self::value_int(
            range,
            TypeInt::new(range, IntFlags::empty(), 32),
            value as u64,
        )
    }

    #[must_use]
    pub fn value_int_i64(range: SourceRange, value: i64) -> Self {
        Self::value_int(
            range,
            TypeInt::new(range, IntFlags::empty(), 64),
            value as u64,
        )
    }

    #[must_use]
    pub fn value_int_u8(range: SourceRange, value: u8) -> Self {
        Self::value_int(
            range,
            TypeInt::new(range, IntFlags::UNSIGNED, 8),
            u64::from(value),
        )
    }

    #[must_use]
    pub fn value_int_u16(range: SourceRange, value: u16) -> Self {
        Self::value_int(
            range,
            TypeInt::new(range, IntFlags::UNSIGNED, 16),
            u64::from(value),
        )
    }

    #[must_use]
    pub fn value_int_u32(range: SourceRange, value: u32) -> Self {
        Self::value_int(
            range,
            TypeInt::new(range, IntFlags::UNSIGNED, 32),
            u64::from(value),
        )
    }

    #[must_use]
    pub fn value_int_u64(range: SourceRange, value: u64) -> Self {
        Self::value_int(range, TypeInt::new(range, IntFlags::UNSIGNED, 64), value)
    }

    #[must_use]
    pub fn value_float_f32(range: SourceRange, value: f32) -> Self {
        Self::ValueFloat(ValueFloat {
            range,
            ty: TypeFloat::new(range, 32),
            value: f64::from(value),
        })
    }

    #[must_use]
    pub fn value_float_f64(range: SourceRange, value: f64) -> Self {
        Self::ValueFloat(ValueFloat {
            range,
            ty: TypeFloat::new(range, 64),
            value,
        })
    }

    #[must_use]
    pub fn value_character(range: SourceRange, value: char) -> Self {
        Self::ValueCharacter(ValueCharacter { range, value })
    }

    #[must_use]
    pub fn value_string(range: SourceRange, value: impl Into<String>) -> Self {
        Self::ValueString(ValueString {
            range,
            value: value.into(),
        })
    }

    #[must_use]
    pub fn value_array(range: SourceRange, elements: Vec<Node>) -> Self {
        debug_assert!(!elements.is_empty());
        Self::ValueArray(ValueArray { range, elements })
    }

    #[must_use]
    pub fn value_array_repeated(range: SourceRange, length: u64, element: Node) -> Self {
        Self::ValueArrayRepeated(ValueArrayRepeated {
            range,
            length,
            element: boxed(element),
        })
    }

    #[must_use]
    pub fn value_structure(range: SourceRange, assignments: Vec<Node>) -> Self {
        Self::ValueStructure(ValueStructure { range, assignments })
    }

    #[must_use]
    pub fn value_symbol(range: SourceRange, name: impl Into<String>) -> Self {
        let name = name.into();
        debug_assert!(is_valid_symbol(&name));
        Self::ValueSymbol(ValueSymbol { range, name })
    }

    #[must_use]
    pub fn value_call_keyword_argument(
        range: SourceRange,
        name: impl Into<String>,
        value: Node,
    ) -> Self {
        let name = name.into();
        debug_assert!(is_valid_symbol(&name));
        Self::ValueCallKeywordArgument(ValueCallKeywordArgument {
            range,
            name,
            value: boxed(value),
        })
    }

    #[must_use]
    pub fn value_call(
        range: SourceRange,
        callee: Node,
        arguments: Vec<Node>,
        keyword_arguments: Vec<Node>,
    ) -> Self {
        Self::ValueCall(ValueCall {
            range,
            callee: boxed(callee),
            arguments,
            keyword_arguments,
        })
    }

    #[must_use]
    pub fn value_cast(range: SourceRange, value: Node, ty: Node) -> Self {
        Self::ValueCast(ValueCast {
            range,
            value: boxed(value),
            ty: boxed(ty),
        })
    }

    #[must_use]
    pub fn value_unary(range: SourceRange, operator: UnaryOperator, operand: Node) -> Self {
        Self::ValueUnary(ValueUnary {
            range,
            operator,
            operand: boxed(operand),
        })
    }

    #[must_use]
    pub fn value_binary(
        range: SourceRange,
        operator: BinaryOperator,
        left: Node,
        right: Node,
    ) -> Self {
        Self::ValueBinary(ValueBinary {
            range,
            operator,
            left: boxed(left),
            right: boxed(right),
        })
    }

    /// Structural type equality, used by the resolver for type matching.
    ///
    /// Kind-aware for type nodes; declarations, statements, and values are
    /// never compared as types and conservatively compare equal when their
    /// kinds match.
    #[must_use]
    pub fn same_type(&self, other: &Node) -> bool {
        if self.kind() != other.kind() {
            return false;
        }
        match (self, other) {
            (Self::TypeInt(a), Self::TypeInt(b)) => {
                a.flags == b.flags && a.bit_width == b.bit_width
            }
            (Self::TypeFloat(a), Self::TypeFloat(b)) => a.bit_width == b.bit_width,
            (Self::TypeSymbol(a), Self::TypeSymbol(b)) => a.name == b.name,
            (Self::TypePointer(a), Self::TypePointer(b)) => {
                a.flags == b.flags && same_optional_type(&a.value, &b.value)
            }
            (Self::TypeArray(a), Self::TypeArray(b)) => {
                a.length == b.length && same_optional_type(&a.element, &b.element)
            }
            (Self::TypeFunction(a), Self::TypeFunction(b)) => {
                a.arguments.len() == b.arguments.len()
                    && a.arguments
                        .iter()
                        .zip(&b.arguments)
                        .all(|(left, right)| left.same_type(right))
                    && same_optional_type(&a.variadic_positional, &b.variadic_positional)
                    && same_optional_type(&a.variadic_keyword, &b.variadic_keyword)
                    && same_optional_type(&a.return_type, &b.return_type)
            }
            _ => true,
        }
    }
}

fn same_optional_type(a: &Option<Box<Node>>, b: &Option<Box<Node>>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a.same_type(b),
        _ => false,
    }
}
