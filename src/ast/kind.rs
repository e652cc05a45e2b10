use bitflags::bitflags;
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Discriminant tag for every AST node kind the compiler knows about.
///
/// Unary and binary operator values are distinct kinds even though they share
/// payload layouts; the per-kind metadata lives in [`KindInfo`].
#[derive(
    Debug, Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash, IntoPrimitive, TryFromPrimitive,
)]
#[repr(u8)]
pub enum NodeKind {
    TypeVoid = 0,
    TypeBool,
    TypeInt,
    TypeFloat,
    TypeSymbol,
    TypePointer,
    TypeArray,
    TypeFunction,
    DeclarationUnion,
    DeclarationStructure,
    DeclarationProperty,
    DeclarationInterface,
    DeclarationFunctionArgument,
    DeclarationFunction,
    DeclarationAssignment,
    DeclarationBlock,
    StatementReturn,
    StatementIfConditionalClause,
    StatementIf,
    StatementWhile,
    StatementBlock,
    ValueBool,
    ValueInt,
    ValueFloat,
    ValueCharacter,
    ValueString,
    ValueArray,
    ValueArrayRepeated,
    ValueStructure,
    ValueSymbol,
    ValueDereference,
    ValueGetAddress,
    ValueCallKeywordArgument,
    ValueCall,
    ValueCast,
    ValueAccess,
    ValueBitNot,
    ValueBitAnd,
    ValueBitOr,
    ValueBitXor,
    ValueBitShiftLeft,
    ValueBitShiftRight,
    ValueNegate,
    ValueAdd,
    ValueSubtract,
    ValueMultiply,
    ValueDivide,
    ValueDivideInt,
    ValueModulo,
    ValueExponentiate,
    ValueEquals,
    ValueNotEquals,
    ValueIsLessThan,
    ValueIsLessThanOrEqualTo,
    ValueIsGreaterThan,
    ValueIsGreaterThanOrEqualTo,
    ValueLogicalNot,
    ValueLogicalAnd,
    ValueLogicalOr,
    ValueAssign,
    ValueBitAndAssign,
    ValueBitOrAssign,
    ValueBitXorAssign,
    ValueBitShiftLeftAssign,
    ValueBitShiftRightAssign,
    ValueAddAssign,
    ValueIncrement,
    ValueSubtractAssign,
    ValueDecrement,
    ValueMultiplyAssign,
    ValueDivideAssign,
    ValueDivideIntAssign,
    ValueModuloAssign,
    ValueExponentiateAssign,
    ValueLogicalAndAssign,
    ValueLogicalOrAssign,
}

impl NodeKind {
    pub const LAST: Self = Self::ValueLogicalOrAssign;

    /// Number of kinds, for table-coverage tests.
    pub const COUNT: usize = Self::LAST as usize + 1;
}

bitflags! {
    /// Classification bits for quick filtering, mirrored by the per-kind
    /// static table.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct KindFlags: u16 {
        const TYPE = 1 << 0;
        const DECLARATION = 1 << 1;
        const STATEMENT = 1 << 2;
        const VALUE = 1 << 3;
        const VALUE_UNARY = 1 << 4;
        const VALUE_BINARY = 1 << 5;
        const HAS_CHILDREN = 1 << 6;
        const TYPE_PRIMARY = 1 << 7;
    }
}

impl KindFlags {
    const PRIMARY_TYPE: Self = Self::TYPE.union(Self::TYPE_PRIMARY);
    const TYPE_WITH_CHILDREN: Self = Self::TYPE.union(Self::HAS_CHILDREN);
    const DECLARATION_NODE: Self = Self::DECLARATION.union(Self::HAS_CHILDREN);
    const STATEMENT_NODE: Self = Self::STATEMENT.union(Self::HAS_CHILDREN);
    const VALUE_WITH_CHILDREN: Self = Self::VALUE.union(Self::HAS_CHILDREN);
    const UNARY_VALUE: Self = Self::VALUE
        .union(Self::VALUE_UNARY)
        .union(Self::HAS_CHILDREN);
    const BINARY_VALUE: Self = Self::VALUE
        .union(Self::VALUE_BINARY)
        .union(Self::HAS_CHILDREN);
}

/// Static metadata for one node kind: the display name used by debug dumps
/// and structural diagnostics, the classification flags, and the operator
/// symbol for operator value kinds.
#[derive(Debug, Clone, Copy)]
pub struct KindInfo {
    pub name: &'static str,
    pub flags: KindFlags,
    pub operator_symbol: Option<&'static str>,
}

macro_rules! info {
    ($name:literal, $flags:ident) => {
        &KindInfo {
            name: $name,
            flags: KindFlags::$flags,
            operator_symbol: None,
        }
    };
    ($name:literal, $flags:ident, $symbol:literal) => {
        &KindInfo {
            name: $name,
            flags: KindFlags::$flags,
            operator_symbol: Some($symbol),
        }
    };
}

impl NodeKind {
    /// O(1) lookup of the kind's static metadata.
    #[must_use]
    pub fn info(self) -> &'static KindInfo {
        use NodeKind::*;

        match self {
            TypeVoid => info!("type-void", PRIMARY_TYPE),
            TypeBool => info!("type-bool", PRIMARY_TYPE),
            TypeInt => info!("type-int", TYPE),
            TypeFloat => info!("type-float", TYPE),
            TypeSymbol => info!("type-symbol", TYPE),
            TypePointer => info!("type-pointer", TYPE_WITH_CHILDREN),
            TypeArray => info!("type-array", TYPE_WITH_CHILDREN),
            TypeFunction => info!("type-function", TYPE_WITH_CHILDREN),
            DeclarationUnion => info!("declaration-union", DECLARATION_NODE),
            DeclarationStructure => info!("declaration-structure", DECLARATION_NODE),
            DeclarationProperty => info!("declaration-property", DECLARATION_NODE),
            DeclarationInterface => info!("declaration-interface", DECLARATION_NODE),
            DeclarationFunctionArgument => {
                info!("declaration-function-argument", DECLARATION_NODE)
            }
            DeclarationFunction => info!("declaration-function", DECLARATION_NODE),
            DeclarationAssignment => info!("declaration-assignment", DECLARATION_NODE),
            DeclarationBlock => info!("declaration-block", DECLARATION_NODE),
            StatementReturn => info!("statement-return", STATEMENT_NODE),
            StatementIfConditionalClause => {
                info!("statement-if-conditional-clause", HAS_CHILDREN)
            }
            StatementIf => info!("statement-if", STATEMENT_NODE),
            StatementWhile => info!("statement-while", STATEMENT_NODE),
            StatementBlock => info!("statement-block", STATEMENT_NODE),
            ValueBool => info!("value-bool", VALUE),
            ValueInt => info!("value-int", VALUE),
            ValueFloat => info!("value-float", VALUE),
            ValueCharacter => info!("value-character", VALUE),
            ValueString => info!("value-string", VALUE),
            ValueArray => info!("value-array", VALUE_WITH_CHILDREN),
            ValueArrayRepeated => info!("value-array-repeated", VALUE_WITH_CHILDREN),
            ValueStructure => info!("value-structure", VALUE_WITH_CHILDREN),
            ValueSymbol => info!("value-symbol", VALUE),
            ValueDereference => info!("value-dereference", UNARY_VALUE, "*"),
            ValueGetAddress => info!("value-get-address", UNARY_VALUE, "&"),
            ValueCallKeywordArgument => {
                info!("value-call-keyword-argument", VALUE_WITH_CHILDREN)
            }
            ValueCall => info!("value-call", VALUE_WITH_CHILDREN),
            ValueCast => info!("value-cast", VALUE_WITH_CHILDREN),
            ValueAccess => info!("value-access", BINARY_VALUE, "."),
            ValueBitNot => info!("value-bit-not", UNARY_VALUE, "~"),
            ValueBitAnd => info!("value-bit-and", BINARY_VALUE, "&"),
            ValueBitOr => info!("value-bit-or", BINARY_VALUE, "|"),
            ValueBitXor => info!("value-bit-xor", BINARY_VALUE, "^"),
            ValueBitShiftLeft => info!("value-bit-shift-left", BINARY_VALUE, "<<"),
            ValueBitShiftRight => info!("value-bit-shift-right", BINARY_VALUE, ">>"),
            ValueNegate => info!("value-negate", UNARY_VALUE, "-"),
            ValueAdd => info!("value-add", BINARY_VALUE, "+"),
            ValueSubtract => info!("value-subtract", BINARY_VALUE, "-"),
            ValueMultiply => info!("value-multiply", BINARY_VALUE, "*"),
            ValueDivide => info!("value-divide", BINARY_VALUE, "/"),
            ValueDivideInt => info!("value-divide-int", BINARY_VALUE, "//"),
            ValueModulo => info!("value-modulo", BINARY_VALUE, "%"),
            ValueExponentiate => info!("value-exponentiate", BINARY_VALUE, "**"),
            ValueEquals => info!("value-equals", BINARY_VALUE, "=="),
            ValueNotEquals => info!("value-not-equals", BINARY_VALUE, "!="),
            ValueIsLessThan => info!("value-is-less-than", BINARY_VALUE, "<"),
            ValueIsLessThanOrEqualTo => {
                info!("value-is-less-than-or-equal-to", BINARY_VALUE, "<=")
            }
            ValueIsGreaterThan => info!("value-is-greater-than", BINARY_VALUE, ">"),
            ValueIsGreaterThanOrEqualTo => {
                info!("value-is-greater-than-or-equal-to", BINARY_VALUE, ">=")
            }
            ValueLogicalNot => info!("value-logical-not", UNARY_VALUE, "!"),
            ValueLogicalAnd => info!("value-logical-and", BINARY_VALUE, "&&"),
            ValueLogicalOr => info!("value-logical-or", BINARY_VALUE, "||"),
            ValueAssign => info!("value-assign", BINARY_VALUE, "="),
            ValueBitAndAssign => info!("value-bit-and-assign", BINARY_VALUE, "&="),
            ValueBitOrAssign => info!("value-bit-or-assign", BINARY_VALUE, "|="),
            ValueBitXorAssign => info!("value-bit-xor-assign", BINARY_VALUE, "^="),
            ValueBitShiftLeftAssign => {
                info!("value-bit-shift-left-assign", BINARY_VALUE, "<<=")
            }
            ValueBitShiftRightAssign => {
                info!("value-bit-shift-right-assign", BINARY_VALUE, ">>=")
            }
            ValueAddAssign => info!("value-add-assign", BINARY_VALUE, "+="),
            ValueIncrement => info!("value-increment", UNARY_VALUE, "++"),
            ValueSubtractAssign => info!("value-subtract-assign", BINARY_VALUE, "-="),
            ValueDecrement => info!("value-decrement", UNARY_VALUE, "--"),
            ValueMultiplyAssign => info!("value-multiply-assign", BINARY_VALUE, "*="),
            ValueDivideAssign => info!("value-divide-assign", BINARY_VALUE, "/="),
            ValueDivideIntAssign => info!("value-divide-int-assign", BINARY_VALUE, "//="),
            ValueModuloAssign => info!("value-modulo-assign", BINARY_VALUE, "%="),
            ValueExponentiateAssign => {
                info!("value-exponentiate-assign", BINARY_VALUE, "**=")
            }
            ValueLogicalAndAssign => info!("value-logical-and-assign", BINARY_VALUE, "&&="),
            ValueLogicalOrAssign => info!("value-logical-or-assign", BINARY_VALUE, "||="),
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        self.info().name
    }

    #[must_use]
    pub fn operator_symbol(self) -> Option<&'static str> {
        self.info().operator_symbol
    }

    #[must_use]
    pub fn is_type(self) -> bool {
        self.info().flags.contains(KindFlags::TYPE)
    }

    #[must_use]
    pub fn is_primary_type(self) -> bool {
        self.info().flags.contains(KindFlags::TYPE_PRIMARY)
    }

    #[must_use]
    pub fn is_declaration(self) -> bool {
        self.info().flags.contains(KindFlags::DECLARATION)
    }

    #[must_use]
    pub fn is_statement(self) -> bool {
        self.info().flags.contains(KindFlags::STATEMENT)
    }

    #[must_use]
    pub fn is_value(self) -> bool {
        self.info().flags.contains(KindFlags::VALUE)
    }

    #[must_use]
    pub fn is_unary_value(self) -> bool {
        self.info().flags.contains(KindFlags::VALUE_UNARY)
    }

    #[must_use]
    pub fn is_binary_value(self) -> bool {
        self.info().flags.contains(KindFlags::VALUE_BINARY)
    }

    /// Iterate every kind, in discriminant order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..=Self::LAST as u8).map(|raw| Self::try_from(raw).expect("contiguous kind range"))
    }
}
