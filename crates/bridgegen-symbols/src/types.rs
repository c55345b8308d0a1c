//! Symbol and type representations of the host program.
//!
//! Everything in here is plain data. Types are interned (`TypeId`), while
//! declarations live in arenas indexed by `DefId`, `MethodId` and
//! `TypeParamId`. None of it is mutated once the graph is built.

use bitflags::bitflags;
use bridgegen_common::SourceLocation;
use smallvec::SmallVec;

// =============================================================================
// Identifiers
// =============================================================================

/// Interned type handle. Equal structure means equal id.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

impl TypeId {
    /// The `void` pseudo-type of methods without a return value.
    pub const VOID: Self = Self(0);
    /// The late-bound `dynamic` type.
    pub const DYNAMIC: Self = Self(1);
    /// A type the symbol model could not resolve.
    pub const ERROR: Self = Self(2);

    /// Number of pre-registered types.
    pub(crate) const RESERVED: u32 = 3;
}

/// Type definition (class, struct, interface, enum or delegate).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DefId(pub u32);

/// Method declaration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodId(pub u32);

/// Generic type parameter of a type or a method.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeParamId(pub u32);

// =============================================================================
// Type Structure
// =============================================================================

/// Structural shape of a type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeData {
    /// A (possibly constructed) named type: `Container<T>`, `string`.
    Named {
        def: DefId,
        args: SmallVec<[TypeId; 2]>,
    },
    /// `T[]`, `T[,]`, ...
    Array { element: TypeId, rank: u8 },
    /// Reference to a type parameter.
    Param(TypeParamId),
    /// `T*`
    Pointer(TypeId),
    /// `delegate*<A, B, R>`
    FunctionPointer {
        params: SmallVec<[TypeId; 4]>,
        ret: TypeId,
    },
    Void,
    Dynamic,
    Error,
}

/// Kind of a type definition.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DefKind {
    Class,
    Struct,
    Interface,
    Enum,
    Delegate,
}

impl DefKind {
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Struct => "struct",
            Self::Interface => "interface",
            Self::Enum => "enum",
            Self::Delegate => "delegate",
        }
    }

    #[must_use]
    pub const fn is_value_type(self) -> bool {
        matches!(self, Self::Struct | Self::Enum)
    }
}

/// Types the generator and the host language treat specially.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SpecialType {
    Object,
    ValueType,
    Enum,
    Array,
    String,
    Boolean,
    Char,
    SByte,
    Byte,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Single,
    Double,
    Decimal,
    IntPtr,
    UIntPtr,
}

impl SpecialType {
    /// The language keyword that names this type, if any.
    #[must_use]
    pub const fn keyword(self) -> Option<&'static str> {
        Some(match self {
            Self::Object => "object",
            Self::String => "string",
            Self::Boolean => "bool",
            Self::Char => "char",
            Self::SByte => "sbyte",
            Self::Byte => "byte",
            Self::Int16 => "short",
            Self::UInt16 => "ushort",
            Self::Int32 => "int",
            Self::UInt32 => "uint",
            Self::Int64 => "long",
            Self::UInt64 => "ulong",
            Self::Single => "float",
            Self::Double => "double",
            Self::Decimal => "decimal",
            Self::IntPtr => "nint",
            Self::UIntPtr => "nuint",
            Self::ValueType | Self::Enum | Self::Array => return None,
        })
    }

    /// Map a language keyword back to the special type.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "object" => Self::Object,
            "string" => Self::String,
            "bool" => Self::Boolean,
            "char" => Self::Char,
            "sbyte" => Self::SByte,
            "byte" => Self::Byte,
            "short" => Self::Int16,
            "ushort" => Self::UInt16,
            "int" => Self::Int32,
            "uint" => Self::UInt32,
            "long" => Self::Int64,
            "ulong" => Self::UInt64,
            "float" => Self::Single,
            "double" => Self::Double,
            "decimal" => Self::Decimal,
            "nint" => Self::IntPtr,
            "nuint" => Self::UIntPtr,
            _ => return None,
        })
    }

    /// Metadata name of the runtime type.
    #[must_use]
    pub const fn metadata_name(self) -> &'static str {
        match self {
            Self::Object => "System.Object",
            Self::ValueType => "System.ValueType",
            Self::Enum => "System.Enum",
            Self::Array => "System.Array",
            Self::String => "System.String",
            Self::Boolean => "System.Boolean",
            Self::Char => "System.Char",
            Self::SByte => "System.SByte",
            Self::Byte => "System.Byte",
            Self::Int16 => "System.Int16",
            Self::UInt16 => "System.UInt16",
            Self::Int32 => "System.Int32",
            Self::UInt32 => "System.UInt32",
            Self::Int64 => "System.Int64",
            Self::UInt64 => "System.UInt64",
            Self::Single => "System.Single",
            Self::Double => "System.Double",
            Self::Decimal => "System.Decimal",
            Self::IntPtr => "System.IntPtr",
            Self::UIntPtr => "System.UIntPtr",
        }
    }

    pub const ALL: [Self; 20] = [
        Self::Object,
        Self::ValueType,
        Self::Enum,
        Self::Array,
        Self::String,
        Self::Boolean,
        Self::Char,
        Self::SByte,
        Self::Byte,
        Self::Int16,
        Self::UInt16,
        Self::Int32,
        Self::UInt32,
        Self::Int64,
        Self::UInt64,
        Self::Single,
        Self::Double,
        Self::Decimal,
        Self::IntPtr,
        Self::UIntPtr,
    ];
}

// =============================================================================
// Declarations
// =============================================================================

/// Variance annotation of a type parameter.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Variance {
    #[default]
    None,
    In,
    Out,
}

impl Variance {
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::None => "",
            Self::In => "in ",
            Self::Out => "out ",
        }
    }
}

bitflags! {
    /// Constraint kinds of a type parameter (the non-type constraints).
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ConstraintKinds: u8 {
        const REFERENCE = 1 << 0;
        const VALUE = 1 << 1;
        const UNMANAGED = 1 << 2;
        const NOT_NULL = 1 << 3;
        const CONSTRUCTOR = 1 << 4;
        /// `class?` rather than `class`.
        const NULLABLE_REFERENCE = 1 << 5;
    }
}

/// Declaration that owns a type parameter.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeParamOwner {
    Type(DefId),
    Method(MethodId),
}

#[derive(Clone, Debug)]
pub struct TypeParamDef {
    pub name: String,
    pub owner: TypeParamOwner,
    /// Position within the owner's type parameter list.
    pub ordinal: u16,
    pub variance: Variance,
    pub constraints: ConstraintKinds,
    pub constraint_types: Vec<TypeId>,
    pub attributes: Vec<Attribute>,
    pub location: Option<SourceLocation>,
}

/// Declared accessibility of a member.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Accessibility {
    #[default]
    Private,
    ProtectedAndInternal,
    Protected,
    Internal,
    ProtectedOrInternal,
    Public,
}

impl Accessibility {
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::ProtectedAndInternal => "private protected",
            Self::Protected => "protected",
            Self::Internal => "internal",
            Self::ProtectedOrInternal => "protected internal",
            Self::Public => "public",
        }
    }

    #[must_use]
    pub fn from_keyword(text: &str) -> Option<Self> {
        let normalized: Vec<&str> = text.split_whitespace().collect();
        Some(match normalized.as_slice() {
            ["private"] => Self::Private,
            ["private", "protected"] | ["protected", "private"] => Self::ProtectedAndInternal,
            ["protected"] => Self::Protected,
            ["internal"] => Self::Internal,
            ["protected", "internal"] | ["internal", "protected"] => Self::ProtectedOrInternal,
            ["public"] => Self::Public,
            _ => return None,
        })
    }
}

/// How a parameter is passed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum RefKind {
    #[default]
    None,
    Ref,
    Out,
    In,
}

impl RefKind {
    /// Modifier text including the trailing space, empty for by-value.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Ref => "ref ",
            Self::Out => "out ",
            Self::In => "in ",
        }
    }
}

bitflags! {
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct MethodFlags: u16 {
        const STATIC = 1 << 0;
        const ASYNC = 1 << 1;
        const READONLY = 1 << 2;
        const EXTENSION = 1 << 3;
        const RETURNS_BY_REF = 1 << 4;
        const EXPLICIT_INTERFACE_IMPL = 1 << 5;
        /// A partial method declaration without a body.
        const PARTIAL_DEFINITION = 1 << 6;
    }
}

/// Compile-time constant: parameter defaults and attribute arguments.
#[derive(Clone, Debug, PartialEq)]
pub enum ConstantValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Char(char),
    String(String),
}

/// Attribute argument as the host compiler bound it.
#[derive(Clone, Debug, PartialEq)]
pub enum TypedConstant {
    /// `typeof(X)`
    Type(TypeId),
    Value(ConstantValue),
    /// An argument the host could not bind.
    Error,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Attribute {
    /// Metadata name of the attribute class.
    pub class_name: String,
    pub args: Vec<TypedConstant>,
    pub named: Vec<(String, TypedConstant)>,
}

impl Attribute {
    #[must_use]
    pub fn named_arg(&self, name: &str) -> Option<&TypedConstant> {
        self.named.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }
}

#[derive(Clone, Debug)]
pub struct ParamDef {
    pub name: String,
    pub ty: TypeId,
    pub ref_kind: RefKind,
    /// Explicit default value; `Some(ConstantValue::Null)` for `= null`/`= default`.
    pub default: Option<ConstantValue>,
    pub is_params: bool,
    pub location: Option<SourceLocation>,
}

#[derive(Clone, Debug)]
pub struct MethodDef {
    pub name: String,
    pub containing: DefId,
    pub type_params: Vec<TypeParamId>,
    pub params: Vec<ParamDef>,
    /// `TypeId::VOID` for methods without a value.
    pub return_type: TypeId,
    pub flags: MethodFlags,
    pub accessibility: Accessibility,
    pub attributes: Vec<Attribute>,
    pub location: Option<SourceLocation>,
}

impl MethodDef {
    #[must_use]
    pub const fn is_static(&self) -> bool {
        self.flags.contains(MethodFlags::STATIC)
    }

    #[must_use]
    pub const fn is_async(&self) -> bool {
        self.flags.contains(MethodFlags::ASYNC)
    }

    #[must_use]
    pub const fn is_readonly(&self) -> bool {
        self.flags.contains(MethodFlags::READONLY)
    }

    #[must_use]
    pub const fn is_extension(&self) -> bool {
        self.flags.contains(MethodFlags::EXTENSION)
    }

    #[must_use]
    pub const fn is_partial_definition(&self) -> bool {
        self.flags.contains(MethodFlags::PARTIAL_DEFINITION)
    }

    #[must_use]
    pub fn returns_void(&self) -> bool {
        self.return_type == TypeId::VOID
    }

    #[must_use]
    pub fn arity(&self) -> usize {
        self.type_params.len()
    }
}

#[derive(Clone, Debug)]
pub struct TypeDef {
    pub name: String,
    /// `None` for the global namespace.
    pub namespace: Option<String>,
    pub containing: Option<DefId>,
    pub kind: DefKind,
    pub type_params: Vec<TypeParamId>,
    /// Base type in terms of this definition's own type parameters.
    pub base: Option<TypeId>,
    /// Directly implemented interfaces, in declaration order.
    pub interfaces: Vec<TypeId>,
    pub is_partial: bool,
    pub is_static: bool,
    pub special: Option<SpecialType>,
    pub methods: Vec<MethodId>,
    /// Names of non-method members (fields, properties, events, enum members).
    pub member_names: Vec<String>,
    pub nested: Vec<DefId>,
    pub location: Option<SourceLocation>,
}

impl TypeDef {
    #[must_use]
    pub fn arity(&self) -> usize {
        self.type_params.len()
    }
}
