use std::fmt;

use strum::{EnumCount, EnumIter};

/// Built-in CLR element types that can appear in a normalized method signature.
///
/// Each variant displays as its canonical `System.*` full name, which is what
/// the signature keys and diagnostic names are built from. Generic parameters
/// do not appear here: inputs to dispatch resolution are assumed normalized
/// (generic instantiations already expanded by the caller).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, EnumIter, EnumCount)]
pub enum PrimitiveKind {
    /// `System.Void` (return type only)
    Void,
    /// `System.Boolean`
    Boolean,
    /// `System.Char`
    Char,
    /// `System.SByte`
    I1,
    /// `System.Byte`
    U1,
    /// `System.Int16`
    I2,
    /// `System.UInt16`
    U2,
    /// `System.Int32`
    I4,
    /// `System.UInt32`
    U4,
    /// `System.Int64`
    I8,
    /// `System.UInt64`
    U8,
    /// `System.Single`
    R4,
    /// `System.Double`
    R8,
    /// `System.IntPtr`
    I,
    /// `System.UIntPtr`
    U,
    /// `System.Object`
    Object,
    /// `System.String`
    String,
}

impl PrimitiveKind {
    /// The canonical `System.*` full name of this primitive
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveKind::Void => "System.Void",
            PrimitiveKind::Boolean => "System.Boolean",
            PrimitiveKind::Char => "System.Char",
            PrimitiveKind::I1 => "System.SByte",
            PrimitiveKind::U1 => "System.Byte",
            PrimitiveKind::I2 => "System.Int16",
            PrimitiveKind::U2 => "System.UInt16",
            PrimitiveKind::I4 => "System.Int32",
            PrimitiveKind::U4 => "System.UInt32",
            PrimitiveKind::I8 => "System.Int64",
            PrimitiveKind::U8 => "System.UInt64",
            PrimitiveKind::R4 => "System.Single",
            PrimitiveKind::R8 => "System.Double",
            PrimitiveKind::I => "System.IntPtr",
            PrimitiveKind::U => "System.UIntPtr",
            PrimitiveKind::Object => "System.Object",
            PrimitiveKind::String => "System.String",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One type position inside a method signature (return type or parameter).
///
/// Only the shapes that survive signature normalization are represented;
/// custom modifiers, pinned locals and generic variables are outside this
/// crate's input model. Display renders the CLR textual form used by the
/// signature keys (`System.Int32[]`, `My.Ns.Widget&`, ...).
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum TypeSig {
    /// A built-in element type
    Primitive(PrimitiveKind),
    /// A class or value type, by its full name (`Namespace.Name`)
    Named(String),
    /// Single-dimensional, zero-based array of the element type
    SzArray(Box<TypeSig>),
    /// Multi-dimensional array of the element type with the given rank
    Array {
        /// The element type
        element: Box<TypeSig>,
        /// Number of dimensions (>= 1)
        rank: u32,
    },
    /// Managed reference to the inner type (`ref`/`out` parameters)
    ByRef(Box<TypeSig>),
    /// Unmanaged pointer to the inner type
    Ptr(Box<TypeSig>),
}

impl TypeSig {
    /// Shorthand for a named class or value type
    #[must_use]
    pub fn named(fullname: &str) -> Self {
        TypeSig::Named(fullname.to_string())
    }
}

impl From<PrimitiveKind> for TypeSig {
    fn from(kind: PrimitiveKind) -> Self {
        TypeSig::Primitive(kind)
    }
}

impl fmt::Display for TypeSig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSig::Primitive(kind) => write!(f, "{}", kind),
            TypeSig::Named(fullname) => f.write_str(fullname),
            TypeSig::SzArray(element) => write!(f, "{}[]", element),
            TypeSig::Array { element, rank } => {
                write!(f, "{}[", element)?;
                for _ in 1..*rank {
                    f.write_str(",")?;
                }
                f.write_str("]")
            }
            TypeSig::ByRef(inner) => write!(f, "{}&", inner),
            TypeSig::Ptr(inner) => write!(f, "{}*", inner),
        }
    }
}

/// A normalized method signature: return type plus parameter types in order.
///
/// The calling-convention and generic-arity bytes of a raw metadata signature
/// carry no information for slot identity and are not modeled. Two virtual
/// methods contend for the same dispatch slot exactly when their name and
/// their `MethodSignature` render to the same key (see [`MethodSignature::key_for`]).
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct MethodSignature {
    /// The return type
    pub return_type: TypeSig,
    /// Parameter types in declaration order, excluding the implicit `this`
    pub params: Vec<TypeSig>,
}

impl MethodSignature {
    /// Creates a signature from a return type and parameter list
    #[must_use]
    pub fn new(return_type: TypeSig, params: Vec<TypeSig>) -> Self {
        MethodSignature {
            return_type,
            params,
        }
    }

    /// Renders the signature key for a method of this signature with the
    /// given simple name: `"<return> <name>(<param>,<param>,...)"`.
    ///
    /// The declaring type is deliberately absent so that same-signature
    /// methods of different types in one inheritance chain compare equal,
    /// which is what slot reuse is keyed on.
    #[must_use]
    pub fn key_for(&self, name: &str) -> String {
        use std::fmt::Write;

        let mut key = String::with_capacity(32 + name.len());
        let _ = write!(key, "{} {}(", self.return_type, name);
        for (index, param) in self.params.iter().enumerate() {
            if index > 0 {
                key.push(',');
            }
            let _ = write!(key, "{}", param);
        }
        key.push(')');
        key
    }
}

impl Default for MethodSignature {
    fn default() -> Self {
        MethodSignature {
            return_type: TypeSig::Primitive(PrimitiveKind::Void),
            params: Vec::new(),
        }
    }
}
