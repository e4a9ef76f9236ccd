use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;

use crate::{
    metadata::{
        signatures::{MethodSignature, PrimitiveKind, TypeSig},
        token::Token,
        typedef::TypeDef,
    },
    Error, Result,
};

/// Mask for the vtable layout bit inside raw method attributes
pub const METHOD_VTABLE_LAYOUT_MASK: u32 = 0x0100;
/// Mask for the access bits inside raw method attributes
pub const METHOD_ACCESS_MASK: u32 = 0x0007;

bitflags! {
    #[derive(Debug, PartialEq)]
    /// Method vtable layout flags
    pub struct MethodVtableFlags: u32 {
        /// Method reuses an existing slot in the vtable
        const REUSE_SLOT = 0x0000;
        /// Method always gets a new slot in the vtable
        const NEW_SLOT = 0x0100;
    }
}

impl MethodVtableFlags {
    /// Extract vtable layout flags from raw method attributes
    #[must_use]
    pub fn from_method_flags(flags: u32) -> Self {
        let vtable = flags & METHOD_VTABLE_LAYOUT_MASK;
        Self::from_bits_truncate(vtable)
    }
}

bitflags! {
    #[derive(PartialEq)]
    /// Method modifiers and properties
    pub struct MethodModifiers: u32 {
        /// Defined on type, else per instance
        const STATIC = 0x0010;
        /// Method cannot be overridden
        const FINAL = 0x0020;
        /// Method is virtual
        const VIRTUAL = 0x0040;
        /// Method hides by name+sig, else just by name
        const HIDE_BY_SIG = 0x0080;
        /// Method can only be overridden if also accessible
        const STRICT = 0x0200;
        /// Method does not provide an implementation
        const ABSTRACT = 0x0400;
        /// Method is special
        const SPECIAL_NAME = 0x0800;
        /// CLI provides 'special' behavior, depending upon the name of the method
        const RTSPECIAL_NAME = 0x1000;
    }
}

impl MethodModifiers {
    /// Extract method modifiers from raw method attributes
    #[must_use]
    pub fn from_method_flags(flags: u32) -> Self {
        let modifiers = flags & !METHOD_ACCESS_MASK & !METHOD_VTABLE_LAYOUT_MASK;
        Self::from_bits_truncate(modifiers)
    }
}

/// One explicit override declaration (a `MethodImpl` row) carried by a method.
///
/// Where an implicit override matches by signature key, an explicit override
/// names its target outright: the `declaration` method of `declaration_type`
/// is implemented by `body`. The body always is the method carrying the
/// declaration; it is kept here so the record mirrors the full metadata row.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct MethodOverride {
    /// Token of the type stated to declare the overridden method
    pub declaration_type: Token,
    /// Token of the overridden method declaration
    pub declaration: Token,
    /// Token of the implementing method body
    pub body: Token,
}

/// A method definition participating in dispatch resolution.
///
/// Carries exactly the slice of a `MethodDef` row that slot building reads:
/// identity, name, raw ECMA-335 attributes, the normalized signature and any
/// explicit override declarations. Instances are immutable once built —
/// resolution never writes back into the metadata (the vtable layout bit in
/// particular keeps its declared value even when a reuse-slot method ends up
/// creating a fresh slot).
pub struct MethodDef {
    /// Token of this method (`MethodDef` table)
    pub token: Token,
    /// Simple method name
    pub name: String,
    /// Raw method attributes (a 4-byte bitmask, ECMA-335 §II.23.1.10)
    pub flags: u32,
    /// Normalized method signature
    pub signature: MethodSignature,
    /// Explicit override declarations carried by this method, in metadata order
    pub overrides: Vec<MethodOverride>,
}

/// Reference to a `MethodDef`
pub type MethodDefRc = Arc<MethodDef>;

impl MethodDef {
    /// True if the virtual bit is set
    #[must_use]
    pub fn is_virtual(&self) -> bool {
        MethodModifiers::from_method_flags(self.flags).contains(MethodModifiers::VIRTUAL)
    }

    /// True if the abstract bit is set
    #[must_use]
    pub fn is_abstract(&self) -> bool {
        MethodModifiers::from_method_flags(self.flags).contains(MethodModifiers::ABSTRACT)
    }

    /// True if the static bit is set
    #[must_use]
    pub fn is_static(&self) -> bool {
        MethodModifiers::from_method_flags(self.flags).contains(MethodModifiers::STATIC)
    }

    /// True if the method demands a fresh vtable slot rather than reusing one
    #[must_use]
    pub fn is_new_slot(&self) -> bool {
        MethodVtableFlags::from_method_flags(self.flags) == MethodVtableFlags::NEW_SLOT
    }

    /// True if this method carries explicit override declarations
    #[must_use]
    pub fn has_overrides(&self) -> bool {
        !self.overrides.is_empty()
    }

    /// The signature key this method contends for a slot under
    #[must_use]
    pub fn name_key(&self) -> String {
        self.signature.key_for(&self.name)
    }

    /// Full display name on the given declaring type, for diagnostics:
    /// `"<return> <type>::<name>(<params>)"`
    #[must_use]
    pub fn full_name(&self, declaring: &TypeDef) -> String {
        use std::fmt::Write;

        let mut name = String::with_capacity(64);
        let _ = write!(
            name,
            "{} {}::{}(",
            self.signature.return_type,
            declaring.fullname(),
            self.name
        );
        for (index, param) in self.signature.params.iter().enumerate() {
            if index > 0 {
                name.push(',');
            }
            let _ = write!(name, "{}", param);
        }
        name.push(')');
        name
    }
}

impl fmt::Debug for MethodDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MethodDef({}, {})", self.token, self.name_key())
    }
}

/// Builder for method definitions.
///
/// `MethodDefBuilder` provides a fluent API for assembling a [`MethodDef`]
/// with validation. The built method is immutable and shared as a
/// [`MethodDefRc`].
///
/// # Examples
///
/// ```rust
/// use dotslot::metadata::{MethodDefBuilder, MethodModifiers, Token};
///
/// let method = MethodDefBuilder::new()
///     .token(Token::method_def(1))
///     .name("Run")
///     .flags(MethodModifiers::VIRTUAL.bits())
///     .build()?;
/// assert!(method.is_virtual());
/// assert_eq!(method.name_key(), "System.Void Run()");
/// # Ok::<(), dotslot::Error>(())
/// ```
pub struct MethodDefBuilder {
    token: Option<Token>,
    name: Option<String>,
    flags: u32,
    return_type: Option<TypeSig>,
    params: Vec<TypeSig>,
    overrides: Vec<(Token, Token)>,
}

impl MethodDefBuilder {
    /// Creates a new `MethodDefBuilder`
    #[must_use]
    pub fn new() -> Self {
        Self {
            token: None,
            name: None,
            flags: 0,
            return_type: None,
            params: Vec::new(),
            overrides: Vec::new(),
        }
    }

    /// Sets the method token (`MethodDef` table, `0x06`)
    #[must_use]
    pub fn token(mut self, token: impl Into<Token>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Sets the method name
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the method flags (attributes).
    ///
    /// The bits dispatch resolution reads:
    /// - `0x0040`: Virtual
    /// - `0x0100`: NewSlot (absent means ReuseSlot)
    /// - `0x0400`: Abstract
    /// - `0x0010`: Static
    #[must_use]
    pub fn flags(mut self, flags: u32) -> Self {
        self.flags = flags;
        self
    }

    /// Sets the return type (defaults to `System.Void`)
    #[must_use]
    pub fn returns(mut self, return_type: TypeSig) -> Self {
        self.return_type = Some(return_type);
        self
    }

    /// Appends one parameter type
    #[must_use]
    pub fn param(mut self, param: TypeSig) -> Self {
        self.params.push(param);
        self
    }

    /// Adds an explicit override declaration targeting `declaration` of
    /// `declaration_type`. The built method itself is the override body.
    #[must_use]
    pub fn overrides(mut self, declaration_type: Token, declaration: Token) -> Self {
        self.overrides.push((declaration_type, declaration));
        self
    }

    /// Builds the method definition.
    ///
    /// # Errors
    ///
    /// - Returns error if the token is not set, not of the `MethodDef` table,
    ///   or has a zero row
    /// - Returns error if the name is not set or empty
    /// - Returns error if an override declaration carries a null token
    pub fn build(self) -> Result<MethodDefRc> {
        let token = self
            .token
            .ok_or_else(|| Error::Metadata("Method token is required".to_string()))?;
        if !token.is_method_def() {
            return Err(Error::Metadata(format!(
                "Method token must be a non-null MethodDef token - {}",
                token
            )));
        }

        let name = self
            .name
            .ok_or_else(|| Error::Metadata("Method name is required".to_string()))?;
        if name.is_empty() {
            return Err(Error::Metadata("Method name must not be empty".to_string()));
        }

        let mut overrides = Vec::with_capacity(self.overrides.len());
        for (declaration_type, declaration) in self.overrides {
            if declaration_type.is_null() || declaration.is_null() {
                return Err(Error::Metadata(format!(
                    "Override declaration of {} carries a null token",
                    name
                )));
            }
            overrides.push(MethodOverride {
                declaration_type,
                declaration,
                body: token,
            });
        }

        Ok(Arc::new(MethodDef {
            token,
            name,
            flags: self.flags,
            signature: MethodSignature {
                return_type: self
                    .return_type
                    .unwrap_or(TypeSig::Primitive(PrimitiveKind::Void)),
                params: self.params,
            },
            overrides,
        }))
    }
}

impl Default for MethodDefBuilder {
    fn default() -> Self {
        Self::new()
    }
}
