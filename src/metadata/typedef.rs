use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;

use crate::{
    metadata::{method::MethodDefRc, token::Token},
    Error, Result,
};

bitflags! {
    #[derive(PartialEq)]
    /// Type attributes read by dispatch resolution
    pub struct TypeAttributes: u32 {
        /// Type is an interface, else a class
        const INTERFACE = 0x0020;
        /// Type cannot be instantiated
        const ABSTRACT = 0x0080;
        /// Type cannot be extended
        const SEALED = 0x0100;
    }
}

impl TypeAttributes {
    /// Extract the attribute bits this crate reads from raw type flags
    #[must_use]
    pub fn from_type_flags(flags: u32) -> Self {
        Self::from_bits_truncate(flags)
    }
}

/// A type definition participating in dispatch resolution.
///
/// Carries the slice of a `TypeDef` row that resolution reads: identity, raw
/// attributes, the base-type link, the directly implemented interfaces and
/// the owned methods in declaration order. Base and interface links are plain
/// tokens resolved through the [`TypeRegistry`](crate::metadata::TypeRegistry);
/// keeping the graph token-linked leaves all traversal, memoization and cycle
/// handling to the table cache.
pub struct TypeDef {
    /// Token of this type (`TypeDef` table)
    pub token: Token,
    /// Namespace (may be empty, e.g. for the `<Module>` type)
    pub namespace: String,
    /// Simple type name
    pub name: String,
    /// Raw type attributes (a 4-byte bitmask, ECMA-335 §II.23.1.15)
    pub flags: u32,
    /// Token of the base type, `None` for root types and interfaces
    pub base: Option<Token>,
    /// Tokens of the directly implemented interfaces, in metadata order
    pub interfaces: Vec<Token>,
    /// Owned methods in declaration order
    pub methods: Vec<MethodDefRc>,
}

/// Reference to a `TypeDef`
pub type TypeDefRc = Arc<TypeDef>;

impl TypeDef {
    /// True if the interface bit is set
    #[must_use]
    pub fn is_interface(&self) -> bool {
        TypeAttributes::from_type_flags(self.flags).contains(TypeAttributes::INTERFACE)
    }

    /// True if the abstract bit is set
    #[must_use]
    pub fn is_abstract(&self) -> bool {
        TypeAttributes::from_type_flags(self.flags).contains(TypeAttributes::ABSTRACT)
    }

    /// Full name of this type: `namespace.name`, or just the name when the
    /// namespace is empty
    #[must_use]
    pub fn fullname(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }

    /// Looks up an owned method by token
    #[must_use]
    pub fn method(&self, token: &Token) -> Option<&MethodDefRc> {
        self.methods.iter().find(|method| method.token == *token)
    }
}

impl fmt::Debug for TypeDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TypeDef({}, {}, {} methods)",
            self.token,
            self.fullname(),
            self.methods.len()
        )
    }
}

/// Builder for type definitions.
///
/// `TypeDefBuilder` provides a fluent API for assembling a [`TypeDef`] with
/// validation. The built type is immutable and shared as a [`TypeDefRc`].
///
/// # Examples
///
/// ```rust
/// use dotslot::metadata::{MethodDefBuilder, MethodModifiers, Token, TypeAttributes, TypeDefBuilder};
///
/// let run = MethodDefBuilder::new()
///     .token(Token::method_def(1))
///     .name("Run")
///     .flags(MethodModifiers::VIRTUAL.bits() | 0x0100) // virtual newslot
///     .build()?;
///
/// let worker = TypeDefBuilder::new()
///     .token(Token::type_def(1))
///     .namespace("My.Ns")
///     .name("Worker")
///     .method(run)
///     .build()?;
/// assert_eq!(worker.fullname(), "My.Ns.Worker");
/// assert!(!worker.is_interface());
/// # Ok::<(), dotslot::Error>(())
/// ```
pub struct TypeDefBuilder {
    token: Option<Token>,
    namespace: String,
    name: Option<String>,
    flags: u32,
    base: Option<Token>,
    interfaces: Vec<Token>,
    methods: Vec<MethodDefRc>,
}

impl TypeDefBuilder {
    /// Creates a new `TypeDefBuilder`
    #[must_use]
    pub fn new() -> Self {
        Self {
            token: None,
            namespace: String::new(),
            name: None,
            flags: 0,
            base: None,
            interfaces: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Sets the type token (`TypeDef` table, `0x02`)
    #[must_use]
    pub fn token(mut self, token: impl Into<Token>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Sets the namespace (empty by default)
    #[must_use]
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Sets the simple type name
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the type flags (attributes).
    ///
    /// The bits dispatch resolution reads:
    /// - `0x0020`: Interface
    /// - `0x0080`: Abstract
    #[must_use]
    pub fn flags(mut self, flags: u32) -> Self {
        self.flags = flags;
        self
    }

    /// Sets the base type token
    #[must_use]
    pub fn base(mut self, base: Token) -> Self {
        self.base = Some(base);
        self
    }

    /// Appends one directly implemented interface token
    #[must_use]
    pub fn implements(mut self, interface: Token) -> Self {
        self.interfaces.push(interface);
        self
    }

    /// Appends one method definition
    #[must_use]
    pub fn method(mut self, method: MethodDefRc) -> Self {
        self.methods.push(method);
        self
    }

    /// Builds the type definition.
    ///
    /// # Errors
    ///
    /// - Returns error if the token is not set, not of the `TypeDef` table,
    ///   or has a zero row
    /// - Returns error if the name is not set or empty
    /// - Returns error if the base or an interface token is not a `TypeDef` token
    /// - Returns error if two owned methods share a token
    pub fn build(self) -> Result<TypeDefRc> {
        let token = self
            .token
            .ok_or_else(|| Error::Metadata("Type token is required".to_string()))?;
        if !token.is_type_def() {
            return Err(Error::Metadata(format!(
                "Type token must be a non-null TypeDef token - {}",
                token
            )));
        }

        let name = self
            .name
            .ok_or_else(|| Error::Metadata("Type name is required".to_string()))?;
        if name.is_empty() {
            return Err(Error::Metadata("Type name must not be empty".to_string()));
        }

        if let Some(base) = self.base {
            if !base.is_type_def() {
                return Err(Error::Metadata(format!(
                    "Base token of {} must be a TypeDef token - {}",
                    name, base
                )));
            }
        }
        for interface in &self.interfaces {
            if !interface.is_type_def() {
                return Err(Error::Metadata(format!(
                    "Interface token of {} must be a TypeDef token - {}",
                    name, interface
                )));
            }
        }

        for (index, method) in self.methods.iter().enumerate() {
            if self.methods[..index]
                .iter()
                .any(|earlier| earlier.token == method.token)
            {
                return Err(Error::Metadata(format!(
                    "Type {} owns two methods with token {}",
                    name, method.token
                )));
            }
        }

        Ok(Arc::new(TypeDef {
            token,
            namespace: self.namespace,
            name,
            flags: self.flags,
            base: self.base,
            interfaces: self.interfaces,
            methods: self.methods,
        }))
    }
}

impl Default for TypeDefBuilder {
    fn default() -> Self {
        Self::new()
    }
}
