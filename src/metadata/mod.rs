//! The metadata model consumed by dispatch resolution.
//!
//! This module defines the in-memory slice of ECMA-335 metadata that virtual
//! dispatch resolution reads: tokens, type and method definitions with their
//! attribute bits, normalized signatures and explicit override declarations.
//! Callers populate it through the fluent builders and register everything in
//! a [`TypeRegistry`]; from there the
//! [`dispatch`](crate::dispatch) module takes over.
//!
//! # Key Components
//!
//! - [`Token`] - Metadata table row references ( `TypeDef` / `MethodDef` )
//! - [`TypeDef`] / [`TypeDefBuilder`] - Type definitions with base, interface
//!   and method links
//! - [`MethodDef`] / [`MethodDefBuilder`] - Method definitions with raw
//!   attribute bits and override declarations
//! - [`MethodSignature`] / [`TypeSig`] / [`PrimitiveKind`] - Normalized
//!   signatures and the signature-key rendering slot identity is based on
//! - [`TypeRegistry`] - Thread-safe token- and name-indexed type storage
//!
//! # Examples
//!
//! ```rust
//! use dotslot::metadata::{
//!     MethodDefBuilder, MethodModifiers, Token, TypeDefBuilder, TypeRegistry,
//! };
//!
//! let registry = TypeRegistry::new();
//!
//! let run = MethodDefBuilder::new()
//!     .token(Token::method_def(1))
//!     .name("Run")
//!     .flags(MethodModifiers::VIRTUAL.bits() | 0x0100) // virtual newslot
//!     .build()?;
//!
//! let worker = TypeDefBuilder::new()
//!     .token(Token::type_def(1))
//!     .namespace("My.Ns")
//!     .name("Worker")
//!     .method(run)
//!     .build()?;
//!
//! registry.insert(&worker)?;
//! assert_eq!(registry.len(), 1);
//! # Ok::<(), dotslot::Error>(())
//! ```

/// Implementation of method definitions and their attribute flags
pub mod method;
/// Implementation of the type registry
pub mod registry;
/// Implementation of normalized method and type signatures
pub mod signatures;
/// Commonly used metadata token type
pub mod token;
/// Implementation of type definitions and their attribute flags
pub mod typedef;

pub use method::{
    MethodDef, MethodDefBuilder, MethodDefRc, MethodModifiers, MethodOverride, MethodVtableFlags,
    METHOD_ACCESS_MASK, METHOD_VTABLE_LAYOUT_MASK,
};
pub use registry::TypeRegistry;
pub use signatures::{MethodSignature, PrimitiveKind, TypeSig};
pub use token::{Token, TABLE_METHOD_DEF, TABLE_TYPE_DEF};
pub use typedef::{TypeAttributes, TypeDef, TypeDefBuilder, TypeDefRc};
