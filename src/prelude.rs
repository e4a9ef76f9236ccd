//! # dotslot Prelude
//!
//! This module provides a convenient prelude for the most commonly used types
//! from the dotslot library. Import this module to get quick access to the
//! essential types for building a metadata universe and resolving dispatch.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all dotslot operations
pub use crate::Error;

/// The result type used throughout dotslot
pub use crate::Result;

// ================================================================================================
// Metadata System - Core Types
// ================================================================================================

/// Metadata token type for referencing definitions
pub use crate::metadata::token::Token;

/// Token table tags for type and method definitions
pub use crate::metadata::token::{TABLE_METHOD_DEF, TABLE_TYPE_DEF};

/// Normalized type and method signatures
pub use crate::metadata::signatures::{MethodSignature, PrimitiveKind, TypeSig};

// ================================================================================================
// Definitions and Registry
// ================================================================================================

/// Method definitions, their builders and attribute flags
pub use crate::metadata::method::{
    MethodDef, MethodDefBuilder, MethodDefRc, MethodModifiers, MethodOverride, MethodVtableFlags,
};

/// Type definitions, their builders and attribute flags
pub use crate::metadata::typedef::{TypeAttributes, TypeDef, TypeDefBuilder, TypeDefRc};

/// The concurrent type universe all resolution runs against
pub use crate::metadata::registry::TypeRegistry;

// ================================================================================================
// Dispatch Resolution
// ================================================================================================

/// Memoized entry point for method table resolution
pub use crate::dispatch::MethodTableCache;

/// Resolved per-type dispatch tables
pub use crate::dispatch::{MethodTable, MethodTableRc};

/// Slots and the declaration entries they carry
pub use crate::dispatch::{DispatchEntry, VirtualSlot};
