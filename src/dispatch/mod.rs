//! Virtual dispatch resolution.
//!
//! This module turns the inheritance and override metadata held in a
//! [`crate::metadata::TypeRegistry`] into per-type [`MethodTable`]s: for
//! every virtual method signature a type can be called through, the table
//! names the concrete declaration that receives the call.
//!
//! Resolution walks a type's base chain and directly implemented interfaces,
//! groups declarations by signature key into [`VirtualSlot`]s, applies
//! explicit override declarations, and flattens the result into an
//! entry-to-implementation map. The [`MethodTableCache`] memoizes the whole
//! process so shared bases resolve once per universe.
//!
//! ```rust
//! use std::sync::Arc;
//! use dotslot::dispatch::MethodTableCache;
//! use dotslot::metadata::{
//!     MethodDefBuilder, MethodModifiers, MethodVtableFlags, Token, TypeDefBuilder, TypeRegistry,
//! };
//!
//! # fn main() -> dotslot::Result<()> {
//! let registry = Arc::new(TypeRegistry::new());
//!
//! let speak = MethodDefBuilder::new()
//!     .token(Token::method_def(1))
//!     .name("Speak")
//!     .flags(MethodModifiers::VIRTUAL.bits() | MethodVtableFlags::NEW_SLOT.bits())
//!     .build()?;
//! let animal = TypeDefBuilder::new()
//!     .token(Token::type_def(1))
//!     .name("Animal")
//!     .method(speak)
//!     .build()?;
//! registry.insert(&animal)?;
//!
//! let cache = MethodTableCache::new(registry);
//! let table = cache.resolve(Token::type_def(1))?;
//! assert_eq!(table.slots().len(), 1);
//! # Ok(())
//! # }
//! ```

/// Memoized table construction
mod cache;
/// Dispatch entries, virtual slots and signature conflict buckets
mod slot;
/// Per-type table resolution
mod table;

pub use cache::MethodTableCache;
pub use slot::{DispatchEntry, VirtualSlot};
pub use table::{MethodTable, MethodTableRc};
