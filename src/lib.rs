// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![allow(dead_code)]

//! # dotslot
//!
//! [![Crates.io](https://img.shields.io/crates/v/dotslot.svg)](https://crates.io/crates/dotslot)
//! [![Documentation](https://docs.rs/dotslot/badge.svg)](https://docs.rs/dotslot)
//! [![License](https://img.shields.io/badge/license-Apache--2.0-blue.svg)](https://github.com/BinFlip/dotslot/blob/main/LICENSE-APACHE)
//!
//! A high-performance, cross-platform library for resolving virtual method dispatch from
//! .NET metadata. Built in pure Rust, `dotslot` computes per-type method tables - the mapping
//! from every virtual method signature to the concrete implementation that receives the call -
//! the way an ahead-of-time compiler needs them, without requiring Windows or the .NET runtime.
//!
//! ## Features
//!
//! - **🗂️ Complete slot resolution** - Implicit reuse-slot/new-slot assignment following ECMA-335 semantics
//! - **🔁 Explicit override handling** - `.override` redirections onto class and interface targets
//! - **⚡ Memoized, parallel resolution** - Each type resolved once, shared bases reused across the hierarchy
//! - **🛡️ Memory safe** - Built in Rust with comprehensive error handling
//! - **📊 Deterministic tables** - Ordered slot and entry maps make resolution output reproducible
//! - **🧩 Extensible architecture** - Builder-based metadata model decoupled from any on-disk format
//!
//! ## Quick Start
//!
//! Add `dotslot` to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! dotslot = "0.1"
//! ```
//!
//! ### Using the Prelude
//!
//! For convenient access to the most commonly used types, import the prelude:
//!
//! ```rust
//! use dotslot::prelude::*;
//! use std::sync::Arc;
//!
//! let registry = Arc::new(TypeRegistry::new());
//! let run = MethodDefBuilder::new()
//!     .token(Token::method_def(1))
//!     .name("Run")
//!     .flags(MethodModifiers::VIRTUAL.bits() | MethodVtableFlags::NEW_SLOT.bits())
//!     .build()?;
//! let job = TypeDefBuilder::new()
//!     .token(Token::type_def(1))
//!     .name("Job")
//!     .method(run)
//!     .build()?;
//! registry.insert(&job)?;
//!
//! let cache = MethodTableCache::new(registry);
//! let table = cache.resolve(Token::type_def(1))?;
//! assert_eq!(table.slots().len(), 1);
//! # Ok::<(), dotslot::Error>(())
//! ```
//!
//! ### Basic Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use dotslot::dispatch::{DispatchEntry, MethodTableCache};
//! use dotslot::metadata::{
//!     MethodDefBuilder, MethodModifiers, MethodVtableFlags, Token, TypeDefBuilder, TypeRegistry,
//! };
//!
//! let registry = Arc::new(TypeRegistry::new());
//!
//! // class Animal { virtual void Speak() {} }
//! let speak = MethodDefBuilder::new()
//!     .token(Token::method_def(1))
//!     .name("Speak")
//!     .flags(MethodModifiers::VIRTUAL.bits() | MethodVtableFlags::NEW_SLOT.bits())
//!     .build()?;
//! let animal = TypeDefBuilder::new()
//!     .token(Token::type_def(1))
//!     .namespace("Zoo")
//!     .name("Animal")
//!     .method(speak.clone())
//!     .build()?;
//!
//! // class Dog : Animal { override void Speak() {} }
//! let bark = MethodDefBuilder::new()
//!     .token(Token::method_def(2))
//!     .name("Speak")
//!     .flags(MethodModifiers::VIRTUAL.bits())
//!     .build()?;
//! let dog = TypeDefBuilder::new()
//!     .token(Token::type_def(2))
//!     .namespace("Zoo")
//!     .name("Dog")
//!     .base(animal.token)
//!     .method(bark)
//!     .build()?;
//!
//! registry.insert(&animal)?;
//! registry.insert(&dog)?;
//!
//! let cache = MethodTableCache::new(registry);
//! let table = cache.resolve(dog.token)?;
//!
//! // Calls declared against Animal::Speak dispatch to Dog::Speak
//! let declared = DispatchEntry::new(animal, speak);
//! let winner = table.implementation(&declared).map(DispatchEntry::full_name);
//! assert_eq!(winner.as_deref(), Some("System.Void Zoo.Dog::Speak()"));
//! # Ok::<(), dotslot::Error>(())
//! ```
//!
//! ## Architecture
//!
//! `dotslot` is organized into several key modules:
//!
//! - [`prelude`] - Convenient re-exports of commonly used types
//! - [`metadata`] - Tokens, signatures, method and type definitions, and the type registry
//! - [`dispatch`] - Slot assignment, override resolution and the memoized table cache
//! - [`Error`] and [`Result`] - Comprehensive error handling
//!
//! ### Metadata Model
//!
//! Definitions enter the library through builders rather than a file parser: construct
//! [`metadata::MethodDef`] and [`metadata::TypeDef`] values with their ECMA-335 attribute
//! bits, link types by [`metadata::Token`], and register them in a
//! [`metadata::TypeRegistry`]. The registry is the closed universe all resolution runs
//! against.
//!
//! ### Dispatch Resolution
//!
//! The [`dispatch::MethodTableCache`] resolves one [`dispatch::MethodTable`] per type:
//! methods are grouped into [`dispatch::VirtualSlot`]s by normalized signature key,
//! base-table slots are extended or shadowed according to each method's vtable-layout
//! bit, directly implemented interfaces merge their obligations in, and explicit
//! override declarations re-seat or redirect individual targets. The flattened
//! entry-to-implementation map is what downstream code generation consumes.
//!
//! ## Standards Compliance
//!
//! Slot semantics follow the **ECMA-335 specification** (6th edition): the
//! `virtual`/`newslot` method attributes of partition II §15.4, the MethodImpl override
//! mechanism of partition II §22.27, and interface method resolution per partition II §12.2.
//!
//! ### References
//!
//! - [ECMA-335 Standard](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf) - Official CLI specification
//! - [.NET Runtime](https://github.com/dotnet/runtime) - Microsoft's reference implementation
//!
//! ## Performance
//!
//! `dotslot` is designed for whole-assembly resolution:
//!
//! - **Memoization** - Every type is resolved exactly once per cache, shared through `Arc`
//! - **Parallel processing** - [`dispatch::MethodTableCache::resolve_all`] fans out across rayon
//! - **Lock-free reads** - Registry and cache lookups use concurrent maps, no global lock
//! - **Deterministic output** - Ordered maps keep repeated runs byte-for-byte identical
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, Error>`](Result) with comprehensive error information:
//!
//! ```rust
//! use std::sync::Arc;
//! use dotslot::dispatch::MethodTableCache;
//! use dotslot::metadata::{Token, TypeRegistry};
//! use dotslot::Error;
//!
//! let cache = MethodTableCache::new(Arc::new(TypeRegistry::new()));
//! match cache.resolve(Token::type_def(1)) {
//!     Ok(table) => println!("{} slots resolved", table.slots().len()),
//!     Err(Error::TypeNotFound(token)) => println!("unknown type: {}", token),
//!     Err(e) => println!("resolution failed: {}", e),
//! }
//! ```
//!
//! ## Development and Testing
//!
//! The test suite covers single hierarchies, signature conflicts, explicit override
//! scenarios and concurrent resolution:
//!
//! ```bash
//! cargo test
//! cargo bench  # Resolution throughput benchmarks
//! ```
pub(crate) mod error;

/// Shared functionality which is used in unit- and integration-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types.
///
/// This module provides a curated selection of the most frequently used types
/// from across the dotslot library, allowing for convenient glob imports.
///
/// # Example
///
/// ```rust,no_run
/// use dotslot::prelude::*;
/// use std::sync::Arc;
///
/// let registry = Arc::new(TypeRegistry::new());
/// let cache = MethodTableCache::new(registry);
/// let table = cache.resolve(Token::type_def(1))?;
/// # Ok::<(), dotslot::Error>(())
/// ```
pub mod prelude;

/// Virtual dispatch resolution: slots, tables and the memoized cache.
///
/// This module computes per-type method tables from registered metadata. It includes:
///
/// - **Slot Assignment**: Group virtual methods into slots by normalized signature key
/// - **Inheritance**: Extend or shadow base-type slots per the vtable-layout bit
/// - **Interface Merge**: Fold directly implemented interfaces into the slot map
/// - **Explicit Overrides**: Re-seat interface targets and redirect class targets
///
/// # Key Types
///
/// - [`dispatch::MethodTableCache`] - Memoized entry point for all resolution
/// - [`dispatch::MethodTable`] - The resolved dispatch table of one type
/// - [`dispatch::VirtualSlot`] - One logical dispatch slot and its entries
/// - [`dispatch::DispatchEntry`] - A (type, method) declaration pair
pub mod dispatch;

/// Tokens, signatures, definitions and the type registry.
///
/// This module carries the metadata model resolution runs against:
///
/// - **Tokens**: Table-tagged identifiers linking definitions ([`metadata::Token`])
/// - **Signatures**: Normalized type and method signatures ([`metadata::MethodSignature`])
/// - **Definitions**: Flag-accurate method and type definitions with builders
/// - **Registry**: The concurrent, insert-only type universe ([`metadata::TypeRegistry`])
pub mod metadata;

/// Type alias for `Result<T, dotslot::Error>`
///
/// Standard result type used throughout the library for all fallible operations.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use dotslot::dispatch::MethodTableCache;
/// use dotslot::metadata::{Token, TypeRegistry};
///
/// fn resolve_universe(registry: Arc<TypeRegistry>) -> dotslot::Result<()> {
///     let cache = MethodTableCache::new(registry);
///     cache.resolve_all()?;
///     Ok(())
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The unified error type for all dispatch resolution operations.
///
/// # Example
///
/// ```rust,no_run
/// use dotslot::{Error, Result};
///
/// fn report(outcome: Result<()>) {
///     match outcome {
///         Ok(()) => println!("resolved"),
///         Err(Error::InheritanceCycle(token)) => println!("cycle at {}", token),
///         Err(e) => println!("error: {}", e),
///     }
/// }
/// ```
pub use error::Error;

/// Main entry points for dispatch resolution.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use dotslot::{MethodTableCache, TypeRegistry, Token};
///
/// let cache = MethodTableCache::new(Arc::new(TypeRegistry::new()));
/// let table = cache.resolve(Token::type_def(1))?;
/// println!("{} entries", table.entry_map().len());
/// # Ok::<(), dotslot::Error>(())
/// ```
pub use dispatch::{MethodTable, MethodTableCache, MethodTableRc};

/// Core metadata handles used on almost every API call.
pub use metadata::{Token, TypeRegistry};
