use thiserror::Error;

use crate::metadata::token::Token;

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// This enum covers all failure modes of dispatch resolution, from malformed
/// metadata handed to the builders up to semantic violations detected while a
/// method table is being computed. Each variant carries enough context to
/// identify the offending type or method.
///
/// # Error Categories
///
/// ## Override Validation Errors
/// - [`Error::ExplicitOverrideNonVirtual`] - Override declaration on a non-virtual method
/// - [`Error::IllegalOverrideTarget`] - Override target does not resolve
/// - [`Error::DuplicateOverrideTarget`] - Override target claimed twice
/// - [`Error::UnimplementedSlot`] - Concrete type left a slot unimplemented
///
/// ## Hierarchy Errors
/// - [`Error::InheritanceCycle`] - Type reachable from its own hierarchy
/// - [`Error::RecursionLimit`] - Maximum resolution depth exceeded
///
/// ## Registry Errors
/// - [`Error::TypeInsert`] - Failed to register new type in the registry
/// - [`Error::TypeNotFound`] - Requested type not found in the registry
///
/// ## General Errors
/// - [`Error::Metadata`] - Invalid metadata handed to a builder
/// - [`Error::Resolution`] - Internal resolution failure
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use dotslot::dispatch::MethodTableCache;
/// use dotslot::metadata::{Token, TypeRegistry};
/// use dotslot::Error;
///
/// let cache = MethodTableCache::new(Arc::new(TypeRegistry::new()));
/// match cache.resolve(Token::type_def(1)) {
///     Ok(table) => println!("{} slots resolved", table.slots().len()),
///     Err(Error::TypeNotFound(token)) => eprintln!("unknown type: {}", token),
///     Err(e) => eprintln!("resolution failed: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    // Override validation Errors
    /// An explicit override declaration sits on a non-virtual method.
    ///
    /// Only virtual methods participate in dispatch, so an override
    /// declaration on anything else can never be honored. The associated
    /// value names the offending method.
    #[error("Explicit overridden method must be virtual: {0}")]
    ExplicitOverrideNonVirtual(String),

    /// An explicit override names a target that does not resolve.
    ///
    /// Raised when the declared target type is not registered, or when the
    /// declared method does not belong to that type. The associated value
    /// names the target as far as it could be resolved.
    #[error("Illegal explicit overriding target: {0}")]
    IllegalOverrideTarget(String),

    /// Two explicit overrides of one type claim the same target.
    ///
    /// Each overridden declaration may be redirected at most once per type;
    /// a second claim would make dispatch ambiguous. The associated value
    /// names the doubly-claimed target.
    #[error("Explicit overriding target has been overridden: {0}")]
    DuplicateOverrideTarget(String),

    /// A concrete type left a populated slot without implementation.
    ///
    /// Interface methods merged into a type's table must be backed by an
    /// implementation unless the type is abstract or an interface itself.
    #[error("There are interface or abstract methods not implemented in type {ty}: {entry}")]
    UnimplementedSlot {
        /// Full name of the type whose table failed validation
        ty: String,
        /// Full name of the first unimplemented entry found
        entry: String,
    },

    // Hierarchy Errors
    /// A type is reachable from its own inheritance or interface chain.
    ///
    /// The resolver tracks every type currently being resolved on the call
    /// path; re-entering one of them means the metadata declares a cycle.
    /// The associated [`Token`] identifies the re-entered type.
    #[error("Inheritance cycle detected while resolving type - {0}")]
    InheritanceCycle(Token),

    /// Recursion limit reached.
    ///
    /// To prevent stack overflow during recursive operations like table
    /// resolution, a maximum recursion depth is enforced. This error
    /// indicates that limit was exceeded.
    ///
    /// The associated value shows the recursion limit that was reached.
    #[error("Reach the maximum recursion level allowed - {0}")]
    RecursionLimit(usize),

    // Registry Errors
    /// Failed to insert new type into `TypeRegistry`.
    ///
    /// This error occurs when attempting to register a new type fails,
    /// due to a conflicting metadata token or full name.
    ///
    /// The associated [`Token`] identifies which type caused the failure.
    #[error("Failed to insert new type into TypeRegistry - {0}")]
    TypeInsert(Token),

    /// Failed to find type in `TypeRegistry`.
    ///
    /// This error occurs when looking up a type by token that doesn't
    /// exist in the registry, including base types and interface
    /// references encountered during resolution.
    ///
    /// The associated [`Token`] identifies which type was not found.
    #[error("Failed to find type in TypeRegistry - {0}")]
    TypeNotFound(Token),

    // General Errors
    /// Invalid metadata was handed to a builder.
    ///
    /// Raised by [`crate::metadata::MethodDefBuilder`] and
    /// [`crate::metadata::TypeDefBuilder`] when a definition is internally
    /// inconsistent, such as a token from the wrong metadata table.
    #[error("{0}")]
    Metadata(String),

    /// Internal resolution failure.
    ///
    /// Covers invariant violations detected while a table is being
    /// computed that do not fit a more specific category.
    #[error("{0}")]
    Resolution(String),
}
