//! Memoized construction of [`MethodTable`] instances.
//!
//! Every table is resolved at most once per cache: a resolved table is stored
//! under its type's token and handed out as a shared [`MethodTableRc`] on
//! every later request. Base types and implemented interfaces resolve through
//! the same cache, so deep hierarchies collapse into one table per type no
//! matter how many descendants reference them.
//!
//! Resolution carries a visiting stack to reject inheritance cycles and a
//! depth cap as a backstop for degenerate chains. Failed resolutions are not
//! cached and re-run on the next request.

use std::sync::Arc;

use dashmap::DashMap;
use rayon::prelude::*;

use crate::{
    dispatch::table::{MethodTable, MethodTableRc},
    metadata::{Token, TypeRegistry},
    Error::{InheritanceCycle, RecursionLimit, TypeNotFound},
    Result,
};

/// Upper bound on nested resolution depth (inheritance chain plus interface
/// and override-target recursion) for a single cold request
const MAX_RESOLVE_DEPTH: usize = 256;

/// Shared, thread-safe cache of resolved method tables.
///
/// The cache borrows its type universe from a [`TypeRegistry`] and lazily
/// resolves dispatch tables on demand. Concurrent requests for the same type
/// may race; the first completed table wins and all callers observe the same
/// shared instance afterwards.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use dotslot::metadata::{Token, TypeRegistry};
/// use dotslot::dispatch::MethodTableCache;
///
/// # fn main() -> dotslot::Result<()> {
/// let registry = Arc::new(TypeRegistry::new());
/// // ... register types ...
/// let cache = MethodTableCache::new(registry);
/// let table = cache.resolve(Token::type_def(1))?;
/// for (key, slot) in table.slots() {
///     println!("{} -> {:?}", key, slot.implemented());
/// }
/// # Ok(())
/// # }
/// ```
pub struct MethodTableCache {
    /// The type universe tables are resolved against
    registry: Arc<TypeRegistry>,
    /// Resolved tables by type token
    tables: DashMap<Token, MethodTableRc>,
}

impl MethodTableCache {
    /// Creates an empty cache over a registry
    #[must_use]
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        MethodTableCache {
            registry,
            tables: DashMap::new(),
        }
    }

    /// The registry this cache resolves against
    #[must_use]
    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    /// Resolves the method table of the type identified by `token`,
    /// computing it on first request and returning the memoized table on
    /// every later one.
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeNotFound`] for an unregistered token,
    /// [`crate::Error::InheritanceCycle`] or
    /// [`crate::Error::RecursionLimit`] for degenerate hierarchies, and any
    /// resolution error raised while building the table.
    pub fn resolve(&self, token: Token) -> Result<MethodTableRc> {
        self.resolve_nested(token, &mut Vec::new())
    }

    /// Resolution entry point shared with in-flight tables resolving their
    /// base, interfaces and override targets. `visiting` holds the tokens of
    /// all tables currently under construction on this call path.
    pub(crate) fn resolve_nested(
        &self,
        token: Token,
        visiting: &mut Vec<Token>,
    ) -> Result<MethodTableRc> {
        if let Some(table) = self.tables.get(&token) {
            return Ok(table.value().clone());
        }

        if visiting.contains(&token) {
            return Err(InheritanceCycle(token));
        }
        if visiting.len() >= MAX_RESOLVE_DEPTH {
            return Err(RecursionLimit(MAX_RESOLVE_DEPTH));
        }

        let ty = self.registry.get(&token).ok_or(TypeNotFound(token))?;

        visiting.push(token);
        let mut table = MethodTable::new(ty);
        let outcome = table.resolve_table(self, visiting);
        visiting.pop();
        outcome?;

        // First writer wins when two threads race on the same type
        let cached = self.tables.entry(token).or_insert(Arc::new(table));
        Ok(cached.value().clone())
    }

    /// Returns the already-resolved table for `token` without resolving
    #[must_use]
    pub fn get(&self, token: &Token) -> Option<MethodTableRc> {
        self.tables.get(token).map(|table| table.value().clone())
    }

    /// Resolves every registered type, fanning the work out across the rayon
    /// thread pool. Shared bases and interfaces are resolved once and reused.
    ///
    /// # Errors
    /// Returns the error of the first type whose resolution fails.
    pub fn resolve_all(&self) -> Result<()> {
        self.registry
            .tokens()
            .par_iter()
            .try_for_each(|token| -> Result<()> {
                self.resolve(*token)?;
                Ok(())
            })
    }

    /// Number of resolved tables currently held
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns `true` if no table has been resolved yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{create_class, create_registry};

    #[test]
    fn test_resolve_unknown_type() {
        let cache = MethodTableCache::new(Arc::new(TypeRegistry::new()));
        assert!(matches!(
            cache.resolve(Token::type_def(1)),
            Err(TypeNotFound(token)) if token == Token::type_def(1)
        ));
    }

    #[test]
    fn test_resolve_memoizes_tables() {
        let registry = create_registry(&[create_class(1, "Alpha", None, &[])]);

        let cache = MethodTableCache::new(registry);
        assert!(cache.is_empty());
        assert!(cache.get(&Token::type_def(1)).is_none());

        let first = cache.resolve(Token::type_def(1)).unwrap();
        let second = cache.resolve(Token::type_def(1)).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
        assert!(cache.get(&Token::type_def(1)).is_some());
    }

    #[test]
    fn test_base_resolution_fills_cache() {
        let registry = create_registry(&[
            create_class(1, "Root", None, &[]),
            create_class(2, "Leaf", Some(Token::type_def(1)), &[]),
        ]);

        let cache = MethodTableCache::new(registry);
        cache.resolve(Token::type_def(2)).unwrap();
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_mutual_inheritance_cycle() {
        let registry = create_registry(&[
            create_class(1, "Ping", Some(Token::type_def(2)), &[]),
            create_class(2, "Pong", Some(Token::type_def(1)), &[]),
        ]);

        let cache = MethodTableCache::new(registry);
        assert!(matches!(
            cache.resolve(Token::type_def(1)),
            Err(InheritanceCycle(token)) if token == Token::type_def(1)
        ));
        // Failures are not memoized and report again on retry
        assert!(cache.resolve(Token::type_def(1)).is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_self_inheritance_cycle() {
        let registry = create_registry(&[create_class(1, "Ouroboros", Some(Token::type_def(1)), &[])]);

        let cache = MethodTableCache::new(registry);
        assert!(matches!(
            cache.resolve(Token::type_def(1)),
            Err(InheritanceCycle(token)) if token == Token::type_def(1)
        ));
    }

    fn chain_registry(length: u32) -> Arc<TypeRegistry> {
        let mut types = vec![create_class(1, "Gen1", None, &[])];
        for row in 2..=length {
            types.push(create_class(
                row,
                &format!("Gen{}", row),
                Some(Token::type_def(row - 1)),
                &[],
            ));
        }
        create_registry(&types)
    }

    #[test]
    fn test_cold_chain_beyond_depth_limit() {
        let cache = MethodTableCache::new(chain_registry(300));
        assert!(matches!(
            cache.resolve(Token::type_def(300)),
            Err(RecursionLimit(MAX_RESOLVE_DEPTH))
        ));
    }

    #[test]
    fn test_warm_chain_beyond_depth_limit() {
        // Resolving base-first keeps each request shallow; the cap only
        // bounds a single cold descent.
        let cache = MethodTableCache::new(chain_registry(300));
        for row in 1..=300 {
            cache.resolve(Token::type_def(row)).unwrap();
        }
        assert_eq!(cache.len(), 300);
    }

    #[test]
    fn test_resolve_all() {
        let mut types = vec![create_class(1, "Root", None, &[])];
        for row in 2..=32 {
            types.push(create_class(
                row,
                &format!("Leaf{}", row),
                Some(Token::type_def(1)),
                &[],
            ));
        }

        let cache = MethodTableCache::new(create_registry(&types));
        cache.resolve_all().unwrap();
        assert_eq!(cache.len(), 32);
    }
}
