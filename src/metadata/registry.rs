//! Central registry of the type universe under resolution.
//!
//! The [`TypeRegistry`] is the boundary between the caller's metadata loader
//! and dispatch resolution: every type the program consists of is registered
//! once, then the [`MethodTableCache`](crate::dispatch::MethodTableCache)
//! looks types up by token while walking base and interface links.
//!
//! # Registry Architecture
//!
//! Two indices over one immutable data set:
//!
//! - **Token-based lookup**: primary index, lock-free `SkipMap`
//! - **Name-based lookup**: secondary full-name index, concurrent `DashMap`
//!
//! Both are safe to read while other threads insert, so registration can be
//! parallelized by the caller and resolution can start on a partially loaded
//! universe as long as dependencies are present before they are reached.

use crossbeam_skiplist::SkipMap;
use dashmap::DashMap;

use crate::{
    metadata::{token::Token, typedef::TypeDefRc},
    Error::TypeInsert,
    Result,
};

/// Thread-safe registry of all type definitions known to a resolution run.
///
/// Insertion rejects duplicate tokens and duplicate full names outright —
/// a universe with ambiguous identities would make the dispatch maps
/// ambiguous too, and every downstream consumer relies on tokens naming
/// exactly one type.
///
/// # Examples
///
/// ```rust
/// use dotslot::metadata::{Token, TypeDefBuilder, TypeRegistry};
///
/// let registry = TypeRegistry::new();
/// let worker = TypeDefBuilder::new()
///     .token(Token::type_def(1))
///     .namespace("My.Ns")
///     .name("Worker")
///     .build()?;
/// registry.insert(&worker)?;
///
/// assert!(registry.get(&Token::type_def(1)).is_some());
/// assert!(registry.get_by_fullname("My.Ns.Worker").is_some());
/// # Ok::<(), dotslot::Error>(())
/// ```
pub struct TypeRegistry {
    /// Primary storage, indexed by token
    types: SkipMap<Token, TypeDefRc>,
    /// Secondary index from full name to token
    types_by_fullname: DashMap<String, Token>,
}

impl TypeRegistry {
    /// Creates an empty registry
    #[must_use]
    pub fn new() -> Self {
        TypeRegistry {
            types: SkipMap::new(),
            types_by_fullname: DashMap::new(),
        }
    }

    /// Registers a type definition.
    ///
    /// # Errors
    /// Returns [`TypeInsert`] if a type with the same token or the same full
    /// name is already registered.
    pub fn insert(&self, ty: &TypeDefRc) -> Result<()> {
        if self.types.contains_key(&ty.token) {
            return Err(TypeInsert(ty.token));
        }

        let fullname = ty.fullname();
        if self.types_by_fullname.contains_key(&fullname) {
            return Err(TypeInsert(ty.token));
        }

        self.types_by_fullname.insert(fullname, ty.token);
        self.types.insert(ty.token, ty.clone());
        Ok(())
    }

    /// Looks up a type by token
    #[must_use]
    pub fn get(&self, token: &Token) -> Option<TypeDefRc> {
        self.types.get(token).map(|entry| entry.value().clone())
    }

    /// Looks up a type by its full name (`namespace.name`)
    #[must_use]
    pub fn get_by_fullname(&self, fullname: &str) -> Option<TypeDefRc> {
        self.types_by_fullname
            .get(fullname)
            .and_then(|token| self.get(token.value()))
    }

    /// All registered tokens, in token order
    #[must_use]
    pub fn tokens(&self) -> Vec<Token> {
        self.types.iter().map(|entry| *entry.key()).collect()
    }

    /// Number of registered types
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// True if no types are registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Returns an iterator over all registered types in token order
    pub fn iter(&self) -> crossbeam_skiplist::map::Iter<'_, Token, TypeDefRc> {
        self.types.iter()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::typedef::TypeDefBuilder;

    fn simple_type(row: u32, namespace: &str, name: &str) -> TypeDefRc {
        TypeDefBuilder::new()
            .token(Token::type_def(row))
            .namespace(namespace)
            .name(name)
            .build()
            .unwrap()
    }

    #[test]
    fn test_insert_and_get() {
        let registry = TypeRegistry::new();
        let ty = simple_type(1, "My.Ns", "Worker");
        registry.insert(&ty).unwrap();

        let found = registry.get(&Token::type_def(1)).unwrap();
        assert_eq!(found.name, "Worker");
        assert_eq!(registry.len(), 1);
        assert!(!registry.is_empty());
    }

    #[test]
    fn test_get_by_fullname() {
        let registry = TypeRegistry::new();
        registry.insert(&simple_type(1, "My.Ns", "Worker")).unwrap();
        registry.insert(&simple_type(2, "", "Global")).unwrap();

        assert_eq!(
            registry.get_by_fullname("My.Ns.Worker").unwrap().token,
            Token::type_def(1)
        );
        assert_eq!(
            registry.get_by_fullname("Global").unwrap().token,
            Token::type_def(2)
        );
        assert!(registry.get_by_fullname("My.Ns.Missing").is_none());
    }

    #[test]
    fn test_duplicate_token_rejected() {
        let registry = TypeRegistry::new();
        registry.insert(&simple_type(1, "A", "First")).unwrap();

        let result = registry.insert(&simple_type(1, "B", "Second"));
        assert!(matches!(result, Err(TypeInsert(token)) if token == Token::type_def(1)));
        // The original registration stays intact
        assert_eq!(registry.get(&Token::type_def(1)).unwrap().name, "First");
    }

    #[test]
    fn test_duplicate_fullname_rejected() {
        let registry = TypeRegistry::new();
        registry.insert(&simple_type(1, "My.Ns", "Worker")).unwrap();

        let result = registry.insert(&simple_type(2, "My.Ns", "Worker"));
        assert!(matches!(result, Err(TypeInsert(token)) if token == Token::type_def(2)));
        assert!(registry.get(&Token::type_def(2)).is_none());
    }

    #[test]
    fn test_tokens_in_order() {
        let registry = TypeRegistry::new();
        registry.insert(&simple_type(3, "", "C")).unwrap();
        registry.insert(&simple_type(1, "", "A")).unwrap();
        registry.insert(&simple_type(2, "", "B")).unwrap();

        assert_eq!(
            registry.tokens(),
            vec![
                Token::type_def(1),
                Token::type_def(2),
                Token::type_def(3)
            ]
        );
    }

    #[test]
    fn test_iter() {
        let registry = TypeRegistry::new();
        registry.insert(&simple_type(1, "", "A")).unwrap();
        registry.insert(&simple_type(2, "", "B")).unwrap();

        let names: Vec<_> = registry
            .iter()
            .map(|entry| entry.value().name.clone())
            .collect();
        assert_eq!(names, ["A", "B"]);
    }
}
