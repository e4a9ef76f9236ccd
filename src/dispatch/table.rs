use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use crate::{
    dispatch::{
        cache::MethodTableCache,
        slot::{DispatchEntry, SignatureConflict, VirtualSlot},
    },
    metadata::{MethodDefRc, MethodOverride, Token, TypeDefRc},
    Error, Result,
};

/// The resolved virtual dispatch table of one type.
///
/// A table is computed exactly once by the [`MethodTableCache`] and immutable
/// afterwards. It answers, for every virtual signature this type's resolution
/// touched, which concrete declaration wins dispatch:
///
/// - [`slots`](Self::slots): signature key → [`VirtualSlot`], the logical
///   dispatch slots with their contributing entries
/// - [`entry_map`](Self::entry_map): declaration entry → winning entry, the
///   flattened dispatch table downstream code generation reads
/// - [`replace_map`](Self::replace_map) /
///   [`same_type_replace_map`](Self::same_type_replace_map): redirections for
///   call sites bound to an explicitly overridden class method
///
/// A table covers the keys this type's own declarations and direct interface
/// merges touched; untouched base slots stay with the base type's table,
/// reachable through the cache.
pub struct MethodTable {
    ty: TypeDefRc,
    slot_map: BTreeMap<String, VirtualSlot>,
    entry_map: BTreeMap<DispatchEntry, Option<DispatchEntry>>,
    replace_map: BTreeMap<Token, DispatchEntry>,
    same_type_replace_map: BTreeMap<Token, DispatchEntry>,
}

/// Reference to a resolved `MethodTable`
pub type MethodTableRc = Arc<MethodTable>;

impl MethodTable {
    pub(crate) fn new(ty: TypeDefRc) -> Self {
        MethodTable {
            ty,
            slot_map: BTreeMap::new(),
            entry_map: BTreeMap::new(),
            replace_map: BTreeMap::new(),
            same_type_replace_map: BTreeMap::new(),
        }
    }

    /// The type this table belongs to
    #[must_use]
    pub fn type_def(&self) -> &TypeDefRc {
        &self.ty
    }

    /// All slots by signature key, in key order
    #[must_use]
    pub fn slots(&self) -> &BTreeMap<String, VirtualSlot> {
        &self.slot_map
    }

    /// Looks up the slot under a signature key
    #[must_use]
    pub fn slot(&self, key: &str) -> Option<&VirtualSlot> {
        self.slot_map.get(key)
    }

    /// The flattened dispatch table: every contributing entry mapped to the
    /// winning implementation. A `None` value marks a slot left unimplemented
    /// on an abstract type or interface.
    #[must_use]
    pub fn entry_map(&self) -> &BTreeMap<DispatchEntry, Option<DispatchEntry>> {
        &self.entry_map
    }

    /// The implementation dispatched for calls naming `entry`, if resolved
    #[must_use]
    pub fn implementation(&self, entry: &DispatchEntry) -> Option<&DispatchEntry> {
        self.entry_map.get(entry).and_then(Option::as_ref)
    }

    /// Redirections recorded by explicit class-method overrides, keyed by the
    /// overridden declaration's token
    #[must_use]
    pub fn replace_map(&self) -> &BTreeMap<Token, DispatchEntry> {
        &self.replace_map
    }

    /// The redirect recorded for an explicitly overridden class method
    #[must_use]
    pub fn replacement(&self, target: &Token) -> Option<&DispatchEntry> {
        self.replace_map.get(target)
    }

    /// The subset of [`replace_map`](Self::replace_map) whose targets are
    /// declared on this same type. Direct call sites bypass slot dispatch and
    /// consult this map independently.
    #[must_use]
    pub fn same_type_replace_map(&self) -> &BTreeMap<Token, DispatchEntry> {
        &self.same_type_replace_map
    }

    /// The same-type redirect for an explicitly overridden declaration
    #[must_use]
    pub fn same_type_replacement(&self, target: &Token) -> Option<&DispatchEntry> {
        self.same_type_replace_map.get(target)
    }

    /// Runs the full resolution pipeline: implicit slot assignment, interface
    /// merge, explicit overrides, entry flattening.
    pub(crate) fn resolve_table(
        &mut self,
        cache: &MethodTableCache,
        visiting: &mut Vec<Token>,
    ) -> Result<()> {
        let (candidates, mut conflicts) = self.collect_virtuals()?;

        let base = match self.ty.base {
            Some(base_token) => Some(cache.resolve_nested(base_token, visiting)?),
            None => None,
        };

        let mut queued: Vec<(String, MethodDefRc)> = Vec::new();
        for (key, method) in &candidates {
            match conflicts.remove(key) {
                Some(conflict) => {
                    self.process_conflict(key, &conflict, base.as_ref(), &mut queued);
                }
                None => self.process_method(key, method, base.as_ref(), &mut queued),
            }
        }

        self.merge_interfaces(cache, visiting)?;
        self.resolve_overrides(queued, cache, visiting)?;
        self.flatten_entries()
    }

    /// Partitions the type's own methods into standalone candidates and
    /// per-key conflict buckets, in declaration order.
    ///
    /// The first method seen under a key stays its candidate; once a second
    /// same-key method appears, the candidate is reclassified into the bucket
    /// together with every later same-key method, split by the new-slot bit.
    fn collect_virtuals(
        &self,
    ) -> Result<(Vec<(String, MethodDefRc)>, HashMap<String, SignatureConflict>)> {
        let mut candidates: Vec<(String, MethodDefRc)> = Vec::new();
        let mut seen: HashMap<String, usize> = HashMap::new();
        let mut conflicts: HashMap<String, SignatureConflict> = HashMap::new();

        for method in &self.ty.methods {
            if method.is_static() || !method.is_virtual() {
                if method.has_overrides() {
                    return Err(Error::ExplicitOverrideNonVirtual(
                        method.full_name(&self.ty),
                    ));
                }
                continue;
            }

            let key = method.name_key();
            if let Some(conflict) = conflicts.get_mut(&key) {
                conflict.push(method.clone());
            } else if let Some(&first) = seen.get(&key) {
                let conflict = conflicts.entry(key).or_default();
                conflict.push(candidates[first].1.clone());
                conflict.push(method.clone());
            } else {
                seen.insert(key.clone(), candidates.len());
                candidates.push((key, method.clone()));
            }
        }

        Ok((candidates, conflicts))
    }

    /// Resolves one conflicted signature key in two phases.
    ///
    /// All may-reuse methods are processed first; each overwrites the slot
    /// under the key, and once the phase is done the final winner is
    /// broadcast to every entry observed across all reuse steps, so entries
    /// displaced by a later same-key write still reach the winning
    /// implementation. New-slot methods follow, each creating a disjoint
    /// fresh slot whose mapping is recorded immediately.
    fn process_conflict(
        &mut self,
        key: &str,
        conflict: &SignatureConflict,
        base: Option<&MethodTableRc>,
        queued: &mut Vec<(String, MethodDefRc)>,
    ) {
        let mut observed: BTreeSet<DispatchEntry> = BTreeSet::new();
        for method in &conflict.reuse_slots {
            self.process_method(key, method, base, queued);
            if let Some(slot) = self.slot_map.get(key) {
                observed.extend(slot.entries().iter().cloned());
            }
        }

        if !conflict.reuse_slots.is_empty() {
            let winner = self
                .slot_map
                .get(key)
                .and_then(|slot| slot.implemented().cloned());
            for entry in observed {
                self.entry_map.insert(entry, winner.clone());
            }
        }

        for method in &conflict.new_slots {
            self.process_method(key, method, base, queued);
            self.apply_slot(key);
        }
    }

    /// Assigns one method to a slot under `key`, overwriting the slot map.
    ///
    /// A may-reuse method extends the base table's same-key slot when one
    /// exists; otherwise it (and every new-slot method) creates a fresh slot.
    /// Methods carrying explicit overrides are queued for the override pass.
    fn process_method(
        &mut self,
        key: &str,
        method: &MethodDefRc,
        base: Option<&MethodTableRc>,
        queued: &mut Vec<(String, MethodDefRc)>,
    ) {
        debug_assert!(method.is_virtual());

        if method.has_overrides() {
            queued.push((key.to_string(), method.clone()));
        }

        let entry = DispatchEntry::new(self.ty.clone(), method.clone());
        let slot = if method.is_new_slot() {
            VirtualSlot::fresh(entry)
        } else {
            match base.and_then(|table| table.slot(key)) {
                Some(base_slot) => VirtualSlot::extend(base_slot, entry),
                // may-reuse with nothing to inherit behaves as new-slot
                None => VirtualSlot::fresh(entry),
            }
        };
        self.slot_map.insert(key.to_string(), slot);
    }

    /// Records the current slot under `key` into the entry map
    fn apply_slot(&mut self, key: &str) {
        if let Some(slot) = self.slot_map.get(key) {
            let winner = slot.implemented().cloned();
            for entry in slot.entries() {
                self.entry_map.insert(entry.clone(), winner.clone());
            }
        }
    }

    /// Merges the slot maps of all directly implemented interfaces.
    ///
    /// Same-key slots union their entries into this type's slot; keys this
    /// type does not declare receive a placeholder slot carrying the
    /// interface entries as unimplemented obligations.
    fn merge_interfaces(
        &mut self,
        cache: &MethodTableCache,
        visiting: &mut Vec<Token>,
    ) -> Result<()> {
        for interface_token in self.ty.interfaces.clone() {
            let interface = cache.resolve_nested(interface_token, visiting)?;
            for (key, slot) in interface.slots() {
                match self.slot_map.get_mut(key) {
                    Some(existing) => existing.merge_entries(slot),
                    None => {
                        let mut placeholder = VirtualSlot::placeholder();
                        placeholder.merge_entries(slot);
                        self.slot_map.insert(key.clone(), placeholder);
                    }
                }
            }
        }
        Ok(())
    }

    /// Applies the queued explicit override declarations.
    ///
    /// Interface targets are re-seated under the overriding method's own key;
    /// class targets record a redirect in the replace maps. Each target may
    /// be claimed once per type.
    fn resolve_overrides(
        &mut self,
        queued: Vec<(String, MethodDefRc)>,
        cache: &MethodTableCache,
        visiting: &mut Vec<Token>,
    ) -> Result<()> {
        let mut overridden: BTreeSet<DispatchEntry> = BTreeSet::new();

        for (key, method) in queued {
            for declaration in &method.overrides {
                debug_assert_eq!(declaration.body, method.token);

                let (target_type, target_method) =
                    self.resolve_override_target(declaration, cache, visiting)?;
                let target_entry = DispatchEntry::new(target_type.clone(), target_method.clone());
                if !overridden.insert(target_entry.clone()) {
                    return Err(Error::DuplicateOverrideTarget(target_entry.full_name()));
                }

                if target_type.is_interface() {
                    self.remove_slot_entry(&target_entry);
                    match self.slot_map.get_mut(&key) {
                        Some(slot) => slot.insert_entry(target_entry),
                        None => {
                            return Err(Error::Resolution(format!(
                                "No slot under {} to carry redirected target {}",
                                key,
                                target_entry.full_name()
                            )))
                        }
                    }
                } else {
                    let impl_entry = DispatchEntry::new(self.ty.clone(), method.clone());
                    if target_type.token == self.ty.token {
                        self.same_type_replace_map
                            .insert(target_method.token, impl_entry.clone());
                    }
                    let redirect = self
                        .slot_map
                        .get(&key)
                        .and_then(|slot| slot.new_slot_entry().cloned())
                        .unwrap_or(impl_entry);
                    self.replace_map.insert(target_method.token, redirect);
                }
            }
        }
        Ok(())
    }

    /// Resolves an override declaration to its target type and method.
    ///
    /// A same-type target resolves against the in-flight type directly; any
    /// other stated type goes through the cache. An unknown type or a
    /// declaration the stated type does not own is an illegal target; cycle
    /// and depth failures propagate as themselves.
    fn resolve_override_target(
        &self,
        declaration: &MethodOverride,
        cache: &MethodTableCache,
        visiting: &mut Vec<Token>,
    ) -> Result<(TypeDefRc, MethodDefRc)> {
        let target_type = if declaration.declaration_type == self.ty.token {
            self.ty.clone()
        } else {
            match cache.resolve_nested(declaration.declaration_type, visiting) {
                Ok(table) => table.type_def().clone(),
                Err(Error::TypeNotFound(_)) => {
                    return Err(Error::IllegalOverrideTarget(format!(
                        "{}::{}",
                        declaration.declaration_type, declaration.declaration
                    )))
                }
                Err(error) => return Err(error),
            }
        };

        match target_type.method(&declaration.declaration) {
            Some(target_method) => Ok((target_type.clone(), target_method.clone())),
            None => Err(Error::IllegalOverrideTarget(format!(
                "{}::{}",
                target_type.fullname(),
                declaration.declaration
            ))),
        }
    }

    /// Removes `entry` from every slot of this table
    fn remove_slot_entry(&mut self, entry: &DispatchEntry) {
        for slot in self.slot_map.values_mut() {
            slot.remove_entry(entry);
        }
    }

    /// Flattens all slots into the entry map, validating that concrete types
    /// leave no populated slot unimplemented.
    fn flatten_entries(&mut self) -> Result<()> {
        let allow_unimplemented = self.ty.is_interface() || self.ty.is_abstract();

        for slot in self.slot_map.values() {
            // A slot drained by an explicit interface redirect carries no
            // obligations and produces no entries.
            if slot.entries().is_empty() {
                continue;
            }

            let winner = slot.implemented().cloned();
            if winner.is_none() && !allow_unimplemented {
                if let Some(first) = slot.entries().iter().next() {
                    return Err(Error::UnimplementedSlot {
                        ty: self.ty.fullname(),
                        entry: first.full_name(),
                    });
                }
            }
            for entry in slot.entries() {
                self.entry_map.insert(entry.clone(), winner.clone());
            }
        }
        Ok(())
    }
}

impl fmt::Debug for MethodTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MethodTable({}, {} slots, {} entries)",
            self.ty.fullname(),
            self.slot_map.len(),
            self.entry_map.len()
        )
    }
}
