use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::metadata::{MethodDefRc, TypeDefRc};

/// One (type, method declaration) pair inside the dispatch maps.
///
/// An entry names a method declaration *as seen on a resolved type* — the
/// same `MethodDef` surfacing on an interface and on an implementing class
/// yields two distinct entries. Identity is the token pair: resolved tables
/// are memoized per type, so token equality is table identity. Entries are
/// totally ordered (type token, then method token) to keep every "first
/// entry" and iteration deterministic.
///
/// Used both as a map key and a map value throughout resolution.
#[derive(Clone)]
pub struct DispatchEntry {
    ty: TypeDefRc,
    method: MethodDefRc,
}

impl DispatchEntry {
    /// Creates an entry for `method` as declared on `ty`
    #[must_use]
    pub fn new(ty: TypeDefRc, method: MethodDefRc) -> Self {
        DispatchEntry { ty, method }
    }

    /// The type this entry belongs to
    #[must_use]
    pub fn type_def(&self) -> &TypeDefRc {
        &self.ty
    }

    /// The method declaration
    #[must_use]
    pub fn method(&self) -> &MethodDefRc {
        &self.method
    }

    /// Full display name of the declaration, for diagnostics
    #[must_use]
    pub fn full_name(&self) -> String {
        self.method.full_name(&self.ty)
    }

    fn key_pair(&self) -> (u32, u32) {
        (self.ty.token.value(), self.method.token.value())
    }
}

impl PartialEq for DispatchEntry {
    fn eq(&self, other: &Self) -> bool {
        self.key_pair() == other.key_pair()
    }
}

impl Eq for DispatchEntry {}

impl PartialOrd for DispatchEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DispatchEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key_pair().cmp(&other.key_pair())
    }
}

impl Hash for DispatchEntry {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key_pair().hash(state);
    }
}

impl fmt::Debug for DispatchEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DispatchEntry({}, {}, {})",
            self.ty.token,
            self.method.token,
            self.full_name()
        )
    }
}

/// One virtual dispatch slot of a method table.
///
/// A slot collects every declaration (`entries`) that dispatches through it,
/// remembers which entry created the slot (`new_slot_entry`) and which
/// declaration currently wins dispatch (`implemented`). Both options are
/// `None` on placeholder slots synthesized during interface merging;
/// `implemented` may stay `None` on abstract types and interfaces.
///
/// Slots are value types: extending an inherited slot clones it first, so a
/// base type's finished table is never touched by derived resolution.
#[derive(Clone, Debug)]
pub struct VirtualSlot {
    entries: BTreeSet<DispatchEntry>,
    new_slot_entry: Option<DispatchEntry>,
    implemented: Option<DispatchEntry>,
}

impl VirtualSlot {
    /// Creates a fresh slot owned by `entry`: sole member, slot creator and
    /// winning implementation at once
    #[must_use]
    pub(crate) fn fresh(entry: DispatchEntry) -> Self {
        let mut entries = BTreeSet::new();
        entries.insert(entry.clone());
        VirtualSlot {
            entries,
            new_slot_entry: Some(entry.clone()),
            implemented: Some(entry),
        }
    }

    /// Creates an empty placeholder slot for interface members the type does
    /// not (yet) implement
    #[must_use]
    pub(crate) fn placeholder() -> Self {
        VirtualSlot {
            entries: BTreeSet::new(),
            new_slot_entry: None,
            implemented: None,
        }
    }

    /// Clones `base` and joins it with `entry` as the new winning
    /// implementation. The creator entry is inherited from `base`.
    #[must_use]
    pub(crate) fn extend(base: &VirtualSlot, entry: DispatchEntry) -> Self {
        let mut slot = base.clone();
        slot.entries.insert(entry.clone());
        slot.implemented = Some(entry);
        slot
    }

    /// Declarations dispatching through this slot
    #[must_use]
    pub fn entries(&self) -> &BTreeSet<DispatchEntry> {
        &self.entries
    }

    /// The entry that created this slot, `None` for placeholders
    #[must_use]
    pub fn new_slot_entry(&self) -> Option<&DispatchEntry> {
        self.new_slot_entry.as_ref()
    }

    /// The declaration currently winning dispatch, `None` while unimplemented
    #[must_use]
    pub fn implemented(&self) -> Option<&DispatchEntry> {
        self.implemented.as_ref()
    }

    /// Unions the entries of `other` into this slot
    pub(crate) fn merge_entries(&mut self, other: &VirtualSlot) {
        for entry in &other.entries {
            self.entries.insert(entry.clone());
        }
    }

    /// Adds a single entry
    pub(crate) fn insert_entry(&mut self, entry: DispatchEntry) {
        self.entries.insert(entry);
    }

    /// Removes a single entry, if present
    pub(crate) fn remove_entry(&mut self, entry: &DispatchEntry) {
        self.entries.remove(entry);
    }
}

/// Same-key methods of one type, bucketed for two-phase processing.
///
/// When several declarations of one type collide on a signature key, the
/// may-reuse methods are processed before the new-slot methods regardless of
/// declaration order; within each bucket declaration order is preserved.
#[derive(Default, Debug)]
pub(crate) struct SignatureConflict {
    /// Methods without the new-slot bit, in declaration order
    pub(crate) reuse_slots: Vec<MethodDefRc>,
    /// Methods with the new-slot bit, in declaration order
    pub(crate) new_slots: Vec<MethodDefRc>,
}

impl SignatureConflict {
    /// Buckets one method by its vtable layout bit
    pub(crate) fn push(&mut self, method: MethodDefRc) {
        if method.is_new_slot() {
            self.new_slots.push(method);
        } else {
            self.reuse_slots.push(method);
        }
    }
}
