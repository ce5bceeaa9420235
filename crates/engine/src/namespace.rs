//! Console namespaces
//!
//! The console layer resolves script method calls through namespaces. Each
//! registered class gets a namespace of the same name, bound back to the
//! class and linked to its parent class's namespace so lookups fall through
//! the hierarchy.

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::RwLock;
use tracing::debug;

use crate::error::NamespaceError;
use crate::string_table::StringTableEntry;

/// A named console namespace
#[derive(Debug)]
pub struct Namespace {
    name: StringTableEntry,
    parent: RwLock<Option<Arc<Namespace>>>,
    class_name: RwLock<Option<StringTableEntry>>,
}

impl Namespace {
    fn new(name: StringTableEntry) -> Self {
        Self {
            name,
            parent: RwLock::new(None),
            class_name: RwLock::new(None),
        }
    }

    /// Get the namespace name
    pub fn name(&self) -> StringTableEntry {
        self.name
    }

    /// Get the parent namespace, if linked
    pub fn parent(&self) -> Option<Arc<Namespace>> {
        self.parent.read().clone()
    }

    /// Get the class bound to this namespace, if any
    pub fn class_name(&self) -> Option<StringTableEntry> {
        *self.class_name.read()
    }

    /// Bind a class to this namespace
    pub fn bind_class(&self, class_name: StringTableEntry) {
        *self.class_name.write() = Some(class_name);
    }

    /// Link this namespace to the namespace of its parent class
    ///
    /// Linking to the current parent again is a no-op. Linking to a different
    /// parent, or to a namespace that already inherits from this one, fails.
    pub fn class_link_to(&self, parent: &Arc<Namespace>) -> Result<(), NamespaceError> {
        if let Some(current) = self.parent.read().as_ref() {
            if current.name == parent.name {
                return Ok(());
            }
            return Err(NamespaceError::AlreadyLinked {
                namespace: self.name.to_string(),
                current: current.name.to_string(),
                requested: parent.name.to_string(),
            });
        }

        if parent.is_child_of(self.name) || parent.name == self.name {
            return Err(NamespaceError::Cycle {
                namespace: self.name.to_string(),
                parent: parent.name.to_string(),
            });
        }

        *self.parent.write() = Some(Arc::clone(parent));
        debug!("Linked namespace {} -> {}", self.name, parent.name);
        Ok(())
    }

    /// Check if `ancestor` appears anywhere above this namespace
    pub fn is_child_of(&self, ancestor: StringTableEntry) -> bool {
        let mut walk = self.parent();
        while let Some(ns) = walk {
            if ns.name == ancestor {
                return true;
            }
            walk = ns.parent();
        }
        false
    }
}

/// Table of namespaces keyed by canonical name
#[derive(Debug, Default)]
pub struct NamespaceTable {
    namespaces: DashMap<StringTableEntry, Arc<Namespace>>,
}

impl NamespaceTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Find a namespace, creating it on first use
    pub fn lookup(&self, name: StringTableEntry) -> Arc<Namespace> {
        Arc::clone(
            self.namespaces
                .entry(name)
                .or_insert_with(|| Arc::new(Namespace::new(name)))
                .value(),
        )
    }

    /// Get the number of namespaces
    pub fn len(&self) -> usize {
        self.namespaces.len()
    }

    /// Check if the table has no namespaces
    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::string_table;

    #[test]
    fn test_lookup_creates_once() {
        let table = NamespaceTable::new();
        let name = string_table::insert("NsLookupOnce");
        let a = table.lookup(name);
        let b = table.lookup(name);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_class_link_and_relink() {
        let table = NamespaceTable::new();
        let child = table.lookup(string_table::insert("NsChild"));
        let parent = table.lookup(string_table::insert("NsParent"));
        let other = table.lookup(string_table::insert("NsOther"));

        child.class_link_to(&parent).unwrap();
        assert!(child.class_link_to(&parent).is_ok());
        assert!(matches!(
            child.class_link_to(&other),
            Err(NamespaceError::AlreadyLinked { .. })
        ));
        assert!(child.is_child_of(parent.name()));
    }

    #[test]
    fn test_cycle_rejected() {
        let table = NamespaceTable::new();
        let a = table.lookup(string_table::insert("NsCycleA"));
        let b = table.lookup(string_table::insert("NsCycleB"));

        b.class_link_to(&a).unwrap();
        assert!(matches!(a.class_link_to(&b), Err(NamespaceError::Cycle { .. })));
        assert!(matches!(a.class_link_to(&a), Err(NamespaceError::Cycle { .. })));
    }

    #[test]
    fn test_bind_class() {
        let table = NamespaceTable::new();
        let name = string_table::insert("NsBound");
        let ns = table.lookup(name);
        assert!(ns.class_name().is_none());
        ns.bind_class(name);
        assert_eq!(ns.class_name(), Some(name));
    }
}
