//! Global string table
//!
//! Every class, field, group and callback name passes through this table.
//! The table hands back one canonical `&'static str` per name, so two
//! [`StringTableEntry`] values are equal exactly when they point at the same
//! storage. Matching is case-insensitive: the first spelling inserted wins.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::LazyLock;

use dashmap::DashMap;
use tracing::trace;

/// Canonical entries keyed by their ASCII-lowercased spelling
static STRING_TABLE: LazyLock<DashMap<Box<str>, &'static str>> = LazyLock::new(DashMap::new);

/// A canonical, interned name
///
/// Equality and hashing use the address of the interned storage, never the
/// string contents.
#[derive(Clone, Copy)]
pub struct StringTableEntry(&'static str);

impl StringTableEntry {
    /// Get the canonical string
    #[inline]
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl PartialEq for StringTableEntry {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.0, other.0)
    }
}

impl Eq for StringTableEntry {}

impl Hash for StringTableEntry {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.0.as_ptr() as usize).hash(state);
    }
}

impl Deref for StringTableEntry {
    type Target = str;

    fn deref(&self) -> &str {
        self.0
    }
}

impl AsRef<str> for StringTableEntry {
    fn as_ref(&self) -> &str {
        self.0
    }
}

impl fmt::Display for StringTableEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl fmt::Debug for StringTableEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.0, f)
    }
}

/// Insert a name, returning its canonical entry
///
/// Inserting a name that differs only in ASCII case from an existing entry
/// returns the existing entry.
pub fn insert(name: &str) -> StringTableEntry {
    let key = name.to_ascii_lowercase();
    if let Some(existing) = STRING_TABLE.get(key.as_str()) {
        return StringTableEntry(*existing);
    }

    let entry = *STRING_TABLE
        .entry(key.into_boxed_str())
        .or_insert_with(|| {
            trace!("String table insert: {}", name);
            Box::leak(name.to_owned().into_boxed_str())
        });
    StringTableEntry(entry)
}

/// Find the canonical entry for a name without inserting it
pub fn lookup(name: &str) -> Option<StringTableEntry> {
    STRING_TABLE
        .get(name.to_ascii_lowercase().as_str())
        .map(|entry| StringTableEntry(*entry))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_is_canonical() {
        let a = insert("StringTableCanonical");
        let b = insert("StringTableCanonical");
        assert_eq!(a, b);
        assert!(std::ptr::eq(a.as_str(), b.as_str()));
    }

    #[test]
    fn test_case_insensitive_first_spelling_wins() {
        let first = insert("MixedCaseEntry");
        let second = insert("mixedcaseENTRY");
        assert_eq!(first, second);
        assert_eq!(second.as_str(), "MixedCaseEntry");
    }

    #[test]
    fn test_distinct_names_differ() {
        assert_ne!(insert("entry_one"), insert("entry_two"));
    }

    #[test]
    fn test_lookup_does_not_insert() {
        assert!(lookup("never_inserted_name_7f3a").is_none());
        let entry = insert("looked_up_name");
        assert_eq!(lookup("LOOKED_UP_NAME"), Some(entry));
    }
}
