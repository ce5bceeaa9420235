//! conobject Engine - Name Canonicalization and Console Namespaces
//!
//! This crate hosts the collaborators the reflection core consumes but does
//! not own:
//! - A process-global string table that canonicalizes names so that equal
//!   names compare by identity
//! - Console namespaces, one per class, linked along the class hierarchy
//!
//! # Architecture
//!
//! Names are interned once via [`string_table::insert`] and handed around as
//! [`StringTableEntry`] values. Namespaces live in a [`NamespaceTable`] owned
//! by whoever builds the class catalog.
//!
//! # Thread Safety
//!
//! The string table is backed by a `DashMap` and may be used from any thread.
//! Namespace parent links are guarded by `parking_lot` locks.

pub mod error;
pub mod namespace;
pub mod string_table;

pub use error::NamespaceError;
pub use namespace::{Namespace, NamespaceTable};
pub use string_table::StringTableEntry;
