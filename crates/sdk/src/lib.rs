//! conobject SDK - Reflection Type Definitions
//!
//! This crate contains the plain enumerations shared by every layer of the
//! reflection system. It has no dependencies and compiles quickly, allowing
//! parallel compilation of dependent crates.
//!
//! # Modules
//!
//! - [`types`] - Console data type tags for reflected fields
//! - [`callback`] - Callback return type tags
//! - [`net`] - Network class groups and class types

pub mod callback;
pub mod net;
pub mod types;

pub use callback::ReturnType;
pub use net::{NetClassGroup, NetClassType, NET_CLASS_GROUPS_COUNT, NET_CLASS_TYPES_COUNT};
pub use types::ConsoleType;
