//! conobject Core - Class Registry, Field Reflection and Callback Binding
//!
//! This crate lets native classes describe themselves once at start-up so
//! that a late-bound console layer can look them up by name, create them,
//! read and write their fields as strings, and invoke their named callbacks.
//!
//! # Re-exports
//!
//! This crate re-exports the SDK and engine crates for convenience:
//! - [`sdk`] - Console type, callback return type and network tags
//! - [`engine`] - String table and console namespaces

// Allow the crate to refer to itself as `conobject_core` for proc macro compatibility
extern crate self as conobject_core;

// Re-export SDK and engine crates
pub use conobject_engine as engine;
pub use conobject_sdk as sdk;

pub mod bootstrap;
pub mod callbacks;
pub mod config;
pub mod console;
pub mod fields;
pub mod object;
pub mod registry;

#[cfg(test)]
mod testing;

pub use bootstrap::{Bootstrap, ModuleRegisterFn};
pub use callbacks::{
    CallbackConstructor, CallbackDeclarations, CallbackFunction, CallbackReturn, CallbackValue,
    ConnectPolicy, ConnectedCallback, DeclaredCallback, VoidCallbackData,
};
pub use config::{ConfigError, ConfigResult, CoreConfig};
pub use fields::{
    ConsoleField, ConsoleValue, EnumEntry, EnumTable, Field, FieldBuilder, FieldError, FieldKind,
    FieldList, FieldStorage, FieldValidator, FloatRangeValidator, IntRangeValidator,
};
pub use object::{ConsoleClass, ConsoleObject};
pub use registry::{
    install, registry, try_registry, ClassId, ClassInitContext, ClassRegistry, ClassRep,
    NetGroupMask, RegistryError, RegistryResult,
};

pub use conobject_engine::StringTableEntry;
pub use conobject_sdk::{ConsoleType, NetClassGroup, NetClassType, ReturnType};

// Re-export macros
pub use conobject_macros::{console_callback, ConsoleObject};
