//! Named, typed callbacks
//!
//! A class declares callbacks (a name and a [`ReturnType`]) in
//! `init_callbacks`. Implementations are queued as [`CallbackConstructor`]s
//! during registration and attached to their class by
//! [`ClassRegistry::connect_all_callbacks`](crate::ClassRegistry::connect_all_callbacks),
//! which checks that each one names a callback the class declared, with the
//! same return type.
//!
//! Invocation goes through [`ClassRegistry::callback`](crate::ClassRegistry::callback):
//! the nearest declaration up the hierarchy fixes the return type, then the
//! first connected implementation from the concrete class upward runs.
//!
//! Implementations are stored type-erased as a [`CallbackFunction`], one
//! variant per return type.

mod constructor;
mod dispatch;

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use conobject_engine::{string_table, StringTableEntry};
use conobject_sdk::ReturnType;

use crate::object::ConsoleObject;

pub use constructor::{CallbackConstructor, ConnectPolicy};

/// Callback data passed when an invocation carries none
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoidCallbackData;

/// Type-erased callback body returning `R`
pub type CallbackFn<R> = Arc<dyn Fn(&mut dyn ConsoleObject, &dyn Any) -> R + Send + Sync>;

/// A connected callback implementation, tagged by return type
#[derive(Clone)]
pub enum CallbackFunction {
    Int(CallbackFn<i32>),
    Float(CallbackFn<f32>),
    String(CallbackFn<String>),
    Bool(CallbackFn<bool>),
    Void(CallbackFn<()>),
}

impl CallbackFunction {
    pub fn return_type(&self) -> ReturnType {
        match self {
            Self::Int(_) => ReturnType::Int,
            Self::Float(_) => ReturnType::Float,
            Self::String(_) => ReturnType::String,
            Self::Bool(_) => ReturnType::Bool,
            Self::Void(_) => ReturnType::Void,
        }
    }

    /// Run the implementation
    pub fn invoke(&self, obj: &mut dyn ConsoleObject, data: &dyn Any) -> CallbackValue {
        match self {
            Self::Int(f) => CallbackValue::Int(f(obj, data)),
            Self::Float(f) => CallbackValue::Float(f(obj, data)),
            Self::String(f) => CallbackValue::String(f(obj, data)),
            Self::Bool(f) => CallbackValue::Bool(f(obj, data)),
            Self::Void(f) => {
                f(obj, data);
                CallbackValue::Void
            }
        }
    }
}

impl fmt::Debug for CallbackFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CallbackFunction({})", self.return_type())
    }
}

/// Result of running a [`CallbackFunction`]
#[derive(Debug, Clone, PartialEq)]
pub enum CallbackValue {
    Int(i32),
    Float(f32),
    String(String),
    Bool(bool),
    Void,
}

/// A Rust type usable as a callback return type
pub trait CallbackReturn: Sized + 'static {
    const RETURN_TYPE: ReturnType;

    /// Wrap a body in the matching [`CallbackFunction`] variant
    fn erase<F>(f: F) -> CallbackFunction
    where
        F: Fn(&mut dyn ConsoleObject, &dyn Any) -> Self + Send + Sync + 'static;

    /// Extract the typed value, `None` on a variant mismatch
    fn from_value(value: CallbackValue) -> Option<Self>;
}

macro_rules! impl_callback_return {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl CallbackReturn for $ty {
                const RETURN_TYPE: ReturnType = ReturnType::$variant;

                fn erase<F>(f: F) -> CallbackFunction
                where
                    F: Fn(&mut dyn ConsoleObject, &dyn Any) -> Self + Send + Sync + 'static,
                {
                    CallbackFunction::$variant(Arc::new(f))
                }

                fn from_value(value: CallbackValue) -> Option<Self> {
                    match value {
                        CallbackValue::$variant(v) => Some(v),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_callback_return!(i32 => Int, f32 => Float, String => String, bool => Bool);

impl CallbackReturn for () {
    const RETURN_TYPE: ReturnType = ReturnType::Void;

    fn erase<F>(f: F) -> CallbackFunction
    where
        F: Fn(&mut dyn ConsoleObject, &dyn Any) -> Self + Send + Sync + 'static,
    {
        CallbackFunction::Void(Arc::new(f))
    }

    fn from_value(value: CallbackValue) -> Option<Self> {
        match value {
            CallbackValue::Void => Some(()),
            _ => None,
        }
    }
}

/// A callback a class declares: name and return type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeclaredCallback {
    name: StringTableEntry,
    return_type: ReturnType,
}

impl DeclaredCallback {
    pub fn new(name: StringTableEntry, return_type: ReturnType) -> Self {
        Self { name, return_type }
    }

    pub fn name(&self) -> StringTableEntry {
        self.name
    }

    pub fn return_type(&self) -> ReturnType {
        self.return_type
    }
}

/// A declared callback with an implementation attached
#[derive(Debug, Clone)]
pub struct ConnectedCallback {
    declared: DeclaredCallback,
    function: CallbackFunction,
}

impl ConnectedCallback {
    pub(crate) fn new(declared: DeclaredCallback, function: CallbackFunction) -> Self {
        Self { declared, function }
    }

    pub fn declared(&self) -> &DeclaredCallback {
        &self.declared
    }

    pub fn function(&self) -> &CallbackFunction {
        &self.function
    }
}

/// Collects the callbacks a class declares in `init_callbacks`
#[derive(Debug, Default)]
pub struct CallbackDeclarations {
    declared: Vec<DeclaredCallback>,
}

impl CallbackDeclarations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a callback
    ///
    /// Returns `false` if this class already declared a callback of that
    /// name (case-insensitive); the existing declaration is kept.
    pub fn declare(&mut self, name: &str, return_type: ReturnType) -> bool {
        let name = string_table::insert(name);
        if self.declared.iter().any(|cb| cb.name == name) {
            return false;
        }
        self.declared.push(DeclaredCallback::new(name, return_type));
        true
    }

    pub fn len(&self) -> usize {
        self.declared.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declared.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DeclaredCallback> {
        self.declared.iter()
    }

    pub(crate) fn into_vec(self) -> Vec<DeclaredCallback> {
        self.declared
    }
}
