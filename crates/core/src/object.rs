//! Console object traits
//!
//! [`ConsoleObject`] is the dynamic side of a reflected class: what an
//! instance can tell about itself at runtime. [`ConsoleClass`] is the static
//! side: the metadata a class contributes when it is registered.
//!
//! Rust has no class inheritance, so a derived class embeds its parent as a
//! field and forwards [`ConsoleObject::ancestor`] to it. This lets code that
//! was written against a base class reach the base part of any derived
//! instance.
//!
//! # Example
//!
//! ```ignore
//! use conobject_core::{ConsoleObject, FieldBuilder};
//!
//! #[derive(Default, ConsoleObject)]
//! #[console(class = "Shape", persist_fields = "Shape::extra_fields")]
//! pub struct Shape {
//!     #[console(field = "Size", docs = "Radius or half-extent")]
//!     size: f32,
//! }
//!
//! #[derive(Default, ConsoleObject)]
//! #[console(class = "Circle", callbacks = "Circle::declare_callbacks")]
//! pub struct Circle {
//!     #[console(parent)]
//!     base: Shape,
//! }
//! ```

use std::any::{Any, TypeId};

use conobject_sdk::NetClassType;

use crate::callbacks::{CallbackDeclarations, CallbackReturn, VoidCallbackData};
use crate::fields::FieldBuilder;
use crate::registry::{self, ClassRep, NetGroupMask};

/// Runtime interface of every reflected object
///
/// Implemented by `#[derive(ConsoleObject)]`.
pub trait ConsoleObject: Any + Send + Sync + 'static {
    /// Registered class name of the concrete type
    fn class_name(&self) -> &'static str;

    /// Borrow as `Any` for downcasting to the concrete type
    fn as_any(&self) -> &dyn Any;

    /// Mutably borrow as `Any` for downcasting to the concrete type
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Borrow the part of this object that belongs to class `class`
    ///
    /// Returns the object itself when `class` is its own type, the embedded
    /// parent (recursively) when `class` is an ancestor, and `None` otherwise.
    fn ancestor(&self, class: TypeId) -> Option<&dyn Any> {
        let this = self.as_any();
        (this.type_id() == class).then_some(this)
    }

    /// Mutable counterpart of [`ConsoleObject::ancestor`]
    fn ancestor_mut(&mut self, class: TypeId) -> Option<&mut dyn Any> {
        if self.as_any().type_id() == class {
            Some(self.as_any_mut())
        } else {
            None
        }
    }
}

/// Static metadata of a registrable class
///
/// Implemented by `#[derive(ConsoleObject)]`. The `init_*` hooks run exactly
/// once, during [`ClassRegistry::initialize`](crate::ClassRegistry::initialize),
/// and must only describe the class's own fields and callbacks. Inherited
/// ones are found by walking the hierarchy.
pub trait ConsoleClass: ConsoleObject + Default {
    /// Class name used for lookup and diagnostics
    const CLASS_NAME: &'static str;

    /// Network class type (`None` for classes that never travel over the wire)
    const NET_CLASS_TYPE: Option<NetClassType> = None;

    /// Network groups this class belongs to
    const NET_GROUPS: NetGroupMask = NetGroupMask::empty();

    /// Type of the parent class, if any
    fn parent_class() -> Option<TypeId> {
        None
    }

    /// Type of objects this class accepts as container children, if any
    fn container_child_class() -> Option<TypeId> {
        None
    }

    /// Declare this class's persistent fields
    fn init_persist_fields(_fields: &mut FieldBuilder) {}

    /// Declare this class's callbacks
    fn init_callbacks(_callbacks: &mut CallbackDeclarations) {}
}

impl dyn ConsoleObject {
    /// Check if this object is, or derives from, `T`
    pub fn is<T: ConsoleObject>(&self) -> bool {
        self.ancestor(TypeId::of::<T>()).is_some()
    }

    /// Borrow this object as class `T` (its own type or any ancestor)
    pub fn downcast_class_ref<T: ConsoleObject>(&self) -> Option<&T> {
        self.ancestor(TypeId::of::<T>())?.downcast_ref::<T>()
    }

    /// Mutably borrow this object as class `T` (its own type or any ancestor)
    pub fn downcast_class_mut<T: ConsoleObject>(&mut self) -> Option<&mut T> {
        self.ancestor_mut(TypeId::of::<T>())?.downcast_mut::<T>()
    }

    /// Get the metadata of this object's concrete class
    ///
    /// # Panics
    /// Panics if no registry is installed or the class was never registered.
    pub fn class_rep(&self) -> &'static ClassRep {
        let registry = registry::registry();
        let id = registry.class_of(self).unwrap_or_else(|| {
            panic!(
                "Object of class '{}' is not registered with the class registry",
                self.class_name()
            )
        });
        &registry[id]
    }

    /// Invoke a callback through the installed registry, without data
    ///
    /// See [`ClassRegistry::callback`](crate::ClassRegistry::callback).
    pub fn callback<R: CallbackReturn>(&mut self, name: &str) -> Option<R> {
        registry::registry().callback(self, name, &VoidCallbackData)
    }

    /// Invoke a callback through the installed registry with typed data
    pub fn callback_with<R: CallbackReturn>(&mut self, name: &str, data: &dyn Any) -> Option<R> {
        registry::registry().callback(self, name, data)
    }
}
