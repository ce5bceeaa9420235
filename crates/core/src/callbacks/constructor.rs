//! Callback implementations waiting to be connected

use std::any::{type_name, Any, TypeId};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use conobject_engine::{string_table, StringTableEntry};
use conobject_sdk::ReturnType;

use super::{CallbackFunction, CallbackReturn, ConnectedCallback};
use crate::object::{ConsoleClass, ConsoleObject};
use crate::registry::ClassRegistry;

/// What connecting does when the class never declared the callback
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectPolicy {
    /// Panic
    Strict,
    /// Log a warning and skip the implementation
    #[default]
    Lenient,
}

/// An implementation of a named callback for one class
///
/// Built during registration and queued with
/// [`ClassRegistry::add_callback_constructor`]; the registry connects it once
/// every class has declared its callbacks.
pub struct CallbackConstructor {
    class: TypeId,
    class_name: &'static str,
    name: StringTableEntry,
    function: CallbackFunction,
}

impl CallbackConstructor {
    /// Wrap a typed implementation
    ///
    /// The body receives the invoked object viewed as `T` and the invocation
    /// data viewed as `D`. Either view failing at invocation time is a bug in
    /// the caller and panics.
    pub fn new<T, D, R, F>(name: &str, f: F) -> Self
    where
        T: ConsoleClass,
        D: Any,
        R: CallbackReturn,
        F: Fn(&mut T, &D) -> R + Send + Sync + 'static,
    {
        let name = string_table::insert(name);
        let function = R::erase(move |obj: &mut dyn ConsoleObject, data: &dyn Any| {
            let Some(data) = data.downcast_ref::<D>() else {
                panic!(
                    "Callback '{}' on class '{}' expects data of type {}",
                    name,
                    T::CLASS_NAME,
                    type_name::<D>()
                );
            };
            let object_class = obj.class_name();
            let Some(target) = obj.downcast_class_mut::<T>() else {
                panic!(
                    "Callback '{}' for class '{}' invoked on unrelated class '{}'",
                    name,
                    T::CLASS_NAME,
                    object_class
                );
            };
            f(target, data)
        });

        Self {
            class: TypeId::of::<T>(),
            class_name: T::CLASS_NAME,
            name,
            function,
        }
    }

    pub fn name(&self) -> StringTableEntry {
        self.name
    }

    pub fn class_name(&self) -> &'static str {
        self.class_name
    }

    pub fn return_type(&self) -> ReturnType {
        self.function.return_type()
    }

    /// Attach this implementation to its class
    ///
    /// Only the class's own declarations are searched. Returns `true` when
    /// connected, `false` when the callback is undeclared under
    /// [`ConnectPolicy::Lenient`].
    ///
    /// # Panics
    /// Panics before the registry is initialized, if the class is not
    /// registered, if the declared return type differs, or if the callback is
    /// undeclared under [`ConnectPolicy::Strict`].
    pub fn connect(&self, registry: &mut ClassRegistry) -> bool {
        registry.assert_initialized("connect");
        let policy = registry.connect_policy();
        let Some(id) = registry.class_id_of(self.class) else {
            panic!(
                "Cannot connect callback '{}': class '{}' is not registered",
                self.name, self.class_name
            );
        };
        let rep = registry.rep_mut(id);

        match rep.find_declared_callback(self.name).copied() {
            Some(declared) if declared.return_type() != self.return_type() => {
                panic!(
                    "Callback '{}' on class '{}' is declared {} but the implementation returns {}",
                    self.name,
                    self.class_name,
                    declared.return_type(),
                    self.return_type()
                );
            }
            Some(declared) => {
                rep.connected_callbacks
                    .push(ConnectedCallback::new(declared, self.function.clone()));
                debug!(
                    "Connected callback {}::{} ({})",
                    self.class_name,
                    self.name,
                    declared.return_type()
                );
                true
            }
            None => match policy {
                ConnectPolicy::Strict => panic!(
                    "Class '{}' does not declare callback '{}'",
                    self.class_name, self.name
                ),
                ConnectPolicy::Lenient => {
                    warn!(
                        "Class '{}' does not declare callback '{}', implementation skipped",
                        self.class_name, self.name
                    );
                    false
                }
            },
        }
    }
}

impl fmt::Debug for CallbackConstructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackConstructor")
            .field("class", &self.class_name)
            .field("name", &self.name)
            .field("return_type", &self.return_type())
            .finish()
    }
}
