//! Class registry
//!
//! The registry is the catalog of every reflected class. It is filled in
//! three phases:
//!
//! 1. **Registration**: modules call [`ClassRegistry::register`] and
//!    [`ClassRegistry::add_callback_constructor`], in a fixed order driven
//!    by [`Bootstrap`](crate::Bootstrap).
//! 2. **Initialization**: [`ClassRegistry::initialize`] resolves the class
//!    hierarchy, runs each class's self-description and assigns network
//!    class IDs.
//! 3. **Connection**: [`ClassRegistry::connect_all_callbacks`] attaches the
//!    queued callback implementations.
//!
//! Queries and object creation panic until initialization has run; the
//! `try_*` variants return [`RegistryError::NotInitialized`] instead. The
//! finished registry is installed process-wide with [`install`] and is
//! read-only from then on.
//!
//! # Example
//!
//! ```ignore
//! let mut registry = ClassRegistry::new();
//! registry.register::<Shape>();
//! registry.register::<Circle>();
//! registry.initialize();
//! registry.connect_all_callbacks();
//!
//! let circle = registry.find_class_rep("circle").unwrap();
//! let shape = registry.find_class_rep("Shape").unwrap();
//! assert_eq!(circle.parent(), Some(shape.id()));
//! ```

mod init;
mod network;
mod rep;

use std::any::TypeId;
use std::collections::HashMap;
use std::ops::Index;
use std::sync::OnceLock;

use slotmap::SlotMap;
use tracing::{debug, info, warn};

use conobject_engine::{string_table, NamespaceTable, StringTableEntry};
use conobject_sdk::{NetClassGroup, NetClassType};

use crate::callbacks::{CallbackConstructor, ConnectPolicy};
use crate::config::CoreConfig;
use crate::fields::{read_element, write_element, Field, FieldError};
use crate::object::{ConsoleClass, ConsoleObject};

pub use init::ClassInitContext;
pub use network::NetClassTable;
pub use rep::{ClassId, ClassRep, FactoryFn, InitFn, NetGroupMask};

/// Class registry errors
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Class registry is not initialized")]
    NotInitialized,

    #[error("A class registry is already installed")]
    AlreadyInstalled,

    #[error("Class '{0}' not found")]
    ClassNotFound(String),

    #[error("Class ID {id} out of range for {group:?}/{class_type:?} ({count} classes)")]
    ClassIdOutOfRange {
        group: NetClassGroup,
        class_type: NetClassType,
        id: u32,
        count: usize,
    },
}

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Catalog of reflected classes
#[derive(Debug)]
pub struct ClassRegistry {
    pub(crate) classes: SlotMap<ClassId, ClassRep>,
    pub(crate) order: Vec<ClassId>,
    by_type: HashMap<TypeId, ClassId>,
    pub(crate) constructors: Vec<CallbackConstructor>,
    pub(crate) namespaces: NamespaceTable,
    pub(crate) net_classes: NetClassTable,
    policy: ConnectPolicy,
    pub(crate) initialized: bool,
    callbacks_connected: bool,
}

impl Default for ClassRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassRegistry {
    /// Create an empty registry with the default connect policy
    pub fn new() -> Self {
        Self::with_policy(ConnectPolicy::default())
    }

    pub fn with_policy(policy: ConnectPolicy) -> Self {
        Self {
            classes: SlotMap::with_key(),
            order: Vec::new(),
            by_type: HashMap::new(),
            constructors: Vec::new(),
            namespaces: NamespaceTable::new(),
            net_classes: NetClassTable::default(),
            policy,
            initialized: false,
            callbacks_connected: false,
        }
    }

    pub fn with_config(config: &CoreConfig) -> Self {
        Self::with_policy(config.connect_policy)
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Register a class
    ///
    /// # Panics
    /// Panics after [`ClassRegistry::initialize`], and in debug builds when a
    /// class of the same name (case-insensitive) is already registered.
    pub fn register<T: ConsoleClass>(&mut self) -> ClassId {
        self.register_rep(ClassRep::of::<T>())
    }

    /// Register a prepared class record
    ///
    /// See [`ClassRegistry::register`].
    pub fn register_rep(&mut self, rep: ClassRep) -> ClassId {
        if self.initialized {
            panic!(
                "Cannot register class '{}' after the registry is initialized",
                rep.name
            );
        }

        if self.find_by_name(rep.name).is_some() {
            if cfg!(debug_assertions) {
                panic!("Duplicate class name '{}'", rep.name);
            }
            warn!("Duplicate class name '{}', registering anyway", rep.name);
        }

        let name = rep.name;
        let type_id = rep.type_id;
        let id = self.classes.insert_with_key(move |id| {
            let mut rep = rep;
            rep.id = id;
            rep
        });
        self.by_type.insert(type_id, id);
        self.order.push(id);

        debug!("Registered class {}", name);
        id
    }

    /// Queue a callback implementation for [`ClassRegistry::connect_all_callbacks`]
    ///
    /// # Panics
    /// Panics once callbacks have been connected.
    pub fn add_callback_constructor(&mut self, constructor: CallbackConstructor) {
        if self.callbacks_connected {
            panic!(
                "Cannot add callback '{}' for '{}': callbacks are already connected",
                constructor.name(),
                constructor.class_name()
            );
        }
        self.constructors.push(constructor);
    }

    /// Connect every queued callback implementation
    ///
    /// Returns how many were connected.
    ///
    /// # Panics
    /// Panics before [`ClassRegistry::initialize`], when run twice, or when a
    /// constructor fails to connect fatally (see
    /// [`CallbackConstructor::connect`]).
    #[tracing::instrument(skip_all)]
    pub fn connect_all_callbacks(&mut self) -> usize {
        self.assert_initialized("connect_all_callbacks");
        if self.callbacks_connected {
            panic!("Callbacks are already connected");
        }
        self.callbacks_connected = true;

        let constructors = std::mem::take(&mut self.constructors);
        let mut connected = 0;
        for constructor in &constructors {
            if constructor.connect(self) {
                connected += 1;
            }
        }

        info!(
            "Connected {} of {} callback implementations",
            connected,
            constructors.len()
        );
        connected
    }

    // ========================================================================
    // State
    // ========================================================================

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn callbacks_connected(&self) -> bool {
        self.callbacks_connected
    }

    pub fn connect_policy(&self) -> ConnectPolicy {
        self.policy
    }

    /// Number of registered classes
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Console namespaces bound to the registered classes
    pub fn namespaces(&self) -> &NamespaceTable {
        &self.namespaces
    }

    /// Network class partitions
    pub fn net_class_table(&self) -> &NetClassTable {
        &self.net_classes
    }

    pub(crate) fn assert_initialized(&self, operation: &str) {
        if !self.initialized {
            panic!(
                "ClassRegistry::{} called before the registry is initialized",
                operation
            );
        }
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// Classes in registration order
    pub fn iter(&self) -> impl Iterator<Item = &ClassRep> + '_ {
        self.order.iter().map(|&id| &self.classes[id])
    }

    pub fn get(&self, id: ClassId) -> Option<&ClassRep> {
        self.classes.get(id)
    }

    pub(crate) fn rep_mut(&mut self, id: ClassId) -> &mut ClassRep {
        &mut self.classes[id]
    }

    /// Class registered for a Rust type
    pub fn class_id_of(&self, type_id: TypeId) -> Option<ClassId> {
        self.by_type.get(&type_id).copied()
    }

    /// Concrete class of an object
    pub fn class_of(&self, obj: &dyn ConsoleObject) -> Option<ClassId> {
        self.class_id_of(obj.as_any().type_id())
    }

    fn find_by_name(&self, name: StringTableEntry) -> Option<ClassId> {
        self.order
            .iter()
            .copied()
            .find(|&id| self.classes[id].name == name)
    }

    /// Find a class by name (case-insensitive)
    ///
    /// # Panics
    /// Panics before [`ClassRegistry::initialize`].
    pub fn find_class_rep(&self, name: &str) -> Option<&ClassRep> {
        self.assert_initialized("find_class_rep");
        let name = string_table::lookup(name)?;
        self.find_by_name(name).map(|id| &self.classes[id])
    }

    // ========================================================================
    // Hierarchy
    // ========================================================================

    /// Walk from `id` up to its root class, starting with `id` itself
    pub fn ancestors(&self, id: ClassId) -> Ancestors<'_> {
        self.assert_initialized("ancestors");
        Ancestors {
            registry: self,
            next: Some(id),
        }
    }

    /// Check if `id` is `base` or derives from it
    pub fn is_class(&self, id: ClassId, base: ClassId) -> bool {
        self.ancestors(id).any(|ancestor| ancestor == base)
    }

    /// Find a field, searching from `id` up to the root
    ///
    /// Returns the declaring class along with the field.
    pub fn find_field(&self, id: ClassId, name: &str) -> Option<(ClassId, &Field)> {
        self.assert_initialized("find_field");
        let name = string_table::lookup(name)?;
        self.ancestors(id)
            .find_map(|class| self.classes[class].find_field(name).map(|field| (class, field)))
    }

    /// Highest class from `id` upward that declares `field`
    pub fn find_field_root(&self, id: ClassId, field: &str) -> Option<ClassId> {
        self.assert_initialized("find_field_root");
        let field = string_table::lookup(field)?;
        self.ancestors(id)
            .filter(|&class| self.classes[class].find_field(field).is_some())
            .last()
    }

    /// Class of the objects `id` accepts as container children
    ///
    /// With `recurse`, the nearest declaration from `id` upward is used.
    pub fn container_child_class(&self, id: ClassId, recurse: bool) -> Option<ClassId> {
        self.assert_initialized("container_child_class");
        if !recurse {
            return self.classes[id].container_child;
        }
        self.ancestors(id)
            .find_map(|class| self.classes[class].container_child)
    }

    /// Highest class from `id` upward whose own container child class accepts `child`
    pub fn find_container_child_root(&self, id: ClassId, child: ClassId) -> Option<ClassId> {
        self.assert_initialized("find_container_child_root");
        self.ancestors(id)
            .filter(|&class| {
                self.classes[class]
                    .container_child
                    .is_some_and(|accepted| self.is_class(child, accepted))
            })
            .last()
    }

    // ========================================================================
    // Creation
    // ========================================================================

    /// Create a default instance of a named class
    ///
    /// Returns `None` (with a warning) for unknown names.
    ///
    /// # Panics
    /// Panics before [`ClassRegistry::initialize`].
    pub fn create(&self, name: &str) -> Option<Box<dyn ConsoleObject>> {
        self.assert_initialized("create");
        match self.try_create(name) {
            Ok(obj) => Some(obj),
            Err(e) => {
                warn!("Cannot create object: {}", e);
                None
            }
        }
    }

    /// Create a default instance of a named class
    pub fn try_create(&self, name: &str) -> RegistryResult<Box<dyn ConsoleObject>> {
        if !self.initialized {
            return Err(RegistryError::NotInitialized);
        }
        self.find_class_rep(name)
            .map(ClassRep::create)
            .ok_or_else(|| RegistryError::ClassNotFound(name.to_string()))
    }

    /// Create a default instance of the class at a network partition slot
    pub fn try_create_net(
        &self,
        group: NetClassGroup,
        class_type: NetClassType,
        id: u32,
    ) -> RegistryResult<Box<dyn ConsoleObject>> {
        if !self.initialized {
            return Err(RegistryError::NotInitialized);
        }
        let class = self
            .net_classes
            .class_at(group, class_type, id)
            .ok_or(RegistryError::ClassIdOutOfRange {
                group,
                class_type,
                id,
                count: self.net_classes.count(group, class_type),
            })?;
        Ok(self.classes[class].create())
    }

    /// Create a default instance of the class at a network partition slot
    ///
    /// # Panics
    /// Panics before [`ClassRegistry::initialize`] or when `id` is out of range.
    pub fn create_net(
        &self,
        group: NetClassGroup,
        class_type: NetClassType,
        id: u32,
    ) -> Box<dyn ConsoleObject> {
        self.assert_initialized("create_net");
        match self.try_create_net(group, class_type, id) {
            Ok(obj) => obj,
            Err(e) => panic!("create_net failed: {}", e),
        }
    }

    // ========================================================================
    // Network partitions
    // ========================================================================

    pub fn net_class_count(&self, group: NetClassGroup, class_type: NetClassType) -> usize {
        self.assert_initialized("net_class_count");
        self.net_classes.count(group, class_type)
    }

    pub fn net_class_bit_size(&self, group: NetClassGroup, class_type: NetClassType) -> u32 {
        self.assert_initialized("net_class_bit_size");
        self.net_classes.bit_size(group, class_type)
    }

    /// Network ID of a class within `group`
    pub fn net_class_id(&self, id: ClassId, group: NetClassGroup) -> Option<u32> {
        self.assert_initialized("net_class_id");
        self.classes.get(id)?.class_id(group)
    }

    /// Classes of a partition in ID order
    pub fn net_classes(&self, group: NetClassGroup, class_type: NetClassType) -> &[ClassId] {
        self.assert_initialized("net_classes");
        self.net_classes.classes(group, class_type)
    }

    // ========================================================================
    // Enumeration
    // ========================================================================

    /// Every class that is, or derives from, `base` (all classes for `None`)
    ///
    /// Sorted by network class type (non-networked first), then by
    /// case-insensitive name. An unknown `base` yields nothing.
    pub fn enumerate_classes(&self, base: Option<&str>) -> Vec<ClassId> {
        self.assert_initialized("enumerate_classes");
        let base = match base {
            Some(name) => match self.find_class_rep(name) {
                Some(rep) => Some(rep.id),
                None => return Vec::new(),
            },
            None => None,
        };

        let mut classes: Vec<ClassId> = self
            .order
            .iter()
            .copied()
            .filter(|&id| base.map_or(true, |base| self.is_class(id, base)))
            .collect();
        classes.sort_by_cached_key(|&id| {
            let rep = &self.classes[id];
            (
                rep.net_class_type.map(NetClassType::index),
                rep.name.to_ascii_lowercase(),
            )
        });
        classes
    }

    // ========================================================================
    // Field data
    // ========================================================================

    fn locate_field(&self, obj: &dyn ConsoleObject, field: &str) -> Result<(ClassId, &Field), FieldError> {
        let not_found = || FieldError::NotFound {
            class: obj.class_name().to_string(),
            field: field.to_string(),
        };
        let class = self.class_of(obj).ok_or_else(not_found)?;
        self.find_field(class, field).ok_or_else(not_found)
    }

    /// Read a field as the console sees it
    ///
    /// The field is found by walking up from the object's class; the get hook
    /// gets the final say on the returned string.
    ///
    /// # Safety
    /// The offsets registered for the declaring class must be correct for its
    /// Rust type.
    pub unsafe fn get_data_field(
        &self,
        obj: &dyn ConsoleObject,
        field: &str,
        index: usize,
    ) -> Result<String, FieldError> {
        let (declaring, fld) = self.locate_field(obj, field)?;
        let rep = &self.classes[declaring];
        let part = obj
            .ancestor(rep.type_id)
            .ok_or_else(|| FieldError::ClassMismatch {
                object: obj.class_name().to_string(),
                class: rep.name.to_string(),
            })?;

        let raw = read_element(fld, part, index)?;
        Ok((fld.get_data_fn)(obj, &raw))
    }

    /// Write a field from a console string
    ///
    /// Returns `Ok(false)` when the set hook declined the write. The field's
    /// validator runs on the parsed value before it is stored.
    ///
    /// # Safety
    /// Same requirements as [`ClassRegistry::get_data_field`].
    pub unsafe fn set_data_field(
        &self,
        obj: &mut dyn ConsoleObject,
        field: &str,
        index: usize,
        value: &str,
    ) -> Result<bool, FieldError> {
        let (declaring, fld) = self.locate_field(obj, field)?;
        if !(fld.set_data_fn)(obj, value) {
            debug!("Set hook declined write of '{}' to {}", value, fld.name);
            return Ok(false);
        }

        let rep = &self.classes[declaring];
        let object_class = obj.class_name();
        let part = obj
            .ancestor_mut(rep.type_id)
            .ok_or_else(|| FieldError::ClassMismatch {
                object: object_class.to_string(),
                class: rep.name.to_string(),
            })?;

        write_element(fld, part, index, value, object_class)?;
        Ok(true)
    }
}

impl Index<ClassId> for ClassRegistry {
    type Output = ClassRep;

    fn index(&self, id: ClassId) -> &ClassRep {
        &self.classes[id]
    }
}

/// Iterator over a class and its ancestors, nearest first
pub struct Ancestors<'a> {
    registry: &'a ClassRegistry,
    next: Option<ClassId>,
}

impl Iterator for Ancestors<'_> {
    type Item = ClassId;

    fn next(&mut self) -> Option<ClassId> {
        let current = self.next?;
        self.next = self.registry.classes.get(current).and_then(|rep| rep.parent);
        Some(current)
    }
}

// ============================================================================
// Process-wide registry
// ============================================================================

static REGISTRY: OnceLock<ClassRegistry> = OnceLock::new();

/// Install the process-wide registry
///
/// Returns an error if a registry is already installed.
///
/// # Panics
/// Panics if `registry` is not initialized.
pub fn install(registry: ClassRegistry) -> RegistryResult<&'static ClassRegistry> {
    registry.assert_initialized("install");
    REGISTRY
        .set(registry)
        .map_err(|_| RegistryError::AlreadyInstalled)?;
    REGISTRY.get().ok_or(RegistryError::NotInitialized)
}

/// Get the process-wide registry
///
/// # Panics
/// Panics if called before `install`
pub fn registry() -> &'static ClassRegistry {
    REGISTRY.get().expect("Class registry not installed")
}

/// Try to get the process-wide registry without panicking
pub fn try_registry() -> Option<&'static ClassRegistry> {
    REGISTRY.get()
}

/// Check if a registry is installed
pub fn is_installed() -> bool {
    REGISTRY.get().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{self, Circle, Layer, Shape, ShapeGroup, Square};
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::{ConsoleObject, FieldBuilder, FieldValidator};
    use conobject_sdk::ConsoleType;

    fn id_of(registry: &ClassRegistry, name: &str) -> ClassId {
        registry.find_class_rep(name).unwrap().id()
    }

    #[test]
    fn test_find_class_rep_case_insensitive() {
        let registry = testing::build();
        let circle = registry.find_class_rep("cIrClE").unwrap();
        assert_eq!(circle.name().as_str(), "Circle");

        for rep in registry.iter() {
            let found = registry.find_class_rep(&rep.name().to_ascii_uppercase()).unwrap();
            assert_eq!(found.id(), rep.id());
        }
        assert!(registry.find_class_rep("Hexagon").is_none());
    }

    #[test]
    fn test_iter_in_registration_order() {
        let registry = testing::build();
        let names: Vec<&str> = registry.iter().map(|rep| rep.name().as_str()).collect();
        assert_eq!(names, ["Circle", "Shape", "Square", "ShapeGroup", "Layer"]);
        assert_eq!(registry.len(), 5);
    }

    #[test]
    fn test_parents_resolved_regardless_of_order() {
        let registry = testing::build();
        let shape = id_of(&registry, "Shape");
        assert_eq!(registry[id_of(&registry, "Circle")].parent(), Some(shape));
        assert_eq!(registry[id_of(&registry, "Square")].parent(), Some(shape));
        assert_eq!(registry[shape].parent(), None);
        assert_eq!(registry.class_id_of(TypeId::of::<Layer>()), Some(id_of(&registry, "Layer")));
    }

    #[test]
    fn test_find_field_walks_hierarchy() {
        let registry = testing::build();
        let circle = id_of(&registry, "Circle");
        let shape = id_of(&registry, "Shape");

        let (owner, size) = registry.find_field(circle, "size").unwrap();
        assert_eq!(owner, shape);
        assert_eq!(size.console_type(), Some(ConsoleType::F32));
        assert_eq!(size.docs(), Some("Radius or half-extent"));

        let (_, color) = registry.find_field(circle, "Color").unwrap();
        assert_eq!(color.element_count(), 3);

        let (owner, _) = registry.find_field(circle, "Segments").unwrap();
        assert_eq!(owner, circle);
        assert!(registry.find_field(shape, "Segments").is_none());
        assert!(registry.find_field(circle, "NoSuchField").is_none());
    }

    #[test]
    fn test_fields_are_not_copied_down() {
        let registry = testing::build();
        let circle = &registry[id_of(&registry, "Circle")];
        let names: Vec<&str> = circle.fields().iter().map(|f| f.name().as_str()).collect();
        assert_eq!(
            names,
            [
                "Tessellation_begingroup",
                "Segments",
                "Tessellation_endgroup",
                "Smoothness"
            ]
        );
    }

    #[test]
    fn test_find_field_root() {
        let registry = testing::build();
        let circle = id_of(&registry, "Circle");
        assert_eq!(registry.find_field_root(circle, "Size"), Some(id_of(&registry, "Shape")));
        assert_eq!(registry.find_field_root(circle, "Segments"), Some(circle));
        assert_eq!(registry.find_field_root(circle, "Visible"), None);
    }

    #[test]
    fn test_is_class() {
        let registry = testing::build();
        let circle = id_of(&registry, "Circle");
        let shape = id_of(&registry, "Shape");
        assert!(registry.is_class(circle, shape));
        assert!(registry.is_class(circle, circle));
        assert!(!registry.is_class(shape, circle));
        assert!(!registry.is_class(circle, id_of(&registry, "Square")));
    }

    #[test]
    fn test_container_children() {
        let registry = testing::build();
        let layer = id_of(&registry, "Layer");
        let group = id_of(&registry, "ShapeGroup");
        let shape = id_of(&registry, "Shape");
        let circle = id_of(&registry, "Circle");

        assert_eq!(registry.container_child_class(layer, false), None);
        assert_eq!(registry.container_child_class(layer, true), Some(shape));
        assert_eq!(registry.container_child_class(group, false), Some(shape));

        assert_eq!(registry.find_container_child_root(layer, circle), Some(group));
        assert_eq!(registry.find_container_child_root(layer, layer), None);
        assert_eq!(registry.find_container_child_root(circle, shape), None);
    }

    #[test]
    fn test_namespaces_linked() {
        let registry = testing::build();
        let circle = &registry[id_of(&registry, "Circle")];
        let namespace = circle.namespace().unwrap();
        assert_eq!(namespace.class_name(), Some(circle.name()));
        assert_eq!(namespace.parent().unwrap().name().as_str(), "Shape");
        assert_eq!(registry.namespaces().len(), 5);
    }

    #[test]
    fn test_network_partitions() {
        let registry = testing::build();
        let game = NetClassGroup::Game;
        let object = NetClassType::Object;

        let names: Vec<&str> = registry
            .net_classes(game, object)
            .iter()
            .map(|&id| registry[id].name().as_str())
            .collect();
        assert_eq!(names, ["Circle", "Shape", "Square"]);
        assert_eq!(registry.net_class_count(game, object), 3);
        assert_eq!(registry.net_class_bit_size(game, object), 2);

        for (index, &id) in registry.net_classes(game, object).iter().enumerate() {
            assert_eq!(registry.net_class_id(id, game), Some(index as u32));
        }

        let shape = id_of(&registry, "Shape");
        assert_eq!(registry.net_class_count(NetClassGroup::Community, object), 1);
        assert_eq!(registry.net_class_bit_size(NetClassGroup::Community, object), 1);
        assert_eq!(registry.net_class_id(shape, NetClassGroup::Community), Some(0));
        assert_eq!(
            registry.net_class_id(id_of(&registry, "Circle"), NetClassGroup::Community),
            None
        );

        assert_eq!(registry.net_class_count(game, NetClassType::DataBlock), 1);
        assert_eq!(registry.net_class_count(game, NetClassType::Event), 0);
        assert_eq!(registry.net_class_bit_size(game, NetClassType::Event), 0);
        assert_eq!(registry.net_class_id(id_of(&registry, "Layer"), game), None);
    }

    #[test]
    fn test_network_ids_deterministic() {
        let first = testing::build();

        let mut second = ClassRegistry::new();
        second.register::<Layer>();
        second.register::<ShapeGroup>();
        second.register::<Square>();
        second.register::<Shape>();
        second.register::<Circle>();
        second.initialize();

        for rep in first.iter() {
            let other = second.find_class_rep(&rep.name()).unwrap();
            for group in NetClassGroup::ALL {
                assert_eq!(rep.class_id(group), other.class_id(group), "{}", rep.name());
            }
        }
    }

    #[test]
    fn test_create_by_name() {
        let registry = testing::build();
        let obj = registry.create("circle").unwrap();
        assert_eq!(obj.class_name(), "Circle");

        let class = registry.class_of(obj.as_ref()).unwrap();
        assert_eq!(registry[class].parent(), Some(id_of(&registry, "Shape")));
        assert!(obj.as_any().downcast_ref::<Circle>().is_some());

        assert!(registry.create("Hexagon").is_none());
        assert!(matches!(
            registry.try_create("Hexagon"),
            Err(RegistryError::ClassNotFound(_))
        ));
    }

    #[test]
    fn test_create_net() {
        let registry = testing::build();
        let obj = registry.create_net(NetClassGroup::Game, NetClassType::Object, 1);
        assert_eq!(obj.class_name(), "Shape");

        let obj = registry.create_net(NetClassGroup::Game, NetClassType::DataBlock, 0);
        assert_eq!(obj.class_name(), "ShapeGroup");

        assert!(matches!(
            registry.try_create_net(NetClassGroup::Game, NetClassType::Object, 3),
            Err(RegistryError::ClassIdOutOfRange { count: 3, .. })
        ));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_create_net_out_of_range() {
        let registry = testing::build();
        registry.create_net(NetClassGroup::Game, NetClassType::Event, 0);
    }

    #[test]
    fn test_try_create_before_initialize() {
        let mut registry = ClassRegistry::new();
        registry.register::<Shape>();
        assert!(matches!(
            registry.try_create_net(NetClassGroup::Game, NetClassType::Object, 0),
            Err(RegistryError::NotInitialized)
        ));
        assert!(matches!(
            registry.try_create("Shape"),
            Err(RegistryError::NotInitialized)
        ));
    }

    #[test]
    fn test_enumerate_classes() {
        let registry = testing::build();
        let names = |base: Option<&str>| -> Vec<&str> {
            registry
                .enumerate_classes(base)
                .into_iter()
                .map(|id| registry[id].name().as_str())
                .collect()
        };

        assert_eq!(
            names(None),
            ["Layer", "Circle", "Shape", "Square", "ShapeGroup"]
        );
        assert_eq!(names(Some("shape")), ["Circle", "Shape", "Square"]);
        assert_eq!(names(Some("ShapeGroup")), ["Layer", "ShapeGroup"]);
        assert!(names(Some("Hexagon")).is_empty());
    }

    static GAUGE_VALIDATOR_DROPS: AtomicUsize = AtomicUsize::new(0);

    #[derive(Debug)]
    struct CountedValidator;

    impl Drop for CountedValidator {
        fn drop(&mut self) {
            GAUGE_VALIDATOR_DROPS.fetch_add(1, Ordering::SeqCst);
        }
    }

    impl FieldValidator for CountedValidator {
        fn set_field_index(&mut self, _index: usize) {}

        fn field_index(&self) -> usize {
            0
        }

        fn validate(&self, _class_name: &str, _field_name: &str, _value: &mut dyn std::any::Any) {}
    }

    #[derive(Debug, Default, ConsoleObject)]
    #[console(class = "Gauge", persist_fields = "Gauge::extra_fields")]
    struct Gauge {
        level: f32,
    }

    impl Gauge {
        fn extra_fields(fields: &mut FieldBuilder) {
            fields.add_field_v(
                "Level",
                ConsoleType::F32,
                core::mem::offset_of!(Gauge, level),
                Box::new(CountedValidator),
            );
        }
    }

    #[test]
    fn test_prefilled_fields_win_over_staged() {
        let mut fields = FieldBuilder::new();
        fields.add_field("Override", ConsoleType::F32, 0);

        let mut registry = ClassRegistry::new();
        registry.register_rep(ClassRep::of::<Shape>().with_fields(fields));
        registry.initialize();

        let shape = registry.find_class_rep("Shape").unwrap();
        assert_eq!(shape.fields().len(), 1);
        assert_eq!(shape.fields().get(0).unwrap().name().as_str(), "Override");
        // Callbacks are still declared
        assert_eq!(shape.declared_callbacks().len(), 2);
    }

    #[test]
    fn test_dropped_staged_fields_release_validators() {
        let mut fields = FieldBuilder::new();
        fields.add_field("Reading", ConsoleType::F32, 0);

        let mut registry = ClassRegistry::new();
        registry.register_rep(ClassRep::of::<Gauge>().with_fields(fields));
        assert_eq!(GAUGE_VALIDATOR_DROPS.load(Ordering::SeqCst), 0);

        registry.initialize();
        assert_eq!(GAUGE_VALIDATOR_DROPS.load(Ordering::SeqCst), 1);

        let gauge = registry.find_class_rep("Gauge").unwrap();
        assert!(registry.find_field(gauge.id(), "Level").is_none());
        assert!(registry.find_field(gauge.id(), "Reading").is_some());
    }

    #[test]
    #[should_panic(expected = "before the registry is initialized")]
    fn test_find_before_initialize_panics() {
        let mut registry = ClassRegistry::new();
        registry.register::<Shape>();
        registry.find_class_rep("Shape");
    }

    fn uninitialized() -> (ClassRegistry, ClassId) {
        let mut registry = ClassRegistry::new();
        registry.register::<Shape>();
        let shape = registry.class_id_of(TypeId::of::<Shape>()).unwrap();
        (registry, shape)
    }

    #[test]
    #[should_panic(expected = "ClassRegistry::create called before the registry is initialized")]
    fn test_create_before_initialize_panics() {
        let (registry, _) = uninitialized();
        registry.create("Shape");
    }

    #[test]
    #[should_panic(expected = "ClassRegistry::create_net called before the registry is initialized")]
    fn test_create_net_before_initialize_panics() {
        let (registry, _) = uninitialized();
        registry.create_net(NetClassGroup::Game, NetClassType::Object, 0);
    }

    #[test]
    #[should_panic(expected = "ClassRegistry::find_field called before the registry is initialized")]
    fn test_find_field_before_initialize_panics() {
        let (registry, shape) = uninitialized();
        registry.find_field(shape, "Size");
    }

    #[test]
    #[should_panic(expected = "ClassRegistry::net_class_count called before the registry is initialized")]
    fn test_net_class_count_before_initialize_panics() {
        let (registry, _) = uninitialized();
        registry.net_class_count(NetClassGroup::Game, NetClassType::Object);
    }

    #[test]
    #[should_panic(expected = "ClassRegistry::enumerate_classes called before the registry is initialized")]
    fn test_enumerate_before_initialize_panics() {
        let (registry, _) = uninitialized();
        registry.enumerate_classes(None);
    }

    #[test]
    #[should_panic(expected = "ClassRegistry::ancestors called before the registry is initialized")]
    fn test_is_class_before_initialize_panics() {
        let (registry, shape) = uninitialized();
        registry.is_class(shape, shape);
    }

    #[test]
    #[should_panic(expected = "ClassRegistry::find_container_child_root called before the registry is initialized")]
    fn test_container_query_before_initialize_panics() {
        let (registry, shape) = uninitialized();
        registry.find_container_child_root(shape, shape);
    }

    #[test]
    #[should_panic(expected = "already initialized")]
    fn test_double_initialize_panics() {
        let mut registry = ClassRegistry::new();
        registry.register::<Shape>();
        registry.initialize();
        registry.initialize();
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "Duplicate class name 'Shape'")]
    fn test_duplicate_class_panics() {
        let mut registry = ClassRegistry::new();
        registry.register::<Shape>();
        registry.register::<Shape>();
    }

    #[test]
    #[should_panic(expected = "after the registry is initialized")]
    fn test_register_after_initialize_panics() {
        let mut registry = ClassRegistry::new();
        registry.register::<Shape>();
        registry.initialize();
        registry.register::<Circle>();
    }

    #[test]
    #[should_panic(expected = "derives from a class that was never registered")]
    fn test_unregistered_parent_panics() {
        let mut registry = ClassRegistry::new();
        registry.register::<Circle>();
        registry.initialize();
    }

    #[test]
    fn test_install_once() {
        let installed = testing::installed();
        assert!(is_installed());
        assert!(std::ptr::eq(installed, registry()));
        assert!(std::ptr::eq(installed, try_registry().unwrap()));
        assert!(matches!(
            install(testing::build()),
            Err(RegistryError::AlreadyInstalled)
        ));
    }

    #[test]
    #[should_panic(expected = "before the registry is initialized")]
    fn test_install_uninitialized_panics() {
        let _ = install(ClassRegistry::new());
    }
}
