//! Class metadata records

use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;
use slotmap::new_key_type;

use conobject_engine::{string_table, Namespace, StringTableEntry};
use conobject_sdk::{NetClassGroup, NetClassType, NET_CLASS_GROUPS_COUNT};

use super::init::ClassInitContext;
use crate::callbacks::{ConnectedCallback, DeclaredCallback};
use crate::fields::{Field, FieldBuilder, FieldList};
use crate::object::{ConsoleClass, ConsoleObject};

new_key_type! {
    /// Handle of a class inside its registry
    pub struct ClassId;
}

bitflags! {
    /// Network groups a class belongs to
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct NetGroupMask: u32 {
        const GAME = 1 << 0;
        const COMMUNITY = 1 << 1;
        const GROUP_3 = 1 << 2;
        const GROUP_4 = 1 << 3;
    }
}

impl NetGroupMask {
    /// Check if the mask includes `group`
    pub fn has_group(self, group: NetClassGroup) -> bool {
        self.bits() & group.mask() != 0
    }
}

impl From<NetClassGroup> for NetGroupMask {
    fn from(group: NetClassGroup) -> Self {
        Self::from_bits_retain(group.mask())
    }
}

/// Builds a default instance of a class
pub type FactoryFn = fn() -> Box<dyn ConsoleObject>;

/// Runs a class's field and callback self-description
pub type InitFn = fn(&mut ClassInitContext);

fn create_default<T: ConsoleClass>() -> Box<dyn ConsoleObject> {
    Box::new(T::default())
}

fn init_class<T: ConsoleClass>(ctx: &mut ClassInitContext) {
    T::init_persist_fields(ctx.fields_mut());
    T::init_callbacks(ctx.callbacks_mut());
}

/// Metadata record of one registered class
pub struct ClassRep {
    pub(crate) id: ClassId,
    pub(crate) name: StringTableEntry,
    pub(crate) type_id: TypeId,
    pub(crate) net_class_type: Option<NetClassType>,
    pub(crate) net_groups: NetGroupMask,
    pub(crate) parent_type: Option<TypeId>,
    pub(crate) parent: Option<ClassId>,
    pub(crate) container_child_type: Option<TypeId>,
    pub(crate) container_child: Option<ClassId>,
    pub(crate) class_ids: [Option<u32>; NET_CLASS_GROUPS_COUNT],
    pub(crate) namespace: Option<Arc<Namespace>>,
    pub(crate) fields: FieldList,
    pub(crate) declared_callbacks: Vec<DeclaredCallback>,
    pub(crate) connected_callbacks: Vec<ConnectedCallback>,
    factory: FactoryFn,
    pub(crate) init: InitFn,
}

impl ClassRep {
    /// Build the record for a Rust type
    pub fn of<T: ConsoleClass>() -> Self {
        Self {
            id: ClassId::default(),
            name: string_table::insert(T::CLASS_NAME),
            type_id: TypeId::of::<T>(),
            net_class_type: T::NET_CLASS_TYPE,
            net_groups: T::NET_GROUPS,
            parent_type: T::parent_class(),
            parent: None,
            container_child_type: T::container_child_class(),
            container_child: None,
            class_ids: [None; NET_CLASS_GROUPS_COUNT],
            namespace: None,
            fields: FieldList::default(),
            declared_callbacks: Vec::new(),
            connected_callbacks: Vec::new(),
            factory: create_default::<T>,
            init: init_class::<T>,
        }
    }

    /// Give the class a field list up front
    ///
    /// Fields staged by the class's own description during initialization
    /// are then dropped.
    pub fn with_fields(mut self, fields: FieldBuilder) -> Self {
        self.fields = fields.into_fields();
        self
    }

    /// Get the handle of this class in its registry
    pub fn id(&self) -> ClassId {
        self.id
    }

    /// Get the class name
    pub fn name(&self) -> StringTableEntry {
        self.name
    }

    /// Get the Rust type backing this class
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Get the network class type
    pub fn net_class_type(&self) -> Option<NetClassType> {
        self.net_class_type
    }

    /// Get the network group mask
    pub fn net_groups(&self) -> NetGroupMask {
        self.net_groups
    }

    /// Get the parent class
    pub fn parent(&self) -> Option<ClassId> {
        self.parent
    }

    /// Get the class this class accepts as container children (own declaration only)
    pub fn container_child(&self) -> Option<ClassId> {
        self.container_child
    }

    /// Get the network class ID within `group`
    ///
    /// Only meaningful after initialization, and only for the run that
    /// assigned it.
    pub fn class_id(&self, group: NetClassGroup) -> Option<u32> {
        self.class_ids[group.index()]
    }

    /// Get the bound console namespace
    pub fn namespace(&self) -> Option<&Arc<Namespace>> {
        self.namespace.as_ref()
    }

    /// Get this class's own fields
    pub fn fields(&self) -> &FieldList {
        &self.fields
    }

    /// Find one of this class's own fields by name
    pub fn find_field(&self, name: StringTableEntry) -> Option<&Field> {
        self.fields.find(name)
    }

    /// Get this class's own declared callbacks
    pub fn declared_callbacks(&self) -> &[DeclaredCallback] {
        &self.declared_callbacks
    }

    /// Find one of this class's own declared callbacks by name
    pub fn find_declared_callback(&self, name: StringTableEntry) -> Option<&DeclaredCallback> {
        self.declared_callbacks.iter().find(|cb| cb.name() == name)
    }

    /// Get the callbacks connected at this level of the hierarchy
    pub fn connected_callbacks(&self) -> &[ConnectedCallback] {
        &self.connected_callbacks
    }

    /// Find the first callback connected at this level under `name`
    pub fn find_connected_callback(&self, name: StringTableEntry) -> Option<&ConnectedCallback> {
        self.connected_callbacks
            .iter()
            .find(|cb| cb.declared().name() == name)
    }

    /// Build a default instance of this class
    pub fn create(&self) -> Box<dyn ConsoleObject> {
        (self.factory)()
    }
}

impl fmt::Debug for ClassRep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassRep")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("net_class_type", &self.net_class_type)
            .field("net_groups", &self.net_groups)
            .field("parent", &self.parent)
            .field("class_ids", &self.class_ids)
            .field("fields", &self.fields.len())
            .field("declared_callbacks", &self.declared_callbacks)
            .field("connected_callbacks", &self.connected_callbacks.len())
            .finish()
    }
}
