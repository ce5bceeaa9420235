//! Persistent field reflection
//!
//! Each class describes its own persistent fields once, during registry
//! initialization, by adding them to a [`FieldBuilder`]. The result is a
//! [`FieldList`] stored on the class's [`ClassRep`](crate::ClassRep).
//! Inherited fields are not copied down; lookups walk the class hierarchy.
//!
//! A [`Field`] records where an attribute lives (a byte offset into the
//! declaring class's struct), what it holds ([`ConsoleType`] and element
//! count) and how the console reaches it (get/set/write hooks and an
//! optional [`FieldValidator`]).

mod access;
mod builder;
mod enums;
mod validator;
mod value;

use std::fmt;

use conobject_engine::StringTableEntry;
use conobject_sdk::ConsoleType;

use crate::object::ConsoleObject;

pub use access::ConsoleField;
pub(crate) use access::{read_element, write_element};
pub use builder::FieldBuilder;
pub use enums::{EnumEntry, EnumTable};
pub use validator::{FieldValidator, FloatRangeValidator, IntRangeValidator};
pub use value::{element_size, ConsoleValue, FieldStorage};

/// Decides whether a string write to a field goes ahead
///
/// Receives the object and the incoming value.
pub type SetDataNotify = fn(&mut dyn ConsoleObject, &str) -> bool;

/// Produces the string the console sees when reading a field
///
/// Receives the object and the stored value already converted to a string.
pub type GetDataNotify = fn(&dyn ConsoleObject, &str) -> String;

/// Decides whether a field is written out when the object is persisted
pub type WriteDataNotify = fn(&dyn ConsoleObject, StringTableEntry) -> bool;

/// Default set hook: always allow the write
pub fn default_protected_set_fn(_obj: &mut dyn ConsoleObject, _data: &str) -> bool {
    true
}

/// Default get hook: expose the stored value unchanged
pub fn default_protected_get_fn(_obj: &dyn ConsoleObject, data: &str) -> String {
    data.to_string()
}

/// Default write hook: always persist
pub fn default_protected_write_fn(_obj: &dyn ConsoleObject, _field: StringTableEntry) -> bool {
    true
}

/// Field access errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("Class '{class}' has no field '{field}'")]
    NotFound { class: String, field: String },

    #[error("Index {index} out of range for field '{field}' ({count} elements)")]
    IndexOutOfRange {
        field: String,
        index: usize,
        count: usize,
    },

    #[error("Field '{0}' has no storage")]
    NoStorage(String),

    #[error("Field '{field}' is {actual}, not {expected}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Invalid value '{value}' for field '{field}' ({ty})")]
    InvalidValue {
        field: String,
        value: String,
        ty: &'static str,
    },

    #[error("Field '{field}' extends past the end of its {size}-byte object")]
    OutOfBounds { field: String, size: usize },

    #[error("Object of class '{object}' has no '{class}' part")]
    ClassMismatch { object: String, class: String },

    #[error("No class registry installed")]
    NoRegistry,
}

/// What a field entry stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Stored data of the given type
    Data(ConsoleType),
    /// Opens a named group of fields
    StartGroup,
    /// Closes a named group of fields
    EndGroup,
    /// A retired field name with no storage
    Deprecated,
}

/// Descriptor of one persistent attribute
pub struct Field {
    pub(crate) name: StringTableEntry,
    pub(crate) group: Option<StringTableEntry>,
    pub(crate) docs: Option<String>,
    pub(crate) kind: FieldKind,
    pub(crate) offset: usize,
    pub(crate) element_count: usize,
    pub(crate) table: Option<&'static EnumTable>,
    pub(crate) validator: Option<Box<dyn FieldValidator>>,
    pub(crate) set_data_fn: SetDataNotify,
    pub(crate) get_data_fn: GetDataNotify,
    pub(crate) write_data_fn: WriteDataNotify,
}

impl Field {
    pub(crate) fn new(name: StringTableEntry, kind: FieldKind, offset: usize) -> Self {
        Self {
            name,
            group: None,
            docs: None,
            kind,
            offset,
            element_count: 1,
            table: None,
            validator: None,
            set_data_fn: default_protected_set_fn,
            get_data_fn: default_protected_get_fn,
            write_data_fn: default_protected_write_fn,
        }
    }

    pub fn name(&self) -> StringTableEntry {
        self.name
    }

    pub fn group(&self) -> Option<StringTableEntry> {
        self.group
    }

    pub fn docs(&self) -> Option<&str> {
        self.docs.as_deref()
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Console type of stored data, `None` for markers and deprecated names
    pub fn console_type(&self) -> Option<ConsoleType> {
        match self.kind {
            FieldKind::Data(ty) => Some(ty),
            _ => None,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn element_count(&self) -> usize {
        self.element_count
    }

    pub fn table(&self) -> Option<&'static EnumTable> {
        self.table
    }

    pub fn validator(&self) -> Option<&dyn FieldValidator> {
        self.validator.as_deref()
    }

    /// Check if writes to this field are validated
    pub fn is_validated(&self) -> bool {
        self.validator.is_some()
    }

    pub fn set_data_fn(&self) -> SetDataNotify {
        self.set_data_fn
    }

    pub fn get_data_fn(&self) -> GetDataNotify {
        self.get_data_fn
    }

    pub fn write_data_fn(&self) -> WriteDataNotify {
        self.write_data_fn
    }

    /// Attach documentation
    pub fn with_docs(&mut self, docs: &str) -> &mut Self {
        self.docs = Some(docs.to_string());
        self
    }

    /// Declare a fixed-size array of `count` elements
    pub fn with_element_count(&mut self, count: usize) -> &mut Self {
        self.element_count = count;
        self
    }

    /// Attach a value/label table (used by `Enum` fields)
    pub fn with_table(&mut self, table: &'static EnumTable) -> &mut Self {
        self.table = Some(table);
        self
    }

    /// Override the persistence hook
    pub fn with_write_fn(&mut self, write_fn: WriteDataNotify) -> &mut Self {
        self.write_data_fn = write_fn;
        self
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("group", &self.group)
            .field("kind", &self.kind)
            .field("offset", &self.offset)
            .field("element_count", &self.element_count)
            .field("validator", &self.validator)
            .finish_non_exhaustive()
    }
}

/// Ordered list of a class's own fields
#[derive(Debug, Default)]
pub struct FieldList {
    fields: Vec<Field>,
}

impl FieldList {
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.fields.iter()
    }

    /// Find a field by canonical name
    pub fn find(&self, name: StringTableEntry) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub(crate) fn position(&self, name: StringTableEntry) -> Option<usize> {
        self.fields.iter().position(|field| field.name == name)
    }

    pub(crate) fn push(&mut self, field: Field) -> &mut Field {
        self.fields.push(field);
        let last = self.fields.len() - 1;
        &mut self.fields[last]
    }

    pub(crate) fn remove(&mut self, index: usize) -> Field {
        let removed = self.fields.remove(index);
        for (i, field) in self.fields.iter_mut().enumerate().skip(index) {
            if let Some(validator) = field.validator.as_mut() {
                validator.set_field_index(i);
            }
        }
        removed
    }
}

impl<'a> IntoIterator for &'a FieldList {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
