//! Staging area for a class's field declarations

use conobject_engine::string_table;
use conobject_sdk::ConsoleType;

use super::{
    Field, FieldKind, FieldList, FieldStorage, FieldValidator, GetDataNotify, SetDataNotify,
};

/// Collects the fields a class declares in `init_persist_fields`
///
/// A fresh builder is handed to each class during registry initialization;
/// whatever it holds afterwards becomes the class's [`FieldList`].
#[derive(Debug, Default)]
pub struct FieldBuilder {
    fields: FieldList,
}

impl FieldBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fields staged so far
    pub fn fields(&self) -> &FieldList {
        &self.fields
    }

    pub(crate) fn into_fields(self) -> FieldList {
        self.fields
    }

    /// Add a data field with default hooks and a single element
    ///
    /// `offset` is the byte offset of the storage inside the declaring
    /// class's struct, normally `core::mem::offset_of!(Class, field)`.
    pub fn add_field(&mut self, name: &str, ty: ConsoleType, offset: usize) -> &mut Field {
        let field = Field::new(string_table::insert(name), FieldKind::Data(ty), offset);
        self.fields.push(field)
    }

    /// Add a data field whose type and element count come from its Rust storage
    pub fn add_value_field<T: FieldStorage>(&mut self, name: &str, offset: usize) -> &mut Field {
        self.add_field(name, T::CONSOLE_TYPE, offset)
            .with_element_count(T::ELEMENT_COUNT)
    }

    /// Add a data field whose console reads and writes go through custom hooks
    pub fn add_protected_field(
        &mut self,
        name: &str,
        ty: ConsoleType,
        offset: usize,
        set_fn: SetDataNotify,
        get_fn: GetDataNotify,
    ) -> &mut Field {
        let field = self.add_field(name, ty, offset);
        field.set_data_fn = set_fn;
        field.get_data_fn = get_fn;
        field
    }

    /// Add a data field checked by `validator` after every write
    pub fn add_field_v(
        &mut self,
        name: &str,
        ty: ConsoleType,
        offset: usize,
        mut validator: Box<dyn FieldValidator>,
    ) -> &mut Field {
        validator.set_field_index(self.fields.len());
        let field = self.add_field(name, ty, offset);
        field.validator = Some(validator);
        field
    }

    /// Open a named group of fields
    pub fn add_group(&mut self, name: &str, docs: Option<&str>) {
        let field = self.add_marker(name, "begingroup", FieldKind::StartGroup);
        field.docs = docs.map(str::to_string);
    }

    /// Close a named group of fields
    pub fn end_group(&mut self, name: &str) {
        self.add_marker(name, "endgroup", FieldKind::EndGroup);
    }

    /// Reserve a retired field name so old data naming it is still accepted
    pub fn add_deprecated_field(&mut self, name: &str) {
        let mut field = Field::new(string_table::insert(name), FieldKind::Deprecated, 0);
        field.element_count = 0;
        self.fields.push(field);
    }

    /// Remove a staged field by name (case-insensitive)
    ///
    /// Returns `false` and leaves the list untouched when no staged field has
    /// that name.
    pub fn remove_field(&mut self, name: &str) -> bool {
        let Some(name) = string_table::lookup(name) else {
            return false;
        };
        match self.fields.position(name) {
            Some(index) => {
                self.fields.remove(index);
                true
            }
            None => false,
        }
    }

    fn add_marker(&mut self, group: &str, suffix: &str, kind: FieldKind) -> &mut Field {
        let marker = format!("{}_{}", group.replace(' ', "_"), suffix);
        let mut field = Field::new(string_table::insert(&marker), kind, 0);
        field.group = Some(string_table::insert(group));
        field.element_count = 0;
        self.fields.push(field)
    }
}
