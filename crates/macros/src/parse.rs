//! Attribute parsing for the ConsoleObject derive macro

use darling::{FromDeriveInput, FromField};
use syn::{DeriveInput, Generics, Ident, Path, Type};

/// Parsed #[console(...)] attributes on the struct
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(console), supports(struct_named))]
pub struct ConsoleObjectArgs {
    /// Struct identifier
    pub ident: Ident,

    /// Struct generics (must be empty)
    pub generics: Generics,

    /// Struct fields
    pub data: darling::ast::Data<(), ConsoleFieldArgs>,

    /// Registered class name (defaults to the struct name)
    #[darling(rename = "class")]
    pub class_name: Option<String>,

    /// Network class type: "object", "datablock" or "event"
    pub net_type: Option<String>,

    /// Network groups, e.g. "game|community" (defaults to "game" when
    /// `net_type` is set)
    pub net_groups: Option<String>,

    /// Extra `fn(&mut FieldBuilder)` run after the derived fields
    pub persist_fields: Option<Path>,

    /// `fn(&mut CallbackDeclarations)` declaring the class's callbacks
    pub callbacks: Option<Path>,

    /// Type of objects this class accepts as container children
    pub container_child: Option<Path>,
}

/// Parsed #[console(...)] attributes on a field
#[derive(Debug, FromField)]
#[darling(attributes(console))]
pub struct ConsoleFieldArgs {
    /// Field identifier
    pub ident: Option<Ident>,

    /// Field type
    pub ty: Type,

    /// This field embeds the parent class
    #[darling(default)]
    pub parent: bool,

    /// Console field name; fields without one are not reflected
    #[darling(rename = "field")]
    pub field_name: Option<String>,

    /// Field documentation
    pub docs: Option<String>,

    /// Static `EnumTable` labelling the values of an `i32` field
    pub table: Option<Path>,
}

impl ConsoleFieldArgs {
    /// Check if this field is reflected
    pub fn is_console_field(&self) -> bool {
        self.field_name.is_some()
    }
}

/// Parse a DeriveInput into ConsoleObjectArgs
pub fn parse_console_object(input: &DeriveInput) -> darling::Result<ConsoleObjectArgs> {
    ConsoleObjectArgs::from_derive_input(input)
}

/// Map a `net_type` value to its `NetClassType` variant name
pub fn net_type_variant(value: &str) -> Option<&'static str> {
    match value.to_ascii_lowercase().as_str() {
        "object" => Some("Object"),
        "datablock" => Some("DataBlock"),
        "event" => Some("Event"),
        _ => None,
    }
}

/// Parse a `net_groups` value into group mask bits
pub fn net_group_bits(value: &str) -> Result<u32, String> {
    let mut bits = 0;
    for group in value.split(['|', ',']).map(str::trim).filter(|g| !g.is_empty()) {
        bits |= match group.to_ascii_lowercase().as_str() {
            "game" => 1 << 0,
            "community" => 1 << 1,
            "group3" | "group_3" => 1 << 2,
            "group4" | "group_4" => 1 << 3,
            other => return Err(format!("unknown network group `{}`", other)),
        };
    }
    Ok(bits)
}
