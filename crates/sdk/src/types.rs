//! Console data type tags
//!
//! Every reflected data field carries one of these tags. The tag decides how
//! the field's storage is read, written, and converted to and from the
//! console's string representation.

/// Data type of a reflected field element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConsoleType {
    /// `bool`
    Bool,
    /// `i8`
    S8,
    /// `i32`
    S32,
    /// `u32`
    U32,
    /// `f32`
    F32,
    /// Owned `String`
    String,
    /// `i32` value labelled through an enum table
    Enum,
}

impl ConsoleType {
    /// All console types, in declaration order
    pub const ALL: [ConsoleType; 7] = [
        Self::Bool,
        Self::S8,
        Self::S32,
        Self::U32,
        Self::F32,
        Self::String,
        Self::Enum,
    ];

    /// Console-facing type name (e.g., "TypeF32")
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Bool => "TypeBool",
            Self::S8 => "TypeS8",
            Self::S32 => "TypeS32",
            Self::U32 => "TypeU32",
            Self::F32 => "TypeF32",
            Self::String => "TypeString",
            Self::Enum => "TypeEnum",
        }
    }
}
