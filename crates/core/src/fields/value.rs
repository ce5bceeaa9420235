//! Rust storage types for reflected fields

use conobject_sdk::ConsoleType;

/// A scalar that can live in a reflected field
///
/// Maps a Rust type to its console type tag and its string representation.
pub trait ConsoleValue: Clone + Send + Sync + 'static {
    /// Console type tag of this Rust type
    const CONSOLE_TYPE: ConsoleType;

    /// Parse from a string
    fn from_str(s: &str) -> Option<Self>;

    /// Convert to a string representation
    fn to_string_value(&self) -> String;
}

impl ConsoleValue for bool {
    const CONSOLE_TYPE: ConsoleType = ConsoleType::Bool;

    fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" | "" => Some(false),
            _ => None,
        }
    }

    fn to_string_value(&self) -> String {
        if *self { "1" } else { "0" }.to_string()
    }
}

impl ConsoleValue for i8 {
    const CONSOLE_TYPE: ConsoleType = ConsoleType::S8;

    fn from_str(s: &str) -> Option<Self> {
        s.trim().parse().ok()
    }

    fn to_string_value(&self) -> String {
        ToString::to_string(self)
    }
}

impl ConsoleValue for i32 {
    const CONSOLE_TYPE: ConsoleType = ConsoleType::S32;

    fn from_str(s: &str) -> Option<Self> {
        s.trim().parse().ok()
    }

    fn to_string_value(&self) -> String {
        ToString::to_string(self)
    }
}

impl ConsoleValue for u32 {
    const CONSOLE_TYPE: ConsoleType = ConsoleType::U32;

    fn from_str(s: &str) -> Option<Self> {
        s.trim().parse().ok()
    }

    fn to_string_value(&self) -> String {
        ToString::to_string(self)
    }
}

impl ConsoleValue for f32 {
    const CONSOLE_TYPE: ConsoleType = ConsoleType::F32;

    fn from_str(s: &str) -> Option<Self> {
        s.trim().parse().ok()
    }

    fn to_string_value(&self) -> String {
        ToString::to_string(self)
    }
}

impl ConsoleValue for String {
    const CONSOLE_TYPE: ConsoleType = ConsoleType::String;

    fn from_str(s: &str) -> Option<Self> {
        Some(s.to_string())
    }

    fn to_string_value(&self) -> String {
        self.clone()
    }
}

/// Storage layout of a reflected field: a scalar or a fixed-size array
///
/// Used by [`FieldBuilder::add_value_field`](super::FieldBuilder::add_value_field)
/// and the derive macro to pick the console type and element count.
pub trait FieldStorage: 'static {
    /// Scalar element type
    type Element: ConsoleValue;

    /// Console type tag of each element
    const CONSOLE_TYPE: ConsoleType = <Self::Element as ConsoleValue>::CONSOLE_TYPE;

    /// Number of elements
    const ELEMENT_COUNT: usize;
}

macro_rules! impl_scalar_storage {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FieldStorage for $ty {
                type Element = $ty;
                const ELEMENT_COUNT: usize = 1;
            }
        )*
    };
}

impl_scalar_storage!(bool, i8, i32, u32, f32, String);

impl<T: ConsoleValue, const N: usize> FieldStorage for [T; N] {
    type Element = T;
    const ELEMENT_COUNT: usize = N;
}

/// Size in bytes of one element of `ty`
pub const fn element_size(ty: ConsoleType) -> usize {
    match ty {
        ConsoleType::Bool => size_of::<bool>(),
        ConsoleType::S8 => size_of::<i8>(),
        ConsoleType::S32 | ConsoleType::Enum => size_of::<i32>(),
        ConsoleType::U32 => size_of::<u32>(),
        ConsoleType::F32 => size_of::<f32>(),
        ConsoleType::String => size_of::<String>(),
    }
}
