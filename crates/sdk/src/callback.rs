//! Callback return type tags
//!
//! A declared callback advertises exactly one of these return types. The same
//! tag selects the function signature of every implementation connected to it.

/// Return type of a declared callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReturnType {
    Int,
    Float,
    String,
    Bool,
    Void,
}

impl ReturnType {
    /// All return types, in declaration order
    pub const ALL: [ReturnType; 5] = [
        Self::Int,
        Self::Float,
        Self::String,
        Self::Bool,
        Self::Void,
    ];

    /// Human-readable name used in diagnostics
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::String => "string",
            Self::Bool => "bool",
            Self::Void => "void",
        }
    }
}

impl std::fmt::Display for ReturnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(ReturnType::Void.to_string(), "void");
        assert_eq!(ReturnType::Float.to_string(), "float");
    }
}
