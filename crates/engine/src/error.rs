//! Error types for namespace linkage

/// Error type for namespace operations
#[derive(Debug, thiserror::Error)]
pub enum NamespaceError {
    /// Namespace already linked to a different parent
    #[error("Cannot link namespace {namespace} to {requested}, already linked to {current}")]
    AlreadyLinked {
        namespace: String,
        current: String,
        requested: String,
    },

    /// Linking would make a namespace its own ancestor
    #[error("Linking namespace {namespace} to {parent} would create a cycle")]
    Cycle { namespace: String, parent: String },
}
