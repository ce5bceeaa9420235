//! Registry initialization

use tracing::{debug, info, warn};

use super::network::NetClassTable;
use super::ClassRegistry;
use crate::callbacks::{CallbackDeclarations, DeclaredCallback};
use crate::fields::{FieldBuilder, FieldList};

/// Staging area handed to a class's self-description
///
/// Holds the fields and callbacks one class declares; its contents are moved
/// into the class once the description finishes.
#[derive(Debug, Default)]
pub struct ClassInitContext {
    fields: FieldBuilder,
    callbacks: CallbackDeclarations,
}

impl ClassInitContext {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub fn fields_mut(&mut self) -> &mut FieldBuilder {
        &mut self.fields
    }

    pub fn callbacks_mut(&mut self) -> &mut CallbackDeclarations {
        &mut self.callbacks
    }

    fn finish(self) -> (FieldList, Vec<DeclaredCallback>) {
        (self.fields.into_fields(), self.callbacks.into_vec())
    }
}

impl ClassRegistry {
    /// Finish registration
    ///
    /// Resolves parents, binds and links console namespaces, runs every
    /// class's field and callback description, and assigns network class IDs.
    ///
    /// # Panics
    /// Panics if called twice or if a class's parent was never registered.
    #[tracing::instrument(skip_all)]
    pub fn initialize(&mut self) {
        if self.initialized {
            panic!("Class registry is already initialized");
        }

        self.resolve_hierarchy();
        self.bind_namespaces();
        self.describe_classes();
        self.net_classes = NetClassTable::build(&mut self.classes, &self.order);
        self.initialized = true;

        info!(
            "Class registry initialized: {} classes, {} namespaces, {} pending callbacks",
            self.order.len(),
            self.namespaces.len(),
            self.constructors.len()
        );
    }

    fn resolve_hierarchy(&mut self) {
        for &id in &self.order {
            let rep = &self.classes[id];

            let parent = rep.parent_type.map(|ty| match self.by_type.get(&ty) {
                Some(&parent) => parent,
                None => panic!(
                    "Class '{}' derives from a class that was never registered",
                    rep.name
                ),
            });

            let container_child = rep.container_child_type.and_then(|ty| {
                let child = self.by_type.get(&ty).copied();
                if child.is_none() {
                    warn!(
                        "Class '{}' accepts container children of an unregistered class",
                        rep.name
                    );
                }
                child
            });

            let rep = &mut self.classes[id];
            rep.parent = parent;
            rep.container_child = container_child;
        }
    }

    fn bind_namespaces(&mut self) {
        for &id in &self.order {
            let name = self.classes[id].name;
            let namespace = self.namespaces.lookup(name);
            namespace.bind_class(name);

            if let Some(parent) = self.classes[id].parent {
                let parent_namespace = self.namespaces.lookup(self.classes[parent].name);
                if let Err(e) = namespace.class_link_to(&parent_namespace) {
                    warn!("Namespace link failed for class '{}': {}", name, e);
                }
            }

            self.classes[id].namespace = Some(namespace);
        }
    }

    fn describe_classes(&mut self) {
        for &id in &self.order {
            let rep = &mut self.classes[id];

            let mut ctx = ClassInitContext::new();
            (rep.init)(&mut ctx);
            let (fields, callbacks) = ctx.finish();

            if rep.fields.is_empty() {
                rep.fields = fields;
            } else if !fields.is_empty() {
                debug!(
                    "Class '{}' already has fields, dropping {} staged",
                    rep.name,
                    fields.len()
                );
            }
            if !callbacks.is_empty() {
                rep.declared_callbacks = callbacks;
            }

            debug!(
                "Described class {}: {} fields, {} callbacks",
                rep.name,
                rep.fields.len(),
                rep.declared_callbacks.len()
            );
        }
    }
}
