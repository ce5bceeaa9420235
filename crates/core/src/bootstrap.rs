//! Ordered start-up of the class registry
//!
//! Each module exposes one registration function that registers its classes
//! and queues its callback implementations. A [`Bootstrap`] runs those
//! functions in the order they were added, then initializes the registry and
//! connects callbacks.
//!
//! # Example
//!
//! ```ignore
//! let registry = Bootstrap::new()
//!     .with_config(&config)
//!     .module("shapes", shapes::register)
//!     .module("particles", particles::register)
//!     .install()?;
//! ```

use tracing::{debug, info, warn};

use crate::callbacks::ConnectPolicy;
use crate::config::CoreConfig;
use crate::registry::{self, ClassRegistry, RegistryResult};

/// Registration entry point of one module
pub type ModuleRegisterFn = fn(&mut ClassRegistry);

struct Module {
    name: &'static str,
    register: ModuleRegisterFn,
}

/// Ordered list of module registration functions
pub struct Bootstrap {
    modules: Vec<Module>,
    policy: ConnectPolicy,
}

impl Default for Bootstrap {
    fn default() -> Self {
        Self::new()
    }
}

impl Bootstrap {
    pub fn new() -> Self {
        Self {
            modules: Vec::new(),
            policy: ConnectPolicy::default(),
        }
    }

    pub fn with_config(self, config: &CoreConfig) -> Self {
        self.with_policy(config.connect_policy)
    }

    pub fn with_policy(mut self, policy: ConnectPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Append a module
    ///
    /// Modules run in the order they are added. A module name added twice
    /// is ignored after the first.
    pub fn module(mut self, name: &'static str, register: ModuleRegisterFn) -> Self {
        if self.modules.iter().any(|m| m.name == name) {
            warn!("Module '{}' added twice, ignoring", name);
            return self;
        }
        self.modules.push(Module { name, register });
        self
    }

    /// Module names in run order
    pub fn module_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.modules.iter().map(|m| m.name)
    }

    /// Register every module, initialize, and connect callbacks
    #[tracing::instrument(skip_all)]
    pub fn run(self) -> ClassRegistry {
        let mut registry = ClassRegistry::with_policy(self.policy);

        for module in &self.modules {
            let before = registry.len();
            (module.register)(&mut registry);
            debug!(
                "Module {} registered {} classes",
                module.name,
                registry.len() - before
            );
        }

        registry.initialize();
        let connected = registry.connect_all_callbacks();

        info!(
            "Bootstrap complete: {} modules, {} classes, {} callbacks",
            self.modules.len(),
            registry.len(),
            connected
        );
        registry
    }

    /// Run and install the result as the process-wide registry
    pub fn install(self) -> RegistryResult<&'static ClassRegistry> {
        registry::install(self.run())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{self, Shape, ShapeGroup};

    fn register_shape(registry: &mut ClassRegistry) {
        registry.register::<Shape>();
    }

    fn register_group(registry: &mut ClassRegistry) {
        registry.register::<ShapeGroup>();
    }

    #[test]
    fn test_module_order() {
        let bootstrap = Bootstrap::new()
            .module("groups", register_group)
            .module("shapes", register_shape)
            .module("groups", register_shape);
        assert_eq!(bootstrap.module_names().collect::<Vec<_>>(), ["groups", "shapes"]);

        let registry = bootstrap.run();
        let names: Vec<&str> = registry.iter().map(|rep| rep.name().as_str()).collect();
        assert_eq!(names, ["ShapeGroup", "Shape"]);
    }

    #[test]
    fn test_run_initializes_and_connects() {
        let registry = Bootstrap::default().module("test_shapes", testing::register).run();
        assert!(registry.is_initialized());
        assert!(registry.callbacks_connected());
        assert_eq!(registry.connect_policy(), ConnectPolicy::Lenient);
    }

    #[test]
    fn test_policy_from_config() {
        let config = CoreConfig {
            connect_policy: ConnectPolicy::Strict,
            ..CoreConfig::default()
        };
        let registry = Bootstrap::new().with_config(&config).run();
        assert_eq!(registry.connect_policy(), ConnectPolicy::Strict);
        assert!(registry.is_empty());
    }
}
