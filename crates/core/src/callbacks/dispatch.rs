//! Callback invocation

use std::any::Any;

use tracing::trace;

use conobject_engine::string_table;

use super::CallbackReturn;
use crate::object::ConsoleObject;
use crate::registry::ClassRegistry;

impl ClassRegistry {
    /// Invoke the callback `name` on `obj`
    ///
    /// The nearest declaration of `name` from the object's class upward must
    /// return `R`. The first implementation connected from the object's class
    /// upward runs; `None` means no class in the chain connected one. Void
    /// callbacks that ran return `Some(())`.
    ///
    /// # Panics
    /// Panics if the object's class is unregistered, no class in the chain
    /// declares `name`, or the declaration returns something other than `R`.
    pub fn callback<R: CallbackReturn>(
        &self,
        obj: &mut dyn ConsoleObject,
        name: &str,
        data: &dyn Any,
    ) -> Option<R> {
        self.assert_initialized("callback");

        let Some(class) = self.class_of(obj) else {
            panic!(
                "Cannot invoke callback '{}': class '{}' is not registered",
                name,
                obj.class_name()
            );
        };
        let class_name = self[class].name();

        let declared = string_table::lookup(name).and_then(|entry| {
            self.ancestors(class)
                .find_map(|id| self[id].find_declared_callback(entry).copied())
        });
        let Some(declared) = declared else {
            panic!(
                "Callback '{}' is not declared by class '{}' or any of its parents",
                name, class_name
            );
        };
        if declared.return_type() != R::RETURN_TYPE {
            panic!(
                "Callback '{}' on class '{}' returns {}, not {}",
                declared.name(),
                class_name,
                declared.return_type(),
                R::RETURN_TYPE
            );
        }

        for id in self.ancestors(class) {
            let Some(connected) = self[id]
                .find_connected_callback(declared.name())
                .filter(|cb| cb.declared().return_type() == R::RETURN_TYPE)
            else {
                continue;
            };
            trace!(
                "Invoking {}::{} on {}",
                self[id].name(),
                declared.name(),
                class_name
            );
            let value = connected.function().invoke(obj, data);
            return match R::from_value(value) {
                Some(value) => Some(value),
                None => unreachable!(
                    "Callback '{}' connected with a {} body",
                    declared.name(),
                    connected.function().return_type()
                ),
            };
        }

        trace!("Callback {} on {} has no connected implementation", declared.name(), class_name);
        None
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::{self, Circle, Shape, Square};
    use crate::{ConsoleObject, VoidCallbackData};

    fn circle(size: f32) -> Box<dyn ConsoleObject> {
        let mut circle = Circle::default();
        circle.base.size = size;
        Box::new(circle)
    }

    #[test]
    fn test_inherited_implementation() {
        let registry = testing::build();
        let mut obj = circle(3.0);
        let area = registry.callback::<f32>(obj.as_mut(), "getarea", &VoidCallbackData);
        assert_eq!(area, Some(9.0));
    }

    #[test]
    fn test_void_callback() {
        let registry = testing::build();
        let mut obj = circle(1.0);
        assert_eq!(registry.callback::<()>(obj.as_mut(), "OnDraw", &VoidCallbackData), Some(()));
        assert_eq!(registry.callback::<()>(obj.as_mut(), "OnDraw", &VoidCallbackData), Some(()));
        assert_eq!(obj.as_any().downcast_ref::<Circle>().unwrap().draws, 2);
    }

    #[test]
    fn test_callback_data() {
        let registry = testing::build();
        let mut obj = circle(2.0);
        let text = registry.callback::<String>(obj.as_mut(), "Describe", &"Round".to_string());
        assert_eq!(text.as_deref(), Some("Round shape of size 2"));

        let mut square = Square::default();
        square.base.size = 5.0;
        let obj: &mut dyn ConsoleObject = &mut square;
        assert_eq!(registry.callback::<bool>(obj, "CanHold", &4.0f32), Some(true));
        assert_eq!(registry.callback::<bool>(obj, "CanHold", &6.0f32), Some(false));
    }

    #[test]
    fn test_declared_but_unconnected() {
        let registry = testing::build();
        let mut square = Square::default();
        assert_eq!(registry.callback::<i32>(&mut square, "Corners", &VoidCallbackData), None);
    }

    #[test]
    #[should_panic(expected = "is not declared by class 'Circle' or any of its parents")]
    fn test_undeclared_callback() {
        let registry = testing::build();
        registry.callback::<()>(circle(1.0).as_mut(), "OnExplode", &VoidCallbackData);
    }

    #[test]
    #[should_panic(expected = "is not declared by class 'Shape'")]
    fn test_child_declaration_not_visible_to_parent() {
        let registry = testing::build();
        let mut shape = Shape::default();
        registry.callback::<()>(&mut shape, "OnDraw", &VoidCallbackData);
    }

    #[test]
    #[should_panic(expected = "returns float, not int")]
    fn test_wrong_return_type() {
        let registry = testing::build();
        registry.callback::<i32>(circle(1.0).as_mut(), "GetArea", &VoidCallbackData);
    }

    #[test]
    #[should_panic(expected = "expects data of type")]
    fn test_wrong_data_type() {
        let registry = testing::build();
        registry.callback::<String>(circle(1.0).as_mut(), "Describe", &5i32);
    }

    #[test]
    #[should_panic(expected = "before the registry is initialized")]
    fn test_callback_before_initialize() {
        let registry = crate::ClassRegistry::new();
        registry.callback::<()>(circle(1.0).as_mut(), "OnDraw", &VoidCallbackData);
    }
}
