//! Console-facing helpers
//!
//! Text views of the registry as the console prints them.

use std::fmt::Write;

use crate::fields::{FieldError, FieldKind};
use crate::object::ConsoleObject;
use crate::registry::{ClassId, ClassRegistry};

/// Tab-separated names of every class that is, or derives from, `base`
///
/// Empty when `base` names no class.
pub fn enumerate_console_classes(registry: &ClassRegistry, base: Option<&str>) -> String {
    registry
        .enumerate_classes(base)
        .into_iter()
        .map(|id| registry[id].name().as_str())
        .collect::<Vec<_>>()
        .join("\t")
}

/// Multi-line description of a class: hierarchy, fields and callbacks
pub fn dump_class(registry: &ClassRegistry, id: ClassId) -> String {
    let rep = &registry[id];
    let mut out = String::new();

    let chain: Vec<&str> = registry
        .ancestors(id)
        .map(|class| registry[class].name().as_str())
        .collect();
    let _ = writeln!(out, "Class: {}", chain.join(" -> "));

    if let Some(class_type) = rep.net_class_type() {
        let _ = writeln!(out, "  Network: {:?} {:?}", class_type, rep.net_groups());
    }

    for class in registry.ancestors(id) {
        let owner = &registry[class];
        for field in owner.fields() {
            match field.kind() {
                FieldKind::Data(ty) => {
                    let _ = write!(out, "  {} {}", ty.name(), field.name());
                    if field.element_count() > 1 {
                        let _ = write!(out, "[{}]", field.element_count());
                    }
                    if class != id {
                        let _ = write!(out, " ({})", owner.name());
                    }
                    if let Some(docs) = field.docs() {
                        let _ = write!(out, " - {}", docs);
                    }
                    out.push('\n');
                }
                FieldKind::StartGroup => {
                    let group = field.group().map(|g| g.as_str()).unwrap_or_default();
                    let _ = writeln!(out, "  [{}]", group);
                }
                FieldKind::EndGroup | FieldKind::Deprecated => {}
            }
        }
    }

    for class in registry.ancestors(id) {
        for declared in registry[class].declared_callbacks() {
            let _ = writeln!(
                out,
                "  callback {} {}()",
                declared.return_type(),
                declared.name()
            );
        }
    }

    out
}

/// Field values of `obj` that its write hooks allow to persist
///
/// Fields are listed root class first; array elements as `Name[i]`.
///
/// # Safety
/// Same requirements as [`ClassRegistry::get_data_field`].
pub unsafe fn persisted_fields(
    registry: &ClassRegistry,
    obj: &dyn ConsoleObject,
) -> Result<Vec<(String, String)>, FieldError> {
    let Some(class) = registry.class_of(obj) else {
        return Err(FieldError::ClassMismatch {
            object: obj.class_name().to_string(),
            class: obj.class_name().to_string(),
        });
    };

    let mut chain: Vec<ClassId> = registry.ancestors(class).collect();
    chain.reverse();

    let mut values = Vec::new();
    for owner in chain {
        for field in registry[owner].fields() {
            if field.console_type().is_none() || !(field.write_data_fn())(obj, field.name()) {
                continue;
            }
            for index in 0..field.element_count() {
                let value = registry.get_data_field(obj, &field.name(), index)?;
                let name = if field.element_count() > 1 {
                    format!("{}[{}]", field.name(), index)
                } else {
                    field.name().to_string()
                };
                values.push((name, value));
            }
        }
    }
    Ok(values)
}
