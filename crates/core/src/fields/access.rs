//! Raw field storage access
//!
//! Field offsets are byte offsets into the struct of the class that declared
//! the field. Access first upcasts an object to that class with
//! [`ConsoleObject::ancestor`], then reads or writes at the offset. Storage
//! bounds are checked against the size of the upcast part; the offset and
//! type themselves are trusted, which is why every entry point is `unsafe`.

use std::any::{Any, TypeId};
use std::marker::PhantomData;
use std::sync::OnceLock;

use conobject_sdk::ConsoleType;

use super::{element_size, ConsoleValue, Field, FieldError};
use crate::object::ConsoleObject;
use crate::registry;

fn storage_type(field: &Field) -> Result<ConsoleType, FieldError> {
    field
        .console_type()
        .ok_or_else(|| FieldError::NoStorage(field.name.to_string()))
}

fn check_element(field: &Field, ty: ConsoleType, index: usize, size: usize) -> Result<usize, FieldError> {
    if index >= field.element_count {
        return Err(FieldError::IndexOutOfRange {
            field: field.name.to_string(),
            index,
            count: field.element_count,
        });
    }
    let stride = element_size(ty);
    if field.offset + field.element_count * stride > size {
        return Err(FieldError::OutOfBounds {
            field: field.name.to_string(),
            size,
        });
    }
    Ok(field.offset + index * stride)
}

/// Read element `index` of `field` as a console string
///
/// # Safety
/// `part` must be the struct of the class that declared `field`, and the
/// field's offset must address storage of its console type.
pub(crate) unsafe fn read_element(
    field: &Field,
    part: &dyn Any,
    index: usize,
) -> Result<String, FieldError> {
    let ty = storage_type(field)?;
    let at = check_element(field, ty, index, std::mem::size_of_val(part))?;
    let ptr = (part as *const dyn Any as *const u8).add(at);

    Ok(match ty {
        ConsoleType::Bool => (*ptr.cast::<bool>()).to_string_value(),
        ConsoleType::S8 => (*ptr.cast::<i8>()).to_string_value(),
        ConsoleType::S32 => (*ptr.cast::<i32>()).to_string_value(),
        ConsoleType::U32 => (*ptr.cast::<u32>()).to_string_value(),
        ConsoleType::F32 => (*ptr.cast::<f32>()).to_string_value(),
        ConsoleType::String => (*ptr.cast::<String>()).clone(),
        ConsoleType::Enum => {
            let value = *ptr.cast::<i32>();
            match field.table {
                Some(table) => table.format(value),
                None => value.to_string(),
            }
        }
    })
}

/// Parse `value` and store it into element `index` of `field`
///
/// The field's validator, if any, sees the parsed value before it is stored.
///
/// # Safety
/// Same requirements as [`read_element`].
pub(crate) unsafe fn write_element(
    field: &Field,
    part: &mut dyn Any,
    index: usize,
    value: &str,
    class_name: &str,
) -> Result<(), FieldError> {
    let ty = storage_type(field)?;
    let at = check_element(field, ty, index, std::mem::size_of_val(part))?;
    let ptr = (part as *mut dyn Any as *mut u8).add(at);

    match ty {
        ConsoleType::Bool => store::<bool>(field, ptr, value, class_name),
        ConsoleType::S8 => store::<i8>(field, ptr, value, class_name),
        ConsoleType::S32 => store::<i32>(field, ptr, value, class_name),
        ConsoleType::U32 => store::<u32>(field, ptr, value, class_name),
        ConsoleType::F32 => store::<f32>(field, ptr, value, class_name),
        ConsoleType::String => store::<String>(field, ptr, value, class_name),
        ConsoleType::Enum => {
            let parsed = match field.table {
                Some(table) => table.parse(value),
                None => <i32 as ConsoleValue>::from_str(value),
            };
            let mut parsed = parsed.ok_or_else(|| invalid_value(field, ty, value))?;
            if let Some(validator) = field.validator.as_deref() {
                validator.validate(class_name, &field.name, &mut parsed);
            }
            *ptr.cast::<i32>() = parsed;
            Ok(())
        }
    }
}

unsafe fn store<T: ConsoleValue>(
    field: &Field,
    ptr: *mut u8,
    value: &str,
    class_name: &str,
) -> Result<(), FieldError> {
    let mut parsed = T::from_str(value).ok_or_else(|| invalid_value(field, T::CONSOLE_TYPE, value))?;
    if let Some(validator) = field.validator.as_deref() {
        validator.validate(class_name, &field.name, &mut parsed);
    }
    *ptr.cast::<T>() = parsed;
    Ok(())
}

fn invalid_value(field: &Field, ty: ConsoleType, value: &str) -> FieldError {
    FieldError::InvalidValue {
        field: field.name.to_string(),
        value: value.to_string(),
        ty: ty.name(),
    }
}

/// Where a [`ConsoleField`] lives once resolved
#[derive(Debug, Clone, Copy)]
pub struct ResolvedField {
    /// Type of the class that declared the field
    pub class: TypeId,
    pub offset: usize,
    pub element_count: usize,
}

/// A lazily-resolved typed field accessor
///
/// The field is looked up in the installed registry on first access (walking
/// up from `class_name` to the class that declares it) and cached in a
/// `OnceLock`. Typed access bypasses the protected hooks and validators.
///
/// ```ignore
/// static SIZE: ConsoleField<f32> = ConsoleField::new("Circle", "Size");
///
/// unsafe {
///     let size = SIZE.get(circle.as_ref());
///     SIZE.set(circle.as_mut(), size * 2.0);
/// }
/// ```
pub struct ConsoleField<T: ConsoleValue> {
    class_name: &'static str,
    field_name: &'static str,
    resolved: OnceLock<ResolvedField>,
    _marker: PhantomData<T>,
}

impl<T: ConsoleValue> ConsoleField<T> {
    pub const fn new(class_name: &'static str, field_name: &'static str) -> Self {
        Self {
            class_name,
            field_name,
            resolved: OnceLock::new(),
            _marker: PhantomData,
        }
    }

    /// Resolve the field (cached after first call)
    pub fn resolve(&self) -> Result<&ResolvedField, FieldError> {
        if let Some(resolved) = self.resolved.get() {
            return Ok(resolved);
        }

        let registry = registry::try_registry().ok_or(FieldError::NoRegistry)?;
        let not_found = || FieldError::NotFound {
            class: self.class_name.to_string(),
            field: self.field_name.to_string(),
        };
        let class = registry.find_class_rep(self.class_name).ok_or_else(not_found)?;
        let (declaring, field) = registry
            .find_field(class.id(), self.field_name)
            .ok_or_else(not_found)?;

        let actual = storage_type(field)?;
        if actual != T::CONSOLE_TYPE {
            return Err(FieldError::TypeMismatch {
                field: self.field_name.to_string(),
                expected: T::CONSOLE_TYPE.name(),
                actual: actual.name(),
            });
        }

        let resolved = ResolvedField {
            class: registry[declaring].type_id(),
            offset: field.offset(),
            element_count: field.element_count(),
        };
        Ok(self.resolved.get_or_init(|| resolved))
    }

    fn locate(&self, part: &dyn Any, index: usize) -> Result<usize, FieldError> {
        let resolved = self.resolve()?;
        if index >= resolved.element_count {
            return Err(FieldError::IndexOutOfRange {
                field: self.field_name.to_string(),
                index,
                count: resolved.element_count,
            });
        }
        let stride = size_of::<T>();
        let size = std::mem::size_of_val(part);
        if resolved.offset + resolved.element_count * stride > size {
            return Err(FieldError::OutOfBounds {
                field: self.field_name.to_string(),
                size,
            });
        }
        Ok(resolved.offset + index * stride)
    }

    fn mismatch(&self, obj: &dyn ConsoleObject) -> FieldError {
        FieldError::ClassMismatch {
            object: obj.class_name().to_string(),
            class: self.class_name.to_string(),
        }
    }

    /// Read element `index`
    ///
    /// # Safety
    /// The offsets registered for the declaring class must be correct for its
    /// Rust type.
    pub unsafe fn try_get_at(&self, obj: &dyn ConsoleObject, index: usize) -> Result<T, FieldError> {
        let class = self.resolve()?.class;
        let part = obj.ancestor(class).ok_or_else(|| self.mismatch(obj))?;
        let at = self.locate(part, index)?;
        let ptr = (part as *const dyn Any as *const u8).add(at);
        Ok((*ptr.cast::<T>()).clone())
    }

    /// Write element `index`
    ///
    /// # Safety
    /// Same requirements as [`ConsoleField::try_get_at`].
    pub unsafe fn try_set_at(
        &self,
        obj: &mut dyn ConsoleObject,
        index: usize,
        value: T,
    ) -> Result<(), FieldError> {
        let class = self.resolve()?.class;
        let object = obj.class_name();
        let part = obj
            .ancestor_mut(class)
            .ok_or_else(|| FieldError::ClassMismatch {
                object: object.to_string(),
                class: self.class_name.to_string(),
            })?;
        let at = self.locate(part, index)?;
        let ptr = (part as *mut dyn Any as *mut u8).add(at);
        *ptr.cast::<T>() = value;
        Ok(())
    }

    /// Read the first element
    ///
    /// # Panics
    /// Panics if the field cannot be resolved or the object lacks it.
    ///
    /// # Safety
    /// Same requirements as [`ConsoleField::try_get_at`].
    pub unsafe fn get(&self, obj: &dyn ConsoleObject) -> T {
        match self.try_get_at(obj, 0) {
            Ok(value) => value,
            Err(e) => panic!("Failed to read {}.{}: {}", self.class_name, self.field_name, e),
        }
    }

    /// Write the first element
    ///
    /// # Panics
    /// Panics if the field cannot be resolved or the object lacks it.
    ///
    /// # Safety
    /// Same requirements as [`ConsoleField::try_get_at`].
    pub unsafe fn set(&self, obj: &mut dyn ConsoleObject, value: T) {
        if let Err(e) = self.try_set_at(obj, 0, value) {
            panic!("Failed to write {}.{}: {}", self.class_name, self.field_name, e);
        }
    }

    /// Byte offset of the field inside its declaring class, if resolvable
    pub fn try_offset(&self) -> Option<usize> {
        self.resolve().ok().map(|resolved| resolved.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{self, Circle, Shape, Square};

    static SIZE: ConsoleField<f32> = ConsoleField::new("Circle", "Size");
    static COLOR: ConsoleField<i32> = ConsoleField::new("Shape", "Color");
    static SEGMENTS: ConsoleField<i32> = ConsoleField::new("Circle", "Segments");
    static WRONG_SIZE: ConsoleField<i32> = ConsoleField::new("Shape", "Size");
    static MISSING: ConsoleField<f32> = ConsoleField::new("Circle", "Radius");

    fn circle() -> Box<dyn ConsoleObject> {
        Box::new(Circle::default())
    }

    #[test]
    fn test_set_and_get_inherited_field() {
        let registry = testing::build();
        let mut obj = circle();
        unsafe {
            assert_eq!(registry.set_data_field(obj.as_mut(), "size", 0, " 2.5 "), Ok(true));
            assert_eq!(registry.get_data_field(obj.as_ref(), "Size", 0).unwrap(), "2.5");
        }
        let circle = obj.as_any().downcast_ref::<Circle>().unwrap();
        assert_eq!(circle.base.size, 2.5);
    }

    #[test]
    fn test_array_elements() {
        let registry = testing::build();
        let mut obj = circle();
        unsafe {
            registry.set_data_field(obj.as_mut(), "Color", 2, "7").unwrap();
            assert_eq!(registry.get_data_field(obj.as_ref(), "Color", 2).unwrap(), "7");
            assert_eq!(registry.get_data_field(obj.as_ref(), "Color", 0).unwrap(), "0");
            assert!(matches!(
                registry.set_data_field(obj.as_mut(), "Color", 3, "1"),
                Err(FieldError::IndexOutOfRange { index: 3, count: 3, .. })
            ));
        }
        let circle = obj.as_any().downcast_ref::<Circle>().unwrap();
        assert_eq!(circle.base.color, [0, 0, 7]);
    }

    #[test]
    fn test_enum_field() {
        let registry = testing::build();
        let mut obj: Box<dyn ConsoleObject> = Box::new(Shape::default());
        unsafe {
            registry.set_data_field(obj.as_mut(), "Blend", 0, "multiply").unwrap();
            assert_eq!(obj.as_any().downcast_ref::<Shape>().unwrap().blend, 2);
            assert_eq!(registry.get_data_field(obj.as_ref(), "Blend", 0).unwrap(), "Multiply");

            registry.set_data_field(obj.as_mut(), "Blend", 0, "9").unwrap();
            assert_eq!(registry.get_data_field(obj.as_ref(), "Blend", 0).unwrap(), "9");

            assert!(matches!(
                registry.set_data_field(obj.as_mut(), "Blend", 0, "bogus"),
                Err(FieldError::InvalidValue { .. })
            ));
        }
    }

    #[test]
    fn test_validator_clamps_on_write() {
        let registry = testing::build();
        let mut obj = circle();
        unsafe {
            registry.set_data_field(obj.as_mut(), "Segments", 0, "100").unwrap();
            assert_eq!(registry.get_data_field(obj.as_ref(), "Segments", 0).unwrap(), "64");
            registry.set_data_field(obj.as_mut(), "Segments", 0, "1").unwrap();
        }
        assert_eq!(obj.as_any().downcast_ref::<Circle>().unwrap().segments, 3);
    }

    #[test]
    fn test_protected_field_hooks() {
        let registry = testing::build();
        let mut obj: Box<dyn ConsoleObject> = Box::new(Square::default());
        unsafe {
            assert_eq!(registry.set_data_field(obj.as_mut(), "Label", 0, "box"), Ok(true));
            assert_eq!(registry.set_data_field(obj.as_mut(), "Label", 0, ""), Ok(false));
            assert_eq!(registry.get_data_field(obj.as_ref(), "Label", 0).unwrap(), "BOX");
        }
        assert_eq!(obj.as_any().downcast_ref::<Square>().unwrap().label, "box");
    }

    #[test]
    fn test_fields_without_storage() {
        let registry = testing::build();
        let mut obj = circle();
        unsafe {
            assert!(matches!(
                registry.set_data_field(obj.as_mut(), "Smoothness", 0, "1"),
                Err(FieldError::NoStorage(_))
            ));
            assert!(matches!(
                registry.get_data_field(obj.as_ref(), "Tessellation_begingroup", 0),
                Err(FieldError::NoStorage(_))
            ));
            assert!(matches!(
                registry.get_data_field(obj.as_ref(), "Visible", 0),
                Err(FieldError::NotFound { .. })
            ));
        }
    }

    #[test]
    fn test_typed_field_access() {
        testing::installed();
        let mut obj = circle();
        unsafe {
            SIZE.set(obj.as_mut(), 4.0);
            assert_eq!(SIZE.get(obj.as_ref()), 4.0);

            COLOR.try_set_at(obj.as_mut(), 1, 5).unwrap();
            assert_eq!(COLOR.try_get_at(obj.as_ref(), 1), Ok(5));
            assert!(matches!(
                COLOR.try_get_at(obj.as_ref(), 3),
                Err(FieldError::IndexOutOfRange { .. })
            ));

            // Typed access skips the validator
            SEGMENTS.set(obj.as_mut(), 500);
            assert_eq!(SEGMENTS.get(obj.as_ref()), 500);
        }
        assert_eq!(SIZE.try_offset(), Some(core::mem::offset_of!(Shape, size)));
    }

    #[test]
    fn test_typed_field_errors() {
        testing::installed();
        assert!(matches!(
            WRONG_SIZE.resolve(),
            Err(FieldError::TypeMismatch { expected: "TypeS32", actual: "TypeF32", .. })
        ));
        assert!(matches!(MISSING.resolve(), Err(FieldError::NotFound { .. })));
        assert_eq!(MISSING.try_offset(), None);

        let square: Box<dyn ConsoleObject> = Box::new(Square::default());
        unsafe {
            assert!(matches!(
                SEGMENTS.try_get_at(square.as_ref(), 0),
                Err(FieldError::ClassMismatch { .. })
            ));
        }
    }
}
