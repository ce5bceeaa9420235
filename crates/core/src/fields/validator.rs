//! Field value validators
//!
//! A validator is attached to a field with
//! [`FieldBuilder::add_field_v`](super::FieldBuilder::add_field_v) and runs
//! after every string write to that field. The builder tells the validator
//! its position in the field list so diagnostics can name the field.

use std::any::Any;
use std::fmt;

use tracing::warn;

/// Post-write check applied to a validated field
pub trait FieldValidator: fmt::Debug + Send + Sync {
    /// Record the index of the field this validator is attached to
    fn set_field_index(&mut self, index: usize);

    /// Index of the field this validator is attached to
    fn field_index(&self) -> usize;

    /// Check, and possibly correct, a freshly written element
    ///
    /// `value` points at the element storage (`f32`, `i32`, ...). Validators
    /// ignore values of a type they do not handle.
    fn validate(&self, class_name: &str, field_name: &str, value: &mut dyn Any);
}

/// Clamps `f32` fields to an inclusive range
#[derive(Debug, Clone)]
pub struct FloatRangeValidator {
    min: f32,
    max: f32,
    field_index: usize,
}

impl FloatRangeValidator {
    /// # Panics
    /// Panics if `min > max` or either bound is NaN.
    pub fn new(min: f32, max: f32) -> Self {
        assert!(min <= max, "FloatRangeValidator: min {} > max {}", min, max);
        Self {
            min,
            max,
            field_index: 0,
        }
    }
}

impl FieldValidator for FloatRangeValidator {
    fn set_field_index(&mut self, index: usize) {
        self.field_index = index;
    }

    fn field_index(&self) -> usize {
        self.field_index
    }

    fn validate(&self, class_name: &str, field_name: &str, value: &mut dyn Any) {
        let Some(v) = value.downcast_mut::<f32>() else {
            return;
        };
        if *v < self.min || *v > self.max {
            let clamped = v.clamp(self.min, self.max);
            warn!(
                "{}.{}: value {} out of range [{}, {}], clamped to {}",
                class_name, field_name, v, self.min, self.max, clamped
            );
            *v = clamped;
        }
    }
}

/// Clamps `i32` fields to an inclusive range, optionally scaling first
#[derive(Debug, Clone)]
pub struct IntRangeValidator {
    min: i32,
    max: i32,
    factor: Option<i32>,
    field_index: usize,
}

impl IntRangeValidator {
    /// # Panics
    /// Panics if `min > max`.
    pub fn new(min: i32, max: i32) -> Self {
        assert!(min <= max, "IntRangeValidator: min {} > max {}", min, max);
        Self {
            min,
            max,
            factor: None,
            field_index: 0,
        }
    }

    /// Multiply written values by `factor` before clamping
    pub fn scaled(min: i32, max: i32, factor: i32) -> Self {
        Self {
            factor: Some(factor),
            ..Self::new(min, max)
        }
    }
}

impl FieldValidator for IntRangeValidator {
    fn set_field_index(&mut self, index: usize) {
        self.field_index = index;
    }

    fn field_index(&self) -> usize {
        self.field_index
    }

    fn validate(&self, class_name: &str, field_name: &str, value: &mut dyn Any) {
        let Some(v) = value.downcast_mut::<i32>() else {
            return;
        };
        if let Some(factor) = self.factor {
            *v = v.saturating_mul(factor);
        }
        if *v < self.min || *v > self.max {
            let clamped = (*v).clamp(self.min, self.max);
            warn!(
                "{}.{}: value {} out of range [{}, {}], clamped to {}",
                class_name, field_name, v, self.min, self.max, clamped
            );
            *v = clamped;
        }
    }
}
