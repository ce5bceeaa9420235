//! Shared test classes
//!
//! ```text
//! Shape (object: game|community)      ShapeGroup (datablock: game, holds Shape)
//! ├── Circle (object: game)           └── Layer
//! └── Square (object: game)
//! ```

use std::sync::Once;

use crate::fields::{EnumEntry, EnumTable, IntRangeValidator};
use crate::{
    console_callback, install, registry, Bootstrap, CallbackDeclarations, ClassRegistry,
    ConsoleObject, ConsoleType, FieldBuilder, ReturnType, VoidCallbackData,
};

pub static BLEND_MODES: EnumTable = EnumTable::new(&[
    EnumEntry { value: 0, label: "Normal" },
    EnumEntry { value: 1, label: "Additive" },
    EnumEntry { value: 2, label: "Multiply" },
]);

#[derive(Debug, Default, ConsoleObject)]
#[console(
    class = "Shape",
    net_type = "object",
    net_groups = "game|community",
    callbacks = "Shape::declare_callbacks"
)]
pub struct Shape {
    #[console(field = "Size", docs = "Radius or half-extent")]
    pub size: f32,

    #[console(field = "Color")]
    pub color: [i32; 3],

    #[console(field = "Blend", table = "BLEND_MODES")]
    pub blend: i32,
}

impl Shape {
    fn declare_callbacks(callbacks: &mut CallbackDeclarations) {
        callbacks.declare("GetArea", ReturnType::Float);
        callbacks.declare("Describe", ReturnType::String);
    }
}

#[derive(Debug, Default, ConsoleObject)]
#[console(
    class = "Circle",
    net_type = "object",
    persist_fields = "Circle::extra_fields",
    callbacks = "Circle::declare_callbacks"
)]
pub struct Circle {
    #[console(parent)]
    pub base: Shape,

    pub segments: i32,

    pub draws: u32,
}

impl Circle {
    fn extra_fields(fields: &mut FieldBuilder) {
        fields.add_group("Tessellation", None);
        fields.add_field_v(
            "Segments",
            ConsoleType::S32,
            core::mem::offset_of!(Circle, segments),
            Box::new(IntRangeValidator::new(3, 64)),
        );
        fields.end_group("Tessellation");
        fields.add_deprecated_field("Smoothness");
    }

    fn declare_callbacks(callbacks: &mut CallbackDeclarations) {
        callbacks.declare("OnDraw", ReturnType::Void);
    }
}

#[derive(Debug, Default, ConsoleObject)]
#[console(
    class = "Square",
    net_type = "object",
    persist_fields = "Square::extra_fields",
    callbacks = "Square::declare_callbacks"
)]
pub struct Square {
    #[console(parent)]
    pub base: Shape,

    pub label: String,
}

impl Square {
    fn extra_fields(fields: &mut FieldBuilder) {
        fields.add_protected_field(
            "Label",
            ConsoleType::String,
            core::mem::offset_of!(Square, label),
            Square::set_label,
            Square::get_label,
        );
    }

    fn declare_callbacks(callbacks: &mut CallbackDeclarations) {
        callbacks.declare("CanHold", ReturnType::Bool);
        callbacks.declare("Corners", ReturnType::Int);
    }

    fn set_label(_obj: &mut dyn ConsoleObject, value: &str) -> bool {
        !value.is_empty()
    }

    fn get_label(_obj: &dyn ConsoleObject, value: &str) -> String {
        value.to_uppercase()
    }
}

#[derive(Debug, Default, ConsoleObject)]
#[console(
    class = "ShapeGroup",
    net_type = "datablock",
    container_child = "Shape"
)]
pub struct ShapeGroup {
    #[console(field = "Visible")]
    pub visible: bool,
}

#[derive(Debug, Default, ConsoleObject)]
#[console(class = "Layer")]
pub struct Layer {
    #[console(parent)]
    pub base: ShapeGroup,

    #[console(field = "Depth")]
    pub depth: u32,
}

#[console_callback(Shape, "GetArea")]
fn shape_area(shape: &mut Shape) -> f32 {
    shape.size * shape.size
}

#[console_callback(Shape, "Describe")]
fn shape_describe(shape: &mut Shape, prefix: &String) -> String {
    format!("{} shape of size {}", prefix, shape.size)
}

#[console_callback(Circle, "OnDraw")]
fn circle_draw(circle: &mut Circle, _data: &VoidCallbackData) {
    circle.draws += 1;
}

#[console_callback(Square, "CanHold")]
fn square_can_hold(square: &mut Square, size: &f32) -> bool {
    *size <= square.base.size
}

/// Registers the test classes, children before parents
pub fn register(registry: &mut ClassRegistry) {
    registry.register::<Circle>();
    registry.register::<Shape>();
    registry.register::<Square>();
    registry.register::<ShapeGroup>();
    registry.register::<Layer>();

    shape_area_register(registry);
    shape_describe_register(registry);
    circle_draw_register(registry);
    square_can_hold_register(registry);
}

/// A fully bootstrapped registry private to the caller
pub fn build() -> ClassRegistry {
    Bootstrap::new().module("test_shapes", register).run()
}

/// The process-wide registry, installed on first use
pub fn installed() -> &'static ClassRegistry {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| {
        install(build()).expect("test registry installs once");
    });
    registry()
}
