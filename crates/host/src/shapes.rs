//! Demo classes

use conobject_core::{
    console_callback, CallbackDeclarations, ClassRegistry, ConsoleObject, ReturnType,
};

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
}

impl Shape {
    fn declare_callbacks(callbacks: &mut CallbackDeclarations) {
        callbacks.declare("GetArea", ReturnType::Float);
    }
}

#[derive(Debug, Default, ConsoleObject)]
#[console(class = "Circle", net_type = "object", callbacks = "Circle::declare_callbacks")]
pub struct Circle {
    #[console(parent)]
    pub base: Shape,

    #[console(field = "Segments")]
    pub segments: i32,

    pub draws: u32,
}

impl Circle {
    fn declare_callbacks(callbacks: &mut CallbackDeclarations) {
        callbacks.declare("OnDraw", ReturnType::Void);
    }
}

#[console_callback(Shape, "GetArea")]
fn shape_area(shape: &mut Shape) -> f32 {
    shape.size * shape.size
}

#[console_callback(Circle, "OnDraw")]
fn circle_draw(circle: &mut Circle) {
    circle.draws += 1;
    tracing::info!("Drawing circle #{} with {} segments", circle.draws, circle.segments);
}

pub fn register(registry: &mut ClassRegistry) {
    registry.register::<Shape>();
    registry.register::<Circle>();

    shape_area_register(registry);
    circle_draw_register(registry);
}
