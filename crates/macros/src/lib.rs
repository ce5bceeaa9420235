//! conobject Proc Macros
//!
//! This crate provides proc macros for the conobject reflection core:
//!
//! - `#[derive(ConsoleObject)]` - Describe a struct as a reflected class
//! - `#[console_callback]` - Implement a declared callback
//!
//! # ConsoleObject Example
//!
//! ```ignore
//! use conobject_core::{CallbackDeclarations, ConsoleObject, ReturnType};
//!
//! #[derive(Default, ConsoleObject)]
//! #[console(class = "Shape", net_type = "object", net_groups = "game")]
//! pub struct Shape {
//!     #[console(field = "Size", docs = "Radius or half-extent")]
//!     size: f32,
//!
//!     #[console(field = "Color")]
//!     color: [i32; 3],
//! }
//!
//! #[derive(Default, ConsoleObject)]
//! #[console(class = "Circle", callbacks = "Circle::declare_callbacks")]
//! pub struct Circle {
//!     #[console(parent)]
//!     base: Shape,
//! }
//!
//! impl Circle {
//!     fn declare_callbacks(callbacks: &mut CallbackDeclarations) {
//!         callbacks.declare("OnDraw", ReturnType::Void);
//!     }
//! }
//! ```
//!
//! # Console Callback Example
//!
//! ```ignore
//! use conobject_core::{console_callback, VoidCallbackData};
//!
//! #[console_callback(Circle, "OnDraw")]
//! fn circle_on_draw(circle: &mut Circle, _data: &VoidCallbackData) {
//!     circle.draw();
//! }
//!
//! // Generated:
//! // - circle_on_draw() - The implementation
//! // - circle_on_draw_constructor() - Build its CallbackConstructor
//! // - circle_on_draw_register(&mut registry) - Queue it with a registry
//! ```
//!
//! # Attributes
//!
//! ## Struct Attributes (ConsoleObject)
//!
//! - `#[console(class = "Name")]` - Class name (default: the struct name).
//! - `#[console(net_type = "object")]` - Network class type: object, datablock or event.
//! - `#[console(net_groups = "game|community")]` - Network groups (default: game when networked).
//! - `#[console(persist_fields = "path::to_fn")]` - Extra field declarations.
//! - `#[console(callbacks = "path::to_fn")]` - Callback declarations.
//! - `#[console(container_child = "Type")]` - Class accepted as container children.
//!
//! ## Field Attributes (ConsoleObject)
//!
//! - `#[console(parent)]` - The embedded parent class.
//! - `#[console(field = "Name")]` - Reflect as a persistent field.
//! - `#[console(docs = "...")]` - Field documentation.
//! - `#[console(table = "STATIC")]` - Enum table for an `i32` field.

mod console_callback;
mod console_object;
mod parse;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput, ItemFn};

/// Derive macro for reflected classes
///
/// Implements `ConsoleObject` (runtime identity and upcasting through the
/// `#[console(parent)]` field) and `ConsoleClass` (class metadata and field
/// declarations using `core::mem::offset_of!`).
#[proc_macro_derive(ConsoleObject, attributes(console))]
pub fn derive_console_object(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    console_object::derive_console_object(input).into()
}

/// Attribute macro for callback implementations
///
/// Keeps the function and generates `{name}_constructor()` and
/// `{name}_register(&mut ClassRegistry)`.
///
/// # Arguments
///
/// - First argument: The class the implementation belongs to
/// - Second argument: The declared callback name
#[proc_macro_attribute]
pub fn console_callback(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as console_callback::ConsoleCallbackArgs);
    let func = parse_macro_input!(item as ItemFn);
    console_callback::generate_console_callback(args, func).into()
}
