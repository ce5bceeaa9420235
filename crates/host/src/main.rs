//! conobject demo host
//!
//! Boots the process-wide class registry from the demo module, prints the
//! classes it knows, and pokes one object through fields and callbacks.

mod shapes;

use conobject_core::console::{dump_class, enumerate_console_classes, persisted_fields};
use conobject_core::{Bootstrap, ConsoleObject, CoreConfig};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn main() {
    let config = match CoreConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config, using defaults: {}", e);
            CoreConfig::default()
        }
    };

    let default_level = if config.debug { "debug" } else { "info" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .try_init();

    info!("conobject host v{} starting...", env!("CARGO_PKG_VERSION"));

    let registry = match Bootstrap::new()
        .with_config(&config)
        .module("shapes", shapes::register)
        .install()
    {
        Ok(registry) => registry,
        Err(e) => {
            error!("Failed to install class registry: {}", e);
            std::process::exit(1);
        }
    };

    println!("Classes: {}", enumerate_console_classes(registry, None));
    for id in registry.enumerate_classes(None) {
        print!("{}", dump_class(registry, id));
    }

    let Some(mut circle) = registry.create("Circle") else {
        error!("Circle is not registered");
        std::process::exit(1);
    };

    // SAFETY: offsets come from the derive and match the registered types
    unsafe {
        for (field, value) in [("Size", "2.5"), ("Segments", "32"), ("Color", "255")] {
            if let Err(e) = registry.set_data_field(circle.as_mut(), field, 0, value) {
                warn!("Failed to set {}: {}", field, e);
            }
        }
    }

    circle.callback::<()>("OnDraw");
    if let Some(area) = circle.callback::<f32>("GetArea") {
        println!("Area: {}", area);
    }

    // SAFETY: as above
    match unsafe { persisted_fields(registry, circle.as_ref()) } {
        Ok(values) => {
            for (field, value) in values {
                println!("  {} = \"{}\"", field, value);
            }
        }
        Err(e) => warn!("Failed to list fields: {}", e),
    }

    info!("conobject host done ({})", circle.class_name());
}
