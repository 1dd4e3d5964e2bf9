//! Interactive deformable cube.
//!
//! Eight translucent handles sit on the corners of a cube. Dragging one
//! warps the cube by trilinear interpolation; gray dashes show every edge,
//! black lines only the edges facing the camera.
//!
//! Run: `cargo run -p cube-deform-viewer -- [--geometry=indexed] [--corners=unit]`

mod camera;
mod drag;
mod material;
mod overlay;
mod scene;
mod settings;
mod ui;

use bevy::prelude::*;
use bevy::window::WindowPlugin;
use bevy_egui::EguiPlugin;

use crate::camera::OrbitCameraPlugin;
use crate::drag::ControlPointDragPlugin;
use crate::material::FlatColorMaterialPlugin;
use crate::overlay::EdgeOverlayPlugin;
use crate::scene::ScenePlugin;
use crate::settings::ViewerSettings;
use crate::ui::InspectorPlugin;

fn main() -> AppExit {
    init_logging();

    let settings = match ViewerSettings::from_args(std::env::args().skip(1)) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("Invalid arguments: {e}");
            return AppExit::error();
        }
    };
    tracing::info!(
        "Starting viewer: geometry={}, corners={}",
        settings.geometry,
        settings.corners
    );

    App::new()
        .insert_resource(ClearColor(settings.clear_color))
        .insert_resource(settings)
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Deformable cube".to_string(),
                fit_canvas_to_parent: true,
                ..default()
            }),
            ..default()
        }))
        .add_plugins(EguiPlugin::default())
        .add_plugins((
            FlatColorMaterialPlugin,
            ScenePlugin,
            EdgeOverlayPlugin,
            ControlPointDragPlugin,
            OrbitCameraPlugin,
            InspectorPlugin,
        ))
        .run()
}

#[cfg(not(target_family = "wasm"))]
fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,wgpu=warn,naga=warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[cfg(target_family = "wasm")]
fn init_logging() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();
}
