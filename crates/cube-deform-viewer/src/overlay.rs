//! Hidden/visible edge passes.
//!
//! Both passes are rebuilt every frame from the same deformed wireframe. The
//! dashed pass ignores depth and the solid pass is depth tested, so where an
//! edge faces the camera the black line covers its dashes and where it is
//! behind the cube only the dashes remain.

use bevy::mesh::PrimitiveTopology;
use bevy::prelude::*;
use cube_deform::{Drawable, EdgeOverlay};

use crate::material::FlatColorMaterial;
use crate::scene::{ControlPoints, CubeGeometry, FrameSet, positions_mesh};
use crate::settings::ViewerSettings;

/// Plugin for the two edge passes.
pub struct EdgeOverlayPlugin;

impl Plugin for EdgeOverlayPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<EdgeOverlayState>()
            .add_systems(Startup, spawn_edge_passes)
            .add_systems(Update, update_edge_passes.in_set(FrameSet::Deform));
    }
}

/// This frame's deformed edges and dashes.
#[derive(Resource, Default, Deref, DerefMut)]
pub struct EdgeOverlayState(pub EdgeOverlay);

/// Which pass an edge entity draws.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgePass {
    /// Dashed, drawn through the solid.
    Hidden,
    /// Solid, occluded by the solid.
    Visible,
}

impl EdgePass {
    fn drawable(self) -> Drawable {
        match self {
            Self::Hidden => Drawable::HiddenEdges,
            Self::Visible => Drawable::VisibleEdges,
        }
    }

    /// Transparent-phase order: dashes first, then the visible edges on top.
    fn draw_order(self) -> f32 {
        match self {
            Self::Hidden => 0.0,
            Self::Visible => 1.0,
        }
    }
}

/// Spawn one line entity per pass.
#[allow(clippy::needless_pass_by_value)]
fn spawn_edge_passes(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<FlatColorMaterial>>,
    settings: Res<ViewerSettings>,
) {
    for pass in [EdgePass::Hidden, EdgePass::Visible] {
        let style = pass.drawable().style(settings.dash);
        commands.spawn((
            Mesh3d(meshes.add(positions_mesh(PrimitiveTopology::LineList, &[], None))),
            MeshMaterial3d(materials.add(FlatColorMaterial::from_style(&style, pass.draw_order()))),
            Transform::IDENTITY,
            pass,
        ));
    }
}

/// Deform the wireframe, dash it, and upload both passes.
#[allow(clippy::needless_pass_by_value)]
fn update_edge_passes(
    points: Res<ControlPoints>,
    geometry: Res<CubeGeometry>,
    settings: Res<ViewerSettings>,
    mut overlay: ResMut<EdgeOverlayState>,
    mut meshes: ResMut<Assets<Mesh>>,
    passes: Query<(&EdgePass, &Mesh3d)>,
) {
    overlay.rebuild(points.positions(), &geometry.wireframe, settings.dash);

    for (pass, mesh3d) in &passes {
        let Some(mesh) = meshes.get_mut(&mesh3d.0) else {
            continue;
        };
        let positions: Vec<Vec3> = match pass {
            EdgePass::Hidden => overlay.dashes.iter().flatten().copied().collect(),
            EdgePass::Visible => overlay.edges.clone(),
        };
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    }
}
