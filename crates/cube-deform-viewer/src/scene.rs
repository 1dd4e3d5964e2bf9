//! The deformable cube and its control-point handles.
//!
//! [`ControlPoints`] is the single source of truth for the eight positions.
//! Input systems write it, then every frame the solid mesh is re-deformed
//! from its parametric base and the handles are moved to match.

use bevy::asset::RenderAssetUsages;
use bevy::mesh::{Indices, PrimitiveTopology};
use bevy::prelude::*;
use cube_deform::{ControlPointSet, Drawable, EdgeWireframe, SolidMesh, deform_positions};

use crate::material::FlatColorMaterial;
use crate::settings::ViewerSettings;

/// Transparent-phase sort bias for handles, past any edge pass.
const HANDLE_DRAW_ORDER: f32 = 10.0;

/// Per-frame ordering: input mutates control points, then geometry follows.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameSet {
    /// Drag, orbit and resize handling.
    Input,
    /// Re-deforming drawables from the current control points.
    Deform,
}

/// Plugin for the cube, its handles and per-frame deformation.
pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(Update, (FrameSet::Input, FrameSet::Deform).chain())
            .add_systems(PreStartup, init_scene_resources)
            .add_systems(Startup, spawn_scene)
            .add_systems(
                Update,
                (sync_handles, deform_solid).in_set(FrameSet::Deform),
            );
    }
}

/// Live control-point positions.
#[derive(Resource, Debug, Clone, Default, Deref, DerefMut)]
pub struct ControlPoints(pub ControlPointSet);

/// Undeformed geometry, built once at startup.
#[derive(Resource, Debug, Clone)]
pub struct CubeGeometry {
    /// Solid surface in parametric space.
    pub solid: SolidMesh,
    /// Edge segments in parametric space.
    pub wireframe: EdgeWireframe,
}

/// Marker for the solid cube entity.
#[derive(Component)]
pub struct DeformedSolid;

/// One of the eight draggable handles.
#[derive(Component, Debug, Clone, Copy)]
pub struct ControlPointHandle {
    /// Control point index, `0..8`.
    pub index: usize,
}

/// Build the control points and base geometry from the settings.
#[allow(clippy::needless_pass_by_value)]
fn init_scene_resources(mut commands: Commands, settings: Res<ViewerSettings>) {
    let solid = settings.geometry.build();
    tracing::info!(
        "Building {} cube: {} vertices, {} triangles",
        settings.geometry,
        solid.positions.len(),
        solid.triangle_count()
    );
    commands.insert_resource(ControlPoints(ControlPointSet::new(settings.corners)));
    commands.insert_resource(CubeGeometry {
        solid,
        wireframe: EdgeWireframe::new(),
    });
}

/// Spawn the solid cube and the handles.
#[allow(clippy::needless_pass_by_value)]
fn spawn_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut standard_materials: ResMut<Assets<StandardMaterial>>,
    mut flat_materials: ResMut<Assets<FlatColorMaterial>>,
    settings: Res<ViewerSettings>,
    geometry: Res<CubeGeometry>,
    points: Res<ControlPoints>,
) {
    let style = Drawable::Solid.style(settings.dash);
    let [r, g, b] = style.rgb();
    let solid_mesh = positions_mesh(
        PrimitiveTopology::TriangleList,
        &geometry.solid.positions,
        geometry.solid.indices.clone(),
    );
    commands.spawn((
        Mesh3d(meshes.add(solid_mesh)),
        MeshMaterial3d(standard_materials.add(StandardMaterial {
            base_color: Color::srgb(r, g, b),
            unlit: true,
            double_sided: style.double_sided,
            cull_mode: None,
            // Bevy biases toward the camera; a polygon offset pushes away.
            depth_bias: -style.depth_bias.units,
            ..default()
        })),
        Transform::IDENTITY,
        DeformedSolid,
    ));

    let handle_mesh = meshes.add(Cuboid::from_length(settings.handle_size));
    let handle_material = flat_materials.add(FlatColorMaterial {
        color: settings.handle_color.into(),
        depth_test: false,
        depth_write: false,
        draw_order: HANDLE_DRAW_ORDER,
    });
    for (index, position) in points.positions().iter().enumerate() {
        commands.spawn((
            Mesh3d(handle_mesh.clone()),
            MeshMaterial3d(handle_material.clone()),
            Transform::from_translation(*position),
            ControlPointHandle { index },
        ));
    }
}

/// A mesh holding only positions (and optionally indices).
pub fn positions_mesh(
    topology: PrimitiveTopology,
    positions: &[Vec3],
    indices: Option<Vec<u16>>,
) -> Mesh {
    let mesh = Mesh::new(topology, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions.to_vec());
    match indices {
        Some(indices) => mesh.with_inserted_indices(Indices::U16(indices)),
        None => mesh,
    }
}

/// Move handles to their control points.
#[allow(clippy::needless_pass_by_value)]
fn sync_handles(
    points: Res<ControlPoints>,
    mut handles: Query<(&ControlPointHandle, &mut Transform)>,
) {
    if !points.is_changed() {
        return;
    }
    for (handle, mut transform) in &mut handles {
        if let Some(position) = points.position(handle.index) {
            transform.translation = position;
        }
    }
}

/// Re-deform the solid cube from its parametric base.
#[allow(clippy::needless_pass_by_value)]
fn deform_solid(
    points: Res<ControlPoints>,
    geometry: Res<CubeGeometry>,
    mut meshes: ResMut<Assets<Mesh>>,
    solid: Single<&Mesh3d, With<DeformedSolid>>,
) {
    let Some(mesh) = meshes.get_mut(&solid.0) else {
        return;
    };
    let deformed = deform_positions(points.positions(), &geometry.solid.positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, deformed);
}
