//! Unlit single-color material with per-material depth state.
//!
//! Used for both edge passes and the control-point handles. Everything drawn
//! with it goes through the transparent phase, after the opaque cube, and
//! `draw_order` decides who is drawn last among them.

use bevy::asset::embedded_asset;
use bevy::mesh::MeshVertexBufferLayoutRef;
use bevy::pbr::{MaterialPipeline, MaterialPipelineKey};
use bevy::prelude::*;
use bevy::render::render_resource::{
    AsBindGroup, CompareFunction, RenderPipelineDescriptor, SpecializedMeshPipelineError,
};
use bevy::shader::ShaderRef;
use bytemuck::{Pod, Zeroable};
use cube_deform::DrawStyle;

const SHADER_PATH: &str = "embedded://cube_deform_viewer/flat_color.wgsl";

/// Registers [`FlatColorMaterial`] and its shader.
pub struct FlatColorMaterialPlugin;

impl Plugin for FlatColorMaterialPlugin {
    fn build(&self, app: &mut App) {
        embedded_asset!(app, "flat_color.wgsl");
        app.add_plugins(MaterialPlugin::<FlatColorMaterial>::default());
    }
}

/// Flat color with optional depth test and depth write.
#[derive(Asset, TypePath, AsBindGroup, Debug, Clone)]
#[bind_group_data(FlatColorKey)]
pub struct FlatColorMaterial {
    /// Output color, alpha blended.
    #[uniform(0)]
    pub color: LinearRgba,
    /// Whether fragments behind the depth buffer are discarded.
    pub depth_test: bool,
    /// Whether fragments write the depth buffer.
    pub depth_write: bool,
    /// Sort bias in the transparent phase; larger draws later.
    pub draw_order: f32,
}

impl FlatColorMaterial {
    /// Material for a line drawable.
    pub fn from_style(style: &DrawStyle, draw_order: f32) -> Self {
        let [r, g, b] = style.rgb();
        Self {
            color: Color::srgb(r, g, b).into(),
            depth_test: style.depth_test,
            depth_write: style.depth_write,
            draw_order,
        }
    }
}

/// Pipeline key: the depth state of a [`FlatColorMaterial`].
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct FlatColorKey {
    depth_test: u32,
    depth_write: u32,
}

impl From<&FlatColorMaterial> for FlatColorKey {
    fn from(material: &FlatColorMaterial) -> Self {
        Self {
            depth_test: u32::from(material.depth_test),
            depth_write: u32::from(material.depth_write),
        }
    }
}

impl Material for FlatColorMaterial {
    fn fragment_shader() -> ShaderRef {
        SHADER_PATH.into()
    }

    fn alpha_mode(&self) -> AlphaMode {
        AlphaMode::Blend
    }

    fn depth_bias(&self) -> f32 {
        self.draw_order
    }

    fn specialize(
        _pipeline: &MaterialPipeline,
        descriptor: &mut RenderPipelineDescriptor,
        _layout: &MeshVertexBufferLayoutRef,
        key: MaterialPipelineKey<Self>,
    ) -> Result<(), SpecializedMeshPipelineError> {
        descriptor.primitive.cull_mode = None;
        // No depth bias: line topologies cannot carry one.
        if let Some(depth) = descriptor.depth_stencil.as_mut() {
            if key.bind_group_data.depth_test == 0 {
                depth.depth_compare = CompareFunction::Always;
            }
            depth.depth_write_enabled = key.bind_group_data.depth_write != 0;
        }
        Ok(())
    }
}
