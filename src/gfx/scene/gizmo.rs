//! # Reference Geometry
//!
//! The ground plane and the origin-and-axes gizmo placed around loaded
//! content. Transforms are built by right-multiplying onto an accumulated
//! matrix in a fixed order: base orientation, axis rotation, non-uniform
//! scale, translation.

use cgmath::{Deg, Matrix4, Vector3};

use super::{
    entity::{identity, rotate, scale, translate, MeshId},
    scene::SceneBuilder,
};
use crate::gfx::resources::material::{Material, MaterialId};

/// Mesh handles for the four procedural shapes.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceShapes {
    pub plane: MeshId,
    pub sphere: MeshId,
    pub cylinder: MeshId,
    pub cone: MeshId,
}

/// One gizmo axis: the rotation that takes the previous axis base to this
/// one, and its colour.
struct AxisSpec {
    name: &'static str,
    base_rotation: Option<(Deg<f32>, Vector3<f32>)>,
    diffuse: [f32; 3],
}

// Each base rotation is applied on top of the previous axis' base.
const AXES: [AxisSpec; 3] = [
    AxisSpec {
        name: "z",
        base_rotation: None,
        diffuse: [0.01, 0.01, 1.0],
    },
    AxisSpec {
        name: "x",
        base_rotation: Some((Deg(90.0), Vector3::new(0.0, 1.0, 0.0))),
        diffuse: [1.0, 0.01, 0.01],
    },
    AxisSpec {
        name: "y",
        base_rotation: Some((Deg(-90.0), Vector3::new(1.0, 0.0, 0.0))),
        diffuse: [0.01, 1.0, 0.01],
    },
];

const AXIS_SHININESS: f32 = 50.0;
const SHAFT_SCALE: Vector3<f32> = Vector3::new(0.03, 0.03, 0.9);
const HEAD_SCALE: Vector3<f32> = Vector3::new(0.06, 0.06, 0.2);
const HEAD_OFFSET: Vector3<f32> = Vector3::new(0.0, 0.0, -5.0);
const ORIGIN_SCALE: f32 = 0.1;

/// Ground plane transform: lay the XY plane flat, stretch it and drop it
/// slightly below the origin.
pub fn ground_plane_transform() -> Matrix4<f32> {
    let m = rotate(identity(), Deg(-90.0), Vector3::unit_x());
    let m = scale(m, Vector3::new(10.0, 10.0, 1.0));
    translate(m, Vector3::new(0.0, 0.0, -0.49))
}

/// Shaft transform for an axis whose base orientation is `base`.
pub fn shaft_transform(base: Matrix4<f32>) -> Matrix4<f32> {
    scale(base, SHAFT_SCALE)
}

/// Arrowhead transform: flip the cone so its apex points along the axis,
/// shrink it and push it out to the end of the shaft.
pub fn head_transform(base: Matrix4<f32>) -> Matrix4<f32> {
    let m = rotate(base, Deg(180.0), Vector3::unit_y());
    let m = scale(m, HEAD_SCALE);
    translate(m, HEAD_OFFSET)
}

pub(crate) fn add_ground_plane(builder: &mut SceneBuilder, shapes: &ReferenceShapes, material: MaterialId) {
    builder.add_entity(shapes.plane, material, ground_plane_transform());
}

/// Adds the origin sphere and the three axes, each with its own material.
pub(crate) fn add_axes_gizmo(builder: &mut SceneBuilder, shapes: &ReferenceShapes) {
    let base = identity();

    let center = builder.add_material(Material::with_white_highlight([1.0, 1.0, 0.01], 25.0));
    builder.add_entity(
        shapes.sphere,
        center,
        scale(base, Vector3::new(ORIGIN_SCALE, ORIGIN_SCALE, ORIGIN_SCALE)),
    );

    AXES.iter().fold(base, |base, axis| {
        let base = match axis.base_rotation {
            Some((angle, around)) => rotate(base, angle, around),
            None => base,
        };
        let material =
            builder.add_material(Material::with_white_highlight(axis.diffuse, AXIS_SHININESS));
        builder.add_entity(shapes.cylinder, material, shaft_transform(base));
        builder.add_entity(shapes.cone, material, head_transform(base));
        log::debug!("added gizmo axis '{}'", axis.name);
        base
    });
}
