//! # Parametric Surface Tessellation
//!
//! Shapes are described by a pure mapping `(u, v) ∈ [0,1]² → Vertex3D`. The
//! generator samples that mapping on a regular grid and triangulates it; it
//! never recomputes normals or texture coordinates.

use cgmath::{InnerSpace, Vector3};
use std::f32::consts::PI;

use super::Mesh;
use crate::gfx::scene::vertex::Vertex3D;

/// The closed set of procedural reference shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    /// Unit square in the XY plane centred on the origin, facing +Z.
    Plane,
    /// Unit sphere centred on the origin.
    Sphere,
    /// Open unit-radius cylinder from z = 0 to z = 1.
    Cylinder,
    /// Open cone with its apex at the origin and a unit-radius base at z = 1.
    Cone,
}

impl Surface {
    /// The evaluation function for this shape.
    pub fn evaluator(self) -> fn(f32, f32) -> Vertex3D {
        match self {
            Surface::Plane => eval_plane,
            Surface::Sphere => eval_sphere,
            Surface::Cylinder => eval_cylinder,
            Surface::Cone => eval_cone,
        }
    }

    pub fn eval(self, u: f32, v: f32) -> Vertex3D {
        (self.evaluator())(u, v)
    }

    /// Tessellates this shape on a `res_u` x `res_v` grid.
    pub fn tessellate(self, res_u: u32, res_v: u32) -> Mesh {
        generate(res_u, res_v, self.evaluator())
    }
}

/// Samples `eval` on a `(res_u + 1) x (res_v + 1)` grid and emits two
/// triangles per cell.
///
/// Vertices are stored row-major with `v` as the outer loop, so the grid
/// point `(i, j)` lives at index `j * (res_u + 1) + i`. Cell `(i, j)` yields
/// the triangles `(a, b, c)` and `(a, c, d)` with `a = (i, j)`,
/// `b = (i + 1, j)`, `c = (i + 1, j + 1)` and `d = (i, j + 1)`.
///
/// # Panics
///
/// Panics if either resolution is zero, or if the grid has more vertices
/// than `u32` indices can address.
pub fn generate<F>(res_u: u32, res_v: u32, eval: F) -> Mesh
where
    F: Fn(f32, f32) -> Vertex3D,
{
    assert!(res_u > 0, "parametric resolution in u must be positive");
    assert!(res_v > 0, "parametric resolution in v must be positive");

    let vertex_count = (u64::from(res_u) + 1) * (u64::from(res_v) + 1);
    assert!(
        vertex_count <= u64::from(u32::MAX) + 1,
        "parametric grid of {}x{} has too many vertices for u32 indices",
        res_u,
        res_v
    );

    let width = res_u + 1;
    let mut vertices = Vec::with_capacity(vertex_count as usize);
    for j in 0..=res_v {
        let v = j as f32 / res_v as f32;
        for i in 0..=res_u {
            let u = i as f32 / res_u as f32;
            vertices.push(eval(u, v));
        }
    }

    let to_linear = |i: u32, j: u32| j * width + i;
    let mut triangles = Vec::with_capacity(2 * res_u as usize * res_v as usize);
    for i in 0..res_u {
        for j in 0..res_v {
            let a = to_linear(i, j);
            let b = to_linear(i + 1, j);
            let c = to_linear(i + 1, j + 1);
            let d = to_linear(i, j + 1);

            triangles.push([a, b, c]);
            triangles.push([a, c, d]);
        }
    }

    Mesh {
        vertices,
        triangles,
        has_normals: true,
        has_tex_coords: true,
    }
}

fn check_domain(u: f32, v: f32) {
    assert!((0.0..=1.0).contains(&u), "u = {u} is outside [0, 1]");
    assert!((0.0..=1.0).contains(&v), "v = {v} is outside [0, 1]");
}

fn eval_plane(u: f32, v: f32) -> Vertex3D {
    check_domain(u, v);
    Vertex3D::new([u - 0.5, v - 0.5, 0.0], [0.0, 0.0, 1.0], [u, v])
}

// The polar angle starts at the south pole so that u x v points outward.
fn eval_sphere(u: f32, v: f32) -> Vertex3D {
    check_domain(u, v);
    let phi = u * 2.0 * PI;
    let theta = v * PI;

    let p = [phi.cos() * theta.sin(), phi.sin() * theta.sin(), -theta.cos()];
    Vertex3D::new(p, p, [u, v])
}

fn eval_cylinder(u: f32, v: f32) -> Vertex3D {
    check_domain(u, v);
    let phi = u * 2.0 * PI;
    let (x, y) = (phi.cos(), phi.sin());

    Vertex3D::new([x, y, v], [x, y, 0.0], [u, v])
}

fn eval_cone(u: f32, v: f32) -> Vertex3D {
    check_domain(u, v);
    let phi = u * 2.0 * PI;
    let (c, s) = (phi.cos(), phi.sin());

    // Tangents along v and along u. The u tangent is divided by v, which keeps
    // the apex normal defined without changing its direction elsewhere.
    let along_v = Vector3::new(c, s, 1.0);
    let around_u = Vector3::new(-s, c, 0.0);
    let normal = -along_v.cross(around_u).normalize();

    Vertex3D::new([v * c, v * s, v], normal.into(), [u, v])
}
