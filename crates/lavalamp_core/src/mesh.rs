//! Triangle meshes and surface-of-revolution construction
//!
//! Every piece of the lamp is round, so all geometry is produced by revolving
//! a 2D `(radius, height)` profile around the Y axis.

use lavalamp_math::Vec3;

use crate::lamp::ModelError;

/// Minimum number of segments around the axis
pub const MIN_SEGMENTS: u32 = 3;

/// A mesh vertex with position, normal and texture coordinate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshVertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: [f32; 2],
}

/// Indexed triangle list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<MeshVertex>,
    /// Counter-clockwise triangles (seen from outside)
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Revolve `profile` around the Y axis
    ///
    /// Profile points are `[radius, height]`, ordered bottom to top so normals
    /// face outward. Normals are smooth along the profile; put a crease in by
    /// building separate pieces and [`merge`](Self::merge)-ing them. The seam
    /// is duplicated so U runs 0..1 around the axis, V runs 0..1 up the profile.
    pub fn lathe(profile: &[[f32; 2]], segments: u32) -> Result<Self, ModelError> {
        if profile.len() < 2 {
            return Err(ModelError::InvalidProfile(format!(
                "need at least 2 profile points, got {}",
                profile.len()
            )));
        }
        if segments < MIN_SEGMENTS {
            return Err(ModelError::InvalidProfile(format!(
                "need at least {} segments, got {}",
                MIN_SEGMENTS, segments
            )));
        }
        if let Some(p) = profile.iter().find(|p| p[0] < 0.0 || !p[0].is_finite() || !p[1].is_finite()) {
            return Err(ModelError::InvalidProfile(format!(
                "invalid profile point [{}, {}]",
                p[0], p[1]
            )));
        }

        let rows = profile.len();
        let profile_normals = profile_normals(profile);

        let mut mesh = Mesh {
            vertices: Vec::with_capacity((segments as usize + 1) * rows),
            indices: Vec::with_capacity(segments as usize * (rows - 1) * 6),
        };

        for j in 0..=segments {
            let u = j as f32 / segments as f32;
            let theta = u * std::f32::consts::TAU;
            let (sin, cos) = theta.sin_cos();

            for (i, (point, normal)) in profile.iter().zip(&profile_normals).enumerate() {
                let [radius, height] = *point;
                let [nr, ny] = *normal;
                mesh.vertices.push(MeshVertex {
                    position: Vec3::new(radius * sin, height, radius * cos),
                    normal: Vec3::new(nr * sin, ny, nr * cos),
                    uv: [u, i as f32 / (rows - 1) as f32],
                });
            }
        }

        let rows = rows as u32;
        for j in 0..segments {
            for i in 0..rows - 1 {
                let a = j * rows + i;
                let b = a + rows;
                let c = b + 1;
                let d = a + 1;
                mesh.indices.extend_from_slice(&[a, b, d, c, d, b]);
            }
        }

        Ok(mesh)
    }

    /// Append another mesh, re-basing its indices
    pub fn merge(&mut self, other: &Mesh) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Axis-aligned bounds `(min, max)`, or `None` for an empty mesh
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = self.vertices.first()?.position;
        Some(self.vertices.iter().fold((first, first), |(lo, hi), v| {
            let p = v.position;
            (
                Vec3::new(lo.x.min(p.x), lo.y.min(p.y), lo.z.min(p.z)),
                Vec3::new(hi.x.max(p.x), hi.y.max(p.y), hi.z.max(p.z)),
            )
        }))
    }
}

/// Outward `(radial, vertical)` normals for each profile point
///
/// Uses the central difference of the neighbours (one-sided at the ends),
/// rotated a quarter turn: tangent `(dr, dy)` becomes normal `(dy, -dr)`.
fn profile_normals(profile: &[[f32; 2]]) -> Vec<[f32; 2]> {
    let last = profile.len() - 1;
    (0..profile.len())
        .map(|i| {
            let prev = profile[i.saturating_sub(1)];
            let next = profile[(i + 1).min(last)];
            let (dr, dy) = (next[0] - prev[0], next[1] - prev[1]);
            let len = (dr * dr + dy * dy).sqrt();
            if len > 0.0 {
                [dy / len, -dr / len]
            } else {
                [1.0, 0.0]
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CYLINDER: [[f32; 2]; 2] = [[1.0, 0.0], [1.0, 2.0]];

    #[test]
    fn test_lathe_counts() {
        let mesh = Mesh::lathe(&CYLINDER, 8).unwrap();
        assert_eq!(mesh.vertex_count(), 9 * 2);
        assert_eq!(mesh.triangle_count(), 8 * 2);
    }

    #[test]
    fn test_cylinder_normals_point_outward() {
        let mesh = Mesh::lathe(&CYLINDER, 16).unwrap();
        for v in &mesh.vertices {
            assert!((v.normal.length() - 1.0).abs() < 1e-5);
            let radial = Vec3::new(v.position.x, 0.0, v.position.z).normalized();
            assert!(v.normal.dot(radial) > 0.999);
        }
    }

    #[test]
    fn test_disk_normal_points_up() {
        // Profile going inward at the top of a cap
        let mesh = Mesh::lathe(&[[1.0, 1.0], [0.0, 1.0]], 8).unwrap();
        for v in &mesh.vertices {
            assert!((v.normal.y - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_winding_faces_outward() {
        let mesh = Mesh::lathe(&CYLINDER, 12).unwrap();
        for tri in mesh.indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| mesh.vertices[i as usize].position);
            let face_normal = (b - a).cross(c - a);
            let centroid = (a + b + c) * (1.0 / 3.0);
            let outward = Vec3::new(centroid.x, 0.0, centroid.z);
            assert!(face_normal.dot(outward) > 0.0);
        }
    }

    #[test]
    fn test_uv_range() {
        let mesh = Mesh::lathe(&[[0.5, 0.0], [0.7, 1.0], [0.3, 2.0]], 6).unwrap();
        assert_eq!(mesh.vertices.first().unwrap().uv, [0.0, 0.0]);
        assert_eq!(mesh.vertices.last().unwrap().uv, [1.0, 1.0]);
    }

    #[test]
    fn test_invalid_profiles() {
        assert!(Mesh::lathe(&[[1.0, 0.0]], 8).is_err());
        assert!(Mesh::lathe(&CYLINDER, 2).is_err());
        assert!(Mesh::lathe(&[[-1.0, 0.0], [1.0, 1.0]], 8).is_err());
        assert!(Mesh::lathe(&[[1.0, f32::NAN], [1.0, 1.0]], 8).is_err());
    }

    #[test]
    fn test_merge_rebases_indices() {
        let mut a = Mesh::lathe(&CYLINDER, 4).unwrap();
        let b = Mesh::lathe(&CYLINDER, 4).unwrap();
        let before = a.vertex_count() as u32;
        a.merge(&b);
        assert_eq!(a.vertex_count(), 20);
        assert_eq!(a.triangle_count(), 16);
        assert!(a.indices[24..].iter().all(|&i| i >= before));
        assert!(a.indices.iter().all(|&i| (i as usize) < a.vertex_count()));
    }

    #[test]
    fn test_bounds() {
        let mesh = Mesh::lathe(&CYLINDER, 4).unwrap();
        let (lo, hi) = mesh.bounds().unwrap();
        assert!((lo.x + 1.0).abs() < 1e-5 && (hi.x - 1.0).abs() < 1e-5);
        assert_eq!(lo.y, 0.0);
        assert_eq!(hi.y, 2.0);
        assert!(Mesh::new().bounds().is_none());
    }
}
