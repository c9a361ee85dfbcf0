use crate::accelerators::Primitive;
use crate::accelerators::aabb::AABB;
use crate::ray::Ray;

use super::{Point3, Vec3};

/// Below this the ray is treated as parallel to the triangle, and hits
/// closer than this are rejected.
pub const TRIANGLE_EPSILON: f64 = 1e-6;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Triangle {
    pub vertices: [Point3; 3],
}

impl Triangle {
    pub fn new(v0: Point3, v1: Point3, v2: Point3) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }
}

impl Primitive for Triangle {
    fn centroid(&self) -> Vec3 {
        (self.vertices[0] + self.vertices[1] + self.vertices[2]) / 3.0
    }

    fn aabb(&self) -> AABB {
        AABB::new(self.vertices[0], self.vertices[1]).grow(self.vertices[2])
    }

    // Möller–Trumbore
    fn intersect(&self, ray: &Ray) -> Option<f64> {
        let [v0, v1, v2] = self.vertices;
        let e1 = v1 - v0;
        let e2 = v2 - v0;

        let p = ray.direction().cross(e2);
        let det = e1.dot(p);
        if det.abs() < TRIANGLE_EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;

        let s = *ray.origin() - v0;
        let u = inv_det * s.dot(p);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(e1);
        let v = inv_det * ray.direction().dot(q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = inv_det * e2.dot(q);
        (t > TRIANGLE_EPSILON).then_some(t)
    }
}
