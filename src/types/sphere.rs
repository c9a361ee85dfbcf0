use crate::accelerators::Primitive;
use crate::accelerators::aabb::AABB;
use crate::ray::Ray;

use super::{Point3, Vec3};

pub const SPHERE_EPSILON: f64 = 1e-8;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Sphere {
    pub center: Point3,
    pub radius: f64,
}

impl Sphere {
    pub fn new(center: Point3, radius: f64) -> Self {
        Self { center, radius }
    }
}

impl Primitive for Sphere {
    fn centroid(&self) -> Vec3 {
        self.center
    }

    fn aabb(&self) -> AABB {
        let rvec = Vec3::splat(self.radius);
        AABB::new(self.center - rvec, self.center + rvec)
    }

    fn intersect(&self, ray: &Ray) -> Option<f64> {
        let oc = self.center - *ray.origin();
        let a = ray.direction().length_squared();
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 || a == 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Far root covers origins inside the sphere.
        let near = (h - sqrtd) / a;
        if near > SPHERE_EPSILON {
            return Some(near);
        }
        let far = (h + sqrtd) / a;
        (far > SPHERE_EPSILON).then_some(far)
    }
}
