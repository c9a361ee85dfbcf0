use crate::accelerators::Primitive;
use crate::accelerators::aabb::AABB;
use crate::ray::Ray;

use super::{Sphere, Triangle, Vec3};

/// Either kind of primitive, for scenes that mix them in one index.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Shape {
    Triangle(Triangle),
    Sphere(Sphere),
}

impl From<Triangle> for Shape {
    fn from(tri: Triangle) -> Self {
        Shape::Triangle(tri)
    }
}

impl From<Sphere> for Shape {
    fn from(sphere: Sphere) -> Self {
        Shape::Sphere(sphere)
    }
}

impl Primitive for Shape {
    fn centroid(&self) -> Vec3 {
        match self {
            Shape::Triangle(tri) => tri.centroid(),
            Shape::Sphere(sphere) => sphere.centroid(),
        }
    }

    fn aabb(&self) -> AABB {
        match self {
            Shape::Triangle(tri) => tri.aabb(),
            Shape::Sphere(sphere) => sphere.aabb(),
        }
    }

    fn intersect(&self, ray: &Ray) -> Option<f64> {
        match self {
            Shape::Triangle(tri) => tri.intersect(ray),
            Shape::Sphere(sphere) => sphere.intersect(ray),
        }
    }
}
