//! Small hard-coded scenes and seeded random scenes for demos, tests and
//! benchmarks.

use fastrand::Rng;

use crate::accelerators::PrimitiveStore;
use crate::types::{Point3, Shape, Sphere, Triangle, Vec3};

/// Two triangles forming the square `x, y ∈ [-1, 1]` at `z = -5`.
pub fn two_triangle_quad() -> PrimitiveStore<Triangle> {
    PrimitiveStore::new(vec![
        Triangle::new(
            Point3::new(-1.0, -1.0, -5.0),
            Point3::new(1.0, -1.0, -5.0),
            Point3::new(1.0, 1.0, -5.0),
        ),
        Triangle::new(
            Point3::new(-1.0, -1.0, -5.0),
            Point3::new(1.0, 1.0, -5.0),
            Point3::new(-1.0, 1.0, -5.0),
        ),
    ])
}

pub fn three_spheres() -> PrimitiveStore<Sphere> {
    PrimitiveStore::new(vec![
        Sphere::new(Point3::new(0.0, 0.0, -5.0), 1.0),
        Sphere::new(Point3::new(2.0, 1.0, -7.0), 1.2),
        Sphere::new(Point3::new(-1.0, -1.0, -4.0), 0.8),
    ])
}

#[inline]
fn random_f64_in(rng: &mut Rng, min: f64, max: f64) -> f64 {
    min + (max - min) * rng.f64()
}

/// A point in the box `x, y ∈ [-10, 10]`, `z ∈ [-25, -5]`.
fn random_scene_point(rng: &mut Rng) -> Point3 {
    Point3::new(
        random_f64_in(rng, -10.0, 10.0),
        random_f64_in(rng, -10.0, 10.0),
        random_f64_in(rng, -25.0, -5.0),
    )
}

fn random_offset(rng: &mut Rng, extent: f64) -> Vec3 {
    Vec3::new(
        random_f64_in(rng, -extent, extent),
        random_f64_in(rng, -extent, extent),
        random_f64_in(rng, -extent, extent),
    )
}

fn random_triangle(rng: &mut Rng) -> Triangle {
    let anchor = random_scene_point(rng);
    Triangle::new(
        anchor,
        anchor + random_offset(rng, 1.5),
        anchor + random_offset(rng, 1.5),
    )
}

fn random_sphere(rng: &mut Rng) -> Sphere {
    Sphere::new(random_scene_point(rng), random_f64_in(rng, 0.5, 1.5))
}

pub fn random_triangles(rng: &mut Rng, count: usize) -> PrimitiveStore<Triangle> {
    (0..count).map(|_| random_triangle(rng)).collect()
}

pub fn random_spheres(rng: &mut Rng, count: usize) -> PrimitiveStore<Sphere> {
    (0..count).map(|_| random_sphere(rng)).collect()
}

pub fn random_shapes(rng: &mut Rng, count: usize) -> PrimitiveStore<Shape> {
    (0..count)
        .map(|_| {
            if rng.bool() {
                Shape::from(random_triangle(rng))
            } else {
                Shape::from(random_sphere(rng))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accelerators::Primitive;

    #[test]
    fn test_same_seed_same_scene() {
        let a = random_triangles(&mut Rng::with_seed(8), 20);
        let b = random_triangles(&mut Rng::with_seed(8), 20);
        assert_eq!(a.primitives(), b.primitives());
    }

    #[test]
    fn test_random_scene_stays_in_volume() {
        let store = random_spheres(&mut Rng::with_seed(2), 50);
        assert_eq!(store.len(), 50);
        for sphere in store.primitives() {
            let c = sphere.centroid();
            assert!((-10.0..=10.0).contains(&c.x));
            assert!((-25.0..=-5.0).contains(&c.z));
        }
    }
}
