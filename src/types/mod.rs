use glam::DVec3;

mod shape;
mod sphere;
mod triangle;

pub use shape::Shape;
pub use sphere::Sphere;
pub use triangle::Triangle;

pub type Point3 = DVec3;
pub type Vec3 = DVec3;
