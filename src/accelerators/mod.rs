use aabb::AABB;

use crate::ray::Ray;
use crate::types::Vec3;

pub mod aabb;
pub mod index;
pub mod kd_tree;
pub mod stats;
pub mod store;
pub mod traverse;

pub use index::{SphereIndex, SpatialIndex, TriangleIndex};
pub use kd_tree::{KdNode, KdTree, KdTreeBuilder, NodeKind};
pub use stats::TreeStats;
pub use store::PrimitiveStore;
pub use traverse::HitResult;

/// Largest primitive count a node may hold before it is split.
pub const LEAF_THRESHOLD: usize = 2;
/// Nodes at this depth become leaves regardless of their size.
pub const MAX_DEPTH: usize = 20;

pub trait Primitive: Send + Sync {
    fn centroid(&self) -> Vec3;

    fn aabb(&self) -> AABB;

    /// Distance along `ray` to the nearest intersection in front of the
    /// origin, if any.
    fn intersect(&self, ray: &Ray) -> Option<f64>;
}
