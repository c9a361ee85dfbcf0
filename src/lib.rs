//! Spatial index for ray casting: a median-split kd-tree over triangles and
//! spheres, with slab-tested traversal returning the closest hit.

pub mod accelerators;
pub mod config;
pub mod error;
pub mod interval;
pub mod ray;
pub mod scene;
pub mod types;

pub use accelerators::{HitResult, KdTree, Primitive, PrimitiveStore, SpatialIndex};
pub use config::{IndexConfig, TraversalOrder};
pub use error::IndexError;
pub use ray::Ray;
pub use types::*;
