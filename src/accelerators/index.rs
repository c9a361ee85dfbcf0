use log::info;
use rayon::prelude::*;

use crate::config::IndexConfig;
use crate::error::Result;
use crate::ray::Ray;
use crate::types::{Sphere, Triangle};

use super::kd_tree::KdTree;
use super::stats::TreeStats;
use super::store::PrimitiveStore;
use super::traverse::HitResult;
use super::Primitive;

/// A primitive store together with a tree built over all of it.
#[derive(Clone, Debug)]
pub struct SpatialIndex<P: Primitive> {
    store: PrimitiveStore<P>,
    tree: KdTree,
}

pub type TriangleIndex = SpatialIndex<Triangle>;
pub type SphereIndex = SpatialIndex<Sphere>;

impl<P: Primitive> SpatialIndex<P> {
    pub fn new(primitives: Vec<P>) -> Result<Self> {
        Self::with_config(primitives, IndexConfig::default())
    }

    pub fn with_config(primitives: Vec<P>, config: IndexConfig) -> Result<Self> {
        let store = PrimitiveStore::new(primitives);
        let tree = KdTree::build(&store, config)?;
        info!(
            "indexed {} primitives into {} nodes",
            store.len(),
            tree.nodes().len()
        );
        Ok(Self { store, tree })
    }

    pub fn store(&self) -> &PrimitiveStore<P> {
        &self.store
    }

    pub fn tree(&self) -> &KdTree {
        &self.tree
    }

    pub fn stats(&self) -> TreeStats {
        self.tree.stats()
    }

    pub fn traverse(&self, ray: &Ray) -> HitResult {
        // The tree was built over this store.
        self.tree.closest_hit(&self.store, ray, self.tree.traversal_order())
    }

    pub fn occluded(&self, ray: &Ray, t_max: f64) -> bool {
        self.tree.any_hit(&self.store, ray, t_max)
    }

    /// Traces each ray independently on the rayon pool. Results keep the
    /// order of `rays`.
    pub fn traverse_batch(&self, rays: &[Ray]) -> Vec<HitResult> {
        rays.par_iter().map(|ray| self.traverse(ray)).collect()
    }
}
