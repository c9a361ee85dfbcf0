use crate::config::TraversalOrder;
use crate::error::{IndexError, Result};
use crate::interval::Interval;
use crate::ray::Ray;

use super::kd_tree::{KdTree, NodeId, NodeKind};
use super::store::PrimitiveStore;
use super::Primitive;

/// Closest intersection along a ray. `distance` is infinite on a miss.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitResult {
    pub did_hit: bool,
    pub distance: f64,
    pub primitive: Option<usize>,
}

impl HitResult {
    pub fn miss() -> Self {
        Self {
            did_hit: false,
            distance: f64::INFINITY,
            primitive: None,
        }
    }

    pub fn hit(distance: f64, primitive: usize) -> Self {
        Self {
            did_hit: true,
            distance,
            primitive: Some(primitive),
        }
    }
}

impl Default for HitResult {
    fn default() -> Self {
        Self::miss()
    }
}

impl KdTree {
    /// Closest hit among the primitives of `store` that this tree indexes,
    /// using the tree's configured child order. `store` must be the store
    /// the tree was built over.
    pub fn traverse<P: Primitive>(
        &self,
        store: &PrimitiveStore<P>,
        ray: &Ray,
    ) -> Result<HitResult> {
        self.traverse_with(store, ray, self.traversal_order())
    }

    pub fn traverse_with<P: Primitive>(
        &self,
        store: &PrimitiveStore<P>,
        ray: &Ray,
        order: TraversalOrder,
    ) -> Result<HitResult> {
        self.check_store(store)?;
        Ok(self.closest_hit(store, ray, order))
    }

    /// True when any indexed primitive is hit at a distance below `t_max`.
    /// Stops at the first such hit, so it is cheaper than `traverse` for
    /// shadow style queries.
    pub fn occluded<P: Primitive>(
        &self,
        store: &PrimitiveStore<P>,
        ray: &Ray,
        t_max: f64,
    ) -> Result<bool> {
        self.check_store(store)?;
        Ok(self.any_hit(store, ray, t_max))
    }

    fn check_store<P: Primitive>(&self, store: &PrimitiveStore<P>) -> Result<()> {
        if store.len() != self.store_len() {
            return Err(IndexError::StoreMismatch {
                expected: self.store_len(),
                found: store.len(),
            });
        }
        Ok(())
    }

    /// Callers guarantee `store` matches the tree.
    pub(crate) fn closest_hit<P: Primitive>(
        &self,
        store: &PrimitiveStore<P>,
        ray: &Ray,
        order: TraversalOrder,
    ) -> HitResult {
        let mut closest = HitResult::miss();
        match order {
            TraversalOrder::Unordered => {
                self.visit(store, ray, KdTree::ROOT, &mut closest);
            }
            TraversalOrder::NearFirst => {
                let forward = Interval::new(0.0, f64::INFINITY);
                if let Some(entry) = self.root().bbox.hit(ray, forward) {
                    self.visit_near_first(store, ray, KdTree::ROOT, entry, &mut closest);
                }
            }
        }
        closest
    }

    pub(crate) fn any_hit<P: Primitive>(
        &self,
        store: &PrimitiveStore<P>,
        ray: &Ray,
        t_max: f64,
    ) -> bool {
        self.visit_any(store, ray, KdTree::ROOT, Interval::new(0.0, t_max))
    }

    fn visit<P: Primitive>(
        &self,
        store: &PrimitiveStore<P>,
        ray: &Ray,
        node_id: NodeId,
        closest: &mut HitResult,
    ) -> bool {
        let node = self.node(node_id);
        if node.bbox.hit(ray, Interval::UNIVERSE).is_none() {
            return false;
        }

        match &node.kind {
            NodeKind::Leaf(prims) => visit_leaf(store, ray, prims, closest),
            NodeKind::Branch { left, right } => {
                // Both sides are searched; `closest` only filters at the leaves.
                let hit_left = self.visit(store, ray, *left, closest);
                let hit_right = self.visit(store, ray, *right, closest);
                hit_left || hit_right
            }
        }
    }

    /// `entry` is the part of the ray inside this node's box.
    fn visit_near_first<P: Primitive>(
        &self,
        store: &PrimitiveStore<P>,
        ray: &Ray,
        node_id: NodeId,
        entry: Interval,
        closest: &mut HitResult,
    ) -> bool {
        if entry.min > closest.distance {
            return false;
        }

        let (left, right) = match &self.node(node_id).kind {
            NodeKind::Leaf(prims) => return visit_leaf(store, ray, prims, closest),
            NodeKind::Branch { left, right } => (*left, *right),
        };

        let range = Interval::new(0.0, closest.distance);
        let enter = |id: NodeId| self.node(id).bbox.hit(ray, range).map(|t| (id, t));
        let mut children = [enter(left), enter(right)];
        if let [Some((_, l)), Some((_, r))] = children {
            if r.min < l.min {
                children.swap(0, 1);
            }
        }

        let mut hit = false;
        for (child, child_entry) in children.into_iter().flatten() {
            // The first child may have moved `closest` below this entry.
            hit |= self.visit_near_first(store, ray, child, child_entry, closest);
        }
        hit
    }

    fn visit_any<P: Primitive>(
        &self,
        store: &PrimitiveStore<P>,
        ray: &Ray,
        node_id: NodeId,
        range: Interval,
    ) -> bool {
        let node = self.node(node_id);
        if node.bbox.hit(ray, range).is_none() {
            return false;
        }

        match &node.kind {
            NodeKind::Leaf(prims) => prims.iter().any(|&index| {
                store.primitives()[index]
                    .intersect(ray)
                    .is_some_and(|t| t < range.max)
            }),
            NodeKind::Branch { left, right } => {
                self.visit_any(store, ray, *left, range)
                    || self.visit_any(store, ray, *right, range)
            }
        }
    }
}

fn visit_leaf<P: Primitive>(
    store: &PrimitiveStore<P>,
    ray: &Ray,
    prims: &[usize],
    closest: &mut HitResult,
) -> bool {
    let primitives = store.primitives();
    let mut hit = false;
    for &index in prims {
        if let Some(t) = primitives[index].intersect(ray) {
            if t < closest.distance {
                *closest = HitResult::hit(t, index);
                hit = true;
            }
        }
    }
    hit
}
