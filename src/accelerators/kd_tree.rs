use std::time::Instant;

use log::{debug, trace};

use crate::config::{IndexConfig, TraversalOrder};
use crate::error::Result;
use crate::types::Vec3;

use super::aabb::AABB;
use super::store::PrimitiveStore;
use super::Primitive;

/// Position of a node in its tree's node list.
pub type NodeId = usize;

#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    /// Primitive indices, stored in build order.
    Leaf(Vec<usize>),
    Branch { left: NodeId, right: NodeId },
}

#[derive(Clone, Debug, PartialEq)]
pub struct KdNode {
    pub bbox: AABB,
    pub kind: NodeKind,
}

impl KdNode {
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }

    /// Primitives held directly by this node. Always empty for a branch.
    pub fn primitives(&self) -> &[usize] {
        match &self.kind {
            NodeKind::Leaf(prims) => prims,
            NodeKind::Branch { .. } => &[],
        }
    }

    pub fn children(&self) -> Option<(NodeId, NodeId)> {
        match self.kind {
            NodeKind::Leaf(_) => None,
            NodeKind::Branch { left, right } => Some((left, right)),
        }
    }
}

/// Binary tree over primitive indices. Nodes live in one list owned by the
/// tree and refer to their children by position; the root is node 0.
/// A tree never changes after it is built.
#[derive(Clone, Debug)]
pub struct KdTree {
    nodes: Vec<KdNode>,
    traversal: TraversalOrder,
    /// Length of the store the tree was built against. Leaf indices are
    /// only meaningful for a store of this length.
    store_len: usize,
}

impl KdTree {
    pub const ROOT: NodeId = 0;

    /// Builds over every primitive of `store`.
    pub fn build<P: Primitive>(store: &PrimitiveStore<P>, config: IndexConfig) -> Result<Self> {
        KdTreeBuilder::new(store, config).build(store.all_indices())
    }

    pub fn root(&self) -> &KdNode {
        &self.nodes[Self::ROOT]
    }

    pub fn node(&self, id: NodeId) -> &KdNode {
        &self.nodes[id]
    }

    pub fn nodes(&self) -> &[KdNode] {
        &self.nodes
    }

    pub fn traversal_order(&self) -> TraversalOrder {
        self.traversal
    }

    pub fn store_len(&self) -> usize {
        self.store_len
    }

    /// Visits every node depth first, parents before children, passing the
    /// node's depth below the root.
    pub fn walk<F: FnMut(NodeId, usize, &KdNode)>(&self, mut f: F) {
        let mut stack = vec![(Self::ROOT, 0)];
        while let Some((id, depth)) = stack.pop() {
            let node = &self.nodes[id];
            f(id, depth, node);
            if let Some((left, right)) = node.children() {
                stack.push((right, depth + 1));
                stack.push((left, depth + 1));
            }
        }
    }
}

/// Median-split builder. The split axis cycles x, y, z with depth and each
/// node's primitives are ordered by centroid along it.
pub struct KdTreeBuilder<'a, P: Primitive> {
    store: &'a PrimitiveStore<P>,
    centers: Vec<Vec3>,
    config: IndexConfig,
    nodes: Vec<KdNode>,
}

impl<'a, P: Primitive> KdTreeBuilder<'a, P> {
    pub fn new(store: &'a PrimitiveStore<P>, config: IndexConfig) -> Self {
        let centers = store.primitives().iter().map(P::centroid).collect();
        Self {
            store,
            centers,
            config,
            nodes: Vec::new(),
        }
    }

    pub fn build(mut self, indices: Vec<usize>) -> Result<KdTree> {
        self.config.validate()?;
        self.store
            .check_indices(&indices, self.config.strict_coverage)?;

        let start = Instant::now();
        let prim_count = indices.len();
        self.nodes.reserve(2 * prim_count / self.config.leaf_threshold + 1);
        self.build_recursively(indices, 0);

        let tree = KdTree {
            nodes: self.nodes,
            traversal: self.config.traversal,
            store_len: self.store.len(),
        };
        debug!(
            "kd-tree over {} primitives built in {:.4}s: {}",
            prim_count,
            start.elapsed().as_secs_f32(),
            tree.stats()
        );
        Ok(tree)
    }

    fn build_recursively(&mut self, mut indices: Vec<usize>, depth: usize) -> NodeId {
        let node_idx = self.nodes.len();
        let bbox = self.store.compute_bounds(&indices);

        if indices.len() <= self.config.leaf_threshold || depth >= self.config.max_depth {
            trace!("leaf {} at depth {} with {} primitives", node_idx, depth, indices.len());
            self.nodes.push(KdNode {
                bbox,
                kind: NodeKind::Leaf(indices),
            });
            return node_idx;
        }

        // Children are filled in once both subtrees exist.
        self.nodes.push(KdNode {
            bbox,
            kind: NodeKind::Leaf(Vec::new()),
        });

        let axis = depth % 3;
        let centers = &self.centers;
        indices.sort_by(|&a, &b| {
            centers[a][axis]
                .total_cmp(&centers[b][axis])
                .then(a.cmp(&b))
        });

        let upper = indices.split_off(indices.len() / 2);
        let left = self.build_recursively(indices, depth + 1);
        let right = self.build_recursively(upper, depth + 1);

        self.nodes[node_idx].kind = NodeKind::Branch { left, right };
        node_idx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IndexError;
    use crate::scene;
    use crate::types::{Point3, Sphere, Triangle};

    const TOLERANCE: f64 = 1e-9;

    fn leaves(tree: &KdTree) -> Vec<(usize, Vec<usize>)> {
        let mut out = Vec::new();
        tree.walk(|_, depth, node| {
            if node.is_leaf() {
                out.push((depth, node.primitives().to_vec()));
            }
        });
        out
    }

    fn row_of_spheres(n: usize) -> PrimitiveStore<Sphere> {
        (0..n)
            .map(|i| Sphere::new(Point3::new(i as f64, 0.0, -5.0), 0.25))
            .collect()
    }

    #[test]
    fn test_single_primitive_root_is_leaf() {
        let store = row_of_spheres(1);
        let tree = KdTree::build(&store, IndexConfig::default()).unwrap();
        assert_eq!(tree.nodes().len(), 1);
        assert!(tree.root().is_leaf());
        assert_eq!(tree.root().primitives(), &[0]);
    }

    #[test]
    fn test_two_triangles_fit_in_one_leaf() {
        let store = scene::two_triangle_quad();
        let tree = KdTree::build(&store, IndexConfig::default()).unwrap();
        assert_eq!(tree.nodes().len(), 1);
        assert_eq!(tree.root().primitives(), &[0, 1]);
        assert_eq!(tree.root().bbox.min, Point3::new(-1.0, -1.0, -5.0));
        assert_eq!(tree.root().bbox.max, Point3::new(1.0, 1.0, -5.0));
    }

    #[test]
    fn test_empty_index_list_gives_empty_leaf() {
        let store = row_of_spheres(0);
        let tree = KdTree::build(&store, IndexConfig::default()).unwrap();
        assert_eq!(tree.nodes().len(), 1);
        assert!(tree.root().is_leaf());
        assert!(tree.root().bbox.is_empty());
    }

    #[test]
    fn test_split_on_x_at_root() {
        // Built in reverse so the sort has work to do.
        let store: PrimitiveStore<Sphere> = (0..4)
            .rev()
            .map(|i| Sphere::new(Point3::new(i as f64, 0.0, -5.0), 0.25))
            .collect();
        let tree = KdTree::build(&store, IndexConfig::default()).unwrap();

        let (left, right) = tree.root().children().expect("root should split");
        // Primitive 3 sits at x = 0, primitive 0 at x = 3.
        assert_eq!(tree.node(left).primitives(), &[3, 2]);
        assert_eq!(tree.node(right).primitives(), &[1, 0]);
    }

    #[test]
    fn test_ties_break_by_index() {
        let store: PrimitiveStore<Sphere> = (0..5)
            .map(|_| Sphere::new(Point3::new(0.0, 0.0, -5.0), 1.0))
            .collect();
        let tree = KdTree::build(&store, IndexConfig::default()).unwrap();
        let leaves = leaves(&tree);
        let flat: Vec<usize> = leaves.iter().flat_map(|(_, p)| p.clone()).collect();
        assert_eq!(flat, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_odd_count_splits_lower_half_smaller() {
        let store = row_of_spheres(5);
        let tree = KdTree::build(&store, IndexConfig::default()).unwrap();
        let (left, right) = tree.root().children().unwrap();
        assert_eq!(tree.node(left).primitives(), &[0, 1]);
        assert!(!tree.node(right).is_leaf());
    }

    #[test]
    fn test_coverage() {
        let mut rng = fastrand::Rng::with_seed(7);
        let store = scene::random_triangles(&mut rng, 300);
        let tree = KdTree::build(&store, IndexConfig::default()).unwrap();

        let mut all: Vec<usize> = leaves(&tree).into_iter().flat_map(|(_, p)| p).collect();
        all.sort_unstable();
        assert_eq!(all, store.all_indices());
    }

    #[test]
    fn test_leaf_size_and_depth_bounds() {
        let mut rng = fastrand::Rng::with_seed(11);
        let store = scene::random_spheres(&mut rng, 257);
        let config = IndexConfig::default();
        let tree = KdTree::build(&store, config).unwrap();

        for (depth, prims) in leaves(&tree) {
            assert!(prims.len() <= config.leaf_threshold);
            assert!(depth <= config.max_depth);
        }
    }

    #[test]
    fn test_depth_cap_makes_large_leaves() {
        let store = row_of_spheres(64);
        let config = IndexConfig {
            max_depth: 2,
            ..IndexConfig::default()
        };
        let tree = KdTree::build(&store, config).unwrap();
        let leaves = leaves(&tree);
        assert_eq!(leaves.len(), 4);
        for (depth, prims) in leaves {
            assert_eq!(depth, 2);
            assert_eq!(prims.len(), 16);
        }
    }

    // Every primitive below a node, gathered from the leaves of its subtree.
    fn subtree_prims(tree: &KdTree, id: NodeId, out: &mut Vec<usize>) {
        let node = tree.node(id);
        out.extend_from_slice(node.primitives());
        if let Some((l, r)) = node.children() {
            subtree_prims(tree, l, out);
            subtree_prims(tree, r, out);
        }
    }

    fn assert_children_nested(tree: &KdTree, node: &KdNode) {
        if let Some((l, r)) = node.children() {
            assert!(node.bbox.contains_box(&tree.node(l).bbox, TOLERANCE));
            assert!(node.bbox.contains_box(&tree.node(r).bbox, TOLERANCE));
        }
    }

    #[test]
    fn test_boxes_contain_primitives_and_children() {
        let mut rng = fastrand::Rng::with_seed(3);
        let store = scene::random_triangles(&mut rng, 120);
        let tree = KdTree::build(&store, IndexConfig::default()).unwrap();

        tree.walk(|id, _, node| {
            let mut prims = Vec::new();
            subtree_prims(&tree, id, &mut prims);
            for i in prims {
                let tri: &Triangle = store.get(i).unwrap();
                for v in tri.vertices {
                    assert!(node.bbox.contains_point(v, TOLERANCE));
                }
            }
            assert_children_nested(&tree, node);
        });
    }

    #[test]
    fn test_boxes_contain_spheres_and_children() {
        let mut rng = fastrand::Rng::with_seed(13);
        let store = scene::random_spheres(&mut rng, 120);
        let tree = KdTree::build(&store, IndexConfig::default()).unwrap();
        assert!(tree.nodes().len() > 1);

        tree.walk(|id, _, node| {
            let mut prims = Vec::new();
            subtree_prims(&tree, id, &mut prims);
            for i in prims {
                let sphere: &Sphere = store.get(i).unwrap();
                let r = Vec3::splat(sphere.radius);
                assert!(node.bbox.contains_point(sphere.center - r, TOLERANCE));
                assert!(node.bbox.contains_point(sphere.center + r, TOLERANCE));
            }
            assert_children_nested(&tree, node);
        });
    }

    #[test]
    fn test_build_is_deterministic() {
        let mut rng = fastrand::Rng::with_seed(5);
        let store = scene::random_spheres(&mut rng, 90);
        let a = KdTree::build(&store, IndexConfig::default()).unwrap();
        let b = KdTree::build(&store, IndexConfig::default()).unwrap();
        assert_eq!(a.nodes(), b.nodes());
    }

    #[test]
    fn test_subset_build() {
        let store = row_of_spheres(10);
        let tree = KdTreeBuilder::new(&store, IndexConfig::default())
            .build(vec![9, 3, 5])
            .unwrap();
        let mut all: Vec<usize> = leaves(&tree).into_iter().flat_map(|(_, p)| p).collect();
        all.sort_unstable();
        assert_eq!(all, vec![3, 5, 9]);
    }

    #[test]
    fn test_out_of_range_rejected() {
        let store = row_of_spheres(3);
        let err = KdTreeBuilder::new(&store, IndexConfig::default())
            .build(vec![0, 1, 7])
            .unwrap_err();
        assert!(matches!(err, IndexError::InvalidIndex { index: 7, len: 3 }));
    }

    #[test]
    fn test_strict_coverage() {
        let store = row_of_spheres(3);
        let strict = IndexConfig {
            strict_coverage: true,
            ..IndexConfig::default()
        };
        assert!(matches!(
            KdTreeBuilder::new(&store, strict).build(vec![0, 1, 1]),
            Err(IndexError::DuplicateIndex(1))
        ));
        assert!(matches!(
            KdTreeBuilder::new(&store, strict).build(vec![0, 2]),
            Err(IndexError::MissingIndex(1))
        ));
        // Without the flag duplicates build a tree that simply repeats them.
        let loose = KdTreeBuilder::new(&store, IndexConfig::default())
            .build(vec![0, 1, 1])
            .unwrap();
        let count: usize = leaves(&loose).iter().map(|(_, p)| p.len()).sum();
        assert_eq!(count, 3);
    }

    #[test]
    fn test_zero_leaf_threshold_rejected() {
        let store = row_of_spheres(3);
        let config = IndexConfig {
            leaf_threshold: 0,
            ..IndexConfig::default()
        };
        assert!(matches!(
            KdTree::build(&store, config),
            Err(IndexError::InvalidConfig(_))
        ));
    }
}
