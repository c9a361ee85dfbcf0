use core::fmt;

use serde::Serialize;

use super::kd_tree::{KdTree, NodeId};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub leaf_nodes: usize,
    pub branch_nodes: usize,
    pub empty_leaves: usize,
    pub min_leaf_depth: usize,
    pub max_depth: usize,
    pub total_leaf_depth: usize,
    pub max_leaf_size: usize,
    pub total_leaf_primitives: usize,
}

impl TreeStats {
    pub fn average_leaf_depth(&self) -> f32 {
        if self.leaf_nodes == 0 {
            return 0.0;
        }
        self.total_leaf_depth as f32 / self.leaf_nodes as f32
    }

    pub fn average_leaf_size(&self) -> f32 {
        if self.leaf_nodes == 0 {
            return 0.0;
        }
        self.total_leaf_primitives as f32 / self.leaf_nodes as f32
    }
}

impl fmt::Display for TreeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} nodes ({} leaves, {} branches), depth {}..={} (avg {:.2}), leaf size max {} avg {:.2}",
            self.total_nodes,
            self.leaf_nodes,
            self.branch_nodes,
            self.min_leaf_depth,
            self.max_depth,
            self.average_leaf_depth(),
            self.max_leaf_size,
            self.average_leaf_size(),
        )
    }
}

impl KdTree {
    pub fn stats(&self) -> TreeStats {
        let mut info = TreeStats {
            min_leaf_depth: usize::MAX,
            ..TreeStats::default()
        };

        self.walk(|_, depth, node| {
            info.total_nodes += 1;
            info.max_depth = info.max_depth.max(depth);

            if node.is_leaf() {
                let prim_count = node.primitives().len();
                info.leaf_nodes += 1;
                info.min_leaf_depth = info.min_leaf_depth.min(depth);
                info.total_leaf_depth += depth;
                info.max_leaf_size = info.max_leaf_size.max(prim_count);
                info.total_leaf_primitives += prim_count;
                if prim_count == 0 {
                    info.empty_leaves += 1;
                }
            } else {
                info.branch_nodes += 1;
            }
        });

        info
    }

    /// Renders the tree with one line per node, for debugging small trees.
    pub fn to_ascii(&self) -> String {
        fn build(tree: &KdTree, id: NodeId, level: usize) -> ascii_tree::Tree {
            let node = tree.node(id);
            let bbox = &node.bbox;
            match node.children() {
                Some((left, right)) => ascii_tree::Tree::Node(
                    format!("level: {} ({}, {})", level, bbox.min, bbox.max),
                    vec![build(tree, left, level + 1), build(tree, right, level + 1)],
                ),
                None => ascii_tree::Tree::Leaf(vec![format!(
                    "leaf {:?}: ({}, {})",
                    node.primitives(),
                    bbox.min,
                    bbox.max
                )]),
            }
        }

        let mut output = String::new();
        let _ = ascii_tree::write_tree(&mut output, &build(self, KdTree::ROOT, 0));
        output
    }
}
