use crate::error::{IndexError, Result};
use crate::ray::Ray;

use super::aabb::AABB;
use super::traverse::HitResult;
use super::Primitive;

/// Immutable list of primitives. Everything else refers to them by index.
#[derive(Clone, Debug, Default)]
pub struct PrimitiveStore<P: Primitive> {
    primitives: Vec<P>,
}

impl<P: Primitive> From<Vec<P>> for PrimitiveStore<P> {
    fn from(primitives: Vec<P>) -> Self {
        Self { primitives }
    }
}

impl<P: Primitive> FromIterator<P> for PrimitiveStore<P> {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self {
            primitives: iter.into_iter().collect(),
        }
    }
}

impl<P: Primitive> PrimitiveStore<P> {
    pub fn new(primitives: Vec<P>) -> Self {
        Self { primitives }
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&P> {
        self.primitives.get(index)
    }

    pub fn primitives(&self) -> &[P] {
        &self.primitives
    }

    /// `0..len`, the index list covering every primitive once.
    pub fn all_indices(&self) -> Vec<usize> {
        (0..self.primitives.len()).collect()
    }

    /// Tightest box around the referenced primitives, or [`AABB::EMPTY`] for
    /// an empty list. Every index must be in range.
    pub fn compute_bounds(&self, indices: &[usize]) -> AABB {
        indices
            .iter()
            .fold(AABB::EMPTY, |bb, &i| bb.grow_bb(&self.primitives[i].aabb()))
    }

    /// Fails on the first out-of-range index. With `strict` the list must
    /// also name every primitive exactly once.
    pub fn check_indices(&self, indices: &[usize], strict: bool) -> Result<()> {
        let len = self.primitives.len();
        let mut seen = vec![false; if strict { len } else { 0 }];

        for &index in indices {
            if index >= len {
                return Err(IndexError::InvalidIndex { index, len });
            }
            if strict {
                if seen[index] {
                    return Err(IndexError::DuplicateIndex(index));
                }
                seen[index] = true;
            }
        }

        if let Some(missing) = seen.iter().position(|&s| !s) {
            return Err(IndexError::MissingIndex(missing));
        }
        Ok(())
    }

    /// Tests every primitive. The result a tree traversal must agree with.
    pub fn closest_hit_linear(&self, ray: &Ray) -> HitResult {
        let mut result = HitResult::miss();
        for (index, prim) in self.primitives.iter().enumerate() {
            if let Some(t) = prim.intersect(ray) {
                if t < result.distance {
                    result = HitResult::hit(t, index);
                }
            }
        }
        result
    }
}
