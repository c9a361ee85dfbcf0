use crate::interval::Interval;
use crate::ray::Ray;
use crate::types::Point3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AABB {
    pub min: Point3,
    pub max: Point3,
}

impl Default for AABB {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl AABB {
    /// Inverted box covering nothing. Growing it by any point yields that point.
    pub const EMPTY: AABB = AABB {
        min: Point3::splat(f64::INFINITY),
        max: Point3::splat(f64::NEG_INFINITY),
    };

    #[inline]
    pub fn new(p0: Point3, p1: Point3) -> Self {
        AABB {
            min: p0.min(p1),
            max: p0.max(p1),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    #[inline(always)]
    pub fn grow(&self, vertex: Point3) -> AABB {
        AABB {
            min: self.min.min(vertex),
            max: self.max.max(vertex),
        }
    }

    #[inline(always)]
    pub fn grow_bb(&self, aabb: &Self) -> AABB {
        Self::combine(self, aabb)
    }

    #[inline(always)]
    pub fn combine(box0: &AABB, box1: &AABB) -> AABB {
        AABB {
            min: box0.min.min(box1.min),
            max: box0.max.max(box1.max),
        }
    }

    /// Slab test. Returns the part of `ray_t` during which the ray is inside
    /// the box, or `None` when that part is empty.
    ///
    /// A zero direction component means the ray runs parallel to that slab:
    /// it is inside for every `t` if the origin lies between the planes and
    /// never otherwise. This keeps `0 / 0` out of the interval math.
    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<Interval> {
        if self.is_empty() {
            return None;
        }

        let mut t = ray_t;
        for a in 0..3 {
            let origin = ray.origin()[a];
            let dir = ray.direction()[a];

            if dir == 0.0 {
                if origin < self.min[a] || origin > self.max[a] {
                    return None;
                }
                continue;
            }

            let inv_d = 1.0 / dir;
            let t0 = (self.min[a] - origin) * inv_d;
            let t1 = (self.max[a] - origin) * inv_d;
            let slab = if inv_d < 0.0 {
                Interval::new(t1, t0)
            } else {
                Interval::new(t0, t1)
            };
            t = Interval::overlap(&t, &slab);
            if t.is_empty() {
                return None;
            }
        }
        Some(t)
    }
}

// Containment checks used by the tree property tests.
#[cfg(test)]
impl AABB {
    pub(crate) fn contains_point(&self, p: Point3, tolerance: f64) -> bool {
        (0..3).all(|a| self.min[a] - tolerance <= p[a] && p[a] <= self.max[a] + tolerance)
    }

    /// An empty `other` is contained in anything.
    pub(crate) fn contains_box(&self, other: &AABB, tolerance: f64) -> bool {
        other.is_empty()
            || (self.contains_point(other.min, tolerance) && self.contains_point(other.max, tolerance))
    }
}
