use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Plane `a·x + b·y + c·z + d = 0`, normal = `(a, b, c)`.
///
/// Floors face up (`c > 0`), ceilings face down (`c < 0`).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub normal: Vec3,
    pub d: f32,
}

impl Default for Plane {
    fn default() -> Self {
        Plane::floor(0.0)
    }
}

impl Plane {
    pub const fn new(normal: Vec3, d: f32) -> Self {
        Self { normal, d }
    }

    /// Horizontal floor at height `z`, normal pointing up.
    pub fn floor(z: f32) -> Self {
        Self::new(Vec3::Z, -z)
    }

    /// Horizontal ceiling at height `z`, normal pointing down.
    pub fn ceiling(z: f32) -> Self {
        Self::new(Vec3::NEG_Z, z)
    }

    /// Height of the plane above `p`.  `None` for vertical planes.
    #[inline]
    pub fn z_at(&self, p: Vec2) -> Option<f32> {
        let n = self.normal;
        if n.z == 0.0 {
            return None;
        }
        Some(-(n.x * p.x + n.y * p.y + self.d) / n.z)
    }

    /// Shift the plane by `dz` along Z (slope unchanged).
    #[inline]
    pub fn raise(&mut self, dz: f32) {
        self.d -= dz * self.normal.z;
    }

    /// Intersect the ray `origin + t·ray`.
    ///
    /// Returns `(t, hit)` only for `t > 0`; parallel rays miss.
    pub fn ray_intersection(&self, origin: Vec3, ray: Vec3) -> Option<(f32, Vec3)> {
        let denom = self.normal.dot(ray);
        if denom == 0.0 {
            return None;
        }
        let t = -(self.normal.dot(origin) + self.d) / denom;
        if t > 0.0 && t.is_finite() {
            Some((t, origin + ray * t))
        } else {
            None
        }
    }
}

/// 2-D cross product (`a.x·b.y − a.y·b.x`).
#[inline(always)]
pub fn cross(a: Vec2, b: Vec2) -> f32 {
    a.perp_dot(b)
}

/// Right-hand normal of `v` (not normalised).  For a contour edge this
/// points into the sector.
#[inline(always)]
pub fn right_normal(v: Vec2) -> Vec2 {
    Vec2::new(v.y, -v.x)
}

/// Ray `origin + t·dir` against segment `v0 + u·(v1 − v0)`.
///
/// Returns `(t, u)` for `t >= 0`, `u ∈ [0, 1]`.  Parallel lines never hit.
#[inline]
pub fn ray_segment(origin: Vec2, dir: Vec2, v0: Vec2, v1: Vec2) -> Option<(f32, f32)> {
    let vd = v1 - v0;
    let rxs = cross(dir, vd);
    if rxs == 0.0 {
        return None;
    }
    let qp = v0 - origin;
    let t = cross(qp, vd) / rxs;
    if t < 0.0 {
        return None;
    }
    let u = cross(qp, dir) / rxs;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    Some((t, u))
}

/// Does the ray cast north (+Y) from `p` cross segment `v0 → v1`?
///
/// Half-open in X: an edge counts only when its endpoints lie on opposite
/// sides of `x = p.x`, with `x == p.x` grouped with the left side.  A ray
/// through a shared vertex therefore crosses one of the two edges, and
/// vertical edges never count.  Crossings at `y == p.y` count.
#[inline]
pub fn crosses_north(p: Vec2, v0: Vec2, v1: Vec2) -> bool {
    if (v0.x > p.x) == (v1.x > p.x) {
        return false;
    }
    let y = v0.y + (p.x - v0.x) / (v1.x - v0.x) * (v1.y - v0.y);
    y >= p.y
}
