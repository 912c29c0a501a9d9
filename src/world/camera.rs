use glam::{Vec2, Vec3};

use crate::world::geometry::Entity;

/// View basis of an entity.
///
/// * `yaw` is in degrees, 0 = looking towards −Y, positive turns towards +X.
/// * `pitch` tilts `dir` towards `up` (degrees); `up` stays perpendicular.
/// * `right = up × dir` at zero pitch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub pos: Vec3,
    pub dir: Vec3,
    pub right: Vec3,
    pub up: Vec3,
}

impl Camera {
    pub fn from_entity(entity: &Entity) -> Self {
        let (s, c) = entity.yaw.to_radians().sin_cos();
        let flat = Vec3::new(s, -c, 0.0);
        let right = Vec3::Z.cross(flat);

        let (ps, pc) = entity.pitch.to_radians().sin_cos();
        let dir = flat * pc + Vec3::Z * ps;
        let up = dir.cross(right);

        Self {
            pos: entity.position.extend(entity.z),
            dir,
            right,
            up,
        }
    }

    /// Unit heading on the X-Y plane.
    #[inline(always)]
    pub fn forward(&self) -> Vec2 {
        self.dir.truncate().normalize_or_zero()
    }

    /// Unit ray through pixel `(mx, my)` of a `width × height` view with a
    /// vertical field of view of `fovy` degrees.
    ///
    /// Pixel rows grow downward; the centre pixel maps to `dir`.
    pub fn mouse_ray(&self, fovy: f32, mx: i32, my: i32, width: i32, height: i32) -> Vec3 {
        let half_w = width >> 1;
        let half_h = (height >> 1).max(1);
        let s = (fovy * 0.5).to_radians().tan() / half_h as f32;
        let x = (mx - half_w) as f32 * s;
        let y = (my - half_h) as f32 * s;
        (self.dir + self.right * x - self.up * y).normalize()
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
