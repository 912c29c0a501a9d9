use glam::Vec2;

use crate::world::geometry::{CEILING, FLOOR, Level, SectorId};
use crate::world::plane::crosses_north;

impl Level {
    /// Even-odd test: is `p` inside `sector`?
    ///
    /// Casts a ray north (+Y) from `p` and counts crossings with every
    /// edge of the sector's loops (see [`crosses_north`]).  For an
    /// axis-aligned box a point on the top or left edge is inside, a point
    /// on the bottom or right edge is not, so a wall shared by two sectors
    /// belongs to exactly one of them.
    pub fn sector_inside(&self, sector: SectorId, p: Vec2) -> bool {
        let crossings = self
            .sector_contours(sector)
            .iter()
            .filter(|c| {
                let (v0, v1) = self.linedef_points(self.linedef(c.linedef));
                crosses_north(p, v0, v1)
            })
            .count();
        crossings & 1 == 1
    }

    /// First sector containing `p`, scanning every sector in index order.
    // TODO: replace the linear scan with a blockmap once levels outgrow it.
    pub fn sector_find(&self, p: Vec2) -> Option<SectorId> {
        (0..self.sector_count()).find(|&s| self.sector_inside(s, p))
    }

    /// Floor height of `sector` above `p`.
    #[inline]
    pub fn floor_z(&self, sector: SectorId, p: Vec2) -> Option<f32> {
        self.sector(sector).flat[FLOOR].plane.z_at(p)
    }

    /// Ceiling height of `sector` above `p`.
    #[inline]
    pub fn ceiling_z(&self, sector: SectorId, p: Vec2) -> Option<f32> {
        self.sector(sector).flat[CEILING].plane.z_at(p)
    }

    /// Vertical opening of `sector` at `p`; zero where a plane is degenerate.
    pub fn headroom(&self, sector: SectorId, p: Vec2) -> f32 {
        match (self.floor_z(sector, p), self.ceiling_z(sector, p)) {
            (Some(f), Some(c)) => c - f,
            _ => 0.0,
        }
    }
}
