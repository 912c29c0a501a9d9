//! Ray casting through sector portals (picking / visibility).

use glam::Vec3;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::world::geometry::{CEILING, Contour, FLOOR, Level, LinedefId, SectorId, SidedefId};
use crate::world::plane::{cross, ray_segment};

/// Where a trace stopped.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TraceResult {
    pub position: Vec3,
    /// −1 = floor, +1 = ceiling, 0 = wall.
    pub z: i8,
    /// Wall that was hit; `None` for floor/ceiling hits.
    pub linedef: Option<LinedefId>,
    /// Sidedef of `linedef` facing the traced sector.
    pub sidedef: Option<SidedefId>,
    /// Sector the ray ended in.
    pub sector: SectorId,
}

impl TraceResult {
    #[inline]
    pub fn hit_flat(&self) -> bool {
        self.linedef.is_none()
    }
}

/// Nearest wall candidate inside the current sector.
struct WallHit {
    t: f32,
    contour: Contour,
    position: Vec3,
}

impl Level {
    /// Follow `origin + t·ray` (t > 0) from `sector` through portals until
    /// it hits a solid wall, a floor or a ceiling.
    ///
    /// `None` when the ray leaves the sector without hitting anything,
    /// which only happens for rays starting outside their sector or
    /// broken level data.
    pub fn trace(&self, sector: SectorId, origin: Vec3, ray: Vec3) -> Option<TraceResult> {
        let mut origin = origin;
        let mut sector = sector;

        // a straight ray crosses each linedef at most once
        let max_steps = self.linedef_count() as usize + 1;

        for _ in 0..max_steps {
            let wall = self.nearest_wall(sector, origin, ray);
            let plane = self.flat_hit(sector, origin, ray);

            // a flat wins when it is nearer than the wall (or there is none)
            if let Some((t, position, z)) = plane {
                if wall.as_ref().is_none_or(|w| t < w.t) {
                    return Some(TraceResult {
                        position,
                        z,
                        linedef: None,
                        sidedef: None,
                        sector,
                    });
                }
            }

            let wall = wall?;
            let mut result = TraceResult {
                position: wall.position,
                z: 0,
                linedef: Some(wall.contour.linedef),
                sidedef: wall.contour.sidedef(self),
                sector,
            };

            let Some(opposite_sd) = wall.contour.opposite_sidedef(self) else {
                return Some(result); // one-sided wall
            };
            let Some(opposite) = self.sidedef_sector(opposite_sd) else {
                return Some(result);
            };

            // portal: does the ray fit through the opening on the far side?
            let hit = wall.position.truncate();
            let pz = wall.position.z;
            let z0 = self.floor_z(opposite, hit).unwrap_or(f32::INFINITY);
            let z1 = self.ceiling_z(opposite, hit).unwrap_or(f32::NEG_INFINITY);
            if pz < z0 {
                result.z = -1;
                return Some(result);
            }
            if pz > z1 {
                result.z = 1;
                return Some(result);
            }

            origin = wall.position;
            sector = opposite;
        }

        warn!("trace from sector {sector} gave up after {max_steps} portal crossings");
        None
    }

    /// Nearest wall of `sector` the ray leaves through.
    ///
    /// Back faces are culled: only edges whose walk direction has the ray
    /// crossing from the right-hand (interior) side count.
    fn nearest_wall(&self, sector: SectorId, origin: Vec3, ray: Vec3) -> Option<WallHit> {
        let origin2 = origin.truncate();
        let ray2 = ray.truncate();
        let mut best: Option<WallHit> = None;

        for c in self.sector_contours(sector) {
            let (v0, v1) = self.linedef_points(self.linedef(c.linedef));
            let facing = if c.side() == 1 { 1.0 } else { -1.0 };
            if cross(ray2, v1 - v0) * facing < 0.0 {
                continue;
            }
            let Some((t, _u)) = ray_segment(origin2, ray2, v0, v1) else {
                continue;
            };
            if best.as_ref().is_none_or(|b| t < b.t) {
                best = Some(WallHit {
                    t,
                    contour: *c,
                    position: origin + ray * t,
                });
            }
        }
        best
    }

    /// Floor hit for downward rays, ceiling hit for upward ones.
    fn flat_hit(&self, sector: SectorId, origin: Vec3, ray: Vec3) -> Option<(f32, Vec3, i8)> {
        let sec = self.sector(sector);
        let (flat, z) = if ray.z > 0.0 {
            (CEILING, 1)
        } else if ray.z < 0.0 {
            (FLOOR, -1)
        } else {
            return None;
        };
        sec.flat[flat]
            .plane
            .ray_intersection(origin, ray)
            .map(|(t, p)| (t, p, z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::fixtures;
    use glam::vec3;

    #[test]
    fn straight_up_hits_ceiling() {
        let level = fixtures::one_box(256.0, 0.0, 64.0);
        let r = level
            .trace(0, vec3(100.0, 100.0, 32.0), Vec3::Z)
            .expect("enclosed box must stop the ray");
        assert_eq!(r.z, 1);
        assert_eq!(r.linedef, None);
        assert_eq!(r.sector, 0);
        assert!((r.position - vec3(100.0, 100.0, 64.0)).length() < 1e-4);
    }

    #[test]
    fn straight_down_hits_floor() {
        let level = fixtures::one_box(256.0, 8.0, 64.0);
        let r = level.trace(0, vec3(10.0, 20.0, 32.0), Vec3::NEG_Z).unwrap();
        assert_eq!(r.z, -1);
        assert!(r.hit_flat());
        assert!((r.position.z - 8.0).abs() < 1e-4);
    }

    #[test]
    fn horizontal_ray_stops_at_solid_wall() {
        let level = fixtures::one_box(256.0, 0.0, 64.0);
        let r = level.trace(0, vec3(128.0, 128.0, 32.0), Vec3::X).unwrap();
        assert_eq!(r.z, 0);
        let ld = r.linedef.unwrap();
        assert!(level.linedef(ld).is_one_sided());
        assert_eq!(r.sidedef, level.linedef(ld).sidedef[0]);
        assert!((r.position - vec3(256.0, 128.0, 32.0)).length() < 1e-3);
    }

    #[test]
    fn ray_passes_through_open_portal() {
        let level = fixtures::two_boxes();
        let r = level.trace(0, vec3(128.0, 128.0, 32.0), Vec3::X).unwrap();
        assert_eq!(r.sector, 1);
        assert_ne!(r.linedef, Some(fixtures::PORTAL));
        assert!(r.position.x >= 512.0 - 1e-3, "stopped at {:?}", r.position);
    }

    #[test]
    fn ray_back_through_portal() {
        let level = fixtures::two_boxes();
        let r = level.trace(1, vec3(400.0, 64.0, 20.0), Vec3::NEG_X).unwrap();
        assert_eq!(r.sector, 0);
        assert!(r.position.x.abs() < 1e-3);
    }

    #[test]
    fn raised_floor_blocks_portal() {
        // far floor at 48: a ray at z = 32 hits the step face
        let level = fixtures::two_boxes_with(0.0, 64.0, 48.0, 96.0);
        let r = level.trace(0, vec3(128.0, 128.0, 32.0), Vec3::X).unwrap();
        assert_eq!(r.linedef, Some(fixtures::PORTAL));
        assert_eq!(r.z, -1);
        assert_eq!(r.sector, 0);
    }

    #[test]
    fn lowered_ceiling_blocks_portal() {
        let level = fixtures::two_boxes_with(0.0, 64.0, 0.0, 24.0);
        let r = level.trace(0, vec3(128.0, 128.0, 32.0), Vec3::X).unwrap();
        assert_eq!(r.linedef, Some(fixtures::PORTAL));
        assert_eq!(r.z, 1);
    }

    #[test]
    fn descending_ray_lands_on_far_floor() {
        let level = fixtures::two_boxes();
        // crosses the portal at z = 16, reaches the floor at x = 320
        let ray = vec3(1.0, 0.0, -0.25);
        let r = level.trace(0, vec3(128.0, 128.0, 48.0), ray).unwrap();
        assert_eq!(r.z, -1);
        assert!(r.hit_flat());
        assert_eq!(r.sector, 1);
        assert!((r.position.x - 320.0).abs() < 1e-2);
    }

    #[test]
    fn many_portals_between_two_sectors() {
        // 39 portals, far more crossings than sectors
        let level = fixtures::cell_row(40);
        assert_eq!(level.sector_count(), 2);
        let r = level
            .trace(0, vec3(32.0, 32.0, 64.0), Vec3::X)
            .expect("the far wall must stop the ray");
        assert_eq!(r.z, 0);
        assert_eq!(r.sector, 1);
        assert!(level.linedef(r.linedef.unwrap()).is_one_sided());
        assert!((r.position.x - 40.0 * 64.0).abs() < 1e-2);
    }

    #[test]
    fn origin_outside_sector_finds_nothing() {
        let level = fixtures::one_box(256.0, 0.0, 64.0);
        // start east of the box looking further east: every wall is a back face
        assert!(level.trace(0, vec3(400.0, 128.0, 32.0), Vec3::X).is_none());
    }
}
