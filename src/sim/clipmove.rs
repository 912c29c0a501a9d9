//! Entity movement against level walls.
//!
//! Entities are circles on the X-Y plane.  A move is cut into fragments
//! no longer than `radius / CLIP_SUBDIVISION`; after each fragment the
//! circle is pushed out of every impassable wall it overlaps.  Walls are
//! impassable when one-sided, or when either adjoining sector is too low
//! for the entity to stand in.

use glam::Vec2;
use log::warn;

use crate::defs::{
    self, ACCELERATION, CLIP_EPSILON, CLIP_SUBDIVISION, EntityInfo, FRICTION, MAX_CLIP_FRAGMENTS,
    STOP_THRESHOLD,
};
use crate::world::geometry::{Contour, EntityId, Level};
use crate::world::plane::right_normal;

/// Re-derive `entity.sector` from its position.
pub fn entity_update_sector(level: &mut Level, id: EntityId) {
    let pos = level.entity(id).position;
    let sector = level.sector_find(pos);
    level.entity_mut(id).sector = sector;
}

/// Update the sector and stand the entity on its floor at eye height.
///
/// Entities outside every sector keep their previous `z`.
pub fn entity_place(level: &mut Level, id: EntityId) {
    entity_update_sector(level, id);
    let ent = level.entity(id);
    let info = defs::by_type(ent.type_id);
    let floor = ent.sector.and_then(|s| level.floor_z(s, ent.position));
    if let Some(floor) = floor {
        level.entity_mut(id).z = floor + info.eye_height;
    }
}

/// Move by `delta`, sliding along walls instead of passing through them.
pub fn entity_clipmove(level: &mut Level, id: EntityId, delta: Vec2) {
    let ent = *level.entity(id);
    let info = defs::by_type(ent.type_id);

    let len = delta.length();
    if !len.is_finite() {
        warn!("entity {id}: ignoring non-finite move {delta:?}");
        return;
    }
    let max_fragment = info.radius / CLIP_SUBDIVISION;
    let wanted = (len / max_fragment).ceil();
    let (steps, fragment) = if wanted > MAX_CLIP_FRAGMENTS as f32 {
        warn!("entity {id}: move of {len} cut to {MAX_CLIP_FRAGMENTS} fragments");
        (MAX_CLIP_FRAGMENTS, delta * (max_fragment / len))
    } else {
        let steps = (wanted as u32).max(1);
        (steps, delta / steps as f32)
    };

    let mut pos = ent.position;
    for _ in 0..steps {
        pos += fragment;
        for c in level.contours() {
            if let Some(escape) = clip_against(level, c, pos, info) {
                pos += escape;
            }
        }
    }

    level.entity_mut(id).position = pos;
    entity_place(level, id);
}

/// `velocity += accel · dt · ACCELERATION`
pub fn entity_accelerate(level: &mut Level, id: EntityId, accel: Vec2, dt: f32) {
    level.entity_mut(id).velocity += accel * (dt * ACCELERATION);
}

/// Apply friction for `dt` seconds, then move by the remaining velocity.
pub fn entity_integrate(level: &mut Level, id: EntityId, dt: f32) {
    let ent = level.entity_mut(id);
    ent.velocity *= FRICTION.powf(dt);
    if ent.velocity.length_squared() < STOP_THRESHOLD {
        ent.velocity = Vec2::ZERO;
    }
    let delta = ent.velocity * dt;
    entity_clipmove(level, id, delta);
}

/// Push needed to get a circle at `pos` clear of `c`'s wall, or `None`
/// when it does not touch the wall or the wall lets it through.
fn clip_against(level: &Level, c: &Contour, pos: Vec2, info: &EntityInfo) -> Option<Vec2> {
    let ld = level.linedef(c.linedef);
    let (v0, v1) = level.linedef_points(ld);
    let vd = v1 - v0;
    let radius = info.radius;

    let vn = right_normal(vd).try_normalize()?; // zero-length wall
    let dw = pos - v0;
    let d = dw.dot(vn);
    if d.abs() > radius {
        return None;
    }

    let length = vd.length();
    let u = (vd / length).dot(dw);
    let escape = if (0.0..=length).contains(&u) {
        let sign = if d > 0.0 { 1.0 } else { -1.0 };
        vn * ((radius - d.abs() + CLIP_EPSILON) * sign)
    } else {
        let corner = if u < 0.0 { v0 } else { v1 };
        let away = pos - corner;
        let dist = away.length();
        if dist > radius {
            return None;
        }
        away.try_normalize()? * (radius - dist + CLIP_EPSILON)
    };

    impassable(level, c, pos, info).then_some(escape)
}

fn impassable(level: &Level, c: &Contour, pos: Vec2, info: &EntityInfo) -> bool {
    let ld = level.linedef(c.linedef);
    if ld.is_one_sided() {
        return true;
    }
    ld.sidedef
        .iter()
        .flatten()
        .filter_map(|&sd| level.sidedef_sector(sd))
        .any(|s| level.headroom(s, pos) < info.height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defs::PLAYER;
    use crate::world::fixtures;
    use glam::vec2;

    fn spawn(level: &mut Level, pos: Vec2) -> EntityId {
        let id = level.new_entity();
        level.entity_mut(id).position = pos;
        entity_place(level, id);
        id
    }

    /// Distance from `p` to the nearest one-sided wall.
    fn wall_clearance(level: &Level, p: Vec2) -> f32 {
        level
            .linedefs()
            .iter()
            .filter(|l| l.is_one_sided())
            .map(|l| {
                let (a, b) = level.linedef_points(l);
                let ab = b - a;
                let t = ((p - a).dot(ab) / ab.length_squared()).clamp(0.0, 1.0);
                (a + ab * t).distance(p)
            })
            .fold(f32::INFINITY, f32::min)
    }

    #[test]
    fn placement_sets_sector_and_eye_height() {
        let mut level = fixtures::two_boxes_with(0.0, 128.0, 24.0, 128.0);
        let id = spawn(&mut level, vec2(400.0, 100.0));
        assert_eq!(level.entity(id).sector, Some(1));
        assert!((level.entity(id).z - (24.0 + PLAYER.eye_height)).abs() < 1e-4);
    }

    #[test]
    fn outside_every_sector_keeps_z() {
        let mut level = fixtures::one_box(256.0, 0.0, 64.0);
        let id = level.new_entity();
        level.entity_mut(id).position = vec2(-500.0, 0.0);
        level.entity_mut(id).z = 7.0;
        entity_place(&mut level, id);
        assert_eq!(level.entity(id).sector, None);
        assert_eq!(level.entity(id).z, 7.0);
    }

    #[test]
    fn free_move_is_exact() {
        let mut level = fixtures::one_box(512.0, 0.0, 64.0);
        let id = spawn(&mut level, vec2(128.0, 128.0));
        entity_clipmove(&mut level, id, vec2(100.0, 50.0));
        let p = level.entity(id).position;
        assert!((p - vec2(228.0, 178.0)).length() < 1e-2);
    }

    #[test]
    fn wall_stops_the_entity() {
        let mut level = fixtures::one_box(256.0, 0.0, 64.0);
        let id = spawn(&mut level, vec2(128.0, 128.0));
        entity_clipmove(&mut level, id, vec2(1000.0, 0.0));

        let p = level.entity(id).position;
        assert!(p.x <= 256.0 - PLAYER.radius + 0.01, "went through: {p:?}");
        assert!(wall_clearance(&level, p) >= PLAYER.radius - 1e-3);
        assert!((p.y - 128.0).abs() < 1e-3);
        assert_eq!(level.entity(id).sector, Some(0));
    }

    #[test]
    fn huge_move_is_cut_short() {
        let mut level = fixtures::one_box(256.0, 0.0, 64.0);
        let id = spawn(&mut level, vec2(128.0, 128.0));
        entity_clipmove(&mut level, id, vec2(1e12, 0.0));

        let p = level.entity(id).position;
        assert!(p.is_finite());
        assert!(p.x <= 256.0 - PLAYER.radius + 0.01, "went through: {p:?}");
        assert!(wall_clearance(&level, p) >= PLAYER.radius - 1e-3);
        assert_eq!(level.entity(id).sector, Some(0));
    }

    #[test]
    fn slides_along_a_wall() {
        let mut level = fixtures::one_box(512.0, 0.0, 64.0);
        let id = spawn(&mut level, vec2(100.0, 100.0));
        entity_clipmove(&mut level, id, vec2(-200.0, 100.0));
        let p = level.entity(id).position;
        assert!((p.x - PLAYER.radius).abs() < 0.01);
        assert!((p.y - 200.0).abs() < 1e-2);
    }

    #[test]
    fn pushed_out_of_a_corner() {
        let mut level = fixtures::one_box(256.0, 0.0, 64.0);
        let id = spawn(&mut level, vec2(128.0, 128.0));
        entity_clipmove(&mut level, id, vec2(-500.0, -500.0));
        let p = level.entity(id).position;
        assert!(wall_clearance(&level, p) >= PLAYER.radius - 1e-3);
        assert!(level.sector_inside(0, p));
    }

    #[test]
    fn pillar_corner_deflects() {
        let mut level = fixtures::box_with_pillar();
        // graze the pillar's (192, 192) corner
        let id = spawn(&mut level, vec2(100.0, 180.0));
        entity_clipmove(&mut level, id, vec2(200.0, 0.0));
        let p = level.entity(id).position;
        assert!(p.distance(vec2(192.0, 192.0)) >= PLAYER.radius - 1e-3);
        assert!(p.y < 192.0);
    }

    #[test]
    fn walks_through_an_open_portal() {
        let mut level = fixtures::two_boxes();
        let id = spawn(&mut level, vec2(128.0, 128.0));
        entity_clipmove(&mut level, id, vec2(256.0, 0.0));

        let ent = level.entity(id);
        assert!((ent.position - vec2(384.0, 128.0)).length() < 1e-2);
        assert_eq!(ent.sector, Some(1));
        assert!((ent.z - PLAYER.eye_height).abs() < 1e-4);
    }

    #[test]
    fn low_ceiling_blocks_the_portal() {
        let mut level = fixtures::two_boxes_with(0.0, 64.0, 0.0, 40.0);
        let id = spawn(&mut level, vec2(128.0, 128.0));
        entity_clipmove(&mut level, id, vec2(256.0, 0.0));

        let ent = level.entity(id);
        assert_eq!(ent.sector, Some(0));
        assert!(ent.position.x <= 256.0 - PLAYER.radius + 0.01);
    }

    #[test]
    fn smaller_class_fits_lower_opening() {
        let barrel = defs::by_id("BARREL").unwrap();
        let mut level = fixtures::two_boxes_with(0.0, 64.0, 0.0, 48.0);
        let id = spawn(&mut level, vec2(128.0, 128.0));
        level.entity_mut(id).type_id = barrel.type_id;
        entity_clipmove(&mut level, id, vec2(256.0, 0.0));
        assert_eq!(level.entity(id).sector, Some(1));
    }

    #[test]
    fn friction_stops_slow_entities() {
        let mut level = fixtures::one_box(512.0, 0.0, 64.0);
        let id = spawn(&mut level, vec2(256.0, 256.0));
        level.entity_mut(id).velocity = vec2(2.0, 0.0);
        entity_integrate(&mut level, id, 1.0 / 35.0);
        assert_eq!(level.entity(id).velocity, Vec2::ZERO);
        assert_eq!(level.entity(id).position, vec2(256.0, 256.0));
    }

    #[test]
    fn accelerate_then_integrate_moves_forward() {
        let mut level = fixtures::one_box(512.0, 0.0, 64.0);
        let id = spawn(&mut level, vec2(256.0, 256.0));
        let dt = 1.0 / 35.0;
        entity_accelerate(&mut level, id, vec2(0.0, 1.0), dt);
        let v0 = level.entity(id).velocity;
        assert!((v0.y - ACCELERATION * dt).abs() < 1e-2);

        entity_integrate(&mut level, id, dt);
        let ent = level.entity(id);
        assert!(ent.velocity.y < v0.y && ent.velocity.y > 0.0);
        assert!((ent.position.y - (256.0 + ent.velocity.y * dt)).abs() < 1e-2);
    }
}
