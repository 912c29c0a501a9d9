//! Assemble a level from room outlines instead of raw linedef soup.
//!
//! Each room is a polygon (plus optional holes).  Shared vertices are
//! merged by exact position, and an edge whose reverse was already
//! emitted by another room becomes a portal between the two.

use std::collections::HashMap;

use glam::Vec2;
use log::debug;

use crate::sim::entity_place;
use crate::world::geometry::{EntityId, Level, LevelError, LinedefId, SectorId, VertexId};
use crate::world::plane::{Plane, cross};

#[derive(Debug, Default)]
pub struct LevelBuilder {
    level: Level,
    vertex_at: HashMap<(u32, u32), VertexId>,
    /// Directed edge `v0 → v1` of every linedef, keyed for the portal lookup.
    edges: HashMap<(VertexId, VertexId), LinedefId>,
}

impl LevelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Room with flat floor and ceiling.  Any winding is accepted.
    pub fn add_sector(&mut self, outline: &[Vec2], floor_z: f32, ceil_z: f32) -> SectorId {
        self.add_sector_with_holes(outline, &[], floor_z, ceil_z)
    }

    /// Room with solid pillars punched out of it.
    ///
    /// Loops are re-oriented so the room interior lies to the right of
    /// every edge: the outline clockwise, holes counter-clockwise.
    pub fn add_sector_with_holes(
        &mut self,
        outline: &[Vec2],
        holes: &[&[Vec2]],
        floor_z: f32,
        ceil_z: f32,
    ) -> SectorId {
        let sector = self.level.new_sector();
        {
            let s = self.level.sector_mut(sector);
            s.flat[0].plane = Plane::floor(floor_z);
            s.flat[1].plane = Plane::ceiling(ceil_z);
        }

        self.add_loop(sector, outline, false);
        for hole in holes {
            self.add_loop(sector, hole, true);
        }
        sector
    }

    /// Place an entity; its sector and eye height are resolved by `finish`.
    pub fn add_entity(&mut self, type_id: i32, position: Vec2, yaw: f32) -> EntityId {
        let id = self.level.new_entity();
        let e = self.level.entity_mut(id);
        e.type_id = type_id;
        e.position = position;
        e.yaw = yaw;
        id
    }

    /// Direct access for tweaks the builder has no call for (textures,
    /// light, sloped planes).
    pub fn level_mut(&mut self) -> &mut Level {
        &mut self.level
    }

    pub fn finish(mut self) -> Result<Level, LevelError> {
        self.level.build_contours()?;
        for id in 0..self.level.entity_count() {
            entity_place(&mut self.level, id);
        }
        debug!(
            "built level: {} sectors, {} linedefs ({} portals), {} entities",
            self.level.sector_count(),
            self.level.linedef_count(),
            self.level.linedefs().iter().filter(|l| l.is_portal()).count(),
            self.level.entity_count()
        );
        Ok(self.level)
    }

    fn vertex(&mut self, p: Vec2) -> VertexId {
        let key = (p.x.to_bits(), p.y.to_bits());
        if let Some(&v) = self.vertex_at.get(&key) {
            return v;
        }
        let v = self.level.new_vertex();
        self.level.vertex_mut(v).pos = p;
        self.vertex_at.insert(key, v);
        v
    }

    fn add_loop(&mut self, sector: SectorId, points: &[Vec2], hole: bool) {
        let clockwise = signed_area(points) < 0.0;
        let ids: Vec<VertexId> = if clockwise != hole {
            points.iter().map(|&p| self.vertex(p)).collect()
        } else {
            points.iter().rev().map(|&p| self.vertex(p)).collect()
        };

        for (i, &a) in ids.iter().enumerate() {
            let b = ids[(i + 1) % ids.len()];
            if a != b {
                self.add_edge(sector, a, b);
            }
        }
    }

    fn add_edge(&mut self, sector: SectorId, a: VertexId, b: VertexId) {
        let sd = self.level.new_sidedef();
        self.level.sidedef_mut(sd).sector = Some(sector);

        // the neighbour walked b → a: we are its linedef's back side
        if let Some(&l) = self.edges.get(&(b, a)) {
            let ld = self.level.linedef_mut(l);
            if ld.sidedef[1].is_none() {
                ld.sidedef[1] = Some(sd);
                return;
            }
        }

        let l = self.level.new_linedef();
        let ld = self.level.linedef_mut(l);
        ld.vertex = [Some(a), Some(b)];
        ld.sidedef[0] = Some(sd);
        self.edges.insert((a, b), l);
    }
}

/// Shoelace area; positive for counter-clockwise loops (Y up).
pub fn signed_area(points: &[Vec2]) -> f32 {
    let n = points.len();
    (0..n)
        .map(|i| cross(points[i], points[(i + 1) % n]))
        .sum::<f32>()
        * 0.5
}
