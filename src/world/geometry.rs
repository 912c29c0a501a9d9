use std::ops::Range;

use glam::{Affine2, Vec2};
use serde::{Deserialize, Serialize};

use crate::defs::{ContourFlags, TagFlags};
use crate::world::plane::Plane;

pub type VertexId = u32;
pub type LinedefId = u32;
pub type SidedefId = u32;
pub type SectorId = u32;
pub type ContourId = u32;
pub type EntityId = u32;
pub type TextureId = u32;

/// Index of the floor flat in `Sector::flat`.
pub const FLOOR: usize = 0;
/// Index of the ceiling flat in `Sector::flat`.
pub const CEILING: usize = 1;

/// Index of the lower texture in `Sidedef::texture`.
pub const LOWER: usize = 0;
/// Index of the upper texture in `Sidedef::texture`.
pub const UPPER: usize = 1;

/*──────────────────────────── Errors ──────────────────────────────*/

/// Broken level topology, detected while deriving contours.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LevelError {
    #[error("linedef {0} has no sidedef on either side")]
    NoSidedefs(LinedefId),

    #[error("linedef {0} is missing a vertex")]
    MissingVertex(LinedefId),

    #[error("sidedef {0} does not reference a valid sector")]
    UnresolvedSector(SidedefId),

    #[error("linedef {linedef} references missing sidedef {sidedef}")]
    BadSidedef { linedef: LinedefId, sidedef: SidedefId },

    #[error("sector {sector} has an open contour at entry {contour}")]
    OpenLoop { sector: SectorId, contour: ContourId },
}

/*──────────────────────── level elements ──────────────────────────*/

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub pos: Vec2,
}

/// Wall segment between two vertices.
///
/// `sidedef[0]` faces the sector on the right of `vertex[0] → vertex[1]`,
/// `sidedef[1]` the sector on the right of `vertex[1] → vertex[0]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Linedef {
    pub vertex: [Option<VertexId>; 2],
    pub sidedef: [Option<SidedefId>; 2],
}

impl Linedef {
    /// Only one side present: a solid wall.
    #[inline]
    pub fn is_one_sided(&self) -> bool {
        self.sidedef[0].is_none() || self.sidedef[1].is_none()
    }

    /// Both sides present: a portal between two sectors.
    #[inline]
    pub fn is_portal(&self) -> bool {
        self.sidedef[0].is_some() && self.sidedef[1].is_some()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sidedef {
    pub sector: Option<SectorId>,
    /// `[LOWER, UPPER]`
    pub texture: [TextureId; 2],
    pub tx: [Affine2; 2],
    pub tags: TagFlags,
}

impl Default for Sidedef {
    fn default() -> Self {
        Self {
            sector: None,
            texture: [0; 2],
            tx: [Affine2::IDENTITY; 2],
            tags: TagFlags::empty(),
        }
    }
}

/// Floor or ceiling surface.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Flat {
    pub plane: Plane,
    pub texture: TextureId,
    pub tx: Affine2,
}

impl Flat {
    pub fn new(plane: Plane) -> Self {
        Self {
            plane,
            texture: 0,
            tx: Affine2::IDENTITY,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sector {
    /// `[FLOOR, CEILING]`
    pub flat: [Flat; 2],
    pub light_level: f32,
    pub tags: TagFlags,
    /// Start of this sector's slice of `Level::contours` (derived).
    #[serde(skip)]
    pub contour0: Option<ContourId>,
    /// Length of that slice (derived).
    #[serde(skip)]
    pub contourn: u32,
}

impl Default for Sector {
    fn default() -> Self {
        Self {
            flat: [Flat::new(Plane::floor(0.0)), Flat::new(Plane::ceiling(0.0))],
            light_level: 1.0,
            tags: TagFlags::empty(),
            contour0: None,
            contourn: 0,
        }
    }
}

impl Sector {
    /// Index range of this sector's entries in `Level::contours`.
    #[inline]
    pub fn contours(&self) -> Range<usize> {
        match self.contour0 {
            Some(c0) => c0 as usize..(c0 + self.contourn) as usize,
            None => 0..0,
        }
    }

    #[inline]
    pub fn floor(&self) -> &Flat {
        &self.flat[FLOOR]
    }

    #[inline]
    pub fn ceiling(&self) -> &Flat {
        &self.flat[CEILING]
    }
}

/// One `(linedef, side)` pair of a sector boundary loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contour {
    pub linedef: LinedefId,
    pub flags: ContourFlags,
}

impl Contour {
    pub fn new(linedef: LinedefId, side: usize) -> Self {
        let mut flags = ContourFlags::empty();
        flags.set(ContourFlags::SIDE, side == 1);
        Self { linedef, flags }
    }

    /// 0 or 1 – the linedef side this entry walks.
    #[inline(always)]
    pub fn side(&self) -> usize {
        self.flags.contains(ContourFlags::SIDE) as usize
    }

    #[inline]
    pub fn is_first(&self) -> bool {
        self.flags.contains(ContourFlags::IS_FIRST)
    }

    #[inline]
    pub fn is_last(&self) -> bool {
        self.flags.contains(ContourFlags::IS_LAST)
    }

    /// Vertex this entry starts from when walking the loop.
    #[inline]
    pub fn start_vertex(&self, level: &Level) -> Option<VertexId> {
        level.linedef(self.linedef).vertex[self.side()]
    }

    /// Vertex this entry joins the next entry at.
    #[inline]
    pub fn end_vertex(&self, level: &Level) -> Option<VertexId> {
        level.linedef(self.linedef).vertex[self.side() ^ 1]
    }

    /// Sidedef facing the sector this entry bounds.
    #[inline]
    pub fn sidedef(&self, level: &Level) -> Option<SidedefId> {
        level.linedef(self.linedef).sidedef[self.side()]
    }

    /// Sidedef on the far side of the wall, if it is a portal.
    #[inline]
    pub fn opposite_sidedef(&self, level: &Level) -> Option<SidedefId> {
        level.linedef(self.linedef).sidedef[self.side() ^ 1]
    }

    /// Walk-order endpoints `(start, end)` in world space.
    #[inline]
    pub fn segment(&self, level: &Level) -> (Vec2, Vec2) {
        let ld = level.linedef(self.linedef);
        let (v0, v1) = level.linedef_points(ld);
        if self.side() == 0 { (v0, v1) } else { (v1, v0) }
    }
}

/// Movable point object.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub type_id: i32,
    pub position: Vec2,
    pub z: f32,
    /// Degrees; 0 looks towards −Y.
    pub yaw: f32,
    pub pitch: f32,
    pub velocity: Vec2,
    /// Sector containing `position` (derived after every move).
    #[serde(skip)]
    pub sector: Option<SectorId>,
}

/*────────────────────────────── store ─────────────────────────────*/

/// Arena-style level store.  Elements are referenced by index; indices
/// stay valid for the lifetime of the level (nothing is ever compacted).
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Level {
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) linedefs: Vec<Linedef>,
    pub(crate) sidedefs: Vec<Sidedef>,
    pub(crate) sectors: Vec<Sector>,
    pub(crate) entities: Vec<Entity>,
    #[serde(skip)]
    pub(crate) contours: Vec<Contour>,
}

macro_rules! arena {
    ($new:ident, $get:ident, $get_mut:ident, $count:ident, $all:ident, $field:ident, $ty:ty, $id:ty, $init:expr) => {
        #[doc = concat!("Append a fresh `", stringify!($ty), "` and return its index.")]
        pub fn $new(&mut self) -> $id {
            let id = self.$field.len() as $id;
            self.$field.push($init);
            id
        }

        #[inline]
        #[track_caller]
        pub fn $get(&self, i: $id) -> &$ty {
            match self.$field.get(i as usize) {
                Some(e) => e,
                None => panic!(
                    concat!(stringify!($ty), " {} out of range ({} total)"),
                    i,
                    self.$field.len()
                ),
            }
        }

        #[inline]
        #[track_caller]
        pub fn $get_mut(&mut self, i: $id) -> &mut $ty {
            let len = self.$field.len();
            match self.$field.get_mut(i as usize) {
                Some(e) => e,
                None => panic!(
                    concat!(stringify!($ty), " {} out of range ({} total)"),
                    i, len
                ),
            }
        }

        #[inline]
        pub fn $count(&self) -> u32 {
            self.$field.len() as u32
        }

        #[inline]
        pub fn $all(&self) -> &[$ty] {
            &self.$field
        }
    };
}

impl Level {
    pub fn new() -> Self {
        Self::default()
    }

    arena!(new_vertex, vertex, vertex_mut, vertex_count, vertices, vertices, Vertex, VertexId, Vertex::default());
    arena!(new_linedef, linedef, linedef_mut, linedef_count, linedefs, linedefs, Linedef, LinedefId, Linedef::default());
    arena!(new_sidedef, sidedef, sidedef_mut, sidedef_count, sidedefs, sidedefs, Sidedef, SidedefId, Sidedef::default());
    arena!(new_sector, sector, sector_mut, sector_count, sectors, sectors, Sector, SectorId, Sector::default());
    arena!(new_entity, entity, entity_mut, entity_count, entities, entities, Entity, EntityId, Entity::default());

    /// Number of vertices; the index the next `new_vertex` will return.
    #[inline]
    pub fn top_vertex(&self) -> VertexId {
        self.vertex_count()
    }

    #[inline]
    #[track_caller]
    pub fn contour(&self, i: usize) -> &Contour {
        match self.contours.get(i) {
            Some(c) => c,
            None => panic!("Contour {} out of range ({} total)", i, self.contours.len()),
        }
    }

    #[inline]
    pub fn contour_count(&self) -> u32 {
        self.contours.len() as u32
    }

    #[inline]
    pub fn contours(&self) -> &[Contour] {
        &self.contours
    }

    /// The contour entries bounding `sector`, in loop order.
    #[inline]
    pub fn sector_contours(&self, sector: SectorId) -> &[Contour] {
        &self.contours[self.sector(sector).contours()]
    }

    /// World-space endpoints `(vertex[0], vertex[1])` of a linedef.
    ///
    /// Panics on a linedef with unset vertices; contours are only built
    /// for complete linedefs.
    #[inline]
    #[track_caller]
    pub fn linedef_points(&self, ld: &Linedef) -> (Vec2, Vec2) {
        let [Some(v0), Some(v1)] = ld.vertex else {
            panic!("linedef with unset vertex: {ld:?}");
        };
        (self.vertex(v0).pos, self.vertex(v1).pos)
    }

    /// Sector that a sidedef faces.
    #[inline]
    pub fn sidedef_sector(&self, sd: SidedefId) -> Option<SectorId> {
        self.sidedef(sd).sector
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_elements_start_unlinked() {
        let mut level = Level::new();
        let s = level.new_sector();
        let l = level.new_linedef();
        let sd = level.new_sidedef();

        assert_eq!(level.sector(s).contour0, None);
        assert_eq!(level.sector(s).contourn, 0);
        assert!(level.sector(s).contours().is_empty());
        assert_eq!(level.linedef(l).vertex, [None, None]);
        assert_eq!(level.linedef(l).sidedef, [None, None]);
        assert_eq!(level.sidedef(sd).sector, None);
    }

    #[test]
    fn indices_are_sequential() {
        let mut level = Level::new();
        assert_eq!(level.new_vertex(), 0);
        assert_eq!(level.new_vertex(), 1);
        assert_eq!(level.top_vertex(), 2);
        assert_eq!(level.new_entity(), 0);
        assert_eq!(level.entity_count(), 1);
    }

    #[test]
    fn get_mut_writes_through() {
        let mut level = Level::new();
        let v = level.new_vertex();
        level.vertex_mut(v).pos = Vec2::new(3.0, 4.0);
        assert_eq!(level.vertex(v).pos, Vec2::new(3.0, 4.0));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn get_out_of_range_panics() {
        let level = Level::new();
        level.sector(0);
    }

    #[test]
    fn contour_side_selects_walk_direction() {
        let mut level = Level::new();
        let a = level.new_vertex();
        let b = level.new_vertex();
        level.vertex_mut(b).pos = Vec2::X;
        let l = level.new_linedef();
        level.linedef_mut(l).vertex = [Some(a), Some(b)];

        let front = Contour::new(l, 0);
        let back = Contour::new(l, 1);
        assert_eq!(front.start_vertex(&level), Some(a));
        assert_eq!(front.end_vertex(&level), Some(b));
        assert_eq!(back.start_vertex(&level), Some(b));
        assert_eq!(back.segment(&level), (Vec2::X, Vec2::ZERO));
    }

    #[test]
    fn portal_classification() {
        let mut ld = Linedef::default();
        ld.sidedef[0] = Some(0);
        assert!(ld.is_one_sided());
        ld.sidedef[1] = Some(1);
        assert!(ld.is_portal());
        assert!(!ld.is_one_sided());
    }
}
