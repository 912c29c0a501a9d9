use glam::Vec3;

use crate::defs::TagFlags;
use crate::renderer::{FlatVertex, GeometryVisitor, WallPart, WallVertex};
use crate::world::geometry::{Contour, Level, SectorId};

/// A tagged surface triangle and the bits that made it interesting.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OverlayTriangle {
    pub points: [Vec3; 3],
    pub tags: TagFlags,
}

/// Keeps only the triangles of highlighted or selected surfaces.
///
/// Floors answer to the `ZMINUS` bits of their sector, ceilings to the
/// `ZPLUS` bits.  Lower wall bands answer to the sidedef's `ZMINUS` bits,
/// upper bands to `ZPLUS`, full-height walls to both.
#[derive(Default, Debug)]
pub struct TagOverlay {
    pub triangles: Vec<OverlayTriangle>,

    tags: TagFlags,
    points: Vec<Vec3>,
}

impl TagOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.triangles.clear();
    }

    fn start(&mut self, tags: TagFlags) {
        self.tags = tags;
        self.points.clear();
    }
}

const ZPLUS: TagFlags = TagFlags::HIGHLIGHTED_ZPLUS.union(TagFlags::SELECTED_ZPLUS);
const ZMINUS: TagFlags = TagFlags::HIGHLIGHTED_ZMINUS.union(TagFlags::SELECTED_ZMINUS);

impl GeometryVisitor for TagOverlay {
    fn begin_flat(&mut self, level: &Level, sector: SectorId, flat: usize) {
        let sense = if flat == 0 { ZMINUS } else { ZPLUS };
        self.start(level.sector(sector).tags & sense);
    }

    fn add_vertex(&mut self, v: FlatVertex) {
        if !self.tags.is_empty() {
            self.points.push(v.pos);
        }
    }

    fn add_triangle(&mut self, [a, b, c]: [u32; 3]) {
        if self.tags.is_empty() {
            return;
        }
        let p = |i: u32| self.points[i as usize];
        self.triangles.push(OverlayTriangle {
            points: [p(a), p(b), p(c)],
            tags: self.tags,
        });
    }

    fn begin_wall(&mut self, level: &Level, _sector: SectorId, contour: &Contour, part: WallPart) {
        let sense = match part {
            WallPart::Full => ZPLUS | ZMINUS,
            WallPart::Lower => ZMINUS,
            WallPart::Upper => ZPLUS,
        };
        let tags = contour
            .sidedef(level)
            .map(|sd| level.sidedef(sd).tags)
            .unwrap_or_default();
        self.start(tags & sense);
    }

    fn add_wall_vertex(&mut self, v: WallVertex) {
        if !self.tags.is_empty() {
            self.points.push(v.pos);
        }
    }

    fn end_wall(&mut self) {
        if self.tags.is_empty() || self.points.len() < 4 {
            return;
        }
        let q = &self.points;
        for points in [[q[0], q[1], q[2]], [q[0], q[2], q[3]]] {
            self.triangles.push(OverlayTriangle { points, tags: self.tags });
        }
    }
}
