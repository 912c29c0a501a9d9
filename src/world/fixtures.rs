//! Hand-built levels shared by the unit tests.  They go through the raw
//! store API the way an external loader would.

use glam::{Vec2, vec2};

use crate::world::geometry::{Level, LinedefId, SectorId, SidedefId, VertexId};
use crate::world::plane::Plane;

/// Linedef shared by the two sectors of `two_boxes`.
pub const PORTAL: LinedefId = 2;

pub fn sector(level: &mut Level, floor: f32, ceil: f32) -> SectorId {
    let s = level.new_sector();
    let sec = level.sector_mut(s);
    sec.flat[0].plane = Plane::floor(floor);
    sec.flat[1].plane = Plane::ceiling(ceil);
    s
}

pub fn vertex(level: &mut Level, p: Vec2) -> VertexId {
    let v = level.new_vertex();
    level.vertex_mut(v).pos = p;
    v
}

pub fn sidedef(level: &mut Level, sector: SectorId) -> SidedefId {
    let sd = level.new_sidedef();
    level.sidedef_mut(sd).sector = Some(sector);
    sd
}

/// Linedef `v0 → v1`; `front` faces right of that direction, `back` left.
pub fn linedef(
    level: &mut Level,
    v0: VertexId,
    v1: VertexId,
    front: Option<SectorId>,
    back: Option<SectorId>,
) -> LinedefId {
    let sd0 = front.map(|s| sidedef(level, s));
    let sd1 = back.map(|s| sidedef(level, s));
    let l = level.new_linedef();
    let ld = level.linedef_mut(l);
    ld.vertex = [Some(v0), Some(v1)];
    ld.sidedef = [sd0, sd1];
    l
}

/// Closed clockwise loop of one-sided walls around `sector`.
fn walls(level: &mut Level, sector: SectorId, verts: &[VertexId]) {
    for (i, &v0) in verts.iter().enumerate() {
        let v1 = verts[(i + 1) % verts.len()];
        linedef(level, v0, v1, Some(sector), None);
    }
}

/// `[0, size]²` box, one sector, four one-sided walls.
pub fn one_box(size: f32, floor: f32, ceil: f32) -> Level {
    let mut level = Level::new();
    let s = sector(&mut level, floor, ceil);
    let v: Vec<VertexId> = [
        vec2(0.0, 0.0),
        vec2(0.0, size),
        vec2(size, size),
        vec2(size, 0.0),
    ]
    .into_iter()
    .map(|p| vertex(&mut level, p))
    .collect();
    walls(&mut level, s, &v);
    level.build_contours().unwrap();
    level
}

/// Two 256×256 boxes side by side along X sharing linedef `PORTAL`.
pub fn two_boxes() -> Level {
    two_boxes_with(0.0, 64.0, 0.0, 64.0)
}

/// `two_boxes` with explicit floor/ceiling heights for each sector.
pub fn two_boxes_with(floor0: f32, ceil0: f32, floor1: f32, ceil1: f32) -> Level {
    let mut level = Level::new();
    let s0 = sector(&mut level, floor0, ceil0);
    let s1 = sector(&mut level, floor1, ceil1);

    let v0 = vertex(&mut level, vec2(0.0, 0.0));
    let v1 = vertex(&mut level, vec2(0.0, 256.0));
    let v2 = vertex(&mut level, vec2(256.0, 256.0));
    let v3 = vertex(&mut level, vec2(256.0, 0.0));
    let v4 = vertex(&mut level, vec2(512.0, 256.0));
    let v5 = vertex(&mut level, vec2(512.0, 0.0));

    linedef(&mut level, v0, v1, Some(s0), None);
    linedef(&mut level, v1, v2, Some(s0), None);
    let portal = linedef(&mut level, v2, v3, Some(s0), Some(s1));
    assert_eq!(portal, PORTAL);
    linedef(&mut level, v3, v0, Some(s0), None);

    linedef(&mut level, v2, v4, Some(s1), None);
    linedef(&mut level, v4, v5, Some(s1), None);
    linedef(&mut level, v5, v3, Some(s1), None);

    level.build_contours().unwrap();
    level
}

/// `[0, 512]²` room with a solid `[192, 320]²` pillar punched out of it.
pub fn box_with_pillar() -> Level {
    let mut level = Level::new();
    let s = sector(&mut level, 0.0, 128.0);

    let outer: Vec<VertexId> = [
        vec2(0.0, 0.0),
        vec2(0.0, 512.0),
        vec2(512.0, 512.0),
        vec2(512.0, 0.0),
    ]
    .into_iter()
    .map(|p| vertex(&mut level, p))
    .collect();
    walls(&mut level, s, &outer);

    // counter-clockwise: room interior stays on the right
    let hole: Vec<VertexId> = [
        vec2(192.0, 192.0),
        vec2(320.0, 192.0),
        vec2(320.0, 320.0),
        vec2(192.0, 320.0),
    ]
    .into_iter()
    .map(|p| vertex(&mut level, p))
    .collect();
    walls(&mut level, s, &hole);

    level.build_contours().unwrap();
    level
}

/// Row of `cells` 64×64 cells along X, alternating between sectors 0 and 1,
/// so every inner wall is a portal.
pub fn cell_row(cells: u32) -> Level {
    let mut level = Level::new();
    let s = [sector(&mut level, 0.0, 128.0), sector(&mut level, 0.0, 128.0)];
    let owner = |i: u32| s[(i % 2) as usize];

    let (bottom, top): (Vec<VertexId>, Vec<VertexId>) = (0..=cells)
        .map(|i| {
            let x = i as f32 * 64.0;
            (vertex(&mut level, vec2(x, 0.0)), vertex(&mut level, vec2(x, 64.0)))
        })
        .unzip();

    let n = cells as usize;
    linedef(&mut level, bottom[0], top[0], Some(owner(0)), None);
    linedef(&mut level, top[n], bottom[n], Some(owner(cells - 1)), None);
    for i in 0..n {
        let cell = owner(i as u32);
        linedef(&mut level, top[i], top[i + 1], Some(cell), None);
        linedef(&mut level, bottom[i + 1], bottom[i], Some(cell), None);
        if i > 0 {
            linedef(&mut level, top[i], bottom[i], Some(owner(i as u32 - 1)), Some(cell));
        }
    }

    level.build_contours().unwrap();
    level
}
