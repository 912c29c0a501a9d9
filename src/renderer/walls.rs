use glam::{Affine2, Vec2, vec2};
use smallvec::SmallVec;

use crate::renderer::{RenderError, WallPart, WallVertex};
use crate::world::geometry::{CEILING, Contour, FLOOR, LOWER, Level, SectorId, UPPER};

/// Quads (top-start, top-end, bottom-end, bottom-start) for one contour
/// entry of `sector`.
///
/// * one-sided: a single full-height quad
/// * portal: a lower quad where the neighbour's floor is above ours at both
///   ends, an upper quad where its ceiling is below ours at both ends
///
/// `u` runs along the wall in map units, `v` is world height; both go
/// through the sidedef's texture transform for that band.
pub fn wall_quads(
    level: &Level,
    sector: SectorId,
    c: &Contour,
) -> Result<SmallVec<[(WallPart, [WallVertex; 4]); 2]>, RenderError> {
    let mut out = SmallVec::new();
    let (v0, v1) = c.segment(level);
    let tx = c
        .sidedef(level)
        .map(|sd| level.sidedef(sd).tx)
        .unwrap_or([Affine2::IDENTITY; 2]);

    let z = |s: SectorId, flat: usize, p: Vec2| {
        level.sector(s).flat[flat]
            .plane
            .z_at(p)
            .ok_or(RenderError::DegeneratePlane { sector: s, flat })
    };

    let ceil = [z(sector, CEILING, v0)?, z(sector, CEILING, v1)?];
    let floor = [z(sector, FLOOR, v0)?, z(sector, FLOOR, v1)?];

    let Some(other) = c.opposite_sidedef(level).and_then(|sd| level.sidedef_sector(sd)) else {
        out.push((WallPart::Full, quad(v0, v1, ceil, floor, tx[LOWER])));
        return Ok(out);
    };

    let other_floor = [z(other, FLOOR, v0)?, z(other, FLOOR, v1)?];
    if other_floor[0] > floor[0] && other_floor[1] > floor[1] {
        out.push((WallPart::Lower, quad(v0, v1, other_floor, floor, tx[LOWER])));
    }

    let other_ceil = [z(other, CEILING, v0)?, z(other, CEILING, v1)?];
    if other_ceil[0] < ceil[0] && other_ceil[1] < ceil[1] {
        out.push((WallPart::Upper, quad(v0, v1, ceil, other_ceil, tx[UPPER])));
    }
    Ok(out)
}

fn quad(v0: Vec2, v1: Vec2, top: [f32; 2], bottom: [f32; 2], tx: Affine2) -> [WallVertex; 4] {
    let len = v0.distance(v1);
    let corner = |p: Vec2, z: f32, u: f32, v: f32| WallVertex {
        pos: p.extend(z),
        uv: tx.transform_point2(vec2(u, v)),
    };
    [
        corner(v0, top[0], 0.0, top[0]),
        corner(v1, top[1], len, top[1]),
        corner(v1, bottom[1], len, bottom[1]),
        corner(v0, bottom[0], 0.0, bottom[0]),
    ]
}
