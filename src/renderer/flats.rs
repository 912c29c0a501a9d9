use glam::Vec2;

use crate::renderer::RenderError;
use crate::world::builder::signed_area;
use crate::world::geometry::{Level, SectorId};
use crate::world::plane::crosses_north;

/// Floor/ceiling outline of one sector, triangulated in the X-Y plane.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FlatTriangulation {
    pub points: Vec<Vec2>,
    /// Counter-clockwise (seen from +Z) index triples into `points`.
    pub triangles: Vec<[u32; 3]>,
}

/// One outer loop with the holes it encloses.
struct Polygon {
    outer: Vec<Vec2>,
    holes: Vec<Vec<Vec2>>,
}

/// Triangulate the region bounded by `sector`'s contour loops.
///
/// Loops are told apart by orientation: the sector lies right of every
/// edge, so clockwise loops are outer boundaries and counter-clockwise
/// loops are holes.  A hole belongs to the smallest outer loop around it.
pub fn triangulate_sector(level: &Level, sector: SectorId) -> Result<FlatTriangulation, RenderError> {
    let mut outers = Vec::new();
    let mut holes = Vec::new();
    for lp in level.contour_loops(sector) {
        let pts: Vec<Vec2> = lp
            .iter()
            .filter_map(|c| c.start_vertex(level))
            .map(|v| level.vertex(v).pos)
            .collect();
        if pts.len() < 3 {
            continue;
        }
        if signed_area(&pts) < 0.0 {
            outers.push(Polygon { outer: pts, holes: Vec::new() });
        } else {
            holes.push(pts);
        }
    }

    for hole in holes {
        let owner = outers
            .iter_mut()
            .filter(|p| loop_contains(&p.outer, hole[0]))
            .min_by(|a, b| signed_area(&b.outer).total_cmp(&signed_area(&a.outer)));
        match owner {
            Some(p) => p.holes.push(hole),
            None => return Err(RenderError::Tessellation { sector }),
        }
    }

    let mut out = FlatTriangulation::default();
    for poly in &outers {
        append_polygon(&mut out, poly, sector)?;
    }
    Ok(out)
}

fn append_polygon(out: &mut FlatTriangulation, poly: &Polygon, sector: SectorId) -> Result<(), RenderError> {
    let base = out.points.len() as u32;

    let mut coords: Vec<f64> = Vec::new();
    let mut hole_starts = Vec::with_capacity(poly.holes.len());
    let mut push = |pts: &[Vec2], coords: &mut Vec<f64>| {
        for p in pts {
            coords.push(p.x as f64);
            coords.push(p.y as f64);
        }
        out.points.extend_from_slice(pts);
    };

    push(&poly.outer, &mut coords);
    for h in &poly.holes {
        hole_starts.push(coords.len() / 2);
        push(h, &mut coords);
    }

    let indices = earcutr::earcut(&coords, &hole_starts, 2)
        .map_err(|_| RenderError::Tessellation { sector })?;

    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| i as u32 + base);
        let p = |i: u32| out.points[i as usize];
        // earcut leaves orientation to the caller
        let ccw = (p(b) - p(a)).perp_dot(p(c) - p(a)) >= 0.0;
        out.triangles.push(if ccw { [a, b, c] } else { [a, c, b] });
    }
    Ok(())
}

/// Even-odd test against a bare point loop.  Hole ownership is decided
/// per loop, before any loop is known to bound the sector, so
/// `Level::sector_inside` (which counts every loop of the sector) can't
/// answer it.  Same half-open crossing rule.
fn loop_contains(poly: &[Vec2], p: Vec2) -> bool {
    let n = poly.len();
    let crossings = (0..n)
        .filter(|&i| crosses_north(p, poly[i], poly[(i + 1) % n]))
        .count();
    crossings % 2 == 1
}
