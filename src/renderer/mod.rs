//! Level geometry extraction.
//!
//! *Nothing in here knows about a graphics API.*
//! [`walk_level`] turns every sector into triangulated floor / ceiling
//! flats and wall quads and feeds them to a [`GeometryVisitor`].  What the
//! visitor does with them is its own business:
//!
//! * [`MeshBuilder`] collects vertex / index buffers ready for upload.
//! * [`TagOverlay`] keeps only highlighted or selected surfaces, for an
//!   editor overlay pass.
//! * [`software`] rasterises an overhead map into a `u32` frame-buffer.
//!
//! Coordinates are world space with +Z up.

mod flats;
mod mesh;
mod overlay;
pub mod software;
mod walls;

use glam::{Vec2, Vec3};

use crate::world::geometry::{Contour, Level, SectorId};

pub use flats::{FlatTriangulation, triangulate_sector};
pub use mesh::{MeshBuilder, MeshVertex};
pub use overlay::{OverlayTriangle, TagOverlay};
pub use walls::wall_quads;

/// Pixel format of the software frame-buffer (0x00RRGGBB).
pub type Rgba = u32;

/// Which band of a wall a quad covers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WallPart {
    /// One-sided wall, ceiling to floor.
    Full,
    /// Step up to a higher neighbouring floor.
    Lower,
    /// Step down to a lower neighbouring ceiling.
    Upper,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FlatVertex {
    pub pos: Vec3,
    pub uv: Vec2,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WallVertex {
    pub pos: Vec3,
    pub uv: Vec2,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("sector {sector} flat {flat}: plane has no height (vertical normal)")]
    DegeneratePlane { sector: SectorId, flat: usize },

    #[error("sector {sector}: contour loops could not be triangulated")]
    Tessellation { sector: SectorId },
}

/// Receiver of the geometry produced by [`walk_level`].
///
/// Flats arrive as `begin_flat`, their vertices, their triangles (indices
/// relative to the first vertex of this flat), `end_flat`.  Walls arrive as
/// `begin_wall`, four corners (top-start, top-end, bottom-end,
/// bottom-start), `end_wall`.
pub trait GeometryVisitor {
    fn begin_flat(&mut self, _level: &Level, _sector: SectorId, _flat: usize) {}
    fn add_vertex(&mut self, v: FlatVertex);
    fn add_triangle(&mut self, tri: [u32; 3]);
    fn end_flat(&mut self) {}

    fn begin_wall(&mut self, _level: &Level, _sector: SectorId, _contour: &Contour, _part: WallPart) {}
    fn add_wall_vertex(&mut self, v: WallVertex);
    fn end_wall(&mut self) {}
}

/// Emit every flat, then every wall, of every sector with contours.
///
/// Floors wind counter-clockwise seen from above, ceilings clockwise, so
/// both face into the sector.
pub fn walk_level<V: GeometryVisitor + ?Sized>(level: &Level, visitor: &mut V) -> Result<(), RenderError> {
    for sector in 0..level.sector_count() {
        if level.sector(sector).contourn == 0 {
            continue;
        }
        let tris = triangulate_sector(level, sector)?;
        for flat in 0..2 {
            emit_flat(level, sector, flat, &tris, visitor)?;
        }
    }

    for sector in 0..level.sector_count() {
        for c in level.sector_contours(sector) {
            for (part, quad) in wall_quads(level, sector, c)? {
                visitor.begin_wall(level, sector, c, part);
                for v in quad {
                    visitor.add_wall_vertex(v);
                }
                visitor.end_wall();
            }
        }
    }
    Ok(())
}

fn emit_flat<V: GeometryVisitor + ?Sized>(
    level: &Level,
    sector: SectorId,
    flat: usize,
    tris: &FlatTriangulation,
    visitor: &mut V,
) -> Result<(), RenderError> {
    let f = &level.sector(sector).flat[flat];

    visitor.begin_flat(level, sector, flat);
    for &p in &tris.points {
        let z = f
            .plane
            .z_at(p)
            .ok_or(RenderError::DegeneratePlane { sector, flat })?;
        visitor.add_vertex(FlatVertex {
            pos: p.extend(z),
            uv: f.tx.transform_point2(p),
        });
    }
    for &[a, b, c] in &tris.triangles {
        // triangulation is counter-clockwise; flip for the downward-facing ceiling
        visitor.add_triangle(if flat == 0 { [a, b, c] } else { [c, b, a] });
    }
    visitor.end_flat();
    Ok(())
}
