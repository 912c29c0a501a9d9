use glam::{Vec2, Vec3};

use crate::renderer::{FlatVertex, GeometryVisitor, WallPart, WallVertex};
use crate::world::geometry::{Contour, Level, SectorId, TextureId};

/// Vertex layout shared by flats and walls.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MeshVertex {
    pub pos: Vec3,
    pub uv: Vec2,
    pub light: f32,
    pub texture: TextureId,
}

/// Collects one indexed triangle list per surface kind.
#[derive(Default, Debug)]
pub struct MeshBuilder {
    pub flat_vertices: Vec<MeshVertex>,
    pub flat_indices: Vec<u32>,
    pub wall_vertices: Vec<MeshVertex>,
    pub wall_indices: Vec<u32>,

    base: u32,
    light: f32,
    texture: TextureId,
}

impl MeshBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.flat_vertices.clear();
        self.flat_indices.clear();
        self.wall_vertices.clear();
        self.wall_indices.clear();
    }

    pub fn triangle_count(&self) -> usize {
        (self.flat_indices.len() + self.wall_indices.len()) / 3
    }
}

impl GeometryVisitor for MeshBuilder {
    fn begin_flat(&mut self, level: &Level, sector: SectorId, flat: usize) {
        let s = level.sector(sector);
        self.base = self.flat_vertices.len() as u32;
        self.light = s.light_level;
        self.texture = s.flat[flat].texture;
    }

    fn add_vertex(&mut self, v: FlatVertex) {
        self.flat_vertices.push(MeshVertex {
            pos: v.pos,
            uv: v.uv,
            light: self.light,
            texture: self.texture,
        });
    }

    fn add_triangle(&mut self, tri: [u32; 3]) {
        self.flat_indices.extend(tri.map(|i| i + self.base));
    }

    fn begin_wall(&mut self, level: &Level, sector: SectorId, contour: &Contour, part: WallPart) {
        self.base = self.wall_vertices.len() as u32;
        self.light = level.sector(sector).light_level;
        let band = if part == WallPart::Upper { 1 } else { 0 };
        self.texture = contour
            .sidedef(level)
            .map(|sd| level.sidedef(sd).texture[band])
            .unwrap_or_default();
    }

    fn add_wall_vertex(&mut self, v: WallVertex) {
        self.wall_vertices.push(MeshVertex {
            pos: v.pos,
            uv: v.uv,
            light: self.light,
            texture: self.texture,
        });
    }

    fn end_wall(&mut self) {
        let b = self.base;
        self.wall_indices.extend([b, b + 1, b + 2, b, b + 2, b + 3]);
    }
}
