pub mod builder;
pub mod camera;
mod contour;
pub mod geometry;
pub mod plane;
mod query;
mod tags;
pub mod trace;

#[cfg(test)]
pub mod fixtures;

pub use geometry::{
    CEILING, Contour, ContourId, Entity, EntityId, FLOOR, Flat, LOWER, Level, LevelError,
    Linedef, LinedefId, Sector, SectorId, Sidedef, SidedefId, TextureId, UPPER, Vertex, VertexId,
};

pub use builder::LevelBuilder;
pub use camera::Camera;
pub use plane::Plane;
pub use trace::TraceResult;
