//! Sector-based level kernel.
//!
//! * `world`    – level store, contour builder, point queries, traces, tags
//! * `sim`      – entity clipping / movement and the fixed-rate tic driver
//! * `defs`     – entity classes and flag bit sets
//! * `renderer` – geometry visitor that turns sectors into flats and walls

pub mod defs;
pub mod renderer;
pub mod sim;
pub mod world;
