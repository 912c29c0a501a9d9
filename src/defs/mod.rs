pub mod flags;

pub use self::flags::{ContourFlags, TagFlags};

/*----------------------- movement constants ------------------------*/

/// Velocity gained per second of full input.
pub const ACCELERATION: f32 = 10_000.0;
/// Fraction of velocity that survives one second.
pub const FRICTION: f32 = 0.0005;
/// Squared speed below which an entity stops dead.
pub const STOP_THRESHOLD: f32 = 5.0;
/// Escape vectors push this far past the touching distance.
pub const CLIP_EPSILON: f32 = 1e-3;
/// Collision sub-steps are at most `radius / CLIP_SUBDIVISION` long.
pub const CLIP_SUBDIVISION: f32 = 64.0;
/// Upper bound on sub-steps per move; longer moves are cut short.
pub const MAX_CLIP_FRAGMENTS: u32 = 4096;

/*-------------------------- editing ---------------------------------*/

/// Height change of one selected-flat nudge.
pub const FLAT_NUDGE_STEP: f32 = 8.0;

/*------------------------- entity classes ---------------------------*/

/// Static per-type description of an entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityInfo {
    pub type_id: i32,
    pub id: &'static str,
    pub radius: f32,
    /// Vertical clearance needed to pass a portal.
    pub height: f32,
    /// Camera height above the floor.
    pub eye_height: f32,
}

pub const PLAYER: EntityInfo = EntityInfo {
    type_id: 0,
    id: "PLAYER",
    radius: 32.0,
    height: 56.0,
    eye_height: 41.0,
};

pub static ENTITY_INFO: &[EntityInfo] = &[
    PLAYER,
    EntityInfo {
        type_id: 1,
        id: "IMP",
        radius: 20.0,
        height: 56.0,
        eye_height: 40.0,
    },
    EntityInfo {
        type_id: 2,
        id: "BARREL",
        radius: 10.0,
        height: 42.0,
        eye_height: 32.0,
    },
];

/// Class of `type_id`; unknown types fall back to the player's shape.
pub fn by_type(type_id: i32) -> &'static EntityInfo {
    ENTITY_INFO
        .iter()
        .find(|info| info.type_id == type_id)
        .unwrap_or(&ENTITY_INFO[0])
}

pub fn by_id(id: &str) -> Option<&'static EntityInfo> {
    ENTITY_INFO.iter().find(|info| info.id == id)
}
